use std::io::{self, Write};

use eventdesk_core::Event;
use eventdesk_store::{AppState, EditSession};

/// Draw the list view: filtered events, edit session, error banner.
pub fn render_state(out: &mut impl Write, state: &AppState) -> io::Result<()> {
    let visible = state.visible_events();

    if state.filter.is_empty() {
        writeln!(out, "Events ({})", state.events.len())?;
    } else {
        writeln!(
            out,
            "Events ({} of {}, filter {:?})",
            visible.len(),
            state.events.len(),
            state.filter
        )?;
    }

    if state.is_loading() {
        writeln!(out, "  loading...")?;
    } else if visible.is_empty() {
        writeln!(out, "  (no events)")?;
    }

    let width = visible
        .iter()
        .map(|e| e.id.to_string().len())
        .max()
        .unwrap_or(0);
    for event in &visible {
        writeln!(out, "  {:>width$}  {}", event.id.to_string(), event.name)?;
    }

    if !state.draft.name.is_empty() {
        writeln!(out, "draft: {:?}", state.draft.name)?;
    }
    if let EditSession::Editing(buffer) = &state.edit {
        writeln!(out, "editing {}: {:?}", buffer.id, buffer.name)?;
    }
    if let Some(message) = state.last_error.message() {
        writeln!(out, "! {message}")?;
    }
    Ok(())
}

/// Draw one event with any extra fields the server sent.
pub fn render_event(out: &mut impl Write, event: &Event) -> io::Result<()> {
    writeln!(out, "id:   {}", event.id)?;
    writeln!(out, "name: {}", event.name)?;
    for (key, value) in &event.extra {
        writeln!(out, "{key}: {value}")?;
    }
    Ok(())
}
