use std::io::Write;
use std::process::ExitCode;

use eventdesk_core::{Event, EventId};
use eventdesk_store::{EventStore, Outcome};
use tracing::info;

use crate::cli::Command;
use crate::render::{render_event, render_state};
use crate::shell;

const DEMO_NAME: &str = "Test Event";

/// Run one subcommand. The exit code reflects the error banner.
pub async fn run(command: Command, store: &EventStore) -> anyhow::Result<ExitCode> {
    match command {
        Command::List { filter } => {
            if let Some(text) = filter {
                store.set_filter(text);
            }
            store.list().await;
            finish(store)
        }
        Command::Show { id } => {
            let id = store.resolve_id(&id);
            match store.fetch(&id).await {
                Ok(event) => {
                    render_event(&mut std::io::stdout().lock(), &event)?;
                    Ok(ExitCode::SUCCESS)
                }
                Err(_) => {
                    eprintln!("could not load event {id}");
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Command::Add { name } => {
            store.set_draft_name(name.join(" "));
            let outcome = store.create().await;
            skipped_or_finish(store, outcome, "event name is blank")
        }
        Command::Rename { id, name } => {
            let outcome = rename(store, &id, name.join(" ")).await?;
            skipped_or_finish(store, outcome, "no such event")
        }
        Command::Delete { id } => {
            store.delete(&store.resolve_id(&id)).await;
            finish(store)
        }
        Command::Shell => {
            shell::run(store).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Demo => demo(store).await,
    }
}

/// Open an edit on `raw_id`, set its name and save. The event comes from the
/// listed collection when present, otherwise from a direct fetch.
async fn rename(store: &EventStore, raw_id: &str, name: String) -> anyhow::Result<Outcome> {
    store.list().await;
    let target = match store.find_local(raw_id) {
        Some(event) => Some(event),
        None => store.fetch(&EventId::raw(raw_id)).await.ok(),
    };
    let Some(event) = target else {
        return Ok(Outcome::Skipped);
    };
    store.begin_edit(event);
    store.set_edit_name(name);
    Ok(store.save_edit().await)
}

/// Create, list, fetch and rename a throwaway event.
async fn demo(store: &EventStore) -> anyhow::Result<ExitCode> {
    let mut out = std::io::stdout().lock();

    writeln!(out, "Adding a new event: {DEMO_NAME:?}")?;
    store.set_draft_name(DEMO_NAME);
    if !store.create().await.is_applied() {
        render_state(&mut out, &store.snapshot())?;
        return Ok(ExitCode::FAILURE);
    }

    writeln!(out, "\nPrinting all events ...")?;
    render_state(&mut out, &store.snapshot())?;

    let Some(created) = newest_named(&store.snapshot().events, DEMO_NAME) else {
        writeln!(out, "\n{DEMO_NAME:?} is not in the listing")?;
        return Ok(ExitCode::FAILURE);
    };

    writeln!(out, "\nInfo for event with id={}", created.id)?;
    match store.fetch(&created.id).await {
        Ok(event) => render_event(&mut out, &event)?,
        Err(e) => writeln!(out, "fetch failed: {e}")?,
    }

    writeln!(out, "\nUpdating event with id={}", created.id)?;
    let renamed = format!("{DEMO_NAME} (updated)");
    store.begin_edit(created);
    store.set_edit_name(renamed.as_str());
    store.save_edit().await;
    render_state(&mut out, &store.snapshot())?;

    info!("demo finished");
    Ok(exit_code(store))
}

fn newest_named(events: &[Event], name: &str) -> Option<Event> {
    events.iter().rev().find(|e| e.name == name).cloned()
}

fn finish(store: &EventStore) -> anyhow::Result<ExitCode> {
    render_state(&mut std::io::stdout().lock(), &store.snapshot())?;
    Ok(exit_code(store))
}

fn skipped_or_finish(
    store: &EventStore,
    outcome: Outcome,
    reason: &str,
) -> anyhow::Result<ExitCode> {
    if outcome == Outcome::Skipped {
        eprintln!("nothing sent: {reason}");
        return Ok(ExitCode::FAILURE);
    }
    finish(store)
}

fn exit_code(store: &EventStore) -> ExitCode {
    if store.snapshot().last_error.is_set() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use eventdesk_client::{CallKind, MockCall, MockEventApi};

    fn store_with(events: Vec<Event>) -> (Arc<MockEventApi>, EventStore) {
        let api = Arc::new(MockEventApi::with_events(events));
        (api.clone(), EventStore::new(api))
    }

    #[test]
    fn newest_named_prefers_last_match() {
        let events = vec![
            Event::new(1, DEMO_NAME),
            Event::new(2, "Other"),
            Event::new(3, DEMO_NAME),
        ];
        assert_eq!(newest_named(&events, DEMO_NAME).map(|e| e.id), Some(EventId::from(3)));
        assert!(newest_named(&events, "Missing").is_none());
    }

    #[tokio::test]
    async fn rename_uses_listed_event() {
        let (api, store) = store_with(vec![Event::new(3, "Old")]);
        let outcome = rename(&store, "3", "New".into()).await.unwrap();
        assert_eq!(outcome, Outcome::Applied);
        assert_eq!(api.server_events(), vec![Event::new(3, "New")]);
        assert_eq!(api.count(CallKind::Get), 0);
    }

    #[tokio::test]
    async fn rename_falls_back_to_fetch() {
        let (api, store) = store_with(vec![Event::new(3, "Old")]);
        api.script_list(serde_json::json!([]));
        let outcome = rename(&store, "3", "New".into()).await.unwrap();
        assert_eq!(outcome, Outcome::Applied);
        assert!(api.calls().contains(&MockCall::Get(EventId::raw("3"))));
    }

    #[tokio::test]
    async fn delete_sends_unlisted_id_verbatim() {
        let (api, store) = store_with(vec![Event::new(7, "Seven"), Event::new("007", "Bond")]);
        run(Command::Delete { id: "007".into() }, &store).await.unwrap();
        assert!(!store.snapshot().last_error.is_set());
        assert_eq!(api.calls()[0], MockCall::Delete(EventId::raw("007")));
        assert_eq!(api.server_events(), vec![Event::new(7, "Seven")]);
    }

    #[tokio::test]
    async fn rename_unknown_id_is_skipped() {
        let (api, store) = store_with(Vec::new());
        let outcome = rename(&store, "99", "New".into()).await.unwrap();
        assert_eq!(outcome, Outcome::Skipped);
        assert_eq!(api.count(CallKind::Update), 0);
    }
}
