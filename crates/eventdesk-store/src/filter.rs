use eventdesk_core::Event;

/// Events whose name contains `text`, ignoring case, in their original order.
/// Empty text keeps everything.
pub fn filter_by_name<'a>(events: &'a [Event], text: &str) -> Vec<&'a Event> {
    let needle = text.to_lowercase();
    events.iter().filter(|e| e.name_contains(&needle)).collect()
}
