use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use eventdesk_core::{ApiError, Event, EventApi, EventDraft, EventId, ListPayload};

/// A call received by [`MockEventApi`], in arrival order.
#[derive(Clone, Debug, PartialEq)]
pub enum MockCall {
    List,
    Get(EventId),
    Create(EventDraft),
    Update(EventId, Event),
    Delete(EventId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallKind {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl MockCall {
    pub fn kind(&self) -> CallKind {
        match self {
            Self::List => CallKind::List,
            Self::Get(_) => CallKind::Get,
            Self::Create(_) => CallKind::Create,
            Self::Update(..) => CallKind::Update,
            Self::Delete(_) => CallKind::Delete,
        }
    }
}

/// In-memory events collection for deterministic tests without a server.
///
/// By default it behaves like a well-formed server: list returns the stored
/// events as a bare array, create assigns the next numeric id. Tests can queue
/// raw list bodies and per-call failures on top of that.
pub struct MockEventApi {
    events: Mutex<Vec<Event>>,
    next_id: AtomicI64,
    list_script: Mutex<VecDeque<(Option<Duration>, Value)>>,
    failures: Mutex<HashMap<CallKind, VecDeque<ApiError>>>,
    calls: Mutex<Vec<MockCall>>,
}

impl Default for MockEventApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEventApi {
    pub fn new() -> Self {
        Self::with_events(Vec::new())
    }

    /// Seed the server-side collection.
    pub fn with_events(events: Vec<Event>) -> Self {
        let max_id = events
            .iter()
            .filter_map(|e| match &e.id {
                EventId::Number(n) => n.as_i64(),
                EventId::Text(_) => None,
            })
            .max()
            .unwrap_or(0);
        Self {
            events: Mutex::new(events),
            next_id: AtomicI64::new(max_id + 1),
            list_script: Mutex::new(VecDeque::new()),
            failures: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer the next unscripted list call with `body` instead of the stored events.
    pub fn script_list(&self, body: Value) {
        self.list_script.lock().push_back((None, body));
    }

    /// Like [`script_list`](Self::script_list), but the response arrives after `delay`.
    pub fn script_list_after(&self, delay: Duration, body: Value) {
        self.list_script.lock().push_back((Some(delay), body));
    }

    /// Make the next call of `kind` fail with `error`. Queued failures are
    /// consumed one per call.
    pub fn fail_next(&self, kind: CallKind, error: ApiError) {
        self.failures.lock().entry(kind).or_default().push_back(error);
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }

    pub fn count(&self, kind: CallKind) -> usize {
        self.calls.lock().iter().filter(|c| c.kind() == kind).count()
    }

    /// Current server-side collection.
    pub fn server_events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    fn record(&self, call: MockCall) -> Result<(), ApiError> {
        let kind = call.kind();
        self.calls.lock().push(call);
        match self.failures.lock().get_mut(&kind).and_then(VecDeque::pop_front) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// A server only sees the id as a path segment, so match on its text.
fn addressed(event: &Event, id: &EventId) -> bool {
    event.id.to_string() == id.to_string()
}

fn not_found() -> ApiError {
    ApiError::from_status(404, "Event not found".into())
}

#[async_trait]
impl EventApi for MockEventApi {
    fn endpoint(&self) -> &str {
        "mock://events"
    }

    async fn list(&self) -> Result<ListPayload, ApiError> {
        self.record(MockCall::List)?;
        let scripted = self.list_script.lock().pop_front();
        match scripted {
            Some((delay, body)) => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                ListPayload::from_value(body)
            }
            None => Ok(ListPayload::Bare(self.server_events())),
        }
    }

    async fn get(&self, id: &EventId) -> Result<Event, ApiError> {
        self.record(MockCall::Get(id.clone()))?;
        self.events
            .lock()
            .iter()
            .find(|e| addressed(e, id))
            .cloned()
            .ok_or_else(not_found)
    }

    async fn create(&self, draft: &EventDraft) -> Result<Option<Event>, ApiError> {
        self.record(MockCall::Create(draft.clone()))?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let event = Event::new(id, draft.name.clone());
        self.events.lock().push(event.clone());
        Ok(Some(event))
    }

    async fn update(&self, id: &EventId, event: &Event) -> Result<Option<Event>, ApiError> {
        self.record(MockCall::Update(id.clone(), event.clone()))?;
        let mut events = self.events.lock();
        let slot = events.iter_mut().find(|e| addressed(e, id)).ok_or_else(not_found)?;
        *slot = Event {
            id: slot.id.clone(),
            ..event.clone()
        };
        Ok(Some(slot.clone()))
    }

    async fn delete(&self, id: &EventId) -> Result<(), ApiError> {
        self.record(MockCall::Delete(id.clone()))?;
        let mut events = self.events.lock();
        let before = events.len();
        events.retain(|e| !addressed(e, id));
        if events.len() == before {
            return Err(not_found());
        }
        Ok(())
    }
}
