use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, error, info, instrument, warn};

use eventdesk_core::{ApiError, ErrorPolicy, Event, EventApi, EventId, ListPayload};

use crate::state::{Action, AppState, Operation};

/// How an operation ended. Failures have already been logged and recorded
/// in the last-error banner by the time this is returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Failed,
    /// Nothing was sent: blank draft, or no edit session open.
    Skipped,
}

impl Outcome {
    pub fn is_applied(self) -> bool {
        self == Self::Applied
    }
}

/// Controller that mirrors the remote collection into [`AppState`].
///
/// Cloning yields another handle to the same state. The state lock is never
/// held across a remote call, so overlapping operations each run to
/// completion and whichever list response lands last is what stays visible.
/// The loading flag stays up until every overlapping list has finished.
#[derive(Clone)]
pub struct EventStore {
    api: Arc<dyn EventApi>,
    state: Arc<Mutex<AppState>>,
}

impl EventStore {
    pub fn new(api: Arc<dyn EventApi>) -> Self {
        Self::with_policy(api, ErrorPolicy::default())
    }

    pub fn with_policy(api: Arc<dyn EventApi>, policy: ErrorPolicy) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(AppState::new(policy))),
        }
    }

    pub fn endpoint(&self) -> &str {
        self.api.endpoint()
    }

    pub fn snapshot(&self) -> AppState {
        self.state.lock().clone()
    }

    pub fn dispatch(&self, action: Action) {
        self.state.lock().apply(action);
    }

    pub fn set_draft_name(&self, name: impl Into<String>) {
        self.dispatch(Action::DraftNameChanged(name.into()));
    }

    pub fn set_filter(&self, text: impl Into<String>) {
        self.dispatch(Action::FilterChanged(text.into()));
    }

    pub fn begin_edit(&self, event: Event) {
        self.dispatch(Action::EditStarted(event));
    }

    pub fn set_edit_name(&self, name: impl Into<String>) {
        self.dispatch(Action::EditNameChanged(name.into()));
    }

    pub fn cancel_edit(&self) {
        self.dispatch(Action::EditCancelled);
    }

    /// Filtered view of the local snapshot.
    pub fn visible_events(&self) -> Vec<Event> {
        let state = self.state.lock();
        state.visible_events().into_iter().cloned().collect()
    }

    /// Look up an event in the local snapshot by the textual form of its id.
    pub fn find_local(&self, raw_id: &str) -> Option<Event> {
        let state = self.state.lock();
        state.events.iter().find(|e| e.id.matches(raw_id)).cloned()
    }

    /// Turn a typed id into the one to send. A listed event supplies its own
    /// id in the form the server sent it; anything else goes out verbatim.
    pub fn resolve_id(&self, raw_id: &str) -> EventId {
        self.find_local(raw_id)
            .map(|e| e.id)
            .unwrap_or_else(|| EventId::raw(raw_id))
    }

    /// Replace the local collection with the remote one.
    #[instrument(skip(self), fields(endpoint = %self.api.endpoint()))]
    pub async fn list(&self) -> Outcome {
        self.dispatch(Action::ListStarted);
        match self.api.list().await {
            Ok(payload) => {
                if let ListPayload::Unrecognized(shape) = &payload {
                    warn!(%shape, "list response is not an event array, showing no events");
                }
                let events = payload.into_events();
                debug!(count = events.len(), "events loaded");
                self.dispatch(Action::ListLoaded(events));
                Outcome::Applied
            }
            Err(e) => {
                report(Operation::List, &e);
                self.dispatch(Action::ListFailed);
                Outcome::Failed
            }
        }
    }

    /// Resync after a successful write.
    pub async fn reconcile(&self) -> Outcome {
        debug!("refetching collection after write");
        self.list().await
    }

    /// Submit the draft.
    #[instrument(skip(self))]
    pub async fn create(&self) -> Outcome {
        let draft = self.state.lock().draft.clone();
        if draft.is_blank() {
            warn!("not creating an event with a blank name");
            return Outcome::Skipped;
        }

        match self.api.create(&draft).await {
            Ok(echo) => {
                info!(
                    name = %draft.name,
                    id = ?echo.map(|e| e.id.to_string()),
                    "event created"
                );
                self.dispatch(Action::CreateSucceeded);
                self.reconcile().await;
                Outcome::Applied
            }
            Err(e) => {
                report(Operation::Create, &e);
                self.dispatch(Action::CreateFailed);
                Outcome::Failed
            }
        }
    }

    /// Send the whole edit buffer back to the server.
    #[instrument(skip(self))]
    pub async fn save_edit(&self) -> Outcome {
        let buffer = self.state.lock().edit.buffer().cloned();
        let Some(buffer) = buffer else {
            warn!("save requested with no edit session open");
            return Outcome::Skipped;
        };

        match self.api.update(&buffer.id, &buffer).await {
            Ok(_) => {
                info!(id = %buffer.id, name = %buffer.name, "event updated");
                self.dispatch(Action::UpdateSucceeded);
                self.reconcile().await;
                Outcome::Applied
            }
            Err(e) => {
                report(Operation::Update, &e);
                self.dispatch(Action::UpdateFailed);
                Outcome::Failed
            }
        }
    }

    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete(&self, id: &EventId) -> Outcome {
        match self.api.delete(id).await {
            Ok(()) => {
                info!("event deleted");
                self.dispatch(Action::DeleteSucceeded);
                self.reconcile().await;
                Outcome::Applied
            }
            Err(e) => {
                report(Operation::Delete, &e);
                self.dispatch(Action::DeleteFailed);
                Outcome::Failed
            }
        }
    }

    /// Fetch a single event. Leaves local state untouched.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn fetch(&self, id: &EventId) -> Result<Event, ApiError> {
        let result = self.api.get(id).await;
        if let Err(e) = &result {
            error!(kind = e.error_kind(), error = %e, "could not fetch event");
        }
        result
    }
}

fn report(op: Operation, err: &ApiError) {
    error!(
        op = op.as_str(),
        kind = err.error_kind(),
        error = %err,
        "{}",
        op.failure_message()
    );
}
