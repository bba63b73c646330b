//! Local UI state and its transitions.
//!
//! [`AppState`] only changes through [`AppState::apply`], a pure function of
//! the current state and one [`Action`]. The controller in `store.rs` turns
//! remote call outcomes into actions; rendering reads the state.

use eventdesk_core::{ErrorPolicy, Event, EventDraft};

use crate::filter::filter_by_name;

/// The remote operations that can fail visibly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    List,
    Create,
    Update,
    Delete,
}

impl Operation {
    /// The banner text shown when this operation fails.
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::List => "could not load events",
            Self::Create => "could not add event",
            Self::Update => "could not update event",
            Self::Delete => "could not delete event",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// Single-slot holder for the most recent failure message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LastError(Option<&'static str>);

impl LastError {
    pub fn record(&mut self, op: Operation) {
        self.0 = Some(op.failure_message());
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }

    pub fn message(&self) -> Option<&'static str> {
        self.0
    }

    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }
}

/// The update flow. At most one event is being edited at a time.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum EditSession {
    #[default]
    Idle,
    Editing(Event),
}

impl EditSession {
    pub fn buffer(&self) -> Option<&Event> {
        match self {
            Self::Idle => None,
            Self::Editing(event) => Some(event),
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Editing(_))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    DraftNameChanged(String),
    FilterChanged(String),
    /// Opens a session on a copy of the event, replacing any open one.
    EditStarted(Event),
    EditNameChanged(String),
    EditCancelled,
    ListStarted,
    ListLoaded(Vec<Event>),
    ListFailed,
    CreateSucceeded,
    CreateFailed,
    UpdateSucceeded,
    UpdateFailed,
    DeleteSucceeded,
    DeleteFailed,
}

/// Everything the front-end shows.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppState {
    /// Snapshot of the remote collection as of the last list.
    pub events: Vec<Event>,
    pub draft: EventDraft,
    pub edit: EditSession,
    pub filter: String,
    pub last_error: LastError,
    /// List calls started and not yet answered.
    pub lists_in_flight: usize,
    pub error_policy: ErrorPolicy,
}

impl AppState {
    pub fn new(error_policy: ErrorPolicy) -> Self {
        Self {
            error_policy,
            ..Self::default()
        }
    }

    /// True while any list call is outstanding.
    pub fn is_loading(&self) -> bool {
        self.lists_in_flight > 0
    }

    /// The events the current filter text lets through.
    pub fn visible_events(&self) -> Vec<&Event> {
        filter_by_name(&self.events, &self.filter)
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::DraftNameChanged(name) => self.draft.name = name,
            Action::FilterChanged(text) => self.filter = text,
            Action::EditStarted(event) => self.edit = EditSession::Editing(event),
            Action::EditNameChanged(name) => {
                if let EditSession::Editing(buffer) = &mut self.edit {
                    buffer.name = name;
                }
            }
            Action::EditCancelled => self.edit = EditSession::Idle,
            Action::ListStarted => self.lists_in_flight += 1,
            Action::ListLoaded(events) => {
                self.events = events;
                self.lists_in_flight = self.lists_in_flight.saturating_sub(1);
                self.succeeded();
            }
            Action::ListFailed => {
                self.events.clear();
                self.lists_in_flight = self.lists_in_flight.saturating_sub(1);
                self.failed(Operation::List);
            }
            Action::CreateSucceeded => {
                self.draft = EventDraft::default();
                self.succeeded();
            }
            Action::CreateFailed => self.failed(Operation::Create),
            Action::UpdateSucceeded => {
                self.edit = EditSession::Idle;
                self.succeeded();
            }
            Action::UpdateFailed => self.failed(Operation::Update),
            Action::DeleteSucceeded => self.succeeded(),
            Action::DeleteFailed => self.failed(Operation::Delete),
        }
    }

    fn succeeded(&mut self) {
        if self.error_policy == ErrorPolicy::ClearOnSuccess {
            self.last_error.clear();
        }
    }

    fn failed(&mut self, op: Operation) {
        self.last_error.record(op);
    }
}
