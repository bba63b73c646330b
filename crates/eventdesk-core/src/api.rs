use async_trait::async_trait;

use crate::errors::ApiError;
use crate::event::{Event, EventDraft};
use crate::ids::EventId;
use crate::payload::ListPayload;

/// The remote events collection.
///
/// Implemented over HTTP by the client crate and in memory for tests.
/// Create and update return the server's echo of the event when it decodes;
/// callers refetch the collection either way.
#[async_trait]
pub trait EventApi: Send + Sync {
    /// Base URL of the collection, for logs and display.
    fn endpoint(&self) -> &str;

    async fn list(&self) -> Result<ListPayload, ApiError>;

    async fn get(&self, id: &EventId) -> Result<Event, ApiError>;

    async fn create(&self, draft: &EventDraft) -> Result<Option<Event>, ApiError>;

    async fn update(&self, id: &EventId, event: &Event) -> Result<Option<Event>, ApiError>;

    async fn delete(&self, id: &EventId) -> Result<(), ApiError>;
}
