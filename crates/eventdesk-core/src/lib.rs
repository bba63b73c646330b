pub mod api;
pub mod errors;
pub mod event;
pub mod ids;
pub mod payload;
pub mod policy;

pub use api::EventApi;
pub use errors::ApiError;
pub use event::{Event, EventDraft};
pub use ids::EventId;
pub use payload::ListPayload;
pub use policy::ErrorPolicy;
