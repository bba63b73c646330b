pub mod filter;
pub mod state;
pub mod store;

pub use filter::filter_by_name;
pub use state::{Action, AppState, EditSession, LastError, Operation};
pub use store::{EventStore, Outcome};
