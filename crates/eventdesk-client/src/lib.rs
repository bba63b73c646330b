pub mod http;
pub mod mock;

pub use http::{ClientBuildError, HttpApiConfig, HttpEventApi};
pub use mock::{CallKind, MockCall, MockEventApi};
