mod dispatcher;
mod hooks;
mod request;

pub use dispatcher::{DEFAULT_USER_AGENT, RequestDispatcher};
pub use hooks::{BeforeSend, OnError, Outcome};
pub use request::{ApiResponse, PendingRequest};
