pub mod auth;
pub mod binding;
mod context;
pub mod events;
pub mod extract;
pub mod http;
mod orchestrator;
mod request;
pub mod response;
mod result;
mod types;
mod worker;

pub use auth::ForwardedAuthorization;
pub use binding::{appends_to_existing, bind_matches, BindOutcome};
pub use context::RunContext;
pub use events::{
    CompositeEventSink, Event, EventSink, LogEventSink, NoOpEventSink, StdoutEventSink,
};
pub use extract::{select, select_text, ExtractError};
pub use http::{HttpClient, HttpError, HttpRequestParts, HttpResponseParts, ReqwestHttpClient};
pub use orchestrator::Orchestrator;
pub use response::{ResponseBuilder, StringResponse};
pub use result::StepError;
pub use types::ExecutorConfig;
