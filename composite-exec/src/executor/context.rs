use composite_core::VariableStore;
use uuid::Uuid;

use crate::executor::auth::ForwardedAuthorization;
use crate::executor::response::{ResponseBuilder, StringResponse};

/// Mutable state of exactly one run. Created inside every
/// [`Orchestrator::run`](crate::Orchestrator::run) call and dropped when the
/// response is produced; never stored on the orchestrator.
#[derive(Debug)]
pub struct RunContext {
    pub run_id: Uuid,
    pub variables: VariableStore,
    pub response: ResponseBuilder,
    pub authorization: Option<ForwardedAuthorization>,
}

impl RunContext {
    pub fn new(debug: bool, authorization: Option<ForwardedAuthorization>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            variables: VariableStore::new(),
            response: ResponseBuilder::new(debug),
            authorization,
        }
    }

    pub fn trace(&mut self, line: impl Into<String>) {
        self.response.append_debug_line(line);
    }

    pub fn into_response(self, status: u16) -> StringResponse {
        self.response.into_response(status)
    }
}
