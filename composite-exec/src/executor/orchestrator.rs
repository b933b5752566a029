use std::sync::Arc;

use composite_core::CompositeRequest;

use crate::executor::auth::ForwardedAuthorization;
use crate::executor::context::RunContext;
use crate::executor::events::{Event, EventSink, NoOpEventSink};
use crate::executor::http::HttpClient;
use crate::executor::response::StringResponse;
use crate::executor::result::StepError;
use crate::executor::types::ExecutorConfig;
use crate::executor::worker::Worker;

/// Runs composite requests. Holds only shared, immutable collaborators; all
/// per-run state lives in a [`RunContext`] created by each [`run`](Self::run)
/// call, so one instance may serve concurrent calls.
pub struct Orchestrator {
    config: ExecutorConfig,
    http: Arc<dyn HttpClient>,
    event_sink: Arc<dyn EventSink>,
}

impl Orchestrator {
    pub fn new(
        config: ExecutorConfig,
        http: Arc<dyn HttpClient>,
        event_sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            config,
            http,
            event_sink,
        }
    }

    pub fn with_http(http: Arc<dyn HttpClient>) -> Self {
        Self::new(ExecutorConfig::default(), http, Arc::new(NoOpEventSink))
    }

    /// Executes every step in order and renders the response. `authorization`
    /// is the inbound caller's Authorization header, forwarded to every call.
    pub async fn run(&self, request: &CompositeRequest, authorization: Option<&str>) -> StringResponse {
        let mut ctx = RunContext::new(
            request.debug,
            authorization.and_then(ForwardedAuthorization::parse),
        );
        self.event_sink
            .emit(Event::RunStarted {
                run_id: ctx.run_id,
                steps: request.steps().len(),
            })
            .await;

        let status = match self.run_steps(request, &mut ctx).await {
            Ok(()) => 200,
            Err(err) => {
                self.record_failure(&mut ctx, &err).await;
                err.status()
            }
        };

        // Partial bindings are rendered on failure too.
        ctx.response
            .append_response_object(request.response.as_ref(), &ctx.variables);

        self.event_sink
            .emit(Event::RunFinished {
                run_id: ctx.run_id,
                status,
            })
            .await;
        ctx.into_response(status)
    }

    async fn run_steps(&self, request: &CompositeRequest, ctx: &mut RunContext) -> Result<(), StepError> {
        if !request.has_steps() {
            return Err(StepError::NoRequests);
        }

        let worker = Worker {
            http: self.http.as_ref(),
            event_sink: self.event_sink.as_ref(),
            config: &self.config,
        };

        // Strictly sequential: a step may read anything bound before it.
        for (index, step) in request.steps().iter().enumerate() {
            worker.execute_step(ctx, index, step).await?;
        }
        Ok(())
    }

    async fn record_failure(&self, ctx: &mut RunContext, err: &StepError) {
        if err.is_unhandled() {
            log::error!("run {}: {err}", ctx.run_id);
            ctx.trace(format!("FATAL: {err}"));
        } else {
            log::warn!("run {}: {err}", ctx.run_id);
            ctx.trace(format!("ERROR: {err}"));
        }
        self.event_sink
            .emit(Event::StepFailed {
                run_id: ctx.run_id,
                index: err.index(),
                status: err.status(),
                reason: err.to_string(),
            })
            .await;
    }
}
