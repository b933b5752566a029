use composite_core::{is_token_name, render, ApiRequest, VariableValue};

use crate::executor::binding::{bind_matches, BindOutcome};
use crate::executor::context::RunContext;
use crate::executor::events::{Event, EventSink};
use crate::executor::extract::select_text;
use crate::executor::http::HttpClient;
use crate::executor::request::{build_request, parameter_scope};
use crate::executor::result::StepError;
use crate::executor::types::ExecutorConfig;

pub(crate) struct Worker<'a> {
    pub http: &'a dyn HttpClient,
    pub event_sink: &'a dyn EventSink,
    pub config: &'a ExecutorConfig,
}

impl Worker<'_> {
    /// Runs one step, once or once per element of its bound `foreach` variable.
    pub async fn execute_step(
        &self,
        ctx: &mut RunContext,
        index: usize,
        step: &ApiRequest,
    ) -> Result<(), StepError> {
        if is_blank(step.method.as_deref()) {
            return Err(StepError::Validation {
                index,
                message: "method is required".to_string(),
            });
        }
        if is_blank(step.endpoint.as_deref()) {
            return Err(StepError::Validation {
                index,
                message: "endpoint is required".to_string(),
            });
        }

        // Returned names must be usable as `{name}` tokens.
        if let Some(r) = step.returns().iter().find(|r| !is_token_name(&r.variable)) {
            return Err(StepError::Validation {
                index,
                message: format!("returns variable '{}' is not a valid name", r.variable),
            });
        }

        // Only a variable bound by an earlier step drives iteration.
        let iteration = step
            .foreach_variable()
            .and_then(|name| ctx.variables.get(name).cloned().map(|v| (name, v)));

        let Some((name, original)) = iteration else {
            return self.execute_once(ctx, index, step).await;
        };

        let elements = original.elements();
        ctx.trace(format!(
            "[{index}] foreach {name}: {} element(s)",
            elements.len()
        ));

        let mut result = Ok(());
        for element in elements {
            ctx.variables.bind(name, VariableValue::Scalar(element));
            result = self.execute_once(ctx, index, step).await;
            if result.is_err() {
                break;
            }
        }
        ctx.variables.bind(name, original);
        result
    }

    async fn execute_once(
        &self,
        ctx: &mut RunContext,
        index: usize,
        step: &ApiRequest,
    ) -> Result<(), StepError> {
        let params = parameter_scope(step, &ctx.variables);
        let req = build_request(index, step, ctx, &params)?;
        let method = req.method.clone();
        let url = req.url.to_string();

        log::debug!("run {}: request {index} {method} {url}", ctx.run_id);
        ctx.trace(format!("[{index}] {method} {url}"));
        self.event_sink
            .emit(Event::CallStarted {
                run_id: ctx.run_id,
                index,
                method: method.clone(),
                url: url.clone(),
            })
            .await;

        let resp = self
            .http
            .send(req, self.config.request_timeout, self.config.max_response_bytes)
            .await
            .map_err(|e| StepError::Unhandled {
                index,
                message: format!("{method} {url} failed: {e}"),
            })?;

        ctx.trace(format!("[{index}] {method} {url} -> {}", resp.status));
        self.event_sink
            .emit(Event::CallFinished {
                run_id: ctx.run_id,
                index,
                status: resp.status,
            })
            .await;

        if !resp.is_success() {
            return Err(StepError::Downstream {
                index,
                method,
                url,
                status: resp.status,
            });
        }

        if step.returns().is_empty() {
            return Ok(());
        }

        let document = resp.body_json().map_err(|e| StepError::Unhandled {
            index,
            message: format!("response body of {method} {url} is not JSON: {e}"),
        })?;

        for r in step.returns() {
            let expression = render(&r.expression, &[&ctx.variables, &params]);
            let matches = select_text(&document, &expression).map_err(|e| StepError::Extraction {
                index,
                variable: r.variable.clone(),
                expression: expression.clone(),
                message: e.to_string(),
            })?;

            match bind_matches(&mut ctx.variables, step, &r.variable, matches) {
                BindOutcome::Skipped => {
                    ctx.trace(format!("[{index}] {}: no match for {expression}", r.variable));
                    continue;
                }
                BindOutcome::Appended => {
                    let wire = wire_of(ctx, &r.variable);
                    ctx.trace(format!("[{index}] {} += {wire}", r.variable));
                }
                BindOutcome::Bound => {
                    let wire = wire_of(ctx, &r.variable);
                    ctx.trace(format!("[{index}] {} = {wire}", r.variable));
                }
                BindOutcome::BoundList(n) => {
                    let wire = wire_of(ctx, &r.variable);
                    ctx.trace(format!("[{index}] {} = {wire} ({n} matches)", r.variable));
                }
            }
            self.event_sink
                .emit(Event::VariableBound {
                    run_id: ctx.run_id,
                    index,
                    name: r.variable.clone(),
                })
                .await;
        }

        Ok(())
    }
}

fn wire_of(ctx: &RunContext, name: &str) -> String {
    ctx.variables
        .get(name)
        .map(VariableValue::to_wire)
        .unwrap_or_default()
}

fn is_blank(s: Option<&str>) -> bool {
    s.map_or(true, |s| s.trim().is_empty())
}
