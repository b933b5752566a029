use std::path::Path;
use std::sync::Arc;

use composite_exec::{HttpClient, Orchestrator, ReqwestHttpClient};

use crate::cmd::config::{build_event_sink, build_executor_config, load_request};
use crate::exit_codes;
use crate::output::{print_error, print_response};
use crate::{AuthArgs, HttpArgs, OutputArgs};

pub async fn execute_cmd(
    path: &Path,
    debug: bool,
    events: &str,
    output: OutputArgs,
    auth: AuthArgs,
    http: HttpArgs,
) -> i32 {
    let mut parsed = match load_request(path, &output) {
        Ok(p) => p,
        Err(code) => return code,
    };
    if debug {
        parsed.request.debug = true;
    }
    log::debug!(
        "executing {} ({} steps, {:?})",
        path.display(),
        parsed.request.steps().len(),
        parsed.format
    );

    let Some(event_sink) = build_event_sink(events) else {
        print_error(
            output.format,
            output.quiet,
            &format!("unknown event sink: {events}"),
        );
        return exit_codes::RUNTIME_ERROR;
    };

    let http_client: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::default());
    let orchestrator = Orchestrator::new(build_executor_config(&http), http_client, event_sink);

    let resp = orchestrator
        .run(&parsed.request, auth.authorization.as_deref())
        .await;

    print_response(output.format, output.quiet, &resp);

    if resp.is_success() {
        exit_codes::SUCCESS
    } else {
        exit_codes::RUN_FAILED
    }
}
