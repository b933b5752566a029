use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use composite_core::{parse_request_str, ParsedRequest, RequestFormat};
use composite_exec::executor::{
    CompositeEventSink, EventSink, LogEventSink, NoOpEventSink, StdoutEventSink,
};
use composite_exec::ExecutorConfig;

use crate::exit_codes;
use crate::output::print_error;
use crate::{HttpArgs, OutputArgs};

/// Reads and parses a composite request file, printing the failure and
/// returning the exit code to use on error.
pub fn load_request(path: &Path, output: &OutputArgs) -> Result<ParsedRequest, i32> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        print_error(
            output.format,
            output.quiet,
            &format!("failed to read {}: {e}", path.display()),
        );
        exit_codes::RUNTIME_ERROR
    })?;

    parse_request_str(&content, RequestFormat::Auto).map_err(|e| {
        print_error(output.format, output.quiet, &e.to_string());
        exit_codes::VALIDATION_FAILED
    })
}

pub fn build_executor_config(http: &HttpArgs) -> ExecutorConfig {
    ExecutorConfig {
        request_timeout: Duration::from_millis(http.timeout),
        max_response_bytes: http.max_response_bytes,
    }
}

/// Builds the sink for a comma-separated list such as `stdout,log`.
/// `None` when any entry is unknown.
pub fn build_event_sink(events: &str) -> Option<Arc<dyn EventSink>> {
    let names: Vec<&str> = events
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "none")
        .collect();
    if names.is_empty() {
        return Some(Arc::new(NoOpEventSink));
    }

    let mut sink = CompositeEventSink::new();
    for name in names {
        let next: Box<dyn EventSink> = match name {
            "stdout" => Box::new(StdoutEventSink),
            "log" => Box::new(LogEventSink),
            _ => return None,
        };
        sink.add(next);
    }
    Some(Arc::new(sink))
}
