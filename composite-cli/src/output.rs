use composite_exec::StringResponse;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn print_result<T: Serialize>(format: OutputFormat, quiet: bool, result: &T) {
    if quiet {
        return;
    }
    match format {
        OutputFormat::Text => {
            if let Ok(json) = serde_json::to_string_pretty(result) {
                println!("{json}");
            }
        }
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string(result) {
                println!("{json}");
            }
        }
    }
}

pub fn print_error(format: OutputFormat, quiet: bool, message: &str) {
    if quiet {
        return;
    }
    match format {
        OutputFormat::Text => eprintln!("error: {message}"),
        OutputFormat::Json => {
            let err = serde_json::json!({"error": message});
            eprintln!("{}", serde_json::to_string(&err).unwrap_or_default());
        }
    }
}

/// Text prints the rendered content as-is; json wraps it with the status.
pub fn print_response(format: OutputFormat, quiet: bool, resp: &StringResponse) {
    if quiet {
        return;
    }
    match format {
        OutputFormat::Text => {
            println!("{}", resp.content);
            if !resp.is_success() {
                eprintln!("error: composite request finished with status {}", resp.status);
            }
        }
        OutputFormat::Json => {
            let out = serde_json::json!({"status": resp.status, "content": resp.content});
            println!("{out}");
        }
    }
}
