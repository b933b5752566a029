use std::path::PathBuf;

use clap::Subcommand;

use crate::args::*;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a composite request and print the rendered response.
    Execute {
        path: PathBuf,
        /// Include the step trace in the output regardless of the request's flag.
        #[arg(long)]
        debug: bool,
        /// Where run events go: `none`, or a comma-separated list of `stdout` and `log`.
        #[arg(long, default_value = "log")]
        events: String,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        auth: AuthArgs,
        #[command(flatten)]
        http: HttpArgs,
    },
    /// Check a composite request without sending anything.
    Validate {
        path: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
}
