use std::io;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Directive used when `RUST_LOG` is unset. HTTP client internals stay at
/// `warn` unless verbose, so the progress line is not buried.
fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "fitroom=debug,info"
    } else {
        "fitroom=info,warn"
    }
}

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Human-readable logs on stderr. Stdout carries progress and results only.
pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(verbose)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// One flat JSON object per event on stderr, for runs whose logs are
/// collected by another process while stdout is still read by a person.
pub fn init_json_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json()
                .flatten_event(true)
                .with_current_span(false),
        )
        .init();
}
