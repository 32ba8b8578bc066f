//! Tracing subscriber setup for the binaries

use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Compact logs on stderr. `RUST_LOG` overrides the default filter.
pub fn init_cli_logging(verbose: bool) {
    let default_filter = if verbose { "yatra=debug,info" } else { "yatra=info,warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

/// JSON logs to a daily rolling file, leaving stdout free for the MCP transport
pub fn init_file_logging(log_dir: &Path, file_name: &str) -> anyhow::Result<()> {
    std::fs::create_dir_all(log_dir)?;
    let file_appender = tracing_appender::rolling::daily(log_dir, file_name);

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("info")
            .add_directive("yatra=debug".parse()?)
            .add_directive("reqwest=info".parse()?),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .json(),
        )
        .init();

    Ok(())
}
