use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// How status lines reach the terminal or the scheduler's log collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    pub fn from_flag(json: bool) -> Self {
        if json {
            LogFormat::Json
        } else {
            LogFormat::Compact
        }
    }
}

/// Filter used when `RUST_LOG` is unset. Dependencies stay at `warn` so a
/// verbose run shows our request/parse detail without reqwest's internals.
pub fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "warn,medal_board=debug"
    } else {
        "warn,medal_board=info"
    }
}

fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)))
}

/// Installs the global subscriber. Call once, before the first event.
/// Events go to stderr; stdout is reserved for the dry-run table.
pub fn init_logger(format: LogFormat, verbose: bool) {
    let registry = tracing_subscriber::registry().with(filter(verbose));
    let base = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_thread_ids(false);

    match format {
        LogFormat::Compact => registry.with(base.compact()).init(),
        LogFormat::Json => registry
            .with(base.json().flatten_event(true).with_current_span(false))
            .init(),
    }
}
