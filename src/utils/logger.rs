use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Directive used when `RUST_LOG` is unset. Verbose mode shows the client's
/// per-request and refresh diagnostics; other crates stay at `info`.
fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "bablo_budget=debug,info"
    } else {
        "bablo_budget=info"
    }
}

fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Human-readable logs. They go to stderr so command output on stdout stays
/// machine-readable.
pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// One JSON object per line on stderr, for scripts and log collectors that
/// track session refreshes and failed requests. The target is kept so
/// records can be told apart by module (client, session store, config).
pub fn init_json_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json()
                .flatten_event(true),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_adds_client_debug() {
        assert_eq!(default_directive(false), "bablo_budget=info");
        assert_eq!(default_directive(true), "bablo_budget=debug,info");
        assert!(default_directive(true).parse::<EnvFilter>().is_ok());
    }
}
