use tracing_subscriber::EnvFilter;

/// Default filter for a given `-v` count. `RUST_LOG` takes precedence.
pub fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "warn,firefox_installer=info",
        2 => "info,firefox_installer=debug",
        _ => "debug,firefox_installer=trace",
    }
}

/// Installs the stderr diagnostic subscriber. Calling it twice is a no-op.
pub fn init_logging(verbosity: u8) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(verbosity > 1)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(verbosity, "logging initialized");
    }
}
