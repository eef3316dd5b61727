use tracing_subscriber::EnvFilter;

/// Picks the default log level from the number of `-v` flags, `RUST_LOG`
/// takes precedence when set
pub fn level(verbosity: u8, log_http: bool) -> tracing::Level {
    match verbosity {
        0 if log_http => tracing::Level::INFO,
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    }
}

/// Installs the global subscriber, logging to stderr so that stdout only
/// contains command output
pub fn init(verbosity: u8, log_http: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level(verbosity, log_http).as_str()));

    // Fails if a subscriber is already installed, which is fine
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod test {
    use super::level;
    use tracing::Level;

    #[test]
    fn verbosity() {
        assert_eq!(level(0, false), Level::WARN);
        assert_eq!(level(0, true), Level::INFO);
        assert_eq!(level(1, false), Level::INFO);
        assert_eq!(level(2, true), Level::DEBUG);
        assert_eq!(level(9, false), Level::TRACE);
    }
}
