use tracing_subscriber::EnvFilter;

const QUIET_DEPS: &str = "hyper=warn,hyper_util=warn,reqwest=warn";

/// Level selected by `-v`/`-q`, or `None` when neither was given.
pub fn level_from_flags(verbose: u8, quiet: u8) -> Option<&'static str> {
    let net = i16::from(verbose) - i16::from(quiet);
    match net {
        0 => None,
        i16::MIN..=-2 => Some("error"),
        -1 => Some("warn"),
        1 => Some("debug"),
        2..=i16::MAX => Some("trace"),
    }
}

/// Filter directive: flags win, then `env_value`
/// (`MAPMYRUN_LOG_LEVEL`, falling back to `RUST_LOG`), then `info`.
pub fn log_filter(verbose: u8, quiet: u8, env_value: Option<String>) -> String {
    let base = level_from_flags(verbose, quiet)
        .map(str::to_string)
        .or(env_value)
        .unwrap_or_else(|| "info".to_string());
    format!("{base},{QUIET_DEPS}")
}

pub fn init_logging(verbose: u8, quiet: u8) {
    let env_value = std::env::var("MAPMYRUN_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .ok();
    let filter = log_filter(verbose, quiet, env_value);
    let env_filter = EnvFilter::try_new(&filter)
        .unwrap_or_else(|_| EnvFilter::new(format!("info,{QUIET_DEPS}")));
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter)
        .init();
    tracing::debug!(%filter, "log filter");
}
