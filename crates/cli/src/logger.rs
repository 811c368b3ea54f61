// Logging setup for the `log` facade, backed by simplelog on stderr.
//
// Level comes from MANNSUM_LOG (off|error|warn|info|debug|trace); default warn.
// The edit command owns the terminal, so it lowers the default to error
// unless MANNSUM_LOG asks for more.

use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

pub const LOG_ENV: &str = "MANNSUM_LOG";

/// Parse a level name; unknown names fall back to `warn`.
pub fn parse_level(value: &str) -> LevelFilter {
    match value.trim().to_ascii_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Warn,
    }
}

/// Level to use when MANNSUM_LOG is `env_value` (None when unset).
pub fn resolve_level(env_value: Option<&str>, quiet_default: bool) -> LevelFilter {
    match env_value {
        Some(value) => parse_level(value),
        None if quiet_default => LevelFilter::Error,
        None => LevelFilter::Warn,
    }
}

/// Install the stderr logger. `quiet_default` is used when MANNSUM_LOG is unset.
pub fn init(quiet_default: bool) {
    let env_value = std::env::var(LOG_ENV).ok();
    let level = resolve_level(env_value.as_deref(), quiet_default);

    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Error)
        .build();

    // A second init (tests) keeps the first logger
    let _ = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Never);
}
