//! Structured logging setup for sailsource
//!
//! Logs always go to stderr: stdout is reserved for tool output so it can be
//! piped or parsed as JSON/YAML.
//!
//! # Example
//!
//! ```no_run
//! use sailsource::util::logging;
//! use tracing::{debug, info};
//!
//! logging::init_from_env();
//!
//! info!("Cache preloaded");
//! debug!(app = "cases", objects = 412, "Merged package");
//! ```

use std::env;
use std::io;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// HTTP stack crates that are capped at `warn` unless `RUST_LOG` says otherwise
const NOISY_TARGETS: &[&str] = &["h2", "hyper", "hyper_util", "reqwest", "rustls"];

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum level for sailsource's own events
    pub level: Level,

    /// Emit one JSON object per event
    pub use_json: bool,

    pub include_target: bool,

    /// Include file and line number
    pub include_location: bool,

    pub include_thread_ids: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: false,
            include_location: false,
            include_thread_ids: false,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }
}

/// Accepted log level names, lowest to highest severity
pub const LEVEL_NAMES: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Looks up a level name from [`LEVEL_NAMES`], case-insensitively.
pub fn level_from_name(name: &str) -> Option<Level> {
    match name.trim().to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

/// Parses a log level name. Unknown names fall back to `INFO` with a note on
/// stderr.
pub fn parse_level(level_str: &str) -> Level {
    level_from_name(level_str).unwrap_or_else(|| {
        eprintln!(
            "Invalid log level '{}', defaulting to INFO. Valid levels: {}",
            level_str,
            LEVEL_NAMES.join(", ")
        );
        Level::INFO
    })
}

fn build_filter(level: Level) -> EnvFilter {
    let mut directives = vec![format!("sailsource={}", level)];

    if env::var("RUST_LOG").is_err() {
        directives.extend(NOISY_TARGETS.iter().map(|target| format!("{}=warn", target)));
    }

    directives
        .iter()
        .filter_map(|directive| directive.parse().ok())
        .fold(EnvFilter::from_default_env(), |filter, directive| {
            filter.add_directive(directive)
        })
}

/// Installs the global subscriber. Only the first call has any effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = build_filter(config.level);

        let layer = fmt::layer()
            .with_writer(io::stderr)
            .with_target(config.include_target)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_thread_ids(config.include_thread_ids)
            .with_thread_names(config.include_thread_ids);

        let registry = tracing_subscriber::registry().with(filter);
        let result = if config.use_json {
            registry.with(layer.json()).try_init()
        } else {
            registry.with(layer).try_init()
        };

        if let Err(e) = result {
            eprintln!("Logging already initialized: {}", e);
        }
    });
}

/// Reads `SAILSOURCE_LOG_LEVEL` and `SAILSOURCE_LOG_JSON`, then initializes.
pub fn init_from_env() {
    let level_str = env::var("SAILSOURCE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    init_logging(LoggingConfig {
        level: parse_level(&level_str),
        use_json: json_from_env(),
        ..Default::default()
    });
}

/// Initializes at `level_str`, honoring `SAILSOURCE_LOG_JSON`.
pub fn with_level(level_str: &str) {
    init_logging(LoggingConfig {
        level: parse_level(level_str),
        use_json: json_from_env(),
        ..Default::default()
    });
}

fn json_from_env() -> bool {
    env::var("SAILSOURCE_LOG_JSON")
        .ok()
        .and_then(|v| v.parse::<bool>().ok())
        .unwrap_or(false)
}
