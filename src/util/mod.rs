//! Utility modules for sailsource

pub mod logging;

pub use logging::{init_from_env, init_logging, LoggingConfig};
