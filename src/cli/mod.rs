pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{CliArgs, Commands, OutputFormatArg};
pub use handlers::Session;
pub use output::{LoadReport, OutputFormat, OutputFormatter};
