use sailsource::cli::handlers::{
    handle_checklist, handle_get, handle_list, handle_load, handle_search, handle_uses, Session,
};
use sailsource::cli::{CliArgs, Commands};
use sailsource::util::logging;
use sailsource::{SailConfig, VERSION};

use clap::Parser;
use tracing::debug;

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    let config = SailConfig::default();
    init_logging_from_args(&args, &config);

    debug!("sailsource v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    debug!("{}", config);

    let session = match Session::new(config) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    session.preload();

    let exit_code = match &args.command {
        Commands::Load(load_args) => handle_load(&session, load_args).await,
        Commands::List(list_args) => handle_list(&session, list_args),
        Commands::Get(get_args) => handle_get(&session, get_args),
        Commands::Search(search_args) => handle_search(&session, search_args),
        Commands::Uses(uses_args) => handle_uses(&session, uses_args),
        Commands::Checklist(checklist_args) => handle_checklist(&session, checklist_args).await,
    };

    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs, config: &SailConfig) {
    let level = if let Some(level) = &args.log_level {
        level.as_str()
    } else if args.verbose {
        "debug"
    } else if args.quiet {
        "error"
    } else {
        config.log_level.as_str()
    };
    logging::with_level(level);
}
