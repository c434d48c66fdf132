use clap::{Parser, Subcommand, ValueEnum};

/// Design object browser for exported low-code application packages
#[derive(Parser, Debug)]
#[command(
    name = "sailsource",
    about = "Design object browser for exported low-code application packages",
    version,
    author,
    long_about = "sailsource exports application packages through the deployment API (or \
                  reads pre-exported zips), extracts their design objects and lets you list, \
                  read and search SAIL definitions for accessibility audits.\n\n\
                  Every run preloads the package cache and APPIAN_LOCAL_ZIP, if set."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - only log errors"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Export and load an application, or load a local package zip",
        long_about = "Loads an application into the cache and reports how many objects it holds. \
                      Without --local-zip the package is read from the cache or exported live \
                      (requires APPIAN_URL and APPIAN_API_KEY).\n\n\
                      Examples:\n  \
                      sailsource load --app-uuid _a-0001 --app-name Cases\n  \
                      sailsource load --local-zip ~/Downloads/export.zip"
    )]
    Load(LoadArgs),

    #[command(
        about = "List loaded design objects",
        long_about = "Lists loaded objects sorted by name, optionally filtered by type label \
                      and a case-insensitive name regex.\n\n\
                      Examples:\n  \
                      sailsource list --type Interface\n  \
                      sailsource list --name-pattern '^AX_'"
    )]
    List(ListArgs),

    #[command(
        about = "Print the SAIL definition of an object",
        long_about = "Looks the name up exactly, then as a unique case-insensitive substring.\n\n\
                      Examples:\n  \
                      sailsource get AX_CaseSummary"
    )]
    Get(GetArgs),

    #[command(
        about = "Search names, descriptions and definitions",
        long_about = "Case-insensitive substring search. SAIL function names such as \
                      a!gridField also match their exported internal names.\n\n\
                      Examples:\n  \
                      sailsource search a!gridField --type Interface"
    )]
    Search(SearchArgs),

    #[command(
        about = "Find interfaces that use a SAIL component",
        long_about = "Accepts either the SAIL name (a!gridField) or the exported internal \
                      name (SYSTEM_SYSRULES_gridField_v2).\n\n\
                      Examples:\n  \
                      sailsource uses a!gridField"
    )]
    Uses(UsesArgs),

    #[command(about = "Fetch the Aurora accessibility checklist")]
    Checklist(ChecklistArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct LoadArgs {
    #[arg(long, value_name = "UUID", help = "Application UUID (defaults to APPIAN_APP_UUID)")]
    pub app_uuid: Option<String>,

    #[arg(
        long,
        value_name = "NAME",
        help = "Application name recorded on each object (defaults to APPIAN_APP_NAME)"
    )]
    pub app_name: Option<String>,

    #[arg(long, value_name = "FILE", help = "Load a pre-exported package zip instead")]
    pub local_zip: Option<String>,

    #[arg(short = 'f', long, value_enum, default_value = "human", help = "Output format")]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct ListArgs {
    #[arg(
        short = 't',
        long = "type",
        value_name = "TYPE",
        help = "Only objects of this type (e.g. Interface, \"Expression Rule\")"
    )]
    pub object_type: Option<String>,

    #[arg(short = 'n', long, value_name = "REGEX", help = "Case-insensitive name regex")]
    pub name_pattern: Option<String>,

    #[arg(short = 'f', long, value_enum, default_value = "human", help = "Output format")]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct GetArgs {
    #[arg(value_name = "NAME", help = "Object name or a unique part of it")]
    pub name: String,

    #[arg(short = 'f', long, value_enum, default_value = "human", help = "Output format")]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    #[arg(value_name = "QUERY", help = "Text to look for")]
    pub query: String,

    #[arg(short = 't', long = "type", value_name = "TYPE", help = "Only objects of this type")]
    pub object_type: Option<String>,

    #[arg(short = 'f', long, value_enum, default_value = "human", help = "Output format")]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct UsesArgs {
    #[arg(value_name = "COMPONENT", help = "SAIL component, e.g. a!gridField")]
    pub component: String,

    #[arg(short = 'f', long, value_enum, default_value = "human", help = "Output format")]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct ChecklistArgs {
    #[arg(short = 'f', long, value_enum, default_value = "human", help = "Output format")]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_args_verify() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_load_defaults() {
        let args = CliArgs::parse_from(["sailsource", "load"]);
        match args.command {
            Commands::Load(load) => {
                assert!(load.app_uuid.is_none());
                assert!(load.app_name.is_none());
                assert!(load.local_zip.is_none());
                assert_eq!(load.format, OutputFormatArg::Human);
            }
            other => panic!("Expected Load command, got {:?}", other),
        }
    }

    #[test]
    fn test_load_local_zip() {
        let args = CliArgs::parse_from([
            "sailsource",
            "load",
            "--local-zip",
            "~/export.zip",
            "--app-name",
            "Cases",
        ]);
        match args.command {
            Commands::Load(load) => {
                assert_eq!(load.local_zip.as_deref(), Some("~/export.zip"));
                assert_eq!(load.app_name.as_deref(), Some("Cases"));
            }
            other => panic!("Expected Load command, got {:?}", other),
        }
    }

    #[test]
    fn test_list_filters() {
        let args = CliArgs::parse_from([
            "sailsource",
            "list",
            "--type",
            "Expression Rule",
            "-n",
            "^AX_",
            "--format",
            "json",
        ]);
        match args.command {
            Commands::List(list) => {
                assert_eq!(list.object_type.as_deref(), Some("Expression Rule"));
                assert_eq!(list.name_pattern.as_deref(), Some("^AX_"));
                assert_eq!(list.format, OutputFormatArg::Json);
            }
            other => panic!("Expected List command, got {:?}", other),
        }
    }

    #[test]
    fn test_get_requires_name() {
        assert!(CliArgs::try_parse_from(["sailsource", "get"]).is_err());

        let args = CliArgs::parse_from(["sailsource", "get", "AX_Form"]);
        assert!(matches!(args.command, Commands::Get(get) if get.name == "AX_Form"));
    }

    #[test]
    fn test_search_with_type() {
        let args = CliArgs::parse_from(["sailsource", "search", "a!gridField", "-t", "Interface"]);
        match args.command {
            Commands::Search(search) => {
                assert_eq!(search.query, "a!gridField");
                assert_eq!(search.object_type.as_deref(), Some("Interface"));
            }
            other => panic!("Expected Search command, got {:?}", other),
        }
    }

    #[test]
    fn test_global_flags() {
        let args = CliArgs::parse_from(["sailsource", "uses", "a!gridField", "-v"]);
        assert!(args.verbose);
        assert!(!args.quiet);

        let args = CliArgs::parse_from(["sailsource", "--log-level", "trace", "checklist"]);
        assert_eq!(args.log_level.as_deref(), Some("trace"));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(CliArgs::try_parse_from(["sailsource", "-v", "-q", "checklist"]).is_err());
    }

    #[test]
    fn test_invalid_format() {
        assert!(CliArgs::try_parse_from(["sailsource", "list", "--format", "xml"]).is_err());
    }
}
