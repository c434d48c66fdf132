//! Output formatting for tool responses
//!
//! The human format is the plain-text response of each tool. JSON and YAML
//! carry the same information as structured data.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::object::{DesignObject, ObjectType};
use crate::store::Lookup;

/// Search results shown in the human format before truncating
pub const MAX_SEARCH_LINES: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    Human,
}

/// Result of a `load` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum LoadReport {
    LocalZip { path: String, objects: usize },
    Application {
        app_uuid: String,
        app_name: String,
        objects: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub object_type: ObjectType,
    pub uuid: String,
    pub app: String,
    pub has_definition: bool,
}

impl From<&DesignObject> for ObjectSummary {
    fn from(object: &DesignObject) -> Self {
        Self {
            name: object.name.clone(),
            object_type: object.object_type,
            uuid: object.uuid.clone(),
            app: object.app.clone(),
            has_definition: object.has_definition(),
        }
    }
}

#[derive(Serialize)]
struct Listing<'a> {
    query: Option<&'a str>,
    count: usize,
    objects: Vec<ObjectSummary>,
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum LookupReport<'a> {
    Found { object: &'a DesignObject },
    Ambiguous { query: &'a str, matches: &'a [String] },
    NotFound { query: &'a str },
}

#[derive(Serialize)]
struct ComponentUsage<'a> {
    component: &'a str,
    count: usize,
    interfaces: &'a [String],
}

#[derive(Serialize)]
struct Checklist<'a> {
    source: &'a str,
    text: &'a str,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_load(&self, report: &LoadReport) -> Result<String> {
        self.render(report, || match report {
            LoadReport::LocalZip { path, objects } => {
                format!("Loaded {} objects from local ZIP: {}", objects, path)
            }
            LoadReport::Application {
                app_uuid,
                app_name,
                objects,
            } => format!(
                "Loaded {} objects from application '{}' ({}).",
                objects, app_name, app_uuid
            ),
        })
    }

    pub fn format_list(&self, objects: &[DesignObject]) -> Result<String> {
        let listing = Listing {
            query: None,
            count: objects.len(),
            objects: objects.iter().map(ObjectSummary::from).collect(),
        };
        self.render(&listing, || {
            if objects.is_empty() {
                return "No objects found matching criteria.".to_string();
            }
            let mut lines = vec![format!("Found {} objects:\n", objects.len())];
            lines.extend(objects.iter().map(|object| {
                format!(
                    "  [{}] {} (SAIL: {})",
                    object.object_type,
                    object.name,
                    if object.has_definition() { "yes" } else { "no" }
                )
            }));
            lines.join("\n")
        })
    }

    pub fn format_lookup(&self, query: &str, lookup: &Lookup) -> Result<String> {
        let report = match lookup {
            Lookup::Found(object) => LookupReport::Found { object },
            Lookup::Ambiguous(matches) => LookupReport::Ambiguous { query, matches },
            Lookup::NotFound => LookupReport::NotFound { query },
        };
        self.render(&report, || match lookup {
            Lookup::Found(object) if !object.has_definition() => format!(
                "Object '{}' found ({}) but has no SAIL definition.",
                object.name, object.object_type
            ),
            Lookup::Found(object) => format!(
                "# {} ({})\n# UUID: {}\n# App: {}\n\n{}",
                object.name, object.object_type, object.uuid, object.app, object.definition
            ),
            Lookup::Ambiguous(names) => {
                format!("Multiple matches found. Be more specific:\n{}", names.join("\n"))
            }
            Lookup::NotFound => format!("Object '{}' not found.", query),
        })
    }

    pub fn format_search(&self, query: &str, results: &[DesignObject]) -> Result<String> {
        let listing = Listing {
            query: Some(query),
            count: results.len(),
            objects: results.iter().map(ObjectSummary::from).collect(),
        };
        self.render(&listing, || {
            if results.is_empty() {
                return format!("No objects matching '{}'.", query);
            }
            let mut lines = vec![format!(
                "Found {} objects matching '{}':\n",
                results.len(),
                query
            )];
            lines.extend(
                results
                    .iter()
                    .take(MAX_SEARCH_LINES)
                    .map(|object| format!("  [{}] {}", object.object_type, object.name)),
            );
            if results.len() > MAX_SEARCH_LINES {
                lines.push(format!(
                    "  ... and {} more",
                    results.len() - MAX_SEARCH_LINES
                ));
            }
            lines.join("\n")
        })
    }

    pub fn format_component_usage(&self, component: &str, interfaces: &[String]) -> Result<String> {
        let usage = ComponentUsage {
            component,
            count: interfaces.len(),
            interfaces,
        };
        self.render(&usage, || {
            if interfaces.is_empty() {
                format!("No interfaces found using '{}'.", component)
            } else {
                format!(
                    "Interfaces using {} ({}):\n{}",
                    component,
                    interfaces.len(),
                    interfaces.join("\n")
                )
            }
        })
    }

    pub fn format_checklist(&self, source: &str, text: &str) -> Result<String> {
        self.render(&Checklist { source, text }, || text.to_string())
    }

    fn render<T: Serialize>(&self, value: &T, human: impl FnOnce() -> String) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(value).context("Failed to serialize output to JSON")
            }
            OutputFormat::Yaml => {
                serde_yaml::to_string(value).context("Failed to serialize output to YAML")
            }
            OutputFormat::Human => Ok(human()),
        }
    }
}
