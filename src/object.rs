//! Design object records extracted from application packages

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Parse output: design objects keyed by name.
///
/// Ordered keys keep serialized output stable across repeated parses.
pub type ObjectMap = BTreeMap<String, DesignObject>;

/// Kind of design object, serialized as its friendly label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectType {
    #[serde(rename = "Interface")]
    Interface,
    #[serde(rename = "Expression Rule")]
    ExpressionRule,
    #[serde(rename = "Constant")]
    Constant,
    #[serde(rename = "Decision")]
    Decision,
    #[serde(rename = "Integration")]
    Integration,
    #[serde(rename = "Document")]
    Document,
    #[serde(rename = "Folder")]
    Folder,
    #[serde(rename = "Rules Folder")]
    RulesFolder,
    #[serde(rename = "File")]
    File,
    #[serde(rename = "Knowledge Center")]
    KnowledgeCenter,
    #[serde(rename = "Typed Value")]
    TypedValue,
    #[serde(rename = "Process Model")]
    ProcessModel,
    #[serde(rename = "Record Type")]
    RecordType,
    #[serde(rename = "Web API")]
    WebApi,
    #[serde(rename = "Connected System")]
    ConnectedSystem,
    #[serde(rename = "Site")]
    Site,
    #[serde(rename = "Data Store")]
    DataStore,
}

impl ObjectType {
    pub fn label(self) -> &'static str {
        match self {
            ObjectType::Interface => "Interface",
            ObjectType::ExpressionRule => "Expression Rule",
            ObjectType::Constant => "Constant",
            ObjectType::Decision => "Decision",
            ObjectType::Integration => "Integration",
            ObjectType::Document => "Document",
            ObjectType::Folder => "Folder",
            ObjectType::RulesFolder => "Rules Folder",
            ObjectType::File => "File",
            ObjectType::KnowledgeCenter => "Knowledge Center",
            ObjectType::TypedValue => "Typed Value",
            ObjectType::ProcessModel => "Process Model",
            ObjectType::RecordType => "Record Type",
            ObjectType::WebApi => "Web API",
            ObjectType::ConnectedSystem => "Connected System",
            ObjectType::Site => "Site",
            ObjectType::DataStore => "Data Store",
        }
    }

    /// Maps a content haul child tag to its object type.
    ///
    /// Only the eleven content kinds have a tag here; generic haul kinds are
    /// routed by package folder instead.
    pub fn from_content_tag(tag: &str) -> Option<Self> {
        let object_type = match tag {
            "interface" => ObjectType::Interface,
            "rule" => ObjectType::ExpressionRule,
            "constant" => ObjectType::Constant,
            "decision" => ObjectType::Decision,
            "outboundIntegration" => ObjectType::Integration,
            "document" => ObjectType::Document,
            "folder" => ObjectType::Folder,
            "rulesFolder" => ObjectType::RulesFolder,
            "file" => ObjectType::File,
            "communityKnowledgeCenter" => ObjectType::KnowledgeCenter,
            "typedValue" => ObjectType::TypedValue,
            _ => return None,
        };
        Some(object_type)
    }

    /// Container kinds that are dropped when they carry no definition.
    pub fn is_placeholder(self) -> bool {
        matches!(
            self,
            ObjectType::Folder
                | ObjectType::RulesFolder
                | ObjectType::File
                | ObjectType::Document
                | ObjectType::KnowledgeCenter
                | ObjectType::TypedValue
        )
    }

    /// Case-insensitive comparison against a user supplied type filter.
    pub fn matches_label(self, filter: &str) -> bool {
        self.label().eq_ignore_ascii_case(filter)
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A normalized design object.
///
/// Created once per qualifying package entry and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignObject {
    pub name: String,
    pub uuid: String,
    #[serde(rename = "type")]
    pub object_type: ObjectType,
    pub definition: String,
    pub description: String,
    /// Logical application name supplied by the caller
    pub app: String,
    /// Entry path inside the package, kept for provenance
    pub source_path: String,
}

impl DesignObject {
    pub fn has_definition(&self) -> bool {
        !self.definition.is_empty()
    }
}
