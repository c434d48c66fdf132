//! Package walking and folder dispatch

use super::content::parse_content_haul;
use super::generic::parse_generic_haul;
use super::tag::{element_name, local_name};
use super::HaulError;
use crate::object::{DesignObject, ObjectMap, ObjectType};
use roxmltree::{Document, ParsingOptions};
use std::io::{Cursor, Read};
use tracing::{debug, info};

/// Top-level package folders that carry extractable objects.
///
/// Everything else (groups, application metadata, datatypes, AI skills)
/// is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageFolder {
    Content,
    ProcessModel,
    RecordType,
    WebApi,
    ConnectedSystem,
    Site,
    DataStore,
}

/// How a routed entry is turned into a design object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaulStrategy {
    ContentHaul,
    GenericHaul {
        inner_tag: &'static str,
        object_type: ObjectType,
    },
}

impl PackageFolder {
    pub fn from_segment(segment: &str) -> Option<Self> {
        let folder = match segment {
            "content" => PackageFolder::Content,
            "processModel" => PackageFolder::ProcessModel,
            "recordType" => PackageFolder::RecordType,
            "webApi" => PackageFolder::WebApi,
            "connectedSystem" => PackageFolder::ConnectedSystem,
            "site" => PackageFolder::Site,
            "dataStore" => PackageFolder::DataStore,
            _ => return None,
        };
        Some(folder)
    }

    /// Root tag an entry must have to be parsed, if the folder demands one.
    pub fn required_root(self) -> Option<&'static str> {
        match self {
            PackageFolder::Content => Some("contentHaul"),
            PackageFolder::ProcessModel => Some("processModelHaul"),
            PackageFolder::RecordType => Some("recordTypeHaul"),
            PackageFolder::WebApi
            | PackageFolder::ConnectedSystem
            | PackageFolder::Site
            | PackageFolder::DataStore => None,
        }
    }

    pub fn strategy(self) -> HaulStrategy {
        let (inner_tag, object_type) = match self {
            PackageFolder::Content => return HaulStrategy::ContentHaul,
            PackageFolder::ProcessModel => ("process_model_port", ObjectType::ProcessModel),
            PackageFolder::RecordType => ("recordType", ObjectType::RecordType),
            PackageFolder::WebApi => ("webApi", ObjectType::WebApi),
            PackageFolder::ConnectedSystem => ("connectedSystem", ObjectType::ConnectedSystem),
            PackageFolder::Site => ("site", ObjectType::Site),
            PackageFolder::DataStore => ("dataStore", ObjectType::DataStore),
        };
        HaulStrategy::GenericHaul {
            inner_tag,
            object_type,
        }
    }
}

/// Resolves the strategy for an entry from its folder and root tag.
pub fn route(folder: &str, root_tag: &str) -> Option<HaulStrategy> {
    let folder = PackageFolder::from_segment(folder)?;
    match folder.required_root() {
        Some(required) if required != root_tag => None,
        _ => Some(folder.strategy()),
    }
}

/// First path segment of an entry, empty for entries at the package root.
pub fn entry_folder(path: &str) -> &str {
    path.split_once('/').map(|(folder, _)| folder).unwrap_or("")
}

/// Parses one XML entry. Returns `None` for unparsable XML, unrouted
/// entries and entries that yield no object.
pub fn parse_entry(path: &str, bytes: &[u8], app: &str) -> Option<DesignObject> {
    let decoded = String::from_utf8_lossy(bytes);
    let text: &str = &decoded;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = match Document::parse_with_options(text, options) {
        Ok(doc) => doc,
        Err(e) => {
            debug!(path, error = %e, "Skipping unparsable XML entry");
            return None;
        }
    };

    let root = doc.root_element();
    let root_name = element_name(root);
    let root_tag = local_name(&root_name);

    match route(entry_folder(path), root_tag)? {
        HaulStrategy::ContentHaul => parse_content_haul(root, path, app),
        HaulStrategy::GenericHaul {
            inner_tag,
            object_type,
        } => parse_generic_haul(root, inner_tag, object_type, path, app),
    }
}

/// Extracts every design object from a package archive.
///
/// Entries are processed in archive order; a later object with the same
/// name replaces an earlier one. Malformed XML entries are skipped, but an
/// unreadable archive or entry fails the whole parse.
pub fn parse_package(bytes: &[u8], app: &str) -> Result<ObjectMap, HaulError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(HaulError::Archive)?;

    let mut objects = ObjectMap::new();
    let mut xml_entries = 0usize;
    let mut buffer = Vec::new();

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(HaulError::Archive)?;
        if !entry.name().ends_with(".xml") {
            continue;
        }
        let path = entry.name().to_string();
        xml_entries += 1;

        buffer.clear();
        entry
            .read_to_end(&mut buffer)
            .map_err(|source| HaulError::Entry {
                path: path.clone(),
                source,
            })?;

        if let Some(object) = parse_entry(&path, &buffer, app) {
            objects.insert(object.name.clone(), object);
        }
    }

    info!(
        app,
        entries = archive.len(),
        xml_entries,
        objects = objects.len(),
        "Parsed package"
    );

    Ok(objects)
}
