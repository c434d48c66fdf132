//! Design object extraction from exported application packages.
//!
//! A package is a zip archive holding one XML "haul" per platform object,
//! grouped into top-level folders by object kind:
//!
//! - `content/`: a `contentHaul` wrapping a rule, interface, constant,
//!   decision, integration or a container (folder, document, ...)
//! - `processModel/`, `recordType/`: a `processModelHaul` / `recordTypeHaul`
//! - `webApi/`, `connectedSystem/`, `site/`, `dataStore/`: routed by folder
//!   alone
//!
//! Other folders are ignored. The producer is inconsistent about XML
//! namespaces, so every lookup tries the bare name, the producer namespace
//! and finally any namespace.
//!
//! # Example
//!
//! ```no_run
//! use sailsource::haul::parse_package;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("export.zip")?;
//! let objects = parse_package(&bytes, "Case Management")?;
//! for (name, object) in &objects {
//!     println!("[{}] {}", object.object_type, name);
//! }
//! # Ok(())
//! # }
//! ```

mod content;
mod field;
mod generic;
mod tag;
mod walker;

pub use content::parse_content_haul;
pub use field::{field_text, field_text_or_empty};
pub use generic::parse_generic_haul;
pub use tag::{local_name, namespaced_attr, APPIAN_NS};
pub use walker::{entry_folder, parse_entry, parse_package, route, HaulStrategy, PackageFolder};

use std::path::Path;
use thiserror::Error;

/// Package-level parse failures. Problems inside a single XML entry never
/// surface here.
#[derive(Debug, Error)]
pub enum HaulError {
    #[error("Invalid package archive: {0}")]
    Archive(#[source] zip::result::ZipError),

    #[error("Failed to read package entry {path}: {source}")]
    Entry {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// File stem of an entry path, used when an object has no name of its own.
fn entry_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| path.to_string())
}
