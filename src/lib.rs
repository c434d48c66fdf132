//! sailsource - design object extraction for low-code application packages
//!
//! Application packages exported from the platform are zip archives of XML
//! "hauls", one per design object. This library parses those packages into
//! a flat, name-keyed catalogue of [`DesignObject`]s so their SAIL source can
//! be listed, read and searched, typically as input to an accessibility
//! audit.
//!
//! # Example Usage
//!
//! ```no_run
//! use sailsource::{parse_package, ObjectStore};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("export.zip")?;
//! let store = ObjectStore::new();
//! store.merge(parse_package(&bytes, "Case Management")?);
//!
//! for name in store.interfaces_using_component("a!gridField") {
//!     println!("{}", name);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`haul`]: package archive walking and XML extraction
//! - [`store`]: the shared object store and its queries
//! - [`deployment`]: live package export over HTTP
//! - [`loader`]: cache, local zip and export loading into the store
//! - [`checklist`]: the Aurora accessibility checklist
//! - [`cli`]: command line surface

pub mod cache;
pub mod checklist;
pub mod cli;
pub mod config;
pub mod deployment;
pub mod haul;
pub mod loader;
pub mod object;
pub mod store;
pub mod util;

pub use cache::PackageCache;
pub use checklist::{ChecklistError, ChecklistFetcher};
pub use config::{ConfigError, SailConfig};
pub use deployment::{DeploymentClient, DeploymentError, PackageExporter};
pub use haul::{parse_package, HaulError};
pub use loader::{LoadError, PackageLoader};
pub use object::{DesignObject, ObjectMap, ObjectType};
pub use store::{Lookup, ObjectStore, QueryError};
pub use util::{init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_sailsource() {
        assert_eq!(NAME, "sailsource");
    }
}
