//! Package loading into the shared object store.
//!
//! Packages come from three places: the on-disk cache, a local zip named by
//! the user, or a live export through a [`PackageExporter`]. Every source
//! ends the same way: parse the whole package, then merge it into the store
//! and record its key in one step.

use crate::cache::PackageCache;
use crate::deployment::{DeploymentError, PackageExporter};
use crate::haul::{parse_package, HaulError};
use crate::object::ObjectMap;
use crate::store::ObjectStore;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

const LOCAL_KEY_PREFIX: &str = "local:";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("ZIP not found: {}", .path.display())]
    PackageNotFound { path: PathBuf },

    #[error("Package from {origin} is empty")]
    EmptyPackage { origin: String },

    #[error("Set APPIAN_URL and APPIAN_API_KEY env vars for live export.")]
    MissingCredentials,

    #[error("Provide an application UUID or set APPIAN_APP_UUID env var.")]
    MissingAppUuid,

    #[error("Failed to parse package from {origin}: {source}")]
    Haul {
        origin: String,
        #[source]
        source: HaulError,
    },

    #[error(transparent)]
    Deployment(#[from] DeploymentError),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub struct PackageLoader {
    store: Arc<ObjectStore>,
    cache: PackageCache,
    exporter: Option<Arc<dyn PackageExporter>>,
}

impl PackageLoader {
    pub fn new(store: Arc<ObjectStore>, cache: PackageCache) -> Self {
        Self {
            store,
            cache,
            exporter: None,
        }
    }

    pub fn with_exporter(mut self, exporter: Arc<dyn PackageExporter>) -> Self {
        self.exporter = Some(exporter);
        self
    }

    pub fn store(&self) -> &Arc<ObjectStore> {
        &self.store
    }

    pub fn cache(&self) -> &PackageCache {
        &self.cache
    }

    pub fn has_exporter(&self) -> bool {
        self.exporter.is_some()
    }

    /// Loads every cached package not already in the store, using the file
    /// stem as both app name and key. Unreadable or corrupt packages are
    /// skipped. Returns the number of packages loaded.
    pub fn load_cached_packages(&self) -> usize {
        let packages = match self.cache.cached_packages() {
            Ok(packages) => packages,
            Err(e) => {
                warn!(
                    "Cannot list package cache {}: {}",
                    self.cache.dir().display(),
                    e
                );
                return 0;
            }
        };

        let mut loaded = 0;
        for package in packages {
            if self.store.is_loaded(&package.key) {
                continue;
            }
            match read_file(&package.path)
                .and_then(|bytes| parse(&bytes, &package.path.display().to_string(), &package.key))
            {
                Ok(objects) => {
                    let count = self.store.merge_loaded(&package.key, objects);
                    debug!("Loaded {} objects from cached {}", count, package.key);
                    loaded += 1;
                }
                Err(e) => warn!("Skipping cached package {}: {}", package.path.display(), e),
            }
        }

        if loaded > 0 {
            info!(
                "Preloaded {} cached packages ({} objects)",
                loaded,
                self.store.len()
            );
        }
        loaded
    }

    /// Loads a zip from disk. Returns the number of objects it contained.
    pub fn load_local_zip(&self, path: &str, app_name: &str) -> Result<usize, LoadError> {
        let path = expand_home(path);
        if !path.is_file() {
            return Err(LoadError::PackageNotFound { path });
        }

        let bytes = read_file(&path)?;
        let objects = parse(&bytes, &path.display().to_string(), app_name)?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let count = self
            .store
            .merge_loaded(&format!("{}{}", LOCAL_KEY_PREFIX, file_name), objects);

        info!("Loaded {} objects from local ZIP {}", count, path.display());
        Ok(count)
    }

    /// Makes sure the application is in the store: already loaded, then the
    /// cache, then a live export (which is written back to the cache).
    pub async fn ensure_loaded(&self, app_uuid: &str, app_name: &str) -> Result<(), LoadError> {
        if self.store.is_loaded(app_uuid) {
            debug!("Application {} already loaded", app_uuid);
            return Ok(());
        }

        if self.cache.has_package(app_uuid) {
            let path = self.cache.package_path(app_uuid);
            let bytes = read_file(&path)?;
            let objects = parse(&bytes, &path.display().to_string(), app_name)?;
            let count = self.store.merge_loaded(app_uuid, objects);
            info!("Loaded {} objects for {} from cache", count, app_uuid);
            return Ok(());
        }

        let exporter = self.exporter.as_ref().ok_or(LoadError::MissingCredentials)?;
        let bytes = exporter.export_application(app_uuid).await?;
        let objects = parse(&bytes, &format!("export of {}", app_uuid), app_name)?;

        if let Err(source) = self.cache.write_package(app_uuid, &bytes) {
            return Err(LoadError::Io {
                path: self.cache.package_path(app_uuid),
                source,
            });
        }

        let count = self.store.merge_loaded(app_uuid, objects);
        info!("Loaded {} objects for {} from live export", count, app_uuid);
        Ok(())
    }

    /// Loads an application and returns how many stored objects belong to
    /// `app_name`.
    pub async fn load_application(
        &self,
        app_uuid: &str,
        app_name: &str,
    ) -> Result<usize, LoadError> {
        self.ensure_loaded(app_uuid, app_name).await?;
        Ok(self.store.count_for_app(app_name))
    }
}

/// Picks the explicit UUID, else the configured default.
pub fn resolve_app_uuid(explicit: Option<&str>, default: Option<&str>) -> Result<String, LoadError> {
    [explicit, default]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|uuid| !uuid.is_empty())
        .map(str::to_string)
        .ok_or(LoadError::MissingAppUuid)
}

fn parse(bytes: &[u8], origin: &str, app_name: &str) -> Result<ObjectMap, LoadError> {
    if bytes.is_empty() {
        return Err(LoadError::EmptyPackage {
            origin: origin.to_string(),
        });
    }
    parse_package(bytes, app_name).map_err(|source| LoadError::Haul {
        origin: origin.to_string(),
        source,
    })
}

fn read_file(path: &Path) -> Result<Vec<u8>, LoadError> {
    std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn expand_home(path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => return PathBuf::from(path),
    };
    match dirs::home_dir() {
        Some(home) if rest.is_empty() => home,
        Some(home) => home.join(rest),
        None => PathBuf::from(path),
    }
}
