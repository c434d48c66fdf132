//! On-disk cache of exported packages and the accessibility checklist.
//!
//! Layout: `<dir>/<app uuid>.zip` per exported application plus
//! `<dir>/aurora-a11y-checklist.txt`.

use crate::config::{ConfigError, SailConfig};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

const PACKAGE_EXTENSION: &str = "zip";
const CHECKLIST_FILE: &str = "aurora-a11y-checklist.txt";

/// A cached package: file stem plus path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedPackage {
    pub key: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct PackageCache {
    dir: PathBuf,
}

impl PackageCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_config(config: &SailConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.cache_dir()?))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn package_path(&self, app_uuid: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", app_uuid, PACKAGE_EXTENSION))
    }

    pub fn checklist_path(&self) -> PathBuf {
        self.dir.join(CHECKLIST_FILE)
    }

    pub fn has_package(&self, app_uuid: &str) -> bool {
        self.package_path(app_uuid).is_file()
    }

    pub fn write_package(&self, app_uuid: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        let path = self.package_path(app_uuid);
        self.write(&path, bytes)?;
        debug!("Cached package {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }

    pub fn read_checklist(&self) -> io::Result<String> {
        fs::read_to_string(self.checklist_path())
    }

    pub fn write_checklist(&self, text: &str) -> io::Result<()> {
        self.write(&self.checklist_path(), text.as_bytes())
    }

    /// Cached package zips sorted by file name. A missing cache directory
    /// yields an empty list.
    pub fn cached_packages(&self) -> io::Result<Vec<CachedPackage>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut packages = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(PACKAGE_EXTENSION)
            {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                packages.push(CachedPackage {
                    key: stem.to_string(),
                    path: path.clone(),
                });
            }
        }

        packages.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
        Ok(packages)
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(path, bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths() {
        let cache = PackageCache::new("/tmp/sail");
        assert_eq!(cache.package_path("_a-1"), PathBuf::from("/tmp/sail/_a-1.zip"));
        assert_eq!(
            cache.checklist_path(),
            PathBuf::from("/tmp/sail/aurora-a11y-checklist.txt")
        );
    }

    #[test]
    fn test_write_creates_directory() {
        let temp = TempDir::new().unwrap();
        let cache = PackageCache::new(temp.path().join("nested").join("cache"));

        assert!(!cache.has_package("app"));
        cache.write_package("app", b"PK").unwrap();
        assert!(cache.has_package("app"));
        assert_eq!(fs::read(cache.package_path("app")).unwrap(), b"PK");
    }

    #[test]
    fn test_cached_packages_sorted_and_filtered() {
        let temp = TempDir::new().unwrap();
        let cache = PackageCache::new(temp.path());
        cache.write_package("b-app", b"2").unwrap();
        cache.write_package("a-app", b"1").unwrap();
        cache.write_checklist("checklist").unwrap();
        fs::create_dir(temp.path().join("dir.zip")).unwrap();

        let packages = cache.cached_packages().unwrap();
        let keys: Vec<_> = packages.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["a-app", "b-app"]);
    }

    #[test]
    fn test_cached_packages_missing_dir() {
        let temp = TempDir::new().unwrap();
        let cache = PackageCache::new(temp.path().join("absent"));
        assert!(cache.cached_packages().unwrap().is_empty());
    }

    #[test]
    fn test_checklist_round_trip() {
        let temp = TempDir::new().unwrap();
        let cache = PackageCache::new(temp.path());
        assert!(cache.read_checklist().is_err());
        cache.write_checklist("Aurora\n- item").unwrap();
        assert_eq!(cache.read_checklist().unwrap(), "Aurora\n- item");
    }
}
