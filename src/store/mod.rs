//! In-memory design object store.
//!
//! Objects are keyed by name across every loaded package. A package is
//! parsed outside the store and merged in one step, so concurrent loads
//! never observe a half-applied package. Same-named objects from a later
//! merge replace earlier ones.

pub mod query;

use crate::object::{DesignObject, ObjectMap, ObjectType};
use regex::{Regex, RegexBuilder};
use std::collections::BTreeSet;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use tracing::debug;

/// Maximum names reported for an ambiguous lookup
pub const MAX_AMBIGUOUS_MATCHES: usize = 10;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Invalid name pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Outcome of resolving a possibly partial object name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(DesignObject),
    /// Several names contain the query; holds up to [`MAX_AMBIGUOUS_MATCHES`]
    Ambiguous(Vec<String>),
    NotFound,
}

#[derive(Debug, Default)]
struct StoreState {
    objects: ObjectMap,
    loaded: BTreeSet<String>,
}

#[derive(Debug, Default)]
pub struct ObjectStore {
    state: RwLock<StoreState>,
}

impl ObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Merges a parsed package and returns how many objects it carried.
    pub fn merge(&self, batch: ObjectMap) -> usize {
        let count = batch.len();
        let mut state = self.write();
        let before = state.objects.len();
        state.objects.extend(batch);
        debug!(
            merged = count,
            replaced = before + count - state.objects.len(),
            total = state.objects.len(),
            "Merged design objects"
        );
        count
    }

    /// Merges a package and records its key as loaded, atomically.
    pub fn merge_loaded(&self, key: &str, batch: ObjectMap) -> usize {
        let count = batch.len();
        let mut state = self.write();
        state.objects.extend(batch);
        state.loaded.insert(key.to_string());
        count
    }

    pub fn is_loaded(&self, key: &str) -> bool {
        self.read().loaded.contains(key)
    }

    pub fn loaded_keys(&self) -> Vec<String> {
        self.read().loaded.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.read().objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().objects.is_empty()
    }

    pub fn count_for_app(&self, app: &str) -> usize {
        self.read()
            .objects
            .values()
            .filter(|object| object.app == app)
            .count()
    }

    pub fn get(&self, name: &str) -> Option<DesignObject> {
        self.read().objects.get(name).cloned()
    }

    /// Exact name first, then a case-insensitive substring match that must
    /// be unique.
    pub fn resolve(&self, name: &str) -> Lookup {
        let state = self.read();
        if let Some(object) = state.objects.get(name) {
            return Lookup::Found(object.clone());
        }

        let needle = name.to_lowercase();
        let mut matches = state
            .objects
            .iter()
            .filter(|(key, _)| key.to_lowercase().contains(&needle))
            .map(|(_, object)| object);

        match (matches.next(), matches.next()) {
            (None, _) => Lookup::NotFound,
            (Some(only), None) => Lookup::Found(only.clone()),
            (Some(first), Some(second)) => {
                let names = [first, second]
                    .into_iter()
                    .chain(matches)
                    .take(MAX_AMBIGUOUS_MATCHES)
                    .map(|object| object.name.clone())
                    .collect();
                Lookup::Ambiguous(names)
            }
        }
    }

    /// Objects filtered by type label and a case-insensitive name regex,
    /// sorted by name.
    pub fn list(
        &self,
        object_type: Option<&str>,
        name_pattern: Option<&str>,
    ) -> Result<Vec<DesignObject>, QueryError> {
        let pattern = name_pattern.map(compile_pattern).transpose()?;

        let state = self.read();
        Ok(state
            .objects
            .values()
            .filter(|object| type_matches(object, object_type))
            .filter(|object| {
                pattern
                    .as_ref()
                    .map_or(true, |re| re.is_match(&object.name))
            })
            .cloned()
            .collect())
    }

    /// Objects whose name, description or definition contains the query,
    /// sorted by name.
    pub fn search(&self, text: &str, object_type: Option<&str>) -> Vec<DesignObject> {
        let terms = query::search_terms(text);
        self.read()
            .objects
            .values()
            .filter(|object| type_matches(object, object_type))
            .filter(|object| {
                let searchable = format!(
                    "{} {} {}",
                    object.name, object.description, object.definition
                )
                .to_lowercase();
                query::matches_any(&searchable, &terms)
            })
            .cloned()
            .collect()
    }

    /// Names of interfaces whose definition references `component`, sorted.
    pub fn interfaces_using_component(&self, component: &str) -> Vec<String> {
        let terms = query::component_terms(component);
        self.read()
            .objects
            .values()
            .filter(|object| object.object_type == ObjectType::Interface)
            .filter(|object| query::matches_any(&object.definition.to_lowercase(), &terms))
            .map(|object| object.name.clone())
            .collect()
    }
}

fn compile_pattern(pattern: &str) -> Result<Regex, QueryError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| QueryError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

fn type_matches(object: &DesignObject, object_type: Option<&str>) -> bool {
    match object_type {
        Some(filter) if !filter.is_empty() => object.object_type.matches_label(filter),
        _ => true,
    }
}
