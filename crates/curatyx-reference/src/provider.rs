//! Reference table providers.

use std::cmp::Ordering;
use std::collections::HashMap;

use curatyx_common::{CurateError, EntityKind, Result, Table};
use tracing::debug;

/// Identifies one reference table: entity type, species, source, version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferenceKey {
    pub entity: EntityKind,
    pub species: String,
    pub source: String,
    /// `None` asks for the latest available version.
    pub version: Option<String>,
}

impl ReferenceKey {
    pub fn new(entity: EntityKind, species: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            entity,
            species: species.into(),
            source: source.into(),
            version: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Same table family, ignoring the version.
    fn same_family(&self, other: &ReferenceKey) -> bool {
        self.entity == other.entity && self.species == other.species && self.source == other.source
    }
}

/// Version order: numeric when both versions are integers, else by string.
/// An unversioned entry sorts below every versioned one.
fn compare_versions(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match (a.parse::<u64>(), b.parse::<u64>()) {
            (Ok(a), Ok(b)) => a.cmp(&b),
            _ => a.cmp(b),
        },
        _ => a.cmp(&b),
    }
}

impl std::fmt::Display for ReferenceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}@{}",
            self.entity,
            self.species,
            self.source,
            self.version.as_deref().unwrap_or("latest")
        )
    }
}

/// Source of canonical reference tables.
///
/// Implementations return the raw table for a key; failures surface as
/// `CurateError::ReferenceUnavailable`. Retrying is the provider's business.
pub trait ReferenceProvider: Send + Sync {
    fn get_reference_table(&self, key: &ReferenceKey) -> Result<Table>;
}

/// In-memory provider.
///
/// A key without a version resolves to the highest registered version of
/// the same entity/species/source.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    tables: HashMap<ReferenceKey, Table>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: ReferenceKey, table: Table) {
        self.tables.insert(key, table);
    }

    pub fn with_table(mut self, key: ReferenceKey, table: Table) -> Self {
        self.insert(key, table);
        self
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl ReferenceProvider for StaticProvider {
    fn get_reference_table(&self, key: &ReferenceKey) -> Result<Table> {
        if let Some(table) = self.tables.get(key) {
            return Ok(table.clone());
        }

        if key.version.is_none() {
            let latest = self
                .tables
                .iter()
                .filter(|(k, _)| k.same_family(key))
                .max_by(|(a, _), (b, _)| compare_versions(a.version.as_deref(), b.version.as_deref()));
            if let Some((found, table)) = latest {
                debug!(requested = %key, resolved = %found, "Resolved latest reference version");
                return Ok(table.clone());
            }
        }

        Err(CurateError::ReferenceUnavailable {
            key: key.to_string(),
            reason: "no table registered".to_string(),
        })
    }
}
