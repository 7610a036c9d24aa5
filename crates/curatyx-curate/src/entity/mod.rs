//! Entity types and the capability trait they share.
//!
//! Every entity type (gene, protein, ...) knows its default identifier, its
//! raw → canonical column rename table, and where its reference table
//! comes from. The reconciliation engine in `curate` is written once
//! against [`Entity`]; an entity may override `curate` to put extra
//! name-resolution policy in front of it (see [`Gene`]).

pub mod gene;
pub mod protein;

use std::collections::HashSet;
use std::sync::Arc;

use curatyx_common::{CurateError, CurationConfig, EntityKind, Result, Table};
use curatyx_reference::{ReferenceCache, ReferenceKey, ReferenceProvider};
use tracing::{debug, info};

use crate::curate::{check_input, Curator};
use crate::normalise::{normalise_columns, ColumnMap};

pub use gene::Gene;
pub use protein::Protein;

pub trait Entity {
    fn kind(&self) -> EntityKind;

    /// Name of the canonical identifier column, e.g. `ensembl.gene_id`.
    fn default_identifier(&self) -> &str;

    fn column_map(&self) -> &ColumnMap;

    fn config(&self) -> &CurationConfig;

    /// The prepared reference table, loaded on first use and cached.
    fn load_reference(&self) -> Result<Arc<Table>>;

    /// Rename raw columns of `table` to this entity's canonical names.
    fn normalise_columns(&self, table: &mut Table) -> usize {
        normalise_columns(table, self.column_map())
    }

    /// Curate `table` against this entity's reference.
    ///
    /// - `column == None`: resolve the existing index
    /// - `column == Some(c)`: resolve the values of column `c`
    ///
    /// `aggregated_column` names a synonyms column of the reference table
    /// to resolve aliases through.
    fn curate(&self, table: &Table, column: Option<&str>, aggregated_column: Option<&str>) -> Result<Table> {
        check_input(table, column, self.config())?;
        let reference = self.load_reference()?;
        Curator::new(&reference, self.default_identifier(), self.config())
            .curate(table, column, aggregated_column)
    }
}

/// Reference plumbing shared by entity implementations: which table, who
/// provides it, and the cache holding it once prepared.
pub struct EntitySource {
    key: ReferenceKey,
    provider: Arc<dyn ReferenceProvider>,
    cache: ReferenceCache,
    config: CurationConfig,
}

impl EntitySource {
    pub fn new(key: ReferenceKey, provider: Arc<dyn ReferenceProvider>) -> Self {
        Self {
            key,
            provider,
            cache: ReferenceCache::new(),
            config: CurationConfig::default(),
        }
    }

    pub fn with_config(mut self, config: CurationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn key(&self) -> &ReferenceKey {
        &self.key
    }

    pub fn config(&self) -> &CurationConfig {
        &self.config
    }

    pub fn cache(&self) -> &ReferenceCache {
        &self.cache
    }

    /// Fetch, prepare and cache the reference table.
    pub fn load(&self, default_identifier: &str, columns: &ColumnMap) -> Result<Arc<Table>> {
        self.cache.get_or_load(|| {
            info!(key = %self.key, "Loading reference table");
            let raw = self.provider.get_reference_table(&self.key)?;
            let table = prepare_reference(raw, default_identifier, columns)?;
            info!(key = %self.key, n_rows = table.n_rows(), "Reference table ready");
            Ok(table)
        })
    }

    /// Drop the cached table; the next load goes back to the provider.
    pub fn invalidate(&self) -> bool {
        self.cache.invalidate()
    }
}

/// Turn a provider table into a curation reference: canonical column
/// names, indexed by `default_identifier`, no null or repeated identifiers.
pub fn prepare_reference(mut table: Table, default_identifier: &str, columns: &ColumnMap) -> Result<Table> {
    normalise_columns(&mut table, columns);

    if table.index_name() != Some(default_identifier) {
        if !table.has_column(default_identifier) {
            return Err(CurateError::InvalidReference(format!(
                "no '{default_identifier}' column"
            )));
        }
        table.set_index_from_column(default_identifier)?;
    }

    let dropped = table.drop_null_index();
    if dropped > 0 {
        debug!(dropped, "Dropped reference rows without a default identifier");
    }

    let mut seen = HashSet::new();
    if let Some(repeated) = table.index().iter().flatten().find(|id| !seen.insert(id.as_str())) {
        return Err(CurateError::InvalidReference(format!(
            "{default_identifier} '{repeated}' appears more than once"
        )));
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use curatyx_common::Value;
    use curatyx_reference::StaticProvider;
    use pretty_assertions::assert_eq;

    fn columns() -> ColumnMap {
        ColumnMap::new([("ensembl_gene_id", "ensembl.gene_id")]).unwrap()
    }

    fn raw() -> Table {
        Table::with_range_index(3)
            .with_column("ensembl_gene_id", vec!["ENSG1".into(), Value::Null, "ENSG2".into()])
            .unwrap()
            .with_column("symbol", vec!["TP53".into(), "ORPHAN".into(), "BRCA1".into()])
            .unwrap()
    }

    #[test]
    fn test_prepare_promotes_identifier_and_drops_nulls() {
        let table = prepare_reference(raw(), "ensembl.gene_id", &columns()).unwrap();
        assert_eq!(table.index_name(), Some("ensembl.gene_id"));
        assert_eq!(table.index(), &[Some("ENSG1".to_string()), Some("ENSG2".to_string())]);
        assert_eq!(table.column("symbol").unwrap(), &[Value::from("TP53"), Value::from("BRCA1")]);
    }

    #[test]
    fn test_prepare_accepts_indexed_table() {
        let table = Table::from_ids(["ENSG1"]).with_index_name("ensembl_gene_id");
        let table = prepare_reference(table, "ensembl.gene_id", &columns()).unwrap();
        assert_eq!(table.index_name(), Some("ensembl.gene_id"));
        assert_eq!(table.n_rows(), 1);
    }

    #[test]
    fn test_prepare_rejects_duplicates() {
        let table = Table::from_ids(["ENSG1", "ENSG1"]).with_index_name("ensembl.gene_id");
        let err = prepare_reference(table, "ensembl.gene_id", &columns()).unwrap_err();
        assert!(matches!(err, CurateError::InvalidReference(_)));
    }

    #[test]
    fn test_prepare_requires_identifier() {
        let table = Table::with_range_index(1).with_column("symbol", vec!["TP53".into()]).unwrap();
        let err = prepare_reference(table, "ensembl.gene_id", &columns()).unwrap_err();
        assert!(matches!(err, CurateError::InvalidReference(_)));
    }

    #[test]
    fn test_source_caches_until_invalidated() {
        let key = ReferenceKey::new(EntityKind::Gene, "human", "ensembl");
        let provider = StaticProvider::new().with_table(key.clone(), raw());
        let source = EntitySource::new(key, Arc::new(provider));

        let first = source.load("ensembl.gene_id", &columns()).unwrap();
        let second = source.load("ensembl.gene_id", &columns()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        assert!(source.invalidate());
        let third = source.load("ensembl.gene_id", &columns()).unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(*first, *third);
    }

    #[test]
    fn test_input_checked_before_reference_fetch() {
        let protein = Protein::new(Arc::new(StaticProvider::new())).unwrap();
        let err = protein.curate(&Table::default(), None, None).unwrap_err();
        assert!(matches!(err, CurateError::EmptyInput));

        let err = protein.curate(&Table::from_ids(["P04637"]), Some("protein"), None).unwrap_err();
        assert!(matches!(err, CurateError::MissingColumn { .. }));
    }

    #[test]
    fn test_source_propagates_unavailable() {
        let key = ReferenceKey::new(EntityKind::Gene, "human", "ensembl");
        let source = EntitySource::new(key, Arc::new(StaticProvider::new()));
        let err = source.load("ensembl.gene_id", &columns()).unwrap_err();
        assert!(matches!(err, CurateError::ReferenceUnavailable { .. }));
        assert!(source.cache().get().is_none());
    }
}
