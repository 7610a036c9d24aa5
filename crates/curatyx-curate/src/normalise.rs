//! Column name normalisation.
//!
//! Reference tables arrive with whatever column names their upstream
//! source uses. Identifier columns are renamed to `{database}.{id_type}`
//! when a database has several id types (`ensembl.gene_id`,
//! `ensembl.transcript_id`) and to `{database}_id` when it has one
//! (`hgnc_id`).

use std::collections::HashSet;

use curatyx_common::{CurateError, EntityKind, Result, Table};
use tracing::debug;

/// Raw column name → canonical column name, for one entity type.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    pairs: Vec<(String, String)>,
}

impl ColumnMap {
    /// Build and validate a rename table.
    ///
    /// Rejects empty names, a raw name listed twice, and chains where a
    /// canonical name is itself a raw name.
    pub fn new<I, R, C>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (R, C)>,
        R: Into<String>,
        C: Into<String>,
    {
        let pairs: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(raw, canonical)| (raw.into(), canonical.into()))
            .collect();

        let mut raw_names = HashSet::new();
        for (raw, canonical) in &pairs {
            if raw.is_empty() || canonical.is_empty() {
                return Err(CurateError::InvalidColumnMap("empty column name".to_string()));
            }
            if !raw_names.insert(raw.as_str()) {
                return Err(CurateError::InvalidColumnMap(format!("'{raw}' listed twice")));
            }
        }
        if let Some((_, canonical)) = pairs.iter().find(|(_, c)| raw_names.contains(c.as_str())) {
            return Err(CurateError::InvalidColumnMap(format!(
                "'{canonical}' is both a raw and a canonical name"
            )));
        }

        Ok(Self { pairs })
    }

    /// The rename table of an entity type.
    pub fn for_entity(kind: EntityKind) -> Result<Self> {
        match kind {
            EntityKind::Gene => Self::new(crate::entity::gene::GENE_COLUMNS.iter().copied()),
            EntityKind::Protein => Self::new(crate::entity::protein::PROTEIN_COLUMNS.iter().copied()),
        }
    }

    pub fn canonical_name(&self, raw: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(r, _)| r == raw)
            .map(|(_, c)| c.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(r, c)| (r.as_str(), c.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Rename known raw columns (and the index name) in place. Unknown columns
/// are left alone; a rename onto an existing column name is not checked.
pub fn normalise_columns(table: &mut Table, columns: &ColumnMap) -> usize {
    let renamed = table.rename_labels(|name| columns.canonical_name(name).map(str::to_string));
    debug!(renamed, "Normalised column names");
    renamed
}

/// [`normalise_columns`] with the rename table of `kind`.
pub fn normalise_entity_columns(table: &mut Table, kind: EntityKind) -> Result<usize> {
    Ok(normalise_columns(table, &ColumnMap::for_entity(kind)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use curatyx_common::Value;
    use pretty_assertions::assert_eq;

    fn gene_map() -> ColumnMap {
        ColumnMap::new([
            ("HGNC", "hgnc_id"),
            ("ensembl_gene_id", "ensembl.gene_id"),
            ("entrezgene_id", "entrez.gene_id"),
        ])
        .unwrap()
    }

    #[test]
    fn test_renames_known_columns_only() {
        let mut table = Table::with_range_index(1)
            .with_column("ensembl_gene_id", vec!["ENSG00000141510".into()])
            .unwrap()
            .with_column("symbol", vec!["TP53".into()])
            .unwrap();

        assert_eq!(normalise_columns(&mut table, &gene_map()), 1);
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["ensembl.gene_id", "symbol"]);
        assert_eq!(table.column("ensembl.gene_id").unwrap(), &[Value::from("ENSG00000141510")]);
    }

    #[test]
    fn test_renames_index_name() {
        let mut table = Table::from_ids(["HGNC:11998"]).with_index_name("HGNC");
        normalise_columns(&mut table, &gene_map());
        assert_eq!(table.index_name(), Some("hgnc_id"));
    }

    #[test]
    fn test_lookup() {
        let map = gene_map();
        assert_eq!(map.canonical_name("entrezgene_id"), Some("entrez.gene_id"));
        assert_eq!(map.canonical_name("symbol"), None);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_rejects_duplicate_raw_name() {
        let err = ColumnMap::new([("HGNC", "hgnc_id"), ("HGNC", "hgnc.id")]).unwrap_err();
        assert!(matches!(err, CurateError::InvalidColumnMap(_)));
    }

    #[test]
    fn test_rejects_chained_rename() {
        let err = ColumnMap::new([("a", "b"), ("b", "c")]).unwrap_err();
        assert!(matches!(err, CurateError::InvalidColumnMap(_)));
    }

    #[test]
    fn test_rejects_empty_name() {
        let err = ColumnMap::new([("", "hgnc_id")]).unwrap_err();
        assert!(matches!(err, CurateError::InvalidColumnMap(_)));
    }

    #[test]
    fn test_entity_tables_are_valid() {
        assert_eq!(ColumnMap::for_entity(EntityKind::Gene).unwrap().len(), 4);
        assert_eq!(
            ColumnMap::for_entity(EntityKind::Protein).unwrap().canonical_name("UniProtKB"),
            Some("uniprotkb_id")
        );
    }

    #[test]
    fn test_normalise_by_entity_kind() {
        let mut table = Table::with_range_index(1)
            .with_column("entrezgene_id", vec![Value::Int(7157)])
            .unwrap();
        assert_eq!(normalise_entity_columns(&mut table, EntityKind::Gene).unwrap(), 1);
        assert!(table.has_column("entrez.gene_id"));
    }

    #[test]
    fn test_many_to_one_allowed() {
        let map = ColumnMap::new([
            ("ensembl_gn_id", "ensembl.gene_id"),
            ("ensembl_gene_id", "ensembl.gene_id"),
        ]);
        assert!(map.is_ok());
    }
}
