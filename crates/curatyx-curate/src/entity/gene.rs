//! Gene entity.
//!
//! Ensembl genes, indexed by `ensembl.gene_id`. Gene tables arrive with a
//! zoo of identifier column names (`HGNC`, `ensembl_gn_id`, `entrezgene_id`),
//! so gene curation resolves the caller's column name before handing off
//! to the shared curator:
//! - a column the reference table also has is used as-is
//! - otherwise it is normalised through [`GENE_COLUMNS`]
//! - otherwise it is assumed to hold the default identifier
//!
//! Symbol columns additionally resolve through the `synonyms` column.
//!
//! Usage:
//! ```ignore
//! let gene = Gene::new(provider)?;
//! let curated = gene.curate(&table, Some("symbol"), None)?;
//! ```

use std::sync::Arc;

use curatyx_common::{Config, CurateError, CurationConfig, EntityKind, Result, Table};
use curatyx_reference::{ReferenceKey, ReferenceProvider};
use tracing::debug;

use super::{Entity, EntitySource};
use crate::curate::{check_input, Curator};
use crate::normalise::ColumnMap;

/// Raw gene column name → canonical name.
pub const GENE_COLUMNS: &[(&str, &str)] = &[
    ("HGNC", "hgnc_id"),
    ("ensembl_gn_id", "ensembl.gene_id"),
    ("ensembl_gene_id", "ensembl.gene_id"),
    ("entrezgene_id", "entrez.gene_id"),
];

/// Identifier column → reference column holding its aliases.
pub const GENE_ALIASES: &[(&str, &str)] = &[("symbol", "synonyms")];

pub const DEFAULT_IDENTIFIER: &str = "ensembl.gene_id";
pub const DEFAULT_SOURCE: &str = "ensembl";
pub const DEFAULT_SPECIES: &str = "human";

pub struct Gene {
    source: EntitySource,
    columns: ColumnMap,
}

impl Gene {
    // ── Constructors ──────────────────────────────────────────────────────────

    /// Human Ensembl genes, latest version.
    pub fn new(provider: Arc<dyn ReferenceProvider>) -> Result<Self> {
        Self::with_key(provider, ReferenceKey::new(EntityKind::Gene, DEFAULT_SPECIES, DEFAULT_SOURCE))
    }

    /// Species and curation settings taken from `config`.
    pub fn from_config(provider: Arc<dyn ReferenceProvider>, config: &Config) -> Result<Self> {
        let key = ReferenceKey::new(EntityKind::Gene, config.reference.species.clone(), DEFAULT_SOURCE);
        Ok(Self::with_key(provider, key)?.with_config(config.curation.clone()))
    }

    pub fn with_key(provider: Arc<dyn ReferenceProvider>, key: ReferenceKey) -> Result<Self> {
        if key.entity != EntityKind::Gene {
            return Err(CurateError::InvalidReference(format!("{key} is not a gene reference")));
        }
        Ok(Self {
            source: EntitySource::new(key, provider),
            columns: ColumnMap::for_entity(EntityKind::Gene)?,
        })
    }

    pub fn with_config(mut self, config: CurationConfig) -> Self {
        self.source = self.source.with_config(config);
        self
    }

    pub fn key(&self) -> &ReferenceKey {
        self.source.key()
    }

    /// Drop the cached reference table.
    pub fn invalidate_reference(&self) -> bool {
        self.source.invalidate()
    }

    // ── Column resolution ─────────────────────────────────────────────────────

    /// The reference column `requested` refers to.
    fn resolve_column(&self, reference: &Table, table: &Table, requested: &str) -> Result<String> {
        if reference.has_column(requested) || reference.index_name() == Some(requested) {
            return Ok(requested.to_string());
        }
        let resolved = self
            .columns
            .canonical_name(requested)
            .unwrap_or(DEFAULT_IDENTIFIER);
        if table.has_column(resolved) {
            return Err(CurateError::DuplicateColumn(resolved.to_string()));
        }
        debug!(requested, resolved, "Resolved gene identifier column");
        Ok(resolved.to_string())
    }
}

fn alias_column(column: &str) -> Option<&'static str> {
    GENE_ALIASES
        .iter()
        .find(|(id, _)| *id == column)
        .map(|(_, aggregated)| *aggregated)
}

impl Entity for Gene {
    fn kind(&self) -> EntityKind {
        EntityKind::Gene
    }

    fn default_identifier(&self) -> &str {
        DEFAULT_IDENTIFIER
    }

    fn column_map(&self) -> &ColumnMap {
        &self.columns
    }

    fn config(&self) -> &CurationConfig {
        self.source.config()
    }

    fn load_reference(&self) -> Result<Arc<Table>> {
        self.source.load(DEFAULT_IDENTIFIER, &self.columns)
    }

    /// Curate with gene column-name resolution in front.
    ///
    /// An explicit `aggregated_column` always applies. Otherwise a symbol
    /// column picks up the reference's `synonyms` column when present.
    /// The output carries the caller's column name, not the normalised one.
    fn curate(&self, table: &Table, column: Option<&str>, aggregated_column: Option<&str>) -> Result<Table> {
        check_input(table, column, self.config())?;
        let reference = self.load_reference()?;
        let curator = Curator::new(&reference, DEFAULT_IDENTIFIER, self.config());

        let Some(requested) = column else {
            return curator.curate(table, None, aggregated_column);
        };

        let resolved = self.resolve_column(&reference, table, requested)?;
        let aggregated = aggregated_column
            .or_else(|| alias_column(&resolved).filter(|agg| reference.has_column(agg)));

        if resolved == requested {
            return curator.curate(table, Some(requested), aggregated);
        }

        let mut working = table.clone();
        working.rename_column(requested, &resolved);
        let mut curated = curator.curate(&working, Some(resolved.as_str()), aggregated)?;
        curated.rename_column(&resolved, requested);
        Ok(curated)
    }
}
