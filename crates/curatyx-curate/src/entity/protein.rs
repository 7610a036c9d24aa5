//! Protein entity.
//!
//! UniProtKB proteins, indexed by `uniprotkb_id`. Uses the shared curation
//! contract unchanged.

use std::sync::Arc;

use curatyx_common::{Config, CurateError, CurationConfig, EntityKind, Result, Table};
use curatyx_reference::{ReferenceKey, ReferenceProvider};

use super::{Entity, EntitySource};
use crate::normalise::ColumnMap;

/// Raw protein column name → canonical name.
pub const PROTEIN_COLUMNS: &[(&str, &str)] = &[
    ("UniProtKB", "uniprotkb_id"),
    ("uniprot_id", "uniprotkb_id"),
    ("ensembl_gene_id", "ensembl.gene_id"),
];

pub const DEFAULT_IDENTIFIER: &str = "uniprotkb_id";
pub const DEFAULT_SOURCE: &str = "uniprot";
pub const DEFAULT_SPECIES: &str = "human";

pub struct Protein {
    source: EntitySource,
    columns: ColumnMap,
}

impl Protein {
    pub fn new(provider: Arc<dyn ReferenceProvider>) -> Result<Self> {
        Self::with_key(provider, ReferenceKey::new(EntityKind::Protein, DEFAULT_SPECIES, DEFAULT_SOURCE))
    }

    pub fn from_config(provider: Arc<dyn ReferenceProvider>, config: &Config) -> Result<Self> {
        let key = ReferenceKey::new(EntityKind::Protein, config.reference.species.clone(), DEFAULT_SOURCE);
        Ok(Self::with_key(provider, key)?.with_config(config.curation.clone()))
    }

    pub fn with_key(provider: Arc<dyn ReferenceProvider>, key: ReferenceKey) -> Result<Self> {
        if key.entity != EntityKind::Protein {
            return Err(CurateError::InvalidReference(format!("{key} is not a protein reference")));
        }
        Ok(Self {
            source: EntitySource::new(key, provider),
            columns: ColumnMap::for_entity(EntityKind::Protein)?,
        })
    }

    pub fn with_config(mut self, config: CurationConfig) -> Self {
        self.source = self.source.with_config(config);
        self
    }

    pub fn key(&self) -> &ReferenceKey {
        self.source.key()
    }

    pub fn invalidate_reference(&self) -> bool {
        self.source.invalidate()
    }
}

impl Entity for Protein {
    fn kind(&self) -> EntityKind {
        EntityKind::Protein
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
}
