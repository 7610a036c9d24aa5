//! Identifier curation against canonical reference tables.
//!
//! Pipeline, leaves first:
//! - `normalise`: rename raw reference columns to canonical `{database}.{id_type}` names
//! - `alias`: explode an aggregated synonyms column into alias → canonical id
//! - `compliance`: flag values that are canonical identifiers
//! - `mapper`: resolve an index or column into canonical identifiers
//! - `curate`: the `Curator` tying the above together
//! - `entity`: per-entity-type policy (`Gene`, `Protein`) behind the `Entity` trait
//!
//! Usage:
//! ```ignore
//! let gene = Gene::new(Arc::new(TsvProvider::from_config(&config.reference)))?;
//! let curated = gene.curate(&table, Some("symbol"), None)?;
//! ```

pub mod alias;
pub mod compliance;
pub mod curate;
pub mod entity;
pub mod mapper;
pub mod normalise;

pub use alias::{explode_aggregated_column, AliasMap};
pub use compliance::is_compliant;
pub use curate::{check_input, CurationSummary, Curator};
pub use entity::{Entity, EntitySource, Gene, Protein};
pub use mapper::{IndexMapper, MappedTable};
pub use normalise::{normalise_columns, normalise_entity_columns, ColumnMap};
