//! Alias expansion.
//!
//! Reference tables carry synonyms in an aggregated column: one cell per
//! canonical record, holding every alternate name for it. This module
//! explodes such a column into a flat lookup mapping any alias → the
//! canonical identifier of the row that lists it.
//!
//! Usage:
//! ```ignore
//! let aliases = explode_aggregated_column(&reference, "synonyms", "ensembl.gene_id", &config)?;
//! aliases.get("p53");  // Some("ENSG00000141510")
//! ```

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use curatyx_common::{AliasCollision, CurateError, CurationConfig, Result, Table, Value};
use tracing::{debug, warn};

/// Alias → canonical identifier lookup.
#[derive(Debug, Clone, Default)]
pub struct AliasMap {
    lookup: HashMap<String, String>,
    /// Aliases seen under more than one canonical identifier.
    n_collisions: usize,
}

impl AliasMap {
    pub fn get(&self, alias: &str) -> Option<&str> {
        self.lookup.get(alias).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    pub fn n_collisions(&self) -> usize {
        self.n_collisions
    }

    fn insert(&mut self, alias: String, canonical: &str, policy: AliasCollision) -> Result<()> {
        match self.lookup.entry(alias) {
            Entry::Vacant(slot) => {
                slot.insert(canonical.to_string());
            }
            Entry::Occupied(mut slot) => {
                if slot.get() == canonical {
                    return Ok(());
                }
                self.n_collisions += 1;
                match policy {
                    AliasCollision::FirstSeenWins => {}
                    AliasCollision::LastSeenWins => {
                        slot.insert(canonical.to_string());
                    }
                    AliasCollision::Reject => {
                        return Err(CurateError::AmbiguousAlias {
                            alias: slot.key().clone(),
                            first: slot.get().clone(),
                            second: canonical.to_string(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

/// Explode `aggregated_column` of `reference` into an [`AliasMap`].
///
/// Each alias maps to the row's `target_column` value, or to the row's
/// index when the reference has no such column (it is the index).
/// Rows without a canonical identifier contribute nothing. When one alias
/// is listed by several rows, `config.alias_collision` decides.
pub fn explode_aggregated_column(
    reference: &Table,
    aggregated_column: &str,
    target_column: &str,
    config: &CurationConfig,
) -> Result<AliasMap> {
    let cells = reference
        .column(aggregated_column)
        .ok_or_else(|| CurateError::missing_reference(aggregated_column))?;

    let targets = if reference.has_column(target_column) {
        reference.column_identifiers(target_column).unwrap_or_default()
    } else {
        reference.index().to_vec()
    };

    let mut aliases = AliasMap::default();
    for (cell, target) in cells.iter().zip(&targets) {
        let Some(target) = target else { continue };
        for alias in cell_aliases(cell, &config.list_delimiter) {
            aliases.insert(alias, target, config.alias_collision)?;
        }
    }

    if aliases.n_collisions > 0 {
        warn!(
            column = aggregated_column,
            n_collisions = aliases.n_collisions,
            policy = ?config.alias_collision,
            "Aliases listed under more than one canonical identifier"
        );
    }
    debug!(
        column = aggregated_column,
        n_aliases = aliases.len(),
        "Expanded aggregated column"
    );
    Ok(aliases)
}

/// The individual aliases packed into one aggregated cell.
fn cell_aliases(cell: &Value, delimiter: &str) -> Vec<String> {
    let keep = |s: &str| {
        let s = s.trim();
        (!s.is_empty()).then(|| s.to_string())
    };
    match cell {
        Value::List(items) => items.iter().filter_map(|s| keep(s)).collect(),
        Value::Text(s) if delimiter.is_empty() => keep(s).into_iter().collect(),
        Value::Text(s) => s.split(delimiter).filter_map(keep).collect(),
        Value::Int(i) => vec![i.to_string()],
        Value::Null | Value::Bool(_) | Value::Float(_) => Vec::new(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
