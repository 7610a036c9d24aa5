//! Index mapping: resolve identifiers into the canonical scheme.
//!
//! Each value resolves through, in order:
//! 1. the same-named reference column, when the curated column also exists
//!    in the reference table (e.g. `symbol` → its canonical id)
//! 2. the alias map, when one was built
//! 3. itself, unchanged
//!
//! The resolved values become the table's index. The values they came
//! from stay recoverable: the source column is never overwritten, and the
//! previous index is kept in a side column.

use std::collections::HashMap;

use curatyx_common::{CurateError, CurationConfig, Result, Table, Value};
use tracing::debug;

use crate::alias::AliasMap;
use crate::compliance::is_compliant;

/// A table with its resolved index and per-row compliance flags.
#[derive(Debug, Clone)]
pub struct MappedTable {
    pub table: Table,
    pub compliant: Vec<bool>,
}

pub struct IndexMapper<'a> {
    reference: &'a Table,
    default_identifier: &'a str,
    alias_map: Option<&'a AliasMap>,
    config: &'a CurationConfig,
}

impl<'a> IndexMapper<'a> {
    pub fn new(reference: &'a Table, default_identifier: &'a str, config: &'a CurationConfig) -> Self {
        Self { reference, default_identifier, alias_map: None, config }
    }

    pub fn with_alias_map(mut self, alias_map: &'a AliasMap) -> Self {
        self.alias_map = Some(alias_map);
        self
    }

    /// Resolve values. `column` names the curated input column, if any.
    /// Nulls stay null.
    pub fn resolve(&self, values: &[Option<String>], column: Option<&str>) -> Vec<Option<String>> {
        let via_reference = column.and_then(|c| self.reference_column_lookup(c));
        values
            .iter()
            .map(|value| {
                let value = value.as_deref()?;
                let resolved = via_reference
                    .as_ref()
                    .and_then(|lookup| lookup.get(value).map(String::as_str))
                    .or_else(|| self.alias_map.and_then(|aliases| aliases.get(value)))
                    .unwrap_or(value);
                Some(resolved.to_string())
            })
            .collect()
    }

    /// Reference column value → canonical id, first row wins. `None` when
    /// the reference has no such non-identifier column.
    fn reference_column_lookup(&self, column: &str) -> Option<HashMap<String, String>> {
        if column == self.default_identifier || self.reference.index_name() == Some(column) {
            return None;
        }
        let values = self.reference.column(column)?;
        let mut lookup = HashMap::new();
        for (value, canonical) in values.iter().zip(self.reference.index()) {
            if let (Some(value), Some(canonical)) = (value.as_identifier(), canonical) {
                lookup.entry(value).or_insert_with(|| canonical.clone());
            }
        }
        Some(lookup)
    }

    /// Resolve the existing index. The original index moves to the
    /// `orig_index` side column. A table that already has that column
    /// (curated before) keeps it as is.
    pub fn map_index(&self, mut table: Table) -> Result<MappedTable> {
        let original = table.index().to_vec();
        let resolved = self.resolve(&original, None);
        let compliant = is_compliant(&resolved, self.reference.index());

        let side_column = &self.config.orig_index_column;
        if table.has_column(side_column) {
            debug!(column = %side_column, "Keeping existing side column");
        } else {
            table.insert_column(side_column.clone(), original.into_iter().map(Value::from).collect())?;
        }
        table.set_index(resolved, Some(self.default_identifier.to_string()))?;
        Ok(MappedTable { table, compliant })
    }

    /// Resolve `column` into the index. The column itself is left as it
    /// was; the previous index is kept under its own name, or under
    /// `orig_index` when unnamed. Fails if that name is already taken.
    pub fn map_column(&self, mut table: Table, column: &str) -> Result<MappedTable> {
        let original = table
            .column_identifiers(column)
            .ok_or_else(|| CurateError::missing_input(column))?;
        let resolved = self.resolve(&original, Some(column));
        let compliant = is_compliant(&resolved, self.reference.index());

        let side_column = match table.index_name() {
            Some(name) if name != column => name.to_string(),
            _ => self.config.orig_index_column.clone(),
        };
        if table.has_column(&side_column) {
            return Err(CurateError::DuplicateColumn(side_column));
        }
        let previous_index = table.index().iter().cloned().map(Value::from).collect();
        table.insert_column(side_column, previous_index)?;
        table.set_index(resolved, Some(self.default_identifier.to_string()))?;
        Ok(MappedTable { table, compliant })
    }
}
