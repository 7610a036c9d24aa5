//! Curation orchestrator.
//!
//! `Curator::curate` takes an arbitrary caller table and returns a copy
//! whose index holds canonical identifiers, plus a boolean compliance
//! column (`curated` by default). Rows that fail to resolve are not an
//! error: they keep their original value and are flagged `false`.

use curatyx_common::{CurateError, CurationConfig, Result, Table, Value};
use serde::Serialize;
use tracing::warn;

use crate::alias::explode_aggregated_column;
use crate::mapper::{IndexMapper, MappedTable};

/// Miss statistics for one curation call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurationSummary {
    pub n_rows: usize,
    pub n_misses: usize,
    /// Percentage of rows not mappable, rounded to one decimal.
    pub frac_misses: f64,
}

impl CurationSummary {
    pub fn from_flags(compliant: &[bool]) -> Self {
        let n_rows = compliant.len();
        let n_misses = compliant.iter().filter(|ok| !**ok).count();
        let frac_misses = if n_rows == 0 {
            0.0
        } else {
            (n_misses as f64 / n_rows as f64 * 1000.0).round() / 10.0
        };
        Self { n_rows, n_misses, frac_misses }
    }
}

/// Caller-side preconditions of a curation call; needs no reference table.
///
/// The curated column may not share a name with the compliance or side
/// column, which would overwrite it in the output.
pub fn check_input(table: &Table, column: Option<&str>, config: &CurationConfig) -> Result<()> {
    if table.is_empty() {
        return Err(CurateError::EmptyInput);
    }
    let Some(column) = column else { return Ok(()) };
    if !table.has_column(column) {
        return Err(CurateError::missing_input(column));
    }
    if column == config.compliance_column || column == config.orig_index_column {
        return Err(CurateError::DuplicateColumn(column.to_string()));
    }
    Ok(())
}

/// Curates tables against one prepared reference table.
pub struct Curator<'a> {
    reference: &'a Table,
    default_identifier: &'a str,
    config: &'a CurationConfig,
}

impl<'a> Curator<'a> {
    /// `reference` must be indexed by `default_identifier`.
    pub fn new(reference: &'a Table, default_identifier: &'a str, config: &'a CurationConfig) -> Self {
        Self { reference, default_identifier, config }
    }

    /// Curate the index of `table` (`column == None`) or the values of
    /// `column`, resolving aliases through the reference's
    /// `aggregated_column` when given.
    pub fn curate(
        &self,
        table: &Table,
        column: Option<&str>,
        aggregated_column: Option<&str>,
    ) -> Result<Table> {
        self.curate_with_summary(table, column, aggregated_column)
            .map(|(curated, _)| curated)
    }

    pub fn curate_with_summary(
        &self,
        table: &Table,
        column: Option<&str>,
        aggregated_column: Option<&str>,
    ) -> Result<(Table, CurationSummary)> {
        check_input(table, column, self.config)?;

        let alias_map = aggregated_column
            .map(|agg| explode_aggregated_column(self.reference, agg, self.default_identifier, self.config))
            .transpose()?;

        let mut mapper = IndexMapper::new(self.reference, self.default_identifier, self.config);
        if let Some(aliases) = &alias_map {
            mapper = mapper.with_alias_map(aliases);
        }

        let MappedTable { mut table, compliant } = match column {
            None => mapper.map_index(table.clone())?,
            Some(column) => mapper.map_column(table.clone(), column)?,
        };

        let summary = CurationSummary::from_flags(&compliant);
        table.insert_column(
            self.config.compliance_column.clone(),
            compliant.into_iter().map(Value::Bool).collect(),
        )?;

        warn!(
            n_misses = summary.n_misses,
            frac_misses = summary.frac_misses,
            "{} terms ({}%) are not mappable.",
            summary.n_misses,
            summary.frac_misses
        );
        Ok((table, summary))
    }
}
