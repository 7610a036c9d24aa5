//! Local TSV reference store.
//!
//! Layout: `{data_dir}/{entity}/{species}/{source}/{version}.tsv`, with
//! `latest.tsv` standing in for an unversioned key. The first row is the
//! header; empty cells are null. Columns are loaded as-is; renaming and
//! indexing happen when the entity prepares the table.

use std::path::{Path, PathBuf};

use anyhow::Context;
use curatyx_common::{CurateError, ReferenceConfig, Result, Table, Value};
use tracing::{debug, info};

use crate::provider::{ReferenceKey, ReferenceProvider};

#[derive(Debug, Clone)]
pub struct TsvProvider {
    data_dir: PathBuf,
}

impl TsvProvider {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into() }
    }

    pub fn from_config(config: &ReferenceConfig) -> Self {
        Self::new(config.data_dir.clone())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// File backing a key.
    pub fn path_for(&self, key: &ReferenceKey) -> PathBuf {
        self.data_dir
            .join(key.entity.as_str())
            .join(&key.species)
            .join(&key.source)
            .join(format!("{}.tsv", key.version.as_deref().unwrap_or("latest")))
    }
}

impl ReferenceProvider for TsvProvider {
    fn get_reference_table(&self, key: &ReferenceKey) -> Result<Table> {
        let path = self.path_for(key);
        let unavailable = |reason: String| CurateError::ReferenceUnavailable {
            key: key.to_string(),
            reason,
        };

        if !path.exists() {
            return Err(unavailable(format!("{} does not exist", path.display())));
        }

        debug!(path = %path.display(), "Reading reference TSV");
        let table = read_tsv(&path).map_err(|e| unavailable(format!("{e:#}")))?;
        info!(
            path = %path.display(),
            n_rows = table.n_rows(),
            n_columns = table.columns().len(),
            "Loaded reference table"
        );
        Ok(table)
    }
}

fn read_tsv(path: &Path) -> anyhow::Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .quoting(false)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let headers: Vec<String> = reader
        .headers()
        .with_context(|| format!("{} has no header row", path.display()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let mut columns: Vec<Vec<Value>> = vec![Vec::new(); headers.len()];

    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("{}: bad record {}", path.display(), line + 1))?;
        for (values, field) in columns.iter_mut().zip(record.iter()) {
            let field = field.trim();
            values.push(if field.is_empty() { Value::Null } else { Value::from(field) });
        }
    }

    let n_rows = columns.first().map(Vec::len).unwrap_or(0);
    let mut table = Table::with_range_index(n_rows);
    for (name, values) in headers.into_iter().zip(columns) {
        table.insert_column(name, values)?;
    }
    Ok(table)
}
