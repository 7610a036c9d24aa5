//! In-memory table model shared by reference tables and caller input.
//!
//! A `Table` is an ordered set of equally long named columns plus a row
//! index of identifiers. The index is the thing curation rewrites; columns
//! are carried through untouched unless an operation says otherwise.

use serde::{Deserialize, Serialize};

use crate::error::{CurateError, Result};

/// A single table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Multi-valued cell, e.g. the synonyms of one gene.
    List(Vec<String>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The cell as an identifier. Only text and integer cells qualify;
    /// anything else reads as null.
    pub fn as_identifier(&self) -> Option<String> {
        match self {
            Value::Text(s) => Some(s.clone()),
            Value::Int(i) => Some(i.to_string()),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Value::List(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

/// Row-indexed table of named columns.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    index_name: Option<String>,
    index: Vec<Option<String>>,
    columns: Vec<Column>,
}

impl Table {
    // ── Constructors ──────────────────────────────────────────────────────────

    /// Empty-column table over the given index.
    pub fn new(index: Vec<Option<String>>) -> Self {
        Self { index_name: None, index, columns: Vec::new() }
    }

    /// Table indexed by non-null identifiers.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(ids.into_iter().map(|s| Some(s.into())).collect())
    }

    /// Table with an unnamed positional index `"0"..n`.
    pub fn with_range_index(n_rows: usize) -> Self {
        Self::new((0..n_rows).map(|i| Some(i.to_string())).collect())
    }

    pub fn with_index_name(mut self, name: impl Into<String>) -> Self {
        self.index_name = Some(name.into());
        self
    }

    /// Builder form of [`Table::insert_column`].
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<Value>) -> Result<Self> {
        self.insert_column(name, values)?;
        Ok(self)
    }

    // ── Shape ─────────────────────────────────────────────────────────────────

    pub fn n_rows(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // ── Index ─────────────────────────────────────────────────────────────────

    pub fn index(&self) -> &[Option<String>] {
        &self.index
    }

    pub fn index_name(&self) -> Option<&str> {
        self.index_name.as_deref()
    }

    /// Replace the index. Must keep the row count when columns exist.
    pub fn set_index(&mut self, index: Vec<Option<String>>, name: Option<String>) -> Result<()> {
        if !self.columns.is_empty() && index.len() != self.n_rows() {
            return Err(CurateError::ShapeMismatch {
                column: name.unwrap_or_else(|| "index".to_string()),
                expected: self.n_rows(),
                actual: index.len(),
            });
        }
        self.index = index;
        self.index_name = name;
        Ok(())
    }

    /// Move a column into the index; the previous index is discarded.
    pub fn set_index_from_column(&mut self, name: &str) -> Result<()> {
        let values = self
            .remove_column(name)
            .ok_or_else(|| CurateError::missing_input(name))?;
        self.index = values.iter().map(Value::as_identifier).collect();
        self.index_name = Some(name.to_string());
        Ok(())
    }

    /// Drop every row whose index is null. Returns the number removed.
    pub fn drop_null_index(&mut self) -> usize {
        let keep: Vec<bool> = self.index.iter().map(Option::is_some).collect();
        let before = self.n_rows();
        self.retain_rows(&keep);
        before - self.n_rows()
    }

    /// Keep only rows whose mask entry is `true`.
    pub fn retain_rows(&mut self, keep: &[bool]) {
        let mut mask = keep.iter().copied();
        self.index.retain(|_| mask.next().unwrap_or(false));
        for column in &mut self.columns {
            let mut mask = keep.iter().copied();
            column.values.retain(|_| mask.next().unwrap_or(false));
        }
    }

    // ── Columns ───────────────────────────────────────────────────────────────

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Column values read as identifiers (see [`Value::as_identifier`]).
    pub fn column_identifiers(&self, name: &str) -> Option<Vec<Option<String>>> {
        self.column(name)
            .map(|values| values.iter().map(Value::as_identifier).collect())
    }

    /// Insert a column, replacing any existing column of the same name.
    pub fn insert_column(&mut self, name: impl Into<String>, values: Vec<Value>) -> Result<()> {
        let name = name.into();
        if values.len() != self.n_rows() {
            return Err(CurateError::ShapeMismatch {
                column: name,
                expected: self.n_rows(),
                actual: values.len(),
            });
        }
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.values = values,
            None => self.columns.push(Column { name, values }),
        }
        Ok(())
    }

    pub fn remove_column(&mut self, name: &str) -> Option<Vec<Value>> {
        let pos = self.columns.iter().position(|c| c.name == name)?;
        Some(self.columns.remove(pos).values)
    }

    /// Relabel a column. Label-only: an existing column named `to` is not
    /// checked for. Returns whether `from` was found.
    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        match self.columns.iter_mut().find(|c| c.name == from) {
            Some(column) => {
                column.name = to.to_string();
                true
            }
            None => false,
        }
    }

    /// Relabel every column for which `rename` returns a new name, and the
    /// index name likewise. Returns the number of labels changed.
    pub fn rename_labels<F>(&mut self, mut rename: F) -> usize
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut renamed = 0;
        for column in &mut self.columns {
            if let Some(to) = rename(&column.name) {
                column.name = to;
                renamed += 1;
            }
        }
        let index_name = self.index_name.as_deref().and_then(&mut rename);
        if let Some(to) = index_name {
            self.index_name = Some(to);
            renamed += 1;
        }
        renamed
    }
}
