//! Reference table loading: headered delimited files into ordered field maps.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::{debug, error};

use crate::error::{Error, Result};

/// One row of a reference table, fields in header order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    fields: Vec<(String, String)>,
}

impl Row {
    /// Builds a row from `(field, value)` pairs.
    pub fn new<K: Into<String>, V: Into<String>>(pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        Self {
            fields: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// Value of `field`, if the row has it.
    pub fn value(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find_map(|(k, v)| if k == field { Some(v.as_str()) } else { None })
    }

    /// Fields in header order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A named list of rows sampled to populate synthetic records.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    name: String,
    rows: Vec<Row>,
}

impl ReferenceTable {
    /// Creates a table from already-built rows.
    pub fn new(name: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Creates an empty table.
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Picks one row uniformly at random, with replacement.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyReferenceData`] if the table has no rows.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&Row> {
        self.rows.choose(rng).ok_or_else(|| Error::EmptyReferenceData {
            table: self.name.clone(),
        })
    }

    /// Value of `field` in `row`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingField`] naming this table if the field is absent.
    pub fn field<'r>(&self, row: &'r Row, field: &str) -> Result<&'r str> {
        row.value(field).ok_or_else(|| Error::MissingField {
            table: self.name.clone(),
            field: field.to_string(),
        })
    }
}

/// Loads a reference table, reporting failures instead of returning them.
///
/// A missing, unreadable or empty file emits one `error` event and yields an
/// empty table; drawing from it later fails with
/// [`Error::EmptyReferenceData`].
pub fn load_reference_table(name: &str, path: &Path) -> ReferenceTable {
    match try_load_reference_table(name, path) {
        Ok(table) if table.is_empty() => {
            error!(table = name, path = %path.display(), "reference file has no rows");
            table
        }
        Ok(table) => table,
        Err(e) => {
            error!(table = name, path = %path.display(), "error loading reference file: {e}");
            ReferenceTable::empty(name)
        }
    }
}

/// Loads a reference table, returning any IO or CSV failure.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened and [`Error::Csv`] if it
/// is not valid delimited text.
pub fn try_load_reference_table(name: &str, path: &Path) -> Result<ReferenceTable> {
    let file = File::open(path)?;
    let table = read_reference_table(name, file)?;
    debug!(table = name, rows = table.len(), "reference table loaded");
    Ok(table)
}

/// Reads a headered delimited table from any reader. Values are trimmed.
///
/// # Errors
///
/// Returns [`Error::Csv`] on malformed input.
pub fn read_reference_table(name: &str, reader: impl Read) -> Result<ReferenceTable> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(Row::new(headers.iter().zip(record.iter())));
    }
    Ok(ReferenceTable::new(name, rows))
}
