//! Tabular data model: ordered named columns plus per-table metadata.
//!
//! A [`Table`] is an ordered sequence of uniquely-named [`Column`]s and
//! two metadata sequences aligned to column order: descriptions and
//! units, one byte-string per column. Column order is semantically
//! significant and round-trips through the codec. Columns may nest other
//! tables as values, which is how the recursive wire layout arises.
//!
//! Invariants enforced at construction:
//!
//! - Column names are unique.
//! - All columns have the same number of rows.
//! - Metadata sequences have exactly one entry per column (absent
//!   metadata is normalized to empty byte-strings).

pub mod column;
pub mod value;

use serde::{Deserialize, Serialize};
use snafu::prelude::*;

pub use column::{Column, TypeInferenceError};
pub use value::{CellType, CellValue, ParseCellTypeError};

/// A single metadata entry: arbitrary bytes, conventionally UTF-8 text.
pub type ByteString = Vec<u8>;

/// Errors raised when assembling a table from columns and metadata.
#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum TableError {
    /// Two columns share the same name.
    #[snafu(display("duplicate column name {name}"))]
    DuplicateColumnName {
        /// The name used more than once.
        name: String,
    },

    /// A column's row count differs from the first column's.
    #[snafu(display("column {name} has {rows} rows, expected {expected}"))]
    RaggedColumn {
        /// The offending column.
        name: String,
        /// Its row count.
        rows: usize,
        /// The row count established by the first column.
        expected: usize,
    },

    /// A metadata sequence does not align one-to-one with the columns.
    #[snafu(display("{field} has {entries} entries for {columns} columns"))]
    MetadataLengthMismatch {
        /// Which metadata sequence is misaligned.
        field: String,
        /// Number of entries supplied.
        entries: usize,
        /// Number of columns in the table.
        columns: usize,
    },
}

/// An ordered collection of uniquely-named columns with aligned metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<Column>,
    descriptions: Vec<ByteString>,
    units: Vec<ByteString>,
}

impl Table {
    /// The canonical empty table: zero columns, empty metadata.
    pub fn empty() -> Self {
        Table::default()
    }

    /// Builds a table from columns, with metadata defaulted to one empty
    /// byte-string per column.
    ///
    /// # Errors
    /// Returns [`TableError::DuplicateColumnName`] or
    /// [`TableError::RaggedColumn`] when the columns are not well formed.
    pub fn new(columns: Vec<Column>) -> Result<Self, TableError> {
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name() == column.name()) {
                return DuplicateColumnNameSnafu {
                    name: column.name(),
                }
                .fail();
            }
        }
        if let Some(first) = columns.first() {
            let expected = first.len();
            for column in &columns {
                ensure!(
                    column.len() == expected,
                    RaggedColumnSnafu {
                        name: column.name(),
                        rows: column.len(),
                        expected,
                    }
                );
            }
        }
        let blank = vec![ByteString::new(); columns.len()];
        Ok(Table {
            descriptions: blank.clone(),
            units: blank,
            columns,
        })
    }

    /// Replaces the per-column descriptions.
    ///
    /// # Errors
    /// Returns [`TableError::MetadataLengthMismatch`] unless exactly one
    /// entry per column is supplied.
    pub fn with_descriptions(mut self, descriptions: Vec<ByteString>) -> Result<Self, TableError> {
        ensure!(
            descriptions.len() == self.columns.len(),
            MetadataLengthMismatchSnafu {
                field: "VariableDescriptions",
                entries: descriptions.len(),
                columns: self.columns.len(),
            }
        );
        self.descriptions = descriptions;
        Ok(self)
    }

    /// Replaces the per-column units.
    ///
    /// # Errors
    /// Returns [`TableError::MetadataLengthMismatch`] unless exactly one
    /// entry per column is supplied.
    pub fn with_units(mut self, units: Vec<ByteString>) -> Result<Self, TableError> {
        ensure!(
            units.len() == self.columns.len(),
            MetadataLengthMismatchSnafu {
                field: "VariableUnits",
                entries: units.len(),
                columns: self.columns.len(),
            }
        );
        self.units = units;
        Ok(self)
    }

    /// The columns, in order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Column names, in column order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(Column::name)
    }

    /// Per-column descriptions, aligned to column order.
    pub fn descriptions(&self) -> &[ByteString] {
        &self.descriptions
    }

    /// Per-column units, aligned to column order.
    pub fn units(&self) -> &[ByteString] {
        &self.units
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows (zero for a table with no columns).
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    /// Whether this is the canonical empty table.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
