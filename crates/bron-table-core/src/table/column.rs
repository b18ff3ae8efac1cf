//! Columns and type-tag inference.
//!
//! A column is a named sequence of [`CellValue`] elements. Inference of
//! the column's wire tag is a pure function over those elements; it never
//! touches the container and has no side effects, so the same column
//! always infers the same tag.

use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use crate::table::{
    Table,
    value::{CellType, CellValue},
};

/// Errors raised when a column's elements do not admit a single type tag.
#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum TypeInferenceError {
    /// The column has no elements, so no tag can be established.
    #[snafu(display("cannot infer a type tag for empty column {column}"))]
    EmptyColumn {
        /// Name of the offending column.
        column: String,
    },

    /// The column mixes elements of more than one type.
    #[snafu(display("column {column} mixes element types: {}", found.join(", ")))]
    MixedTypes {
        /// Name of the offending column.
        column: String,
        /// The distinct tags found, in first-seen order.
        found: Vec<String>,
    },
}

/// A named, ordered sequence of cell values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    name: String,
    values: Vec<CellValue>,
}

impl Column {
    /// Creates a column from raw cell values.
    pub fn new(name: impl Into<String>, values: Vec<CellValue>) -> Self {
        Column {
            name: name.into(),
            values,
        }
    }

    /// Convenience constructor for a 64-bit integer column.
    pub fn int64s(name: impl Into<String>, values: impl IntoIterator<Item = i64>) -> Self {
        Column::new(name, values.into_iter().map(CellValue::Int64).collect())
    }

    /// Convenience constructor for a 64-bit float column.
    pub fn float64s(name: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        Column::new(name, values.into_iter().map(CellValue::Float64).collect())
    }

    /// Convenience constructor for a boolean column.
    pub fn bools(name: impl Into<String>, values: impl IntoIterator<Item = bool>) -> Self {
        Column::new(name, values.into_iter().map(CellValue::Bool).collect())
    }

    /// Convenience constructor for a byte-string column from UTF-8 text.
    pub fn strings<S: Into<String>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        Column::new(
            name,
            values
                .into_iter()
                .map(|s| CellValue::Bytes(s.into().into_bytes()))
                .collect(),
        )
    }

    /// Convenience constructor for a nested-table column.
    pub fn tables(name: impl Into<String>, values: impl IntoIterator<Item = Table>) -> Self {
        Column::new(name, values.into_iter().map(CellValue::Table).collect())
    }

    /// The column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The column's elements, in row order.
    pub fn values(&self) -> &[CellValue] {
        &self.values
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Infers the wire type tag for this column.
    ///
    /// A column whose elements are all nested tables tags as
    /// [`CellType::Table`]; otherwise the elements must share exactly one
    /// tag (byte-strings count as `cellstr`).
    ///
    /// # Errors
    /// Returns [`TypeInferenceError::EmptyColumn`] for a zero-row column
    /// and [`TypeInferenceError::MixedTypes`] when more than one distinct
    /// element type is present.
    pub fn infer_type(&self) -> Result<CellType, TypeInferenceError> {
        ensure!(
            !self.values.is_empty(),
            EmptyColumnSnafu {
                column: self.name.as_str()
            }
        );

        if self
            .values
            .iter()
            .all(|value| matches!(value, CellValue::Table(_)))
        {
            return Ok(CellType::Table);
        }

        let mut found: Vec<CellType> = Vec::new();
        for value in &self.values {
            let tag = value.cell_type();
            if !found.contains(&tag) {
                found.push(tag);
            }
        }

        match found.as_slice() {
            [single] => Ok(*single),
            _ => MixedTypesSnafu {
                column: self.name.as_str(),
                found: found.iter().map(CellType::to_string).collect::<Vec<_>>(),
            }
            .fail(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn homogeneous_scalar_columns_infer_their_tag() {
        let cases = [
            (Column::int64s("depth", [1, 2, 3]), CellType::Int64),
            (Column::float64s("level", [1.5, 2.5]), CellType::Float64),
            (Column::bools("active", [true, false]), CellType::Bool),
            (Column::strings("id", ["GMW1", "GMW2"]), CellType::Cellstr),
        ];
        for (column, expected) in cases {
            assert_eq!(column.infer_type().expect("homogeneous"), expected);
        }
    }

    #[test]
    fn nested_table_columns_infer_table() {
        let column = Column::tables("filters", [Table::empty(), Table::empty()]);
        assert_eq!(column.infer_type().expect("nested"), CellType::Table);
    }

    #[test]
    fn inference_is_deterministic() {
        let column = Column::int64s("depth", [1, 2]);
        assert_eq!(
            column.infer_type().expect("first"),
            column.infer_type().expect("second")
        );
    }

    #[test]
    fn mixed_columns_fail_and_name_the_column() {
        let column = Column::new(
            "broken",
            vec![CellValue::Int64(1), CellValue::Bytes(b"two".to_vec())],
        );
        let err = column.infer_type().unwrap_err();
        assert!(
            matches!(
                &err,
                TypeInferenceError::MixedTypes { column, found }
                    if column == "broken" && found == &["int64", "cellstr"]
            ),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn partially_nested_columns_fail() {
        let column = Column::new(
            "half",
            vec![CellValue::Table(Table::empty()), CellValue::Int64(1)],
        );
        let err = column.infer_type().unwrap_err();
        assert!(matches!(err, TypeInferenceError::MixedTypes { .. }));
    }

    #[test]
    fn empty_columns_fail_with_a_dedicated_error() {
        let column = Column::new("void", Vec::new());
        let err = column.infer_type().unwrap_err();
        assert!(matches!(err, TypeInferenceError::EmptyColumn { column } if column == "void"));
    }

    #[test]
    fn integer_widths_are_distinct_tags() {
        let column = Column::new("w", vec![CellValue::Int32(1), CellValue::Int64(2)]);
        assert!(matches!(
            column.infer_type().unwrap_err(),
            TypeInferenceError::MixedTypes { .. }
        ));
    }
}
