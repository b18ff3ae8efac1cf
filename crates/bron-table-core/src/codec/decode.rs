//! Recursive table decoder.
//!
//! Reads a group previously written by [`crate::codec::encode`] (or a
//! version-compatible writer) back into a [`Table`], consulting stored
//! type tags instead of re-inferring them. Most of the format's
//! edge-case policy lives here:
//!
//! - The empty-table marker (zero columns, or the `Var1` sentinel)
//!   canonicalizes to the empty table without reading further fields.
//! - Empty or absent description/unit arrays are synthesized as one
//!   empty byte-string per column, so metadata always aligns with the
//!   columns.
//! - The row count comes from the first stored scalar column; a table
//!   stored with only nested-table columns is rejected explicitly (the
//!   format assumes at least one scalar column per table).

use log::debug;
use snafu::prelude::*;

use crate::codec::{
    ELEMENT_PREFIX, EMPTY_TABLE_SENTINEL, TYPE_TAG_ATTR, VARIABLE_DESCRIPTIONS, VARIABLE_NAMES,
    VARIABLE_UNITS,
    version::VersionError,
};
use crate::container::{AttrValue, ContainerError, DatasetData, Group, Node};
use crate::table::{
    ByteString, CellType, CellValue, Column, ParseCellTypeError, Table, TableError,
};

/// General result type used by decode operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Errors raised while decoding a group back into a table.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DecodeError {
    /// An expected child, dataset, or group was absent or of the wrong
    /// kind.
    #[snafu(display("container lookup failed for {name}: {source}"))]
    Lookup {
        /// The name that failed to resolve.
        name: String,
        /// The underlying container error.
        source: ContainerError,
    },

    /// The root's version attribute failed the compatibility gate.
    #[snafu(display("version gate refused the container: {source}"))]
    Version {
        /// The underlying version error.
        source: VersionError,
    },

    /// A stored column name is not valid UTF-8.
    #[snafu(display("stored column name {name} is not valid UTF-8"))]
    NonUtf8ColumnName {
        /// Lossy rendering of the offending name.
        name: String,
    },

    /// A metadata dataset does not hold byte-strings.
    #[snafu(display("metadata dataset {name} does not hold byte-strings"))]
    MetadataNotCellstr {
        /// Name of the offending dataset.
        name: String,
    },

    /// A stored column carries no type tag attribute.
    #[snafu(display("column {column} carries no type tag attribute"))]
    MissingTypeTag {
        /// Name of the offending column.
        column: String,
    },

    /// A stored column's type tag attribute is not a UTF-8 byte-string.
    #[snafu(display("column {column} has a malformed type tag attribute"))]
    MalformedTypeTag {
        /// Name of the offending column.
        column: String,
    },

    /// A stored column's type tag is not a known tag.
    #[snafu(display("column {column}: {source}"))]
    UnknownTypeTag {
        /// Name of the offending column.
        column: String,
        /// The underlying parse failure.
        source: ParseCellTypeError,
    },

    /// Every stored column is a nested-table group, so no row count can
    /// be established.
    #[snafu(display(
        "table has only nested-table columns ({}), cannot establish a row count",
        columns.join(", ")
    ))]
    NoScalarColumn {
        /// The stored column names.
        columns: Vec<String>,
    },

    /// The stored structure decodes to a table that violates the model's
    /// invariants (for example, duplicate column names).
    #[snafu(display("decoded table is malformed: {source}"))]
    InvalidTable {
        /// The underlying table construction error.
        source: TableError,
    },
}

/// Whether stored column names denote the empty-table marker: no columns
/// at all, or exactly one column named by the sentinel.
///
/// Compatibility shim for the upstream tool's default naming of single
/// anonymous columns; see [`crate::codec::EMPTY_TABLE_SENTINEL`]. A real
/// single column literally named `Var1` also matches, by design.
pub fn is_empty_marker(names: &[ByteString]) -> bool {
    names.is_empty()
        || (names.len() == 1 && names[0].as_slice() == EMPTY_TABLE_SENTINEL.as_bytes())
}

/// Reads the table stored under `group`.
///
/// # Errors
/// Propagates container lookup failures and malformed-structure
/// conditions; see [`DecodeError`]. The empty-table marker is not an
/// error: it decodes to the canonical empty table.
pub fn read_table(group: &Group) -> DecodeResult<Table> {
    let raw_names = read_cellstr_dataset(group, VARIABLE_NAMES)?;
    if is_empty_marker(&raw_names) {
        debug!("stored table is an empty-table marker; returning the canonical empty table");
        return Ok(Table::empty());
    }

    let names = raw_names
        .iter()
        .map(|raw| {
            String::from_utf8(raw.clone()).map_err(|source| DecodeError::NonUtf8ColumnName {
                name: String::from_utf8_lossy(source.as_bytes()).into_owned(),
            })
        })
        .collect::<DecodeResult<Vec<String>>>()?;

    let descriptions = read_metadata(group, VARIABLE_DESCRIPTIONS, names.len())?;
    let units = read_metadata(group, VARIABLE_UNITS, names.len())?;
    let rows = row_count(group, &names)?;

    let mut columns = Vec::with_capacity(names.len());
    for name in &names {
        columns.push(read_column(group, name, rows)?);
    }

    Table::new(columns)
        .and_then(|table| table.with_descriptions(descriptions))
        .and_then(|table| table.with_units(units))
        .context(InvalidTableSnafu)
}

/// Reads a byte-string dataset, failing if it holds anything else.
fn read_cellstr_dataset(group: &Group, name: &str) -> DecodeResult<Vec<ByteString>> {
    let dataset = group.dataset(name).context(LookupSnafu { name })?;
    match dataset.data() {
        DatasetData::Bytes(entries) => Ok(entries.clone()),
        _ => MetadataNotCellstrSnafu { name }.fail(),
    }
}

/// Reads a description/unit array, synthesizing one empty byte-string per
/// column when the stored array is empty or absent.
fn read_metadata(group: &Group, name: &str, columns: usize) -> DecodeResult<Vec<ByteString>> {
    let stored = match group.dataset(name) {
        Ok(dataset) => match dataset.data() {
            DatasetData::Bytes(entries) => entries.clone(),
            _ => return MetadataNotCellstrSnafu { name }.fail(),
        },
        Err(ContainerError::ChildNotFound { .. }) => Vec::new(),
        Err(source) => return Err(source).context(LookupSnafu { name }),
    };
    if stored.is_empty() {
        Ok(vec![ByteString::new(); columns])
    } else {
        Ok(stored)
    }
}

/// Establishes the row count from the first stored scalar column.
fn row_count(group: &Group, names: &[String]) -> DecodeResult<usize> {
    for name in names {
        if let Node::Dataset(dataset) = group
            .child(name)
            .context(LookupSnafu { name: name.as_str() })?
        {
            return Ok(dataset.len());
        }
    }
    NoScalarColumnSnafu {
        columns: names.to_vec(),
    }
    .fail()
}

fn read_column(group: &Group, name: &str, rows: usize) -> DecodeResult<Column> {
    let node = group.child(name).context(LookupSnafu { name })?;
    match read_type_tag(node, name)? {
        CellType::Table => read_nested_column(group, name, rows),
        _ => {
            let dataset = group.dataset(name).context(LookupSnafu { name })?;
            Ok(Column::new(name, cells_from_dataset(dataset.data())))
        }
    }
}

/// Decodes the one-based `Element1 ..= Element<rows>` children of a
/// nested-table column, in ascending order.
fn read_nested_column(group: &Group, name: &str, rows: usize) -> DecodeResult<Column> {
    let child = group.group(name).context(LookupSnafu { name })?;
    let mut values = Vec::with_capacity(rows);
    for i in 1..=rows {
        let element_name = format!("{ELEMENT_PREFIX}{i}");
        let element = child.group(&element_name).context(LookupSnafu {
            name: element_name.as_str(),
        })?;
        values.push(CellValue::Table(read_table(element)?));
    }
    Ok(Column::new(name, values))
}

/// Reads and parses the stored type tag attribute of a column node.
fn read_type_tag(node: &Node, column: &str) -> DecodeResult<CellType> {
    let attr = node
        .attr(TYPE_TAG_ATTR)
        .context(MissingTypeTagSnafu { column })?;
    let AttrValue::Bytes(raw) = attr else {
        return MalformedTypeTagSnafu { column }.fail();
    };
    let tag = std::str::from_utf8(raw)
        .ok()
        .context(MalformedTypeTagSnafu { column })?;
    tag.parse().context(UnknownTypeTagSnafu { column })
}

/// Converts a stored homogeneous array back into cell values, verbatim.
fn cells_from_dataset(data: &DatasetData) -> Vec<CellValue> {
    match data {
        DatasetData::Int8(values) => values.iter().copied().map(CellValue::Int8).collect(),
        DatasetData::Int16(values) => values.iter().copied().map(CellValue::Int16).collect(),
        DatasetData::Int32(values) => values.iter().copied().map(CellValue::Int32).collect(),
        DatasetData::Int64(values) => values.iter().copied().map(CellValue::Int64).collect(),
        DatasetData::Uint8(values) => values.iter().copied().map(CellValue::Uint8).collect(),
        DatasetData::Uint16(values) => values.iter().copied().map(CellValue::Uint16).collect(),
        DatasetData::Uint32(values) => values.iter().copied().map(CellValue::Uint32).collect(),
        DatasetData::Uint64(values) => values.iter().copied().map(CellValue::Uint64).collect(),
        DatasetData::Float32(values) => values.iter().copied().map(CellValue::Float32).collect(),
        DatasetData::Float64(values) => values.iter().copied().map(CellValue::Float64).collect(),
        DatasetData::Bool(values) => values.iter().copied().map(CellValue::Bool).collect(),
        DatasetData::Bytes(values) => values.iter().cloned().map(CellValue::Bytes).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode::write_table;

    #[test]
    fn empty_marker_fires_on_zero_names_and_the_sentinel() {
        assert!(is_empty_marker(&[]));
        assert!(is_empty_marker(&[b"Var1".to_vec()]));
        assert!(!is_empty_marker(&[b"Var1".to_vec(), b"x".to_vec()]));
        assert!(!is_empty_marker(&[b"depth".to_vec()]));
    }

    #[test]
    fn sentinel_named_table_decodes_as_empty_even_with_real_data() {
        let table = Table::new(vec![Column::int64s("Var1", [1, 2, 3])]).expect("table");
        let mut group = Group::new();
        write_table(&mut group, &table).expect("encode");

        let decoded = read_table(&group).expect("decode");
        assert_eq!(decoded, Table::empty());
    }

    #[test]
    fn missing_variable_names_is_a_lookup_error() {
        let group = Group::new();
        let err = read_table(&group).unwrap_err();
        assert!(matches!(err, DecodeError::Lookup { name, .. } if name == VARIABLE_NAMES));
    }

    #[test]
    fn empty_stored_metadata_synthesizes_per_column_empties() {
        // Lay out the table the way the original writer did for absent
        // metadata: empty description/unit arrays rather than aligned ones.
        let mut group = Group::new();
        group
            .create_dataset(VARIABLE_NAMES, DatasetData::Bytes(vec![b"a".to_vec()]))
            .expect("names");
        group
            .create_dataset(VARIABLE_DESCRIPTIONS, DatasetData::Bytes(Vec::new()))
            .expect("descriptions");
        group
            .create_dataset(VARIABLE_UNITS, DatasetData::Bytes(Vec::new()))
            .expect("units");
        let a = group
            .create_dataset("a", DatasetData::Int64(vec![1]))
            .expect("column");
        a.set_attr(TYPE_TAG_ATTR, AttrValue::Bytes(b"int64".to_vec()));

        let decoded = read_table(&group).expect("decode");
        assert_eq!(decoded.descriptions(), &[ByteString::new()]);
        assert_eq!(decoded.units(), &[ByteString::new()]);
    }

    #[test]
    fn absent_metadata_datasets_synthesize_per_column_empties() {
        let mut group = Group::new();
        group
            .create_dataset(
                VARIABLE_NAMES,
                DatasetData::Bytes(vec![b"depth".to_vec()]),
            )
            .expect("names");
        let depth = group
            .create_dataset("depth", DatasetData::Int64(vec![4, 5]))
            .expect("column");
        depth.set_attr(TYPE_TAG_ATTR, AttrValue::Bytes(b"int64".to_vec()));

        let decoded = read_table(&group).expect("decode");
        assert_eq!(decoded.descriptions(), &[ByteString::new()]);
        assert_eq!(decoded.units(), &[ByteString::new()]);
        assert_eq!(decoded.row_count(), 2);
    }

    #[test]
    fn all_nested_columns_is_a_distinct_error() {
        let mut group = Group::new();
        group
            .create_dataset(VARIABLE_NAMES, DatasetData::Bytes(vec![b"only".to_vec()]))
            .expect("names");
        let child = group.create_group("only").expect("nested column group");
        child.set_attr(TYPE_TAG_ATTR, AttrValue::Bytes(b"table".to_vec()));

        let err = read_table(&group).unwrap_err();
        assert!(
            matches!(&err, DecodeError::NoScalarColumn { columns } if columns == &["only"]),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn unknown_stored_tags_are_rejected() {
        let mut group = Group::new();
        group
            .create_dataset(VARIABLE_NAMES, DatasetData::Bytes(vec![b"c".to_vec()]))
            .expect("names");
        let dataset = group
            .create_dataset("c", DatasetData::Float64(vec![1.0]))
            .expect("column");
        dataset.set_attr(TYPE_TAG_ATTR, AttrValue::Bytes(b"complex128".to_vec()));

        let err = read_table(&group).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownTypeTag { column, .. } if column == "c"));
    }

    #[test]
    fn missing_tag_attribute_is_rejected() {
        let mut group = Group::new();
        group
            .create_dataset(VARIABLE_NAMES, DatasetData::Bytes(vec![b"c".to_vec()]))
            .expect("names");
        group
            .create_dataset("c", DatasetData::Float64(vec![1.0]))
            .expect("column");

        let err = read_table(&group).unwrap_err();
        assert!(matches!(err, DecodeError::MissingTypeTag { column } if column == "c"));
    }

    #[test]
    fn non_utf8_column_names_are_rejected() {
        let mut group = Group::new();
        group
            .create_dataset(
                VARIABLE_NAMES,
                DatasetData::Bytes(vec![vec![0xff, 0xfe]]),
            )
            .expect("names");

        let err = read_table(&group).unwrap_err();
        assert!(matches!(err, DecodeError::NonUtf8ColumnName { .. }));
    }
}
