//! Recursive table encoder.
//!
//! Writes a [`Table`] (columns plus metadata) into a destination group,
//! recursing into nested-table columns. One metadata writer serves both a
//! table node and a nested-column node, since the wire treats a nested
//! column as a one-column table whose rows are the `Element<i>` children.
//!
//! Writes are not transactional: a failure partway through leaves a
//! partially-written group, and the caller owns cleanup of a failed
//! destination (stage into a scratch group and publish on success when
//! atomicity matters).

use snafu::prelude::*;

use crate::codec::{
    ELEMENT_PREFIX, TYPE_TAG_ATTR, VARIABLE_DESCRIPTIONS, VARIABLE_NAMES, VARIABLE_UNITS,
};
use crate::container::{AttrValue, ContainerError, DatasetData, Group};
use crate::table::{ByteString, CellType, CellValue, Column, Table, TypeInferenceError};

/// General result type used by encode operations.
pub type EncodeResult<T> = Result<T, EncodeError>;

/// Errors raised while encoding a table into a group.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum EncodeError {
    /// A column's elements do not admit a single type tag.
    #[snafu(display("cannot encode table: {source}"))]
    TypeInference {
        /// The underlying inference failure, naming the column.
        source: TypeInferenceError,
    },

    /// The destination group rejected a write (for example, a name
    /// collision with an existing child).
    #[snafu(display("container rejected write of {name}: {source}"))]
    Write {
        /// Name of the child that could not be written.
        name: String,
        /// The underlying container error.
        source: ContainerError,
    },

    /// A column's elements disagree with its inferred tag. This guards
    /// the conversion to a homogeneous dataset; a well-formed column
    /// never triggers it.
    #[snafu(display("column {column} mixes element types"))]
    MixedColumn {
        /// Name of the offending column.
        column: String,
    },
}

/// Writes `table` (metadata first, then every column in order) under
/// `group`.
///
/// # Errors
/// Propagates type-inference failures and container write rejections.
/// Already-written children are not rolled back.
pub fn write_table(group: &mut Group, table: &Table) -> EncodeResult<()> {
    let names: Vec<ByteString> = table
        .column_names()
        .map(|name| name.as_bytes().to_vec())
        .collect();
    write_table_metadata(group, &names, table.descriptions(), table.units())?;
    for column in table.columns() {
        write_column(group, column)?;
    }
    Ok(())
}

/// Tags `group` as a table and writes the three metadata datasets.
///
/// Shared between a table node and a nested-column node: the latter
/// passes its single column name and empty description/unit sequences.
fn write_table_metadata(
    group: &mut Group,
    names: &[ByteString],
    descriptions: &[ByteString],
    units: &[ByteString],
) -> EncodeResult<()> {
    group.set_attr(TYPE_TAG_ATTR, tag_attr(CellType::Table));
    write_cellstr_dataset(group, VARIABLE_NAMES, names)?;
    write_cellstr_dataset(group, VARIABLE_DESCRIPTIONS, descriptions)?;
    write_cellstr_dataset(group, VARIABLE_UNITS, units)?;
    Ok(())
}

fn write_cellstr_dataset(group: &mut Group, name: &str, entries: &[ByteString]) -> EncodeResult<()> {
    let dataset = group
        .create_dataset(name, DatasetData::Bytes(entries.to_vec()))
        .context(WriteSnafu { name })?;
    dataset.set_attr(TYPE_TAG_ATTR, tag_attr(CellType::Cellstr));
    Ok(())
}

fn write_column(group: &mut Group, column: &Column) -> EncodeResult<()> {
    match column.infer_type().context(TypeInferenceSnafu)? {
        CellType::Table => write_nested_column(group, column),
        tag => write_scalar_column(group, column, tag),
    }
}

/// Writes a nested-table column: a `table`-tagged child group holding one
/// `Element<i>` table node per row (one-based), plus the single-column
/// metadata view of the column itself.
fn write_nested_column(group: &mut Group, column: &Column) -> EncodeResult<()> {
    let child = group
        .create_group(column.name())
        .context(WriteSnafu { name: column.name() })?;
    child.set_attr(TYPE_TAG_ATTR, tag_attr(CellType::Table));

    for (i, value) in column.values().iter().enumerate() {
        let CellValue::Table(nested) = value else {
            return MixedColumnSnafu { column: column.name() }.fail();
        };
        let element_name = format!("{ELEMENT_PREFIX}{}", i + 1);
        let element = child
            .create_group(&element_name)
            .context(WriteSnafu { name: element_name.as_str() })?;
        write_table(element, nested)?;
    }

    write_table_metadata(child, &[column.name().as_bytes().to_vec()], &[], &[])
}

fn write_scalar_column(group: &mut Group, column: &Column, tag: CellType) -> EncodeResult<()> {
    let data = scalar_dataset(column, tag)?;
    let dataset = group
        .create_dataset(column.name(), data)
        .context(WriteSnafu { name: column.name() })?;
    dataset.set_attr(TYPE_TAG_ATTR, tag_attr(tag));
    Ok(())
}

fn tag_attr(tag: CellType) -> AttrValue {
    AttrValue::Bytes(tag.as_tag().as_bytes().to_vec())
}

/// Converts a uniformly-typed column into the matching homogeneous
/// dataset array.
fn scalar_dataset(column: &Column, tag: CellType) -> EncodeResult<DatasetData> {
    let data = match tag {
        CellType::Int8 => DatasetData::Int8(extract(column, |v| match v {
            CellValue::Int8(x) => Some(*x),
            _ => None,
        })?),
        CellType::Int16 => DatasetData::Int16(extract(column, |v| match v {
            CellValue::Int16(x) => Some(*x),
            _ => None,
        })?),
        CellType::Int32 => DatasetData::Int32(extract(column, |v| match v {
            CellValue::Int32(x) => Some(*x),
            _ => None,
        })?),
        CellType::Int64 => DatasetData::Int64(extract(column, |v| match v {
            CellValue::Int64(x) => Some(*x),
            _ => None,
        })?),
        CellType::Uint8 => DatasetData::Uint8(extract(column, |v| match v {
            CellValue::Uint8(x) => Some(*x),
            _ => None,
        })?),
        CellType::Uint16 => DatasetData::Uint16(extract(column, |v| match v {
            CellValue::Uint16(x) => Some(*x),
            _ => None,
        })?),
        CellType::Uint32 => DatasetData::Uint32(extract(column, |v| match v {
            CellValue::Uint32(x) => Some(*x),
            _ => None,
        })?),
        CellType::Uint64 => DatasetData::Uint64(extract(column, |v| match v {
            CellValue::Uint64(x) => Some(*x),
            _ => None,
        })?),
        CellType::Float32 => DatasetData::Float32(extract(column, |v| match v {
            CellValue::Float32(x) => Some(*x),
            _ => None,
        })?),
        CellType::Float64 => DatasetData::Float64(extract(column, |v| match v {
            CellValue::Float64(x) => Some(*x),
            _ => None,
        })?),
        CellType::Bool => DatasetData::Bool(extract(column, |v| match v {
            CellValue::Bool(x) => Some(*x),
            _ => None,
        })?),
        CellType::Cellstr => DatasetData::Bytes(extract(column, |v| match v {
            CellValue::Bytes(x) => Some(x.clone()),
            _ => None,
        })?),
        CellType::Table => return MixedColumnSnafu { column: column.name() }.fail(),
    };
    Ok(data)
}

fn extract<T>(
    column: &Column,
    pick: impl Fn(&CellValue) -> Option<T>,
) -> EncodeResult<Vec<T>> {
    column
        .values()
        .iter()
        .map(|value| {
            pick(value).context(MixedColumnSnafu {
                column: column.name(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode::read_table;

    fn encoded(table: &Table) -> Group {
        let mut group = Group::new();
        write_table(&mut group, table).expect("encode");
        group
    }

    #[test]
    fn table_node_carries_tagged_metadata_datasets() {
        let table = Table::new(vec![Column::int64s("depth", [1, 2])]).expect("table");
        let group = encoded(&table);

        assert_eq!(
            group.attr(TYPE_TAG_ATTR),
            Some(&AttrValue::Bytes(b"table".to_vec()))
        );
        let names = group.dataset(VARIABLE_NAMES).expect("names dataset");
        assert_eq!(names.data(), &DatasetData::Bytes(vec![b"depth".to_vec()]));
        assert_eq!(
            names.attr(TYPE_TAG_ATTR),
            Some(&AttrValue::Bytes(b"cellstr".to_vec()))
        );
        for meta in [VARIABLE_DESCRIPTIONS, VARIABLE_UNITS] {
            let dataset = group.dataset(meta).expect("metadata dataset");
            assert_eq!(dataset.data(), &DatasetData::Bytes(vec![Vec::new()]));
        }
    }

    #[test]
    fn scalar_columns_become_tagged_datasets() {
        let table = Table::new(vec![
            Column::float64s("level", [1.5, 2.5]),
            Column::strings("id", ["a", "b"]),
        ])
        .expect("table");
        let group = encoded(&table);

        let level = group.dataset("level").expect("level dataset");
        assert_eq!(level.data(), &DatasetData::Float64(vec![1.5, 2.5]));
        assert_eq!(
            level.attr(TYPE_TAG_ATTR),
            Some(&AttrValue::Bytes(b"float64".to_vec()))
        );

        let id = group.dataset("id").expect("id dataset");
        assert_eq!(
            id.attr(TYPE_TAG_ATTR),
            Some(&AttrValue::Bytes(b"cellstr".to_vec()))
        );
    }

    #[test]
    fn nested_columns_use_one_based_element_names() {
        let inner = Table::new(vec![Column::int64s("x", [1])]).expect("inner");
        let table = Table::new(vec![
            Column::int64s("row", [1, 2]),
            Column::tables("filters", [inner.clone(), inner]),
        ])
        .expect("outer");
        let group = encoded(&table);

        let filters = group.group("filters").expect("nested group");
        assert_eq!(
            filters.attr(TYPE_TAG_ATTR),
            Some(&AttrValue::Bytes(b"table".to_vec()))
        );
        assert!(filters.group("Element1").is_ok());
        assert!(filters.group("Element2").is_ok());
        assert!(filters.child("Element0").is_err());

        // The nested node's own metadata is the single-column view.
        let names = filters.dataset(VARIABLE_NAMES).expect("nested names");
        assert_eq!(names.data(), &DatasetData::Bytes(vec![b"filters".to_vec()]));
        let descriptions = filters
            .dataset(VARIABLE_DESCRIPTIONS)
            .expect("nested descriptions");
        assert!(descriptions.is_empty());
    }

    #[test]
    fn mixed_columns_abort_the_encode() {
        let column = Column::new(
            "broken",
            vec![CellValue::Int64(1), CellValue::Bool(true)],
        );
        let table = Table::new(vec![column]).expect("table");
        let mut group = Group::new();
        let err = write_table(&mut group, &table).unwrap_err();
        assert!(matches!(
            err,
            EncodeError::TypeInference {
                source: TypeInferenceError::MixedTypes { .. }
            }
        ));
    }

    #[test]
    fn encode_then_decode_preserves_scalar_values() {
        let table = Table::new(vec![
            Column::int64s("a", [3, 1, 2]),
            Column::bools("b", [true, false, true]),
        ])
        .expect("table");
        let group = encoded(&table);
        assert_eq!(read_table(&group).expect("decode"), table);
    }
}
