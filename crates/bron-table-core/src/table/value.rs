//! Column element values and their wire type tags.
//!
//! [`CellValue`] is an explicit tagged union: a column is a sequence of
//! these, so the type of every element is fixed at table-build time and
//! tagging reduces to a pure match over the variant. [`CellType`] is the
//! matching payload-free tag, with the exact spelling stored on the wire.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use crate::table::Table;

/// The semantic type tag stored alongside every encoded table and column.
///
/// Wire names are the historical numpy dtype names, with byte-string
/// content normalized to `cellstr` and nested tables tagged `table`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellType {
    /// 8-bit signed integer (`int8`).
    Int8,
    /// 16-bit signed integer (`int16`).
    Int16,
    /// 32-bit signed integer (`int32`).
    Int32,
    /// 64-bit signed integer (`int64`).
    Int64,
    /// 8-bit unsigned integer (`uint8`).
    Uint8,
    /// 16-bit unsigned integer (`uint16`).
    Uint16,
    /// 32-bit unsigned integer (`uint32`).
    Uint32,
    /// 64-bit unsigned integer (`uint64`).
    Uint64,
    /// 32-bit float (`float32`).
    Float32,
    /// 64-bit float (`float64`).
    Float64,
    /// Boolean (`bool`).
    Bool,
    /// Byte-string / string content (`cellstr`).
    Cellstr,
    /// Nested-table column or table-as-group (`table`).
    Table,
}

impl CellType {
    /// The tag exactly as written to the wire.
    pub fn as_tag(&self) -> &'static str {
        match self {
            CellType::Int8 => "int8",
            CellType::Int16 => "int16",
            CellType::Int32 => "int32",
            CellType::Int64 => "int64",
            CellType::Uint8 => "uint8",
            CellType::Uint16 => "uint16",
            CellType::Uint32 => "uint32",
            CellType::Uint64 => "uint64",
            CellType::Float32 => "float32",
            CellType::Float64 => "float64",
            CellType::Bool => "bool",
            CellType::Cellstr => "cellstr",
            CellType::Table => "table",
        }
    }

    /// All tags, in wire spelling; handy for exhaustive tests.
    pub const ALL: [CellType; 13] = [
        CellType::Int8,
        CellType::Int16,
        CellType::Int32,
        CellType::Int64,
        CellType::Uint8,
        CellType::Uint16,
        CellType::Uint32,
        CellType::Uint64,
        CellType::Float32,
        CellType::Float64,
        CellType::Bool,
        CellType::Cellstr,
        CellType::Table,
    ];
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Errors produced when parsing a stored type tag.
#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum ParseCellTypeError {
    /// The tag is not one of the known wire spellings.
    #[snafu(display("unknown type tag '{tag}'"))]
    UnknownTag {
        /// The tag as found on the wire.
        tag: String,
    },
}

impl FromStr for CellType {
    type Err = ParseCellTypeError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "int8" => Ok(CellType::Int8),
            "int16" => Ok(CellType::Int16),
            "int32" => Ok(CellType::Int32),
            "int64" => Ok(CellType::Int64),
            "uint8" => Ok(CellType::Uint8),
            "uint16" => Ok(CellType::Uint16),
            "uint32" => Ok(CellType::Uint32),
            "uint64" => Ok(CellType::Uint64),
            "float32" => Ok(CellType::Float32),
            "float64" => Ok(CellType::Float64),
            "bool" => Ok(CellType::Bool),
            "cellstr" => Ok(CellType::Cellstr),
            "table" => Ok(CellType::Table),
            other => UnknownTagSnafu { tag: other }.fail(),
        }
    }
}

/// A single column element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    /// 8-bit signed integer.
    Int8(i8),
    /// 16-bit signed integer.
    Int16(i16),
    /// 32-bit signed integer.
    Int32(i32),
    /// 64-bit signed integer.
    Int64(i64),
    /// 8-bit unsigned integer.
    Uint8(u8),
    /// 16-bit unsigned integer.
    Uint16(u16),
    /// 32-bit unsigned integer.
    Uint32(u32),
    /// 64-bit unsigned integer.
    Uint64(u64),
    /// 32-bit float.
    Float32(f32),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// Byte-string.
    Bytes(Vec<u8>),
    /// Nested table.
    Table(Table),
}

impl CellValue {
    /// The tag this value carries.
    pub fn cell_type(&self) -> CellType {
        match self {
            CellValue::Int8(_) => CellType::Int8,
            CellValue::Int16(_) => CellType::Int16,
            CellValue::Int32(_) => CellType::Int32,
            CellValue::Int64(_) => CellType::Int64,
            CellValue::Uint8(_) => CellType::Uint8,
            CellValue::Uint16(_) => CellType::Uint16,
            CellValue::Uint32(_) => CellType::Uint32,
            CellValue::Uint64(_) => CellType::Uint64,
            CellValue::Float32(_) => CellType::Float32,
            CellValue::Float64(_) => CellType::Float64,
            CellValue::Bool(_) => CellType::Bool,
            CellValue::Bytes(_) => CellType::Cellstr,
            CellValue::Table(_) => CellType::Table,
        }
    }
}
