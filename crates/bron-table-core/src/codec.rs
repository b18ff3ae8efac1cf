//! Codec between the tabular model and the BRON container layout.
//!
//! This module implements the recursive encode/decode algorithm and
//! defines the wire conventions shared by both directions. The layout is
//! designed to be consumed by numeric-computing tooling that expects an
//! explicit type tag per stored entity.
//!
//! ## Wire layout (high level)
//!
//! ```text
//! <root>                              # attrs: BRON_VERSION = [major, minor]
//!   <key>/                            # one group per collection entry
//!     History/  Tube/  Well/          # one table node per GMW field
//! ```
//!
//! Each table node looks like:
//!
//! ```text
//! <table>                             # attrs: matlab_type = "table"
//!   VariableNames        (cellstr)    # column names, in column order
//!   VariableDescriptions (cellstr)    # one byte-string per column
//!   VariableUnits        (cellstr)    # one byte-string per column
//!   <column>             (tagged)     # dataset per scalar column, or:
//!   <column>/                         # attrs: matlab_type = "table"
//!     Element1/ .. ElementN/          # one table node per row, one-based
//!     VariableNames        (cellstr)  # the single column name
//!     VariableDescriptions (cellstr)  # empty
//!     VariableUnits        (cellstr)  # empty
//! ```
//!
//! A stored table with zero column names, or exactly one name equal to
//! `Var1`, is an empty-table marker and decodes to the canonical empty
//! table no matter what else was written (see [`decode::is_empty_marker`]).
//!
//! Tags are written on encode and trusted on decode; they are never
//! re-inferred from stored values.

pub mod decode;
pub mod encode;
pub mod version;

pub use decode::{DecodeError, read_table};
pub use encode::{EncodeError, write_table};
pub use version::{BRON_VERSION, FormatVersion, VersionError, check_version, write_version};

/// Attribute carrying the type tag of every stored table and column.
pub const TYPE_TAG_ATTR: &str = "matlab_type";

/// Attribute on the root group carrying the `[major, minor]` format version.
pub const VERSION_ATTR: &str = "BRON_VERSION";

/// Dataset holding the column names of a table node.
pub const VARIABLE_NAMES: &str = "VariableNames";

/// Dataset holding one description byte-string per column.
pub const VARIABLE_DESCRIPTIONS: &str = "VariableDescriptions";

/// Dataset holding one unit byte-string per column.
pub const VARIABLE_UNITS: &str = "VariableUnits";

/// Column name that marks a stored single-column table as empty.
///
/// Compatibility shim: the upstream tool names a single anonymous column
/// `Var1`, and such tables denote "no data". A real single column that is
/// legitimately named `Var1` is indistinguishable and also decodes as
/// empty; this is intentional and must not be "fixed" without a
/// compatibility break.
pub const EMPTY_TABLE_SENTINEL: &str = "Var1";

/// Prefix for the one-based child names of a nested-table column
/// (`Element1`, `Element2`, ...).
pub const ELEMENT_PREFIX: &str = "Element";
