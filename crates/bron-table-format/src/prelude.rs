//! Wrapper prelude.
//!
//! The `bron-table-format` crate is the supported public entry point.
//! Downstream code should prefer importing from this prelude instead of
//! depending on internal core module paths.

pub use crate::container;
pub use crate::{
    BRON_VERSION, CellType, CellValue, Column, DecodeError, EncodeError, FormatVersion, Gmw,
    GmwCollection, Table, TableError, TypeInferenceError, VersionError, check_version, read_gmws,
    read_table, write_gmws, write_table, write_version,
};
