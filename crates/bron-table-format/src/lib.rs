//! # bron-table-format
//!
//! Tagged-table codec for BRON containers: tables of named columns
//! (possibly nesting other tables) encoded into a hierarchical,
//! attributed container layout with explicit type tags per stored
//! entity, under a major-version compatibility gate.
//!
//! This crate is the supported public entry point and provides a small,
//! stable surface over `bron-table-core`.
//!
//! ## Example
//!
//! ```rust,ignore
//! use bron_table_format::prelude::*;
//! ```
#![deny(missing_docs)]

/// Convenience prelude with the stable, supported surface.
pub mod prelude;

/// Container namespace (wrapper-only).
pub mod container {
    pub use bron_table_core::container::{
        AttrValue, ContainerError, Dataset, DatasetData, Group, Node,
    };
}

pub use bron_table_core::codec::{
    BRON_VERSION, DecodeError, EncodeError, FormatVersion, VersionError, check_version,
    read_table, write_table, write_version,
};
pub use bron_table_core::gmw::{Gmw, GmwCollection, read_gmws, write_gmws};
pub use bron_table_core::table::{
    CellType, CellValue, Column, Table, TableError, TypeInferenceError,
};
