//! Core codec for the BRON hierarchical container layout.
//!
//! This crate provides the foundational pieces for `bron-table-format`:
//!
//! - An in-memory tabular data model with an explicit tagged-union cell
//!   type, so every column is representable and type tagging is a pure
//!   match instead of runtime reflection (`table` module).
//! - A minimal in-memory hierarchical attributed container (groups,
//!   datasets, attributes) standing in for the storage collaborator
//!   that historically was an HDF5 file (`container` module).
//! - The recursive encode/decode algorithm between tables and container
//!   nodes, including the version gate and the empty-table marker
//!   convention (`codec` module).
//! - The fixed three-table `GMW` aggregate and its keyed collection
//!   persisted under a versioned root (`gmw` module).
//!
//! Higher-level integration crates are expected to depend on this core
//! crate rather than re-implementing the wire conventions.
#![deny(missing_docs)]
pub mod codec;
pub mod container;
pub mod gmw;
pub mod table;
