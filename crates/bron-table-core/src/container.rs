//! In-memory hierarchical attributed container.
//!
//! This module centralizes the container primitives the codec is written
//! against: named **groups** holding child nodes, named **datasets**
//! holding one homogeneous array each, and named **attributes** (short
//! byte-string or integer values) on both. It is the stand-in for the
//! hierarchical-storage collaborator the format was historically persisted
//! through (an HDF5 file opened by numeric-computing tooling).
//!
//! Goals of this module include:
//!
//! - Keeping node/attribute conventions in one place so the codec in
//!   [`crate::codec`] never touches raw maps.
//! - Deterministic, name-sorted child enumeration (`BTreeMap` children),
//!   matching what hierarchical storage libraries report.
//! - Leaving room for future adapters backed by an actual storage
//!   library, without rewriting the codec logic.
//!
//! No file I/O happens here; a container tree lives purely in memory and
//! can be serialized to JSON for inspection via serde.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use snafu::prelude::*;

/// General result type used by container operations.
pub type ContainerResult<T> = Result<T, ContainerError>;

/// Errors produced by container lookups and writes.
#[derive(Debug, Snafu)]
pub enum ContainerError {
    /// The group has no child with the requested name.
    #[snafu(display("no child named {name}"))]
    ChildNotFound {
        /// The name that was looked up.
        name: String,
    },

    /// A child exists under the requested name but is a dataset, not a group.
    #[snafu(display("child {name} is a dataset, expected a group"))]
    NotAGroup {
        /// The name of the offending child.
        name: String,
    },

    /// A child exists under the requested name but is a group, not a dataset.
    #[snafu(display("child {name} is a group, expected a dataset"))]
    NotADataset {
        /// The name of the offending child.
        name: String,
    },

    /// A child with the requested name already exists.
    #[snafu(display("a child named {name} already exists"))]
    DuplicateChild {
        /// The name that was already taken.
        name: String,
    },
}

/// An attribute value attached to a group or dataset.
///
/// Attributes are scalars or short arrays; the codec only ever stores a
/// byte-string (type tags) or a small integer array (the format version).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttrValue {
    /// A byte-string attribute (for example, a type tag).
    Bytes(Vec<u8>),
    /// A short signed-integer array attribute (for example, a version pair).
    Ints(Vec<i64>),
}

/// The homogeneous array stored by a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DatasetData {
    /// 8-bit signed integers.
    Int8(Vec<i8>),
    /// 16-bit signed integers.
    Int16(Vec<i16>),
    /// 32-bit signed integers.
    Int32(Vec<i32>),
    /// 64-bit signed integers.
    Int64(Vec<i64>),
    /// 8-bit unsigned integers.
    Uint8(Vec<u8>),
    /// 16-bit unsigned integers.
    Uint16(Vec<u16>),
    /// 32-bit unsigned integers.
    Uint32(Vec<u32>),
    /// 64-bit unsigned integers.
    Uint64(Vec<u64>),
    /// 32-bit floats.
    Float32(Vec<f32>),
    /// 64-bit floats.
    Float64(Vec<f64>),
    /// Booleans.
    Bool(Vec<bool>),
    /// Byte-strings, one per element.
    Bytes(Vec<Vec<u8>>),
}

impl DatasetData {
    /// Number of elements in the array.
    pub fn len(&self) -> usize {
        match self {
            DatasetData::Int8(v) => v.len(),
            DatasetData::Int16(v) => v.len(),
            DatasetData::Int32(v) => v.len(),
            DatasetData::Int64(v) => v.len(),
            DatasetData::Uint8(v) => v.len(),
            DatasetData::Uint16(v) => v.len(),
            DatasetData::Uint32(v) => v.len(),
            DatasetData::Uint64(v) => v.len(),
            DatasetData::Float32(v) => v.len(),
            DatasetData::Float64(v) => v.len(),
            DatasetData::Bool(v) => v.len(),
            DatasetData::Bytes(v) => v.len(),
        }
    }

    /// Whether the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named array of one primitive type, with its own attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    data: DatasetData,
    attrs: BTreeMap<String, AttrValue>,
}

impl Dataset {
    /// Creates a dataset holding `data`, with no attributes yet.
    pub fn new(data: DatasetData) -> Self {
        Dataset {
            data,
            attrs: BTreeMap::new(),
        }
    }

    /// The stored array.
    pub fn data(&self) -> &DatasetData {
        &self.data
    }

    /// Number of stored elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the dataset holds no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Sets (or replaces) an attribute.
    pub fn set_attr(&mut self, name: impl Into<String>, value: AttrValue) {
        self.attrs.insert(name.into(), value);
    }

    /// Reads an attribute, if present.
    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.get(name)
    }
}

/// A child of a group: either a nested group or a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// A nested group.
    Group(Group),
    /// A dataset.
    Dataset(Dataset),
}

impl Node {
    /// Whether this node is a dataset (as opposed to a group).
    pub fn is_dataset(&self) -> bool {
        matches!(self, Node::Dataset(_))
    }

    /// This node as a group, if it is one.
    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Node::Group(group) => Some(group),
            Node::Dataset(_) => None,
        }
    }

    /// This node as a dataset, if it is one.
    pub fn as_dataset(&self) -> Option<&Dataset> {
        match self {
            Node::Group(_) => None,
            Node::Dataset(dataset) => Some(dataset),
        }
    }

    /// Reads an attribute from this node, whichever kind it is.
    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        match self {
            Node::Group(group) => group.attr(name),
            Node::Dataset(dataset) => dataset.attr(name),
        }
    }
}

/// A container group: attributes plus uniquely-named child nodes.
///
/// Children are kept name-sorted, so [`Group::child_names`] enumerates in
/// a stable order independent of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    attrs: BTreeMap<String, AttrValue>,
    children: BTreeMap<String, Node>,
}

impl Group {
    /// Creates an empty group.
    pub fn new() -> Self {
        Group::default()
    }

    /// Creates a child group under `name` and returns it for population.
    ///
    /// # Errors
    /// Returns [`ContainerError::DuplicateChild`] if any child already
    /// exists under `name`.
    pub fn create_group(&mut self, name: &str) -> ContainerResult<&mut Group> {
        ensure!(!self.children.contains_key(name), DuplicateChildSnafu { name });
        let node = self
            .children
            .entry(name.to_string())
            .or_insert_with(|| Node::Group(Group::new()));
        match node {
            Node::Group(group) => Ok(group),
            Node::Dataset(_) => NotAGroupSnafu { name }.fail(),
        }
    }

    /// Creates a child dataset under `name` and returns it so attributes
    /// can be attached.
    ///
    /// # Errors
    /// Returns [`ContainerError::DuplicateChild`] if any child already
    /// exists under `name`.
    pub fn create_dataset(&mut self, name: &str, data: DatasetData) -> ContainerResult<&mut Dataset> {
        ensure!(!self.children.contains_key(name), DuplicateChildSnafu { name });
        let node = self
            .children
            .entry(name.to_string())
            .or_insert_with(|| Node::Dataset(Dataset::new(data)));
        match node {
            Node::Dataset(dataset) => Ok(dataset),
            Node::Group(_) => NotADatasetSnafu { name }.fail(),
        }
    }

    /// Looks up a child node by name.
    ///
    /// # Errors
    /// Returns [`ContainerError::ChildNotFound`] if no child exists under
    /// `name`.
    pub fn child(&self, name: &str) -> ContainerResult<&Node> {
        self.children.get(name).context(ChildNotFoundSnafu { name })
    }

    /// Looks up a child group by name.
    ///
    /// # Errors
    /// Returns [`ContainerError::ChildNotFound`] if absent and
    /// [`ContainerError::NotAGroup`] if the child is a dataset.
    pub fn group(&self, name: &str) -> ContainerResult<&Group> {
        self.child(name)?.as_group().context(NotAGroupSnafu { name })
    }

    /// Looks up a child dataset by name.
    ///
    /// # Errors
    /// Returns [`ContainerError::ChildNotFound`] if absent and
    /// [`ContainerError::NotADataset`] if the child is a group.
    pub fn dataset(&self, name: &str) -> ContainerResult<&Dataset> {
        self.child(name)?.as_dataset().context(NotADatasetSnafu { name })
    }

    /// Names of all children, in sorted order.
    pub fn child_names(&self) -> Vec<String> {
        self.children.keys().cloned().collect()
    }

    /// Sets (or replaces) an attribute.
    pub fn set_attr(&mut self, name: impl Into<String>, value: AttrValue) {
        self.attrs.insert(name.into(), value);
    }

    /// Reads an attribute, if present.
    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.get(name)
    }
}
