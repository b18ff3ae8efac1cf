//! The fixed three-table aggregate and its keyed collection.
//!
//! A [`Gmw`] (groundwater monitoring well) is the one aggregate this
//! format was designed to persist: exactly three tables, stored under the
//! child names `History`, `Tube`, `Well`. The alphabetical field order is
//! a persisted convention, not incidental. A [`GmwCollection`] maps an
//! opaque string key to one aggregate each; collections are persisted
//! under a versioned root group and decoded in numeric key order when
//! every key parses as an integer (keys are conventionally one-based
//! integer strings), falling back to lexicographic order otherwise.

use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use crate::codec::{
    decode::{DecodeResult, LookupSnafu, VersionSnafu, read_table},
    encode::{EncodeResult, WriteSnafu, write_table},
    version::{check_version, write_version},
};
use crate::container::Group;
use crate::table::Table;

/// The aggregate's field names, in persisted (alphabetical) order.
pub const GMW_FIELDS: [&str; 3] = ["History", "Tube", "Well"];

/// The fixed top-level aggregate: three named tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Gmw {
    /// The `History` table.
    pub history: Table,
    /// The `Tube` table.
    pub tube: Table,
    /// The `Well` table.
    pub well: Table,
}

impl Gmw {
    /// Assembles an aggregate from its three tables.
    pub fn new(history: Table, tube: Table, well: Table) -> Self {
        Gmw {
            history,
            tube,
            well,
        }
    }

    fn fields(&self) -> [(&'static str, &Table); 3] {
        [
            ("History", &self.history),
            ("Tube", &self.tube),
            ("Well", &self.well),
        ]
    }

    /// Writes this aggregate's three tables under `group`, one sub-group
    /// per field, in persisted field order.
    ///
    /// # Errors
    /// Propagates encode failures; already-written fields are not rolled
    /// back.
    pub fn write(&self, group: &mut Group) -> EncodeResult<()> {
        for (name, table) in self.fields() {
            let field_group = group.create_group(name).context(WriteSnafu { name })?;
            write_table(field_group, table)?;
        }
        Ok(())
    }

    /// Reads an aggregate from `group`, expecting the three field
    /// sub-groups.
    ///
    /// # Errors
    /// Propagates decode failures, including a missing field group.
    pub fn read(group: &Group) -> DecodeResult<Self> {
        let history = read_field(group, "History")?;
        let tube = read_field(group, "Tube")?;
        let well = read_field(group, "Well")?;
        Ok(Gmw::new(history, tube, well))
    }
}

fn read_field(group: &Group, name: &str) -> DecodeResult<Table> {
    read_table(group.group(name).context(LookupSnafu { name })?)
}

/// A keyed collection of aggregates, ordered by decode (or insertion)
/// order while remaining addressable by key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GmwCollection {
    entries: Vec<(String, Gmw)>,
}

impl GmwCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        GmwCollection::default()
    }

    /// Inserts an aggregate under `key`, replacing any existing entry
    /// with the same key in place.
    pub fn insert(&mut self, key: impl Into<String>, gmw: Gmw) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = gmw,
            None => self.entries.push((key, gmw)),
        }
    }

    /// Looks up an aggregate by key.
    pub fn get(&self, key: &str) -> Option<&Gmw> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, gmw)| gmw)
    }

    /// Iterates entries in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Gmw)> {
        self.entries.iter().map(|(k, gmw)| (k.as_str(), gmw))
    }

    /// Keys, in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the collection has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Gmw)> for GmwCollection {
    fn from_iter<I: IntoIterator<Item = (String, Gmw)>>(iter: I) -> Self {
        let mut collection = GmwCollection::new();
        for (key, gmw) in iter {
            collection.insert(key, gmw);
        }
        collection
    }
}

/// Writes a collection under `root`: stamps the format version, then one
/// child group per entry, keyed by the entry's key.
///
/// # Errors
/// Propagates encode failures; the root is left partially written on
/// failure.
pub fn write_gmws(root: &mut Group, gmws: &GmwCollection) -> EncodeResult<()> {
    write_version(root);
    for (key, gmw) in gmws.iter() {
        let group = root.create_group(key).context(WriteSnafu { name: key })?;
        gmw.write(group)?;
    }
    Ok(())
}

/// Reads a collection from `root`, gating on the format version first.
///
/// Child keys that all parse as integers are visited in ascending numeric
/// order (the one-based convention); otherwise keys are visited in
/// lexicographic order. The returned collection preserves that order.
///
/// # Errors
/// Fails up front on a missing or unsupported version attribute, and
/// propagates decode failures for any entry.
pub fn read_gmws(root: &Group) -> DecodeResult<GmwCollection> {
    check_version(root).context(VersionSnafu)?;

    let mut collection = GmwCollection::new();
    for key in sorted_entry_keys(root.child_names()) {
        let group = root.group(&key).context(LookupSnafu { name: key.as_str() })?;
        let gmw = Gmw::read(group)?;
        collection.insert(key, gmw);
    }
    Ok(collection)
}

/// Orders entry keys numerically when every key is an integer string,
/// lexicographically otherwise.
fn sorted_entry_keys(mut keys: Vec<String>) -> Vec<String> {
    let parsed: Result<Vec<i64>, _> = keys.iter().map(|k| k.parse::<i64>()).collect();
    match parsed {
        Ok(numbers) => {
            let mut pairs: Vec<(i64, String)> = numbers.into_iter().zip(keys).collect();
            pairs.sort_by_key(|(number, _)| *number);
            pairs.into_iter().map(|(_, key)| key).collect()
        }
        Err(_) => {
            keys.sort();
            keys
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;

    fn sample_gmw(marker: i64) -> Gmw {
        let history = Table::new(vec![Column::int64s("event", [marker])]).expect("history");
        let tube = Table::new(vec![Column::int64s("diameter", [marker, marker])]).expect("tube");
        let well = Table::new(vec![Column::strings("id", [format!("GMW{marker}")])]).expect("well");
        Gmw::new(history, tube, well)
    }

    #[test]
    fn integer_keys_decode_in_numeric_order() {
        let mut root = Group::new();
        let mut gmws = GmwCollection::new();
        for key in ["1", "2", "10"] {
            gmws.insert(key, sample_gmw(1));
        }
        write_gmws(&mut root, &gmws).expect("write");

        let decoded = read_gmws(&root).expect("read");
        let keys: Vec<&str> = decoded.keys().collect();
        assert_eq!(keys, vec!["1", "2", "10"]);
    }

    #[test]
    fn non_integer_keys_decode_in_lexicographic_order() {
        let mut root = Group::new();
        let mut gmws = GmwCollection::new();
        for key in ["b", "a", "10"] {
            gmws.insert(key, sample_gmw(1));
        }
        write_gmws(&mut root, &gmws).expect("write");

        let decoded = read_gmws(&root).expect("read");
        let keys: Vec<&str> = decoded.keys().collect();
        assert_eq!(keys, vec!["10", "a", "b"]);
    }

    #[test]
    fn each_entry_holds_the_three_field_groups() {
        let mut root = Group::new();
        let mut gmws = GmwCollection::new();
        gmws.insert("1", sample_gmw(7));
        write_gmws(&mut root, &gmws).expect("write");

        let entry = root.group("1").expect("entry group");
        assert_eq!(entry.child_names(), GMW_FIELDS.to_vec());
    }

    #[test]
    fn reading_without_a_version_fails_before_any_entry() {
        let root = Group::new();
        let err = read_gmws(&root).unwrap_err();
        assert!(matches!(err, crate::codec::DecodeError::Version { .. }));
    }

    #[test]
    fn missing_field_group_is_a_lookup_error() {
        let mut root = Group::new();
        write_version(&mut root);
        root.create_group("1").expect("entry without fields");

        let err = read_gmws(&root).unwrap_err();
        assert!(
            matches!(&err, crate::codec::DecodeError::Lookup { name, .. } if name == "History"),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut gmws = GmwCollection::new();
        gmws.insert("1", sample_gmw(1));
        gmws.insert("2", sample_gmw(2));
        gmws.insert("1", sample_gmw(9));

        assert_eq!(gmws.len(), 2);
        let keys: Vec<&str> = gmws.keys().collect();
        assert_eq!(keys, vec!["1", "2"]);
        let replaced = gmws.get("1").expect("entry");
        assert_eq!(replaced, &sample_gmw(9));
    }
}
