//! Format version attribute and the compatibility gate.
//!
//! The root group of every container carries a `[major, minor]` version
//! pair. Decoding checks the major component once, at the root, before
//! anything else is read; the minor component is informational only and
//! never gates.

use std::fmt;

use log::warn;
use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use crate::codec::VERSION_ATTR;
use crate::container::{AttrValue, Group};

/// A `[major, minor]` format version pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatVersion {
    /// Major component; must match [`BRON_VERSION`] for decode to proceed.
    pub major: u32,
    /// Minor component; informational only.
    pub minor: u32,
}

impl FormatVersion {
    /// Creates a version pair.
    pub const fn new(major: u32, minor: u32) -> Self {
        FormatVersion { major, minor }
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// The format version this codec writes and accepts (major-gated).
pub const BRON_VERSION: FormatVersion = FormatVersion::new(2, 0);

/// Errors raised by the version gate before any decode proceeds.
#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum VersionError {
    /// The root has no version attribute at all (pre-versioning file).
    #[snafu(display("root group has no BRON_VERSION attribute (pre-versioning file?)"))]
    MissingVersion,

    /// The version attribute is present but not a `[major, minor]`
    /// pair of non-negative integers.
    #[snafu(display("BRON_VERSION attribute is not a [major, minor] pair"))]
    MalformedVersion,

    /// The stored major version differs from [`BRON_VERSION`]'s major.
    #[snafu(display(
        "file has BRON_VERSION {found}, only major version {} is supported",
        BRON_VERSION.major
    ))]
    UnsupportedMajor {
        /// The version found on the root group.
        found: FormatVersion,
    },
}

/// Stamps the supported format version onto a root group.
pub fn write_version(root: &mut Group) {
    root.set_attr(
        VERSION_ATTR,
        AttrValue::Ints(vec![
            i64::from(BRON_VERSION.major),
            i64::from(BRON_VERSION.minor),
        ]),
    );
}

/// Verifies a root group's declared version against [`BRON_VERSION`].
///
/// Succeeds for any minor value as long as the major matches; a minor
/// newer than the supported one is logged as a warning but accepted.
///
/// # Errors
/// Returns [`VersionError::MissingVersion`] when the attribute is absent,
/// [`VersionError::MalformedVersion`] when it is not a non-negative
/// integer pair, and [`VersionError::UnsupportedMajor`] when the stored
/// major differs from the supported one.
pub fn check_version(root: &Group) -> Result<FormatVersion, VersionError> {
    let attr = root.attr(VERSION_ATTR).context(MissingVersionSnafu)?;
    let AttrValue::Ints(parts) = attr else {
        return MalformedVersionSnafu.fail();
    };
    let (&major, &minor) = match parts.as_slice() {
        [major, minor, ..] => (major, minor),
        _ => return MalformedVersionSnafu.fail(),
    };
    let found = FormatVersion {
        major: u32::try_from(major).ok().context(MalformedVersionSnafu)?,
        minor: u32::try_from(minor).ok().context(MalformedVersionSnafu)?,
    };
    ensure!(
        found.major == BRON_VERSION.major,
        UnsupportedMajorSnafu { found }
    );
    if found.minor > BRON_VERSION.minor {
        warn!(
            "container declares BRON_VERSION {found}, newer than supported {BRON_VERSION}; \
             decoding anyway"
        );
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_version_is_a_dedicated_error() {
        let root = Group::new();
        assert_eq!(check_version(&root).unwrap_err(), VersionError::MissingVersion);
    }

    #[test]
    fn wrong_major_is_rejected() {
        let mut root = Group::new();
        root.set_attr(VERSION_ATTR, AttrValue::Ints(vec![1, 7]));
        let err = check_version(&root).unwrap_err();
        assert_eq!(
            err,
            VersionError::UnsupportedMajor {
                found: FormatVersion::new(1, 7)
            }
        );
    }

    #[test]
    fn any_minor_under_the_supported_major_is_accepted() {
        for minor in [0, 1, 99] {
            let mut root = Group::new();
            root.set_attr(
                VERSION_ATTR,
                AttrValue::Ints(vec![i64::from(BRON_VERSION.major), minor]),
            );
            let found = check_version(&root).expect("minor never gates");
            assert_eq!(found.major, BRON_VERSION.major);
        }
    }

    #[test]
    fn malformed_version_attributes_are_rejected() {
        let cases = [
            AttrValue::Bytes(b"2.0".to_vec()),
            AttrValue::Ints(vec![2]),
            AttrValue::Ints(vec![-2, 0]),
        ];
        for value in cases {
            let mut root = Group::new();
            root.set_attr(VERSION_ATTR, value);
            assert_eq!(
                check_version(&root).unwrap_err(),
                VersionError::MalformedVersion
            );
        }
    }

    #[test]
    fn write_version_round_trips() {
        let mut root = Group::new();
        write_version(&mut root);
        assert_eq!(check_version(&root).expect("just written"), BRON_VERSION);
    }
}
