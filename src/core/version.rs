//! Two-part `major.minor` identifier.
//!
//! Identifies both product version streams and platform releases. Total
//! lexicographic order; parsed from the strict `M.m` form with no leading
//! zeros.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::{CoreError, InvalidMajorMinor};

/// `major.minor` pair with lexicographic order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MajorMinor {
    pub major: u64,
    pub minor: u64,
}

impl MajorMinor {
    pub fn new(major: u64, minor: u64) -> Self {
        Self { major, minor }
    }

    /// Parse the strict `M.m` form: decimal, no sign, no leading zeros.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let invalid = || InvalidMajorMinor { raw: s.to_string() };
        let (major_raw, minor_raw) = s.split_once('.').ok_or_else(invalid)?;
        let major = parse_part(major_raw).ok_or_else(invalid)?;
        let minor = parse_part(minor_raw).ok_or_else(invalid)?;
        Ok(Self { major, minor })
    }

    /// The stream a semantic version belongs to.
    pub fn from_version(v: &semver::Version) -> Self {
        Self {
            major: v.major,
            minor: v.minor,
        }
    }

    /// The next minor release of the same major.
    pub fn next_minor(self) -> Self {
        Self {
            major: self.major,
            minor: self.minor + 1,
        }
    }
}

fn parse_part(part: &str) -> Option<u64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if part.len() > 1 && part.starts_with('0') {
        return None;
    }
    part.parse().ok()
}

impl fmt::Display for MajorMinor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for MajorMinor {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for MajorMinor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MajorMinor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        MajorMinor::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_strict_form() {
        assert_eq!(MajorMinor::parse("4.16").unwrap(), MajorMinor::new(4, 16));
        assert_eq!(MajorMinor::parse("0.1").unwrap(), MajorMinor::new(0, 1));
        assert_eq!(MajorMinor::parse("10.0").unwrap(), MajorMinor::new(10, 0));
    }

    #[test]
    fn parse_rejects_malformed_strings() {
        for raw in ["", "4", "4.", ".16", "4.16.1", "04.16", "4.016", "4.x", "-4.1", "4. 1"] {
            assert!(MajorMinor::parse(raw).is_err(), "accepted {raw:?}");
        }
    }

    #[test]
    fn order_is_lexicographic() {
        assert!(MajorMinor::new(4, 9) < MajorMinor::new(4, 10));
        assert!(MajorMinor::new(4, 10) < MajorMinor::new(5, 0));
        assert_eq!(MajorMinor::new(4, 10), MajorMinor::new(4, 10));
    }

    #[test]
    fn from_version_takes_major_minor() {
        let v = semver::Version::parse("3.10.7-rc.1").unwrap();
        assert_eq!(MajorMinor::from_version(&v), MajorMinor::new(3, 10));
    }

    #[test]
    fn serde_roundtrip_uses_string_form() {
        let mm = MajorMinor::new(4, 16);
        let json = serde_json::to_string(&mm).unwrap();
        assert_eq!(json, "\"4.16\"");
        let parsed: MajorMinor = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, mm);
    }

    #[test]
    fn serde_rejects_invalid_string() {
        let result: Result<MajorMinor, _> = serde_json::from_str("\"4.16.1\"");
        assert!(result.is_err());
    }
}
