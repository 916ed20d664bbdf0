//! Digest-pinned container image references.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::{CoreError, InvalidReference};

/// Canonical image reference: `<repo>@sha256:<64-hex>`.
///
/// Only digest-pinned references are representable; tag references are
/// rejected at parse time.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalReference {
    repo: String,
    digest: String,
}

impl CanonicalReference {
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let invalid = |reason: &str| InvalidReference {
            raw: s.to_string(),
            reason: reason.to_string(),
        };
        let Some((repo, digest)) = s.split_once('@') else {
            return Err(invalid("not a canonical reference, missing digest").into());
        };
        if repo.is_empty() {
            return Err(invalid("empty repository").into());
        }
        if !repo
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-' | b'_' | b'/' | b':'))
        {
            return Err(invalid("repository contains invalid characters").into());
        }
        let Some(hex) = digest.strip_prefix("sha256:") else {
            return Err(invalid("digest must use the sha256 algorithm").into());
        };
        if hex.len() != 64 || !hex.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase())
        {
            return Err(invalid("digest must be 64 lowercase hex characters").into());
        }
        Ok(Self {
            repo: repo.to_string(),
            digest: digest.to_string(),
        })
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }
}

impl fmt::Display for CanonicalReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.repo, self.digest)
    }
}

impl fmt::Debug for CanonicalReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CanonicalReference({}@{})", self.repo, self.digest)
    }
}

impl FromStr for CanonicalReference {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for CanonicalReference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CanonicalReference {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        CanonicalReference::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIGEST: &str = "sha256:0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    #[test]
    fn parse_accepts_digest_pinned_reference() {
        let raw = format!("registry.example.com/repo/app@{DIGEST}");
        let parsed = CanonicalReference::parse(&raw).unwrap();
        assert_eq!(parsed.repo(), "registry.example.com/repo/app");
        assert_eq!(parsed.digest(), DIGEST);
        assert_eq!(parsed.to_string(), raw);
    }

    #[test]
    fn parse_rejects_tag_reference() {
        assert!(CanonicalReference::parse("registry.example.com/repo/app:v1.2.3").is_err());
    }

    #[test]
    fn parse_rejects_bad_digests() {
        assert!(CanonicalReference::parse("repo@sha512:abcd").is_err());
        assert!(CanonicalReference::parse("repo@sha256:abcd").is_err());
        let upper = DIGEST.to_uppercase();
        assert!(CanonicalReference::parse(&format!("repo@{upper}")).is_err());
        assert!(CanonicalReference::parse(&format!("@{DIGEST}")).is_err());
    }

    #[test]
    fn serde_roundtrip() {
        let raw = format!("quay.io/example/app@{DIGEST}");
        let parsed = CanonicalReference::parse(&raw).unwrap();
        let json = serde_json::to_string(&parsed).unwrap();
        let back: CanonicalReference = serde_json::from_str(&json).unwrap();
        assert_eq!(back, parsed);
    }

    #[test]
    fn serde_rejects_non_canonical() {
        let result: Result<CanonicalReference, _> =
            serde_json::from_str("\"quay.io/example/app:latest\"");
        assert!(result.is_err());
    }
}
