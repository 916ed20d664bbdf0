//! Released artifacts, before and after stream binding.
//!
//! `NodeSpec` is what ingestion hands over: pure identity plus release
//! metadata. Binding a spec to its version stream during graph construction
//! yields a `Node`, which additionally knows its lifecycle phase and the
//! platform versions it is supported or functional on.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use semver::Version;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

use super::lifecycle::LifecyclePhase;
use super::reference::CanonicalReference;
use super::version::MajorMinor;

/// One released artifact as described by ingestion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSpec {
    pub name: String,
    pub version: Version,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release: Option<String>,
    #[serde(rename = "imageReference")]
    pub image: CanonicalReference,
    #[serde(with = "time::serde::rfc3339")]
    pub release_date: OffsetDateTime,
}

impl NodeSpec {
    /// Bind to the matching stream, producing a graph node.
    pub fn bind(
        self,
        phase: LifecyclePhase,
        supported_platform_versions: BTreeSet<MajorMinor>,
        requires_update_platform_versions: BTreeSet<MajorMinor>,
    ) -> Node {
        Node {
            name: self.name,
            version: self.version,
            release: self.release,
            image: self.image,
            release_date: self.release_date,
            phase,
            supported_platform_versions,
            requires_update_platform_versions,
        }
    }
}

/// A stream-bound artifact in the upgrade graph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub name: String,
    pub version: Version,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release: Option<String>,
    #[serde(rename = "imageReference")]
    pub image: CanonicalReference,
    #[serde(with = "time::serde::rfc3339")]
    pub release_date: OffsetDateTime,
    pub phase: LifecyclePhase,
    pub supported_platform_versions: BTreeSet<MajorMinor>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub requires_update_platform_versions: BTreeSet<MajorMinor>,
}

impl Node {
    /// Version-release rendering, e.g. `1.2.3` or `1.2.3_2`.
    pub fn vr(&self) -> String {
        match self.release.as_deref() {
            Some(rel) if !rel.is_empty() => format!("{}_{rel}", self.version),
            _ => self.version.to_string(),
        }
    }

    /// Name-version-release rendering, e.g. `etcd.v1.2.3_2`.
    pub fn nvr(&self) -> String {
        format!("{}.v{}", self.name, self.vr())
    }

    /// Stable identity derived from the NVR string.
    pub fn id(&self) -> i64 {
        let digest = Sha256::digest(self.nvr().as_bytes());
        let mut first = [0u8; 8];
        first.copy_from_slice(&digest[..8]);
        i64::from_le_bytes(first)
    }

    /// Order by version, then name, then release.
    pub fn compare(&self, other: &Self) -> Ordering {
        self.version
            .cmp(&other.version)
            .then_with(|| self.name.cmp(&other.name))
            .then_with(|| self.release.cmp(&other.release))
    }

    /// Supported: a valid place to finish on platform `p`.
    pub fn is_supported_on(&self, p: MajorMinor) -> bool {
        self.supported_platform_versions.contains(&p)
    }

    /// Functional: allowed to exist transiently on platform `p`.
    pub fn is_functional_on(&self, p: MajorMinor) -> bool {
        self.supported_platform_versions.contains(&p)
            || self.requires_update_platform_versions.contains(&p)
    }

    pub fn is_functional_on_all<I: IntoIterator<Item = MajorMinor>>(&self, platforms: I) -> bool {
        platforms.into_iter().all(|p| self.is_functional_on(p))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.nvr())
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    fn reference(tag: u8) -> CanonicalReference {
        let digest: String = format!("{tag:02x}").repeat(32);
        CanonicalReference::parse(&format!("quay.io/example/app@sha256:{digest}")).unwrap()
    }

    fn node(version: &str, release: Option<&str>) -> Node {
        NodeSpec {
            name: "app".to_string(),
            version: Version::parse(version).unwrap(),
            release: release.map(str::to_string),
            image: reference(1),
            release_date: datetime!(2024-01-01 00:00 UTC),
        }
        .bind(
            LifecyclePhase::FullSupport,
            BTreeSet::from([MajorMinor::new(4, 16)]),
            BTreeSet::new(),
        )
    }

    #[test]
    fn vr_and_nvr_forms() {
        let plain = node("1.2.3", None);
        assert_eq!(plain.vr(), "1.2.3");
        assert_eq!(plain.nvr(), "app.v1.2.3");

        let with_release = node("1.2.3", Some("2"));
        assert_eq!(with_release.vr(), "1.2.3_2");
        assert_eq!(with_release.nvr(), "app.v1.2.3_2");

        let empty_release = node("1.2.3", Some(""));
        assert_eq!(empty_release.vr(), "1.2.3");
    }

    #[test]
    fn id_is_stable_and_distinguishes_releases() {
        let a = node("1.2.3", None);
        let b = node("1.2.3", None);
        assert_eq!(a.id(), b.id());

        let c = node("1.2.3", Some("2"));
        assert_ne!(a.id(), c.id());
    }

    #[test]
    fn compare_orders_by_version_then_name_then_release() {
        let low = node("1.2.3", None);
        let high = node("1.10.0", None);
        assert_eq!(low.compare(&high), Ordering::Less);

        let mut other_name = node("1.2.3", None);
        other_name.name = "zapp".to_string();
        assert_eq!(low.compare(&other_name), Ordering::Less);

        let released = node("1.2.3", Some("1"));
        assert_eq!(low.compare(&released), Ordering::Less);
        assert_eq!(low.compare(&node("1.2.3", None)), Ordering::Equal);
    }

    #[test]
    fn prerelease_sorts_below_release() {
        let pre = node("1.3.0-rc.1", None);
        let rel = node("1.3.0", None);
        assert_eq!(pre.compare(&rel), Ordering::Less);
    }

    #[test]
    fn functional_is_supported_plus_requires_update() {
        let mut n = node("1.2.3", None);
        n.requires_update_platform_versions = BTreeSet::from([MajorMinor::new(4, 17)]);
        assert!(n.is_supported_on(MajorMinor::new(4, 16)));
        assert!(!n.is_supported_on(MajorMinor::new(4, 17)));
        assert!(n.is_functional_on(MajorMinor::new(4, 16)));
        assert!(n.is_functional_on(MajorMinor::new(4, 17)));
        assert!(!n.is_functional_on(MajorMinor::new(4, 18)));
        assert!(n.is_functional_on_all([MajorMinor::new(4, 16), MajorMinor::new(4, 17)]));
        assert!(!n.is_functional_on_all([MajorMinor::new(4, 16), MajorMinor::new(4, 18)]));
    }

    #[test]
    fn node_serde_roundtrip() {
        let n = node("1.2.3", Some("2"));
        let json = serde_json::to_string(&n).unwrap();
        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(back, n);
    }
}
