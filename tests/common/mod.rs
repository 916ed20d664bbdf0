//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::BTreeSet;

use semver::Version;
use time::macros::datetime;
use time::OffsetDateTime;

use upgraph::{
    CanonicalReference, Date, Graph, LifecycleDates, MajorMinor, Node, NodeSpec, VersionStream,
};

pub fn init_logs() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// The instant all boundary fixtures are evaluated at.
pub fn as_of() -> OffsetDateTime {
    datetime!(2024-06-01 00:00 UTC)
}

pub fn mm(s: &str) -> MajorMinor {
    MajorMinor::parse(s).unwrap()
}

pub fn mms(list: &[&str]) -> BTreeSet<MajorMinor> {
    list.iter().map(|s| mm(s)).collect()
}

pub fn date(s: &str) -> Date {
    Date::parse(s).unwrap()
}

pub fn dates(full_support: &str, maintenance: &str, extensions: &[&str], eol: &str) -> LifecycleDates {
    LifecycleDates {
        full_support: date(full_support),
        maintenance: date(maintenance),
        extensions: extensions.iter().map(|s| date(s)).collect(),
        eol: date(eol),
    }
}

/// Dates that put a stream in full support at the fixture instant.
pub fn full_support_dates() -> LifecycleDates {
    dates("2024-01-01", "2025-01-01", &[], "2026-01-01")
}

/// Dates that put a stream in maintenance at the fixture instant.
pub fn maintenance_dates() -> LifecycleDates {
    dates("2023-01-01", "2024-01-01", &[], "2026-01-01")
}

/// Dates that put a stream past end of life at the fixture instant.
pub fn end_of_life_dates() -> LifecycleDates {
    dates("2023-01-01", "2023-06-01", &[], "2024-05-01")
}

/// Dates that keep a stream before general availability at the fixture
/// instant.
pub fn pre_ga_dates() -> LifecycleDates {
    dates("2025-01-01", "2025-07-01", &[], "2026-07-01")
}

pub fn stream(
    version: &str,
    minimum_update_version: &str,
    lifecycle_dates: LifecycleDates,
    supported: &[&str],
) -> VersionStream {
    VersionStream {
        version: mm(version),
        minimum_update_version: Version::parse(minimum_update_version).unwrap(),
        lifecycle_dates,
        supported_platform_versions: mms(supported),
        requires_update_platform_versions: BTreeSet::new(),
    }
}

pub fn stream_with_requires(
    version: &str,
    minimum_update_version: &str,
    lifecycle_dates: LifecycleDates,
    supported: &[&str],
    requires_update: &[&str],
) -> VersionStream {
    VersionStream {
        requires_update_platform_versions: mms(requires_update),
        ..stream(version, minimum_update_version, lifecycle_dates, supported)
    }
}

pub fn reference(tag: u32) -> CanonicalReference {
    let digest: String = format!("{tag:08x}").repeat(8);
    CanonicalReference::parse(&format!("quay.io/example/app@sha256:{digest}")).unwrap()
}

/// A node spec released `offset_days` after the start of 2024.
pub fn spec(name: &str, version: &str, offset_days: i64) -> NodeSpec {
    let released = datetime!(2024-01-01 00:00 UTC) + time::Duration::days(offset_days);
    NodeSpec {
        name: name.to_string(),
        version: Version::parse(version).unwrap(),
        release: None,
        image: reference(offset_days as u32),
        release_date: released,
    }
}

/// Look a node up by its version-release rendering.
pub fn find<'g>(graph: &'g Graph, vr: &str) -> &'g Node {
    graph
        .nodes()
        .find(|n| n.vr() == vr)
        .unwrap_or_else(|| panic!("no node {vr} in graph"))
}

/// Successor version-release renderings of a node, sorted.
pub fn successor_vrs(graph: &Graph, vr: &str) -> Vec<String> {
    let mut vrs: Vec<String> = graph
        .successors(find(graph, vr))
        .into_iter()
        .map(Node::vr)
        .collect();
    vrs.sort();
    vrs
}
