//! Per-minor-version stream configuration.

use std::collections::BTreeSet;

use semver::Version;
use serde::{Deserialize, Serialize};

use super::lifecycle::LifecycleDates;
use super::version::MajorMinor;

/// Declarative configuration for one `major.minor` stream of a product.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionStream {
    /// The stream's own `major.minor`.
    pub version: MajorMinor,
    /// Sources strictly below this version may not upgrade into the stream.
    pub minimum_update_version: Version,
    pub lifecycle_dates: LifecycleDates,
    /// Platform versions on which this stream's artifacts are supported.
    pub supported_platform_versions: BTreeSet<MajorMinor>,
    /// Platform versions on which artifacts merely remain functional: they
    /// may exist transiently during a platform traversal but are not a valid
    /// terminal.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub requires_update_platform_versions: BTreeSet<MajorMinor>,
}
