//! Core domain types for the upgrade graph
//!
//! Module hierarchy follows type dependency order:
//! - version: MajorMinor two-part identifier
//! - lifecycle: Date, LifecyclePhase, LifecycleDates
//! - reference: digest-pinned image references
//! - stream: per-minor-version stream configuration
//! - node: released artifacts, before and after stream binding

pub mod error;
pub mod lifecycle;
pub mod node;
pub mod reference;
pub mod stream;
pub mod version;

pub use error::{CoreError, DatesOutOfOrder, InvalidDate, InvalidMajorMinor, InvalidReference};
pub use lifecycle::{Date, LifecycleDates, LifecyclePhase};
pub use node::{Node, NodeSpec};
pub use reference::CanonicalReference;
pub use stream::VersionStream;
pub use version::MajorMinor;
