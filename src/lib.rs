#![forbid(unsafe_code)]

pub mod cancel;
pub mod core;
pub mod error;
pub mod graph;
pub mod plan;
pub mod template;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;

// Re-export core types at crate root for convenience
pub use crate::cancel::CancelToken;
pub use crate::core::{
    CanonicalReference, CoreError, Date, LifecycleDates, LifecyclePhase, MajorMinor, Node,
    NodeSpec, VersionStream,
};
pub use crate::graph::{
    all_edges, all_nodes, and_nodes, node_in_range, or_nodes, package_nodes, BuildOutcome,
    EdgePredicate, Graph, GraphConfig, GraphError, NodePredicate, Paths, UnknownStream,
};
pub use crate::plan::{
    NodeUpdateStep, PlanError, PlatformUpdateStep, UpdatePlan, UpdateStep, PLATFORM_NAME,
};
pub use crate::template::{Template, TemplateError, SCHEMA_CINCINNATI};
