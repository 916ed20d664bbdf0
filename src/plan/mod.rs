//! Joint platform + product update plans.
//!
//! A plan has three phases: product updates that happen before the platform
//! moves, the platform step itself, and product updates that happen after.
//! Every step is serializable; errors ride along as strings so a plan
//! round-trips losslessly.

mod planner;
mod render;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{MajorMinor, Node};

/// Name of the base platform the planner steps across.
pub const PLATFORM_NAME: &str = "OpenShift";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PlanError {
    #[error("planning cancelled")]
    Cancelled,
}

/// Product update steps for one node in one phase.
///
/// An empty `path` with no `error` means no update is necessary for this
/// node in this phase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeUpdateStep {
    pub from: Node,
    pub path: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The platform transition of a plan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformUpdateStep {
    pub name: String,
    pub from: MajorMinor,
    pub to: MajorMinor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One step of a plan, for callers that walk all steps uniformly.
#[derive(Clone, Copy, Debug)]
pub enum UpdateStep<'p> {
    Platform(&'p PlatformUpdateStep),
    Node(&'p NodeUpdateStep),
}

/// A complete joint upgrade plan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlan {
    pub before_platform: Vec<NodeUpdateStep>,
    pub platform: PlatformUpdateStep,
    pub after_platform: Vec<NodeUpdateStep>,
}

impl UpdatePlan {
    /// All steps in execution order: pre-platform node steps, the platform
    /// step, post-platform node steps.
    pub fn steps(&self) -> impl Iterator<Item = UpdateStep<'_>> {
        self.before_platform
            .iter()
            .map(UpdateStep::Node)
            .chain(std::iter::once(UpdateStep::Platform(&self.platform)))
            .chain(self.after_platform.iter().map(UpdateStep::Node))
    }
}
