//! The platform upgrade planner.
//!
//! For every input node the planner selects the cheapest update path ending
//! at a node supported on the target platform, then splits it around the
//! platform step: nodes functional on the source platform form the
//! pre-platform segment, the last of them is the span node that stays live
//! while the platform moves (and so must be functional on every traversed
//! platform version), and the remainder must be functional on the target
//! platform. Candidates that cannot be split this way are discarded in cost
//! order until one fits.

use thiserror::Error;

use crate::cancel::CancelToken;
use crate::core::{MajorMinor, Node};
use crate::graph::Graph;

use super::{NodeUpdateStep, PlanError, PlatformUpdateStep, UpdatePlan, PLATFORM_NAME};

const ERR_UNSUPPORTED_SOURCE: &str =
    "this version is not supported on the current platform version";
const ERR_NO_VIABLE_PATH: &str =
    "no update paths coincide with support along the platform update path";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
enum PlatformStepError {
    #[error("downgrading from {from} to {to} is not supported")]
    Downgrade { from: MajorMinor, to: MajorMinor },
    #[error("updating from major version {from} to major version {to} is not supported")]
    CrossMajor { from: u64, to: u64 },
    #[error("furthest supported update from {from} is to {furthest}")]
    TooFar {
        from: MajorMinor,
        furthest: MajorMinor,
    },
}

/// Platform step rules: no downgrades, no major crossings; an even minor
/// may step up to two minors, an odd minor one. Staying put is a no-op.
fn validate_platform_step(from: MajorMinor, to: MajorMinor) -> Result<(), PlatformStepError> {
    if from == to {
        return Ok(());
    }
    if to < from {
        return Err(PlatformStepError::Downgrade { from, to });
    }
    if from.major != to.major {
        return Err(PlatformStepError::CrossMajor {
            from: from.major,
            to: to.major,
        });
    }
    let allowed_step = if from.minor % 2 == 0 { 2 } else { 1 };
    let furthest = MajorMinor::new(from.major, from.minor + allowed_step);
    if to > furthest {
        return Err(PlatformStepError::TooFar { from, furthest });
    }
    Ok(())
}

/// The inclusive set of platform versions a transition passes through.
fn traversed_platforms(from: MajorMinor, to: MajorMinor) -> Vec<MajorMinor> {
    if from.major == to.major && from.minor <= to.minor {
        (from.minor..=to.minor)
            .map(|minor| MajorMinor::new(from.major, minor))
            .collect()
    } else {
        // Invalid transitions still get per-node diagnostics; plan against
        // the endpoints only.
        let mut platforms = vec![from];
        if to != from {
            platforms.push(to);
        }
        platforms
    }
}

struct NodePlan<'g> {
    before: Vec<&'g Node>,
    after: Vec<&'g Node>,
    error: Option<String>,
}

impl<'g> NodePlan<'g> {
    fn failed(error: &str) -> Self {
        Self {
            before: Vec::new(),
            after: Vec::new(),
            error: Some(error.to_string()),
        }
    }
}

impl Graph {
    /// Plan a joint platform + product upgrade for the given nodes.
    ///
    /// Platform-transition problems are attached to the returned plan's
    /// platform step; each node step carries its own diagnostics. Only
    /// cancellation aborts the whole operation.
    pub fn plan_platform_upgrade(
        &self,
        from_nodes: &[&Node],
        from_platform: MajorMinor,
        to_platform: MajorMinor,
        cancel: &CancelToken,
    ) -> Result<UpdatePlan, PlanError> {
        let platform_error =
            validate_platform_step(from_platform, to_platform).err().map(|e| e.to_string());
        let traversed = traversed_platforms(from_platform, to_platform);
        tracing::debug!(
            from = %from_platform,
            to = %to_platform,
            nodes = from_nodes.len(),
            "planning platform upgrade"
        );

        let mut before_platform = Vec::with_capacity(from_nodes.len());
        let mut after_platform = Vec::with_capacity(from_nodes.len());
        for &from in from_nodes {
            if cancel.is_cancelled() {
                return Err(PlanError::Cancelled);
            }
            let node_plan = self.plan_node(from, &traversed, cancel)?;
            before_platform.push(NodeUpdateStep {
                from: from.clone(),
                path: node_plan.before.into_iter().cloned().collect(),
                error: node_plan.error.clone(),
            });
            after_platform.push(NodeUpdateStep {
                from: from.clone(),
                path: node_plan.after.into_iter().cloned().collect(),
                error: node_plan.error,
            });
        }

        Ok(UpdatePlan {
            before_platform,
            platform: PlatformUpdateStep {
                name: PLATFORM_NAME.to_string(),
                from: from_platform,
                to: to_platform,
                error: platform_error,
            },
            after_platform,
        })
    }

    fn plan_node<'g>(
        &'g self,
        from: &Node,
        traversed: &[MajorMinor],
        cancel: &CancelToken,
    ) -> Result<NodePlan<'g>, PlanError> {
        let from_platform = traversed[0];
        let to_platform = *traversed.last().unwrap_or(&from_platform);

        // A node that is not even supported where it runs today needs that
        // resolved before any platform planning.
        if !from.is_supported_on(from_platform) {
            return Ok(NodePlan::failed(ERR_UNSUPPORTED_SOURCE));
        }

        // Candidate terminals: same package, supported on the target
        // platform, reachable from `from`.
        let mut candidates: Vec<(Vec<&Node>, f64)> = Vec::new();
        for terminal in self.nodes() {
            if terminal.name != from.name || !terminal.is_supported_on(to_platform) {
                continue;
            }
            let (path, weight) = self.paths().between(from.id(), terminal.id());
            if path.is_empty() {
                continue;
            }
            candidates.push((path, weight));
        }
        candidates.sort_by(|(ap, aw), (bp, bw)| {
            aw.total_cmp(bw)
                .then_with(|| ap.len().cmp(&bp.len()))
                .then_with(|| {
                    match (ap.last(), bp.last()) {
                        (Some(a), Some(b)) => a.compare(b),
                        _ => std::cmp::Ordering::Equal,
                    }
                })
        });

        for (path, weight) in candidates {
            if cancel.is_cancelled() {
                return Err(PlanError::Cancelled);
            }

            // Pre-platform: the longest prefix functional where we run now.
            let mut before: Vec<&Node> = Vec::new();
            for &node in &path {
                if !node.is_functional_on(from_platform) {
                    break;
                }
                before.push(node);
            }
            // The span node stays installed while the platform moves, so it
            // must be functional on every traversed platform version.
            let Some(&span) = before.last() else {
                continue;
            };
            if !span.is_functional_on_all(traversed.iter().copied()) {
                continue;
            }

            // Whole path fits before the platform step.
            if before.len() == path.len() {
                tracing::debug!(node = %from, terminal = %span, weight, "planned pre-platform-only update");
                return Ok(NodePlan {
                    before,
                    after: Vec::new(),
                    error: None,
                });
            }

            // Post-platform: the rest, led by the span node so both segments
            // read as complete paths. Every node here must be functional on
            // the target platform.
            let mut after: Vec<&Node> = vec![span];
            for &node in &path[before.len()..] {
                if !node.is_functional_on(to_platform) {
                    break;
                }
                after.push(node);
            }
            // The span node is shared by both segments; if the rest of the
            // path did not fit, this candidate is not viable.
            if before.len() + after.len() - 1 != path.len() {
                continue;
            }
            tracing::debug!(node = %from, span = %span, weight, "planned spanning update");
            return Ok(NodePlan {
                before,
                after,
                error: None,
            });
        }

        Ok(NodePlan::failed(ERR_NO_VIABLE_PATH))
    }
}
