//! Tier-aware edge weight assignment.
//!
//! Every incoming edge of a node carries that node's rank. Ranks are handed
//! out walking the nodes best-phase-first and, within a phase, highest
//! version first, so that searches prefer higher versions. When the walk
//! enters a worse phase, the starting rank becomes the sum of every rank
//! handed out in the previous phase: a single edge into a worse tier then
//! costs more than any simple path confined to the tier before it, and a
//! shortest-path search exhausts the better tier before stepping down.

use std::collections::{BTreeMap, BTreeSet};

use crate::core::{LifecyclePhase, Node};

/// Rank increment. Small enough that rank arithmetic stays well away from
/// integer boundaries of f64 for realistic graph sizes.
pub(super) const WEIGHT_DELTA: f64 = 1e-2;

/// Replace every placeholder edge weight with the target node's rank.
pub(super) fn assign(nodes: &[Node], out: &mut [BTreeMap<usize, f64>], inc: &[BTreeSet<usize>]) {
    let mut order: Vec<usize> = (0..nodes.len()).collect();
    // Best phase first; within a phase, highest version first. The node
    // order tail keeps the walk reproducible for equal versions.
    order.sort_by(|&a, &b| {
        let (na, nb) = (&nodes[a], &nodes[b]);
        na.phase.cmp(&nb.phase).then_with(|| nb.compare(na))
    });

    let mut rank = 0.0_f64;
    let mut next_tier_rank = 0.0_f64;
    let mut current_phase: Option<LifecyclePhase> = None;

    for slot in order {
        let phase = nodes[slot].phase;
        if current_phase != Some(phase) {
            if current_phase.is_some() {
                rank = next_tier_rank;
                next_tier_rank = 0.0;
            }
            current_phase = Some(phase);
        }
        rank += WEIGHT_DELTA;
        next_tier_rank += rank;
        for &from in &inc[slot] {
            out[from].insert(slot, rank);
        }
    }
}
