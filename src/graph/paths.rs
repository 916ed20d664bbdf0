//! All-pairs shortest paths over the built graph.
//!
//! Weights are non-negative, so Dijkstra from every source is sufficient.
//! The index is computed once during construction and read-only afterwards;
//! nodes themselves carry no path state.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};

use crate::core::Node;

use super::Graph;

/// Distance and predecessor matrices, slot-indexed.
#[derive(Debug)]
pub(super) struct PathIndex {
    dist: Vec<Vec<f64>>,
    prev: Vec<Vec<Option<usize>>>,
}

impl PathIndex {
    pub(super) fn empty() -> Self {
        Self {
            dist: Vec::new(),
            prev: Vec::new(),
        }
    }

    pub(super) fn compute(out: &[BTreeMap<usize, f64>]) -> Self {
        let n = out.len();
        let mut dist = vec![vec![f64::INFINITY; n]; n];
        let mut prev = vec![vec![None; n]; n];
        for source in 0..n {
            dijkstra(source, out, &mut dist[source], &mut prev[source]);
        }
        Self { dist, prev }
    }

    pub(super) fn distance(&self, from: usize, to: usize) -> f64 {
        self.dist[from][to]
    }

    /// Slots along the shortest path, inclusive of both endpoints; empty
    /// when unreachable.
    pub(super) fn walk(&self, from: usize, to: usize) -> Vec<usize> {
        if self.dist[from][to].is_infinite() {
            return Vec::new();
        }
        let mut slots = vec![to];
        let mut cur = to;
        while cur != from {
            match self.prev[from][cur] {
                Some(p) => {
                    slots.push(p);
                    cur = p;
                }
                None => return Vec::new(),
            }
        }
        slots.reverse();
        slots
    }
}

struct QueueEntry {
    dist: f64,
    slot: usize,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    // Reversed: BinaryHeap is a max-heap, we want the nearest slot first.
    // The slot tiebreak keeps pop order deterministic for equal distances.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| other.slot.cmp(&self.slot))
    }
}

fn dijkstra(
    source: usize,
    out: &[BTreeMap<usize, f64>],
    dist: &mut [f64],
    prev: &mut [Option<usize>],
) {
    dist[source] = 0.0;
    let mut heap = BinaryHeap::new();
    heap.push(QueueEntry {
        dist: 0.0,
        slot: source,
    });
    while let Some(QueueEntry { dist: d, slot: u }) = heap.pop() {
        if d > dist[u] {
            continue;
        }
        for (&v, &w) in &out[u] {
            let candidate = d + w;
            if candidate < dist[v] {
                dist[v] = candidate;
                prev[v] = Some(u);
                heap.push(QueueEntry {
                    dist: candidate,
                    slot: v,
                });
            }
        }
    }
}

/// Shortest-path query view borrowed from a graph.
#[derive(Clone, Copy)]
pub struct Paths<'g> {
    graph: &'g Graph,
}

impl<'g> Paths<'g> {
    pub(super) fn new(graph: &'g Graph) -> Self {
        Self { graph }
    }

    /// The shortest path between two node identities and its total weight.
    ///
    /// Unknown identities and unreachable pairs yield `([], +inf)`; a node
    /// trivially reaches itself with weight zero.
    pub fn between(&self, from: i64, to: i64) -> (Vec<&'g Node>, f64) {
        let (Some(from_slot), Some(to_slot)) = (
            self.graph.node_by_id(from).and_then(|n| self.graph.slot_of(n)),
            self.graph.node_by_id(to).and_then(|n| self.graph.slot_of(n)),
        ) else {
            return (Vec::new(), f64::INFINITY);
        };
        let index = self.graph.path_index();
        let slots = index.walk(from_slot, to_slot);
        if slots.is_empty() {
            return (Vec::new(), f64::INFINITY);
        }
        let path = slots.into_iter().map(|s| self.graph.node_at(s)).collect();
        (path, index.distance(from_slot, to_slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dijkstra_prefers_cheap_direct_edge() {
        // 0 -> 1 (0.03), 0 -> 2 (0.01), 1 -> 2 (0.01)
        let out = vec![
            BTreeMap::from([(1, 0.03), (2, 0.01)]),
            BTreeMap::from([(2, 0.01)]),
            BTreeMap::new(),
        ];
        let index = PathIndex::compute(&out);
        assert_eq!(index.walk(0, 2), vec![0, 2]);
        assert_eq!(index.distance(0, 2), 0.01);
        assert_eq!(index.walk(0, 1), vec![0, 1]);
        assert_eq!(index.distance(1, 2), 0.01);
    }

    #[test]
    fn dijkstra_takes_multi_hop_when_cheaper() {
        // 0 -> 1 (0.01), 1 -> 2 (0.01), 0 -> 2 (0.05)
        let out = vec![
            BTreeMap::from([(1, 0.01), (2, 0.05)]),
            BTreeMap::from([(2, 0.01)]),
            BTreeMap::new(),
        ];
        let index = PathIndex::compute(&out);
        assert_eq!(index.walk(0, 2), vec![0, 1, 2]);
        assert!((index.distance(0, 2) - 0.02).abs() < 1e-12);
    }

    #[test]
    fn unreachable_is_infinite_and_empty() {
        let out = vec![BTreeMap::new(), BTreeMap::from([(0, 0.01)])];
        let index = PathIndex::compute(&out);
        assert!(index.distance(0, 1).is_infinite());
        assert!(index.walk(0, 1).is_empty());
    }

    #[test]
    fn self_path_is_zero_and_single_slot() {
        let out = vec![BTreeMap::new()];
        let index = PathIndex::compute(&out);
        assert_eq!(index.distance(0, 0), 0.0);
        assert_eq!(index.walk(0, 0), vec![0]);
    }
}
