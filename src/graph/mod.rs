//! Upgrade graph construction and queries.
//!
//! A graph is built once from streams, node specs, an as-of instant, and the
//! pre-GA flag; afterwards it is read-only. Construction binds each node to
//! its stream, admits edges under the upgrade rules, assigns tier-aware
//! weights, and precomputes the all-pairs shortest-path index and the head
//! set.

mod paths;
mod predicates;
mod weight;

pub use paths::Paths;
pub use predicates::{
    all_edges, all_nodes, and_nodes, node_in_range, or_nodes, package_nodes, EdgePredicate,
    NodePredicate,
};

use std::collections::{BTreeMap, BTreeSet, HashMap};

use thiserror::Error;
use time::OffsetDateTime;

use crate::core::{CanonicalReference, LifecyclePhase, MajorMinor, Node, NodeSpec, VersionStream};

use paths::PathIndex;

/// Inputs for one graph construction.
#[derive(Clone, Debug)]
pub struct GraphConfig {
    pub streams: Vec<VersionStream>,
    pub nodes: Vec<NodeSpec>,
    /// The instant lifecycle phases are evaluated at.
    pub as_of: OffsetDateTime,
    /// Admit nodes whose stream has not yet reached full support.
    pub include_pre_ga: bool,
}

/// Fatal construction failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GraphError {
    #[error("invalid graph configuration: {}", .problems.join("; "))]
    InvalidConfig { problems: Vec<String> },
}

/// A node skipped during construction because no stream covers its
/// `major.minor`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error(
    "node with reference {image} has major.minor version {version}, but that version is not in an available stream"
)]
pub struct UnknownStream {
    pub image: CanonicalReference,
    pub version: MajorMinor,
}

/// A built graph plus the non-fatal problems collected on the way.
#[derive(Debug)]
pub struct BuildOutcome {
    pub graph: Graph,
    /// Nodes that did not bind; the graph is fully usable without them.
    pub unbound: Vec<UnknownStream>,
}

/// Weighted directed acyclic upgrade graph over bound nodes.
#[derive(Debug)]
pub struct Graph {
    /// Bind order; all enumerations derive from this order.
    nodes: Vec<Node>,
    ids: HashMap<i64, usize>,
    out: Vec<BTreeMap<usize, f64>>,
    inc: Vec<BTreeSet<usize>>,
    index: PathIndex,
    heads: Vec<usize>,
}

impl GraphConfig {
    /// Collect every configuration problem; fatal as a whole if any.
    pub fn validate(&self) -> Result<(), GraphError> {
        let mut problems = Vec::new();
        if self.streams.is_empty() {
            problems.push("no streams specified".to_string());
        }
        for stream in &self.streams {
            if let Err(err) = stream.lifecycle_dates.validate_order() {
                problems.push(format!("stream \"{}\" invalid: {err}", stream.version));
            }
        }
        if self.nodes.is_empty() {
            problems.push("no nodes specified".to_string());
        }
        if self.as_of == OffsetDateTime::UNIX_EPOCH {
            problems.push("no as-of timestamp specified".to_string());
        }
        let names: BTreeSet<&str> = self
            .nodes
            .iter()
            .filter(|n| !n.name.is_empty())
            .map(|n| n.name.as_str())
            .collect();
        if !self.nodes.is_empty() && names.is_empty() {
            problems.push("invalid nodes: no nodes have a name".to_string());
        }
        if names.len() > 1 {
            let listed: Vec<&str> = names.into_iter().collect();
            problems.push(format!(
                "invalid nodes: found more than one name in the set of node names, expected exactly one: {}",
                listed.join(", ")
            ));
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(GraphError::InvalidConfig { problems })
        }
    }
}

impl Graph {
    /// Build the upgrade graph.
    ///
    /// Nodes whose `major.minor` has no stream are skipped and reported on
    /// the outcome rather than failing the build.
    pub fn build(cfg: GraphConfig) -> Result<BuildOutcome, GraphError> {
        cfg.validate()?;
        let GraphConfig {
            streams,
            mut nodes,
            as_of,
            include_pre_ga,
        } = cfg;

        let streams_by_version: BTreeMap<MajorMinor, VersionStream> = streams
            .into_iter()
            .map(|s| (s.version, s))
            .collect();

        // Release order decides which nodes are upgrade sources for which.
        // Ties fall back to node order so construction is reproducible.
        nodes.sort_by(|a, b| {
            a.release_date
                .cmp(&b.release_date)
                .then_with(|| a.version.cmp(&b.version))
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.release.cmp(&b.release))
        });

        let mut graph = Graph {
            nodes: Vec::new(),
            ids: HashMap::new(),
            out: Vec::new(),
            inc: Vec::new(),
            index: PathIndex::empty(),
            heads: Vec::new(),
        };
        let mut unbound = Vec::new();

        for spec in nodes {
            let mm = MajorMinor::from_version(&spec.version);
            let Some(stream) = streams_by_version.get(&mm) else {
                tracing::warn!(image = %spec.image, version = %mm, "node version not in an available stream");
                unbound.push(UnknownStream {
                    image: spec.image.clone(),
                    version: mm,
                });
                continue;
            };

            let phase = stream.lifecycle_dates.phase(as_of);
            if !include_pre_ga && phase == LifecyclePhase::PreGA {
                continue;
            }

            let node = spec.bind(
                phase,
                stream.supported_platform_versions.clone(),
                stream.requires_update_platform_versions.clone(),
            );
            graph.insert_bound(node, &stream.minimum_update_version);
        }

        weight::assign(&graph.nodes, &mut graph.out, &graph.inc);
        graph.index = PathIndex::compute(&graph.out);
        graph.heads = (0..graph.nodes.len())
            .filter(|&slot| graph.out[slot].is_empty())
            .collect();

        tracing::debug!(
            nodes = graph.nodes.len(),
            edges = graph.out.iter().map(BTreeMap::len).sum::<usize>(),
            heads = graph.heads.len(),
            skipped = unbound.len(),
            "upgrade graph constructed"
        );
        Ok(BuildOutcome {
            graph,
            unbound,
        })
    }

    /// Append a bound node and admit edges from every earlier-released node.
    fn insert_bound(&mut self, to: Node, minimum_update_version: &semver::Version) {
        let slot = self.nodes.len();
        self.out.push(BTreeMap::new());
        self.inc.push(BTreeSet::new());
        for (from_slot, from) in self.nodes.iter().enumerate() {
            if !admissible(from, &to, minimum_update_version) {
                continue;
            }
            // Placeholder weight; the final weight is assigned once all
            // edges are known.
            self.out[from_slot].insert(slot, 1.0);
            self.inc[slot].insert(from_slot);
        }
        self.ids.insert(to.id(), slot);
        self.nodes.push(to);
    }

    /// Nodes in bind order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_by_id(&self, id: i64) -> Option<&Node> {
        self.ids.get(&id).map(|&slot| &self.nodes[slot])
    }

    /// Nodes matching `pred`, in bind order.
    pub fn nodes_matching<'g>(
        &'g self,
        pred: &'g NodePredicate,
    ) -> impl Iterator<Item = &'g Node> + 'g {
        self.nodes.iter().filter(move |n| pred.matches(self, n))
    }

    pub fn first_node_matching(&self, pred: &NodePredicate) -> Option<&Node> {
        self.nodes.iter().find(|n| pred.matches(self, n))
    }

    /// Edges matching `pred` as `(from, to, weight)`, in bind order of the
    /// source node.
    pub fn edges_matching<'g>(
        &'g self,
        pred: &'g EdgePredicate,
    ) -> impl Iterator<Item = (&'g Node, &'g Node, f64)> + 'g {
        self.out.iter().enumerate().flat_map(move |(u, succs)| {
            succs.iter().filter_map(move |(&v, &w)| {
                let edge = (&self.nodes[u], &self.nodes[v], w);
                pred.matches(self, edge.0, edge.1, w).then_some(edge)
            })
        })
    }

    /// Out-neighbors of `n`, in bind order.
    pub fn successors(&self, n: &Node) -> Vec<&Node> {
        match self.slot_of(n) {
            Some(slot) => self.out[slot].keys().map(|&v| &self.nodes[v]).collect(),
            None => Vec::new(),
        }
    }

    /// In-neighbors of `n`, in bind order.
    pub fn predecessors(&self, n: &Node) -> Vec<&Node> {
        match self.slot_of(n) {
            Some(slot) => self.inc[slot].iter().map(|&u| &self.nodes[u]).collect(),
            None => Vec::new(),
        }
    }

    /// The weight of `u -> v`, or positive infinity if absent.
    pub fn edge_weight(&self, u: &Node, v: &Node) -> f64 {
        match (self.slot_of(u), self.slot_of(v)) {
            (Some(us), Some(vs)) => self.out[us].get(&vs).copied().unwrap_or(f64::INFINITY),
            _ => f64::INFINITY,
        }
    }

    /// Nodes with no outgoing edge, in bind order.
    pub fn heads(&self) -> Vec<&Node> {
        self.heads.iter().map(|&slot| &self.nodes[slot]).collect()
    }

    /// Shortest-path queries over the precomputed index.
    pub fn paths(&self) -> Paths<'_> {
        Paths::new(self)
    }

    fn slot_of(&self, n: &Node) -> Option<usize> {
        self.ids.get(&n.id()).copied()
    }

    fn node_at(&self, slot: usize) -> &Node {
        &self.nodes[slot]
    }

    fn path_index(&self) -> &PathIndex {
        &self.index
    }
}

/// The edge admissibility rules.
fn admissible(from: &Node, to: &Node, minimum_update_version: &semver::Version) -> bool {
    // Only strict version increases; equal versions are never connected,
    // even when they differ by release.
    if from.version >= to.version {
        return false;
    }
    // Don't update from a version below the stream's minimum update version.
    if from.version < *minimum_update_version {
        return false;
    }
    // Don't update to a different major version.
    if from.version.major != to.version.major {
        return false;
    }
    // Lifecycle tiers may be descended (the weights make that expensive)
    // but never ascended.
    if to.phase.is_better_than(from.phase) {
        return false;
    }
    // Don't update across minor versions into an end-of-life version. Within
    // the same minor, end-of-life nodes stay connected so a customer already
    // inside such a stream can still receive its latest patch.
    if from.version.minor != to.version.minor && to.phase == LifecyclePhase::EndOfLife {
        return false;
    }
    true
}
