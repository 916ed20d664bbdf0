//! First-class node and edge predicates.

use semver::VersionReq;

use crate::core::Node;

use super::Graph;

/// A reusable filter over graph nodes.
pub struct NodePredicate(Box<dyn Fn(&Graph, &Node) -> bool + Send + Sync>);

impl NodePredicate {
    pub fn new(f: impl Fn(&Graph, &Node) -> bool + Send + Sync + 'static) -> Self {
        Self(Box::new(f))
    }

    pub fn matches(&self, graph: &Graph, node: &Node) -> bool {
        (self.0)(graph, node)
    }
}

/// Matches every node.
pub fn all_nodes() -> NodePredicate {
    NodePredicate::new(|_, _| true)
}

/// Matches nodes accepted by every predicate.
pub fn and_nodes(preds: impl IntoIterator<Item = NodePredicate>) -> NodePredicate {
    let preds: Vec<NodePredicate> = preds.into_iter().collect();
    NodePredicate::new(move |g, n| preds.iter().all(|p| p.matches(g, n)))
}

/// Matches nodes accepted by at least one predicate.
pub fn or_nodes(preds: impl IntoIterator<Item = NodePredicate>) -> NodePredicate {
    let preds: Vec<NodePredicate> = preds.into_iter().collect();
    NodePredicate::new(move |g, n| preds.iter().any(|p| p.matches(g, n)))
}

/// Matches nodes of the named package.
pub fn package_nodes(name: impl Into<String>) -> NodePredicate {
    let name = name.into();
    NodePredicate::new(move |_, n| n.name == name)
}

/// Matches nodes whose version satisfies the requirement.
pub fn node_in_range(range: VersionReq) -> NodePredicate {
    NodePredicate::new(move |_, n| range.matches(&n.version))
}

/// A reusable filter over weighted edges.
pub struct EdgePredicate(Box<dyn Fn(&Graph, &Node, &Node, f64) -> bool + Send + Sync>);

impl EdgePredicate {
    pub fn new(f: impl Fn(&Graph, &Node, &Node, f64) -> bool + Send + Sync + 'static) -> Self {
        Self(Box::new(f))
    }

    pub fn matches(&self, graph: &Graph, from: &Node, to: &Node, weight: f64) -> bool {
        (self.0)(graph, from, to, weight)
    }
}

/// Matches every edge.
pub fn all_edges() -> EdgePredicate {
    EdgePredicate::new(|_, _, _, _| true)
}
