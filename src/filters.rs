//! Composable edge predicates over the core graph.

use rustc_hash::FxHashSet;

use crate::graph::{CoreGraph, EdgeState};

/// Accept or reject an oriented edge during traversal.
pub trait EdgeFilter {
    fn accept(&self, edge: &EdgeState) -> bool;

    /// Short name appended to artifact file names. Empty for anonymous
    /// filters.
    fn name(&self) -> &str {
        ""
    }
}

/// Restricts traversal to the core, with direction control.
///
/// Edges with an endpoint outside the stored node range pass unconditionally;
/// those are query-time extension nodes, not part of the stored graph. With
/// `fwd` set the edge passes when traversable base -> adj, with `bwd` when
/// traversable adj -> base; setting both accepts either direction.
pub struct InCoreFilter<'g> {
    graph: &'g CoreGraph,
    fwd: bool,
    bwd: bool,
}

impl<'g> InCoreFilter<'g> {
    pub fn new(graph: &'g CoreGraph, fwd: bool, bwd: bool) -> Self {
        Self { graph, fwd, bwd }
    }
}

impl EdgeFilter for InCoreFilter<'_> {
    fn accept(&self, edge: &EdgeState) -> bool {
        let node_count = self.graph.node_count();
        if edge.base >= node_count || edge.adj >= node_count {
            return true;
        }
        if !self.graph.is_core_node(edge.base) || !self.graph.is_core_node(edge.adj) {
            return false;
        }
        (self.fwd && edge.fwd) || (self.bwd && edge.bwd)
    }
}

/// Rejects edges whose id is in the blocked set.
pub struct BlockedEdgesFilter<'a> {
    blocked: &'a FxHashSet<u32>,
}

impl<'a> BlockedEdgesFilter<'a> {
    pub fn new(blocked: &'a FxHashSet<u32>) -> Self {
        Self { blocked }
    }
}

impl EdgeFilter for BlockedEdgesFilter<'_> {
    fn accept(&self, edge: &EdgeState) -> bool {
        !self.blocked.contains(&edge.edge)
    }
}

/// Accepts only edges traversable in both directions.
pub struct BothDirectionsFilter;

impl EdgeFilter for BothDirectionsFilter {
    fn accept(&self, edge: &EdgeState) -> bool {
        edge.fwd && edge.bwd
    }
}

/// AND-composition of filters.
#[derive(Default)]
pub struct FilterSequence<'a> {
    filters: Vec<&'a dyn EdgeFilter>,
}

impl<'a> FilterSequence<'a> {
    pub fn new() -> Self {
        Self { filters: Vec::new() }
    }

    pub fn add(&mut self, filter: &'a dyn EdgeFilter) {
        self.filters.push(filter);
    }
}

impl EdgeFilter for FilterSequence<'_> {
    fn accept(&self, edge: &EdgeState) -> bool {
        self.filters.iter().all(|f| f.accept(edge))
    }
}
