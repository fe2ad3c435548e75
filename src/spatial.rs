//! Spatial rule collaborators and border-edge detection.

use rustc_hash::FxHashSet;

use crate::geo::BBox;
use crate::graph::CoreGraph;

/// Maps a coordinate to the id of the spatial rule governing it.
pub trait SpatialRuleLookup {
    fn lookup_rule(&self, lat: f64, lon: f64) -> u32;

    /// Number of configured rules; zero disables the border cut.
    fn size(&self) -> usize;
}

/// Precomputed landmark list covering a bounding box.
///
/// Useful for manual tuning of larger areas: import time goes down and the
/// landmark quality can be hand-checked.
pub struct LandmarkSuggestion {
    bbox: BBox,
    node_ids: Vec<u32>,
}

impl LandmarkSuggestion {
    pub fn new(bbox: BBox, node_ids: Vec<u32>) -> Self {
        Self { bbox, node_ids }
    }

    pub fn bbox(&self) -> &BBox {
        &self.bbox
    }

    pub fn node_ids(&self) -> &[u32] {
        &self.node_ids
    }
}

/// Edge ids whose endpoints fall under different spatial rules.
///
/// Blocking these splits a world-wide graph into per-region subnetworks
/// without permanently changing the graph, so other algorithms can still
/// route across the borders.
pub fn find_border_edge_ids(graph: &CoreGraph, lookup: &dyn SpatialRuleLookup) -> FxHashSet<u32> {
    let mut inaccessible = FxHashSet::default();
    for state in graph.edges() {
        let rule_base = lookup.lookup_rule(graph.lat(state.base), graph.lon(state.base));
        let rule_adj = lookup.lookup_rule(graph.lat(state.adj), graph.lon(state.adj));
        if rule_base != rule_adj {
            inaccessible.insert(state.edge);
        }
    }
    inaccessible
}
