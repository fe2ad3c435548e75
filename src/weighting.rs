//! Weighting contracts and the landmark-selection weighting.

use crate::graph::{CoreGraph, EdgeState};

/// Converts edges to numeric costs.
///
/// `reverse` asks for the cost of traversing the oriented edge adj -> base.
/// `prev_or_next_edge` carries the adjacent edge id for turn-aware
/// weightings; plain weightings ignore it.
pub trait Weighting {
    fn calc_weight(&self, edge: &EdgeState, reverse: bool, prev_or_next_edge: Option<u32>) -> f64;

    /// Lower bound for the weight of any path covering `distance` metres.
    fn min_weight(&self, distance: f64) -> f64;

    fn name(&self) -> &str;
}

/// Weight equals the stored edge weight (metres for distance-built graphs).
pub struct ShortestWeighting;

impl Weighting for ShortestWeighting {
    fn calc_weight(&self, edge: &EdgeState, _reverse: bool, _prev_or_next_edge: Option<u32>) -> f64 {
        edge.weight
    }

    fn min_weight(&self, distance: f64) -> f64 {
        distance
    }

    fn name(&self) -> &str {
        "shortest"
    }
}

/// Selection-only weighting: a plain edge counts one hop, a shortcut counts
/// the number of original edges it skips.
///
/// Returning travel time or distance here leads to strange landmark
/// positions (ferries are slow and very long), so landmark selection runs a
/// BFS-like search on hop counts instead. Accessibility still follows the
/// wrapped weighting so that selection cannot reach nodes the real weighting
/// cannot.
pub struct HopCountWeighting<'g> {
    graph: &'g CoreGraph,
    base: &'g dyn Weighting,
}

impl<'g> HopCountWeighting<'g> {
    pub fn new(graph: &'g CoreGraph, base: &'g dyn Weighting) -> Self {
        Self { graph, base }
    }

    /// Count the original edges below `state`.
    ///
    /// `skipped1` is resolved against the base node first; whichever of the
    /// two skipped edges does not attach there attaches to the adjacent
    /// node. Shortcut trees are DAGs by construction of the hierarchy, so
    /// the recursion terminates.
    fn expand(&self, state: &EdgeState, _reverse: bool, count: &mut u64) {
        if !state.is_shortcut() {
            *count += 1;
            return;
        }

        let (skipped1, skipped2) = match state.skipped {
            Some(pair) => pair,
            None => return,
        };
        let from = state.base;
        let to = state.adj;

        let mut iter = self.graph.edge_state(skipped1, from);
        let empty = iter.is_none();
        if empty {
            iter = self.graph.edge_state(skipped2, from);
        }
        if let Some(first) = iter {
            self.expand(&first, true, count);
        }

        let second = if empty {
            self.graph.edge_state(skipped1, to)
        } else {
            self.graph.edge_state(skipped2, to)
        };
        if let Some(second) = second {
            self.expand(&second, false, count);
        }
    }
}

impl Weighting for HopCountWeighting<'_> {
    fn calc_weight(&self, edge: &EdgeState, reverse: bool, prev_or_next_edge: Option<u32>) -> f64 {
        if edge.is_shortcut() {
            if edge.weight >= f64::MAX {
                return f64::INFINITY;
            }
            let mut hops = 0u64;
            self.expand(edge, false, &mut hops);
            return hops as f64;
        }

        let res = self.base.calc_weight(edge, reverse, prev_or_next_edge);
        if res >= f64::MAX {
            return f64::INFINITY;
        }
        1.0
    }

    fn min_weight(&self, distance: f64) -> f64 {
        self.base.min_weight(distance)
    }

    fn name(&self) -> &str {
        "lm_bfs"
    }
}

/// Sanitise a weighting or filter name for use in a file name.
pub fn weighting_file_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
