//! One-to-all Dijkstra over the filtered core.
//!
//! Drives both landmark selection (multi-source, hop-count weighting) and
//! weight filling (single-source, real weighting, forward and reverse).
//! The settle order is recorded because selection needs the last settled
//! node, the farthest one from all seeds.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::filters::EdgeFilter;
use crate::graph::CoreGraph;
use crate::weighting::Weighting;

struct HeapItem {
    weight: f64,
    node: u32,
}

impl PartialEq for HeapItem {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.node == other.node
    }
}

impl Eq for HeapItem {}

impl PartialOrd for HeapItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapItem {
    fn cmp(&self, other: &Self) -> Ordering {
        // min-heap on weight, ties settle the smaller node id first
        other
            .weight
            .partial_cmp(&self.weight)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.node.cmp(&self.node))
    }
}

pub struct LandmarkExplorer<'a> {
    graph: &'a CoreGraph,
    weighting: &'a dyn Weighting,
    filter: &'a dyn EdgeFilter,
    reverse: bool,
    weights: Vec<f64>,
    settled: Vec<bool>,
    order: Vec<(u32, f64)>,
    heap: BinaryHeap<HeapItem>,
}

impl<'a> LandmarkExplorer<'a> {
    /// With `reverse` set the search relaxes edges against their direction,
    /// computing distances *towards* the seeds.
    pub fn new(
        graph: &'a CoreGraph,
        weighting: &'a dyn Weighting,
        filter: &'a dyn EdgeFilter,
        reverse: bool,
    ) -> Self {
        let n = graph.node_count() as usize;
        Self {
            graph,
            weighting,
            filter,
            reverse,
            weights: vec![f64::INFINITY; n],
            settled: vec![false; n],
            order: Vec::new(),
            heap: BinaryHeap::new(),
        }
    }

    /// Seed the search. Call repeatedly for a multi-source run.
    pub fn init_from(&mut self, node: u32, weight: f64) {
        if weight < self.weights[node as usize] {
            self.weights[node as usize] = weight;
            self.heap.push(HeapItem { weight, node });
        }
    }

    pub fn run(&mut self) {
        while let Some(HeapItem { weight, node }) = self.heap.pop() {
            if self.settled[node as usize] {
                continue;
            }
            self.settled[node as usize] = true;
            self.order.push((node, weight));

            for edge in self.graph.edge_states(node) {
                if edge.adj >= self.graph.node_count() {
                    continue;
                }
                if !self.filter.accept(&edge) {
                    continue;
                }
                let edge_weight = self.weighting.calc_weight(&edge, self.reverse, None);
                if !edge_weight.is_finite() {
                    continue;
                }
                let next = weight + edge_weight;
                if next < self.weights[edge.adj as usize] {
                    self.weights[edge.adj as usize] = next;
                    self.heap.push(HeapItem { weight: next, node: edge.adj });
                }
            }
        }
    }

    /// The last settled node, i.e. the farthest from all seeds.
    pub fn last_node(&self) -> Option<u32> {
        self.order.last().map(|&(node, _)| node)
    }

    pub fn visited_nodes(&self) -> usize {
        self.order.len()
    }

    /// Settled nodes with their weights, in settle order.
    pub fn settled(&self) -> &[(u32, f64)] {
        &self.order
    }
}
