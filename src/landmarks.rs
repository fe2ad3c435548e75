//! Landmark storage for the core graph: selection, weight filling,
//! persistence and the query-time active-landmark picker.
//!
//! Build pipeline:
//! 1. block edges crossing spatial-rule borders,
//! 2. Tarjan components of the filtered core,
//! 3. per component: pick K spread landmarks by farthest-node iteration on
//!    the hop-count weighting,
//! 4. per landmark: forward and reverse Dijkstra with the real weighting,
//!    writing quantised weights into the byte-addressed table,
//! 5. append the landmark-id mapping, fill the header, mirror the
//!    subnetwork bytes, flush.
//!
//! Queries resolve the subnetwork of both endpoints, rank all landmarks of
//! that subnetwork by their current triangle-inequality gap and cache the
//! weights of a small active subset in caller-owned arrays.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use log::{error, info, warn};
use rustc_hash::FxHashSet;

use crate::codec::{WeightCodec, SHORT_INFINITY, SHORT_MAX};
use crate::error::{Error, Result};
use crate::explorer::LandmarkExplorer;
use crate::filters::{
    BlockedEdgesFilter, BothDirectionsFilter, EdgeFilter, FilterSequence, InCoreFilter,
};
use crate::formats::{SubnetworkTable, WeightTable, UNCLEAR_SUBNETWORK, UNSET_SUBNETWORK};
use crate::graph::{CoreGraph, CoreNodeIdMap};
use crate::spatial::{find_border_edge_ids, LandmarkSuggestion, SpatialRuleLookup};
use crate::tarjan;
use crate::weighting::{weighting_file_name, HopCountWeighting, Weighting};

const FROM_OFFSET: u64 = 0;
const TO_OFFSET: u64 = 2;

pub struct CoreLandmarks<'g> {
    graph: &'g CoreGraph,
    core_node_map: &'g CoreNodeIdMap,
    weighting: &'g dyn Weighting,
    user_filter: Option<&'g dyn EdgeFilter>,
    landmark_count: usize,
    /// Bytes per core node in the weight matrix: two shorts per landmark.
    lm_row_length: u64,
    minimum_nodes: usize,
    codec: Option<WeightCodec>,
    weights: WeightTable,
    subnetworks: SubnetworkTable,
    /// Landmark graph-node ids per subnetwork; index 0 is a placeholder so
    /// subnetwork ids align with list positions.
    landmark_ids: Vec<Vec<i32>>,
    suggestions: Vec<LandmarkSuggestion>,
    rule_lookup: Option<&'g dyn SpatialRuleLookup>,
    cancelled: Arc<AtomicBool>,
    log_details: bool,
    initialized: bool,
}

impl<'g> CoreLandmarks<'g> {
    pub fn new(
        dir: &Path,
        graph: &'g CoreGraph,
        core_node_map: &'g CoreNodeIdMap,
        weighting: &'g dyn Weighting,
        user_filter: Option<&'g dyn EdgeFilter>,
        landmark_count: usize,
    ) -> Self {
        assert!(landmark_count > 0, "landmark count must be positive");

        let mut name = weighting_file_name(weighting.name());
        if let Some(filter) = user_filter {
            name.push_str(&weighting_file_name(filter.name()));
        }

        Self {
            graph,
            core_node_map,
            weighting,
            user_filter,
            landmark_count,
            lm_row_length: landmark_count as u64 * 4,
            minimum_nodes: (core_node_map.len() as usize / 2).min(10_000),
            codec: None,
            weights: WeightTable::new(dir.join(format!("landmarks_core_{name}"))),
            subnetworks: SubnetworkTable::new(
                dir.join(format!("landmarks_core_{name}.subnetwork")),
            ),
            landmark_ids: Vec::new(),
            suggestions: Vec::new(),
            rule_lookup: None,
            cancelled: Arc::new(AtomicBool::new(false)),
            log_details: false,
            initialized: false,
        }
    }

    /// Fix the maximum weight the build expects to store. The same value is
    /// used for all subnetworks; pass a non-positive value to keep the
    /// automatic estimate.
    pub fn set_maximum_weight(&mut self, max_weight: f64) -> Result<()> {
        if max_weight > 0.0 {
            self.codec = Some(WeightCodec::from_max_weight(max_weight)?);
        }
        Ok(())
    }

    /// Required node count for a subnetwork to get landmarks; smaller
    /// components are tagged unclear and skipped.
    pub fn set_minimum_nodes(&mut self, minimum_nodes: usize) {
        self.minimum_nodes = minimum_nodes;
    }

    pub fn minimum_nodes(&self) -> usize {
        self.minimum_nodes
    }

    /// Skip the expensive landmark search wherever a suggestion covers the
    /// subnetwork start node.
    pub fn set_landmark_suggestions(&mut self, suggestions: Vec<LandmarkSuggestion>) {
        self.suggestions = suggestions;
    }

    /// Split areas along spatial-rule borders during the build without
    /// permanently changing the graph.
    pub fn set_spatial_rule_lookup(&mut self, lookup: &'g dyn SpatialRuleLookup) {
        self.rule_lookup = Some(lookup);
    }

    pub fn set_log_details(&mut self, log_details: bool) {
        self.log_details = log_details;
    }

    /// Flag checked between build iterations; setting it aborts the build
    /// with [`Error::Cancelled`].
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn landmark_count(&self) -> usize {
        self.landmark_count
    }

    pub fn factor(&self) -> f64 {
        self.codec.map(|c| c.factor()).unwrap_or(-1.0)
    }

    /// Landmark graph-node ids of a subnetwork.
    pub fn landmarks(&self, subnetwork: usize) -> &[i32] {
        &self.landmark_ids[subnetwork]
    }

    /// Number of subnetworks including the index-0 placeholder.
    pub fn subnetworks_with_landmarks(&self) -> usize {
        self.landmark_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmark_ids.len() < 2
    }

    /// Compute landmarks and their weights for every qualifying subnetwork.
    pub fn create_landmarks(&mut self) -> Result<()> {
        if self.initialized {
            return Err(Error::AlreadyInitialized);
        }
        let started = Instant::now();
        let graph = self.graph;
        let core_nodes = self.core_node_map.len() as u64;
        let max_bytes = core_nodes * self.lm_row_length;

        self.weights.ensure_capacity(max_bytes);
        for pos in (0..max_bytes).step_by(2) {
            self.weights.set_u16(pos, SHORT_INFINITY);
        }

        let codec = match self.codec {
            Some(codec) => codec,
            None => {
                let codec = self.estimate_codec()?;
                self.codec = Some(codec);
                codec
            }
        };
        if self.log_details {
            info!(
                "init landmarks for subnetworks with node count greater than {} with factor {}",
                self.minimum_nodes,
                codec.factor()
            );
        }

        self.landmark_ids.clear();
        self.landmark_ids.push(vec![UNSET_SUBNETWORK as i32; self.landmark_count]);

        let mut subnetworks = vec![UNSET_SUBNETWORK; core_nodes as usize];

        // the rule lookup splits certain areas from each other but avoids
        // making this a permanent change so that other algorithms can still
        // route through these regions
        let mut blocked: FxHashSet<u32> = FxHashSet::default();
        if let Some(lookup) = self.rule_lookup {
            if lookup.size() > 0 {
                let sw = Instant::now();
                blocked = find_border_edge_ids(graph, lookup);
                if self.log_details {
                    info!(
                        "made {} edges inaccessible, calculated border cut in {:.1}s",
                        blocked.len(),
                        sw.elapsed().as_secs_f64()
                    );
                }
            }
        }

        // subnetworks are recalculated from scratch here: reusing components
        // computed on the full graph misbehaves with many oneways
        let tarjan_core = InCoreFilter::new(graph, true, false);
        let blocked_filter = BlockedEdgesFilter::new(&blocked);
        let mut tarjan_filter = FilterSequence::new();
        tarjan_filter.add(&tarjan_core);
        tarjan_filter.add(&blocked_filter);
        if let Some(filter) = self.user_filter {
            tarjan_filter.add(filter);
        }

        let sw = Instant::now();
        let components = tarjan::find_components(graph, &tarjan_filter);
        if self.log_details {
            info!(
                "calculated {} subnetworks via tarjan in {:.1}s",
                components.len(),
                sw.elapsed().as_secs_f64()
            );
        }

        // start nodes must be reachable from both sides
        let start_core = InCoreFilter::new(graph, true, true);
        let mut start_filter = FilterSequence::new();
        start_filter.add(&start_core);
        start_filter.add(&BothDirectionsFilter);

        let mut nodes = 0usize;
        for component in &components {
            nodes += component.len();
            if component.len() < self.minimum_nodes {
                for &node in component {
                    let core_index = self.core_node_map.index(node) as usize;
                    if subnetworks[core_index] == UNSET_SUBNETWORK {
                        subnetworks[core_index] = UNCLEAR_SUBNETWORK;
                    }
                }
                continue;
            }

            for &candidate in component.iter().rev() {
                let core_index = self.core_node_map.index(candidate) as usize;
                if subnetworks[core_index] != UNSET_SUBNETWORK {
                    continue;
                }
                if !graph.edge_states(candidate).any(|e| start_filter.accept(&e)) {
                    continue;
                }
                if self.create_landmarks_for_subnetwork(
                    candidate,
                    &mut subnetworks,
                    &blocked,
                    codec,
                )? {
                    break;
                }
            }
        }

        let subnetwork_count = self.landmark_ids.len();
        // store all landmark node ids behind the weight matrix
        self.weights
            .ensure_capacity(max_bytes + subnetwork_count as u64 * self.landmark_count as u64 * 4);
        let mut byte_pos = max_bytes;
        for ids in &self.landmark_ids {
            for &id in ids {
                self.weights.set_i32(byte_pos, id);
                byte_pos += 4;
            }
        }

        self.weights.set_header(0, core_nodes as i32);
        self.weights.set_header(1, self.landmark_count as i32);
        self.weights.set_header(2, subnetwork_count as i32);
        self.weights.set_header(3, codec.header_value()?);

        self.subnetworks.create(core_nodes as usize);
        for (core_index, &subnetwork) in subnetworks.iter().enumerate() {
            self.subnetworks.set_subnetwork(core_index, subnetwork);
        }

        if self.log_details {
            info!(
                "finished landmark creation in {:.1}s, subnetwork node count sum {} vs. core nodes {}",
                started.elapsed().as_secs_f64(),
                nodes,
                core_nodes
            );
        }
        self.initialized = true;
        Ok(())
    }

    /// Estimate the codec through the graph boundaries and the weighting.
    ///
    /// Picking the distance too big for small areas leads to rounding errors
    /// and slightly suboptimal routes; picking it too small maxes weights
    /// out, which costs far more performance.
    fn estimate_codec(&self) -> Result<WeightCodec> {
        let bounds = self.graph.bounds();
        let mut distance_m = if bounds.is_valid() { bounds.diagonal_m() * 7.0 } else { f64::MAX };
        if !bounds.is_valid() || distance_m > 50_000.0 * 7.0 {
            distance_m = 30_000_000.0;
        }
        let max_weight = self.weighting.min_weight(distance_m);
        if self.log_details {
            info!(
                "estimated maximum weight {max_weight} from max distance {}km",
                distance_m / 1000.0
            );
        }
        WeightCodec::from_max_weight(max_weight)
    }

    /// Build landmarks and weights for the component containing `start_node`.
    ///
    /// Returns `Ok(false)` when the component turned out too small or
    /// overlaps an already-tagged subnetwork; the caller then tries the next
    /// candidate start node.
    fn create_landmarks_for_subnetwork(
        &mut self,
        start_node: u32,
        subnetworks: &mut [i8],
        blocked: &FxHashSet<u32>,
        codec: WeightCodec,
    ) -> Result<bool> {
        let subnetwork_id = self.landmark_ids.len();
        if subnetwork_id > 127 {
            return Err(Error::TooManySubnetworks(subnetwork_id));
        }

        let graph = self.graph;
        let landmarks = self.landmark_count;
        let mut landmark_nodes = vec![UNSET_SUBNETWORK as i32; landmarks];
        let log_offset = (landmarks / 2).max(1);

        let blocked_filter = BlockedEdgesFilter::new(blocked);
        let select_core = InCoreFilter::new(graph, true, true);
        let mut select_filter = FilterSequence::new();
        select_filter.add(&select_core);
        select_filter.add(&blocked_filter);
        if let Some(filter) = self.user_filter {
            select_filter.add(filter);
        }

        let mut picked_suggestions = false;
        if !self.suggestions.is_empty() {
            let lat = graph.lat(start_node);
            let lon = graph.lon(start_node);
            if let Some(suggestion) =
                self.suggestions.iter().find(|s| s.bbox().contains(lat, lon))
            {
                if suggestion.node_ids().len() < landmarks {
                    return Err(Error::InsufficientSuggestions {
                        got: suggestion.node_ids().len(),
                        want: landmarks,
                    });
                }
                picked_suggestions = true;
                for (slot, &node_id) in
                    landmark_nodes.iter_mut().zip(suggestion.node_ids().iter())
                {
                    *slot = node_id as i32;
                }
            }
        }

        if picked_suggestions {
            info!("picked {landmarks} landmark suggestions, skipped expensive landmark determination");
        } else {
            // pick landmarks via the hop-count weighting for a better
            // geographical spread
            let hop_weighting = HopCountWeighting::new(graph, self.weighting);
            let mut explorer = LandmarkExplorer::new(graph, &hop_weighting, &select_filter, false);
            explorer.init_from(start_node, 0.0);
            explorer.run();

            if explorer.visited_nodes() < self.minimum_nodes {
                // too small, initialize with the special unclear id
                self.set_subnetworks(explorer.settled(), subnetworks, UNCLEAR_SUBNETWORK);
                return Ok(false);
            }

            let Some(first) = explorer.last_node() else {
                return Ok(false);
            };
            landmark_nodes[0] = first as i32;
            let mut network_size = explorer.visited_nodes();

            for landmark_index in 0..landmarks - 1 {
                if self.cancelled.load(Ordering::Relaxed) {
                    return Err(Error::Cancelled);
                }
                let mut explorer =
                    LandmarkExplorer::new(graph, &hop_weighting, &select_filter, false);
                // seed all current landmarks so the last settled node is a
                // far-away one
                for &picked in landmark_nodes.iter().take(landmark_index + 1) {
                    explorer.init_from(picked as u32, 0.0);
                }
                explorer.run();
                let Some(next) = explorer.last_node() else {
                    return Ok(false);
                };
                landmark_nodes[landmark_index + 1] = next as i32;
                network_size = explorer.visited_nodes();

                if self.log_details && landmark_index % log_offset == 0 {
                    info!(
                        "finding landmarks [{}] in network [{}], progress {}%",
                        self.weighting.name(),
                        network_size,
                        (100.0 * landmark_index as f64 / landmarks as f64) as i32
                    );
                }
            }

            if self.log_details {
                info!("finished searching landmarks for subnetwork {subnetwork_id} of size {network_size}");
            }
        }

        // calculate the 'from' and 'to' weight for every landmark
        for (landmark_index, &landmark_node) in landmark_nodes.iter().enumerate() {
            if self.cancelled.load(Ordering::Relaxed) {
                return Err(Error::Cancelled);
            }
            let landmark_node = landmark_node as u32;

            let fwd_core = InCoreFilter::new(graph, true, false);
            let mut fwd_filter = FilterSequence::new();
            fwd_filter.add(&fwd_core);
            fwd_filter.add(&blocked_filter);
            if let Some(filter) = self.user_filter {
                fwd_filter.add(filter);
            }
            let mut explorer = LandmarkExplorer::new(graph, self.weighting, &fwd_filter, false);
            explorer.init_from(landmark_node, 0.0);
            explorer.run();
            self.fill_landmark_weights(
                landmark_index,
                landmark_node,
                FROM_OFFSET,
                codec,
                explorer.settled(),
            )?;

            // the subnetwork id spreads from the first landmark only; a
            // foreign id here means overlapping components under the filter,
            // which happens with oneway-heavy graphs
            if landmark_index == 0
                && self.set_subnetworks(explorer.settled(), subnetworks, subnetwork_id as i8)
            {
                return Ok(false);
            }

            let bwd_core = InCoreFilter::new(graph, false, true);
            let mut bwd_filter = FilterSequence::new();
            bwd_filter.add(&bwd_core);
            bwd_filter.add(&blocked_filter);
            if let Some(filter) = self.user_filter {
                bwd_filter.add(filter);
            }
            let mut explorer = LandmarkExplorer::new(graph, self.weighting, &bwd_filter, true);
            explorer.init_from(landmark_node, 0.0);
            explorer.run();
            self.fill_landmark_weights(
                landmark_index,
                landmark_node,
                TO_OFFSET,
                codec,
                explorer.settled(),
            )?;

            if landmark_index == 0
                && self.set_subnetworks(explorer.settled(), subnetworks, subnetwork_id as i8)
            {
                return Ok(false);
            }

            if self.log_details && landmark_index % log_offset == 0 {
                info!(
                    "set landmark weights [{}], progress {}%",
                    self.weighting.name(),
                    (100.0 * landmark_index as f64 / landmarks as f64) as i32
                );
            }
        }

        self.landmark_ids.push(landmark_nodes);
        Ok(true)
    }

    /// Write the settled weights of one landmark pass into the matrix.
    fn fill_landmark_weights(
        &mut self,
        landmark_index: usize,
        landmark_node: u32,
        offset: u64,
        codec: WeightCodec,
        settled: &[(u32, f64)],
    ) -> Result<()> {
        let mut maxed_out = 0usize;
        let mut max_weight_seen = 0.0f64;

        for &(node, weight) in settled {
            let core_index = self.core_node_map.index(node) as u64;
            let (raw, saturated) = codec.encode(weight)?;
            self.weights
                .set_u16(core_index * self.lm_row_length + landmark_index as u64 * 4 + offset, raw);
            if saturated {
                maxed_out += 1;
                max_weight_seen = max_weight_seen.max(weight);
            }
        }

        if !settled.is_empty() && maxed_out as f64 / settled.len() as f64 > 0.1 {
            warn!(
                "landmark {landmark_index} ({}, {}): too many weights were maxed out \
                 ({maxed_out}/{}). Use a bigger factor than {}, for example a maximum weight \
                 of {} for weighting {}",
                self.graph.lat(landmark_node),
                self.graph.lon(landmark_node),
                settled.len(),
                codec.factor(),
                max_weight_seen * 1.2,
                self.weighting.name()
            );
        }
        Ok(())
    }

    /// Tag every settled node with `subnetwork_id`. Returns true when a node
    /// already carries a different, non-sentinel id; the caller then
    /// abandons the whole subnetwork.
    fn set_subnetworks(
        &self,
        settled: &[(u32, f64)],
        subnetworks: &mut [i8],
        subnetwork_id: i8,
    ) -> bool {
        for &(node, _) in settled {
            let core_index = self.core_node_map.index(node) as usize;
            let current = subnetworks[core_index];
            if current != subnetwork_id {
                if current != UNSET_SUBNETWORK && current != UNCLEAR_SUBNETWORK {
                    error!(
                        "subnetwork id for node {node} ({}, {}) already set to {current}, \
                         cannot change to {subnetwork_id}",
                        self.graph.lat(node),
                        self.graph.lon(node)
                    );
                    return true;
                }
                subnetworks[core_index] = subnetwork_id;
            }
        }
        false
    }

    /// Read persisted landmark data back; `Ok(false)` when nothing was
    /// persisted yet.
    pub fn load_existing(&mut self) -> Result<bool> {
        if self.initialized {
            return Err(Error::AlreadyInitialized);
        }
        if !self.weights.load()? {
            return Ok(false);
        }
        if !self.subnetworks.load()? {
            return Err(Error::Corrupt(
                "landmark weights loaded but not the subnetworks".to_string(),
            ));
        }

        let stored_nodes = self.weights.header(0);
        if stored_nodes != self.core_node_map.len() as i32 {
            return Err(Error::GraphMismatch {
                stored: stored_nodes,
                expected: self.core_node_map.len() as i32,
            });
        }

        self.landmark_count = self.weights.header(1) as usize;
        self.lm_row_length = self.landmark_count as u64 * 4;
        let subnetwork_count = self.weights.header(2) as usize;
        self.codec = Some(WeightCodec::from_header_value(self.weights.header(3))?);

        let mut byte_pos = stored_nodes as u64 * self.lm_row_length;
        self.landmark_ids.clear();
        for _ in 0..subnetwork_count {
            let mut ids = Vec::with_capacity(self.landmark_count);
            for _ in 0..self.landmark_count {
                ids.push(self.weights.get_i32(byte_pos));
                byte_pos += 4;
            }
            self.landmark_ids.push(ids);
        }

        self.initialized = true;
        Ok(true)
    }

    /// Weight from the landmark (given as index into the subnetwork's
    /// landmark array) to `node`. Unset cells read as `SHORT_MAX`, which can
    /// happen with endstanding oneways.
    pub fn from_weight(&self, landmark_index: usize, node: u32) -> u32 {
        let core_index = self.core_node_map.index(node) as u64;
        let raw = self
            .weights
            .get_u16(core_index * self.lm_row_length + landmark_index as u64 * 4 + FROM_OFFSET);
        if raw == SHORT_INFINITY {
            SHORT_MAX as u32
        } else {
            raw as u32
        }
    }

    /// Weight from `node` to the landmark.
    pub fn to_weight(&self, landmark_index: usize, node: u32) -> u32 {
        let core_index = self.core_node_map.index(node) as u64;
        let raw = self
            .weights
            .get_u16(core_index * self.lm_row_length + landmark_index as u64 * 4 + TO_OFFSET);
        if raw == SHORT_INFINITY {
            SHORT_MAX as u32
        } else {
            raw as u32
        }
    }

    /// Pick the active landmarks for a query and cache their weights in the
    /// caller-owned arrays. `active_indices` must carry `-1` entries on the
    /// first call; on a re-pick during an ongoing search up to two of the
    /// previously active landmarks survive. With `reverse` the ranking is
    /// negated. All three arrays must have the same length, at most the
    /// landmark count.
    pub fn init_active_landmarks(
        &self,
        from_node: u32,
        to_node: u32,
        active_indices: &mut [i32],
        active_froms: &mut [u32],
        active_tos: &mut [u32],
        reverse: bool,
    ) -> Result<()> {
        let subnetwork_from =
            self.subnetworks.subnetwork(self.core_node_map.index(from_node) as usize);
        let subnetwork_to =
            self.subnetworks.subnetwork(self.core_node_map.index(to_node) as usize);

        if subnetwork_from <= UNCLEAR_SUBNETWORK {
            return Err(Error::UnreachableSubnetwork(from_node));
        }
        if subnetwork_to <= UNCLEAR_SUBNETWORK {
            return Err(Error::UnreachableSubnetwork(to_node));
        }
        if subnetwork_from != subnetwork_to {
            return Err(Error::DisconnectedSubnetworks {
                from: subnetwork_from,
                to: subnetwork_to,
            });
        }

        let ids = &self.landmark_ids[subnetwork_from as usize];
        let mut ranked: Vec<(i32, usize)> = Vec::with_capacity(ids.len());
        for landmark_index in 0..ids.len() {
            let from_score = self.from_weight(landmark_index, to_node) as i32
                - self.from_weight(landmark_index, from_node) as i32;
            let to_score = self.to_weight(landmark_index, from_node) as i32
                - self.to_weight(landmark_index, to_node) as i32;
            let score = if reverse {
                (-from_score).max(-to_score)
            } else {
                from_score.max(to_score)
            };
            ranked.push((score, landmark_index));
        }
        // maximum gap first; the sort is stable so ties keep landmark order
        ranked.sort_by(|a, b| b.0.cmp(&a.0));

        if active_indices[0] >= 0 {
            let previous: FxHashSet<i32> = active_indices.iter().copied().collect();
            let len = active_indices.len() as i32;
            // keep at least two of the previous landmarks (pick the best)
            let keep = (len - 2).min(2);
            let mut existing = 0i32;
            for (i, slot) in active_indices.iter_mut().enumerate() {
                if i as i32 >= len - keep + existing {
                    break;
                }
                *slot = ranked[i].1 as i32;
                if previous.contains(slot) {
                    existing += 1;
                }
            }
        } else {
            for (i, slot) in active_indices.iter_mut().enumerate() {
                *slot = ranked[i].1 as i32;
            }
        }

        self.init_active_landmark_weights(to_node, active_indices, active_froms, active_tos);
        Ok(())
    }

    /// Cache the weights of the active landmarks; the deltas against the
    /// moving search frontier are computed by the engine.
    pub fn init_active_landmark_weights(
        &self,
        to_node: u32,
        active_indices: &[i32],
        active_froms: &mut [u32],
        active_tos: &mut [u32],
    ) {
        for (i, &landmark_index) in active_indices.iter().enumerate() {
            let landmark_index = landmark_index as usize;
            active_froms[i] = self.from_weight(landmark_index, to_node);
            active_tos[i] = self.to_weight(landmark_index, to_node);
        }
    }

    /// Write both tables to disk.
    pub fn flush(&mut self) -> Result<()> {
        self.weights.flush()?;
        self.subnetworks.flush()?;
        Ok(())
    }

    /// Release all persistent handles. Idempotent.
    pub fn close(&mut self) {
        self.weights.close();
        self.subnetworks.close();
    }

    pub fn is_closed(&self) -> bool {
        self.weights.is_closed()
    }
}
