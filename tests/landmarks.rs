use core_landmarks::codec::{SHORT_MAX, WeightCodec};
use core_landmarks::geo::BBox;
use core_landmarks::spatial::LandmarkSuggestion;
use core_landmarks::{CoreGraph, CoreLandmarks, CoreNodeIdMap, Error, ShortestWeighting};

/// Graph where every node is a core node, with bidirectional edges.
fn core_graph(node_count: usize, edges: &[(u32, u32, f64)]) -> CoreGraph {
    let mut g = CoreGraph::new(node_count);
    for node in 0..node_count as u32 {
        let level = g.core_level();
        g.set_level(node, level);
        g.set_coord(node, 43.0 + 0.001 * node as f64, 7.0 + 0.0005 * node as f64);
    }
    for &(base, adj, weight) in edges {
        g.add_edge(base, adj, weight, true, true);
    }
    g
}

fn ring(node_count: u32) -> Vec<(u32, u32, f64)> {
    (0..node_count).map(|i| (i, (i + 1) % node_count, 1.0)).collect()
}

/// Shortest distances in the 10/20/25 triangle.
fn triangle_dist(a: u32, b: u32) -> f64 {
    match (a.min(b), a.max(b)) {
        (x, y) if x == y => 0.0,
        (0, 1) => 10.0,
        (1, 2) => 20.0,
        (0, 2) => 25.0,
        _ => unreachable!(),
    }
}

#[test]
fn test_triangle_weights() {
    let graph = core_graph(3, &[(0, 1, 10.0), (1, 2, 20.0), (2, 0, 25.0)]);
    let map = CoreNodeIdMap::new(&graph);
    let weighting = ShortestWeighting;
    let dir = tempfile::tempdir().unwrap();

    let mut storage = CoreLandmarks::new(dir.path(), &graph, &map, &weighting, None, 2);
    storage.set_maximum_weight(100.0).unwrap();
    storage.create_landmarks().unwrap();

    let factor = storage.factor();
    assert!((factor - 100.0 / 65_536.0).abs() < 1e-12);
    assert_eq!(storage.subnetworks_with_landmarks(), 2);
    assert_eq!(storage.landmarks(0), &[-1, -1]);

    let landmarks = storage.landmarks(1).to_vec();
    assert_eq!(landmarks.len(), 2);
    for (lm_index, &lm_node) in landmarks.iter().enumerate() {
        let lm_node = lm_node as u32;
        for node in 0..3u32 {
            let expected = triangle_dist(lm_node, node);
            let from = storage.from_weight(lm_index, node) as f64 * factor;
            let to = storage.to_weight(lm_index, node) as f64 * factor;
            assert!(
                (from - expected).abs() <= 2.0 * factor,
                "from weight of landmark {lm_node} at {node}: {from} vs {expected}"
            );
            assert!(
                (to - expected).abs() <= 2.0 * factor,
                "to weight of landmark {lm_node} at {node}: {to} vs {expected}"
            );
        }
    }
}

#[test]
fn test_triangle_inequality_bounds() {
    let graph = core_graph(3, &[(0, 1, 10.0), (1, 2, 20.0), (2, 0, 25.0)]);
    let map = CoreNodeIdMap::new(&graph);
    let weighting = ShortestWeighting;
    let dir = tempfile::tempdir().unwrap();

    let mut storage = CoreLandmarks::new(dir.path(), &graph, &map, &weighting, None, 2);
    storage.set_maximum_weight(100.0).unwrap();
    storage.create_landmarks().unwrap();

    let factor = storage.factor();
    for from in 0..3u32 {
        for to in 0..3u32 {
            for lm_index in 0..2 {
                let from_gap = storage.from_weight(lm_index, to) as i64
                    - storage.from_weight(lm_index, from) as i64;
                let to_gap = storage.to_weight(lm_index, from) as i64
                    - storage.to_weight(lm_index, to) as i64;
                let bound = from_gap.max(to_gap) as f64 * factor;
                assert!(
                    bound <= triangle_dist(from, to) + 2.0 * factor,
                    "landmark {lm_index} overestimates {from}->{to}: {bound}"
                );
            }
        }
    }
}

#[test]
fn test_single_core_node_is_every_landmark() {
    let mut graph = CoreGraph::new(1);
    let level = graph.core_level();
    graph.set_level(0, level);
    graph.set_coord(0, 43.0, 7.0);
    graph.add_edge(0, 0, 1.0, true, true);

    let map = CoreNodeIdMap::new(&graph);
    let weighting = ShortestWeighting;
    let dir = tempfile::tempdir().unwrap();

    let mut storage = CoreLandmarks::new(dir.path(), &graph, &map, &weighting, None, 4);
    storage.set_maximum_weight(100.0).unwrap();
    storage.set_minimum_nodes(1);
    storage.create_landmarks().unwrap();

    assert_eq!(storage.landmarks(1), &[0, 0, 0, 0]);
    for lm_index in 0..4 {
        assert_eq!(storage.from_weight(lm_index, 0), 0);
        assert_eq!(storage.to_weight(lm_index, 0), 0);
    }
}

#[test]
fn test_two_components_get_distinct_subnetworks() {
    // two triangles with no connection
    let graph = core_graph(
        6,
        &[(0, 1, 1.0), (1, 2, 1.0), (2, 0, 1.0), (3, 4, 1.0), (4, 5, 1.0), (5, 3, 1.0)],
    );
    let map = CoreNodeIdMap::new(&graph);
    let weighting = ShortestWeighting;
    let dir = tempfile::tempdir().unwrap();

    let mut storage = CoreLandmarks::new(dir.path(), &graph, &map, &weighting, None, 2);
    storage.set_maximum_weight(100.0).unwrap();
    storage.set_minimum_nodes(3);
    storage.create_landmarks().unwrap();

    // placeholder plus one entry per component
    assert_eq!(storage.subnetworks_with_landmarks(), 3);
    for subnetwork in 1..3 {
        let ids = storage.landmarks(subnetwork);
        let low = ids.iter().all(|&id| (0..3).contains(&id));
        let high = ids.iter().all(|&id| (3..6).contains(&id));
        assert!(low || high, "landmarks {ids:?} span components");
    }

    let mut active = [-1i32; 2];
    let mut froms = [0u32; 2];
    let mut tos = [0u32; 2];
    // within one component
    storage.init_active_landmarks(0, 2, &mut active, &mut froms, &mut tos, false).unwrap();
    // across components
    let mut active = [-1i32; 2];
    let err = storage
        .init_active_landmarks(0, 3, &mut active, &mut froms, &mut tos, false)
        .unwrap_err();
    assert!(matches!(err, Error::DisconnectedSubnetworks { .. }));
}

#[test]
fn test_small_component_is_unclear() {
    // a triangle above the threshold and a pair below it
    let graph = core_graph(5, &[(0, 1, 1.0), (1, 2, 1.0), (2, 0, 1.0), (3, 4, 1.0)]);
    let map = CoreNodeIdMap::new(&graph);
    let weighting = ShortestWeighting;
    let dir = tempfile::tempdir().unwrap();

    let mut storage = CoreLandmarks::new(dir.path(), &graph, &map, &weighting, None, 2);
    storage.set_maximum_weight(100.0).unwrap();
    storage.set_minimum_nodes(3);
    storage.create_landmarks().unwrap();

    assert_eq!(storage.subnetworks_with_landmarks(), 2);

    let mut active = [-1i32; 2];
    let mut froms = [0u32; 2];
    let mut tos = [0u32; 2];
    let err = storage
        .init_active_landmarks(0, 3, &mut active, &mut froms, &mut tos, false)
        .unwrap_err();
    assert!(matches!(err, Error::UnreachableSubnetwork(3)));
}

#[test]
fn test_component_below_threshold_gets_no_landmarks() {
    let graph = core_graph(3, &[(0, 1, 1.0), (1, 2, 1.0), (2, 0, 1.0)]);
    let map = CoreNodeIdMap::new(&graph);
    let weighting = ShortestWeighting;

    // at the threshold landmarks are built
    let dir = tempfile::tempdir().unwrap();
    let mut storage = CoreLandmarks::new(dir.path(), &graph, &map, &weighting, None, 2);
    storage.set_maximum_weight(100.0).unwrap();
    storage.set_minimum_nodes(3);
    storage.create_landmarks().unwrap();
    assert!(!storage.is_empty());

    // one node short of it the component stays unclear
    let dir = tempfile::tempdir().unwrap();
    let mut storage = CoreLandmarks::new(dir.path(), &graph, &map, &weighting, None, 2);
    storage.set_maximum_weight(100.0).unwrap();
    storage.set_minimum_nodes(4);
    storage.create_landmarks().unwrap();
    assert!(storage.is_empty());

    let mut active = [-1i32; 2];
    let mut froms = [0u32; 2];
    let mut tos = [0u32; 2];
    let err = storage
        .init_active_landmarks(0, 1, &mut active, &mut froms, &mut tos, false)
        .unwrap_err();
    assert!(matches!(err, Error::UnreachableSubnetwork(_)));
}

#[test]
fn test_saturated_weights_store_short_max() {
    let graph = core_graph(2, &[(0, 1, 1_000.0)]);
    let map = CoreNodeIdMap::new(&graph);
    let weighting = ShortestWeighting;
    let dir = tempfile::tempdir().unwrap();

    let mut storage = CoreLandmarks::new(dir.path(), &graph, &map, &weighting, None, 2);
    storage.set_maximum_weight(10.0).unwrap();
    storage.set_minimum_nodes(2);
    storage.create_landmarks().unwrap();

    let landmarks = storage.landmarks(1).to_vec();
    let mut saturated = 0;
    for (lm_index, &lm_node) in landmarks.iter().enumerate() {
        let other = 1 - lm_node as u32;
        if storage.from_weight(lm_index, other) == SHORT_MAX as u32 {
            saturated += 1;
        }
        // never SHORT_INFINITY: the getter coerces and the build saturates
        assert!(storage.from_weight(lm_index, other) <= SHORT_MAX as u32);
    }
    assert!(saturated > 0, "no weight saturated despite tiny maximum weight");
}

#[test]
fn test_persistence_round_trip() {
    let graph = core_graph(100, &ring(100));
    let map = CoreNodeIdMap::new(&graph);
    let weighting = ShortestWeighting;
    let dir = tempfile::tempdir().unwrap();

    let mut storage = CoreLandmarks::new(dir.path(), &graph, &map, &weighting, None, 8);
    storage.create_landmarks().unwrap();

    let factor = storage.factor();
    let landmark_ids = storage.landmarks(1).to_vec();
    let samples = [(0usize, 3u32), (1, 17), (2, 42), (3, 99), (4, 5), (5, 66), (6, 23), (7, 80)];
    let froms: Vec<u32> = samples.iter().map(|&(lm, n)| storage.from_weight(lm, n)).collect();
    let tos: Vec<u32> = samples.iter().map(|&(lm, n)| storage.to_weight(lm, n)).collect();

    storage.flush().unwrap();
    storage.flush().unwrap();
    storage.close();
    storage.close();
    assert!(storage.is_closed());

    let mut loaded = CoreLandmarks::new(dir.path(), &graph, &map, &weighting, None, 8);
    assert!(loaded.load_existing().unwrap());
    assert_eq!(loaded.landmark_count(), 8);
    assert_eq!(loaded.subnetworks_with_landmarks(), 2);
    assert!((loaded.factor() - factor).abs() < 1e-6);
    assert_eq!(loaded.landmarks(1), &landmark_ids[..]);
    for (i, &(lm, n)) in samples.iter().enumerate() {
        assert_eq!(loaded.from_weight(lm, n), froms[i]);
        assert_eq!(loaded.to_weight(lm, n), tos[i]);
    }
}

#[test]
fn test_load_missing_returns_false() {
    let graph = core_graph(3, &[(0, 1, 1.0), (1, 2, 1.0), (2, 0, 1.0)]);
    let map = CoreNodeIdMap::new(&graph);
    let weighting = ShortestWeighting;
    let dir = tempfile::tempdir().unwrap();

    let mut storage = CoreLandmarks::new(dir.path(), &graph, &map, &weighting, None, 2);
    assert!(!storage.load_existing().unwrap());
    assert!(!storage.is_initialized());
}

#[test]
fn test_load_rejects_different_graph() {
    let weighting = ShortestWeighting;
    let dir = tempfile::tempdir().unwrap();

    let graph = core_graph(10, &ring(10));
    let map = CoreNodeIdMap::new(&graph);
    let mut storage = CoreLandmarks::new(dir.path(), &graph, &map, &weighting, None, 2);
    storage.set_maximum_weight(100.0).unwrap();
    storage.set_minimum_nodes(5);
    storage.create_landmarks().unwrap();
    storage.flush().unwrap();

    let other_graph = core_graph(12, &ring(12));
    let other_map = CoreNodeIdMap::new(&other_graph);
    let mut loaded =
        CoreLandmarks::new(dir.path(), &other_graph, &other_map, &weighting, None, 2);
    assert!(matches!(loaded.load_existing(), Err(Error::GraphMismatch { .. })));
}

#[test]
fn test_initialize_only_once() {
    let graph = core_graph(3, &[(0, 1, 1.0), (1, 2, 1.0), (2, 0, 1.0)]);
    let map = CoreNodeIdMap::new(&graph);
    let weighting = ShortestWeighting;
    let dir = tempfile::tempdir().unwrap();

    let mut storage = CoreLandmarks::new(dir.path(), &graph, &map, &weighting, None, 2);
    storage.set_maximum_weight(100.0).unwrap();
    storage.create_landmarks().unwrap();
    assert!(matches!(storage.create_landmarks(), Err(Error::AlreadyInitialized)));
    assert!(matches!(storage.load_existing(), Err(Error::AlreadyInitialized)));
}

#[test]
fn test_active_landmark_reuse() {
    let graph = core_graph(100, &ring(100));
    let map = CoreNodeIdMap::new(&graph);
    let weighting = ShortestWeighting;
    let dir = tempfile::tempdir().unwrap();

    let mut storage = CoreLandmarks::new(dir.path(), &graph, &map, &weighting, None, 8);
    storage.create_landmarks().unwrap();

    let mut active = [-1i32; 4];
    let mut froms = [0u32; 4];
    let mut tos = [0u32; 4];
    storage.init_active_landmarks(0, 50, &mut active, &mut froms, &mut tos, false).unwrap();
    assert!(active.iter().all(|&i| (0..8).contains(&i)));
    let first_pick: Vec<i32> = active.to_vec();

    storage.init_active_landmarks(10, 60, &mut active, &mut froms, &mut tos, false).unwrap();
    let survivors = active.iter().filter(|i| first_pick.contains(i)).count();
    assert!(survivors >= 2, "only {survivors} active landmarks survived the re-pick");

    // the caches hold the weights of the picked landmarks at the target
    for (i, &lm_index) in active.iter().enumerate() {
        assert_eq!(froms[i], storage.from_weight(lm_index as usize, 60));
        assert_eq!(tos[i], storage.to_weight(lm_index as usize, 60));
    }
}

#[test]
fn test_suggestions_shortcut_selection() {
    let graph = core_graph(3, &[(0, 1, 10.0), (1, 2, 20.0), (2, 0, 25.0)]);
    let map = CoreNodeIdMap::new(&graph);
    let weighting = ShortestWeighting;
    let dir = tempfile::tempdir().unwrap();

    let mut bbox = BBox::invalid();
    for node in 0..3u32 {
        bbox.extend(graph.lat(node), graph.lon(node));
    }

    let mut storage = CoreLandmarks::new(dir.path(), &graph, &map, &weighting, None, 2);
    storage.set_maximum_weight(100.0).unwrap();
    storage.set_landmark_suggestions(vec![LandmarkSuggestion::new(bbox, vec![0, 2])]);
    storage.create_landmarks().unwrap();

    assert_eq!(storage.landmarks(1), &[0, 2]);
    // suggested landmarks still get their weights filled
    let factor = storage.factor();
    let from = storage.from_weight(0, 1) as f64 * factor;
    assert!((from - 10.0).abs() <= 2.0 * factor);
}

#[test]
fn test_too_few_suggestions_fail() {
    let graph = core_graph(3, &[(0, 1, 10.0), (1, 2, 20.0), (2, 0, 25.0)]);
    let map = CoreNodeIdMap::new(&graph);
    let weighting = ShortestWeighting;
    let dir = tempfile::tempdir().unwrap();

    let mut bbox = BBox::invalid();
    for node in 0..3u32 {
        bbox.extend(graph.lat(node), graph.lon(node));
    }

    let mut storage = CoreLandmarks::new(dir.path(), &graph, &map, &weighting, None, 2);
    storage.set_maximum_weight(100.0).unwrap();
    storage.set_landmark_suggestions(vec![LandmarkSuggestion::new(bbox, vec![0])]);
    assert!(matches!(
        storage.create_landmarks(),
        Err(Error::InsufficientSuggestions { got: 1, want: 2 })
    ));
}

#[test]
fn test_cancellation_aborts_build() {
    let graph = core_graph(10, &ring(10));
    let map = CoreNodeIdMap::new(&graph);
    let weighting = ShortestWeighting;
    let dir = tempfile::tempdir().unwrap();

    let mut storage = CoreLandmarks::new(dir.path(), &graph, &map, &weighting, None, 4);
    storage.set_maximum_weight(100.0).unwrap();
    storage.set_minimum_nodes(5);
    storage.cancel_flag().store(true, std::sync::atomic::Ordering::Relaxed);
    assert!(matches!(storage.create_landmarks(), Err(Error::Cancelled)));
}

#[test]
fn test_estimated_factor_matches_header_encoding() {
    // build without an explicit maximum weight, then verify the factor
    // survives the header round trip
    let graph = core_graph(10, &ring(10));
    let map = CoreNodeIdMap::new(&graph);
    let weighting = ShortestWeighting;
    let dir = tempfile::tempdir().unwrap();

    let mut storage = CoreLandmarks::new(dir.path(), &graph, &map, &weighting, None, 2);
    storage.set_minimum_nodes(5);
    storage.create_landmarks().unwrap();
    let factor = storage.factor();
    assert!(factor > 0.0);
    storage.flush().unwrap();

    let mut loaded = CoreLandmarks::new(dir.path(), &graph, &map, &weighting, None, 2);
    assert!(loaded.load_existing().unwrap());
    let codec = WeightCodec::from_factor(loaded.factor()).unwrap();
    assert!((codec.factor() - factor).abs() < 1e-6);
}
