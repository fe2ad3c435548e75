//! Landmark precomputation and A* lower bounds for the core of a
//! contracted road graph.
//!
//! The core is the top level of a contraction hierarchy: the nodes that were
//! never contracted. This crate augments it with landmark data that feeds a
//! bidirectional A* search:
//!
//! - Border cut: edges crossing spatial-rule boundaries are blocked for the
//!   build, splitting world-wide graphs into regional subnetworks
//! - Tarjan: strongly connected components of the filtered core
//! - Selection: per component, K geographically spread landmarks found by
//!   farthest-node iteration on a hop-count weighting
//! - Filling: per landmark, a forward and a reverse Dijkstra write quantised
//!   16-bit weights into a byte-addressed table
//! - Query: rank all landmarks of the endpoints' subnetwork by their
//!   triangle-inequality gap and cache a small active subset
//!
//! Persisted artifacts are little-endian, header-checked files: the landmark
//! weight matrix with its landmark-id mapping, the byte-per-core-node
//! subnetwork table, and a per-weighting eccentricity table.

pub mod codec;
pub mod error;
pub mod explorer;
pub mod filters;
pub mod formats;
pub mod geo;
pub mod graph;
pub mod landmarks;
pub mod spatial;
pub mod tarjan;
pub mod weighting;

pub use error::{Error, Result};
pub use formats::EccentricityTable;
pub use graph::{CoreGraph, CoreNodeIdMap, EdgeState};
pub use landmarks::CoreLandmarks;
pub use weighting::{ShortestWeighting, Weighting};
