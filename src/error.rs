//! Error types for landmark preparation, persistence and queries.
//!
//! Build-time errors abort the preparation. `DisconnectedSubnetworks` and
//! `UnreachableSubnetwork` are query-time results the routing engine is
//! expected to recover from, typically by falling back to a beeline bound.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// `create_landmarks` or `load_existing` was called on an initialized store.
    #[error("initialize the landmark storage only once")]
    AlreadyInitialized,

    /// Persisted data was written for a graph with a different core size.
    #[error("cannot load landmark data written for a graph with {stored} core nodes, not {expected}")]
    GraphMismatch { stored: i32, expected: i32 },

    /// The weight factor cannot be represented in the file header.
    #[error("illegal landmark weight factor {0}")]
    FactorOverflow(f64),

    /// A weight would overflow the quantised range even before saturation.
    #[error("cannot store weight {0} explicitly")]
    ValueOutOfRange(f64),

    /// Subnetwork ids must fit into a signed byte.
    #[error("too many subnetworks: {0}")]
    TooManySubnetworks(usize),

    /// Query endpoints lie in different subnetworks of the core.
    #[error("connection not found, different subnetworks {from} vs. {to}")]
    DisconnectedSubnetworks { from: i8, to: i8 },

    /// A query endpoint lies in a subnetwork without landmarks.
    #[error("node {0} lies in a subnetwork without landmarks")]
    UnreachableSubnetwork(u32),

    /// A supplied landmark suggestion covers the start node but is too short.
    #[error("landmark suggestions are too few: {got} for {want} requested landmarks")]
    InsufficientSuggestions { got: usize, want: usize },

    /// The preparation was interrupted via its cancellation flag.
    #[error("landmark preparation was cancelled")]
    Cancelled,

    /// A persisted file failed its magic, version or length checks.
    #[error("corrupt landmark file: {0}")]
    Corrupt(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
