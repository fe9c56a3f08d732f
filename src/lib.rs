//! # bpn
//!
//! A fully-connected, multi-layer feed-forward network trained by
//! online error back-propagation with momentum and an optional
//! per-epoch adaptive learning-rate heuristic.
//!
//! ## Overview
//!
//! Networks are built either from a seed plus layer widths (weights
//! drawn uniformly from [-1, 1) in a documented, reproducible order) or
//! from explicit weight/threshold tensors. A network runs forward on an
//! input vector one unit at a time, and trains against labeled example
//! sets until the per-epoch summed squared error falls below a
//! convergence threshold.
//!
//! ## Structure
//!
//! - [`core`] — units, networks, activation functions, the error type
//! - [`training`] — the convergence-driven training loop and records
//! - [`checkpoint`] — network persistence as JSON documents
//! - [`data`] — labeled example-set loading
//!
//! ## Example
//!
//! Train the textbook 2-2-1 network on an XOR-style example set:
//!
//! ```
//! use bpn::{training, Network, TrainOptions};
//!
//! let weights = vec![
//!     vec![vec![0.5, 0.4], vec![0.9, 1.0]],
//!     vec![vec![-1.2, 1.1]],
//! ];
//! let thresholds = vec![vec![0.8, -0.1], vec![0.3]];
//! let mut network = Network::with_weights(weights, thresholds, 0.1, 0.95);
//!
//! let inputs = vec![
//!     vec![0.0, 0.0],
//!     vec![0.0, 1.0],
//!     vec![1.0, 1.0],
//!     vec![1.0, 0.0],
//! ];
//! let targets = vec![vec![0.1], vec![0.9], vec![0.1], vec![0.9]];
//!
//! let summary =
//!     training::train(&mut network, &inputs, &targets, 1e-4, &TrainOptions::default()).unwrap();
//! assert!(summary.final_error <= 1e-4);
//! ```

pub mod checkpoint;
pub mod core;
pub mod data;
pub mod training;

pub use crate::core::{Activation, NetError, NetResult, Network, Unit};
pub use crate::data::ExampleSet;
pub use crate::training::{EpochRecord, Logging, TrainOptions, TrainSummary};
