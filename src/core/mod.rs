//! Core computation engine: units, networks, and the shared numeric
//! error type.
//!
//! The engine is a fully-connected feed-forward network evaluated one
//! unit at a time. A [`Unit`] owns the weights and scratch state of a
//! single node; a [`Network`] owns an ordered sequence of layers of
//! units and drives forward activation and backward gradient
//! propagation across them.
//!
//! All operations are synchronous and single-threaded. Within a
//! training epoch each example's forward pass observes the weight state
//! left behind by the previous example's backward pass; that ordering is
//! part of the algorithm, not an implementation accident.

use std::error::Error;
use std::fmt;

pub mod network;
pub mod unit;

pub use network::Network;
pub use unit::Unit;

/// Error type for the computation engine.
///
/// The engine has exactly one recoverable failure mode: two collections
/// that must be parallel (inputs vs. weights, gradients vs. weights,
/// desired output vs. output layer) differ in length. The payload is a
/// human-readable description of which collections disagreed and, where
/// available, which training example was involved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetError {
    /// Two parallel collections differ in length.
    DimensionMismatch(String),
}

impl fmt::Display for NetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetError::DimensionMismatch(msg) => write!(f, "dimension mismatch: {}", msg),
        }
    }
}

impl Error for NetError {}

pub type NetResult<T> = Result<T, NetError>;

/// Amplitude of the scaled hyperbolic tangent transfer function.
pub const TANH_AMPLITUDE: f64 = 1.716;

/// Slope of the scaled hyperbolic tangent transfer function.
pub const TANH_SLOPE: f64 = 2.0 / 3.0;

/// Transfer function applied uniformly to every unit in a network.
///
/// The scaled tanh form converges noticeably faster than the plain
/// sigmoid on the same problems, which is why it is the network default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Plain logistic sigmoid with range (0, 1).
    Sigmoid,
    /// Rescaled logistic form `2a / (1 + e^(-b*u)) - a` with
    /// [`TANH_AMPLITUDE`] and [`TANH_SLOPE`], range (-a, a).
    ScaledTanh,
}

impl Activation {
    /// Evaluates the transfer function at `u`, the weighted input sum
    /// minus the unit's threshold.
    pub fn apply(self, u: f64) -> f64 {
        match self {
            Activation::Sigmoid => 1.0 / (1.0 + (-u).exp()),
            Activation::ScaledTanh => {
                (2.0 * TANH_AMPLITUDE) / (1.0 + (-TANH_SLOPE * u).exp()) - TANH_AMPLITUDE
            }
        }
    }

    /// Evaluates the transfer derivative at a unit's operating point.
    ///
    /// The sigmoid derivative is computed from the stored `output`
    /// (`y * (1 - y)`), so the pre-activation value is not needed. The
    /// scaled tanh derivative uses the closed form in terms of the
    /// pre-activation `u` and ignores `output`.
    pub fn derivative(self, u: f64, output: f64) -> f64 {
        match self {
            Activation::Sigmoid => output * (1.0 - output),
            Activation::ScaledTanh => {
                let e = (TANH_SLOPE * u).exp();
                (2.0 * TANH_AMPLITUDE * TANH_SLOPE * e) / (e + 1.0).powi(2)
            }
        }
    }

    /// Name for reports and logs.
    pub fn name(self) -> &'static str {
        match self {
            Activation::Sigmoid => "sigmoid",
            Activation::ScaledTanh => "scaled-tanh",
        }
    }
}
