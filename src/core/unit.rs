//! A single computational node.
//!
//! A unit owns one weight per incoming connection plus a threshold (a
//! bias acting as an extra weight on a constant -1 input), and the
//! scratch state of its most recent activation: the inputs it saw, the
//! output it produced, and the output-layer error assigned by
//! [`Unit::calc_error`]. Momentum memory (the previous update delta per
//! connection and for the threshold) lives here too, so each
//! weight-correction call can blend the previous step's direction into
//! the current one.
//!
//! Gradients are computed and returned transiently; a unit never stores
//! them. Only output-layer units have their `output_error` populated.

use std::fmt;

use ndarray::{aview1, Array1};
use ndarray_rand::RandomExt;
use rand::distributions::Uniform;
use rand::rngs::StdRng;
use rand::Rng;

use super::{Activation, NetError, NetResult};

/// One computational node: weights, threshold, and per-iteration
/// scratch state.
///
/// The lengths of `weights`, `last_inputs`, and `prev_weight_deltas`
/// are fixed at construction and always equal; they match the width of
/// the preceding layer (or the declared input width for the first
/// layer).
#[derive(Debug, Clone)]
pub struct Unit {
    /// One weight per incoming connection.
    weights: Array1<f64>,
    /// Bias weight, applied to a constant -1 input.
    threshold: f64,
    /// Inputs seen by the most recent activation.
    last_inputs: Array1<f64>,
    /// Output of the most recent activation.
    last_output: f64,
    /// Desired-minus-actual error, set by [`Unit::calc_error`] on
    /// output-layer units only.
    output_error: f64,
    /// Previous update delta per connection, for momentum.
    prev_weight_deltas: Array1<f64>,
    /// Previous threshold update delta, for momentum.
    prev_threshold_delta: f64,
}

impl Unit {
    /// Creates a unit with `fan_in` incoming connections, drawing every
    /// weight and the threshold uniformly from [-1, 1) out of `rng`.
    ///
    /// The generator is consumed in a fixed order (weights first, then
    /// the threshold) so that seed-constructed networks reproduce
    /// identical initial state. The generator is borrowed only for the
    /// duration of this call; units hold no reference to it.
    pub fn random(fan_in: usize, rng: &mut StdRng) -> Self {
        let mut unit = Self::with_weights(vec![0.0; fan_in], 0.0);
        unit.init_weights(rng);
        unit.init_threshold(rng);
        unit
    }

    /// Creates a unit with predefined weights and threshold.
    ///
    /// Scratch state and momentum memory start at zero.
    pub fn with_weights(weights: Vec<f64>, threshold: f64) -> Self {
        let fan_in = weights.len();
        Unit {
            weights: Array1::from(weights),
            threshold,
            last_inputs: Array1::zeros(fan_in),
            last_output: 0.0,
            output_error: 0.0,
            prev_weight_deltas: Array1::zeros(fan_in),
            prev_threshold_delta: 0.0,
        }
    }

    /// Redraws every weight uniformly from [-1, 1).
    pub fn init_weights(&mut self, rng: &mut StdRng) {
        self.weights = Array1::random_using(self.weights.len(), Uniform::new(-1.0, 1.0), rng);
    }

    /// Redraws the threshold uniformly from [-1, 1).
    pub fn init_threshold(&mut self, rng: &mut StdRng) {
        self.threshold = rng.sample(Uniform::new(-1.0, 1.0));
    }

    /// Activates the unit on `inputs`.
    ///
    /// Stores `inputs`, computes the weighted sum `s = sum(w_i * x_i)`,
    /// and applies `activation` to `s - threshold`. The result is
    /// stored as the unit's last output and returned.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if `inputs` does not have one value per
    /// weight. No state is mutated in that case.
    pub fn activate(&mut self, inputs: &[f64], activation: Activation) -> NetResult<f64> {
        if inputs.len() != self.weights.len() {
            return Err(NetError::DimensionMismatch(format!(
                "activation expected {} inputs, got {}",
                self.weights.len(),
                inputs.len()
            )));
        }

        self.last_inputs = aview1(inputs).to_owned();
        self.last_output = activation.apply(self.weighted_sum() - self.threshold);
        Ok(self.last_output)
    }

    /// Records the output-layer error `desired - last_output`.
    pub fn calc_error(&mut self, desired: f64) {
        self.output_error = desired - self.last_output;
    }

    /// Error gradient for an output-layer unit: the transfer derivative
    /// at the unit's own operating point times its recorded error.
    ///
    /// The scaled tanh derivative is evaluated at the weighted sum of
    /// the stored inputs minus the threshold; the sigmoid derivative
    /// comes straight from the stored output.
    pub fn output_gradient(&self, activation: Activation) -> f64 {
        self.derivative_factor(activation) * self.output_error
    }

    /// Error gradient for a hidden unit.
    ///
    /// `downstream_weights[k]` must be the weight that connects this
    /// unit to unit `k` of the next layer, parallel to
    /// `downstream_gradients`. The weighted gradient sum is scaled by
    /// the same derivative factor as [`Unit::output_gradient`].
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if the two collections differ in length.
    pub fn hidden_gradient(
        &self,
        downstream_gradients: &[f64],
        downstream_weights: &[f64],
        activation: Activation,
    ) -> NetResult<f64> {
        if downstream_gradients.len() != downstream_weights.len() {
            return Err(NetError::DimensionMismatch(format!(
                "{} downstream gradients against {} downstream weights",
                downstream_gradients.len(),
                downstream_weights.len()
            )));
        }

        let summed = aview1(downstream_gradients).dot(&aview1(downstream_weights));
        Ok(self.derivative_factor(activation) * summed)
    }

    /// Applies the delta rule with momentum to every weight and the
    /// threshold.
    ///
    /// For each connection `i`:
    /// `delta = momentum * prev_delta_i + learning_rate * input_i * gradient`,
    /// added to the weight and remembered for the next call. The
    /// threshold update uses a fixed synthetic input of -1.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if the weight and stored-input lengths ever
    /// disagree (they cannot under normal construction; the check runs
    /// before anything is mutated).
    pub fn weight_correction(
        &mut self,
        learning_rate: f64,
        momentum: f64,
        gradient: f64,
    ) -> NetResult<()> {
        if self.weights.len() != self.last_inputs.len() {
            return Err(NetError::DimensionMismatch(format!(
                "{} weights against {} stored inputs",
                self.weights.len(),
                self.last_inputs.len()
            )));
        }

        let deltas =
            momentum * &self.prev_weight_deltas + learning_rate * gradient * &self.last_inputs;
        self.weights += &deltas;
        self.prev_weight_deltas = deltas;

        let threshold_delta = momentum * self.prev_threshold_delta + learning_rate * -gradient;
        self.threshold += threshold_delta;
        self.prev_threshold_delta = threshold_delta;
        Ok(())
    }

    /// Weighted sum of the stored inputs.
    fn weighted_sum(&self) -> f64 {
        self.last_inputs.dot(&self.weights)
    }

    fn derivative_factor(&self, activation: Activation) -> f64 {
        let u = self.weighted_sum() - self.threshold;
        activation.derivative(u, self.last_output)
    }

    /// Number of incoming connections.
    pub fn fan_in(&self) -> usize {
        self.weights.len()
    }

    /// The weight of the connection `link`.
    pub fn weight(&self, link: usize) -> f64 {
        self.weights[link]
    }

    /// A copy of the weights, in connection order.
    pub fn weights(&self) -> Vec<f64> {
        self.weights.to_vec()
    }

    /// Overwrites the weight of connection `link`.
    pub fn set_weight(&mut self, link: usize, weight: f64) {
        self.weights[link] = weight;
    }

    /// Replaces all weights. The new set must keep the unit's fan-in.
    pub fn set_weights(&mut self, weights: &[f64]) {
        assert_eq!(
            weights.len(),
            self.weights.len(),
            "replacement weights must keep the unit's fan-in"
        );
        self.weights = aview1(weights).to_owned();
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn set_threshold(&mut self, threshold: f64) {
        self.threshold = threshold;
    }

    /// Inputs seen by the most recent activation.
    pub fn inputs(&self) -> Vec<f64> {
        self.last_inputs.to_vec()
    }

    /// Output of the most recent activation.
    pub fn output(&self) -> f64 {
        self.last_output
    }

    /// Error recorded by the most recent [`Unit::calc_error`] call.
    pub fn output_error(&self) -> f64 {
        self.output_error
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "weights: {}, inputs: {}, threshold: {:.4}, output: {:.4}, error: {:.4}",
            fmt_vec(self.weights.as_slice().unwrap_or(&[])),
            fmt_vec(self.last_inputs.as_slice().unwrap_or(&[])),
            self.threshold,
            self.last_output,
            self.output_error
        )
    }
}

/// Renders a vector as `{a, b, c}` at four decimals.
pub(crate) fn fmt_vec(values: &[f64]) -> String {
    let body = values
        .iter()
        .map(|v| format!("{:.4}", v))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{}}}", body)
}
