//! The network: ordered layers of units plus the hyperparameters and
//! scratch state shared across them.
//!
//! Forward propagation feeds each layer's collected outputs to the next
//! layer; the backward pass walks from the output layer toward the
//! input, computing one gradient and applying one weight correction per
//! unit. The training loop that drives both lives in
//! [`crate::training`].

use std::fmt;
use std::fmt::Write as _;

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::unit::fmt_vec;
use super::{Activation, NetError, NetResult, Unit};

/// A fully-connected feed-forward network.
///
/// The input layer is implicit: the first stored layer already consumes
/// the raw input vector, so a `[2, 2, 1]` description yields two stored
/// layers (one hidden, one output).
///
/// A network is created once and then mutated in place by every forward
/// call (scratch state) and every training step (weights, thresholds,
/// momentum memory, learning rate).
pub struct Network {
    /// Calculating layers, each a non-empty ordered sequence of units.
    layers: Vec<Vec<Unit>>,
    /// Transfer function currently applied to every unit.
    activation: Activation,
    /// Target output vector for the example being trained.
    desired_output: Vec<f64>,
    learning_rate: f64,
    momentum: f64,
    /// Generator used for weight initialization. Units borrow it only
    /// during construction or re-initialization.
    rng: StdRng,
}

impl Network {
    /// Builds a network from layer widths and a seed.
    ///
    /// `widths` lists the input width followed by the size of every
    /// calculating layer, so `[2, 2, 1]` is two inputs, one hidden
    /// layer of two units, and a single output unit. Every weight and
    /// threshold is drawn uniformly from [-1, 1) by one generator
    /// seeded with `seed`, consumed layer-major, then unit-major,
    /// weights before threshold within each unit. Two networks built
    /// from the same widths and seed are identical.
    ///
    /// # Panics
    ///
    /// If `widths` has fewer than two entries or contains a zero.
    pub fn seeded(widths: &[usize], seed: u64, learning_rate: f64, momentum: f64) -> Self {
        assert!(
            widths.len() >= 2,
            "a network needs an input width and at least one layer"
        );
        assert!(
            widths.iter().all(|&w| w > 0),
            "layer widths must be positive"
        );

        let mut rng = StdRng::seed_from_u64(seed);
        let mut layers = Vec::with_capacity(widths.len() - 1);
        for pair in widths.windows(2) {
            let (fan_in, width) = (pair[0], pair[1]);
            layers.push((0..width).map(|_| Unit::random(fan_in, &mut rng)).collect());
        }

        Network {
            layers,
            activation: Activation::ScaledTanh,
            desired_output: vec![0.0; *widths.last().expect("widths is non-empty")],
            learning_rate,
            momentum,
            rng,
        }
    }

    /// Builds a network from explicit weight and threshold tensors.
    ///
    /// `weights[l][n]` holds unit `n` of layer `l`, one weight per unit
    /// of the preceding layer; `thresholds[l][n]` is that unit's bias.
    /// No seeded randomness is involved; the attached generator is
    /// entropy-seeded and only matters if weights are later redrawn.
    ///
    /// # Panics
    ///
    /// If the two tensors disagree in shape, a layer is empty, or the
    /// fan-in of any layer does not match the width of the layer before
    /// it.
    pub fn with_weights(
        weights: Vec<Vec<Vec<f64>>>,
        thresholds: Vec<Vec<f64>>,
        learning_rate: f64,
        momentum: f64,
    ) -> Self {
        assert!(!weights.is_empty(), "a network needs at least one layer");
        assert_eq!(
            weights.len(),
            thresholds.len(),
            "weights and thresholds must describe the same layers"
        );

        let mut layers: Vec<Vec<Unit>> = Vec::with_capacity(weights.len());
        for (layer_weights, layer_thresholds) in weights.into_iter().zip(thresholds) {
            assert!(!layer_weights.is_empty(), "layers must be non-empty");
            assert_eq!(
                layer_weights.len(),
                layer_thresholds.len(),
                "every unit needs exactly one threshold"
            );

            let layer: Vec<Unit> = layer_weights
                .into_iter()
                .zip(layer_thresholds)
                .map(|(w, t)| Unit::with_weights(w, t))
                .collect();

            if let Some(previous) = layers.last() {
                assert!(
                    layer.iter().all(|u| u.fan_in() == previous.len()),
                    "unit fan-in must match the width of the preceding layer"
                );
            }
            layers.push(layer);
        }

        let output_width = layers.last().expect("layers is non-empty").len();
        Network {
            layers,
            activation: Activation::ScaledTanh,
            desired_output: vec![0.0; output_width],
            learning_rate,
            momentum,
            rng: StdRng::from_entropy(),
        }
    }

    /// Feeds `input` through the network, layer by layer, one unit at a
    /// time, and returns the final layer's outputs.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if `input` does not match the first layer's
    /// fan-in (detected by the first unit asked to activate).
    pub fn forward(&mut self, input: &[f64]) -> NetResult<Vec<f64>> {
        let activation = self.activation;
        let mut current = input.to_vec();
        for layer in &mut self.layers {
            let mut outputs = Vec::with_capacity(layer.len());
            for unit in layer.iter_mut() {
                outputs.push(unit.activate(&current, activation)?);
            }
            current = outputs;
        }
        Ok(current)
    }

    /// Replaces the desired output vector used by the next backward
    /// pass.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if `desired` does not have one value per
    /// output unit.
    pub fn set_desired_output(&mut self, desired: &[f64]) -> NetResult<()> {
        if desired.len() != self.desired_output.len() {
            return Err(NetError::DimensionMismatch(format!(
                "desired output has {} values for {} output units",
                desired.len(),
                self.desired_output.len()
            )));
        }
        self.desired_output = desired.to_vec();
        Ok(())
    }

    /// Back-propagates the error of the most recent forward pass and
    /// corrects every weight and threshold once.
    ///
    /// Output-layer units first record their error against the desired
    /// output, then compute their gradient and apply their correction.
    /// Hidden layers are then walked from the last toward the first:
    /// each unit gathers, for every unit of the layer after it, the
    /// weight on the connecting edge together with that unit's gradient,
    /// and derives its own gradient from the weighted sum. The gathered
    /// edge weights are the values current at gather time, so they
    /// already include the corrections applied to the downstream layer
    /// earlier in the same call.
    ///
    /// Must run after a forward pass and a desired-output assignment
    /// that belong to the same example.
    pub fn backward_pass(&mut self) -> NetResult<()> {
        let activation = self.activation;
        let (learning_rate, momentum) = (self.learning_rate, self.momentum);
        let last = self.layers.len() - 1;

        let mut gradients = Vec::with_capacity(self.layers[last].len());
        for (n, unit) in self.layers[last].iter_mut().enumerate() {
            unit.calc_error(self.desired_output[n]);
            let gradient = unit.output_gradient(activation);
            unit.weight_correction(learning_rate, momentum, gradient)
                .map_err(|e| {
                    NetError::DimensionMismatch(format!(
                        "weight correction failed for unit ({}, {}): {}",
                        last, n, e
                    ))
                })?;
            gradients.push(gradient);
        }

        for layer in (0..last).rev() {
            let mut layer_gradients = Vec::with_capacity(self.layers[layer].len());
            for n in 0..self.layers[layer].len() {
                let edge_weights: Vec<f64> = self.layers[layer + 1]
                    .iter()
                    .map(|downstream| downstream.weight(n))
                    .collect();

                let unit = &self.layers[layer][n];
                let gradient = unit.hidden_gradient(&gradients, &edge_weights, activation)?;
                self.layers[layer][n].weight_correction(learning_rate, momentum, gradient)?;
                layer_gradients.push(gradient);
            }
            gradients = layer_gradients;
        }
        Ok(())
    }

    /// Sum over the output layer of the squared errors recorded by the
    /// most recent backward pass.
    pub fn sum_squared_error(&self) -> f64 {
        self.layers[self.layers.len() - 1]
            .iter()
            .map(|unit| unit.output_error().powi(2))
            .sum()
    }

    /// Runs the network forward once and renders a framed report of the
    /// inputs, every layer's weights and thresholds, and the outputs.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch`, with a message naming the required input
    /// width, if `input` does not match the first layer. The check runs
    /// before any unit activates.
    pub fn run(&mut self, input: &[f64]) -> NetResult<String> {
        if input.len() != self.input_width() {
            return Err(NetError::DimensionMismatch(format!(
                "there must be exactly {} input values",
                self.input_width()
            )));
        }

        let output = self.forward(input)?;

        let mut report = String::new();
        let rule = "---------------";
        let _ = writeln!(report, "{rule}");
        let _ = writeln!(report, "| Network Run |");
        let _ = writeln!(report, "{rule}");
        let _ = writeln!(report, "| Input: {}", fmt_vec(input));
        let _ = writeln!(report, "{rule}");
        let _ = writeln!(report, "| Weights:");
        for (l, layer) in self.layers.iter().enumerate() {
            let _ = writeln!(report, "| Layer #{l}:");
            for (n, unit) in layer.iter().enumerate() {
                let _ = writeln!(
                    report,
                    "|\tUnit[{n}]: {}, threshold: {:.4}",
                    fmt_vec(&unit.weights()),
                    unit.threshold()
                );
            }
        }
        let _ = writeln!(report, "{rule}");
        let _ = writeln!(report, "| Output: {}", fmt_vec(&output));
        let _ = write!(report, "{rule}");
        Ok(report)
    }

    /// Width of the input vector the first layer expects.
    pub fn input_width(&self) -> usize {
        self.layers[0][0].fan_in()
    }

    /// Number of units in the final layer.
    pub fn output_width(&self) -> usize {
        self.layers[self.layers.len() - 1].len()
    }

    /// A copy of every weight, indexed layer, unit, connection.
    pub fn weights(&self) -> Vec<Vec<Vec<f64>>> {
        self.layers
            .iter()
            .map(|layer| layer.iter().map(Unit::weights).collect())
            .collect()
    }

    /// A copy of every threshold, indexed layer, unit.
    pub fn thresholds(&self) -> Vec<Vec<f64>> {
        self.layers
            .iter()
            .map(|layer| layer.iter().map(Unit::threshold).collect())
            .collect()
    }

    /// The desired output vector of the example currently being
    /// trained.
    pub fn desired_output(&self) -> Vec<f64> {
        self.desired_output.clone()
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn set_learning_rate(&mut self, learning_rate: f64) {
        self.learning_rate = learning_rate;
    }

    pub fn momentum(&self) -> f64 {
        self.momentum
    }

    pub fn set_momentum(&mut self, momentum: f64) {
        self.momentum = momentum;
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    pub fn set_activation(&mut self, activation: Activation) {
        self.activation = activation;
    }

    /// Redraws every weight and threshold from the network's own
    /// generator, in construction order.
    pub fn reinitialize(&mut self) {
        for layer in &mut self.layers {
            for unit in layer.iter_mut() {
                unit.init_weights(&mut self.rng);
                unit.init_threshold(&mut self.rng);
            }
        }
    }
}

impl fmt::Debug for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Network")
            .field(
                "layers",
                &self.layers.iter().map(Vec::len).collect::<Vec<_>>(),
            )
            .field("activation", &self.activation.name())
            .field("learning_rate", &self.learning_rate)
            .field("momentum", &self.momentum)
            .finish()
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Network {{ desired: {}, learning rate: {:.3}, momentum: {:.3}, activation: {} }}",
            fmt_vec(&self.desired_output),
            self.learning_rate,
            self.momentum,
            self.activation.name()
        )?;
        for (l, layer) in self.layers.iter().enumerate() {
            for (n, unit) in layer.iter().enumerate() {
                writeln!(f, "  unit ({l},{n}): {unit}")?;
            }
        }
        Ok(())
    }
}
