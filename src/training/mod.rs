//! The convergence-driven training loop and its reporting types.
//!
//! Training is online gradient descent: each example runs a forward
//! pass, a desired-output assignment, and a backward pass, so the
//! weight updates from example `i` are visible to the forward pass of
//! example `i + 1` within the same epoch. The loop keeps the current
//! and previous epoch's summed squared error in a two-slot buffer
//! indexed by `epoch % 2` and stops once the slot it is about to
//! overwrite has fallen to the convergence threshold.
//!
//! An optional per-epoch heuristic nudges the learning rate: a rise of
//! more than 4% over the previous epoch shrinks it by 0.7, any fall
//! grows it by 1.05, and either branch re-runs one backward pass
//! against whatever scratch state the epoch's last example left behind.
//! The heuristic does not reliably speed up convergence; it is kept for
//! compatibility and can be disabled via [`TrainOptions`].

use serde::Serialize;

use crate::core::{Activation, NetError, NetResult, Network};

/// Controls for one training run.
#[derive(Debug, Clone)]
pub struct TrainOptions {
    /// When set, replaces the network's transfer function for the rest
    /// of training and afterwards.
    pub activation: Option<Activation>,
    /// Enables the per-epoch learning-rate heuristic.
    pub adaptive_rate: bool,
    /// Console reporting during the run.
    pub logging: Logging,
}

impl Default for TrainOptions {
    fn default() -> Self {
        TrainOptions {
            activation: None,
            adaptive_rate: true,
            logging: Logging::Silent,
        }
    }
}

/// Console reporting frequency during training.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Logging {
    /// Print nothing.
    Silent,
    /// Print a summary once training converges.
    Completion,
    /// Print a progress line every `n` epochs, plus the summary.
    Epochs(usize),
}

impl Logging {
    fn epoch(&self, record: &EpochRecord) {
        if let Logging::Epochs(every) = self {
            if *every > 0 && record.epoch % every == 0 {
                println!(
                    "epoch {}: sse={:.8} rate={:.4}",
                    record.epoch, record.sum_squared_error, record.learning_rate
                );
            }
        }
    }

    fn completion(&self, summary: &TrainSummary) {
        if let Logging::Silent = self {
            return;
        }
        println!(
            "converged at epoch {} (sse={:.8}, rate={:.4})",
            summary.epochs, summary.final_error, summary.final_learning_rate
        );
    }
}

/// One epoch's outcome, serializable for JSONL metrics files.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EpochRecord {
    pub epoch: usize,
    pub sum_squared_error: f64,
    pub learning_rate: f64,
}

/// Result of a completed training run.
#[derive(Debug, Clone)]
pub struct TrainSummary {
    /// Zero-based index of the last completed epoch.
    pub epochs: usize,
    /// Summed squared error of the last completed epoch.
    pub final_error: f64,
    /// Learning rate after the last adaptive adjustment.
    pub final_learning_rate: f64,
    /// Every epoch's record, in order.
    pub history: Vec<EpochRecord>,
}

/// Trains `network` on the labeled examples until the per-epoch summed
/// squared error falls below `convergence`.
///
/// `inputs[i]` must match the network's input width and `targets[i]`
/// its output width. There is no epoch cap: a run either converges or
/// keeps going, so callers needing bounded runtime must impose their
/// own limit.
///
/// # Errors
///
/// `DimensionMismatch` if `inputs` and `targets` differ in length, or
/// if any example has the wrong width; the message names the offending
/// example index.
pub fn train(
    network: &mut Network,
    inputs: &[Vec<f64>],
    targets: &[Vec<f64>],
    convergence: f64,
    options: &TrainOptions,
) -> NetResult<TrainSummary> {
    if inputs.len() != targets.len() {
        return Err(NetError::DimensionMismatch(format!(
            "{} training sets against {} desired outcomes",
            inputs.len(),
            targets.len()
        )));
    }

    if let Some(activation) = options.activation {
        network.set_activation(activation);
    }

    // Both slots start above any sensible threshold so the first two
    // epochs always run.
    let mut sums = [1.0f64; 2];
    let mut epoch = 0usize;
    let mut history = Vec::new();

    while sums[epoch % 2] > convergence {
        sums[epoch % 2] = run_epoch(network, inputs, targets)?;

        if options.adaptive_rate {
            let current = sums[epoch % 2];
            let previous = sums[(epoch + 1) % 2];
            if current / previous > 1.04 {
                network.set_learning_rate(network.learning_rate() * 0.7);
                network.backward_pass()?;
            } else if current - previous < 0.0 {
                network.set_learning_rate(network.learning_rate() * 1.05);
                network.backward_pass()?;
            }
        }

        let record = EpochRecord {
            epoch,
            sum_squared_error: sums[epoch % 2],
            learning_rate: network.learning_rate(),
        };
        options.logging.epoch(&record);
        history.push(record);
        epoch += 1;
    }

    let summary = TrainSummary {
        epochs: epoch.saturating_sub(1),
        final_error: history.last().map_or(0.0, |r| r.sum_squared_error),
        final_learning_rate: network.learning_rate(),
        history,
    };
    options.logging.completion(&summary);
    Ok(summary)
}

/// Runs every example once, in order, and returns the epoch's summed
/// squared error.
///
/// # Errors
///
/// `DimensionMismatch` wrapping the index of the first example whose
/// input or target width does not fit the network.
pub fn run_epoch(
    network: &mut Network,
    inputs: &[Vec<f64>],
    targets: &[Vec<f64>],
) -> NetResult<f64> {
    let mut sum = 0.0;
    for (i, (input, target)) in inputs.iter().zip(targets).enumerate() {
        example_step(network, input, target)
            .map_err(|e| NetError::DimensionMismatch(format!("training set [{i}]: {e}")))?;
        sum += network.sum_squared_error();
    }
    Ok(sum)
}

fn example_step(network: &mut Network, input: &[f64], target: &[f64]) -> NetResult<()> {
    network.forward(input)?;
    network.set_desired_output(target)?;
    network.backward_pass()
}
