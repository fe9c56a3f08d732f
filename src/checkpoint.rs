//! Network save/load against JSON documents.
//!
//! A network file describes either a seeded network (layer widths plus
//! the seed that generates its weights) or a fully specified one
//! (explicit per-layer, per-unit weights and thresholds). Saving always
//! writes the explicit form at full f64 precision, so a saved network
//! reloads to one whose forward outputs match the original bit for bit.
//!
//! Malformed documents and unreadable files are reported with formatted
//! messages, never retried; the engine itself only ever sees
//! well-shaped networks.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::Network;

/// The two document forms a network file can take.
///
/// Deserialization picks the form from the fields present: explicit
/// weight tensors win over a widths-plus-seed description.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NetworkSpec {
    /// Fully specified weights, one inner list per layer, per unit.
    Explicit {
        weights: Vec<Vec<Vec<f64>>>,
        thresholds: Vec<Vec<f64>>,
        learning_rate: f64,
        momentum: f64,
    },
    /// Layer widths plus the seed that generates the weights.
    Seeded {
        layer_widths: Vec<usize>,
        seed: u64,
        learning_rate: f64,
        momentum: f64,
    },
}

impl NetworkSpec {
    /// Captures a network's current weights, thresholds, and
    /// hyperparameters as an explicit spec.
    pub fn snapshot(network: &Network) -> Self {
        NetworkSpec::Explicit {
            weights: network.weights(),
            thresholds: network.thresholds(),
            learning_rate: network.learning_rate(),
            momentum: network.momentum(),
        }
    }

    /// Builds the described network.
    ///
    /// # Errors
    ///
    /// A formatted message if the description is unusable: too few
    /// layer widths, a zero width, mismatched weight/threshold shapes,
    /// an empty layer, or a fan-in that does not match the preceding
    /// layer.
    pub fn into_network(self) -> Result<Network, String> {
        match self {
            NetworkSpec::Seeded {
                layer_widths,
                seed,
                learning_rate,
                momentum,
            } => {
                if layer_widths.len() < 2 {
                    return Err(format!(
                        "network description needs an input width and at least one layer, got {:?}",
                        layer_widths
                    ));
                }
                if layer_widths.contains(&0) {
                    return Err(format!(
                        "network description contains an empty layer: {:?}",
                        layer_widths
                    ));
                }
                Ok(Network::seeded(&layer_widths, seed, learning_rate, momentum))
            }
            NetworkSpec::Explicit {
                weights,
                thresholds,
                learning_rate,
                momentum,
            } => {
                validate_explicit(&weights, &thresholds)?;
                Ok(Network::with_weights(
                    weights,
                    thresholds,
                    learning_rate,
                    momentum,
                ))
            }
        }
    }
}

fn validate_explicit(weights: &[Vec<Vec<f64>>], thresholds: &[Vec<f64>]) -> Result<(), String> {
    if weights.is_empty() {
        return Err("network description has no layers".to_string());
    }
    if weights.len() != thresholds.len() {
        return Err(format!(
            "{} weight layers against {} threshold layers",
            weights.len(),
            thresholds.len()
        ));
    }
    let mut previous_width = None;
    for (l, (layer_weights, layer_thresholds)) in weights.iter().zip(thresholds).enumerate() {
        if layer_weights.is_empty() {
            return Err(format!("layer {l} has no units"));
        }
        if layer_weights.len() != layer_thresholds.len() {
            return Err(format!(
                "layer {l} has {} units but {} thresholds",
                layer_weights.len(),
                layer_thresholds.len()
            ));
        }
        if let Some(width) = previous_width {
            if let Some(unit) = layer_weights.iter().find(|u| u.len() != width) {
                return Err(format!(
                    "layer {l} has a unit with {} weights where the preceding layer has {} units",
                    unit.len(),
                    width
                ));
            }
        }
        previous_width = Some(layer_weights.len());
    }
    Ok(())
}

/// Loads a network from a JSON file.
///
/// # Errors
///
/// A formatted message if the file cannot be read, the document does
/// not parse, or the description is unusable.
pub fn load_network(path: &Path) -> Result<Network, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("failed to read network file {}: {e}", path.display()))?;
    let spec: NetworkSpec = serde_json::from_str(&text)
        .map_err(|e| format!("malformed network file {}: {e}", path.display()))?;
    spec.into_network()
        .map_err(|e| format!("invalid network file {}: {e}", path.display()))
}

/// Saves a network's current state to a JSON file in the explicit form.
///
/// Parent directories are created as needed.
///
/// # Errors
///
/// A formatted message if serialization or the write fails.
pub fn save_network(path: &Path, network: &Network) -> Result<(), String> {
    let spec = NetworkSpec::snapshot(network);
    let json = serde_json::to_string_pretty(&spec)
        .map_err(|e| format!("failed to serialize network: {e}"))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("failed to create directory {}: {e}", parent.display()))?;
    }
    fs::write(path, json).map_err(|e| format!("failed to write {}: {e}", path.display()))
}
