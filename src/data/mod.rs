//! Labeled example-set loading.
//!
//! An example set is a JSON document holding two parallel collections:
//! training inputs and desired outputs, index-aligned. The loader only
//! verifies that alignment; width validation against a concrete network
//! happens when the set is handed to [`crate::training::train`], which
//! reports the offending example index.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Parallel collections of training inputs and desired outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExampleSet {
    /// One input vector per example, each matching the network's input
    /// width.
    pub inputs: Vec<Vec<f64>>,
    /// One desired-output vector per example, index-aligned with
    /// `inputs`, each matching the network's output width.
    pub targets: Vec<Vec<f64>>,
}

impl ExampleSet {
    /// Loads an example set from a JSON file.
    ///
    /// # Errors
    ///
    /// A formatted message if the file cannot be read, the document
    /// does not parse, or the two collections differ in length.
    pub fn load(path: &Path) -> Result<Self, String> {
        let text = fs::read_to_string(path)
            .map_err(|e| format!("failed to read example set {}: {e}", path.display()))?;
        let set: ExampleSet = serde_json::from_str(&text)
            .map_err(|e| format!("malformed example set {}: {e}", path.display()))?;
        set.validate()
            .map_err(|e| format!("invalid example set {}: {e}", path.display()))?;
        Ok(set)
    }

    /// Checks that inputs and targets are index-aligned.
    pub fn validate(&self) -> Result<(), String> {
        if self.inputs.len() != self.targets.len() {
            return Err(format!(
                "{} inputs against {} targets",
                self.inputs.len(),
                self.targets.len()
            ));
        }
        Ok(())
    }

    /// Number of examples.
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}
