//! Builder configuration.

use serde::{Deserialize, Serialize};

/// Settings that control wire inference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuilderConfig {
    /// Maximum vertical distance (editor units) between a node and a wire's
    /// lane for the node to count as unambiguously on that wire.
    #[serde(default = "default_lane_tolerance")]
    pub lane_tolerance: f64,
}

fn default_lane_tolerance() -> f64 {
    50.0
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            lane_tolerance: default_lane_tolerance(),
        }
    }
}

impl BuilderConfig {
    /// Override the lane tolerance.
    #[must_use]
    pub fn with_lane_tolerance(mut self, tolerance: f64) -> Self {
        self.lane_tolerance = tolerance;
        self
    }
}
