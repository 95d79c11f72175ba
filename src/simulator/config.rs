//! Simulation configuration.

use crate::constants::DEFAULT_SHINY_RATE;

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Total encounters to roll
    pub encounters: u64,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// 1-in-N shiny rate used for the run
    pub shiny_rate: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            encounters: 1_000_000,
            seed: None,
            shiny_rate: DEFAULT_SHINY_RATE,
        }
    }
}

impl SimConfig {
    /// Small, seeded config for quick checks
    pub fn quick(seed: u64) -> Self {
        Self {
            encounters: 50_000,
            seed: Some(seed),
            ..Default::default()
        }
    }
}
