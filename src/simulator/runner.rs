//! Simulation runner.
//!
//! Every shiny auto-continues the session, so one run covers many hunts.

use super::config::SimConfig;
use super::report::SimReport;
use crate::catalog::Catalog;
use crate::config::RarityWeights;
use crate::encounter::{EncounterEngine, EncounterError};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;

/// Run the simulation and return a report.
pub fn run_simulation(
    catalog: Arc<Catalog>,
    rarity_weights: &RarityWeights,
    config: &SimConfig,
) -> Result<SimReport, EncounterError> {
    let mut rng = match config.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let mut engine = EncounterEngine::new(catalog, rarity_weights, config.shiny_rate)?;
    engine.start()?;

    let mut report = SimReport {
        shiny_rate: engine.shiny_rate(),
        ..Default::default()
    };

    for _ in 0..config.encounters {
        let event = engine.step(&mut rng)?;
        report.encounters += 1;
        *report.by_rarity.entry(event.rarity).or_insert(0) += 1;

        if event.hinted {
            report.hints += 1;
        }
        if event.rare {
            report.shinies += 1;
            report.hunt_lengths.push(event.sequence);
            engine.continue_hunt()?;
        }
    }

    Ok(report)
}
