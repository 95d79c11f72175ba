//! Weighted creature selection and the shiny roll.

use super::dice::Dice;
use super::session::HuntSession;
use super::types::{EncounterError, EncounterEvent, HuntState, RareRoll};
use crate::catalog::Catalog;
use crate::config::{Config, RarityWeights};
use crate::constants::HINT_RATE_DIVISOR;
use std::sync::Arc;

/// Effective weight of every catalog entry, in catalog order.
///
/// Labels missing from the table weigh 0, which makes the entry
/// unreachable rather than an error.
pub fn weights_for(catalog: &Catalog, rarity_weights: &RarityWeights) -> Vec<f64> {
    catalog
        .iter()
        .map(|(_, rarity)| {
            rarity_weights
                .get(rarity)
                .copied()
                .filter(|w| w.is_finite() && *w > 0.0)
                .unwrap_or(0.0)
        })
        .collect()
}

/// Pick an index with probability proportional to its weight.
///
/// Zero-weight slots are never returned.
pub fn pick_index(weights: &[f64], dice: &mut impl Dice) -> Result<usize, EncounterError> {
    if weights.is_empty() {
        return Err(EncounterError::EmptyCatalog);
    }
    let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
    if !(total.is_finite() && total > 0.0) {
        return Err(EncounterError::NoSelectableEntries);
    }

    let target = dice.unit() * total;
    let mut cumulative = 0.0;
    let mut last_positive = None;
    for (index, weight) in weights.iter().enumerate() {
        if *weight <= 0.0 {
            continue;
        }
        cumulative += weight;
        last_positive = Some(index);
        if target < cumulative {
            return Ok(index);
        }
    }

    // Float rounding can leave target == total
    last_positive.ok_or(EncounterError::NoSelectableEntries)
}

/// Pick one creature from `catalog`, weighted by its rarity.
pub fn pick_weighted<'a>(
    catalog: &'a Catalog,
    rarity_weights: &RarityWeights,
    dice: &mut impl Dice,
) -> Result<(&'a str, &'a str), EncounterError> {
    let weights = weights_for(catalog, rarity_weights);
    let index = pick_index(&weights, dice)?;
    catalog
        .get_index(index)
        .ok_or(EncounterError::NoSelectableEntries)
}

/// Two-stage roll: 1 in `shiny_rate` for a shiny; otherwise 1 in
/// `max(1, shiny_rate / 5)` for a hint.
pub fn roll_rare_event(shiny_rate: u32, dice: &mut impl Dice) -> RareRoll {
    let shiny_rate = shiny_rate.max(1);
    if dice.roll(shiny_rate) == 1 {
        return RareRoll {
            rare: true,
            hinted: false,
        };
    }
    let hint_sides = (shiny_rate / HINT_RATE_DIVISOR).max(1);
    RareRoll {
        rare: false,
        hinted: dice.roll(hint_sides) == 1,
    }
}

/// Produces encounters from a fixed catalog and owns the session state.
#[derive(Debug, Clone)]
pub struct EncounterEngine {
    catalog: Arc<Catalog>,
    weights: Vec<f64>,
    shiny_rate: u32,
    session: HuntSession,
}

impl EncounterEngine {
    /// Refuses an empty catalog or one where nothing can be selected.
    pub fn new(
        catalog: Arc<Catalog>,
        rarity_weights: &RarityWeights,
        shiny_rate: u32,
    ) -> Result<Self, EncounterError> {
        if catalog.is_empty() {
            return Err(EncounterError::EmptyCatalog);
        }
        let weights = weights_for(&catalog, rarity_weights);
        let total: f64 = weights.iter().sum();
        if !(total.is_finite() && total > 0.0) {
            return Err(EncounterError::NoSelectableEntries);
        }

        Ok(Self {
            catalog,
            weights,
            shiny_rate: shiny_rate.max(1),
            session: HuntSession::new(),
        })
    }

    pub fn from_config(catalog: Arc<Catalog>, config: &Config) -> Result<Self, EncounterError> {
        Self::new(catalog, &config.rarity_weights, config.shiny_rate)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn shiny_rate(&self) -> u32 {
        self.shiny_rate
    }

    pub fn session(&self) -> &HuntSession {
        &self.session
    }

    pub fn state(&self) -> HuntState {
        self.session.state()
    }

    /// Number of entries that can actually come up.
    pub fn selectable_entries(&self) -> usize {
        self.weights.iter().filter(|w| **w > 0.0).count()
    }

    pub fn start(&mut self) -> Result<(), EncounterError> {
        self.session.start()
    }

    pub fn continue_hunt(&mut self) -> Result<(), EncounterError> {
        self.session.continue_hunt()
    }

    pub fn shutdown(&mut self) {
        self.session.shutdown();
    }

    /// One encounter: count it, pick a creature, roll for shiny.
    ///
    /// A shiny moves the session to [`HuntState::RareFound`]; further steps
    /// fail until [`continue_hunt`](Self::continue_hunt).
    pub fn step(&mut self, dice: &mut impl Dice) -> Result<EncounterEvent, EncounterError> {
        let sequence = self.session.record_encounter()?;
        let index = pick_index(&self.weights, dice)?;
        let (name, rarity) = self
            .catalog
            .get_index(index)
            .ok_or(EncounterError::NoSelectableEntries)?;
        let roll = roll_rare_event(self.shiny_rate, dice);

        if roll.rare {
            self.session.mark_rare_found();
        }

        Ok(EncounterEvent {
            name: name.to_string(),
            rarity: rarity.to_string(),
            rare: roll.rare,
            hinted: roll.hinted,
            sequence,
        })
    }
}
