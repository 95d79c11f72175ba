//! Randomness seam for the encounter engine.

use rand::Rng;
use std::collections::VecDeque;

/// The two kinds of draw the engine needs.
///
/// Every [`rand::Rng`] is a `Dice`; [`ScriptedDice`] replays fixed draws.
pub trait Dice {
    /// Uniform float in `[0, 1)`.
    fn unit(&mut self) -> f64;

    /// Uniform integer in `[1, sides]`. `sides` of 0 is treated as 1.
    fn roll(&mut self, sides: u32) -> u32;
}

impl<R: Rng> Dice for R {
    fn unit(&mut self) -> f64 {
        self.gen::<f64>()
    }

    fn roll(&mut self, sides: u32) -> u32 {
        self.gen_range(1..=sides.max(1))
    }
}

/// Replays queued draws in order.
///
/// Once a queue runs dry, `unit` yields 0.0 and `roll` yields the highest
/// face, which never counts as a rare or a hint unless `sides` is 1.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    units: VecDeque<f64>,
    rolls: VecDeque<u32>,
}

impl ScriptedDice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_units(mut self, units: impl IntoIterator<Item = f64>) -> Self {
        self.units.extend(units);
        self
    }

    pub fn with_rolls(mut self, rolls: impl IntoIterator<Item = u32>) -> Self {
        self.rolls.extend(rolls);
        self
    }
}

impl Dice for ScriptedDice {
    fn unit(&mut self) -> f64 {
        self.units.pop_front().unwrap_or(0.0).clamp(0.0, 1.0 - f64::EPSILON)
    }

    fn roll(&mut self, sides: u32) -> u32 {
        let sides = sides.max(1);
        self.rolls
            .pop_front()
            .map(|r| r.clamp(1, sides))
            .unwrap_or(sides)
    }
}
