//! Simulation report generation.

use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregated results from one simulation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SimReport {
    pub encounters: u64,
    pub shiny_rate: u32,
    pub shinies: u64,
    pub hints: u64,

    /// Encounters per rarity label
    pub by_rarity: BTreeMap<String, u64>,

    /// Encounters it took to reach each shiny
    pub hunt_lengths: Vec<u64>,
}

impl SimReport {
    pub fn expected_shiny_rate(&self) -> f64 {
        1.0 / self.shiny_rate.max(1) as f64
    }

    pub fn observed_shiny_rate(&self) -> f64 {
        if self.encounters == 0 {
            return 0.0;
        }
        self.shinies as f64 / self.encounters as f64
    }

    pub fn observed_hint_rate(&self) -> f64 {
        if self.encounters == 0 {
            return 0.0;
        }
        self.hints as f64 / self.encounters as f64
    }

    pub fn average_hunt_length(&self) -> Option<f64> {
        if self.hunt_lengths.is_empty() {
            return None;
        }
        Some(self.hunt_lengths.iter().sum::<u64>() as f64 / self.hunt_lengths.len() as f64)
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str("Results\n");
        out.push_str(&format!("  Encounters:     {}\n", self.encounters));
        out.push_str(&format!(
            "  Shinies:        {} (observed 1/{:.0}, expected 1/{})\n",
            self.shinies,
            1.0 / self.observed_shiny_rate().max(f64::MIN_POSITIVE),
            self.shiny_rate
        ));
        out.push_str(&format!(
            "  Hints:          {} ({:.4}%)\n",
            self.hints,
            self.observed_hint_rate() * 100.0
        ));
        if let Some(avg) = self.average_hunt_length() {
            out.push_str(&format!("  Avg hunt:       {:.1} encounters\n", avg));
        }

        out.push_str("\nEncounters by rarity\n");
        for (rarity, count) in &self.by_rarity {
            let share = *count as f64 / self.encounters.max(1) as f64 * 100.0;
            out.push_str(&format!("  {:<14}{:>10} ({:.2}%)\n", rarity, count, share));
        }
        out
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
