//! Tunable thresholds of the turn strategy.

use serde::{Deserialize, Serialize};

/// Thresholds and budgets read by the turn orchestrator.
///
/// Every field falls back to its default when absent from a serialized
/// configuration, so partial files only override what they name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Turns before which the line strategy runs; later turns use flank play.
    pub early_game_turns: u32,
    /// Friendly structures below this health are recycled.
    pub low_health_threshold: f32,
    /// Opponent structures a front band must exceed to move the line.
    pub line_unit_threshold: usize,
    /// Damage an attack must be expected to deal before heavy units launch.
    pub profitability_threshold: f32,
    /// Upper bound on escorts sent alongside a heavy attack.
    pub max_escorts: u32,
    /// Corner health assumed when sizing a left counter-attack.
    pub interceptor_health_budget: f32,
    /// Health of a single escort, used to convert damage into unit counts.
    pub interceptor_health: f32,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            early_game_turns: 101,
            low_health_threshold: 20.0,
            line_unit_threshold: 4,
            profitability_threshold: 8.0,
            max_escorts: 2,
            interceptor_health_budget: 200.0,
            interceptor_health: 40.0,
        }
    }
}
