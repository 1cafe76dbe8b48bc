#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that estimates damage exchanged along a mobile unit's path.
//!
//! Both estimates walk the path the board reports for a launch cell and
//! score every visited cell independently. A structure threatening several
//! consecutive cells therefore contributes once per cell, which models the
//! repeated fire a unit takes while it dwells inside the structure's reach.

use line_defence_core::{Board, Cell, Player, QueryError, UnitKind, THREAT_RADIUS};
use tracing::trace;

/// Weighting applied to each enemy hit along the path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RiskProfile {
    /// Coarse profile for slow escorts that absorb several hits per tick.
    FullExposure,
    /// Fine profile counting a single hit per threatened cell.
    ///
    /// Kept for fast scout-class units. The turn strategy never sizes scouts
    /// by risk, so no orchestration path selects it.
    PerHit,
}

impl RiskProfile {
    /// Effective hits absorbed per enemy attack on a threatened cell.
    #[must_use]
    pub const fn multiplier(self) -> f32 {
        match self {
            Self::FullExposure => 2.0,
            Self::PerHit => 1.0,
        }
    }
}

/// Walks traversal paths and accumulates weighted damage.
#[derive(Clone, Copy, Debug, Default)]
pub struct PathRiskEstimator;

impl PathRiskEstimator {
    /// Creates a new estimator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Damage a unit launched from `launch` by player `player_index` is
    /// expected to absorb before leaving the field.
    ///
    /// Every structure owned by the other player that deals damage and whose
    /// attack range covers a path cell contributes `multiplier × damage` for
    /// that cell. Returns zero when the path is empty or unthreatened.
    pub fn estimate_risk<B: Board + ?Sized>(
        &self,
        board: &B,
        launch: Cell,
        profile: RiskProfile,
        player_index: u8,
    ) -> Result<f32, QueryError> {
        let player = Player::try_from(player_index)?;
        let multiplier = profile.multiplier();
        let mut damage = 0.0;

        for path_cell in board.path_from_edge(launch) {
            for candidate in board.cells_in_range(path_cell, THREAT_RADIUS) {
                let Some(unit) = board.stationary_at(candidate) else {
                    continue;
                };
                if unit.damage_per_hit > 0.0
                    && unit.owner != player
                    && path_cell.distance(candidate) <= unit.attack_range
                {
                    damage += multiplier * unit.damage_per_hit;
                }
            }
        }

        trace!(?launch, ?profile, damage, "estimated path risk");
        Ok(damage)
    }

    /// Damage a group of `count` mobile units of kind `attacker` launched from
    /// `launch` is expected to deal to the other player's structures.
    ///
    /// Each path cell with at least one enemy structure within the attacker's
    /// range contributes one volley per tick spent on the cell.
    pub fn estimate_damage_dealt<B: Board + ?Sized>(
        &self,
        board: &B,
        launch: Cell,
        attacker: UnitKind,
        count: u32,
        player_index: u8,
    ) -> Result<f32, QueryError> {
        let player = Player::try_from(player_index)?;
        if count == 0 {
            return Ok(0.0);
        }

        let stats = *board.catalog().stats(attacker);
        let volley = count as f32 * stats.damage * stats.ticks_per_cell;
        let mut dealt = 0.0;

        for path_cell in board.path_from_edge(launch) {
            let in_reach = board
                .cells_in_range(path_cell, stats.attack_range)
                .into_iter()
                .filter_map(|candidate| board.stationary_at(candidate))
                .any(|unit| unit.owner != player);
            if in_reach {
                dealt += volley;
            }
        }

        trace!(?launch, ?attacker, count, dealt, "estimated damage dealt");
        Ok(dealt)
    }
}
