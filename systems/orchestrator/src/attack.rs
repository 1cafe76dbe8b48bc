//! Mobile-unit attacks: sizing, side selection and deployment.

use line_defence_core::{Board, Cell, Player, QueryError, ResourceKind, UnitKind};
use line_defence_system_path_risk::{PathRiskEstimator, RiskProfile};
use tracing::debug;

use crate::catalog;
use crate::{Flank, StrategyConfig};

const ESCORT: UnitKind = UnitKind::Interceptor;
const HEAVY: UnitKind = UnitKind::Demolisher;

/// Unit counts for a heavy attack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AttackPlan {
    /// Escorts launched ahead of the heavy units.
    pub escorts: u32,
    /// Heavy units launched behind the escorts.
    pub heavy: u32,
}

impl AttackPlan {
    /// Sizes an attack from both mobile pools.
    ///
    /// Escorts match the opponent's whole mobile currency up to
    /// `max_escorts`; whatever we have left after paying one unit per escort
    /// buys heavy units at `heavy_cost` each.
    #[must_use]
    pub fn size(own_mobile: f32, opponent_mobile: f32, max_escorts: u32, heavy_cost: f32) -> Self {
        let escorts = whole(opponent_mobile).min(max_escorts);
        let heavy = if heavy_cost > 0.0 {
            whole((own_mobile - escorts as f32) / heavy_cost)
        } else {
            0
        };
        Self { escorts, heavy }
    }
}

/// Launch side picked for a heavy attack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SideChoice {
    /// Launch cell expected to deal the most damage.
    pub launch: Cell,
    /// The remaining candidate.
    pub other: Cell,
    /// Damage the heavy units are expected to deal from `launch`.
    pub damage: f32,
}

/// Outcome of a planned heavy attack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttackDecision {
    /// Unit counts.
    pub plan: AttackPlan,
    /// Chosen launch side.
    pub side: SideChoice,
    /// Whether the expected damage clears the profitability threshold.
    pub profitable: bool,
}

/// Compares the candidates and keeps the one the heavy units hurt most.
/// Ties go to the first candidate.
pub(crate) fn softer_side<B: Board + ?Sized>(
    board: &B,
    estimator: &PathRiskEstimator,
    candidates: [Cell; 2],
    heavy: u32,
) -> Result<SideChoice, QueryError> {
    let [first, second] = candidates;
    let me = Player::Me.index();
    let first_damage = estimator.estimate_damage_dealt(board, first, HEAVY, heavy, me)?;
    let second_damage = estimator.estimate_damage_dealt(board, second, HEAVY, heavy, me)?;

    Ok(if first_damage >= second_damage {
        SideChoice {
            launch: first,
            other: second,
            damage: first_damage,
        }
    } else {
        SideChoice {
            launch: second,
            other: first,
            damage: second_damage,
        }
    })
}

/// Sizes an attack and picks its launch side without touching the board.
pub(crate) fn plan<B: Board + ?Sized>(
    board: &B,
    estimator: &PathRiskEstimator,
    config: &StrategyConfig,
    candidates: [Cell; 2],
) -> Result<AttackDecision, QueryError> {
    let plan = AttackPlan::size(
        board.resource(ResourceKind::Mobile, Player::Me),
        board.resource(ResourceKind::Mobile, Player::Opponent),
        config.max_escorts,
        board.catalog().stats(HEAVY).cost.mobile,
    );
    let side = softer_side(board, estimator, candidates, plan.heavy)?;
    let profitable = side.damage > config.profitability_threshold;

    debug!(?plan, ?side, profitable, "planned attack");
    Ok(AttackDecision {
        plan,
        side,
        profitable,
    })
}

/// Deploys a planned attack.
///
/// Escorts always leave from the chosen side. Profitable attacks follow them
/// with heavy units and finish with a support buff.
pub(crate) fn execute<B: Board + ?Sized>(board: &mut B, decision: &AttackDecision) {
    let launch = decision.side.launch;
    board.request_build(ESCORT, vec![launch], decision.plan.escorts);
    if !decision.profitable {
        return;
    }

    board.request_build(HEAVY, vec![launch], decision.plan.heavy);
    support_buff(board, launch);
}

/// Builds, upgrades and immediately reclaims supports beside the launch when
/// structure currency remains.
fn support_buff<B: Board + ?Sized>(board: &mut B, launch: Cell) {
    if board.resource(ResourceKind::Structure, Player::Me) <= 0.0 {
        return;
    }
    let supports = catalog::supports_for(launch);
    board.request_build(UnitKind::Support, supports.clone(), 1);
    board.request_upgrade(supports.clone());
    board.request_remove(supports);
}

/// Counter-attack through an opponent corner that was just opened.
///
/// Escorts clear the corner from the lane launch while scouts rush the far
/// edge with the remaining currency. Returns the escort count requested.
pub(crate) fn counter_attack<B: Board + ?Sized>(
    board: &mut B,
    estimator: &PathRiskEstimator,
    config: &StrategyConfig,
    flank: Flank,
) -> Result<u32, QueryError> {
    let cells = catalog::counter_cells(flank);

    board.request_build(UnitKind::Wall, vec![cells.wall], 1);
    let risk = estimator.estimate_risk(
        board,
        cells.escort_launch,
        RiskProfile::FullExposure,
        Player::Me.index(),
    )?;
    let corner_health = board
        .stationary_at(cells.corner)
        .map_or(0.0, |unit| unit.health);
    let escort_health = config.interceptor_health.max(f32::EPSILON);
    let absorbed = (risk / escort_health).floor();

    let escorts = match flank {
        Flank::Left if corner_health > 0.0 => {
            whole_ceil(config.interceptor_health_budget / escort_health + absorbed)
        }
        Flank::Left => 0,
        Flank::Right => whole_ceil(corner_health / escort_health + absorbed),
    };

    let scouts = match flank {
        Flank::Left => {
            board.request_build(ESCORT, vec![cells.escort_launch], escorts);
            whole(board.resource(ResourceKind::Mobile, Player::Me))
        }
        Flank::Right => {
            let mobile = board.resource(ResourceKind::Mobile, Player::Me);
            board.request_build(ESCORT, vec![cells.escort_launch], escorts);
            whole(mobile - escorts as f32)
        }
    };
    board.request_build(UnitKind::Scout, vec![cells.scout_launch], scouts);

    debug!(?flank, risk, corner_health, escorts, scouts, "counter-attack launched");
    Ok(escorts)
}

fn whole(amount: f32) -> u32 {
    if amount.is_finite() && amount > 0.0 {
        amount.floor() as u32
    } else {
        0
    }
}

fn whole_ceil(amount: f32) -> u32 {
    if amount.is_finite() && amount > 0.0 {
        amount.ceil() as u32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizing_reserves_one_unit_per_escort() {
        assert_eq!(
            AttackPlan::size(10.0, 1.0, 2, 3.0),
            AttackPlan {
                escorts: 1,
                heavy: 3
            }
        );
    }

    #[test]
    fn escorts_are_capped() {
        let plan = AttackPlan::size(20.0, 9.7, 2, 3.0);
        assert_eq!(plan.escorts, 2);
        assert_eq!(plan.heavy, 6);
    }

    #[test]
    fn short_pools_clamp_to_zero() {
        assert_eq!(AttackPlan::size(1.0, 4.0, 2, 3.0), AttackPlan::default());
        assert_eq!(AttackPlan::size(-3.0, -1.0, 2, 3.0), AttackPlan::default());
        assert_eq!(AttackPlan::size(9.0, 0.0, 2, 0.0).heavy, 0);
    }

    #[test]
    fn equal_damage_keeps_the_first_candidate() {
        let world = line_defence_world::World::new();
        let estimator = PathRiskEstimator::new();
        let left = Cell::new(3, 10);
        let right = Cell::new(24, 10);

        let choice = softer_side(&world, &estimator, [left, right], 4).expect("valid player");
        assert_eq!(
            choice,
            SideChoice {
                launch: left,
                other: right,
                damage: 0.0,
            }
        );

        let swapped = softer_side(&world, &estimator, [right, left], 4).expect("valid player");
        assert_eq!(swapped.launch, right, "ties follow candidate order");
        assert_eq!(swapped.other, left);
    }

    #[test]
    fn rounding_helpers_ignore_non_positive_amounts() {
        assert_eq!(whole(2.9), 2);
        assert_eq!(whole_ceil(5.1), 6);
        assert_eq!(whole_ceil(0.0), 0);
        assert_eq!(whole(f32::NAN), 0);
    }
}
