#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn orchestrator that sequences the line strategy against a board.
//!
//! Every turn starts by rebuilding what the previous turn recycled and
//! recycling what is now badly damaged. The early game then follows the
//! reinforced-line strategy; afterwards play alternates between holding the
//! full defence and counter-attacking through corners the opponent opened.

mod attack;
mod catalog;
mod config;
mod defence;
mod ledger;
mod telemetry;

use line_defence_core::{Board, Cell, UnitKind};
use line_defence_system_line_state::{
    opening_region, LineDepth, LineLifecycle, LineState, FRONT_ROW,
};
use line_defence_system_path_risk::PathRiskEstimator;
use line_defence_system_scanner::{EnemyScanner, UnitFilter};
use tracing::{debug, info, warn};

pub use attack::{AttackDecision, AttackPlan, SideChoice};
pub use config::StrategyConfig;
pub use ledger::RebuildLedger;
pub use telemetry::FrameError;

/// Opponent structures on a corner that signal it was deliberately opened.
const BREACH_SIGNAL_UNITS: usize = 2;

/// One side of the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Flank {
    /// Columns near `x = 0`.
    Left,
    /// Columns near `x = 27`.
    Right,
}

impl Flank {
    /// The other flank.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    fn corner_columns(self) -> std::ops::RangeInclusive<i32> {
        match self {
            Self::Left => 0..=1,
            Self::Right => 26..=27,
        }
    }
}

/// Branch taken by a single turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnMode {
    /// Line strategy of the opening turns.
    EarlyGame,
    /// Counter-attack through the opponent's left corner.
    LeftFollowup,
    /// Rebuild after the left counter-attack.
    LeftReturn,
    /// Counter-attack through the opponent's right corner.
    RightFollowup,
    /// Rebuild after the right counter-attack.
    RightReturn,
    /// The opponent opened its left corner; open ours in response.
    BreachLeftDetected,
    /// The opponent opened its right corner; open ours in response.
    BreachRightDetected,
    /// Full defence.
    SteadyState,
}

/// Mutable strategy state carried between turns.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StrategyState {
    line: LineState,
    ledger: RebuildLedger,
    breached: Option<Flank>,
    just_attacked: bool,
    ready_to_fire: bool,
    scored_on: Vec<Cell>,
}

impl StrategyState {
    /// Reinforced line state.
    #[must_use]
    pub const fn line(&self) -> &LineState {
        &self.line
    }

    /// Structures waiting to be rebuilt next turn.
    #[must_use]
    pub const fn ledger(&self) -> &RebuildLedger {
        &self.ledger
    }

    /// Flank whose corner we opened for a counter-attack, if any.
    #[must_use]
    pub const fn breached(&self) -> Option<Flank> {
        self.breached
    }

    /// Reports whether the counter-attack through the open corner has fired.
    #[must_use]
    pub const fn just_attacked(&self) -> bool {
        self.just_attacked
    }

    /// Reports whether the opportunistic attack fires next turn.
    #[must_use]
    pub const fn ready_to_fire(&self) -> bool {
        self.ready_to_fire
    }
}

/// Decision engine invoked once per turn.
#[derive(Debug, Default)]
pub struct Strategist {
    config: StrategyConfig,
    state: StrategyState,
    scanner: EnemyScanner,
    estimator: PathRiskEstimator,
    lifecycle: LineLifecycle,
}

impl Strategist {
    /// Creates a strategist with fresh state.
    #[must_use]
    pub fn new(config: StrategyConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Configuration in force.
    #[must_use]
    pub const fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// State carried between turns.
    #[must_use]
    pub const fn state(&self) -> &StrategyState {
        &self.state
    }

    /// Cells where opponent units reached our edge, oldest first.
    #[must_use]
    pub fn scored_on(&self) -> &[Cell] {
        &self.state.scored_on
    }

    /// Runs one turn against the board and returns the branch taken.
    pub fn on_turn<B: Board + ?Sized>(&mut self, board: &mut B) -> TurnMode {
        let turn = board.turn_number();
        let _ = self.state.ledger.flush(board);
        let _ = self.state.ledger.sweep(
            board,
            &opening_region(),
            self.config.low_health_threshold,
        );

        let mode = self.select_mode(board, turn);
        debug!(turn, ?mode, "dispatching turn");

        match mode {
            TurnMode::EarlyGame => self.early_game(board, turn),
            TurnMode::LeftFollowup => self.follow_up(board, Flank::Left),
            TurnMode::RightFollowup => self.follow_up(board, Flank::Right),
            TurnMode::LeftReturn | TurnMode::RightReturn => {
                defence::steady_defence(board);
                self.state.breached = None;
                self.state.just_attacked = false;
            }
            TurnMode::BreachLeftDetected => self.open_corner(board, Flank::Left),
            TurnMode::BreachRightDetected => self.open_corner(board, Flank::Right),
            TurnMode::SteadyState => defence::steady_defence(board),
        }
        mode
    }

    /// Records opponent breaches reported in a mid-turn action frame.
    pub fn on_action_frame(&mut self, frame: &str) -> Result<(), FrameError> {
        for breach in telemetry::opponent_breaches(frame)? {
            info!(cell = ?breach.cell, damage = breach.damage, "scored on");
            self.state.scored_on.push(breach.cell);
        }
        Ok(())
    }

    fn select_mode<B: Board + ?Sized>(&self, board: &B, turn: u32) -> TurnMode {
        if turn < self.config.early_game_turns {
            return TurnMode::EarlyGame;
        }
        match (self.state.breached, self.state.just_attacked) {
            (Some(Flank::Left), false) => TurnMode::LeftFollowup,
            (Some(Flank::Left), true) => TurnMode::LeftReturn,
            (Some(Flank::Right), false) => TurnMode::RightFollowup,
            (Some(Flank::Right), true) => TurnMode::RightReturn,
            (None, _) if self.corner_opened(board, Flank::Left) => TurnMode::BreachLeftDetected,
            (None, _) if self.corner_opened(board, Flank::Right) => TurnMode::BreachRightDetected,
            (None, _) => TurnMode::SteadyState,
        }
    }

    fn corner_opened<B: Board + ?Sized>(&self, board: &B, flank: Flank) -> bool {
        let filter = UnitFilter::any()
            .columns(flank.corner_columns())
            .rows(FRONT_ROW..=FRONT_ROW);
        self.scanner.count(board, &filter) == BREACH_SIGNAL_UNITS
    }

    fn early_game<B: Board + ?Sized>(&mut self, board: &mut B, turn: u32) {
        let depth = self.state.line.recompute(
            board,
            &self.scanner,
            self.config.line_unit_threshold,
        );
        let _ = self.lifecycle.teardown(board, &mut self.state.line);

        if depth.is_active() {
            self.line_turn(board, depth, turn);
        } else {
            self.opening_turn(board, turn);
        }
    }

    fn line_turn<B: Board + ?Sized>(&mut self, board: &mut B, depth: LineDepth, turn: u32) {
        defence::line_defence(board, depth, self.state.line.may_rebuild(turn));
        let candidates = catalog::launches(catalog::LINE_LAUNCHES);
        match attack::plan(board, &self.estimator, &self.config, candidates) {
            Ok(decision) => attack::execute(board, &decision),
            Err(error) => warn!(%error, "skipping line attack"),
        }
    }

    fn opening_turn<B: Board + ?Sized>(&mut self, board: &mut B, turn: u32) {
        if std::mem::take(&mut self.state.ready_to_fire) {
            self.opportunistic_attack(board);
        }
        self.state.ready_to_fire = defence::opening_defence(board, turn);
    }

    /// Fires through the lanes opened last turn, before the opening layout
    /// spends the structure currency the support buff needs.
    fn opportunistic_attack<B: Board + ?Sized>(&self, board: &mut B) {
        let candidates = catalog::launches(catalog::LANE_LAUNCHES);
        match attack::plan(board, &self.estimator, &self.config, candidates) {
            Ok(decision) => {
                let sealed = catalog::lane_seal(decision.side.launch);
                board.request_build(UnitKind::Wall, vec![sealed], 1);
                attack::execute(board, &decision);
            }
            Err(error) => warn!(%error, "skipping opportunistic attack"),
        }
    }

    fn follow_up<B: Board + ?Sized>(&mut self, board: &mut B, flank: Flank) {
        if let Err(error) = attack::counter_attack(board, &self.estimator, &self.config, flank) {
            warn!(%error, ?flank, "counter-attack aborted");
        }
        defence::hold_flank(board, flank.opposite());
        self.state.just_attacked = true;
    }

    fn open_corner<B: Board + ?Sized>(&mut self, board: &mut B, flank: Flank) {
        info!(?flank, "opponent opened a corner");
        defence::open_corner(board, flank);
        defence::hold_flank(board, flank.opposite());
        self.state.breached = Some(flank);
    }
}
