#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Defense-line state machine and the lifecycle that tears down stale lines.
//!
//! Each early-game turn the opponent's front is scanned and the depth of our
//! internal line is re-chosen with a fixed decision tree. Once a line has
//! escalated it is sticky: the branch that fires first decides the new depth
//! and later branches are never consulted.

mod lifecycle;

use std::ops::RangeInclusive;

use line_defence_core::{Board, UnitKind};
use line_defence_system_scanner::{EnemyScanner, UnitFilter};
use tracing::debug;

pub use lifecycle::{opening_region, turret_row, wall_row, LineLifecycle, LINE_TURRET_COLUMNS};

/// Columns of the opponent's front inspected by the scanner.
pub const SCAN_COLUMNS: RangeInclusive<i32> = 8..=20;

/// Opponent row closest to the centre line.
pub const FRONT_ROW: i32 = 14;

/// Depth of the reinforced line. Ordered from inactive to deepest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LineDepth {
    /// No reinforced line is active.
    #[default]
    Inactive,
    /// Line walls sit on row 11.
    Row11,
    /// Line walls sit on row 12.
    Row12,
    /// Line walls sit on row 13.
    Row13,
}

impl LineDepth {
    /// Row the line walls occupy, or zero when inactive.
    #[must_use]
    pub const fn row(self) -> i32 {
        match self {
            Self::Inactive => 0,
            Self::Row11 => 11,
            Self::Row12 => 12,
            Self::Row13 => 13,
        }
    }

    /// Reports whether a line is present.
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Inactive)
    }
}

/// Opponent structure counts over the scanned band of the front.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrontCounts {
    /// Structures on the front row.
    pub front: usize,
    /// Structures on the front row and the row behind it.
    pub front_two: usize,
    /// Structures on the front three rows.
    pub front_three: usize,
    /// Turrets on the front row.
    pub front_turrets: usize,
    /// Turrets on the second row.
    pub second_turrets: usize,
}

impl FrontCounts {
    /// Scans the board for the counts the decision tree reads.
    #[must_use]
    pub fn scan<B: Board + ?Sized>(board: &B, scanner: &EnemyScanner) -> Self {
        let band = |rows: RangeInclusive<i32>| UnitFilter::any().columns(SCAN_COLUMNS).rows(rows);
        let turrets = |row: i32| band(row..=row).kind(UnitKind::Turret);

        Self {
            front: scanner.count(board, &band(FRONT_ROW..=FRONT_ROW)),
            front_two: scanner.count(board, &band(FRONT_ROW..=FRONT_ROW + 1)),
            front_three: scanner.count(board, &band(FRONT_ROW..=FRONT_ROW + 2)),
            front_turrets: scanner.count(board, &turrets(FRONT_ROW)),
            second_turrets: scanner.count(board, &turrets(FRONT_ROW + 1)),
        }
    }
}

/// Chooses the next line depth from the current one and the scanned front.
///
/// The first branch whose count exceeds `threshold` decides the outcome:
///
/// 1. Front row crowded: deepen to row 11, then to row 12 while the front row
///    holds no turret, then to row 13 while the second row holds no turret.
///    A turret on the front row keeps an escalated line where it is.
/// 2. Front two rows crowded: deepen to row 12, then to row 13 while the
///    second row holds no turret.
/// 3. Front three rows crowded: row 13.
/// 4. Otherwise the line stands down.
#[must_use]
pub fn next_depth(current: LineDepth, counts: &FrontCounts, threshold: usize) -> LineDepth {
    if counts.front > threshold {
        if current < LineDepth::Row11 {
            LineDepth::Row11
        } else if counts.front_turrets == 0 {
            if current < LineDepth::Row12 {
                LineDepth::Row12
            } else if counts.second_turrets == 0 {
                LineDepth::Row13
            } else {
                LineDepth::Row12
            }
        } else {
            current
        }
    } else if counts.front_two > threshold {
        if current < LineDepth::Row12 {
            LineDepth::Row12
        } else if counts.second_turrets == 0 {
            LineDepth::Row13
        } else {
            LineDepth::Row12
        }
    } else if counts.front_three > threshold {
        LineDepth::Row13
    } else {
        LineDepth::Inactive
    }
}

/// Persistent line depth together with the previous turn's depth.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LineState {
    current: LineDepth,
    previous: LineDepth,
    pending_rebuild_turn: Option<u32>,
}

impl LineState {
    /// Creates a state with no active line.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Depth chosen by the latest recompute.
    #[must_use]
    pub const fn current(&self) -> LineDepth {
        self.current
    }

    /// Depth in effect before the latest recompute.
    #[must_use]
    pub const fn previous(&self) -> LineDepth {
        self.previous
    }

    /// Reports whether the latest recompute moved the line.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.current != self.previous
    }

    /// Turn from which the torn-down line cells may be built on again.
    #[must_use]
    pub const fn pending_rebuild_turn(&self) -> Option<u32> {
        self.pending_rebuild_turn
    }

    /// Reports whether line cells may be rebuilt on `turn`.
    #[must_use]
    pub fn may_rebuild(&self, turn: u32) -> bool {
        self.pending_rebuild_turn.map_or(true, |pending| turn >= pending)
    }

    /// Re-chooses the depth from the opponent's front and returns it.
    ///
    /// The previous depth is always overwritten with the current one first,
    /// so two recomputes over an unchanged board leave `changed()` false.
    pub fn recompute<B: Board + ?Sized>(
        &mut self,
        board: &B,
        scanner: &EnemyScanner,
        threshold: usize,
    ) -> LineDepth {
        self.previous = self.current;
        let counts = FrontCounts::scan(board, scanner);
        self.current = next_depth(self.current, &counts, threshold);

        if self.changed() {
            debug!(
                from = ?self.previous,
                to = ?self.current,
                ?counts,
                "line depth changed"
            );
        }
        self.current
    }

    pub(crate) fn schedule_rebuild(&mut self, turn: u32) {
        self.pending_rebuild_turn = Some(turn);
    }
}
