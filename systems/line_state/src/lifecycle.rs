//! Geometry of the reinforced line and teardown of stale lines.

use line_defence_core::{Board, Cell, HALF_ARENA};
use tracing::debug;

use crate::{LineDepth, LineState};

/// Columns of the turrets backing a line, in build order.
pub const LINE_TURRET_COLUMNS: [i32; 5] = [6, 13, 21, 9, 18];

const LINE_END_COLUMN: i32 = 20;

/// Wall cells of the line at `depth`. Empty when no line is active.
#[must_use]
pub fn wall_row(depth: LineDepth) -> Vec<Cell> {
    if !depth.is_active() {
        return Vec::new();
    }
    let row = depth.row();
    let start = (HALF_ARENA - 1 - row) + 3;
    (start..=LINE_END_COLUMN).map(|x| Cell::new(x, row)).collect()
}

/// Turret cells two rows behind the line at `depth`.
#[must_use]
pub fn turret_row(depth: LineDepth) -> Vec<Cell> {
    if !depth.is_active() {
        return Vec::new();
    }
    let row = depth.row() - 2;
    LINE_TURRET_COLUMNS
        .iter()
        .map(|x| Cell::new(*x, row))
        .collect()
}

/// Triangle in front of the left corner that is cleared when a line is first
/// raised. The low-health sweep covers the same cells.
#[must_use]
pub fn opening_region() -> Vec<Cell> {
    (0..HALF_ARENA)
        .flat_map(|x| ((HALF_ARENA - 1 - x)..=(HALF_ARENA + x)).map(move |y| Cell::new(x, y)))
        .filter(|cell| cell.in_arena())
        .collect()
}

/// Removes structures left behind when the line moves.
#[derive(Clone, Copy, Debug, Default)]
pub struct LineLifecycle;

impl LineLifecycle {
    /// Creates a new lifecycle manager.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Issues removals for the previous line when the latest recompute moved
    /// it, and schedules the rebuild window for the following turn.
    ///
    /// Returns whether any removals were issued.
    pub fn teardown<B: Board + ?Sized>(&self, board: &mut B, state: &mut LineState) -> bool {
        if !state.changed() {
            return false;
        }

        let old = state.previous();
        if old.is_active() {
            board.request_remove(wall_row(old));
            board.request_remove(turret_row(old));
        } else {
            board.request_remove(opening_region());
        }

        let rebuild_turn = board.turn_number().saturating_add(1);
        state.schedule_rebuild(rebuild_turn);
        debug!(?old, new = ?state.current(), rebuild_turn, "tore down stale line");
        true
    }
}
