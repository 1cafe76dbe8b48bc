#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure query that counts opponent structures matching a filter.

use std::ops::RangeInclusive;

use line_defence_core::{Board, Cell, Player, StationaryUnit, UnitKind};

/// Selection criteria applied to each structure. Unset criteria match everything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UnitFilter {
    kind: Option<UnitKind>,
    columns: Option<RangeInclusive<i32>>,
    rows: Option<RangeInclusive<i32>>,
}

impl UnitFilter {
    /// Filter that matches every structure.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Restricts matches to a single kind.
    #[must_use]
    pub fn kind(mut self, kind: UnitKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Restricts matches to cells whose `x` lies in the range.
    #[must_use]
    pub fn columns(mut self, columns: RangeInclusive<i32>) -> Self {
        self.columns = Some(columns);
        self
    }

    /// Restricts matches to cells whose `y` lies in the range.
    #[must_use]
    pub fn rows(mut self, rows: RangeInclusive<i32>) -> Self {
        self.rows = Some(rows);
        self
    }

    /// Reports whether the structure on `cell` satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, cell: Cell, unit: &StationaryUnit) -> bool {
        self.kind.map_or(true, |kind| unit.kind == kind)
            && self
                .columns
                .as_ref()
                .map_or(true, |columns| columns.contains(&cell.x()))
            && self
                .rows
                .as_ref()
                .map_or(true, |rows| rows.contains(&cell.y()))
    }
}

/// Counts opponent structures across the whole board.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnemyScanner;

impl EnemyScanner {
    /// Creates a new scanner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Number of opponent structures matching `filter`.
    #[must_use]
    pub fn count<B: Board + ?Sized>(&self, board: &B, filter: &UnitFilter) -> usize {
        board
            .cells()
            .iter()
            .filter_map(|cell| board.stationary_at(*cell).map(|unit| (*cell, unit)))
            .filter(|(cell, unit)| unit.owner == Player::Opponent && filter.matches(*cell, unit))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use line_defence_core::UnitCatalog;

    fn unit(kind: UnitKind) -> StationaryUnit {
        UnitCatalog::default()
            .stationary(kind, Player::Opponent)
            .expect("stationary kind")
    }

    #[test]
    fn unset_filter_matches_everything() {
        let filter = UnitFilter::any();
        assert!(filter.matches(Cell::new(0, 14), &unit(UnitKind::Wall)));
        assert!(filter.matches(Cell::new(27, 14), &unit(UnitKind::Turret)));
    }

    #[test]
    fn each_criterion_narrows_independently() {
        let filter = UnitFilter::any()
            .kind(UnitKind::Turret)
            .columns(8..=20)
            .rows(14..=14);

        assert!(filter.matches(Cell::new(8, 14), &unit(UnitKind::Turret)));
        assert!(filter.matches(Cell::new(20, 14), &unit(UnitKind::Turret)));
        assert!(!filter.matches(Cell::new(21, 14), &unit(UnitKind::Turret)));
        assert!(!filter.matches(Cell::new(10, 15), &unit(UnitKind::Turret)));
        assert!(!filter.matches(Cell::new(10, 14), &unit(UnitKind::Wall)));
    }
}
