//! Recycling of badly damaged friendly structures.

use std::collections::BTreeMap;

use line_defence_core::{Board, Cell, Player, UnitKind};
use tracing::{debug, trace};

/// Structures removed this turn that are rebuilt at the start of the next.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RebuildLedger {
    entries: BTreeMap<Cell, UnitKind>,
}

impl RebuildLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pending rebuilds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether nothing is waiting to be rebuilt.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Kind recorded for `cell`, if any.
    #[must_use]
    pub fn get(&self, cell: Cell) -> Option<UnitKind> {
        self.entries.get(&cell).copied()
    }

    /// Records a structure to rebuild. A later record for the same cell wins.
    pub fn record(&mut self, cell: Cell, kind: UnitKind) {
        let _ = self.entries.insert(cell, kind);
    }

    /// Requests every recorded structure again and empties the ledger.
    ///
    /// Returns the number of rebuilds requested.
    pub fn flush<B: Board + ?Sized>(&mut self, board: &mut B) -> usize {
        let entries = std::mem::take(&mut self.entries);
        let flushed = entries.len();
        for (cell, kind) in entries {
            trace!(?cell, ?kind, "rebuilding structure");
            board.request_build(kind, vec![cell], 1);
        }
        if flushed > 0 {
            debug!(flushed, "flushed rebuild ledger");
        }
        flushed
    }

    /// Removes friendly structures on `cells` whose health fell below
    /// `threshold` and records them for rebuilding next turn.
    ///
    /// Returns the number of structures recycled.
    pub fn sweep<B: Board + ?Sized>(&mut self, board: &mut B, cells: &[Cell], threshold: f32) -> usize {
        let damaged: Vec<(Cell, UnitKind)> = cells
            .iter()
            .filter_map(|cell| board.stationary_at(*cell).map(|unit| (*cell, unit)))
            .filter(|(_, unit)| unit.owner == Player::Me && unit.health < threshold)
            .map(|(cell, unit)| (cell, unit.kind))
            .collect();

        for &(cell, kind) in &damaged {
            board.request_remove(vec![cell]);
            self.record(cell, kind);
        }
        if !damaged.is_empty() {
            debug!(recycled = damaged.len(), threshold, "swept damaged structures");
        }
        damaged.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_records_replace_earlier_ones() {
        let mut ledger = RebuildLedger::new();
        let cell = Cell::new(3, 12);
        ledger.record(cell, UnitKind::Wall);
        ledger.record(cell, UnitKind::Turret);

        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.get(cell), Some(UnitKind::Turret));
    }
}
