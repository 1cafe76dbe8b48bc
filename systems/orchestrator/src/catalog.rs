//! Fixed build locations used by the defence and attack routines.
//!
//! Coordinates are listed in build order; earlier entries are funded first
//! when structure currency runs short.

use line_defence_core::{cells, Cell, HALF_ARENA};

use crate::Flank;

pub(crate) type Coords = &'static [(i32, i32)];

/// Static layout laid while no reinforced line is active.
pub(crate) mod opening {
    use super::Coords;

    pub(crate) const TURRETS: Coords = &[
        (2, 13),
        (2, 12),
        (25, 12),
        (5, 10),
        (6, 10),
        (10, 9),
        (14, 10),
        (17, 9),
        (1, 12),
        (25, 13),
        (26, 12),
        (21, 10),
        (22, 10),
    ];

    pub(crate) const WALLS: Coords = &[
        (0, 13),
        (1, 13),
        (3, 13),
        (4, 10),
        (27, 13),
        (26, 13),
        (24, 13),
        (7, 10),
        (10, 10),
        (13, 10),
        (15, 10),
        (17, 10),
        (8, 9),
        (9, 10),
        (11, 10),
        (12, 10),
        (16, 10),
        (18, 10),
        (23, 10),
        (24, 12),
        (7, 9),
        (19, 9),
        (18, 10),
        (20, 10),
        (9, 9),
        (18, 9),
        (21, 11),
        (6, 11),
        (3, 12),
    ];

    pub(crate) const UPGRADES: Coords = &[
        (3, 13),
        (24, 13),
        (6, 10),
        (14, 10),
        (21, 10),
        (7, 10),
        (8, 9),
        (9, 10),
        (19, 9),
        (18, 10),
        (7, 9),
        (9, 9),
        (18, 9),
        (0, 13),
        (1, 13),
        (26, 13),
        (27, 13),
        (10, 9),
        (10, 10),
        (20, 9),
        (2, 13),
        (25, 13),
        (17, 10),
        (5, 10),
    ];

    pub(crate) const EXTRA_TURRETS: Coords = &[(12, 9), (16, 9)];

    /// Wall laid in front of the left corner on attack rounds.
    pub(crate) const ATTACK_ROUND_WALLS: Coords = &[(4, 13)];

    /// Walls that close the two attack lanes.
    pub(crate) const LANE_WALLS: Coords = &[(3, 11), (24, 11)];

    pub(crate) const INTERCEPTOR_LAUNCHES: Coords = &[(5, 8), (22, 8)];
}

/// Structures laid around a reinforced line.
pub(crate) mod line {
    use super::Coords;

    pub(crate) const FLANK_WALLS: Coords = &[
        (0, 13),
        (27, 13),
        (26, 13),
        (1, 13),
        (2, 13),
        (25, 13),
        (3, 12),
        (24, 12),
        (4, 11),
        (23, 11),
    ];

    pub(crate) const CORNER_TURRETS: Coords = &[(2, 12), (25, 12)];

    pub(crate) const CORNER_UPGRADES: Coords = &[(1, 13), (26, 13)];

    pub(crate) const LANE_WALLS: Coords = &[(5, 10), (22, 10)];

    pub(crate) const FLANK_UPGRADES: Coords = &[
        (0, 13),
        (27, 13),
        (2, 13),
        (25, 13),
        (3, 12),
        (24, 12),
        (4, 11),
    ];

    pub(crate) const INNER_TURRETS: Coords = &[(1, 12), (2, 11)];

    /// Offsets from the start of the wall row that receive upgrades.
    pub(crate) const WALL_UPGRADE_OFFSETS: [i32; 5] = [0, 1, 5, 10, 14];
}

/// Full-width defence used outside the early game.
pub(crate) mod steady {
    use super::Coords;

    pub(crate) const TURRETS: Coords = &[(11, 5), (16, 5)];

    pub(crate) const VITAL_WALLS_LEFT: Coords = &[(0, 13)];

    pub(crate) const VITAL_WALLS_RIGHT: Coords = &[(27, 13)];

    pub(crate) const VITAL_WALLS_CORE: Coords = &[(13, 4), (14, 4), (12, 5), (15, 5)];

    pub(crate) const FUNNEL_WALLS_LEFT: Coords = &[(1, 12), (2, 12)];

    pub(crate) const FUNNEL_WALLS_RIGHT: Coords = &[(26, 12), (25, 12)];

    pub(crate) const FUNNEL_WALLS_CORE: Coords = &[
        (3, 12),
        (24, 12),
        (4, 11),
        (5, 10),
        (6, 9),
        (7, 8),
        (8, 7),
        (9, 6),
        (10, 6),
        (17, 6),
        (18, 6),
        (19, 7),
        (20, 8),
        (21, 9),
        (22, 10),
        (23, 11),
    ];

    pub(crate) const EXTRA_WALLS: Coords = &[(11, 6), (16, 6)];

    pub(crate) const ASSAULT_WALLS: Coords = &[(25, 13), (2, 13)];
}

/// Supports built and reclaimed in the same turn to buff a launch.
pub(crate) const LEFT_SUPPORTS: Coords = &[
    (4, 9),
    (2, 11),
    (5, 9),
    (5, 8),
    (6, 9),
    (6, 8),
    (7, 8),
    (8, 8),
    (6, 7),
    (7, 7),
    (8, 7),
];

/// Launch cells compared by the opportunistic attack.
pub(crate) const LANE_LAUNCHES: [(i32, i32); 2] = [(3, 10), (24, 10)];

/// Launch cells compared by the line attack.
pub(crate) const LINE_LAUNCHES: [(i32, i32); 2] = [(5, 8), (22, 8)];

/// Left lane wall; an opportunistic attack seals the lane opposite its launch.
const LEFT_LANE_SEAL: Cell = Cell::new(3, 11);

/// Cells used by a counter-attack through an opened opponent corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct CounterCells {
    /// Wall closing our own corner behind the escorts.
    pub(crate) wall: Cell,
    pub(crate) escort_launch: Cell,
    /// Opponent corner structure the escorts have to break.
    pub(crate) corner: Cell,
    pub(crate) scout_launch: Cell,
}

impl CounterCells {
    const fn mirrored(self) -> Self {
        Self {
            wall: self.wall.mirrored(),
            escort_launch: self.escort_launch.mirrored(),
            corner: self.corner.mirrored(),
            scout_launch: self.scout_launch.mirrored(),
        }
    }
}

const LEFT_COUNTER: CounterCells = CounterCells {
    wall: Cell::new(2, 13),
    escort_launch: Cell::new(3, 10),
    corner: Cell::new(0, 14),
    scout_launch: Cell::new(14, 0),
};

/// Counter-attack cells for the opened `flank`.
pub(crate) fn counter_cells(flank: Flank) -> CounterCells {
    match flank {
        Flank::Left => LEFT_COUNTER,
        Flank::Right => LEFT_COUNTER.mirrored(),
    }
}

/// Lane wall closed while the attack leaves from `launch`.
pub(crate) fn lane_seal(launch: Cell) -> Cell {
    if on_left(launch) {
        LEFT_LANE_SEAL.mirrored()
    } else {
        LEFT_LANE_SEAL
    }
}

/// Converts a pair of launch coordinates into cells.
pub(crate) fn launches(pair: [(i32, i32); 2]) -> [Cell; 2] {
    pair.map(Cell::from)
}

/// Concatenates coordinate tables into a single cell list.
pub(crate) fn joined(tables: &[Coords]) -> Vec<Cell> {
    tables.iter().flat_map(|table| cells(table)).collect()
}

/// Support cells on the launch cell's flank.
pub(crate) fn supports_for(launch: Cell) -> Vec<Cell> {
    let left = cells(LEFT_SUPPORTS);
    if on_left(launch) {
        left
    } else {
        left.into_iter().map(Cell::mirrored).collect()
    }
}

fn on_left(cell: Cell) -> bool {
    cell.x() < HALF_ARENA
}
