#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Line Defence decision engine.
//!
//! This crate defines the vocabulary that connects the board collaborator,
//! the pure decision systems and the adapters. Systems read the turn snapshot
//! exclusively through the [`Board`] facade and respond by submitting
//! [`Intent`] values. Intents are best-effort: the board applies what it can
//! afford and reports the outcome as [`Event`] values, but the decision
//! systems never consume those outcomes within the same turn.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of cells along each axis of the arena bounding square.
pub const ARENA_SIZE: i32 = 28;

/// Number of rows owned by each player. Rows `0..HALF_ARENA` belong to
/// [`Player::Me`], the remainder to [`Player::Opponent`].
pub const HALF_ARENA: i32 = ARENA_SIZE / 2;

/// Largest attack range among turret-class units. Path scans gather
/// candidate attackers within this radius before checking individual ranges.
pub const THREAT_RADIUS: f32 = 3.5;

/// Location of a single arena cell. The coordinate pair is the identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    x: i32,
    y: i32,
}

impl Cell {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical coordinate of the cell. Row zero is the acting player's back edge.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Euclidean distance between the centres of two cells.
    #[must_use]
    pub fn distance(self, other: Cell) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }

    /// Reflects the cell across the arena's vertical centre line.
    #[must_use]
    pub const fn mirrored(self) -> Self {
        Self::new(ARENA_SIZE - 1 - self.x, self.y)
    }

    /// Reports whether the cell lies inside the diamond-shaped arena.
    #[must_use]
    pub const fn in_arena(self) -> bool {
        let (x, y) = (self.x, self.y);
        if y < 0 || y >= ARENA_SIZE {
            return false;
        }
        if y < HALF_ARENA {
            x >= HALF_ARENA - 1 - y && x <= HALF_ARENA + y
        } else {
            x >= y - HALF_ARENA && x <= ARENA_SIZE + HALF_ARENA - 1 - y
        }
    }

    /// Player whose half of the arena contains the cell.
    #[must_use]
    pub const fn side(self) -> Player {
        if self.y < HALF_ARENA {
            Player::Me
        } else {
            Player::Opponent
        }
    }

    /// Edge the cell lies on, if any.
    #[must_use]
    pub const fn edge(self) -> Option<Edge> {
        if !self.in_arena() {
            return None;
        }
        let (x, y) = (self.x, self.y);
        if y < HALF_ARENA {
            if x + y == HALF_ARENA - 1 {
                Some(Edge::BottomLeft)
            } else if x - y == HALF_ARENA {
                Some(Edge::BottomRight)
            } else {
                None
            }
        } else if y - x == HALF_ARENA {
            Some(Edge::TopLeft)
        } else if x + y == ARENA_SIZE + HALF_ARENA - 1 {
            Some(Edge::TopRight)
        } else {
            None
        }
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Converts a table of coordinate pairs into cells.
#[must_use]
pub fn cells(coordinates: &[(i32, i32)]) -> Vec<Cell> {
    coordinates.iter().copied().map(Cell::from).collect()
}

/// One of the four diagonal arena edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    /// Acting player's left edge.
    BottomLeft,
    /// Acting player's right edge.
    BottomRight,
    /// Opponent's left edge, as seen from the acting player.
    TopLeft,
    /// Opponent's right edge, as seen from the acting player.
    TopRight,
}

impl Edge {
    /// Edge a mobile unit launched from this edge travels towards.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::BottomLeft => Self::TopRight,
            Self::BottomRight => Self::TopLeft,
            Self::TopLeft => Self::BottomRight,
            Self::TopRight => Self::BottomLeft,
        }
    }

    /// Reports whether the cell lies on this edge.
    #[must_use]
    pub fn contains(self, cell: Cell) -> bool {
        cell.edge() == Some(self)
    }
}

/// Participants of a match, seen from the acting player's perspective.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    /// The player this engine decides for. Index 0.
    Me,
    /// The adversary. Index 1.
    Opponent,
}

impl Player {
    /// Numeric index used by the game protocol.
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Me => 0,
            Self::Opponent => 1,
        }
    }

    /// The other participant.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Me => Self::Opponent,
            Self::Opponent => Self::Me,
        }
    }
}

impl TryFrom<u8> for Player {
    type Error = QueryError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        match index {
            0 => Ok(Self::Me),
            1 => Ok(Self::Opponent),
            other => Err(QueryError::InvalidPlayerIndex(other)),
        }
    }
}

/// Failures raised by board-facing queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum QueryError {
    /// A player index outside `{0, 1}` was supplied.
    #[error("invalid player index {0}; expected 0 (self) or 1 (opponent)")]
    InvalidPlayerIndex(u8),
}

/// The two independently tracked currencies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Slow-accumulating currency spent on stationary units and upgrades.
    Structure,
    /// Turn-replenishing currency spent on mobile units.
    Mobile,
}

/// Closed set of unit kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UnitKind {
    /// Cheap blocking structure.
    Wall,
    /// Structure that shields friendly mobile units passing nearby.
    Support,
    /// Structure that attacks enemy mobile units in range.
    Turret,
    /// Fast, fragile mobile unit.
    Scout,
    /// Slow, long-range mobile unit that targets structures.
    Demolisher,
    /// Slow mobile unit that only targets mobile units.
    Interceptor,
}

impl UnitKind {
    /// Every unit kind in catalog order.
    pub const ALL: [UnitKind; 6] = [
        Self::Wall,
        Self::Support,
        Self::Turret,
        Self::Scout,
        Self::Demolisher,
        Self::Interceptor,
    ];

    /// Reports whether the kind occupies a cell permanently once built.
    #[must_use]
    pub const fn is_stationary(self) -> bool {
        matches!(self, Self::Wall | Self::Support | Self::Turret)
    }

    /// Position of the kind inside the game configuration's unit table.
    #[must_use]
    pub const fn catalog_index(self) -> usize {
        match self {
            Self::Wall => 0,
            Self::Support => 1,
            Self::Turret => 2,
            Self::Scout => 3,
            Self::Demolisher => 4,
            Self::Interceptor => 5,
        }
    }
}

/// Price of a unit in both currencies.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cost {
    /// Structure currency required.
    pub structure: f32,
    /// Mobile currency required.
    pub mobile: f32,
}

impl Cost {
    /// Creates a new cost descriptor.
    #[must_use]
    pub const fn new(structure: f32, mobile: f32) -> Self {
        Self { structure, mobile }
    }
}

/// Stat changes applied when a stationary unit is upgraded.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpgradeStats {
    /// Structure currency charged for the upgrade.
    pub cost: f32,
    /// Maximum health after the upgrade.
    pub health: f32,
    /// Attack range after the upgrade.
    pub attack_range: f32,
    /// Damage per hit after the upgrade.
    pub damage: f32,
}

/// Capability row for one unit kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitStats {
    /// Deployment price.
    pub cost: Cost,
    /// Starting health.
    pub health: f32,
    /// Euclidean attack range, zero for non-attacking kinds.
    pub attack_range: f32,
    /// Damage dealt per attack tick.
    pub damage: f32,
    /// Number of simulation ticks a mobile unit spends on each cell.
    pub ticks_per_cell: f32,
    /// Upgrade path for stationary kinds.
    pub upgrade: Option<UpgradeStats>,
}

/// Capability table looked up by [`UnitKind`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitCatalog {
    entries: [UnitStats; 6],
}

impl Default for UnitCatalog {
    fn default() -> Self {
        let stationary = |structure, health, attack_range, damage, upgrade| UnitStats {
            cost: Cost::new(structure, 0.0),
            health,
            attack_range,
            damage,
            ticks_per_cell: 0.0,
            upgrade: Some(upgrade),
        };
        let mobile = |mobile, health, attack_range, damage, ticks_per_cell| UnitStats {
            cost: Cost::new(0.0, mobile),
            health,
            attack_range,
            damage,
            ticks_per_cell,
            upgrade: None,
        };

        Self {
            entries: [
                stationary(
                    1.0,
                    60.0,
                    0.0,
                    0.0,
                    UpgradeStats {
                        cost: 1.0,
                        health: 120.0,
                        attack_range: 0.0,
                        damage: 0.0,
                    },
                ),
                stationary(
                    4.0,
                    1.0,
                    0.0,
                    0.0,
                    UpgradeStats {
                        cost: 4.0,
                        health: 1.0,
                        attack_range: 0.0,
                        damage: 0.0,
                    },
                ),
                stationary(
                    2.0,
                    75.0,
                    2.5,
                    6.0,
                    UpgradeStats {
                        cost: 4.0,
                        health: 75.0,
                        attack_range: THREAT_RADIUS,
                        damage: 20.0,
                    },
                ),
                mobile(1.0, 15.0, 3.5, 2.0, 1.0),
                mobile(3.0, 5.0, 4.5, 8.0, 2.0),
                mobile(1.0, 40.0, 4.5, 20.0, 4.0),
            ],
        }
    }
}

impl UnitCatalog {
    /// Returns the capability row for the provided kind.
    #[must_use]
    pub fn stats(&self, kind: UnitKind) -> &UnitStats {
        &self.entries[kind.catalog_index()]
    }

    /// Replaces the capability row for the provided kind.
    pub fn set(&mut self, kind: UnitKind, stats: UnitStats) {
        self.entries[kind.catalog_index()] = stats;
    }

    /// Builds a freshly constructed stationary unit of the provided kind.
    ///
    /// Returns `None` for mobile kinds.
    #[must_use]
    pub fn stationary(&self, kind: UnitKind, owner: Player) -> Option<StationaryUnit> {
        if !kind.is_stationary() {
            return None;
        }
        let stats = self.stats(kind);
        Some(StationaryUnit {
            kind,
            owner,
            health: stats.health,
            attack_range: stats.attack_range,
            damage_per_hit: stats.damage,
            upgraded: false,
        })
    }
}

/// Snapshot of a structure occupying a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StationaryUnit {
    /// Kind of structure.
    pub kind: UnitKind,
    /// Player that built the structure.
    pub owner: Player,
    /// Remaining health.
    pub health: f32,
    /// Euclidean attack range, zero for non-attacking structures.
    pub attack_range: f32,
    /// Damage dealt per attack tick.
    pub damage_per_hit: f32,
    /// Indicates whether the structure has been upgraded.
    pub upgraded: bool,
}

/// Mobile unit launched during the current turn.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MobileUnit {
    /// Kind of mobile unit.
    pub kind: UnitKind,
    /// Player that deployed the unit.
    pub owner: Player,
    /// Ticks spent on each cell, used to weight exposure time.
    pub ticks_per_cell: f32,
}

impl MobileUnit {
    /// Creates a mobile unit using the catalog's speed for the kind.
    #[must_use]
    pub fn new(kind: UnitKind, owner: Player, catalog: &UnitCatalog) -> Self {
        Self {
            kind,
            owner,
            ticks_per_cell: catalog.stats(kind).ticks_per_cell,
        }
    }
}

/// Best-effort requests submitted to the board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Intent {
    /// Builds a structure on each cell, or deploys `count` mobile units on each cell.
    Build {
        /// Kind of unit to create.
        kind: UnitKind,
        /// Target cells, processed in order.
        cells: Vec<Cell>,
        /// Number of mobile units per cell. Ignored for structures.
        count: u32,
    },
    /// Removes the acting player's structures from the listed cells.
    Remove {
        /// Cells to clear.
        cells: Vec<Cell>,
    },
    /// Upgrades the acting player's structures on the listed cells.
    Upgrade {
        /// Cells to upgrade, processed in order.
        cells: Vec<Cell>,
    },
}

/// Outcomes reported by the board after applying an intent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// A structure was placed.
    Built {
        /// Kind of structure placed.
        kind: UnitKind,
        /// Cell now occupied.
        cell: Cell,
    },
    /// Mobile units were queued for launch.
    Deployed {
        /// Kind of mobile unit.
        kind: UnitKind,
        /// Launch cell.
        cell: Cell,
        /// Number of units actually deployed.
        count: u32,
    },
    /// A structure was marked for removal at the end of the turn.
    RemovalScheduled {
        /// Kind of structure being removed.
        kind: UnitKind,
        /// Cell that will be cleared.
        cell: Cell,
    },
    /// A structure was upgraded.
    Upgraded {
        /// Kind of structure upgraded.
        kind: UnitKind,
        /// Cell holding the structure.
        cell: Cell,
    },
    /// A build or deployment was refused.
    BuildRejected {
        /// Kind that was requested.
        kind: UnitKind,
        /// Requested cell.
        cell: Cell,
        /// Reason for the refusal.
        reason: Rejection,
    },
    /// A removal was refused.
    RemovalRejected {
        /// Requested cell.
        cell: Cell,
        /// Reason for the refusal.
        reason: Rejection,
    },
    /// An upgrade was refused.
    UpgradeRejected {
        /// Requested cell.
        cell: Cell,
        /// Reason for the refusal.
        reason: Rejection,
    },
}

/// Reasons the board may refuse an intent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rejection {
    /// The cell lies outside the arena.
    OutOfArena,
    /// The cell lies on the opponent's half.
    WrongSide,
    /// A structure already occupies the cell.
    Occupied,
    /// Mobile units can only launch from a free edge cell.
    NotEdge,
    /// The acting player cannot afford the request.
    InsufficientResources,
    /// No friendly structure occupies the cell.
    Vacant,
    /// The structure has already been upgraded.
    AlreadyUpgraded,
    /// The requested kind cannot occupy a cell.
    NotStationary,
}

/// Read access to the turn snapshot plus the intent sink.
///
/// Implementations own the grid and both currency pools for the duration of a
/// turn. Every request is best-effort: implementations clamp or reject
/// silently and never report failures back through this trait.
pub trait Board {
    /// Zero-based index of the current turn.
    fn turn_number(&self) -> u32;

    /// Every arena cell, each exactly once. Order carries no meaning.
    fn cells(&self) -> &[Cell];

    /// Structure occupying the cell, if any.
    fn stationary_at(&self, cell: Cell) -> Option<&StationaryUnit>;

    /// Arena cells whose distance to `cell` is at most `radius`.
    fn cells_in_range(&self, cell: Cell, radius: f32) -> Vec<Cell>;

    /// Ordered cells a mobile unit launched from `launch` would visit.
    ///
    /// Empty when the launch cell cannot start a path.
    fn path_from_edge(&self, launch: Cell) -> Vec<Cell>;

    /// Current balance of a currency pool.
    fn resource(&self, kind: ResourceKind, player: Player) -> f32;

    /// Capability table in force for the match.
    fn catalog(&self) -> &UnitCatalog;

    /// Applies an intent on a best-effort basis.
    fn submit(&mut self, intent: Intent);

    /// Requests structures on, or `count` mobile units at, each cell.
    fn request_build(&mut self, kind: UnitKind, cells: Vec<Cell>, count: u32) {
        self.submit(Intent::Build { kind, cells, count });
    }

    /// Requests removal of the acting player's structures.
    fn request_remove(&mut self, cells: Vec<Cell>) {
        self.submit(Intent::Remove { cells });
    }

    /// Requests upgrades of the acting player's structures.
    fn request_upgrade(&mut self, cells: Vec<Cell>) {
        self.submit(Intent::Upgrade { cells });
    }
}
