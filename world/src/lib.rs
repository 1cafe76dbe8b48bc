#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative in-memory board snapshot for Line Defence.
//!
//! The [`World`] stands in for the game engine's board: it answers the
//! [`Board`] queries the decision systems rely on and applies their intents on
//! a best-effort basis, recording every outcome as an [`Event`]. Removals are
//! deferred until [`World::end_turn`], mirroring the engine, so a structure
//! marked for removal still occupies its cell for the rest of the turn.

mod navigation;
mod scenario;

use std::collections::{BTreeMap, BTreeSet};

use line_defence_core::{
    Board, Cell, Event, Intent, MobileUnit, Player, Rejection, ResourceKind, StationaryUnit,
    UnitCatalog, UnitKind,
};
use tracing::trace;

pub use scenario::{Scenario, ScenarioError, ScenarioResources, ScenarioUnit};

const STARTING_STRUCTURE: f32 = 40.0;
const STARTING_MOBILE: f32 = 5.0;
const STRUCTURE_INCOME: f32 = 5.0;
const MOBILE_INCOME: f32 = 5.0;

/// Mobile units queued for launch from a single cell this turn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Deployment {
    /// Launch cell.
    pub cell: Cell,
    /// Unit template shared by every member of the group.
    pub unit: MobileUnit,
    /// Number of units launched.
    pub count: u32,
}

/// Represents the authoritative board state for a single turn.
#[derive(Debug)]
pub struct World {
    turn: u32,
    catalog: UnitCatalog,
    cells: Vec<Cell>,
    structures: BTreeMap<Cell, StationaryUnit>,
    pending_removals: BTreeSet<Cell>,
    resources: [[f32; 2]; 2],
    deployments: Vec<Deployment>,
    events: Vec<Event>,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Creates an empty board using the default capability table.
    #[must_use]
    pub fn new() -> Self {
        Self::with_catalog(UnitCatalog::default())
    }

    /// Creates an empty board using the provided capability table.
    #[must_use]
    pub fn with_catalog(catalog: UnitCatalog) -> Self {
        Self {
            turn: 0,
            catalog,
            cells: navigation::arena_cells().collect(),
            structures: BTreeMap::new(),
            pending_removals: BTreeSet::new(),
            resources: [[STARTING_STRUCTURE, STARTING_MOBILE]; 2],
            deployments: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Overrides the current turn number.
    pub fn set_turn(&mut self, turn: u32) {
        self.turn = turn;
    }

    /// Overrides a currency balance. Negative amounts are clamped to zero.
    pub fn set_resource(&mut self, kind: ResourceKind, player: Player, amount: f32) {
        *self.pool_mut(kind, player) = amount.max(0.0);
    }

    /// Places a structure directly, bypassing costs and side restrictions.
    ///
    /// Intended for seeding snapshots; the decision systems go through
    /// [`Board::submit`] instead.
    pub fn place(&mut self, cell: Cell, unit: StationaryUnit) -> Result<(), Rejection> {
        if !cell.in_arena() {
            return Err(Rejection::OutOfArena);
        }
        if self.structures.contains_key(&cell) {
            return Err(Rejection::Occupied);
        }
        let _ = self.structures.insert(cell, unit);
        Ok(())
    }

    /// Places a freshly built structure of `kind` owned by `owner`.
    pub fn place_kind(
        &mut self,
        cell: Cell,
        kind: UnitKind,
        owner: Player,
    ) -> Result<(), Rejection> {
        let unit = self
            .catalog
            .stationary(kind, owner)
            .ok_or(Rejection::NotStationary)?;
        self.place(cell, unit)
    }

    /// Lowers the health of the structure on `cell`, if any.
    pub fn damage(&mut self, cell: Cell, amount: f32) {
        if let Some(unit) = self.structures.get_mut(&cell) {
            unit.health = (unit.health - amount).max(0.0);
        }
    }

    /// Closes the turn: executes deferred removals, clears launched units,
    /// pays income and advances the turn counter.
    pub fn end_turn(&mut self) {
        for cell in std::mem::take(&mut self.pending_removals) {
            let _ = self.structures.remove(&cell);
        }
        self.deployments.clear();
        for player in [Player::Me, Player::Opponent] {
            *self.pool_mut(ResourceKind::Structure, player) += STRUCTURE_INCOME;
            *self.pool_mut(ResourceKind::Mobile, player) += MOBILE_INCOME;
        }
        self.turn = self.turn.saturating_add(1);
    }

    /// Removes and returns every event recorded so far.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    fn pool(&self, kind: ResourceKind, player: Player) -> f32 {
        self.resources[usize::from(player.index())][pool_index(kind)]
    }

    fn pool_mut(&mut self, kind: ResourceKind, player: Player) -> &mut f32 {
        &mut self.resources[usize::from(player.index())][pool_index(kind)]
    }

    fn is_blocked(&self, cell: Cell) -> bool {
        self.structures.contains_key(&cell)
    }

    fn build(&mut self, kind: UnitKind, cell: Cell, count: u32) {
        let outcome = if kind.is_stationary() {
            self.build_structure(kind, cell)
        } else {
            self.deploy(kind, cell, count)
        };
        match outcome {
            Ok(Some(event)) => self.events.push(event),
            Ok(None) => {}
            Err(reason) => {
                trace!(?kind, ?cell, ?reason, "build rejected");
                self.events.push(Event::BuildRejected { kind, cell, reason });
            }
        }
    }

    fn build_structure(&mut self, kind: UnitKind, cell: Cell) -> Result<Option<Event>, Rejection> {
        check_friendly_cell(cell)?;
        if self.is_blocked(cell) {
            return Err(Rejection::Occupied);
        }
        let cost = self.catalog.stats(kind).cost.structure;
        if self.pool(ResourceKind::Structure, Player::Me) < cost {
            return Err(Rejection::InsufficientResources);
        }
        let unit = self
            .catalog
            .stationary(kind, Player::Me)
            .ok_or(Rejection::NotStationary)?;
        *self.pool_mut(ResourceKind::Structure, Player::Me) -= cost;
        let _ = self.structures.insert(cell, unit);
        Ok(Some(Event::Built { kind, cell }))
    }

    fn deploy(&mut self, kind: UnitKind, cell: Cell, count: u32) -> Result<Option<Event>, Rejection> {
        if count == 0 {
            return Ok(None);
        }
        check_friendly_cell(cell)?;
        if cell.edge().is_none() || self.is_blocked(cell) {
            return Err(Rejection::NotEdge);
        }
        let cost = self.catalog.stats(kind).cost.mobile;
        let available = self.pool(ResourceKind::Mobile, Player::Me);
        let affordable = if cost > 0.0 {
            (available / cost).floor() as u32
        } else {
            count
        };
        let count = count.min(affordable);
        if count == 0 {
            return Err(Rejection::InsufficientResources);
        }
        *self.pool_mut(ResourceKind::Mobile, Player::Me) -= cost * count as f32;
        self.deployments.push(Deployment {
            cell,
            unit: MobileUnit::new(kind, Player::Me, &self.catalog),
            count,
        });
        Ok(Some(Event::Deployed { kind, cell, count }))
    }

    fn remove(&mut self, cell: Cell) {
        let outcome = match self.structures.get(&cell) {
            Some(unit) if unit.owner == Player::Me => {
                if self.pending_removals.insert(cell) {
                    Ok(Some(unit.kind))
                } else {
                    Ok(None)
                }
            }
            _ => Err(Rejection::Vacant),
        };
        match outcome {
            Ok(Some(kind)) => self.events.push(Event::RemovalScheduled { kind, cell }),
            Ok(None) => {}
            Err(reason) => self.events.push(Event::RemovalRejected { cell, reason }),
        }
    }

    fn upgrade(&mut self, cell: Cell) {
        match self.try_upgrade(cell) {
            Ok(kind) => self.events.push(Event::Upgraded { kind, cell }),
            Err(reason) => self.events.push(Event::UpgradeRejected { cell, reason }),
        }
    }

    fn try_upgrade(&mut self, cell: Cell) -> Result<UnitKind, Rejection> {
        let unit = match self.structures.get(&cell) {
            Some(unit) if unit.owner == Player::Me => *unit,
            _ => return Err(Rejection::Vacant),
        };
        if unit.upgraded {
            return Err(Rejection::AlreadyUpgraded);
        }
        let stats = *self.catalog.stats(unit.kind);
        let upgrade = stats.upgrade.ok_or(Rejection::AlreadyUpgraded)?;
        if self.pool(ResourceKind::Structure, Player::Me) < upgrade.cost {
            return Err(Rejection::InsufficientResources);
        }
        *self.pool_mut(ResourceKind::Structure, Player::Me) -= upgrade.cost;

        if let Some(slot) = self.structures.get_mut(&cell) {
            slot.health += (upgrade.health - stats.health).max(0.0);
            slot.attack_range = upgrade.attack_range;
            slot.damage_per_hit = upgrade.damage;
            slot.upgraded = true;
        }
        Ok(unit.kind)
    }
}

/// Applies an intent to the world, recording one event per processed cell.
pub fn apply(world: &mut World, intent: Intent) {
    match intent {
        Intent::Build { kind, cells, count } => {
            for cell in cells {
                world.build(kind, cell, count);
            }
        }
        Intent::Remove { cells } => {
            for cell in cells {
                world.remove(cell);
            }
        }
        Intent::Upgrade { cells } => {
            for cell in cells {
                world.upgrade(cell);
            }
        }
    }
}

impl Board for World {
    fn turn_number(&self) -> u32 {
        self.turn
    }

    fn cells(&self) -> &[Cell] {
        &self.cells
    }

    fn stationary_at(&self, cell: Cell) -> Option<&StationaryUnit> {
        self.structures.get(&cell)
    }

    fn cells_in_range(&self, cell: Cell, radius: f32) -> Vec<Cell> {
        if radius < 0.0 {
            return Vec::new();
        }
        let reach = radius.floor() as i32;
        let mut found = Vec::new();
        for y in (cell.y() - reach)..=(cell.y() + reach) {
            for x in (cell.x() - reach)..=(cell.x() + reach) {
                let candidate = Cell::new(x, y);
                if candidate.in_arena() && cell.distance(candidate) <= radius {
                    found.push(candidate);
                }
            }
        }
        found
    }

    fn path_from_edge(&self, launch: Cell) -> Vec<Cell> {
        navigation::path_to_edge(launch, |cell| self.is_blocked(cell))
    }

    fn resource(&self, kind: ResourceKind, player: Player) -> f32 {
        self.pool(kind, player)
    }

    fn catalog(&self) -> &UnitCatalog {
        &self.catalog
    }

    fn submit(&mut self, intent: Intent) {
        apply(self, intent);
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{Deployment, World};
    use line_defence_core::{Cell, Event, StationaryUnit};

    /// Events recorded since the last drain.
    #[must_use]
    pub fn events(world: &World) -> &[Event] {
        &world.events
    }

    /// Every structure on the board in coordinate order.
    pub fn structures(world: &World) -> impl Iterator<Item = (Cell, &StationaryUnit)> {
        world.structures.iter().map(|(cell, unit)| (*cell, unit))
    }

    /// Mobile units queued for launch this turn.
    #[must_use]
    pub fn deployments(world: &World) -> &[Deployment] {
        &world.deployments
    }

    /// Reports whether the structure on `cell` will be removed when the turn ends.
    #[must_use]
    pub fn removal_pending(world: &World, cell: Cell) -> bool {
        world.pending_removals.contains(&cell)
    }
}

fn pool_index(kind: ResourceKind) -> usize {
    match kind {
        ResourceKind::Structure => 0,
        ResourceKind::Mobile => 1,
    }
}

fn check_friendly_cell(cell: Cell) -> Result<(), Rejection> {
    if !cell.in_arena() {
        return Err(Rejection::OutOfArena);
    }
    if cell.side() != Player::Me {
        return Err(Rejection::WrongSide);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_charges_structure_currency() {
        let mut world = World::new();
        world.set_resource(ResourceKind::Structure, Player::Me, 3.0);

        world.request_build(
            UnitKind::Turret,
            vec![Cell::new(13, 5), Cell::new(14, 5)],
            1,
        );

        assert_eq!(
            query::events(&world),
            &[
                Event::Built {
                    kind: UnitKind::Turret,
                    cell: Cell::new(13, 5),
                },
                Event::BuildRejected {
                    kind: UnitKind::Turret,
                    cell: Cell::new(14, 5),
                    reason: Rejection::InsufficientResources,
                },
            ]
        );
        assert!((world.resource(ResourceKind::Structure, Player::Me) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn build_rejects_opponent_half_and_occupied_cells() {
        let mut world = World::new();
        world
            .place_kind(Cell::new(13, 5), UnitKind::Wall, Player::Me)
            .expect("seed wall");

        world.request_build(
            UnitKind::Wall,
            vec![Cell::new(13, 15), Cell::new(13, 5), Cell::new(0, 0)],
            1,
        );

        let reasons: Vec<Rejection> = query::events(&world)
            .iter()
            .filter_map(|event| match event {
                Event::BuildRejected { reason, .. } => Some(*reason),
                _ => None,
            })
            .collect();
        assert_eq!(
            reasons,
            vec![
                Rejection::WrongSide,
                Rejection::Occupied,
                Rejection::OutOfArena
            ]
        );
    }

    #[test]
    fn deployment_is_clamped_to_mobile_currency() {
        let mut world = World::new();
        world.set_resource(ResourceKind::Mobile, Player::Me, 7.0);

        world.request_build(UnitKind::Demolisher, vec![Cell::new(3, 10)], 10);

        let deployments = query::deployments(&world);
        assert_eq!(deployments.len(), 1);
        assert_eq!(deployments[0].count, 2);
        assert!((deployments[0].unit.ticks_per_cell - 2.0).abs() < f32::EPSILON);
        assert!((world.resource(ResourceKind::Mobile, Player::Me) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn deployment_requires_a_free_edge_cell() {
        let mut world = World::new();
        world.request_build(UnitKind::Scout, vec![Cell::new(13, 5)], 1);

        assert_eq!(
            query::events(&world),
            &[Event::BuildRejected {
                kind: UnitKind::Scout,
                cell: Cell::new(13, 5),
                reason: Rejection::NotEdge,
            }]
        );
    }

    #[test]
    fn removal_is_deferred_until_end_of_turn() {
        let mut world = World::new();
        let cell = Cell::new(10, 6);
        world
            .place_kind(cell, UnitKind::Wall, Player::Me)
            .expect("seed wall");

        world.request_remove(vec![cell]);
        assert!(query::removal_pending(&world, cell));
        assert!(world.stationary_at(cell).is_some());

        world.request_build(UnitKind::Wall, vec![cell], 1);
        assert!(matches!(
            query::events(&world).last(),
            Some(Event::BuildRejected {
                reason: Rejection::Occupied,
                ..
            })
        ));

        world.end_turn();
        assert!(world.stationary_at(cell).is_none());
        assert_eq!(world.turn_number(), 1);
    }

    #[test]
    fn removing_opponent_or_vacant_cells_is_rejected() {
        let mut world = World::new();
        world
            .place_kind(Cell::new(13, 15), UnitKind::Turret, Player::Opponent)
            .expect("seed turret");

        world.request_remove(vec![Cell::new(13, 15), Cell::new(13, 5)]);

        assert_eq!(
            query::events(&world),
            &[
                Event::RemovalRejected {
                    cell: Cell::new(13, 15),
                    reason: Rejection::Vacant,
                },
                Event::RemovalRejected {
                    cell: Cell::new(13, 5),
                    reason: Rejection::Vacant,
                },
            ]
        );
    }

    #[test]
    fn upgrade_applies_upgraded_stats_once() {
        let mut world = World::new();
        let cell = Cell::new(13, 5);
        world
            .place_kind(cell, UnitKind::Turret, Player::Me)
            .expect("seed turret");

        world.request_upgrade(vec![cell, cell]);

        let turret = world.stationary_at(cell).expect("turret present");
        assert!(turret.upgraded);
        assert!((turret.attack_range - 3.5).abs() < f32::EPSILON);
        assert!(matches!(
            query::events(&world),
            [
                Event::Upgraded { .. },
                Event::UpgradeRejected {
                    reason: Rejection::AlreadyUpgraded,
                    ..
                }
            ]
        ));
    }

    #[test]
    fn cells_in_range_is_inclusive_and_clipped_to_the_arena() {
        let world = World::new();
        let around = world.cells_in_range(Cell::new(13, 13), 1.0);
        assert_eq!(around.len(), 5);

        let corner = world.cells_in_range(Cell::new(0, 13), 1.0);
        assert!(corner.iter().all(|cell| cell.in_arena()));
        assert!(corner.contains(&Cell::new(0, 14)));
    }

    #[test]
    fn end_turn_pays_income() {
        let mut world = World::new();
        world.set_resource(ResourceKind::Mobile, Player::Opponent, 0.0);
        world.end_turn();
        assert!(
            (world.resource(ResourceKind::Mobile, Player::Opponent) - MOBILE_INCOME).abs()
                < f32::EPSILON
        );
    }

    #[test]
    fn arena_enumeration_covers_every_cell_once() {
        let world = World::new();
        let unique: BTreeSet<Cell> = world.cells().iter().copied().collect();
        assert_eq!(unique.len(), world.cells().len());
        assert_eq!(world.cells().len(), 420);
    }
}
