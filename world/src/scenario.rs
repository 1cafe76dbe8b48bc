//! Board snapshots loaded from JSON for replays and fixtures.

use line_defence_core::{Cell, Player, Rejection, ResourceKind, UnitCatalog, UnitKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::World;

/// Serialized description of a board at the start of a turn.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Turn number the snapshot was taken on.
    #[serde(default)]
    pub turn: u32,
    /// Currency balances indexed by player (self first, opponent second).
    #[serde(default)]
    pub resources: [ScenarioResources; 2],
    /// Structures present on the board.
    #[serde(default)]
    pub units: Vec<ScenarioUnit>,
}

/// Currency balances of a single player.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResources {
    /// Structure currency.
    pub structure: f32,
    /// Mobile currency.
    pub mobile: f32,
}

impl Default for ScenarioResources {
    fn default() -> Self {
        Self {
            structure: 40.0,
            mobile: 5.0,
        }
    }
}

/// A structure recorded in a scenario.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioUnit {
    /// Kind of structure.
    pub kind: UnitKind,
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
    /// Owning player.
    pub owner: Player,
    /// Remaining health. Defaults to the catalog's full health.
    #[serde(default)]
    pub health: Option<f32>,
    /// Whether the structure has been upgraded.
    #[serde(default)]
    pub upgraded: bool,
}

/// Errors raised while turning a scenario into a [`World`].
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// The payload is not valid scenario JSON.
    #[error("malformed scenario: {0}")]
    Malformed(#[from] serde_json::Error),
    /// A recorded unit could not be placed.
    #[error("cannot place {kind:?} at ({x}, {y}): {reason:?}")]
    Placement {
        /// Kind of the offending unit.
        kind: UnitKind,
        /// Horizontal coordinate of the offending unit.
        x: i32,
        /// Vertical coordinate of the offending unit.
        y: i32,
        /// Reason the placement was refused.
        reason: Rejection,
    },
}

impl Scenario {
    /// Parses a scenario from its JSON representation.
    pub fn from_json(payload: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(payload)?)
    }

    /// Builds a world reflecting the scenario.
    pub fn into_world(self, catalog: UnitCatalog) -> Result<World, ScenarioError> {
        let mut world = World::with_catalog(catalog);
        world.set_turn(self.turn);

        for (player, pools) in [Player::Me, Player::Opponent].into_iter().zip(self.resources) {
            world.set_resource(ResourceKind::Structure, player, pools.structure);
            world.set_resource(ResourceKind::Mobile, player, pools.mobile);
        }

        for recorded in self.units {
            let placement_error = |reason: Rejection| ScenarioError::Placement {
                kind: recorded.kind,
                x: recorded.x,
                y: recorded.y,
                reason,
            };
            let mut unit = world
                .catalog
                .stationary(recorded.kind, recorded.owner)
                .ok_or_else(|| placement_error(Rejection::NotStationary))?;

            if recorded.upgraded {
                if let Some(upgrade) = world.catalog.stats(recorded.kind).upgrade {
                    unit.health = upgrade.health;
                    unit.attack_range = upgrade.attack_range;
                    unit.damage_per_hit = upgrade.damage;
                    unit.upgraded = true;
                }
            }
            if let Some(health) = recorded.health {
                unit.health = health;
            }

            world
                .place(Cell::new(recorded.x, recorded.y), unit)
                .map_err(placement_error)?;
        }

        Ok(world)
    }
}
