//! Reads unit statistics from the game's own JSON configuration.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use line_defence_core::{UnitCatalog, UnitKind, UnitStats, UpgradeStats};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GameConfig {
    unit_information: Vec<UnitInformation>,
}

/// Fields of a `unitInformation` entry. Absent fields keep the default value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UnitInformation {
    cost1: Option<f32>,
    cost2: Option<f32>,
    start_health: Option<f32>,
    attack_range: Option<f32>,
    attack_damage_tower: Option<f32>,
    attack_damage_walker: Option<f32>,
    speed: Option<f32>,
    upgrade: Option<UpgradeInformation>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpgradeInformation {
    cost1: Option<f32>,
    start_health: Option<f32>,
    attack_range: Option<f32>,
    attack_damage_tower: Option<f32>,
    attack_damage_walker: Option<f32>,
}

/// Loads a capability table from a game configuration file.
pub(crate) fn load_catalog(path: &Path) -> Result<UnitCatalog> {
    let payload = fs::read_to_string(path)
        .with_context(|| format!("failed to read game config {}", path.display()))?;
    parse_catalog(&payload).with_context(|| format!("invalid game config {}", path.display()))
}

/// Builds a capability table from the JSON text of a game configuration.
///
/// Entries 0 through 5 of `unitInformation` describe, in order, the wall,
/// support, turret, scout, demolisher and interceptor.
pub(crate) fn parse_catalog(payload: &str) -> Result<UnitCatalog> {
    let config: GameConfig =
        serde_json::from_str(payload).context("failed to parse game config JSON")?;
    if config.unit_information.len() < UnitKind::ALL.len() {
        bail!(
            "unitInformation lists {} units, expected at least {}",
            config.unit_information.len(),
            UnitKind::ALL.len()
        );
    }

    let mut catalog = UnitCatalog::default();
    for (kind, info) in UnitKind::ALL.into_iter().zip(&config.unit_information) {
        let merged = merge(kind, *catalog.stats(kind), info)
            .with_context(|| format!("invalid entry for {kind:?}"))?;
        catalog.set(kind, merged);
    }
    Ok(catalog)
}

fn merge(kind: UnitKind, mut stats: UnitStats, info: &UnitInformation) -> Result<UnitStats> {
    // structures hit mobile units, mobile units hit structures
    let damage = if kind.is_stationary() {
        info.attack_damage_walker
    } else {
        info.attack_damage_tower
    };

    stats.cost.structure = info.cost1.unwrap_or(stats.cost.structure);
    stats.cost.mobile = info.cost2.unwrap_or(stats.cost.mobile);
    stats.health = info.start_health.unwrap_or(stats.health);
    stats.attack_range = info.attack_range.unwrap_or(stats.attack_range);
    stats.damage = damage.unwrap_or(stats.damage);

    if let Some(speed) = info.speed {
        if speed <= 0.0 && !kind.is_stationary() {
            bail!("mobile unit speed must be positive, got {speed}");
        }
        if speed > 0.0 {
            stats.ticks_per_cell = speed.recip();
        }
    }

    if let Some(upgrade) = &info.upgrade {
        let base = stats.upgrade.unwrap_or(UpgradeStats {
            cost: stats.cost.structure,
            health: stats.health,
            attack_range: stats.attack_range,
            damage: stats.damage,
        });
        let upgraded_damage = if kind.is_stationary() {
            upgrade.attack_damage_walker
        } else {
            upgrade.attack_damage_tower
        };
        stats.upgrade = Some(UpgradeStats {
            cost: upgrade.cost1.unwrap_or(base.cost),
            health: upgrade.start_health.unwrap_or(base.health),
            attack_range: upgrade.attack_range.unwrap_or(base.attack_range),
            damage: upgraded_damage.unwrap_or(base.damage),
        });
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(turret: &str) -> String {
        format!(
            r#"{{"unitInformation": [
                {{"shorthand": "FF", "cost1": 1.0}},
                {{"shorthand": "EF", "cost1": 4.0}},
                {turret},
                {{"shorthand": "PI", "cost2": 1.0, "speed": 1.0}},
                {{"shorthand": "EI", "cost2": 3.0, "speed": 0.5, "attackDamageTower": 9.0}},
                {{"shorthand": "SI", "cost2": 1.0, "speed": 0.25}}
            ]}}"#
        )
    }

    #[test]
    fn present_fields_override_defaults() {
        let payload = entries(
            r#"{"shorthand": "DF", "cost1": 3.0, "attackDamageWalker": 7.0,
                "upgrade": {"attackRange": 4.0, "attackDamageWalker": 18.0}}"#,
        );
        let catalog = parse_catalog(&payload).expect("valid config");

        let turret = catalog.stats(UnitKind::Turret);
        assert!((turret.cost.structure - 3.0).abs() < f32::EPSILON);
        assert!((turret.damage - 7.0).abs() < f32::EPSILON);
        assert!((turret.attack_range - 2.5).abs() < f32::EPSILON, "range kept");
        let upgrade = turret.upgrade.expect("turret upgrades");
        assert!((upgrade.attack_range - 4.0).abs() < f32::EPSILON);
        assert!((upgrade.damage - 18.0).abs() < f32::EPSILON);
        assert!((upgrade.cost - 4.0).abs() < f32::EPSILON, "upgrade cost kept");

        let demolisher = catalog.stats(UnitKind::Demolisher);
        assert!((demolisher.damage - 9.0).abs() < f32::EPSILON);
        assert!((demolisher.ticks_per_cell - 2.0).abs() < f32::EPSILON);
        assert!((catalog.stats(UnitKind::Interceptor).ticks_per_cell - 4.0).abs() < f32::EPSILON);
    }

    #[test]
    fn short_unit_lists_are_rejected() {
        let error = parse_catalog(r#"{"unitInformation": [{"cost1": 1.0}]}"#)
            .expect_err("too few units");
        assert!(error.to_string().contains("expected at least 6"));
    }

    #[test]
    fn non_positive_mobile_speed_is_rejected() {
        let payload = entries(r#"{"shorthand": "DF"}"#).replace("\"speed\": 1.0", "\"speed\": 0.0");
        assert!(parse_catalog(&payload).is_err());
    }
}
