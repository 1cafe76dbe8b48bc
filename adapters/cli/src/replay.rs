//! Drives the strategist against an in-memory board, turn after turn.

use std::io::Write;

use anyhow::{Context, Result};
use line_defence_core::{Board, Event, Player, ResourceKind};
use line_defence_system_orchestrator::Strategist;
use line_defence_world::World;
use tracing::info;

/// Runs `turns` turns and writes every turn's events to `out`.
pub(crate) fn run<W: Write>(
    world: &mut World,
    strategist: &mut Strategist,
    turns: u32,
    out: &mut W,
) -> Result<()> {
    for _ in 0..turns {
        let turn = world.turn_number();
        let mode = strategist.on_turn(world);
        let line = strategist.state().line().current();
        info!(turn, ?mode, ?line, "turn complete");

        writeln!(out, "turn {turn}: {mode:?}, line {}", line.row())
            .context("failed to write replay output")?;
        for event in world.drain_events() {
            writeln!(out, "  {}", describe(&event)).context("failed to write replay output")?;
        }
        writeln!(
            out,
            "  remaining: {:.1} SP, {:.1} MP",
            resource(world, ResourceKind::Structure),
            resource(world, ResourceKind::Mobile)
        )
        .context("failed to write replay output")?;

        world.end_turn();
    }
    Ok(())
}

fn resource(world: &World, kind: ResourceKind) -> f32 {
    world.resource(kind, Player::Me)
}

/// One-line description of a board event.
pub(crate) fn describe(event: &Event) -> String {
    match event {
        Event::Built { kind, cell } => format!("built {kind:?} at ({}, {})", cell.x(), cell.y()),
        Event::Deployed { kind, cell, count } => {
            format!("deployed {count} {kind:?} at ({}, {})", cell.x(), cell.y())
        }
        Event::RemovalScheduled { kind, cell } => {
            format!("removing {kind:?} at ({}, {})", cell.x(), cell.y())
        }
        Event::Upgraded { kind, cell } => {
            format!("upgraded {kind:?} at ({}, {})", cell.x(), cell.y())
        }
        Event::BuildRejected { kind, cell, reason } => format!(
            "rejected {kind:?} at ({}, {}): {reason:?}",
            cell.x(),
            cell.y()
        ),
        Event::RemovalRejected { cell, reason } => {
            format!("rejected removal at ({}, {}): {reason:?}", cell.x(), cell.y())
        }
        Event::UpgradeRejected { cell, reason } => {
            format!("rejected upgrade at ({}, {}): {reason:?}", cell.x(), cell.y())
        }
    }
}
