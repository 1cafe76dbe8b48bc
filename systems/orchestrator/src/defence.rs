//! Structure layouts laid each turn.

use line_defence_core::{cells, Board, Cell, UnitKind};
use line_defence_system_line_state::{turret_row, wall_row, LineDepth};

use crate::catalog::{self, line, opening, steady};
use crate::Flank;

/// First and last opportunistic attack rounds, and the spacing between them.
const ATTACK_ROUNDS_START: u32 = 6;
const ATTACK_ROUNDS_END: u32 = 99;
const ATTACK_ROUNDS_STEP: u32 = 3;

const OPENING_INTERCEPTOR_TURNS: u32 = 10;

/// Reports whether the opportunistic attack fires on `turn`.
pub(crate) fn is_attack_round(turn: u32) -> bool {
    (ATTACK_ROUNDS_START..=ATTACK_ROUNDS_END).contains(&turn)
        && (turn - ATTACK_ROUNDS_START) % ATTACK_ROUNDS_STEP == 0
}

/// Lays the opening layout. Returns whether the lanes were opened for an
/// attack on the following turn.
pub(crate) fn opening_defence<B: Board + ?Sized>(board: &mut B, turn: u32) -> bool {
    if turn < OPENING_INTERCEPTOR_TURNS && turn != 6 && turn != 9 {
        board.request_build(UnitKind::Interceptor, cells(opening::INTERCEPTOR_LAUNCHES), 1);
    }

    let lanes = cells(opening::LANE_WALLS);
    let arming = is_attack_round(turn.saturating_add(1));
    let attacking = is_attack_round(turn);
    if !arming && !attacking {
        board.request_build(UnitKind::Wall, lanes.clone(), 1);
    }

    board.request_build(UnitKind::Turret, cells(opening::TURRETS), 1);
    board.request_build(UnitKind::Wall, cells(opening::WALLS), 1);
    if attacking {
        board.request_build(UnitKind::Wall, cells(opening::ATTACK_ROUND_WALLS), 1);
    }
    board.request_upgrade(cells(opening::UPGRADES));
    board.request_upgrade(cells(opening::TURRETS));
    board.request_upgrade(cells(opening::WALLS));
    board.request_upgrade(cells(opening::EXTRA_TURRETS));

    if arming {
        board.request_remove(lanes);
    }
    arming
}

/// Lays the reinforced line at `depth` with its flanks.
///
/// The line's own wall and turret rows are skipped while `may_rebuild` is
/// false; flank walls and corner turrets are always placed.
pub(crate) fn line_defence<B: Board + ?Sized>(board: &mut B, depth: LineDepth, may_rebuild: bool) {
    if !depth.is_active() {
        return;
    }
    let (walls, turrets) = if may_rebuild {
        (wall_row(depth), turret_row(depth))
    } else {
        (Vec::new(), Vec::new())
    };
    let (front_turrets, back_turrets) = turrets.split_at(turrets.len().min(3));
    let at = |index: usize| turrets.get(index).copied().into_iter();

    board.request_build(UnitKind::Wall, cells(line::FLANK_WALLS), 1);
    board.request_build(UnitKind::Wall, walls.clone(), 1);

    let mut corner_and_front = cells(line::CORNER_TURRETS);
    corner_and_front.extend_from_slice(front_turrets);
    board.request_build(UnitKind::Turret, corner_and_front, 1);

    board.request_upgrade(cells(line::CORNER_UPGRADES).into_iter().chain(at(0)).collect());
    board.request_build(UnitKind::Turret, at(3).collect(), 1);
    board.request_upgrade(at(2).collect());
    board.request_build(UnitKind::Turret, at(4).collect(), 1);
    board.request_build(UnitKind::Wall, cells(line::LANE_WALLS), 1);

    board.request_upgrade(
        at(1)
            .chain(cells(line::CORNER_TURRETS))
            .chain(back_turrets.iter().copied())
            .collect(),
    );

    let wall_upgrades: Vec<Cell> = walls.first().map_or_else(Vec::new, |start| {
        line::WALL_UPGRADE_OFFSETS
            .iter()
            .map(|offset| Cell::new(start.x() + offset, start.y()))
            .chain(walls.last().copied())
            .collect()
    });
    board.request_upgrade(
        wall_upgrades
            .into_iter()
            .chain(cells(line::FLANK_UPGRADES))
            .collect(),
    );

    board.request_build(UnitKind::Turret, cells(line::INNER_TURRETS), 1);
    board.request_upgrade(cells(line::INNER_TURRETS));
}

/// Walls, turrets and upgrades of a steady-state or flank-holding defence.
struct DefenceLayout {
    walls: Vec<Cell>,
    vital_walls: Vec<Cell>,
    extra_turrets: Vec<Cell>,
    spare_walls: Vec<Cell>,
    late_upgrades: Vec<Cell>,
}

impl DefenceLayout {
    fn steady() -> Self {
        Self {
            walls: catalog::joined(&[
                steady::VITAL_WALLS_LEFT,
                steady::VITAL_WALLS_RIGHT,
                steady::VITAL_WALLS_CORE,
                steady::FUNNEL_WALLS_LEFT,
                steady::FUNNEL_WALLS_RIGHT,
                steady::FUNNEL_WALLS_CORE,
            ]),
            vital_walls: catalog::joined(&[
                steady::VITAL_WALLS_LEFT,
                steady::VITAL_WALLS_RIGHT,
                steady::VITAL_WALLS_CORE,
            ]),
            extra_turrets: vec![Cell::new(2, 11), Cell::new(25, 11)],
            spare_walls: cells(opening::LANE_WALLS),
            late_upgrades: catalog::joined(&[
                opening::LANE_WALLS,
                steady::FUNNEL_WALLS_LEFT,
                steady::FUNNEL_WALLS_RIGHT,
                steady::FUNNEL_WALLS_CORE,
            ]),
        }
    }

    /// Defence that keeps `held` sealed while the other corner stays open.
    fn holding(held: Flank) -> Self {
        let (vital, funnel) = match held {
            Flank::Left => (steady::VITAL_WALLS_LEFT, steady::FUNNEL_WALLS_LEFT),
            Flank::Right => (steady::VITAL_WALLS_RIGHT, steady::FUNNEL_WALLS_RIGHT),
        };
        let (extra_turret, spare_walls) = match held {
            Flank::Left => (Cell::new(2, 11), Vec::new()),
            Flank::Right => (Cell::new(25, 11), vec![Cell::new(24, 11)]),
        };
        Self {
            walls: catalog::joined(&[vital, steady::VITAL_WALLS_CORE, funnel, steady::FUNNEL_WALLS_CORE]),
            vital_walls: catalog::joined(&[vital, steady::VITAL_WALLS_CORE]),
            extra_turrets: vec![extra_turret],
            spare_walls,
            late_upgrades: Vec::new(),
        }
    }

    fn lay<B: Board + ?Sized>(self, board: &mut B) {
        let turrets = cells(steady::TURRETS);
        let extra_walls = cells(steady::EXTRA_WALLS);

        board.request_build(UnitKind::Turret, turrets.clone(), 1);
        board.request_build(UnitKind::Wall, self.walls, 1);
        board.request_build(UnitKind::Turret, self.extra_turrets.clone(), 1);
        board.request_build(UnitKind::Wall, extra_walls.clone(), 1);
        board.request_build(UnitKind::Wall, self.spare_walls, 1);
        board.request_upgrade(self.extra_turrets);
        board.request_upgrade(self.vital_walls);
        board.request_upgrade(turrets);
        board.request_upgrade(extra_walls);
        board.request_upgrade(self.late_upgrades);
    }
}

/// Full-width defence. Reclaims the counter-attack walls first.
pub(crate) fn steady_defence<B: Board + ?Sized>(board: &mut B) {
    board.request_remove(cells(steady::ASSAULT_WALLS));
    DefenceLayout::steady().lay(board);
}

/// Defence that seals `held` while the opposite corner is open.
pub(crate) fn hold_flank<B: Board + ?Sized>(board: &mut B, held: Flank) {
    DefenceLayout::holding(held).lay(board);
}

/// Opens our corner on `flank` so the opponent's units are drawn into it.
pub(crate) fn open_corner<B: Board + ?Sized>(board: &mut B, flank: Flank) {
    let corner: &[(i32, i32)] = match flank {
        Flank::Left => &[(0, 13), (1, 13), (1, 12), (2, 12), (2, 11), (3, 11)],
        Flank::Right => &[(25, 11), (26, 13), (25, 12), (26, 12), (27, 13), (24, 11)],
    };
    board.request_remove(cells(corner));
}
