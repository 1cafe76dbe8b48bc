use line_defence_core::{Cell, Player, UnitKind};
use line_defence_system_scanner::{EnemyScanner, UnitFilter};
use line_defence_world::World;

fn seeded_world() -> World {
    let mut world = World::new();
    let opponent = [
        (Cell::new(8, 14), UnitKind::Turret),
        (Cell::new(12, 14), UnitKind::Wall),
        (Cell::new(20, 15), UnitKind::Turret),
        (Cell::new(0, 14), UnitKind::Wall),
        (Cell::new(13, 20), UnitKind::Support),
    ];
    for (cell, kind) in opponent {
        world
            .place_kind(cell, kind, Player::Opponent)
            .expect("seed opponent structure");
    }
    world
        .place_kind(Cell::new(13, 13), UnitKind::Turret, Player::Me)
        .expect("seed friendly turret");
    world
}

#[test]
fn unfiltered_count_equals_every_opponent_structure() {
    let world = seeded_world();
    assert_eq!(
        EnemyScanner::new().count(&world, &UnitFilter::any()),
        5,
        "friendly structures must never be counted"
    );
}

#[test]
fn filters_combine_kind_and_band() {
    let world = seeded_world();
    let scanner = EnemyScanner::new();

    let front_row = UnitFilter::any().columns(8..=20).rows(14..=14);
    assert_eq!(scanner.count(&world, &front_row), 2);

    let front_turrets = front_row.clone().kind(UnitKind::Turret);
    assert_eq!(scanner.count(&world, &front_turrets), 1);

    let two_rows = UnitFilter::any().columns(8..=20).rows(14..=15);
    assert_eq!(scanner.count(&world, &two_rows), 3);
}

#[test]
fn empty_board_counts_zero() {
    let world = World::new();
    assert_eq!(EnemyScanner::new().count(&world, &UnitFilter::any()), 0);
}
