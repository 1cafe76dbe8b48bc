use line_defence_core::{Board, Cell, Event, Player, ResourceKind, UnitKind};
use line_defence_system_line_state::LineDepth;
use line_defence_system_orchestrator::{
    AttackPlan, FrameError, Flank, StrategyConfig, Strategist, TurnMode,
};
use line_defence_world::{query, World};

fn seed(world: &mut World, kind: UnitKind, owner: Player, cells: &[(i32, i32)]) {
    for &(x, y) in cells {
        world
            .place_kind(Cell::new(x, y), kind, owner)
            .expect("seed structure");
    }
}

fn deployments(events: &[Event]) -> Vec<(UnitKind, Cell, u32)> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::Deployed { kind, cell, count } => Some((*kind, *cell, *count)),
            _ => None,
        })
        .collect()
}

#[test]
fn damaged_structure_is_recycled_then_rebuilt_next_turn() {
    let mut world = World::new();
    world.set_turn(3);
    let cell = Cell::new(3, 12);
    seed(&mut world, UnitKind::Wall, Player::Me, &[(3, 12)]);
    world.damage(cell, 45.0);
    let mut strategist = Strategist::default();

    let _ = strategist.on_turn(&mut world);
    assert!(query::removal_pending(&world, cell), "damaged wall should be removed");
    assert_eq!(strategist.state().ledger().get(cell), Some(UnitKind::Wall));

    world.end_turn();
    assert!(world.stationary_at(cell).is_none());
    let _ = world.drain_events();

    let _ = strategist.on_turn(&mut world);
    assert_eq!(
        query::events(&world).first(),
        Some(&Event::Built {
            kind: UnitKind::Wall,
            cell,
        }),
        "ledger flush runs before anything else"
    );
    assert!(strategist.state().ledger().is_empty());
    let rebuilt = world.stationary_at(cell).expect("wall rebuilt");
    assert!(rebuilt.health >= 60.0);
}

#[test]
fn crowded_front_raises_the_line_and_defers_its_rows() {
    let mut world = World::new();
    world.set_turn(2);
    seed(
        &mut world,
        UnitKind::Turret,
        Player::Opponent,
        &[(8, 14), (11, 14), (14, 14), (17, 14), (20, 14)],
    );
    let mut strategist = Strategist::default();
    let row_wall = Event::Built {
        kind: UnitKind::Wall,
        cell: Cell::new(5, 11),
    };

    assert_eq!(strategist.on_turn(&mut world), TurnMode::EarlyGame);
    assert_eq!(strategist.state().line().current(), LineDepth::Row11);
    assert_eq!(strategist.state().line().pending_rebuild_turn(), Some(3));
    assert!(
        !query::events(&world).contains(&row_wall),
        "line row must wait for the rebuild window"
    );

    world.end_turn();
    let _ = world.drain_events();

    let _ = strategist.on_turn(&mut world);
    assert_eq!(strategist.state().line().current(), LineDepth::Row11);
    assert!(!strategist.state().line().changed());
    assert!(query::events(&world).contains(&row_wall));
}

#[test]
fn opening_arms_the_attack_for_the_next_round() {
    let mut world = World::new();
    world.set_turn(5);
    seed(&mut world, UnitKind::Wall, Player::Me, &[(3, 11), (24, 11)]);
    let mut strategist = Strategist::default();

    let _ = strategist.on_turn(&mut world);
    assert!(strategist.state().ready_to_fire());
    assert!(query::removal_pending(&world, Cell::new(3, 11)));
    assert!(query::removal_pending(&world, Cell::new(24, 11)));

    world.end_turn();
    let _ = world.drain_events();

    let _ = strategist.on_turn(&mut world);
    assert!(!strategist.state().ready_to_fire());
    // nothing to hit, so only escorts leave, from the first lane
    assert_eq!(
        deployments(query::events(&world)),
        vec![(UnitKind::Interceptor, Cell::new(3, 10), 2)]
    );
    assert!(query::events(&world).contains(&Event::Built {
        kind: UnitKind::Wall,
        cell: Cell::new(24, 11),
    }));
}

#[test]
fn profitable_opening_attack_seals_the_far_lane_and_buffs_the_launch() {
    let mut world = World::new();
    world.set_turn(5);
    seed(&mut world, UnitKind::Wall, Player::Me, &[(3, 11), (24, 11)]);
    seed(
        &mut world,
        UnitKind::Turret,
        Player::Opponent,
        &[(12, 17), (15, 17), (10, 16), (17, 16)],
    );
    let fence: Vec<(i32, i32)> = (3..=24)
        .filter(|x| *x != 12 && *x != 15)
        .map(|x| (x, 17))
        .collect();
    seed(&mut world, UnitKind::Wall, Player::Opponent, &fence);
    let mut strategist = Strategist::default();

    let _ = strategist.on_turn(&mut world);
    assert!(strategist.state().ready_to_fire());
    world.end_turn();
    let _ = world.drain_events();
    world.set_resource(ResourceKind::Structure, Player::Me, 30.0);
    world.set_resource(ResourceKind::Mobile, Player::Me, 20.0);
    world.set_resource(ResourceKind::Mobile, Player::Opponent, 2.0);

    assert_eq!(strategist.on_turn(&mut world), TurnMode::EarlyGame);
    assert_eq!(strategist.state().line().current(), LineDepth::Inactive);

    let events = query::events(&world);
    let sent = deployments(events);
    let launch = sent.first().map(|(_, cell, _)| *cell).expect("attack launched");
    let (sealed, support) = if launch == Cell::new(3, 10) {
        (Cell::new(24, 11), Cell::new(4, 9))
    } else {
        assert_eq!(launch, Cell::new(24, 10), "attack leaves from a lane");
        (Cell::new(3, 11), Cell::new(23, 9))
    };
    assert_eq!(
        sent,
        vec![
            (UnitKind::Interceptor, launch, 2),
            (UnitKind::Demolisher, launch, 6),
        ]
    );
    assert!(events.contains(&Event::Built {
        kind: UnitKind::Wall,
        cell: sealed,
    }));
    assert!(
        events.contains(&Event::Built {
            kind: UnitKind::Support,
            cell: support,
        }),
        "support buff needs structure currency left over"
    );
    assert!(events.contains(&Event::RemovalScheduled {
        kind: UnitKind::Support,
        cell: support,
    }));
}

#[test]
fn active_line_attacks_from_the_line_launches() {
    let mut world = World::new();
    world.set_turn(2);
    let front: Vec<(i32, i32)> = (0..=27).map(|x| (x, 14)).collect();
    seed(&mut world, UnitKind::Wall, Player::Opponent, &front);
    world.set_resource(ResourceKind::Mobile, Player::Me, 20.0);
    world.set_resource(ResourceKind::Mobile, Player::Opponent, 1.0);
    let mut strategist = Strategist::default();

    assert_eq!(strategist.on_turn(&mut world), TurnMode::EarlyGame);
    assert_eq!(strategist.state().line().current(), LineDepth::Row11);

    let sent = deployments(query::events(&world));
    let launch = sent.first().map(|(_, cell, _)| *cell).expect("attack launched");
    assert!(
        launch == Cell::new(5, 8) || launch == Cell::new(22, 8),
        "line attack left from {launch:?}"
    );
    assert_eq!(
        sent,
        vec![
            (UnitKind::Interceptor, launch, 1),
            (UnitKind::Demolisher, launch, 6),
        ]
    );
}

#[test]
fn left_breach_alternates_attack_and_rebuild() {
    let mut world = World::new();
    world.set_turn(120);
    seed(&mut world, UnitKind::Wall, Player::Opponent, &[(0, 14), (1, 14)]);
    let mut strategist = Strategist::default();

    let modes: Vec<TurnMode> = (0..4).map(|_| strategist.on_turn(&mut world)).collect();

    assert_eq!(
        modes,
        vec![
            TurnMode::BreachLeftDetected,
            TurnMode::LeftFollowup,
            TurnMode::LeftReturn,
            TurnMode::BreachLeftDetected,
        ]
    );
    assert_eq!(strategist.state().breached(), Some(Flank::Left));
    assert!(!strategist.state().just_attacked());
}

#[test]
fn right_counter_attack_is_sized_from_corner_health() {
    let mut world = World::new();
    world.set_turn(150);
    world.set_resource(ResourceKind::Mobile, Player::Me, 5.0);
    seed(&mut world, UnitKind::Wall, Player::Opponent, &[(26, 14), (27, 14)]);
    let mut strategist = Strategist::default();

    assert_eq!(strategist.on_turn(&mut world), TurnMode::BreachRightDetected);
    let _ = world.drain_events();

    assert_eq!(strategist.on_turn(&mut world), TurnMode::RightFollowup);
    // corner wall of 60 health needs two escorts of 40; the rest goes to scouts
    assert_eq!(
        deployments(query::events(&world)),
        vec![
            (UnitKind::Interceptor, Cell::new(24, 10), 2),
            (UnitKind::Scout, Cell::new(13, 0), 3),
        ]
    );
    assert!(strategist.state().just_attacked());
}

#[test]
fn quiet_late_game_holds_the_full_defence() {
    let mut world = World::new();
    world.set_turn(101);
    seed(&mut world, UnitKind::Wall, Player::Opponent, &[(0, 14), (2, 14)]);
    let mut strategist = Strategist::default();

    assert_eq!(strategist.on_turn(&mut world), TurnMode::SteadyState);
    assert!(query::events(&world).contains(&Event::Built {
        kind: UnitKind::Turret,
        cell: Cell::new(11, 5),
    }));
    assert_eq!(strategist.state().breached(), None);
}

#[test]
fn action_frames_log_opponent_breaches() {
    let mut strategist = Strategist::new(StrategyConfig::default());
    let frame = r#"{"events": {"breach": [[[13, 0], 1, 3, "5", 2], [[15, 27], 1, 3, "6", 1]]}}"#;

    strategist.on_action_frame(frame).expect("valid frame");
    strategist.on_action_frame(frame).expect("valid frame");

    assert_eq!(strategist.scored_on(), &[Cell::new(13, 0), Cell::new(13, 0)]);
    assert!(matches!(
        strategist.on_action_frame("not json"),
        Err(FrameError::Malformed(_))
    ));
    assert_eq!(strategist.scored_on().len(), 2);
}

#[test]
fn partial_configuration_keeps_defaults() {
    let config: StrategyConfig =
        toml::from_str("max_escorts = 3\nprofitability_threshold = 12.5\n").expect("valid toml");

    assert_eq!(config.max_escorts, 3);
    assert!((config.profitability_threshold - 12.5).abs() < f32::EPSILON);
    assert_eq!(config.early_game_turns, 101);
    assert_eq!(config.line_unit_threshold, 4);
}

#[test]
fn attack_sizing_matches_the_reference_pools() {
    assert_eq!(
        AttackPlan::size(10.0, 1.0, 2, 3.0),
        AttackPlan {
            escorts: 1,
            heavy: 3
        }
    );
}
