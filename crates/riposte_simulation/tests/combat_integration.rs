//! Combat integration test
//!
//! Headless App + SimulationPlugin: host-события (AttackHit, DamageRequest, HealRequest)
//! → Health → нотификации.
//!
//! Проверяем:
//! - Смерть ровно один раз, деспавн после destroy_delay
//! - Invincible цель не порождает событий
//! - Combo scaling растёт от удара к удару
//! - Смерть прерывает текущий скилл, труп не принимает input
//! - Лечение: только живых, amount после clamp, reset поднимает мёртвых

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use riposte_simulation::*;

#[derive(Resource, Default)]
struct Captured {
    dealt: Vec<DamageDealt>,
    died: Vec<EntityDied>,
    restored: Vec<HealthRestored>,
    activated: Vec<SkillActivated>,
    interrupted: Vec<SkillInterrupted>,
    ended: Vec<ComboEnded>,
}

fn capture_combat_events(
    mut captured: ResMut<Captured>,
    mut dealt: EventReader<DamageDealt>,
    mut died: EventReader<EntityDied>,
    mut restored: EventReader<HealthRestored>,
    mut activated: EventReader<SkillActivated>,
    mut interrupted: EventReader<SkillInterrupted>,
    mut ended: EventReader<ComboEnded>,
) {
    captured.dealt.extend(dealt.read().copied());
    captured.died.extend(died.read().copied());
    captured.restored.extend(restored.read().copied());
    captured.activated.extend(activated.read().copied());
    captured.interrupted.extend(interrupted.read().copied());
    captured.ended.extend(ended.read().copied());
}

/// Helper: полный combat App, один FixedUpdate тик на update
fn create_combat_app() -> App {
    let mut app = create_headless_app(42);
    let timestep = Time::<Fixed>::from_hz(60.0).timestep();

    app.insert_resource(TimeUpdateStrategy::ManualDuration(timestep))
        .add_plugins(SimulationPlugin)
        .init_resource::<Captured>()
        .add_systems(Update, capture_combat_events);

    step(&mut app, 2);
    app
}

fn step(app: &mut App, updates: usize) {
    for _ in 0..updates {
        app.update();
    }
}

fn spawn_fighter(app: &mut App, health: Health) -> Entity {
    let skills = SkillSet::from_definitions(vec![SkillDefinition::new(
        "slash",
        vec![InputSymbol::A],
        0.3,
        0.8,
    )])
    .unwrap();

    app.world_mut()
        .spawn(fighter_bundle(1, health, Attacker::default(), skills, ComboConfig::default()))
        .id()
}

fn request_damage(app: &mut App, target: Entity, amount: f32) {
    app.world_mut().send_event(DamageRequest {
        target,
        amount,
        source: None,
    });
}

#[test]
fn test_lethal_damage_kills_once_and_despawns() {
    let mut app = create_combat_app();
    let target = app
        .world_mut()
        .spawn(Health {
            current: 30.0,
            ..Health::new(100.0)
        })
        .id();

    // Два смертельных удара в одном тике: второй уже по мёртвому
    request_damage(&mut app, target, 50.0);
    request_damage(&mut app, target, 50.0);
    step(&mut app, 1);

    {
        let captured = app.world().resource::<Captured>();
        assert_eq!(captured.dealt.len(), 1);
        assert_eq!(captured.dealt[0].health_left, 0.0);
        assert_eq!(captured.died.len(), 1);
        assert_eq!(captured.died[0].entity, target);
        assert_eq!(captured.died[0].killer, None);
    }

    // destroy_delay = 0 → деспавн не позже следующего тика
    step(&mut app, 1);
    assert!(app.world().get_entity(target).is_err());
    assert_eq!(app.world().resource::<Captured>().died.len(), 1);
}

#[test]
fn test_invincible_target_ignores_damage() {
    let mut app = create_combat_app();
    let target = app
        .world_mut()
        .spawn(Health {
            invincible: true,
            ..Health::new(100.0)
        })
        .id();

    request_damage(&mut app, target, 500.0);
    step(&mut app, 1);

    let captured = app.world().resource::<Captured>();
    assert!(captured.dealt.is_empty());
    assert!(captured.died.is_empty());
    assert_eq!(app.world().get::<Health>(target).unwrap().current, 100.0);
    assert!(app.world().get::<Dead>(target).is_none());
}

#[test]
fn test_consecutive_hits_scale_with_combo() {
    let mut app = create_combat_app();
    let attacker = spawn_fighter(&mut app, Health::new(100.0));
    let target = spawn_fighter(&mut app, Health::new(100.0));

    for _ in 0..2 {
        app.world_mut().send_event(AttackHit { attacker, target });
    }
    step(&mut app, 1);

    let captured = app.world().resource::<Captured>();
    assert_eq!(captured.dealt.len(), 2);
    assert_eq!(captured.dealt[0].amount, 10.0);
    assert!((captured.dealt[1].amount - 11.0).abs() < 1e-5);
    assert_eq!(captured.dealt[1].source, Some(attacker));
    assert!((app.world().get::<Health>(target).unwrap().current - 79.0).abs() < 1e-4);
}

#[test]
fn test_self_hit_is_ignored() {
    let mut app = create_combat_app();
    let fighter = spawn_fighter(&mut app, Health::new(100.0));

    app.world_mut().send_event(AttackHit {
        attacker: fighter,
        target: fighter,
    });
    step(&mut app, 1);

    assert!(app.world().resource::<Captured>().dealt.is_empty());
    assert_eq!(app.world().get::<Attacker>(fighter).unwrap().combo.value(), 0.0);
}

#[test]
fn test_death_interrupts_active_skill() {
    let mut app = create_combat_app();
    let fighter = spawn_fighter(
        &mut app,
        Health {
            destroy_delay: 1.0,
            ..Health::new(20.0)
        },
    );

    app.world_mut().send_event(CombatInput {
        entity: fighter,
        symbol: InputSymbol::A,
    });
    step(&mut app, 1);
    assert!(app.world().get::<ComboController>(fighter).unwrap().current_skill().is_some());

    request_damage(&mut app, fighter, 100.0);
    // Тик смерти → StopAttack, следующий тик прерывает скилл
    step(&mut app, 2);

    let captured = app.world().resource::<Captured>();
    assert_eq!(captured.died.len(), 1);
    assert_eq!(captured.interrupted.len(), 1);
    assert_eq!(captured.interrupted[0].entity, fighter);
    assert_eq!(captured.ended.len(), 1);
    assert_eq!(captured.ended[0].reason, ComboEndReason::Stopped);

    assert!(app.world().get::<Dead>(fighter).is_some());
    assert_eq!(app.world().get::<ComboController>(fighter).unwrap().current_skill(), None);
}

#[test]
fn test_heal_clamps_to_max() {
    let mut app = create_combat_app();
    let target = app
        .world_mut()
        .spawn(Health {
            current: 50.0,
            ..Health::new(100.0)
        })
        .id();

    app.world_mut().send_event(HealRequest { target, amount: 80.0 });
    step(&mut app, 1);

    let captured = app.world().resource::<Captured>();
    assert_eq!(captured.restored.len(), 1);
    assert_eq!(captured.restored[0].entity, target);
    // Запрошено 80, влезло 50
    assert_eq!(captured.restored[0].amount, 50.0);
    assert_eq!(app.world().get::<Health>(target).unwrap().current, 100.0);
}

#[test]
fn test_heal_in_death_tick_does_not_revive() {
    let mut app = create_combat_app();
    let target = app
        .world_mut()
        .spawn(Health {
            dont_destroy: true,
            ..Health::new(10.0)
        })
        .id();

    request_damage(&mut app, target, 50.0);
    app.world_mut().send_event(HealRequest { target, amount: 8.0 });
    step(&mut app, 1);

    let captured = app.world().resource::<Captured>();
    assert_eq!(captured.died.len(), 1);
    assert!(captured.restored.is_empty());

    let health = app.world().get::<Health>(target).unwrap();
    assert_eq!(health.current, 0.0);
    assert!(!health.is_alive());
    assert!(app.world().get::<Dead>(target).is_some());
}

#[test]
fn test_reset_health_revives_pooled_entity() {
    let mut app = create_combat_app();
    let target = app
        .world_mut()
        .spawn(Health {
            dont_destroy: true,
            ..Health::new(40.0)
        })
        .id();

    request_damage(&mut app, target, 100.0);
    step(&mut app, 1);
    assert!(app.world().get::<Dead>(target).is_some());

    app.world_mut().send_event(ResetHealthRequest { target });
    step(&mut app, 1);

    let captured = app.world().resource::<Captured>();
    assert_eq!(captured.restored.len(), 1);
    assert_eq!(captured.restored[0].amount, 40.0);
    assert_eq!(app.world().get::<Health>(target).unwrap().current, 40.0);
    assert!(app.world().get::<Dead>(target).is_none());

    // Снова смертен: вторая смерть тоже сообщается
    request_damage(&mut app, target, 100.0);
    step(&mut app, 1);
    assert_eq!(app.world().resource::<Captured>().died.len(), 2);
}

#[test]
fn test_dead_fighter_ignores_combat_input() {
    let mut app = create_combat_app();
    let fighter = spawn_fighter(
        &mut app,
        Health {
            dont_destroy: true,
            ..Health::new(20.0)
        },
    );

    request_damage(&mut app, fighter, 100.0);
    step(&mut app, 2);

    app.world_mut().send_event(CombatInput {
        entity: fighter,
        symbol: InputSymbol::A,
    });
    step(&mut app, 2);

    assert!(app.world().resource::<Captured>().activated.is_empty());
    let combo = app.world().get::<ComboController>(fighter).unwrap();
    assert!(combo.buffer().is_empty());
    assert_eq!(combo.current_skill(), None);
}
