//! Headless симуляция RIPOSTE
//!
//! Два бойца жмут случайные кнопки (seeded RNG), каждый активированный скилл
//! считается попаданием по сопернику. Печатает статус каждые 60 тиков.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::Rng;
use riposte_simulation::logger::{log_info, set_log_level, LogLevel};
use riposte_simulation::*;

const DEMO_SKILLS: &str = r#"
[[skills]]
name = "slash_1"
inputs = ["A"]
recovery_time = 0.25
duration = 0.6

[[skills]]
name = "slash_2"
inputs = ["A", "A"]
recovery_time = 0.3
duration = 0.7

[[skills]]
name = "finisher"
inputs = ["A", "A", "A"]
recovery_time = 0.6
duration = 1.2

[[skills]]
name = "launcher"
inputs = ["A", "B"]
recovery_time = 0.4
duration = 0.9
"#;

/// Пара соперников (кто кого бьёт)
#[derive(Resource)]
struct Duel {
    fighters: [Entity; 2],
}

/// Случайный input раз в ~6 тиков
fn press_random_buttons(
    duel: Res<Duel>,
    mut rng: ResMut<DeterministicRng>,
    mut inputs: EventWriter<CombatInput>,
    alive: Query<(), Without<Dead>>,
) {
    for &fighter in &duel.fighters {
        if alive.get(fighter).is_err() || !rng.rng.gen_bool(1.0 / 6.0) {
            continue;
        }

        let symbol = if rng.rng.gen_bool(0.8) {
            InputSymbol::A
        } else {
            InputSymbol::B
        };
        inputs.write(CombatInput { entity: fighter, symbol });
    }
}

/// Вместо hit detection: каждый активированный скилл попадает по сопернику
fn activated_skills_hit_opponent(
    duel: Res<Duel>,
    mut activated: EventReader<SkillActivated>,
    mut hits: EventWriter<AttackHit>,
) {
    for event in activated.read() {
        let Some(target) = duel.fighters.iter().copied().find(|&f| f != event.entity) else {
            continue;
        };
        hits.write(AttackHit {
            attacker: event.entity,
            target,
        });
    }
}

fn main() {
    let seed = 42;
    let mut app = create_headless_app(seed);
    set_log_level(LogLevel::Info);
    log_info(&format!("Starting RIPOSTE headless simulation (seed: {})", seed));

    // Фиксированный шаг времени: прогон не зависит от скорости машины
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(1.0 / 60.0)))
        .add_plugins(SimulationPlugin)
        .add_systems(
            FixedUpdate,
            (
                press_random_buttons.before(SimulationSet::Combo),
                activated_skills_hit_opponent
                    .after(SimulationSet::Combo)
                    .before(SimulationSet::Combat),
            ),
        );

    let mut fighters = Vec::new();
    for team_id in 0..2 {
        let skills = match SkillSet::from_toml_str(DEMO_SKILLS) {
            Ok(skills) => skills,
            Err(err) => {
                eprintln!("Invalid demo skill set: {}", err);
                std::process::exit(1);
            }
        };
        let entity = app
            .world_mut()
            .spawn(fighter_bundle(
                team_id,
                Health::new(200.0),
                Attacker::new(12.0),
                skills,
                ComboConfig::default(),
            ))
            .id();
        fighters.push(entity);
    }
    app.insert_resource(Duel {
        fighters: [fighters[0], fighters[1]],
    });

    for tick in 0..1200 {
        app.update();

        if tick % 60 == 0 {
            let world = app.world();
            for &fighter in &fighters {
                let Some(health) = world.get::<Health>(fighter) else {
                    log_info(&format!("Tick {}: {:?} despawned", tick, fighter));
                    continue;
                };
                let combo = world.get::<Attacker>(fighter).map(|a| a.combo.value()).unwrap_or(0.0);
                log_info(&format!(
                    "Tick {}: {:?} HP {:.1}/{:.1}, combo +{:.0}%",
                    tick,
                    fighter,
                    health.current,
                    health.max,
                    combo * 100.0
                ));
            }
        }
    }

    log_info("Simulation complete!");
}
