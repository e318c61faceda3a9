//! RIPOSTE Simulation Core
//!
//! Headless боевая симуляция на Bevy 0.16 ECS:
//! - combo: input buffer → skill matcher → skill scheduler (current / previous / queue)
//! - combat: attack power + combo scaling, damage/heal, смерть
//!
//! Рендер, физика, hit detection и timeline playback: на стороне host'а
//! (движок), общение только через события.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub mod combat;
pub mod combo;
pub mod components;
pub mod logger;

pub use combat::{
    AttackHit, Attacker, ComboAdditionValue, CombatPlugin, DamageDealt, DamageRequest, Dead, DespawnAfter,
    EntityDied, HealRequest, HealthRestored, ResetHealthRequest,
};
pub use combo::{
    CombatInput, ComboConfig, ComboController, ComboEndReason, ComboEnded, ComboPlugin, InputSymbol,
    SchedulerState, SkillActivated, SkillDefinition, SkillDemoted, SkillId, SkillInterrupted, SkillQueued,
    SkillSet, SkillSetError, StopAttack,
};
pub use components::*;

/// Порядок подсистем внутри FixedUpdate
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Input → combo state machine
    Combo,
    /// Урон, смерть, combo scaling
    Combat,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .configure_sets(FixedUpdate, (SimulationSet::Combo, SimulationSet::Combat).chain())
            .add_plugins((ComboPlugin, CombatPlugin));

        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    logger::init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Bundle боевого актора со skill set'ом
pub fn fighter_bundle(
    team_id: u64,
    health: Health,
    attacker: Attacker,
    skills: SkillSet,
    config: ComboConfig,
) -> impl Bundle {
    (
        Actor { team_id },
        health,
        attacker,
        ComboController::new(skills, config),
    )
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
