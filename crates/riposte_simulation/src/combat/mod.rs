//! Combat system module
//!
//! ECS ответственность:
//! - Game state: Health, Attacker (base attack + combo scaling)
//! - Combat rules: attack power, damage/heal, смерть и деспавн
//! - Events: DamageDealt, EntityDied, HealthRestored
//!
//! Host ответственность:
//! - Hit detection (box cast / overlap) → AttackHit
//! - Health bars, damage numbers, death VFX (читают события)

use bevy::prelude::*;

pub mod attacker;
pub mod combo_addition;
pub mod damage;


pub use attacker::Attacker;
pub use combo_addition::ComboAdditionValue;
pub use damage::{
    AttackHit, DamageDealt, DamageRequest, Dead, DespawnAfter, EntityDied, HealRequest, HealthRestored,
    ResetHealthRequest,
};

use crate::SimulationSet;

/// Combat Plugin
///
/// Порядок выполнения (FixedUpdate, `SimulationSet::Combat`):
/// 1. resolve_attack_hits: AttackHit/DamageRequest → урон
/// 2. apply_heals
/// 3. handle_deaths: Dead маркер + StopAttack
/// 4. apply_health_resets: после смерти, reset в том же тике поднимает
/// 5. reset_combo_addition_on_combo_end, tick_combo_additions
/// 6. despawn_after_timeout
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AttackHit>()
            .add_event::<DamageRequest>()
            .add_event::<HealRequest>()
            .add_event::<DamageDealt>()
            .add_event::<EntityDied>()
            .add_event::<HealthRestored>()
            .add_event::<ResetHealthRequest>()
            .add_event::<crate::combo::StopAttack>()
            .add_event::<crate::combo::ComboEnded>();

        app.add_systems(
            FixedUpdate,
            (
                damage::resolve_attack_hits,
                damage::apply_heals,
                damage::handle_deaths,
                damage::apply_health_resets,
                attacker::reset_combo_addition_on_combo_end,
                attacker::tick_combo_additions,
                damage::despawn_after_timeout,
            )
                .chain()
                .in_set(SimulationSet::Combat),
        );
    }
}
