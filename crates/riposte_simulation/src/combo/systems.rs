//! Combo systems (FixedUpdate).

use bevy::prelude::*;

use super::controller::ComboController;
use super::events::{CombatInput, ComboEventWriters, StopAttack};
use crate::combat::Dead;

/// System: записать input события в буферы (timestamp = время симуляции)
///
/// Мёртвые (`dont_destroy` трупы) input не принимают.
pub fn record_combat_inputs(
    mut inputs: EventReader<CombatInput>,
    mut controllers: Query<(&mut ComboController, Has<Dead>)>,
    time: Res<Time>,
) {
    let now = time.elapsed_secs();

    for input in inputs.read() {
        let Ok((mut controller, dead)) = controllers.get_mut(input.entity) else {
            crate::logger::log_warning(&format!(
                "CombatInput {:?} for entity {:?} without ComboController",
                input.symbol, input.entity
            ));
            continue;
        };
        if dead {
            continue;
        }

        controller.on_combat_input(input.symbol, now);
    }
}

/// System: явные прерывания атак
pub fn process_stop_attacks(
    mut stops: EventReader<StopAttack>,
    mut controllers: Query<&mut ComboController>,
    mut writers: ComboEventWriters,
) {
    for stop in stops.read() {
        let Ok(mut controller) = controllers.get_mut(stop.entity) else {
            continue;
        };

        let events = controller.stop_attack();
        if !events.is_empty() {
            crate::logger::log(&format!("🛑 Attack stopped (entity: {:?})", stop.entity));
        }
        writers.forward(stop.entity, events);
    }
}

/// System: тик combo state machine каждого entity
pub fn tick_combo_controllers(
    mut controllers: Query<(Entity, &mut ComboController)>,
    mut writers: ComboEventWriters,
    time: Res<Time>,
) {
    let now = time.elapsed_secs();
    let delta = time.delta_secs();

    for (entity, mut controller) in controllers.iter_mut() {
        let events = controller.tick(now, delta);
        writers.forward(entity, events);
    }
}
