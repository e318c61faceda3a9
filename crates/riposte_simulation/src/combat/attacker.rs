//! Attacker component: сила атаки + combo scaling
//!
//! Архитектура:
//! - ECS хранит: base_attack, combo addition (game state)
//! - Host выполняет: hit detection (box cast / overlap), анимацию
//! - Host → ECS: AttackHit { attacker, target } → damage resolution

use bevy::prelude::*;

use super::combo_addition::ComboAdditionValue;

/// Attacker: компонент для акторов которые могут атаковать
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Attacker {
    /// Базовая сила атаки (без combo scaling)
    pub base_attack: f32,

    /// Combo scaling: attack = base + base × combo.value
    pub combo: ComboAdditionValue,
}

impl Default for Attacker {
    fn default() -> Self {
        Self {
            base_attack: 10.0,
            combo: ComboAdditionValue::default(),
        }
    }
}

impl Attacker {
    pub fn new(base_attack: f32) -> Self {
        Self {
            base_attack,
            ..Default::default()
        }
    }

    /// Текущая сила удара с combo scaling
    pub fn attack_power(&self) -> f32 {
        self.base_attack + self.base_attack * self.combo.value()
    }

    /// Нанести удар: считает силу ДО прибавки combo, затем засчитывает action
    pub fn strike(&mut self, now: f32) -> f32 {
        let power = self.attack_power();
        self.combo.on_action(now);
        power
    }
}

/// System: combo addition спадает во время простоя
pub fn tick_combo_additions(mut query: Query<&mut Attacker>, time: Res<Time>) {
    let now = time.elapsed_secs();
    let delta = time.delta_secs();

    for mut attacker in query.iter_mut() {
        attacker.combo.tick(now, delta);
    }
}

/// System: конец комбо сбрасывает combo scaling
pub fn reset_combo_addition_on_combo_end(
    mut ended: EventReader<crate::combo::ComboEnded>,
    mut attackers: Query<&mut Attacker>,
    time: Res<Time>,
) {
    let now = time.elapsed_secs();

    for event in ended.read() {
        if let Ok(mut attacker) = attackers.get_mut(event.entity) {
            attacker.combo.reset(now);
        }
    }
}
