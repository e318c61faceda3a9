//! Damage / death / heal системы.
//!
//! Host hit detection → `AttackHit` → сила удара с combo scaling → `Health::on_damage`
//! → `DamageDealt` (+ `EntityDied` → `Dead` + `DespawnAfter`).

use bevy::prelude::*;

use super::attacker::Attacker;
use crate::combo::StopAttack;
use crate::components::{DamageOutcome, Health};

/// Host → ECS: hitbox атакующего задел цель
#[derive(Event, Debug, Clone, Copy)]
pub struct AttackHit {
    pub attacker: Entity,
    pub target: Entity,
}

/// Host → ECS: урон без атакующего-актора (ловушки, скрипты, kill volume)
#[derive(Event, Debug, Clone, Copy)]
pub struct DamageRequest {
    pub target: Entity,
    pub amount: f32,
    pub source: Option<Entity>,
}

/// Host → ECS: лечение
#[derive(Event, Debug, Clone, Copy)]
pub struct HealRequest {
    pub target: Entity,
    pub amount: f32,
}

/// Событие: урон нанесен (damage numbers, health bars, звук, VFX)
#[derive(Event, Debug, Clone, Copy)]
pub struct DamageDealt {
    pub target: Entity,
    pub source: Option<Entity>,
    pub amount: f32,
    pub health_left: f32,
}

/// Событие: entity умер (ровно один раз на смерть)
#[derive(Event, Debug, Clone, Copy)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Host → ECS: полное здоровье (респаун из пула, чекпоинт). Поднимает и мёртвых.
#[derive(Event, Debug, Clone, Copy)]
pub struct ResetHealthRequest {
    pub target: Entity,
}

/// Событие: здоровье восстановлено (`amount` = реально добавлено после clamp)
#[derive(Event, Debug, Clone, Copy)]
pub struct HealthRestored {
    pub entity: Entity,
    pub amount: f32,
}

/// Компонент-маркер: entity мертв (Health <= 0)
#[derive(Component, Debug)]
pub struct Dead;

/// Компонент-маркер: деспавн entity после указанного времени
#[derive(Component, Debug)]
pub struct DespawnAfter {
    /// Время деспавна (секунды симуляции)
    pub despawn_time: f32,
}

/// Применить урон к Health и разослать нотификации.
///
/// Returns исход (Rejected: без событий).
pub fn apply_damage(
    commands: &mut Commands,
    target: Entity,
    health: &mut Health,
    amount: f32,
    source: Option<Entity>,
    now: f32,
    damage_dealt_events: &mut EventWriter<DamageDealt>,
    entity_died_events: &mut EventWriter<EntityDied>,
) -> DamageOutcome {
    let outcome = health.on_damage(amount, now);

    match outcome {
        DamageOutcome::Rejected => {}
        DamageOutcome::Damaged { amount } => {
            damage_dealt_events.write(DamageDealt {
                target,
                source,
                amount,
                health_left: health.current,
            });
        }
        DamageOutcome::Killed { amount } => {
            damage_dealt_events.write(DamageDealt {
                target,
                source,
                amount,
                health_left: health.current,
            });
            entity_died_events.write(EntityDied {
                entity: target,
                killer: source,
            });

            if !health.dont_destroy {
                commands.entity(target).insert(DespawnAfter {
                    despawn_time: now + health.destroy_delay,
                });
            }

            crate::logger::log_info(&format!("💀 Entity {:?} killed by {:?}", target, source));
        }
    }

    outcome
}

/// Система: AttackHit → сила удара (base + combo) → урон цели
pub fn resolve_attack_hits(
    mut commands: Commands,
    mut hits: EventReader<AttackHit>,
    mut requests: EventReader<DamageRequest>,
    mut attackers: Query<&mut Attacker>,
    mut targets: Query<&mut Health>,
    mut damage_dealt_events: EventWriter<DamageDealt>,
    mut entity_died_events: EventWriter<EntityDied>,
    time: Res<Time>,
) {
    let now = time.elapsed_secs();

    for hit in hits.read() {
        // Skip self-hits
        if hit.attacker == hit.target {
            continue;
        }

        let Ok(mut attacker) = attackers.get_mut(hit.attacker) else {
            crate::logger::log_warning(&format!("AttackHit: attacker {:?} has no Attacker", hit.attacker));
            continue;
        };
        let Ok(mut health) = targets.get_mut(hit.target) else {
            crate::logger::log_warning(&format!("AttackHit: target {:?} has no Health", hit.target));
            continue;
        };

        let power = attacker.strike(now);
        let outcome = apply_damage(
            &mut commands,
            hit.target,
            &mut health,
            power,
            Some(hit.attacker),
            now,
            &mut damage_dealt_events,
            &mut entity_died_events,
        );

        crate::logger::log(&format!(
            "💥 Hit {:?} → {:?}: {:.1} ({:?}, HP: {:.1})",
            hit.attacker, hit.target, power, outcome, health.current
        ));
    }

    for request in requests.read() {
        let Ok(mut health) = targets.get_mut(request.target) else {
            continue;
        };

        apply_damage(
            &mut commands,
            request.target,
            &mut health,
            request.amount,
            request.source,
            now,
            &mut damage_dealt_events,
            &mut entity_died_events,
        );
    }
}

/// Система: лечение
///
/// Добитых в этом же тике (`Dead` ещё не вставлен) тоже не лечим.
pub fn apply_heals(
    mut requests: EventReader<HealRequest>,
    mut targets: Query<&mut Health, Without<Dead>>,
    mut restored_events: EventWriter<HealthRestored>,
) {
    for request in requests.read() {
        let Ok(mut health) = targets.get_mut(request.target) else {
            continue;
        };
        if !health.is_alive() {
            continue;
        }

        let restored = health.heal(request.amount);
        restored_events.write(HealthRestored {
            entity: request.target,
            amount: restored,
        });
    }
}

/// Система: полный reset здоровья (снимает Dead и отменяет деспавн)
pub fn apply_health_resets(
    mut commands: Commands,
    mut requests: EventReader<ResetHealthRequest>,
    mut targets: Query<(&mut Health, Has<Dead>)>,
    mut restored_events: EventWriter<HealthRestored>,
) {
    for request in requests.read() {
        let Ok((mut health, dead)) = targets.get_mut(request.target) else {
            continue;
        };

        let restored = health.reset();
        if dead {
            commands.entity(request.target).remove::<(Dead, DespawnAfter)>();
            crate::logger::log_info(&format!("✨ Entity {:?} revived", request.target));
        }

        restored_events.write(HealthRestored {
            entity: request.target,
            amount: restored,
        });
    }
}

/// Система: смерть → маркер Dead + прерывание текущего комбо
pub fn handle_deaths(
    mut commands: Commands,
    mut death_events: EventReader<EntityDied>,
    mut stop_events: EventWriter<StopAttack>,
) {
    for event in death_events.read() {
        if let Ok(mut entity_commands) = commands.get_entity(event.entity) {
            entity_commands.insert(Dead);
        }
        stop_events.write(StopAttack { entity: event.entity });
    }
}

/// Система: деспавн entities с истёкшим DespawnAfter
pub fn despawn_after_timeout(
    mut commands: Commands,
    query: Query<(Entity, &DespawnAfter)>,
    time: Res<Time>,
) {
    let current_time = time.elapsed_secs();

    for (entity, despawn_after) in query.iter() {
        if current_time >= despawn_after.despawn_time {
            crate::logger::log(&format!("⚰️ Despawning entity {:?}", entity));
            commands.entity(entity).despawn();
        }
    }
}
