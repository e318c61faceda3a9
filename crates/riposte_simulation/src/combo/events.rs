//! Combo events (ECS boundary).
//!
//! Input: `CombatInput`, `StopAttack` (host → ECS).
//! Output: skill lifecycle events для UI/audio/VFX/анимации (ECS → host).

use bevy::prelude::*;

use super::input::InputSymbol;
use super::scheduler::{ComboEndReason, ComboEvent};
use super::skill::SkillId;

/// Host → ECS: дискретный боевой input (timestamp проставляет система)
#[derive(Event, Debug, Clone, Copy)]
pub struct CombatInput {
    pub entity: Entity,
    pub symbol: InputSymbol,
}

/// Host → ECS: прервать атаку немедленно (stagger, cutscene, смерть)
#[derive(Event, Debug, Clone, Copy)]
pub struct StopAttack {
    pub entity: Entity,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct SkillQueued {
    pub entity: Entity,
    pub skill: SkillId,
    pub queue_len: usize,
}

/// Скилл стал current: host запускает его timeline
#[derive(Event, Debug, Clone, Copy)]
pub struct SkillActivated {
    pub entity: Entity,
    pub skill: SkillId,
    pub combo_stage: usize,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct SkillDemoted {
    pub entity: Entity,
    pub skill: SkillId,
}

/// Interrupt signal (forced stop скилла)
#[derive(Event, Debug, Clone, Copy)]
pub struct SkillInterrupted {
    pub entity: Entity,
    pub skill: SkillId,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct ComboEnded {
    pub entity: Entity,
    pub reason: ComboEndReason,
}

/// Все output writers одной пачкой (форвардинг `ComboEvent` → ECS events)
#[derive(bevy::ecs::system::SystemParam)]
pub struct ComboEventWriters<'w> {
    pub queued: EventWriter<'w, SkillQueued>,
    pub activated: EventWriter<'w, SkillActivated>,
    pub demoted: EventWriter<'w, SkillDemoted>,
    pub interrupted: EventWriter<'w, SkillInterrupted>,
    pub ended: EventWriter<'w, ComboEnded>,
}

impl ComboEventWriters<'_> {
    pub fn forward(&mut self, entity: Entity, events: Vec<ComboEvent>) {
        for event in events {
            match event {
                ComboEvent::Queued { skill, queue_len } => {
                    self.queued.write(SkillQueued { entity, skill, queue_len });
                }
                ComboEvent::Activated { skill, combo_stage } => {
                    self.activated.write(SkillActivated {
                        entity,
                        skill,
                        combo_stage,
                    });
                }
                ComboEvent::Demoted { skill } => {
                    self.demoted.write(SkillDemoted { entity, skill });
                }
                ComboEvent::Interrupted { skill } => {
                    self.interrupted.write(SkillInterrupted { entity, skill });
                }
                ComboEvent::Ended { reason } => {
                    self.ended.write(ComboEnded { entity, reason });
                }
            }
        }
    }
}
