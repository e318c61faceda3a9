//! Combo / skill state machine.
//!
//! # Architecture
//!
//! ```text
//! CombatInput (host) → InputBuffer (append)
//!   ↓ tick
//! SkillMatcher: буфер == inputs скилла целиком? → SkillScheduler::enqueue
//!   ↓
//! SkillScheduler: previous expiry → demotion → activation → natural end
//!   ↓
//! SkillQueued / SkillActivated / SkillDemoted / SkillInterrupted / ComboEnded (→ host)
//! ```
//!
//! Вся логика живёт в plain структурах (`ComboController` и ниже) и тестируется
//! без App. Systems только подают время и форвардят события.

use bevy::prelude::*;

pub mod config;
pub mod controller;
pub mod events;
pub mod input;
pub mod matcher;
pub mod playback;
pub mod scheduler;
pub mod skill;
pub mod systems;


pub use config::ComboConfig;
pub use controller::ComboController;
pub use events::{
    CombatInput, ComboEnded, SkillActivated, SkillDemoted, SkillInterrupted, SkillQueued, StopAttack,
};
pub use input::{InputBuffer, InputSymbol, TimedInput};
pub use matcher::{can_still_match, match_sequence, SkillMatcher};
pub use playback::{SkillPlayback, TimelineClock};
pub use scheduler::{ComboEndReason, ComboEvent, SchedulerState, SkillScheduler};
pub use skill::{Skill, SkillDefinition, SkillId, SkillSet, SkillSetAsset, SkillSetError};

use crate::SimulationSet;

/// Combo Plugin
///
/// Порядок выполнения (FixedUpdate, `SimulationSet::Combo`):
/// 1. record_combat_inputs: input события → буферы
/// 2. process_stop_attacks: явные прерывания
/// 3. tick_combo_controllers: match + scheduler
pub struct ComboPlugin;

impl Plugin for ComboPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<CombatInput>()
            .add_event::<StopAttack>()
            .add_event::<SkillQueued>()
            .add_event::<SkillActivated>()
            .add_event::<SkillDemoted>()
            .add_event::<SkillInterrupted>()
            .add_event::<ComboEnded>();

        app.add_systems(
            FixedUpdate,
            (
                systems::record_combat_inputs,
                systems::process_stop_attacks,
                systems::tick_combo_controllers,
            )
                .chain()
                .in_set(SimulationSet::Combo),
        );
    }
}
