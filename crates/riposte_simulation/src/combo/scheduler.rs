//! Skill scheduler: 3-slot state machine (current / previous / queue).
//!
//! # Tick order (фиксированный, порядок важен)
//!
//! ```text
//! 1. Previous expiry: previous живёт stop_previous_after после активации current → force stop
//! 2. Demotion: current прошёл recovery И есть преемник → current → previous
//! 3. Activation: current пуст И очередь не пуста → dequeue + play(0)
//! 4. Natural end: очередь пуста И current прошёл duration → cleanup → Idle
//! ```
//!
//! Demotion идёт до activation: скилл заменяется в том же тике, без null-кадра.
//! recovery_time и duration меряются от одного и того же activation time.

use std::collections::VecDeque;

use bevy::prelude::*;

use super::skill::{SkillId, SkillSet};

/// Наблюдаемое состояние scheduler'а
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum SchedulerState {
    /// Нет current, нет previous, очередь пуста
    Idle,
    /// Current играет, recovery окно ещё не наступило
    Active,
    /// Current в recovery хвосте: преемник может его заменить
    Recovering,
    /// Current пуст, previous ждёт forced stop
    FadingPrevious,
    /// Всё пусто кроме очереди (активация на следующем тике)
    Draining,
}

/// Почему закончилось комбо
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum ComboEndReason {
    /// Current доиграл duration без преемника
    Finished,
    /// Явный StopAttack
    Stopped,
}

/// Переходы scheduler'а за тик (host форвардит их в ECS events)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ComboEvent {
    Queued { skill: SkillId, queue_len: usize },
    Activated { skill: SkillId, combo_stage: usize },
    Demoted { skill: SkillId },
    /// Forced stop: interrupt signal + playback stop
    Interrupted { skill: SkillId },
    Ended { reason: ComboEndReason },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkillScheduler {
    current: Option<SkillId>,
    previous: Option<SkillId>,
    queue: VecDeque<SkillId>,
    /// Время активации current (None = unset)
    activation_time: Option<f32>,
    /// Длина очереди в момент последней активации
    combo_stage: Option<usize>,
    /// Сколько previous живёт после активации нового current (crossfade хвост)
    stop_previous_after: f32,
}

impl SkillScheduler {
    pub fn new(stop_previous_after: f32) -> Self {
        Self {
            current: None,
            previous: None,
            queue: VecDeque::new(),
            activation_time: None,
            combo_stage: None,
            stop_previous_after,
        }
    }

    pub fn current(&self) -> Option<SkillId> {
        self.current
    }

    pub fn previous(&self) -> Option<SkillId> {
        self.previous
    }

    pub fn queued(&self) -> impl Iterator<Item = SkillId> + '_ {
        self.queue.iter().copied()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn activation_time(&self) -> Option<f32> {
        self.activation_time
    }

    pub fn combo_stage(&self) -> Option<usize> {
        self.combo_stage
    }

    pub fn stop_previous_after(&self) -> f32 {
        self.stop_previous_after
    }

    pub fn state(&self, now: f32, skills: &SkillSet) -> SchedulerState {
        if let Some(current) = self.current {
            let in_recovery = self
                .elapsed(now)
                .is_some_and(|elapsed| elapsed > skills.definition(current).recovery_time);
            return if in_recovery {
                SchedulerState::Recovering
            } else {
                SchedulerState::Active
            };
        }

        if self.previous.is_some() {
            SchedulerState::FadingPrevious
        } else if !self.queue.is_empty() {
            SchedulerState::Draining
        } else {
            SchedulerState::Idle
        }
    }

    /// Поставить сматченный скилл в очередь (активируется на tick)
    pub fn enqueue(&mut self, skill: SkillId, events: &mut Vec<ComboEvent>) {
        self.queue.push_back(skill);
        events.push(ComboEvent::Queued {
            skill,
            queue_len: self.queue.len(),
        });
    }

    /// Один тик state machine. Returns true если комбо закончилось (natural end);
    /// caller обязан очистить input buffer и stage counters.
    pub fn tick(&mut self, now: f32, skills: &mut SkillSet, events: &mut Vec<ComboEvent>) -> bool {
        // 1. Previous expiry
        if self.previous.is_some()
            && self
                .elapsed(now)
                .is_none_or(|elapsed| elapsed >= self.stop_previous_after)
        {
            self.force_stop_previous(skills, events);
        }

        if !self.queue.is_empty() {
            // 2. Demotion (только если есть преемник)
            if let Some(current) = self.current {
                let recovery_time = skills.definition(current).recovery_time;
                if self.elapsed(now).is_some_and(|elapsed| elapsed > recovery_time) {
                    self.demote_current(skills, events);
                }
            }

            // 3. Activation
            if self.current.is_none() {
                self.activate_next(now, skills, events);
            }
        }

        // 4. Natural end
        if let Some(current) = self.current {
            let duration = skills.definition(current).duration;
            if self.queue.is_empty() && self.elapsed(now).is_some_and(|elapsed| elapsed > duration) {
                crate::logger::log(&format!(
                    "Combo finished: `{}` ran out ({:.2}s) with no successor",
                    skills.definition(current).name,
                    duration
                ));
                self.reset();
                events.push(ComboEvent::Ended {
                    reason: ComboEndReason::Finished,
                });
                return true;
            }
        }

        false
    }

    /// Явное прерывание: stop current сразу, очередь сбрасывается.
    ///
    /// Previous не трогаем: activation time unset, он уйдёт на следующем тике.
    /// Returns true если было что прерывать.
    pub fn stop_attack(&mut self, skills: &mut SkillSet, events: &mut Vec<ComboEvent>) -> bool {
        let had_work = self.current.is_some() || !self.queue.is_empty();

        if let Some(current) = self.current.take() {
            events.push(ComboEvent::Interrupted { skill: current });
            skills.stop(current);
        }
        self.queue.clear();
        self.reset();

        if had_work {
            events.push(ComboEvent::Ended {
                reason: ComboEndReason::Stopped,
            });
        }
        had_work
    }

    fn elapsed(&self, now: f32) -> Option<f32> {
        self.activation_time.map(|activated| now - activated)
    }

    fn reset(&mut self) {
        self.current = None;
        self.activation_time = None;
        self.combo_stage = None;
    }

    fn force_stop_previous(&mut self, skills: &mut SkillSet, events: &mut Vec<ComboEvent>) {
        let Some(previous) = self.previous.take() else {
            unreachable!("SkillScheduler: forced stop with empty previous slot");
        };

        events.push(ComboEvent::Interrupted { skill: previous });
        skills.stop(previous);
    }

    fn demote_current(&mut self, skills: &mut SkillSet, events: &mut Vec<ComboEvent>) {
        assert!(
            !self.queue.is_empty(),
            "SkillScheduler: demotion without a queued successor"
        );

        if self.previous.is_some() {
            self.force_stop_previous(skills, events);
        }

        let Some(current) = self.current.take() else {
            unreachable!("SkillScheduler: demotion with empty current slot");
        };

        self.previous = Some(current);
        events.push(ComboEvent::Demoted { skill: current });
    }

    fn activate_next(&mut self, now: f32, skills: &mut SkillSet, events: &mut Vec<ComboEvent>) {
        assert!(
            self.current.is_none(),
            "SkillScheduler: activation while a current skill is playing"
        );

        let Some(next) = self.queue.pop_front() else {
            unreachable!("SkillScheduler: activation with empty queue");
        };

        let combo_stage = self.queue.len();
        self.current = Some(next);
        self.combo_stage = Some(combo_stage);
        self.activation_time = Some(now);

        skills.play(next, 0.0);

        crate::logger::log(&format!(
            "⚔️ Trigger combo: `{}` at {:.3}s (queued after: {})",
            skills.definition(next).name,
            now,
            combo_stage
        ));

        events.push(ComboEvent::Activated {
            skill: next,
            combo_stage,
        });
    }
}
