//! ComboController: компонент, который владеет всей combo логикой entity:
//! input buffer → matcher → scheduler.
//!
//! Host вызывает `tick(now, delta)` ровно один раз за кадр/fixed tick.

use bevy::prelude::*;

use super::config::ComboConfig;
use super::input::{InputBuffer, InputSymbol};
use super::matcher::{can_still_match, SkillMatcher};
use super::scheduler::{ComboEvent, SchedulerState, SkillScheduler};
use super::skill::{SkillId, SkillSet};

#[derive(Component, Debug)]
pub struct ComboController {
    skills: SkillSet,
    buffer: InputBuffer,
    matcher: SkillMatcher,
    scheduler: SkillScheduler,
    config: ComboConfig,
    /// Время последнего успешного матча
    last_match_time: Option<f32>,
}

impl ComboController {
    pub fn new(skills: SkillSet, config: ComboConfig) -> Self {
        Self {
            skills,
            buffer: InputBuffer::new(),
            matcher: SkillMatcher::new(),
            scheduler: SkillScheduler::new(config.stop_previous_after),
            config,
            last_match_time: None,
        }
    }

    pub fn skills(&self) -> &SkillSet {
        &self.skills
    }

    pub fn buffer(&self) -> &InputBuffer {
        &self.buffer
    }

    pub fn scheduler(&self) -> &SkillScheduler {
        &self.scheduler
    }

    pub fn config(&self) -> &ComboConfig {
        &self.config
    }

    pub fn input_stage(&self) -> Option<usize> {
        self.matcher.input_stage()
    }

    pub fn last_match_time(&self) -> Option<f32> {
        self.last_match_time
    }

    pub fn current_skill(&self) -> Option<SkillId> {
        self.scheduler.current()
    }

    pub fn state(&self, now: f32) -> SchedulerState {
        self.scheduler.state(now, &self.skills)
    }

    /// Записать input (матчинг произойдёт на ближайшем tick)
    pub fn on_combat_input(&mut self, symbol: InputSymbol, timestamp: f32) {
        self.buffer.push(symbol, timestamp);
    }

    /// Один тик: stale eviction → match → scheduler → playback advance.
    ///
    /// Returns переходы за этот тик в порядке возникновения.
    pub fn tick(&mut self, now: f32, delta: f32) -> Vec<ComboEvent> {
        let mut events = Vec::new();

        if let Some(max_age) = self.config.stale_input_timeout {
            if self.buffer.evict_stale(now, max_age) {
                self.matcher.reset();
                crate::logger::log(&format!("Combo input buffer expired at {:.3}s", now));
            }
        }

        if let Some(matched) = self.matcher.scan(&self.buffer, &self.skills) {
            self.last_match_time = Some(now);
            self.scheduler.enqueue(matched, &mut events);
        } else if self.is_dead_end_while_idle() {
            // Комбо не идёт и не закончится само: без очистки буфер растёт вечно
            crate::logger::log(&format!(
                "Combo input {:?} matches nothing, buffer reset at {:.3}s",
                self.buffer.entries().iter().map(|e| e.symbol).collect::<Vec<_>>(),
                now
            ));
            self.clear_input_buffer();
        }

        if self.scheduler.tick(now, &mut self.skills, &mut events) {
            self.clear_input_buffer();
        }

        self.skills.advance_all(delta);

        events
    }

    /// Явное прерывание атаки (stagger, смерть, отмена)
    pub fn stop_attack(&mut self) -> Vec<ComboEvent> {
        let mut events = Vec::new();
        self.scheduler.stop_attack(&mut self.skills, &mut events);
        self.clear_input_buffer();
        events
    }

    fn is_dead_end_while_idle(&self) -> bool {
        self.scheduler.current().is_none()
            && self.scheduler.queue_len() == 0
            && !self.buffer.is_empty()
            && !can_still_match(&self.buffer, &self.skills)
    }

    /// Очистить буфер целиком (stage counter сбрасывается вместе с ним)
    pub fn clear_input_buffer(&mut self) {
        self.buffer.clear();
        self.matcher.reset();
    }
}
