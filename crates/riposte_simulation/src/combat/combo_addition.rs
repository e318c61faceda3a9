//! Combo addition: clamped accumulator для combo scaling урона.
//!
//! - on_action: +action_value (clamp в [0, max_value])
//! - tick: после trigger_delay простоя линейно спадает к 0 со скоростью 1/recovery_time в секунду

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct ComboAdditionValue {
    /// Простой (секунды) после последнего action, после которого начинается спад
    pub trigger_delay: f32,
    pub max_value: f32,
    /// Прибавка за один action
    pub action_value: f32,
    /// Время спада на 1.0 единицу (0 = мгновенный сброс)
    pub recovery_time: f32,

    #[serde(skip)]
    value: f32,
    #[serde(skip)]
    last_action_time: f32,
}

impl Default for ComboAdditionValue {
    fn default() -> Self {
        Self::new(0.5, 1.0, 0.1, 0.6)
    }
}

impl ComboAdditionValue {
    pub fn new(trigger_delay: f32, max_value: f32, action_value: f32, recovery_time: f32) -> Self {
        Self {
            trigger_delay,
            max_value,
            action_value,
            recovery_time,
            value: 0.0,
            last_action_time: 0.0,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Нормализованное значение [0, 1] (для UI fill)
    pub fn fraction(&self) -> f32 {
        if self.max_value <= 0.0 {
            return 0.0;
        }
        self.value / self.max_value
    }

    /// Вызывать каждый кадр
    pub fn tick(&mut self, now: f32, delta: f32) {
        if now - self.last_action_time > self.trigger_delay {
            if self.recovery_time == 0.0 {
                self.value = 0.0;
            } else {
                self.value -= delta / self.recovery_time;
            }
            self.clamp_value();
        }
    }

    /// Вызывать после каждой атаки. Всегда клампит, никогда не отказывает.
    pub fn on_action(&mut self, now: f32) {
        self.last_action_time = now;
        self.value += self.action_value;
        self.clamp_value();
    }

    /// Advisory: влезет ли ещё один action без упора в max
    pub fn can_action(&self) -> bool {
        self.value + self.action_value <= self.max_value
    }

    pub fn threshold_reached(&self) -> bool {
        self.value >= self.max_value
    }

    pub fn reset(&mut self, now: f32) {
        self.last_action_time = now;
        self.value = 0.0;
    }

    fn clamp_value(&mut self) {
        self.value = self.value.clamp(0.0, self.max_value.max(0.0));
    }
}
