//! Базовые компоненты акторов: Actor, Health

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Актор (игрок, враг): базовый компонент боевой сущности
///
/// Автоматически добавляет Health и Attacker через Required Components.
/// ComboController добавляется отдельно (ему нужен skill set).
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
#[require(Health, crate::combat::Attacker)]
pub struct Actor {
    /// Stable ID команды (свои не бьют своих: решает host hit detection)
    pub team_id: u64,
}

/// Результат `Health::on_damage`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageOutcome {
    /// Invincible или уже мёртв: ничего не изменилось, нотификаций нет
    Rejected,
    /// Урон прошёл, актор жив
    Damaged { amount: f32 },
    /// Урон прошёл и добил (destruction notification ровно один раз)
    Killed { amount: f32 },
}

impl DamageOutcome {
    pub fn is_applied(&self) -> bool {
        !matches!(self, DamageOutcome::Rejected)
    }

    pub fn is_kill(&self) -> bool {
        matches!(self, DamageOutcome::Killed { .. })
    }
}

/// Здоровье актора
///
/// Инвариант (при `clamp`): 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct Health {
    pub current: f32,
    pub max: f32,
    pub invincible: bool,
    /// Клампить в [0, max] после урона/лечения
    pub clamp: bool,
    /// Не деспавнить после смерти (пулинг, боссы с катсценой)
    pub dont_destroy: bool,
    /// Задержка деспавна после смерти (секунды)
    pub destroy_delay: f32,
    /// Время последнего урона (для UI decay-lag эффектов)
    #[serde(skip)]
    pub last_damage_time: Option<f32>,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self {
            current: max,
            max,
            invincible: false,
            clamp: true,
            dont_destroy: false,
            destroy_delay: 0.0,
            last_damage_time: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    /// Применить урон.
    ///
    /// Rejected если invincible или уже current ≤ 0.
    pub fn on_damage(&mut self, amount: f32, now: f32) -> DamageOutcome {
        if self.invincible || !self.is_alive() {
            return DamageOutcome::Rejected;
        }

        self.current -= amount;
        self.last_damage_time = Some(now);

        if self.clamp {
            self.current = self.current.clamp(0.0, self.max);
        }

        if self.is_alive() {
            DamageOutcome::Damaged { amount }
        } else {
            DamageOutcome::Killed { amount }
        }
    }

    /// Урон на всё оставшееся здоровье
    pub fn kill(&mut self, now: f32) -> DamageOutcome {
        self.on_damage(self.current, now)
    }

    /// Returns сколько здоровья реально добавилось (после clamp)
    pub fn heal(&mut self, amount: f32) -> f32 {
        let before = self.current;
        self.current += amount;
        if self.clamp {
            self.current = self.current.clamp(0.0, self.max);
        }
        self.current - before
    }

    /// Полное здоровье (респаун/пулинг). Returns добавленное здоровье.
    pub fn reset(&mut self) -> f32 {
        let before = self.current;
        self.current = self.max;
        self.current - before
    }

    /// Поменять максимум; `fill`: сразу вылечить до полного
    pub fn set_max(&mut self, max: f32, fill: bool) {
        self.max = max;
        if fill {
            self.current = max;
        }
    }

    /// Доля здоровья [0, 1] (для health bars)
    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            return 0.0;
        }
        (self.current / self.max).clamp(0.0, 1.0)
    }
}
