//! Playback driver: внешний timeline/animation player скилла.
//!
//! Scheduler считает play/stop синхронными и идемпотентными.
//! Реальный player живёт в движке; здесь только контракт + headless clock.

/// Контракт timeline player'а, привязанного к одному skill asset
pub trait SkillPlayback: Send + Sync {
    /// Начать воспроизведение с позиции `from` (секунды)
    fn play(&mut self, from: f32);

    /// Остановить воспроизведение
    fn stop(&mut self);

    /// Текущая позиция (секунды)
    fn current_time(&self) -> f32;

    /// Полная длина timeline (секунды)
    fn duration(&self) -> f32;

    /// Продвинуть время (host вызывает раз в тик). Драйверы движка
    /// тикают сами и могут оставить no-op.
    fn advance(&mut self, _delta: f32) {}
}

/// Headless timeline: просто часы от play() до stop() или конца duration
#[derive(Debug, Clone, Default)]
pub struct TimelineClock {
    duration: f32,
    time: f32,
    playing: bool,
}

impl TimelineClock {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            time: 0.0,
            playing: false,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

impl SkillPlayback for TimelineClock {
    fn play(&mut self, from: f32) {
        self.time = from.clamp(0.0, self.duration);
        self.playing = true;
    }

    fn stop(&mut self) {
        self.playing = false;
    }

    fn current_time(&self) -> f32 {
        self.time
    }

    fn duration(&self) -> f32 {
        self.duration
    }

    fn advance(&mut self, delta: f32) {
        if !self.playing {
            return;
        }

        self.time += delta;
        if self.time >= self.duration {
            // Доиграли и встали на последнем кадре
            self.time = self.duration;
            self.playing = false;
        }
    }
}
