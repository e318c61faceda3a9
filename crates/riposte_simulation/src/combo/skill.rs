//! Skill definitions + per-entity skill set.
//!
//! Definitions авторятся дизайнером (TOML), валидируются один раз при
//! регистрации и дальше не меняются.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::input::InputSymbol;
use super::playback::{SkillPlayback, TimelineClock};

/// Индекс скилла в `SkillSet` (порядок регистрации)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SkillId(pub usize);

/// Designer-authored описание скилла
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDefinition {
    pub name: String,
    /// Полная input последовательность, запускающая скилл
    pub inputs: Vec<InputSymbol>,
    /// Recovery marker (секунды от активации). Нет маркера → 0.
    #[serde(default)]
    pub recovery_time: f32,
    /// Полная длина скилла (секунды от активации)
    pub duration: f32,
}

impl SkillDefinition {
    pub fn new(name: impl Into<String>, inputs: Vec<InputSymbol>, recovery_time: f32, duration: f32) -> Self {
        Self {
            name: name.into(),
            inputs,
            recovery_time,
            duration,
        }
    }

    /// Load-time проверка: непустая последовательность, 0 ≤ recovery ≤ duration
    pub fn validate(&self) -> Result<(), SkillSetError> {
        if self.inputs.is_empty() {
            return Err(SkillSetError::EmptyInputSequence {
                name: self.name.clone(),
            });
        }

        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(SkillSetError::InvalidDuration {
                name: self.name.clone(),
                duration: self.duration,
            });
        }

        if !self.recovery_time.is_finite() || self.recovery_time < 0.0 {
            return Err(SkillSetError::InvalidRecoveryTime {
                name: self.name.clone(),
                recovery_time: self.recovery_time,
            });
        }

        if self.recovery_time > self.duration {
            return Err(SkillSetError::RecoveryExceedsDuration {
                name: self.name.clone(),
                recovery_time: self.recovery_time,
                duration: self.duration,
            });
        }

        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum SkillSetError {
    #[error("skill `{name}` has an empty input sequence")]
    EmptyInputSequence { name: String },

    #[error("skill `{name}` has invalid duration {duration}")]
    InvalidDuration { name: String, duration: f32 },

    #[error("skill `{name}` has invalid recovery time {recovery_time}")]
    InvalidRecoveryTime { name: String, recovery_time: f32 },

    #[error("skill `{name}`: recovery time {recovery_time} exceeds duration {duration}")]
    RecoveryExceedsDuration {
        name: String,
        recovery_time: f32,
        duration: f32,
    },

    #[error("failed to parse skill set: {0}")]
    Parse(#[from] toml::de::Error),
}

/// TOML asset со списком скиллов
///
/// ```toml
/// [[skills]]
/// name = "slash_1"
/// inputs = ["A"]
/// recovery_time = 0.4
/// duration = 1.0
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillSetAsset {
    #[serde(default)]
    pub skills: Vec<SkillDefinition>,
}

impl SkillSetAsset {
    pub fn from_toml_str(source: &str) -> Result<Self, SkillSetError> {
        let asset: SkillSetAsset = toml::from_str(source)?;
        for definition in &asset.skills {
            definition.validate()?;
        }
        Ok(asset)
    }
}

/// Зарегистрированный скилл: definition + playback handle
pub struct Skill {
    definition: SkillDefinition,
    playback: Box<dyn SkillPlayback>,
}

impl Skill {
    pub fn definition(&self) -> &SkillDefinition {
        &self.definition
    }

    pub fn playback(&self) -> &dyn SkillPlayback {
        self.playback.as_ref()
    }
}

impl std::fmt::Debug for Skill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Skill")
            .field("definition", &self.definition)
            .field("playback_time", &self.playback.current_time())
            .finish()
    }
}

/// Скиллы одного entity в порядке регистрации (порядок = приоритет матчинга)
#[derive(Debug, Default)]
pub struct SkillSet {
    skills: Vec<Skill>,
}

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Headless skill set: у каждого скилла свой `TimelineClock`
    pub fn from_definitions(definitions: Vec<SkillDefinition>) -> Result<Self, SkillSetError> {
        let mut set = Self::new();
        for definition in definitions {
            set.register_headless(definition)?;
        }
        Ok(set)
    }

    pub fn from_toml_str(source: &str) -> Result<Self, SkillSetError> {
        Self::from_definitions(SkillSetAsset::from_toml_str(source)?.skills)
    }

    /// Зарегистрировать скилл с внешним playback driver
    pub fn register(
        &mut self,
        definition: SkillDefinition,
        playback: Box<dyn SkillPlayback>,
    ) -> Result<SkillId, SkillSetError> {
        definition.validate()?;

        if self.skills.iter().any(|s| s.definition.inputs == definition.inputs) {
            // Первый зарегистрированный всегда выигрывает: этот никогда не сматчится
            crate::logger::log_warning(&format!(
                "SkillSet: skill `{}` shares input sequence {:?} with an earlier skill, it will never match",
                definition.name, definition.inputs
            ));
        }

        if (playback.duration() - definition.duration).abs() > 1e-3 {
            crate::logger::log_warning(&format!(
                "SkillSet: skill `{}` timeline length {:.3}s differs from authored duration {:.3}s",
                definition.name,
                playback.duration(),
                definition.duration
            ));
        }

        let id = SkillId(self.skills.len());
        self.skills.push(Skill { definition, playback });
        Ok(id)
    }

    pub fn register_headless(&mut self, definition: SkillDefinition) -> Result<SkillId, SkillSetError> {
        let clock = TimelineClock::new(definition.duration);
        self.register(definition, Box::new(clock))
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn get(&self, id: SkillId) -> Option<&Skill> {
        self.skills.get(id.0)
    }

    /// # Panics
    /// Если `id` не из этого skill set (programming error)
    pub fn definition(&self, id: SkillId) -> &SkillDefinition {
        &self.skill(id).definition
    }

    pub fn find_by_name(&self, name: &str) -> Option<SkillId> {
        self.skills
            .iter()
            .position(|s| s.definition.name == name)
            .map(SkillId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SkillId, &SkillDefinition)> {
        self.skills
            .iter()
            .enumerate()
            .map(|(index, skill)| (SkillId(index), &skill.definition))
    }

    pub(crate) fn play(&mut self, id: SkillId, from: f32) {
        self.skill_mut(id).playback.play(from);
    }

    pub(crate) fn stop(&mut self, id: SkillId) {
        self.skill_mut(id).playback.stop();
    }

    pub(crate) fn advance_all(&mut self, delta: f32) {
        for skill in &mut self.skills {
            skill.playback.advance(delta);
        }
    }

    fn skill(&self, id: SkillId) -> &Skill {
        match self.skills.get(id.0) {
            Some(skill) => skill,
            None => panic!("SkillSet: unknown {:?} (registered: {})", id, self.skills.len()),
        }
    }

    fn skill_mut(&mut self, id: SkillId) -> &mut Skill {
        let registered = self.skills.len();
        match self.skills.get_mut(id.0) {
            Some(skill) => skill,
            None => panic!("SkillSet: unknown {:?} (registered: {})", id, registered),
        }
    }
}
