//! Skill matcher: whole-sequence match буфера против зарегистрированных скиллов.
//!
//! Никакого suffix/prefix матчинга: одна ошибка в вводе ломает всю цепочку,
//! игрок начинает заново после очистки буфера.

use super::input::InputBuffer;
use super::skill::{SkillId, SkillSet};

/// Первый (в порядке регистрации) скилл, чья последовательность равна буферу целиком
pub fn match_sequence(buffer: &InputBuffer, skills: &SkillSet) -> Option<SkillId> {
    if buffer.is_empty() {
        return None;
    }

    skills
        .iter()
        .find(|(_, definition)| buffer.matches(&definition.inputs))
        .map(|(id, _)| id)
}

/// Может ли буфер ещё дорасти до какого-нибудь скилла (false = тупик, только очистка)
pub fn can_still_match(buffer: &InputBuffer, skills: &SkillSet) -> bool {
    skills
        .iter()
        .any(|(_, definition)| buffer.is_prefix_of(&definition.inputs))
}

/// Состояние матчинга одного entity
///
/// - `input_stage`: длина буфера на последнем успешном матче (combo stage)
/// - `scanned_len`: длина буфера на последнем скане (не пересканируем без нового input)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkillMatcher {
    input_stage: Option<usize>,
    scanned_len: usize,
}

impl SkillMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input_stage(&self) -> Option<usize> {
        self.input_stage
    }

    /// Вызывается вместе с очисткой буфера
    pub fn reset(&mut self) {
        self.input_stage = None;
        self.scanned_len = 0;
    }

    /// Скан буфера после новых append'ов.
    ///
    /// На матче двигает input stage до длины буфера. Returns найденный скилл.
    pub fn scan(&mut self, buffer: &InputBuffer, skills: &SkillSet) -> Option<SkillId> {
        let len = buffer.len();
        if len == self.scanned_len {
            return None;
        }
        self.scanned_len = len;

        if self.input_stage.is_some_and(|stage| len <= stage) {
            return None;
        }

        let matched = match_sequence(buffer, skills)?;
        self.input_stage = Some(len);
        Some(matched)
    }
}
