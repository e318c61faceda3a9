//! Input buffer: упорядоченный лог timestamped input символов.
//!
//! Буфер никогда не обрезается посередине комбо: только очищается целиком
//! (конец комбо, StopAttack, stale eviction).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Символ боевого ввода (закрытый алфавит A..G)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum InputSymbol {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl InputSymbol {
    pub const ALL: [InputSymbol; 7] = [
        InputSymbol::A,
        InputSymbol::B,
        InputSymbol::C,
        InputSymbol::D,
        InputSymbol::E,
        InputSymbol::F,
        InputSymbol::G,
    ];
}

/// Один записанный input (immutable после записи)
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct TimedInput {
    pub timestamp: f32,
    pub symbol: InputSymbol,
}

/// Append-only буфер ввода
///
/// Инвариант: timestamps монотонно не убывают.
#[derive(Debug, Clone, Default, Reflect)]
pub struct InputBuffer {
    entries: Vec<TimedInput>,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Добавить input в конец буфера.
    ///
    /// Timestamp из прошлого подтягивается до последнего записанного,
    /// чтобы сохранить монотонность.
    pub fn push(&mut self, symbol: InputSymbol, timestamp: f32) {
        let timestamp = match self.entries.last() {
            Some(last) if timestamp < last.timestamp => {
                crate::logger::log_warning(&format!(
                    "InputBuffer: out-of-order input {:?} at {:.3}s (last {:.3}s), clamped",
                    symbol, timestamp, last.timestamp
                ));
                last.timestamp
            }
            _ => timestamp,
        };

        self.entries.push(TimedInput { timestamp, symbol });
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Очистить буфер целиком, если последний input старше `max_age`.
    ///
    /// Returns true если буфер был очищен.
    pub fn evict_stale(&mut self, now: f32, max_age: f32) -> bool {
        let Some(newest) = self.entries.last() else {
            return false;
        };

        if now - newest.timestamp > max_age {
            self.entries.clear();
            return true;
        }

        false
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[TimedInput] {
        &self.entries
    }

    pub fn last_timestamp(&self) -> Option<f32> {
        self.entries.last().map(|entry| entry.timestamp)
    }

    /// Совпадает ли содержимое буфера с последовательностью целиком (длина + порядок)
    pub fn matches(&self, sequence: &[InputSymbol]) -> bool {
        self.entries.len() == sequence.len()
            && self
                .entries
                .iter()
                .zip(sequence)
                .all(|(entry, symbol)| entry.symbol == *symbol)
    }

    /// Буфер целиком совпадает с началом последовательности (сама последовательность тоже считается)
    pub fn is_prefix_of(&self, sequence: &[InputSymbol]) -> bool {
        self.entries.len() <= sequence.len()
            && self
                .entries
                .iter()
                .zip(sequence)
                .all(|(entry, symbol)| entry.symbol == *symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use InputSymbol::*;

    #[test]
    fn test_push_keeps_order() {
        let mut buffer = InputBuffer::new();
        buffer.push(A, 0.0);
        buffer.push(B, 0.1);
        buffer.push(A, 0.2);

        let symbols: Vec<_> = buffer.entries().iter().map(|e| e.symbol).collect();
        assert_eq!(symbols, vec![A, B, A]);
        assert_eq!(buffer.last_timestamp(), Some(0.2));
    }

    #[test]
    fn test_out_of_order_timestamp_clamped() {
        let mut buffer = InputBuffer::new();
        buffer.push(A, 1.0);
        buffer.push(B, 0.5);

        assert_eq!(buffer.entries()[1].timestamp, 1.0);
    }

    #[test]
    fn test_matches_requires_full_equality() {
        let mut buffer = InputBuffer::new();
        buffer.push(A, 0.0);
        buffer.push(B, 0.1);

        assert!(buffer.matches(&[A, B]));
        assert!(!buffer.matches(&[A])); // prefix
        assert!(!buffer.matches(&[B])); // suffix
        assert!(!buffer.matches(&[B, A])); // порядок
        assert!(!buffer.matches(&[A, B, C]));
    }

    #[test]
    fn test_is_prefix_of() {
        let mut buffer = InputBuffer::new();
        assert!(buffer.is_prefix_of(&[A, B]));

        buffer.push(A, 0.0);
        assert!(buffer.is_prefix_of(&[A, B]));
        assert!(buffer.is_prefix_of(&[A]));
        assert!(!buffer.is_prefix_of(&[B, A]));

        buffer.push(C, 0.1);
        assert!(!buffer.is_prefix_of(&[A, B]));
        assert!(!buffer.is_prefix_of(&[A]));
    }

    #[test]
    fn test_evict_stale_clears_wholesale() {
        let mut buffer = InputBuffer::new();
        buffer.push(A, 0.0);
        buffer.push(B, 0.4);

        // Последний input свежий → буфер не трогаем, даже если первый старый
        assert!(!buffer.evict_stale(0.8, 0.5));
        assert_eq!(buffer.len(), 2);

        assert!(buffer.evict_stale(1.0, 0.5));
        assert!(buffer.is_empty());
    }
}
