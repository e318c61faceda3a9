//! Combo configuration.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Параметры combo state machine одного entity
#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct ComboConfig {
    /// Сколько previous скилл доигрывает после активации нового current (секунды)
    pub stop_previous_after: f32,
    /// Очищать буфер, если последний input старше N секунд (None = никогда)
    pub stale_input_timeout: Option<f32>,
}

impl Default for ComboConfig {
    fn default() -> Self {
        Self {
            stop_previous_after: 0.2,
            stale_input_timeout: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combo_config_default() {
        let config = ComboConfig::default();
        assert_eq!(config.stop_previous_after, 0.2);
        assert_eq!(config.stale_input_timeout, None);
    }

    #[test]
    fn test_combo_config_partial_toml() {
        let config: ComboConfig = toml::from_str("stale_input_timeout = 0.5").unwrap();
        assert_eq!(config.stop_previous_after, 0.2);
        assert_eq!(config.stale_input_timeout, Some(0.5));
    }
}
