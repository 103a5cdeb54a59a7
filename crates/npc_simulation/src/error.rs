//! Ошибки симуляции
//!
//! - ConfigError: фатальная мисконфигурация, ловится при spawn (не в тике)
//! - PortError: внешний collaborator (navmesh, animator) не смог выполнить вызов
//! - TickError: ошибка одного тика одного агента, логируется на границе тика
//! - SpawnError: не удалось собрать агента (config или animation table)

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid range configuration: attack_range {attack_range} > alert_range {alert_range}")]
    InvalidRangeConfiguration { attack_range: f32, alert_range: f32 },

    #[error("invalid wander bounds: min {min} must be finite, >= 0 and <= max {max}")]
    InvalidWanderBounds { min: f32, max: f32 },

    /// Период тика (после округления до миллисекунд)
    #[error("{name} must be positive (at least 1ms)")]
    NonPositivePeriod { name: &'static str },

    /// Задержки и сдвиги: 0 допустим
    #[error("{name} must not be negative")]
    NegativeDuration { name: &'static str },

    #[error("max_health must be positive")]
    NonPositiveHealth,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PortError {
    #[error("{port} unavailable: {reason}")]
    Unavailable { port: &'static str, reason: String },

    #[error("animation parameter '{0}' not found")]
    UnknownParameter(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TickError {
    /// Recoverable: держим текущее состояние, пробуем на следующем тике
    #[error("tracked target unavailable")]
    TargetUnavailable,

    #[error(transparent)]
    Port(#[from] PortError),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpawnError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("animation table: {0}")]
    Animation(#[from] PortError),
}
