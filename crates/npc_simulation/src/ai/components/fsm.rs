//! FSM AI components (behavior state, per-agent config).

use std::time::Duration;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// AI FSM состояния
///
/// Данные, валидные только в одном состоянии, живут внутри варианта:
/// wander точка существует только в Wandering, alert timestamp - только в Alerted.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub enum BehaviorState {
    /// Idle - стоим; action loop сгенерирует wander точку и перейдёт в Wandering
    #[default]
    Idle,

    /// Wandering - идём к случайной точке
    Wandering {
        /// Текущая wander точка (сбрасывается при достижении → Idle)
        target: Vec3,
    },

    /// Alerted - цель в alert radius, держим hysteresis hold перед преследованием
    Alerted {
        /// Время входа в Alerted (Time<Fixed>::elapsed)
        entered_at: Duration,
    },

    /// Pursuing - преследуем цель
    Pursuing,

    /// Attacking - цель в радиусе атаки
    Attacking,

    /// Dying - терминальное состояние (выход только через pool reset)
    Dying,
}

/// Вид состояния без данных (для UI/debug и логов)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum StateKind {
    Idle,
    Wandering,
    Alerted,
    Pursuing,
    Attacking,
    Dying,
}

impl BehaviorState {
    pub fn kind(&self) -> StateKind {
        match self {
            BehaviorState::Idle => StateKind::Idle,
            BehaviorState::Wandering { .. } => StateKind::Wandering,
            BehaviorState::Alerted { .. } => StateKind::Alerted,
            BehaviorState::Pursuing => StateKind::Pursuing,
            BehaviorState::Attacking => StateKind::Attacking,
            BehaviorState::Dying => StateKind::Dying,
        }
    }

    pub fn is_dying(&self) -> bool {
        matches!(self, BehaviorState::Dying)
    }

    pub fn wander_target(&self) -> Option<Vec3> {
        match self {
            BehaviorState::Wandering { target } => Some(*target),
            _ => None,
        }
    }

    pub fn alert_entered_at(&self) -> Option<Duration> {
        match self {
            BehaviorState::Alerted { entered_at } => Some(*entered_at),
            _ => None,
        }
    }
}

/// Параметры AI агента
///
/// Времена в секундах (f32), в Duration переводятся с точностью до миллисекунды -
/// так hold/period сравнения не зависят от f32 округления.
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct NpcConfig {
    /// Радиус атаки (метры)
    pub attack_range: f32,
    /// Радиус обнаружения/alert (метры), >= attack_range
    pub alert_range: f32,
    /// Hysteresis hold в Alerted до перехода в Pursuing (секунды)
    pub alert_hold: f32,
    /// Период perception/action тиков (секунды)
    pub tick_period: f32,
    /// Сдвиг фазы action тика относительно perception (секунды)
    pub action_phase_offset: f32,
    /// Задержка между смертью и возвратом в пул (секунды)
    pub pool_return_delay: f32,
    /// Максимальное HP (восстанавливается при pool reset)
    pub max_health: u32,
    /// Wander: минимальная дистанция до новой точки (метры)
    pub wander_min: f32,
    /// Wander: максимальная дистанция до новой точки (метры)
    pub wander_max: f32,
    /// Скорость поворота к цели в Alerted (slerp factor per second)
    pub turn_speed: f32,
}

impl Default for NpcConfig {
    fn default() -> Self {
        Self {
            attack_range: 2.0,
            alert_range: 10.0,
            alert_hold: 2.0,
            tick_period: 0.3,
            action_phase_offset: 0.0,
            pool_return_delay: 3.0,
            max_health: 100,
            wander_min: 1.0,
            wander_max: 3.0,
            turn_speed: 5.0,
        }
    }
}

impl NpcConfig {
    /// Проверка конфига при spawn (мисконфигурация - не runtime ошибка тика)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.attack_range <= self.alert_range) {
            return Err(ConfigError::InvalidRangeConfiguration {
                attack_range: self.attack_range,
                alert_range: self.alert_range,
            });
        }

        // gen_range требует конечный диапазон
        let wander_finite = self.wander_min.is_finite() && self.wander_max.is_finite();
        if !(wander_finite && self.wander_min >= 0.0 && self.wander_min <= self.wander_max) {
            return Err(ConfigError::InvalidWanderBounds {
                min: self.wander_min,
                max: self.wander_max,
            });
        }

        // Период считается после округления до ms: 0.0004s → 0ms → таймер без периода
        if !(self.tick_period > 0.0) || self.tick_period().is_zero() {
            return Err(ConfigError::NonPositivePeriod { name: "tick_period" });
        }
        if !(self.alert_hold >= 0.0) {
            return Err(ConfigError::NegativeDuration { name: "alert_hold" });
        }
        if !(self.pool_return_delay >= 0.0) {
            return Err(ConfigError::NegativeDuration { name: "pool_return_delay" });
        }
        if !(self.action_phase_offset >= 0.0) {
            return Err(ConfigError::NegativeDuration { name: "action_phase_offset" });
        }

        if self.max_health == 0 {
            return Err(ConfigError::NonPositiveHealth);
        }

        Ok(())
    }

    pub fn alert_hold(&self) -> Duration {
        seconds_to_duration(self.alert_hold)
    }

    pub fn tick_period(&self) -> Duration {
        seconds_to_duration(self.tick_period)
    }

    pub fn action_phase_offset(&self) -> Duration {
        seconds_to_duration(self.action_phase_offset)
    }

    pub fn pool_return_delay(&self) -> Duration {
        seconds_to_duration(self.pool_return_delay)
    }
}

fn seconds_to_duration(seconds: f32) -> Duration {
    Duration::from_millis((seconds.max(0.0) * 1000.0).round() as u64)
}
