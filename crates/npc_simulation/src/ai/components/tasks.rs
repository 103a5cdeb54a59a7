//! Periodic tasks + target binding.
//!
//! Каждый агент несёт два независимых repeating таймера (perception и action).
//! Отмена задачи = удаление компонента, рестарт = вставка нового.

use std::time::Duration;

use bevy::prelude::*;

use super::NpcConfig;

/// Perception loop агента (классификация состояния по дистанции)
#[derive(Component, Debug, Clone)]
pub struct PerceptionTask {
    pub timer: Timer,
}

impl PerceptionTask {
    pub fn new(period: Duration) -> Self {
        Self {
            timer: Timer::new(period, TimerMode::Repeating),
        }
    }

    pub fn from_config(config: &NpcConfig) -> Self {
        Self::new(config.tick_period())
    }
}

/// Action loop агента (исполнение текущего состояния через ports)
#[derive(Component, Debug, Clone)]
pub struct ActionTask {
    pub timer: Timer,
}

impl ActionTask {
    /// `phase_offset` сдвигает первый тик раньше на offset (фазы perception/action не обязаны совпадать)
    pub fn new(period: Duration, phase_offset: Duration) -> Self {
        let mut timer = Timer::new(period, TimerMode::Repeating);
        timer.set_elapsed(phase_offset.min(period));
        Self { timer }
    }

    pub fn from_config(config: &NpcConfig) -> Self {
        Self::new(config.tick_period(), config.action_phase_offset())
    }
}

/// Маркер: сущность, которую отслеживают агенты (игрок)
///
/// Ищется один раз при биндинге, не каждый тик.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct TrackedTarget;

/// Привязка агента к цели
///
/// `None` - цель ещё не найдена (perception держит текущее состояние).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Tracking {
    pub target: Option<Entity>,
}

impl Tracking {
    pub fn new(target: Entity) -> Self {
        Self { target: Some(target) }
    }

    pub fn unbound() -> Self {
        Self { target: None }
    }
}
