//! Perception - классификатор состояния по дистанции до цели
//!
//! Порядок проверок:
//! 1. Dying - терминально, не меняется
//! 2. distance <= attack_range → Attacking (атака доминирует, даже сразу после alert hold)
//! 3. distance <= alert_range → Alerted (hold) → Pursuing
//! 4. иначе → Idle (Wandering продолжает идти к своей точке)
//!
//! Граница считается "внутри" (`<=`).

use std::time::Duration;

use super::components::{BehaviorState, NpcConfig};
use crate::error::TickError;

/// Следующее состояние при известной дистанции
pub fn classify(current: BehaviorState, distance: f32, now: Duration, config: &NpcConfig) -> BehaviorState {
    if current.is_dying() {
        return current;
    }

    if distance <= config.attack_range {
        return BehaviorState::Attacking;
    }

    if distance <= config.alert_range {
        return match current {
            BehaviorState::Pursuing => BehaviorState::Pursuing,
            BehaviorState::Alerted { entered_at } => {
                if now.saturating_sub(entered_at) >= config.alert_hold() {
                    BehaviorState::Pursuing
                } else {
                    current
                }
            }
            _ => BehaviorState::Alerted { entered_at: now },
        };
    }

    match current {
        BehaviorState::Wandering { .. } => current,
        _ => BehaviorState::Idle,
    }
}

/// Perception тик: дистанция может быть недоступна (цель не найдена / despawned)
///
/// Dying проверяется до цели - терминальное состояние не зависит от её наличия.
pub fn perceive(
    current: BehaviorState,
    distance: Option<f32>,
    now: Duration,
    config: &NpcConfig,
) -> Result<BehaviorState, TickError> {
    if current.is_dying() {
        return Ok(current);
    }

    let distance = distance.ok_or(TickError::TargetUnavailable)?;
    Ok(classify(current, distance, now, config))
}
