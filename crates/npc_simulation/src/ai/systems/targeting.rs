//! Target binding - цель резолвится один раз, а не поиском по сцене каждый тик.

use bevy::prelude::*;

use crate::ai::{TrackedTarget, Tracking};
use crate::components::Agent;

/// Система: привязка агентов к цели
///
/// - Tracking { target: None } → первый TrackedTarget (если он уже есть в мире)
/// - Привязанная цель пропала (despawn) → снимаем привязку, ищем заново на следующих шагах
///
/// Агенты с явно заданной целью (`Tracking::new(entity)`) не трогаются, пока цель жива.
pub fn bind_targets(
    mut agents: Query<(Entity, &mut Tracking), With<Agent>>,
    tracked: Query<Entity, (With<TrackedTarget>, Without<Agent>)>,
    positions: Query<(), (With<Transform>, Without<Agent>)>,
) {
    for (agent, mut tracking) in agents.iter_mut() {
        if let Some(target) = tracking.target {
            if positions.get(target).is_ok() {
                continue;
            }

            crate::log_warning(&format!("🎯 {:?}: target {:?} lost, unbinding", agent, target));
            tracking.target = None;
        }

        if let Some(target) = tracked.iter().next() {
            tracking.target = Some(target);
            crate::log(&format!("🎯 {:?}: bound to target {:?}", agent, target));
        }
    }
}
