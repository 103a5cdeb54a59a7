//! Perception tick system.

use bevy::prelude::*;

use crate::ai::{perception, BehaviorState, NpcConfig, PerceptionTask, StateChanged, Tracking};
use crate::components::{Agent, Lifecycle};
use crate::error::TickError;
use crate::geometry;

/// Система: perception tick (классификация состояния)
///
/// Каждый агент тикает по своему PerceptionTask таймеру.
/// - Dying → задача снимается (терминальный выход perception loop)
/// - Цель недоступна → состояние держится, повтор на следующем тике
/// - Ошибка одного агента логируется и не останавливает остальных
pub fn perception_tick(
    mut commands: Commands,
    mut agents: Query<
        (
            Entity,
            &mut BehaviorState,
            &mut PerceptionTask,
            &NpcConfig,
            &Tracking,
            &Transform,
            &Lifecycle,
        ),
        With<Agent>,
    >,
    targets: Query<&Transform, Without<Agent>>,
    time: Res<Time<Fixed>>,
    mut state_events: EventWriter<StateChanged>,
) {
    let now = time.elapsed();

    for (entity, mut state, mut task, config, tracking, transform, lifecycle) in agents.iter_mut() {
        if !lifecycle.is_running() {
            continue;
        }

        task.timer.tick(time.delta());
        if !task.timer.just_finished() {
            continue;
        }

        if state.is_dying() {
            commands.entity(entity).remove::<PerceptionTask>();
            crate::log(&format!("AI: {:?} perception stopped (Dying)", entity));
            continue;
        }

        let distance = tracking
            .target
            .and_then(|target| targets.get(target).ok())
            .map(|target| geometry::distance(transform.translation, target.translation));

        match perception::perceive(*state, distance, now, config) {
            Ok(next) => {
                if next != *state {
                    crate::log(&format!("AI: {:?} {:?} → {:?}", entity, state.kind(), next.kind()));
                    state_events.write(StateChanged {
                        agent: entity,
                        from: state.kind(),
                        to: next.kind(),
                    });
                    *state = next;
                }
            }
            Err(TickError::TargetUnavailable) => {
                crate::log(&format!("AI: {:?} target unavailable, holding {:?}", entity, state.kind()));
            }
            Err(err) => {
                crate::log_error(&format!("AI: {:?} perception tick failed: {}", entity, err));
            }
        }
    }
}
