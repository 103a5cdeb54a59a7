//! Victory freeze - агент останавливается, но не умирает.

use bevy::prelude::*;

use super::VictorySignal;
use crate::ai::{ActionTask, BehaviorState, PerceptionTask};
use crate::components::{Agent, Lifecycle};
use crate::ports::{Locomotion, LocomotionDirective};

/// Система: VictorySignal → freeze
///
/// - locomotion halt, оба periodic task снимаются, state не трогается
/// - pool return НЕ планируется
/// - повторный сигнал - no-op
/// - Dying агент игнорирует сигнал: смерть имеет приоритет над freeze
pub fn handle_victory(
    mut commands: Commands,
    mut victory_events: EventReader<VictorySignal>,
    mut agents: Query<(Entity, &BehaviorState, &mut Lifecycle, Option<&mut Locomotion>), With<Agent>>,
) {
    for event in victory_events.read() {
        for (entity, state, mut lifecycle, locomotion) in agents.iter_mut() {
            if event.agent.is_some_and(|agent| agent != entity) {
                continue;
            }

            if !lifecycle.active || lifecycle.frozen {
                continue;
            }

            if state.is_dying() || lifecycle.terminal_handled {
                crate::log(&format!("🏆 Victory: {:?} is dying, death sequence wins", entity));
                continue;
            }

            if let Some(mut locomotion) = locomotion {
                if let Err(err) = LocomotionDirective::Halt.apply(locomotion.0.as_mut()) {
                    crate::log_error(&format!("🏆 Victory: {:?} halt failed: {}", entity, err));
                }
            }

            lifecycle.frozen = true;
            commands.entity(entity).remove::<(PerceptionTask, ActionTask)>();

            crate::log_info(&format!("🏆 Victory: {:?} frozen in {:?}", entity, state.kind()));
        }
    }
}
