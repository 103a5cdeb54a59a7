//! Pool return + reactivation.

use std::time::Duration;

use bevy::prelude::*;

use super::{ActivateAgent, AgentPooled};
use crate::ai::{ActionTask, BehaviorState, NpcConfig, PerceptionTask};
use crate::components::{Agent, Health, Lifecycle};
use crate::ports::{AnimationCue, Animator, Collider, PoolHostHandle};

/// Компонент: вернуть агента в пул, когда Time<Fixed>::elapsed >= return_at
///
/// Ставится action loop'ом один раз при входе в Dying.
/// Отмена = удаление компонента.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolReturnAfter {
    pub return_at: Duration,
}

impl PoolReturnAfter {
    pub fn new(return_at: Duration) -> Self {
        Self { return_at }
    }
}

/// Pool reset полей агента (одинаково из любого состояния)
///
/// wander target и alert timestamp живут внутри BehaviorState - Idle их стирает.
pub fn reset_for_pool(health: &mut Health, state: &mut BehaviorState, lifecycle: &mut Lifecycle) {
    health.restore();
    *state = BehaviorState::Idle;
    *lifecycle = Lifecycle {
        active: false,
        terminal_handled: false,
        frozen: false,
    };
}

/// Система: pool return по таймеру
///
/// health = max, state = Idle, collider on, active = false,
/// periodic tasks сняты, PoolHost::deactivate.
pub fn pool_return_after_timeout(
    mut commands: Commands,
    mut agents: Query<
        (
            Entity,
            &PoolReturnAfter,
            &mut Health,
            &mut BehaviorState,
            &mut Lifecycle,
            Option<&mut Collider>,
        ),
        With<Agent>,
    >,
    mut pool_host: Option<ResMut<PoolHostHandle>>,
    time: Res<Time<Fixed>>,
    mut pooled_events: EventWriter<AgentPooled>,
) {
    let now = time.elapsed();

    for (entity, pool_return, mut health, mut state, mut lifecycle, collider) in agents.iter_mut() {
        if now < pool_return.return_at {
            continue;
        }

        reset_for_pool(&mut health, &mut state, &mut lifecycle);

        if let Some(mut collider) = collider {
            if let Err(err) = collider.0.set_enabled(true) {
                crate::log_error(&format!("♻️ Pool: {:?} collider re-enable failed: {}", entity, err));
            }
        }

        commands
            .entity(entity)
            .remove::<(PoolReturnAfter, PerceptionTask, ActionTask)>();

        if let Some(host) = pool_host.as_mut() {
            host.0.deactivate(entity);
        }

        pooled_events.write(AgentPooled { agent: entity });
        crate::log_info(&format!("♻️ Pool: {:?} reset and returned to pool", entity));
    }
}

/// Система: ActivateAgent → агент снова в симуляции с новыми periodic tasks
pub fn handle_activation(
    mut commands: Commands,
    mut activate_events: EventReader<ActivateAgent>,
    mut agents: Query<(&mut Lifecycle, &NpcConfig, Option<&mut Animator>), With<Agent>>,
) {
    for event in activate_events.read() {
        let Ok((mut lifecycle, config, animator)) = agents.get_mut(event.agent) else {
            crate::log_warning(&format!("ActivateAgent: {:?} is not an agent", event.agent));
            continue;
        };

        if lifecycle.active {
            crate::log(&format!("ActivateAgent: {:?} already active", event.agent));
            continue;
        }

        lifecycle.active = true;
        lifecycle.frozen = false;

        if let Some(mut animator) = animator {
            if let Err(err) = animator.apply(AnimationCue::Pose(None)) {
                crate::log_error(&format!("ActivateAgent: {:?} pose reset failed: {}", event.agent, err));
            }
        }

        commands
            .entity(event.agent)
            .insert((PerceptionTask::from_config(config), ActionTask::from_config(config)));

        crate::log_info(&format!("ActivateAgent: {:?} back from pool", event.agent));
    }
}
