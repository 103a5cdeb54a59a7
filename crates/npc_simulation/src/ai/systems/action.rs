//! Action tick system (state → ports).

use bevy::prelude::*;

use crate::ai::action::{plan_action, ActionContext, ActionPlan};
use crate::ai::{ActionTask, BehaviorState, NpcConfig, StateChanged, Tracking};
use crate::components::{Agent, Lifecycle};
use crate::error::TickError;
use crate::lifecycle::{AgentDied, PoolReturnAfter};
use crate::ports::{Animator, Collider, Locomotion};
use crate::DeterministicRng;

/// Система: action tick
///
/// Читает текущий BehaviorState (что бы perception туда ни записал) и выполняет ActionPlan:
/// 1. locomotion directive (ровно одна)
/// 2. Wandering: остаток пути до только что выданной точки
/// 3. facing / collider / animation cue (максимум один)
///
/// Micro-transition (Idle ↔ Wandering) коммитится только если ports отработали без ошибок.
/// Первый тик в Dying: collider off, PoolReturnAfter, AgentDied, action task снимается.
pub fn action_tick(
    mut commands: Commands,
    mut agents: Query<
        (
            Entity,
            &mut BehaviorState,
            &mut ActionTask,
            &NpcConfig,
            &Tracking,
            &mut Transform,
            &mut Lifecycle,
            &mut Locomotion,
            &mut Animator,
            &mut Collider,
        ),
        With<Agent>,
    >,
    targets: Query<&Transform, Without<Agent>>,
    time: Res<Time<Fixed>>,
    mut rng: ResMut<DeterministicRng>,
    mut state_events: EventWriter<StateChanged>,
    mut died_events: EventWriter<AgentDied>,
) {
    let now = time.elapsed();

    for (
        entity,
        mut state,
        mut task,
        config,
        tracking,
        mut transform,
        mut lifecycle,
        mut locomotion,
        mut animator,
        mut collider,
    ) in agents.iter_mut()
    {
        if !lifecycle.is_running() {
            continue;
        }

        task.timer.tick(time.delta());
        if !task.timer.just_finished() {
            continue;
        }

        let ctx = action_context(&task, tracking, &transform, &lifecycle, &targets);
        let plan = plan_action(*state, &ctx, config, &mut rng.rng);

        if plan.terminal {
            // Exactly-once: помечаем до вызовов ports,
            // ошибка port'а не должна повторить death sequence
            lifecycle.terminal_handled = true;
            commands
                .entity(entity)
                .insert(PoolReturnAfter::new(now + config.pool_return_delay()))
                .remove::<ActionTask>();
            died_events.write(AgentDied { agent: entity });
            crate::log_info(&format!(
                "💀 {:?} died, pool return in {:.1}s",
                entity, config.pool_return_delay
            ));
        }

        let result = execute_plan(plan, &mut locomotion, &mut animator, &mut collider, &mut transform);
        let executed = match result {
            Ok(executed) => executed,
            Err(err) => {
                crate::log_error(&format!("AI: {:?} action tick failed: {}", entity, err));
                continue;
            }
        };

        if let Some(next) = executed.next_state {
            state_events.write(StateChanged {
                agent: entity,
                from: state.kind(),
                to: next.kind(),
            });
            *state = next;
        }
    }
}

fn action_context(
    task: &ActionTask,
    tracking: &Tracking,
    transform: &Transform,
    lifecycle: &Lifecycle,
    targets: &Query<&Transform, Without<Agent>>,
) -> ActionContext {
    ActionContext {
        position: transform.translation,
        rotation: transform.rotation,
        target: tracking
            .target
            .and_then(|target| targets.get(target).ok())
            .map(|target| target.translation),
        dt: task.timer.duration().as_secs_f32(),
        terminal_handled: lifecycle.terminal_handled,
    }
}

/// Выполняет план на ports, возвращает план с учётом прибытия
fn execute_plan(
    plan: ActionPlan,
    locomotion: &mut Locomotion,
    animator: &mut Animator,
    collider: &mut Collider,
    transform: &mut Transform,
) -> Result<ActionPlan, TickError> {
    plan.locomotion.apply(locomotion.0.as_mut())?;

    // Остаток пути читаем после MoveTo: он относится к текущей wander точке
    let plan = if plan.arrival_check {
        let remaining = locomotion.0.remaining_distance()?;
        plan.settle_arrival(remaining, locomotion.0.stopping_threshold())
    } else {
        plan
    };

    if let Some(facing) = plan.facing {
        transform.rotation = facing;
    }

    if plan.terminal {
        collider.0.set_enabled(false)?;
    }

    if let Some(cue) = plan.animation {
        animator.apply(cue)?;
    }

    Ok(plan)
}
