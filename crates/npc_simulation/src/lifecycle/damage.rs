//! Damage → Health → Dying.

use bevy::prelude::*;

use super::DamageAgent;
use crate::ai::{ActionTask, BehaviorState, NpcConfig, StateChanged};
use crate::components::{Agent, Health, Lifecycle};
use crate::ports::{AnimationCue, AnimationIntent, Animator};

/// Система: apply damage от DamageAgent событий
///
/// 1. Hit trigger (всегда, даже у умирающего)
/// 2. Health -= amount (saturating, у Dying не меняется)
/// 3. Health == 0 → Dying сразу, до perception в этом же fixed step
///
/// Агент в пуле (inactive) урон не получает.
/// Замороженный агент (victory) при смертельном уроне размораживается -
/// death sequence важнее freeze.
pub fn apply_damage(
    mut commands: Commands,
    mut damage_events: EventReader<DamageAgent>,
    mut agents: Query<
        (
            &mut Health,
            &mut BehaviorState,
            &mut Lifecycle,
            &NpcConfig,
            Option<&mut Animator>,
        ),
        With<Agent>,
    >,
    mut state_events: EventWriter<StateChanged>,
) {
    for event in damage_events.read() {
        let Ok((mut health, mut state, mut lifecycle, config, animator)) = agents.get_mut(event.agent) else {
            crate::log_warning(&format!("DamageAgent: {:?} is not an agent", event.agent));
            continue;
        };

        if !lifecycle.active {
            crate::log(&format!("DamageAgent: {:?} is pooled, damage ignored", event.agent));
            continue;
        }

        if let Some(mut animator) = animator {
            if let Err(err) = animator.apply(AnimationCue::Trigger(AnimationIntent::Hit)) {
                crate::log_error(&format!("DamageAgent: {:?} hit animation failed: {}", event.agent, err));
            }
        }

        if state.is_dying() {
            // DoubleTerminalEntry - только анимация
            continue;
        }

        health.take_damage(event.amount);
        crate::log(&format!(
            "🩸 {:?} took {} damage ({} / {})",
            event.agent, event.amount, health.current, health.max
        ));

        if health.is_alive() {
            continue;
        }

        state_events.write(StateChanged {
            agent: event.agent,
            from: state.kind(),
            to: BehaviorState::Dying.kind(),
        });
        *state = BehaviorState::Dying;
        crate::log_info(&format!("☠️ {:?} health depleted → Dying", event.agent));

        if lifecycle.frozen {
            lifecycle.frozen = false;
            commands.entity(event.agent).insert(ActionTask::from_config(config));
            crate::log(&format!("DamageAgent: {:?} unfrozen to run death sequence", event.agent));
        }
    }
}
