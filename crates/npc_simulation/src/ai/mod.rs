//! AI decision-making module
//!
//! Фиксированный FSM агента с одной целью:
//! Idle ⇄ Wandering → Alerted (hold) → Pursuing → Attacking, Dying - терминально.
//!
//! Две петли на агента, каждая по своему таймеру:
//! - perception: дистанция до цели → BehaviorState
//! - action: BehaviorState → locomotion/animation ports

use bevy::prelude::*;

pub mod action;
pub mod components;
pub mod events;
pub mod perception;
pub mod systems;


// Re-export основных типов
pub use components::*;
pub use events::StateChanged;

use crate::NpcSet;

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate.
/// Порядок выполнения:
/// 1. bind_targets - привязка агентов к TrackedTarget
/// 2. perception_tick - классификация состояния
/// 3. action_tick - исполнение состояния через ports
///
/// Perception и action в одном fixed step: perception всегда завершается раньше.
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<StateChanged>();

        app.add_systems(FixedUpdate, systems::bind_targets.in_set(NpcSet::Targeting))
            .add_systems(FixedUpdate, systems::perception_tick.in_set(NpcSet::Perception))
            .add_systems(FixedUpdate, systems::action_tick.in_set(NpcSet::Action));
    }
}
