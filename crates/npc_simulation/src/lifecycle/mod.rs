//! Health & pool lifecycle агента
//!
//! ECS ответственность:
//! - Health, DamageAgent → Dying (перебивает perception в том же fixed step)
//! - PoolReturnAfter таймер → pool reset (Idle, max HP, inactive)
//! - VictorySignal → freeze без death sequence
//! - ActivateAgent → рестарт periodic tasks у агента из пула
//!
//! Host ответственность:
//! - отправка DamageAgent / VictorySignal / ActivateAgent
//! - PoolHost::deactivate (убрать node из сцены)

use bevy::prelude::*;

pub mod damage;
pub mod pool;
pub mod spawn;
pub mod victory;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod lifecycle_tests;

pub use damage::apply_damage;
pub use pool::{handle_activation, pool_return_after_timeout, reset_for_pool, PoolReturnAfter};
pub use spawn::{agent_bundle, AgentPorts};
pub use victory::handle_victory;

use crate::NpcSet;

/// Событие (вход): внешний combat нанёс урон агенту
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageAgent {
    pub agent: Entity,
    pub amount: u32,
}

/// Событие (вход): игрок победил - заморозить агента (None = всех)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VictorySignal {
    pub agent: Option<Entity>,
}

/// Событие (вход): достать агента из пула
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivateAgent {
    pub agent: Entity,
}

/// Событие (выход): death sequence запущен (trigger, collider off, pool timer)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentDied {
    pub agent: Entity,
}

/// Событие (выход): агент сброшен и возвращён в пул
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentPooled {
    pub agent: Entity,
}

/// Lifecycle Plugin
///
/// Порядок выполнения (FixedUpdate):
/// 1. apply_damage / handle_victory / handle_activation - до perception (NpcSet::Lifecycle)
/// 2. pool_return_after_timeout - после action (NpcSet::PoolReturn)
pub struct LifecyclePlugin;

impl Plugin for LifecyclePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<DamageAgent>()
            .add_event::<VictorySignal>()
            .add_event::<ActivateAgent>()
            .add_event::<AgentDied>()
            .add_event::<AgentPooled>();

        app.add_systems(
            FixedUpdate,
            (
                damage::apply_damage,
                // Death wins: victory видит Dying, выставленный уроном в этом же шаге
                victory::handle_victory,
                pool::handle_activation,
            )
                .chain()
                .in_set(NpcSet::Lifecycle),
        )
        .add_systems(FixedUpdate, pool::pool_return_after_timeout.in_set(NpcSet::PoolReturn));
    }
}
