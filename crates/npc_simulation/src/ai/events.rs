//! AI Events - наблюдаемые переходы FSM (UI, debug overlay, звук)

use bevy::prelude::*;

use super::components::StateKind;

/// Состояние агента изменилось
///
/// Пишется perception (классификация), action (Idle ↔ Wandering) и damage (→ Dying).
/// Pool reset не пишет StateChanged - для него есть AgentPooled.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChanged {
    pub agent: Entity,
    pub from: StateKind,
    pub to: StateKind,
}
