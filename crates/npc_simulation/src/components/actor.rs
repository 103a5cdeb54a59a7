//! Базовые компоненты агента: Agent, Health, Lifecycle

use bevy::prelude::*;

use crate::ai::BehaviorState;

/// Агент (NPC под управлением FSM)
///
/// Автоматически добавляет Health, Lifecycle, BehaviorState через Required Components.
/// Periodic tasks и ports добавляются через `lifecycle::agent_bundle`.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(Health, Lifecycle, BehaviorState, Transform)]
pub struct Agent;

/// Здоровье агента
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100) // Default 100 HP
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }

    pub fn restore(&mut self) {
        self.current = self.max;
    }
}

/// Pool lifecycle агента
///
/// - active: false пока агент лежит в пуле (никаких perception/action тиков)
/// - terminal_handled: death sequence уже отработал (trigger, collider, pool timer)
/// - frozen: victory stop - тики сняты, state оставлен как был
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Lifecycle {
    pub active: bool,
    pub terminal_handled: bool,
    pub frozen: bool,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self {
            active: true,
            terminal_handled: false,
            frozen: false,
        }
    }
}

impl Lifecycle {
    /// Агент участвует в симуляции (не в пуле и не заморожен)
    pub fn is_running(&self) -> bool {
        self.active && !self.frozen
    }
}
