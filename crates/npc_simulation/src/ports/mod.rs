//! Ports - внешние collaborators агента
//!
//! Архитектура (host-driven):
//! - ECS решает ЧТО делать (LocomotionDirective, AnimationCue)
//! - Host (движок) реализует КАК: navmesh agent, animator, collider, object pool
//! - Ports хранятся per-agent в компонентах (Locomotion, Animator, Collider),
//!   pool host - общий resource

use bevy::prelude::*;

use crate::error::PortError;

pub mod animation;
pub mod recording;

pub use animation::{AnimationCue, AnimationHandle, AnimationIntent, AnimationPort, AnimationTable, Animator};

/// Навигация агента (NavMeshAgent и аналоги)
pub trait LocomotionPort: Send + Sync {
    fn set_destination(&mut self, point: Vec3) -> Result<(), PortError>;

    fn set_movement_enabled(&mut self, enabled: bool) -> Result<(), PortError>;

    /// Оставшаяся дистанция по пути до текущего destination
    fn remaining_distance(&self) -> Result<f32, PortError>;

    fn stopping_threshold(&self) -> f32;
}

/// Физический коллайдер агента
pub trait ColliderPort: Send + Sync {
    fn set_enabled(&mut self, enabled: bool) -> Result<(), PortError>;
}

/// Object pool host: убирает агента из активной симуляции
pub trait PoolHost: Send + Sync {
    fn deactivate(&mut self, agent: Entity);
}

/// Locomotion port агента
#[derive(Component)]
pub struct Locomotion(pub Box<dyn LocomotionPort>);

/// Collider port агента
#[derive(Component)]
pub struct Collider(pub Box<dyn ColliderPort>);

/// Pool host (опционален: без него агент просто помечается inactive)
#[derive(Resource)]
pub struct PoolHostHandle(pub Box<dyn PoolHost>);

/// Одна locomotion команда за тик
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocomotionDirective {
    /// Остановиться (movement disabled)
    Halt,
    /// Идти к точке (movement enabled + destination)
    MoveTo(Vec3),
}

impl LocomotionDirective {
    pub fn apply(&self, port: &mut dyn LocomotionPort) -> Result<(), PortError> {
        match *self {
            LocomotionDirective::Halt => port.set_movement_enabled(false),
            LocomotionDirective::MoveTo(point) => {
                port.set_movement_enabled(true)?;
                port.set_destination(point)
            }
        }
    }
}
