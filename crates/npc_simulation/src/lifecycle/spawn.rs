//! Spawn bundle агента.

use bevy::prelude::*;

use crate::ai::{ActionTask, BehaviorState, NpcConfig, PerceptionTask, Tracking};
use crate::components::{Agent, Health, Lifecycle};
use crate::error::SpawnError;
use crate::ports::{AnimationPort, Animator, Collider, ColliderPort, Locomotion, LocomotionPort};

/// Host ports нового агента
pub struct AgentPorts {
    pub locomotion: Box<dyn LocomotionPort>,
    pub animation: Box<dyn AnimationPort>,
    pub collider: Box<dyn ColliderPort>,
}

/// Собрать bundle агента
///
/// Config валидируется, animation параметры резолвятся один раз здесь.
/// Агент стартует активным: Idle, max HP, обе periodic task запущены.
pub fn agent_bundle(
    config: NpcConfig,
    ports: AgentPorts,
    transform: Transform,
    tracking: Tracking,
) -> Result<impl Bundle, SpawnError> {
    config.validate()?;
    let animator = Animator::new(ports.animation)?;

    Ok((
        Agent,
        Health::new(config.max_health),
        BehaviorState::Idle,
        Lifecycle::default(),
        PerceptionTask::from_config(&config),
        ActionTask::from_config(&config),
        tracking,
        transform,
        Locomotion(ports.locomotion),
        animator,
        Collider(ports.collider),
        config,
    ))
}
