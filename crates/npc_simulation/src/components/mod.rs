//! ECS Components агента
//!
//! - actor: Agent marker, Health, Lifecycle (pool state)
//!
//! AI компоненты (BehaviorState, NpcConfig, periodic tasks) живут в `ai::components`.

pub mod actor;

pub use actor::*;
