//! NPC Simulation Core
//!
//! ECS-контроллер поведения NPC на Bevy 0.16 (strategic layer)
//!
//! HYBRID ARCHITECTURE:
//! - ECS = решения (perception → BehaviorState → action, health, pool lifecycle)
//! - Host = исполнение (navmesh, animator, collider, object pool) через ports
//!
//! Всё крутится в FixedUpdate; время - Time<Fixed>, случайность - DeterministicRng.

use std::time::Duration;

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod components;
pub mod error;
pub mod geometry;
pub mod lifecycle;
pub mod logger;
pub mod ports;

// Re-export базовых типов для удобства
pub use ai::{AIPlugin, BehaviorState, NpcConfig, StateChanged, StateKind, TrackedTarget, Tracking};
pub use components::*;
pub use error::{ConfigError, PortError, SpawnError, TickError};
pub use lifecycle::{
    agent_bundle, ActivateAgent, AgentDied, AgentPooled, AgentPorts, DamageAgent, LifecyclePlugin, VictorySignal,
};
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger, set_logger_if_needed, LogLevel,
    LogPrinter,
};

/// Порядок систем внутри одного fixed step
///
/// Targeting → Lifecycle (damage, victory, activation) → Perception → Action → PoolReturn
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NpcSet {
    Targeting,
    Lifecycle,
    Perception,
    Action,
    PoolReturn,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct NpcSimulationPlugin;

impl Plugin for NpcSimulationPlugin {
    fn build(&self, app: &mut App) {
        // Seed из create_headless_app не перетираем
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .configure_sets(
                FixedUpdate,
                (
                    NpcSet::Targeting,
                    NpcSet::Lifecycle,
                    NpcSet::Perception,
                    NpcSet::Action,
                    NpcSet::PoolReturn,
                )
                    .chain(),
            )
            .add_plugins((AIPlugin, LifecyclePlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Один fixed step вручную: Time<Fixed> += delta, затем FixedUpdate
///
/// Без wall clock - headless demo и тесты воспроизводимы.
pub fn run_fixed_step(app: &mut App, delta: Duration) {
    app.world_mut().resource_mut::<Time<Fixed>>().advance_by(delta);
    app.world_mut().run_schedule(FixedUpdate);
}
