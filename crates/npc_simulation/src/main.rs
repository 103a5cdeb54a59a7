//! Headless симуляция NPC
//!
//! Один волк, одна цель, которая идёт прямо на него и останавливается вплотную.
//! Ports - recording: печатаем то, что получил бы движок.

use std::time::Duration;

use bevy::prelude::*;
use npc_simulation::ports::recording::{
    PortLog, RecordingAnimation, RecordingCollider, RecordingLocomotion, RecordingPoolHost,
};
use npc_simulation::ports::PoolHostHandle;
use npc_simulation::*;

const STEP: Duration = Duration::from_millis(100);

/// Цель стартует в 14m и подходит на 0.5m каждый шаг, пока не окажется в 1.5m
fn target_position(step: u32) -> Vec3 {
    let z = (14.0 - step as f32 * 0.5).max(1.5);
    Vec3::new(0.0, 0.0, z)
}

fn main() {
    let seed = 42;
    println!("Starting NPC headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(NpcSimulationPlugin);

    let log = PortLog::default();
    app.insert_resource(PoolHostHandle(Box::new(RecordingPoolHost::new(log.clone()))));

    let target = app
        .world_mut()
        .spawn((TrackedTarget, Transform::from_translation(target_position(0))))
        .id();

    let locomotion = RecordingLocomotion::new(log.clone());
    let nav = locomotion.readout();
    let ports = AgentPorts {
        locomotion: Box::new(locomotion),
        animation: Box::new(RecordingAnimation::new(log.clone())),
        collider: Box::new(RecordingCollider::new(log.clone())),
    };
    let bundle = match agent_bundle(NpcConfig::default(), ports, Transform::default(), Tracking::unbound()) {
        Ok(bundle) => bundle,
        Err(err) => {
            log_error(&format!("Failed to spawn wolf: {}", err));
            return;
        }
    };
    let wolf = app.world_mut().spawn(bundle).id();

    for step in 0..120u32 {
        if let Some(mut transform) = app.world_mut().get_mut::<Transform>(target) {
            transform.translation = target_position(step);
        }

        // Цель бьёт волка, когда стоит вплотную
        if step >= 40 && step % 5 == 0 {
            app.world_mut().send_event(DamageAgent { agent: wolf, amount: 25 });
        }

        run_fixed_step(&mut app, STEP);
        // Navmesh "доходит" до destination за один шаг
        if let Ok(mut readout) = nav.lock() {
            readout.arrive();
        }

        let calls = log.drain();
        if !calls.is_empty() {
            let state = app.world().get::<BehaviorState>(wolf).map(|state| state.kind());
            println!("Step {:3}: {:?} {:?}", step, state, calls);
        }
    }

    let lifecycle = app.world().get::<Lifecycle>(wolf).copied();
    println!("Simulation complete! wolf lifecycle: {:?}", lifecycle);
}
