//! Tests for lifecycle systems (damage, victory freeze, pool return, activation).

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy::prelude::*;

    use crate::ai::{ActionTask, BehaviorState, NpcConfig, PerceptionTask, StateChanged, StateKind, Tracking};
    use crate::components::{Health, Lifecycle};
    use crate::lifecycle::*;
    use crate::ports::recording::{
        PortCall, PortLog, RecordingAnimation, RecordingCollider, RecordingLocomotion, RecordingPoolHost,
    };
    use crate::ports::PoolHostHandle;

    /// Минимальный App: только lifecycle системы в Update, Time<Fixed> двигаем руками
    fn lifecycle_app() -> App {
        let mut app = App::new();
        app.insert_resource(Time::<Fixed>::from_seconds(0.1))
            .add_event::<DamageAgent>()
            .add_event::<VictorySignal>()
            .add_event::<ActivateAgent>()
            .add_event::<AgentDied>()
            .add_event::<AgentPooled>()
            .add_event::<StateChanged>()
            .add_systems(
                Update,
                (apply_damage, handle_victory, handle_activation, pool_return_after_timeout).chain(),
            );
        app
    }

    fn spawn_agent(app: &mut App) -> (Entity, PortLog) {
        let log = PortLog::default();
        let ports = AgentPorts {
            locomotion: Box::new(RecordingLocomotion::new(log.clone())),
            animation: Box::new(RecordingAnimation::new(log.clone())),
            collider: Box::new(RecordingCollider::new(log.clone())),
        };
        let bundle = agent_bundle(NpcConfig::default(), ports, Transform::default(), Tracking::unbound())
            .expect("default config is valid");
        let entity = app.world_mut().spawn(bundle).id();
        (entity, log)
    }

    fn damage(app: &mut App, agent: Entity, amount: u32) {
        app.world_mut().send_event(DamageAgent { agent, amount });
    }

    fn state(app: &App, agent: Entity) -> BehaviorState {
        *app.world().get::<BehaviorState>(agent).unwrap()
    }

    fn lifecycle(app: &App, agent: Entity) -> Lifecycle {
        *app.world().get::<Lifecycle>(agent).unwrap()
    }

    fn advance(app: &mut App, delta: Duration) {
        app.world_mut().resource_mut::<Time<Fixed>>().advance_by(delta);
        app.update();
    }

    #[test]
    fn test_five_hits_of_twenty_kill_agent() {
        let mut app = lifecycle_app();
        let (agent, log) = spawn_agent(&mut app);

        for _ in 0..3 {
            damage(&mut app, agent, 20);
        }
        app.update();

        assert_eq!(app.world().get::<Health>(agent).unwrap().current, 40);
        assert_eq!(state(&app, agent), BehaviorState::Idle);
        assert_eq!(log.triggers(), vec!["Hit", "Hit", "Hit"]);

        damage(&mut app, agent, 20);
        damage(&mut app, agent, 20);
        app.update();

        assert_eq!(app.world().get::<Health>(agent).unwrap().current, 0);
        assert_eq!(state(&app, agent), BehaviorState::Dying);
        assert_eq!(log.triggers().len(), 5);

        let events = app.world().resource::<Events<StateChanged>>();
        let mut cursor = events.get_cursor();
        let deaths = cursor.read(events).filter(|event| event.to == StateKind::Dying).count();
        assert_eq!(deaths, 1);
    }

    #[test]
    fn test_damage_on_dying_agent_only_fires_hit() {
        let mut app = lifecycle_app();
        let (agent, log) = spawn_agent(&mut app);

        damage(&mut app, agent, 250);
        app.update();
        assert_eq!(state(&app, agent), BehaviorState::Dying);

        damage(&mut app, agent, 10);
        app.update();

        assert_eq!(app.world().get::<Health>(agent).unwrap().current, 0);
        assert_eq!(state(&app, agent), BehaviorState::Dying);
        assert_eq!(log.triggers(), vec!["Hit", "Hit"]);
        // Death handling - дело action loop'а, damage его не трогает
        assert!(!app.world().entity(agent).contains::<PoolReturnAfter>());
    }

    #[test]
    fn test_damage_on_pooled_agent_ignored() {
        let mut app = lifecycle_app();
        let (agent, log) = spawn_agent(&mut app);
        app.world_mut().get_mut::<Lifecycle>(agent).unwrap().active = false;

        damage(&mut app, agent, 30);
        app.update();

        assert_eq!(app.world().get::<Health>(agent).unwrap().current, 100);
        assert!(log.is_empty());
    }

    #[test]
    fn test_victory_freezes_pursuing_agent() {
        let mut app = lifecycle_app();
        let (agent, log) = spawn_agent(&mut app);
        *app.world_mut().get_mut::<BehaviorState>(agent).unwrap() = BehaviorState::Pursuing;

        app.world_mut().send_event(VictorySignal::default());
        app.update();

        assert_eq!(state(&app, agent), BehaviorState::Pursuing);
        assert!(lifecycle(&app, agent).frozen);
        assert!(!app.world().entity(agent).contains::<PerceptionTask>());
        assert!(!app.world().entity(agent).contains::<ActionTask>());
        assert!(!app.world().entity(agent).contains::<PoolReturnAfter>());
        assert_eq!(log.calls(), vec![PortCall::SetMovementEnabled(false)]);

        // Повторный сигнал - no-op
        app.world_mut().send_event(VictorySignal::default());
        app.update();
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_victory_for_single_agent() {
        let mut app = lifecycle_app();
        let (first, _) = spawn_agent(&mut app);
        let (second, _) = spawn_agent(&mut app);

        app.world_mut().send_event(VictorySignal { agent: Some(first) });
        app.update();

        assert!(lifecycle(&app, first).frozen);
        assert!(!lifecycle(&app, second).frozen);
        assert!(app.world().entity(second).contains::<ActionTask>());
    }

    #[test]
    fn test_victory_ignored_while_dying() {
        let mut app = lifecycle_app();
        let (agent, _) = spawn_agent(&mut app);

        // Урон и победа в одном кадре: смерть в приоритете
        damage(&mut app, agent, 100);
        app.world_mut().send_event(VictorySignal::default());
        app.update();

        assert_eq!(state(&app, agent), BehaviorState::Dying);
        assert!(!lifecycle(&app, agent).frozen);
        assert!(app.world().entity(agent).contains::<ActionTask>());
    }

    #[test]
    fn test_lethal_damage_unfreezes_agent() {
        let mut app = lifecycle_app();
        let (agent, _) = spawn_agent(&mut app);

        app.world_mut().send_event(VictorySignal::default());
        app.update();
        assert!(!app.world().entity(agent).contains::<ActionTask>());

        damage(&mut app, agent, 100);
        app.update();

        assert_eq!(state(&app, agent), BehaviorState::Dying);
        assert!(!lifecycle(&app, agent).frozen);
        assert!(app.world().entity(agent).contains::<ActionTask>());
        assert!(!app.world().entity(agent).contains::<PerceptionTask>());
    }

    #[test]
    fn test_reset_for_pool_from_any_state() {
        let states = [
            BehaviorState::Idle,
            BehaviorState::Wandering {
                target: Vec3::new(1.0, 0.0, 2.0),
            },
            BehaviorState::Alerted {
                entered_at: Duration::from_millis(600),
            },
            BehaviorState::Pursuing,
            BehaviorState::Attacking,
            BehaviorState::Dying,
        ];

        for initial in states {
            let mut health = Health::new(100);
            health.take_damage(70);
            let mut state = initial;
            let mut lifecycle = Lifecycle {
                active: true,
                terminal_handled: true,
                frozen: true,
            };

            reset_for_pool(&mut health, &mut state, &mut lifecycle);

            assert_eq!(health.current, 100, "from {:?}", initial);
            assert_eq!(state, BehaviorState::Idle, "from {:?}", initial);
            assert_eq!(state.alert_entered_at(), None);
            assert_eq!(state.wander_target(), None);
            assert!(!lifecycle.active);
            assert!(!lifecycle.terminal_handled);
            assert!(!lifecycle.frozen);
        }
    }

    #[test]
    fn test_pool_return_waits_for_timer() {
        let mut app = lifecycle_app();
        let (agent, log) = spawn_agent(&mut app);
        app.insert_resource(PoolHostHandle(Box::new(RecordingPoolHost::new(log.clone()))));

        damage(&mut app, agent, 100);
        app.update();
        app.world_mut().get_mut::<Lifecycle>(agent).unwrap().terminal_handled = true;
        app.world_mut()
            .entity_mut(agent)
            .insert(PoolReturnAfter::new(Duration::from_secs(3)));
        log.clear();

        advance(&mut app, Duration::from_millis(2900));
        assert_eq!(state(&app, agent), BehaviorState::Dying);
        assert!(log.is_empty());

        advance(&mut app, Duration::from_millis(100));

        assert_eq!(state(&app, agent), BehaviorState::Idle);
        assert_eq!(app.world().get::<Health>(agent).unwrap().current, 100);
        assert_eq!(
            lifecycle(&app, agent),
            Lifecycle {
                active: false,
                terminal_handled: false,
                frozen: false,
            }
        );
        assert!(!app.world().entity(agent).contains::<PoolReturnAfter>());
        assert!(!app.world().entity(agent).contains::<PerceptionTask>());
        assert!(!app.world().entity(agent).contains::<ActionTask>());
        assert_eq!(
            log.calls(),
            vec![PortCall::ColliderEnabled(true), PortCall::Deactivate(agent)]
        );
    }

    #[test]
    fn test_activation_restarts_tasks() {
        let mut app = lifecycle_app();
        let (agent, _) = spawn_agent(&mut app);

        {
            let mut entity = app.world_mut().entity_mut(agent);
            entity.remove::<(PerceptionTask, ActionTask)>();
            entity.get_mut::<Lifecycle>().unwrap().active = false;
        }

        app.world_mut().send_event(ActivateAgent { agent });
        app.update();

        assert!(lifecycle(&app, agent).active);
        assert!(app.world().entity(agent).contains::<PerceptionTask>());
        assert!(app.world().entity(agent).contains::<ActionTask>());
    }

    #[test]
    fn test_activation_of_active_agent_is_noop() {
        let mut app = lifecycle_app();
        let (agent, log) = spawn_agent(&mut app);
        app.world_mut().entity_mut(agent).remove::<PerceptionTask>();

        app.world_mut().send_event(ActivateAgent { agent });
        app.update();

        assert!(!app.world().entity(agent).contains::<PerceptionTask>());
        assert!(log.is_empty());
    }

    #[test]
    fn test_agent_bundle_rejects_invalid_config() {
        let log = PortLog::default();
        let ports = AgentPorts {
            locomotion: Box::new(RecordingLocomotion::new(log.clone())),
            animation: Box::new(RecordingAnimation::new(log.clone())),
            collider: Box::new(RecordingCollider::new(log)),
        };
        let config = NpcConfig {
            attack_range: 12.0,
            ..Default::default()
        };

        assert!(agent_bundle(config, ports, Transform::default(), Tracking::unbound()).is_err());
    }

    #[test]
    fn test_agent_bundle_rejects_missing_animation_parameter() {
        let log = PortLog::default();
        let ports = AgentPorts {
            locomotion: Box::new(RecordingLocomotion::new(log.clone())),
            animation: Box::new(RecordingAnimation::new(log.clone()).without_parameter("Die")),
            collider: Box::new(RecordingCollider::new(log)),
        };

        assert!(agent_bundle(NpcConfig::default(), ports, Transform::default(), Tracking::unbound()).is_err());
    }
}
