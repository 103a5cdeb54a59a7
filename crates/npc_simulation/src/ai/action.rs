//! Action - исполнение текущего состояния
//!
//! Чистый planner: state + контекст → ActionPlan.
//! ECS система (ai::systems::action) применяет план к ports.
//!
//! Гарантия: ровно одна LocomotionDirective и максимум один AnimationCue за тик.

use bevy::prelude::*;
use rand::Rng;

use super::components::{BehaviorState, NpcConfig};
use crate::geometry;
use crate::ports::{AnimationCue, AnimationIntent, LocomotionDirective};

/// Снимок мира для одного action тика
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionContext {
    pub position: Vec3,
    pub rotation: Quat,
    /// Позиция цели (None - цель недоступна)
    pub target: Option<Vec3>,
    /// Время тика для плавного поворота (секунды)
    pub dt: f32,
    /// Death sequence уже отработал
    pub terminal_handled: bool,
}

/// Что сделать за этот тик
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionPlan {
    pub locomotion: LocomotionDirective,
    pub animation: Option<AnimationCue>,
    /// Новый rotation агента (Alerted: поворот к цели)
    pub facing: Option<Quat>,
    /// Micro-transition внутри action loop (Idle ↔ Wandering)
    pub next_state: Option<BehaviorState>,
    /// Первый вход в Dying: collider off + pool timer + снять action task
    pub terminal: bool,
    /// Wandering: после MoveTo спросить у port остаток пути до этой же точки
    pub arrival_check: bool,
}

impl ActionPlan {
    fn halt() -> Self {
        Self {
            locomotion: LocomotionDirective::Halt,
            animation: None,
            facing: None,
            next_state: None,
            terminal: false,
            arrival_check: false,
        }
    }

    fn move_to(point: Vec3) -> Self {
        Self {
            locomotion: LocomotionDirective::MoveTo(point),
            ..Self::halt()
        }
    }

    fn with_cue(mut self, cue: AnimationCue) -> Self {
        self.animation = Some(cue);
        self
    }

    /// Итог Wandering тика по остатку пути, прочитанному уже после MoveTo
    ///
    /// Дошли: поза гасится, micro-transition в Idle (Halt выдаст следующий Idle тик).
    /// Не дошли: продолжаем идти. Планы без arrival_check не меняются.
    pub fn settle_arrival(mut self, remaining: f32, stopping_threshold: f32) -> Self {
        if !self.arrival_check {
            return self;
        }

        if remaining <= stopping_threshold {
            self.animation = Some(AnimationCue::Pose(None));
            self.next_state = Some(BehaviorState::Idle);
        }
        self
    }
}

pub fn plan_action<R: Rng + ?Sized>(
    state: BehaviorState,
    ctx: &ActionContext,
    config: &NpcConfig,
    rng: &mut R,
) -> ActionPlan {
    match state {
        BehaviorState::Idle => {
            // Стоим и сразу выбираем новую wander точку
            let target = geometry::wander_destination(ctx.position, config.wander_min, config.wander_max, rng);
            ActionPlan {
                next_state: Some(BehaviorState::Wandering { target }),
                ..ActionPlan::halt().with_cue(AnimationCue::Pose(Some(AnimationIntent::Walking)))
            }
        }

        BehaviorState::Wandering { target } => {
            // Destination выдаётся каждый тик, прибытие решает settle_arrival
            ActionPlan {
                arrival_check: true,
                ..ActionPlan::move_to(target).with_cue(AnimationCue::Pose(Some(AnimationIntent::Walking)))
            }
        }

        BehaviorState::Alerted { .. } => {
            let facing = ctx.target.map(|target| {
                geometry::face_towards(ctx.position, target, ctx.rotation, ctx.dt, config.turn_speed)
            });

            ActionPlan {
                facing,
                ..ActionPlan::halt().with_cue(AnimationCue::Pose(Some(AnimationIntent::Detected)))
            }
        }

        BehaviorState::Pursuing => {
            let plan = match ctx.target {
                Some(target) => ActionPlan::move_to(target),
                None => ActionPlan::halt(),
            };
            plan.with_cue(AnimationCue::Pose(Some(AnimationIntent::Running)))
        }

        BehaviorState::Attacking => {
            ActionPlan::halt().with_cue(AnimationCue::Interrupt(AnimationIntent::Attack))
        }

        BehaviorState::Dying => {
            if ctx.terminal_handled {
                // DoubleTerminalEntry - tolerated no-op
                return ActionPlan::halt();
            }

            ActionPlan {
                terminal: true,
                ..ActionPlan::halt().with_cue(AnimationCue::Interrupt(AnimationIntent::Die))
            }
        }
    }
}
