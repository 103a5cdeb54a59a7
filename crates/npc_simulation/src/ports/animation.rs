//! Animation port + enum-keyed dispatch table.
//!
//! Имена параметров аниматора резолвятся ОДИН раз при spawn в AnimationTable.
//! На hot path - только индекс по AnimationIntent, без lookup по строке.

use bevy::prelude::*;

use crate::error::PortError;

/// Native handle параметра аниматора (hash/id на стороне host'а)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationHandle(pub u32);

/// Animator агента (Animator controller, AnimationTree и т.п.)
pub trait AnimationPort: Send + Sync {
    /// Name → native handle (вызывается только при построении AnimationTable)
    fn resolve(&mut self, name: &str) -> Result<AnimationHandle, PortError>;

    fn set_flag(&mut self, handle: AnimationHandle, value: bool) -> Result<(), PortError>;

    fn fire_trigger(&mut self, handle: AnimationHandle) -> Result<(), PortError>;

    /// Blend параметры host'а; FSM их не использует
    fn set_float(&mut self, _handle: AnimationHandle, _value: f32) -> Result<(), PortError> {
        Ok(())
    }
}

/// Закрытый набор анимационных намерений FSM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum AnimationIntent {
    /// Loop flag: ходьба (Wandering)
    Walking,
    /// Loop flag: заметил цель (Alerted)
    Detected,
    /// Loop flag: бег за целью (Pursuing)
    Running,
    /// Trigger: удар
    Attack,
    /// Trigger: получил урон
    Hit,
    /// Trigger: смерть
    Die,
}

impl AnimationIntent {
    pub const ALL: [AnimationIntent; 6] = [
        AnimationIntent::Walking,
        AnimationIntent::Detected,
        AnimationIntent::Running,
        AnimationIntent::Attack,
        AnimationIntent::Hit,
        AnimationIntent::Die,
    ];

    /// Имя параметра в animator controller'е
    pub fn parameter_name(&self) -> &'static str {
        match self {
            AnimationIntent::Walking => "IsWalking",
            AnimationIntent::Detected => "IsDetected",
            AnimationIntent::Running => "IsRunning",
            AnimationIntent::Attack => "IsAttack",
            AnimationIntent::Hit => "Hit",
            AnimationIntent::Die => "Die",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// Resolved handles, индексируются AnimationIntent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationTable {
    handles: [AnimationHandle; AnimationIntent::ALL.len()],
}

impl AnimationTable {
    pub fn resolve(port: &mut dyn AnimationPort) -> Result<Self, PortError> {
        let mut handles = [AnimationHandle(0); AnimationIntent::ALL.len()];
        for intent in AnimationIntent::ALL {
            handles[intent.index()] = port.resolve(intent.parameter_name())?;
        }
        Ok(Self { handles })
    }

    pub fn handle(&self, intent: AnimationIntent) -> AnimationHandle {
        self.handles[intent.index()]
    }
}

/// Одно обновление анимационного состояния за тик
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationCue {
    /// Сменить loop pose (предыдущий flag гасится); None - без позы
    Pose(Option<AnimationIntent>),
    /// One-shot trigger поверх текущей позы (hit reaction)
    Trigger(AnimationIntent),
    /// Погасить позу и выстрелить trigger (attack, die)
    Interrupt(AnimationIntent),
}

/// Animation port агента + таблица + текущая loop pose
///
/// Поза трекается здесь, чтобы не дёргать port каждый тик одним и тем же flag'ом.
#[derive(Component)]
pub struct Animator {
    port: Box<dyn AnimationPort>,
    table: AnimationTable,
    pose: Option<AnimationIntent>,
}

impl Animator {
    pub fn new(mut port: Box<dyn AnimationPort>) -> Result<Self, PortError> {
        let table = AnimationTable::resolve(port.as_mut())?;
        Ok(Self {
            port,
            table,
            pose: None,
        })
    }

    pub fn pose(&self) -> Option<AnimationIntent> {
        self.pose
    }

    pub fn apply(&mut self, cue: AnimationCue) -> Result<(), PortError> {
        match cue {
            AnimationCue::Pose(pose) => self.switch_pose(pose),
            AnimationCue::Trigger(intent) => self.port.fire_trigger(self.table.handle(intent)),
            AnimationCue::Interrupt(intent) => {
                self.switch_pose(None)?;
                self.port.fire_trigger(self.table.handle(intent))
            }
        }
    }

    fn switch_pose(&mut self, pose: Option<AnimationIntent>) -> Result<(), PortError> {
        if self.pose == pose {
            return Ok(());
        }

        if let Some(previous) = self.pose {
            self.port.set_flag(self.table.handle(previous), false)?;
        }
        if let Some(next) = pose {
            self.port.set_flag(self.table.handle(next), true)?;
        }

        self.pose = pose;
        Ok(())
    }
}
