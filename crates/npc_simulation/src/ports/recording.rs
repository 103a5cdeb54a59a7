//! Recording ports - записывают каждый вызов в общий PortLog.
//!
//! Используются headless demo (печать того, что получил бы движок) и тестами
//! (проверка "ровно одна locomotion команда за тик" и т.п.).

use std::sync::{Arc, Mutex, MutexGuard};

use bevy::prelude::*;

use super::{AnimationHandle, AnimationPort, ColliderPort, LocomotionPort, PoolHost};
use crate::error::PortError;

/// Один вызов port'а
#[derive(Debug, Clone, PartialEq)]
pub enum PortCall {
    SetDestination(Vec3),
    SetMovementEnabled(bool),
    SetFlag(String, bool),
    FireTrigger(String),
    SetFloat(String, f32),
    ColliderEnabled(bool),
    Deactivate(Entity),
}

impl PortCall {
    /// Locomotion вызовы (для подсчёта директив)
    pub fn is_locomotion(&self) -> bool {
        matches!(self, PortCall::SetDestination(_) | PortCall::SetMovementEnabled(_))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Общий журнал вызовов (клонируется между ports одного агента)
#[derive(Debug, Clone, Default)]
pub struct PortLog {
    calls: Arc<Mutex<Vec<PortCall>>>,
}

impl PortLog {
    pub fn push(&self, call: PortCall) {
        lock(&self.calls).push(call);
    }

    pub fn calls(&self) -> Vec<PortCall> {
        lock(&self.calls).clone()
    }

    pub fn clear(&self) {
        lock(&self.calls).clear();
    }

    pub fn len(&self) -> usize {
        lock(&self.calls).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Забрать накопленные вызовы (журнал очищается)
    pub fn drain(&self) -> Vec<PortCall> {
        std::mem::take(&mut *lock(&self.calls))
    }

    pub fn count(&self, predicate: impl Fn(&PortCall) -> bool) -> usize {
        lock(&self.calls).iter().filter(|call| predicate(call)).count()
    }

    pub fn triggers(&self) -> Vec<String> {
        lock(&self.calls)
            .iter()
            .filter_map(|call| match call {
                PortCall::FireTrigger(name) => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn last_destination(&self) -> Option<Vec3> {
        lock(&self.calls).iter().rev().find_map(|call| match call {
            PortCall::SetDestination(point) => Some(*point),
            _ => None,
        })
    }
}

/// Состояние навигации как у NavMeshAgent
///
/// Остаток пути меряется от `position` до последнего destination.
/// Тест/demo двигает агента вручную (`arrive`, `position`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavReadout {
    pub position: Vec3,
    pub destination: Option<Vec3>,
    pub stopping_threshold: f32,
}

impl NavReadout {
    /// Без destination пути нет: 0.0, как у NavMeshAgent без path
    pub fn remaining_distance(&self) -> f32 {
        self.destination
            .map_or(0.0, |destination| self.position.distance(destination))
    }

    /// Агент дошёл до последнего destination
    pub fn arrive(&mut self) {
        if let Some(destination) = self.destination {
            self.position = destination;
        }
    }
}

impl Default for NavReadout {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            destination: None,
            stopping_threshold: 0.5,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingLocomotion {
    log: PortLog,
    readout: Arc<Mutex<NavReadout>>,
    failing: bool,
}

impl RecordingLocomotion {
    pub fn new(log: PortLog) -> Self {
        Self {
            log,
            ..Default::default()
        }
    }

    /// Port, у которого navmesh недоступен (каждый вызов - PortError)
    pub fn failing(log: PortLog) -> Self {
        Self {
            log,
            failing: true,
            ..Default::default()
        }
    }

    /// Handle для изменения показаний после того как port ушёл в компонент
    pub fn readout(&self) -> Arc<Mutex<NavReadout>> {
        self.readout.clone()
    }

    fn check(&self) -> Result<(), PortError> {
        if self.failing {
            return Err(PortError::Unavailable {
                port: "locomotion",
                reason: "agent is not on a navmesh".into(),
            });
        }
        Ok(())
    }
}

impl LocomotionPort for RecordingLocomotion {
    fn set_destination(&mut self, point: Vec3) -> Result<(), PortError> {
        self.check()?;
        lock(&self.readout).destination = Some(point);
        self.log.push(PortCall::SetDestination(point));
        Ok(())
    }

    fn set_movement_enabled(&mut self, enabled: bool) -> Result<(), PortError> {
        self.check()?;
        self.log.push(PortCall::SetMovementEnabled(enabled));
        Ok(())
    }

    fn remaining_distance(&self) -> Result<f32, PortError> {
        self.check()?;
        Ok(lock(&self.readout).remaining_distance())
    }

    fn stopping_threshold(&self) -> f32 {
        lock(&self.readout).stopping_threshold
    }
}

#[derive(Debug, Clone)]
pub struct RecordingAnimation {
    log: PortLog,
    names: Vec<String>,
    missing: Vec<String>,
}

impl RecordingAnimation {
    pub fn new(log: PortLog) -> Self {
        Self {
            log,
            names: Vec::new(),
            missing: Vec::new(),
        }
    }

    /// Animator controller без указанного параметра (resolve упадёт)
    pub fn without_parameter(mut self, name: &str) -> Self {
        self.missing.push(name.to_string());
        self
    }

    pub fn resolve_count(&self) -> usize {
        self.names.len()
    }

    fn name(&self, handle: AnimationHandle) -> String {
        self.names
            .get(handle.0 as usize)
            .cloned()
            .unwrap_or_else(|| format!("#{}", handle.0))
    }
}

impl AnimationPort for RecordingAnimation {
    fn resolve(&mut self, name: &str) -> Result<AnimationHandle, PortError> {
        if self.missing.iter().any(|missing| missing == name) {
            return Err(PortError::UnknownParameter(name.to_string()));
        }

        self.names.push(name.to_string());
        Ok(AnimationHandle((self.names.len() - 1) as u32))
    }

    fn set_flag(&mut self, handle: AnimationHandle, value: bool) -> Result<(), PortError> {
        self.log.push(PortCall::SetFlag(self.name(handle), value));
        Ok(())
    }

    fn fire_trigger(&mut self, handle: AnimationHandle) -> Result<(), PortError> {
        self.log.push(PortCall::FireTrigger(self.name(handle)));
        Ok(())
    }

    fn set_float(&mut self, handle: AnimationHandle, value: f32) -> Result<(), PortError> {
        self.log.push(PortCall::SetFloat(self.name(handle), value));
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct RecordingCollider {
    log: PortLog,
}

impl RecordingCollider {
    pub fn new(log: PortLog) -> Self {
        Self { log }
    }
}

impl ColliderPort for RecordingCollider {
    fn set_enabled(&mut self, enabled: bool) -> Result<(), PortError> {
        self.log.push(PortCall::ColliderEnabled(enabled));
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct RecordingPoolHost {
    log: PortLog,
}

impl RecordingPoolHost {
    pub fn new(log: PortLog) -> Self {
        Self { log }
    }
}

impl PoolHost for RecordingPoolHost {
    fn deactivate(&mut self, agent: Entity) {
        self.log.push(PortCall::Deactivate(agent));
    }
}
