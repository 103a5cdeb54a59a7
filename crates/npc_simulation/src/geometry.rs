//! Геометрия для AI: дистанция, поворот к цели, генерация wander точек.
//!
//! Все функции чистые (без ECS), RNG передаётся снаружи для детерминизма.

use bevy::prelude::*;
use rand::Rng;

/// Дистанция агент → цель (полная 3D, как у navmesh agent)
pub fn distance(from: Vec3, to: Vec3) -> f32 {
    from.distance(to)
}

/// Направление к цели в горизонтальной плоскости (y = 0)
pub fn flat_direction(from: Vec3, to: Vec3) -> Vec3 {
    let mut direction = to - from;
    direction.y = 0.0;
    direction
}

/// Yaw-only rotation, смотрящий вдоль `direction` (Bevy forward = -Z)
///
/// `direction` должен быть ненулевым в XZ плоскости.
pub fn look_rotation(direction: Vec3) -> Quat {
    let yaw = f32::atan2(-direction.x, -direction.z);
    Quat::from_rotation_y(yaw)
}

/// Плавный поворот к цели
///
/// Цель прямо над/под агентом (flat direction == 0) → rotation не меняется.
/// `turn_speed * dt` ограничен [0, 1] чтобы slerp не перелетал.
pub fn face_towards(position: Vec3, target: Vec3, current: Quat, dt: f32, turn_speed: f32) -> Quat {
    let direction = flat_direction(position, target);
    if direction.length_squared() <= f32::EPSILON {
        return current;
    }

    let look = look_rotation(direction);
    let t = (dt * turn_speed).clamp(0.0, 1.0);
    current.slerp(look, t)
}

/// Случайная wander точка вокруг `origin`
///
/// direction: равномерно по кругу в XZ, y = 0
/// distance: равномерно в [min_distance, max_distance]
pub fn wander_destination<R: Rng + ?Sized>(
    origin: Vec3,
    min_distance: f32,
    max_distance: f32,
    rng: &mut R,
) -> Vec3 {
    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
    let distance = rng.gen_range(min_distance..=max_distance);

    origin + Vec3::new(angle.cos(), 0.0, angle.sin()) * distance
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_wander_destination_within_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let origin = Vec3::new(4.0, 1.5, -2.0);

        for _ in 0..500 {
            let target = wander_destination(origin, 1.0, 3.0, &mut rng);
            let offset = target - origin;

            assert_eq!(offset.y, 0.0, "wander offset must stay horizontal");
            let d = offset.length();
            assert!(d >= 1.0 - 1e-4 && d <= 3.0 + 1e-4, "distance {} out of [1, 3]", d);
        }
    }

    #[test]
    fn test_wander_destination_fixed_distance() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let target = wander_destination(Vec3::ZERO, 2.0, 2.0, &mut rng);
        assert!((target.length() - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_wander_destination_same_seed_same_point() {
        let mut a = ChaCha8Rng::seed_from_u64(99);
        let mut b = ChaCha8Rng::seed_from_u64(99);

        for _ in 0..10 {
            assert_eq!(
                wander_destination(Vec3::ZERO, 1.0, 3.0, &mut a),
                wander_destination(Vec3::ZERO, 1.0, 3.0, &mut b)
            );
        }
    }

    #[test]
    fn test_look_rotation_points_forward_at_target() {
        for direction in [Vec3::X, Vec3::NEG_X, Vec3::Z, Vec3::NEG_Z, Vec3::new(1.0, 0.0, 1.0)] {
            let rotation = look_rotation(direction);
            let forward = rotation * Vec3::NEG_Z;
            assert!(
                forward.abs_diff_eq(direction.normalize(), 1e-4),
                "forward {:?} != {:?}",
                forward,
                direction
            );
        }
    }

    #[test]
    fn test_face_towards_full_step_snaps() {
        let rotation = face_towards(Vec3::ZERO, Vec3::new(5.0, 3.0, 0.0), Quat::IDENTITY, 1.0, 5.0);
        let forward = rotation * Vec3::NEG_Z;

        // Вертикаль игнорируется - смотрим строго по +X
        assert!(forward.abs_diff_eq(Vec3::X, 1e-4));
    }

    #[test]
    fn test_face_towards_partial_step_is_between() {
        let target = Vec3::new(5.0, 0.0, 0.0);
        let rotation = face_towards(Vec3::ZERO, target, Quat::IDENTITY, 0.1, 5.0);

        let full = look_rotation(Vec3::X);
        let turned = rotation.angle_between(Quat::IDENTITY);
        let remaining = rotation.angle_between(full);

        assert!(turned > 0.0);
        assert!(remaining > 0.0);
        assert!((turned + remaining - full.angle_between(Quat::IDENTITY)).abs() < 1e-3);
    }

    #[test]
    fn test_face_towards_target_directly_above_is_noop() {
        let current = Quat::from_rotation_y(0.7);
        let rotation = face_towards(Vec3::ZERO, Vec3::new(0.0, 10.0, 0.0), current, 0.3, 5.0);
        assert_eq!(rotation, current);
    }

    #[test]
    fn test_distance_includes_vertical() {
        assert_eq!(distance(Vec3::ZERO, Vec3::new(0.0, 3.0, 4.0)), 5.0);
    }
}
