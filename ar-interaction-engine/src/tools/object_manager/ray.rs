use bevy::prelude::*;

/// Distance along `ray` to an oriented box of `size` centred on `world_from_local`.
pub fn ray_hits_oriented_box(ray: &Ray3d, world_from_local: Mat4, size: Vec3) -> Option<f32> {
    let local_from_world = world_from_local.inverse();
    let origin = local_from_world.transform_point3(ray.origin);
    let direction = local_from_world.transform_vector3(ray.direction.as_vec3());
    let half = size * 0.5;
    // Scale is folded into `direction`, so `t` stays in world ray units.
    ray_aabb_hit_t(origin, direction, -half, half)
}

/// Slab-method ray to AABB intersection. Returns the entry distance, or the
/// exit distance when the origin is inside the box.
pub fn ray_aabb_hit_t(origin: Vec3, direction: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;

    for axis in 0..3 {
        let (o, d) = (origin[axis], direction[axis]);
        if d == 0.0 {
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let (mut near, mut far) = ((min[axis] - o) * inv, (max[axis] - o) * inv);
        if near > far {
            std::mem::swap(&mut near, &mut far);
        }
        t_enter = t_enter.max(near);
        t_exit = t_exit.min(far);
        if t_enter > t_exit {
            return None;
        }
    }

    if t_exit < 0.0 {
        return None;
    }
    Some(if t_enter >= 0.0 { t_enter } else { t_exit })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hits_box_in_front() {
        let ray = Ray3d::new(Vec3::ZERO, Dir3::NEG_Z);
        let t = ray_hits_oriented_box(
            &ray,
            Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0)),
            Vec3::ONE,
        );
        assert!((t.expect("hit") - 4.5).abs() < 1e-5);
    }

    #[test]
    fn misses_box_behind_or_beside() {
        let ray = Ray3d::new(Vec3::ZERO, Dir3::NEG_Z);
        assert!(ray_hits_oriented_box(&ray, Mat4::from_translation(Vec3::Z * 5.0), Vec3::ONE).is_none());
        assert!(
            ray_hits_oriented_box(&ray, Mat4::from_translation(Vec3::new(2.0, 0.0, -5.0)), Vec3::ONE)
                .is_none()
        );
    }

    #[test]
    fn rotation_and_scale_are_respected() {
        let ray = Ray3d::new(Vec3::new(0.6, 0.0, 0.0), Dir3::NEG_Z);
        let thin = Vec3::new(1.0, 1.0, 0.1);
        let facing = Mat4::from_translation(Vec3::new(0.0, 0.0, -3.0));
        assert!(ray_hits_oriented_box(&ray, facing, thin).is_none());

        let scaled = Mat4::from_scale_rotation_translation(
            Vec3::splat(2.0),
            Quat::IDENTITY,
            Vec3::new(0.0, 0.0, -3.0),
        );
        let t = ray_hits_oriented_box(&ray, scaled, thin).expect("scaled box is hit");
        assert!((t - 2.9).abs() < 1e-4);
    }

    #[test]
    fn origin_inside_box_reports_exit() {
        let t = ray_aabb_hit_t(Vec3::ZERO, Vec3::X, -Vec3::ONE, Vec3::ONE);
        assert_eq!(t, Some(1.0));
    }
}
