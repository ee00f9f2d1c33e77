use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use super::session::TrackingFrame;

/// Marks the Bevy camera entity that mirrors the tracked device pose.
#[derive(Component, Debug, Default)]
pub struct ArCameraView;

/// Pinhole model of the device camera.
///
/// Screen coordinates are logical pixels with the origin at the top-left, the
/// same space touch and cursor positions arrive in. Projection uses a `[0, 1]`
/// depth range; Bevy's own reversed-infinite projection describes the same
/// rays, so picking here agrees with what is drawn.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ArCamera {
    pub pose: Transform,
    pub viewport: Vec2,
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ArCamera {
    fn default() -> Self {
        Self {
            pose: Transform::IDENTITY,
            viewport: Vec2::new(1280.0, 720.0),
            fov_y: 60f32.to_radians(),
            near: 0.01,
            far: 100.0,
        }
    }
}

impl ArCamera {
    /// Same intrinsics, different pose.
    pub fn with_pose(&self, pose: Transform) -> Self {
        Self {
            pose,
            ..self.clone()
        }
    }

    pub fn screen_center(&self) -> Vec2 {
        self.viewport * 0.5
    }

    pub fn aspect_ratio(&self) -> f32 {
        if self.viewport.y > 0.0 {
            self.viewport.x / self.viewport.y
        } else {
            1.0
        }
    }

    pub fn clip_from_world(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio(), self.near, self.far)
            * self.pose.compute_matrix().inverse()
    }

    fn ndc_from_screen(&self, screen: Vec2) -> Vec2 {
        Vec2::new(
            screen.x / self.viewport.x * 2.0 - 1.0,
            1.0 - screen.y / self.viewport.y * 2.0,
        )
    }

    /// Ray from the camera origin through a screen point.
    pub fn ray_from_screen(&self, screen: Vec2) -> Option<Ray3d> {
        if self.viewport.x <= 0.0 || self.viewport.y <= 0.0 {
            return None;
        }
        let ndc = self.ndc_from_screen(screen);
        let world_from_clip = self.clip_from_world().inverse();
        let near = world_from_clip.project_point3(ndc.extend(0.0));
        let far = world_from_clip.project_point3(ndc.extend(1.0));
        let direction = Dir3::new(far - near).ok()?;
        Some(Ray3d::new(self.pose.translation, direction))
    }

    /// Screen position of a world point, `None` when it is behind the camera.
    pub fn project(&self, world: Vec3) -> Option<Vec2> {
        let clip = self.clip_from_world() * world.extend(1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.viewport.x,
            (1.0 - ndc.y) * 0.5 * self.viewport.y,
        ))
    }

    /// Frustum planes as `(normal, d)` with normals pointing inward.
    fn frustum_planes(&self) -> [Vec4; 6] {
        let m = self.clip_from_world();
        let (r0, r1, r2, r3) = (m.row(0), m.row(1), m.row(2), m.row(3));
        [r3 + r0, r3 - r0, r3 + r1, r3 - r1, r2, r3 - r2]
    }

    /// Whether any part of an oriented box of `size` (in the transform's local
    /// space, before scale) may be visible.
    pub fn is_in_view_frustum(&self, transform: &Transform, size: Vec3) -> bool {
        let half = size * 0.5;
        let corners: Vec<Vec3> = (0..8)
            .map(|i| {
                let sign = Vec3::new(
                    if i & 1 == 0 { -1.0 } else { 1.0 },
                    if i & 2 == 0 { -1.0 } else { 1.0 },
                    if i & 4 == 0 { -1.0 } else { 1.0 },
                );
                transform.transform_point(half * sign)
            })
            .collect();

        self.frustum_planes().iter().all(|plane| {
            corners
                .iter()
                .any(|corner| plane.truncate().dot(*corner) + plane.w >= 0.0)
        })
    }
}

/// Mirrors the tracked pose and the window size into `ArCamera` and the
/// rendering camera.
pub fn sync_ar_camera(
    frame: Res<TrackingFrame>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut camera: ResMut<ArCamera>,
    mut views: Query<(&mut Transform, &mut Projection), With<ArCameraView>>,
) {
    if let Ok(window) = windows.single() {
        let size = window.size();
        if size.x > 0.0 && size.y > 0.0 && camera.viewport != size {
            camera.viewport = size;
        }
    }
    if let Some(pose) = frame.camera {
        camera.pose = pose;
    }

    for (mut transform, mut projection) in &mut views {
        *transform = camera.pose;
        if let Projection::Perspective(perspective) = projection.as_mut() {
            if perspective.fov != camera.fov_y {
                perspective.fov = camera.fov_y;
                perspective.near = camera.near;
                perspective.far = camera.far;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> ArCamera {
        ArCamera {
            viewport: Vec2::new(800.0, 600.0),
            ..default()
        }
    }

    #[test]
    fn screen_center_ray_points_forward() {
        let camera = camera();
        let ray = camera
            .ray_from_screen(camera.screen_center())
            .expect("valid viewport");
        assert!(ray.origin.abs_diff_eq(Vec3::ZERO, 1e-5));
        assert!(ray.direction.as_vec3().abs_diff_eq(Vec3::NEG_Z, 1e-4));
    }

    #[test]
    fn top_left_ray_points_up_and_left() {
        let ray = camera().ray_from_screen(Vec2::ZERO).expect("valid viewport");
        assert!(ray.direction.x < 0.0);
        assert!(ray.direction.y > 0.0);
    }

    #[test]
    fn project_inverts_ray() {
        let camera = camera().with_pose(
            Transform::from_xyz(0.5, 1.2, 0.0).looking_at(Vec3::new(0.0, 0.0, -2.0), Vec3::Y),
        );
        let screen = Vec2::new(250.0, 410.0);
        let ray = camera.ray_from_screen(screen).expect("valid viewport");
        let projected = camera.project(ray.get_point(3.0)).expect("in front");
        assert!(projected.abs_diff_eq(screen, 0.5));
    }

    #[test]
    fn points_behind_do_not_project() {
        assert!(camera().project(Vec3::new(0.0, 0.0, 2.0)).is_none());
    }

    #[test]
    fn frustum_test_sees_objects_in_front_only() {
        let camera = camera();
        let size = Vec3::splat(0.2);
        assert!(camera.is_in_view_frustum(&Transform::from_xyz(0.0, 0.0, -2.0), size));
        assert!(!camera.is_in_view_frustum(&Transform::from_xyz(0.0, 0.0, 2.0), size));
        assert!(!camera.is_in_view_frustum(&Transform::from_xyz(50.0, 0.0, -2.0), size));
    }
}
