use bevy::prelude::*;

use super::ray::ray_hits_oriented_box;
use crate::engine::scene::{ObjectBounds, ObjectId};
use crate::engine::tracking::ArCamera;

/// Snapshot of the placed objects' boxes for screen-space picking.
#[derive(Debug, Default, Clone)]
pub struct PickTargets {
    boxes: Vec<(ObjectId, Mat4, Vec3)>,
}

impl PickTargets {
    pub fn new<'a>(objects: impl IntoIterator<Item = (ObjectId, &'a Transform, &'a ObjectBounds)>) -> Self {
        Self {
            boxes: objects
                .into_iter()
                .map(|(id, transform, bounds)| (id, transform.compute_matrix(), bounds.0))
                .collect(),
        }
    }

    /// Nearest object under a screen point. A miss is a miss.
    pub fn object_at(&self, camera: &ArCamera, screen: Vec2) -> Option<ObjectId> {
        let ray = camera.ray_from_screen(screen)?;
        self.boxes
            .iter()
            .filter_map(|(id, world_from_local, size)| {
                ray_hits_oriented_box(&ray, *world_from_local, *size).map(|t| (*id, t))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Object a multi-touch gesture is acting on: the first touch with a direct
    /// hit, otherwise whatever lies under the touches' centre.
    pub fn object_interacting(
        &self,
        camera: &ArCamera,
        touches: &[Vec2],
        center: Option<Vec2>,
    ) -> Option<ObjectId> {
        touches
            .iter()
            .find_map(|touch| self.object_at(camera, *touch))
            .or_else(|| center.and_then(|center| self.object_at(camera, center)))
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

    fn targets() -> PickTargets {
        let near = Transform::from_xyz(0.0, 0.0, -2.0);
        let far = Transform::from_xyz(0.0, 0.0, -4.0);
        let side = Transform::from_xyz(1.5, 0.0, -3.0);
        let bounds = ObjectBounds(Vec3::splat(0.5));
        PickTargets::new([
            (ObjectId(2), &far, &bounds),
            (ObjectId(1), &near, &bounds),
            (ObjectId(3), &side, &bounds),
        ])
    }

    #[test]
    fn nearest_object_wins() {
        let camera = camera();
        assert_eq!(targets().object_at(&camera, camera.screen_center()), Some(ObjectId(1)));
    }

    #[test]
    fn empty_space_is_a_miss() {
        assert_eq!(targets().object_at(&camera(), Vec2::new(10.0, 10.0)), None);
    }

    #[test]
    fn touches_win_over_centroid() {
        let camera = camera();
        let side = camera
            .project(Vec3::new(1.5, 0.0, -3.0))
            .expect("side object is visible");
        let found = targets().object_interacting(
            &camera,
            &[Vec2::new(10.0, 10.0), side],
            Some(camera.screen_center()),
        );
        assert_eq!(found, Some(ObjectId(3)));
    }

    #[test]
    fn centroid_is_the_fallback() {
        let camera = camera();
        let found = targets().object_interacting(
            &camera,
            &[Vec2::new(10.0, 10.0)],
            Some(camera.screen_center()),
        );
        assert_eq!(found, Some(ObjectId(1)));
    }
}
