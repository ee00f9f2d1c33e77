use bevy::prelude::*;
use constants::interaction::{FEATURE_CONE_DEGREES, FEATURE_MAX_DISTANCE_M, FEATURE_MIN_DISTANCE_M};

use super::camera::ArCamera;
use super::session::{PlaneAnchor, PlaneId, TrackingFrame};

/// Result of resolving a screen point into the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldHit {
    pub position: Vec3,
    /// Detected plane the point lies on, if any.
    pub plane: Option<PlaneId>,
    /// True for detected planes and for the infinite plane through the depth
    /// hint; false for estimates from feature points.
    pub hit_plane: bool,
}

impl WorldHit {
    /// Whether the point lies on a plane the session actually detected. Only
    /// these positions are exact enough to apply without smoothing.
    pub fn on_detected_plane(&self) -> bool {
        self.plane.is_some()
    }
}

/// A feature point matched against a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureHit {
    /// Projection of the feature onto the ray.
    pub position: Vec3,
    pub distance_to_origin: f32,
    pub feature: Vec3,
    pub distance_to_ray: f32,
}

/// Resolves a screen point to a world position using the current frame.
///
/// Detected planes win, then features inside a narrow cone around the ray.
/// With a depth hint, the infinite horizontal plane through it is used when
/// `infinite_plane` is set or no cone feature was found. The last resort is
/// the feature closest to the ray. Returns `None` while tracking has no pose.
pub fn world_position(
    frame: &TrackingFrame,
    camera: &ArCamera,
    screen: Vec2,
    object_position: Option<Vec3>,
    infinite_plane: bool,
) -> Option<WorldHit> {
    let pose = frame.camera?;
    let ray = camera.with_pose(pose).ray_from_screen(screen)?;

    if let Some((position, plane)) = hit_test_planes(&ray, &frame.planes) {
        return Some(WorldHit {
            position,
            plane: Some(plane),
            hit_plane: true,
        });
    }

    let high_quality = hit_test_features(
        &ray,
        &frame.feature_points,
        FEATURE_CONE_DEGREES,
        FEATURE_MIN_DISTANCE_M,
        FEATURE_MAX_DISTANCE_M,
    )
    .into_iter()
    .next();

    if infinite_plane || high_quality.is_none() {
        if let Some(position) =
            object_position.and_then(|hint| hit_test_infinite_horizontal_plane(&ray, hint))
        {
            return Some(WorldHit {
                position,
                plane: None,
                hit_plane: true,
            });
        }
    }

    if let Some(hit) = high_quality {
        return Some(WorldHit {
            position: hit.position,
            plane: None,
            hit_plane: false,
        });
    }

    closest_feature(&ray, &frame.feature_points).map(|hit| WorldHit {
        position: hit.position,
        plane: None,
        hit_plane: false,
    })
}

/// Nearest intersection with a detected plane, limited to the plane's extent.
pub fn hit_test_planes(ray: &Ray3d, planes: &[PlaneAnchor]) -> Option<(Vec3, PlaneId)> {
    planes
        .iter()
        .filter_map(|plane| {
            let normal = Dir3::new(plane.normal()).ok()?;
            let t = ray.intersect_plane(plane.transform.translation, InfinitePlane3d { normal })?;
            let point = ray.get_point(t);
            plane.contains(point).then_some((t, point, plane.id))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, point, id)| (point, id))
}

/// Features inside a cone of `cone_degrees` opening around the ray whose
/// projection lies between `min_distance` and `max_distance`, nearest first.
pub fn hit_test_features(
    ray: &Ray3d,
    features: &[Vec3],
    cone_degrees: f32,
    min_distance: f32,
    max_distance: f32,
) -> Vec<FeatureHit> {
    let max_angle = (cone_degrees.min(360.0) / 2.0).to_radians();
    let direction = ray.direction.as_vec3();

    let mut hits: Vec<FeatureHit> = features
        .iter()
        .filter_map(|&feature| {
            let origin_to_feature = feature - ray.origin;
            let along = direction.dot(origin_to_feature);
            let position = ray.origin + direction * along;
            let distance_to_origin = (position - ray.origin).length();
            if distance_to_origin < min_distance || distance_to_origin > max_distance {
                return None;
            }
            let angle = direction
                .dot(origin_to_feature.normalize_or_zero())
                .clamp(-1.0, 1.0)
                .acos();
            if angle > max_angle {
                return None;
            }
            Some(FeatureHit {
                position,
                distance_to_origin,
                feature,
                distance_to_ray: origin_to_feature.cross(direction).length(),
            })
        })
        .collect();

    hits.sort_by(|a, b| a.distance_to_origin.total_cmp(&b.distance_to_origin));
    hits
}

/// The feature in front of the camera that lies closest to the ray.
pub fn closest_feature(ray: &Ray3d, features: &[Vec3]) -> Option<FeatureHit> {
    let direction = ray.direction.as_vec3();
    features
        .iter()
        .filter_map(|&feature| {
            let origin_to_feature = feature - ray.origin;
            let along = direction.dot(origin_to_feature);
            if along <= 0.0 {
                return None;
            }
            let position = ray.origin + direction * along;
            Some(FeatureHit {
                position,
                distance_to_origin: along,
                feature,
                distance_to_ray: origin_to_feature.cross(direction).length(),
            })
        })
        .min_by(|a, b| a.distance_to_ray.total_cmp(&b.distance_to_ray))
}

/// Intersection with the horizontal plane through `point`.
pub fn hit_test_infinite_horizontal_plane(ray: &Ray3d, point: Vec3) -> Option<Vec3> {
    let t = ray.intersect_plane(point, InfinitePlane3d::new(Vec3::Y))?;
    Some(ray.get_point(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn looking_down_frame() -> (TrackingFrame, ArCamera) {
        let pose = Transform::from_xyz(0.0, 1.0, 0.0).looking_at(Vec3::new(0.0, 0.0, -1.0), Vec3::Y);
        let frame = TrackingFrame {
            camera: Some(pose),
            ..default()
        };
        let camera = ArCamera {
            viewport: Vec2::new(800.0, 600.0),
            ..default()
        };
        (frame, camera)
    }

    #[test]
    fn no_camera_pose_means_no_hit() {
        let frame = TrackingFrame::default();
        let camera = ArCamera::default();
        let hit = world_position(&frame, &camera, camera.screen_center(), Some(Vec3::ZERO), true);
        assert!(hit.is_none());
    }

    #[test]
    fn detected_plane_wins() {
        let (mut frame, camera) = looking_down_frame();
        frame.planes.push(PlaneAnchor::new(
            PlaneId(7),
            Transform::from_xyz(0.0, 0.0, -1.0),
            Vec2::splat(2.0),
        ));
        frame.feature_points.push(Vec3::new(0.0, 0.5, -0.5));

        let hit = world_position(&frame, &camera, camera.screen_center(), None, false)
            .expect("plane hit");
        assert_eq!(hit.plane, Some(PlaneId(7)));
        assert!(hit.hit_plane);
        assert!(hit.on_detected_plane());
        assert!(hit.position.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-3));
    }

    #[test]
    fn plane_outside_extent_is_ignored() {
        let (mut frame, camera) = looking_down_frame();
        frame.planes.push(PlaneAnchor::new(
            PlaneId(7),
            Transform::from_xyz(3.0, 0.0, -1.0),
            Vec2::splat(1.0),
        ));
        assert!(world_position(&frame, &camera, camera.screen_center(), None, false).is_none());
    }

    #[test]
    fn cone_feature_is_an_unconfirmed_estimate() {
        let (mut frame, camera) = looking_down_frame();
        frame.feature_points.push(Vec3::new(0.01, 0.0, -1.0));

        let hit = world_position(&frame, &camera, camera.screen_center(), None, false)
            .expect("feature hit");
        assert_eq!(hit.plane, None);
        assert!(!hit.hit_plane);
        assert!(hit.position.distance(Vec3::new(0.0, 0.0, -1.0)) < 0.02);
    }

    #[test]
    fn infinite_plane_through_hint_when_requested() {
        let (mut frame, camera) = looking_down_frame();
        frame.feature_points.push(Vec3::new(0.0, 0.5, -0.5));

        let hit = world_position(
            &frame,
            &camera,
            camera.screen_center(),
            Some(Vec3::new(0.4, 0.0, -3.0)),
            true,
        )
        .expect("infinite plane hit");
        assert!(hit.hit_plane);
        assert_eq!(hit.plane, None);
        assert!(!hit.on_detected_plane());
        assert!(hit.position.y.abs() < 1e-4);
    }

    #[test]
    fn far_features_fall_back_to_closest_to_ray() {
        let (mut frame, camera) = looking_down_frame();
        let far = Vec3::new(0.0, -4.0, -5.0);
        frame.feature_points.push(far);

        let hit = world_position(&frame, &camera, camera.screen_center(), None, false)
            .expect("fallback feature hit");
        assert!(!hit.hit_plane);
        assert!(hit.position.distance(far) < 0.01);
    }

    #[test]
    fn features_behind_camera_are_ignored() {
        let (mut frame, camera) = looking_down_frame();
        frame.feature_points.push(Vec3::new(0.0, 2.0, 1.0));
        assert!(world_position(&frame, &camera, camera.screen_center(), None, false).is_none());
    }
}
