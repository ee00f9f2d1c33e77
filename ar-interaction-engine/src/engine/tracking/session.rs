use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Stable identity of a detected plane anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaneId(pub u64);

/// A surface reported by the tracking session.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneAnchor {
    pub id: PlaneId,
    /// Plane centre and orientation. The local Y axis is the plane normal.
    pub transform: Transform,
    /// Detected width (local X) and depth (local Z).
    pub extent: Vec2,
}

impl PlaneAnchor {
    pub fn new(id: PlaneId, transform: Transform, extent: Vec2) -> Self {
        Self {
            id,
            transform,
            extent,
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.transform.rotation * Vec3::Y
    }

    /// Whether a point lying on the plane falls inside the detected extent.
    pub fn contains(&self, point: Vec3) -> bool {
        let local = self.transform.rotation.inverse() * (point - self.transform.translation);
        local.x.abs() <= self.extent.x * 0.5 && local.z.abs() <= self.extent.y * 0.5
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingState {
    #[default]
    NotAvailable,
    Limited,
    Normal,
}

/// Snapshot of the tracking session for the current tick.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct TrackingFrame {
    /// Camera pose in world space, absent until tracking starts.
    pub camera: Option<Transform>,
    pub tracking_state: TrackingState,
    pub planes: Vec<PlaneAnchor>,
    pub feature_points: Vec<Vec3>,
}

impl TrackingFrame {
    pub fn current_camera_transform(&self) -> Option<Transform> {
        self.camera
    }
}

/// External world tracking collaborator.
pub trait TrackingSession: Send + Sync + 'static {
    /// Latest frame at `elapsed` seconds, or `None` before the session produced one.
    fn current_frame(&mut self, elapsed: f32) -> Option<TrackingFrame>;

    /// Restarts tracking and drops every anchor.
    fn reset(&mut self);
}

/// The running tracking session. Absent when frames are fed in directly.
#[derive(Resource)]
pub struct ArSession(pub Box<dyn TrackingSession>);

impl ArSession {
    pub fn new(session: impl TrackingSession) -> Self {
        Self(Box::new(session))
    }
}

/// Scripted session for the native demo: a phone held at chest height slowly
/// panning over a floor, which becomes a detected plane after a short delay.
#[derive(Debug, Clone)]
pub struct SimulatedSession {
    pub camera_height: f32,
    pub camera_pitch: f32,
    pub sway_amplitude: f32,
    pub sway_speed: f32,
    pub warmup_secs: f32,
    /// Tracking reports `Limited` until this many seconds into the session.
    pub limited_until_secs: f32,
    pub plane_after_secs: f32,
    pub floor_extent: Vec2,
    started_at: Option<f32>,
}

impl Default for SimulatedSession {
    fn default() -> Self {
        Self {
            camera_height: 1.4,
            camera_pitch: -0.6,
            sway_amplitude: 0.35,
            sway_speed: 0.25,
            warmup_secs: 0.5,
            limited_until_secs: 1.0,
            plane_after_secs: 2.5,
            floor_extent: Vec2::new(3.0, 3.0),
            started_at: None,
        }
    }
}

impl SimulatedSession {
    fn floor_centre(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, -1.8)
    }

    fn camera_pose(&self, t: f32) -> Transform {
        let yaw = (t * self.sway_speed).sin() * self.sway_amplitude;
        Transform::from_xyz(0.0, self.camera_height, 0.0).with_rotation(Quat::from_euler(
            EulerRot::YXZ,
            yaw,
            self.camera_pitch,
            0.0,
        ))
    }

    fn feature_points(&self) -> Vec<Vec3> {
        let centre = self.floor_centre();
        let half = self.floor_extent * 0.5;
        let mut points = Vec::new();
        let mut x = -half.x;
        while x <= half.x {
            let mut z = -half.y;
            while z <= half.y {
                // Deterministic jitter so features do not form a perfect grid.
                let jitter = ((x * 12.9898 + z * 78.233).sin() * 43758.547).fract() * 0.05;
                points.push(centre + Vec3::new(x + jitter, 0.0, z - jitter));
                z += 0.3;
            }
            x += 0.3;
        }
        points
    }
}

impl TrackingSession for SimulatedSession {
    fn current_frame(&mut self, elapsed: f32) -> Option<TrackingFrame> {
        let start = *self.started_at.get_or_insert(elapsed);
        let t = elapsed - start;
        if t < self.warmup_secs {
            return None;
        }

        let planes = if t >= self.plane_after_secs {
            vec![PlaneAnchor::new(
                PlaneId(1),
                Transform::from_translation(self.floor_centre()),
                self.floor_extent,
            )]
        } else {
            Vec::new()
        };

        let tracking_state = if t < self.limited_until_secs {
            TrackingState::Limited
        } else {
            TrackingState::Normal
        };

        Some(TrackingFrame {
            camera: Some(self.camera_pose(t)),
            tracking_state,
            planes,
            feature_points: self.feature_points(),
        })
    }

    fn reset(&mut self) {
        self.started_at = None;
    }
}

/// Copies the session's latest frame into `TrackingFrame`.
pub fn pull_tracking_frame(
    time: Res<Time>,
    session: Option<ResMut<ArSession>>,
    mut frame: ResMut<TrackingFrame>,
) {
    let Some(mut session) = session else {
        return;
    };
    match session.0.current_frame(time.elapsed_secs()) {
        Some(next) => *frame = next,
        None => *frame = TrackingFrame::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_contains_respects_extent() {
        let plane = PlaneAnchor::new(
            PlaneId(3),
            Transform::from_xyz(1.0, 0.0, -2.0),
            Vec2::new(2.0, 1.0),
        );
        assert!(plane.contains(Vec3::new(1.9, 0.0, -2.4)));
        assert!(!plane.contains(Vec3::new(2.1, 0.0, -2.0)));
        assert!(!plane.contains(Vec3::new(1.0, 0.0, -2.6)));
    }

    #[test]
    fn simulated_session_warms_up_then_detects_floor() {
        let mut session = SimulatedSession::default();
        assert!(session.current_frame(10.0).is_none());

        let limited = session.current_frame(10.6).expect("frame after warmup");
        assert_eq!(limited.tracking_state, TrackingState::Limited);

        let features_only = session.current_frame(11.0).expect("frame after warmup");
        assert_eq!(features_only.tracking_state, TrackingState::Normal);
        assert!(features_only.camera.is_some());
        assert!(features_only.planes.is_empty());
        assert!(!features_only.feature_points.is_empty());

        let with_plane = session.current_frame(13.0).expect("frame after plane delay");
        assert_eq!(with_plane.planes.len(), 1);
        assert_eq!(with_plane.planes[0].id, PlaneId(1));
    }

    #[test]
    fn reset_restarts_the_warmup() {
        let mut session = SimulatedSession::default();
        session.current_frame(0.0);
        assert!(session.current_frame(5.0).is_some());

        session.reset();
        assert!(session.current_frame(6.0).is_none());
    }
}
