use std::collections::{HashSet, VecDeque};
use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;
use constants::focus_square::{
    BILLBOARD_DISTANCE_M, POSITION_SMOOTHING_WINDOW, SCALE_DISTANCE_FACTOR,
    SCALE_DISTANCE_OFFSET, SCALE_NEAR_DISTANCE_M,
};

use crate::engine::tracking::PlaneId;

/// Where the focus square currently lives in the scene hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusAttachment {
    /// Child of the camera, transform is camera-local.
    #[default]
    Camera,
    /// Free in the world.
    World,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum FocusSquareState {
    #[default]
    Initializing,
    FeaturesDetected {
        anchor_position: Vec3,
        camera: Option<Transform>,
    },
    PlaneDetected {
        anchor_position: Vec3,
        plane: PlaneId,
        camera: Option<Transform>,
    },
}

impl FocusSquareState {
    pub fn anchor_position(&self) -> Option<Vec3> {
        match self {
            FocusSquareState::Initializing => None,
            FocusSquareState::FeaturesDetected {
                anchor_position, ..
            }
            | FocusSquareState::PlaneDetected {
                anchor_position, ..
            } => Some(*anchor_position),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FocusSquareState::Initializing => "initializing",
            FocusSquareState::FeaturesDetected { .. } => "features_detected",
            FocusSquareState::PlaneDetected { .. } => "plane_detected",
        }
    }
}

/// The placement indicator.
///
/// Holds the state reported by the per-frame hit test and derives from it how
/// the indicator is drawn: a camera billboard while initialising, otherwise a
/// ground-aligned square at the averaged recent anchor positions, open for
/// feature estimates and closed when snapped to a plane.
#[derive(Resource, Debug, Clone)]
pub struct FocusSquare {
    state: FocusSquareState,
    pub(crate) attachment: FocusAttachment,
    hidden: bool,
    recent_positions: VecDeque<Vec3>,
    current_plane: Option<PlaneId>,
    visited_planes: HashSet<PlaneId>,
    display: Transform,
    is_open: bool,
    first_visit: bool,
}

impl Default for FocusSquare {
    fn default() -> Self {
        Self {
            state: FocusSquareState::Initializing,
            attachment: FocusAttachment::Camera,
            hidden: false,
            recent_positions: VecDeque::with_capacity(POSITION_SMOOTHING_WINDOW),
            current_plane: None,
            visited_planes: HashSet::new(),
            display: billboard_transform(),
            is_open: true,
            first_visit: false,
        }
    }
}

impl FocusSquare {
    pub fn state(&self) -> &FocusSquareState {
        &self.state
    }

    pub fn set_state(&mut self, state: FocusSquareState) {
        match &state {
            FocusSquareState::Initializing => self.display_as_billboard(),
            FocusSquareState::FeaturesDetected {
                anchor_position,
                camera,
            } => self.display_as_open(*anchor_position, camera.as_ref()),
            FocusSquareState::PlaneDetected {
                anchor_position,
                plane,
                camera,
            } => self.display_as_closed(*anchor_position, *plane, camera.as_ref()),
        }
        self.state = state;
    }

    /// Anchor position of the current estimate, absent while initialising.
    pub fn last_position(&self) -> Option<Vec3> {
        self.state.anchor_position()
    }

    pub fn current_plane(&self) -> Option<PlaneId> {
        self.current_plane
    }

    pub fn attachment(&self) -> FocusAttachment {
        self.attachment
    }

    pub fn hide(&mut self) {
        self.hidden = true;
    }

    pub fn unhide(&mut self) {
        self.hidden = false;
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// True while a newly visited plane should flash.
    pub fn is_first_visit(&self) -> bool {
        self.first_visit
    }

    /// Transform to draw with, relative to whatever the square is attached to.
    pub fn display_transform(&self) -> Transform {
        self.display
    }

    /// Back to `Initializing`, forgetting visited planes and history.
    pub fn reset(&mut self) {
        let attachment = self.attachment;
        *self = Self {
            attachment,
            ..Self::default()
        };
    }

    fn display_as_billboard(&mut self) {
        self.recent_positions.clear();
        self.current_plane = None;
        self.is_open = true;
        self.first_visit = false;
        self.display = billboard_transform();
    }

    fn display_as_open(&mut self, position: Vec3, camera: Option<&Transform>) {
        self.current_plane = None;
        self.is_open = true;
        self.first_visit = false;
        self.update_transform(position, camera);
    }

    fn display_as_closed(&mut self, position: Vec3, plane: PlaneId, camera: Option<&Transform>) {
        if self.current_plane != Some(plane) {
            // Snap straight onto a new plane instead of gliding from the old one.
            self.recent_positions.clear();
        }
        self.current_plane = Some(plane);
        self.first_visit = self.visited_planes.insert(plane);
        self.is_open = false;
        self.update_transform(position, camera);
    }

    fn update_transform(&mut self, position: Vec3, camera: Option<&Transform>) {
        self.recent_positions.push_back(position);
        while self.recent_positions.len() > POSITION_SMOOTHING_WINDOW {
            self.recent_positions.pop_front();
        }
        let average =
            self.recent_positions.iter().sum::<Vec3>() / self.recent_positions.len() as f32;

        let Some(camera) = camera else {
            self.display = Transform::from_translation(average);
            return;
        };

        let scale = scale_for_distance(camera.translation.distance(average));
        self.display = Transform::from_translation(average)
            .with_rotation(Quat::from_rotation_y(camera_heading(camera)))
            .with_scale(Vec3::splat(scale));
    }
}

fn billboard_transform() -> Transform {
    Transform::from_xyz(0.0, 0.0, -BILLBOARD_DISTANCE_M)
        .with_rotation(Quat::from_rotation_x(FRAC_PI_2))
}

/// Keeps the square a similar size on screen, growing slower far away.
pub fn scale_for_distance(distance: f32) -> f32 {
    if distance < SCALE_NEAR_DISTANCE_M {
        distance / SCALE_NEAR_DISTANCE_M
    } else {
        SCALE_DISTANCE_FACTOR * distance + SCALE_DISTANCE_OFFSET
    }
}

/// Yaw of the camera's view direction projected onto the ground. Looking
/// straight down falls back to the camera's up vector.
pub fn camera_heading(camera: &Transform) -> f32 {
    let forward = camera.forward().as_vec3();
    let mut flat = Vec2::new(forward.x, forward.z);
    if flat.length_squared() < 1e-6 {
        let up = camera.up().as_vec3();
        flat = Vec2::new(up.x, up.z);
    }
    (-flat.x).atan2(-flat.y)
}
