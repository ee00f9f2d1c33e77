use std::collections::VecDeque;
use std::f32::consts::FRAC_PI_2;
use std::fmt;

use bevy::prelude::*;
use constants::interaction::{
    MAX_OBJECT_DISTANCE_M, OBJECT_DISTANCE_SMOOTHING_WINDOW, TEXT_GLYPH_SIZE,
};
use serde::{Deserialize, Serialize};

/// Identity of a placed object. Selection and tracking hold these, never entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a placed object is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObjectKind {
    Emoji { name: String },
    Text { text: String },
}

impl ObjectKind {
    pub fn is_text(&self) -> bool {
        matches!(self, ObjectKind::Text { .. })
    }

    pub fn label(&self) -> &str {
        match self {
            ObjectKind::Emoji { name } => name,
            ObjectKind::Text { .. } => "text",
        }
    }
}

/// Limits applied when moving an object relative to the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectMotion {
    pub max_distance: f32,
    pub smoothing_window: usize,
}

impl Default for ObjectMotion {
    fn default() -> Self {
        Self {
            max_distance: MAX_OBJECT_DISTANCE_M,
            smoothing_window: OBJECT_DISTANCE_SMOOTHING_WINDOW,
        }
    }
}

/// A placed emoji prop or 3D text.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct VirtualObject {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub is_standing: bool,
    recent_distances: VecDeque<f32>,
}

impl VirtualObject {
    pub fn new(id: ObjectId, kind: ObjectKind) -> Self {
        Self {
            id,
            kind,
            is_standing: true,
            recent_distances: VecDeque::new(),
        }
    }

    pub fn is_text(&self) -> bool {
        self.kind.is_text()
    }

    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            ObjectKind::Text { text } => Some(text),
            ObjectKind::Emoji { .. } => None,
        }
    }

    /// Replaces the text payload. Returns false for non-text objects.
    pub fn set_text(&mut self, new_text: impl Into<String>) -> bool {
        match &mut self.kind {
            ObjectKind::Text { text } => {
                *text = new_text.into();
                true
            }
            ObjectKind::Emoji { .. } => false,
        }
    }

    /// Tips a standing object onto its back, or stands a fallen one up.
    pub fn toggle_standing(&mut self, transform: &mut Transform) {
        if self.is_standing {
            transform.rotate_local_x(FRAC_PI_2);
        } else {
            transform.rotate_local_x(-FRAC_PI_2);
        }
        self.is_standing = !self.is_standing;
    }

    /// Moves the object to `new_position` as seen from `camera`.
    ///
    /// The camera-to-object offset is clamped to `motion.max_distance`. Smoothed
    /// moves keep the current direction but use the average distance over the
    /// last `motion.smoothing_window` updates, which hides depth noise from
    /// feature-point estimates.
    pub fn set_position(
        &mut self,
        transform: &mut Transform,
        new_position: Vec3,
        camera: &Transform,
        smooth_movement: bool,
        motion: ObjectMotion,
    ) {
        let camera_position = camera.translation;
        let mut offset = new_position - camera_position;
        if offset.length() > motion.max_distance {
            offset = offset.normalize_or_zero() * motion.max_distance;
        }

        if smooth_movement {
            self.recent_distances.push_back(offset.length());
            while self.recent_distances.len() > motion.smoothing_window.max(1) {
                self.recent_distances.pop_front();
            }
            let average =
                self.recent_distances.iter().sum::<f32>() / self.recent_distances.len() as f32;
            transform.translation = camera_position + offset.normalize_or_zero() * average;
        } else {
            transform.translation = camera_position + offset;
        }
    }
}

/// Unscaled size of an object's oriented bounding box.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct ObjectBounds(pub Vec3);

/// Asset path of a glTF model to show instead of the placeholder mesh.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct ObjectModel(pub String);

/// Bounding box of a block of 3D text, before the text scale.
pub fn text_bounds(text: &str) -> Vec3 {
    let [glyph_width, line_height, depth] = TEXT_GLYPH_SIZE;
    let lines = text.lines().count().max(1);
    let columns = text
        .lines()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0)
        .max(1);
    Vec3::new(
        columns as f32 * glyph_width,
        lines as f32 * line_height,
        depth,
    )
}
