use bevy::prelude::*;
use constants::interaction::{
    DOUBLE_TAP_INTERVAL_SECS, DOUBLE_TAP_MAX_DISTANCE_PX, LONG_PRESS_DURATION_SECS,
    MAX_OBJECT_DISTANCE_M, OBJECT_DISTANCE_SMOOTHING_WINDOW, PAN_THRESHOLD_PX,
    RESTART_COOLDOWN_SECS, TAP_MAX_PRESS_SECS, TOUCH_SLOP_PX,
    TRANSLATE_ASSUMING_INFINITE_PLANE, WHEEL_ROTATION_SPEED,
};

use crate::engine::scene::ObjectMotion;

/// Interaction tunables. Insert before `ArInteractionPlugin` to override.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct InteractionSettings {
    /// Cumulative pan displacement (px) before a drag moves anything.
    pub pan_threshold: f32,
    pub long_press_duration: f32,
    /// Drift (px) a tap or long press tolerates.
    pub touch_slop: f32,
    pub tap_max_press: f32,
    pub double_tap_interval: f32,
    pub double_tap_max_distance: f32,
    /// Radians per wheel line while dragging with the mouse.
    pub wheel_rotation_speed: f32,
    /// Drag objects across the infinite plane through their current height.
    pub translate_assuming_infinite_plane: bool,
    pub restart_cooldown: f32,
    pub max_object_distance: f32,
    pub distance_smoothing_window: usize,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            pan_threshold: PAN_THRESHOLD_PX,
            long_press_duration: LONG_PRESS_DURATION_SECS,
            touch_slop: TOUCH_SLOP_PX,
            tap_max_press: TAP_MAX_PRESS_SECS,
            double_tap_interval: DOUBLE_TAP_INTERVAL_SECS,
            double_tap_max_distance: DOUBLE_TAP_MAX_DISTANCE_PX,
            wheel_rotation_speed: WHEEL_ROTATION_SPEED,
            translate_assuming_infinite_plane: TRANSLATE_ASSUMING_INFINITE_PLANE,
            restart_cooldown: RESTART_COOLDOWN_SECS,
            max_object_distance: MAX_OBJECT_DISTANCE_M,
            distance_smoothing_window: OBJECT_DISTANCE_SMOOTHING_WINDOW,
        }
    }
}

impl InteractionSettings {
    pub fn object_motion(&self) -> ObjectMotion {
        ObjectMotion {
            max_distance: self.max_object_distance,
            smoothing_window: self.distance_smoothing_window,
        }
    }
}
