/// Cumulative pan displacement (screen pixels) required before a drag moves an object.
pub const PAN_THRESHOLD_PX: f32 = 10.0;

/// Continuous press duration (seconds) that activates a long press.
pub const LONG_PRESS_DURATION_SECS: f32 = 1.5;

/// Drift (screen pixels) tolerated by taps and long presses before they fail.
pub const TOUCH_SLOP_PX: f32 = 10.0;

/// Longest press (seconds) still recognised as a tap.
pub const TAP_MAX_PRESS_SECS: f32 = 0.5;

/// Window (seconds) after a tap in which a second tap forms a double tap.
pub const DOUBLE_TAP_INTERVAL_SECS: f32 = 0.3;

/// Maximum distance (screen pixels) between the two taps of a double tap.
pub const DOUBLE_TAP_MAX_DISTANCE_PX: f32 = 40.0;

/// Radians of rotation per mouse wheel line while the pointer is held.
pub const WHEEL_ROTATION_SPEED: f32 = 0.1;

/// Drag objects on an infinite horizontal plane through their current height.
pub const TRANSLATE_ASSUMING_INFINITE_PLANE: bool = true;

/// Objects are never placed further than this from the camera (metres).
pub const MAX_OBJECT_DISTANCE_M: f32 = 10.0;

/// Number of recent camera distances averaged by smoothed object moves.
pub const OBJECT_DISTANCE_SMOOTHING_WINDOW: usize = 10;

/// Seconds before restart becomes available again after a restart.
pub const RESTART_COOLDOWN_SECS: f32 = 5.0;

/// Uniform scale applied to newly created 3D text.
pub const TEXT_OBJECT_SCALE: f32 = 0.2;

/// Seed text for newly created 3D text.
pub const DEFAULT_TEXT: &str = "Tap to edit";

/// Approximate glyph advance and height of 3D text before scaling (metres).
pub const TEXT_GLYPH_SIZE: [f32; 3] = [0.12, 0.2, 0.04];

/// Feature hit test cone opening angle (degrees).
pub const FEATURE_CONE_DEGREES: f32 = 18.0;

/// Closest accepted high quality feature hit along the ray (metres).
pub const FEATURE_MIN_DISTANCE_M: f32 = 0.2;

/// Furthest accepted high quality feature hit along the ray (metres).
pub const FEATURE_MAX_DISTANCE_M: f32 = 2.0;
