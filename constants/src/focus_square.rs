/// Distance (metres) in front of the camera while initialising.
pub const BILLBOARD_DISTANCE_M: f32 = 0.8;

/// Number of recent anchor positions averaged for display.
pub const POSITION_SMOOTHING_WINDOW: usize = 10;

/// Below this camera distance (metres) the square shrinks linearly.
pub const SCALE_NEAR_DISTANCE_M: f32 = 0.7;

/// Scale growth per metre beyond the near distance.
pub const SCALE_DISTANCE_FACTOR: f32 = 0.25;

/// Scale offset beyond the near distance.
pub const SCALE_DISTANCE_OFFSET: f32 = 0.825;

/// Edge length of the unscaled square (metres).
pub const SIZE_M: f32 = 0.17;

/// Thickness of the square's segments (metres).
pub const SEGMENT_THICKNESS_M: f32 = 0.018;
