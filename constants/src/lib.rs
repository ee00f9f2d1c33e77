//! Shared tuning constants for the AR interaction engine.

/// Gesture recognition thresholds and object manipulation limits.
pub mod interaction;

/// Focus square geometry, smoothing and scaling parameters.
pub mod focus_square;

/// Status message timings and texts.
pub mod status;

/// Colours and sizes used when drawing the scene.
pub mod render_settings;
