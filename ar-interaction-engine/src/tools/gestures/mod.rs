//! Touch gesture recognition.
//!
//! Raw touches (or the emulating mouse) are gathered into a `TouchFrame` each
//! tick and fed through tap, double-tap, long-press, pan and rotation
//! recognisers. Their output is a stream of `GestureEvent`s consumed by the
//! object manager.

/// Gathers touch screen and mouse input into a `TouchFrame`.
pub mod input;

/// Gesture recognisers and the rules arbitrating between them.
pub mod recognizers;

pub use recognizers::{
    GestureEvent, GesturePhase, GestureRecognizers, RotationGesture, ThresholdPanGesture,
    TouchFrame, TouchPoint, recognize_gestures,
};
