//! World tracking collaborator and the hit-test adapter built on top of it.
//!
//! The tracking session is external: it reports a camera pose, detected plane
//! anchors and sparse feature points once per tick. Everything in the engine
//! reads that snapshot from the `TrackingFrame` resource.
//!
//! ## Frame Flow
//!
//! ```text
//! TrackingSession (trait object in ArSession)
//!   └─> pull_tracking_frame()   copies the latest frame into TrackingFrame
//!       └─> sync_ar_camera()    mirrors the pose into ArCamera and the Bevy camera
//!           └─> world_position() screen point -> (position, plane?, hit_plane)
//! ```

/// Tracking session trait, frame snapshot types and the scripted session.
pub mod session;

/// Pinhole camera model used for screen rays, projection and frustum tests.
pub mod camera;

/// Screen-to-world hit testing against planes, features and infinite planes.
pub mod hit_test;

pub use camera::{ArCamera, ArCameraView};
pub use hit_test::{WorldHit, world_position};
pub use session::{
    ArSession, PlaneAnchor, PlaneId, SimulatedSession, TrackingFrame, TrackingSession,
    TrackingState, pull_tracking_frame,
};
