//! Scene graph state owned by the interaction core.
//!
//! Placed objects and the focus square live here, together with the serial
//! mutation queue that is the only path for adding or removing them.

/// Focus square state machine and display smoothing.
///
/// Tracks the latest placement estimate and derives billboard, open or closed styling from it.
pub mod focus_square;

/// Serial scene mutation queue and the object id to entity index it maintains.
pub mod mutation_queue;

/// Placed object component, object identity and camera-relative positioning.
pub mod virtual_object;

/// Meshes and materials for the focus square and placed objects.
///
/// Native and web render builds only; headless apps run without it.
pub mod visuals;

pub use focus_square::{FocusAttachment, FocusSquare, FocusSquareState};
pub use mutation_queue::{
    FocusSquareNode, ObjectRemoved, SceneIndex, SceneMutation, SceneMutationQueue,
    apply_scene_mutations,
};
pub use virtual_object::{
    ObjectBounds, ObjectId, ObjectKind, ObjectModel, ObjectMotion, VirtualObject, text_bounds,
};
