//! Object manipulation, focus square updates and content placement.
//!
//! Everything here runs in the main world, once per tick, in four ordered
//! phases:
//!
//! ```text
//! ArSet::Tracking       pull_tracking_frame -> sync_ar_camera
//! ArSet::Input          gestures, presentation commands, load completion
//! ArSet::FrameUpdate    dragged object, focus square, tracking feedback, timers
//! ArSet::SceneMutation  apply_scene_mutations (exclusive)
//! ```
//!
//! Systems in the first three phases never touch scene entities directly.
//! Inserts, removals and focus square re-parenting are submitted to the
//! `SceneMutationQueue` and applied together in the last phase, so a tick
//! observes a consistent scene graph throughout.
//!
//! ## Gestures
//!
//! - **Tap** on an object stands it up or lays it down.
//! - **Double tap** on a text object opens text entry.
//! - **Long press** on an object offers to delete it.
//! - **Pan** drags the object under the touches (or the selected object)
//!   across detected planes once the threshold is crossed.
//! - **Rotate** spins the selected object about its vertical axis.
//!
//! ## Placement
//!
//! `PresentationCommand::PlaceObject` starts an asynchronous load. When the
//! node arrives it is placed at the focus square's last position, or the
//! "cannot place" prompt is shown if there is none.

/// Selection state and the pan and rotation rules.
pub mod coordinator;

/// Status guidance for tracking quality and surface detection.
pub mod feedback;

/// Per-tick focus square update.
pub mod focus;

/// Gesture handlers and the dragged-object update.
pub mod manipulation;

/// Presentation commands, restart, and placement of loaded objects.
pub mod placement;

/// Ray intersection against object bounds.
pub mod ray;

/// Screen-space object picking.
pub mod selection;

/// Placement availability and the restart cooldown.
pub mod state;

use bevy::prelude::*;

pub use coordinator::{GestureCoordinator, GestureSession};
pub use feedback::TrackingFeedback;
pub use placement::{SessionControl, restart_experience};
pub use state::{PlacementAvailability, RestartGate};

use crate::engine::core::settings::InteractionSettings;
use crate::engine::loading::{
    EmojiCatalog, Loader, ObjectLifecycle, ObjectLoaded, poll_pending_load,
};
use crate::engine::loading::catalog::CatalogLoading;
use crate::engine::scene::{
    FocusSquare, ObjectRemoved, SceneIndex, SceneMutationQueue, apply_scene_mutations,
};
use crate::engine::status::{StatusMessages, tick_status_messages};
use crate::engine::tracking::{ArCamera, TrackingFrame, pull_tracking_frame};
use crate::engine::tracking::camera::sync_ar_camera;
use crate::tools::gestures::{GestureEvent, GestureRecognizers, TouchFrame, recognize_gestures};
use crate::tools::presentation::{PresentationCommand, PresentationEvent};

use feedback::report_tracking_feedback;
use focus::update_focus_square;
use manipulation::{forget_removed_objects, handle_gestures, update_object_to_tracking_position};
use placement::{handle_presentation_commands, place_loaded_objects};
use state::tick_restart_gate;

/// Phases of an interaction tick, run in declaration order.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArSet {
    Tracking,
    Input,
    FrameUpdate,
    SceneMutation,
}

/// Registers the interaction core: resources, events and the tick schedule.
///
/// Platform input (`collect_touch_frame`) and visuals are added separately,
/// which keeps the plugin usable under `MinimalPlugins`.
pub struct ArInteractionPlugin;

impl Plugin for ArInteractionPlugin {
    fn build(&self, app: &mut App) {
        let settings = app
            .world()
            .get_resource::<InteractionSettings>()
            .cloned()
            .unwrap_or_default();

        app.insert_resource(GestureRecognizers::from_settings(&settings))
            .insert_resource(settings)
            .init_resource::<TrackingFrame>()
            .init_resource::<ArCamera>()
            .init_resource::<TouchFrame>()
            .init_resource::<FocusSquare>()
            .init_resource::<SceneMutationQueue>()
            .init_resource::<SceneIndex>()
            .init_resource::<StatusMessages>()
            .init_resource::<EmojiCatalog>()
            .init_resource::<CatalogLoading>()
            .init_resource::<Loader>()
            .init_resource::<ObjectLifecycle>()
            .init_resource::<GestureCoordinator>()
            .init_resource::<PlacementAvailability>()
            .init_resource::<RestartGate>()
            .init_resource::<TrackingFeedback>()
            .add_event::<GestureEvent>()
            .add_event::<PresentationCommand>()
            .add_event::<PresentationEvent>()
            .add_event::<ObjectLoaded>()
            .add_event::<ObjectRemoved>()
            .configure_sets(
                Update,
                (
                    ArSet::Tracking,
                    ArSet::Input,
                    ArSet::FrameUpdate,
                    ArSet::SceneMutation,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (pull_tracking_frame, sync_ar_camera)
                    .chain()
                    .in_set(ArSet::Tracking),
            )
            .add_systems(
                Update,
                (
                    forget_removed_objects,
                    recognize_gestures,
                    handle_gestures,
                    handle_presentation_commands,
                    poll_pending_load,
                    place_loaded_objects,
                )
                    .chain()
                    .in_set(ArSet::Input),
            )
            .add_systems(
                Update,
                (
                    update_object_to_tracking_position,
                    update_focus_square,
                    report_tracking_feedback,
                    tick_status_messages,
                    tick_restart_gate,
                )
                    .chain()
                    .in_set(ArSet::FrameUpdate),
            )
            .add_systems(
                Update,
                apply_scene_mutations.in_set(ArSet::SceneMutation),
            );
    }
}
