use bevy::prelude::*;
use constants::status::{FOCUS_SQUARE_DELAY_SECS, TRY_MOVING_MESSAGE};

use super::state::PlacementAvailability;
use crate::engine::loading::ObjectLifecycle;
use crate::engine::scene::{
    FocusAttachment, FocusSquare, FocusSquareState, ObjectBounds, SceneIndex, SceneMutation,
    SceneMutationQueue, VirtualObject,
};
use crate::engine::status::{MessageType, StatusMessages};
use crate::engine::tracking::{ArCamera, TrackingFrame, world_position};
use crate::tools::presentation::PresentationEvent;

/// Per-tick focus square update from a hit test at the screen centre.
///
/// The square is hidden while any placed object is on screen; otherwise a
/// "try moving" prompt is scheduled in case no surface turns up.
pub fn update_focus_square(
    frame: Res<TrackingFrame>,
    camera: Res<ArCamera>,
    lifecycle: Res<ObjectLifecycle>,
    index: Res<SceneIndex>,
    objects: Query<(&Transform, &ObjectBounds), With<VirtualObject>>,
    queue: Res<SceneMutationQueue>,
    mut focus: ResMut<FocusSquare>,
    mut status: ResMut<StatusMessages>,
    mut availability: ResMut<PlacementAvailability>,
    mut presentation: EventWriter<PresentationEvent>,
) {
    let is_object_visible = lifecycle
        .loaded()
        .iter()
        .filter_map(|id| index.entity(*id))
        .filter_map(|entity| objects.get(entity).ok())
        .any(|(transform, bounds)| camera.is_in_view_frustum(transform, bounds.0));

    if is_object_visible {
        focus.hide();
    } else {
        focus.unhide();
        status.schedule(
            TRY_MOVING_MESSAGE,
            FOCUS_SQUARE_DELAY_SECS,
            MessageType::FocusSquare,
        );
    }

    let hint = focus.last_position();
    let Some(hit) = world_position(&frame, &camera, camera.screen_center(), hint, false) else {
        if focus.attachment() != FocusAttachment::Camera {
            queue.submit(SceneMutation::AttachFocusSquare(FocusAttachment::Camera));
        }
        focus.set_state(FocusSquareState::Initializing);
        if let Some(event) = availability.set(false) {
            presentation.write(event);
        }
        return;
    };

    if focus.attachment() != FocusAttachment::World {
        queue.submit(SceneMutation::AttachFocusSquare(FocusAttachment::World));
    }
    let state = match hit.plane {
        Some(plane) => FocusSquareState::PlaneDetected {
            anchor_position: hit.position,
            plane,
            camera: frame.camera,
        },
        None => FocusSquareState::FeaturesDetected {
            anchor_position: hit.position,
            camera: frame.camera,
        },
    };
    focus.set_state(state);
    if let Some(event) = availability.set(true) {
        presentation.write(event);
    }
    status.cancel_scheduled(MessageType::FocusSquare);
}
