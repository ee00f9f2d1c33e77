use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use constants::status::{CANNOT_PLACE_MESSAGE, FIND_SURFACE_MESSAGE, PLANE_ESTIMATION_DELAY_SECS};

use super::coordinator::GestureCoordinator;
use super::state::RestartGate;
use crate::engine::core::settings::InteractionSettings;
use crate::engine::loading::{Loader, ObjectLifecycle, ObjectLoaded, LoadedNode, PlacementError};
use crate::engine::scene::{
    FocusAttachment, FocusSquare, ObjectBounds, ObjectId, SceneIndex, SceneMutation,
    SceneMutationQueue, VirtualObject, text_bounds,
};
use crate::engine::status::{MessageType, StatusMessages};
use crate::engine::tracking::{ArSession, TrackingFrame};
use crate::tools::presentation::{PresentationCommand, PresentationEvent};

/// Everything touched when the tracking session starts over.
#[derive(SystemParam)]
pub struct SessionControl<'w> {
    pub session: Option<ResMut<'w, ArSession>>,
    pub frame: ResMut<'w, TrackingFrame>,
    pub focus: ResMut<'w, FocusSquare>,
    pub status: ResMut<'w, StatusMessages>,
    pub queue: Res<'w, SceneMutationQueue>,
}

impl SessionControl<'_> {
    /// Restarts tracking, returns the focus square to the camera and prompts
    /// the user to look for a surface.
    pub fn reset_tracking(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.0.reset();
        }
        *self.frame = TrackingFrame::default();
        self.focus.reset();
        self.queue
            .submit(SceneMutation::AttachFocusSquare(FocusAttachment::Camera));
        self.status.schedule(
            FIND_SURFACE_MESSAGE,
            PLANE_ESTIMATION_DELAY_SECS,
            MessageType::PlaneEstimation,
        );
        info!("Tracking session reset");
    }
}

/// Applies requests from the presentation layer.
pub fn handle_presentation_commands(
    mut requests: EventReader<PresentationCommand>,
    settings: Res<InteractionSettings>,
    loader: Res<Loader>,
    index: Res<SceneIndex>,
    mut lifecycle: ResMut<ObjectLifecycle>,
    mut coordinator: ResMut<GestureCoordinator>,
    mut restart: ResMut<RestartGate>,
    mut session: SessionControl,
    mut objects: Query<(&mut VirtualObject, &mut ObjectBounds)>,
    mut presentation: EventWriter<PresentationEvent>,
) {
    for command in requests.read() {
        match command {
            PresentationCommand::PlaceObject(kind) => {
                match lifecycle.load_node(kind.clone(), &loader) {
                    Ok(()) => {
                        info!("Loading {}", kind.label());
                        session.status.cancel_scheduled(MessageType::ContentPlacement);
                        presentation.write(PresentationEvent::LoadingChanged { loading: true });
                    }
                    Err(err) => warn!("Ignoring placement of {}: {}", kind.label(), err),
                }
            }
            PresentationCommand::DeleteSelected => {
                presentation.write(PresentationEvent::DismissDeleteAffordance);
                let Some(id) = coordinator.selected(&index) else {
                    continue;
                };
                lifecycle.remove_object(id, &session.queue);
                coordinator.forget(id);
                info!("Deleted object {}", id);
            }
            PresentationCommand::Restart => {
                match restart_experience(
                    &settings,
                    &mut lifecycle,
                    &mut coordinator,
                    &mut restart,
                    &mut session,
                ) {
                    Ok(()) => {
                        presentation.write(PresentationEvent::RestartAvailability {
                            available: false,
                        });
                    }
                    Err(err) => warn!("Ignoring restart: {}", err),
                }
            }
            PresentationCommand::SetSelectedText(text) => {
                let Some(entity) = coordinator
                    .selected(&index)
                    .and_then(|id| index.entity(id))
                else {
                    continue;
                };
                if let Ok((mut object, mut bounds)) = objects.get_mut(entity) {
                    if object.set_text(text.clone()) {
                        bounds.0 = text_bounds(text);
                    }
                }
            }
            PresentationCommand::EndTextInput => {
                coordinator.end_text_input();
            }
        }
    }
}

/// Tears the scene down and starts a new session. Refused while a load is in
/// flight or during the cooldown after the previous restart.
pub fn restart_experience(
    settings: &InteractionSettings,
    lifecycle: &mut ObjectLifecycle,
    coordinator: &mut GestureCoordinator,
    restart: &mut RestartGate,
    session: &mut SessionControl,
) -> Result<(), PlacementError> {
    if !restart.is_available() || lifecycle.is_loading() {
        return Err(PlacementError::RestartUnavailable);
    }
    restart.begin_cooldown(settings.restart_cooldown);

    session.status.cancel_all_scheduled();
    lifecycle.remove_all_nodes(&session.queue);
    coordinator.clear();
    session.reset_tracking();
    info!("Experience restarted");
    Ok(())
}

/// Places freshly loaded objects at the focus square.
pub fn place_loaded_objects(
    mut loaded: EventReader<ObjectLoaded>,
    settings: Res<InteractionSettings>,
    frame: Res<TrackingFrame>,
    focus: Res<FocusSquare>,
    queue: Res<SceneMutationQueue>,
    mut lifecycle: ResMut<ObjectLifecycle>,
    mut coordinator: ResMut<GestureCoordinator>,
    mut status: ResMut<StatusMessages>,
    mut presentation: EventWriter<PresentationEvent>,
) {
    for ObjectLoaded(node) in loaded.read() {
        match place_node(
            node.clone(),
            &settings,
            &frame,
            &focus,
            &queue,
            &mut lifecycle,
            &mut coordinator,
        ) {
            Ok(id) => {
                presentation.write(PresentationEvent::ObjectPlaced {
                    object: id,
                    kind: node.kind.clone(),
                });
            }
            Err(err) => {
                warn!("Could not place {}: {}", node.kind.label(), err);
                status.show(CANNOT_PLACE_MESSAGE);
            }
        }
    }
}

fn place_node(
    node: LoadedNode,
    settings: &InteractionSettings,
    frame: &TrackingFrame,
    focus: &FocusSquare,
    queue: &SceneMutationQueue,
    lifecycle: &mut ObjectLifecycle,
    coordinator: &mut GestureCoordinator,
) -> Result<ObjectId, PlacementError> {
    let (Some(camera), Some(focus_position)) =
        (frame.current_camera_transform(), focus.last_position())
    else {
        return Err(PlacementError::TrackingUnavailable);
    };

    let id = lifecycle.allocate_id();
    let mut object = VirtualObject::new(id, node.kind);
    let mut transform = Transform::from_scale(Vec3::splat(node.scale));
    object.set_position(
        &mut transform,
        focus_position,
        &camera,
        false,
        settings.object_motion(),
    );

    coordinator.select(id);
    lifecycle.insert(object, transform, ObjectBounds(node.size), node.model, queue);
    info!("Placed object {} at {:?}", id, transform.translation);
    Ok(id)
}
