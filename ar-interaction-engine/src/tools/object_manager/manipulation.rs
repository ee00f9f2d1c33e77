use bevy::prelude::*;

use super::coordinator::GestureCoordinator;
use super::selection::PickTargets;
use crate::engine::core::settings::InteractionSettings;
use crate::engine::scene::{
    ObjectBounds, ObjectId, ObjectMotion, ObjectRemoved, SceneIndex, VirtualObject,
};
use crate::engine::tracking::{ArCamera, TrackingFrame, WorldHit, world_position};
use crate::tools::gestures::{GestureEvent, GesturePhase, GestureRecognizers};
use crate::tools::presentation::PresentationEvent;

type ObjectQuery<'w, 's> =
    Query<'w, 's, (&'static mut VirtualObject, &'static mut Transform, &'static ObjectBounds)>;

fn pick_targets(objects: &ObjectQuery) -> PickTargets {
    PickTargets::new(
        objects
            .iter()
            .map(|(object, transform, bounds)| (object.id, transform, bounds)),
    )
}

fn end_text_input(
    coordinator: &mut GestureCoordinator,
    presentation: &mut EventWriter<PresentationEvent>,
) {
    if coordinator.end_text_input() {
        presentation.write(PresentationEvent::EndTextInput);
    }
}

/// Clears selection and drag state that refer to removed objects.
pub fn forget_removed_objects(
    mut removed: EventReader<ObjectRemoved>,
    mut coordinator: ResMut<GestureCoordinator>,
) {
    for ObjectRemoved(id) in removed.read() {
        coordinator.forget(*id);
    }
}

/// Applies recognised gestures to the placed objects.
pub fn handle_gestures(
    mut gestures: EventReader<GestureEvent>,
    mut recognizers: ResMut<GestureRecognizers>,
    mut coordinator: ResMut<GestureCoordinator>,
    camera: Res<ArCamera>,
    index: Res<SceneIndex>,
    mut objects: ObjectQuery,
    mut presentation: EventWriter<PresentationEvent>,
) {
    for gesture in gestures.read() {
        // Any gesture on the scene dismisses the keyboard.
        end_text_input(&mut coordinator, &mut presentation);

        match *gesture {
            GestureEvent::Tap { location } => {
                let Some(id) = pick_targets(&objects).object_at(&camera, location) else {
                    debug!("Tap at {:?} hit nothing", location);
                    continue;
                };
                coordinator.select(id);
                let Some(entity) = index.entity(id) else {
                    continue;
                };
                if let Ok((mut object, mut transform, _)) = objects.get_mut(entity) {
                    if object.is_text() {
                        object.toggle_standing(&mut transform);
                        debug!("Text {} standing: {}", id, object.is_standing);
                    }
                }
            }
            GestureEvent::DoubleTap { location } => {
                presentation.write(PresentationEvent::DismissDeleteAffordance);
                let Some(id) = pick_targets(&objects).object_at(&camera, location) else {
                    continue;
                };
                coordinator.select(id);
                let seed = index
                    .entity(id)
                    .and_then(|entity| objects.get(entity).ok())
                    .and_then(|(object, _, _)| object.text().map(str::to_owned));
                if let Some(seed) = seed {
                    coordinator.begin_text_input();
                    presentation.write(PresentationEvent::BeginTextInput { object: id, seed });
                }
            }
            GestureEvent::LongPress { phase } => {
                if phase != GesturePhase::Began {
                    continue;
                }
                let long_press = &recognizers.long_press;
                let Some(id) = pick_targets(&objects).object_interacting(
                    &camera,
                    long_press.touch_locations(),
                    long_press.center(),
                ) else {
                    continue;
                };
                let point = long_press
                    .touch_locations()
                    .first()
                    .copied()
                    .unwrap_or_default();
                coordinator.select(id);
                presentation.write(PresentationEvent::LongPressOnObject { object: id, point });
            }
            GestureEvent::Pan { phase } => {
                let targets = pick_targets(&objects);
                let project = |id: ObjectId| {
                    let entity = index.entity(id)?;
                    let (_, transform, _) = objects.get(entity).ok()?;
                    camera.project(transform.translation)
                };
                coordinator.handle_pan(
                    phase,
                    &mut recognizers.pan,
                    |pan| targets.object_interacting(&camera, pan.touch_locations(), pan.center()),
                    project,
                );
            }
            GestureEvent::Rotate { phase } => {
                if phase.is_finished() {
                    continue;
                }
                let mut tracked = coordinator
                    .tracked()
                    .and_then(|id| index.entity(id))
                    .and_then(|entity| objects.get_mut(entity).ok())
                    .map(|(_, transform, _)| transform);
                coordinator.handle_rotation(&mut recognizers.rotation, tracked.as_deref_mut());
            }
        }
    }
}

/// Re-projects the dragged object from its committed screen position.
///
/// Runs every tick so the object stays under the finger while the device
/// moves, not only when the finger does.
pub fn update_object_to_tracking_position(
    coordinator: Res<GestureCoordinator>,
    settings: Res<InteractionSettings>,
    frame: Res<TrackingFrame>,
    camera: Res<ArCamera>,
    index: Res<SceneIndex>,
    mut objects: Query<(&mut VirtualObject, &mut Transform)>,
) {
    let Some(session) = coordinator.session() else {
        return;
    };
    let Some(screen) = session.tracking_position else {
        return;
    };
    let Some(entity) = index.entity(session.tracked) else {
        return;
    };
    let Ok((mut object, mut transform)) = objects.get_mut(entity) else {
        return;
    };
    let Some(camera_transform) = frame.current_camera_transform() else {
        return;
    };
    let Some(hit) = world_position(
        &frame,
        &camera,
        screen,
        Some(transform.translation),
        settings.translate_assuming_infinite_plane,
    ) else {
        return;
    };

    move_to_hit(
        &mut object,
        &mut transform,
        &hit,
        &camera_transform,
        settings.object_motion(),
    );
}

/// Moves an object onto a hit test result. Positions off detected planes are
/// depth estimates and get smoothed; detected plane hits are applied as is.
fn move_to_hit(
    object: &mut VirtualObject,
    transform: &mut Transform,
    hit: &WorldHit,
    camera: &Transform,
    motion: ObjectMotion,
) {
    object.set_position(
        transform,
        hit.position,
        camera,
        !hit.on_detected_plane(),
        motion,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scene::ObjectKind;
    use crate::engine::tracking::{PlaneAnchor, PlaneId};

    fn camera_over_floor() -> (TrackingFrame, ArCamera, Transform) {
        let pose = Transform::from_xyz(0.0, 1.0, 0.0).looking_at(Vec3::new(0.0, 0.0, -1.0), Vec3::Y);
        let frame = TrackingFrame {
            camera: Some(pose),
            ..default()
        };
        let camera = ArCamera {
            viewport: Vec2::new(800.0, 600.0),
            ..default()
        };
        (frame, camera, pose)
    }

    fn emoji() -> VirtualObject {
        VirtualObject::new(
            ObjectId(1),
            ObjectKind::Emoji {
                name: "star".into(),
            },
        )
    }

    #[test]
    fn drag_off_detected_planes_averages_distance() {
        let (frame, camera, pose) = camera_over_floor();
        let hint = Vec3::new(0.0, 0.0, -1.0);
        let near = world_position(&frame, &camera, camera.screen_center(), Some(hint), true)
            .expect("infinite plane hit");
        let far = world_position(
            &frame,
            &camera,
            camera.screen_center() - Vec2::new(0.0, 100.0),
            Some(hint),
            true,
        )
        .expect("infinite plane hit");
        assert!(!far.on_detected_plane());

        let mut object = emoji();
        let mut transform = Transform::IDENTITY;
        let motion = ObjectMotion::default();
        move_to_hit(&mut object, &mut transform, &near, &pose, motion);
        move_to_hit(&mut object, &mut transform, &far, &pose, motion);

        let near_distance = near.position.distance(pose.translation);
        let far_distance = far.position.distance(pose.translation);
        let expected = (near_distance + far_distance) / 2.0;
        let moved = transform.translation.distance(pose.translation);
        assert!((moved - expected).abs() < 1e-3, "{moved} vs {expected}");
        assert!((moved - far_distance).abs() > 1e-2);
    }

    #[test]
    fn drag_on_a_detected_plane_is_exact() {
        let (mut frame, camera, pose) = camera_over_floor();
        frame.planes.push(PlaneAnchor::new(
            PlaneId(2),
            Transform::from_xyz(0.0, 0.0, -1.5),
            Vec2::splat(4.0),
        ));
        let first = world_position(&frame, &camera, camera.screen_center(), None, true)
            .expect("plane hit");
        let second = world_position(
            &frame,
            &camera,
            camera.screen_center() - Vec2::new(0.0, 100.0),
            None,
            true,
        )
        .expect("plane hit");
        assert!(second.on_detected_plane());

        let mut object = emoji();
        let mut transform = Transform::IDENTITY;
        let motion = ObjectMotion::default();
        move_to_hit(&mut object, &mut transform, &first, &pose, motion);
        move_to_hit(&mut object, &mut transform, &second, &pose, motion);

        assert!(transform.translation.abs_diff_eq(second.position, 1e-4));
    }
}
