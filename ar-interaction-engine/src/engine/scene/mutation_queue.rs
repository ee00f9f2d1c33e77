use std::collections::HashMap;

use bevy::prelude::*;
use crossbeam_channel::{Receiver, Sender, unbounded};

use super::focus_square::{FocusAttachment, FocusSquare};
use super::virtual_object::{ObjectBounds, ObjectId, ObjectModel, VirtualObject};
use crate::engine::tracking::ArCameraView;

/// Marks the entity drawing the focus square.
#[derive(Component, Debug, Default)]
pub struct FocusSquareNode;

/// A change to the scene graph.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneMutation {
    Insert {
        object: VirtualObject,
        transform: Transform,
        bounds: ObjectBounds,
        model: Option<String>,
    },
    Remove(ObjectId),
    RemoveAll,
    AttachFocusSquare(FocusAttachment),
}

/// The only way into the scene graph.
///
/// Producers submit from wherever they run; a clone of the sender can be handed
/// to code outside the ECS. Mutations are applied once per tick, in submission
/// order, by `apply_scene_mutations` before transforms are propagated for
/// rendering.
#[derive(Resource, Clone)]
pub struct SceneMutationQueue {
    sender: Sender<SceneMutation>,
    receiver: Receiver<SceneMutation>,
}

impl Default for SceneMutationQueue {
    fn default() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }
}

impl SceneMutationQueue {
    pub fn submit(&self, mutation: SceneMutation) {
        if let Err(err) = self.sender.send(mutation) {
            error!("Scene mutation dropped: {}", err);
        }
    }

    pub fn sender(&self) -> Sender<SceneMutation> {
        self.sender.clone()
    }

    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    fn drain(&self) -> Vec<SceneMutation> {
        self.receiver.try_iter().collect()
    }
}

/// Live entity for each placed object. Maintained only by the queue.
#[derive(Resource, Debug, Default)]
pub struct SceneIndex {
    entities: HashMap<ObjectId, Entity>,
}

impl SceneIndex {
    pub fn entity(&self, id: ObjectId) -> Option<Entity> {
        self.entities.get(&id).copied()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Sent after an object's entity has been despawned.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectRemoved(pub ObjectId);

/// Applies every queued mutation in order.
pub fn apply_scene_mutations(world: &mut World) {
    let mutations = world.resource::<SceneMutationQueue>().drain();
    for mutation in mutations {
        apply_mutation(world, mutation);
    }
}

fn apply_mutation(world: &mut World, mutation: SceneMutation) {
    match mutation {
        SceneMutation::Insert {
            object,
            transform,
            bounds,
            model,
        } => {
            let id = object.id;
            let name = Name::new(format!("{} {}", object.kind.label(), id));
            let mut entity = world.spawn((name, object, transform, bounds, Visibility::default()));
            if let Some(model) = model {
                entity.insert(ObjectModel(model));
            }
            let entity = entity.id();
            if let Some(previous) = world.resource_mut::<SceneIndex>().entities.insert(id, entity) {
                warn!("Object {} inserted twice, replacing {:?}", id, previous);
                world.despawn(previous);
            }
            debug!("Inserted object {} as {:?}", id, entity);
        }
        SceneMutation::Remove(id) => {
            let removed = world.resource_mut::<SceneIndex>().entities.remove(&id);
            if let Some(entity) = removed {
                world.despawn(entity);
                world.send_event(ObjectRemoved(id));
                debug!("Removed object {}", id);
            }
        }
        SceneMutation::RemoveAll => {
            let removed: Vec<(ObjectId, Entity)> =
                world.resource_mut::<SceneIndex>().entities.drain().collect();
            for (id, entity) in removed {
                world.despawn(entity);
                world.send_event(ObjectRemoved(id));
            }
        }
        SceneMutation::AttachFocusSquare(attachment) => attach_focus_square(world, attachment),
    }
}

fn attach_focus_square(world: &mut World, attachment: FocusAttachment) {
    world.resource_mut::<FocusSquare>().attachment = attachment;

    let node = world
        .query_filtered::<Entity, With<FocusSquareNode>>()
        .iter(world)
        .next();
    let Some(node) = node else {
        return;
    };

    match attachment {
        FocusAttachment::Camera => {
            let camera = world
                .query_filtered::<Entity, With<ArCameraView>>()
                .iter(world)
                .next();
            if let Some(camera) = camera {
                world.entity_mut(node).insert(ChildOf(camera));
            }
        }
        FocusAttachment::World => {
            world.entity_mut(node).remove::<ChildOf>();
        }
    }
}
