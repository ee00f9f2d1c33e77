use bevy::prelude::*;
use bevy::tasks::{AsyncComputeTaskPool, Task, block_on, futures_lite::future};
use constants::status::LOAD_FAILED_MESSAGE;
use thiserror::Error;

use super::object_loader::{LoadError, LoadedNode, Loader};
use crate::engine::scene::{
    ObjectBounds, ObjectId, ObjectKind, SceneMutation, SceneMutationQueue, VirtualObject,
};
use crate::engine::status::StatusMessages;
use crate::tools::presentation::PresentationEvent;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    #[error("an object is already loading")]
    LoadInProgress,
    #[error("no camera pose or placement estimate yet")]
    TrackingUnavailable,
    #[error("restart is not available yet")]
    RestartUnavailable,
}

/// Sent exactly once when a load started by `ObjectLifecycle::load_node` succeeds.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ObjectLoaded(pub LoadedNode);

struct PendingLoad {
    kind: ObjectKind,
    task: Task<Result<LoadedNode, LoadError>>,
}

/// Placed objects in insertion order plus the single in-flight load.
///
/// Insertions and removals only record intent here and submit the matching
/// scene mutation; the queue owns the entities.
#[derive(Resource, Default)]
pub struct ObjectLifecycle {
    loaded: Vec<ObjectId>,
    pending: Option<PendingLoad>,
    next_id: u64,
}

impl ObjectLifecycle {
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Kind of the in-flight load, if any.
    pub fn loading_kind(&self) -> Option<&ObjectKind> {
        self.pending.as_ref().map(|pending| &pending.kind)
    }

    pub fn is_loading_kind(&self, kind: &ObjectKind) -> bool {
        self.loading_kind() == Some(kind)
    }

    pub fn loaded(&self) -> &[ObjectId] {
        &self.loaded
    }

    pub fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.loaded.iter().position(|loaded| *loaded == id)
    }

    /// Starts loading `kind` on the async compute pool.
    pub fn load_node(&mut self, kind: ObjectKind, loader: &Loader) -> Result<(), PlacementError> {
        if self.is_loading() {
            return Err(PlacementError::LoadInProgress);
        }
        let loader = loader.0.clone();
        let requested = kind.clone();
        let task = AsyncComputeTaskPool::get().spawn(async move { loader.load(&requested) });
        self.pending = Some(PendingLoad { kind, task });
        Ok(())
    }

    /// Takes the finished load, if the in-flight task completed.
    pub fn poll(&mut self) -> Option<(ObjectKind, Result<LoadedNode, LoadError>)> {
        let pending = self.pending.as_mut()?;
        let result = block_on(future::poll_once(&mut pending.task))?;
        let pending = self.pending.take()?;
        Some((pending.kind, result))
    }

    pub fn allocate_id(&mut self) -> ObjectId {
        self.next_id += 1;
        ObjectId(self.next_id)
    }

    /// Records `object` as loaded and queues its insertion.
    pub fn insert(
        &mut self,
        object: VirtualObject,
        transform: Transform,
        bounds: ObjectBounds,
        model: Option<String>,
        queue: &SceneMutationQueue,
    ) -> ObjectId {
        let id = object.id;
        self.loaded.push(id);
        queue.submit(SceneMutation::Insert {
            object,
            transform,
            bounds,
            model,
        });
        id
    }

    pub fn remove_node_at(&mut self, index: usize, queue: &SceneMutationQueue) -> ObjectId {
        if index >= self.loaded.len() {
            panic!(
                "Programmer error: no loaded object at index {} ({} loaded)",
                index,
                self.loaded.len()
            );
        }
        let id = self.loaded.remove(index);
        queue.submit(SceneMutation::Remove(id));
        id
    }

    /// Removes a loaded object. The id must come from this lifecycle.
    pub fn remove_object(&mut self, id: ObjectId, queue: &SceneMutationQueue) -> ObjectId {
        let Some(index) = self.index_of(id) else {
            panic!("Programmer error: failed to look up virtual object {id} in the scene");
        };
        self.remove_node_at(index, queue)
    }

    pub fn remove_all_nodes(&mut self, queue: &SceneMutationQueue) {
        self.loaded.clear();
        queue.submit(SceneMutation::RemoveAll);
    }
}

/// Completes the in-flight load. A failed load still clears the loading state.
pub fn poll_pending_load(
    mut lifecycle: ResMut<ObjectLifecycle>,
    mut status: ResMut<StatusMessages>,
    mut loaded: EventWriter<ObjectLoaded>,
    mut presentation: EventWriter<PresentationEvent>,
) {
    let Some((kind, result)) = lifecycle.poll() else {
        return;
    };
    presentation.write(PresentationEvent::LoadingChanged { loading: false });

    match result {
        Ok(node) => {
            debug!("Loaded {}", kind.label());
            loaded.write(ObjectLoaded(node));
        }
        Err(err) => {
            warn!("Failed to load {}: {}", kind.label(), err);
            status.show(LOAD_FAILED_MESSAGE);
            presentation.write(PresentationEvent::LoadFailed {
                kind,
                reason: err.to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::tasks::TaskPool;

    fn emoji(name: &str) -> ObjectKind {
        ObjectKind::Emoji {
            name: name.to_string(),
        }
    }

    fn place(lifecycle: &mut ObjectLifecycle, queue: &SceneMutationQueue) -> ObjectId {
        let id = lifecycle.allocate_id();
        lifecycle.insert(
            VirtualObject::new(id, emoji("star")),
            Transform::IDENTITY,
            ObjectBounds(Vec3::ONE),
            None,
            queue,
        )
    }

    fn wait_for_load(lifecycle: &mut ObjectLifecycle) -> (ObjectKind, Result<LoadedNode, LoadError>) {
        for _ in 0..1000 {
            if let Some(done) = lifecycle.poll() {
                return done;
            }
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
        panic!("load never finished");
    }

    #[test]
    fn second_load_is_rejected_while_one_is_pending() {
        AsyncComputeTaskPool::get_or_init(TaskPool::new);
        let loader = Loader::default();
        let queue = SceneMutationQueue::default();
        let mut lifecycle = ObjectLifecycle::default();
        place(&mut lifecycle, &queue);

        lifecycle.load_node(emoji("heart"), &loader).expect("first load starts");
        assert!(lifecycle.is_loading_kind(&emoji("heart")));
        assert_eq!(
            lifecycle.load_node(emoji("star"), &loader),
            Err(PlacementError::LoadInProgress)
        );
        assert_eq!(lifecycle.loaded().len(), 1);

        let (kind, result) = wait_for_load(&mut lifecycle);
        assert_eq!(kind, emoji("heart"));
        assert!(result.is_ok());
        assert!(!lifecycle.is_loading());
    }

    #[test]
    fn failed_load_clears_loading() {
        AsyncComputeTaskPool::get_or_init(TaskPool::new);
        let mut lifecycle = ObjectLifecycle::default();
        lifecycle
            .load_node(emoji("unicorn"), &Loader::default())
            .expect("load starts");

        let (_, result) = wait_for_load(&mut lifecycle);
        assert!(result.is_err());
        assert!(!lifecycle.is_loading());
    }

    #[test]
    fn removals_keep_insertion_order_and_queue_mutations() {
        let queue = SceneMutationQueue::default();
        let mut lifecycle = ObjectLifecycle::default();
        let first = place(&mut lifecycle, &queue);
        let second = place(&mut lifecycle, &queue);
        let third = place(&mut lifecycle, &queue);

        assert_eq!(lifecycle.remove_object(second, &queue), second);
        assert_eq!(lifecycle.loaded(), &[first, third]);
        assert_eq!(lifecycle.remove_node_at(0, &queue), first);

        lifecycle.remove_all_nodes(&queue);
        assert!(lifecycle.loaded().is_empty());
        // Three inserts, two removals, one clear.
        assert_eq!(queue.pending(), 6);
    }

    #[test]
    #[should_panic(expected = "Programmer error")]
    fn removing_an_unknown_object_is_fatal() {
        let queue = SceneMutationQueue::default();
        let mut lifecycle = ObjectLifecycle::default();
        lifecycle.remove_object(ObjectId(42), &queue);
    }
}
