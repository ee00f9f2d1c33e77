use bevy::prelude::*;

use crate::engine::scene::{ObjectId, SceneIndex};
use crate::tools::gestures::{GesturePhase, RotationGesture, ThresholdPanGesture};

/// State of the pan currently dragging an object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSession {
    pub tracked: ObjectId,
    /// Committed screen position the object is re-projected from every tick.
    pub tracking_position: Option<Vec2>,
}

/// Selection, the active drag and whether text entry is open.
///
/// Both the selection and the tracked object are ids resolved through the
/// `SceneIndex`, so a removed object can never be acted on.
#[derive(Resource, Debug, Default)]
pub struct GestureCoordinator {
    selected: Option<ObjectId>,
    session: Option<GestureSession>,
    text_input_active: bool,
}

impl GestureCoordinator {
    /// Selected object, if it is still in the scene.
    pub fn selected(&self, index: &SceneIndex) -> Option<ObjectId> {
        self.selected.filter(|id| index.contains(*id))
    }

    /// Selected id as recorded, without checking it is live.
    pub fn selected_id(&self) -> Option<ObjectId> {
        self.selected
    }

    pub fn select(&mut self, id: ObjectId) {
        self.selected = Some(id);
    }

    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    pub fn tracked(&self) -> Option<ObjectId> {
        self.session.map(|session| session.tracked)
    }

    pub fn tracking_position(&self) -> Option<Vec2> {
        self.session.and_then(|session| session.tracking_position)
    }

    /// Starts dragging `id`, which also selects it.
    pub fn track(&mut self, id: ObjectId) {
        self.session = Some(GestureSession {
            tracked: id,
            tracking_position: None,
        });
        self.selected = Some(id);
    }

    pub fn end_tracking(&mut self) {
        self.session = None;
    }

    /// Drops every reference to a removed object.
    pub fn forget(&mut self, id: ObjectId) {
        if self.selected == Some(id) {
            self.selected = None;
        }
        if self.tracked() == Some(id) {
            self.session = None;
        }
    }

    pub fn clear(&mut self) {
        self.selected = None;
        self.session = None;
    }

    pub fn is_text_input_active(&self) -> bool {
        self.text_input_active
    }

    pub fn begin_text_input(&mut self) {
        self.text_input_active = true;
    }

    /// Closes text entry. Returns whether it was open.
    pub fn end_text_input(&mut self) -> bool {
        std::mem::take(&mut self.text_input_active)
    }

    /// Applies one pan update.
    ///
    /// `pick` finds the object under the gesture when it begins; `project`
    /// gives an object's current screen position. Translation is consumed
    /// only once the pan has passed its threshold.
    pub fn handle_pan(
        &mut self,
        phase: GesturePhase,
        pan: &mut ThresholdPanGesture,
        pick: impl FnOnce(&ThresholdPanGesture) -> Option<ObjectId>,
        project: impl FnOnce(ObjectId) -> Option<Vec2>,
    ) {
        match phase {
            GesturePhase::Began => {
                if let Some(id) = pick(pan) {
                    self.track(id);
                }
            }
            GesturePhase::Changed if pan.is_threshold_exceeded() => {
                let Some(session) = self.session.as_mut() else {
                    return;
                };
                let Some(current) = session
                    .tracking_position
                    .or_else(|| project(session.tracked))
                else {
                    return;
                };
                session.tracking_position = Some(current + pan.translation());
                pan.set_translation(Vec2::ZERO);
            }
            GesturePhase::Changed => {}
            GesturePhase::Ended | GesturePhase::Cancelled => self.end_tracking(),
        }
    }

    /// Turns the tracked object by the rotation since the last update.
    ///
    /// The angle is subtracted from yaw, which matches the finger direction
    /// when looking down on the object and is mirrored from below.
    pub fn handle_rotation(&self, rotation: &mut RotationGesture, transform: Option<&mut Transform>) {
        if let Some(transform) = transform {
            transform.rotate_y(-rotation.rotation());
        }
        rotation.set_rotation(0.0);
    }
}
