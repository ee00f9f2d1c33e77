use std::collections::HashSet;

use bevy::prelude::*;
use constants::status::{
    CONTENT_PLACEMENT_DELAY_SECS, RESET_SUGGESTION, SURFACE_DETECTED_MESSAGE,
    TAP_TO_PLACE_MESSAGE, TRACKING_ESCALATION_DELAY_SECS, TRACKING_LIMITED_MESSAGE,
    TRACKING_UNAVAILABLE_MESSAGE,
};

use crate::engine::loading::ObjectLifecycle;
use crate::engine::status::{MessageType, StatusMessages};
use crate::engine::tracking::{PlaneId, TrackingFrame, TrackingState};

/// What the user has already been told about the tracking session.
#[derive(Resource, Debug, Default)]
pub struct TrackingFeedback {
    last_state: Option<TrackingState>,
    known_planes: HashSet<PlaneId>,
}

impl TrackingFeedback {
    /// Compares `frame` with the previous tick and queues guidance for what changed.
    pub fn update(&mut self, frame: &TrackingFrame, has_objects: bool, status: &mut StatusMessages) {
        let state = frame.tracking_state;
        if self.last_state != Some(state) {
            self.last_state = Some(state);
            match tracking_message(state) {
                Some(message) => {
                    debug!("Tracking state {:?}", state);
                    status.show(message);
                    status.schedule(
                        format!("{message}\n{RESET_SUGGESTION}"),
                        TRACKING_ESCALATION_DELAY_SECS,
                        MessageType::TrackingStateEscalation,
                    );
                }
                None => status.cancel_scheduled(MessageType::TrackingStateEscalation),
            }
        }

        if frame.planes.is_empty() {
            // A reset drops every anchor, so the next surface is announced again.
            self.known_planes.clear();
            return;
        }
        let mut found_new = false;
        for plane in &frame.planes {
            found_new |= self.known_planes.insert(plane.id);
        }
        if !found_new {
            return;
        }

        info!("Surface detected");
        status.cancel_scheduled(MessageType::PlaneEstimation);
        status.show(SURFACE_DETECTED_MESSAGE);
        if !has_objects {
            status.schedule(
                TAP_TO_PLACE_MESSAGE,
                CONTENT_PLACEMENT_DELAY_SECS,
                MessageType::ContentPlacement,
            );
        }
    }
}

fn tracking_message(state: TrackingState) -> Option<&'static str> {
    match state {
        TrackingState::NotAvailable => Some(TRACKING_UNAVAILABLE_MESSAGE),
        TrackingState::Limited => Some(TRACKING_LIMITED_MESSAGE),
        TrackingState::Normal => None,
    }
}

pub fn report_tracking_feedback(
    frame: Res<TrackingFrame>,
    lifecycle: Res<ObjectLifecycle>,
    mut feedback: ResMut<TrackingFeedback>,
    mut status: ResMut<StatusMessages>,
) {
    let has_objects = !lifecycle.loaded().is_empty();
    feedback.update(&frame, has_objects, &mut status);
}
