//! Transient on-screen guidance messages.
//!
//! Messages are either shown immediately and auto-hidden, or scheduled by
//! type so that a later cancel (the situation resolved itself) prevents them
//! from ever appearing.

use std::collections::HashMap;
use std::time::Duration;

use bevy::prelude::*;
use constants::status::MESSAGE_DISPLAY_SECS;

use crate::tools::presentation::PresentationEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    TrackingStateEscalation,
    PlaneEstimation,
    ContentPlacement,
    FocusSquare,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusChange {
    Shown(String),
    Hidden,
}

#[derive(Debug)]
struct ScheduledMessage {
    text: String,
    timer: Timer,
}

#[derive(Resource, Debug, Default)]
pub struct StatusMessages {
    scheduled: HashMap<MessageType, ScheduledMessage>,
    current: Option<(String, Timer)>,
    changes: Vec<StatusChange>,
}

impl StatusMessages {
    /// Shows `text` now, replacing the current message.
    pub fn show(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.current = Some((
            text.clone(),
            Timer::from_seconds(MESSAGE_DISPLAY_SECS, TimerMode::Once),
        ));
        self.changes.push(StatusChange::Shown(text));
    }

    /// Shows `text` after `delay_secs` unless cancelled first. Re-scheduling a
    /// pending type with the same text keeps the original deadline.
    pub fn schedule(&mut self, text: impl Into<String>, delay_secs: f32, message_type: MessageType) {
        let text = text.into();
        if let Some(pending) = self.scheduled.get(&message_type) {
            if pending.text == text {
                return;
            }
        }
        self.scheduled.insert(
            message_type,
            ScheduledMessage {
                text,
                timer: Timer::from_seconds(delay_secs, TimerMode::Once),
            },
        );
    }

    pub fn cancel_scheduled(&mut self, message_type: MessageType) {
        self.scheduled.remove(&message_type);
    }

    pub fn cancel_all_scheduled(&mut self) {
        self.scheduled.clear();
    }

    pub fn is_scheduled(&self, message_type: MessageType) -> bool {
        self.scheduled.contains_key(&message_type)
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_ref().map(|(text, _)| text.as_str())
    }

    /// Advances timers and returns every change since the last tick.
    pub fn tick(&mut self, delta: Duration) -> Vec<StatusChange> {
        let mut due: Vec<(MessageType, String)> = Vec::new();
        for (message_type, message) in self.scheduled.iter_mut() {
            if message.timer.tick(delta).finished() {
                due.push((*message_type, message.text.clone()));
            }
        }
        for (message_type, text) in due {
            self.scheduled.remove(&message_type);
            self.show(text);
        }

        let expired = self
            .current
            .as_mut()
            .is_some_and(|(_, timer)| timer.tick(delta).finished());
        if expired {
            self.current = None;
            self.changes.push(StatusChange::Hidden);
        }

        std::mem::take(&mut self.changes)
    }
}

pub fn tick_status_messages(
    time: Res<Time>,
    mut status: ResMut<StatusMessages>,
    mut presentation: EventWriter<PresentationEvent>,
) {
    for change in status.tick(time.delta()) {
        match change {
            StatusChange::Shown(text) => {
                info!("Status: {}", text.replace('\n', " "));
                presentation.write(PresentationEvent::StatusMessage { text });
            }
            StatusChange::Hidden => {
                presentation.write(PresentationEvent::StatusMessageHidden);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(value: f32) -> Duration {
        Duration::from_secs_f32(value)
    }

    #[test]
    fn scheduled_message_fires_after_delay() {
        let mut status = StatusMessages::default();
        status.schedule("FIND A SURFACE", 3.5, MessageType::PlaneEstimation);

        assert!(status.tick(secs(3.0)).is_empty());
        assert_eq!(
            status.tick(secs(0.6)),
            vec![StatusChange::Shown("FIND A SURFACE".to_string())]
        );
        assert!(!status.is_scheduled(MessageType::PlaneEstimation));
        assert_eq!(status.current(), Some("FIND A SURFACE"));
    }

    #[test]
    fn rescheduling_same_text_keeps_deadline() {
        let mut status = StatusMessages::default();
        status.schedule("TRY MOVING", 5.0, MessageType::FocusSquare);
        status.tick(secs(4.0));
        status.schedule("TRY MOVING", 5.0, MessageType::FocusSquare);

        assert_eq!(
            status.tick(secs(1.5)),
            vec![StatusChange::Shown("TRY MOVING".to_string())]
        );
    }

    #[test]
    fn cancelled_message_never_shows() {
        let mut status = StatusMessages::default();
        status.schedule("TRY MOVING", 1.0, MessageType::FocusSquare);
        status.cancel_scheduled(MessageType::FocusSquare);
        assert!(status.tick(secs(2.0)).is_empty());
    }

    #[test]
    fn shown_message_hides_after_display_time() {
        let mut status = StatusMessages::default();
        status.show("CANNOT PLACE OBJECT");
        assert_eq!(
            status.tick(secs(0.1)),
            vec![StatusChange::Shown("CANNOT PLACE OBJECT".to_string())]
        );
        assert_eq!(status.tick(secs(MESSAGE_DISPLAY_SECS)), vec![StatusChange::Hidden]);
        assert_eq!(status.current(), None);
    }
}
