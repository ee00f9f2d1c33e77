use bevy::prelude::*;

use crate::tools::presentation::PresentationEvent;

/// Last placement availability reported to the presentation layer.
#[derive(Resource, Debug, Default)]
pub struct PlacementAvailability {
    available: Option<bool>,
}

impl PlacementAvailability {
    pub fn is_available(&self) -> bool {
        self.available.unwrap_or(false)
    }

    /// Records availability, returning the event to send when it changed.
    pub fn set(&mut self, available: bool) -> Option<PresentationEvent> {
        if self.available == Some(available) {
            return None;
        }
        self.available = Some(available);
        Some(PresentationEvent::PlacementAvailability { available })
    }
}

/// Blocks restart while a previous teardown may still be in flight.
#[derive(Resource, Debug, Default)]
pub struct RestartGate {
    cooldown: Option<Timer>,
    /// The cooldown began this tick and must not count its delta.
    started_this_tick: bool,
}

impl RestartGate {
    pub fn is_available(&self) -> bool {
        self.cooldown.is_none()
    }

    pub fn begin_cooldown(&mut self, secs: f32) {
        self.cooldown = Some(Timer::from_seconds(secs, TimerMode::Once));
        self.started_this_tick = true;
    }

    /// Advances the cooldown. Returns true on the tick restart becomes available.
    /// The tick that started the cooldown is skipped.
    pub fn tick(&mut self, delta: std::time::Duration) -> bool {
        if std::mem::take(&mut self.started_this_tick) {
            return false;
        }
        let finished = self
            .cooldown
            .as_mut()
            .is_some_and(|timer| timer.tick(delta).finished());
        if finished {
            self.cooldown = None;
        }
        finished
    }
}

pub fn tick_restart_gate(
    time: Res<Time>,
    mut gate: ResMut<RestartGate>,
    mut presentation: EventWriter<PresentationEvent>,
) {
    if gate.tick(time.delta()) {
        presentation.write(PresentationEvent::RestartAvailability { available: true });
    }
}
