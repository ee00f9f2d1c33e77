use std::f32::consts::{PI, TAU};

use bevy::prelude::*;

use crate::engine::core::settings::InteractionSettings;

/// One finger (or the emulating mouse button) on the screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub id: u64,
    pub position: Vec2,
}

/// Input for one tick of gesture recognition.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct TouchFrame {
    /// Touches currently down, ordered by id.
    pub touches: Vec<TouchPoint>,
    /// Wheel delta in lines since the last tick.
    pub wheel: f32,
    /// The platform cancelled the touch sequence.
    pub canceled: bool,
}

impl TouchFrame {
    pub fn positions(&self) -> Vec<Vec2> {
        self.touches.iter().map(|touch| touch.position).collect()
    }

    pub fn ids(&self) -> Vec<u64> {
        self.touches.iter().map(|touch| touch.id).collect()
    }

    pub fn centroid(&self) -> Option<Vec2> {
        centroid(&self.positions())
    }
}

/// Centre of the bounding box around `points`.
pub fn centroid(points: &[Vec2]) -> Option<Vec2> {
    let first = *points.first()?;
    let (min, max) = points
        .iter()
        .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p)));
    Some((min + max) * 0.5)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Began,
    Changed,
    Ended,
    Cancelled,
}

impl GesturePhase {
    pub fn is_finished(self) -> bool {
        matches!(self, GesturePhase::Ended | GesturePhase::Cancelled)
    }
}

/// Recognised gestures, delivered in the order they happened.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    Tap { location: Vec2 },
    DoubleTap { location: Vec2 },
    LongPress { phase: GesturePhase },
    Pan { phase: GesturePhase },
    Rotate { phase: GesturePhase },
}

/// Pan that reports movement from the first pixel but only marks itself
/// committed once the cumulative displacement passes a threshold.
///
/// The accumulated translation is not cleared when the threshold is crossed, so
/// the first committed read contains every delta since the gesture began.
#[derive(Debug, Clone)]
pub struct ThresholdPanGesture {
    threshold: f32,
    active: bool,
    suppressed: bool,
    touch_ids: Vec<u64>,
    locations: Vec<Vec2>,
    anchor: Option<Vec2>,
    translation: Vec2,
    displacement: Vec2,
    threshold_exceeded: bool,
}

impl ThresholdPanGesture {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            active: false,
            suppressed: false,
            touch_ids: Vec::new(),
            locations: Vec::new(),
            anchor: None,
            translation: Vec2::ZERO,
            displacement: Vec2::ZERO,
            threshold_exceeded: false,
        }
    }

    pub fn update(&mut self, frame: &TouchFrame) -> Option<GesturePhase> {
        if frame.canceled {
            return self.finish(GesturePhase::Cancelled);
        }
        let Some(center) = frame.centroid() else {
            return self.finish(GesturePhase::Ended);
        };
        if self.suppressed {
            return None;
        }

        self.locations = frame.positions();
        let ids = frame.ids();
        if ids != self.touch_ids {
            // A finger joining or lifting re-bases the centroid instead of jumping.
            self.touch_ids = ids;
            self.anchor = Some(center);
            return None;
        }

        let previous = self.anchor.replace(center)?;
        let delta = center - previous;
        if delta == Vec2::ZERO {
            return None;
        }
        self.translation += delta;
        self.displacement += delta;
        if !self.threshold_exceeded && self.displacement.length() > self.threshold {
            self.threshold_exceeded = true;
        }

        if self.active {
            Some(GesturePhase::Changed)
        } else {
            self.active = true;
            Some(GesturePhase::Began)
        }
    }

    /// Fails the gesture until every finger lifts.
    pub fn cancel(&mut self) -> Option<GesturePhase> {
        let phase = self.finish(GesturePhase::Cancelled);
        self.suppressed = true;
        phase
    }

    fn finish(&mut self, phase: GesturePhase) -> Option<GesturePhase> {
        let was_active = self.active;
        *self = Self::new(self.threshold);
        was_active.then_some(phase)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_threshold_exceeded(&self) -> bool {
        self.threshold_exceeded
    }

    pub fn translation(&self) -> Vec2 {
        self.translation
    }

    pub fn set_translation(&mut self, translation: Vec2) {
        self.translation = translation;
    }

    pub fn touch_locations(&self) -> &[Vec2] {
        &self.locations
    }

    pub fn center(&self) -> Option<Vec2> {
        centroid(&self.locations)
    }
}

fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}

/// Two-finger twist, or the mouse wheel while the emulated touch is down.
#[derive(Debug, Clone)]
pub struct RotationGesture {
    wheel_speed: f32,
    active: bool,
    rotation: f32,
    pair: Option<[u64; 2]>,
    last_angle: Option<f32>,
}

impl RotationGesture {
    pub fn new(wheel_speed: f32) -> Self {
        Self {
            wheel_speed,
            active: false,
            rotation: 0.0,
            pair: None,
            last_angle: None,
        }
    }

    pub fn update(&mut self, frame: &TouchFrame) -> Option<GesturePhase> {
        if frame.canceled {
            return self.finish(GesturePhase::Cancelled);
        }

        match frame.touches.as_slice() {
            [] => self.finish(GesturePhase::Ended),
            [a, b, ..] => {
                let offset = b.position - a.position;
                let angle = offset.y.atan2(offset.x);
                let pair = [a.id, b.id];
                if self.pair != Some(pair) {
                    self.pair = Some(pair);
                    self.last_angle = Some(angle);
                    return None;
                }
                let previous = self.last_angle.replace(angle)?;
                let delta = wrap_angle(angle - previous);
                if delta == 0.0 {
                    return None;
                }
                Some(self.accumulate(delta))
            }
            [_] => {
                if self.pair.is_some() {
                    // Lifting one of two fingers ends the twist.
                    return self.finish(GesturePhase::Ended);
                }
                if frame.wheel == 0.0 {
                    return None;
                }
                Some(self.accumulate(frame.wheel * self.wheel_speed))
            }
        }
    }

    fn accumulate(&mut self, delta: f32) -> GesturePhase {
        self.rotation += delta;
        if self.active {
            GesturePhase::Changed
        } else {
            self.active = true;
            GesturePhase::Began
        }
    }

    fn finish(&mut self, phase: GesturePhase) -> Option<GesturePhase> {
        let was_active = self.active;
        *self = Self::new(self.wheel_speed);
        was_active.then_some(phase)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Accumulated rotation in radians since it was last set.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: f32) {
        self.rotation = rotation;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PressState {
    Idle,
    Pressing { started_at: f32, origin: Vec2 },
    Active { last: Vec2 },
    Failed,
}

/// Press held still for a minimum duration.
#[derive(Debug, Clone)]
pub struct LongPressGesture {
    min_duration: f32,
    slop: f32,
    state: PressState,
    locations: Vec<Vec2>,
}

impl LongPressGesture {
    pub fn new(min_duration: f32, slop: f32) -> Self {
        Self {
            min_duration,
            slop,
            state: PressState::Idle,
            locations: Vec::new(),
        }
    }

    pub fn update(&mut self, frame: &TouchFrame, now: f32) -> Option<GesturePhase> {
        let was_active = matches!(self.state, PressState::Active { .. });
        if frame.canceled {
            self.state = PressState::Idle;
            self.locations.clear();
            return was_active.then_some(GesturePhase::Cancelled);
        }
        let Some(center) = frame.centroid() else {
            self.state = PressState::Idle;
            self.locations.clear();
            return was_active.then_some(GesturePhase::Ended);
        };
        self.locations = frame.positions();

        match self.state {
            PressState::Idle => {
                self.state = PressState::Pressing {
                    started_at: now,
                    origin: center,
                };
                None
            }
            PressState::Pressing { started_at, origin } => {
                if center.distance(origin) > self.slop {
                    self.state = PressState::Failed;
                    None
                } else if now - started_at >= self.min_duration {
                    self.state = PressState::Active { last: center };
                    Some(GesturePhase::Began)
                } else {
                    None
                }
            }
            PressState::Active { last } => {
                if center == last {
                    return None;
                }
                self.state = PressState::Active { last: center };
                Some(GesturePhase::Changed)
            }
            PressState::Failed => None,
        }
    }

    /// Fails a press that has not fired yet. A fired press is unaffected.
    pub fn cancel(&mut self) {
        if matches!(self.state, PressState::Pressing { .. }) {
            self.state = PressState::Failed;
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, PressState::Active { .. })
    }

    pub fn touch_locations(&self) -> &[Vec2] {
        &self.locations
    }

    pub fn center(&self) -> Option<Vec2> {
        centroid(&self.locations)
    }
}

/// Outcome of the combined tap and double-tap recogniser.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TapRecognition {
    Tap(Vec2),
    DoubleTap(Vec2),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TapState {
    Idle,
    Down {
        started_at: f32,
        origin: Vec2,
        last: Vec2,
        /// Location of the first tap when this is the second touch of a double tap.
        first: Option<Vec2>,
    },
    AwaitingSecond {
        first: Vec2,
        released_at: f32,
    },
    Failed,
}

/// Single and double tap. A single tap is only reported once the double-tap
/// window has passed, so a double tap never triggers the single-tap action.
#[derive(Debug, Clone)]
pub struct TapGesture {
    max_press: f32,
    slop: f32,
    double_interval: f32,
    double_distance: f32,
    state: TapState,
}

impl TapGesture {
    pub fn new(max_press: f32, slop: f32, double_interval: f32, double_distance: f32) -> Self {
        Self {
            max_press,
            slop,
            double_interval,
            double_distance,
            state: TapState::Idle,
        }
    }

    pub fn update(&mut self, frame: &TouchFrame, now: f32) -> Option<TapRecognition> {
        if frame.canceled {
            self.state = TapState::Failed;
            return None;
        }

        match self.state {
            TapState::Idle => {
                match frame.touches.as_slice() {
                    [] => {}
                    [touch] => self.press(touch.position, now, None),
                    _ => self.state = TapState::Failed,
                }
                None
            }
            TapState::Down {
                started_at,
                origin,
                last,
                first,
            } => match frame.touches.as_slice() {
                [] => {
                    if let Some(_first) = first {
                        self.state = TapState::Idle;
                        Some(TapRecognition::DoubleTap(last))
                    } else {
                        self.state = TapState::AwaitingSecond {
                            first: last,
                            released_at: now,
                        };
                        None
                    }
                }
                [touch]
                    if touch.position.distance(origin) <= self.slop
                        && now - started_at <= self.max_press =>
                {
                    self.state = TapState::Down {
                        started_at,
                        origin,
                        last: touch.position,
                        first,
                    };
                    None
                }
                _ => {
                    // The second touch failed, but the first tap still stands.
                    self.state = TapState::Failed;
                    first.map(TapRecognition::Tap)
                }
            },
            TapState::AwaitingSecond { first, released_at } => {
                if now - released_at > self.double_interval {
                    self.state = TapState::Idle;
                    return Some(TapRecognition::Tap(first));
                }
                match frame.touches.as_slice() {
                    [] => None,
                    [touch] if touch.position.distance(first) <= self.double_distance => {
                        self.press(touch.position, now, Some(first));
                        None
                    }
                    [touch] => {
                        self.press(touch.position, now, None);
                        Some(TapRecognition::Tap(first))
                    }
                    _ => {
                        self.state = TapState::Failed;
                        Some(TapRecognition::Tap(first))
                    }
                }
            }
            TapState::Failed => {
                if frame.touches.is_empty() {
                    self.state = TapState::Idle;
                }
                None
            }
        }
    }

    fn press(&mut self, position: Vec2, now: f32, first: Option<Vec2>) {
        self.state = TapState::Down {
            started_at: now,
            origin: position,
            last: position,
            first,
        };
    }

    /// Drops any tap in progress, including one waiting for its double-tap window.
    pub fn cancel(&mut self) {
        self.state = TapState::Failed;
    }
}

/// Every recogniser plus the rules for how they interact.
///
/// Pan and rotate run simultaneously. A pan that passes its threshold fails
/// pending taps and an unfired long press; a long press that fires fails tap
/// and pan.
#[derive(Resource, Debug, Clone)]
pub struct GestureRecognizers {
    pub pan: ThresholdPanGesture,
    pub rotation: RotationGesture,
    pub long_press: LongPressGesture,
    pub tap: TapGesture,
}

impl Default for GestureRecognizers {
    fn default() -> Self {
        Self::from_settings(&InteractionSettings::default())
    }
}

impl GestureRecognizers {
    pub fn from_settings(settings: &InteractionSettings) -> Self {
        Self {
            pan: ThresholdPanGesture::new(settings.pan_threshold),
            rotation: RotationGesture::new(settings.wheel_rotation_speed),
            long_press: LongPressGesture::new(settings.long_press_duration, settings.touch_slop),
            tap: TapGesture::new(
                settings.tap_max_press,
                settings.touch_slop,
                settings.double_tap_interval,
                settings.double_tap_max_distance,
            ),
        }
    }

    pub fn process(&mut self, frame: &TouchFrame, now: f32) -> Vec<GestureEvent> {
        let mut events = Vec::new();

        let long_press = self.long_press.update(frame, now);
        if long_press == Some(GesturePhase::Began) {
            self.tap.cancel();
            if let Some(phase) = self.pan.cancel() {
                events.push(GestureEvent::Pan { phase });
            }
        }

        let was_exceeded = self.pan.is_threshold_exceeded();
        if let Some(phase) = self.pan.update(frame) {
            events.push(GestureEvent::Pan { phase });
        }
        if !was_exceeded && self.pan.is_threshold_exceeded() {
            self.tap.cancel();
            self.long_press.cancel();
        }

        if let Some(phase) = self.rotation.update(frame) {
            if phase == GesturePhase::Began {
                self.tap.cancel();
                self.long_press.cancel();
            }
            events.push(GestureEvent::Rotate { phase });
        }

        if let Some(phase) = long_press {
            events.push(GestureEvent::LongPress { phase });
        }

        match self.tap.update(frame, now) {
            Some(TapRecognition::Tap(location)) => events.push(GestureEvent::Tap { location }),
            Some(TapRecognition::DoubleTap(location)) => {
                events.push(GestureEvent::DoubleTap { location })
            }
            None => {}
        }

        events
    }
}

/// Runs the recognisers over this tick's touches.
pub fn recognize_gestures(
    time: Res<Time>,
    frame: Res<TouchFrame>,
    mut recognizers: ResMut<GestureRecognizers>,
    mut gestures: EventWriter<GestureEvent>,
) {
    let now = time.elapsed_secs();
    for event in recognizers.process(&frame, now) {
        gestures.write(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(x: f32, y: f32) -> TouchFrame {
        TouchFrame {
            touches: vec![TouchPoint {
                id: 0,
                position: Vec2::new(x, y),
            }],
            ..default()
        }
    }

    fn two_touches(a: Vec2, b: Vec2) -> TouchFrame {
        TouchFrame {
            touches: vec![
                TouchPoint { id: 0, position: a },
                TouchPoint { id: 1, position: b },
            ],
            ..default()
        }
    }

    fn released() -> TouchFrame {
        TouchFrame::default()
    }

    #[test]
    fn pan_below_threshold_is_not_committed() {
        let mut pan = ThresholdPanGesture::new(10.0);
        assert_eq!(pan.update(&touch(100.0, 100.0)), None);
        assert_eq!(pan.update(&touch(103.0, 102.0)), Some(GesturePhase::Began));
        assert!(!pan.is_threshold_exceeded());
        assert_eq!(pan.update(&touch(105.0, 100.0)), Some(GesturePhase::Changed));
        assert!(!pan.is_threshold_exceeded());
    }

    #[test]
    fn crossing_threshold_keeps_accumulated_translation() {
        let mut pan = ThresholdPanGesture::new(10.0);
        pan.update(&touch(100.0, 100.0));
        pan.update(&touch(103.0, 102.0));
        pan.update(&touch(112.0, 102.0));
        assert!(pan.is_threshold_exceeded());
        assert_eq!(pan.translation(), Vec2::new(12.0, 2.0));
    }

    #[test]
    fn pan_ends_when_fingers_lift() {
        let mut pan = ThresholdPanGesture::new(10.0);
        pan.update(&touch(0.0, 0.0));
        pan.update(&touch(20.0, 0.0));
        assert_eq!(pan.update(&released()), Some(GesturePhase::Ended));
        assert!(!pan.is_active());
        assert!(!pan.is_threshold_exceeded());
        assert_eq!(pan.update(&released()), None);
    }

    #[test]
    fn second_finger_rebases_instead_of_jumping() {
        let mut pan = ThresholdPanGesture::new(10.0);
        pan.update(&touch(0.0, 0.0));
        pan.update(&two_touches(Vec2::ZERO, Vec2::new(100.0, 0.0)));
        assert_eq!(pan.translation(), Vec2::ZERO);
        assert!(!pan.is_threshold_exceeded());
    }

    #[test]
    fn cancelled_pan_stays_quiet_until_release() {
        let mut pan = ThresholdPanGesture::new(10.0);
        pan.update(&touch(0.0, 0.0));
        pan.update(&touch(5.0, 0.0));
        assert_eq!(pan.cancel(), Some(GesturePhase::Cancelled));
        assert_eq!(pan.update(&touch(30.0, 0.0)), None);
        pan.update(&released());
        pan.update(&touch(0.0, 0.0));
        assert_eq!(pan.update(&touch(1.0, 0.0)), Some(GesturePhase::Began));
    }

    #[test]
    fn rotation_accumulates_two_finger_twist() {
        let mut rotation = RotationGesture::new(0.1);
        rotation.update(&two_touches(Vec2::ZERO, Vec2::new(100.0, 0.0)));
        let phase = rotation.update(&two_touches(Vec2::ZERO, Vec2::new(0.0, 100.0)));
        assert_eq!(phase, Some(GesturePhase::Began));
        assert!((rotation.rotation() - std::f32::consts::FRAC_PI_2).abs() < 1e-5);

        assert_eq!(
            rotation.update(&touch(0.0, 0.0)),
            Some(GesturePhase::Ended)
        );
    }

    #[test]
    fn wheel_rotates_while_single_touch_is_down() {
        let mut rotation = RotationGesture::new(0.1);
        let mut frame = touch(10.0, 10.0);
        frame.wheel = 2.0;
        assert_eq!(rotation.update(&frame), Some(GesturePhase::Began));
        assert!((rotation.rotation() - 0.2).abs() < 1e-6);

        assert_eq!(rotation.update(&touch(10.0, 10.0)), None);
        assert_eq!(rotation.update(&released()), Some(GesturePhase::Ended));
    }

    #[test]
    fn long_press_fires_once_after_duration() {
        let mut press = LongPressGesture::new(1.5, 10.0);
        assert_eq!(press.update(&touch(50.0, 50.0), 0.0), None);
        assert_eq!(press.update(&touch(52.0, 50.0), 1.0), None);
        assert_eq!(press.update(&touch(52.0, 50.0), 1.6), Some(GesturePhase::Began));
        assert_eq!(press.update(&touch(52.0, 50.0), 1.7), None);
        assert_eq!(press.update(&released(), 1.8), Some(GesturePhase::Ended));
    }

    #[test]
    fn long_press_fails_on_drift() {
        let mut press = LongPressGesture::new(1.5, 10.0);
        press.update(&touch(50.0, 50.0), 0.0);
        press.update(&touch(70.0, 50.0), 0.5);
        assert_eq!(press.update(&touch(70.0, 50.0), 2.0), None);
    }

    #[test]
    fn single_tap_waits_for_double_tap_window() {
        let mut tap = TapGesture::new(0.5, 10.0, 0.3, 40.0);
        assert_eq!(tap.update(&touch(10.0, 10.0), 0.0), None);
        assert_eq!(tap.update(&released(), 0.1), None);
        assert_eq!(tap.update(&released(), 0.3), None);
        assert_eq!(
            tap.update(&released(), 0.5),
            Some(TapRecognition::Tap(Vec2::new(10.0, 10.0)))
        );
    }

    #[test]
    fn double_tap_suppresses_single_tap() {
        let mut tap = TapGesture::new(0.5, 10.0, 0.3, 40.0);
        tap.update(&touch(10.0, 10.0), 0.0);
        tap.update(&released(), 0.1);
        tap.update(&touch(20.0, 12.0), 0.2);
        assert_eq!(
            tap.update(&released(), 0.25),
            Some(TapRecognition::DoubleTap(Vec2::new(20.0, 12.0)))
        );
        assert_eq!(tap.update(&released(), 1.0), None);
    }

    #[test]
    fn slow_press_is_not_a_tap() {
        let mut tap = TapGesture::new(0.5, 10.0, 0.3, 40.0);
        tap.update(&touch(10.0, 10.0), 0.0);
        tap.update(&touch(10.0, 10.0), 0.8);
        assert_eq!(tap.update(&released(), 0.9), None);
        assert_eq!(tap.update(&released(), 2.0), None);
    }

    #[test]
    fn pan_past_threshold_cancels_pending_tap_and_long_press() {
        let mut recognizers = GestureRecognizers::default();
        recognizers.process(&touch(0.0, 0.0), 0.0);
        let events = recognizers.process(&touch(30.0, 0.0), 0.05);
        assert_eq!(
            events,
            vec![GestureEvent::Pan {
                phase: GesturePhase::Began
            }]
        );

        let events = recognizers.process(&touch(30.0, 0.0), 2.0);
        assert!(events.is_empty());
        recognizers.process(&released(), 2.1);
        let events = recognizers.process(&released(), 3.0);
        assert!(events.iter().all(|e| !matches!(e, GestureEvent::Tap { .. })));
    }

    #[test]
    fn long_press_cancels_a_started_pan() {
        let mut recognizers = GestureRecognizers::default();
        recognizers.process(&touch(0.0, 0.0), 0.0);
        recognizers.process(&touch(2.0, 0.0), 0.1);
        let events = recognizers.process(&touch(2.0, 0.0), 1.6);
        assert_eq!(
            events,
            vec![
                GestureEvent::Pan {
                    phase: GesturePhase::Cancelled
                },
                GestureEvent::LongPress {
                    phase: GesturePhase::Began
                },
            ]
        );
    }

    #[test]
    fn quick_tap_is_reported_after_window() {
        let mut recognizers = GestureRecognizers::default();
        recognizers.process(&touch(40.0, 40.0), 0.0);
        recognizers.process(&released(), 0.1);
        let events = recognizers.process(&released(), 0.5);
        assert_eq!(
            events,
            vec![GestureEvent::Tap {
                location: Vec2::new(40.0, 40.0)
            }]
        );
    }
}
