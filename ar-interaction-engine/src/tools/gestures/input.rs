use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::input::touch::Touches;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use super::recognizers::{TouchFrame, TouchPoint};

/// Touch id used for the emulated finger under the left mouse button.
pub const MOUSE_TOUCH_ID: u64 = u64::MAX;

const PIXELS_PER_WHEEL_LINE: f32 = 20.0;

/// Builds this tick's `TouchFrame` from the touch screen, falling back to the
/// mouse when no finger is down.
pub fn collect_touch_frame(
    touches: Res<Touches>,
    buttons: Res<ButtonInput<MouseButton>>,
    mut wheel_events: EventReader<MouseWheel>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut frame: ResMut<TouchFrame>,
) {
    let mut points: Vec<TouchPoint> = touches
        .iter()
        .map(|touch| TouchPoint {
            id: touch.id(),
            position: touch.position(),
        })
        .collect();
    points.sort_by_key(|point| point.id);

    if points.is_empty() && buttons.pressed(MouseButton::Left) {
        if let Some(cursor) = windows.single().ok().and_then(Window::cursor_position) {
            points.push(TouchPoint {
                id: MOUSE_TOUCH_ID,
                position: cursor,
            });
        }
    }

    let wheel = wheel_events
        .read()
        .map(|event| match event.unit {
            MouseScrollUnit::Line => event.y,
            MouseScrollUnit::Pixel => event.y / PIXELS_PER_WHEEL_LINE,
        })
        .sum();

    *frame = TouchFrame {
        touches: points,
        wheel,
        canceled: touches.any_just_canceled(),
    };
}
