//! Interface between the interaction core and whatever presents it.
//!
//! The presentation layer drives the core with `PresentationCommand`s and
//! listens for `PresentationEvent`s. Web builds bridge both over JSON-RPC;
//! native builds add keyboard shortcuts and an on-screen status line.

use bevy::prelude::*;
use constants::interaction::DEFAULT_TEXT;
use constants::render_settings::STATUS_FONT_SIZE;

use crate::engine::loading::EmojiCatalog;
use crate::engine::scene::{ObjectId, ObjectKind};

/// Requests from the presentation layer.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum PresentationCommand {
    PlaceObject(ObjectKind),
    DeleteSelected,
    Restart,
    SetSelectedText(String),
    EndTextInput,
}

/// Notifications for the presentation layer.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum PresentationEvent {
    /// Open text entry for a text object, seeded with its current text.
    BeginTextInput { object: ObjectId, seed: String },
    EndTextInput,
    /// A long press landed on an object; offer to delete it.
    LongPressOnObject { object: ObjectId, point: Vec2 },
    DismissDeleteAffordance,
    StatusMessage { text: String },
    StatusMessageHidden,
    PlacementAvailability { available: bool },
    LoadingChanged { loading: bool },
    LoadFailed { kind: ObjectKind, reason: String },
    RestartAvailability { available: bool },
    ObjectPlaced { object: ObjectId, kind: ObjectKind },
}

impl PresentationEvent {
    /// Name used for RPC notifications.
    pub fn method(&self) -> &'static str {
        match self {
            PresentationEvent::BeginTextInput { .. } => "begin_text_input",
            PresentationEvent::EndTextInput => "end_text_input",
            PresentationEvent::LongPressOnObject { .. } => "long_press_on_object",
            PresentationEvent::DismissDeleteAffordance => "dismiss_delete_affordance",
            PresentationEvent::StatusMessage { .. } => "status_message",
            PresentationEvent::StatusMessageHidden => "status_message_hidden",
            PresentationEvent::PlacementAvailability { .. } => "placement_availability",
            PresentationEvent::LoadingChanged { .. } => "loading_changed",
            PresentationEvent::LoadFailed { .. } => "load_failed",
            PresentationEvent::RestartAvailability { .. } => "restart_availability",
            PresentationEvent::ObjectPlaced { .. } => "object_placed",
        }
    }
}

#[derive(Component)]
pub struct StatusText;

/// Keyboard shortcuts and the status line for native builds.
pub struct NativePresentationPlugin;

impl Plugin for NativePresentationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_status_overlay)
            .add_systems(Update, (handle_keyboard_shortcuts, update_status_overlay));
    }
}

pub fn handle_keyboard_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    catalog: Res<EmojiCatalog>,
    mut requests: EventWriter<PresentationCommand>,
) {
    if keyboard.just_pressed(KeyCode::KeyE) {
        if let Some(name) = catalog.names().next() {
            requests.write(PresentationCommand::PlaceObject(ObjectKind::Emoji {
                name: name.to_string(),
            }));
        }
    }

    if keyboard.just_pressed(KeyCode::KeyT) {
        requests.write(PresentationCommand::PlaceObject(ObjectKind::Text {
            text: DEFAULT_TEXT.to_string(),
        }));
    }

    if keyboard.any_just_pressed([KeyCode::Delete, KeyCode::Backspace]) {
        requests.write(PresentationCommand::DeleteSelected);
    }

    if keyboard.just_pressed(KeyCode::KeyR) {
        requests.write(PresentationCommand::Restart);
    }

    if keyboard.just_pressed(KeyCode::Escape) {
        requests.write(PresentationCommand::EndTextInput);
    }
}

fn spawn_status_overlay(mut commands: Commands) {
    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: STATUS_FONT_SIZE,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            left: Val::Px(12.0),
            ..default()
        },
        StatusText,
    ));
}

fn update_status_overlay(
    mut events: EventReader<PresentationEvent>,
    mut texts: Query<&mut Text, With<StatusText>>,
) {
    for event in events.read() {
        let line = match event {
            PresentationEvent::StatusMessage { text } => text.clone(),
            PresentationEvent::StatusMessageHidden => String::new(),
            PresentationEvent::LongPressOnObject { object, .. } => {
                format!("Object {object} selected. Press Delete to remove it.")
            }
            PresentationEvent::BeginTextInput { seed, .. } => {
                format!("Editing \"{seed}\"")
            }
            _ => continue,
        };
        for mut text in &mut texts {
            text.0 = line.clone();
        }
    }
}
