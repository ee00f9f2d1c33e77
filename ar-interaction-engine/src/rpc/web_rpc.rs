use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::loading::{EmojiCatalog, ObjectLifecycle};
use crate::engine::scene::{FocusSquare, ObjectKind};
use crate::engine::status::StatusMessages;
use crate::tools::object_manager::{ArSet, GestureCoordinator, PlacementAvailability, RestartGate};
use crate::tools::presentation::{PresentationCommand, PresentationEvent};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC 2.0 error object.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Resource managing bidirectional RPC communication between React and Bevy.
/// Handles both request-response patterns and notification broadcasting.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to React frontend without expecting response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    /// Queue response for transmission to React frontend.
    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }
}

/// Plugin establishing WebRPC communication layer for iframe-based deployment.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (
                    process_incoming_messages,
                    handle_rpc_messages,
                    forward_presentation_events,
                    send_outgoing_messages,
                )
                    .chain()
                    .after(ArSet::SceneMutation),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    // Thread-safe message queue for cross-thread communication.
    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        // Filter messages to ensure they contain string data.
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            // Attempt JSON parsing to validate RPC format before queuing.
            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    if let Some(window) = window() {
        if let Err(e) =
            window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
        {
            error!("Failed to register message listener: {:?}", e);
        }
    }

    // Prevent closure from being dropped by transferring ownership to JS.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

/// Resource wrapping thread-safe message queue for WASM event handling.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Event representing incoming RPC message from React frontend.
#[derive(Event)]
struct IncomingRpcMessage {
    content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

/// Read-only interaction state reported by `get_interaction_state`.
#[derive(SystemParam)]
pub struct InteractionSnapshot<'w> {
    catalog: Res<'w, EmojiCatalog>,
    lifecycle: Res<'w, ObjectLifecycle>,
    coordinator: Res<'w, GestureCoordinator>,
    placement: Res<'w, PlacementAvailability>,
    restart: Res<'w, RestartGate>,
    status: Res<'w, StatusMessages>,
    focus: Res<'w, FocusSquare>,
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    snapshot: InteractionSnapshot,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut commands: EventWriter<PresentationCommand>,
) {
    for event in events.read() {
        match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => {
                debug!("Processing RPC method: {}", request.method);
                if let Some(response) = handle_rpc_request(&request, &snapshot, &mut commands) {
                    rpc_interface.queue_response(response);
                }
            }
            Err(parse_error) => {
                rpc_interface.send_notification(
                    "debug_message",
                    serde_json::json!({
                        "message": format!("Parse error: {}", parse_error)
                    }),
                );
            }
        }
    }
}

/// Handle individual RPC request and generate response based on method.
///
/// Commands sent without an ID are still applied; only the response is dropped.
fn handle_rpc_request(
    request: &RpcRequest,
    snapshot: &InteractionSnapshot,
    commands: &mut EventWriter<PresentationCommand>,
) -> Option<RpcResponse> {
    let result = match request.method.as_str() {
        "get_available_objects" => Ok(available_objects(&snapshot.catalog)),
        "get_interaction_state" => Ok(interaction_state(snapshot)),
        method => parse_command(method, &request.params).map(|command| {
            let acknowledged = serde_json::json!({
                "success": true,
                "command": request.method,
            });
            commands.write(command);
            acknowledged
        }),
    };

    let id = request.id.clone()?;
    match result {
        Ok(result_value) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        }),
        Err(error) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        }),
    }
}

/// Map a command method and its params onto a `PresentationCommand`.
pub fn parse_command(
    method: &str,
    params: &serde_json::Value,
) -> Result<PresentationCommand, RpcError> {
    #[derive(serde::Deserialize)]
    struct TextParams {
        text: String,
    }

    match method {
        "place_object" => serde_json::from_value::<ObjectKind>(params.clone())
            .map(PresentationCommand::PlaceObject)
            .map_err(|_| {
                RpcError::invalid_params(
                    "Expected {\"kind\": \"emoji\", \"name\"} or {\"kind\": \"text\", \"text\"}",
                )
            }),
        "delete_selected" => Ok(PresentationCommand::DeleteSelected),
        "restart" => Ok(PresentationCommand::Restart),
        "set_selected_text" => serde_json::from_value::<TextParams>(params.clone())
            .map(|parsed| PresentationCommand::SetSelectedText(parsed.text))
            .map_err(|_| RpcError::invalid_params("Expected 'text' parameter")),
        "end_text_input" => Ok(PresentationCommand::EndTextInput),
        _ => {
            warn!("Unknown RPC method: {}", method);
            Err(RpcError::method_not_found(method))
        }
    }
}

fn available_objects(catalog: &EmojiCatalog) -> serde_json::Value {
    let emojis: Vec<serde_json::Value> = catalog
        .emojis
        .iter()
        .map(|emoji| {
            serde_json::json!({
                "name": emoji.name,
                "has_model": emoji.model.is_some(),
            })
        })
        .collect();

    serde_json::json!({
        "emojis": emojis,
        "text": true,
    })
}

fn interaction_state(snapshot: &InteractionSnapshot) -> serde_json::Value {
    serde_json::json!({
        "objects": snapshot.lifecycle.loaded().iter().map(|id| id.0).collect::<Vec<_>>(),
        "selected": snapshot.coordinator.selected_id().map(|id| id.0),
        "loading": snapshot.lifecycle.is_loading(),
        "placement_available": snapshot.placement.is_available(),
        "restart_available": snapshot.restart.is_available(),
        "text_input_active": snapshot.coordinator.is_text_input_active(),
        "status_message": snapshot.status.current(),
        "focus_square": snapshot.focus.state().name(),
    })
}

/// JSON params for a presentation event notification.
pub fn notification_params(event: &PresentationEvent) -> serde_json::Value {
    use serde_json::json;

    match event {
        PresentationEvent::BeginTextInput { object, seed } => {
            json!({ "object": object.0, "seed": seed })
        }
        PresentationEvent::LongPressOnObject { object, point } => {
            json!({ "object": object.0, "point": [point.x, point.y] })
        }
        PresentationEvent::StatusMessage { text } => json!({ "text": text }),
        PresentationEvent::PlacementAvailability { available }
        | PresentationEvent::RestartAvailability { available } => {
            json!({ "available": available })
        }
        PresentationEvent::LoadingChanged { loading } => json!({ "loading": loading }),
        PresentationEvent::LoadFailed { kind, reason } => {
            json!({ "kind": kind, "reason": reason })
        }
        PresentationEvent::ObjectPlaced { object, kind } => {
            json!({ "object": object.0, "kind": kind })
        }
        PresentationEvent::EndTextInput
        | PresentationEvent::DismissDeleteAffordance
        | PresentationEvent::StatusMessageHidden => json!({}),
    }
}

/// Forward presentation events to the frontend as notifications.
fn forward_presentation_events(
    mut events: EventReader<PresentationEvent>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for event in events.read() {
        rpc_interface.send_notification(event.method(), notification_params(event));
    }
}

/// Send queued notifications and responses to React frontend.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    // Send notifications first.
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    // Send responses second to maintain order.
    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

/// Send serialized message to parent window (React frontend).
fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        // No-op for non-WASM targets.
        let _ = message;
    }
}

/// Standard RPC error codes and constructors.
impl RpcError {
    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: "Method not found".to_string(),
            data: Some(serde_json::json!({ "method": method })),
        }
    }

    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scene::ObjectId;
    use serde_json::json;

    #[test]
    fn place_object_parses_tagged_kinds() {
        let emoji = parse_command("place_object", &json!({"kind": "emoji", "name": "heart"}));
        assert_eq!(
            emoji.ok(),
            Some(PresentationCommand::PlaceObject(ObjectKind::Emoji {
                name: "heart".into()
            }))
        );

        let text = parse_command("place_object", &json!({"kind": "text", "text": "hi"}));
        assert_eq!(
            text.ok(),
            Some(PresentationCommand::PlaceObject(ObjectKind::Text { text: "hi".into() }))
        );
    }

    #[test]
    fn malformed_params_are_invalid() {
        let err = parse_command("place_object", &json!({"kind": "sticker"})).unwrap_err();
        assert_eq!(err.code, -32602);

        let err = parse_command("set_selected_text", &json!({})).unwrap_err();
        assert_eq!(err.code, -32602);
    }

    #[test]
    fn unknown_method_is_not_found() {
        let err = parse_command("fly", &json!(null)).unwrap_err();
        assert_eq!(err.code, -32601);
        assert_eq!(err.data, Some(json!({"method": "fly"})));
    }

    #[test]
    fn parameterless_commands_ignore_params() {
        assert_eq!(
            parse_command("restart", &json!(null)).ok(),
            Some(PresentationCommand::Restart)
        );
        assert_eq!(
            parse_command("delete_selected", &json!({"extra": 1})).ok(),
            Some(PresentationCommand::DeleteSelected)
        );
    }

    #[test]
    fn notifications_carry_event_fields() {
        let event = PresentationEvent::LongPressOnObject {
            object: ObjectId(4),
            point: Vec2::new(10.0, 20.0),
        };
        assert_eq!(event.method(), "long_press_on_object");
        assert_eq!(
            notification_params(&event),
            json!({"object": 4, "point": [10.0, 20.0]})
        );

        let failed = PresentationEvent::LoadFailed {
            kind: ObjectKind::Emoji { name: "ghost".into() },
            reason: "unknown".into(),
        };
        assert_eq!(
            notification_params(&failed),
            json!({"kind": {"kind": "emoji", "name": "ghost"}, "reason": "unknown"})
        );
    }
}
