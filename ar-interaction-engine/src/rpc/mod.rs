//! JSON-RPC 2.0 bridge between the interaction core and a web frontend.
//!
//! The engine runs in an iframe; the parent window drives it with requests
//! over `postMessage` and receives notifications back.
//!
//! ```text
//! Frontend (parent window)  <──postMessage──>  Bevy (iframe)
//!        │                                          │
//!        ├─ Request (with ID) ────────────────────> │
//!        │                                          ├─ PresentationCommand
//!        │ <─────────────────── Response (with ID) ─┤
//!        │                                          │
//!        │ <──── Notification (PresentationEvent) ──┤
//! ```
//!
//! Requests without an ID are treated as notifications: the command is still
//! applied but nothing is sent back.
//!
//! ## Methods
//!
//! ### Commands
//! - `place_object`: Load and place an object, params `{"kind": "emoji", "name": ...}`
//!   or `{"kind": "text", "text": ...}`
//! - `delete_selected`: Remove the selected object
//! - `restart`: Remove every object and restart tracking (subject to cooldown)
//! - `set_selected_text`: Replace the text of the selected text object
//! - `end_text_input`: Dismiss text entry
//!
//! ### Queries
//! - `get_available_objects`: List catalog emojis and whether text is supported
//! - `get_interaction_state`: Objects, selection, loading and availability flags
//!
//! ### Notifications
//! Every `PresentationEvent` is forwarded under its `method()` name, for
//! example `status_message`, `loading_changed` or `object_placed`.
//!
//! ```typescript
//! iframe.contentWindow.postMessage(JSON.stringify({
//!   jsonrpc: "2.0",
//!   method: "place_object",
//!   params: { kind: "emoji", name: "heart" },
//!   id: 1
//! }), "*");
//! ```
//!
//! ## Error Handling
//!
//! Standard JSON-RPC 2.0 error codes:
//! - `-32601`: Method not found
//! - `-32602`: Invalid params

/// JSON-RPC 2.0 transport, request dispatch and event forwarding.
pub mod web_rpc;
