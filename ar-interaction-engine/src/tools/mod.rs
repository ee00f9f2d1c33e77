//! Interaction tools driven by touch input and the presentation layer.
//!
//! ## Input Flow
//!
//! ```text
//! Touches / mouse
//!   └─> collect_touch_frame() -> TouchFrame
//!       └─> recognize_gestures() -> GestureEvent
//!           └─> handle_gestures()
//!               ├─> GestureCoordinator (selection, dragging, rotation)
//!               └─> PresentationEvent (text input, delete affordance)
//!
//! PresentationCommand (keyboard on native, RPC on WASM)
//!   └─> handle_presentation_commands()
//!       ├─> ObjectLifecycle (load, remove, restart)
//!       └─> SceneMutationQueue
//! ```
//!
//! ## Cross-Platform Considerations
//!
//! Native builds add keyboard shortcuts and an on-screen status line.
//! WASM builds are controlled through JSON-RPC and render status in the
//! frontend.

/// Touch and mouse gesture recognition.
pub mod gestures;

/// Gesture coordination, focus square updates and object placement.
///
/// Registers the interaction tick as `ArInteractionPlugin`.
pub mod object_manager;

/// Commands from and notifications to the presentation layer.
pub mod presentation;
