//! Core application setup and state management.
//!
//! Handles application lifecycle, window configuration, runtime settings and
//! plugin assembly for both native and WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Creates the main app with the interaction core, the presentation bridge
/// and the platform-specific visual plugins.
pub mod app_setup;

/// Application state machine and the catalog-driven loading transition.
pub mod app_state;

/// Runtime interaction tunables with defaults from the `constants` crate.
pub mod settings;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;
