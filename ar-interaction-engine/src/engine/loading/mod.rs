//! Object loading and the lifecycle of placed objects.
//!
//! Covers the emoji catalog asset, the loader collaborator that turns a
//! requested kind into a placeable node, and the lifecycle manager that keeps
//! the single in-flight load and the ordered list of placed objects.

/// Emoji catalog asset loaded from JSON, with a built-in fallback.
///
/// Gates the transition out of `AppState::Loading`.
pub mod catalog;

/// Placed-object bookkeeping and the one outstanding asynchronous load.
///
/// All scene effects are routed through the mutation queue.
pub mod lifecycle;

/// Loader trait and the catalog-backed implementation.
pub mod object_loader;

pub use catalog::{EmojiCatalog, EmojiDefinition};
pub use lifecycle::{ObjectLifecycle, ObjectLoaded, PlacementError, poll_pending_load};
pub use object_loader::{CatalogLoader, LoadError, LoadedNode, Loader, ObjectLoader};
