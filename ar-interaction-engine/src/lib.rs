//! Interaction core for placing and manipulating virtual content on
//! tracked real-world surfaces.
//!
//! - `engine`: tracking, hit testing, the focus square, object lifecycle and
//!   the scene mutation queue
//! - `tools`: gesture recognition, object manipulation and the presentation
//!   interface
//! - `rpc`: JSON-RPC bridge for web frontends

pub mod engine;
pub mod rpc;
pub mod tools;
