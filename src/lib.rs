//! Hierarchical scene graph with lazily cached absolute transformations.
//!
//! A [`Scene`] owns a tree of objects, each with a local transformation of
//! one strategy type (see [`transformation`]) and any number of attached
//! [`Feature`](scene_graph::Feature)s. Mutating an object marks its subtree
//! dirty; absolute transformations are recomputed only when an object is
//! cleaned, and features are told about both events.

pub mod config;
pub mod error;
pub mod math;
pub mod scene_graph;
pub mod transformation;

// Re-export main types for convenience
pub use config::SceneConfig;
pub use error::{Result, SceneError};
pub use scene_graph::Scene;
