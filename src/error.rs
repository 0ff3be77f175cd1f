use thiserror::Error;

/// Errors reported by [`Scene`](crate::scene_graph::Scene) operations.
///
/// Every structural check happens before the scene is touched, so an `Err`
/// always leaves the hierarchy exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("invalid hierarchy: {0}")]
    InvalidHierarchy(&'static str),
    #[error("object does not exist in this scene")]
    InvalidObject,
    #[error("feature does not exist in this scene")]
    InvalidFeature,
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),
    #[error("transformation is not valid for this strategy: {0}")]
    InvalidTransformation(&'static str),
    #[error("set_clean called from within a clean callback")]
    ReentrantClean,
}

pub type Result<T, E = SceneError> = std::result::Result<T, E>;
