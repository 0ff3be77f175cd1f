pub mod animable;
pub mod camera;
mod dirty;
pub mod drawable;
pub mod feature;
pub mod group;
pub mod object;
pub mod scene;

// Re-export main types for convenience
pub use animable::{Animable, AnimableGroup, Animation, AnimationState};
pub use camera::{AspectRatioPolicy, Camera};
pub use drawable::{Drawable, DrawableGroup};
pub use feature::{CachedTransformations, Feature, FeatureHandle, FeatureId, FeatureSlot};
pub use group::FeatureGroup;
pub use object::{Object, ObjectId, ObjectMut, TransformationMut};
pub use scene::Scene;
