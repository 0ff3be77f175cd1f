use std::any::Any;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

use id_arena::Id;

use crate::scene_graph::object::ObjectId;
use crate::transformation::Transformation;

bitflags::bitflags! {
    /// Which cached transformations a feature wants to receive when its
    /// object is cleaned.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct CachedTransformations: u8 {
        /// Absolute transformation matrix, delivered to [`Feature::clean`].
        const ABSOLUTE = 1 << 0;
        /// Inverted absolute transformation matrix, delivered to
        /// [`Feature::clean_inverted`].
        const INVERTED = 1 << 1;
    }
}

/// Upcast helper so attached features can be recovered by concrete type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<A: Any> AsAny for A {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A capability attached to exactly one object.
///
/// The scene only decides *when* these are called:
/// - `mark_dirty` every time the holder goes from clean to dirty,
/// - `clean` / `clean_inverted` when the holder is cleaned, if the matching
///   [`CachedTransformations`] flag was requested at attach time.
///
/// The callbacks cannot reach the scene, except through shared ownership
/// the feature sets up itself. Cleaning the scene again from inside
/// `clean`/`clean_inverted` fails with
/// [`SceneError::ReentrantClean`](crate::SceneError::ReentrantClean).
pub trait Feature<T: Transformation>: AsAny {
    fn mark_dirty(&mut self) {}

    fn clean(&mut self, _absolute_transformation_matrix: &T::Matrix) {}

    fn clean_inverted(&mut self, _inverted_absolute_transformation_matrix: &T::Matrix) {}
}

pub type FeatureId<T> = Id<FeatureSlot<T>>;

pub(crate) type FeatureCell<T> = RefCell<dyn Feature<T>>;

pub(crate) enum FeatureStorage<T: Transformation> {
    /// Owned by the holder object; dropped when it is destroyed.
    Owned(Rc<FeatureCell<T>>),
    /// Owned by the caller; the scene only keeps a registration.
    Shared(Weak<FeatureCell<T>>),
}

/// Registration record of one feature inside a [`Scene`](crate::Scene).
pub struct FeatureSlot<T: Transformation> {
    pub(crate) holder: ObjectId<T>,
    pub(crate) cached: CachedTransformations,
    pub(crate) storage: Option<FeatureStorage<T>>,
}

impl<T: Transformation> FeatureSlot<T> {
    pub(crate) fn upgrade(&self) -> Option<Rc<FeatureCell<T>>> {
        match self.storage.as_ref()? {
            FeatureStorage::Owned(cell) => Some(cell.clone()),
            FeatureStorage::Shared(cell) => cell.upgrade(),
        }
    }

    pub(crate) fn is_alive(&self) -> bool {
        match &self.storage {
            Some(FeatureStorage::Owned(_)) => true,
            Some(FeatureStorage::Shared(cell)) => cell.strong_count() > 0,
            None => false,
        }
    }

    pub(crate) fn is_owned(&self) -> bool {
        matches!(self.storage, Some(FeatureStorage::Owned(_)))
    }

    pub fn holder(&self) -> ObjectId<T> {
        self.holder
    }

    pub fn cached_transformations(&self) -> CachedTransformations {
        self.cached
    }
}

impl<T: Transformation> fmt::Debug for FeatureSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureSlot")
            .field("holder", &self.holder)
            .field("cached", &self.cached)
            .field("alive", &self.is_alive())
            .field("owned", &self.is_owned())
            .finish()
    }
}

/// Typed, non-owning handle to an attached feature.
///
/// The handle never keeps the feature alive: once the feature is destroyed
/// (its holder died, it was detached, or its external owner dropped it),
/// every accessor returns `None`.
pub struct FeatureHandle<T: Transformation, F: ?Sized> {
    pub(crate) id: FeatureId<T>,
    pub(crate) cell: Weak<RefCell<F>>,
}

impl<T: Transformation, F: ?Sized> FeatureHandle<T, F> {
    pub fn id(&self) -> FeatureId<T> {
        self.id
    }

    pub fn is_alive(&self) -> bool {
        self.cell.strong_count() > 0
    }

    pub fn upgrade(&self) -> Option<Rc<RefCell<F>>> {
        self.cell.upgrade()
    }

    pub fn with<R>(&self, f: impl FnOnce(&F) -> R) -> Option<R> {
        let cell = self.cell.upgrade()?;
        let feature = cell.borrow();
        Some(f(&feature))
    }

    pub fn with_mut<R>(&self, f: impl FnOnce(&mut F) -> R) -> Option<R> {
        let cell = self.cell.upgrade()?;
        let mut feature = cell.borrow_mut();
        Some(f(&mut feature))
    }
}

impl<T: Transformation, F: ?Sized> Clone for FeatureHandle<T, F> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            cell: self.cell.clone(),
        }
    }
}

impl<T: Transformation, F: ?Sized> fmt::Debug for FeatureHandle<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureHandle")
            .field("id", &self.id)
            .field("alive", &self.is_alive())
            .finish()
    }
}

/// Borrows an attached feature as its concrete type.
pub(crate) fn downcast_ref<T: Transformation, F: Feature<T>>(cell: &FeatureCell<T>) -> Option<Ref<'_, F>> {
    Ref::filter_map(cell.borrow(), |feature| feature.as_any().downcast_ref::<F>()).ok()
}

pub(crate) fn downcast_mut<T: Transformation, F: Feature<T>>(cell: &FeatureCell<T>) -> Option<RefMut<'_, F>> {
    RefMut::filter_map(cell.borrow_mut(), |feature| feature.as_any_mut().downcast_mut::<F>()).ok()
}
