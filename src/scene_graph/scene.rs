use std::cell::{Cell, RefCell};
use std::rc::Rc;

use id_arena::Arena;

use crate::config::SceneConfig;
use crate::error::{Result, SceneError};
use crate::scene_graph::feature::{
    downcast_mut, downcast_ref, CachedTransformations, Feature, FeatureCell, FeatureHandle,
    FeatureId, FeatureSlot, FeatureStorage,
};
use crate::scene_graph::object::{Object, ObjectId, ObjectMut};
use crate::transformation::Transformation;

/// Owner of a tree of objects sharing one transformation strategy.
///
/// The root object is created together with the scene. It has an identity
/// transformation, no parent, and is never dirty. Objects created without a
/// parent are detached: they live in the same arena but are not part of the
/// root's tree until parented.
///
/// Handles are never reused, so a handle to a destroyed object (or one from
/// another scene) is reported as [`SceneError::InvalidObject`] instead of
/// silently aliasing a newer object.
pub struct Scene<T: Transformation> {
    pub(crate) objects: Arena<Object<T>>,
    pub(crate) features: Arena<FeatureSlot<T>>,
    pub(crate) root: ObjectId<T>,
    pub(crate) cleaning: Cell<bool>,
    live_objects: usize,
}

impl<T: Transformation> Default for Scene<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transformation> std::fmt::Debug for Scene<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("root", &self.root)
            .field("objects", &self.live_objects)
            .field("features", &self.features.iter().filter(|(_, slot)| slot.is_alive()).count())
            .finish()
    }
}

impl<T: Transformation> Scene<T> {
    pub fn new() -> Self {
        Self::with_config(&SceneConfig::default())
    }

    pub fn with_config(config: &SceneConfig) -> Self {
        let mut objects = Arena::with_capacity(config.object_capacity);
        let mut root_object = Object::new(config.root_name.clone(), None);
        root_object.dirty.set(false);
        let root = objects.alloc(root_object);

        Self {
            objects,
            features: Arena::with_capacity(config.feature_capacity),
            root,
            cleaning: Cell::new(false),
            live_objects: 1,
        }
    }

    pub fn root(&self) -> ObjectId<T> {
        self.root
    }

    pub fn is_root(&self, object_id: ObjectId<T>) -> bool {
        object_id == self.root
    }

    /// Number of live objects, the root included.
    pub fn len(&self) -> usize {
        self.live_objects
    }

    pub fn is_empty(&self) -> bool {
        self.live_objects == 1
    }

    pub fn contains(&self, object_id: ObjectId<T>) -> bool {
        self.object(object_id).is_some()
    }

    pub fn object(&self, object_id: ObjectId<T>) -> Option<&Object<T>> {
        self.objects.get(object_id).filter(|object| object.alive)
    }

    pub(crate) fn live_object(&self, object_id: ObjectId<T>) -> Result<&Object<T>> {
        self.object(object_id).ok_or(SceneError::InvalidObject)
    }

    /// Mutable access to the object's transformation. The root's
    /// transformation is fixed to identity.
    pub fn object_mut(&mut self, object_id: ObjectId<T>) -> Result<ObjectMut<'_, T>> {
        self.live_object(object_id)?;
        if object_id == self.root {
            return Err(SceneError::UnsupportedOperation(
                "the scene root cannot be transformed",
            ));
        }

        Ok(ObjectMut {
            scene: self,
            id: object_id,
        })
    }

    pub fn object_by_name(&self, name: &str) -> Option<ObjectId<T>> {
        self.objects
            .iter()
            .find(|(_, object)| object.alive && object.name == name)
            .map(|(id, _)| id)
    }

    pub fn objects(&self) -> impl Iterator<Item = (ObjectId<T>, &Object<T>)> + '_ {
        self.objects.iter().filter(|(_, object)| object.alive)
    }

    /// Creates an object with an identity transformation. It starts dirty,
    /// whatever the state of its parent.
    pub fn add_object(&mut self, parent: Option<ObjectId<T>>) -> Result<ObjectId<T>> {
        self.add_named_object(String::new(), parent)
    }

    pub fn add_named_object(
        &mut self,
        name: impl Into<String>,
        parent: Option<ObjectId<T>>,
    ) -> Result<ObjectId<T>> {
        if let Some(parent_id) = parent {
            self.live_object(parent_id)?;
        }

        let object_id = self.objects.alloc(Object::new(name.into(), parent));
        if let Some(parent_id) = parent {
            self.objects[parent_id].child_ids.push(object_id);
        }
        self.live_objects += 1;

        log::trace!("Created object {:?} under {:?}", object_id, parent);
        Ok(object_id)
    }

    /// Creates an object and attaches an owned feature to it in one step.
    pub fn add_object_with<F: Feature<T>>(
        &mut self,
        parent: Option<ObjectId<T>>,
        feature: F,
        cached: CachedTransformations,
    ) -> Result<(ObjectId<T>, FeatureHandle<T, F>)> {
        let object_id = self.add_object(parent)?;
        let handle = self.attach(object_id, feature, cached)?;
        Ok((object_id, handle))
    }

    pub fn parent(&self, object_id: ObjectId<T>) -> Result<Option<ObjectId<T>>> {
        Ok(self.live_object(object_id)?.parent_id)
    }

    pub fn children(&self, object_id: ObjectId<T>) -> Result<&[ObjectId<T>]> {
        Ok(&self.live_object(object_id)?.child_ids)
    }

    pub fn is_dirty(&self, object_id: ObjectId<T>) -> Result<bool> {
        Ok(self.live_object(object_id)?.dirty.get())
    }

    /// Ancestors from the direct parent up to the top of the tree.
    pub fn ancestors(&self, object_id: ObjectId<T>) -> impl Iterator<Item = ObjectId<T>> + '_ {
        let mut current = self.object(object_id).and_then(|object| object.parent_id);
        std::iter::from_fn(move || {
            let id = current?;
            current = self.objects[id].parent_id;
            Some(id)
        })
    }

    /// Descendants in depth-first pre-order, not including the object itself.
    pub fn descendants(&self, object_id: ObjectId<T>) -> impl Iterator<Item = ObjectId<T>> + '_ {
        let mut stack: Vec<ObjectId<T>> = self
            .object(object_id)
            .map(|object| object.child_ids.iter().rev().copied().collect())
            .unwrap_or_default();
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            stack.extend(self.objects[id].child_ids.iter().rev().copied());
            Some(id)
        })
    }

    /// Whether the object is part of the root's tree.
    pub fn is_in_scene(&self, object_id: ObjectId<T>) -> bool {
        object_id == self.root || (self.contains(object_id) && self.ancestors(object_id).any(|id| id == self.root))
    }

    /// Moves an object under a new parent, or detaches it with `None`.
    ///
    /// Fails with [`SceneError::InvalidHierarchy`] when the object is the
    /// root, when the new parent is the object itself or one of its
    /// descendants, or when the new parent does not belong to this scene.
    /// Nothing is modified on failure.
    pub fn set_parent(&mut self, object_id: ObjectId<T>, parent: Option<ObjectId<T>>) -> Result<()> {
        let object = self.live_object(object_id)?;
        if object_id == self.root {
            return Err(SceneError::InvalidHierarchy("the scene root cannot have a parent"));
        }
        if object.parent_id == parent {
            return Ok(());
        }

        if let Some(parent_id) = parent {
            if self.object(parent_id).is_none() {
                return Err(SceneError::InvalidHierarchy(
                    "new parent is not an object of this scene",
                ));
            }
            if parent_id == object_id || self.ancestors(parent_id).any(|id| id == object_id) {
                return Err(SceneError::InvalidHierarchy(
                    "an object cannot be parented to itself or one of its descendants",
                ));
            }
        }

        self.unlink_from_parent(object_id);
        self.objects[object_id].parent_id = parent;
        if let Some(parent_id) = parent {
            self.objects[parent_id].child_ids.push(object_id);
        }

        log::debug!("Reparented object {:?} under {:?}", object_id, parent);
        self.mark_dirty(object_id);
        Ok(())
    }

    fn unlink_from_parent(&mut self, object_id: ObjectId<T>) {
        if let Some(old_parent_id) = self.objects[object_id].parent_id.take() {
            self.objects[old_parent_id]
                .child_ids
                .retain(|&id| id != object_id);
        }
    }

    /// Destroys an object, all its descendants and every feature attached to
    /// any of them, then removes it from its parent's children.
    ///
    /// Descendants are destroyed depth-first, each one after its own
    /// children, and an object's features go before the object itself.
    pub fn destroy(&mut self, object_id: ObjectId<T>) -> Result<()> {
        self.live_object(object_id)?;
        if object_id == self.root {
            return Err(SceneError::InvalidHierarchy("the scene root cannot be destroyed"));
        }

        let mut post_order = Vec::new();
        let mut stack = vec![(object_id, false)];
        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                post_order.push(id);
            } else {
                stack.push((id, true));
                stack.extend(self.objects[id].child_ids.iter().rev().map(|&child| (child, false)));
            }
        }

        for &id in &post_order {
            let feature_ids = std::mem::take(&mut self.objects[id].feature_ids);
            for feature_id in feature_ids {
                self.features[feature_id].storage = None;
            }

            let object = &mut self.objects[id];
            object.child_ids.clear();
            object.alive = false;
            if id != object_id {
                object.parent_id = None;
            }
        }
        self.unlink_from_parent(object_id);
        self.live_objects -= post_order.len();

        log::debug!(
            "Destroyed object {:?} together with {} descendants",
            object_id,
            post_order.len() - 1
        );
        Ok(())
    }

    // -- Features --

    /// Attaches a feature owned by the object. It is dropped when the object
    /// is destroyed or the feature is detached.
    pub fn attach<F: Feature<T>>(
        &mut self,
        object_id: ObjectId<T>,
        feature: F,
        cached: CachedTransformations,
    ) -> Result<FeatureHandle<T, F>> {
        self.live_object(object_id)?;

        let cell = Rc::new(RefCell::new(feature));
        let weak = Rc::downgrade(&cell);
        let cell: Rc<FeatureCell<T>> = cell;
        let id = self.register(object_id, FeatureStorage::Owned(cell), cached);

        Ok(FeatureHandle { id, cell: weak })
    }

    /// Registers a feature owned by the caller. The scene keeps only a weak
    /// reference: dropping the last `Rc` deregisters the feature.
    pub fn attach_shared<F: Feature<T>>(
        &mut self,
        object_id: ObjectId<T>,
        feature: &Rc<RefCell<F>>,
        cached: CachedTransformations,
    ) -> Result<FeatureHandle<T, F>> {
        self.live_object(object_id)?;

        let weak = Rc::downgrade(feature);
        let cell: Rc<FeatureCell<T>> = feature.clone();
        let id = self.register(object_id, FeatureStorage::Shared(Rc::downgrade(&cell)), cached);

        Ok(FeatureHandle { id, cell: weak })
    }

    fn register(
        &mut self,
        holder: ObjectId<T>,
        storage: FeatureStorage<T>,
        cached: CachedTransformations,
    ) -> FeatureId<T> {
        let id = self.features.alloc(FeatureSlot {
            holder,
            cached,
            storage: Some(storage),
        });
        self.objects[holder].feature_ids.push(id);
        log::trace!("Attached feature {:?} to object {:?}", id, holder);
        id
    }

    /// Removes a feature from its holder. Owned features are dropped here;
    /// shared ones stay alive as long as their owner keeps them.
    pub fn detach(&mut self, feature_id: FeatureId<T>) -> Result<()> {
        let holder = self.live_slot(feature_id)?.holder;
        self.features[feature_id].storage = None;
        self.objects[holder].feature_ids.retain(|&id| id != feature_id);
        Ok(())
    }

    pub(crate) fn live_slot(&self, feature_id: FeatureId<T>) -> Result<&FeatureSlot<T>> {
        self.features
            .get(feature_id)
            .filter(|slot| slot.is_alive())
            .ok_or(SceneError::InvalidFeature)
    }

    pub fn is_feature_alive(&self, feature_id: FeatureId<T>) -> bool {
        self.live_slot(feature_id).is_ok()
    }

    /// Live features of an object, in attach order.
    pub fn features(&self, object_id: ObjectId<T>) -> Result<Vec<FeatureId<T>>> {
        Ok(self
            .live_object(object_id)?
            .feature_ids
            .iter()
            .copied()
            .filter(|&id| self.is_feature_alive(id))
            .collect())
    }

    pub fn holder(&self, feature_id: FeatureId<T>) -> Result<ObjectId<T>> {
        Ok(self.live_slot(feature_id)?.holder)
    }

    /// Moving a feature to another object is not supported; the current
    /// holder is accepted as a no-op.
    pub fn set_holder(&mut self, feature_id: FeatureId<T>, object_id: ObjectId<T>) -> Result<()> {
        if self.live_slot(feature_id)?.holder == object_id {
            Ok(())
        } else {
            Err(SceneError::UnsupportedOperation(
                "features cannot be moved to another object",
            ))
        }
    }

    pub fn cached_transformations(&self, feature_id: FeatureId<T>) -> Result<CachedTransformations> {
        Ok(self.live_slot(feature_id)?.cached)
    }

    /// Changes which cached transformations the feature receives from the
    /// next clean on.
    pub fn set_cached_transformations(
        &mut self,
        feature_id: FeatureId<T>,
        cached: CachedTransformations,
    ) -> Result<()> {
        self.live_slot(feature_id)?;
        self.features[feature_id].cached = cached;
        Ok(())
    }

    /// Runs `f` with the feature borrowed as its concrete type. Returns
    /// `None` if the feature is gone or is not an `F`.
    ///
    /// # Panics
    ///
    /// Panics if the feature is already mutably borrowed.
    pub fn with_feature<F: Feature<T>, R>(&self, feature_id: FeatureId<T>, f: impl FnOnce(&F) -> R) -> Option<R> {
        let cell = self.live_slot(feature_id).ok()?.upgrade()?;
        let feature = downcast_ref::<T, F>(&cell)?;
        Some(f(&feature))
    }

    /// Mutable counterpart of [`with_feature`](Self::with_feature).
    pub fn with_feature_mut<F: Feature<T>, R>(
        &self,
        feature_id: FeatureId<T>,
        f: impl FnOnce(&mut F) -> R,
    ) -> Option<R> {
        let cell = self.live_slot(feature_id).ok()?.upgrade()?;
        let mut feature = downcast_mut::<T, F>(&cell)?;
        Some(f(&mut feature))
    }

    /// Drops registrations of shared features whose owner released them.
    pub(crate) fn prune_features(&mut self, object_id: ObjectId<T>) {
        let features = &mut self.features;
        self.objects[object_id].feature_ids.retain(|&id| {
            let alive = features[id].is_alive();
            if !alive {
                features[id].storage = None;
            }
            alive
        });
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;

    use super::*;
    use crate::transformation::{AbstractTranslation, RigidMatrixTransformation2D, TranslationTransformation2D};

    type Scene2D = Scene<TranslationTransformation2D>;

    #[derive(Debug, Default, PartialEq)]
    struct Tag(u32);

    impl Feature<TranslationTransformation2D> for Tag {}

    struct DropFlag(Rc<RefCell<bool>>);

    impl Feature<TranslationTransformation2D> for DropFlag {}

    impl Drop for DropFlag {
        fn drop(&mut self) {
            *self.0.borrow_mut() = true;
        }
    }

    #[test]
    fn children_keep_insertion_order() {
        let mut scene = Scene2D::new();
        let root = scene.root();
        let a = scene.add_object(Some(root)).unwrap();
        let b = scene.add_object(Some(root)).unwrap();
        let c = scene.add_object(Some(a)).unwrap();

        assert_eq!(scene.children(root).unwrap(), &[a, b]);
        assert_eq!(scene.parent(c).unwrap(), Some(a));
        assert_eq!(scene.descendants(root).collect::<Vec<_>>(), vec![a, c, b]);
        assert_eq!(scene.ancestors(c).collect::<Vec<_>>(), vec![a, root]);
        assert_eq!(scene.len(), 4);
        assert!(scene.is_in_scene(c));
    }

    #[test]
    fn reparenting_moves_between_child_lists() {
        let mut scene = Scene2D::new();
        let root = scene.root();
        let a = scene.add_object(Some(root)).unwrap();
        let b = scene.add_object(Some(root)).unwrap();
        scene.set_clean_all([a, b]).unwrap();

        scene.set_parent(b, Some(a)).unwrap();
        assert_eq!(scene.children(root).unwrap(), &[a]);
        assert_eq!(scene.children(a).unwrap(), &[b]);
        assert!(scene.is_dirty(b).unwrap());
        assert!(!scene.is_dirty(a).unwrap());

        scene.set_parent(b, None).unwrap();
        assert!(scene.children(a).unwrap().is_empty());
        assert!(!scene.is_in_scene(b));
    }

    #[test]
    fn same_parent_is_a_no_op() {
        let mut scene = Scene2D::new();
        let root = scene.root();
        let a = scene.add_object(Some(root)).unwrap();
        scene.set_clean(a).unwrap();

        scene.set_parent(a, Some(root)).unwrap();
        assert_eq!(scene.children(root).unwrap(), &[a]);
        assert!(!scene.is_dirty(a).unwrap());
    }

    #[test]
    fn cycles_are_rejected_without_changes() {
        let mut scene = Scene2D::new();
        let root = scene.root();
        let a = scene.add_object(Some(root)).unwrap();
        let b = scene.add_object(Some(a)).unwrap();
        let c = scene.add_object(Some(b)).unwrap();

        assert!(matches!(scene.set_parent(a, Some(c)), Err(SceneError::InvalidHierarchy(_))));
        assert!(matches!(scene.set_parent(a, Some(a)), Err(SceneError::InvalidHierarchy(_))));
        assert_eq!(scene.parent(a).unwrap(), Some(root));
        assert_eq!(scene.children(a).unwrap(), &[b]);
        assert_eq!(scene.children(b).unwrap(), &[c]);
        assert!(scene.children(c).unwrap().is_empty());
    }

    #[test]
    fn root_is_protected() {
        let mut scene = Scene2D::new();
        let root = scene.root();
        let a = scene.add_object(Some(root)).unwrap();

        assert!(matches!(scene.set_parent(root, Some(a)), Err(SceneError::InvalidHierarchy(_))));
        assert!(matches!(scene.destroy(root), Err(SceneError::InvalidHierarchy(_))));
        assert!(matches!(scene.object_mut(root), Err(SceneError::UnsupportedOperation(_))));
        assert_eq!(scene.object_by_name("Scene"), Some(root));
    }

    #[test]
    fn handles_from_other_scenes_are_rejected() {
        let mut scene = Scene2D::new();
        let mut other = Scene2D::new();
        let a = scene.add_object(Some(scene.root())).unwrap();
        let foreign = other.add_object(Some(other.root())).unwrap();

        assert!(matches!(scene.set_parent(a, Some(foreign)), Err(SceneError::InvalidHierarchy(_))));
        assert_eq!(scene.set_parent(foreign, Some(a)), Err(SceneError::InvalidObject));
        assert_eq!(scene.add_object(Some(foreign)), Err(SceneError::InvalidObject));
        assert!(!scene.contains(foreign));
    }

    #[test]
    fn destroy_removes_subtree_and_features() {
        let mut scene = Scene2D::new();
        let root = scene.root();
        let a = scene.add_object(Some(root)).unwrap();
        let b = scene.add_object(Some(a)).unwrap();
        let c = scene.add_object(Some(a)).unwrap();
        let d = scene.add_object(Some(b)).unwrap();
        let dropped = Rc::new(RefCell::new(false));
        let f = scene
            .attach(a, DropFlag(dropped.clone()), CachedTransformations::empty())
            .unwrap();
        let g = scene.attach(d, Tag(4), CachedTransformations::empty()).unwrap();

        scene.destroy(a).unwrap();

        for id in [a, b, c, d] {
            assert!(!scene.contains(id));
            assert_eq!(scene.children(id), Err(SceneError::InvalidObject));
        }
        assert!(scene.children(root).unwrap().is_empty());
        assert!(*dropped.borrow());
        assert!(!f.is_alive());
        assert!(!g.is_alive());
        assert_eq!(scene.holder(g.id()), Err(SceneError::InvalidFeature));
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.destroy(a), Err(SceneError::InvalidObject));
    }

    #[test]
    fn shared_features_follow_their_owner() {
        let mut scene = Scene2D::new();
        let a = scene.add_object(Some(scene.root())).unwrap();
        let shared = Rc::new(RefCell::new(Tag(1)));
        let handle = scene
            .attach_shared(a, &shared, CachedTransformations::empty())
            .unwrap();
        assert_eq!(scene.features(a).unwrap(), vec![handle.id()]);

        drop(shared);
        assert!(!handle.is_alive());
        assert!(scene.features(a).unwrap().is_empty());
        assert!(!scene.is_feature_alive(handle.id()));
    }

    #[test]
    fn destroying_holder_leaves_shared_feature_alive() {
        let mut scene = Scene2D::new();
        let a = scene.add_object(Some(scene.root())).unwrap();
        let shared = Rc::new(RefCell::new(Tag(7)));
        let handle = scene
            .attach_shared(a, &shared, CachedTransformations::empty())
            .unwrap();

        scene.destroy(a).unwrap();
        assert!(handle.is_alive());
        assert!(!scene.is_feature_alive(handle.id()));
        assert_eq!(shared.borrow().0, 7);
    }

    #[test]
    fn features_are_accessible_by_type() {
        let mut scene = Scene2D::new();
        let a = scene.add_object(Some(scene.root())).unwrap();
        let tag = scene.attach(a, Tag(3), CachedTransformations::ABSOLUTE).unwrap();

        assert_eq!(scene.with_feature(tag.id(), |t: &Tag| t.0), Some(3));
        assert_eq!(scene.with_feature(tag.id(), |_: &DropFlag| ()), None);
        scene.with_feature_mut(tag.id(), |t: &mut Tag| t.0 = 5);
        assert_eq!(tag.with(|t| t.0), Some(5));

        assert_eq!(scene.holder(tag.id()), Ok(a));
        assert_eq!(scene.cached_transformations(tag.id()), Ok(CachedTransformations::ABSOLUTE));
        scene
            .set_cached_transformations(tag.id(), CachedTransformations::INVERTED)
            .unwrap();
        assert_eq!(scene.cached_transformations(tag.id()), Ok(CachedTransformations::INVERTED));
    }

    #[test]
    fn features_cannot_change_holder() {
        let mut scene = Scene2D::new();
        let root = scene.root();
        let a = scene.add_object(Some(root)).unwrap();
        let b = scene.add_object(Some(root)).unwrap();
        let tag = scene.attach(a, Tag(0), CachedTransformations::empty()).unwrap();

        assert_eq!(scene.set_holder(tag.id(), a), Ok(()));
        assert!(matches!(scene.set_holder(tag.id(), b), Err(SceneError::UnsupportedOperation(_))));
        assert_eq!(scene.holder(tag.id()), Ok(a));
    }

    #[test]
    fn detach_drops_owned_feature() {
        let mut scene = Scene2D::new();
        let a = scene.add_object(Some(scene.root())).unwrap();
        let dropped = Rc::new(RefCell::new(false));
        let flag = scene
            .attach(a, DropFlag(dropped.clone()), CachedTransformations::empty())
            .unwrap();

        scene.detach(flag.id()).unwrap();
        assert!(*dropped.borrow());
        assert!(scene.features(a).unwrap().is_empty());
        assert_eq!(scene.detach(flag.id()), Err(SceneError::InvalidFeature));
    }

    #[test]
    fn rigid_strategy_rejects_non_rigid_input() {
        let mut scene = Scene::<RigidMatrixTransformation2D>::new();
        let a = scene.add_object(Some(scene.root())).unwrap();
        scene.set_clean(a).unwrap();

        let result = scene
            .object_mut(a)
            .unwrap()
            .set_transformation(glam::Mat3::from_scale(Vec2::splat(2.0)))
            .map(|_| ());
        assert!(matches!(result, Err(SceneError::InvalidTransformation(_))));
        assert!(!scene.is_dirty(a).unwrap());
        assert_eq!(scene.object(a).unwrap().transformation(), glam::Mat3::IDENTITY);
    }

    #[test]
    fn object_mut_marks_dirty_and_chains() {
        let mut scene = Scene2D::new();
        let a = scene.add_named_object("a", Some(scene.root())).unwrap();
        scene.set_clean(a).unwrap();

        scene
            .object_mut(a)
            .unwrap()
            .translate(Vec2::X)
            .translate_local(Vec2::Y)
            .set_name("moved");
        assert!(scene.is_dirty(a).unwrap());
        assert_eq!(scene.object_by_name("moved"), Some(a));
        assert_eq!(scene.absolute_transformation(a), Ok(Vec2::new(1.0, 1.0)));
    }
}
