use std::cell::Cell;
use std::collections::HashMap;

use itertools::Itertools;

use crate::error::{Result, SceneError};
use crate::scene_graph::feature::CachedTransformations;
use crate::scene_graph::object::ObjectId;
use crate::scene_graph::scene::Scene;
use crate::transformation::Transformation;

/// Marks a clean pass as running for as long as it is alive.
struct CleanGuard<'a>(&'a Cell<bool>);

impl<'a> CleanGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Result<Self> {
        if flag.replace(true) {
            return Err(SceneError::ReentrantClean);
        }
        Ok(Self(flag))
    }
}

impl Drop for CleanGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl<T: Transformation> Scene<T> {
    /// Marks the object and its whole subtree dirty, notifying every
    /// attached feature of each object that was clean until now.
    ///
    /// Objects that are already dirty are skipped together with their
    /// subtree, since a dirty object never has clean descendants. The root is
    /// never dirty.
    pub fn set_dirty(&mut self, object_id: ObjectId<T>) -> Result<()> {
        self.live_object(object_id)?;
        self.mark_dirty(object_id);
        Ok(())
    }

    pub(crate) fn mark_dirty(&mut self, object_id: ObjectId<T>) {
        let mut stack = vec![object_id];
        while let Some(id) = stack.pop() {
            let object = &self.objects[id];
            if id == self.root || object.dirty.get() {
                continue;
            }
            object.dirty.set(true);

            let cells = object
                .feature_ids
                .iter()
                .filter_map(|&feature_id| self.features[feature_id].upgrade())
                .collect_vec();
            for cell in cells {
                cell.borrow_mut().mark_dirty();
            }
            self.prune_features(id);

            stack.extend(self.objects[id].child_ids.iter().rev().copied());
        }
    }

    /// Brings the object's cached absolute transformation up to date.
    ///
    /// Dirty ancestors are cleaned first, top-down. Features that asked for
    /// [`CachedTransformations::ABSOLUTE`] or
    /// [`CachedTransformations::INVERTED`] receive the new matrices. Children
    /// are left dirty. Calling this on a clean object does nothing.
    pub fn set_clean(&self, object_id: ObjectId<T>) -> Result<()> {
        let object = self.live_object(object_id)?;
        let _guard = CleanGuard::enter(&self.cleaning)?;
        if object.dirty.get() {
            self.clean_object(object_id);
        }
        Ok(())
    }

    /// Cleans several objects at once. Each object is recomputed at most
    /// once, however many of the given objects share it as an ancestor.
    pub fn set_clean_all(&self, object_ids: impl IntoIterator<Item = ObjectId<T>>) -> Result<()> {
        let _guard = CleanGuard::enter(&self.cleaning)?;
        let mut dirty = Vec::new();
        for id in object_ids.into_iter().unique() {
            if self.live_object(id)?.dirty.get() {
                dirty.push(id);
            }
        }
        if dirty.is_empty() {
            return Ok(());
        }

        log::trace!("Cleaning {} dirty objects", dirty.len());
        for id in dirty {
            self.clean_object(id);
        }
        Ok(())
    }

    /// Cleans the object and its dirty ancestors. An object cleaned earlier
    /// in the same batch, as the ancestor of another one, is skipped.
    fn clean_object(&self, object_id: ObjectId<T>) {
        if !self.objects[object_id].dirty.get() {
            return;
        }

        let mut chain = vec![object_id];
        let mut parent_absolute = None;
        let mut current = self.objects[object_id].parent_id;
        while let Some(id) = current {
            let object = &self.objects[id];
            if !object.dirty.get() {
                parent_absolute = Some(object.absolute.get());
                break;
            }
            chain.push(id);
            current = object.parent_id;
        }

        for &id in chain.iter().rev() {
            let object = &self.objects[id];
            let local = object.transformation.transformation();
            let absolute = match parent_absolute {
                Some(parent) => T::compose(&parent, &local),
                None => local,
            };

            object.absolute.set(absolute);
            self.notify_clean(id, &absolute);
            object.dirty.set(false);
            parent_absolute = Some(absolute);
        }
    }

    fn notify_clean(&self, object_id: ObjectId<T>, absolute: &T::DataType) {
        let mut matrix = None;
        let mut inverted = None;

        for &feature_id in &self.objects[object_id].feature_ids {
            let slot = &self.features[feature_id];
            if slot.cached.is_empty() {
                continue;
            }
            let Some(cell) = slot.upgrade() else {
                continue;
            };

            let mut feature = cell.borrow_mut();
            if slot.cached.contains(CachedTransformations::ABSOLUTE) {
                let matrix = matrix.get_or_insert_with(|| T::to_matrix(absolute));
                feature.clean(matrix);
            }
            if slot.cached.contains(CachedTransformations::INVERTED) {
                let inverted = inverted.get_or_insert_with(|| T::to_matrix(&T::inverted(absolute)));
                feature.clean_inverted(inverted);
            }
        }
    }

    /// Absolute transformation computed from the local transformations of
    /// the object and all its ancestors. Caches are neither used nor updated.
    pub fn absolute_transformation(&self, object_id: ObjectId<T>) -> Result<T::DataType> {
        let object = self.live_object(object_id)?;
        Ok(self
            .ancestors(object_id)
            .fold(object.transformation.transformation(), |absolute, id| {
                T::compose(&self.objects[id].transformation.transformation(), &absolute)
            }))
    }

    pub fn absolute_transformation_matrix(&self, object_id: ObjectId<T>) -> Result<T::Matrix> {
        Ok(T::to_matrix(&self.absolute_transformation(object_id)?))
    }

    /// Absolute transformations of many objects, relative to `initial`.
    ///
    /// Shared ancestors are composed only once. Caches are neither used nor
    /// updated, so this works on dirty objects and from inside callbacks.
    pub fn transformations(
        &self,
        object_ids: &[ObjectId<T>],
        initial: T::DataType,
    ) -> Result<Vec<T::DataType>> {
        for &id in object_ids {
            self.live_object(id)?;
        }

        let mut computed: HashMap<ObjectId<T>, T::DataType> = HashMap::new();
        let mut chain = Vec::new();

        Ok(object_ids
            .iter()
            .map(|&object_id| {
                chain.clear();
                let mut base = initial;
                let mut current = Some(object_id);
                while let Some(id) = current {
                    if let Some(absolute) = computed.get(&id) {
                        base = *absolute;
                        break;
                    }
                    chain.push(id);
                    current = self.objects[id].parent_id;
                }

                for &id in chain.iter().rev() {
                    base = T::compose(&base, &self.objects[id].transformation.transformation());
                    computed.insert(id, base);
                }
                base
            })
            .collect())
    }

    /// Matrix form of [`transformations`](Self::transformations).
    pub fn transformation_matrices(
        &self,
        object_ids: &[ObjectId<T>],
        initial: T::Matrix,
    ) -> Result<Vec<T::Matrix>> {
        Ok(self
            .transformations(object_ids, T::identity())?
            .iter()
            .map(|absolute| initial * T::to_matrix(absolute))
            .collect())
    }
}
