use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::scene_graph::feature::FeatureId;
use crate::scene_graph::scene::Scene;
use crate::transformation::Transformation;

/// Non-owning, ordered collection of features of one kind, possibly spread
/// over many objects.
///
/// Membership never keeps a feature alive. A feature that is destroyed
/// (through its holder, `Scene::detach`, or its external owner) stops being
/// yielded by [`iter`](Self::iter) and is dropped from the list on the next
/// [`prune`](Self::prune).
pub struct FeatureGroup<T: Transformation, G: ?Sized> {
    entries: Vec<(FeatureId<T>, Weak<RefCell<G>>)>,
}

impl<T: Transformation, G: ?Sized> Default for FeatureGroup<T, G> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<T: Transformation, G: ?Sized> fmt::Debug for FeatureGroup<T, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(id, _)| id))
            .finish()
    }
}

impl<T: Transformation, G: ?Sized + 'static> FeatureGroup<T, G> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a feature unless it is already a member. Returns whether it was
    /// added.
    pub fn add_weak(&mut self, feature_id: FeatureId<T>, feature: Weak<RefCell<G>>) -> bool {
        if self.contains(feature_id) {
            return false;
        }
        self.entries.push((feature_id, feature));
        true
    }

    /// Removes a feature from the group. The feature itself is untouched.
    pub fn remove(&mut self, feature_id: FeatureId<T>) -> bool {
        let len = self.entries.len();
        self.entries.retain(|(id, _)| *id != feature_id);
        self.entries.len() != len
    }

    pub fn contains(&self, feature_id: FeatureId<T>) -> bool {
        self.entries.iter().any(|(id, _)| *id == feature_id)
    }

    /// Members whose feature still exists.
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, feature)| feature.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Members that are still registered in `scene`, in insertion order.
    pub fn iter<'a>(&'a self, scene: &'a Scene<T>) -> impl Iterator<Item = (FeatureId<T>, Rc<RefCell<G>>)> + 'a {
        self.entries
            .iter()
            .filter(move |(id, _)| scene.is_feature_alive(*id))
            .filter_map(|(id, feature)| Some((*id, feature.upgrade()?)))
    }

    /// Drops members that were destroyed or detached from `scene`.
    pub fn prune(&mut self, scene: &Scene<T>) {
        let before = self.entries.len();
        self.entries
            .retain(|(id, feature)| feature.strong_count() > 0 && scene.is_feature_alive(*id));
        if self.entries.len() != before {
            log::trace!("Pruned {} dead group members", before - self.entries.len());
        }
    }
}
