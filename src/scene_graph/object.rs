use std::cell::Cell;

use id_arena::Id;

use crate::error::Result;
use crate::scene_graph::feature::FeatureId;
use crate::scene_graph::scene::Scene;
use crate::transformation::{
    AbstractTranslation, AbstractTranslationRotation, AbstractTranslationRotationScaling,
    Transformation, TransformationType,
};

pub type ObjectId<T> = Id<Object<T>>;

/// A node of the scene graph.
///
/// Objects live in the [`Scene`] arena and refer to each other by
/// [`ObjectId`]. The local transformation is only mutable through
/// [`Scene::object_mut`], which keeps the dirty flags consistent.
#[derive(Debug)]
pub struct Object<T: Transformation> {
    pub name: String,
    pub(crate) transformation: T,
    pub(crate) parent_id: Option<ObjectId<T>>,
    pub(crate) child_ids: Vec<ObjectId<T>>,
    pub(crate) feature_ids: Vec<FeatureId<T>>,
    pub(crate) dirty: Cell<bool>,
    pub(crate) absolute: Cell<T::DataType>,
    pub(crate) alive: bool,
}

impl<T: Transformation> Object<T> {
    pub(crate) fn new(name: String, parent_id: Option<ObjectId<T>>) -> Self {
        Self {
            name,
            transformation: T::default(),
            parent_id,
            child_ids: Vec::new(),
            feature_ids: Vec::new(),
            dirty: Cell::new(true),
            absolute: Cell::new(T::identity()),
            alive: true,
        }
    }

    pub fn parent_id(&self) -> Option<ObjectId<T>> {
        self.parent_id
    }

    /// Children in insertion order.
    pub fn child_ids(&self) -> &[ObjectId<T>] {
        &self.child_ids
    }

    /// Attached features in attach order. May still list externally owned
    /// features whose owner dropped them since the last mutation; use
    /// [`Scene::features`] for a filtered view.
    pub fn feature_ids(&self) -> &[FeatureId<T>] {
        &self.feature_ids
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    pub fn transformation(&self) -> T::DataType {
        self.transformation.transformation()
    }

    pub fn transformation_matrix(&self) -> T::Matrix {
        self.transformation.transformation_matrix()
    }

    /// Absolute transformation stored by the last clean. Only meaningful
    /// while the object is clean.
    pub fn cached_absolute_transformation(&self) -> T::DataType {
        self.absolute.get()
    }

    pub fn parent<'a>(&self, scene: &'a Scene<T>) -> Option<&'a Object<T>> {
        self.parent_id.and_then(|id| scene.object(id))
    }

    pub fn children<'a, 'b>(&'a self, scene: &'b Scene<T>) -> impl Iterator<Item = &'b Object<T>> + 'b
    where
        'a: 'b,
    {
        self.child_ids.iter().filter_map(move |id| scene.object(*id))
    }
}

/// Mutable access to one object's transformation.
///
/// Every mutation is applied immediately and marks the object (and its
/// subtree) dirty before returning, so features see the invalidation right
/// away. Methods return `&mut Self` for chaining.
pub struct ObjectMut<'a, T: Transformation> {
    pub(crate) scene: &'a mut Scene<T>,
    pub(crate) id: ObjectId<T>,
}

impl<'a, T: Transformation> ObjectMut<'a, T> {
    pub fn id(&self) -> ObjectId<T> {
        self.id
    }

    pub fn object(&self) -> &Object<T> {
        &self.scene.objects[self.id]
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.scene.objects[self.id].name = name.into();
        self
    }

    pub fn set_transformation(&mut self, data: T::DataType) -> Result<&mut Self> {
        self.scene.objects[self.id].transformation.set_transformation(data)?;
        self.scene.mark_dirty(self.id);
        Ok(self)
    }

    pub fn transform(&mut self, data: T::DataType, ty: TransformationType) -> Result<&mut Self> {
        self.scene.objects[self.id].transformation.transform(data, ty)?;
        self.scene.mark_dirty(self.id);
        Ok(self)
    }

    /// Runs a strategy-specific operation (reflection, rotation
    /// normalization, ...) and marks the object dirty afterwards.
    pub fn transformation_mut<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> R {
        let result = f(&mut self.scene.objects[self.id].transformation);
        self.scene.mark_dirty(self.id);
        result
    }

    fn modify(&mut self, f: impl FnOnce(&mut T)) -> &mut Self {
        f(&mut self.scene.objects[self.id].transformation);
        self.scene.mark_dirty(self.id);
        self
    }
}

impl<T> AbstractTranslation for ObjectMut<'_, T>
where
    T: Transformation + AbstractTranslation,
{
    type Vector = <T as AbstractTranslation>::Vector;

    fn translate_with(&mut self, vector: Self::Vector, ty: TransformationType) -> &mut Self {
        self.modify(|t| {
            t.translate_with(vector, ty);
        })
    }

    fn reset_transformation(&mut self) -> &mut Self {
        self.modify(|t| {
            t.reset_transformation();
        })
    }
}

impl<T> AbstractTranslationRotation for ObjectMut<'_, T>
where
    T: Transformation + AbstractTranslationRotation,
{
    type Rotation = <T as AbstractTranslationRotation>::Rotation;

    fn rotate_with(&mut self, rotation: Self::Rotation, ty: TransformationType) -> &mut Self {
        self.modify(|t| {
            t.rotate_with(rotation, ty);
        })
    }
}

impl<T> AbstractTranslationRotationScaling for ObjectMut<'_, T>
where
    T: Transformation + AbstractTranslationRotationScaling,
{
    fn scale_with(&mut self, scale: Self::Vector, ty: TransformationType) -> &mut Self {
        self.modify(|t| {
            t.scale_with(scale, ty);
        })
    }
}

/// Mutable access to a transformation that records whether it was touched.
///
/// Handed to [`Animable::animation_step`](crate::scene_graph::Animable::animation_step);
/// the owning group marks the holder dirty afterwards if anything changed.
pub struct TransformationMut<'a, T: Transformation> {
    transformation: &'a mut T,
    touched: bool,
}

impl<'a, T: Transformation> TransformationMut<'a, T> {
    pub(crate) fn new(transformation: &'a mut T) -> Self {
        Self {
            transformation,
            touched: false,
        }
    }

    pub(crate) fn is_touched(&self) -> bool {
        self.touched
    }

    pub fn transformation(&self) -> T::DataType {
        self.transformation.transformation()
    }

    pub fn set_transformation(&mut self, data: T::DataType) -> Result<&mut Self> {
        self.transformation.set_transformation(data)?;
        self.touched = true;
        Ok(self)
    }

    pub fn transform(&mut self, data: T::DataType, ty: TransformationType) -> Result<&mut Self> {
        self.transformation.transform(data, ty)?;
        self.touched = true;
        Ok(self)
    }

    pub fn transformation_mut<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> R {
        self.touched = true;
        f(&mut *self.transformation)
    }
}

impl<T> AbstractTranslation for TransformationMut<'_, T>
where
    T: Transformation + AbstractTranslation,
{
    type Vector = <T as AbstractTranslation>::Vector;

    fn translate_with(&mut self, vector: Self::Vector, ty: TransformationType) -> &mut Self {
        self.transformation.translate_with(vector, ty);
        self.touched = true;
        self
    }

    fn reset_transformation(&mut self) -> &mut Self {
        self.transformation.reset_transformation();
        self.touched = true;
        self
    }
}

impl<T> AbstractTranslationRotation for TransformationMut<'_, T>
where
    T: Transformation + AbstractTranslationRotation,
{
    type Rotation = <T as AbstractTranslationRotation>::Rotation;

    fn rotate_with(&mut self, rotation: Self::Rotation, ty: TransformationType) -> &mut Self {
        self.transformation.rotate_with(rotation, ty);
        self.touched = true;
        self
    }
}

impl<T> AbstractTranslationRotationScaling for TransformationMut<'_, T>
where
    T: Transformation + AbstractTranslationRotationScaling,
{
    fn scale_with(&mut self, scale: Self::Vector, ty: TransformationType) -> &mut Self {
        self.transformation.scale_with(scale, ty);
        self.touched = true;
        self
    }
}
