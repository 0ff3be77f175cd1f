use std::cell::RefCell;
use std::rc::Weak;

use crate::error::{Result, SceneError};
use crate::scene_graph::camera::Camera;
use crate::scene_graph::feature::{CachedTransformations, Feature, FeatureHandle};
use crate::scene_graph::group::FeatureGroup;
use crate::scene_graph::scene::Scene;
use crate::transformation::Transformation;

/// A feature that can be drawn through a [`Camera`].
pub trait Drawable<T: Transformation>: Feature<T> {
    /// `transformation_matrix` is the holder's absolute transformation
    /// relative to the camera.
    fn draw(&mut self, transformation_matrix: &T::Matrix, camera: &Camera<T>);
}

pub type DrawableGroup<T> = FeatureGroup<T, dyn Drawable<T>>;

impl<T: Transformation> FeatureGroup<T, dyn Drawable<T>> {
    pub fn add<F: Drawable<T>>(&mut self, drawable: &FeatureHandle<T, F>) -> bool {
        let weak: Weak<RefCell<dyn Drawable<T>>> = drawable.cell.clone();
        self.add_weak(drawable.id, weak)
    }
}

impl<T: Transformation> Scene<T> {
    /// Draws every live member of `group` through `camera`.
    ///
    /// The camera's holder and the holder of every drawable are cleaned
    /// first, so the camera matrix and the transformations handed to the
    /// drawables are up to date.
    ///
    /// The camera must be attached with [`CachedTransformations::INVERTED`],
    /// otherwise its camera matrix is never updated and this fails with
    /// [`SceneError::UnsupportedOperation`].
    pub fn draw(&self, camera: &FeatureHandle<T, Camera<T>>, group: &DrawableGroup<T>) -> Result<()> {
        let slot = self.live_slot(camera.id)?;
        if !slot.cached.contains(CachedTransformations::INVERTED) {
            return Err(SceneError::UnsupportedOperation(
                "camera must cache its inverted absolute transformation",
            ));
        }
        let camera_holder = slot.holder;
        let camera = camera.upgrade().ok_or(SceneError::InvalidFeature)?;

        let drawables = group
            .iter(self)
            .map(|(id, drawable)| Ok((self.holder(id)?, drawable)))
            .collect::<Result<Vec<_>>>()?;
        self.set_clean_all(
            std::iter::once(camera_holder).chain(drawables.iter().map(|(holder, _)| *holder)),
        )?;

        let camera = camera.borrow();
        let camera_matrix = camera.camera_matrix();
        log::trace!("Drawing {} features", drawables.len());
        for (holder, drawable) in &drawables {
            let absolute = T::to_matrix(&self.objects[*holder].absolute.get());
            drawable.borrow_mut().draw(&(camera_matrix * absolute), &camera);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use glam::{Mat3, Vec2};

    use super::*;
    use crate::transformation::{AbstractTranslation, MatrixTransformation2D};

    type Scene2D = Scene<MatrixTransformation2D>;

    #[derive(Default)]
    struct Recorder {
        drawn: Vec<Mat3>,
    }

    impl Feature<MatrixTransformation2D> for Recorder {}

    impl Drawable<MatrixTransformation2D> for Recorder {
        fn draw(&mut self, transformation_matrix: &Mat3, _camera: &Camera<MatrixTransformation2D>) {
            self.drawn.push(*transformation_matrix);
        }
    }

    #[test]
    fn drawables_are_drawn_relative_to_camera() {
        let mut scene = Scene2D::new();
        let root = scene.root();
        let (camera_object, camera) = scene
            .add_object_with(Some(root), Camera::new(), CachedTransformations::INVERTED)
            .unwrap();
        scene.object_mut(camera_object).unwrap().translate(Vec2::new(2.0, 0.0));

        let (object, recorder) = scene
            .add_object_with(Some(root), Recorder::default(), CachedTransformations::empty())
            .unwrap();
        scene.object_mut(object).unwrap().translate(Vec2::new(5.0, 1.0));

        let mut group = DrawableGroup::new();
        assert!(group.add(&recorder));
        assert!(!group.add(&recorder));

        scene.draw(&camera, &group).unwrap();
        recorder
            .with(|r| {
                assert_eq!(r.drawn.len(), 1);
                assert_abs_diff_eq!(r.drawn[0], Mat3::from_translation(Vec2::new(3.0, 1.0)), epsilon = 1.0e-6);
            })
            .unwrap();
        assert!(!scene.is_dirty(object).unwrap());
        assert!(!scene.is_dirty(camera_object).unwrap());
    }

    #[test]
    fn destroyed_drawables_leave_the_group() {
        let mut scene = Scene2D::new();
        let root = scene.root();
        let (_, camera) = scene
            .add_object_with(Some(root), Camera::new(), CachedTransformations::INVERTED)
            .unwrap();
        let (first, a) = scene
            .add_object_with(Some(root), Recorder::default(), CachedTransformations::empty())
            .unwrap();
        let (_, b) = scene
            .add_object_with(Some(root), Recorder::default(), CachedTransformations::empty())
            .unwrap();

        let mut group = DrawableGroup::new();
        group.add(&a);
        group.add(&b);
        scene.destroy(first).unwrap();
        assert_eq!(group.len(), 1);

        scene.draw(&camera, &group).unwrap();
        assert_eq!(b.with(|r| r.drawn.len()), Some(1));

        group.prune(&scene);
        assert!(!group.contains(a.id()));
    }

    #[test]
    fn camera_below_a_drawable_cleans_shared_ancestors_once() {
        struct Ship {
            cleaned: usize,
            drawn: Vec<Mat3>,
        }

        impl Feature<MatrixTransformation2D> for Ship {
            fn clean(&mut self, _: &Mat3) {
                self.cleaned += 1;
            }
        }

        impl Drawable<MatrixTransformation2D> for Ship {
            fn draw(&mut self, transformation_matrix: &Mat3, _camera: &Camera<MatrixTransformation2D>) {
                self.drawn.push(*transformation_matrix);
            }
        }

        let mut scene = Scene2D::new();
        let (ship_object, ship) = scene
            .add_object_with(
                Some(scene.root()),
                Ship {
                    cleaned: 0,
                    drawn: Vec::new(),
                },
                CachedTransformations::ABSOLUTE,
            )
            .unwrap();
        scene.object_mut(ship_object).unwrap().translate(Vec2::new(4.0, 0.0));
        let (camera_object, camera) = scene
            .add_object_with(Some(ship_object), Camera::new(), CachedTransformations::INVERTED)
            .unwrap();
        scene.object_mut(camera_object).unwrap().translate(Vec2::new(0.0, -1.0));

        let mut group = DrawableGroup::new();
        group.add(&ship);
        scene.draw(&camera, &group).unwrap();

        ship.with(|ship| {
            assert_eq!(ship.cleaned, 1);
            assert_eq!(ship.drawn.len(), 1);
            assert_abs_diff_eq!(ship.drawn[0], Mat3::from_translation(Vec2::new(0.0, 1.0)), epsilon = 1.0e-6);
        })
        .unwrap();
    }

    #[test]
    fn camera_without_inverted_caching_is_rejected() {
        let mut scene = Scene2D::new();
        let root = scene.root();
        let (_, camera) = scene
            .add_object_with(Some(root), Camera::new(), CachedTransformations::empty())
            .unwrap();
        let (_, recorder) = scene
            .add_object_with(Some(root), Recorder::default(), CachedTransformations::empty())
            .unwrap();
        let mut group = DrawableGroup::new();
        group.add(&recorder);

        assert!(matches!(
            scene.draw(&camera, &group),
            Err(SceneError::UnsupportedOperation(_))
        ));
        assert_eq!(recorder.with(|r| r.drawn.len()), Some(0));

        scene
            .set_cached_transformations(camera.id(), CachedTransformations::INVERTED)
            .unwrap();
        scene.draw(&camera, &group).unwrap();
        assert_eq!(recorder.with(|r| r.drawn.len()), Some(1));
    }

    #[test]
    fn destroyed_camera_is_an_error() {
        let mut scene = Scene2D::new();
        let (object, camera) = scene
            .add_object_with(Some(scene.root()), Camera::new(), CachedTransformations::INVERTED)
            .unwrap();
        scene.destroy(object).unwrap();
        assert_eq!(
            scene.draw(&camera, &DrawableGroup::new()),
            Err(SceneError::InvalidFeature)
        );
    }
}
