//! Transformation strategies and the capability traits used to manipulate
//! them without knowing the concrete representation.
//!
//! A strategy is a small value type owning one local transformation. The
//! [`Transformation`] trait gives the scene graph everything it needs to
//! compose, invert and convert it. What a caller may *do* with it is
//! expressed separately by [`AbstractTranslation`],
//! [`AbstractTranslationRotation`] and [`AbstractTranslationRotationScaling`];
//! each strategy implements the richest one it supports.

use std::fmt::Debug;
use std::ops::Mul;

use glam::{Mat3, Mat4, Vec2};

use crate::error::{Result, SceneError};

mod dual_complex;
mod dual_quaternion;
mod matrix;
mod rigid_matrix;
mod translation;

pub use dual_complex::DualComplexTransformation;
pub use dual_quaternion::DualQuaternionTransformation;
pub use matrix::{MatrixTransformation2D, MatrixTransformation3D};
pub use rigid_matrix::{RigidMatrixTransformation2D, RigidMatrixTransformation3D};
pub use translation::{TranslationTransformation2D, TranslationTransformation3D};

/// Tolerance used when checking that a matrix is rigid.
pub(crate) const RIGID_EPSILON: f32 = 1.0e-4;

/// Where a new transformation is applied relative to the existing one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TransformationType {
    /// Applied after the existing transformation, in the parent's frame.
    #[default]
    Global,
    /// Applied before the existing transformation, in the object's own frame.
    Local,
}

/// Homogeneous matrix type a strategy converts to.
pub trait MatrixType: Copy + Debug + PartialEq + Mul<Output = Self> + 'static {
    const IDENTITY: Self;

    fn inverse(&self) -> Self;

    /// Scaling along the two screen axes, leaving any depth axis untouched.
    fn from_screen_scale(scale: Vec2) -> Self;

    /// Diagonal entries of the two screen axes.
    fn screen_scale(&self) -> Vec2;
}

impl MatrixType for Mat3 {
    const IDENTITY: Self = Mat3::IDENTITY;

    fn inverse(&self) -> Self {
        Mat3::inverse(self)
    }

    fn from_screen_scale(scale: Vec2) -> Self {
        Mat3::from_scale(scale)
    }

    fn screen_scale(&self) -> Vec2 {
        Vec2::new(self.x_axis.x, self.y_axis.y)
    }
}

impl MatrixType for Mat4 {
    const IDENTITY: Self = Mat4::IDENTITY;

    fn inverse(&self) -> Self {
        Mat4::inverse(self)
    }

    fn from_screen_scale(scale: Vec2) -> Self {
        Mat4::from_scale(scale.extend(1.0))
    }

    fn screen_scale(&self) -> Vec2 {
        Vec2::new(self.x_axis.x, self.y_axis.y)
    }
}

/// A transformation representation usable by the scene graph.
///
/// `compose(parent, child)` must produce the transformation that applies
/// `child` first and `parent` second, matching `to_matrix(parent) *
/// to_matrix(child)`.
pub trait Transformation: Clone + Debug + Default + 'static {
    /// Stored representation.
    type DataType: Copy + Debug + PartialEq + 'static;
    /// Matrix form handed to features and drawables.
    type Matrix: MatrixType;

    const DIMENSIONS: u32;

    fn from_data(data: Self::DataType) -> Self;

    fn transformation(&self) -> Self::DataType;

    /// Replaces the stored value. Callers must have passed it through
    /// [`check`](Self::check) first.
    fn set_unchecked(&mut self, data: Self::DataType);

    fn identity() -> Self::DataType;

    fn compose(parent: &Self::DataType, child: &Self::DataType) -> Self::DataType;

    fn inverted(data: &Self::DataType) -> Self::DataType;

    fn to_matrix(data: &Self::DataType) -> Self::Matrix;

    /// Converts a matrix, keeping only the part the representation can hold.
    fn from_matrix(matrix: &Self::Matrix) -> Self::DataType;

    /// Rejects values the strategy cannot represent faithfully.
    fn check(_data: &Self::DataType) -> Result<()> {
        Ok(())
    }

    fn transformation_matrix(&self) -> Self::Matrix {
        Self::to_matrix(&self.transformation())
    }

    fn set_transformation(&mut self, data: Self::DataType) -> Result<&mut Self> {
        Self::check(&data)?;
        self.set_unchecked(data);
        Ok(self)
    }

    /// Multiplies the current transformation with `data`.
    fn transform(&mut self, data: Self::DataType, ty: TransformationType) -> Result<&mut Self> {
        Self::check(&data)?;
        apply(self, data, ty);
        Ok(self)
    }
}

/// Capability: translation. Every strategy provides it.
pub trait AbstractTranslation {
    type Vector: Copy + Debug;

    fn translate_with(&mut self, vector: Self::Vector, ty: TransformationType) -> &mut Self;

    fn reset_transformation(&mut self) -> &mut Self;

    fn translate(&mut self, vector: Self::Vector) -> &mut Self {
        self.translate_with(vector, TransformationType::Global)
    }

    fn translate_local(&mut self, vector: Self::Vector) -> &mut Self {
        self.translate_with(vector, TransformationType::Local)
    }
}

/// Capability: translation and rotation.
///
/// `Rotation` is an angle in radians for 2D strategies and a unit
/// quaternion for 3D ones.
pub trait AbstractTranslationRotation: AbstractTranslation {
    type Rotation: Copy + Debug;

    fn rotate_with(&mut self, rotation: Self::Rotation, ty: TransformationType) -> &mut Self;

    fn rotate(&mut self, rotation: Self::Rotation) -> &mut Self {
        self.rotate_with(rotation, TransformationType::Global)
    }

    fn rotate_local(&mut self, rotation: Self::Rotation) -> &mut Self {
        self.rotate_with(rotation, TransformationType::Local)
    }
}

/// Capability: translation, rotation and (possibly non-uniform) scaling.
pub trait AbstractTranslationRotationScaling: AbstractTranslationRotation {
    fn scale_with(&mut self, scale: Self::Vector, ty: TransformationType) -> &mut Self;

    fn scale(&mut self, scale: Self::Vector) -> &mut Self {
        self.scale_with(scale, TransformationType::Global)
    }

    fn scale_local(&mut self, scale: Self::Vector) -> &mut Self {
        self.scale_with(scale, TransformationType::Local)
    }
}

/// Applies `data` to `transformation` on the side selected by `ty`. Only for
/// values that are valid by construction.
pub(crate) fn apply<T: Transformation>(transformation: &mut T, data: T::DataType, ty: TransformationType) {
    let current = transformation.transformation();
    let composed = match ty {
        TransformationType::Global => T::compose(&data, &current),
        TransformationType::Local => T::compose(&current, &data),
    };
    transformation.set_unchecked(composed);
}

pub(crate) fn not_rigid() -> SceneError {
    SceneError::InvalidTransformation("matrix is not rigid")
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use glam::{Mat3, Mat4, Quat, Vec2, Vec3};

    use super::*;

    fn round_trip_translation<T>(vector: T::Vector, negated: T::Vector)
    where
        T: Transformation + AbstractTranslation,
        T::Matrix: approx::AbsDiffEq<Epsilon = f32> + Debug,
    {
        let mut transformation = T::default();
        let before = transformation.transformation_matrix();
        transformation.translate(vector).translate(negated);
        assert_abs_diff_eq!(transformation.transformation_matrix(), before, epsilon = 1.0e-5);
    }

    #[test]
    fn translation_round_trips_for_every_strategy() {
        let v2 = Vec2::new(1.5, -2.0);
        let v3 = Vec3::new(1.5, -2.0, 0.25);
        round_trip_translation::<MatrixTransformation2D>(v2, -v2);
        round_trip_translation::<MatrixTransformation3D>(v3, -v3);
        round_trip_translation::<RigidMatrixTransformation2D>(v2, -v2);
        round_trip_translation::<RigidMatrixTransformation3D>(v3, -v3);
        round_trip_translation::<DualComplexTransformation>(v2, -v2);
        round_trip_translation::<DualQuaternionTransformation>(v3, -v3);
        round_trip_translation::<TranslationTransformation2D>(v2, -v2);
        round_trip_translation::<TranslationTransformation3D>(v3, -v3);
    }

    fn compose_matches_matrix_product<T: Transformation>(a: T::DataType, b: T::DataType)
    where
        T::Matrix: approx::AbsDiffEq<Epsilon = f32>,
    {
        let composed = T::to_matrix(&T::compose(&a, &b));
        let product = T::to_matrix(&a) * T::to_matrix(&b);
        assert_abs_diff_eq!(composed, product, epsilon = 1.0e-4);

        let inverse = T::to_matrix(&T::compose(&a, &T::inverted(&a)));
        assert_abs_diff_eq!(inverse, <T::Matrix as MatrixType>::IDENTITY, epsilon = 1.0e-4);
    }

    #[test]
    fn composition_agrees_with_matrices() {
        let rotation = Quat::from_axis_angle(Vec3::new(0.2, 1.0, 0.4).normalize(), 0.7);

        let a3 = Mat4::from_scale_rotation_translation(Vec3::new(2.0, 1.0, 0.5), rotation, Vec3::X);
        let b3 = Mat4::from_rotation_translation(rotation.inverse(), Vec3::new(0.0, 3.0, -1.0));
        compose_matches_matrix_product::<MatrixTransformation3D>(a3, b3);
        compose_matches_matrix_product::<RigidMatrixTransformation3D>(
            Mat4::from_rotation_translation(rotation, Vec3::X),
            b3,
        );
        compose_matches_matrix_product::<DualQuaternionTransformation>(
            DualQuaternionTransformation::from_matrix(&b3),
            DualQuaternionTransformation::from_matrix(&Mat4::from_rotation_translation(rotation, Vec3::Y)),
        );
        compose_matches_matrix_product::<TranslationTransformation3D>(Vec3::X, Vec3::new(0.0, 2.0, 3.0));

        let a2 = Mat3::from_scale_angle_translation(Vec2::new(2.0, 3.0), 0.4, Vec2::new(1.0, 1.0));
        let b2 = Mat3::from_angle(-1.0) * Mat3::from_translation(Vec2::new(5.0, 0.0));
        compose_matches_matrix_product::<MatrixTransformation2D>(a2, b2);
        compose_matches_matrix_product::<RigidMatrixTransformation2D>(
            Mat3::from_translation(Vec2::new(1.0, 1.0)) * Mat3::from_angle(0.4),
            b2,
        );
        compose_matches_matrix_product::<DualComplexTransformation>(
            DualComplexTransformation::from_matrix(&b2),
            DualComplexTransformation::from_matrix(&Mat3::from_angle(2.0)),
        );
        compose_matches_matrix_product::<TranslationTransformation2D>(Vec2::X, Vec2::new(-2.0, 1.0));
    }

    #[test]
    fn global_and_local_application_order() {
        let mut global = MatrixTransformation2D::default();
        global
            .translate(Vec2::new(1.0, 0.0))
            .rotate(std::f32::consts::FRAC_PI_2);
        // Rotation applied after translation moves the translation too.
        assert_abs_diff_eq!(
            global.transformation_matrix().transform_point2(Vec2::ZERO),
            Vec2::new(0.0, 1.0),
            epsilon = 1.0e-5
        );

        let mut local = MatrixTransformation2D::default();
        local
            .translate(Vec2::new(1.0, 0.0))
            .rotate_local(std::f32::consts::FRAC_PI_2);
        assert_abs_diff_eq!(
            local.transformation_matrix().transform_point2(Vec2::ZERO),
            Vec2::new(1.0, 0.0),
            epsilon = 1.0e-5
        );
    }
}
