use glam::{Mat2, Mat3, Mat4, Quat, Vec2, Vec3};

use crate::transformation::{
    apply, AbstractTranslation, AbstractTranslationRotation, AbstractTranslationRotationScaling,
    Transformation, TransformationType,
};

/// General 2D transformation stored as a homogeneous 3x3 matrix.
///
/// Supports any affine transformation, including non-uniform scaling and
/// reflection. Inversion is a full matrix inverse.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MatrixTransformation2D {
    matrix: Mat3,
}

impl MatrixTransformation2D {
    /// Reflects around the line through the origin with the given unit normal.
    pub fn reflect(&mut self, normal: Vec2, ty: TransformationType) -> &mut Self {
        let reflection = Mat2::from_cols(
            Vec2::X - 2.0 * normal.x * normal,
            Vec2::Y - 2.0 * normal.y * normal,
        );
        apply(self, Mat3::from_mat2(reflection), ty);
        self
    }
}

impl Transformation for MatrixTransformation2D {
    type DataType = Mat3;
    type Matrix = Mat3;

    const DIMENSIONS: u32 = 2;

    fn from_data(matrix: Mat3) -> Self {
        Self { matrix }
    }

    fn transformation(&self) -> Mat3 {
        self.matrix
    }

    fn set_unchecked(&mut self, data: Mat3) {
        self.matrix = data;
    }

    fn identity() -> Mat3 {
        Mat3::IDENTITY
    }

    fn compose(parent: &Mat3, child: &Mat3) -> Mat3 {
        *parent * *child
    }

    fn inverted(data: &Mat3) -> Mat3 {
        data.inverse()
    }

    fn to_matrix(data: &Mat3) -> Mat3 {
        *data
    }

    fn from_matrix(matrix: &Mat3) -> Mat3 {
        *matrix
    }
}

impl AbstractTranslation for MatrixTransformation2D {
    type Vector = Vec2;

    fn translate_with(&mut self, vector: Vec2, ty: TransformationType) -> &mut Self {
        apply(self, Mat3::from_translation(vector), ty);
        self
    }

    fn reset_transformation(&mut self) -> &mut Self {
        self.matrix = Mat3::IDENTITY;
        self
    }
}

impl AbstractTranslationRotation for MatrixTransformation2D {
    type Rotation = f32;

    fn rotate_with(&mut self, angle: f32, ty: TransformationType) -> &mut Self {
        apply(self, Mat3::from_angle(angle), ty);
        self
    }
}

impl AbstractTranslationRotationScaling for MatrixTransformation2D {
    fn scale_with(&mut self, scale: Vec2, ty: TransformationType) -> &mut Self {
        apply(self, Mat3::from_scale(scale), ty);
        self
    }
}

/// General 3D transformation stored as a homogeneous 4x4 matrix.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MatrixTransformation3D {
    matrix: Mat4,
}

impl MatrixTransformation3D {
    /// Reflects around the plane through the origin with the given unit normal.
    pub fn reflect(&mut self, normal: Vec3, ty: TransformationType) -> &mut Self {
        let reflection = Mat3::from_cols(
            Vec3::X - 2.0 * normal.x * normal,
            Vec3::Y - 2.0 * normal.y * normal,
            Vec3::Z - 2.0 * normal.z * normal,
        );
        apply(self, Mat4::from_mat3(reflection), ty);
        self
    }
}

impl Transformation for MatrixTransformation3D {
    type DataType = Mat4;
    type Matrix = Mat4;

    const DIMENSIONS: u32 = 3;

    fn from_data(matrix: Mat4) -> Self {
        Self { matrix }
    }

    fn transformation(&self) -> Mat4 {
        self.matrix
    }

    fn set_unchecked(&mut self, data: Mat4) {
        self.matrix = data;
    }

    fn identity() -> Mat4 {
        Mat4::IDENTITY
    }

    fn compose(parent: &Mat4, child: &Mat4) -> Mat4 {
        *parent * *child
    }

    fn inverted(data: &Mat4) -> Mat4 {
        data.inverse()
    }

    fn to_matrix(data: &Mat4) -> Mat4 {
        *data
    }

    fn from_matrix(matrix: &Mat4) -> Mat4 {
        *matrix
    }
}

impl AbstractTranslation for MatrixTransformation3D {
    type Vector = Vec3;

    fn translate_with(&mut self, vector: Vec3, ty: TransformationType) -> &mut Self {
        apply(self, Mat4::from_translation(vector), ty);
        self
    }

    fn reset_transformation(&mut self) -> &mut Self {
        self.matrix = Mat4::IDENTITY;
        self
    }
}

impl AbstractTranslationRotation for MatrixTransformation3D {
    type Rotation = Quat;

    fn rotate_with(&mut self, rotation: Quat, ty: TransformationType) -> &mut Self {
        apply(self, Mat4::from_quat(rotation), ty);
        self
    }
}

impl AbstractTranslationRotationScaling for MatrixTransformation3D {
    fn scale_with(&mut self, scale: Vec3, ty: TransformationType) -> &mut Self {
        apply(self, Mat4::from_scale(scale), ty);
        self
    }
}
