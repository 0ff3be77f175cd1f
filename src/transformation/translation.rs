use glam::{Mat3, Mat4, Vec2, Vec3, Vec3Swizzles, Vec4Swizzles};

use crate::transformation::{AbstractTranslation, Transformation, TransformationType};

/// 2D translation-only transformation. Composition is vector addition, so
/// global and local translation are the same thing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TranslationTransformation2D {
    translation: Vec2,
}

impl Transformation for TranslationTransformation2D {
    type DataType = Vec2;
    type Matrix = Mat3;

    const DIMENSIONS: u32 = 2;

    fn from_data(translation: Vec2) -> Self {
        Self { translation }
    }

    fn transformation(&self) -> Vec2 {
        self.translation
    }

    fn set_unchecked(&mut self, data: Vec2) {
        self.translation = data;
    }

    fn identity() -> Vec2 {
        Vec2::ZERO
    }

    fn compose(parent: &Vec2, child: &Vec2) -> Vec2 {
        *parent + *child
    }

    fn inverted(data: &Vec2) -> Vec2 {
        -*data
    }

    fn to_matrix(data: &Vec2) -> Mat3 {
        Mat3::from_translation(*data)
    }

    fn from_matrix(matrix: &Mat3) -> Vec2 {
        matrix.z_axis.xy()
    }
}

impl AbstractTranslation for TranslationTransformation2D {
    type Vector = Vec2;

    fn translate_with(&mut self, vector: Vec2, _ty: TransformationType) -> &mut Self {
        self.translation += vector;
        self
    }

    fn reset_transformation(&mut self) -> &mut Self {
        self.translation = Vec2::ZERO;
        self
    }
}

/// 3D translation-only transformation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TranslationTransformation3D {
    translation: Vec3,
}

impl Transformation for TranslationTransformation3D {
    type DataType = Vec3;
    type Matrix = Mat4;

    const DIMENSIONS: u32 = 3;

    fn from_data(translation: Vec3) -> Self {
        Self { translation }
    }

    fn transformation(&self) -> Vec3 {
        self.translation
    }

    fn set_unchecked(&mut self, data: Vec3) {
        self.translation = data;
    }

    fn identity() -> Vec3 {
        Vec3::ZERO
    }

    fn compose(parent: &Vec3, child: &Vec3) -> Vec3 {
        *parent + *child
    }

    fn inverted(data: &Vec3) -> Vec3 {
        -*data
    }

    fn to_matrix(data: &Vec3) -> Mat4 {
        Mat4::from_translation(*data)
    }

    fn from_matrix(matrix: &Mat4) -> Vec3 {
        matrix.w_axis.xyz()
    }
}

impl AbstractTranslation for TranslationTransformation3D {
    type Vector = Vec3;

    fn translate_with(&mut self, vector: Vec3, _ty: TransformationType) -> &mut Self {
        self.translation += vector;
        self
    }

    fn reset_transformation(&mut self) -> &mut Self {
        self.translation = Vec3::ZERO;
        self
    }
}
