use glam::{Mat3, Vec2};

use crate::error::{Result, SceneError};
use crate::math::DualComplex;
use crate::transformation::{
    apply, AbstractTranslation, AbstractTranslationRotation, Transformation, TransformationType,
};

/// Rigid 2D transformation stored as a unit dual complex number.
///
/// Cheaper to compose and invert than a matrix, at the cost of a conversion
/// whenever a matrix is needed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DualComplexTransformation {
    transformation: DualComplex,
}

impl DualComplexTransformation {
    pub fn normalize_rotation(&mut self) -> &mut Self {
        self.transformation = self.transformation.normalized();
        self
    }
}

impl Transformation for DualComplexTransformation {
    type DataType = DualComplex;
    type Matrix = Mat3;

    const DIMENSIONS: u32 = 2;

    fn from_data(transformation: DualComplex) -> Self {
        Self { transformation }
    }

    fn transformation(&self) -> DualComplex {
        self.transformation
    }

    fn set_unchecked(&mut self, data: DualComplex) {
        self.transformation = data;
    }

    fn identity() -> DualComplex {
        DualComplex::IDENTITY
    }

    fn compose(parent: &DualComplex, child: &DualComplex) -> DualComplex {
        *parent * *child
    }

    fn inverted(data: &DualComplex) -> DualComplex {
        data.inverted()
    }

    fn to_matrix(data: &DualComplex) -> Mat3 {
        data.to_mat3()
    }

    fn from_matrix(matrix: &Mat3) -> DualComplex {
        DualComplex::from_mat3(matrix)
    }

    fn check(data: &DualComplex) -> Result<()> {
        if data.is_normalized() {
            Ok(())
        } else {
            Err(SceneError::InvalidTransformation("dual complex number is not normalized"))
        }
    }
}

impl AbstractTranslation for DualComplexTransformation {
    type Vector = Vec2;

    fn translate_with(&mut self, vector: Vec2, ty: TransformationType) -> &mut Self {
        apply(self, DualComplex::from_translation(vector), ty);
        self
    }

    fn reset_transformation(&mut self) -> &mut Self {
        self.transformation = DualComplex::IDENTITY;
        self
    }
}

impl AbstractTranslationRotation for DualComplexTransformation {
    type Rotation = f32;

    fn rotate_with(&mut self, angle: f32, ty: TransformationType) -> &mut Self {
        apply(self, DualComplex::from_rotation(angle), ty);
        self
    }
}
