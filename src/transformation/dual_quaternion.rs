use glam::{Mat4, Quat, Vec3};

use crate::error::{Result, SceneError};
use crate::math::DualQuat;
use crate::transformation::{
    apply, AbstractTranslation, AbstractTranslationRotation, Transformation, TransformationType,
};

/// Rigid 3D transformation stored as a unit dual quaternion.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DualQuaternionTransformation {
    transformation: DualQuat,
}

impl DualQuaternionTransformation {
    pub fn normalize_rotation(&mut self) -> &mut Self {
        self.transformation = self.transformation.normalized();
        self
    }
}

impl Transformation for DualQuaternionTransformation {
    type DataType = DualQuat;
    type Matrix = Mat4;

    const DIMENSIONS: u32 = 3;

    fn from_data(transformation: DualQuat) -> Self {
        Self { transformation }
    }

    fn transformation(&self) -> DualQuat {
        self.transformation
    }

    fn set_unchecked(&mut self, data: DualQuat) {
        self.transformation = data;
    }

    fn identity() -> DualQuat {
        DualQuat::IDENTITY
    }

    fn compose(parent: &DualQuat, child: &DualQuat) -> DualQuat {
        *parent * *child
    }

    fn inverted(data: &DualQuat) -> DualQuat {
        data.inverted()
    }

    fn to_matrix(data: &DualQuat) -> Mat4 {
        data.to_mat4()
    }

    fn from_matrix(matrix: &Mat4) -> DualQuat {
        DualQuat::from_mat4(matrix)
    }

    fn check(data: &DualQuat) -> Result<()> {
        if data.is_normalized() {
            Ok(())
        } else {
            Err(SceneError::InvalidTransformation("dual quaternion is not normalized"))
        }
    }
}

impl AbstractTranslation for DualQuaternionTransformation {
    type Vector = Vec3;

    fn translate_with(&mut self, vector: Vec3, ty: TransformationType) -> &mut Self {
        apply(self, DualQuat::from_translation(vector), ty);
        self
    }

    fn reset_transformation(&mut self) -> &mut Self {
        self.transformation = DualQuat::IDENTITY;
        self
    }
}

impl AbstractTranslationRotation for DualQuaternionTransformation {
    type Rotation = Quat;

    fn rotate_with(&mut self, rotation: Quat, ty: TransformationType) -> &mut Self {
        apply(self, DualQuat::from_rotation(rotation), ty);
        self
    }
}
