use glam::{Mat2, Mat3, Mat4, Quat, Vec2, Vec3, Vec3Swizzles, Vec4Swizzles};

use crate::error::Result;
use crate::transformation::{
    apply, not_rigid, AbstractTranslation, AbstractTranslationRotation, Transformation,
    TransformationType, RIGID_EPSILON,
};

fn is_rigid_2d(matrix: &Mat3) -> bool {
    let rotation = Mat2::from_mat3(*matrix);
    let bottom_row = Vec3::new(matrix.x_axis.z, matrix.y_axis.z, matrix.z_axis.z);

    (rotation * rotation.transpose()).abs_diff_eq(Mat2::IDENTITY, RIGID_EPSILON)
        && (rotation.determinant() - 1.0).abs() < RIGID_EPSILON
        && bottom_row.abs_diff_eq(Vec3::Z, RIGID_EPSILON)
}

fn is_rigid_3d(matrix: &Mat4) -> bool {
    let rotation = Mat3::from_mat4(*matrix);
    let bottom_row = matrix.row(3);

    (rotation * rotation.transpose()).abs_diff_eq(Mat3::IDENTITY, RIGID_EPSILON)
        && (rotation.determinant() - 1.0).abs() < RIGID_EPSILON
        && bottom_row.abs_diff_eq(glam::Vec4::W, RIGID_EPSILON)
}

/// Rigid 2D transformation (rotation and translation only) stored as a 3x3
/// matrix. Inversion only transposes the rotation part.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RigidMatrixTransformation2D {
    matrix: Mat3,
}

impl RigidMatrixTransformation2D {
    /// Re-orthonormalizes the rotation part to undo accumulated float drift.
    pub fn normalize_rotation(&mut self) -> &mut Self {
        let x = self.matrix.x_axis.xy().normalize_or(Vec2::X);
        let y = x.perp();
        self.matrix = Mat3::from_cols(x.extend(0.0), y.extend(0.0), self.matrix.z_axis);
        self
    }
}

impl Transformation for RigidMatrixTransformation2D {
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
        let rotation = Mat2::from_mat3(*data).transpose();
        let translation = -(rotation * data.z_axis.xy());
        Mat3::from_cols(
            rotation.x_axis.extend(0.0),
            rotation.y_axis.extend(0.0),
            translation.extend(1.0),
        )
    }

    fn to_matrix(data: &Mat3) -> Mat3 {
        *data
    }

    fn from_matrix(matrix: &Mat3) -> Mat3 {
        *matrix
    }

    fn check(data: &Mat3) -> Result<()> {
        if is_rigid_2d(data) {
            Ok(())
        } else {
            Err(not_rigid())
        }
    }
}

impl AbstractTranslation for RigidMatrixTransformation2D {
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

impl AbstractTranslationRotation for RigidMatrixTransformation2D {
    type Rotation = f32;

    fn rotate_with(&mut self, angle: f32, ty: TransformationType) -> &mut Self {
        apply(self, Mat3::from_angle(angle), ty);
        self
    }
}

/// Rigid 3D transformation (rotation and translation only) stored as a 4x4
/// matrix.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RigidMatrixTransformation3D {
    matrix: Mat4,
}

impl RigidMatrixTransformation3D {
    /// Re-orthonormalizes the rotation part (Gram-Schmidt) to undo
    /// accumulated float drift.
    pub fn normalize_rotation(&mut self) -> &mut Self {
        let x = self.matrix.x_axis.xyz().normalize_or(Vec3::X);
        let y = (self.matrix.y_axis.xyz() - x * x.dot(self.matrix.y_axis.xyz())).normalize_or(Vec3::Y);
        let z = x.cross(y);
        self.matrix = Mat4::from_cols(
            x.extend(0.0),
            y.extend(0.0),
            z.extend(0.0),
            self.matrix.w_axis,
        );
        self
    }
}

impl Transformation for RigidMatrixTransformation3D {
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
        let rotation = Mat3::from_mat4(*data).transpose();
        let translation = -(rotation * data.w_axis.xyz());
        Mat4::from_cols(
            rotation.x_axis.extend(0.0),
            rotation.y_axis.extend(0.0),
            rotation.z_axis.extend(0.0),
            translation.extend(1.0),
        )
    }

    fn to_matrix(data: &Mat4) -> Mat4 {
        *data
    }

    fn from_matrix(matrix: &Mat4) -> Mat4 {
        *matrix
    }

    fn check(data: &Mat4) -> Result<()> {
        if is_rigid_3d(data) {
            Ok(())
        } else {
            Err(not_rigid())
        }
    }
}

impl AbstractTranslation for RigidMatrixTransformation3D {
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

impl AbstractTranslationRotation for RigidMatrixTransformation3D {
    type Rotation = Quat;

    fn rotate_with(&mut self, rotation: Quat, ty: TransformationType) -> &mut Self {
        apply(self, Mat4::from_quat(rotation), ty);
        self
    }
}
