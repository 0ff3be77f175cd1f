use std::ops::Mul;

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Quat, Vec3, Vec4Swizzles};

/// Rigid 3D transformation stored as a unit dual quaternion.
///
/// `real` is the rotation. `dual` encodes the translation `t` as
/// `0.5 * (t, 0) * real`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct DualQuat {
    pub real: Quat,
    pub dual: Quat,
}

impl DualQuat {
    pub const IDENTITY: DualQuat = DualQuat {
        real: Quat::IDENTITY,
        dual: Quat::from_xyzw(0.0, 0.0, 0.0, 0.0),
    };

    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            real: rotation,
            dual: Quat::from_xyzw(0.0, 0.0, 0.0, 0.0),
        }
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            real: Quat::IDENTITY,
            dual: Quat::from_xyzw(
                translation.x * 0.5,
                translation.y * 0.5,
                translation.z * 0.5,
                0.0,
            ),
        }
    }

    /// Rotation followed by translation.
    pub fn from_rotation_translation(rotation: Quat, translation: Vec3) -> Self {
        Self::from_translation(translation) * Self::from_rotation(rotation)
    }

    /// Extracts the rigid part of a homogeneous 3D matrix. Scaling and
    /// shearing are discarded.
    pub fn from_mat4(matrix: &Mat4) -> Self {
        let rotation = Mat3::from_cols(
            matrix.x_axis.xyz().normalize_or(Vec3::X),
            matrix.y_axis.xyz().normalize_or(Vec3::Y),
            matrix.z_axis.xyz().normalize_or(Vec3::Z),
        );
        Self::from_rotation_translation(
            Quat::from_mat3(&rotation).normalize(),
            matrix.w_axis.xyz(),
        )
    }

    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.real, self.translation())
    }

    pub fn rotation(&self) -> Quat {
        self.real
    }

    pub fn translation(&self) -> Vec3 {
        let t = self.dual * self.real.conjugate();
        Vec3::new(t.x, t.y, t.z) * 2.0
    }

    pub fn is_normalized(&self) -> bool {
        (self.real.length_squared() - 1.0).abs() < 1.0e-4 && self.real.dot(self.dual).abs() < 1.0e-4
    }

    pub fn normalized(&self) -> Self {
        let length = self.real.length();
        if length == 0.0 {
            return Self::IDENTITY;
        }

        let real = self.real * (1.0 / length);
        let translation = {
            let t = (self.dual * (1.0 / length)) * real.conjugate();
            Vec3::new(t.x, t.y, t.z) * 2.0
        };
        Self::from_rotation_translation(real, translation)
    }

    /// Inverse of a unit dual quaternion.
    pub fn inverted(&self) -> Self {
        Self {
            real: self.real.conjugate(),
            dual: self.dual.conjugate(),
        }
    }

    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.real * point + self.translation()
    }
}

impl Default for DualQuat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for DualQuat {
    type Output = DualQuat;

    fn mul(self, rhs: DualQuat) -> DualQuat {
        DualQuat {
            real: self.real * rhs.real,
            dual: self.real * rhs.dual + self.dual * rhs.real,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use glam::{Mat4, Quat, Vec3};

    use super::DualQuat;

    fn sample() -> DualQuat {
        DualQuat::from_rotation_translation(
            Quat::from_axis_angle(Vec3::new(1.0, 2.0, -0.5).normalize(), 0.8),
            Vec3::new(3.0, -1.0, 2.5),
        )
    }

    #[test]
    fn translation_survives_rotation() {
        let dq = sample();
        assert_abs_diff_eq!(dq.translation(), Vec3::new(3.0, -1.0, 2.5), epsilon = 1.0e-5);
    }

    #[test]
    fn composition_matches_matrices() {
        let a = sample();
        let b = DualQuat::from_rotation(Quat::from_rotation_y(-1.3))
            * DualQuat::from_translation(Vec3::new(0.0, 4.0, 1.0));

        assert_abs_diff_eq!((a * b).to_mat4(), a.to_mat4() * b.to_mat4(), epsilon = 1.0e-4);
    }

    #[test]
    fn inverse_cancels() {
        let a = sample();
        assert_abs_diff_eq!((a * a.inverted()).to_mat4(), Mat4::IDENTITY, epsilon = 1.0e-5);
        assert!(a.is_normalized());
        assert!(a.inverted().is_normalized());
    }

    #[test]
    fn normalization_restores_unit_length() {
        let a = sample();
        let drifted = DualQuat {
            real: a.real * 1.01,
            dual: a.dual * 1.01,
        };
        assert!(!drifted.is_normalized());

        let fixed = drifted.normalized();
        assert!(fixed.is_normalized());
        assert_abs_diff_eq!(fixed.to_mat4(), a.to_mat4(), epsilon = 1.0e-4);
    }

    #[test]
    fn matrix_round_trip_keeps_rigid_part() {
        let a = sample();
        let b = DualQuat::from_mat4(&a.to_mat4());
        assert_abs_diff_eq!(b.to_mat4(), a.to_mat4(), epsilon = 1.0e-4);
        assert_abs_diff_eq!(a.transform_point(Vec3::ONE), a.to_mat4().transform_point3(Vec3::ONE), epsilon = 1.0e-4);
    }
}
