use std::ops::Mul;

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Vec2, Vec3Swizzles};

/// Rigid 2D transformation stored as a dual complex number.
///
/// `real` is the unit complex number `(cos θ, sin θ)` describing the rotation,
/// `dual` holds the translation. Applying the transformation to a point
/// rotates it first and translates it afterwards.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct DualComplex {
    pub real: Vec2,
    pub dual: Vec2,
}

fn complex_mul(a: Vec2, b: Vec2) -> Vec2 {
    Vec2::new(a.x * b.x - a.y * b.y, a.x * b.y + a.y * b.x)
}

fn complex_conjugate(a: Vec2) -> Vec2 {
    Vec2::new(a.x, -a.y)
}

impl DualComplex {
    pub const IDENTITY: DualComplex = DualComplex {
        real: Vec2::X,
        dual: Vec2::ZERO,
    };

    pub fn new(real: Vec2, dual: Vec2) -> Self {
        Self { real, dual }
    }

    pub fn from_rotation(angle: f32) -> Self {
        Self {
            real: Vec2::from_angle(angle),
            dual: Vec2::ZERO,
        }
    }

    pub fn from_translation(translation: Vec2) -> Self {
        Self {
            real: Vec2::X,
            dual: translation,
        }
    }

    /// Extracts the rigid part of a homogeneous 2D matrix. Scaling and
    /// shearing are discarded.
    pub fn from_mat3(matrix: &Mat3) -> Self {
        Self {
            real: matrix.x_axis.xy().normalize_or(Vec2::X),
            dual: matrix.z_axis.xy(),
        }
    }

    pub fn to_mat3(&self) -> Mat3 {
        Mat3::from_cols(
            self.real.extend(0.0),
            Vec2::new(-self.real.y, self.real.x).extend(0.0),
            self.dual.extend(1.0),
        )
    }

    pub fn rotation_angle(&self) -> f32 {
        self.real.to_angle()
    }

    pub fn translation(&self) -> Vec2 {
        self.dual
    }

    pub fn is_normalized(&self) -> bool {
        (self.real.length_squared() - 1.0).abs() < 1.0e-4
    }

    pub fn normalized(&self) -> Self {
        Self {
            real: self.real.normalize_or(Vec2::X),
            dual: self.dual,
        }
    }

    /// Inverse of a unit dual complex number.
    pub fn inverted(&self) -> Self {
        let real = complex_conjugate(self.real);
        Self {
            real,
            dual: -complex_mul(real, self.dual),
        }
    }

    pub fn transform_point(&self, point: Vec2) -> Vec2 {
        complex_mul(self.real, point) + self.dual
    }
}

impl Default for DualComplex {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for DualComplex {
    type Output = DualComplex;

    fn mul(self, rhs: DualComplex) -> DualComplex {
        DualComplex {
            real: complex_mul(self.real, rhs.real),
            dual: complex_mul(self.real, rhs.dual) + self.dual,
        }
    }
}
