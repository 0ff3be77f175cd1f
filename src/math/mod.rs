//! Value types used by the transformation strategies that `glam` does not
//! provide.

mod dual_complex;
mod dual_quaternion;

pub use dual_complex::DualComplex;
pub use dual_quaternion::DualQuat;
