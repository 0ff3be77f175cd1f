use glam::{Mat3, Mat4, UVec2, Vec2};

use crate::scene_graph::feature::Feature;
use crate::transformation::{MatrixType, Transformation};

/// How the projection is adjusted when the viewport aspect ratio does not
/// match the projection's.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AspectRatioPolicy {
    /// The projection is used as is, which stretches the image.
    #[default]
    NotPreserved,
    /// The shorter side is extended so that more of the scene is visible.
    Extend,
    /// The longer side is clipped so that less of the scene is visible.
    Clip,
}

/// Camera feature.
///
/// Attach it with [`CachedTransformations::INVERTED`](crate::scene_graph::CachedTransformations::INVERTED):
/// the inverted absolute transformation of its holder is the camera matrix.
#[derive(Debug, Clone)]
pub struct Camera<T: Transformation> {
    aspect_ratio_policy: AspectRatioPolicy,
    raw_projection: T::Matrix,
    projection: T::Matrix,
    camera_matrix: T::Matrix,
    viewport: UVec2,
}

impl<T: Transformation> Default for Camera<T> {
    fn default() -> Self {
        Self {
            aspect_ratio_policy: AspectRatioPolicy::NotPreserved,
            raw_projection: <T::Matrix as MatrixType>::IDENTITY,
            projection: <T::Matrix as MatrixType>::IDENTITY,
            camera_matrix: <T::Matrix as MatrixType>::IDENTITY,
            viewport: UVec2::ZERO,
        }
    }
}

impl<T: Transformation> Feature<T> for Camera<T> {
    fn clean_inverted(&mut self, inverted_absolute_transformation_matrix: &T::Matrix) {
        self.camera_matrix = *inverted_absolute_transformation_matrix;
    }
}

impl<T: Transformation> Camera<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn aspect_ratio_policy(&self) -> AspectRatioPolicy {
        self.aspect_ratio_policy
    }

    pub fn set_aspect_ratio_policy(&mut self, policy: AspectRatioPolicy) -> &mut Self {
        self.aspect_ratio_policy = policy;
        self.fix_aspect_ratio();
        self
    }

    /// Inverted absolute transformation of the holder as of its last clean.
    pub fn camera_matrix(&self) -> T::Matrix {
        self.camera_matrix
    }

    /// Projection with the aspect ratio correction applied.
    pub fn projection_matrix(&self) -> T::Matrix {
        self.projection
    }

    pub fn set_projection_matrix(&mut self, projection: T::Matrix) -> &mut Self {
        self.raw_projection = projection;
        self.fix_aspect_ratio();
        self
    }

    pub fn viewport(&self) -> UVec2 {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: UVec2) -> &mut Self {
        self.viewport = viewport;
        self.fix_aspect_ratio();
        self
    }

    fn fix_aspect_ratio(&mut self) {
        let fix = aspect_ratio_fix::<T::Matrix>(
            self.aspect_ratio_policy,
            self.raw_projection.screen_scale(),
            self.viewport,
        );
        self.projection = fix * self.raw_projection;
    }
}

impl<T: Transformation<Matrix = Mat3>> Camera<T> {
    /// 2D projection showing `size` world units centered on the camera.
    pub fn set_projection(&mut self, size: Vec2) -> &mut Self {
        self.set_projection_matrix(Mat3::from_scale(2.0 / size))
    }
}

impl<T: Transformation<Matrix = Mat4>> Camera<T> {
    pub fn set_orthographic(&mut self, size: Vec2, near: f32, far: f32) -> &mut Self {
        let half = size / 2.0;
        self.set_projection_matrix(Mat4::orthographic_rh_gl(-half.x, half.x, -half.y, half.y, near, far))
    }

    /// Perspective projection. `fov_y` is the vertical field of view in
    /// radians.
    pub fn set_perspective(&mut self, fov_y: f32, aspect_ratio: f32, near: f32, far: f32) -> &mut Self {
        self.set_projection_matrix(Mat4::perspective_rh_gl(fov_y, aspect_ratio, near, far))
    }
}

/// Scaling that corrects a projection with the given screen scale for a
/// viewport of the given size.
pub fn aspect_ratio_fix<M: MatrixType>(policy: AspectRatioPolicy, projection_scale: Vec2, viewport: UVec2) -> M {
    if policy == AspectRatioPolicy::NotPreserved
        || projection_scale.x == 0.0
        || projection_scale.y == 0.0
        || viewport.x == 0
        || viewport.y == 0
    {
        return M::IDENTITY;
    }

    let relative = viewport.as_vec2() * projection_scale;
    if (relative.x > relative.y) == (policy == AspectRatioPolicy::Extend) {
        M::from_screen_scale(Vec2::new(relative.y / relative.x, 1.0))
    } else {
        M::from_screen_scale(Vec2::new(1.0, relative.x / relative.y))
    }
}
