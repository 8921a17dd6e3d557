use glam::Mat4;

use crate::settings::ProjectionSettings;

/// Perspective projection with a cached matrix and byte form.
///
/// The matrix is the right-handed OpenGL perspective matrix (clip depth in
/// `[-1, 1]`) and is recomputed whenever a parameter changes, so
/// [`matrix`](Self::matrix) and [`to_bytes`](Self::to_bytes) always reflect
/// the current parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    aspect_ratio: f32,
    fov: f32,
    near: f32,
    far: f32,
    matrix: Mat4,
    bytes: [u8; 64],
}

/// Parameter overrides for [`Projection::update`].
///
/// `None` keeps the current value. A zero override is ignored as well, since
/// a zero aspect ratio, field of view or clip distance has no valid matrix.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProjectionUpdate {
    /// New aspect ratio (width / height).
    pub aspect_ratio: Option<f32>,
    /// New vertical field of view in degrees.
    pub fov: Option<f32>,
    /// New near plane distance.
    pub near: Option<f32>,
    /// New far plane distance.
    pub far: Option<f32>,
}

impl ProjectionUpdate {
    /// Override the aspect ratio.
    #[must_use]
    pub fn with_aspect_ratio(mut self, aspect_ratio: f32) -> Self {
        self.aspect_ratio = Some(aspect_ratio);
        self
    }

    /// Override the field of view (degrees).
    #[must_use]
    pub fn with_fov(mut self, fov: f32) -> Self {
        self.fov = Some(fov);
        self
    }

    /// Override the near plane.
    #[must_use]
    pub fn with_near(mut self, near: f32) -> Self {
        self.near = Some(near);
        self
    }

    /// Override the far plane.
    #[must_use]
    pub fn with_far(mut self, far: f32) -> Self {
        self.far = Some(far);
        self
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
/// GPU uniform block holding the projection matrix and depth constants.
pub struct ProjectionUniform {
    /// Column-major projection matrix.
    pub projection: [[f32; 4]; 4],
    /// Depth linearization constants `(A, B)`.
    pub constants: [f32; 2],
    /// Near clipping plane distance.
    pub near: f32,
    /// Far clipping plane distance.
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self::new(9.0 / 16.0, 75.0, 1.0, 100.0)
    }
}

impl Projection {
    /// Create a projection and compute its matrix.
    ///
    /// `fov` is the vertical field of view in degrees.
    pub fn new(aspect_ratio: f32, fov: f32, near: f32, far: f32) -> Self {
        let mut projection = Self {
            aspect_ratio,
            fov,
            near,
            far,
            matrix: Mat4::IDENTITY,
            bytes: [0; 64],
        };
        projection.rebuild();
        projection
    }

    /// Create a projection from settings.
    pub fn from_settings(settings: &ProjectionSettings) -> Self {
        Self::new(
            settings.aspect_ratio,
            settings.fov,
            settings.near,
            settings.far,
        )
    }

    /// Apply parameter overrides and recompute the matrix.
    pub fn update(&mut self, update: ProjectionUpdate) {
        self.aspect_ratio =
            pick("aspect_ratio", update.aspect_ratio, self.aspect_ratio);
        self.fov = pick("fov", update.fov, self.fov);
        self.near = pick("near", update.near, self.near);
        self.far = pick("far", update.far, self.far);
        self.rebuild();
    }

    fn rebuild(&mut self) {
        self.matrix = Mat4::perspective_rh_gl(
            self.fov.to_radians(),
            self.aspect_ratio,
            self.near,
            self.far,
        );
        self.bytes = bytemuck::cast(self.matrix.to_cols_array());
    }

    /// Current aspect ratio.
    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    /// Current vertical field of view in degrees.
    pub fn fov(&self) -> f32 {
        self.fov
    }

    /// Current near plane value.
    pub fn near(&self) -> f32 {
        self.near
    }

    /// Current far plane value.
    pub fn far(&self) -> f32 {
        self.far
    }

    /// Current projection matrix.
    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    /// Current projection matrix as column-major arrays.
    pub fn matrix_array(&self) -> [[f32; 4]; 4] {
        self.matrix.to_cols_array_2d()
    }

    /// The matrix as 16 native-endian `f32` values in column-major order.
    pub fn to_bytes(&self) -> &[u8; 64] {
        &self.bytes
    }

    /// `(A, B)` constants for reconstructing view depth from a depth sample:
    /// `A = far / (far - near)`, `B = far * near / (near - far)`.
    pub fn projection_constants(&self) -> (f32, f32) {
        (
            self.far / (self.far - self.near),
            (self.far * self.near) / (self.near - self.far),
        )
    }

    /// View-space distance for a `[0, 1]` depth value, `B / (depth - A)`.
    pub fn linearize_depth(&self, depth: f32) -> f32 {
        let (a, b) = self.projection_constants();
        b / (depth - a)
    }

    /// Uniform block for buffer uploads.
    pub fn uniform(&self) -> ProjectionUniform {
        let (a, b) = self.projection_constants();
        ProjectionUniform {
            projection: self.matrix_array(),
            constants: [a, b],
            near: self.near,
            far: self.far,
        }
    }
}

fn pick(name: &str, value: Option<f32>, current: f32) -> f32 {
    match value {
        Some(v) if v == 0.0 => {
            log::debug!("Ignoring zero projection override for {name}");
            current
        }
        Some(v) => v,
        None => current,
    }
}
