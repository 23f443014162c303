//! Perspective camera looking at the field from +Z.

use glam::{Mat4, Vec3};

use crate::config::CameraConfig;

/// Fixed perspective camera.
///
/// The projection is cached and only recomputed by
/// [`update_projection_matrix`](Self::update_projection_matrix), so callers
/// that change a public field must call it afterwards.
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    /// Viewport width over height.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    projection: Mat4,
}

impl PerspectiveCamera {
    /// Create a camera for a viewport of the given size.
    pub fn new(config: &CameraConfig, width: u32, height: u32) -> Self {
        let mut camera = Self {
            fov_y_degrees: config.fov_y_degrees,
            aspect: 1.0,
            near: config.near,
            far: config.far,
            position: Vec3::new(0.0, 0.0, config.distance),
            projection: Mat4::IDENTITY,
        };
        camera.set_viewport(width, height);
        camera.update_projection_matrix();
        camera
    }

    /// Match the aspect ratio to a resized viewport.
    ///
    /// A zero-height viewport (minimised window) keeps the previous aspect.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
        self.update_projection_matrix();
    }

    /// Recompute the cached projection from the public fields.
    pub fn update_projection_matrix(&mut self) {
        self.projection = Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        );
    }

    #[inline]
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    /// Look down -Z with +Y up.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position - Vec3::Z, Vec3::Y)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }
}
