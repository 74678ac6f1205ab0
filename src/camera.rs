//! Fixed scene camera
//!
//! The camera never moves: the layout is re-centered on the origin every
//! substep and user interaction rotates the model instead. Only the aspect
//! ratio follows the viewport.

use crate::config::RenderConfig;
use crate::math::{self, Mat4, Vec3};

/// Perspective camera looking at a fixed target.
///
/// # Example
///
/// ```
/// use charmviz::camera::Camera;
/// use charmviz::config::RenderConfig;
///
/// let mut camera = Camera::new(&RenderConfig::default());
/// camera.set_viewport(1920, 1080);
///
/// let view = camera.view_matrix();
/// let projection = camera.projection_matrix();
/// assert_eq!(projection[2][3], -1.0);
/// # let _ = view;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera position in world space
    pub eye: Vec3,
    /// Point the camera looks at
    pub target: Vec3,
    pub up: Vec3,
    /// Field of view in radians
    pub fov: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,
    /// Near clip plane distance
    pub near: f32,
    /// Far clip plane distance
    pub far: f32,
}

impl Camera {
    /// Create a camera from render settings
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            eye: config.eye,
            target: config.target,
            up: config.up,
            fov: config.fov,
            aspect: aspect_ratio(config.width, config.height),
            near: config.near,
            far: config.far,
        }
    }

    /// Track the viewport size (call when the window resizes)
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = aspect_ratio(width, height);
    }

    /// Compute view matrix (world -> camera space)
    pub fn view_matrix(&self) -> Mat4 {
        math::look_at(self.eye, self.target, self.up)
    }

    /// Compute perspective projection matrix (camera -> clip space)
    pub fn projection_matrix(&self) -> Mat4 {
        math::perspective(self.fov, self.aspect, self.near, self.far)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(&RenderConfig::default())
    }
}

fn aspect_ratio(width: u32, height: u32) -> f32 {
    // A minimized window reports 0x0; keep the matrix finite
    width.max(1) as f32 / height.max(1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_defaults() {
        let camera = Camera::default();
        assert_eq!(camera.eye, [0.0, 0.0, 10.0]);
        assert_eq!(camera.target, [0.0, 0.0, 0.0]);
        assert_eq!(camera.up, [0.0, 1.0, 0.0]);
        assert!((camera.aspect - 4.0 / 3.0).abs() < 0.001);
    }

    #[test]
    fn test_camera_set_viewport() {
        let mut camera = Camera::default();
        let view_before = camera.view_matrix();

        camera.set_viewport(1600, 900);
        assert!((camera.aspect - 16.0 / 9.0).abs() < 0.001);
        // Only the projection depends on the viewport
        assert_eq!(camera.view_matrix(), view_before);
    }

    #[test]
    fn test_zero_viewport_stays_finite() {
        let mut camera = Camera::default();
        camera.set_viewport(0, 0);
        assert!(camera.projection_matrix().iter().flatten().all(|v| v.is_finite()));
    }

    #[test]
    fn test_origin_projects_to_screen_center() {
        let camera = Camera::default();
        let view = camera.view_matrix();
        let eye_space = math::transform_point(&view, [0.0, 0.0, 0.0]);
        assert!(eye_space[0].abs() < 1e-5);
        assert!(eye_space[1].abs() < 1e-5);
        assert!((eye_space[2] + 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_projection_matrix_valid() {
        let proj = Camera::default().projection_matrix();
        assert!(proj[0][0] != 0.0);
        assert!(proj[1][1] != 0.0);
        assert!(proj[2][2] != 0.0);
    }
}
