//! Orthographic camera for normalized 2D simulations

use glam::{Mat4, Vec2};

/// Keeps the square `[-extent, extent]²` around `center` fully visible.
///
/// The shorter window axis spans exactly the square; the longer one shows
/// extra room instead of stretching the scene, so circles stay round.
#[derive(Debug, Clone)]
pub struct Camera2D {
    pub center: Vec2,
    pub extent: f32,
    pub aspect_ratio: f32,
}

impl Camera2D {
    pub fn new(aspect_ratio: f32, extent: f32) -> Self {
        Self {
            center: Vec2::ZERO,
            extent,
            aspect_ratio,
        }
    }

    /// Half width and half height of the visible region
    pub fn half_size(&self) -> Vec2 {
        if self.aspect_ratio >= 1.0 {
            Vec2::new(self.extent * self.aspect_ratio, self.extent)
        } else {
            Vec2::new(self.extent, self.extent / self.aspect_ratio)
        }
    }

    pub fn view_projection(&self) -> Mat4 {
        let half = self.half_size();
        let projection = Mat4::orthographic_rh(-half.x, half.x, -half.y, half.y, -1.0, 1.0);
        let view = Mat4::from_translation(-self.center.extend(0.0));
        projection * view
    }

    pub fn update_aspect_ratio(&mut self, aspect_ratio: f32) {
        if aspect_ratio.is_finite() && aspect_ratio > 0.0 {
            self.aspect_ratio = aspect_ratio;
        }
    }
}

/// Camera uniform data for shaders
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn from_camera_2d(camera: &Camera2D) -> Self {
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
        }
    }
}
