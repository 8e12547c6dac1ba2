use geometry::Ray;
use glam::{Mat3, Vec2, Vec3};

/// Pinhole perspective camera: x rightward, y upward, z forward in camera
/// space. Pixel (0, 0) is the top-left corner of the film.
pub struct Camera {
    center: Vec3,
    a: Vec3,
    b: Vec3,
    c: Vec3,
    width: u32,
    height: u32,
    orientation: Mat3,
}

impl Camera {
    /// `fov_y` is the vertical field of view in radians.
    pub fn new((width, height): (u32, u32), fov_y: f32) -> Camera {
        let aspect_ratio = width as f32 / height as f32;
        let half_vertical = (fov_y * 0.5).tan();
        let half_horizontal = half_vertical * aspect_ratio;
        Camera {
            center: Vec3::ZERO,
            a: Vec3::new(2.0 * half_horizontal / width as f32, 0.0, 0.0),
            b: Vec3::new(0.0, -2.0 * half_vertical / height as f32, 0.0),
            c: Vec3::new(-half_horizontal, half_vertical, 1.0),
            width,
            height,
            orientation: Mat3::IDENTITY,
        }
    }

    pub fn looking_at(self, from: Vec3, target: Vec3, up: Vec3) -> Camera {
        let forward = (target - from).normalize();
        let right = up.cross(forward).normalize();
        let up = forward.cross(right);
        Camera {
            orientation: Mat3::from_cols(right, up, forward),
            center: from,
            ..self
        }
    }

    /// Ray through pixel `(col, row)`, jittered inside the pixel by the unit
    /// square sample.
    pub fn shoot_ray(&self, row: u32, col: u32, jitter: Vec2) -> Option<Ray> {
        if row >= self.height || col >= self.width {
            return None;
        }
        let x = col as f32 + jitter.x.fract();
        let y = row as f32 + jitter.y.fract();
        let dir = self.orientation * (self.c + self.a * x + self.b * y);
        Some(Ray::new(self.center, dir.normalize()))
    }

    /// Film resolution, width by height.
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
