pub mod distrib;
pub mod float;
pub mod warp;

pub use glam::{Vec2, Vec3};

/// Makes a `Vec3` without spelling out the full constructor path.
pub fn vec3(x: f32, y: f32, z: f32) -> Vec3 {
    Vec3::new(x, y, z)
}

pub fn vec2(x: f32, y: f32) -> Vec2 {
    Vec2::new(x, y)
}
