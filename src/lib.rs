pub mod accel;
pub mod bsdf;
pub mod camera;
pub mod integrator;
pub mod light;
pub mod mesh;
pub mod proplist;
pub mod sampler;
pub mod scene;
pub mod texture;

pub use proplist::{Error, PropertyList};
