pub mod bbox;
pub mod frame;
pub mod mesh;
pub mod ray;

pub use bbox::Bbox;
pub use frame::Frame;
pub use mesh::TriMesh;
pub use ray::Ray;
