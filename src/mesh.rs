use crate::bsdf::Bsdf;
use crate::light::Emitter;
use geometry::{Frame, TriMesh};
use glam::{Vec2, Vec3};

/// A triangle mesh bound to a scattering model and, optionally, an emitter
/// that turns the whole surface into an area light.
pub struct Mesh {
    geometry: TriMesh,
    bsdf: Bsdf,
    emitter: Option<Emitter>,
}

impl Mesh {
    pub fn new(geometry: TriMesh, bsdf: Bsdf) -> Mesh {
        Mesh {
            geometry,
            bsdf,
            emitter: None,
        }
    }

    pub fn with_emitter(geometry: TriMesh, bsdf: Bsdf, emitter: Emitter) -> Mesh {
        Mesh {
            geometry,
            bsdf,
            emitter: Some(emitter),
        }
    }

    pub fn geometry(&self) -> &TriMesh {
        &self.geometry
    }

    pub fn bsdf(&self) -> &Bsdf {
        &self.bsdf
    }

    pub fn emitter(&self) -> Option<&Emitter> {
        self.emitter.as_ref()
    }

    pub fn is_emitter(&self) -> bool {
        self.emitter.is_some()
    }

    pub fn surface_area(&self) -> f32 {
        self.geometry.total_area()
    }
}

/// A completed surface hit. `uv` holds interpolated texture coordinates when
/// the mesh carries them, and the raw barycentric pair otherwise.
pub struct Intersection<'a> {
    pub t: f32,
    pub p: Vec3,
    pub uv: Vec2,
    pub geo_frame: Frame,
    pub sh_frame: Frame,
    pub mesh: &'a Mesh,
}

impl<'a> Intersection<'a> {
    pub fn to_local(&self, v: Vec3) -> Vec3 {
        self.sh_frame.to_local(v)
    }

    pub fn to_world(&self, v: Vec3) -> Vec3 {
        self.sh_frame.to_world(v)
    }
}
