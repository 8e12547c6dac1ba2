use crate::proplist::PropertyList;
use crate::sampler::Sampler;
use crate::Error;
use enum_dispatch::enum_dispatch;
use geometry::TriMesh;
use glam::Vec3;
use radiometry::Color;

/// A sampled point on an emitter, with its density wrt. surface area.
#[derive(Debug, Clone, Copy)]
pub struct EmitterQueryRecord {
    pub p: Vec3,
    pub n: Vec3,
    pub pdf: f32,
}

impl EmitterQueryRecord {
    pub fn new(p: Vec3, n: Vec3, pdf: f32) -> EmitterQueryRecord {
        EmitterQueryRecord { p, n, pdf }
    }
}

#[enum_dispatch]
pub trait EmitterModel {
    /// Samples a point on the emitting shape as seen from `p`, returning the
    /// radiance carried towards `p`.
    fn sample(
        &self,
        shape: &TriMesh,
        p: Vec3,
        sampler: &mut Sampler,
    ) -> (EmitterQueryRecord, Color);

    /// Radiance leaving the record's point in direction `wi`.
    fn eval(&self, rec: &EmitterQueryRecord, wi: Vec3) -> Color;

    fn pdf(&self, rec: &EmitterQueryRecord) -> f32;
}

#[enum_dispatch(EmitterModel)]
#[derive(Debug, Clone)]
pub enum Emitter {
    Area(AreaLight),
}

/// Uniform diffuse area light attached to a mesh.
#[derive(Debug, Clone)]
pub struct AreaLight {
    radiance: Color,
}

impl AreaLight {
    pub fn new(radiance: Color) -> AreaLight {
        AreaLight { radiance }
    }

    pub fn from_props(props: &PropertyList) -> Result<AreaLight, Error> {
        Ok(AreaLight {
            radiance: props.color("radiance")?,
        })
    }

    pub fn radiance(&self) -> Color {
        self.radiance
    }
}

impl EmitterModel for AreaLight {
    fn sample(
        &self,
        shape: &TriMesh,
        p: Vec3,
        sampler: &mut Sampler,
    ) -> (EmitterQueryRecord, Color) {
        let s = shape.sample_surface(sampler.next_1d(), sampler.next_2d());
        let rec = EmitterQueryRecord::new(s.p, s.n, s.pdf);
        let wi = (rec.p - p).normalize();
        let value = self.eval(&rec, wi);
        (rec, value)
    }

    fn eval(&self, rec: &EmitterQueryRecord, wi: Vec3) -> Color {
        // Emission only on the front side; wi points away from the light's
        // normal when the receiver is in front.
        if wi.dot(rec.n) < 0.0 {
            self.radiance
        } else {
            Color::black()
        }
    }

    fn pdf(&self, rec: &EmitterQueryRecord) -> f32 {
        rec.pdf
    }
}
