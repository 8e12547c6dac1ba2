//! Light-transport strategies. Each integrator estimates the radiance
//! arriving along a camera ray; the path tracers differ only in how they
//! combine material sampling with next-event estimation.

mod ao;
mod normals;
mod path_ems;
mod path_mats;
mod path_mis;
mod simple;
mod whitted;

pub use ao::AoIntegrator;
pub use normals::NormalsIntegrator;
pub use path_ems::EmitterPathTracer;
pub use path_mats::MaterialPathTracer;
pub use path_mis::MisPathTracer;
pub use simple::SimpleIntegrator;
pub use whitted::WhittedIntegrator;

use crate::proplist::PropertyList;
use crate::sampler::Sampler;
use crate::scene::Scene;
use crate::Error;
use enum_dispatch::enum_dispatch;
use geometry::Ray;
use radiometry::Color;

/// Hard cap on path length shared by all path tracers.
pub(crate) const MAX_BOUNCES: u32 = 50;

/// Balance heuristic for combining two sampling strategies.
pub(crate) fn balance_heuristic(f: f32, g: f32) -> f32 {
    if f + g != 0.0 {
        f / (f + g)
    } else {
        0.0
    }
}

#[enum_dispatch]
pub trait IntegratorModel {
    /// Estimates the radiance arriving at the ray origin from its direction.
    fn li(&self, scene: &Scene, sampler: &mut Sampler, ray: &Ray) -> Color;
}

#[enum_dispatch(IntegratorModel)]
pub enum Integrator {
    Normals(NormalsIntegrator),
    Simple(SimpleIntegrator),
    Ao(AoIntegrator),
    Whitted(WhittedIntegrator),
    PathMats(MaterialPathTracer),
    PathEms(EmitterPathTracer),
    PathMis(MisPathTracer),
}

impl Integrator {
    pub fn from_name(name: &str, props: &PropertyList) -> Result<Integrator, Error> {
        Ok(match name {
            "normals" => NormalsIntegrator.into(),
            "simple" => SimpleIntegrator::from_props(props)?.into(),
            "ao" => AoIntegrator.into(),
            "whitted" => WhittedIntegrator.into(),
            "path_mats" => MaterialPathTracer.into(),
            "path_ems" => EmitterPathTracer.into(),
            "path_mis" => MisPathTracer.into(),
            other => return Err(Error::UnknownComponent(other.to_owned())),
        })
    }
}
