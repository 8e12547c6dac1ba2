use crate::integrator::IntegratorModel;
use crate::sampler::Sampler;
use crate::scene::Scene;
use geometry::Ray;
use radiometry::Color;

/// Debug view mapping the absolute shading normal to RGB.
#[derive(Debug, Default)]
pub struct NormalsIntegrator;

impl IntegratorModel for NormalsIntegrator {
    fn li(&self, scene: &Scene, _sampler: &mut Sampler, ray: &Ray) -> Color {
        match scene.ray_intersect(ray) {
            Some(its) => {
                let n = its.sh_frame.n.abs();
                Color::new(n.x, n.y, n.z)
            }
            None => Color::black(),
        }
    }
}
