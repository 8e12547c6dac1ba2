use crate::bsdf::{BsdfModel, BsdfQueryRecord};
use crate::integrator::{IntegratorModel, MAX_BOUNCES};
use crate::light::{EmitterModel, EmitterQueryRecord};
use crate::sampler::Sampler;
use crate::scene::Scene;
use geometry::Ray;
use radiometry::Color;

/// Path tracer driven purely by material sampling: emission is collected
/// whenever the path happens to land on a light's front side.
#[derive(Debug, Default)]
pub struct MaterialPathTracer;

impl IntegratorModel for MaterialPathTracer {
    fn li(&self, scene: &Scene, sampler: &mut Sampler, ray: &Ray) -> Color {
        let mut ray = *ray;
        let mut l = Color::black();
        let mut beta = Color::white();
        let mut eta = 1.0f32;
        let mut bounces = 0;
        while bounces < MAX_BOUNCES {
            let wi = -ray.d.normalize();
            let its = match scene.ray_intersect(&ray) {
                Some(its) => its,
                None => break,
            };

            if let Some(em) = its.mesh.emitter() {
                if its.sh_frame.n.dot(wi) > 0.0 {
                    let erec = EmitterQueryRecord::new(its.p, its.sh_frame.n, 1.0);
                    l += em.eval(&erec, -wi) * beta;
                }
            }

            let bsdf = its.mesh.bsdf();
            let mut brec = BsdfQueryRecord::incident(its.to_local(wi), its.uv);
            beta *= bsdf.sample(&mut brec, sampler.next_2d());
            eta *= brec.eta;
            ray = Ray::new(its.p, its.to_world(brec.wo));

            // Russian roulette from the fourth bounce; survival follows the
            // remaining throughput corrected for refraction.
            if bounces >= 3 {
                let rr = (beta.max_component() * eta * eta).min(0.99);
                if sampler.next_1d() > rr {
                    break;
                }
                beta = beta / rr;
            }
            bounces += 1;
        }
        l
    }
}
