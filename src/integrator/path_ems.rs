use crate::bsdf::{BsdfModel, BsdfQueryRecord, Measure};
use crate::integrator::{IntegratorModel, MAX_BOUNCES};
use crate::light::{EmitterModel, EmitterQueryRecord};
use crate::sampler::Sampler;
use crate::scene::Scene;
use geometry::Ray;
use radiometry::Color;

/// Path tracer with next-event estimation at every diffuse vertex. Emission
/// found by the path itself only counts for camera rays and after specular
/// bounces, where light sampling had no chance to see it.
#[derive(Debug, Default)]
pub struct EmitterPathTracer;

impl IntegratorModel for EmitterPathTracer {
    fn li(&self, scene: &Scene, sampler: &mut Sampler, ray: &Ray) -> Color {
        let mut ray = *ray;
        let mut l = Color::black();
        let mut beta = Color::white();
        let mut eta = 1.0f32;
        let mut bounces = 0;
        let mut specular_bounce = false;
        while bounces < MAX_BOUNCES {
            let wi = -ray.d.normalize();
            let its = match scene.ray_intersect(&ray) {
                Some(its) => its,
                None => break,
            };

            if bounces == 0 || specular_bounce {
                if let Some(em) = its.mesh.emitter() {
                    if its.sh_frame.n.dot(wi) > 0.0 {
                        let erec = EmitterQueryRecord::new(its.p, its.sh_frame.n, 1.0);
                        l += em.eval(&erec, -wi) * beta;
                    }
                }
            }

            let bsdf = its.mesh.bsdf();
            if !bsdf.is_diffuse() {
                specular_bounce = true;
            } else {
                specular_bounce = false;
                if let Some((light_mesh, light, light_pdf)) =
                    scene.sample_emitter(sampler.next_1d())
                {
                    let (erec, le) = light.sample(light_mesh.geometry(), its.p, sampler);
                    let wos = (erec.p - its.p).normalize();
                    let brec = BsdfQueryRecord::pair(
                        its.to_local(wi),
                        its.to_local(wos),
                        its.uv,
                        Measure::SolidAngle,
                    );
                    let f = bsdf.eval(&brec);
                    let g = wos.dot(its.sh_frame.n).abs() * erec.n.dot(-wos).abs()
                        / (erec.p - its.p).length_squared();
                    let blocked = scene.is_occluded(&Ray::segment(its.p, erec.p));
                    if !blocked && erec.pdf * light_pdf > 0.0 {
                        l += f * le * beta * (g / (erec.pdf * light_pdf));
                    }
                }
            }

            if bounces >= 3 {
                let rr = (beta.max_component() * eta * eta).min(0.99);
                if sampler.next_1d() > rr {
                    break;
                }
                beta = beta / rr;
            }

            let mut brec = BsdfQueryRecord::incident(its.to_local(wi), its.uv);
            beta *= bsdf.sample(&mut brec, sampler.next_2d());
            eta *= brec.eta;
            ray = Ray::new(its.p, its.to_world(brec.wo));
            bounces += 1;
        }
        l
    }
}
