use crate::bsdf::{BsdfModel, BsdfQueryRecord, Measure};
use crate::integrator::{balance_heuristic, IntegratorModel, MAX_BOUNCES};
use crate::light::{EmitterModel, EmitterQueryRecord};
use crate::sampler::Sampler;
use crate::scene::Scene;
use geometry::Ray;
use radiometry::Color;

/// Path tracer combining material sampling and next-event estimation with
/// the balance heuristic. Emission found by the path is weighted against the
/// probability that light sampling from the previous vertex would have
/// produced the same direction, and vice versa.
#[derive(Debug, Default)]
pub struct MisPathTracer;

impl IntegratorModel for MisPathTracer {
    fn li(&self, scene: &Scene, sampler: &mut Sampler, ray: &Ray) -> Color {
        let mut ray = *ray;
        let mut l = Color::black();
        let mut beta = Color::white();
        let mut eta = 1.0f32;
        let mut bounces = 0;
        let mut specular_bounce = false;
        // Solid-angle density of the bsdf sample that produced the current
        // ray; the ray origin doubles as the previous path vertex.
        let mut prev_bpdf = 1.0f32;
        while bounces < MAX_BOUNCES {
            let wi = -ray.d.normalize();
            let its = match scene.ray_intersect(&ray) {
                Some(its) => its,
                None => break,
            };

            if let Some(em) = its.mesh.emitter() {
                if its.sh_frame.n.dot(wi) > 0.0 {
                    let mut erec =
                        EmitterQueryRecord::new(its.p, its.sh_frame.n, 1.0 / its.mesh.surface_area());
                    if bounces == 0 || specular_bounce {
                        l += em.eval(&erec, -wi) * beta;
                    } else {
                        // Area density to solid angle at the previous vertex.
                        erec.pdf *= (erec.p - ray.o).length_squared() / erec.n.dot(wi);
                        let light_pdf = if scene.light_count() != 0 {
                            1.0 / scene.light_count() as f32
                        } else {
                            1.0
                        };
                        let w_b = balance_heuristic(prev_bpdf, erec.pdf * light_pdf);
                        l += em.eval(&erec, -wi) * beta * w_b;
                    }
                }
            }

            let bsdf = its.mesh.bsdf();
            if !bsdf.is_diffuse() {
                specular_bounce = true;
            } else {
                specular_bounce = false;
                let n_lights = scene.light_count();
                if n_lights > 0 {
                    let pick = ((sampler.next_1d() * n_lights as f32) as usize).min(n_lights - 1);
                    let light_mesh = scene.light(pick);
                    if let Some(light) = light_mesh.emitter() {
                        let (mut erec, le) = light.sample(light_mesh.geometry(), its.p, sampler);
                        let wos = (erec.p - its.p).normalize();
                        let brec = BsdfQueryRecord::pair(
                            its.to_local(wi),
                            its.to_local(wos),
                            its.uv,
                            Measure::SolidAngle,
                        );
                        let f = bsdf.eval(&brec);
                        let blocked = scene.is_occluded(&Ray::segment(its.p, erec.p));
                        let bpdf = bsdf.pdf(&brec);
                        if erec.n.dot(-wos) > 0.0 {
                            let light_pdf = 1.0 / n_lights as f32;
                            erec.pdf = erec.pdf * light_pdf * (erec.p - its.p).length_squared()
                                / erec.n.dot(-wos);
                            let w_l = balance_heuristic(erec.pdf, bpdf);
                            if !blocked && erec.pdf > 0.0 {
                                l += f * le * beta
                                    * (w_l * its.sh_frame.n.dot(wos) / erec.pdf);
                            }
                        }
                    }
                }
            }

            if bounces >= 3 {
                let rr = (beta.max_component() * eta).min(0.99);
                if sampler.next_1d() > rr {
                    break;
                }
                beta = beta / rr;
            }

            let mut brec = BsdfQueryRecord::incident(its.to_local(wi), its.uv);
            beta *= bsdf.sample(&mut brec, sampler.next_2d());
            eta *= brec.eta * brec.eta;
            prev_bpdf = bsdf.pdf(&brec);
            ray = Ray::new(its.p, its.to_world(brec.wo));
            bounces += 1;
        }
        l
    }
}
