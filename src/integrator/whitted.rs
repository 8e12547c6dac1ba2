use crate::bsdf::{BsdfModel, BsdfQueryRecord, Measure};
use crate::integrator::IntegratorModel;
use crate::light::{EmitterModel, EmitterQueryRecord};
use crate::sampler::Sampler;
use crate::scene::Scene;
use geometry::Ray;
use radiometry::Color;

/// Whitted-style tracer: next-event estimation on diffuse surfaces, and a
/// recursive continuation through specular ones with a fixed 95% survival
/// probability.
#[derive(Debug, Default)]
pub struct WhittedIntegrator;

impl IntegratorModel for WhittedIntegrator {
    fn li(&self, scene: &Scene, sampler: &mut Sampler, ray: &Ray) -> Color {
        let its = match scene.ray_intersect(ray) {
            Some(its) => its,
            None => return Color::black(),
        };

        let mut l = Color::black();
        if let Some(em) = its.mesh.emitter() {
            let erec = EmitterQueryRecord::new(its.p, its.sh_frame.n, 1.0);
            l += em.eval(&erec, ray.d);
        }

        let bsdf = its.mesh.bsdf();
        if bsdf.is_diffuse() {
            if let Some((light_mesh, light, light_pdf)) =
                scene.sample_emitter(sampler.next_1d())
            {
                let (erec, le) = light.sample(light_mesh.geometry(), its.p, sampler);
                let wo = (erec.p - its.p).normalize();
                let wi = -ray.d.normalize();
                let brec = BsdfQueryRecord::pair(
                    its.to_local(wi),
                    its.to_local(wo),
                    its.uv,
                    Measure::SolidAngle,
                );
                let f = bsdf.eval(&brec);
                let g = wo.dot(its.sh_frame.n).abs() * erec.n.dot(-wo).abs()
                    / (erec.p - its.p).length_squared();
                let blocked = scene.is_occluded(&Ray::segment(its.p, erec.p));
                if !blocked && erec.pdf * light_pdf > 0.0 {
                    l += f * le * (g / (erec.pdf * light_pdf));
                }
            }
            l
        } else {
            let mut brec = BsdfQueryRecord::incident(its.to_local(-ray.d.normalize()), its.uv);
            let c = bsdf.sample(&mut brec, sampler.next_2d());
            if sampler.next_1d() < 0.95 {
                let next = Ray::new(its.p, its.to_world(brec.wo.normalize()));
                c * (1.0 / 0.95) * self.li(scene, sampler, &next)
            } else {
                Color::black()
            }
        }
    }
}
