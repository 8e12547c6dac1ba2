use crate::integrator::IntegratorModel;
use crate::sampler::Sampler;
use crate::scene::Scene;
use geometry::Ray;
use math::warp;
use radiometry::Color;
use std::f32::consts::FRAC_1_PI;

/// Ambient occlusion: one cosine-weighted visibility sample per camera ray.
#[derive(Debug, Default)]
pub struct AoIntegrator;

impl IntegratorModel for AoIntegrator {
    fn li(&self, scene: &Scene, sampler: &mut Sampler, ray: &Ray) -> Color {
        let its = match scene.ray_intersect(ray) {
            Some(its) => its,
            None => return Color::black(),
        };
        let dir = its
            .sh_frame
            .to_world(warp::square_to_cosine_hemisphere(sampler.next_2d()))
            .normalize();
        let cos_theta = dir.dot(its.sh_frame.n).max(0.0);
        if scene.is_occluded(&Ray::new(its.p, dir)) {
            Color::black()
        } else {
            Color::gray(cos_theta * FRAC_1_PI)
        }
    }
}
