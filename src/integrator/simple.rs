use crate::integrator::IntegratorModel;
use crate::proplist::PropertyList;
use crate::sampler::Sampler;
use crate::scene::Scene;
use crate::Error;
use geometry::Ray;
use glam::Vec3;
use radiometry::Color;
use std::f32::consts::FRAC_1_PI;

/// Direct illumination from a single isotropic point light with total
/// emitted power `energy`.
#[derive(Debug)]
pub struct SimpleIntegrator {
    position: Vec3,
    energy: Color,
}

impl SimpleIntegrator {
    pub fn new(position: Vec3, energy: Color) -> SimpleIntegrator {
        SimpleIntegrator { position, energy }
    }

    pub fn from_props(props: &PropertyList) -> Result<SimpleIntegrator, Error> {
        Ok(SimpleIntegrator {
            position: props.point("position")?,
            energy: props.color("energy")?,
        })
    }
}

impl IntegratorModel for SimpleIntegrator {
    fn li(&self, scene: &Scene, _sampler: &mut Sampler, ray: &Ray) -> Color {
        let its = match scene.ray_intersect(ray) {
            Some(its) => its,
            None => return Color::black(),
        };
        let to_light = self.position - its.p;
        let dir = to_light.normalize();
        let cos_theta = dir.dot(its.sh_frame.n).max(0.0);
        // Phi / (4 pi^2) * cos(theta) / ||x - p||^2, with the unnormalized
        // distance carrying the falloff.
        let c = self.energy
            * (FRAC_1_PI * FRAC_1_PI / 4.0)
            * (cos_theta / to_light.length_squared());
        if scene.is_occluded(&Ray::new(its.p, dir)) {
            Color::black()
        } else {
            c
        }
    }
}
