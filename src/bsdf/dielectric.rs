use crate::bsdf::{fresnel, BsdfModel, BsdfQueryRecord, Measure};
use crate::proplist::PropertyList;
use crate::Error;
use geometry::frame::cos_theta;
use glam::{Vec2, Vec3};
use math::float::safe_sqrt;
use radiometry::Color;

/// Ideal smooth dielectric. Scattering is a discrete choice between mirror
/// reflection and refraction, made with the Fresnel reflectance as the
/// probability, so the returned weight is always one.
#[derive(Debug, Clone)]
pub struct Dielectric {
    int_ior: f32,
    ext_ior: f32,
}

impl Default for Dielectric {
    fn default() -> Self {
        // BK7 glass in air
        Dielectric {
            int_ior: 1.5046,
            ext_ior: 1.000277,
        }
    }
}

impl Dielectric {
    pub fn new(int_ior: f32, ext_ior: f32) -> Dielectric {
        Dielectric { int_ior, ext_ior }
    }

    pub fn from_props(props: &PropertyList) -> Result<Dielectric, Error> {
        Ok(Dielectric {
            int_ior: props.float_or("int_ior", 1.5046)?,
            ext_ior: props.float_or("ext_ior", 1.000277)?,
        })
    }
}

/// Discrete reflect-or-refract sample shared with the rough variant.
pub(crate) fn sample_smooth_dielectric(
    rec: &mut BsdfQueryRecord,
    sample: Vec2,
    ext_ior: f32,
    int_ior: f32,
) -> Color {
    rec.measure = Measure::Discrete;
    let r = fresnel(cos_theta(rec.wi), ext_ior, int_ior);
    if sample.x < r {
        rec.wo = Vec3::new(-rec.wi.x, -rec.wi.y, rec.wi.z);
        return Color::white();
    }
    let mut n = Vec3::new(0.0, 0.0, 1.0);
    let mut eta = int_ior / ext_ior;
    let mut cos_theta_i = cos_theta(rec.wi);
    if cos_theta_i < 0.0 {
        eta = 1.0 / eta;
        n.z = -1.0;
        cos_theta_i = -cos_theta_i;
    }
    let sin2_theta_i = (1.0 - cos_theta_i * cos_theta_i).max(0.0);
    let sin2_theta_t = sin2_theta_i / (eta * eta);
    let cos_theta_t = safe_sqrt(1.0 - sin2_theta_t);
    rec.wo = -(rec.wi / eta) + (cos_theta_i / eta - cos_theta_t) * n;
    rec.eta = eta;
    Color::white()
}

impl BsdfModel for Dielectric {
    fn eval(&self, _rec: &BsdfQueryRecord) -> Color {
        // Discrete BSDFs always evaluate to zero.
        Color::black()
    }

    fn pdf(&self, _rec: &BsdfQueryRecord) -> f32 {
        0.0
    }

    fn sample(&self, rec: &mut BsdfQueryRecord, sample: Vec2) -> Color {
        sample_smooth_dielectric(rec, sample, self.ext_ior, self.int_ior)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use math::{vec2, vec3};

    #[test]
    fn low_variate_reflects() {
        let d = Dielectric::default();
        let wi = vec3(0.3, 0.0, 0.95).normalize();
        let mut rec = BsdfQueryRecord::incident(wi, vec2(0.0, 0.0));
        let w = d.sample(&mut rec, vec2(0.0, 0.5));
        assert_eq!(w, Color::white());
        assert_eq!(rec.measure, Measure::Discrete);
        // Mirror direction about the normal.
        assert!((rec.wo - vec3(-wi.x, -wi.y, wi.z)).length() < 1e-6);
        assert_eq!(rec.eta, 1.0);
    }

    #[test]
    fn high_variate_refracts_into_the_glass() {
        let d = Dielectric::default();
        let wi = vec3(0.3, 0.0, 0.95).normalize();
        let mut rec = BsdfQueryRecord::incident(wi, vec2(0.0, 0.0));
        d.sample(&mut rec, vec2(0.999, 0.5));
        assert!(cos_theta(rec.wo) < 0.0, "refracted ray must cross the surface");
        assert!((rec.eta - 1.5046 / 1.000277).abs() < 1e-4);
        // Snell: sin(theta_i) = eta * sin(theta_t)
        let sin_i = wi.x.abs();
        let sin_t = (rec.wo.x * rec.wo.x + rec.wo.y * rec.wo.y).sqrt()
            / rec.wo.length();
        assert!((sin_i - rec.eta * sin_t).abs() < 1e-4);
    }

    #[test]
    fn interior_incidence_flips_the_ratio() {
        let d = Dielectric::default();
        let wi = vec3(0.1, 0.0, -1.0).normalize();
        let mut rec = BsdfQueryRecord::incident(wi, vec2(0.0, 0.0));
        d.sample(&mut rec, vec2(0.999, 0.5));
        assert!((rec.eta - 1.000277 / 1.5046).abs() < 1e-4);
        assert!(cos_theta(rec.wo) > 0.0);
    }

    #[test]
    fn discrete_queries_evaluate_to_zero() {
        let d = Dielectric::default();
        let up = vec3(0.0, 0.0, 1.0);
        let rec = BsdfQueryRecord::pair(up, up, vec2(0.0, 0.0), Measure::SolidAngle);
        assert!(d.eval(&rec).is_black());
        assert_eq!(d.pdf(&rec), 0.0);
        assert!(!d.is_diffuse());
    }
}
