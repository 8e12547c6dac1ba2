use crate::bsdf::dielectric::sample_smooth_dielectric;
use crate::bsdf::{beckmann_g1, fresnel, BsdfModel, BsdfQueryRecord};
use crate::proplist::PropertyList;
use crate::Error;
use geometry::frame::cos_theta;
use glam::{Vec2, Vec3};
use math::float::try_divide;
use math::warp;
use radiometry::Color;

/// Rough dielectric with a Beckmann microfacet distribution. Evaluation and
/// density cover both the reflection and the transmission lobe through their
/// respective half-vector Jacobians; sampling falls back to the smooth
/// reflect-or-refract decision.
#[derive(Debug, Clone)]
pub struct RoughDielectric {
    int_ior: f32,
    ext_ior: f32,
    alpha: f32,
}

impl Default for RoughDielectric {
    fn default() -> Self {
        RoughDielectric {
            int_ior: 1.5046,
            ext_ior: 1.000277,
            alpha: 0.1,
        }
    }
}

impl RoughDielectric {
    pub fn new(int_ior: f32, ext_ior: f32, alpha: f32) -> RoughDielectric {
        RoughDielectric {
            int_ior,
            ext_ior,
            alpha,
        }
    }

    pub fn from_props(props: &PropertyList) -> Result<RoughDielectric, Error> {
        Ok(RoughDielectric {
            int_ior: props.float_or("int_ior", 1.5046)?,
            ext_ior: props.float_or("ext_ior", 1.000277)?,
            alpha: props.float_or("alpha", 0.1)?,
        })
    }

    /// Density of visible microfacet normals around `wh` as seen from `w`.
    fn visible_normal_density(&self, w: Vec3, wh: Vec3) -> f32 {
        beckmann_g1(w, wh, self.alpha) / cos_theta(w).abs()
            * warp::square_to_beckmann_pdf(wh, self.alpha)
            * w.dot(wh).abs()
    }

    /// Half-vector for the direction pair, generalized to refraction, and
    /// the interior/exterior IOR ratio that produced it.
    fn half_vector(&self, rec: &BsdfQueryRecord) -> (Vec3, f32, bool) {
        let cos_i = cos_theta(rec.wi);
        let cos_o = cos_theta(rec.wo);
        let reflect = cos_i * cos_o > 0.0;
        let mut eta = self.int_ior / self.ext_ior;
        let wh = if reflect {
            (rec.wi + rec.wo).normalize()
        } else {
            if cos_o <= 0.0 {
                eta = 1.0 / eta;
            }
            (rec.wo * eta + rec.wi).normalize()
        };
        (wh, eta, reflect)
    }
}

impl BsdfModel for RoughDielectric {
    fn eval(&self, rec: &BsdfQueryRecord) -> Color {
        let cos_i = cos_theta(rec.wi);
        let cos_o = cos_theta(rec.wo);
        if cos_i == 0.0 || cos_o == 0.0 {
            return Color::black();
        }
        let (wh, eta, reflect) = self.half_vector(rec);
        if !wh.is_finite() || wh.dot(rec.wi) * cos_i < 0.0 || wh.dot(rec.wo) * cos_o < 0.0 {
            return Color::black();
        }
        let f = fresnel(wh.dot(rec.wi), self.ext_ior, self.int_ior);
        let d = warp::square_to_beckmann_pdf(wh, self.alpha);
        let g = beckmann_g1(rec.wi, wh, self.alpha) * beckmann_g1(rec.wo, wh, self.alpha);
        if reflect {
            Color::white() * try_divide(d * f * g, 4.0 * cos_i * cos_o).unwrap_or(0.0)
        } else {
            let denom = {
                let s = rec.wo.dot(wh) + rec.wi.dot(wh) / eta;
                s * s * cos_i * cos_o
            };
            let transfer = try_divide(rec.wo.dot(wh) * rec.wi.dot(wh), denom)
                .unwrap_or(0.0)
                .abs();
            Color::white() * (d * (1.0 - f) * g * transfer)
        }
    }

    fn pdf(&self, rec: &BsdfQueryRecord) -> f32 {
        let cos_i = cos_theta(rec.wi);
        let cos_o = cos_theta(rec.wo);
        if cos_i == 0.0 || cos_o == 0.0 {
            return 0.0;
        }
        let (wh, eta, reflect) = self.half_vector(rec);
        if !wh.is_finite() || wh.dot(rec.wi) * cos_i < 0.0 || wh.dot(rec.wo) * cos_o < 0.0 {
            return 0.0;
        }
        let r = fresnel(wh.dot(rec.wi), self.ext_ior, self.int_ior);
        if reflect {
            let jacobian =
                try_divide(1.0, 4.0 * rec.wi.dot(wh).abs()).unwrap_or(0.0);
            self.visible_normal_density(rec.wi, wh) * jacobian * r
        } else {
            let denom = rec.wo.dot(wh) + rec.wi.dot(wh) / eta;
            let dwh_dwo = try_divide(rec.wo.dot(wh).abs(), denom * denom).unwrap_or(0.0);
            self.visible_normal_density(rec.wi, wh) * dwh_dwo * (1.0 - r)
        }
    }

    fn sample(&self, rec: &mut BsdfQueryRecord, sample: Vec2) -> Color {
        sample_smooth_dielectric(rec, sample, self.ext_ior, self.int_ior)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bsdf::Measure;
    use math::{vec2, vec3};

    #[test]
    fn reflection_pair_has_positive_value_and_density() {
        let rd = RoughDielectric::default();
        let wi = vec3(0.3, 0.0, 0.95).normalize();
        let wo = vec3(-0.3, 0.0, 0.95).normalize();
        let rec = BsdfQueryRecord::pair(wi, wo, vec2(0.0, 0.0), Measure::SolidAngle);
        assert!(rd.eval(&rec).r > 0.0);
        assert!(rd.pdf(&rec) > 0.0);
    }

    #[test]
    fn transmission_pair_uses_the_refraction_lobe() {
        let rd = RoughDielectric::default();
        let eta = 1.5046 / 1.000277;
        // A Snell-consistent pair through the surface.
        let sin_i = 0.3f32;
        let sin_t = sin_i / eta;
        let wi = vec3(sin_i, 0.0, (1.0 - sin_i * sin_i).sqrt());
        let wo = vec3(-sin_t, 0.0, -(1.0 - sin_t * sin_t).sqrt());
        let rec = BsdfQueryRecord::pair(wi, wo, vec2(0.0, 0.0), Measure::SolidAngle);
        assert!(rd.eval(&rec).r > 0.0);
        assert!(rd.pdf(&rec) > 0.0);
    }

    #[test]
    fn mismatched_sides_are_rejected() {
        let rd = RoughDielectric::default();
        // wo on the far side of the half-vector from wi's hemisphere.
        let wi = vec3(0.9, 0.0, 0.43).normalize();
        let wo = vec3(0.9, 0.0, -0.43).normalize();
        let rec = BsdfQueryRecord::pair(wi, wo, vec2(0.0, 0.0), Measure::SolidAngle);
        // Either lobe may reject the pair; the two must agree.
        assert_eq!(rd.eval(&rec).is_black(), rd.pdf(&rec) == 0.0);
    }

    #[test]
    fn grazing_directions_evaluate_to_zero() {
        // An in-plane direction zeroes the cosine denominators; the value
        // and density must collapse to zero rather than overflow.
        let rd = RoughDielectric::default();
        let wi = vec3(1.0, 0.0, 0.0);
        let wo = vec3(0.3, 0.0, 0.95).normalize();
        let rec = BsdfQueryRecord::pair(wi, wo, vec2(0.0, 0.0), Measure::SolidAngle);
        let v = rd.eval(&rec);
        assert!(v.is_black(), "got {:?}", v);
        assert!(v.is_finite());
        assert_eq!(rd.pdf(&rec), 0.0);
    }

    #[test]
    fn sample_is_the_smooth_decision() {
        let rd = RoughDielectric::default();
        let wi = vec3(0.3, 0.0, 0.95).normalize();
        let mut rec = BsdfQueryRecord::incident(wi, vec2(0.0, 0.0));
        let w = rd.sample(&mut rec, vec2(0.0, 0.5));
        assert_eq!(w, Color::white());
        assert_eq!(rec.measure, Measure::Discrete);
        assert!((rec.wo - vec3(-wi.x, -wi.y, wi.z)).length() < 1e-6);
    }
}
