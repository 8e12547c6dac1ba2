//! Surface scattering models. Directions are expressed in the local shading
//! frame where the normal is `+z`, and `wi` always points away from the
//! surface towards the incident side.

mod dielectric;
mod diffuse;
mod microfacet;
mod normalmap;
mod roughdielectric;

pub use dielectric::Dielectric;
pub use diffuse::Diffuse;
pub use microfacet::Microfacet;
pub use normalmap::NormalMap;
pub use roughdielectric::RoughDielectric;

use enum_dispatch::enum_dispatch;
use geometry::frame::{cos_theta, tan_theta};
use glam::{Vec2, Vec3};
use radiometry::Color;

/// The measure underlying a scattering event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    Unknown,
    SolidAngle,
    Discrete,
}

/// Query record passed between integrators and BSDFs. `sample()` fills in
/// `wo`, `measure` and `eta`; `eval()`/`pdf()` read a complete pair.
#[derive(Debug, Clone, Copy)]
pub struct BsdfQueryRecord {
    pub wi: Vec3,
    pub wo: Vec3,
    pub uv: Vec2,
    pub measure: Measure,
    /// Relative index of refraction of the sampled transport.
    pub eta: f32,
}

impl BsdfQueryRecord {
    /// Starts a sampling query from the incident direction only.
    pub fn incident(wi: Vec3, uv: Vec2) -> BsdfQueryRecord {
        BsdfQueryRecord {
            wi,
            wo: Vec3::ZERO,
            uv,
            measure: Measure::Unknown,
            eta: 1.0,
        }
    }

    /// A complete query for evaluation against a known direction pair.
    pub fn pair(wi: Vec3, wo: Vec3, uv: Vec2, measure: Measure) -> BsdfQueryRecord {
        BsdfQueryRecord {
            wi,
            wo,
            uv,
            measure,
            eta: 1.0,
        }
    }
}

#[enum_dispatch]
pub trait BsdfModel {
    /// BSDF value for the direction pair in `rec`.
    fn eval(&self, rec: &BsdfQueryRecord) -> Color;

    /// Density realized by [`sample`](Self::sample) wrt. solid angles.
    fn pdf(&self, rec: &BsdfQueryRecord) -> f32;

    /// Importance-samples an outgoing direction, returning the BSDF value
    /// divided by the density and multiplied by the cosine foreshortening.
    fn sample(&self, rec: &mut BsdfQueryRecord, sample: Vec2) -> Color;

    /// Whether next-event estimation applies; discrete BSDFs cannot be hit
    /// by light sampling.
    fn is_diffuse(&self) -> bool {
        false
    }
}

#[enum_dispatch(BsdfModel)]
#[derive(Debug, Clone)]
pub enum Bsdf {
    Diffuse(Diffuse),
    Dielectric(Dielectric),
    RoughDielectric(RoughDielectric),
    Microfacet(Microfacet),
    NormalMap(NormalMap),
}

/// Unpolarized Fresnel reflectance of a smooth dielectric interface.
/// `cos_theta_i` may be negative for transport arriving from the interior.
pub fn fresnel(mut cos_theta_i: f32, ext_ior: f32, int_ior: f32) -> f32 {
    if ext_ior == int_ior {
        return 0.0;
    }
    let (eta_i, eta_t) = if cos_theta_i < 0.0 {
        cos_theta_i = -cos_theta_i;
        (int_ior, ext_ior)
    } else {
        (ext_ior, int_ior)
    };
    let eta = eta_i / eta_t;
    let sin2_theta_t = eta * eta * (1.0 - cos_theta_i * cos_theta_i);
    if sin2_theta_t > 1.0 {
        // Total internal reflection
        return 1.0;
    }
    let cos_theta_t = (1.0 - sin2_theta_t).sqrt();
    let rs = (eta_i * cos_theta_i - eta_t * cos_theta_t)
        / (eta_i * cos_theta_i + eta_t * cos_theta_t);
    let rp = (eta_t * cos_theta_i - eta_i * cos_theta_t)
        / (eta_t * cos_theta_i + eta_i * cos_theta_t);
    0.5 * (rs * rs + rp * rp)
}

/// Smith-style shadowing term for the Beckmann distribution, with the usual
/// rational approximation below `b = 1.6`.
pub(crate) fn beckmann_g1(wv: Vec3, wh: Vec3, alpha: f32) -> f32 {
    if wv.dot(wh) / cos_theta(wv) <= 0.0 {
        return 0.0;
    }
    let b = 1.0 / (alpha * tan_theta(wv));
    if b < 1.6 {
        (3.535 * b + 2.181 * b * b) / (1.0 + 2.276 * b + 2.577 * b * b)
    } else {
        1.0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fresnel_matched_media_is_transparent() {
        assert_eq!(fresnel(0.5, 1.5, 1.5), 0.0);
    }

    #[test]
    fn fresnel_grazing_approaches_one() {
        let f = fresnel(1e-4, 1.000277, 1.5046);
        assert!(f > 0.99, "grazing reflectance {}", f);
    }

    #[test]
    fn fresnel_normal_incidence_glass() {
        // ((n1 - n2) / (n1 + n2))^2 for air/BK7 is about 4%
        let f = fresnel(1.0, 1.000277, 1.5046);
        assert!((f - 0.04).abs() < 0.01, "normal reflectance {}", f);
    }

    #[test]
    fn fresnel_total_internal_reflection() {
        // From the dense side, beyond the critical angle.
        assert_eq!(fresnel(-0.1, 1.000277, 1.5046), 1.0);
    }

    #[test]
    fn g1_vanishes_on_backside() {
        let wh = Vec3::new(0.0, 0.0, 1.0);
        let below = Vec3::new(0.0, 0.3, -0.95).normalize();
        assert_eq!(beckmann_g1(below, wh, 0.1), 0.0);
        let above = Vec3::new(0.0, 0.3, 0.95).normalize();
        assert!(beckmann_g1(above, wh, 0.1) > 0.9);
    }
}
