use crate::bsdf::{Bsdf, BsdfModel, BsdfQueryRecord, Measure};
use crate::texture::{Texture, TextureModel};
use geometry::frame::cos_theta;
use geometry::Frame;
use glam::{Vec2, Vec3};
use radiometry::Color;

/// Decorator that perturbs the shading frame with a tangent-space normal
/// map before delegating to a nested BSDF. Texels store normals remapped to
/// `[0, 1]`, so `2 * texel - 1` recovers the direction.
#[derive(Debug, Clone)]
pub struct NormalMap {
    map: Texture,
    nested: Box<Bsdf>,
}

impl NormalMap {
    pub fn new(map: Texture, nested: Bsdf) -> NormalMap {
        NormalMap {
            map,
            nested: Box::new(nested),
        }
    }

    /// Frame of the perturbed normal, expressed in the current shading frame.
    fn perturbed(&self, uv: Vec2) -> Frame {
        let c = self.map.eval(uv) * 2.0 - Color::white();
        Frame::from_normal(Vec3::new(c.r, c.g, c.b).normalize())
    }
}

impl BsdfModel for NormalMap {
    fn eval(&self, rec: &BsdfQueryRecord) -> Color {
        let prev_cos = cos_theta(rec.wo);
        if prev_cos == 0.0 {
            return Color::black();
        }
        let frame = self.perturbed(rec.uv);
        let inner = BsdfQueryRecord::pair(
            frame.to_local(rec.wi).normalize(),
            frame.to_local(rec.wo).normalize(),
            rec.uv,
            Measure::SolidAngle,
        );
        // Directions that the perturbation flipped across the surface carry
        // no energy.
        if cos_theta(inner.wo) * prev_cos <= 0.0 {
            return Color::black();
        }
        self.nested.eval(&inner) * (cos_theta(inner.wo) / prev_cos)
    }

    fn pdf(&self, rec: &BsdfQueryRecord) -> f32 {
        let frame = self.perturbed(rec.uv);
        let inner = BsdfQueryRecord::pair(
            frame.to_local(rec.wi).normalize(),
            frame.to_local(rec.wo).normalize(),
            rec.uv,
            Measure::SolidAngle,
        );
        if cos_theta(inner.wo) * cos_theta(rec.wo) <= 0.0 {
            return 0.0;
        }
        self.nested.pdf(&inner)
    }

    fn sample(&self, rec: &mut BsdfQueryRecord, sample: Vec2) -> Color {
        let frame = self.perturbed(rec.uv);
        let mut inner = BsdfQueryRecord::incident(frame.to_local(rec.wi).normalize(), rec.uv);
        let mut result = self.nested.sample(&mut inner, sample);
        rec.wo = frame.to_world(inner.wo);
        if cos_theta(inner.wo) * cos_theta(rec.wo) <= 0.0 {
            result = Color::black();
        }
        rec.eta = 1.0;
        rec.measure = Measure::SolidAngle;
        result
    }

    fn is_diffuse(&self) -> bool {
        self.nested.is_diffuse()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bsdf::Diffuse;
    use crate::texture::ConstantTexture;
    use math::{vec2, vec3};
    use std::f32::consts::FRAC_1_PI;

    fn flat_map() -> Texture {
        // Encodes the unperturbed normal (0, 0, 1).
        ConstantTexture::new(Color::new(0.5, 0.5, 1.0)).into()
    }

    #[test]
    fn identity_map_reduces_to_the_nested_bsdf() {
        let nm = NormalMap::new(flat_map(), Diffuse::new(Color::white()).into());
        let up = vec3(0.0, 0.0, 1.0);
        let rec = BsdfQueryRecord::pair(up, up, vec2(0.0, 0.0), Measure::SolidAngle);
        assert!((nm.eval(&rec).r - FRAC_1_PI).abs() < 1e-5);
        assert!((nm.pdf(&rec) - FRAC_1_PI).abs() < 1e-5);
        assert!(nm.is_diffuse());
    }

    #[test]
    fn tilted_map_rescales_by_the_cosine_ratio() {
        // Normal tilted towards +x.
        let tilted = ConstantTexture::new(Color::new(0.75, 0.5, 0.933)).into();
        let nm = NormalMap::new(tilted, Diffuse::new(Color::white()).into());
        let up = vec3(0.0, 0.0, 1.0);
        let rec = BsdfQueryRecord::pair(up, up, vec2(0.0, 0.0), Measure::SolidAngle);
        let v = nm.eval(&rec);
        assert!(v.r > 0.0);
        assert!(v.r < FRAC_1_PI, "tilt reduces the effective cosine");
    }

    #[test]
    fn flipped_directions_carry_no_energy() {
        // Normal rotated almost into the surface plane.
        let sideways = ConstantTexture::new(Color::new(1.0, 0.5, 0.505)).into();
        let nm = NormalMap::new(sideways, Diffuse::new(Color::white()).into());
        let wi = vec3(0.0, 0.0, 1.0);
        // wo grazing in -x ends up below the perturbed surface.
        let wo = vec3(-0.995, 0.0, 0.0999).normalize();
        let rec = BsdfQueryRecord::pair(wi, wo, vec2(0.0, 0.0), Measure::SolidAngle);
        assert!(nm.eval(&rec).is_black());
        assert_eq!(nm.pdf(&rec), 0.0);
    }

    #[test]
    fn sample_reports_solid_angle_measure() {
        let nm = NormalMap::new(flat_map(), Diffuse::new(Color::gray(0.8)).into());
        let mut rec = BsdfQueryRecord::incident(vec3(0.0, 0.0, 1.0), vec2(0.0, 0.0));
        let w = nm.sample(&mut rec, vec2(0.3, 0.6));
        assert_eq!(rec.measure, Measure::SolidAngle);
        assert_eq!(rec.eta, 1.0);
        assert!(w.r > 0.0);
    }
}
