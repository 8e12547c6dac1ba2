use crate::bsdf::{BsdfModel, BsdfQueryRecord, Measure};
use crate::proplist::PropertyList;
use crate::texture::{ConstantTexture, Texture, TextureModel};
use crate::Error;
use geometry::frame::cos_theta;
use glam::Vec2;
use math::warp;
use radiometry::Color;
use std::f32::consts::FRAC_1_PI;

/// Lambertian BRDF with a textured albedo.
#[derive(Debug, Clone, Default)]
pub struct Diffuse {
    albedo: Option<Texture>,
}

impl Diffuse {
    pub fn new(albedo: Color) -> Diffuse {
        Diffuse {
            albedo: Some(ConstantTexture::new(albedo).into()),
        }
    }

    pub fn from_props(props: &PropertyList) -> Result<Diffuse, Error> {
        Ok(match props.color("albedo") {
            Ok(c) => Diffuse::new(c),
            Err(Error::MissingProperty(_)) => Diffuse::default(),
            Err(e) => return Err(e),
        })
    }

    /// Attaches an albedo texture; at most one is allowed.
    pub fn set_albedo(&mut self, texture: Texture) -> Result<(), Error> {
        if self.albedo.is_some() {
            return Err(Error::DuplicateChild);
        }
        self.albedo = Some(texture);
        Ok(())
    }

    fn albedo(&self, uv: Vec2) -> Color {
        match &self.albedo {
            Some(t) => t.eval(uv),
            None => Color::gray(0.5),
        }
    }
}

impl BsdfModel for Diffuse {
    fn eval(&self, rec: &BsdfQueryRecord) -> Color {
        // Zero when the measure is wrong or either direction lies below
        // the surface.
        if rec.measure != Measure::SolidAngle
            || cos_theta(rec.wi) <= 0.0
            || cos_theta(rec.wo) <= 0.0
        {
            return Color::black();
        }
        self.albedo(rec.uv) * FRAC_1_PI
    }

    fn pdf(&self, rec: &BsdfQueryRecord) -> f32 {
        if rec.measure != Measure::SolidAngle
            || cos_theta(rec.wi) <= 0.0
            || cos_theta(rec.wo) <= 0.0
        {
            return 0.0;
        }
        FRAC_1_PI * cos_theta(rec.wo)
    }

    fn sample(&self, rec: &mut BsdfQueryRecord, sample: Vec2) -> Color {
        if cos_theta(rec.wi) <= 0.0 {
            return Color::black();
        }
        rec.measure = Measure::SolidAngle;
        rec.wo = warp::square_to_cosine_hemisphere(sample);
        rec.eta = 1.0;
        // eval() / pdf() * cos(theta) collapses to the albedo.
        self.albedo(rec.uv)
    }

    fn is_diffuse(&self) -> bool {
        true
    }
}
