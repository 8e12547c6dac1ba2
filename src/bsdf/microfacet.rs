use crate::bsdf::{beckmann_g1, fresnel, BsdfModel, BsdfQueryRecord, Measure};
use crate::proplist::PropertyList;
use crate::Error;
use geometry::frame::cos_theta;
use glam::Vec2;
use math::float::try_divide;
use math::warp;
use radiometry::Color;
use std::f32::consts::FRAC_1_PI;

/// Rough conductor-style BRDF: a diffuse base under a Beckmann specular
/// lobe. The specular weight is `1 - max(kd)` so the sum stays below one.
#[derive(Debug, Clone)]
pub struct Microfacet {
    alpha: f32,
    int_ior: f32,
    ext_ior: f32,
    kd: Color,
    ks: f32,
}

impl Microfacet {
    pub fn new(alpha: f32, kd: Color) -> Microfacet {
        Microfacet {
            alpha,
            int_ior: 1.5046,
            ext_ior: 1.000277,
            kd,
            ks: 1.0 - kd.max_component(),
        }
    }

    pub fn from_props(props: &PropertyList) -> Result<Microfacet, Error> {
        let kd = props.color_or("kd", Color::gray(0.5))?;
        Ok(Microfacet {
            alpha: props.float_or("alpha", 0.1)?,
            int_ior: props.float_or("int_ior", 1.5046)?,
            ext_ior: props.float_or("ext_ior", 1.000277)?,
            kd,
            ks: 1.0 - kd.max_component(),
        })
    }
}

impl BsdfModel for Microfacet {
    fn eval(&self, rec: &BsdfQueryRecord) -> Color {
        let cos_i = cos_theta(rec.wi);
        let cos_o = cos_theta(rec.wo);
        if cos_i <= 0.0 || cos_o <= 0.0 {
            return Color::black();
        }
        let wh = (rec.wi + rec.wo).normalize();
        let cos_h = cos_theta(wh);
        let f = fresnel(wh.dot(rec.wi), self.ext_ior, self.int_ior);
        let d = warp::square_to_beckmann_pdf(wh, self.alpha);
        let g = beckmann_g1(rec.wi, wh, self.alpha) * beckmann_g1(rec.wo, wh, self.alpha);
        let specular =
            try_divide(self.ks * d * f * g, 4.0 * cos_i * cos_o * cos_h).unwrap_or(0.0);
        self.kd * FRAC_1_PI + Color::white() * specular
    }

    fn pdf(&self, rec: &BsdfQueryRecord) -> f32 {
        if cos_theta(rec.wi) <= 0.0 || cos_theta(rec.wo) <= 0.0 {
            return 0.0;
        }
        let wh = (rec.wi + rec.wo).normalize();
        let jacobian = try_divide(1.0, 4.0 * wh.dot(rec.wo)).unwrap_or(0.0);
        self.ks * warp::square_to_beckmann_pdf(wh, self.alpha) * jacobian
            + (1.0 - self.ks) * cos_theta(rec.wo) * FRAC_1_PI
    }

    fn sample(&self, rec: &mut BsdfQueryRecord, sample: Vec2) -> Color {
        if cos_theta(rec.wi) <= 0.0 {
            return Color::black();
        }
        let (u, v) = (sample.x, sample.y);
        if u < self.ks {
            // Specular lobe: reflect about a Beckmann-sampled normal,
            // reusing the stretched variate.
            let u = u / self.ks;
            let m = warp::square_to_beckmann(Vec2::new(u, v), self.alpha);
            rec.wo = -rec.wi + 2.0 * m.dot(rec.wi) * m;
        } else {
            let u = (u - self.ks) / (1.0 - self.ks);
            rec.wo = warp::square_to_cosine_hemisphere(Vec2::new(u, v));
        }
        rec.measure = Measure::SolidAngle;
        rec.eta = self.int_ior / self.ext_ior;
        let pdf = self.pdf(rec);
        if pdf > 0.0 {
            self.eval(rec) * cos_theta(rec.wo) / pdf
        } else {
            Color::black()
        }
    }

    /// Rough lobes are still wide enough for light-sampling strategies.
    fn is_diffuse(&self) -> bool {
        true
    }
}
