//! Warps from the unit square to various domains, each paired with the
//! density it realizes. The caller supplies uniform `[0, 1)^2` samples and is
//! responsible for matching a warp with its pdf.

use crate::float::safe_sqrt;
use glam::{Vec2, Vec3};
use std::f32::consts::{FRAC_1_PI, PI};

const INV_TWOPI: f32 = 0.5 * FRAC_1_PI;
const INV_FOURPI: f32 = 0.25 * FRAC_1_PI;

pub fn square_to_uniform_square(sample: Vec2) -> Vec2 {
    sample
}

pub fn square_to_uniform_square_pdf(p: Vec2) -> f32 {
    let inside = p.x >= 0.0 && p.x <= 1.0 && p.y >= 0.0 && p.y <= 1.0;
    if inside {
        1.0
    } else {
        0.0
    }
}

fn tent(u: f32) -> f32 {
    if (0.0..0.5).contains(&u) {
        (2.0 * u).sqrt() - 1.0
    } else if (0.5..1.0).contains(&u) {
        1.0 - (2.0 - 2.0 * u).sqrt()
    } else {
        0.0
    }
}

fn tent_pdf(t: f32) -> f32 {
    if (-1.0..=1.0).contains(&t) {
        1.0 - t.abs()
    } else {
        0.0
    }
}

pub fn square_to_tent(sample: Vec2) -> Vec2 {
    Vec2::new(tent(sample.x), tent(sample.y))
}

pub fn square_to_tent_pdf(p: Vec2) -> f32 {
    tent_pdf(p.x) * tent_pdf(p.y)
}

pub fn square_to_uniform_disk(sample: Vec2) -> Vec2 {
    let r = sample.x.sqrt();
    let theta = 2.0 * PI * sample.y;
    Vec2::new(r * theta.cos(), r * theta.sin())
}

pub fn square_to_uniform_disk_pdf(p: Vec2) -> f32 {
    if p.length_squared() <= 1.0 {
        FRAC_1_PI
    } else {
        0.0
    }
}

pub fn square_to_uniform_sphere(sample: Vec2) -> Vec3 {
    let phi = 2.0 * PI * sample.x;
    let z = 1.0 - 2.0 * sample.y;
    let sin_theta = safe_sqrt(1.0 - z * z);
    Vec3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), z)
}

pub fn square_to_uniform_sphere_pdf(v: Vec3) -> f32 {
    if v.length_squared() <= 1.0 {
        INV_FOURPI
    } else {
        0.0
    }
}

pub fn square_to_uniform_hemisphere(sample: Vec2) -> Vec3 {
    let phi = 2.0 * PI * sample.x;
    let z = 1.0 - sample.y;
    let sin_theta = safe_sqrt(1.0 - z * z);
    Vec3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), z)
}

pub fn square_to_uniform_hemisphere_pdf(v: Vec3) -> f32 {
    if v.length_squared() <= 1.0 && v.z >= 0.0 {
        INV_TWOPI
    } else {
        0.0
    }
}

pub fn square_to_cosine_hemisphere(sample: Vec2) -> Vec3 {
    let p = square_to_uniform_disk(sample);
    let z = safe_sqrt(1.0 - p.length_squared());
    Vec3::new(p.x, p.y, z)
}

/// Density realized by [`square_to_cosine_hemisphere`]. Deliberately checks
/// only the sign of `z`, not unit length.
pub fn square_to_cosine_hemisphere_pdf(v: Vec3) -> f32 {
    if v.z >= 0.0 {
        v.z * FRAC_1_PI
    } else {
        0.0
    }
}

/// Samples a Beckmann-distributed microfacet normal with roughness `alpha`.
pub fn square_to_beckmann(sample: Vec2, alpha: f32) -> Vec3 {
    let phi = 2.0 * PI * sample.x;
    let theta = (alpha * (-(1.0 - sample.y).ln()).sqrt()).atan();
    let (sin_theta, cos_theta) = theta.sin_cos();
    Vec3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta)
}

/// Density of [`square_to_beckmann`]. Strictly positive `z` only: the
/// distribution diverges at grazing normals.
pub fn square_to_beckmann_pdf(m: Vec3, alpha: f32) -> f32 {
    if m.z <= 0.0 {
        return 0.0;
    }
    let cos_theta = m.z;
    let tan2_theta = (1.0 - cos_theta * cos_theta) / (cos_theta * cos_theta);
    let cos3_theta = cos_theta * cos_theta * cos_theta;
    let alpha2 = alpha * alpha;
    FRAC_1_PI * (-tan2_theta / alpha2).exp() / (alpha2 * cos3_theta)
}

#[cfg(test)]
mod test {
    use super::*;

    fn stratified_samples(n: u32) -> impl Iterator<Item = Vec2> {
        let k = (n as f32).sqrt() as u32;
        (0..k * k).map(move |i| {
            let (row, col) = (i / k, i % k);
            Vec2::new(
                (col as f32 + 0.5) / k as f32,
                (row as f32 + 0.5) / k as f32,
            )
        })
    }

    #[test]
    fn cosine_hemisphere_stays_upper() {
        for s in stratified_samples(1024) {
            let v = square_to_cosine_hemisphere(s);
            assert!(v.z >= 0.0);
            assert!((v.length() - 1.0).abs() < 1e-4, "{:?}", v);
        }
    }

    #[test]
    fn cosine_hemisphere_pdf_has_no_length_guard() {
        // The density only looks at the sign of z.
        let long = Vec3::new(0.0, 0.0, 2.0);
        assert!((square_to_cosine_hemisphere_pdf(long) - 2.0 * FRAC_1_PI).abs() < 1e-6);
        assert_eq!(square_to_cosine_hemisphere_pdf(Vec3::new(0.0, 0.0, -0.5)), 0.0);
    }

    #[test]
    fn beckmann_pdf_integrates_to_one() {
        // Integrate the pdf over the hemisphere with a theta/phi grid.
        let alpha = 0.3;
        let (n_theta, n_phi) = (256, 256);
        let mut integral = 0.0f64;
        for i in 0..n_theta {
            let theta = (i as f32 + 0.5) / n_theta as f32 * std::f32::consts::FRAC_PI_2;
            for j in 0..n_phi {
                let phi = (j as f32 + 0.5) / n_phi as f32 * 2.0 * PI;
                let m = Vec3::new(
                    theta.sin() * phi.cos(),
                    theta.sin() * phi.sin(),
                    theta.cos(),
                );
                integral += (square_to_beckmann_pdf(m, alpha) * theta.sin()) as f64;
            }
        }
        integral *= (std::f32::consts::FRAC_PI_2 / n_theta as f32) as f64
            * (2.0 * PI / n_phi as f32) as f64;
        assert!((integral - 1.0).abs() < 1e-2, "integral = {}", integral);
    }

    #[test]
    fn beckmann_samples_match_pdf_support() {
        for s in stratified_samples(400) {
            let m = square_to_beckmann(s, 0.1);
            assert!(m.z > 0.0);
            assert!(square_to_beckmann_pdf(m, 0.1) > 0.0);
        }
    }

    #[test]
    fn disk_samples_stay_inside() {
        for s in stratified_samples(400) {
            let p = square_to_uniform_disk(s);
            assert!(p.length_squared() <= 1.0 + 1e-6);
            assert!(square_to_uniform_disk_pdf(p) > 0.0);
        }
    }

    #[test]
    fn tent_is_symmetric_around_origin() {
        let lo = square_to_tent(Vec2::new(0.25, 0.25));
        let hi = square_to_tent(Vec2::new(0.75, 0.75));
        assert!((lo.x + hi.x).abs() < 1e-6);
        assert!((lo.y + hi.y).abs() < 1e-6);
        assert_eq!(square_to_tent_pdf(Vec2::new(0.0, 0.0)), 1.0);
        assert_eq!(square_to_tent_pdf(Vec2::new(1.5, 0.0)), 0.0);
    }
}
