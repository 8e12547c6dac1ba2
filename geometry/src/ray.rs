use glam::Vec3;
use math::float::RAY_EPSILON;

/// A ray segment `o + t * d` with `t` restricted to `[mint, maxt]`.
///
/// `maxt` shrinks as closer intersections are found, so a ray doubles as a
/// running record of the nearest hit distance.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub o: Vec3,
    pub d: Vec3,
    pub mint: f32,
    pub maxt: f32,
}

impl Ray {
    /// An unbounded ray, offset at the origin to avoid self-intersection.
    pub fn new(o: Vec3, d: Vec3) -> Ray {
        Ray {
            o,
            d,
            mint: RAY_EPSILON,
            maxt: f32::INFINITY,
        }
    }

    /// A finite segment from `o` towards `target`, shortened at both ends so
    /// that neither endpoint's surface occludes it. Used for shadow rays.
    pub fn segment(o: Vec3, target: Vec3) -> Ray {
        let d = target - o;
        let dist = d.length();
        Ray {
            o,
            d: d / dist,
            mint: RAY_EPSILON,
            maxt: dist - RAY_EPSILON,
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.o + t * self.d
    }

    pub fn contains(&self, t: f32) -> bool {
        t >= self.mint && t <= self.maxt
    }
}
