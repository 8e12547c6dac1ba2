use crate::ray::Ray;
use glam::Vec3;
use math::float::min_max;

/// Axis-aligned bounding box, stored as a min/max corner pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bbox {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bbox {
    pub fn new(min: Vec3, max: Vec3) -> Bbox {
        Bbox { min, max }
    }

    /// The inverted box that is the identity of [`union`](Self::union).
    pub fn empty() -> Bbox {
        Bbox {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    /// Corner `i` in `0..8`, one bit per axis (bit 0 = x, bit 1 = y, bit 2 = z).
    pub fn corner(&self, i: usize) -> Vec3 {
        debug_assert!(i < 8);
        Vec3::new(
            if i & 1 == 0 { self.min.x } else { self.max.x },
            if i & 2 == 0 { self.min.y } else { self.max.y },
            if i & 4 == 0 { self.min.z } else { self.max.z },
        )
    }

    pub fn center(&self) -> Vec3 {
        0.5 * (self.min + self.max)
    }

    pub fn diagonal(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn union(self, other: Bbox) -> Bbox {
        Bbox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn expand(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Closed-interval overlap test; boxes sharing only a face still overlap.
    pub fn overlaps(&self, other: &Bbox) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
            && self.min.z <= other.max.z
            && other.min.z <= self.max.z
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Slab test returning the parametric interval where the ray's infinite
    /// line crosses the box, ignoring the ray's own `[mint, maxt]` bounds.
    /// `near` may be negative when the origin is inside.
    pub fn ray_distance(&self, ray: &Ray) -> Option<(f32, f32)> {
        let mut near = f32::NEG_INFINITY;
        let mut far = f32::INFINITY;
        for axis in 0..3 {
            let (o, d) = (ray.o[axis], ray.d[axis]);
            let (lo, hi) = (self.min[axis], self.max[axis]);
            if d == 0.0 {
                if o < lo || o > hi {
                    return None;
                }
            } else {
                let inv = 1.0 / d;
                let (t0, t1) = min_max((lo - o) * inv, (hi - o) * inv);
                near = near.max(t0);
                far = far.min(t1);
                if near > far {
                    return None;
                }
            }
        }
        Some((near, far))
    }

    /// True when the ray segment `[mint, maxt]` passes through the box.
    pub fn ray_intersect(&self, ray: &Ray) -> bool {
        match self.ray_distance(ray) {
            Some((near, far)) => near <= ray.maxt && far >= ray.mint,
            None => false,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use math::vec3;

    fn unit_box() -> Bbox {
        Bbox::new(vec3(0.0, 0.0, 0.0), vec3(1.0, 1.0, 1.0))
    }

    #[test]
    fn corners_follow_bit_pattern() {
        let b = unit_box();
        assert_eq!(b.corner(0), vec3(0.0, 0.0, 0.0));
        assert_eq!(b.corner(1), vec3(1.0, 0.0, 0.0));
        assert_eq!(b.corner(2), vec3(0.0, 1.0, 0.0));
        assert_eq!(b.corner(7), vec3(1.0, 1.0, 1.0));
    }

    #[test]
    fn slab_test_finds_entry_and_exit() {
        let b = unit_box();
        let r = Ray::new(vec3(0.5, 0.5, -2.0), vec3(0.0, 0.0, 1.0));
        let (near, far) = b.ray_distance(&r).unwrap();
        assert!((near - 2.0).abs() < 1e-6);
        assert!((far - 3.0).abs() < 1e-6);
        assert!(b.ray_intersect(&r));
    }

    #[test]
    fn ray_starting_inside_reports_negative_entry() {
        let b = unit_box();
        let r = Ray::new(vec3(0.5, 0.5, 0.5), vec3(0.0, 0.0, 1.0));
        let (near, far) = b.ray_distance(&r).unwrap();
        assert!(near < 0.0);
        assert!(far > 0.0);
        assert!(b.ray_intersect(&r));
    }

    #[test]
    fn segment_bounds_cull_distant_boxes() {
        let b = unit_box();
        let mut r = Ray::new(vec3(0.5, 0.5, -10.0), vec3(0.0, 0.0, 1.0));
        r.maxt = 5.0;
        assert!(!b.ray_intersect(&r));
        r.maxt = 20.0;
        assert!(b.ray_intersect(&r));
    }

    #[test]
    fn axis_parallel_miss() {
        let b = unit_box();
        let r = Ray::new(vec3(2.0, 0.5, -1.0), vec3(0.0, 0.0, 1.0));
        assert!(b.ray_distance(&r).is_none());
    }

    #[test]
    fn overlap_is_closed_interval() {
        let a = unit_box();
        let touching = Bbox::new(vec3(1.0, 0.0, 0.0), vec3(2.0, 1.0, 1.0));
        let apart = Bbox::new(vec3(1.5, 0.0, 0.0), vec3(2.0, 1.0, 1.0));
        assert!(a.overlaps(&touching));
        assert!(!a.overlaps(&apart));
    }

    #[test]
    fn union_with_empty_is_identity() {
        let a = unit_box();
        assert_eq!(Bbox::empty().union(a), a);
    }
}
