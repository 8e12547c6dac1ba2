use glam::Vec3;

/// Orthonormal shading basis with `n` as the local z axis. Directions are
/// expressed in this frame so that BSDF math can read `z` as `cos(theta)`.
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    pub s: Vec3,
    pub t: Vec3,
    pub n: Vec3,
}

impl Frame {
    pub fn new(s: Vec3, t: Vec3, n: Vec3) -> Frame {
        Frame { s, t, n }
    }

    /// Completes a unit normal into a basis by branching on its largest
    /// components, which keeps the construction stable for any orientation.
    pub fn from_normal(n: Vec3) -> Frame {
        let t = if n.x.abs() > n.y.abs() {
            let inv_len = 1.0 / (n.x * n.x + n.z * n.z).sqrt();
            Vec3::new(n.z * inv_len, 0.0, -n.x * inv_len)
        } else {
            let inv_len = 1.0 / (n.y * n.y + n.z * n.z).sqrt();
            Vec3::new(0.0, n.z * inv_len, -n.y * inv_len)
        };
        Frame {
            s: t.cross(n),
            t,
            n,
        }
    }

    pub fn to_local(&self, v: Vec3) -> Vec3 {
        Vec3::new(v.dot(self.s), v.dot(self.t), v.dot(self.n))
    }

    pub fn to_world(&self, v: Vec3) -> Vec3 {
        v.x * self.s + v.y * self.t + v.z * self.n
    }
}

/// Cosine of the angle between a local-frame direction and the normal.
pub fn cos_theta(v: Vec3) -> f32 {
    v.z
}

pub fn sin_theta(v: Vec3) -> f32 {
    math::float::safe_sqrt(1.0 - v.z * v.z)
}

pub fn tan_theta(v: Vec3) -> f32 {
    sin_theta(v) / v.z
}

#[cfg(test)]
mod test {
    use super::*;
    use math::vec3;

    #[test]
    fn from_normal_is_orthonormal() {
        for n in [
            vec3(0.0, 0.0, 1.0),
            vec3(1.0, 0.0, 0.0),
            vec3(0.0, -1.0, 0.0),
            vec3(0.6, -0.48, 0.64),
        ] {
            let f = Frame::from_normal(n.normalize());
            assert!((f.s.length() - 1.0).abs() < 1e-5);
            assert!((f.t.length() - 1.0).abs() < 1e-5);
            assert!(f.s.dot(f.t).abs() < 1e-5);
            assert!(f.s.dot(f.n).abs() < 1e-5);
            assert!(f.t.dot(f.n).abs() < 1e-5);
        }
    }

    #[test]
    fn to_local_inverts_to_world() {
        let f = Frame::from_normal(vec3(1.0, 2.0, 3.0).normalize());
        let v = vec3(0.3, -0.4, 0.5);
        let roundtrip = f.to_local(f.to_world(v));
        assert!((roundtrip - v).length() < 1e-5);
    }

    #[test]
    fn normal_maps_to_local_z() {
        let n = vec3(0.0, 1.0, 0.0);
        let f = Frame::from_normal(n);
        let local = f.to_local(n);
        assert!((local - vec3(0.0, 0.0, 1.0)).length() < 1e-6);
        assert!((cos_theta(local) - 1.0).abs() < 1e-6);
    }
}
