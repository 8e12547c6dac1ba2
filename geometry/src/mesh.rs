use crate::bbox::Bbox;
use crate::ray::Ray;
use glam::{Vec2, Vec3};
use math::distrib::DiscretePdf;

/// Indexed triangle mesh with optional per-vertex normals and texture
/// coordinates. Construction precomputes the bounds and a triangle-area
/// distribution so the surface can be sampled uniformly by area.
pub struct TriMesh {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    texcoords: Vec<Vec2>,
    indices: Vec<[u32; 3]>,
    area_pdf: DiscretePdf,
    total_area: f32,
    bbox: Bbox,
}

/// A point picked uniformly on a mesh surface.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceSample {
    pub p: Vec3,
    pub n: Vec3,
    /// Density with respect to surface area, `1 / total_area`.
    pub pdf: f32,
}

impl TriMesh {
    /// `normals` and `texcoords` may be empty; otherwise they must run
    /// parallel to `positions`.
    pub fn new(
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        texcoords: Vec<Vec2>,
        indices: Vec<[u32; 3]>,
    ) -> TriMesh {
        assert!(normals.is_empty() || normals.len() == positions.len());
        assert!(texcoords.is_empty() || texcoords.len() == positions.len());
        let mut bbox = Bbox::empty();
        for p in positions.iter() {
            bbox.expand(*p);
        }
        let mut mesh = TriMesh {
            positions,
            normals,
            texcoords,
            indices,
            area_pdf: DiscretePdf::new(),
            total_area: 0.0,
            bbox,
        };
        let mut area_pdf = DiscretePdf::with_capacity(mesh.indices.len());
        for f in 0..mesh.indices.len() as u32 {
            area_pdf.append(mesh.triangle_area(f));
        }
        mesh.total_area = area_pdf.normalize();
        mesh.area_pdf = area_pdf;
        mesh
    }

    /// An axis-aligned quad `origin + s * edge_u + t * edge_v`, split into
    /// two triangles, with unit texture coordinates.
    pub fn quad(origin: Vec3, edge_u: Vec3, edge_v: Vec3) -> TriMesh {
        let n = edge_u.cross(edge_v).normalize();
        let positions = vec![
            origin,
            origin + edge_u,
            origin + edge_u + edge_v,
            origin + edge_v,
        ];
        let texcoords = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];
        TriMesh::new(
            positions,
            vec![n; 4],
            texcoords,
            vec![[0, 1, 2], [0, 2, 3]],
        )
    }

    /// A latitude/longitude sphere tessellation.
    pub fn uv_sphere(center: Vec3, radius: f32, n_lat: u32, n_lon: u32) -> TriMesh {
        assert!(n_lat >= 2 && n_lon >= 3);
        let mut positions = Vec::new();
        let mut normals = Vec::new();
        let mut texcoords = Vec::new();
        for i in 0..=n_lat {
            let theta = std::f32::consts::PI * i as f32 / n_lat as f32;
            for j in 0..=n_lon {
                let phi = 2.0 * std::f32::consts::PI * j as f32 / n_lon as f32;
                let n = Vec3::new(
                    theta.sin() * phi.cos(),
                    theta.sin() * phi.sin(),
                    theta.cos(),
                );
                positions.push(center + radius * n);
                normals.push(n);
                texcoords.push(Vec2::new(
                    j as f32 / n_lon as f32,
                    i as f32 / n_lat as f32,
                ));
            }
        }
        let mut indices = Vec::new();
        let stride = n_lon + 1;
        for i in 0..n_lat {
            for j in 0..n_lon {
                let a = i * stride + j;
                let b = a + 1;
                let c = a + stride;
                let d = c + 1;
                if i > 0 {
                    indices.push([a, c, b]);
                }
                if i + 1 < n_lat {
                    indices.push([b, c, d]);
                }
            }
        }
        TriMesh::new(positions, normals, texcoords, indices)
    }

    pub fn n_triangles(&self) -> u32 {
        self.indices.len() as u32
    }

    pub fn bbox(&self) -> Bbox {
        self.bbox
    }

    pub fn total_area(&self) -> f32 {
        self.total_area
    }

    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty()
    }

    pub fn has_texcoords(&self) -> bool {
        !self.texcoords.is_empty()
    }

    fn vertices(&self, f: u32) -> [Vec3; 3] {
        let [i0, i1, i2] = self.indices[f as usize];
        [
            self.positions[i0 as usize],
            self.positions[i1 as usize],
            self.positions[i2 as usize],
        ]
    }

    pub fn triangle_area(&self, f: u32) -> f32 {
        let [p0, p1, p2] = self.vertices(f);
        0.5 * (p1 - p0).cross(p2 - p0).length()
    }

    pub fn triangle_bbox(&self, f: u32) -> Bbox {
        let [p0, p1, p2] = self.vertices(f);
        let mut b = Bbox::new(p0, p0);
        b.expand(p1);
        b.expand(p2);
        b
    }

    /// Geometric normal of triangle `f`.
    pub fn face_normal(&self, f: u32) -> Vec3 {
        let [p0, p1, p2] = self.vertices(f);
        (p1 - p0).cross(p2 - p0).normalize()
    }

    /// Point at barycentric `(u, v)` on triangle `f`, weights `(1-u-v, u, v)`.
    pub fn position_at(&self, f: u32, u: f32, v: f32) -> Vec3 {
        let [p0, p1, p2] = self.vertices(f);
        (1.0 - u - v) * p0 + u * p1 + v * p2
    }

    /// Interpolated shading normal; falls back to the face normal when the
    /// mesh carries no vertex normals.
    pub fn normal_at(&self, f: u32, u: f32, v: f32) -> Vec3 {
        if self.normals.is_empty() {
            return self.face_normal(f);
        }
        let [i0, i1, i2] = self.indices[f as usize];
        ((1.0 - u - v) * self.normals[i0 as usize]
            + u * self.normals[i1 as usize]
            + v * self.normals[i2 as usize])
            .normalize()
    }

    /// Interpolated texture coordinates, or the barycentric pair itself when
    /// the mesh has none.
    pub fn texcoord_at(&self, f: u32, u: f32, v: f32) -> Vec2 {
        if self.texcoords.is_empty() {
            return Vec2::new(u, v);
        }
        let [i0, i1, i2] = self.indices[f as usize];
        (1.0 - u - v) * self.texcoords[i0 as usize]
            + u * self.texcoords[i1 as usize]
            + v * self.texcoords[i2 as usize]
    }

    /// Moeller-Trumbore test of the ray against triangle `f`, honoring the
    /// ray's `[mint, maxt]` interval. Returns `(u, v, t)` on a hit.
    pub fn ray_intersect(&self, f: u32, ray: &Ray) -> Option<(f32, f32, f32)> {
        let [p0, p1, p2] = self.vertices(f);
        let edge1 = p1 - p0;
        let edge2 = p2 - p0;
        let pvec = ray.d.cross(edge2);
        let det = edge1.dot(pvec);
        if det.abs() < 1e-8 {
            return None;
        }
        let inv_det = 1.0 / det;
        let tvec = ray.o - p0;
        let u = tvec.dot(pvec) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }
        let qvec = tvec.cross(edge1);
        let v = ray.d.dot(qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }
        let t = edge2.dot(qvec) * inv_det;
        if ray.contains(t) {
            Some((u, v, t))
        } else {
            None
        }
    }

    /// Picks a point uniformly by area. `u` selects the triangle (with the
    /// leftover reused), `sample` is warped to barycentric coordinates.
    pub fn sample_surface(&self, mut u: f32, sample: Vec2) -> SurfaceSample {
        let (f, _) = self.area_pdf.sample_reuse(&mut u);
        let f = f as u32;
        // Square-root warp gives uniform density over the triangle.
        let su = sample.x.sqrt();
        let b1 = 1.0 - su;
        let b2 = sample.y * su;
        SurfaceSample {
            p: self.position_at(f, b1, b2),
            n: self.normal_at(f, b1, b2),
            pdf: 1.0 / self.total_area,
        }
    }
}
