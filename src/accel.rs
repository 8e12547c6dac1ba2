//! Octree ray-intersection accelerator.
//!
//! Nodes live in a flat growable arena and address their children by index,
//! so pushing nodes during construction never invalidates links. Triangles
//! straddling an octant boundary are replicated into every octant they touch.

use crate::mesh::{Intersection, Mesh};
use crate::Error;
use geometry::{Bbox, Ray, TriMesh};
use itertools::Itertools;
use log::debug;
use std::cmp::Ordering;
use std::sync::Arc;

/// Leaves hold fewer triangles than this unless the depth limit forces them.
const MIN_SPLIT_TRIS: usize = 10;
/// Subdivision stops at this depth regardless of occupancy.
const MAX_DEPTH: u32 = 6;
/// Arena capacity reserved up front.
const INITIAL_NODES: usize = 512;

/// Tag for a node covering no triangles at all.
const EMPTY: i32 = -1;
/// Tag for a node that delegates to its eight children.
const INTERIOR: i32 = -2;

struct OctreeNode {
    bbox: Bbox,
    /// Arena indices of the children, meaningful only for interior nodes.
    children: [u32; 8],
    tri_offset: u32,
    /// Triangle count for a leaf, or one of [`EMPTY`] / [`INTERIOR`].
    tri_count: i32,
}

impl OctreeNode {
    fn leaf(bbox: Bbox, tri_offset: u32, tri_count: i32) -> OctreeNode {
        OctreeNode {
            bbox,
            children: [0; 8],
            tri_offset,
            tri_count,
        }
    }
}

pub struct Accel {
    mesh: Option<Arc<Mesh>>,
    bbox: Bbox,
    nodes: Vec<OctreeNode>,
    /// Leaf triangle lists, back to back; leaves address slices of this.
    tri_indices: Vec<u32>,
}

impl Default for Accel {
    fn default() -> Self {
        Accel::new()
    }
}

impl Accel {
    pub fn new() -> Accel {
        Accel {
            mesh: None,
            bbox: Bbox::empty(),
            nodes: Vec::new(),
            tri_indices: Vec::new(),
        }
    }

    /// Registers the mesh to accelerate. Only a single mesh is supported.
    pub fn add_mesh(&mut self, mesh: Arc<Mesh>) -> Result<(), Error> {
        if self.mesh.is_some() {
            return Err(Error::MeshAlreadyRegistered);
        }
        self.bbox = mesh.geometry().bbox();
        self.mesh = Some(mesh);
        Ok(())
    }

    pub fn bbox(&self) -> Bbox {
        self.bbox
    }

    /// Builds the octree. Rebuilding from scratch is allowed.
    pub fn build(&mut self) {
        let mesh = match &self.mesh {
            Some(m) => Arc::clone(m),
            None => return,
        };
        let tri_mesh = mesh.geometry();
        self.nodes.clear();
        self.tri_indices.clear();
        self.nodes.reserve(INITIAL_NODES);

        let n_tris = tri_mesh.n_triangles();
        if (n_tris as usize) < MIN_SPLIT_TRIS {
            self.tri_indices.extend(0..n_tris);
            self.nodes
                .push(OctreeNode::leaf(self.bbox, 0, n_tris as i32));
        } else {
            let all: Vec<u32> = (0..n_tris).collect();
            self.build_node(tri_mesh, 1, self.bbox, all);
        }
        debug!(
            "octree built: {} nodes, {} triangle references over {} triangles",
            self.nodes.len(),
            self.tri_indices.len(),
            n_tris
        );
    }

    /// Appends the subtree for `tris` within `bbox`, parent node first.
    fn build_node(&mut self, mesh: &TriMesh, depth: u32, bbox: Bbox, tris: Vec<u32>) {
        if tris.is_empty() {
            self.nodes.push(OctreeNode::leaf(bbox, 0, EMPTY));
            return;
        }
        if tris.len() < MIN_SPLIT_TRIS || depth >= MAX_DEPTH {
            let offset = self.tri_indices.len() as u32;
            self.tri_indices.extend_from_slice(&tris);
            self.nodes
                .push(OctreeNode::leaf(bbox, offset, tris.len() as i32));
            return;
        }

        let node_index = self.nodes.len();
        self.nodes.push(OctreeNode::leaf(bbox, 0, INTERIOR));

        let center = bbox.center();
        for octant in 0..8 {
            let corner = bbox.corner(octant);
            let child_bbox = Bbox::new(corner.min(center), corner.max(center));
            let child_tris: Vec<u32> = tris
                .iter()
                .copied()
                .filter(|&f| child_bbox.overlaps(&mesh.triangle_bbox(f)))
                .collect();
            let child_index = self.nodes.len() as u32;
            self.nodes[node_index].children[octant] = child_index;
            self.build_node(mesh, depth + 1, child_bbox, child_tris);
        }
    }

    /// Finds the closest hit along the ray.
    pub fn ray_intersect(&self, ray: &Ray) -> Option<Intersection<'_>> {
        let mesh = self.mesh.as_deref()?;
        if self.nodes.is_empty() {
            return None;
        }
        let mut clipped = *ray;
        if !self.nodes[0].bbox.ray_intersect(&clipped) {
            return None;
        }
        let mut hit = None;
        self.node_intersect(mesh.geometry(), 0, &mut clipped, false, &mut hit);
        let (f, t, u, v) = hit?;
        Some(self.finish_hit(mesh, f, t, u, v))
    }

    /// Occlusion query, stopping at the first hit.
    pub fn is_occluded(&self, ray: &Ray) -> bool {
        let mesh = match self.mesh.as_deref() {
            Some(m) => m,
            None => return false,
        };
        if self.nodes.is_empty() {
            return false;
        }
        let mut clipped = *ray;
        if !self.nodes[0].bbox.ray_intersect(&clipped) {
            return false;
        }
        let mut hit = None;
        self.node_intersect(mesh.geometry(), 0, &mut clipped, true, &mut hit)
    }

    /// Recursive traversal. The ray's `maxt` shrinks as hits are found so
    /// farther subtrees are pruned; `hit` tracks the closest triangle.
    fn node_intersect(
        &self,
        mesh: &TriMesh,
        node_index: u32,
        ray: &mut Ray,
        shadow: bool,
        hit: &mut Option<(u32, f32, f32, f32)>,
    ) -> bool {
        let node = &self.nodes[node_index as usize];
        if node.tri_count == EMPTY {
            return false;
        }

        if node.tri_count != INTERIOR {
            let mut found = false;
            let lo = node.tri_offset as usize;
            let hi = lo + node.tri_count as usize;
            for &f in &self.tri_indices[lo..hi] {
                if let Some((u, v, t)) = mesh.ray_intersect(f, ray) {
                    if shadow {
                        return true;
                    }
                    ray.maxt = t;
                    *hit = Some((f, t, u, v));
                    found = true;
                }
            }
            return found;
        }

        // Visit children front to back by slab-test entry distance; children
        // the ray misses (and empty ones) sort last with an infinite entry.
        let order = node
            .children
            .iter()
            .map(|&c| {
                let child = &self.nodes[c as usize];
                let entry = if child.tri_count == EMPTY {
                    f32::INFINITY
                } else {
                    match child.bbox.ray_distance(ray) {
                        Some((near, _)) => near,
                        None => f32::INFINITY,
                    }
                };
                (entry, c)
            })
            .sorted_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

        let mut found = false;
        for (entry, c) in order {
            let child = &self.nodes[c as usize];
            if child.tri_count == EMPTY {
                continue;
            }
            // Re-check against the current (possibly shrunk) segment.
            if !child.bbox.ray_intersect(ray) {
                continue;
            }
            if entry > ray.maxt {
                break;
            }
            found |= self.node_intersect(mesh, c, ray, shadow, hit);
            if shadow && found {
                return true;
            }
        }
        found
    }

    /// Fills in position, texture coordinates and frames for the closest hit.
    fn finish_hit<'a>(&self, mesh: &'a Mesh, f: u32, t: f32, u: f32, v: f32) -> Intersection<'a> {
        let geom = mesh.geometry();
        let p = geom.position_at(f, u, v);
        let uv = geom.texcoord_at(f, u, v);
        let geo_frame = geometry::Frame::from_normal(geom.face_normal(f));
        let sh_frame = if geom.has_normals() {
            geometry::Frame::from_normal(geom.normal_at(f, u, v))
        } else {
            geo_frame
        };
        Intersection {
            t,
            p,
            uv,
            geo_frame,
            sh_frame,
            mesh,
        }
    }

    /// Closest hit by scanning every triangle. Reference implementation for
    /// validating the octree traversal.
    #[cfg(test)]
    fn ray_intersect_brute_force(&self, ray: &Ray) -> Option<(u32, f32)> {
        let mesh = self.mesh.as_deref()?;
        let geom = mesh.geometry();
        let mut clipped = *ray;
        let mut best = None;
        for f in 0..geom.n_triangles() {
            if let Some((_, _, t)) = geom.ray_intersect(f, &clipped) {
                clipped.maxt = t;
                best = Some((f, t));
            }
        }
        best
    }
}
