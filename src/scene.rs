use crate::accel::Accel;
use crate::light::Emitter;
use crate::mesh::{Intersection, Mesh};
use crate::Error;
use geometry::{Bbox, Ray};
use log::info;
use math::distrib::DiscretePdf;
use std::sync::Arc;

/// The renderable world: meshes, the accelerator over them, and a table of
/// the emissive meshes weighted by surface area.
pub struct Scene {
    meshes: Vec<Arc<Mesh>>,
    accel: Accel,
    lights: Vec<usize>,
    lights_pdf: DiscretePdf,
    activated: bool,
}

impl Scene {
    pub fn new() -> Scene {
        Scene {
            meshes: Vec::new(),
            accel: Accel::new(),
            lights: Vec::new(),
            lights_pdf: DiscretePdf::new(),
            activated: false,
        }
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> Result<(), Error> {
        let mesh = Arc::new(mesh);
        self.accel.add_mesh(Arc::clone(&mesh))?;
        self.meshes.push(mesh);
        Ok(())
    }

    /// Builds the accelerator and the light table. Must run once before any
    /// intersection or emitter query.
    pub fn activate(&mut self) {
        assert!(!self.activated, "scene activated twice");
        self.accel.build();
        for (i, mesh) in self.meshes.iter().enumerate() {
            if mesh.is_emitter() {
                self.lights.push(i);
                self.lights_pdf.append(mesh.surface_area());
            }
        }
        self.lights_pdf.normalize();
        self.activated = true;
        info!(
            "scene ready: {} meshes, {} lights",
            self.meshes.len(),
            self.lights.len()
        );
    }

    pub fn bbox(&self) -> Bbox {
        self.accel.bbox()
    }

    pub fn ray_intersect(&self, ray: &Ray) -> Option<Intersection<'_>> {
        self.accel.ray_intersect(ray)
    }

    pub fn is_occluded(&self, ray: &Ray) -> bool {
        self.accel.is_occluded(ray)
    }

    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    /// Light mesh number `i` in the light table.
    pub fn light(&self, i: usize) -> &Mesh {
        &self.meshes[self.lights[i]]
    }

    /// Picks an emissive mesh with probability proportional to its area.
    /// Returns the mesh, its emitter, and the selection probability, or
    /// `None` when the scene has no lights.
    pub fn sample_emitter(&self, u: f32) -> Option<(&Mesh, &Emitter, f32)> {
        if self.lights.is_empty() {
            return None;
        }
        let (i, pdf) = self.lights_pdf.sample_with_pdf(u);
        let mesh = &*self.meshes[self.lights[i]];
        let emitter = mesh.emitter()?;
        Some((mesh, emitter, pdf))
    }
}

impl Default for Scene {
    fn default() -> Self {
        Scene::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bsdf::Diffuse;
    use crate::light::AreaLight;
    use glam::Vec3;
    use geometry::TriMesh;
    use math::vec3;
    use radiometry::Color;

    fn emissive_quad(scale: f32) -> Mesh {
        Mesh::with_emitter(
            TriMesh::quad(Vec3::ZERO, Vec3::X * scale, Vec3::Y * scale),
            Diffuse::new(Color::gray(0.5)).into(),
            AreaLight::new(Color::white()).into(),
        )
    }

    #[test]
    fn lights_are_selected_by_area() {
        let mut scene = Scene::new();
        scene.add_mesh(emissive_quad(1.0)).unwrap();
        scene.activate();
        assert_eq!(scene.light_count(), 1);
        let (_, _, pdf) = scene.sample_emitter(0.5).unwrap();
        assert!((pdf - 1.0).abs() < 1e-6);
    }

    #[test]
    fn empty_light_table_yields_none() {
        let mut scene = Scene::new();
        scene
            .add_mesh(Mesh::new(
                TriMesh::quad(Vec3::ZERO, Vec3::X, Vec3::Y),
                Diffuse::new(Color::gray(0.5)).into(),
            ))
            .unwrap();
        scene.activate();
        assert_eq!(scene.light_count(), 0);
        assert!(scene.sample_emitter(0.3).is_none());
    }

    #[test]
    fn scene_forwards_intersections() {
        let mut scene = Scene::new();
        scene.add_mesh(emissive_quad(1.0)).unwrap();
        scene.activate();
        let ray = Ray::new(vec3(0.5, 0.5, 1.0), vec3(0.0, 0.0, -1.0));
        let its = scene.ray_intersect(&ray).unwrap();
        assert!(its.mesh.is_emitter());
        assert!(scene.is_occluded(&ray));
    }
}
