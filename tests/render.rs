//! End-to-end transport tests on tiny scenes with known answers.

use geometry::{Ray, TriMesh};
use glam::Vec3;
use lumen::bsdf::Diffuse;
use lumen::integrator::{Integrator, IntegratorModel};
use lumen::light::AreaLight;
use lumen::mesh::Mesh;
use lumen::sampler::Sampler;
use lumen::scene::Scene;
use lumen::PropertyList;
use math::vec3;
use radiometry::Color;

const RADIANCE: Color = Color::new(1.0, 1.0, 1.0);

/// A unit quad at z = 0 facing +z, emitting uniformly.
fn emissive_quad_scene() -> Scene {
    let mesh = Mesh::with_emitter(
        TriMesh::quad(Vec3::ZERO, Vec3::X, Vec3::Y),
        Diffuse::new(Color::gray(0.5)).into(),
        AreaLight::new(RADIANCE).into(),
    );
    let mut scene = Scene::new();
    scene.add_mesh(mesh).unwrap();
    scene.activate();
    scene
}

fn all_transport_integrators() -> Vec<Integrator> {
    let props = PropertyList::new();
    ["whitted", "path_mats", "path_ems", "path_mis"]
        .iter()
        .map(|name| Integrator::from_name(name, &props).unwrap())
        .collect()
}

#[test]
fn looking_at_a_light_sees_its_radiance() {
    let scene = emissive_quad_scene();
    let ray = Ray::new(vec3(0.3, 0.4, 2.0), vec3(0.0, 0.0, -1.0));
    for integrator in all_transport_integrators() {
        let mut sampler = Sampler::seeded(1);
        let l = integrator.li(&scene, &mut sampler, &ray);
        // A head-on view of an emitter is exact: the path carries the
        // emitted radiance with unit throughput and no other light exists.
        assert!(
            (l.r - RADIANCE.r).abs() < 1e-4
                && (l.g - RADIANCE.g).abs() < 1e-4
                && (l.b - RADIANCE.b).abs() < 1e-4,
            "got {:?}",
            l
        );
    }
}

#[test]
fn the_back_of_an_area_light_is_dark() {
    let scene = emissive_quad_scene();
    let ray = Ray::new(vec3(0.3, 0.4, -2.0), vec3(0.0, 0.0, 1.0));
    for integrator in all_transport_integrators() {
        let mut sampler = Sampler::seeded(1);
        let l = integrator.li(&scene, &mut sampler, &ray);
        assert!(l.is_black(), "got {:?}", l);
    }
}

#[test]
fn rays_that_miss_carry_nothing() {
    let scene = emissive_quad_scene();
    let ray = Ray::new(vec3(5.0, 5.0, 2.0), vec3(0.0, 0.0, -1.0));
    for integrator in all_transport_integrators() {
        let mut sampler = Sampler::seeded(1);
        assert!(integrator.li(&scene, &mut sampler, &ray).is_black());
    }
}

#[test]
fn empty_scene_is_black_everywhere() {
    let mut scene = Scene::new();
    scene.activate();
    let ray = Ray::new(vec3(0.0, 0.0, 2.0), vec3(0.0, 0.0, -1.0));
    assert!(scene.ray_intersect(&ray).is_none());
    let props = PropertyList::new()
        .set_point("position", vec3(0.0, 5.0, 0.0))
        .set_color("energy", Color::gray(100.0));
    for name in ["normals", "ao", "simple", "whitted", "path_mats", "path_ems", "path_mis"] {
        let integrator = Integrator::from_name(name, &props).unwrap();
        let mut sampler = Sampler::seeded(1);
        assert!(integrator.li(&scene, &mut sampler, &ray).is_black(), "{}", name);
    }
}

#[test]
fn sphere_hit_distance_matches_geometry() {
    let mesh = Mesh::new(
        TriMesh::uv_sphere(Vec3::ZERO, 1.0, 32, 64),
        Diffuse::new(Color::gray(0.5)).into(),
    );
    let mut scene = Scene::new();
    scene.add_mesh(mesh).unwrap();
    scene.activate();
    let its = scene
        .ray_intersect(&Ray::new(vec3(0.0, 0.0, -3.0), vec3(0.0, 0.0, 1.0)))
        .unwrap();
    // Tessellation flattens the surface slightly.
    assert!((its.t - 2.0).abs() < 0.01, "t = {}", its.t);
    assert!(its.sh_frame.n.dot(vec3(0.0, 0.0, -1.0)) > 0.99);
}

#[test]
fn normals_view_of_a_quad_is_axis_aligned() {
    let mesh = Mesh::new(
        TriMesh::quad(Vec3::ZERO, Vec3::X, Vec3::Y),
        Diffuse::new(Color::gray(0.5)).into(),
    );
    let mut scene = Scene::new();
    scene.add_mesh(mesh).unwrap();
    scene.activate();
    let integrator = Integrator::from_name("normals", &PropertyList::new()).unwrap();
    let mut sampler = Sampler::seeded(1);
    let ray = Ray::new(vec3(0.5, 0.5, 1.0), vec3(0.0, 0.0, -1.0));
    let l = integrator.li(&scene, &mut sampler, &ray);
    assert!((l.b - 1.0).abs() < 1e-5 && l.r.abs() < 1e-5 && l.g.abs() < 1e-5);
}

#[test]
fn integrators_are_deterministic_under_a_fixed_seed() {
    let scene = emissive_quad_scene();
    let integrator = Integrator::from_name("path_mis", &PropertyList::new()).unwrap();
    // Grazing ray so light sampling and roulette actually draw variates.
    let ray = Ray::new(vec3(2.0, 2.0, 0.5), vec3(-1.0, -1.0, -0.3).normalize());
    let mut a = Sampler::seeded(7);
    let mut b = Sampler::seeded(7);
    let la = integrator.li(&scene, &mut a, &ray);
    let lb = integrator.li(&scene, &mut b, &ray);
    assert_eq!(la, lb);
}

#[test]
fn simple_integrator_obeys_inverse_square_falloff() {
    let mesh = Mesh::new(
        TriMesh::quad(vec3(-50.0, -50.0, 0.0), Vec3::X * 100.0, Vec3::Y * 100.0),
        Diffuse::new(Color::gray(0.5)).into(),
    );
    let mut scene = Scene::new();
    scene.add_mesh(mesh).unwrap();
    scene.activate();
    let mut sampler = Sampler::seeded(1);
    let ray = Ray::new(vec3(0.0, 0.0, 4.0), vec3(0.0, 0.0, -1.0));

    let at = |h: f32| {
        let props = PropertyList::new()
            .set_point("position", vec3(0.0, 0.0, h))
            .set_color("energy", Color::gray(100.0));
        Integrator::from_name("simple", &props).unwrap()
    };
    let mut s2 = Sampler::seeded(1);
    let near = at(1.0).li(&scene, &mut sampler, &ray);
    let far = at(2.0).li(&scene, &mut s2, &ray);
    assert!(near.r > 0.0);
    assert!((near.r / far.r - 4.0).abs() < 1e-3, "ratio {}", near.r / far.r);
}
