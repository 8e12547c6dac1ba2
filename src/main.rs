use std::collections::HashMap;
use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rayon::prelude::*;

use lumen::bsdf::{Diffuse, Microfacet};
use lumen::camera::Camera;
use lumen::integrator::{Integrator, IntegratorModel};
use lumen::light::AreaLight;
use lumen::mesh::Mesh;
use lumen::sampler::Sampler;
use lumen::scene::Scene;
use lumen::texture::{CheckerboardTexture, ConstantTexture};
use lumen::PropertyList;

use geometry::TriMesh;
use math::vec3;
use radiometry::Color;

struct CliOptions {
    integrator: String,
    output: String,
    spp: u32,
    width: u32,
    height: u32,
}

impl Default for CliOptions {
    fn default() -> Self {
        CliOptions {
            integrator: "simple".to_owned(),
            output: "output.png".to_owned(),
            spp: 32,
            width: 640,
            height: 480,
        }
    }
}

impl CliOptions {
    fn message() -> &'static str {
        r#"
        --integrator <normals|simple|ao|whitted|path_mats|path_ems|path_mis>
        --output <file.png|file.exr>
        --spp <samples per pixel>
        --width <pixels>  --height <pixels>
        "#
    }
}

fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut pairs: HashMap<String, Option<String>> = HashMap::new();
    let mut args = args.into_iter().rev().collect::<Vec<_>>();
    args.pop(); // Removes args[0]

    while let Some(key) = args.pop() {
        if !key.starts_with('-') {
            return Err(format!("Unrecognized key {}", key));
        }
        match args.last() {
            None => {
                pairs.insert(key, None);
            }
            Some(value) => {
                if value.starts_with('-') {
                    pairs.insert(key, None);
                } else {
                    let value = args.pop();
                    pairs.insert(key, value);
                }
            }
        }
    }
    let mut options = CliOptions::default();
    for (k, v) in pairs.into_iter() {
        let v = v.unwrap_or_default();
        match k.as_str() {
            "--integrator" => options.integrator = v,
            "--output" => options.output = v,
            "--spp" => options.spp = v.parse().map_err(|_| format!("Bad spp {}", v))?,
            "--width" => options.width = v.parse().map_err(|_| format!("Bad width {}", v))?,
            "--height" => options.height = v.parse().map_err(|_| format!("Bad height {}", v))?,
            "--help" => {
                println!("usage: {}", CliOptions::message());
            }
            _ => return Err(format!("Unrecognized key {}", k)),
        }
    }
    Ok(options)
}

/// Demo world: a single tessellated sphere. The accelerator handles one
/// mesh, so the scene stays minimal; path tracers get an emissive surface
/// so they have something to find.
fn build_scene(integrator_name: &str) -> Result<Scene, lumen::Error> {
    let sphere = TriMesh::uv_sphere(vec3(0.0, 0.0, 0.0), 1.0, 32, 64);

    let mut checker = CheckerboardTexture::new();
    checker.add_child(ConstantTexture::new(Color::new(0.8, 0.3, 0.25)).into())?;
    checker.add_child(ConstantTexture::new(Color::gray(0.9)).into())?;
    let mut diffuse = Diffuse::default();
    diffuse.set_albedo(checker.into())?;

    let mesh = match integrator_name {
        "path_mats" | "path_ems" | "path_mis" | "whitted" => Mesh::with_emitter(
            sphere,
            diffuse.into(),
            AreaLight::new(Color::new(1.0, 0.9, 0.7)).into(),
        ),
        "ao" | "normals" | "simple" => Mesh::new(sphere, diffuse.into()),
        _ => Mesh::new(
            sphere,
            Microfacet::new(0.1, Color::new(0.3, 0.3, 0.4)).into(),
        ),
    };

    let mut scene = Scene::new();
    scene.add_mesh(mesh)?;
    scene.activate();
    Ok(scene)
}

fn render(
    scene: &Scene,
    camera: &Camera,
    integrator: &Integrator,
    spp: u32,
) -> Vec<Color> {
    let (width, height) = camera.resolution();
    let bar = ProgressBar::new(height as u64);
    bar.set_style(
        ProgressStyle::default_bar().template("{elapsed_precise} [{bar:40}] {pos}/{len} rows"),
    );

    let rows: Vec<Vec<Color>> = (0..height)
        .into_par_iter()
        .map(|row| {
            let mut sampler = Sampler::seeded(row as u64);
            let mut line = Vec::with_capacity(width as usize);
            for col in 0..width {
                let mut acc = Color::black();
                for _ in 0..spp {
                    if let Some(ray) = camera.shoot_ray(row, col, sampler.next_2d()) {
                        acc += integrator.li(scene, &mut sampler, &ray);
                    }
                }
                line.push(acc / spp as f32);
            }
            bar.inc(1);
            line
        })
        .collect();
    bar.finish();
    rows.into_iter().flatten().collect()
}

fn write_image(path: &str, pixels: &[Color], width: u32, height: u32) -> Result<(), Box<dyn Error>> {
    if path.ends_with(".exr") {
        exr::prelude::write_rgb_file(path, width as usize, height as usize, |x, y| {
            let c = pixels[y * width as usize + x];
            (c.r, c.g, c.b)
        })?;
        return Ok(());
    }

    let mut data = Vec::with_capacity(pixels.len() * 3);
    for c in pixels {
        data.extend_from_slice(&c.gamma_encode().to_u8());
    }
    let file = File::create(Path::new(path))?;
    let w = &mut BufWriter::new(file);
    let mut encoder = png::Encoder::new(w, width, height);
    encoder.set_color(png::ColorType::RGB);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&data)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let options = parse_args(std::env::args().collect())?;

    let scene = build_scene(&options.integrator)?;
    let camera = Camera::new((options.width, options.height), std::f32::consts::FRAC_PI_3)
        .looking_at(vec3(0.0, 0.6, -4.0), vec3(0.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0));

    let props = PropertyList::new()
        .set_point("position", vec3(4.0, 4.0, -4.0))
        .set_color("energy", Color::gray(1000.0));
    let integrator = Integrator::from_name(&options.integrator, &props)?;

    info!(
        "rendering {}x{} at {} spp with {}",
        options.width, options.height, options.spp, options.integrator
    );
    let pixels = render(&scene, &camera, &integrator, options.spp);
    write_image(&options.output, &pixels, options.width, options.height)?;
    info!("wrote {}", options.output);
    Ok(())
}
