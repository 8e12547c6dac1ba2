use crate::proplist::PropertyList;
use crate::Error;
use enum_dispatch::enum_dispatch;
use glam::Vec2;
use radiometry::Color;
use std::fs::File;

/// A color field over the surface parameterization.
#[enum_dispatch]
pub trait TextureModel {
    fn eval(&self, uv: Vec2) -> Color;
}

#[enum_dispatch(TextureModel)]
#[derive(Debug, Clone)]
pub enum Texture {
    Constant(ConstantTexture),
    Checkerboard(CheckerboardTexture),
    Bitmap(BitmapTexture),
}

#[derive(Debug, Clone)]
pub struct ConstantTexture {
    value: Color,
}

impl ConstantTexture {
    pub fn new(value: Color) -> ConstantTexture {
        ConstantTexture { value }
    }

    pub fn from_props(props: &PropertyList) -> Result<ConstantTexture, Error> {
        Ok(ConstantTexture {
            value: props.color_or("value", Color::gray(0.5))?,
        })
    }
}

impl TextureModel for ConstantTexture {
    fn eval(&self, _uv: Vec2) -> Color {
        self.value
    }
}

/// Alternates two nested textures on a 20x20 grid over the unit square.
#[derive(Debug, Clone)]
pub struct CheckerboardTexture {
    odd: Box<Texture>,
    even: Box<Texture>,
    n_children: u32,
}

impl CheckerboardTexture {
    pub fn new() -> CheckerboardTexture {
        CheckerboardTexture {
            odd: Box::new(ConstantTexture::new(Color::gray(0.5)).into()),
            even: Box::new(ConstantTexture::new(Color::gray(0.5)).into()),
            n_children: 0,
        }
    }

    /// Attaches a nested texture; the first call sets the odd cells, the
    /// second the even cells.
    pub fn add_child(&mut self, texture: Texture) -> Result<(), Error> {
        match self.n_children {
            0 => self.odd = Box::new(texture),
            1 => self.even = Box::new(texture),
            _ => return Err(Error::DuplicateChild),
        }
        self.n_children += 1;
        Ok(())
    }
}

impl Default for CheckerboardTexture {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureModel for CheckerboardTexture {
    fn eval(&self, uv: Vec2) -> Color {
        let scaled = uv * 20.0;
        let cell = scaled.x.floor() as i32 + scaled.y.floor() as i32;
        if cell % 2 == 0 {
            self.even.eval(uv)
        } else {
            self.odd.eval(uv)
        }
    }
}

/// Image-backed texture decoded from an 8-bit PNG file. Lookup is
/// nearest-neighbor with `uv` clamped to the unit square; channel values
/// are kept linear, so normal maps read back unmodified.
#[derive(Debug, Clone)]
pub struct BitmapTexture {
    data: Vec<Color>,
    width: u32,
    height: u32,
}

impl BitmapTexture {
    pub fn from_file(path: &str) -> Result<BitmapTexture, Error> {
        let fail = |reason: String| Error::ImageLoad {
            path: path.to_owned(),
            reason,
        };
        let file = File::open(path).map_err(|e| fail(e.to_string()))?;
        let (info, mut reader) = png::Decoder::new(file)
            .read_info()
            .map_err(|e| fail(e.to_string()))?;
        let mut buf = vec![0u8; info.buffer_size()];
        reader
            .next_frame(&mut buf)
            .map_err(|e| fail(e.to_string()))?;
        if info.bit_depth != png::BitDepth::Eight {
            return Err(fail("only 8-bit channels are supported".to_owned()));
        }
        let channels = match info.color_type {
            png::ColorType::Grayscale => 1,
            png::ColorType::RGB => 3,
            png::ColorType::RGBA => 4,
            other => return Err(fail(format!("unsupported color type {:?}", other))),
        };
        let level = |v: u8| v as f32 / 255.0;
        let data: Vec<Color> = match channels {
            1 => buf.iter().map(|&g| Color::gray(level(g))).collect(),
            _ => buf
                .chunks(channels)
                .map(|px| Color::new(level(px[0]), level(px[1]), level(px[2])))
                .collect(),
        };
        Ok(BitmapTexture {
            data,
            width: info.width,
            height: info.height,
        })
    }

    pub fn from_props(props: &PropertyList) -> Result<BitmapTexture, Error> {
        BitmapTexture::from_file(props.str("filename")?)
    }
}

impl TextureModel for BitmapTexture {
    fn eval(&self, uv: Vec2) -> Color {
        let u = uv.x.clamp(0.0, 1.0);
        let v = uv.y.clamp(0.0, 1.0);
        let col = ((u * self.width as f32) as u32).min(self.width - 1);
        let row = ((v * self.height as f32) as u32).min(self.height - 1);
        self.data[(row * self.width + col) as usize]
    }
}
