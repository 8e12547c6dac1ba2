use glam::Vec3;
use radiometry::Color;
use std::collections::HashMap;

/// Errors raised while assembling a scene from declarative properties.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("missing required property \"{0}\"")]
    MissingProperty(String),
    #[error("property \"{name}\" has the wrong type, expected {expected}")]
    WrongType {
        name: &'static str,
        expected: &'static str,
    },
    #[error("component already has a child of this kind")]
    DuplicateChild,
    #[error("component does not accept a child of this kind")]
    UnsupportedChild,
    #[error("the accelerator already holds a mesh")]
    MeshAlreadyRegistered,
    #[error("no component registered under the name \"{0}\"")]
    UnknownComponent(String),
    #[error("could not load image \"{path}\": {reason}")]
    ImageLoad { path: String, reason: String },
}

#[derive(Debug, Clone)]
pub enum Value {
    Float(f32),
    Color(Color),
    Point(Vec3),
    Str(String),
}

/// A bag of named values handed to component constructors. Each component
/// reads what it needs and substitutes defaults for the rest.
#[derive(Debug, Clone, Default)]
pub struct PropertyList {
    values: HashMap<String, Value>,
}

impl PropertyList {
    pub fn new() -> PropertyList {
        PropertyList::default()
    }

    pub fn set_float(mut self, name: &str, v: f32) -> Self {
        self.values.insert(name.to_owned(), Value::Float(v));
        self
    }

    pub fn set_color(mut self, name: &str, v: Color) -> Self {
        self.values.insert(name.to_owned(), Value::Color(v));
        self
    }

    pub fn set_point(mut self, name: &str, v: Vec3) -> Self {
        self.values.insert(name.to_owned(), Value::Point(v));
        self
    }

    pub fn set_str(mut self, name: &str, v: &str) -> Self {
        self.values.insert(name.to_owned(), Value::Str(v.to_owned()));
        self
    }

    pub fn float(&self, name: &'static str) -> Result<f32, Error> {
        match self.values.get(name) {
            Some(Value::Float(v)) => Ok(*v),
            Some(_) => Err(Error::WrongType {
                name,
                expected: "float",
            }),
            None => Err(Error::MissingProperty(name.to_owned())),
        }
    }

    pub fn float_or(&self, name: &'static str, default: f32) -> Result<f32, Error> {
        match self.float(name) {
            Err(Error::MissingProperty(_)) => Ok(default),
            other => other,
        }
    }

    pub fn color(&self, name: &'static str) -> Result<Color, Error> {
        match self.values.get(name) {
            Some(Value::Color(v)) => Ok(*v),
            Some(_) => Err(Error::WrongType {
                name,
                expected: "color",
            }),
            None => Err(Error::MissingProperty(name.to_owned())),
        }
    }

    pub fn color_or(&self, name: &'static str, default: Color) -> Result<Color, Error> {
        match self.color(name) {
            Err(Error::MissingProperty(_)) => Ok(default),
            other => other,
        }
    }

    pub fn point(&self, name: &'static str) -> Result<Vec3, Error> {
        match self.values.get(name) {
            Some(Value::Point(v)) => Ok(*v),
            Some(_) => Err(Error::WrongType {
                name,
                expected: "point",
            }),
            None => Err(Error::MissingProperty(name.to_owned())),
        }
    }

    pub fn point_or(&self, name: &'static str, default: Vec3) -> Result<Vec3, Error> {
        match self.point(name) {
            Err(Error::MissingProperty(_)) => Ok(default),
            other => other,
        }
    }

    pub fn str(&self, name: &'static str) -> Result<&str, Error> {
        match self.values.get(name) {
            Some(Value::Str(v)) => Ok(v),
            Some(_) => Err(Error::WrongType {
                name,
                expected: "string",
            }),
            None => Err(Error::MissingProperty(name.to_owned())),
        }
    }

    pub fn str_or<'a>(&'a self, name: &'static str, default: &'a str) -> Result<&'a str, Error> {
        match self.values.get(name) {
            Some(Value::Str(v)) => Ok(v),
            Some(_) => Err(Error::WrongType {
                name,
                expected: "string",
            }),
            None => Ok(default),
        }
    }
}
