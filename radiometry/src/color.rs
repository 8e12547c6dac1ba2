use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Div, Mul, MulAssign, Sub},
};

/// Linear RGB radiance value. Component-wise arithmetic only; conversion to
/// display values goes through [`gamma_encode`](Color::gamma_encode) and
/// [`to_u8`](Color::to_u8).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

/// Clamps to [0, 1], scales by 255 and casts. NaN maps to 0.
fn saturate_cast_u8(f: f32) -> u8 {
    if f > 1.0 {
        255
    } else if f >= 0.0 {
        (f * 255.0) as u8
    } else {
        0
    }
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32) -> Color {
        Color { r, g, b }
    }

    pub const fn black() -> Color {
        Color::new(0.0, 0.0, 0.0)
    }

    pub const fn white() -> Color {
        Color::new(1.0, 1.0, 1.0)
    }

    pub const fn gray(level: f32) -> Color {
        Color::new(level, level, level)
    }

    pub fn is_black(&self) -> bool {
        self.r <= 0.0 && self.g <= 0.0 && self.b <= 0.0
    }

    pub fn has_nan(&self) -> bool {
        self.r.is_nan() || self.g.is_nan() || self.b.is_nan()
    }

    pub fn is_finite(&self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }

    /// Largest of the three channels; drives Russian-roulette survival.
    pub fn max_component(&self) -> f32 {
        self.r.max(self.g).max(self.b)
    }

    pub fn luminance(&self) -> f32 {
        0.212671 * self.r + 0.715160 * self.g + 0.072169 * self.b
    }

    pub fn gamma_encode(&self) -> Color {
        Color::new(self.r.sqrt(), self.g.sqrt(), self.b.sqrt())
    }

    pub fn to_u8(&self) -> [u8; 3] {
        [
            saturate_cast_u8(self.r),
            saturate_cast_u8(self.g),
            saturate_cast_u8(self.b),
        ]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = f.precision().unwrap_or(3);
        write!(f, "({:.p$}, {:.p$}, {:.p$})", self.r, self.g, self.b, p = p)
    }
}

impl Add for Color {
    type Output = Color;
    fn add(self, rhs: Color) -> Color {
        Color::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl AddAssign for Color {
    fn add_assign(&mut self, rhs: Color) {
        *self = *self + rhs;
    }
}

impl Sub for Color {
    type Output = Color;
    fn sub(self, rhs: Color) -> Color {
        Color::new(self.r - rhs.r, self.g - rhs.g, self.b - rhs.b)
    }
}

impl Mul for Color {
    type Output = Color;
    fn mul(self, rhs: Color) -> Color {
        Color::new(self.r * rhs.r, self.g * rhs.g, self.b * rhs.b)
    }
}

impl MulAssign for Color {
    fn mul_assign(&mut self, rhs: Color) {
        *self = *self * rhs;
    }
}

impl Mul<f32> for Color {
    type Output = Color;
    fn mul(self, k: f32) -> Color {
        Color::new(self.r * k, self.g * k, self.b * k)
    }
}

impl Mul<Color> for f32 {
    type Output = Color;
    fn mul(self, c: Color) -> Color {
        c * self
    }
}

impl Div<f32> for Color {
    type Output = Color;
    fn div(self, k: f32) -> Color {
        Color::new(self.r / k, self.g / k, self.b / k)
    }
}

impl Sum for Color {
    fn sum<I: Iterator<Item = Color>>(iter: I) -> Color {
        iter.fold(Color::black(), |acc, c| acc + c)
    }
}
