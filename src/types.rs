//! Core skin value types: Color, Point, Size, Rect, Scale, Font

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    #[error("Invalid hex color: {0}")]
    InvalidHexColor(String),
    #[error("Invalid number: {0}")]
    InvalidNumber(String),
    #[error("Invalid value pair: {0}")]
    InvalidPair(String),
}

/// Packed ARGB color as stored in skin documents (`#AARRGGBB`)
///
/// The alpha channel follows the framebuffer convention: `00` is opaque and
/// `ff` is fully transparent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    argb: u32,
}

impl Color {
    pub const BLACK: Color = Color { argb: 0x0000_0000 };
    pub const WHITE: Color = Color { argb: 0x00ff_ffff };
    pub const TRANSPARENT: Color = Color { argb: 0xff00_0000 };

    pub const fn from_argb(argb: u32) -> Self {
        Self { argb }
    }

    /// Parse a hex color string (`#AARRGGBB`, `#RRGGBB`, or any shorter hex
    /// run, which is read as a plain number)
    pub fn from_hex(hex: &str) -> Result<Self, ValueError> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.is_empty() || digits.len() > 8 {
            return Err(ValueError::InvalidHexColor(hex.to_string()));
        }
        u32::from_str_radix(digits, 16)
            .map(Self::from_argb)
            .map_err(|_| ValueError::InvalidHexColor(hex.to_string()))
    }

    pub fn argb(&self) -> u32 {
        self.argb
    }

    pub fn alpha(&self) -> u8 {
        (self.argb >> 24) as u8
    }

    pub fn red(&self) -> u8 {
        (self.argb >> 16) as u8
    }

    pub fn green(&self) -> u8 {
        (self.argb >> 8) as u8
    }

    pub fn blue(&self) -> u8 {
        self.argb as u8
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08x}", self.argb)
    }
}

/// Pixel position
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Pixel extent
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0,
        height: 0,
    };

    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// Rectangle for layout
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Inset rectangle (margins) for one surface
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Margins {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

/// Resolution scale ratio for one axis: actual pixels over declared pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AxisScale {
    num: i32,
    den: i32,
}

impl Default for AxisScale {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AxisScale {
    pub const IDENTITY: AxisScale = AxisScale { num: 1, den: 1 };

    /// Build a ratio, falling back to identity for a zero denominator
    pub fn new(num: i32, den: i32) -> Self {
        if den == 0 {
            Self::IDENTITY
        } else {
            Self { num, den }
        }
    }

    pub fn num(&self) -> i32 {
        self.num
    }

    pub fn den(&self) -> i32 {
        self.den
    }

    pub fn is_identity(&self) -> bool {
        self.num == self.den
    }

    /// Integer rescale with floor division, as used for already-evaluated
    /// pixel values
    pub fn apply(&self, value: i32) -> i32 {
        if self.is_identity() {
            value
        } else {
            (value as i64 * self.num as i64).div_euclid(self.den as i64) as i32
        }
    }

    /// Rescale with float intermediate, truncating toward zero
    pub fn apply_truncating(&self, value: i32) -> i32 {
        if self.is_identity() {
            value
        } else {
            (value as f64 * self.num as f64 / self.den as f64) as i32
        }
    }
}

/// Horizontal and vertical resolution scale
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Scale {
    pub x: AxisScale,
    pub y: AxisScale,
}

impl Scale {
    pub const IDENTITY: Scale = Scale {
        x: AxisScale::IDENTITY,
        y: AxisScale::IDENTITY,
    };

    pub fn new(x: AxisScale, y: AxisScale) -> Self {
        Self { x, y }
    }

    pub fn is_identity(&self) -> bool {
        self.x.is_identity() && self.y.is_identity()
    }
}

/// Font-relative metrics used by the `w` and `h` coordinate suffixes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FontMetrics {
    pub line_height: i32,
    pub char_width: i32,
}

/// Logical font alias: `(family, size, line height, char width)`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontAlias {
    pub family: String,
    pub size: i32,
    pub height: i32,
    pub width: i32,
}

impl FontAlias {
    pub fn new(family: impl Into<String>, size: i32, height: i32, width: i32) -> Self {
        Self {
            family: family.into(),
            size,
            height,
            width,
        }
    }

    pub fn metrics(&self) -> FontMetrics {
        FontMetrics {
            line_height: self.height,
            char_width: self.width,
        }
    }
}

/// Concrete font selection applied to a widget
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Font {
    pub family: String,
    pub size: i32,
}

impl Font {
    pub fn new(family: impl Into<String>, size: i32) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }
}

/// Handle to a loaded image, as returned by the pixmap loader
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pixmap {
    pub path: PathBuf,
    pub size: Option<Size>,
}

/// Split a `"a,b"` pair into its trimmed halves
pub fn split_pair(value: &str) -> Result<(&str, &str), ValueError> {
    let mut parts = value.split(',');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(a), Some(b), None) => Ok((a.trim(), b.trim())),
        _ => Err(ValueError::InvalidPair(value.to_string())),
    }
}

/// Parse a `"x,y"` pair of plain integers
pub fn parse_int_pair(value: &str) -> Result<(i32, i32), ValueError> {
    let (a, b) = split_pair(value)?;
    let a = a
        .parse::<i32>()
        .map_err(|_| ValueError::InvalidNumber(a.to_string()))?;
    let b = b
        .parse::<i32>()
        .map_err(|_| ValueError::InvalidNumber(b.to_string()))?;
    Ok((a, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex_parsing() {
        let c = Color::from_hex("#009f1313").unwrap();
        assert_eq!(c.argb(), 0x009f_1313);
        assert_eq!(c.alpha(), 0x00);
        assert_eq!(c.red(), 0x9f);

        // Short forms are plain numbers, not CSS shorthand
        let c = Color::from_hex("#ffffff").unwrap();
        assert_eq!(c, Color::WHITE);

        assert!(Color::from_hex("#").is_err());
        assert!(Color::from_hex("#ff00zz00").is_err());
        assert!(Color::from_hex("#1122334455").is_err());
    }

    #[test]
    fn test_axis_scale() {
        let half = AxisScale::new(1, 2);
        assert_eq!(half.apply(101), 50);
        assert_eq!(half.apply(-3), -2);
        assert_eq!(half.apply_truncating(-3), -1);
        assert_eq!(AxisScale::new(3, 0), AxisScale::IDENTITY);
    }

    #[test]
    fn test_zero_denominator_scale_is_harmless() {
        let scale = AxisScale::new(1280, 0);
        assert_eq!((scale.num(), scale.den()), (1, 1));
        assert_eq!(scale.apply(7), 7);
        assert_eq!(scale.apply_truncating(-7), -7);
        assert_eq!(AxisScale::new(1280, 720).den(), 720);
    }

    #[test]
    fn test_pairs() {
        assert_eq!(split_pair(" 10 , e ").unwrap(), ("10", "e"));
        assert!(split_pair("10").is_err());
        assert!(split_pair("1,2,3").is_err());
        assert_eq!(parse_int_pair("4,-2").unwrap(), (4, -2));
    }
}
