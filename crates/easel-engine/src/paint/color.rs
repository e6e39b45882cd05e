/// Straight-alpha RGBA color with 8-bit channels.
///
/// This is the representation sketches work with (`fill(255, 0, 0)`).
/// Conversion to normalized floats happens once per vertex when a contour
/// becomes a mesh.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    /// Opaque color; alpha defaults to 255.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque gray level.
    #[inline]
    pub const fn gray(v: u8) -> Self {
        Self::rgb(v, v, v)
    }

    /// Parses `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix('#').unwrap_or(s);
        let byte = |i: usize| u8::from_str_radix(s.get(i..i + 2)?, 16).ok();
        match s.len() {
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    #[inline]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    #[inline]
    pub fn is_opaque(self) -> bool {
        self.a == 255
    }

    /// Channels in `[0, 1]`.
    #[inline]
    pub fn to_normalized(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }

    /// Component-wise product, used to apply a tint to an image.
    #[inline]
    pub fn modulate(self, other: Color) -> Color {
        let m = |a: u8, b: u8| ((a as u16 * b as u16 + 127) / 255) as u8;
        Color::rgba(m(self.r, other.r), m(self.g, other.g), m(self.b, other.b), m(self.a, other.a))
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Color::rgb(r, g, b)
    }
}

impl From<(u8, u8, u8, u8)> for Color {
    fn from((r, g, b, a): (u8, u8, u8, u8)) -> Self {
        Color::rgba(r, g, b, a)
    }
}

/// Gray level, as in `fill(128)`.
impl From<u8> for Color {
    fn from(v: u8) -> Self {
        Color::gray(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_defaults_to_opaque() {
        assert_eq!(Color::rgb(1, 2, 3).a, 255);
        assert!(Color::from((1, 2, 3)).is_opaque());
    }

    #[test]
    fn normalized_range() {
        assert_eq!(Color::rgba(255, 0, 51, 255).to_normalized(), [1.0, 0.0, 0.2, 1.0]);
        assert_eq!(Color::TRANSPARENT.to_normalized(), [0.0; 4]);
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(Color::from_hex("#ff8000"), Some(Color::rgb(255, 128, 0)));
        assert_eq!(Color::from_hex("ff800040"), Some(Color::rgba(255, 128, 0, 64)));
        assert_eq!(Color::from_hex("#ff80"), None);
        assert_eq!(Color::from_hex("#gg0000"), None);
    }

    #[test]
    fn modulate_with_white_is_identity() {
        let c = Color::rgba(10, 20, 30, 40);
        assert_eq!(c.modulate(Color::WHITE), c);
        assert_eq!(c.modulate(Color::TRANSPARENT), Color::TRANSPARENT);
    }
}
