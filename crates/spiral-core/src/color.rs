#![forbid(unsafe_code)]

//! Packed RGBA color.

use std::fmt;

/// A straight-alpha RGBA color packed as `0xRRGGBBAA`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct PackedRgba(pub u32);

impl PackedRgba {
    /// Fully transparent (alpha = 0). Matches a zero-filled buffer.
    pub const TRANSPARENT: Self = Self(0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Create an opaque RGB color (alpha = 255).
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Create an RGBA color with explicit alpha.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | (a as u32))
    }

    /// Red channel.
    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Green channel.
    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Blue channel.
    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Alpha channel.
    #[inline]
    pub const fn a(self) -> u8 {
        self.0 as u8
    }

    /// Bytes in buffer order: R, G, B, A.
    #[inline]
    pub const fn to_bytes(self) -> [u8; 4] {
        [self.r(), self.g(), self.b(), self.a()]
    }

    /// Rebuild a color from R, G, B, A bytes.
    #[inline]
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self::rgba(bytes[0], bytes[1], bytes[2], bytes[3])
    }

    /// Parse `RRGGBB` or `#RRGGBB` into an opaque color.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Debug for PackedRgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rgba({}, {}, {}, {})",
            self.r(),
            self.g(),
            self.b(),
            self.a()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_round_trip() {
        let c = PackedRgba::rgba(1, 2, 3, 4);
        assert_eq!((c.r(), c.g(), c.b(), c.a()), (1, 2, 3, 4));
        assert_eq!(PackedRgba::from_bytes(c.to_bytes()), c);
    }

    #[test]
    fn rgb_is_opaque() {
        assert_eq!(PackedRgba::rgb(10, 20, 30).a(), 255);
    }

    #[test]
    fn transparent_is_zero() {
        assert_eq!(PackedRgba::TRANSPARENT.to_bytes(), [0, 0, 0, 0]);
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(PackedRgba::from_hex("ff8000"), Some(PackedRgba::rgb(255, 128, 0)));
        assert_eq!(PackedRgba::from_hex("#00FF7f"), Some(PackedRgba::rgb(0, 255, 127)));
        assert_eq!(PackedRgba::from_hex("fff"), None);
        assert_eq!(PackedRgba::from_hex("gg0000"), None);
    }

    #[test]
    fn debug_format() {
        assert_eq!(format!("{:?}", PackedRgba::rgb(1, 2, 3)), "rgba(1, 2, 3, 255)");
    }
}
