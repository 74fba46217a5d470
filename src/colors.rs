// src/colors.rs

use palette::Srgb;
use serde::Serializer;

/// Tissue colors, assigned by first-seen tissue index and cycled when there
/// are more tissues than entries. Duplicate entries are intentional.
const TISSUE_PALETTE: [(u8, u8, u8); 22] = [
    (0x4d, 0xaf, 0x4a),
    (0xf7, 0x81, 0xbf),
    (0xa6, 0x56, 0x28),
    (0x98, 0x4e, 0xa3),
    (0x99, 0x99, 0x99),
    (0xe4, 0x1a, 0x1c),
    (0x37, 0x7e, 0xb8),
    (0xff, 0x7f, 0x00),
    (0xff, 0xff, 0x33),
    (0xa6, 0xce, 0xe3),
    (0x1f, 0x78, 0xb4),
    (0xb2, 0xdf, 0x8a),
    (0x33, 0xa0, 0x2c),
    (0xfb, 0x9a, 0x99),
    (0xe3, 0x1a, 0x1c),
    (0xfd, 0xbf, 0x6f),
    (0xff, 0x7f, 0x00),
    (0xca, 0xb2, 0xd6),
    (0x6a, 0x3d, 0x9a),
    (0xff, 0xff, 0x99),
    (0xb1, 0x59, 0x28),
    (0x00, 0xff, 0xff),
];

pub fn palette_len() -> usize {
    TISSUE_PALETTE.len()
}

pub fn tissue_color(index: usize) -> Srgb<u8> {
    let (r, g, b) = TISSUE_PALETTE[index % TISSUE_PALETTE.len()];
    Srgb::new(r, g, b)
}

pub fn central_color() -> Srgb<u8> {
    Srgb::new(255, 0, 0)
}

pub fn black() -> Srgb<u8> {
    Srgb::new(0, 0, 0)
}

pub fn white() -> Srgb<u8> {
    Srgb::new(255, 255, 255)
}

pub fn gray(level: u8) -> Srgb<u8> {
    Srgb::new(level, level, level)
}

/// `#rrggbb`, the form both the page script and SVG accept.
pub fn to_hex(color: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

/// Serde adapter writing a color as its hex string.
pub fn serialize_hex<S: Serializer>(color: &Srgb<u8>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&to_hex(*color))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_cycles() {
        assert_eq!(tissue_color(0), tissue_color(palette_len()));
        assert_eq!(to_hex(tissue_color(0)), "#4daf4a");
        assert_eq!(to_hex(tissue_color(21)), "#00ffff");
        assert_eq!(to_hex(tissue_color(23)), "#f781bf");
    }

    #[test]
    fn test_central_is_red() {
        assert_eq!(to_hex(central_color()), "#ff0000");
    }
}
