//! Instance colors and the fixed palettes each category draws from.

use rand::seq::SliceRandom;
use rand::Rng;

// ════════════════════════════════════════════════════════════════════════════
// Rgb
// ════════════════════════════════════════════════════════════════════════════

/// 8-bit sRGB triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb { r: 0xFF, g: 0xFF, b: 0xFF };

    /// Build from a packed `0xRRGGBB` literal.
    pub const fn hex(rgb: u32) -> Self {
        Rgb {
            r: ((rgb >> 16) & 0xFF) as u8,
            g: ((rgb >>  8) & 0xFF) as u8,
            b: ( rgb        & 0xFF) as u8,
        }
    }

    /// Channels as 0.0–1.0 floats, the layout instanced color buffers take.
    pub fn to_array(self) -> [f32; 3] {
        [self.r as f32 / 255.0, self.g as f32 / 255.0, self.b as f32 / 255.0]
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Palettes
// ════════════════════════════════════════════════════════════════════════════

/// Gold, crimson and copper tones shared by balls and boxes.
pub const LUXURY: &[Rgb] = &[
    Rgb::hex(0xFFD700),
    Rgb::hex(0xDC143C),
    Rgb::hex(0xB22222),
    Rgb::hex(0xE5AA70),
    Rgb::hex(0xFF8C00),
    Rgb::hex(0xD2691E),
];

pub const FAIRY_LIGHT: &[Rgb] = &[
    Rgb::hex(0xFFD700),
    Rgb::hex(0xFFA500),
    Rgb::hex(0xFFB347),
    Rgb::hex(0xFFCC00),
];

pub const CASCADE: &[Rgb] = &[
    Rgb::hex(0xFFD700),
    Rgb::hex(0xFFC125),
    Rgb::hex(0xFFAA00),
    Rgb::hex(0xFFDEAD),
];

pub const GEM: &[Rgb] = &[
    Rgb::hex(0x1E90FF),
    Rgb::hex(0x32CD32),
    Rgb::hex(0xC71585),
    Rgb::hex(0xFFD700),
    Rgb::hex(0x9400D3),
];

pub const BELL: &[Rgb] = &[
    Rgb::hex(0xFFD700),
    Rgb::hex(0xCD7F32),
    Rgb::hex(0xDAA520),
];

pub const FOLIAGE: &[Rgb] = &[
    Rgb::hex(0x2E7D32),
    Rgb::hex(0x388E3C),
    Rgb::hex(0x43A047),
    Rgb::hex(0x4CAF50),
    Rgb::hex(0x66BB6A),
    Rgb::hex(0x1B5E20),
];

pub const STAR_GOLD: Rgb = Rgb::hex(0xFFD700);

/// Uniform pick from a palette.  An empty palette yields white.
pub fn pick<R: Rng + ?Sized>(palette: &[Rgb], rng: &mut R) -> Rgb {
    palette.choose(rng).copied().unwrap_or(Rgb::WHITE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn hex_decodes_channels() {
        let c = Rgb::hex(0xFF8000);
        assert_eq!((c.r, c.g, c.b), (0xFF, 0x80, 0x00));
        let f = c.to_array();
        assert_eq!(f[0], 1.0);
        assert!((f[1] - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn pick_stays_in_palette() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let c = pick(GEM, &mut rng);
            assert!(GEM.contains(&c));
        }
    }

    #[test]
    fn pick_empty_palette_is_white() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(pick(&[], &mut rng), Rgb::WHITE);
    }
}
