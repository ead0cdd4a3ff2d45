//! The six ornament kinds and the fixed table that describes each one.
//!
//! | Category | Count | Scale | Surface offset | Formed / chaos rate | Motion |
//! |---|---|---|---|---|---|
//! | Ball    | 400 | 0.15–0.35 |  0.2  | 0.03 / 0.01   | tumble (x, y) |
//! | Box     | 150 | 0.2–0.6   |  0.5  | 0.02 / 0.005  | tumble (x, y), ground band |
//! | Light   | 600 | 0.05–0.13 | -0.1  | 0.08 / 0.04   | pulse |
//! | Cascade | 300 | 0.03–0.09 |  0.05 | 0.1 / 0.04    | flow + twinkle |
//! | Gem     | 200 | 0.15–0.40 |  0.4  | 0.02 / 0.005  | slow tumble (x, y, z) |
//! | Bell    | 150 | 0.2–0.5   |  0.3  | 0.025 / 0.01  | swing when formed |

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::color::{self, Rgb};
use crate::geometry::{GroundBand, HeightBand, Placement};
use crate::motion::{FlowPath, MotionPolicy, Swing, Twinkle};

// ════════════════════════════════════════════════════════════════════════════
// Category
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Ball,
    Box,
    Light,
    Cascade,
    Gem,
    Bell,
}

impl Category {
    /// Arena order: instances are laid out in this sequence.
    pub const ALL: [Category; 6] = [
        Category::Ball,
        Category::Box,
        Category::Light,
        Category::Cascade,
        Category::Gem,
        Category::Bell,
    ];

    pub fn index(self) -> usize {
        match self {
            Category::Ball    => 0,
            Category::Box     => 1,
            Category::Light   => 2,
            Category::Cascade => 3,
            Category::Gem     => 4,
            Category::Bell    => 5,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::Ball    => "ball",
            Category::Box     => "box",
            Category::Light   => "light",
            Category::Cascade => "cascade",
            Category::Gem     => "gem",
            Category::Bell    => "bell",
        }
    }

    pub fn spec(self) -> &'static CategorySpec {
        &SPECS[self.index()]
    }
}

// ════════════════════════════════════════════════════════════════════════════
// CategorySpec
// ════════════════════════════════════════════════════════════════════════════

/// Per-frame lerp factors toward each configuration.
///
/// Formed is always the faster of the two so assembly snaps and dispersal
/// drifts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rates {
    pub formed: f32,
    pub chaos:  f32,
}

/// Creation-time orientation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RestRotation {
    Zero,
    /// Random x and y in [0, π).
    Tilted,
    /// Random yaw in [0, 2π).
    Yawed,
}

impl RestRotation {
    pub fn sample<R: Rng + ?Sized>(self, rng: &mut R) -> Vec3 {
        match self {
            RestRotation::Zero   => Vec3::ZERO,
            RestRotation::Tilted => Vec3::new(rng.gen::<f32>() * PI, rng.gen::<f32>() * PI, 0.0),
            RestRotation::Yawed  => Vec3::new(0.0, rng.gen::<f32>() * TAU, 0.0),
        }
    }
}

/// Everything the generator and the per-frame update need to know about one
/// category.
#[derive(Clone, Copy, Debug)]
pub struct CategorySpec {
    pub category:      Category,
    pub default_count: usize,
    /// Half-open `[min, max)` draw for the base scale.
    pub scale_range:   (f32, f32),
    pub palette:       &'static [Rgb],
    pub band:          HeightBand,
    pub placement:     Placement,
    pub ground:        Option<GroundBand>,
    pub rest_rotation: RestRotation,
    pub rates:         Rates,
    pub motion:        MotionPolicy,
}

impl CategorySpec {
    pub fn sample_scale<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        let (lo, hi) = self.scale_range;
        if hi > lo { rng.gen_range(lo..hi) } else { lo }
    }
}

const ORNAMENT_BAND: HeightBand = HeightBand { exponent: 1.0, fraction: 0.9 };

const SOLID_TUMBLE: MotionPolicy = MotionPolicy::Tumble { spin: Vec3::new(0.01, 0.01, 0.0) };

static SPECS: [CategorySpec; 6] = [
    CategorySpec {
        category:      Category::Ball,
        default_count: 400,
        scale_range:   (0.15, 0.35),
        palette:       color::LUXURY,
        band:          ORNAMENT_BAND,
        placement:     Placement::Shell { radial_offset: 0.2 },
        ground:        None,
        rest_rotation: RestRotation::Tilted,
        rates:         Rates { formed: 0.03, chaos: 0.01 },
        motion:        SOLID_TUMBLE,
    },
    CategorySpec {
        category:      Category::Box,
        default_count: 150,
        scale_range:   (0.2, 0.6),
        palette:       color::LUXURY,
        band:          ORNAMENT_BAND,
        placement:     Placement::Shell { radial_offset: 0.5 },
        ground:        Some(GroundBand { y_min: -8.0, y_max: -4.0, widen: 1.5 }),
        rest_rotation: RestRotation::Tilted,
        rates:         Rates { formed: 0.02, chaos: 0.005 },
        motion:        SOLID_TUMBLE,
    },
    CategorySpec {
        category:      Category::Light,
        default_count: 600,
        scale_range:   (0.05, 0.13),
        palette:       color::FAIRY_LIGHT,
        band:          ORNAMENT_BAND,
        placement:     Placement::Shell { radial_offset: -0.1 },
        ground:        None,
        rest_rotation: RestRotation::Zero,
        rates:         Rates { formed: 0.08, chaos: 0.04 },
        motion:        MotionPolicy::Pulse { amplitude: 0.3, frequency: 3.0, phase_step: 0.1 },
    },
    CategorySpec {
        category:      Category::Cascade,
        default_count: 300,
        scale_range:   (0.03, 0.09),
        palette:       color::CASCADE,
        band:          ORNAMENT_BAND,
        placement:     Placement::Shell { radial_offset: 0.05 },
        ground:        None,
        rest_rotation: RestRotation::Zero,
        rates:         Rates { formed: 0.1, chaos: 0.04 },
        motion:        MotionPolicy::Cascade { flow: FlowPath::DEFAULT, twinkle: Twinkle::DEFAULT },
    },
    CategorySpec {
        category:      Category::Gem,
        default_count: 200,
        scale_range:   (0.15, 0.40),
        palette:       color::GEM,
        band:          ORNAMENT_BAND,
        placement:     Placement::Shell { radial_offset: 0.4 },
        ground:        None,
        rest_rotation: RestRotation::Tilted,
        rates:         Rates { formed: 0.02, chaos: 0.005 },
        motion:        MotionPolicy::Tumble { spin: Vec3::new(0.005, 0.01, 0.005) },
    },
    CategorySpec {
        category:      Category::Bell,
        default_count: 150,
        scale_range:   (0.2, 0.5),
        palette:       color::BELL,
        band:          ORNAMENT_BAND,
        placement:     Placement::Shell { radial_offset: 0.3 },
        ground:        None,
        rest_rotation: RestRotation::Yawed,
        rates:         Rates { formed: 0.025, chaos: 0.01 },
        motion:        MotionPolicy::Swing(Swing::DEFAULT),
    },
];
