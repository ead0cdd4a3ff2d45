//! The star on top of the tree.

use glam::Vec3;

use crate::color::{self, Rgb};
use crate::mode::TreeMode;
use crate::motion::phase;
use crate::transform::LiveTransform;

/// A single transform that drifts between the apex and a point high above
/// the chaos cloud, spinning slowly with a heartbeat scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Topper {
    pub formed_position: Vec3,
    pub chaos_position:  Vec3,
    /// Per-frame lerp factor.
    pub rate:            f32,
    pub color:           Rgb,
    live:                LiveTransform,
}

impl Default for Topper {
    fn default() -> Self {
        Topper::new(Vec3::new(0.0, 8.8, 0.0), Vec3::new(0.0, 25.0, 0.0))
    }
}

impl Topper {
    pub fn new(formed_position: Vec3, chaos_position: Vec3) -> Self {
        Topper {
            formed_position,
            chaos_position,
            rate:  0.04,
            color: color::STAR_GOLD,
            live:  LiveTransform::new(chaos_position, Vec3::ZERO, 1.0),
        }
    }

    /// Sits a little above the apex of a cone whose top is at `top_y`.
    pub fn above_apex(top_y: f32) -> Self {
        Topper::new(Vec3::new(0.0, top_y + 0.8, 0.0), Vec3::new(0.0, 25.0, 0.0))
    }

    pub fn live(&self) -> &LiveTransform { &self.live }

    /// `factor` is the lerp factor for this tick, already converted by the
    /// caller's time base.
    pub fn step(&mut self, mode: TreeMode, time: f64, factor: f32) {
        let dest = match mode {
            TreeMode::Formed => self.formed_position,
            TreeMode::Chaos  => self.chaos_position,
        };
        self.live.position = self.live.position.lerp(dest, factor);
        self.live.rotation = Vec3::new(0.0, phase(time, 0.2, 0.0), phase(time, 0.5, 0.0).sin() * 0.1);
        self.live.scale    = 1.0 + phase(time, 2.5, 0.0).sin() * 0.05;
    }
}
