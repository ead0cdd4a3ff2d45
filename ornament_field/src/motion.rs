//! Per-category motion layered on top of the interpolated position.
//!
//! Dispatch is a plain `match` on [`MotionPolicy`]; there is no per-instance
//! trait object.  Overlays only touch rotation and scale.  The one policy
//! that moves position ([`MotionPolicy::Cascade`] while formed) does so by
//! replacing the interpolation destination, so it still lerps.

use std::f64::consts::TAU;

use glam::Vec3;

use crate::geometry::ConeGeometry;
use crate::mode::TreeMode;
use crate::transform::LiveTransform;

// ════════════════════════════════════════════════════════════════════════════
// Parameters
// ════════════════════════════════════════════════════════════════════════════

/// Descending path along the cone surface for cascade lights.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlowPath {
    /// World units per second.
    pub speed:        f32,
    /// Vertical distance travelled before wrapping back to the top.
    pub span:         f32,
    /// Staggers instances along the path: `index · index_offset`.
    pub index_offset: f32,
    /// Fixed lerp factor toward the moving point.
    pub rate:         f32,
}

impl FlowPath {
    pub const DEFAULT: FlowPath = FlowPath { speed: 2.5, span: 16.0, index_offset: 13.37, rate: 0.1 };

    /// Distance below the top, in `[0, span]`.
    pub fn y_offset(&self, time: f64, index: u32) -> f32 {
        let travelled = time * self.speed as f64 + index as f64 * self.index_offset as f64;
        travelled.rem_euclid(self.span as f64) as f32
    }

    pub fn current_y(&self, top_y: f32, time: f64, index: u32) -> f32 {
        top_y - self.y_offset(time, index)
    }

    /// Seconds for one full descent.
    pub fn period(&self) -> f32 { self.span / self.speed }

    pub fn point(&self, cone: &ConeGeometry, time: f64, index: u32, angle: f32) -> Vec3 {
        cone.surface_point(self.current_y(cone.top_y(), time, index), angle)
    }
}

/// Three-band brightness flicker driven by `sin(frequency·t + index_phase·i)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Twinkle {
    pub frequency:    f32,
    pub index_phase:  f32,
    pub bright_above: f32,
    pub dim_below:    f32,
    pub bright:       f32,
    pub normal:       f32,
    pub dim:          f32,
}

impl Twinkle {
    pub const DEFAULT: Twinkle = Twinkle {
        frequency:    15.0,
        index_phase:  20.0,
        bright_above: 0.8,
        dim_below:    -0.5,
        bright:       1.5,
        normal:       0.8,
        dim:          0.2,
    };

    pub fn multiplier(&self, time: f64, index: u32) -> f32 {
        let s = phase(time, self.frequency, index as f32 * self.index_phase).sin();
        if s > self.bright_above {
            self.bright
        } else if s < self.dim_below {
            self.dim
        } else {
            self.normal
        }
    }
}

/// Bounded pendulum swing around the rest orientation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Swing {
    pub z_amplitude: f32,
    pub z_frequency: f32,
    pub x_amplitude: f32,
    pub x_frequency: f32,
    /// Tumble used while the field is dispersed.
    pub chaos_spin:  Vec3,
}

impl Swing {
    pub const DEFAULT: Swing = Swing {
        z_amplitude: 0.2,
        z_frequency: 3.0,
        x_amplitude: 0.1,
        x_frequency: 2.0,
        chaos_spin:  Vec3::new(0.01, 0.01, 0.0),
    };

    pub fn offset(&self, time: f64, index: u32) -> Vec3 {
        let i = index as f32;
        Vec3::new(
            phase(time, self.x_frequency, i).cos() * self.x_amplitude,
            0.0,
            phase(time, self.z_frequency, i).sin() * self.z_amplitude,
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Phase helpers
// ════════════════════════════════════════════════════════════════════════════

/// `frequency·time + offset` reduced to `[0, 2π)` in double precision, so
/// sinusoids stay smooth however long the field has been running.
pub fn phase(time: f64, frequency: f32, offset: f32) -> f32 {
    (time * frequency as f64 + offset as f64).rem_euclid(TAU) as f32
}

/// Keep accumulated Euler angles in `[0, 2π)`.
pub fn wrap_angles(rotation: Vec3) -> Vec3 {
    rotation.rem_euclid(Vec3::splat(std::f32::consts::TAU))
}

// ════════════════════════════════════════════════════════════════════════════
// MotionPolicy
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MotionPolicy {
    /// Rotation and scale stay at their creation values.
    Hold,
    /// Constant rotation increment per frame.
    Tumble { spin: Vec3 },
    /// `scale = base · (1 + amplitude · sin(frequency·t + phase_step·i))`.
    Pulse { amplitude: f32, frequency: f32, phase_step: f32 },
    /// Flows down the cone while formed; twinkles always.
    Cascade { flow: FlowPath, twinkle: Twinkle },
    /// Swings while formed, tumbles while dispersed.
    Swing(Swing),
}

/// Time inputs shared by every instance in one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionFrame {
    pub mode:   TreeMode,
    /// Seconds since the field started.
    pub time:   f64,
    /// How many reference frames this tick stands for; 1.0 under the
    /// per-frame time base.
    pub frames: f32,
}

impl MotionPolicy {
    /// Moving destination and lerp factor, when this policy overrides the
    /// static target.
    pub fn flow_destination(
        &self,
        cone:       &ConeGeometry,
        frame:      &MotionFrame,
        index:      u32,
        flow_angle: f32,
    ) -> Option<(Vec3, f32)> {
        match self {
            MotionPolicy::Cascade { flow, .. } if frame.mode.is_formed() => {
                Some((flow.point(cone, frame.time, index, flow_angle), flow.rate))
            }
            _ => None,
        }
    }

    /// Write rotation and scale for one instance.
    pub fn overlay(
        &self,
        frame:         &MotionFrame,
        index:         u32,
        rest_rotation: Vec3,
        base_scale:    f32,
        live:          &mut LiveTransform,
    ) {
        match *self {
            MotionPolicy::Hold => {
                live.rotation = rest_rotation;
                live.scale    = base_scale;
            }
            MotionPolicy::Tumble { spin } => {
                live.rotation = wrap_angles(live.rotation + spin * frame.frames);
                live.scale    = base_scale;
            }
            MotionPolicy::Pulse { amplitude, frequency, phase_step } => {
                let pulse     = phase(frame.time, frequency, index as f32 * phase_step).sin() * amplitude;
                live.rotation = rest_rotation;
                live.scale    = base_scale * (1.0 + pulse);
            }
            MotionPolicy::Cascade { twinkle, .. } => {
                live.rotation = rest_rotation;
                live.scale    = base_scale * twinkle.multiplier(frame.time, index);
            }
            MotionPolicy::Swing(swing) => {
                if frame.mode.is_formed() {
                    live.rotation = rest_rotation + swing.offset(frame.time, index);
                } else {
                    live.rotation = wrap_angles(live.rotation + swing.chaos_spin * frame.frames);
                }
                live.scale = base_scale;
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
