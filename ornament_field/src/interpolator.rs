//! Per-frame state interpolation.
//!
//! Each tick every live position moves a fraction of the way toward its
//! destination:
//!
//! * `Formed` → the static target (or, for cascades, a point flowing down
//!   the cone), at the category's formed rate
//! * `Chaos`  → the static chaos position, at the slower chaos rate
//!
//! Positions are never assigned directly after generation.  Category motion
//! is applied to the same candidate transform before it is committed, and a
//! candidate that is not finite freezes that one instance instead of being
//! written.

use glam::Vec3;
use tracing::warn;

use crate::config::TimeBase;
use crate::geometry::ConeGeometry;
use crate::mode::TreeMode;
use crate::motion::MotionFrame;
use crate::population::{Instance, Population};

// ════════════════════════════════════════════════════════════════════════════
// FrameClock
// ════════════════════════════════════════════════════════════════════════════

/// Monotonic time source for the animation loop.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameClock {
    /// Seconds since start, in double precision so phases stay smooth over
    /// long runs.
    pub elapsed: f64,
    /// Length of the latest tick.
    pub dt:      f32,
    pub frame:   u64,
}

impl FrameClock {
    /// Negative or non-finite `dt` counts as zero.
    pub fn advance(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.dt       = dt;
        self.elapsed += dt as f64;
        self.frame   += 1;
    }
}

// ════════════════════════════════════════════════════════════════════════════
// StateInterpolator
// ════════════════════════════════════════════════════════════════════════════

/// Outcome of one [`StateInterpolator::step`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    pub updated:      usize,
    pub newly_frozen: usize,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct StateInterpolator {
    time_base: TimeBase,
}

impl StateInterpolator {
    pub fn new(time_base: TimeBase) -> Self {
        StateInterpolator { time_base }
    }

    pub fn time_base(&self) -> TimeBase { self.time_base }

    /// Where an instance is heading this frame, and the per-frame rate to
    /// get there.
    pub fn destination(
        &self,
        population: &Population,
        instance:   &Instance,
        frame:      &MotionFrame,
    ) -> (Vec3, f32) {
        destination_on(population.cone(), instance, frame)
    }

    /// Advance every live transform by one tick.
    pub fn step(&self, population: &mut Population, mode: TreeMode, clock: &FrameClock) -> StepReport {
        let frame = MotionFrame {
            mode,
            time:   clock.elapsed,
            frames: self.time_base.frames(clock.dt),
        };
        let cone = *population.cone();
        let (instances, live, frozen) = population.parts_mut();
        let mut report = StepReport::default();

        for ((inst, live), frozen) in instances.iter().zip(live.iter_mut()).zip(frozen.iter_mut()) {
            if *frozen {
                continue;
            }
            let spec         = inst.category().spec();
            let index        = inst.local_index();
            let (dest, rate) = destination_on(&cone, inst, &frame);

            let mut next  = *live;
            next.position = next.position.lerp(dest, self.time_base.factor(rate, clock.dt));
            spec.motion.overlay(&frame, index, inst.rest_rotation(), inst.base_scale(), &mut next);

            if next.is_finite() {
                *live = next;
                report.updated += 1;
            } else {
                *frozen = true;
                report.newly_frozen += 1;
                warn!(
                    category = inst.category().name(),
                    index,
                    "non-finite transform; instance frozen in place"
                );
            }
        }
        report
    }
}

fn destination_on(cone: &ConeGeometry, instance: &Instance, frame: &MotionFrame) -> (Vec3, f32) {
    let spec = instance.category().spec();
    let flow = instance.flow_angle().and_then(|angle| {
        spec.motion.flow_destination(cone, frame, instance.local_index(), angle)
    });
    flow.unwrap_or(match frame.mode {
        TreeMode::Formed => (instance.target_position(), spec.rates.formed),
        TreeMode::Chaos  => (instance.chaos_position(),  spec.rates.chaos),
    })
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
