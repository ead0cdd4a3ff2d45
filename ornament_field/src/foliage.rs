//! Foliage point cloud.
//!
//! Unlike ornaments, foliage points do not lerp individually.  A single
//! [`FormationProgress`] scalar eases toward 0 or 1 and every point is placed
//! at `lerp(chaos, target, progress)` each frame, plus a wind offset that
//! fades as the tree forms.

use glam::Vec3;
use rand::Rng;

use crate::color::{self, Rgb};
use crate::config::FoliageConfig;
use crate::geometry::{ConeGeometry, HeightBand, Placement};
use crate::mode::TreeMode;
use crate::motion::phase;

/// Foliage bunches toward the upper body and fills the cone interior.
const FOLIAGE_BAND: HeightBand = HeightBand { exponent: 0.8, fraction: 0.92 };
const FOLIAGE_FILL: Placement  = Placement::Filled { fill: 0.95 };
const SIZE_RANGE: (f32, f32)   = (0.8, 2.3);

// ════════════════════════════════════════════════════════════════════════════
// FormationProgress
// ════════════════════════════════════════════════════════════════════════════

/// Scalar in `[0, 1]` that tracks how formed the tree looks.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FormationProgress {
    value: f32,
}

impl FormationProgress {
    /// Per-second easing speed.
    pub const SPEED: f32 = 2.5;

    pub fn value(self) -> f32 { self.value }

    pub fn step(&mut self, mode: TreeMode, dt: f32) {
        let k = (dt * Self::SPEED).clamp(0.0, 1.0);
        self.value += (mode.progress_target() - self.value) * k;
        self.value  = self.value.clamp(0.0, 1.0);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Foliage
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FoliagePoint {
    pub chaos:  Vec3,
    pub target: Vec3,
    pub size:   f32,
    pub color:  Rgb,
}

#[derive(Clone, Debug)]
pub struct Foliage {
    points:   Vec<FoliagePoint>,
    current:  Vec<Vec3>,
    progress: FormationProgress,
}

impl Foliage {
    pub fn generate<R: Rng + ?Sized>(cfg: &FoliageConfig, cone: &ConeGeometry, rng: &mut R) -> Self {
        let points: Vec<FoliagePoint> = (0..cfg.count)
            .map(|_| {
                let target = cone.sample(rng, FOLIAGE_BAND, FOLIAGE_FILL).position;
                let chaos  = cfg.chaos.sample(rng);
                FoliagePoint {
                    chaos,
                    target,
                    size:  rng.gen_range(SIZE_RANGE.0..SIZE_RANGE.1),
                    color: color::pick(color::FOLIAGE, rng),
                }
            })
            .collect();
        let current = points.iter().map(|p| p.chaos).collect();
        Foliage { points, current, progress: FormationProgress::default() }
    }

    pub fn len(&self)      -> usize { self.points.len() }
    pub fn is_empty(&self) -> bool  { self.points.is_empty() }

    pub fn points(&self)   -> &[FoliagePoint]     { &self.points }
    pub fn current(&self)  -> &[Vec3]             { &self.current }
    pub fn progress(&self) -> FormationProgress   { self.progress }

    /// Ease the progress scalar and recompute every point.
    pub fn step(&mut self, mode: TreeMode, time: f64, dt: f32) {
        self.progress.step(mode, dt);
        let t   = self.progress.value();
        let amp = wind_amplitude(t);
        for (point, out) in self.points.iter().zip(self.current.iter_mut()) {
            *out = wind(point.chaos.lerp(point.target, t), time, amp);
        }
    }
}

/// Strong gusts while dispersed, a faint sway once formed.
pub fn wind_amplitude(progress: f32) -> f32 {
    0.3 + (0.02 - 0.3) * progress
}

/// x sways with height, then z sways with the already-displaced x.
pub fn wind(mut p: Vec3, time: f64, amplitude: f32) -> Vec3 {
    p.x += phase(time, 2.0, p.y * 0.5).sin() * amplitude;
    p.z += phase(time, 1.6, p.x * 0.5).cos() * amplitude;
    p
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn foliage() -> Foliage {
        Foliage::generate(&FoliageConfig::default(), &ConeGeometry::default(), &mut StdRng::seed_from_u64(3))
    }

    #[test]
    fn generates_configured_count_inside_cone() {
        let f    = foliage();
        let cone = ConeGeometry::default();
        assert_eq!(f.len(), 250);
        for p in f.points() {
            let y = p.target.y - cone.y_offset;
            assert!(y >= 0.0 && y <= cone.height * 0.92 + 1e-4);
            let r = (p.target.x * p.target.x + p.target.z * p.target.z).sqrt();
            assert!(r <= cone.radius_at(y) * 0.95 + 1e-4);
            assert!(p.size >= 0.8 && p.size < 2.3);
            assert!(p.chaos.distance(Vec3::new(0.0, 5.0, 0.0)) <= 20.0 + 1e-3);
            assert!(color::FOLIAGE.contains(&p.color));
        }
        assert_eq!(f.current()[0], f.points()[0].chaos);
    }

    #[test]
    fn progress_eases_toward_mode_and_stays_bounded() {
        let mut p = FormationProgress::default();
        let mut last = 0.0;
        for _ in 0..240 {
            p.step(TreeMode::Formed, 1.0 / 60.0);
            assert!(p.value() >= last && p.value() <= 1.0);
            last = p.value();
        }
        assert!(p.value() > 0.99);
        // A huge dt snaps rather than overshoots.
        p.step(TreeMode::Chaos, 10.0);
        assert_eq!(p.value(), 0.0);
    }

    #[test]
    fn wind_fades_as_tree_forms() {
        assert!((wind_amplitude(0.0) - 0.3).abs() < 1e-6);
        assert!((wind_amplitude(1.0) - 0.02).abs() < 1e-6);
        let p = Vec3::new(1.0, 2.0, 3.0);
        let d = wind(p, 0.7, 0.02) - p;
        assert!(d.x.abs() <= 0.02 + 1e-6 && d.z.abs() <= 0.02 + 1e-6 && d.y == 0.0);
    }

    #[test]
    fn formed_points_settle_near_targets() {
        let mut f = foliage();
        for frame in 0..600 {
            f.step(TreeMode::Formed, frame as f64 / 60.0, 1.0 / 60.0);
        }
        for (p, cur) in f.points().iter().zip(f.current()) {
            // Residual chaos weight plus the formed wind amplitude.
            assert!(cur.distance(p.target) < 0.1, "{:?} vs {:?}", cur, p.target);
        }
    }
}
