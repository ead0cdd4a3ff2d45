//! Sampling volumes: the chaos sphere and the tree cone.
//!
//! All samplers take a caller-supplied RNG so tests can seed them.  Only the
//! distribution is contractual, never individual values.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════
// ChaosSphere
// ════════════════════════════════════════════════════════════════════════════

/// Ball that holds the dispersed configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChaosSphere {
    pub radius:        f32,
    /// Added to every sampled y.
    pub vertical_bias: f32,
}

impl Default for ChaosSphere {
    fn default() -> Self {
        ChaosSphere { radius: 25.0, vertical_bias: 5.0 }
    }
}

impl ChaosSphere {
    pub fn center(&self) -> Vec3 { Vec3::new(0.0, self.vertical_bias, 0.0) }

    /// Uniform-by-volume point inside the sphere.
    ///
    /// `cbrt` on the radius draw cancels the r² growth of shell area, and
    /// `acos(2u - 1)` on the polar angle avoids clustering at the poles.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let r     = self.radius * rng.gen::<f32>().cbrt();
        let theta = rng.gen::<f32>() * TAU;
        let phi   = (2.0 * rng.gen::<f32>() - 1.0).acos();
        Vec3::new(
            r * phi.sin() * theta.cos(),
            r * phi.sin() * theta.sin() + self.vertical_bias,
            r * phi.cos(),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ConeGeometry
// ════════════════════════════════════════════════════════════════════════════

/// Apex-up cone that holds the formed configuration.
///
/// Heights passed to [`ConeGeometry::radius_at`] are measured from the base;
/// world y is `y_offset + y_from_base`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConeGeometry {
    pub height:      f32,
    pub base_radius: f32,
    pub y_offset:    f32,
}

impl Default for ConeGeometry {
    fn default() -> Self {
        ConeGeometry { height: 16.0, base_radius: 5.5, y_offset: -8.0 }
    }
}

/// How far up the cone a category may sit and how samples bunch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeightBand {
    /// `y = H · fraction · u^exponent`; exponents below 1.0 lift samples
    /// toward the narrow top.
    pub exponent: f32,
    pub fraction: f32,
}

/// Radial placement at a sampled height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Placement {
    /// On the surface, pushed out (or in) by a fixed offset.
    Shell { radial_offset: f32 },
    /// Anywhere in the disk cross-section, `sqrt(u)` for uniform area, scaled
    /// by `fill` to stay inside the surface.
    Filled { fill: f32 },
}

/// Low band that some categories are dropped into instead of the cone
/// surface, spread wider than the cone base.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundBand {
    pub y_min: f32,
    pub y_max: f32,
    pub widen: f32,
}

/// One target draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConeSample {
    pub position:    Vec3,
    /// Azimuth in [0, 2π).
    pub angle:       f32,
    pub y_from_base: f32,
}

impl ConeGeometry {
    /// Surface radius at a height above the base, zero at and above the apex.
    pub fn radius_at(&self, y_from_base: f32) -> f32 {
        (self.base_radius * (1.0 - y_from_base / self.height)).max(0.0)
    }

    /// World y of the apex.
    pub fn top_y(&self) -> f32 { self.y_offset + self.height }

    /// Point at a given world height and azimuth on the plain surface.
    pub fn surface_point(&self, world_y: f32, angle: f32) -> Vec3 {
        let r = self.radius_at(world_y - self.y_offset);
        Vec3::new(r * angle.cos(), world_y, r * angle.sin())
    }

    pub fn sample<R: Rng + ?Sized>(
        &self,
        rng:       &mut R,
        band:      HeightBand,
        placement: Placement,
    ) -> ConeSample {
        let y_from_base = self.height * band.fraction * rng.gen::<f32>().powf(band.exponent);
        let surface_r   = self.radius_at(y_from_base);
        let r = match placement {
            Placement::Shell  { radial_offset } => surface_r + radial_offset,
            Placement::Filled { fill }          => surface_r * rng.gen::<f32>().sqrt() * fill,
        };
        let angle = rng.gen::<f32>() * TAU;
        ConeSample {
            position: Vec3::new(r * angle.cos(), y_from_base + self.y_offset, r * angle.sin()),
            angle,
            y_from_base,
        }
    }
}

impl GroundBand {
    /// Redraw world y inside the band and push x/z outward.
    pub fn apply<R: Rng + ?Sized>(&self, mut p: Vec3, rng: &mut R) -> Vec3 {
        p.y = if self.y_max > self.y_min { rng.gen_range(self.y_min..self.y_max) } else { self.y_min };
        p.x *= self.widen;
        p.z *= self.widen;
        p
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SHELL_BAND: HeightBand = HeightBand { exponent: 1.0, fraction: 0.9 };

    #[test]
    fn chaos_points_stay_inside_sphere() {
        let mut rng = StdRng::seed_from_u64(11);
        let sphere  = ChaosSphere::default();
        for _ in 0..5_000 {
            let p = sphere.sample(&mut rng);
            assert!(p.distance(sphere.center()) <= sphere.radius + 1e-3);
        }
    }

    #[test]
    fn chaos_points_fill_volume_uniformly() {
        // Half the radius holds 1/8 of the volume.
        let mut rng = StdRng::seed_from_u64(12);
        let sphere  = ChaosSphere { radius: 20.0, vertical_bias: 5.0 };
        let n       = 20_000;
        let inner   = (0..n)
            .filter(|_| sphere.sample(&mut rng).distance(sphere.center()) < 10.0)
            .count();
        let frac = inner as f32 / n as f32;
        assert!((frac - 0.125).abs() < 0.02, "inner fraction {}", frac);
    }

    #[test]
    fn chaos_points_have_no_hemisphere_bias() {
        let mut rng = StdRng::seed_from_u64(13);
        let sphere  = ChaosSphere::default();
        let n       = 10_000;
        let above   = (0..n).filter(|_| sphere.sample(&mut rng).y > sphere.vertical_bias).count();
        let frac    = above as f32 / n as f32;
        assert!((frac - 0.5).abs() < 0.03);
    }

    #[test]
    fn shell_samples_lie_on_offset_surface() {
        let mut rng = StdRng::seed_from_u64(21);
        let cone    = ConeGeometry::default();
        for offset in [0.2_f32, -0.1, 0.5] {
            for _ in 0..2_000 {
                let s = cone.sample(&mut rng, SHELL_BAND, Placement::Shell { radial_offset: offset });
                let y = s.position.y - cone.y_offset;
                assert!((0.0..=cone.height * 0.9 + 1e-4).contains(&y));
                let radial   = (s.position.x * s.position.x + s.position.z * s.position.z).sqrt();
                let expected = cone.base_radius * (1.0 - y / cone.height) + offset;
                assert!((radial - expected).abs() < 1e-3, "radial {} vs {}", radial, expected);
            }
        }
    }

    #[test]
    fn filled_samples_stay_inside_surface() {
        let mut rng = StdRng::seed_from_u64(22);
        let cone    = ConeGeometry::default();
        let band    = HeightBand { exponent: 0.8, fraction: 0.92 };
        for _ in 0..5_000 {
            let s = cone.sample(&mut rng, band, Placement::Filled { fill: 0.95 });
            let radial = (s.position.x * s.position.x + s.position.z * s.position.z).sqrt();
            assert!(s.y_from_base <= cone.height * 0.92 + 1e-4);
            assert!(radial <= cone.radius_at(s.y_from_base) + 1e-4);
        }
    }

    #[test]
    fn low_exponent_lifts_samples() {
        let mut rng = StdRng::seed_from_u64(23);
        let cone    = ConeGeometry::default();
        let mean = |band: HeightBand, rng: &mut StdRng| {
            (0..5_000)
                .map(|_| cone.sample(rng, band, Placement::Filled { fill: 0.95 }).y_from_base)
                .sum::<f32>() / 5_000.0
        };
        let flat   = mean(HeightBand { exponent: 1.0, fraction: 0.92 }, &mut rng);
        let skewed = mean(HeightBand { exponent: 0.8, fraction: 0.92 }, &mut rng);
        // E[u^p] = 1/(p+1): 0.5 at p=1, 0.556 at p=0.8.
        assert!(skewed > flat);
        assert!((flat / (cone.height * 0.92) - 0.5).abs() < 0.03);
        assert!((skewed / (cone.height * 0.92) - 1.0 / 1.8).abs() < 0.03);
    }

    #[test]
    fn ground_band_redraws_height_and_widens() {
        let mut rng = StdRng::seed_from_u64(24);
        let band    = GroundBand { y_min: -8.0, y_max: -4.0, widen: 1.5 };
        let p       = band.apply(Vec3::new(2.0, 3.0, -1.0), &mut rng);
        assert!((-8.0..-4.0).contains(&p.y));
        assert_eq!(p.x, 3.0);
        assert_eq!(p.z, -1.5);
    }

    #[test]
    fn radius_vanishes_at_apex() {
        let cone = ConeGeometry::default();
        assert_eq!(cone.radius_at(cone.height), 0.0);
        assert_eq!(cone.radius_at(cone.height + 3.0), 0.0);
        assert_eq!(cone.radius_at(0.0), cone.base_radius);
        assert_eq!(cone.top_y(), 8.0);
    }
}
