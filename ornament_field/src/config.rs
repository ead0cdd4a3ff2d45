//! Field configuration: geometry, per-category counts, foliage, time base.
//!
//! Every section is `#[serde(default)]`, so a TOML table only needs the keys
//! it changes:
//!
//! ```toml
//! seed = 7
//!
//! [counts]
//! ball = 800
//! cascade = 0
//!
//! [time_base]
//! kind = "per_second"
//! reference_hz = 60.0
//! ```

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::error::{FieldError, FieldResult};
use crate::geometry::{ChaosSphere, ConeGeometry};

// ════════════════════════════════════════════════════════════════════════════
// TimeBase
// ════════════════════════════════════════════════════════════════════════════

/// How per-frame constants are applied to a tick of length `dt`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimeBase {
    /// Rates are applied once per tick regardless of `dt`.
    PerFrame,
    /// Rates are treated as tuned for `reference_hz` and converted to
    /// `1 - exp(-k·dt)`, which keeps the same half-life at any frame rate.
    PerSecond { reference_hz: f32 },
}

impl Default for TimeBase {
    fn default() -> Self { TimeBase::PerFrame }
}

impl TimeBase {
    /// Reference frames covered by a tick.
    pub fn frames(&self, dt: f32) -> f32 {
        match *self {
            TimeBase::PerFrame                  => 1.0,
            TimeBase::PerSecond { reference_hz } => (dt * reference_hz).max(0.0),
        }
    }

    /// Lerp factor for a per-frame `rate` over a tick of `dt` seconds.
    pub fn factor(&self, rate: f32, dt: f32) -> f32 {
        let rate = rate.clamp(0.0, 1.0);
        match self {
            TimeBase::PerFrame => rate,
            TimeBase::PerSecond { .. } => {
                // (1 - rate)^frames == exp(-k·dt) with k = -ln(1 - rate)·hz
                1.0 - (1.0 - rate).powf(self.frames(dt))
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// CategoryCounts
// ════════════════════════════════════════════════════════════════════════════

/// Population size per category, fixed for the life of the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryCounts {
    pub ball:    usize,
    #[serde(rename = "box")]
    pub boxes:   usize,
    pub light:   usize,
    pub cascade: usize,
    pub gem:     usize,
    pub bell:    usize,
}

impl Default for CategoryCounts {
    fn default() -> Self {
        let mut counts = CategoryCounts::zero();
        for c in Category::ALL {
            counts.set(c, c.spec().default_count);
        }
        counts
    }
}

impl CategoryCounts {
    pub fn zero() -> Self {
        CategoryCounts { ball: 0, boxes: 0, light: 0, cascade: 0, gem: 0, bell: 0 }
    }

    pub fn get(&self, c: Category) -> usize {
        match c {
            Category::Ball    => self.ball,
            Category::Box     => self.boxes,
            Category::Light   => self.light,
            Category::Cascade => self.cascade,
            Category::Gem     => self.gem,
            Category::Bell    => self.bell,
        }
    }

    pub fn set(&mut self, c: Category, n: usize) {
        match c {
            Category::Ball    => self.ball    = n,
            Category::Box     => self.boxes   = n,
            Category::Light   => self.light   = n,
            Category::Cascade => self.cascade = n,
            Category::Gem     => self.gem     = n,
            Category::Bell    => self.bell    = n,
        }
    }

    /// Builder-style override.
    pub fn with(mut self, c: Category, n: usize) -> Self {
        self.set(c, n);
        self
    }

    pub fn total(&self) -> usize {
        Category::ALL.iter().map(|&c| self.get(c)).sum()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FoliageConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoliageConfig {
    pub count: usize,
    pub chaos: ChaosSphere,
}

impl Default for FoliageConfig {
    fn default() -> Self {
        FoliageConfig {
            count: 250,
            chaos: ChaosSphere { radius: 20.0, vertical_bias: 5.0 },
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FieldConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub cone:      ConeGeometry,
    /// Chaos volume for ornaments; foliage has its own.
    pub chaos:     ChaosSphere,
    pub counts:    CategoryCounts,
    pub foliage:   FoliageConfig,
    /// Fixed seed for reproducible layouts; `None` draws from entropy.
    pub seed:      Option<u64>,
    pub time_base: TimeBase,
}

impl FieldConfig {
    /// Reject geometry that would produce degenerate or non-finite samples.
    pub fn validate(&self) -> FieldResult<()> {
        positive("cone.height", self.cone.height)?;
        positive("cone.base_radius", self.cone.base_radius)?;
        finite("cone.y_offset", self.cone.y_offset)?;
        positive("chaos.radius", self.chaos.radius)?;
        finite("chaos.vertical_bias", self.chaos.vertical_bias)?;
        positive("foliage.chaos.radius", self.foliage.chaos.radius)?;
        finite("foliage.chaos.vertical_bias", self.foliage.chaos.vertical_bias)?;
        if let TimeBase::PerSecond { reference_hz } = self.time_base {
            positive("time_base.reference_hz", reference_hz)?;
        }
        if self.counts.total() > u32::MAX as usize {
            return Err(FieldError::invalid("counts", "total exceeds u32 handle space"));
        }
        Ok(())
    }
}

fn positive(field: &'static str, v: f32) -> FieldResult<()> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(FieldError::invalid(field, format!("must be a positive finite number, got {}", v)))
    }
}

fn finite(field: &'static str, v: f32) -> FieldResult<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(FieldError::invalid(field, format!("must be finite, got {}", v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_counts_match_table() {
        let counts = CategoryCounts::default();
        assert_eq!(counts.ball, 400);
        assert_eq!(counts.boxes, 150);
        assert_eq!(counts.light, 600);
        assert_eq!(counts.cascade, 300);
        assert_eq!(counts.gem, 200);
        assert_eq!(counts.bell, 150);
        assert_eq!(counts.total(), 1800);
    }

    #[test]
    fn default_config_validates() {
        assert!(FieldConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_height_is_rejected() {
        let mut cfg = FieldConfig::default();
        cfg.cone.height = 0.0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("cone.height"));
    }

    #[test]
    fn nan_bias_is_rejected() {
        let mut cfg = FieldConfig::default();
        cfg.chaos.vertical_bias = f32::NAN;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn per_frame_factor_is_the_rate() {
        assert_eq!(TimeBase::PerFrame.factor(0.03, 0.5), 0.03);
        assert_eq!(TimeBase::PerFrame.frames(0.5), 1.0);
    }

    #[test]
    fn per_second_matches_per_frame_at_reference_rate() {
        let tb = TimeBase::PerSecond { reference_hz: 60.0 };
        assert!((tb.factor(0.03, 1.0 / 60.0) - 0.03).abs() < 1e-5);
    }

    #[test]
    fn per_second_preserves_half_life_across_frame_rates() {
        // Two 30 Hz ticks must leave the same residual as four 60 Hz ticks.
        let tb   = TimeBase::PerSecond { reference_hz: 60.0 };
        let slow = (1.0 - tb.factor(0.05, 1.0 / 30.0)).powi(2);
        let fast = (1.0 - tb.factor(0.05, 1.0 / 60.0)).powi(4);
        assert!((slow - fast).abs() < 1e-5);
    }

    #[test]
    fn counts_with_override() {
        let c = CategoryCounts::zero().with(Category::Gem, 3);
        assert_eq!(c.get(Category::Gem), 3);
        assert_eq!(c.total(), 3);
    }
}
