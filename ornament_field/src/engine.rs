//! [`FieldEngine`]: the one object a render loop holds.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::buffer::TransformBuffer;
use crate::config::FieldConfig;
use crate::error::FieldResult;
use crate::foliage::Foliage;
use crate::interpolator::{FrameClock, StateInterpolator, StepReport};
use crate::mode::TreeMode;
use crate::population::Population;
use crate::topper::Topper;

/// Snapshot for HUDs and logs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldStats {
    pub mode:      TreeMode,
    pub instances: usize,
    pub foliage:   usize,
    pub frozen:    usize,
    /// Population-wide formation progress in `[0, 1]`.
    pub progress:  f32,
    pub frame:     u64,
    pub elapsed:   f64,
}

impl FieldStats {
    /// Everything drawn: ornaments, foliage points and the topper.
    pub fn particle_count(&self) -> usize {
        self.instances + self.foliage + 1
    }
}

pub struct FieldEngine {
    population:   Population,
    foliage:      Foliage,
    topper:       Topper,
    interpolator: StateInterpolator,
    clock:        FrameClock,
    mode:         TreeMode,
}

impl FieldEngine {
    /// Validate `cfg` and generate every instance.  Nothing is allocated
    /// per frame after this.
    pub fn new(cfg: &FieldConfig) -> FieldResult<Self> {
        cfg.validate()?;
        let mut rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None       => StdRng::from_entropy(),
        };
        let population = Population::generate(cfg, &mut rng);
        let foliage    = Foliage::generate(&cfg.foliage, &cfg.cone, &mut rng);
        info!(
            instances = population.len(),
            foliage   = foliage.len(),
            seed      = ?cfg.seed,
            time_base = ?cfg.time_base,
            "field ready"
        );
        Ok(FieldEngine {
            population,
            foliage,
            topper:       Topper::above_apex(cfg.cone.top_y()),
            interpolator: StateInterpolator::new(cfg.time_base),
            clock:        FrameClock::default(),
            mode:         TreeMode::default(),
        })
    }

    /// Advance the whole field by `dt` seconds toward `mode`.
    pub fn tick(&mut self, mode: TreeMode, dt: f32) -> StepReport {
        if mode != self.mode {
            debug!(from = self.mode.name(), to = mode.name(), frame = self.clock.frame, "target mode changed");
            self.mode = mode;
        }
        self.clock.advance(dt);
        let report = self.interpolator.step(&mut self.population, mode, &self.clock);
        self.foliage.step(mode, self.clock.elapsed, self.clock.dt);
        let star_factor = self.interpolator.time_base().factor(self.topper.rate, self.clock.dt);
        self.topper.step(mode, self.clock.elapsed, star_factor);
        report
    }

    pub fn write_buffer(&self, buffer: &mut TransformBuffer) {
        buffer.write(&self.population, &self.foliage, &self.topper);
    }

    pub fn stats(&self) -> FieldStats {
        FieldStats {
            mode:      self.mode,
            instances: self.population.len(),
            foliage:   self.foliage.len(),
            frozen:    self.population.frozen_count(),
            progress:  self.progress(),
            frame:     self.clock.frame,
            elapsed:   self.clock.elapsed,
        }
    }

    pub fn population(&self) -> &Population { &self.population }
    pub fn foliage(&self)    -> &Foliage    { &self.foliage }
    pub fn topper(&self)     -> &Topper     { &self.topper }
    pub fn clock(&self)      -> &FrameClock { &self.clock }
    pub fn mode(&self)       -> TreeMode    { self.mode }
    pub fn progress(&self)   -> f32         { self.foliage.progress().value() }
}
