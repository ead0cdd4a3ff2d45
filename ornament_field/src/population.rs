//! The instance arena.
//!
//! Static records and live transforms sit in two parallel `Vec`s indexed by
//! [`InstanceHandle`].  Categories occupy contiguous ranges in
//! [`Category::ALL`] order, so a frame update is a flat loop with no
//! per-instance allocation.

use std::ops::Range;

use glam::Vec3;
use rand::Rng;
use tracing::{debug, info};

use crate::category::Category;
use crate::color::{self, Rgb};
use crate::config::FieldConfig;
use crate::geometry::ConeGeometry;
use crate::transform::LiveTransform;

// ════════════════════════════════════════════════════════════════════════════
// Instance
// ════════════════════════════════════════════════════════════════════════════

/// Stable index into the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceHandle(u32);

impl InstanceHandle {
    pub fn index(self) -> usize { self.0 as usize }
}

/// Write-once description of one ornament.
///
/// Fields are private; nothing outside generation can change them.
#[derive(Clone, Debug, PartialEq)]
pub struct Instance {
    category:        Category,
    /// Position within its category, used to stagger phases.
    local_index:     u32,
    chaos_position:  Vec3,
    target_position: Vec3,
    rest_rotation:   Vec3,
    base_scale:      f32,
    color:           Rgb,
    /// Azimuth of the flow path (cascades only).
    flow_angle:      Option<f32>,
}

impl Instance {
    pub fn category(&self)        -> Category    { self.category }
    pub fn local_index(&self)     -> u32         { self.local_index }
    pub fn chaos_position(&self)  -> Vec3        { self.chaos_position }
    pub fn target_position(&self) -> Vec3        { self.target_position }
    pub fn rest_rotation(&self)   -> Vec3        { self.rest_rotation }
    pub fn base_scale(&self)      -> f32         { self.base_scale }
    pub fn color(&self)           -> Rgb         { self.color }
    pub fn flow_angle(&self)      -> Option<f32> { self.flow_angle }
}

// ════════════════════════════════════════════════════════════════════════════
// Population
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct Population {
    instances: Vec<Instance>,
    live:      Vec<LiveTransform>,
    /// Set once an instance's update produced a non-finite value.
    frozen:    Vec<bool>,
    ranges:    [Range<usize>; 6],
    cone:      ConeGeometry,
}

impl Population {
    /// Build every instance once.  Each live transform starts at its chaos
    /// position with its rest rotation and base scale.
    pub fn generate<R: Rng + ?Sized>(cfg: &FieldConfig, rng: &mut R) -> Self {
        let total         = cfg.counts.total();
        let mut instances = Vec::with_capacity(total);
        let mut live      = Vec::with_capacity(total);
        let mut ranges: [Range<usize>; 6] = Default::default();

        for category in Category::ALL {
            let spec  = category.spec();
            let count = cfg.counts.get(category);
            let start = instances.len();

            if count == 0 {
                debug!(category = category.name(), "category disabled (count 0)");
            }

            for local in 0..count {
                let chaos  = cfg.chaos.sample(rng);
                let sample = cfg.cone.sample(rng, spec.band, spec.placement);
                let target = match spec.ground {
                    Some(band) => band.apply(sample.position, rng),
                    None       => sample.position,
                };
                let rest  = spec.rest_rotation.sample(rng);
                let scale = spec.sample_scale(rng);

                instances.push(Instance {
                    category,
                    local_index:     local as u32,
                    chaos_position:  chaos,
                    target_position: target,
                    rest_rotation:   rest,
                    base_scale:      scale,
                    color:           color::pick(spec.palette, rng),
                    flow_angle:      (category == Category::Cascade).then_some(sample.angle),
                });
                live.push(LiveTransform::new(chaos, rest, scale));
            }

            ranges[category.index()] = start..instances.len();
        }

        info!(
            total,
            ball    = cfg.counts.ball,
            boxes   = cfg.counts.boxes,
            light   = cfg.counts.light,
            cascade = cfg.counts.cascade,
            gem     = cfg.counts.gem,
            bell    = cfg.counts.bell,
            "ornament population generated"
        );

        Population {
            frozen: vec![false; instances.len()],
            instances,
            live,
            ranges,
            cone: cfg.cone,
        }
    }

    pub fn len(&self)      -> usize { self.instances.len() }
    pub fn is_empty(&self) -> bool  { self.instances.is_empty() }

    pub fn instances(&self) -> &[Instance]      { &self.instances }
    pub fn live(&self)      -> &[LiveTransform] { &self.live }
    pub fn cone(&self)      -> &ConeGeometry    { &self.cone }

    pub fn get(&self, handle: InstanceHandle) -> Option<(&Instance, &LiveTransform)> {
        let i = handle.index();
        Some((self.instances.get(i)?, self.live.get(i)?))
    }

    /// Arena slots belonging to one category.
    pub fn range(&self, category: Category) -> Range<usize> {
        self.ranges[category.index()].clone()
    }

    pub fn count(&self, category: Category) -> usize { self.range(category).len() }

    pub fn handles(&self, category: Category) -> impl Iterator<Item = InstanceHandle> {
        self.range(category).map(|i| InstanceHandle(i as u32))
    }

    pub fn is_frozen(&self, handle: InstanceHandle) -> bool {
        self.frozen.get(handle.index()).copied().unwrap_or(false)
    }

    pub fn frozen_count(&self) -> usize { self.frozen.iter().filter(|&&f| f).count() }

    /// Split borrow for the frame update: static records read-only, live
    /// state and frozen flags writable.
    pub(crate) fn parts_mut(&mut self) -> (&[Instance], &mut [LiveTransform], &mut [bool]) {
        (&self.instances, &mut self.live, &mut self.frozen)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
