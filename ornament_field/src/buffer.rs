//! Per-frame output for the renderer.
//!
//! Entry `i` of [`TransformBuffer::instances`] always belongs to arena slot
//! `i`, so the renderer can key instanced draws by stable index.  The buffer
//! is cleared and refilled in place each frame; once it has grown to the
//! population size no further allocation happens.

use glam::{Mat4, Quat, Vec3};

use crate::foliage::Foliage;
use crate::population::Population;
use crate::topper::Topper;
use crate::transform::LiveTransform;

/// One instanced draw: logical transform, derived column-major matrix and
/// linear color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InstanceTransform {
    pub transform: LiveTransform,
    pub matrix:    [f32; 16],
    pub color:     [f32; 3],
}

impl InstanceTransform {
    pub fn new(transform: LiveTransform, color: [f32; 3]) -> Self {
        InstanceTransform { transform, matrix: matrix_for(&transform), color }
    }
}

/// A foliage point, drawn as a screen-facing sprite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointSprite {
    pub position: [f32; 3],
    pub size:     f32,
    pub color:    [f32; 3],
}

#[derive(Clone, Debug, Default)]
pub struct TransformBuffer {
    pub instances: Vec<InstanceTransform>,
    pub foliage:   Vec<PointSprite>,
    pub topper:    Option<InstanceTransform>,
}

impl TransformBuffer {
    pub fn with_capacity(instances: usize, foliage: usize) -> Self {
        TransformBuffer {
            instances: Vec::with_capacity(instances),
            foliage:   Vec::with_capacity(foliage),
            topper:    None,
        }
    }

    pub fn write(&mut self, population: &Population, foliage: &Foliage, topper: &Topper) {
        self.instances.clear();
        self.instances.extend(
            population.instances().iter()
                .zip(population.live())
                .map(|(inst, live)| InstanceTransform::new(*live, inst.color().to_array())),
        );

        self.foliage.clear();
        self.foliage.extend(
            foliage.points().iter()
                .zip(foliage.current())
                .map(|(point, pos)| PointSprite {
                    position: pos.to_array(),
                    size:     point.size,
                    color:    point.color.to_array(),
                }),
        );

        self.topper = Some(InstanceTransform::new(*topper.live(), topper.color.to_array()));
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty() && self.foliage.is_empty() && self.topper.is_none()
    }
}

/// Matrix for a transform; a non-finite transform collapses to zero scale at
/// the origin so a single bad instance never reaches the renderer as NaN.
pub fn matrix_for(transform: &LiveTransform) -> [f32; 16] {
    if transform.is_finite() {
        transform.matrix().to_cols_array()
    } else {
        Mat4::from_scale_rotation_translation(Vec3::ZERO, Quat::IDENTITY, Vec3::ZERO).to_cols_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CategoryCounts, FieldConfig};
    use crate::category::Category;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn buffer_is_keyed_by_arena_index() {
        let cfg = FieldConfig {
            counts: CategoryCounts::zero().with(Category::Ball, 5).with(Category::Gem, 3),
            ..FieldConfig::default()
        };
        let mut rng    = StdRng::seed_from_u64(1);
        let pop        = Population::generate(&cfg, &mut rng);
        let foliage    = Foliage::generate(&cfg.foliage, &cfg.cone, &mut rng);
        let mut buffer = TransformBuffer::default();
        buffer.write(&pop, &foliage, &Topper::default());

        assert_eq!(buffer.instances.len(), 8);
        assert_eq!(buffer.foliage.len(), 250);
        for (i, entry) in buffer.instances.iter().enumerate() {
            assert_eq!(entry.transform, pop.live()[i]);
            assert_eq!(entry.color, pop.instances()[i].color().to_array());
            assert_eq!(entry.matrix[12..15], pop.live()[i].position.to_array());
        }
        assert!(buffer.topper.is_some());
    }

    #[test]
    fn rewrite_does_not_grow() {
        let cfg = FieldConfig { counts: CategoryCounts::zero().with(Category::Light, 10), ..FieldConfig::default() };
        let mut rng    = StdRng::seed_from_u64(2);
        let pop        = Population::generate(&cfg, &mut rng);
        let foliage    = Foliage::generate(&cfg.foliage, &cfg.cone, &mut rng);
        let mut buffer = TransformBuffer::with_capacity(10, 250);
        buffer.write(&pop, &foliage, &Topper::default());
        let cap = buffer.instances.capacity();
        buffer.write(&pop, &foliage, &Topper::default());
        assert_eq!(buffer.instances.len(), 10);
        assert_eq!(buffer.instances.capacity(), cap);
    }

    #[test]
    fn non_finite_transform_collapses() {
        let bad = LiveTransform::new(Vec3::new(f32::NAN, 0.0, 0.0), Vec3::ZERO, 1.0);
        let m   = matrix_for(&bad);
        assert!(m.iter().all(|v| v.is_finite()));
        assert_eq!(m[0], 0.0);
        assert_eq!(m[5], 0.0);
        assert_eq!(m[10], 0.0);
    }
}
