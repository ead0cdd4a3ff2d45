//! # ornament_field
//!
//! A population of decorative instances that morph between two fixed
//! configurations: a dispersed **chaos** cloud and an assembled **formed**
//! cone (the tree).  Every instance is generated once, keeps its two anchor
//! points for life, and only its live transform moves.
//!
//! ## Frame pipeline
//!
//! | Stage | Module | Writes |
//! |---|---|---|
//! | Generate (once) | [`population`] | static [`Instance`] records |
//! | Pick destination + lerp | [`interpolator`] | live position |
//! | Category overlay | [`motion`] | live rotation / scale |
//! | Whole-population blend | [`foliage`], [`topper`] | point cloud, star |
//! | Buffer write | [`buffer`] | matrices + colors for the renderer |
//!
//! [`FieldEngine`] ties the stages together behind a single `tick`.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use ornament_field::{FieldConfig, FieldEngine, TransformBuffer, TreeMode};
//!
//! let mut engine = FieldEngine::new(&FieldConfig::default()).unwrap();
//! let mut buffer = TransformBuffer::default();
//!
//! for _ in 0..600 {
//!     engine.tick(TreeMode::Formed, 1.0 / 60.0);
//!     engine.write_buffer(&mut buffer);
//! }
//! ```

pub mod buffer;
pub mod category;
pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod foliage;
pub mod geometry;
pub mod interpolator;
pub mod mode;
pub mod motion;
pub mod population;
pub mod topper;
pub mod transform;

pub use buffer::{InstanceTransform, PointSprite, TransformBuffer};
pub use category::{Category, CategorySpec};
pub use color::Rgb;
pub use config::{CategoryCounts, FieldConfig, TimeBase};
pub use engine::{FieldEngine, FieldStats};
pub use error::{FieldError, FieldResult};
pub use geometry::{ChaosSphere, ConeGeometry};
pub use interpolator::{FrameClock, StateInterpolator};
pub use mode::TreeMode;
pub use population::{Instance, InstanceHandle, Population};
pub use transform::LiveTransform;
