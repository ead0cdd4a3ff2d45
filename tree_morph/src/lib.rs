//! # tree_morph
//!
//! A gesture-driven viewer for the ornament field.  An open hand scatters
//! the ornaments into a cloud; a fist or a pinch pulls them back into a
//! tree.  The scene follows the palm while a hand is tracked and slowly
//! orbits once the tree stands with nobody steering it.
//!
//! ## Threads
//!
//! | Thread | Owns | Talks through |
//! |---|---|---|
//! | landmark source | camera / LeapMotion / keyboard-posed hand | `SourceFrame` channel |
//! | acquisition | classifier, rate limiter | mode cell + `AcquisitionReport` channel |
//! | main (render) | field engine, window | reads mode cell, newest report |
//!
//! ## Feature flags
//!
//! * (default): **Simulation mode**: number keys pose a synthetic hand.
//! * `leap`: **Hardware mode**: hand landmarks from a LeapMotion controller via LeapC.
//!
//! ### Keys
//!
//! | Key | Action |
//! |---|---|
//! | `Space` | Toggle CHAOS / FORMED by hand (turns gesture control off) |
//! | `G` | Toggle gesture control |
//! | `1` / `2` / `3` | Show an open / pinching / fisted hand (simulation) |
//! | `0` | Take the hand away (simulation) |
//! | arrows | Move the hand (simulation) |
//! | `Q` / `Esc` | Quit |

pub mod app;
pub mod camera;
pub mod canvas;
pub mod config;
pub mod error;
pub mod source;
pub mod visualizer;

pub use app::{run, AppState, Command, Flow};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
