//! # hand_gesture
//!
//! Turns a stream of 21-point hand landmark samples into the tree mode.
//!
//! ```text
//!  LandmarkSource ──SourceFrame──▶ Acquisition ──AcquisitionReport──▶ render loop
//!   (own thread)                   (own thread)                        (newest wins)
//!                                    │ rate limit → sanitize → classify
//!                                    ▼
//!                              ModeController ◀── manual toggle (UI)
//!                                    │
//!                                    ▼
//!                               TreeMode cell ──▶ render loop
//! ```
//!
//! ## Gesture → Mode mapping
//!
//! | Gesture | Meaning | Mode |
//! |---|---|---|
//! | Fist | fingertips close to the wrist | `FORMED` |
//! | Pinch | thumb tip touching index tip | `FORMED` |
//! | Open | anything else | `CHAOS` |
//! | (no hand) | | `CHAOS` |

pub mod acquisition;
pub mod classifier;
pub mod error;
pub mod landmarks;
pub mod mode;
pub mod synthetic;

pub use acquisition::{
    latest, spawn_acquisition, spawn_landmark_source, Acquisition, AcquisitionReport,
    LandmarkSource, RateLimiter, RateMeter, SourceFrame, TrackingStats, DEFAULT_MAX_RATE_HZ,
};
pub use classifier::{classify, GestureClassifier, GestureLabel, HandReading};
pub use error::{GestureError, GestureResult};
pub use landmarks::{HandFrame, HAND_CONNECTIONS, LANDMARK_COUNT};
pub use mode::{mode_for, ControlSource, ModeController, SharedMode};
pub use synthetic::SyntheticHand;
