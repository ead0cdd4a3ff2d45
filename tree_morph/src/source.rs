//! Landmark sources: a keyboard-posed synthetic hand (always available) and
//! a LeapMotion controller (`leap` feature).
//!
//! Both deliver [`SourceFrame`]s over the channel handed to
//! [`LandmarkSource::run`]; nothing downstream can tell them apart.

use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use glam::Vec2;
use hand_gesture::{GestureLabel, LandmarkSource, SourceFrame, SyntheticHand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

// ════════════════════════════════════════════════════════════════════════════
// SimInput
// ════════════════════════════════════════════════════════════════════════════

/// Raw input from the viewer window, translated into hand poses by
/// [`SimLandmarkSource`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    /// Show a hand in this pose.
    Present(GestureLabel),
    /// Take the hand out of view.
    Remove,
    /// Slide the hand across the image (normalized units).
    Nudge(Vec2),
    Quit,
}

// ════════════════════════════════════════════════════════════════════════════
// SimHand: pose state driven by SimInput
// ════════════════════════════════════════════════════════════════════════════

/// Wrist travel limits; keeps every landmark of the synthetic hand inside
/// the unit square.
const WRIST_MIN: Vec2 = Vec2::new(0.35, 0.55);
const WRIST_MAX: Vec2 = Vec2::new(0.75, 0.95);

/// Landmark noise per axis, well below the classifier thresholds.
pub const SIM_JITTER: f32 = 0.002;

#[derive(Clone, Debug, PartialEq)]
pub struct SimHand {
    pose:  Option<GestureLabel>,
    wrist: Vec2,
}

impl Default for SimHand {
    fn default() -> Self {
        SimHand { pose: None, wrist: SyntheticHand::DEFAULT_WRIST }
    }
}

impl SimHand {
    pub fn pose(&self) -> Option<GestureLabel> { self.pose }
    pub fn wrist(&self) -> Vec2 { self.wrist }

    /// Returns `false` on `Quit`.
    pub fn apply(&mut self, input: SimInput) -> bool {
        match input {
            SimInput::Present(g) => self.pose = Some(g),
            SimInput::Remove     => self.pose = None,
            SimInput::Nudge(d)   => self.wrist = (self.wrist + d).clamp(WRIST_MIN, WRIST_MAX),
            SimInput::Quit       => return false,
        }
        true
    }

    pub fn frame(&self, rng: &mut StdRng) -> SourceFrame {
        match self.pose {
            Some(g) => SourceFrame::hand(SyntheticHand::new(g).at(self.wrist).jittered(rng, SIM_JITTER).to_vec()),
            None    => SourceFrame::empty(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimLandmarkSource
// ════════════════════════════════════════════════════════════════════════════

/// Emits the current [`SimHand`] at a fixed camera-like rate.
pub struct SimLandmarkSource {
    pub rx:     Receiver<SimInput>,
    pub period: Duration,
    pub seed:   u64,
}

impl SimLandmarkSource {
    /// Camera-like 30 frames per second.
    pub const DEFAULT_PERIOD: Duration = Duration::from_millis(33);

    pub fn new(rx: Receiver<SimInput>) -> Self {
        SimLandmarkSource { rx, period: Self::DEFAULT_PERIOD, seed: 0x5EED }
    }
}

impl LandmarkSource for SimLandmarkSource {
    fn run(self: Box<Self>, tx: Sender<SourceFrame>) {
        let mut hand = SimHand::default();
        let mut rng  = StdRng::seed_from_u64(self.seed);
        let mut next = Instant::now();

        loop {
            let wait = next.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(wait) {
                Ok(input) => {
                    if !hand.apply(input) {
                        debug!("sim source quit");
                        return;
                    }
                    continue;
                }
                Err(RecvTimeoutError::Timeout)      => {}
                Err(RecvTimeoutError::Disconnected) => return,
            }
            if tx.send(hand.frame(&mut rng)).is_err() {
                return;
            }
            next += self.period;
            // Fell far behind (suspended?): resync rather than burst.
            let now = Instant::now();
            if next + self.period < now {
                next = now;
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LeapMotion landmarks
// ════════════════════════════════════════════════════════════════════════════

/// Millimetres mapped onto one image width.
const LEAP_SPAN_MM:  f32 = 400.0;
/// Height above the sensor that maps to the bottom of the image.
const LEAP_FLOOR_MM: f32 = 50.0;

/// One digit's joints already projected to the image plane: metacarpal
/// base, proximal base, intermediate base, distal base, tip.
pub type DigitJoints = [Vec2; 5];

/// Sensor millimetres to normalized image coordinates, the way a front
/// camera would see them: mirrored x, y pointing down, both scaled by the
/// same span so distances keep their proportions.
pub fn leap_project(x: f32, y: f32) -> Vec2 {
    Vec2::new(0.5 - x / LEAP_SPAN_MM, 1.0 - (y - LEAP_FLOOR_MM) / LEAP_SPAN_MM)
}

/// Lay out five digits (thumb first) as the 21-point landmark list.
///
/// | Landmark | Leap joint |
/// |---|---|
/// | wrist (0) | mean of the four finger metacarpal bases |
/// | base joint (1, 5, 9, 13, 17) | proximal base |
/// | middle joint | intermediate base |
/// | last joint | distal base |
/// | tip (4, 8, 12, 16, 20) | distal tip |
pub fn assemble_landmarks(digits: &[DigitJoints]) -> Option<Vec<Vec2>> {
    if digits.len() < 5 {
        return None;
    }
    let mut pts   = vec![Vec2::ZERO; hand_gesture::LANDMARK_COUNT];
    let mut wrist = Vec2::ZERO;
    for (f, joints) in digits.iter().take(5).enumerate() {
        pts[1 + f * 4..5 + f * 4].copy_from_slice(&joints[1..]);
        if f > 0 {
            wrist += joints[0];
        }
    }
    pts[0] = wrist / 4.0;
    Some(pts)
}

/// Landmark source backed by a LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
#[cfg(feature = "leap")]
pub struct LeapLandmarkSource;

#[cfg(feature = "leap")]
impl LandmarkSource for LeapLandmarkSource {
    fn run(self: Box<Self>, tx: Sender<SourceFrame>) {
        use leaprs::*;
        use tracing::{error, info};

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c)  => c,
            Err(e) => {
                error!(?e, "failed to create LeapC connection");
                return;
            }
        };
        if let Err(e) = connection.open() {
            error!(?e, "failed to open LeapMotion device");
            return;
        }
        info!("LeapMotion connection open");

        loop {
            let msg = match connection.poll(100) {
                Ok(m)  => m,
                Err(_) => continue,
            };
            if let Event::Tracking(frame) = msg.event() {
                let hands: Vec<_> = frame.hands().collect();
                let points = hands.first().and_then(|hand| {
                    let digits: Vec<DigitJoints> = hand
                        .digits()
                        .map(|d| {
                            let (m, p, i, dp, dn) = (
                                d.metacarpal().prev_joint(),
                                d.proximal().prev_joint(),
                                d.intermediate().prev_joint(),
                                d.distal().prev_joint(),
                                d.distal().next_joint(),
                            );
                            [
                                leap_project(m.x, m.y),
                                leap_project(p.x, p.y),
                                leap_project(i.x, i.y),
                                leap_project(dp.x, dp.y),
                                leap_project(dn.x, dn.y),
                            ]
                        })
                        .collect();
                    assemble_landmarks(&digits)
                });
                let out = match points {
                    Some(pts) => SourceFrame::hand(pts),
                    None      => SourceFrame::empty(),
                };
                if tx.send(out).is_err() {
                    return;
                }
            }
        }
    }
}
