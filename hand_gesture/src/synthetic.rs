//! Procedurally posed hands for simulation and tests.
//!
//! Fingers fan out from the wrist along fixed angles (measured from
//! straight up, positive to the right).  An open hand reaches far, a fist
//! pulls every fingertip in close to the wrist, and a pinch moves the thumb
//! tip next to the index tip.

use glam::Vec2;
use rand::Rng;

use crate::classifier::GestureLabel;
use crate::error::GestureResult;
use crate::landmarks::{HandFrame, INDEX_TIP, LANDMARK_COUNT, THUMB_TIP, WRIST};

const FINGER_BASES:  [usize; 4] = [5, 9, 13, 17];
const FINGER_ANGLES: [f32; 4]   = [-20.0, -5.0, 10.0, 25.0];
const JOINT_FRACTIONS: [f32; 4] = [0.35, 0.6, 0.8, 1.0];
const THUMB_ANGLE: f32 = -75.0;
const THUMB_FRACTIONS: [f32; 4] = [0.25, 0.5, 0.75, 1.0];

const OPEN_REACH:  f32 = 0.5;
const FIST_REACH:  f32 = 0.1;
const THUMB_OPEN:  f32 = 0.3;
const THUMB_FIST:  f32 = 0.18;
const PINCH_GAP:   Vec2 = Vec2::new(0.03, 0.0);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SyntheticHand {
    pub wrist: Vec2,
    /// Finger extension: `Open` and `Pinch` reach out, `Fist` curls.
    pub pose:  GestureLabel,
    pinched:   bool,
}

impl SyntheticHand {
    pub const DEFAULT_WRIST: Vec2 = Vec2::new(0.5, 0.9);

    pub fn new(gesture: GestureLabel) -> Self {
        SyntheticHand {
            wrist:   Self::DEFAULT_WRIST,
            pose:    gesture,
            pinched: gesture == GestureLabel::Pinch,
        }
    }

    pub fn at(mut self, wrist: Vec2) -> Self {
        self.wrist = wrist;
        self
    }

    /// Move the whole hand.
    pub fn shifted(mut self, delta: Vec2) -> Self {
        self.wrist += delta;
        self
    }

    /// Touch the thumb to the index tip, keeping the finger pose.
    pub fn pinched(mut self) -> Self {
        self.pinched = true;
        self
    }

    pub fn points(&self) -> [Vec2; LANDMARK_COUNT] {
        let curled = self.pose == GestureLabel::Fist;
        let reach  = if curled { FIST_REACH } else { OPEN_REACH };
        let thumb  = if curled { THUMB_FIST } else { THUMB_OPEN };

        let mut pts = [self.wrist; LANDMARK_COUNT];
        for (&base, &deg) in FINGER_BASES.iter().zip(&FINGER_ANGLES) {
            let dir = direction(deg);
            for (k, &f) in JOINT_FRACTIONS.iter().enumerate() {
                pts[base + k] = self.wrist + dir * reach * f;
            }
        }

        let thumb_dir = direction(THUMB_ANGLE);
        let thumb_tip = if self.pinched {
            pts[INDEX_TIP] + PINCH_GAP
        } else {
            self.wrist + thumb_dir * thumb
        };
        for (k, &f) in THUMB_FRACTIONS.iter().enumerate() {
            pts[WRIST + 1 + k] = self.wrist.lerp(thumb_tip, f);
        }
        pts[THUMB_TIP] = thumb_tip;
        pts
    }

    pub fn frame(&self) -> GestureResult<HandFrame> {
        HandFrame::new(&self.points())
    }

    /// Points with independent uniform noise of up to `amount` per axis.
    pub fn jittered<R: Rng + ?Sized>(&self, rng: &mut R, amount: f32) -> [Vec2; LANDMARK_COUNT] {
        let mut pts = self.points();
        if amount > 0.0 {
            for p in pts.iter_mut() {
                *p += Vec2::new(rng.gen_range(-amount..amount), rng.gen_range(-amount..amount));
            }
        }
        pts
    }
}

/// Unit vector `deg` degrees clockwise from straight up (image y points down).
fn direction(deg: f32) -> Vec2 {
    let r = deg.to_radians();
    Vec2::new(r.sin(), -r.cos())
}
