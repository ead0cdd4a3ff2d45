//! Per-sample gesture classification.
//!
//! | Test | Threshold | Label |
//! |---|---|---|
//! | thumb tip ↔ index tip | < 0.08 | `Pinch` (checked first) |
//! | mean of four fingertips ↔ wrist | < 0.25 | `Fist` |
//! | otherwise | | `Open` |
//!
//! Classification is stateless.  [`GestureClassifier`] only remembers the
//! last label so that a missing hand reports "not tracking" without
//! inventing a new gesture.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::landmarks::{HandFrame, FINGERTIPS, INDEX_TIP, THUMB_TIP, WRIST};

pub const PINCH_THRESHOLD: f32 = 0.08;
pub const FIST_THRESHOLD:  f32 = 0.25;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GestureLabel {
    #[default]
    Open,
    Pinch,
    Fist,
}

impl GestureLabel {
    pub fn name(self) -> &'static str {
        match self {
            GestureLabel::Open  => "OPEN",
            GestureLabel::Pinch => "PINCH",
            GestureLabel::Fist  => "FIST",
        }
    }
}

pub fn pinch_distance(frame: &HandFrame) -> f32 {
    frame.distance(THUMB_TIP, INDEX_TIP)
}

pub fn mean_fingertip_distance(frame: &HandFrame) -> f32 {
    FINGERTIPS.iter().map(|&tip| frame.distance(tip, WRIST)).sum::<f32>() / FINGERTIPS.len() as f32
}

pub fn classify(frame: &HandFrame) -> GestureLabel {
    if pinch_distance(frame) < PINCH_THRESHOLD {
        GestureLabel::Pinch
    } else if mean_fingertip_distance(frame) < FIST_THRESHOLD {
        GestureLabel::Fist
    } else {
        GestureLabel::Open
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureClassifier
// ════════════════════════════════════════════════════════════════════════════

/// Result of observing one sample.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HandReading {
    pub gesture:     GestureLabel,
    pub is_tracking: bool,
    pub palm_center: Option<Vec2>,
    pub landmarks:   Option<HandFrame>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct GestureClassifier {
    last: GestureLabel,
}

impl GestureClassifier {
    pub fn new() -> Self { Self::default() }

    pub fn last_gesture(&self) -> GestureLabel { self.last }

    /// Classify a present sample; an absent one keeps the previous label and
    /// reports `is_tracking = false`.
    pub fn observe(&mut self, sample: Option<&HandFrame>) -> HandReading {
        match sample {
            Some(frame) => {
                self.last = classify(frame);
                HandReading {
                    gesture:     self.last,
                    is_tracking: true,
                    palm_center: Some(frame.palm_center()),
                    landmarks:   Some(*frame),
                }
            }
            None => HandReading { gesture: self.last, ..HandReading::default() },
        }
    }

    pub fn reset(&mut self) {
        self.last = GestureLabel::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::SyntheticHand;

    fn frame(gesture: GestureLabel) -> HandFrame {
        SyntheticHand::new(gesture).frame().unwrap()
    }

    #[test]
    fn synthetic_hands_classify_as_posed() {
        for g in [GestureLabel::Open, GestureLabel::Pinch, GestureLabel::Fist] {
            assert_eq!(classify(&frame(g)), g, "{}", g.name());
        }
    }

    #[test]
    fn pinch_wins_over_fist() {
        // A curled hand whose thumb touches the index tip is a pinch.
        let hand = SyntheticHand::new(GestureLabel::Fist).pinched();
        let f    = hand.frame().unwrap();
        assert!(mean_fingertip_distance(&f) < FIST_THRESHOLD);
        assert_eq!(classify(&f), GestureLabel::Pinch);
    }

    #[test]
    fn thresholds_are_strict() {
        let f = frame(GestureLabel::Open);
        assert!(pinch_distance(&f) >= PINCH_THRESHOLD);
        assert!(mean_fingertip_distance(&f) >= FIST_THRESHOLD);
    }

    #[test]
    fn absent_sample_keeps_label_and_drops_tracking() {
        let mut c = GestureClassifier::new();
        let r = c.observe(Some(&frame(GestureLabel::Fist)));
        assert!(r.is_tracking);
        assert!(r.palm_center.is_some());
        let r = c.observe(None);
        assert_eq!(r.gesture, GestureLabel::Fist);
        assert!(!r.is_tracking);
        assert!(r.palm_center.is_none() && r.landmarks.is_none());
        c.reset();
        assert_eq!(c.last_gesture(), GestureLabel::Open);
    }

    #[test]
    fn degenerate_hand_does_not_panic() {
        // Every landmark collapsed onto one point: zero distances everywhere.
        let f = HandFrame::new(&[Vec2::splat(0.5); 21]).unwrap();
        assert_eq!(classify(&f), GestureLabel::Pinch);
    }
}
