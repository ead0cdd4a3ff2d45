//! The 21-point hand landmark model.
//!
//! Points are normalized image coordinates: `x` grows to the right, `y`
//! grows downward, both nominally in `[0, 1]`.
//!
//! ```text
//!          8   12  16  20        tips
//!          7   11  15  19
//!     4    6   10  14  18
//!     3    5    9  13  17        finger bases
//!     2
//!      1
//!          0                     wrist
//! ```

use glam::Vec2;
use tracing::warn;

use crate::error::{GestureError, GestureResult};

pub const LANDMARK_COUNT: usize = 21;

pub const WRIST:      usize = 0;
pub const THUMB_TIP:  usize = 4;
pub const INDEX_MCP:  usize = 5;
pub const INDEX_TIP:  usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP:   usize = 13;
pub const RING_TIP:   usize = 16;
pub const PINKY_MCP:  usize = 17;
pub const PINKY_TIP:  usize = 20;

/// Wrist plus the four finger bases; their mean is the palm center.
pub const PALM: [usize; 5] = [WRIST, INDEX_MCP, MIDDLE_MCP, RING_MCP, PINKY_MCP];

/// The four non-thumb fingertips.
pub const FINGERTIPS: [usize; 4] = [INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// All five tips, for drawing.
pub const ALL_TIPS: [usize; 5] = [THUMB_TIP, INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// Bone segments for drawing a skeleton overlay.
pub const HAND_CONNECTIONS: [(usize, usize); 23] = [
    (0, 1),  (1, 2),   (2, 3),   (3, 4),     // thumb
    (0, 5),  (5, 6),   (6, 7),   (7, 8),     // index
    (0, 9),  (9, 10),  (10, 11), (11, 12),   // middle
    (0, 13), (13, 14), (14, 15), (15, 16),   // ring
    (0, 17), (17, 18), (18, 19), (19, 20),   // pinky
    (5, 9),  (9, 13),  (13, 17),             // palm
];

// ════════════════════════════════════════════════════════════════════════════
// HandFrame
// ════════════════════════════════════════════════════════════════════════════

/// A validated landmark set: exactly 21 finite points, clamped to the unit
/// square.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandFrame {
    points: [Vec2; LANDMARK_COUNT],
}

impl HandFrame {
    pub fn new(points: &[Vec2]) -> GestureResult<Self> {
        if points.len() != LANDMARK_COUNT {
            return Err(GestureError::count(points.len()));
        }
        let mut out = [Vec2::ZERO; LANDMARK_COUNT];
        for (index, (dst, src)) in out.iter_mut().zip(points).enumerate() {
            if !src.is_finite() {
                return Err(GestureError::NonFiniteCoordinate { index });
            }
            *dst = src.clamp(Vec2::ZERO, Vec2::ONE);
        }
        Ok(HandFrame { points: out })
    }

    pub fn points(&self) -> &[Vec2; LANDMARK_COUNT] { &self.points }

    pub fn get(&self, index: usize) -> Option<Vec2> { self.points.get(index).copied() }

    pub fn wrist(&self) -> Vec2 { self.points[WRIST] }

    /// Unweighted mean of [`PALM`].
    pub fn palm_center(&self) -> Vec2 {
        PALM.iter().map(|&i| self.points[i]).sum::<Vec2>() / PALM.len() as f32
    }

    pub fn distance(&self, a: usize, b: usize) -> f32 {
        self.points[a].distance(self.points[b])
    }
}

/// Turn raw detector output into a sample.  Malformed input is logged and
/// treated as "no hand".
pub fn sanitize(raw: Option<&[Vec2]>) -> Option<HandFrame> {
    let points = raw?;
    match HandFrame::new(points) {
        Ok(frame) => Some(frame),
        Err(err) => {
            warn!(error = %err, "discarding malformed landmark sample");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Vec<Vec2> {
        (0..LANDMARK_COUNT).map(|i| Vec2::new(i as f32 / 20.0, 0.5)).collect()
    }

    #[test]
    fn accepts_exactly_twenty_one_points() {
        assert!(HandFrame::new(&grid()).is_ok());
        let short = &grid()[..20];
        assert_eq!(
            HandFrame::new(short).unwrap_err(),
            GestureError::LandmarkCount { expected: 21, got: 20 }
        );
    }

    #[test]
    fn rejects_non_finite() {
        let mut pts = grid();
        pts[7].y = f32::INFINITY;
        assert_eq!(HandFrame::new(&pts).unwrap_err(), GestureError::NonFiniteCoordinate { index: 7 });
    }

    #[test]
    fn clamps_out_of_range() {
        let mut pts = grid();
        pts[3] = Vec2::new(-0.4, 1.7);
        let frame = HandFrame::new(&pts).unwrap();
        assert_eq!(frame.get(3), Some(Vec2::new(0.0, 1.0)));
        assert_eq!(frame.get(21), None);
    }

    #[test]
    fn palm_center_is_mean_of_five() {
        let mut pts = vec![Vec2::ZERO; LANDMARK_COUNT];
        for &i in &PALM {
            pts[i] = Vec2::new(0.2 * i as f32 / 17.0, 0.5);
        }
        let frame = HandFrame::new(&pts).unwrap();
        let expect = PALM.iter().map(|&i| 0.2 * i as f32 / 17.0).sum::<f32>() / 5.0;
        assert!((frame.palm_center().x - expect).abs() < 1e-6);
        assert!((frame.palm_center().y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn sanitize_maps_malformed_to_absent() {
        assert!(sanitize(None).is_none());
        assert!(sanitize(Some(&[Vec2::ZERO; 3])).is_none());
        assert!(sanitize(Some(&grid())).is_some());
    }

    #[test]
    fn connections_reference_valid_landmarks() {
        for (a, b) in HAND_CONNECTIONS {
            assert!(a < LANDMARK_COUNT && b < LANDMARK_COUNT && a != b);
        }
    }
}
