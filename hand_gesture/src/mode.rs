//! Gesture → mode mapping and the published mode cell.
//!
//! | Gesture | Tracking | Mode |
//! |---|---|---|
//! | `Fist` or `Pinch` | yes | `Formed` |
//! | `Open` | yes | `Chaos` |
//! | any | no | `Chaos` |
//!
//! There is no debounce: every processed sample may flip the mode, and the
//! interpolator's smoothing is what makes that look calm.
//!
//! [`ModeController`] is cheap to clone and every clone shares the same
//! cells, so the acquisition thread and the render thread each hold one.
//! Each cell has a single writer:
//!
//! * gesture cell: the acquisition thread
//! * manual cell and enable flag: the UI (render) thread

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

use ornament_field::TreeMode;
use tracing::debug;

use crate::classifier::{GestureLabel, HandReading};

pub fn mode_for(gesture: GestureLabel, is_tracking: bool) -> TreeMode {
    match (is_tracking, gesture) {
        (true, GestureLabel::Fist) | (true, GestureLabel::Pinch) => TreeMode::Formed,
        _ => TreeMode::Chaos,
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SharedMode
// ════════════════════════════════════════════════════════════════════════════

/// Lock-free cell holding one [`TreeMode`].
#[derive(Clone, Debug, Default)]
pub struct SharedMode(Arc<AtomicU8>);

impl SharedMode {
    pub fn new(mode: TreeMode) -> Self {
        SharedMode(Arc::new(AtomicU8::new(mode.as_u8())))
    }

    pub fn load(&self) -> TreeMode {
        TreeMode::from_u8(self.0.load(Ordering::Acquire))
    }

    pub fn publish(&self, mode: TreeMode) {
        self.0.store(mode.as_u8(), Ordering::Release);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ModeController
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlSource {
    Gesture,
    Manual,
}

#[derive(Clone, Debug)]
pub struct ModeController {
    gesture: SharedMode,
    manual:  SharedMode,
    enabled: Arc<AtomicBool>,
}

impl ModeController {
    /// Both cells start at `Chaos`.
    pub fn new(gesture_enabled: bool) -> Self {
        ModeController {
            gesture: SharedMode::default(),
            manual:  SharedMode::default(),
            enabled: Arc::new(AtomicBool::new(gesture_enabled)),
        }
    }

    pub fn source(&self) -> ControlSource {
        if self.is_gesture_enabled() { ControlSource::Gesture } else { ControlSource::Manual }
    }

    pub fn is_gesture_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// The mode the render loop should head toward right now.
    pub fn current(&self) -> TreeMode {
        match self.source() {
            ControlSource::Gesture => self.gesture.load(),
            ControlSource::Manual  => self.manual.load(),
        }
    }

    /// Publish the mode for one classified sample.  Ignored while gesture
    /// control is off.
    pub fn apply_reading(&self, reading: &HandReading) -> Option<TreeMode> {
        if !self.is_gesture_enabled() {
            return None;
        }
        let mode = mode_for(reading.gesture, reading.is_tracking);
        if mode != self.gesture.load() {
            debug!(gesture = reading.gesture.name(), tracking = reading.is_tracking, mode = mode.name(), "gesture mode flip");
        }
        self.gesture.publish(mode);
        Some(mode)
    }

    /// Turning gesture control on starts from "no hand" (`Chaos`) until the
    /// first sample arrives; turning it off hands control back to the last
    /// manual value.
    pub fn set_gesture_enabled(&self, on: bool) {
        if on == self.is_gesture_enabled() {
            return;
        }
        if on {
            self.gesture.publish(TreeMode::Chaos);
        }
        self.enabled.store(on, Ordering::Release);
        debug!(enabled = on, "gesture control toggled");
    }

    pub fn set_manual(&self, mode: TreeMode) {
        self.manual.publish(mode);
    }

    /// Flip the manual mode relative to what is currently shown, taking
    /// control away from gestures.
    pub fn toggle_manual(&self) -> TreeMode {
        let next = self.current().toggled();
        self.set_gesture_enabled(false);
        self.manual.publish(next);
        debug!(mode = next.name(), "manual mode toggle");
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn reading(gesture: GestureLabel, is_tracking: bool) -> HandReading {
        HandReading { gesture, is_tracking, ..HandReading::default() }
    }

    #[test]
    fn mapping_table() {
        assert_eq!(mode_for(GestureLabel::Fist, true), TreeMode::Formed);
        assert_eq!(mode_for(GestureLabel::Pinch, true), TreeMode::Formed);
        assert_eq!(mode_for(GestureLabel::Open, true), TreeMode::Chaos);
        assert_eq!(mode_for(GestureLabel::Fist, false), TreeMode::Chaos);
    }

    #[test]
    fn every_sample_can_flip() {
        let ctl = ModeController::new(true);
        assert_eq!(ctl.current(), TreeMode::Chaos);
        for (g, want) in [
            (GestureLabel::Fist, TreeMode::Formed),
            (GestureLabel::Open, TreeMode::Chaos),
            (GestureLabel::Pinch, TreeMode::Formed),
        ] {
            assert_eq!(ctl.apply_reading(&reading(g, true)), Some(want));
            assert_eq!(ctl.current(), want);
        }
        ctl.apply_reading(&reading(GestureLabel::Pinch, false));
        assert_eq!(ctl.current(), TreeMode::Chaos);
    }

    #[test]
    fn disabled_gestures_hold_manual_value() {
        let ctl = ModeController::new(false);
        ctl.set_manual(TreeMode::Formed);
        assert_eq!(ctl.apply_reading(&reading(GestureLabel::Open, true)), None);
        assert_eq!(ctl.current(), TreeMode::Formed);
        assert_eq!(ctl.source(), ControlSource::Manual);
    }

    #[test]
    fn disabling_never_leaves_gesture_mode_stuck() {
        let ctl = ModeController::new(true);
        ctl.apply_reading(&reading(GestureLabel::Fist, true));
        ctl.set_gesture_enabled(false);
        assert_eq!(ctl.current(), TreeMode::Chaos);
        ctl.set_gesture_enabled(true);
        // Fresh start: no stale FORMED from before the toggle.
        assert_eq!(ctl.current(), TreeMode::Chaos);
    }

    #[test]
    fn toggle_takes_manual_control_from_current() {
        let ctl = ModeController::new(true);
        ctl.apply_reading(&reading(GestureLabel::Fist, true));
        assert_eq!(ctl.toggle_manual(), TreeMode::Chaos);
        assert!(!ctl.is_gesture_enabled());
        assert_eq!(ctl.toggle_manual(), TreeMode::Formed);
        assert_eq!(ctl.current(), TreeMode::Formed);
    }

    #[test]
    fn clones_share_cells_across_threads() {
        let ctl    = ModeController::new(true);
        let worker = ctl.clone();
        thread::spawn(move || {
            worker.apply_reading(&reading(GestureLabel::Pinch, true));
        })
        .join()
        .unwrap();
        assert_eq!(ctl.current(), TreeMode::Formed);
    }

    #[test]
    fn shared_mode_round_trips() {
        let cell = SharedMode::new(TreeMode::Formed);
        assert_eq!(cell.load(), TreeMode::Formed);
        cell.publish(TreeMode::Chaos);
        assert_eq!(cell.clone().load(), TreeMode::Chaos);
    }
}
