//! The gesture acquisition loop.
//!
//! A [`LandmarkSource`] pushes [`SourceFrame`]s at its own cadence.  The
//! acquisition thread keeps at most one sample per rate-limit interval,
//! classifies it, publishes the mode through the [`ModeController`] and
//! sends an [`AcquisitionReport`] to the render loop, which keeps only the
//! newest one ([`latest`]).
//!
//! While gesture control is off, frames are still received (so the source
//! never blocks) but nothing is classified or published.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use glam::Vec2;
use ornament_field::TreeMode;
use tracing::{debug, info};

use crate::classifier::{GestureClassifier, GestureLabel, HandReading};
use crate::landmarks::sanitize;
use crate::mode::ModeController;

/// Default cap on processed samples per second.
pub const DEFAULT_MAX_RATE_HZ: f32 = 15.0;

// ════════════════════════════════════════════════════════════════════════════
// SourceFrame / LandmarkSource
// ════════════════════════════════════════════════════════════════════════════

/// One detector result: raw landmarks, or `None` when no hand was seen.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SourceFrame {
    pub landmarks: Option<Vec<Vec2>>,
}

impl SourceFrame {
    pub fn hand(points: impl Into<Vec<Vec2>>) -> Self {
        SourceFrame { landmarks: Some(points.into()) }
    }

    pub fn empty() -> Self {
        SourceFrame { landmarks: None }
    }
}

/// Anything that can deliver landmark frames over a channel.
pub trait LandmarkSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<SourceFrame>);
}

/// Spawn a landmark source on its own thread and return the receiving end.
pub fn spawn_landmark_source<S: LandmarkSource>(source: S) -> Receiver<SourceFrame> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// RateLimiter / RateMeter
// ════════════════════════════════════════════════════════════════════════════

/// Admits a sample only if the minimum interval has passed since the last
/// admitted one.  Rejected samples are dropped, never queued.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last:         Option<Instant>,
}

impl RateLimiter {
    /// A non-positive or non-finite rate disables limiting.
    pub fn new(max_rate_hz: f32) -> Self {
        let min_interval = if max_rate_hz.is_finite() && max_rate_hz > 0.0 {
            Duration::from_secs_f32(1.0 / max_rate_hz)
        } else {
            Duration::ZERO
        };
        RateLimiter { min_interval, last: None }
    }

    pub fn min_interval(&self) -> Duration { self.min_interval }

    pub fn admit(&mut self, now: Instant) -> bool {
        match self.last {
            Some(prev) if now.saturating_duration_since(prev) < self.min_interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Counts events in consecutive one-second windows.
#[derive(Clone, Debug)]
pub struct RateMeter {
    window_start: Instant,
    count:        u32,
    rate:         u32,
}

impl RateMeter {
    pub fn new(now: Instant) -> Self {
        RateMeter { window_start: now, count: 0, rate: 0 }
    }

    pub fn record(&mut self, now: Instant) {
        self.roll(now);
        self.count += 1;
    }

    /// Close the current window if a second has passed.
    pub fn roll(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed >= Duration::from_secs(1) {
            // A gap longer than one window means nothing arrived in between.
            self.rate  = if elapsed < Duration::from_secs(2) { self.count } else { 0 };
            self.count = 0;
            self.window_start = now;
        }
    }

    /// Events in the last completed window.
    pub fn rate(&self) -> u32 { self.rate }
}

/// `HH:MM:SS`; hours keep counting past 99.
pub fn format_hms(elapsed: Duration) -> String {
    let s = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", s / 3600, (s % 3600) / 60, s % 60)
}

// ════════════════════════════════════════════════════════════════════════════
// Acquisition
// ════════════════════════════════════════════════════════════════════════════

/// Stats block for the UI.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TrackingStats {
    pub gesture:         GestureLabel,
    pub is_tracking:     bool,
    /// Processed samples per second.
    pub samples_per_sec: u32,
    pub elapsed:         Duration,
}

impl TrackingStats {
    pub fn elapsed_hms(&self) -> String { format_hms(self.elapsed) }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AcquisitionReport {
    pub reading: HandReading,
    pub mode:    TreeMode,
    pub stats:   TrackingStats,
}

/// Classifier, mode mapping and rate limiting for one landmark stream.
pub struct Acquisition {
    controller: ModeController,
    classifier: GestureClassifier,
    limiter:    RateLimiter,
    meter:      RateMeter,
    started:    Instant,
    /// Enable flag seen on the previous frame.
    was_enabled: bool,
}

impl Acquisition {
    pub fn new(controller: ModeController, max_rate_hz: f32, now: Instant) -> Self {
        Acquisition {
            was_enabled: controller.is_gesture_enabled(),
            controller,
            classifier:  GestureClassifier::new(),
            limiter:     RateLimiter::new(max_rate_hz),
            meter:       RateMeter::new(now),
            started:     now,
        }
    }

    /// Process one frame arriving at `now`.  Returns `None` when the frame
    /// was skipped (gesture control off, or inside the rate-limit interval).
    pub fn ingest(&mut self, frame: SourceFrame, now: Instant) -> Option<AcquisitionReport> {
        self.meter.roll(now);
        let enabled = self.controller.is_gesture_enabled();
        if enabled != self.was_enabled {
            self.was_enabled = enabled;
            self.classifier.reset();
            self.limiter.reset();
        }
        if !enabled || !self.limiter.admit(now) {
            return None;
        }
        self.meter.record(now);

        let sample  = sanitize(frame.landmarks.as_deref());
        let reading = self.classifier.observe(sample.as_ref());
        // Control can be switched off between the check above and here; the
        // controller then declines and the current manual mode is reported.
        let mode = self.controller
            .apply_reading(&reading)
            .unwrap_or_else(|| self.controller.current());

        Some(AcquisitionReport { reading, mode, stats: self.stats(reading, now) })
    }

    fn stats(&self, reading: HandReading, now: Instant) -> TrackingStats {
        TrackingStats {
            gesture:         reading.gesture,
            is_tracking:     reading.is_tracking,
            samples_per_sec: self.meter.rate(),
            elapsed:         now.saturating_duration_since(self.started),
        }
    }
}

/// Run `acquisition` on its own thread, fed by `frames`.  Frames that queued
/// up while a sample was being processed are skipped in favour of the newest
/// one.  The thread ends when the source hangs up or the report receiver is
/// dropped.
pub fn spawn_acquisition(
    frames: Receiver<SourceFrame>,
    mut acquisition: Acquisition,
) -> (Receiver<AcquisitionReport>, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel();
    let handle = thread::spawn(move || {
        info!(interval = ?acquisition.limiter.min_interval(), "gesture acquisition started");
        while let Ok(oldest) = frames.recv() {
            // A backlog is stale: classify only the newest queued frame.
            let frame = frames.try_iter().last().unwrap_or(oldest);
            if let Some(report) = acquisition.ingest(frame, Instant::now()) {
                if tx.send(report).is_err() {
                    break;
                }
            }
        }
        debug!("gesture acquisition stopped");
    });
    (rx, handle)
}

/// Drain everything queued and keep only the newest item.
pub fn latest<T>(rx: &Receiver<T>) -> Option<T> {
    rx.try_iter().last()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::SyntheticHand;

    fn hand(g: GestureLabel) -> SourceFrame {
        SourceFrame::hand(SyntheticHand::new(g).points().to_vec())
    }

    fn ms(n: u64) -> Duration { Duration::from_millis(n) }

    #[test]
    fn limiter_drops_samples_inside_interval() {
        let t0 = Instant::now();
        let mut lim = RateLimiter::new(15.0);
        assert!(lim.admit(t0));
        assert!(!lim.admit(t0 + ms(30)));
        assert!(!lim.admit(t0 + ms(66)));
        assert!(lim.admit(t0 + ms(67)));
    }

    #[test]
    fn fast_input_is_capped_near_limit() {
        // 100 Hz for two seconds; admissions land every 70 ms.
        let t0 = Instant::now();
        let mut lim = RateLimiter::new(15.0);
        let admitted = (0..200_u64).filter(|i| lim.admit(t0 + ms(i * 10))).count();
        assert!((28..=30).contains(&admitted), "admitted {}", admitted);
    }

    #[test]
    fn zero_rate_disables_limiting() {
        let t0 = Instant::now();
        let mut lim = RateLimiter::new(0.0);
        assert!(lim.admit(t0));
        assert!(lim.admit(t0));
    }

    #[test]
    fn meter_reports_last_full_window() {
        let t0 = Instant::now();
        let mut m = RateMeter::new(t0);
        for i in 0..12 {
            m.record(t0 + ms(i * 80));
        }
        assert_eq!(m.rate(), 0);
        m.record(t0 + ms(1_000));
        assert_eq!(m.rate(), 12);
        m.roll(t0 + ms(5_000));
        assert_eq!(m.rate(), 0);
    }

    #[test]
    fn hms_formatting() {
        assert_eq!(format_hms(Duration::from_secs(0)), "00:00:00");
        assert_eq!(format_hms(Duration::from_secs(3_725)), "01:02:05");
    }

    #[test]
    fn ingest_classifies_and_publishes() {
        let t0  = Instant::now();
        let ctl = ModeController::new(true);
        let mut acq = Acquisition::new(ctl.clone(), 15.0, t0);

        let r = acq.ingest(hand(GestureLabel::Fist), t0).unwrap();
        assert_eq!(r.reading.gesture, GestureLabel::Fist);
        assert_eq!(r.mode, TreeMode::Formed);
        assert_eq!(ctl.current(), TreeMode::Formed);

        // Inside the interval: skipped, mode untouched.
        assert!(acq.ingest(hand(GestureLabel::Open), t0 + ms(10)).is_none());
        assert_eq!(ctl.current(), TreeMode::Formed);

        let r = acq.ingest(SourceFrame::empty(), t0 + ms(100)).unwrap();
        assert!(!r.reading.is_tracking);
        assert_eq!(r.reading.gesture, GestureLabel::Fist);
        assert_eq!(r.mode, TreeMode::Chaos);
    }

    #[test]
    fn malformed_frame_counts_as_no_hand() {
        let t0  = Instant::now();
        let ctl = ModeController::new(true);
        let mut acq = Acquisition::new(ctl.clone(), 15.0, t0);
        acq.ingest(hand(GestureLabel::Pinch), t0);
        let r = acq.ingest(SourceFrame::hand(vec![Vec2::new(f32::NAN, 0.0); 21]), t0 + ms(100)).unwrap();
        assert!(!r.reading.is_tracking);
        assert_eq!(ctl.current(), TreeMode::Chaos);
    }

    #[test]
    fn disabled_acquisition_skips_work() {
        let t0  = Instant::now();
        let ctl = ModeController::new(true);
        let mut acq = Acquisition::new(ctl.clone(), 15.0, t0);
        acq.ingest(hand(GestureLabel::Fist), t0);
        ctl.set_gesture_enabled(false);
        ctl.set_manual(TreeMode::Chaos);
        assert!(acq.ingest(hand(GestureLabel::Fist), t0 + ms(200)).is_none());
        assert_eq!(ctl.current(), TreeMode::Chaos);

        ctl.set_gesture_enabled(true);
        // State was reset on the transition; the first frame is admitted.
        let r = acq.ingest(hand(GestureLabel::Open), t0 + ms(210)).unwrap();
        assert_eq!(r.mode, TreeMode::Chaos);
    }

    #[test]
    fn latest_keeps_newest() {
        let (tx, rx) = mpsc::channel();
        for i in 0..5 {
            tx.send(i).unwrap();
        }
        assert_eq!(latest(&rx), Some(4));
        assert_eq!(latest(&rx), None);
    }
}
