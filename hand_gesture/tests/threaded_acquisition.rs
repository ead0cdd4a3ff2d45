//! Acquisition running on real threads, fed by a scripted source.

use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::{Duration, Instant};

use hand_gesture::{
    latest, spawn_acquisition, spawn_landmark_source, Acquisition, GestureLabel, LandmarkSource,
    ModeController, SourceFrame, SyntheticHand,
};
use ornament_field::TreeMode;

/// Replays a fixed list of frames with a delay between each.
struct Scripted {
    frames: Vec<SourceFrame>,
    gap:    Duration,
}

impl LandmarkSource for Scripted {
    fn run(self: Box<Self>, tx: Sender<SourceFrame>) {
        for frame in self.frames {
            if tx.send(frame).is_err() {
                return;
            }
            thread::sleep(self.gap);
        }
    }
}

fn hand(g: GestureLabel) -> SourceFrame {
    SourceFrame::hand(SyntheticHand::new(g).points().to_vec())
}

#[test]
fn fist_then_release_drives_mode() {
    let ctl     = ModeController::new(true);
    let source  = Scripted {
        frames: vec![hand(GestureLabel::Fist), SourceFrame::empty()],
        gap:    Duration::from_millis(120),
    };
    let frames  = spawn_landmark_source(source);
    let acq     = Acquisition::new(ctl.clone(), 15.0, Instant::now());
    let (reports, handle) = spawn_acquisition(frames, acq);
    handle.join().unwrap();

    let all: Vec<_> = reports.try_iter().collect();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].mode, TreeMode::Formed);
    assert!(all[0].stats.is_tracking);
    assert_eq!(all[1].mode, TreeMode::Chaos);
    assert!(!all[1].stats.is_tracking);
    assert_eq!(ctl.current(), TreeMode::Chaos);
}

#[test]
fn burst_is_rate_limited() {
    let ctl    = ModeController::new(true);
    let script = (0..40).map(|_| hand(GestureLabel::Open)).collect();
    let source = Scripted { frames: script, gap: Duration::ZERO };
    let frames = spawn_landmark_source(source);
    let acq    = Acquisition::new(ctl.clone(), 15.0, Instant::now());
    let (reports, handle) = spawn_acquisition(frames, acq);
    handle.join().unwrap();

    // A zero-gap burst lasts a few milliseconds; nearly all of it falls
    // inside the 66 ms interval and is dropped.
    let kept: Vec<_> = reports.try_iter().collect();
    assert!(!kept.is_empty() && kept.len() < 5, "kept {}", kept.len());
    assert!(latest(&reports).is_none());
}

#[test]
fn disabled_controller_receives_but_ignores_frames() {
    let ctl = ModeController::new(false);
    ctl.set_manual(TreeMode::Formed);
    let source = Scripted {
        frames: vec![hand(GestureLabel::Open), hand(GestureLabel::Open)],
        gap:    Duration::from_millis(80),
    };
    let frames = spawn_landmark_source(source);
    let (reports, handle) = spawn_acquisition(frames, Acquisition::new(ctl.clone(), 15.0, Instant::now()));
    handle.join().unwrap();
    assert!(reports.try_recv().is_err());
    assert_eq!(ctl.current(), TreeMode::Formed);
}

#[test]
fn backlog_is_resolved_by_newest_frame() {
    let ctl = ModeController::new(true);
    let (tx, frames) = mpsc::channel();
    tx.send(hand(GestureLabel::Fist)).unwrap();
    tx.send(hand(GestureLabel::Open)).unwrap();
    drop(tx);

    let (reports, handle) = spawn_acquisition(frames, Acquisition::new(ctl.clone(), 15.0, Instant::now()));
    handle.join().unwrap();

    let all: Vec<_> = reports.try_iter().collect();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].reading.gesture, GestureLabel::Open);
    assert_eq!(ctl.current(), TreeMode::Chaos);
}
