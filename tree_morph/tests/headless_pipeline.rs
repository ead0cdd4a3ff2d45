//! Simulated hand → acquisition thread → app state, without a window.

use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use hand_gesture::{latest, spawn_acquisition, spawn_landmark_source, Acquisition, GestureLabel};
use ornament_field::{CategoryCounts, TreeMode};
use tree_morph::app::Flow;
use tree_morph::source::{SimInput, SimLandmarkSource};
use tree_morph::{AppConfig, AppState, Command};

fn small_config() -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.field.seed   = Some(8);
    cfg.field.counts = CategoryCounts::default().with(ornament_field::Category::Light, 50);
    cfg.window.width  = 320;
    cfg.window.height = 240;
    cfg
}

/// Run the app loop without rendering until `pred` holds or `limit` passes.
fn pump(
    app: &mut AppState,
    reports: &mpsc::Receiver<hand_gesture::AcquisitionReport>,
    limit: Duration,
    pred: impl Fn(&AppState) -> bool,
) -> bool {
    let start = Instant::now();
    while start.elapsed() < limit {
        if let Some(r) = latest(reports) {
            app.accept_report(r);
        }
        app.tick(1.0 / 60.0, Instant::now());
        if pred(app) {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    false
}

#[test]
fn keyboard_poses_drive_the_tree() {
    let cfg     = small_config();
    let mut app = AppState::new(&cfg, Instant::now()).unwrap();

    let (sim_tx, sim_rx) = mpsc::channel();
    let mut source = SimLandmarkSource::new(sim_rx);
    source.period = Duration::from_millis(10);
    let frames = spawn_landmark_source(source);
    let acq    = Acquisition::new(app.controller().clone(), cfg.gesture.max_rate_hz, Instant::now());
    let (reports, handle) = spawn_acquisition(frames, acq);

    let send = |app: &mut AppState, cmd: Command| {
        if let Flow::Forward(input) = app.handle_command(cmd) {
            sim_tx.send(input).unwrap();
        }
    };

    send(&mut app, Command::ShowHand(GestureLabel::Fist));
    assert!(pump(&mut app, &reports, Duration::from_secs(3), |a| a.engine().mode() == TreeMode::Formed));
    assert!(app.hud().is_tracking);
    assert_eq!(app.hud().gesture, Some("FIST"));

    send(&mut app, Command::ShowHand(GestureLabel::Open));
    assert!(pump(&mut app, &reports, Duration::from_secs(3), |a| a.engine().mode() == TreeMode::Chaos));

    send(&mut app, Command::ShowHand(GestureLabel::Pinch));
    assert!(pump(&mut app, &reports, Duration::from_secs(3), |a| a.engine().mode() == TreeMode::Formed));

    send(&mut app, Command::HideHand);
    assert!(pump(&mut app, &reports, Duration::from_secs(3), |a| !a.hud().is_tracking));
    assert_eq!(app.mode(), TreeMode::Chaos);

    sim_tx.send(SimInput::Quit).unwrap();
    handle.join().unwrap();
}

#[test]
fn gestures_off_ignore_the_hand() {
    let cfg     = small_config();
    let mut app = AppState::new(&cfg, Instant::now()).unwrap();

    let (sim_tx, sim_rx) = mpsc::channel();
    let mut source = SimLandmarkSource::new(sim_rx);
    source.period = Duration::from_millis(10);
    let frames = spawn_landmark_source(source);
    let acq    = Acquisition::new(app.controller().clone(), cfg.gesture.max_rate_hz, Instant::now());
    let (reports, handle) = spawn_acquisition(frames, acq);

    app.handle_command(Command::ToggleGesture);
    sim_tx.send(SimInput::Present(GestureLabel::Fist)).unwrap();

    // Nothing the hand does reaches the field while control is manual.
    let formed = pump(&mut app, &reports, Duration::from_millis(400), |a| a.engine().mode() == TreeMode::Formed);
    assert!(!formed);
    assert!(!app.hud().is_tracking);

    app.handle_command(Command::ToggleMode);
    app.tick(1.0 / 60.0, Instant::now());
    assert_eq!(app.engine().mode(), TreeMode::Formed);

    drop(sim_tx);
    handle.join().unwrap();
}
