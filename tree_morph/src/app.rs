//! Top-level application state machine.
//!
//! `AppState` owns the [`FieldEngine`], the render-side handle of the
//! [`ModeController`] and the camera.  It applies keyboard commands and the
//! newest acquisition report, advances the field once per frame and draws
//! into the visualizer's canvas.

use std::sync::mpsc::{Receiver, Sender};
use std::time::{Duration, Instant};

use glam::Vec2;
use hand_gesture::acquisition::format_hms;
use hand_gesture::{
    latest, spawn_acquisition, spawn_landmark_source, Acquisition, AcquisitionReport, GestureLabel,
    HandReading, ModeController, RateMeter, SourceFrame,
};
use ornament_field::{FieldEngine, TransformBuffer, TreeMode};
use tracing::{debug, info};

use crate::camera::SceneView;
use crate::canvas::Canvas;
use crate::config::AppConfig;
use crate::error::AppResult;
use crate::source::SimInput;
use crate::visualizer::{draw_hud, draw_scene, draw_skeleton, Hud, Visualizer};

/// Longest step fed to the field; a stalled frame must not teleport it.
const MAX_DT: f32 = 0.1;

// ════════════════════════════════════════════════════════════════════════════
// Command
// ════════════════════════════════════════════════════════════════════════════

/// A user action from the window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Flip CHAOS ↔ FORMED by hand, taking control from gestures.
    ToggleMode,
    /// Turn gesture tracking on or off.
    ToggleGesture,
    /// Show the simulated hand in a pose.
    ShowHand(GestureLabel),
    HideHand,
    MoveHand(Vec2),
    Quit,
}

/// What the run loop should do after a command.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Flow {
    Continue,
    /// Pass this on to the simulated landmark source.
    Forward(SimInput),
    Quit,
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    engine:     FieldEngine,
    controller: ModeController,
    view:       SceneView,
    buffer:     TransformBuffer,

    // ── gesture side ──────────────────────────────────────────────────────
    /// Newest report; cleared the moment gesture control goes off.
    report:     Option<AcquisitionReport>,

    // ── frame stats ──────────────────────────────────────────────────────
    fps:        RateMeter,
    started:    Instant,
    now:        Instant,
}

impl AppState {
    pub fn new(cfg: &AppConfig, now: Instant) -> AppResult<Self> {
        let engine = FieldEngine::new(&cfg.field)?;
        let stats  = engine.stats();
        let buffer = TransformBuffer::with_capacity(stats.instances, stats.foliage);
        Ok(AppState {
            engine,
            controller: ModeController::new(cfg.gesture.enabled),
            view:       SceneView::new(cfg.camera, cfg.window.width, cfg.window.height),
            buffer,
            report:     None,
            fps:        RateMeter::new(now),
            started:    now,
            now,
        })
    }

    // ── process one Command ──────────────────────────────────────────────

    pub fn handle_command(&mut self, cmd: Command) -> Flow {
        match cmd {
            Command::ToggleMode => {
                let mode = self.controller.toggle_manual();
                self.report = None;
                info!(mode = mode.name(), "manual mode");
                Flow::Continue
            }
            Command::ToggleGesture => {
                let on = !self.controller.is_gesture_enabled();
                self.controller.set_gesture_enabled(on);
                self.report = None;
                info!(enabled = on, "gesture tracking");
                Flow::Continue
            }
            Command::ShowHand(g)  => Flow::Forward(SimInput::Present(g)),
            Command::HideHand     => Flow::Forward(SimInput::Remove),
            Command::MoveHand(d)  => Flow::Forward(SimInput::Nudge(d)),
            Command::Quit         => Flow::Quit,
        }
    }

    /// Take the newest report from the acquisition thread.  Reports that
    /// arrive after gesture control went off are dropped.
    pub fn accept_report(&mut self, report: AcquisitionReport) {
        if self.controller.is_gesture_enabled() {
            self.report = Some(report);
        }
    }

    // ── Per-frame tick ────────────────────────────────────────────────────

    pub fn tick(&mut self, dt: f32, now: Instant) {
        self.now = now;
        self.fps.record(now);
        if !self.controller.is_gesture_enabled() {
            self.report = None;
        }
        let mode = self.controller.current();
        let dt   = if dt.is_finite() { dt.clamp(0.0, MAX_DT) } else { 0.0 };
        self.engine.tick(mode, dt);
        let palm = self.reading().and_then(|r| r.palm_center);
        self.view.update(mode, palm, dt);
    }

    /// Draw the current frame.
    pub fn render(&mut self, canvas: &mut Canvas) {
        self.engine.write_buffer(&mut self.buffer);
        draw_scene(canvas, &self.buffer, &self.view);
        if let Some(hand) = self.reading().and_then(|r| r.landmarks) {
            draw_skeleton(canvas, &hand);
        }
        draw_hud(canvas, &self.hud());
    }

    // ── Accessors for the render loop ─────────────────────────────────────

    pub fn controller(&self) -> &ModeController { &self.controller }
    pub fn engine(&self)     -> &FieldEngine    { &self.engine }
    pub fn view(&self)       -> &SceneView      { &self.view }
    pub fn mode(&self)       -> TreeMode        { self.controller.current() }

    /// Current hand reading, only while a hand is actually tracked.
    pub fn reading(&self) -> Option<&HandReading> {
        self.report.as_ref().map(|r| &r.reading).filter(|r| r.is_tracking)
    }

    pub fn hud(&self) -> Hud {
        let stats   = self.engine.stats();
        let reading = self.reading();
        Hud {
            mode:            self.controller.current(),
            gesture_control: self.controller.is_gesture_enabled(),
            gesture:         reading.map(|r| r.gesture.name()),
            is_tracking:     reading.is_some(),
            samples_per_sec: self.report.map_or(0, |r| r.stats.samples_per_sec),
            elapsed:         format_hms(self.now.saturating_duration_since(self.started)),
            particles:       stats.particle_count(),
            fps:             self.fps.rate(),
            frozen:          stats.frozen,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Landmark source selection
// ════════════════════════════════════════════════════════════════════════════

#[cfg(not(feature = "leap"))]
fn spawn_source() -> (Option<Sender<SimInput>>, Receiver<SourceFrame>) {
    use crate::source::SimLandmarkSource;
    let (sim_tx, sim_rx) = std::sync::mpsc::channel::<SimInput>();
    (Some(sim_tx), spawn_landmark_source(SimLandmarkSource::new(sim_rx)))
}

#[cfg(feature = "leap")]
fn spawn_source() -> (Option<Sender<SimInput>>, Receiver<SourceFrame>) {
    use crate::source::LeapLandmarkSource;
    (None, spawn_landmark_source(LeapLandmarkSource))
}

// ════════════════════════════════════════════════════════════════════════════
// run(): the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// Spawns the landmark source and the acquisition thread, opens the window
/// and drives the input/tick/render loop at the configured frame rate.  The
/// worker threads wind down on their own once their channels close.
pub fn run(cfg: AppConfig) -> AppResult<()> {
    let start   = Instant::now();
    let mut app = AppState::new(&cfg, start)?;

    // ── Landmark source + acquisition ─────────────────────────────────────
    let (sim_tx, frames) = spawn_source();
    let acquisition      = Acquisition::new(app.controller().clone(), cfg.gesture.max_rate_hz, start);
    let (reports, _acq)  = spawn_acquisition(frames, acquisition);

    // ── Visualizer ────────────────────────────────────────────────────────
    let mut vis = Visualizer::new(&cfg.window)?;
    info!(width = cfg.window.width, height = cfg.window.height, fps = cfg.window.fps, "window open");

    // ── Main loop ─────────────────────────────────────────────────────────
    let mut last = start;
    while vis.is_open() {
        // 1. Keyboard
        for cmd in vis.poll_input() {
            match app.handle_command(cmd) {
                Flow::Continue => {}
                Flow::Forward(input) => {
                    if let Some(tx) = &sim_tx {
                        let _ = tx.send(input);
                    }
                }
                Flow::Quit => {
                    if let Some(tx) = &sim_tx {
                        let _ = tx.send(SimInput::Quit);
                    }
                    debug!("quit requested");
                    return Ok(());
                }
            }
        }

        // 2. Newest gesture report
        if let Some(report) = latest(&reports) {
            app.accept_report(report);
        }

        // 3. Per-frame logic
        let now = Instant::now();
        app.tick(now.saturating_duration_since(last).as_secs_f32(), now);
        last = now;

        // 4. Render
        app.render(vis.canvas_mut());
        vis.present()?;
    }

    Ok(())
}

/// Frame budget for `fps`.
pub fn frame_interval(fps: u32) -> Duration {
    Duration::from_secs_f64(1.0 / fps.max(1) as f64)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
