//! Software-rendered viewer using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ MODE      FORMED                                         │
//! │ CONTROL   GESTURE            [tree / cloud]              │
//! │ GESTURE   FIST                                           │
//! │ ...                                                      │
//! │                                            ┌───────────┐ │
//! │                                            │ skeleton  │ │
//! │                                            └───────────┘ │
//! │ key legend                                               │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Drawing lives in free functions over a [`Canvas`] so it runs without a
//! window; [`Visualizer`] only owns the window and polls keys.

use glam::{Vec2, Vec3};
use hand_gesture::landmarks::ALL_TIPS;
use hand_gesture::{HandFrame, HAND_CONNECTIONS};
use minifb::{Key, KeyRepeat, Window, WindowOptions};
use ornament_field::{InstanceTransform, TransformBuffer, TreeMode};

use crate::app::{frame_interval, Command};
use crate::camera::SceneView;
use crate::canvas::{argb, blend, label_width, Canvas};
use crate::config::WindowConfig;
use crate::error::{AppError, AppResult};

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

const BG_TOP:       u32   = 0xFF05070F;
const BG_BOTTOM:    u32   = 0xFF14100A;
const PANEL_BG:     u32   = 0xFF000000;
const TEXT:         u32   = 0xFFEEE6D0;
const TEXT_DIM:     u32   = 0xFF8A8270;
const GOLD:         u32   = 0xFFFFD700;
const FORMED_TINT:  u32   = 0xFF7CFC9A;
const CHAOS_TINT:   u32   = 0xFFFF7B6B;
const BONE:         u32   = 0xFFFFFFFF;
const TIP:          u32   = 0xFFFF3040;
const FONT:         usize = 2;
const LINE_H:       usize = 16;
const MARGIN:       usize = 10;
const INSET_W:      usize = 200;
const INSET_H:      usize = 150;
/// Foliage point diameter is `size · FOLIAGE_PX / depth` at 720 px height.
const FOLIAGE_PX:   f32   = 600.0;
const TOPPER_SIZE:  f32   = 1.2;

/// Arrow-key step for the simulated hand, in normalized image units.
const NUDGE: f32 = 0.02;

// ════════════════════════════════════════════════════════════════════════════
// Hud
// ════════════════════════════════════════════════════════════════════════════

/// Everything the overlay prints.
#[derive(Clone, Debug, PartialEq)]
pub struct Hud {
    pub mode:            TreeMode,
    pub gesture_control: bool,
    /// `None` when no hand is tracked (or gestures are off).
    pub gesture:         Option<&'static str>,
    pub is_tracking:     bool,
    pub samples_per_sec: u32,
    pub elapsed:         String,
    pub particles:       usize,
    pub fps:             u32,
    pub frozen:          usize,
}

impl Hud {
    pub fn lines(&self) -> Vec<(&'static str, String)> {
        let mut lines = vec![
            ("MODE", self.mode.name().to_string()),
            ("CONTROL", if self.gesture_control { "GESTURE" } else { "MANUAL (G)" }.to_string()),
            ("GESTURE", self.gesture.unwrap_or("--").to_string()),
            ("TRACKING", if self.is_tracking { "YES" } else { "NO" }.to_string()),
            ("SAMPLES/S", self.samples_per_sec.to_string()),
            ("TIME", self.elapsed.clone()),
            ("PARTICLES", self.particles.to_string()),
            ("FPS", self.fps.to_string()),
        ];
        if self.frozen > 0 {
            lines.push(("FROZEN", self.frozen.to_string()));
        }
        lines
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Scene drawing
// ════════════════════════════════════════════════════════════════════════════

/// Draw one frame of the field into `canvas`.
pub fn draw_scene(canvas: &mut Canvas, buffer: &TransformBuffer, view: &SceneView) {
    canvas.clear_gradient(BG_TOP, BG_BOTTOM);
    let px_scale = canvas.height() as f32 / 720.0;

    for inst in &buffer.instances {
        draw_instance(canvas, inst, view, 1.0);
    }

    for sprite in &buffer.foliage {
        let Some(p) = view.project(Vec3::from_array(sprite.position)) else { continue };
        let diameter = (sprite.size * FOLIAGE_PX / p.depth * px_scale).clamp(2.0, 100.0);
        canvas.glow(p.x, p.y, 0.5 * diameter, p.depth, argb(sprite.color));
    }

    if let Some(star) = &buffer.topper {
        if let Some(p) = view.project(star.transform.position) {
            let r = TOPPER_SIZE * star.transform.scale * p.px_per_unit;
            canvas.glow(p.x, p.y, 3.0 * r, p.depth - 1.0, GOLD);
        }
        draw_instance(canvas, star, view, TOPPER_SIZE);
    }
}

fn draw_instance(canvas: &mut Canvas, inst: &InstanceTransform, view: &SceneView, size: f32) {
    let t = &inst.transform;
    if !t.is_finite() || t.scale <= 0.0 {
        return;
    }
    if let Some(p) = view.project(t.position) {
        canvas.splat(p.x, p.y, size * t.scale * p.px_per_unit, p.depth, argb(inst.color));
    }
}

/// Stats panel in the top-left corner.
pub fn draw_hud(canvas: &mut Canvas, hud: &Hud) {
    let lines   = hud.lines();
    let label_w = label_width("PARTICLES  ", FONT);
    let value_w = lines.iter().map(|(_, v)| label_width(v, FONT)).max().unwrap_or(0);
    let panel_w = 2 * MARGIN + label_w + value_w;
    let panel_h = 2 * MARGIN + lines.len() * LINE_H;
    canvas.shade_rect(MARGIN, MARGIN, panel_w, panel_h, PANEL_BG, 0.55);

    let tint = if hud.mode.is_formed() { FORMED_TINT } else { CHAOS_TINT };
    for (i, (label, value)) in lines.iter().enumerate() {
        let y = 2 * MARGIN + i * LINE_H;
        canvas.draw_label(label, 2 * MARGIN, y, FONT, TEXT_DIM);
        let color = if i == 0 { tint } else { TEXT };
        canvas.draw_label(value, 2 * MARGIN + label_w, y, FONT, color);
    }

    let legend = "SPACE=MODE  G=GESTURES  1=OPEN 2=PINCH 3=FIST 0=NO HAND  ARROWS=MOVE  Q=QUIT";
    let y = canvas.height().saturating_sub(MARGIN + 5 * FONT);
    canvas.draw_label(legend, MARGIN, y, FONT, blend(TEXT_DIM, PANEL_BG, 0.2));
}

/// Hand skeleton in a bottom-right inset, mirrored like a selfie preview.
pub fn draw_skeleton(canvas: &mut Canvas, hand: &HandFrame) {
    let x0 = canvas.width().saturating_sub(INSET_W + MARGIN);
    let y0 = canvas.height().saturating_sub(INSET_H + 3 * MARGIN + 5 * FONT);
    canvas.shade_rect(x0, y0, INSET_W, INSET_H, PANEL_BG, 0.5);
    canvas.draw_border(x0, y0, INSET_W, INSET_H, TEXT_DIM);

    let to_px = |p: Vec2| -> (isize, isize) {
        (
            (x0 as f32 + (1.0 - p.x) * INSET_W as f32) as isize,
            (y0 as f32 + p.y * INSET_H as f32) as isize,
        )
    };
    let pts = hand.points();
    for &(a, b) in HAND_CONNECTIONS.iter() {
        let (ax, ay) = to_px(pts[a]);
        let (bx, by) = to_px(pts[b]);
        canvas.draw_line(ax, ay, bx, by, BONE);
    }
    for (i, &p) in pts.iter().enumerate() {
        let (x, y) = to_px(p);
        if ALL_TIPS.contains(&i) {
            canvas.fill_circle(x, y, 3, TIP);
        } else {
            canvas.fill_circle(x, y, 2, BONE);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    canvas: Canvas,
}

impl Visualizer {
    pub fn new(cfg: &WindowConfig) -> AppResult<Self> {
        let mut window = Window::new(
            "Tree Morph: chaos / formed",
            cfg.width, cfg.height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| AppError::Window(e.to_string()))?;

        window.limit_update_rate(Some(frame_interval(cfg.fps)));

        Ok(Visualizer {
            window,
            canvas: Canvas::new(cfg.width, cfg.height),
        })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool { self.window.is_open() }

    pub fn canvas_mut(&mut self) -> &mut Canvas { &mut self.canvas }

    /// Translate this frame's key presses into commands.
    pub fn poll_input(&mut self) -> Vec<Command> {
        let mut out = Vec::new();
        if !self.window.is_open() {
            out.push(Command::Quit);
            return out;
        }

        // Keys that trigger on first press only
        let one_shot = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);
        // Keys that repeat while held
        let held     = |k: Key| self.window.is_key_pressed(k, KeyRepeat::Yes);

        if one_shot(Key::Q) || one_shot(Key::Escape) {
            out.push(Command::Quit);
            return out;
        }
        if one_shot(Key::Space) { out.push(Command::ToggleMode); }
        if one_shot(Key::G)     { out.push(Command::ToggleGesture); }
        if one_shot(Key::Key1)  { out.push(Command::ShowHand(hand_gesture::GestureLabel::Open)); }
        if one_shot(Key::Key2)  { out.push(Command::ShowHand(hand_gesture::GestureLabel::Pinch)); }
        if one_shot(Key::Key3)  { out.push(Command::ShowHand(hand_gesture::GestureLabel::Fist)); }
        if one_shot(Key::Key0)  { out.push(Command::HideHand); }

        for (key, dir) in [
            (Key::Left,  Vec2::new(-NUDGE, 0.0)),
            (Key::Right, Vec2::new(NUDGE, 0.0)),
            (Key::Up,    Vec2::new(0.0, -NUDGE)),
            (Key::Down,  Vec2::new(0.0, NUDGE)),
        ] {
            // Mirrored preview: moving right on screen is moving left in the image.
            if held(key) { out.push(Command::MoveHand(Vec2::new(-dir.x, dir.y))); }
        }
        out
    }

    /// Push the canvas to the window.
    pub fn present(&mut self) -> AppResult<()> {
        let (w, h) = (self.canvas.width(), self.canvas.height());
        self.window
            .update_with_buffer(self.canvas.pixels(), w, h)
            .map_err(|e| AppError::Window(e.to_string()))
    }
}
