//! Orbit camera and scene placement.
//!
//! The field is authored in its own units (cone base at y = -8, apex at 8).
//! The viewer scales it by `scene_scale`, drops it by `y_offset`, slides it
//! after the palm while a hand is tracked, and looks at the origin from a
//! camera orbiting the y axis.

use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};
use ornament_field::TreeMode;

use crate::config::CameraConfig;

const NEAR: f32 = 0.1;
const FAR:  f32 = 400.0;

/// Scene shift per unit of palm offset from the frame centre (mirrored).
pub const PALM_SHIFT: Vec2 = Vec2::new(-10.0, -6.0);

/// Scene offset for a palm centre in normalized image coordinates.
pub fn palm_offset(palm: Vec2) -> Vec2 {
    (palm - Vec2::splat(0.5)) * PALM_SHIFT
}

/// A field point after projection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    pub x:     f32,
    pub y:     f32,
    /// View-space distance in front of the camera.
    pub depth: f32,
    /// Pixels per field unit at this depth.
    pub px_per_unit: f32,
}

#[derive(Clone, Debug)]
pub struct SceneView {
    cfg:         CameraConfig,
    width:       usize,
    height:      usize,
    yaw:         f32,
    hand_offset: Vec2,
    view_proj:   Mat4,
    focal_px:    f32,
}

impl SceneView {
    pub fn new(cfg: CameraConfig, width: usize, height: usize) -> Self {
        let mut view = SceneView {
            cfg,
            width,
            height,
            yaw:         0.0,
            hand_offset: Vec2::ZERO,
            view_proj:   Mat4::IDENTITY,
            focal_px:    1.0,
        };
        view.rebuild();
        view
    }

    /// Advance the orbit and follow the palm.
    ///
    /// The camera only drifts while the tree is formed and nobody is
    /// steering it by hand.  The palm offset applies only while tracking.
    pub fn update(&mut self, mode: TreeMode, palm: Option<Vec2>, dt: f32) {
        let tracking = palm.is_some();
        if mode.is_formed() && !tracking && dt.is_finite() && dt > 0.0 {
            self.yaw = (self.yaw + self.orbit_speed() * dt) % std::f32::consts::TAU;
        }
        self.hand_offset = palm.map(palm_offset).unwrap_or(Vec2::ZERO);
        self.rebuild();
    }

    /// Radians per second; `auto_rotate` is in turns per minute.
    pub fn orbit_speed(&self) -> f32 {
        self.cfg.auto_rotate * std::f32::consts::TAU / 60.0
    }

    pub fn yaw(&self) -> f32 { self.yaw }
    pub fn hand_offset(&self) -> Vec2 { self.hand_offset }

    /// Field coordinates to world coordinates.
    pub fn to_world(&self, p: Vec3) -> Vec3 {
        p * self.cfg.scene_scale
            + Vec3::new(self.hand_offset.x, self.cfg.y_offset + self.hand_offset.y, 0.0)
    }

    /// Project a field-space point to pixels.  `None` when it falls behind
    /// the near plane or is not finite.
    pub fn project(&self, p: Vec3) -> Option<Projected> {
        let clip = self.view_proj * self.to_world(p).extend(1.0);
        if !(clip.w > NEAR) || !clip.is_finite() {
            return None;
        }
        let ndc = clip.xyz() / clip.w;
        Some(Projected {
            x:           (ndc.x + 1.0) * 0.5 * self.width as f32,
            y:           (1.0 - ndc.y) * 0.5 * self.height as f32,
            depth:       clip.w,
            px_per_unit: self.focal_px * self.cfg.scene_scale / clip.w,
        })
    }

    fn eye(&self) -> Vec3 {
        let (s, c) = self.yaw.sin_cos();
        Vec3::new(self.cfg.distance * s, self.cfg.height, self.cfg.distance * c)
    }

    fn rebuild(&mut self) {
        let fov    = self.cfg.fov.to_radians();
        let aspect = self.width as f32 / self.height.max(1) as f32;
        let view   = Mat4::look_at_rh(self.eye(), Vec3::ZERO, Vec3::Y);
        let proj   = Mat4::perspective_rh(fov, aspect, NEAR, FAR);
        self.view_proj = proj * view;
        self.focal_px  = 0.5 * self.height as f32 / (0.5 * fov).tan();
    }
}
