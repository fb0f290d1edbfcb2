//! Photo items and their per-frame animation.
//!
//! Each photo panel hangs on the tree while idle and locks to the camera
//! while zoomed. [`PhotoAnimator`] computes the target transform for both
//! regimes every frame and eases the current transform toward it, snapping
//! once a zoomed panel has arrived so it does not lag behind a moving
//! camera. The interaction state itself (which photo, what status) lives in
//! [`crate::state::SceneState`]; the animator only reads it.

use crate::error::PhotoError;
use crate::frame::{look_rotation, CameraFrame, ParentFrame, Transform};
use crate::morph::Mode;
use crate::state::PhotoStatus;
use glam::{Quat, Vec3};
use serde::Deserialize;
use std::f32::consts::PI;
use std::path::Path;

/// How far in front of the camera a zoomed photo sits.
pub const ZOOM_DISTANCE: f32 = 5.0;
/// Fraction of the viewport height a zoomed photo fills at zoom 1.
const SCREEN_FILL: f32 = 0.4;
/// Scale multiplier while the pointer hovers an idle photo.
const HOVER_SCALE: f32 = 1.4;
/// Positional distance under which a zoomed photo counts as arrived.
const POS_SNAP: f32 = 0.1;
/// Angular distance (radians) under which a zoomed photo counts as arrived.
const ROT_SNAP: f32 = 0.05;
/// Catch-up rates per second: zooming in is brisker than idle drifting.
const ZOOM_RATE: f32 = 6.0;
const IDLE_RATE: f32 = 4.0;
const SCALE_RATE: f32 = 10.0;

/// One record of the photo collection file.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct PhotoData {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

/// Load the photo collection from a JSON file.
pub fn load_photos(path: impl AsRef<Path>) -> Result<Vec<PhotoData>, PhotoError> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Load the photo collection, degrading to an empty set on any failure.
///
/// A missing or malformed collection must not take the scene down; the
/// problem is reported and the tree simply carries no photos.
pub fn load_photos_or_empty(path: impl AsRef<Path>) -> Vec<PhotoData> {
    match load_photos(&path) {
        Ok(photos) => photos,
        Err(e) => {
            eprintln!("Failed to load photos: {}", e);
            Vec::new()
        }
    }
}

/// One displayable photo: its record plus its two resting points, both in
/// the tree group's local space. Immutable for the session.
#[derive(Clone, Debug)]
pub struct PhotoItem {
    pub data: PhotoData,
    pub index: usize,
    /// Formed-state anchor, one point of the photo spiral.
    pub anchor: Vec3,
    /// This item's own scattered-state point.
    pub chaos: Vec3,
}

/// Everything a photo animator reads during one frame.
#[derive(Clone, Copy, Debug)]
pub struct PhotoEnv<'a> {
    pub mode: Mode,
    pub camera: &'a CameraFrame,
    pub parent: &'a ParentFrame,
    /// User zoom multiplier from the scene state.
    pub zoom: f32,
    /// Wall-clock seconds since the scene started, drives the idle sway.
    pub elapsed: f32,
}

/// Mutable animation state for one photo item.
#[derive(Clone, Debug)]
pub struct PhotoAnimator {
    index: usize,
    base_scale: f32,
    anchor: Vec3,
    chaos: Vec3,
    current: Transform,
    hovered: bool,
}

impl PhotoAnimator {
    /// Create an animator resting on its formed anchor.
    pub fn new(item: &PhotoItem, base_scale: f32) -> Self {
        Self {
            index: item.index,
            base_scale,
            anchor: item.anchor,
            chaos: item.chaos,
            current: Transform {
                position: item.anchor,
                rotation: Quat::IDENTITY,
                scale: base_scale,
            },
            hovered: false,
        }
    }

    /// The transform the render layer applies, in the parent's local space.
    pub fn current(&self) -> &Transform {
        &self.current
    }

    /// Pointer-hover state; only affects the idle scale.
    pub fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }

    /// Target transform while hanging on the tree.
    fn idle_target(&self, env: &PhotoEnv<'_>) -> Transform {
        let base = match env.mode {
            Mode::Chaos => self.chaos,
            Mode::Formed => self.anchor,
        };

        // Face away from the trunk axis at the anchor's height, with a small
        // desynchronized roll so the panels do not wave in lockstep.
        let trunk = Vec3::new(0.0, base.y, 0.0);
        let roll = (env.elapsed + self.index as f32).sin() * 0.1;
        let rotation = look_rotation(base, trunk, Vec3::Y)
            * Quat::from_rotation_y(PI)
            * Quat::from_rotation_z(roll);

        let hover = if self.hovered { HOVER_SCALE } else { 1.0 };
        Transform {
            position: base,
            rotation,
            scale: self.base_scale * hover,
        }
    }

    /// Target transform while locked to the camera.
    ///
    /// Both the position ahead of the camera and the billboard rotation are
    /// world-space quantities; they are converted into the parent's local
    /// space because the parent group may be spinning under the photo.
    fn zoomed_target(&self, status: PhotoStatus, env: &PhotoEnv<'_>) -> Transform {
        let world_pos = env.camera.point_ahead(ZOOM_DISTANCE);
        let position = env.parent.world_to_local_point(world_pos);

        let mut world_rot = look_rotation(world_pos, env.camera.position, Vec3::Y);
        if status == PhotoStatus::Flipped {
            world_rot *= Quat::from_rotation_y(PI);
        }
        let rotation = env.parent.world_to_local_rotation(world_rot);

        let scale = env.camera.frustum_height_at(ZOOM_DISTANCE)
            * SCREEN_FILL
            * self.base_scale
            * env.zoom;

        Transform {
            position,
            rotation,
            scale,
        }
    }

    /// Advance the animation by `dt` seconds.
    pub fn update(&mut self, status: PhotoStatus, env: &PhotoEnv<'_>, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }

        let zoomed = status != PhotoStatus::Idle;
        let target = if zoomed {
            self.zoomed_target(status, env)
        } else {
            self.idle_target(env)
        };

        let arrived = self.current.distance_to(&target) < POS_SNAP
            && self.current.angle_to(&target) < ROT_SNAP;

        if zoomed && arrived {
            // Lock to the camera so its motion cannot outrun the lerp;
            // only the scale keeps easing.
            self.current.position = target.position;
            self.current.rotation = target.rotation;
            let s = 1.0 - (-SCALE_RATE * dt).exp();
            self.current.scale += (target.scale - self.current.scale) * s;
        } else {
            let rate = if zoomed { ZOOM_RATE } else { IDLE_RATE };
            let s = 1.0 - (-rate * dt).exp();
            self.current.lerp_to(&target, s);
        }
    }
}
