//! Per-entity interpolation between the formed and chaos target buffers.
//!
//! Each tracked entity (the foliage cloud, every ornament group, the
//! garland) owns a [`Morph`]: the only mutable position state, plus the two
//! immutable targets it converges toward. On every simulation tick the
//! current buffer moves toward whichever target the scene [`Mode`] selects,
//! with a smoothing factor derived from the elapsed time so convergence
//! speed does not depend on the caller's frame rate.

use crate::buffer::PointBuffer;
use glam::Vec3;

/// The two global scene states the mode signal switches between.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Scattered: every entity drifts toward its uniform-sphere target.
    Chaos,
    /// Formed: every entity drifts toward its tree-structure target.
    #[default]
    Formed,
}

impl Mode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            Mode::Chaos => Mode::Formed,
            Mode::Formed => Mode::Chaos,
        }
    }
}

/// Mutable interpolation state for one entity.
///
/// The formed and chaos buffers are fixed at construction (particle counts
/// never change at runtime); `current` starts on the formed target and is
/// the single buffer the render layer reads.
#[derive(Clone, Debug)]
pub struct Morph {
    current: PointBuffer,
    formed: PointBuffer,
    chaos: PointBuffer,
    /// Catch-up rate per second. Higher converges faster; the effective
    /// per-frame factor is `1 - e^(-rate * dt)`, which never overshoots.
    rate: f32,
    dirty: bool,
}

impl Morph {
    /// Create a morph over two equal-length targets, starting formed.
    ///
    /// Panics if the targets disagree on point count; both buffers for one
    /// entity are always generated with the same `count`.
    pub fn new(formed: PointBuffer, chaos: PointBuffer, rate: f32) -> Self {
        assert_eq!(
            formed.len(),
            chaos.len(),
            "formed and chaos targets must hold the same point count"
        );
        Self {
            current: formed.clone(),
            formed,
            chaos,
            rate: rate.max(0.0),
            dirty: true,
        }
    }

    /// Number of points tracked.
    pub fn len(&self) -> usize {
        self.current.len()
    }

    /// True when no points are tracked.
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// The buffer being interpolated; what a consumer uploads.
    pub fn current(&self) -> &PointBuffer {
        &self.current
    }

    /// The target buffer the given mode selects.
    pub fn target(&self, mode: Mode) -> &PointBuffer {
        match mode {
            Mode::Chaos => &self.chaos,
            Mode::Formed => &self.formed,
        }
    }

    /// Move every coordinate of `current` toward the active target.
    ///
    /// The factor `1 - e^(-rate * dt)` makes the motion exponential
    /// smoothing: stepping `dt` once or `dt/10` ten times lands in the same
    /// place, so convergence is frame-rate independent. A zero, negative or
    /// non-finite `dt` moves nothing.
    pub fn update(&mut self, mode: Mode, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        let factor = 1.0 - (-self.rate * dt).exp();
        if factor <= 0.0 {
            return;
        }

        let target = match mode {
            Mode::Chaos => &self.chaos,
            Mode::Formed => &self.formed,
        };
        let cur = self.current.as_mut_slice();
        let tgt = target.as_slice();
        for (c, t) in cur.iter_mut().zip(tgt.iter()) {
            *c += (t - *c) * factor;
        }
        self.dirty = true;
    }

    /// Take the dirty flag, telling the render layer to re-upload.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    /// Greatest coordinate distance from the given mode's target.
    pub fn max_error(&self, mode: Mode) -> f32 {
        let target = self.target(mode);
        self.current
            .as_slice()
            .iter()
            .zip(target.as_slice())
            .map(|(c, t)| (c - t).abs())
            .fold(0.0, f32::max)
    }
}

/// Transient sway applied on top of the interpolated base positions.
///
/// Mirrors the wind term of the tree's point shader: each point drifts
/// sideways as a sine of elapsed time and its own height, stronger higher
/// up. The offset is written into a caller-owned scratch buffer and never
/// into the morph's current buffer, so interpolation stays numerically
/// stable no matter how long the scene has been swaying.
#[derive(Clone, Copy, Debug)]
pub struct Sway {
    pub amplitude: f32,
    pub frequency: f32,
}

impl Default for Sway {
    fn default() -> Self {
        Self {
            amplitude: 0.1,
            frequency: 1.0,
        }
    }
}

impl Sway {
    /// Write `base` plus the sway offset at `elapsed` seconds into `out`.
    ///
    /// Panics if `out` holds a different point count than `base`.
    pub fn write_swayed(&self, base: &PointBuffer, elapsed: f32, out: &mut PointBuffer) {
        assert_eq!(base.len(), out.len(), "scratch buffer point count mismatch");
        for i in 0..base.len() {
            out.set_point(i, self.offset_point(base.point(i), elapsed));
        }
    }

    /// Sway a single point; usable when the consumer iterates itself.
    #[inline]
    pub fn offset_point(&self, p: Vec3, elapsed: f32) -> Vec3 {
        let lift = (p.y + 10.0) * 0.05;
        let dx = (self.frequency * elapsed + p.y * 0.5).sin() * self.amplitude * lift;
        let dz = (self.frequency * 0.8 * elapsed + p.y * 0.5).cos() * self.amplitude * lift;
        Vec3::new(p.x + dx, p.y, p.z + dz)
    }
}
