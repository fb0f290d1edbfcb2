//! Hand-gesture classification and event plumbing.
//!
//! An external landmark detector (camera-based, on its own callback cadence)
//! feeds [`HandSample`]s into a [`Classifier`], which turns them into the
//! small vocabulary of [`GestureKind`] events the scene understands. Events
//! travel through an [`EventSlot`]: a single-writer, last-write-wins cell
//! whose monotonic sequence numbers guarantee the consumer never processes
//! the same event twice, even when the detector skips frames.
//!
//! Classification is best-effort heuristics over fingertip geometry; only
//! the event vocabulary and its downstream handling are contractual.

use crate::morph::Mode;
use crate::state::{PhotoStatus, SceneState};
use glam::Vec3;

/// Landmark indices of the 21-point hand topology.
pub mod landmark {
    pub const WRIST: usize = 0;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_MCP: usize = 5;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_TIP: usize = 20;
    /// Total landmarks per hand.
    pub const COUNT: usize = 21;
}

/// The discrete gesture vocabulary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureKind {
    TreeChaos,
    TreeAggregate,
    PhotoZoom,
    PhotoUnzoom,
    PhotoFlip,
    PhotoNext,
    PhotoPrev,
}

/// A classified gesture, tagged with a monotonic sequence number.
///
/// The sequence number, not a timestamp, is what de-duplicates delivery:
/// two gestures classified in the same instant are still distinct events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GestureEvent {
    pub kind: GestureKind,
    pub seq: u64,
}

/// Single-writer, single-consumer event cell.
///
/// The classifier overwrites it (last write wins); the frame loop drains it
/// once per frame with [`EventSlot::take_new`], which hands out each event
/// at most once by comparing sequence numbers.
#[derive(Clone, Debug, Default)]
pub struct EventSlot {
    latest: Option<GestureEvent>,
}

impl EventSlot {
    /// Publish an event, replacing any unconsumed one.
    pub fn publish(&mut self, event: GestureEvent) {
        self.latest = Some(event);
    }

    /// Return the stored event if its sequence number is newer than
    /// `last_seen`, advancing `last_seen`. Re-delivery is a no-op.
    pub fn take_new(&self, last_seen: &mut u64) -> Option<GestureEvent> {
        match self.latest {
            Some(ev) if ev.seq > *last_seen => {
                *last_seen = ev.seq;
                Some(ev)
            }
            _ => None,
        }
    }
}

/// One detector frame for one hand: 21 landmark points.
///
/// Coordinates follow the detector's image convention: x and y in [0, 1]
/// with y growing downward, z toward the camera.
#[derive(Clone, Copy, Debug)]
pub struct HandSample {
    pub points: [Vec3; landmark::COUNT],
}

impl HandSample {
    /// Derive the pose measurements classification runs on.
    pub fn pose(&self, config: &GestureConfig) -> HandPose {
        let p = &self.points;
        let palm_center =
            (p[landmark::WRIST] + p[landmark::INDEX_MCP] + p[landmark::PINKY_MCP]) / 3.0;
        let pinch_dist = p[landmark::THUMB_TIP].distance(p[landmark::INDEX_TIP]);
        let palm_span = p[landmark::THUMB_TIP].distance(p[landmark::PINKY_TIP]);

        let tips = [
            landmark::INDEX_TIP,
            landmark::MIDDLE_TIP,
            landmark::RING_TIP,
            landmark::PINKY_TIP,
        ];
        let mean_tip_dist = tips
            .iter()
            .map(|&t| p[t].distance(p[landmark::MIDDLE_MCP]))
            .sum::<f32>()
            / tips.len() as f32;

        HandPose {
            palm_center,
            pinch_dist,
            palm_span,
            mean_tip_dist,
            is_open: palm_span > config.open_span,
            is_fist: mean_tip_dist < config.fist_tip_dist,
        }
    }
}

/// Derived per-hand measurements.
#[derive(Clone, Copy, Debug)]
pub struct HandPose {
    pub palm_center: Vec3,
    /// Thumb-tip to index-tip distance.
    pub pinch_dist: f32,
    /// Thumb-tip to pinky-tip distance.
    pub palm_span: f32,
    /// Mean fingertip-to-palm-center distance.
    pub mean_tip_dist: f32,
    pub is_open: bool,
    pub is_fist: bool,
}

/// Classification thresholds.
#[derive(Clone, Copy, Debug)]
pub struct GestureConfig {
    /// Pinch distance below which thumb and index count as touching.
    pub pinch_threshold: f32,
    /// Palm span above which the hand counts as open.
    pub open_span: f32,
    /// Mean fingertip distance below which the hand counts as a fist.
    pub fist_tip_dist: f32,
    /// Lateral fingertip travel that counts as a swipe.
    pub swipe_threshold: f32,
    /// Seconds between accepted swipes.
    pub swipe_cooldown: f32,
    /// Pinch-distance changes below this are treated as sensor jitter.
    pub pinch_deadband: f32,
    /// Pinch-distance change that triggers one zoom step.
    pub pinch_step: f32,
    /// Max index/middle tip separation for a two-finger swipe.
    pub two_finger_gap: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            pinch_threshold: 0.05,
            open_span: 0.1,
            fist_tip_dist: 0.08,
            swipe_threshold: 0.1,
            swipe_cooldown: 1.0,
            pinch_deadband: 0.002,
            pinch_step: 0.01,
            two_finger_gap: 0.05,
        }
    }
}

/// Stateful gesture classifier.
///
/// Tracks just enough history to rate-limit noisy inputs: the previous
/// pinch distance (so only meaningful changes emit zoom events), the swipe
/// origin, and a cooldown stamp debouncing successive swipes. Open-hand and
/// fist events are edge-triggered on the pose, the way key-press events are
/// distinguished from key-held state.
#[derive(Clone, Debug)]
pub struct Classifier {
    config: GestureConfig,
    seq: u64,
    was_open: bool,
    was_fist: bool,
    prev_pinch: Option<f32>,
    swipe_start_x: Option<f32>,
    last_swipe_at: f32,
}

impl Classifier {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            seq: 0,
            was_open: false,
            was_fist: false,
            prev_pinch: None,
            swipe_start_x: None,
            last_swipe_at: f32::NEG_INFINITY,
        }
    }

    fn emit(&mut self, out: &mut Vec<GestureEvent>, kind: GestureKind) {
        self.seq += 1;
        out.push(GestureEvent {
            kind,
            seq: self.seq,
        });
    }

    /// Classify one detector frame.
    ///
    /// `now` is the detector's clock in seconds (drives the swipe debounce);
    /// `photo_active` tells the classifier whether a photo is currently
    /// zoomed or flipped, since pinch and swipe gestures only mean anything
    /// then.
    pub fn process(
        &mut self,
        hands: &[HandSample],
        now: f32,
        photo_active: bool,
    ) -> Vec<GestureEvent> {
        let mut out = Vec::new();
        let Some(main) = hands.first() else {
            // Hand lost: restart swipe tracking, keep pose edges.
            self.swipe_start_x = None;
            self.prev_pinch = None;
            return out;
        };
        let pose = main.pose(&self.config);

        // Whole-tree state, edge-triggered.
        if pose.is_open && !self.was_open {
            self.emit(&mut out, GestureKind::TreeChaos);
        } else if pose.is_fist && !self.was_fist {
            self.emit(&mut out, GestureKind::TreeAggregate);
        }
        self.was_open = pose.is_open;
        self.was_fist = pose.is_fist;

        if photo_active {
            self.process_pinch(&pose, &mut out);
            self.process_swipe(main, now, &mut out);
        } else {
            self.swipe_start_x = None;
            self.prev_pinch = Some(pose.pinch_dist);
        }

        out
    }

    fn process_pinch(&mut self, pose: &HandPose, out: &mut Vec<GestureEvent>) {
        let c = self.config;
        if let Some(prev) = self.prev_pinch {
            let delta = pose.pinch_dist - prev;
            if delta.abs() > c.pinch_deadband {
                if delta > c.pinch_step && pose.pinch_dist > c.pinch_threshold * 2.0 {
                    self.emit(out, GestureKind::PhotoZoom);
                } else if delta < -c.pinch_step && pose.pinch_dist < c.pinch_threshold {
                    self.emit(out, GestureKind::PhotoUnzoom);
                }
            }
        }
        self.prev_pinch = Some(pose.pinch_dist);
    }

    fn process_swipe(&mut self, hand: &HandSample, now: f32, out: &mut Vec<GestureEvent>) {
        let c = self.config;
        let index_x = hand.points[landmark::INDEX_TIP].x;
        let middle = hand.points[landmark::MIDDLE_TIP];
        // Two-finger: middle tip tracks the index tip and points up
        // (image y grows downward).
        let two_finger = (index_x - middle.x).abs() < c.two_finger_gap
            && middle.y < hand.points[landmark::MIDDLE_MCP].y;

        let Some(start_x) = self.swipe_start_x else {
            self.swipe_start_x = Some(index_x);
            return;
        };

        if now - self.last_swipe_at <= c.swipe_cooldown {
            return;
        }
        let delta_x = index_x - start_x;
        if delta_x.abs() > c.swipe_threshold {
            if two_finger {
                if delta_x > 0.0 {
                    self.emit(out, GestureKind::PhotoPrev);
                } else {
                    self.emit(out, GestureKind::PhotoNext);
                }
            } else {
                self.emit(out, GestureKind::PhotoFlip);
            }
            self.last_swipe_at = now;
            self.swipe_start_x = None;
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

/// Apply one gesture event to the scene store.
///
/// This is the gesture half of the unified dispatch path; UI controls call
/// the same [`SceneState`] methods directly.
pub fn dispatch(event: GestureEvent, state: &mut SceneState) {
    match event.kind {
        GestureKind::TreeChaos => state.set_mode(Mode::Chaos),
        GestureKind::TreeAggregate => state.set_mode(Mode::Formed),
        GestureKind::PhotoZoom => {
            if state.selected_photo().is_none() {
                state.select_photo(0);
            } else {
                state.set_photo_status(PhotoStatus::Zoomed);
            }
        }
        GestureKind::PhotoUnzoom => state.deselect(),
        GestureKind::PhotoFlip => state.set_photo_status(PhotoStatus::Flipped),
        GestureKind::PhotoNext => state.next_photo(),
        GestureKind::PhotoPrev => state.prev_photo(),
    }
}
