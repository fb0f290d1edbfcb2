//! Scene assembly and the per-frame driver.
//!
//! [`Scene`] owns everything the render layer animates: the foliage cloud,
//! any number of instanced ornament groups, an optional garland, and the
//! photo panels. Configure it with the builder, then call
//! [`Scene::update`] once per frame from the render loop:
//!
//! ```ignore
//! use conifer::prelude::*;
//!
//! let photos = load_photos_or_empty("assets/photos.json");
//! let mut scene = Scene::builder()
//!     .with_foliage(50_000)
//!     .with_ornament_group("primary", 300, 0.5, RadiusBand::new(0.5, 0.8))
//!     .with_ornament_group("lights", 1_200, 1.5, RadiusBand::new(0.6, 1.05))
//!     .with_garland(1_000, 4.0)
//!     .with_photos(photos)
//!     .build();
//!
//! // per frame:
//! scene.queue(SceneEvent::ToggleMode);
//! scene.update(dt);
//! ```
//!
//! Everything runs synchronously inside `update`: queued UI events and the
//! gesture slot are drained first, then every morph reads the one mode
//! value decided for this frame, then the photo animators run. Selection
//! changes therefore take effect on the frame that drains them, and no two
//! entities can observe different modes within a frame.

use crate::buffer::PointBuffer;
use crate::frame::{CameraFrame, ParentFrame, Transform};
use crate::gesture::{self, EventSlot};
use crate::morph::{Mode, Morph, Sway};
use crate::photo::{PhotoAnimator, PhotoData, PhotoEnv, PhotoItem};
use crate::placement;
use crate::shape::{RadiusBand, TreeShape};
use crate::state::{PhotoStatus, SceneState};
use glam::{Quat, Vec3};
use std::collections::VecDeque;

/// Base interpolation rate per second; each group scales it by its own
/// speed factor so heavy ornaments trail behind light ones.
const BASE_RATE: f32 = 2.0;

/// Radius of the scattered-state sphere for particles and ornaments.
const CHAOS_RADIUS: f32 = 15.0;
/// Photos scatter into a tighter sphere so they stay readable.
const PHOTO_CHAOS_RADIUS: f32 = 10.0;

/// Discrete input events from UI controls.
///
/// This is the UI half of the unified dispatch path; gestures arrive
/// through the [`EventSlot`] and end up mutating the same store. A consumer
/// maps "click on photo" to [`SceneEvent::InteractPhoto`] and "click
/// anywhere else" to [`SceneEvent::Deselect`], stopping propagation on the
/// former so one input event can never do both.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SceneEvent {
    ToggleMode,
    SetMode(Mode),
    /// Click/tap on a photo: select it, or cycle zoomed/flipped if it
    /// already is selected.
    InteractPhoto(usize),
    SelectPhoto(usize),
    Deselect,
    SetPhotoStatus(PhotoStatus),
    NextPhoto,
    PrevPhoto,
    /// Scroll/pinch zoom delta for the zoomed photo.
    ZoomBy(f32),
    HoverPhoto { index: usize, hovered: bool },
    SetCamera(CameraFrame),
    SetTreeTransform { position: Vec3, rotation: Quat },
}

/// One instanced ornament group: a named morph.
#[derive(Clone, Debug)]
pub struct OrnamentGroup {
    pub name: String,
    pub morph: Morph,
}

/// Builder for [`Scene`]; counts and shapes are fixed once built.
pub struct SceneBuilder {
    shape: TreeShape,
    chaos_radius: f32,
    foliage_count: usize,
    foliage_rate: f32,
    groups: Vec<(String, usize, f32, RadiusBand)>,
    garland: Option<(usize, f32)>,
    photos: Vec<PhotoData>,
    photo_scale: f32,
    sway: Sway,
}

impl SceneBuilder {
    fn new() -> Self {
        Self {
            shape: TreeShape::default(),
            chaos_radius: CHAOS_RADIUS,
            foliage_count: 0,
            foliage_rate: BASE_RATE,
            groups: Vec::new(),
            garland: None,
            photos: Vec::new(),
            photo_scale: 1.0,
            sway: Sway::default(),
        }
    }

    /// Tree silhouette shared by every formed-state generator.
    pub fn with_shape(mut self, shape: TreeShape) -> Self {
        self.shape = shape;
        self
    }

    /// Radius of the scattered-state sphere.
    pub fn with_chaos_radius(mut self, radius: f32) -> Self {
        self.chaos_radius = radius;
        self
    }

    /// Main foliage particle cloud.
    pub fn with_foliage(mut self, count: usize) -> Self {
        self.foliage_count = count;
        self
    }

    /// Add an instanced ornament group. `speed_factor` scales the catch-up
    /// rate (lights snap fast, gifts drift slowly); `band` places the
    /// anchors relative to each layer's edge.
    pub fn with_ornament_group(
        mut self,
        name: impl Into<String>,
        count: usize,
        speed_factor: f32,
        band: RadiusBand,
    ) -> Self {
        self.groups.push((name.into(), count, speed_factor, band));
        self
    }

    /// Garland strand wrapping the tree `turns` times.
    pub fn with_garland(mut self, count: usize, turns: f32) -> Self {
        self.garland = Some((count, turns));
        self
    }

    /// The photo collection; anchors are assigned at build time.
    pub fn with_photos(mut self, photos: Vec<PhotoData>) -> Self {
        self.photos = photos;
        self
    }

    /// Base scale applied to every photo panel.
    pub fn with_photo_scale(mut self, scale: f32) -> Self {
        self.photo_scale = scale;
        self
    }

    /// Sway decoration applied to the foliage at consume time.
    pub fn with_sway(mut self, sway: Sway) -> Self {
        self.sway = sway;
        self
    }

    /// Generate all target buffers and assemble the scene.
    pub fn build(self) -> Scene {
        let shape = self.shape.sanitized();

        let foliage = if self.foliage_count > 0 {
            Some(Morph::new(
                placement::layered_cone(self.foliage_count, &shape),
                placement::uniform_sphere(self.foliage_count, self.chaos_radius),
                self.foliage_rate,
            ))
        } else {
            None
        };
        let foliage_scratch = PointBuffer::with_len(self.foliage_count);

        let groups = self
            .groups
            .into_iter()
            .map(|(name, count, speed, band)| OrnamentGroup {
                name,
                morph: Morph::new(
                    placement::ornament_rings(count, &shape, band),
                    placement::uniform_sphere(count, self.chaos_radius),
                    BASE_RATE * speed.max(0.0),
                ),
            })
            .collect();

        let garland = self.garland.map(|(count, turns)| {
            Morph::new(
                placement::garland_helix(count, &shape, turns),
                placement::uniform_sphere(count, self.chaos_radius),
                BASE_RATE,
            )
        });

        // Photos anchor on the golden-angle spiral so they can never bunch
        // up, each carrying its own scattered point.
        let anchors = placement::cone_spiral(self.photos.len(), &shape);
        let scatter = placement::uniform_sphere(self.photos.len(), PHOTO_CHAOS_RADIUS);
        let items: Vec<PhotoItem> = self
            .photos
            .into_iter()
            .enumerate()
            .map(|(index, data)| PhotoItem {
                data,
                index,
                anchor: anchors.point(index),
                chaos: scatter.point(index),
            })
            .collect();
        let animators = items
            .iter()
            .map(|item| PhotoAnimator::new(item, self.photo_scale))
            .collect();

        let state = SceneState::new(items.len());

        Scene {
            shape,
            state,
            foliage,
            foliage_scratch,
            sway: self.sway,
            groups,
            garland,
            items,
            animators,
            camera: CameraFrame::default(),
            events: VecDeque::new(),
            gesture_slot: EventSlot::default(),
            last_gesture_seq: 0,
            elapsed: 0.0,
        }
    }
}

/// The assembled scene: every tracked entity plus the shared store.
pub struct Scene {
    shape: TreeShape,
    state: SceneState,
    foliage: Option<Morph>,
    foliage_scratch: PointBuffer,
    sway: Sway,
    groups: Vec<OrnamentGroup>,
    garland: Option<Morph>,
    items: Vec<PhotoItem>,
    animators: Vec<PhotoAnimator>,
    camera: CameraFrame,
    events: VecDeque<SceneEvent>,
    gesture_slot: EventSlot,
    last_gesture_seq: u64,
    elapsed: f32,
}

impl Scene {
    /// Start configuring a scene.
    pub fn builder() -> SceneBuilder {
        SceneBuilder::new()
    }

    /// The shared store. Read-only; mutate through events or
    /// [`Scene::queue`].
    pub fn state(&self) -> &SceneState {
        &self.state
    }

    /// The silhouette the formed targets were generated from.
    pub fn shape(&self) -> &TreeShape {
        &self.shape
    }

    /// Queue a UI event for the next update.
    pub fn queue(&mut self, event: SceneEvent) {
        self.events.push_back(event);
    }

    /// The cell the gesture classifier publishes into.
    pub fn gesture_slot_mut(&mut self) -> &mut EventSlot {
        &mut self.gesture_slot
    }

    /// Advance the whole scene by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.elapsed += dt;

        // Drain inputs first so this frame sees their effect.
        while let Some(event) = self.events.pop_front() {
            self.apply(event);
        }
        if let Some(ev) = self.gesture_slot.take_new(&mut self.last_gesture_seq) {
            gesture::dispatch(ev, &mut self.state);
        }

        // One mode read for every entity this frame.
        let mode = self.state.mode();
        if let Some(foliage) = &mut self.foliage {
            foliage.update(mode, dt);
        }
        for group in &mut self.groups {
            group.morph.update(mode, dt);
        }
        if let Some(garland) = &mut self.garland {
            garland.update(mode, dt);
        }

        let parent = ParentFrame {
            position: self.state.tree_position,
            rotation: self.state.tree_rotation,
        };
        for (index, animator) in self.animators.iter_mut().enumerate() {
            let env = PhotoEnv {
                mode,
                camera: &self.camera,
                parent: &parent,
                zoom: self.state.zoom(),
                elapsed: self.elapsed,
            };
            animator.update(self.state.status_of(index), &env, dt);
        }
    }

    fn apply(&mut self, event: SceneEvent) {
        match event {
            SceneEvent::ToggleMode => self.state.toggle_mode(),
            SceneEvent::SetMode(mode) => self.state.set_mode(mode),
            SceneEvent::InteractPhoto(i) => self.state.interact(i),
            SceneEvent::SelectPhoto(i) => self.state.select_photo(i),
            SceneEvent::Deselect => self.state.deselect(),
            SceneEvent::SetPhotoStatus(status) => self.state.set_photo_status(status),
            SceneEvent::NextPhoto => self.state.next_photo(),
            SceneEvent::PrevPhoto => self.state.prev_photo(),
            SceneEvent::ZoomBy(delta) => self.state.zoom_by(delta),
            SceneEvent::HoverPhoto { index, hovered } => {
                if let Some(animator) = self.animators.get_mut(index) {
                    animator.set_hovered(hovered);
                }
            }
            SceneEvent::SetCamera(camera) => self.camera = camera,
            SceneEvent::SetTreeTransform { position, rotation } => {
                self.state.set_tree_transform(position, rotation);
            }
        }
    }

    /// Foliage positions with the transient sway applied; the morph's own
    /// buffer stays untouched. `None` when the scene has no foliage.
    pub fn swayed_foliage(&mut self) -> Option<&PointBuffer> {
        let foliage = self.foliage.as_ref()?;
        self.sway
            .write_swayed(foliage.current(), self.elapsed, &mut self.foliage_scratch);
        Some(&self.foliage_scratch)
    }

    /// The foliage morph, if configured.
    pub fn foliage(&self) -> Option<&Morph> {
        self.foliage.as_ref()
    }

    /// Take the foliage dirty flag for the upload boundary.
    pub fn take_foliage_dirty(&mut self) -> bool {
        self.foliage.as_mut().map_or(false, Morph::take_dirty)
    }

    /// The instanced ornament groups in configuration order.
    pub fn groups(&self) -> &[OrnamentGroup] {
        &self.groups
    }

    /// Mutable group access, for draining per-group dirty flags.
    pub fn groups_mut(&mut self) -> &mut [OrnamentGroup] {
        &mut self.groups
    }

    /// The garland morph, if configured.
    pub fn garland(&self) -> Option<&Morph> {
        self.garland.as_ref()
    }

    /// The immutable photo records.
    pub fn photos(&self) -> &[PhotoItem] {
        &self.items
    }

    /// A photo's display transform (parent-local) and current status.
    pub fn photo_display(&self, index: usize) -> Option<(&Transform, PhotoStatus)> {
        let animator = self.animators.get(index)?;
        Some((animator.current(), self.state.status_of(index)))
    }

    /// Seconds of scene time accumulated so far.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}
