//! # Conifer
//!
//! Renderer-agnostic core for an interactive particle tree scene.
//!
//! Conifer generates every point target the scene needs (foliage cone,
//! ornament rings, golden-angle photo spiral, garland helix, scatter
//! sphere), morphs live buffers between the scattered and formed states
//! at frame-rate-independent speed, and runs the photo interaction state
//! machine. The render layer only uploads buffers and draws; it never
//! computes positions itself.
//!
//! ## Quick Start
//!
//! ```ignore
//! use conifer::prelude::*;
//!
//! let mut scene = Scene::builder()
//!     .with_foliage(50_000)
//!     .with_ornament_group("baubles", 300, 0.5, RadiusBand::new(0.5, 0.8))
//!     .with_ornament_group("lights", 1_200, 1.5, RadiusBand::new(0.6, 1.05))
//!     .with_garland(1_000, 4.0)
//!     .with_photos(load_photos_or_empty("assets/photos.json"))
//!     .build();
//!
//! let mut clock = Clock::new();
//! loop {
//!     let (_elapsed, dt) = clock.tick();
//!     scene.update(dt);
//!     if scene.take_foliage_dirty() {
//!         upload(scene.foliage().unwrap().current().as_bytes());
//!     }
//!     // draw groups, garland, photos from scene accessors
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Two states, one mode
//!
//! Every tracked entity carries a formed target on the tree and a chaos
//! target inside a scatter sphere. A single [`Mode`] value in
//! [`SceneState`] decides which target all of them chase; entities never
//! hold a mode of their own, so nothing can be caught mid-disagreement.
//!
//! ### Frame-rate independence
//!
//! All catch-up motion uses an exponential smoothing factor computed from
//! the frame delta, so a machine rendering at 30 fps converges along the
//! same curve as one at 144 fps. See [`Morph`] and [`PhotoAnimator`].
//!
//! ### Photos under a spinning parent
//!
//! Photo transforms are parent-local (the tree group rotates), but a
//! zoomed photo must hold a fixed spot in front of the camera. The
//! animator computes world-space targets and converts through
//! [`ParentFrame`] every frame, so the rotation cancels out exactly.
//!
//! ### Gestures
//!
//! [`Classifier`] turns hand landmark frames into discrete
//! [`GestureEvent`]s published into an [`EventSlot`]; the scene drains the
//! slot once per update and routes events through the same store mutations
//! the UI events use.
//!
//! ## Module Map
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`buffer`] | Flat `f32` position storage, cast-ready for upload |
//! | [`shape`] | Tree silhouette parameters and derived laws |
//! | [`placement`] | All point-target generators |
//! | [`morph`] | Chaos/formed interpolation and sway decoration |
//! | [`state`] | The shared store and photo state machine |
//! | [`frame`] | Transforms, parent/camera frames, look rotation |
//! | [`photo`] | Photo records, loading, and the panel animator |
//! | [`gesture`] | Hand landmark classifier and the event slot |
//! | [`scene`] | Builder and the per-frame driver |
//! | [`time`] | Frame clock with delta capping |

pub mod buffer;
pub mod error;
pub mod frame;
pub mod gesture;
pub mod morph;
pub mod photo;
pub mod placement;
pub mod scene;
pub mod shape;
pub mod state;
pub mod time;

pub use buffer::PointBuffer;
pub use bytemuck;
pub use error::PhotoError;
pub use frame::{look_rotation, CameraFrame, ParentFrame, Transform, DEFAULT_FOV_Y};
pub use gesture::{Classifier, EventSlot, GestureConfig, GestureEvent, GestureKind, HandSample};
pub use glam::{Quat, Vec2, Vec3, Vec4};
pub use morph::{Mode, Morph, Sway};
pub use photo::{load_photos, load_photos_or_empty, PhotoAnimator, PhotoData, PhotoEnv, PhotoItem};
pub use scene::{OrnamentGroup, Scene, SceneBuilder, SceneEvent};
pub use shape::{RadiusBand, TreeShape};
pub use state::{PhotoStatus, SceneState};
pub use time::Clock;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use conifer::prelude::*;
/// ```
pub mod prelude {
    pub use crate::buffer::PointBuffer;
    pub use crate::frame::{CameraFrame, ParentFrame, Transform};
    pub use crate::gesture::{Classifier, EventSlot, GestureConfig, GestureKind, HandSample};
    pub use crate::morph::{Mode, Morph, Sway};
    pub use crate::photo::{load_photos, load_photos_or_empty, PhotoData};
    pub use crate::scene::{Scene, SceneEvent};
    pub use crate::shape::{RadiusBand, TreeShape};
    pub use crate::state::{PhotoStatus, SceneState};
    pub use crate::time::Clock;
    pub use crate::{Quat, Vec2, Vec3, Vec4};
}
