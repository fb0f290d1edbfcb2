//! Shared scene state: the mode signal and photo selection.
//!
//! One [`SceneState`] value is passed by reference to everything that needs
//! it (morph updates, photo animators, the gesture dispatcher); there is no
//! ambient global. All mutation goes through the methods here, which keep
//! the selection invariant: at most one photo is ever non-idle, because
//! there is exactly one `selected_photo` index and one status for it.

use crate::morph::Mode;
use glam::{Quat, Vec3};

/// Interaction state of the selected photo.
///
/// The full cycle is Idle -> Zoomed -> Flipped -> Zoomed; deselection or a
/// switch to chaos mode forces Idle from anywhere.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PhotoStatus {
    #[default]
    Idle,
    Zoomed,
    Flipped,
}

/// User-adjustable zoom multiplier limits for the zoomed photo.
pub const ZOOM_MIN: f32 = 0.1;
pub const ZOOM_MAX: f32 = 5.0;

/// The scene's single shared store.
#[derive(Clone, Debug)]
pub struct SceneState {
    mode: Mode,
    selected_photo: Option<usize>,
    photo_status: PhotoStatus,
    photo_count: usize,
    zoom: f32,
    /// Where the user has dragged the whole tree group.
    pub tree_position: Vec3,
    /// Spin applied to the whole tree group.
    pub tree_rotation: Quat,
}

impl SceneState {
    /// A formed, nothing-selected state over `photo_count` photos.
    pub fn new(photo_count: usize) -> Self {
        Self {
            mode: Mode::Formed,
            selected_photo: None,
            photo_status: PhotoStatus::Idle,
            photo_count,
            zoom: 1.0,
            tree_position: Vec3::ZERO,
            tree_rotation: Quat::IDENTITY,
        }
    }

    /// Current mode signal value.
    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Index of the selected photo, if any.
    #[inline]
    pub fn selected_photo(&self) -> Option<usize> {
        self.selected_photo
    }

    /// Status of the selected photo; [`PhotoStatus::Idle`] when none is.
    #[inline]
    pub fn photo_status(&self) -> PhotoStatus {
        self.photo_status
    }

    /// Status of one specific photo. Idle for everything but the selection.
    pub fn status_of(&self, index: usize) -> PhotoStatus {
        if self.selected_photo == Some(index) {
            self.photo_status
        } else {
            PhotoStatus::Idle
        }
    }

    /// Number of photos the store knows about.
    #[inline]
    pub fn photo_count(&self) -> usize {
        self.photo_count
    }

    /// User zoom multiplier for the zoomed photo.
    #[inline]
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Set the mode signal. Entering chaos tears down any photo selection.
    pub fn set_mode(&mut self, mode: Mode) {
        if mode == Mode::Chaos && self.mode != Mode::Chaos {
            self.deselect();
        }
        self.mode = mode;
    }

    /// Flip the mode signal.
    pub fn toggle_mode(&mut self) {
        self.set_mode(self.mode.toggled());
    }

    /// Select a photo, zooming it. Any previous selection is replaced, so
    /// two photos can never be non-idle at once. Out-of-range indices are
    /// ignored.
    pub fn select_photo(&mut self, index: usize) {
        if index >= self.photo_count {
            return;
        }
        self.selected_photo = Some(index);
        self.photo_status = PhotoStatus::Zoomed;
        self.zoom = 1.0;
    }

    /// A click/tap on a photo: selects it when idle, otherwise cycles
    /// Zoomed <-> Flipped.
    pub fn interact(&mut self, index: usize) {
        match self.status_of(index) {
            PhotoStatus::Idle => self.select_photo(index),
            PhotoStatus::Zoomed => self.photo_status = PhotoStatus::Flipped,
            PhotoStatus::Flipped => self.photo_status = PhotoStatus::Zoomed,
        }
    }

    /// Clear the selection (click outside / unzoom gesture).
    pub fn deselect(&mut self) {
        self.selected_photo = None;
        self.photo_status = PhotoStatus::Idle;
        self.zoom = 1.0;
    }

    /// Force the selected photo's status. No-op without a selection, except
    /// that forcing Idle doubles as a deselect.
    pub fn set_photo_status(&mut self, status: PhotoStatus) {
        if status == PhotoStatus::Idle {
            self.deselect();
        } else if self.selected_photo.is_some() {
            self.photo_status = status;
        }
    }

    /// Advance the selection, wrapping past the last photo. With nothing
    /// selected, selects photo 0.
    pub fn next_photo(&mut self) {
        if self.photo_count == 0 {
            return;
        }
        match self.selected_photo {
            None => self.select_photo(0),
            Some(i) => self.select_photo((i + 1) % self.photo_count),
        }
    }

    /// Step the selection back, wrapping before photo 0.
    pub fn prev_photo(&mut self) {
        if self.photo_count == 0 {
            return;
        }
        match self.selected_photo {
            None => self.select_photo(0),
            Some(i) => self.select_photo((i + self.photo_count - 1) % self.photo_count),
        }
    }

    /// Nudge the zoom multiplier (scroll/pinch delta), clamped to
    /// [`ZOOM_MIN`]..[`ZOOM_MAX`].
    pub fn zoom_by(&mut self, delta: f32) {
        if delta.is_finite() {
            self.zoom = (self.zoom + delta).clamp(ZOOM_MIN, ZOOM_MAX);
        }
    }

    /// Record the tree group's dragged position and spin; photo animators
    /// need them for world-to-local conversion.
    pub fn set_tree_transform(&mut self, position: Vec3, rotation: Quat) {
        self.tree_position = position;
        self.tree_rotation = rotation;
    }
}

impl Default for SceneState {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_zooms_and_sets_index() {
        let mut state = SceneState::new(5);
        state.select_photo(2);
        assert_eq!(state.selected_photo(), Some(2));
        assert_eq!(state.photo_status(), PhotoStatus::Zoomed);
        assert_eq!(state.status_of(2), PhotoStatus::Zoomed);
        assert_eq!(state.status_of(1), PhotoStatus::Idle);
    }

    #[test]
    fn test_interact_cycles_zoomed_and_flipped() {
        let mut state = SceneState::new(5);
        state.interact(2);
        assert_eq!(state.photo_status(), PhotoStatus::Zoomed);
        state.interact(2);
        assert_eq!(state.photo_status(), PhotoStatus::Flipped);
        state.interact(2);
        assert_eq!(state.photo_status(), PhotoStatus::Zoomed);
    }

    #[test]
    fn test_selection_is_exclusive() {
        let mut state = SceneState::new(5);
        state.select_photo(1);
        state.interact(1); // flip it
        state.select_photo(3);
        let non_idle: Vec<usize> = (0..5)
            .filter(|&i| state.status_of(i) != PhotoStatus::Idle)
            .collect();
        assert_eq!(non_idle, vec![3]);
    }

    #[test]
    fn test_chaos_mode_forces_idle() {
        let mut state = SceneState::new(5);
        state.select_photo(2);
        state.interact(2);
        state.set_mode(Mode::Chaos);
        assert_eq!(state.selected_photo(), None);
        assert_eq!(state.photo_status(), PhotoStatus::Idle);
        assert_eq!(state.mode(), Mode::Chaos);
    }

    #[test]
    fn test_deselect_clears_everything() {
        let mut state = SceneState::new(5);
        state.select_photo(4);
        state.zoom_by(2.0);
        state.deselect();
        assert_eq!(state.selected_photo(), None);
        assert_eq!(state.photo_status(), PhotoStatus::Idle);
        assert_eq!(state.zoom(), 1.0);
    }

    #[test]
    fn test_next_prev_wrap() {
        let mut state = SceneState::new(3);
        state.next_photo();
        assert_eq!(state.selected_photo(), Some(0));
        state.prev_photo();
        assert_eq!(state.selected_photo(), Some(2));
        state.next_photo();
        assert_eq!(state.selected_photo(), Some(0));
    }

    #[test]
    fn test_next_with_no_photos_is_noop() {
        let mut state = SceneState::new(0);
        state.next_photo();
        state.prev_photo();
        assert_eq!(state.selected_photo(), None);
    }

    #[test]
    fn test_zoom_clamps() {
        let mut state = SceneState::new(1);
        state.select_photo(0);
        state.zoom_by(100.0);
        assert_eq!(state.zoom(), ZOOM_MAX);
        state.zoom_by(-100.0);
        assert_eq!(state.zoom(), ZOOM_MIN);
        state.zoom_by(f32::NAN);
        assert_eq!(state.zoom(), ZOOM_MIN);
    }

    #[test]
    fn test_out_of_range_select_ignored() {
        let mut state = SceneState::new(2);
        state.select_photo(7);
        assert_eq!(state.selected_photo(), None);
    }

    #[test]
    fn test_toggle_mode_roundtrip() {
        let mut state = SceneState::new(0);
        assert_eq!(state.mode(), Mode::Formed);
        state.toggle_mode();
        assert_eq!(state.mode(), Mode::Chaos);
        state.toggle_mode();
        assert_eq!(state.mode(), Mode::Formed);
    }
}
