//! Board Cells
//!
//! One cell = one record of three orthogonal attributes: card identity
//! (present or removed), face orientation, and controlling player.

use serde::{Serialize, Deserialize};

use crate::core::token::{Picture, PlayerId};

/// A single board cell.
///
/// Invariants (enforced by `check`):
/// - empty implies face-down and uncontrolled
/// - controlled implies face-up and non-empty
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Cell {
    /// Card picture; None once the card has been removed (or never dealt).
    picture: Option<Picture>,
    /// Face orientation.
    face_up: bool,
    /// Player currently controlling the card, if any.
    controller: Option<PlayerId>,
}

impl Cell {
    /// A face-down cell holding `picture`.
    pub fn with_picture(picture: Picture) -> Self {
        Self {
            picture: Some(picture),
            face_up: false,
            controller: None,
        }
    }

    /// A permanently empty cell.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Is there no card here?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.picture.is_none()
    }

    /// The card picture, if present.
    pub fn picture(&self) -> Option<&Picture> {
        self.picture.as_ref()
    }

    /// Face orientation.
    #[inline]
    pub fn is_face_up(&self) -> bool {
        self.face_up
    }

    /// The controlling player, if any.
    pub fn controller(&self) -> Option<&PlayerId> {
        self.controller.as_ref()
    }

    /// Is the card controlled by `player`?
    pub fn is_controlled_by(&self, player: &PlayerId) -> bool {
        self.controller.as_ref() == Some(player)
    }

    /// Turn the card face-up.
    pub(crate) fn turn_up(&mut self) {
        self.face_up = true;
    }

    /// Turn the card face-down. Caller must have released control first.
    pub(crate) fn turn_down(&mut self) {
        self.face_up = false;
    }

    /// Give control to `player`. The card must be face-up.
    pub(crate) fn claim(&mut self, player: PlayerId) {
        self.controller = Some(player);
    }

    /// Clear the controller, leaving the face orientation alone.
    pub(crate) fn release(&mut self) {
        self.controller = None;
    }

    /// Remove the card: empty, face-down, uncontrolled. Removal is final.
    pub(crate) fn remove(&mut self) {
        self.picture = None;
        self.face_up = false;
        self.controller = None;
    }

    /// Replace the picture in place. The cell must be non-empty.
    pub(crate) fn replace_picture(&mut self, picture: Picture) {
        debug_assert!(self.picture.is_some());
        self.picture = Some(picture);
    }

    /// Panic if the cell-local invariants are violated.
    pub(crate) fn check(&self) {
        if self.picture.is_none() {
            assert!(!self.face_up, "empty cell must be face-down");
            assert!(self.controller.is_none(), "empty cell must be uncontrolled");
        }
        if self.controller.is_some() {
            assert!(self.face_up, "controlled cell must be face-up");
        }
    }
}
