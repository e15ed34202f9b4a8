//! Player Records
//!
//! Per-player turn state owned by the board. Players never reference
//! the board back; the board owns them by id.

use serde::{Serialize, Deserialize};

use crate::core::coord::Coord;
use crate::core::token::PlayerId;

/// Turn state for one registered player.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Player identifier.
    id: PlayerId,
    /// Optional display name supplied at registration.
    display_name: Option<String>,
    /// First card of the current turn, if one has been flipped.
    first_card: Option<Coord>,
    /// Second card of the current turn, if one has been flipped.
    second_card: Option<Coord>,
    /// Total successful flips, monotonically non-decreasing.
    flip_count: u64,
}

impl PlayerRecord {
    /// Fresh record with empty card slots and zero flips.
    pub fn new(id: PlayerId, display_name: Option<String>) -> Self {
        Self {
            id,
            display_name,
            first_card: None,
            second_card: None,
            flip_count: 0,
        }
    }

    /// Player identifier.
    pub fn id(&self) -> &PlayerId {
        &self.id
    }

    /// Display name, if one was given.
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// First card of the current turn.
    pub fn first_card(&self) -> Option<Coord> {
        self.first_card
    }

    /// Second card of the current turn.
    pub fn second_card(&self) -> Option<Coord> {
        self.second_card
    }

    /// Total successful flips so far.
    pub fn flip_count(&self) -> u64 {
        self.flip_count
    }

    /// Is the player's next flip a first flip?
    pub fn is_first_card_flip(&self) -> bool {
        self.first_card.is_none()
    }

    /// Record a successful first flip.
    pub(crate) fn record_first(&mut self, coord: Coord) {
        self.first_card = Some(coord);
        self.flip_count += 1;
    }

    /// Record a successful second flip.
    pub(crate) fn record_second(&mut self, coord: Coord) {
        self.second_card = Some(coord);
        self.flip_count += 1;
    }

    /// Forget both card slots (turn over, matched pair consumed, or
    /// failed second flip).
    pub(crate) fn clear_cards(&mut self) {
        self.first_card = None;
        self.second_card = None;
    }

    /// Panic if the record invariant is violated.
    pub(crate) fn check(&self) {
        if self.first_card.is_none() {
            assert!(
                self.second_card.is_none(),
                "player {} has a second card without a first",
                self.id
            );
        }
    }
}
