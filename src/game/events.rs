//! Board Events
//!
//! Structured events emitted as the board mutates. The core never
//! formats these for display; hosts subscribe and render them however
//! they like (log lines, spectator feeds, replays).

use serde::{Serialize, Deserialize};

use crate::core::coord::Coord;
use crate::core::token::{Picture, PlayerId};

/// A state change on the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoardEvent {
    /// A face-down card was turned face-up and taken by a player.
    Flipped {
        /// Acting player.
        player_id: PlayerId,
        /// Cell that was turned.
        coord: Coord,
        /// Revealed picture.
        picture: Picture,
    },

    /// A player took control of a card that was already face-up.
    Claimed {
        /// Acting player.
        player_id: PlayerId,
        /// Cell taken.
        coord: Coord,
    },

    /// A second flip completed a matching pair.
    Matched {
        /// Acting player.
        player_id: PlayerId,
        /// First card of the pair.
        first: Coord,
        /// Second card of the pair.
        second: Coord,
        /// The shared picture.
        picture: Picture,
    },

    /// A second flip revealed two different pictures.
    Mismatched {
        /// Acting player.
        player_id: PlayerId,
        /// First card of the attempt.
        first: Coord,
        /// Second card of the attempt.
        second: Coord,
    },

    /// A matched card was removed from the board.
    Removed {
        /// Player whose pair was consumed.
        player_id: PlayerId,
        /// Cell that is now empty.
        coord: Coord,
    },

    /// A face-up card was turned back face-down.
    FlippedDown {
        /// Cell that was turned.
        coord: Coord,
    },

    /// A bulk transform finished rewriting card pictures.
    Transformed,
}
