//! Flip State Machine
//!
//! The rules of Memory Scramble. A flip is interpreted against three
//! orthogonal cell attributes (present/absent, up/down, controlled or
//! not), whether the acting player is on their first or second card,
//! and what their previous play left behind.
//!
//! First flips may park on a card controlled by another player and
//! retry once it is released. Second flips never park: blocking there
//! could deadlock two players each holding the card the other wants,
//! so a controlled target fails instead.

use tokio::sync::oneshot;
use tracing::{debug, instrument, trace};

use crate::core::coord::Coord;
use crate::core::token::PlayerId;
use crate::game::board::{Board, BoardError, BoardInner, Waiter};
use crate::game::events::BoardEvent;

/// Outcome of one locked pass through the machine.
enum FlipStep {
    /// The flip completed.
    Done,
    /// Parked behind a controlled card; await the signal and retry.
    Park(oneshot::Receiver<()>),
}

impl Board {
    /// Flip a card face-up for `player_id`.
    ///
    /// The only gameplay mutator. A first flip on a card controlled by
    /// another player suspends until the card is released, then
    /// re-runs from the precondition checks; the cell may be in any
    /// state by then. Any failure leaves the board consistent and the
    /// player's card slots cleared, so their next call is a fresh
    /// first flip.
    ///
    /// Dropping the returned future while parked abandons the attempt;
    /// the stale queue entry resolves harmlessly at the next release.
    #[instrument(skip(self), fields(player = %player_id))]
    pub async fn flip_up(
        &self,
        player_id: &PlayerId,
        row: usize,
        col: usize,
    ) -> Result<(), BoardError> {
        let coord = Coord::new(row, col);
        if !coord.in_bounds(self.num_rows(), self.num_cols()) {
            return Err(BoardError::OutOfBounds { row, col });
        }

        loop {
            let mut inner = self.inner.lock().await;
            if !inner.players.contains_key(player_id) {
                return Err(BoardError::UnknownPlayer(player_id.clone()));
            }

            // A recorded second card means the previous turn completed
            // a pair (matched or not); settle it before this flip.
            if inner
                .players
                .get(player_id)
                .is_some_and(|r| r.second_card().is_some())
            {
                inner.previous_play_cleanup(player_id);
            }

            let step = match inner.players.get(player_id).and_then(|r| r.first_card()) {
                None => {
                    // Idempotent when there is nothing left to settle.
                    inner.previous_play_cleanup(player_id);
                    inner.first_flip(player_id, coord)
                }
                Some(first) => inner.second_flip(player_id, first, coord),
            };

            // Cleanup may have changed the grid even when the flip
            // itself failed, so notifications go out on every path.
            let notifications = inner.take_notifications();
            drop(inner);
            self.dispatch(notifications);

            match step {
                Ok(FlipStep::Done) => return Ok(()),
                Ok(FlipStep::Park(parked)) => {
                    trace!(%coord, "parked behind controlled card");
                    // A closed channel still means "go look again".
                    let _ = parked.await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl BoardInner {
    /// A first flip: the player has no first card recorded.
    fn first_flip(
        &mut self,
        player_id: &PlayerId,
        coord: Coord,
    ) -> Result<FlipStep, BoardError> {
        if self.cell(coord).is_empty() {
            return Err(BoardError::EmptySpace {
                row: coord.row,
                col: coord.col,
            });
        }

        if !self.cell(coord).is_face_up() {
            // Reveal and take the card.
            let cell = self.cell_mut(coord);
            cell.turn_up();
            cell.claim(player_id.clone());
            let picture = cell.picture().cloned();
            self.record_first(player_id, coord);
            self.dirty = true;
            if let Some(picture) = picture {
                debug!(player = %player_id, %coord, %picture, "first flip revealed card");
                self.push_event(BoardEvent::Flipped {
                    player_id: player_id.clone(),
                    coord,
                    picture,
                });
            }
            return Ok(FlipStep::Done);
        }

        match self.cell(coord).controller().cloned() {
            Some(holder) if holder == *player_id => {
                // Rare: the player already holds this card (e.g. a kept
                // matched card whose partner an admin released).
                self.record_first(player_id, coord);
                Ok(FlipStep::Done)
            }
            Some(_) => {
                // Park FIFO behind the controller.
                let (wake, parked) = oneshot::channel();
                self.waiters.entry(coord).or_default().push_back(Waiter {
                    player_id: player_id.clone(),
                    wake,
                });
                Ok(FlipStep::Park(parked))
            }
            None => {
                // Take a loose face-up card. No face or picture
                // changed, so watchers are not notified.
                self.cell_mut(coord).claim(player_id.clone());
                self.record_first(player_id, coord);
                self.push_event(BoardEvent::Claimed {
                    player_id: player_id.clone(),
                    coord,
                });
                Ok(FlipStep::Done)
            }
        }
    }

    /// A second flip: `first` is recorded for this player.
    fn second_flip(
        &mut self,
        player_id: &PlayerId,
        first: Coord,
        coord: Coord,
    ) -> Result<FlipStep, BoardError> {
        if coord == first {
            self.abandon_first(player_id, first);
            return Err(BoardError::SameCardTwice {
                row: coord.row,
                col: coord.col,
            });
        }

        if self.cell(coord).is_empty() {
            self.abandon_first(player_id, first);
            return Err(BoardError::EmptySpace {
                row: coord.row,
                col: coord.col,
            });
        }

        if self.cell(coord).is_face_up() && self.cell(coord).controller().is_some() {
            // A controlled target never parks a second flip.
            self.abandon_first(player_id, first);
            return Err(BoardError::Controlled {
                row: coord.row,
                col: coord.col,
            });
        }

        if !self.cell(coord).is_face_up() {
            // Reveal, then fall through to the match check.
            self.cell_mut(coord).turn_up();
            if let Some(picture) = self.cell(coord).picture().cloned() {
                self.push_event(BoardEvent::Flipped {
                    player_id: player_id.clone(),
                    coord,
                    picture,
                });
            }
        }

        self.cell_mut(coord).claim(player_id.clone());
        self.record_second(player_id, coord);

        let first_picture = self.cell(first).picture().cloned();
        let second_picture = self.cell(coord).picture().cloned();
        if first_picture.is_some() && first_picture == second_picture {
            // Both cards stay face-up under the player's control
            // until their next first flip removes them.
            debug!(player = %player_id, %first, second = %coord, "matched pair");
            if let Some(picture) = second_picture {
                self.push_event(BoardEvent::Matched {
                    player_id: player_id.clone(),
                    first,
                    second: coord,
                    picture,
                });
            }
        } else {
            // Let both go. They stay face-up and loose until the
            // player's next first flip turns them down.
            debug!(player = %player_id, %first, second = %coord, "mismatched pair");
            for released in [first, coord] {
                if self.cell(released).is_controlled_by(player_id) {
                    self.release_control(released);
                }
            }
            self.push_event(BoardEvent::Mismatched {
                player_id: player_id.clone(),
                first,
                second: coord,
            });
        }

        self.dirty = true;
        Ok(FlipStep::Done)
    }

    /// Previous-play cleanup, run at the start of a first flip.
    ///
    /// Turns the player's lingering cards face-down, removes a kept
    /// matched pair, flips down an unmatched leftover, and resets the
    /// player's card slots. Idempotent when there is nothing to do.
    pub(crate) fn previous_play_cleanup(&mut self, player_id: &PlayerId) {
        if let Some(cells) = self.lingering.remove(player_id) {
            for coord in cells {
                self.flip_down_if_loose(coord);
            }
        }

        let (first, second) = match self.players.get(player_id) {
            Some(record) => (record.first_card(), record.second_card()),
            None => return,
        };

        match (first, second) {
            (Some(first), Some(second)) => {
                let a = self.cell(first).picture().cloned();
                let b = self.cell(second).picture().cloned();
                if a.is_some() && a == b {
                    // Matched pair: consume whichever cards the player
                    // still holds.
                    for coord in [first, second] {
                        if self.cell(coord).is_controlled_by(player_id) {
                            self.cell_mut(coord).remove();
                            self.dirty = true;
                            self.push_event(BoardEvent::Removed {
                                player_id: player_id.clone(),
                                coord,
                            });
                            self.wake_waiters(coord);
                        }
                    }
                } else {
                    for coord in [first, second] {
                        self.flip_down_if_loose(coord);
                    }
                }
            }
            (Some(first), None) => {
                // The second flip never landed.
                self.flip_down_if_loose(first);
            }
            _ => {}
        }

        if let Some(record) = self.players.get_mut(player_id) {
            record.clear_cards();
        }
    }

    /// Give up the first card after a failed second flip: release it
    /// if still held, queue it for flip-down at the player's next
    /// first flip, and reset the player's turn.
    fn abandon_first(&mut self, player_id: &PlayerId, first: Coord) {
        if self.cell(first).is_controlled_by(player_id) {
            self.release_control(first);
        }
        self.lingering
            .entry(player_id.clone())
            .or_default()
            .push(first);
        if let Some(record) = self.players.get_mut(player_id) {
            record.clear_cards();
        }
    }

    /// Flip a card face-down iff it is still present, face-up, and
    /// uncontrolled. Skips silently otherwise.
    fn flip_down_if_loose(&mut self, coord: Coord) {
        let cell = self.cell_mut(coord);
        if !cell.is_empty() && cell.is_face_up() && cell.controller().is_none() {
            cell.turn_down();
            self.dirty = true;
            self.push_event(BoardEvent::FlippedDown { coord });
        }
    }

    fn record_first(&mut self, player_id: &PlayerId, coord: Coord) {
        if let Some(record) = self.players.get_mut(player_id) {
            record.record_first(coord);
        }
    }

    fn record_second(&mut self, player_id: &PlayerId, coord: Coord) {
        if let Some(record) = self.players.get_mut(player_id) {
            record.record_second(coord);
        }
    }
}
