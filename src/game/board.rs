//! The Shared Board
//!
//! A Memory Scramble board played on concurrently by any number of
//! players. One `tokio::sync::Mutex` guards all grid, player, waiter,
//! lingering, and watcher state; the only suspension points are a flip
//! parked on a controlled card and `map` awaiting its per-card
//! transform, and both run with the lock released.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;
use std::future::Future;
use std::path::Path;

use tokio::sync::{broadcast, oneshot, Mutex};
use tracing::{debug, instrument};

use crate::core::coord::Coord;
use crate::core::token::{Picture, PlayerId};
use crate::game::cell::Cell;
use crate::game::events::BoardEvent;
use crate::game::player::PlayerRecord;
use crate::game::render::render_for;
use crate::io::board_file::{self, ParseError};

/// Board errors surfaced to players and hosts.
///
/// All are non-fatal: the board stays consistent, and a failed flip
/// leaves the acting player ready for a fresh first flip.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// Coordinate outside the grid.
    #[error("cell ({row},{col}) is out of bounds")]
    OutOfBounds {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },

    /// The player has not been registered.
    #[error("unknown player: {0}")]
    UnknownPlayer(PlayerId),

    /// A player id token failed validation.
    #[error("invalid player id: {0:?}")]
    InvalidPlayerId(String),

    /// The target cell holds no card.
    #[error("no card at ({row},{col})")]
    EmptySpace {
        /// Target row.
        row: usize,
        /// Target column.
        col: usize,
    },

    /// A second flip targeted a card under someone's control.
    #[error("card at ({row},{col}) is controlled")]
    Controlled {
        /// Target row.
        row: usize,
        /// Target column.
        col: usize,
    },

    /// A second flip targeted the player's own first card.
    #[error("card at ({row},{col}) is already the player's first card")]
    SameCardTwice {
        /// Target row.
        row: usize,
        /// Target column.
        col: usize,
    },

    /// An administrative flip-down targeted a face-down card.
    #[error("card at ({row},{col}) is not face-up")]
    NotFaceUp {
        /// Target row.
        row: usize,
        /// Target column.
        col: usize,
    },

    /// A bulk transform produced an invalid picture token.
    #[error("invalid card token: {0:?}")]
    InvalidCard(String),
}

/// How many parked flips to wake when a card is released.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WakePolicy {
    /// Wake every waiter on the cell; losers re-park or see new state.
    #[default]
    All,
    /// Wake only the front of the queue.
    One,
}

/// Board construction options.
#[derive(Clone, Debug)]
pub struct BoardConfig {
    /// Wake policy for released cards.
    pub wake_policy: WakePolicy,
    /// Capacity of the structured-event broadcast channel.
    pub event_capacity: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            wake_policy: WakePolicy::All,
            event_capacity: 256,
        }
    }
}

/// A flip attempt parked on a controlled cell.
pub(crate) struct Waiter {
    /// Who is waiting.
    pub(crate) player_id: PlayerId,
    /// Fires once when the cell's controller lets go.
    pub(crate) wake: oneshot::Sender<()>,
}

/// Everything behind the board's lock.
pub(crate) struct BoardInner {
    pub(crate) rows: usize,
    pub(crate) cols: usize,
    /// Row-major cell records.
    pub(crate) cells: Vec<Cell>,
    /// Registered players (BTreeMap for deterministic iteration).
    pub(crate) players: BTreeMap<PlayerId, PlayerRecord>,
    /// Registration order, for `list_players`.
    pub(crate) join_order: Vec<PlayerId>,
    /// FIFO parked flips per cell. Keys exist only while non-empty.
    pub(crate) waiters: BTreeMap<Coord, VecDeque<Waiter>>,
    /// Cells to flip down at each player's next first flip.
    pub(crate) lingering: BTreeMap<PlayerId, Vec<Coord>>,
    /// One-shot render sinks, flushed on the next visible mutation.
    pub(crate) watchers: BTreeMap<PlayerId, Vec<oneshot::Sender<String>>>,
    pub(crate) wake_policy: WakePolicy,
    /// Set when face-up state or card presence changed.
    pub(crate) dirty: bool,
    /// Events accumulated during the current locked section.
    pub(crate) pending_events: Vec<BoardEvent>,
}

impl BoardInner {
    pub(crate) fn cell(&self, coord: Coord) -> &Cell {
        &self.cells[coord.index(self.cols)]
    }

    pub(crate) fn cell_mut(&mut self, coord: Coord) -> &mut Cell {
        let idx = coord.index(self.cols);
        &mut self.cells[idx]
    }

    pub(crate) fn push_event(&mut self, event: BoardEvent) {
        self.pending_events.push(event);
    }

    /// Clear the cell's controller and wake parked flips.
    pub(crate) fn release_control(&mut self, coord: Coord) {
        self.cell_mut(coord).release();
        self.wake_waiters(coord);
    }

    /// Wake parked flips on `coord` per the configured policy.
    pub(crate) fn wake_waiters(&mut self, coord: Coord) {
        let Some(mut queue) = self.waiters.remove(&coord) else {
            return;
        };
        match self.wake_policy {
            WakePolicy::All => {
                for waiter in queue {
                    // A dropped receiver means the flip was abandoned.
                    let _ = waiter.wake.send(());
                }
            }
            WakePolicy::One => {
                if let Some(waiter) = queue.pop_front() {
                    let _ = waiter.wake.send(());
                }
                if !queue.is_empty() {
                    self.waiters.insert(coord, queue);
                }
            }
        }
    }

    /// Panic if the representation invariant is violated.
    ///
    /// Violations are programmer errors, not player errors; every
    /// mutation path runs this before publishing its effects.
    pub(crate) fn check_rep(&self) {
        assert_eq!(self.cells.len(), self.rows * self.cols);
        for cell in &self.cells {
            cell.check();
            if let Some(controller) = cell.controller() {
                assert!(
                    self.players.contains_key(controller),
                    "controller {controller} is not a registered player"
                );
            }
        }
        for record in self.players.values() {
            record.check();
        }
        for (coord, queue) in &self.waiters {
            assert!(coord.in_bounds(self.rows, self.cols));
            assert!(!queue.is_empty(), "empty waiter queue left at {coord}");
            let distinct: BTreeSet<&PlayerId> =
                queue.iter().map(|w| &w.player_id).collect();
            assert_eq!(
                distinct.len(),
                queue.len(),
                "duplicate waiter on {coord}"
            );
        }
    }

    /// End a locked mutation section: check the rep, then collect the
    /// watcher deliveries and pending events to dispatch after the
    /// lock drops.
    pub(crate) fn take_notifications(&mut self) -> Notifications {
        self.check_rep();
        let events = std::mem::take(&mut self.pending_events);
        let mut renders = Vec::new();
        if self.dirty {
            self.dirty = false;
            // Swap the whole map out; watchers fire at most once.
            let watchers = std::mem::take(&mut self.watchers);
            for (player_id, sinks) in watchers {
                // All renders for one notification come from this same
                // post-mutation snapshot.
                let snapshot = render_for(self, &player_id);
                for sink in sinks {
                    renders.push((sink, snapshot.clone()));
                }
            }
        }
        Notifications { renders, events }
    }
}

/// Watcher deliveries and events carried out of a locked section.
pub(crate) struct Notifications {
    renders: Vec<(oneshot::Sender<String>, String)>,
    events: Vec<BoardEvent>,
}

/// A concurrent Memory Scramble board.
///
/// All methods take `&self`; hosts share a board across player tasks
/// with `Arc<Board>`. Queries return owned copies, never references
/// into the internal state.
pub struct Board {
    rows: usize,
    cols: usize,
    pub(crate) inner: Mutex<BoardInner>,
    pub(crate) events: broadcast::Sender<BoardEvent>,
}

impl Board {
    /// Build a board from a parsed layout, all cards face-down.
    pub(crate) fn from_layout(
        rows: usize,
        cols: usize,
        cards: Vec<Option<Picture>>,
        config: BoardConfig,
    ) -> Self {
        let cells = cards
            .into_iter()
            .map(|card| match card {
                Some(picture) => Cell::with_picture(picture),
                None => Cell::empty(),
            })
            .collect();
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            rows,
            cols,
            inner: Mutex::new(BoardInner {
                rows,
                cols,
                cells,
                players: BTreeMap::new(),
                join_order: Vec::new(),
                waiters: BTreeMap::new(),
                lingering: BTreeMap::new(),
                watchers: BTreeMap::new(),
                wake_policy: config.wake_policy,
                dirty: false,
                pending_events: Vec::new(),
            }),
            events,
        }
    }

    /// Parse a board from text in the board-file grammar.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        Self::parse_with_config(text, BoardConfig::default())
    }

    /// Parse a board from text with explicit construction options.
    pub fn parse_with_config(text: &str, config: BoardConfig) -> Result<Self, ParseError> {
        let layout = board_file::parse(text)?;
        Ok(Self::from_layout(
            layout.rows,
            layout.cols,
            layout.cards,
            config,
        ))
    }

    /// Read and parse a board file.
    pub async fn parse_from_file(path: impl AsRef<Path>) -> Result<Self, ParseError> {
        let text = tokio::fs::read_to_string(path).await?;
        Self::parse(&text)
    }

    /// Number of rows. Immutable, no lock taken.
    #[inline]
    pub fn num_rows(&self) -> usize {
        self.rows
    }

    /// Number of columns. Immutable, no lock taken.
    #[inline]
    pub fn num_cols(&self) -> usize {
        self.cols
    }

    /// Register a player, creating a fresh record with empty card
    /// slots and zero flips. Re-registering an existing id is a no-op
    /// returning the same id; a display name given on re-registration
    /// is ignored.
    pub async fn register_player(
        &self,
        id: &str,
        display_name: Option<&str>,
    ) -> Result<PlayerId, BoardError> {
        let player_id = PlayerId::new(id)
            .ok_or_else(|| BoardError::InvalidPlayerId(id.to_string()))?;
        let mut inner = self.inner.lock().await;
        if !inner.players.contains_key(&player_id) {
            debug!(player = %player_id, "registering player");
            inner.players.insert(
                player_id.clone(),
                PlayerRecord::new(player_id.clone(), display_name.map(String::from)),
            );
            inner.join_order.push(player_id.clone());
        }
        Ok(player_id)
    }

    /// Registered player ids in registration order (fresh copy).
    pub async fn list_players(&self) -> Vec<PlayerId> {
        self.inner.lock().await.join_order.clone()
    }

    /// A player's display name, if one was given at registration.
    pub async fn display_name(&self, player_id: &PlayerId) -> Result<Option<String>, BoardError> {
        let inner = self.inner.lock().await;
        let record = inner
            .players
            .get(player_id)
            .ok_or_else(|| BoardError::UnknownPlayer(player_id.clone()))?;
        Ok(record.display_name().map(String::from))
    }

    /// A player's flip count: the number of successful flips so far.
    pub async fn flip_count(&self, player_id: &PlayerId) -> Result<u64, BoardError> {
        let inner = self.inner.lock().await;
        let record = inner
            .players
            .get(player_id)
            .ok_or_else(|| BoardError::UnknownPlayer(player_id.clone()))?;
        Ok(record.flip_count())
    }

    fn bounds_checked(&self, row: usize, col: usize) -> Result<Coord, BoardError> {
        let coord = Coord::new(row, col);
        if coord.in_bounds(self.rows, self.cols) {
            Ok(coord)
        } else {
            Err(BoardError::OutOfBounds { row, col })
        }
    }

    /// The picture at a cell, or None if the cell is empty.
    pub async fn picture_at(&self, row: usize, col: usize) -> Result<Option<Picture>, BoardError> {
        let coord = self.bounds_checked(row, col)?;
        Ok(self.inner.lock().await.cell(coord).picture().cloned())
    }

    /// Whether the cell is face-up.
    pub async fn is_face_up(&self, row: usize, col: usize) -> Result<bool, BoardError> {
        let coord = self.bounds_checked(row, col)?;
        Ok(self.inner.lock().await.cell(coord).is_face_up())
    }

    /// The player controlling the cell, if any.
    pub async fn controller_at(
        &self,
        row: usize,
        col: usize,
    ) -> Result<Option<PlayerId>, BoardError> {
        let coord = self.bounds_checked(row, col)?;
        Ok(self.inner.lock().await.cell(coord).controller().cloned())
    }

    /// Serialize the current layout in the board-file grammar, with
    /// `none` standing in for removed cards.
    pub async fn pictures_dump(&self) -> String {
        let inner = self.inner.lock().await;
        board_file::dump(inner.rows, inner.cols, inner.cells.iter().map(Cell::picture))
    }

    /// Render the board as seen by `viewer`: one header line, then one
    /// line per cell in row-major order. The snapshot is computed under
    /// the lock and is internally consistent. Works for any id,
    /// registered or not.
    pub async fn render(&self, viewer: &PlayerId) -> String {
        render_for(&*self.inner.lock().await, viewer)
    }

    /// Register a one-shot change watcher for `viewer`.
    ///
    /// The returned receiver resolves with the viewer's render of the
    /// board at the next watcher-visible mutation (any change of
    /// face-up state or card presence). Control-only changes do not
    /// fire watchers, even though they alter the `my`/`up` distinction
    /// in a later render. Re-register to keep observing.
    pub async fn add_change_watcher(&self, viewer: &PlayerId) -> oneshot::Receiver<String> {
        let (sink, delivery) = oneshot::channel();
        let mut inner = self.inner.lock().await;
        inner
            .watchers
            .entry(viewer.clone())
            .or_default()
            .push(sink);
        delivery
    }

    /// Subscribe to the structured event stream. Slow receivers drop
    /// the oldest events, never block the board.
    pub fn subscribe_events(&self) -> broadcast::Receiver<BoardEvent> {
        self.events.subscribe()
    }

    /// Administrative flip-down. Requires a face-up card; releases any
    /// controller (waking its waiters) and turns the card face-down.
    ///
    /// Out-of-band tool for hosts; the state machine flips cards down
    /// by itself during normal play.
    #[instrument(skip(self))]
    pub async fn flip_down(&self, row: usize, col: usize) -> Result<(), BoardError> {
        let coord = self.bounds_checked(row, col)?;
        let mut inner = self.inner.lock().await;
        if inner.cell(coord).is_empty() {
            return Err(BoardError::EmptySpace { row, col });
        }
        if !inner.cell(coord).is_face_up() {
            return Err(BoardError::NotFaceUp { row, col });
        }
        if inner.cell(coord).controller().is_some() {
            inner.release_control(coord);
        }
        inner.cell_mut(coord).turn_down();
        inner.dirty = true;
        inner.push_event(BoardEvent::FlippedDown { coord });
        let notifications = inner.take_notifications();
        drop(inner);
        self.dispatch(notifications);
        Ok(())
    }

    /// Apply an asynchronous transform to every non-empty card in
    /// row-major order, replacing each picture in place.
    ///
    /// The lock is released while each transform runs, so interleaved
    /// reads may observe a partially transformed grid; cards removed
    /// mid-transform are skipped. Watchers are notified once, on
    /// completion. Fails with `InvalidCard` if the transform produces
    /// an invalid picture token.
    pub async fn map<F, Fut>(&self, mut transform: F) -> Result<(), BoardError>
    where
        F: FnMut(Picture) -> Fut,
        Fut: Future<Output = String>,
    {
        for idx in 0..self.rows * self.cols {
            let current = {
                let inner = self.inner.lock().await;
                inner.cells[idx].picture().cloned()
            };
            let Some(picture) = current else { continue };
            let token = transform(picture).await;
            let replacement = Picture::new(token.clone())
                .ok_or(BoardError::InvalidCard(token))?;
            let mut inner = self.inner.lock().await;
            // The pair may have been matched away while we were out.
            if !inner.cells[idx].is_empty() {
                inner.cells[idx].replace_picture(replacement);
                inner.dirty = true;
            }
        }
        let mut inner = self.inner.lock().await;
        inner.dirty = true;
        inner.push_event(BoardEvent::Transformed);
        let notifications = inner.take_notifications();
        drop(inner);
        self.dispatch(notifications);
        Ok(())
    }

    /// Deliver watcher renders and broadcast events collected inside a
    /// locked section. Runs with the lock released so sinks can call
    /// straight back into the board.
    pub(crate) fn dispatch(&self, notifications: Notifications) {
        let Notifications { renders, events } = notifications;
        for (sink, snapshot) in renders {
            // A dropped receiver just means the watcher lost interest.
            let _ = sink.send(snapshot);
        }
        for event in events {
            let _ = self.events.send(event);
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} memory scramble board", self.rows, self.cols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn board_2x2() -> Board {
        Board::parse("2x2\nA\nA\nB\nB\n").unwrap()
    }

    #[tokio::test]
    async fn test_dimensions_and_display() {
        let board = board_2x2().await;
        assert_eq!(board.num_rows(), 2);
        assert_eq!(board.num_cols(), 2);
        assert_eq!(board.to_string(), "2x2 memory scramble board");
    }

    #[tokio::test]
    async fn test_register_player_is_idempotent() {
        let board = board_2x2().await;
        let alice = board.register_player("alice", Some("Alice")).await.unwrap();
        let again = board.register_player("alice", Some("Alicia")).await.unwrap();
        assert_eq!(alice, again);
        // First registration wins
        assert_eq!(
            board.display_name(&alice).await.unwrap().as_deref(),
            Some("Alice")
        );
        assert_eq!(board.list_players().await, vec![alice]);
    }

    #[tokio::test]
    async fn test_register_player_rejects_bad_ids() {
        let board = board_2x2().await;
        assert!(matches!(
            board.register_player("", None).await,
            Err(BoardError::InvalidPlayerId(_))
        ));
        assert!(matches!(
            board.register_player("two words", None).await,
            Err(BoardError::InvalidPlayerId(_))
        ));
    }

    #[tokio::test]
    async fn test_list_players_keeps_insertion_order() {
        let board = board_2x2().await;
        let zed = board.register_player("zed", None).await.unwrap();
        let ann = board.register_player("ann", None).await.unwrap();
        assert_eq!(board.list_players().await, vec![zed, ann]);
    }

    #[tokio::test]
    async fn test_queries_bounds_check() {
        let board = board_2x2().await;
        assert!(matches!(
            board.picture_at(2, 0).await,
            Err(BoardError::OutOfBounds { row: 2, col: 0 })
        ));
        assert!(matches!(
            board.is_face_up(0, 2).await,
            Err(BoardError::OutOfBounds { .. })
        ));
        assert!(matches!(
            board.controller_at(9, 9).await,
            Err(BoardError::OutOfBounds { .. })
        ));
    }

    #[tokio::test]
    async fn test_fresh_board_all_face_down() {
        let board = board_2x2().await;
        for row in 0..2 {
            for col in 0..2 {
                assert!(!board.is_face_up(row, col).await.unwrap());
                assert!(board.controller_at(row, col).await.unwrap().is_none());
            }
        }
        assert_eq!(
            board.picture_at(0, 0).await.unwrap(),
            Picture::new("A")
        );
    }

    #[tokio::test]
    async fn test_flip_down_requires_face_up() {
        let board = board_2x2().await;
        assert!(matches!(
            board.flip_down(0, 0).await,
            Err(BoardError::NotFaceUp { .. })
        ));
    }

    #[tokio::test]
    async fn test_flip_up_then_flip_down_restores_cell() {
        let board = board_2x2().await;
        let alice = board.register_player("alice", None).await.unwrap();

        board.flip_up(&alice, 0, 0).await.unwrap();
        assert!(board.is_face_up(0, 0).await.unwrap());
        assert_eq!(
            board.controller_at(0, 0).await.unwrap(),
            Some(alice.clone())
        );

        board.flip_down(0, 0).await.unwrap();
        assert!(!board.is_face_up(0, 0).await.unwrap());
        assert!(board.controller_at(0, 0).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_flip_down_on_empty_cell() {
        let board = Board::parse("1x2\nnone\nA\n").unwrap();
        assert!(matches!(
            board.flip_down(0, 0).await,
            Err(BoardError::EmptySpace { .. })
        ));
    }

    #[tokio::test]
    async fn test_watcher_fires_once_on_visible_change() {
        let board = board_2x2().await;
        let alice = board.register_player("alice", None).await.unwrap();
        let watcher = board.add_change_watcher(&alice).await;

        board.flip_up(&alice, 0, 0).await.unwrap();
        let snapshot = watcher.await.unwrap();
        assert!(snapshot.starts_with("2x2\n"));
        assert!(snapshot.contains("my A\n"));

        // One-shot: a second mutation needs a fresh watcher. The
        // mismatched second flip releases both cards before the flush.
        let second = board.add_change_watcher(&alice).await;
        board.flip_up(&alice, 1, 0).await.unwrap();
        let snapshot = second.await.unwrap();
        assert!(snapshot.contains("up A\n"));
        assert!(snapshot.contains("up B\n"));
    }

    #[tokio::test]
    async fn test_watcher_not_fired_by_control_only_change() {
        let board = board_2x2().await;
        let alice = board.register_player("alice", None).await.unwrap();
        let bob = board.register_player("bob", None).await.unwrap();

        // Leave (0,0) face-up and uncontrolled: alice mismatches.
        board.flip_up(&alice, 0, 0).await.unwrap();
        board.flip_up(&alice, 1, 0).await.unwrap();

        let mut watcher = board.add_change_watcher(&bob).await;
        // Bob takes the loose face-up card; no visible change.
        board.flip_up(&bob, 0, 0).await.unwrap();
        assert!(watcher.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_watchers_see_consistent_per_player_snapshots() {
        let board = board_2x2().await;
        let alice = board.register_player("alice", None).await.unwrap();
        let bob = board.register_player("bob", None).await.unwrap();

        let for_alice = board.add_change_watcher(&alice).await;
        let for_bob = board.add_change_watcher(&bob).await;

        board.flip_up(&alice, 0, 0).await.unwrap();

        let alice_view = for_alice.await.unwrap();
        let bob_view = for_bob.await.unwrap();
        assert!(alice_view.contains("my A\n"));
        assert!(bob_view.contains("up A\n"));
    }

    #[tokio::test]
    async fn test_map_transforms_every_card() {
        let board = board_2x2().await;
        board
            .map(|picture| async move { format!("{picture}+") })
            .await
            .unwrap();
        assert_eq!(board.pictures_dump().await, "2x2\nA+\nA+\nB+\nB+\n");
    }

    #[tokio::test]
    async fn test_map_skips_empty_cells() {
        let board = Board::parse("1x3\nnone\nA\nnone\n").unwrap();
        board
            .map(|picture| async move { format!("<{picture}>") })
            .await
            .unwrap();
        assert_eq!(board.pictures_dump().await, "1x3\nnone\n<A>\nnone\n");
    }

    #[tokio::test]
    async fn test_map_rejects_invalid_tokens() {
        let board = board_2x2().await;
        let result = board
            .map(|_| async move { "bad token".to_string() })
            .await;
        assert!(matches!(result, Err(BoardError::InvalidCard(_))));
    }

    #[tokio::test]
    async fn test_map_notifies_watchers_on_completion() {
        let board = board_2x2().await;
        let alice = board.register_player("alice", None).await.unwrap();
        let watcher = board.add_change_watcher(&alice).await;

        board
            .map(|picture| async move { format!("{picture}2") })
            .await
            .unwrap();
        // Cards are face-down, so the render shows no pictures, but the
        // completion still fires the watcher.
        assert!(watcher.await.unwrap().starts_with("2x2\n"));
    }

    #[tokio::test]
    async fn test_events_are_broadcast() {
        let board = board_2x2().await;
        let mut events = board.subscribe_events();
        let alice = board.register_player("alice", None).await.unwrap();

        board.flip_up(&alice, 0, 0).await.unwrap();

        let event = events.recv().await.unwrap();
        assert_eq!(
            event,
            BoardEvent::Flipped {
                player_id: alice.clone(),
                coord: Coord::new(0, 0),
                picture: Picture::new("A").unwrap(),
            }
        );
    }

    #[tokio::test]
    async fn test_flip_count_accumulates() {
        let board = board_2x2().await;
        let alice = board.register_player("alice", None).await.unwrap();
        assert_eq!(board.flip_count(&alice).await.unwrap(), 0);

        board.flip_up(&alice, 0, 0).await.unwrap();
        board.flip_up(&alice, 0, 1).await.unwrap();
        assert_eq!(board.flip_count(&alice).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_parse_from_file_round_trips() {
        let path = std::env::temp_dir().join("memory-scramble-board-test.txt");
        tokio::fs::write(&path, "2x2\r\nA\r\nA\r\nB\r\nB\r\n").await.unwrap();

        let board = Board::parse_from_file(&path).await.unwrap();
        assert_eq!(board.num_rows(), 2);
        assert_eq!(board.num_cols(), 2);
        // Dump emits the normalized form of the file
        assert_eq!(board.pictures_dump().await, "2x2\nA\nA\nB\nB\n");

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_parse_from_missing_file() {
        let result = Board::parse_from_file("no/such/board.txt").await;
        assert!(matches!(result, Err(ParseError::Io(_))));
    }

    #[tokio::test]
    async fn test_flip_count_unknown_player() {
        let board = board_2x2().await;
        let ghost = PlayerId::new("ghost").unwrap();
        assert!(matches!(
            board.flip_count(&ghost).await,
            Err(BoardError::UnknownPlayer(_))
        ));
    }
}
