//! # Memory Scramble Core
//!
//! Concurrent board engine for Memory Scramble: the classic matching
//! game opened up so any number of players act on one shared board at
//! the same time.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  MEMORY SCRAMBLE CORE                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Value primitives                          │
//! │  ├── coord.rs    - Row/column cell addressing                │
//! │  └── token.rs    - Validated picture and player-id tokens    │
//! │                                                              │
//! │  game/           - The shared board                          │
//! │  ├── cell.rs     - Card, face, and controller per cell       │
//! │  ├── player.rs   - Per-player turn state                     │
//! │  ├── board.rs    - Concurrent board ADT, queries, watchers   │
//! │  ├── flip.rs     - Flip state machine and cleanup rules      │
//! │  ├── render.rs   - Per-player textual snapshots              │
//! │  └── events.rs   - Structured events for hosts               │
//! │                                                              │
//! │  io/             - Textual board-file format                 │
//! │  └── board_file.rs - Layout grammar: parse and dump          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency Model
//!
//! One lock guards all board state. A first flip landing on a card
//! another player controls parks on a per-cell FIFO queue and retries
//! when the card is released; second flips never block (two blocked
//! second flips could deadlock a pair of players holding each other's
//! target). Change watchers are one-shot: they receive a per-player
//! render computed from the post-mutation snapshot and must be
//! re-registered to keep observing.
//!
//! Hosts drive the board with one task per player:
//!
//! ```no_run
//! use std::sync::Arc;
//! use memory_scramble::Board;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let board = Arc::new(Board::parse_from_file("boards/perfect.txt").await?);
//! let zoe = board.register_player("zoe", None).await?;
//! board.flip_up(&zoe, 0, 0).await?;
//! board.flip_up(&zoe, 0, 1).await?;
//! println!("{}", board.render(&zoe).await);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod io;

// Re-export commonly used types
pub use crate::core::coord::Coord;
pub use crate::core::token::{Picture, PlayerId};
pub use crate::game::board::{Board, BoardConfig, BoardError, WakePolicy};
pub use crate::game::events::BoardEvent;
pub use crate::io::board_file::ParseError;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
