//! Board I/O
//!
//! The textual board-file format: parsing and serialization.

pub mod board_file;

pub use board_file::ParseError;
