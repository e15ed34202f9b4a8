//! Identifier Tokens
//!
//! Validated string newtypes for card pictures and player identifiers.
//! Both grammars forbid whitespace so the textual board and render
//! formats stay line-oriented.

use serde::{Serialize, Deserialize};
use std::fmt;

/// The board-file literal denoting an empty cell.
pub const EMPTY_TOKEN: &str = "none";

fn is_valid_token(s: &str) -> bool {
    !s.is_empty() && !s.chars().any(char::is_whitespace)
}

/// A card picture token.
///
/// Non-empty, contains no whitespace, and is never the reserved
/// literal `none` (which the board-file grammar uses for empty cells).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Picture(String);

impl Picture {
    /// Create a picture from a token, or None if the token is invalid.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if is_valid_token(&token) && token != EMPTY_TOKEN {
            Some(Self(token))
        } else {
            None
        }
    }

    /// The raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Picture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A player identifier.
///
/// Non-empty token with no whitespace, supplied by the host.
/// Implements Ord for deterministic BTreeMap ordering.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Create a player id from a token, or None if the token is invalid.
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if is_valid_token(&id) {
            Some(Self(id))
        } else {
            None
        }
    }

    /// The raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
