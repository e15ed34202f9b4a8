//! Board File Format
//!
//! The line-oriented layout grammar:
//!
//! ```text
//! file    := header LF ( token LF ){rows*cols} [LF]
//! header  := [0-9]+ "x" [0-9]+
//! token   := "none" | <one or more non-whitespace chars>
//! ```
//!
//! CR and CRLF line endings are accepted and normalized; `pictures_dump`
//! emits exactly this grammar with a trailing LF.

use crate::core::token::{Picture, EMPTY_TOKEN};

/// Errors reading a board file. Line numbers are 1-based.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Reading the file failed.
    #[error("failed to read board file: {0}")]
    Io(#[from] std::io::Error),

    /// The file has no content.
    #[error("board file is empty")]
    InvalidFile,

    /// The first line is not `<rows>x<cols>`.
    #[error("line 1: invalid header {0:?}")]
    InvalidHeader(String),

    /// Rows or columns outside the supported range.
    #[error("invalid dimensions {rows}x{cols}")]
    InvalidDimensions {
        /// Parsed row count.
        rows: usize,
        /// Parsed column count.
        cols: usize,
    },

    /// Number of card lines does not equal rows*cols.
    #[error("expected {expected} cards, found {found}")]
    WrongCardCount {
        /// rows*cols.
        expected: usize,
        /// Card lines present.
        found: usize,
    },

    /// A card token is empty or contains whitespace.
    #[error("line {line}: invalid card {token:?}")]
    InvalidCard {
        /// 1-based file line of the offending token.
        line: usize,
        /// The offending token.
        token: String,
    },
}

/// A parsed board layout.
#[derive(Debug)]
pub(crate) struct Layout {
    pub(crate) rows: usize,
    pub(crate) cols: usize,
    /// Row-major cards; None for the `none` literal.
    pub(crate) cards: Vec<Option<Picture>>,
}

/// Normalize line endings: CRLF and stray CR both become LF.
fn normalize(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

fn parse_dimension(token: &str) -> Option<usize> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// Parse board-file text into a layout.
pub(crate) fn parse(text: &str) -> Result<Layout, ParseError> {
    let normalized = normalize(text);
    let mut lines: Vec<&str> = normalized.split('\n').collect();
    // A single trailing empty line comes from the final LF.
    if lines.last() == Some(&"") {
        lines.pop();
    }
    if lines.is_empty() || (lines.len() == 1 && lines[0].is_empty()) {
        return Err(ParseError::InvalidFile);
    }

    let header = lines[0];
    let (rows, cols) = header
        .split_once('x')
        .and_then(|(r, c)| Some((parse_dimension(r)?, parse_dimension(c)?)))
        .ok_or_else(|| ParseError::InvalidHeader(header.to_string()))?;
    if rows == 0 || cols == 0 {
        return Err(ParseError::InvalidDimensions { rows, cols });
    }
    let expected = rows
        .checked_mul(cols)
        .ok_or(ParseError::InvalidDimensions { rows, cols })?;

    let card_lines = &lines[1..];
    if card_lines.len() != expected {
        return Err(ParseError::WrongCardCount {
            expected,
            found: card_lines.len(),
        });
    }

    let mut cards = Vec::with_capacity(expected);
    for (offset, token) in card_lines.iter().enumerate() {
        if *token == EMPTY_TOKEN {
            cards.push(None);
        } else {
            let picture =
                Picture::new(*token).ok_or_else(|| ParseError::InvalidCard {
                    // +2: one for 1-based numbering, one for the header.
                    line: offset + 2,
                    token: token.to_string(),
                })?;
            cards.push(Some(picture));
        }
    }

    Ok(Layout { rows, cols, cards })
}

/// Serialize a layout in the board-file grammar, `none` for empties,
/// with a trailing LF.
pub(crate) fn dump<'a>(
    rows: usize,
    cols: usize,
    pictures: impl Iterator<Item = Option<&'a Picture>>,
) -> String {
    let mut out = String::with_capacity(8 + rows * cols * 8);
    out.push_str(&format!("{rows}x{cols}\n"));
    for picture in pictures {
        match picture {
            Some(picture) => out.push_str(picture.as_str()),
            None => out.push_str(EMPTY_TOKEN),
        }
        out.push('\n');
    }
    out
}
