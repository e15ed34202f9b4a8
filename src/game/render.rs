//! Per-Player Rendering
//!
//! Projects the shared grid into the textual snapshot one player sees.
//! Always computed with the board lock held so a snapshot never mixes
//! two moments in time.

use crate::core::token::{PlayerId, EMPTY_TOKEN};
use crate::game::board::BoardInner;

/// Render the grid as seen by `viewer`.
///
/// One `RxC` header line, then one line per cell in row-major order:
/// `none` for an empty cell, `down` for a face-down card, `my <pic>`
/// for a face-up card the viewer controls, `up <pic>` for any other
/// face-up card.
pub(crate) fn render_for(inner: &BoardInner, viewer: &PlayerId) -> String {
    // Header plus roughly one short token per line.
    let mut out = String::with_capacity(8 + inner.cells.len() * 8);
    out.push_str(&format!("{}x{}\n", inner.rows, inner.cols));
    for cell in &inner.cells {
        match cell.picture() {
            None => {
                out.push_str(EMPTY_TOKEN);
                out.push('\n');
            }
            Some(_) if !cell.is_face_up() => {
                out.push_str("down\n");
            }
            Some(picture) => {
                if cell.is_controlled_by(viewer) {
                    out.push_str("my ");
                } else {
                    out.push_str("up ");
                }
                out.push_str(picture.as_str());
                out.push('\n');
            }
        }
    }
    out
}
