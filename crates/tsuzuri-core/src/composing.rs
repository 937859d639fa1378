//! The composing buffer: not-yet-committed input with a conversion cursor.
//!
//! The buffer is an ordered piece sequence. The cursor indexes into the
//! *convert target* (the intended-character projection), not the raw piece
//! list; separators are zero-width, so a piece contributes at most one
//! position. All cursor arithmetic clamps — no operation can place the
//! cursor outside `[0, convert_target chars]`.

use tracing::debug;

use crate::candidate::ComposingExtent;
use crate::piece::InputPiece;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposingBuffer {
    pieces: Vec<InputPiece>,
    /// Cursor position, counted in convert-target characters.
    cursor: usize,
}

impl ComposingBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn pieces(&self) -> &[InputPiece] {
        &self.pieces
    }

    pub fn last_piece(&self) -> Option<&InputPiece> {
        self.pieces.last()
    }

    /// Number of pieces, separators included.
    pub fn unit_count(&self) -> usize {
        self.pieces.len()
    }

    /// The textual projection submitted for conversion.
    pub fn convert_target(&self) -> String {
        self.pieces
            .iter()
            .filter_map(InputPiece::intended_char)
            .collect()
    }

    /// The raw keyboard text behind the buffer (used for roman-style
    /// fixed-transform candidates).
    pub fn raw_input(&self) -> String {
        self.pieces.iter().filter_map(InputPiece::raw_char).collect()
    }

    /// Length of the convert target in characters.
    pub fn char_len(&self) -> usize {
        self.pieces.iter().filter(|p| !p.is_separator()).count()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor == self.char_len()
    }

    pub fn is_at_start(&self) -> bool {
        self.cursor == 0
    }

    /// Piece index corresponding to a convert-target character position.
    /// Separators directly before the position are included in the prefix.
    fn piece_index_for(&self, char_pos: usize) -> usize {
        let mut chars = 0;
        for (i, piece) in self.pieces.iter().enumerate() {
            if chars == char_pos && !piece.is_separator() {
                return i;
            }
            if !piece.is_separator() {
                chars += 1;
            }
        }
        self.pieces.len()
    }

    /// Insert pieces at the cursor. The cursor advances past the insertion.
    pub fn insert_at_cursor(&mut self, pieces: Vec<InputPiece>) {
        let added: usize = pieces.iter().filter(|p| !p.is_separator()).count();
        let at = self.piece_index_for(self.cursor);
        self.pieces.splice(at..at, pieces);
        self.cursor += added;
    }

    /// Remove up to `count` convert-target characters before the cursor.
    /// Separators crossed on the way are removed without counting.
    pub fn delete_backward(&mut self, count: usize) {
        let mut remaining = count;
        while remaining > 0 && self.cursor > 0 {
            let at = self.piece_index_for(self.cursor);
            // The piece just before the cursor position; swallow any
            // zero-width separators sitting between it and the cursor.
            let mut idx = at;
            loop {
                debug_assert!(idx > 0);
                idx -= 1;
                if !self.pieces[idx].is_separator() {
                    break;
                }
                self.pieces.remove(idx);
            }
            self.pieces.remove(idx);
            self.cursor -= 1;
            remaining -= 1;
        }
        self.clamp_cursor();
    }

    /// Move the cursor by `delta` convert-target positions, clamped.
    /// Returns the actual displacement.
    pub fn move_cursor(&mut self, delta: i32) -> i32 {
        let len = self.char_len() as i64;
        let old = self.cursor as i64;
        let new = (old + i64::from(delta)).clamp(0, len);
        self.cursor = new as usize;
        (new - old) as i32
    }

    pub fn move_cursor_to_end(&mut self) {
        self.cursor = self.char_len();
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.char_len());
    }

    /// A copy of the buffer truncated at the cursor, used as the conversion
    /// request payload.
    pub fn prefix_to_cursor(&self) -> ComposingBuffer {
        let at = self.piece_index_for(self.cursor);
        ComposingBuffer {
            pieces: self.pieces[..at].to_vec(),
            cursor: self.cursor,
        }
    }

    /// Advance past the portion a committed candidate consumed.
    pub fn prefix_complete(&mut self, extent: ComposingExtent) {
        debug!(?extent, pieces = self.pieces.len(), "prefix_complete");
        let consumed_pieces = match extent {
            ComposingExtent::Units(n) => n.min(self.pieces.len()),
            ComposingExtent::Chars(n) => self.piece_index_for(n.min(self.char_len())),
        };
        let removed_chars = self.pieces[..consumed_pieces]
            .iter()
            .filter(|p| !p.is_separator())
            .count();
        self.pieces.drain(..consumed_pieces);
        // Leading separators left behind by a char-counted extent are spent.
        while self.pieces.first().is_some_and(InputPiece::is_separator) {
            self.pieces.remove(0);
        }
        self.cursor = self.cursor.saturating_sub(removed_chars);
        self.clamp_cursor();
    }

    /// Whether a candidate of this extent would consume the entire buffer.
    pub fn is_whole(&self, extent: ComposingExtent) -> bool {
        let mut probe = self.clone();
        probe.prefix_complete(extent);
        probe.is_empty()
    }

    /// Abandon the composition entirely.
    pub fn stop_composition(&mut self) {
        self.pieces.clear();
        self.cursor = 0;
    }
}
