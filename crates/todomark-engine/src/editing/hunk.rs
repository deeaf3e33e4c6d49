use xi_rope::Rope;

/// One edit region expressed in row/column coordinates.
///
/// Spans are half-open: the region runs from `(start_row, start_col)`
/// inclusive to `(end_row, end_col)` exclusive, in byte columns. `insert`
/// holds the replacement text split on newlines, so the text is always
/// `insert.join("\n")`; an empty `insert` deletes the span, and a trailing
/// empty element yields a trailing newline. [`insert_lines`] uses that to
/// drop whole new lines above a row from a zero-width span.
///
/// [`insert_lines`]: TextDiffHunk::insert_lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDiffHunk {
    pub start_row: usize,
    pub start_col: usize,
    pub end_row: usize,
    pub end_col: usize,
    pub insert: Vec<String>,
}

impl TextDiffHunk {
    pub fn replace(
        start_row: usize,
        start_col: usize,
        end_row: usize,
        end_col: usize,
        insert: Vec<String>,
    ) -> Self {
        Self {
            start_row,
            start_col,
            end_row,
            end_col,
            insert,
        }
    }

    /// Zero-width insertion of `text` at one position.
    pub fn insert_at(row: usize, col: usize, text: impl Into<String>) -> Self {
        Self::replace(row, col, row, col, vec![text.into()])
    }

    /// Inserts whole lines above `row`, each with its own newline.
    pub fn insert_lines(row: usize, mut lines: Vec<String>) -> Self {
        // empty terminator so the last line gets a newline too
        lines.push(String::new());
        Self::replace(row, 0, row, 0, lines)
    }

    pub fn delete(start_row: usize, start_col: usize, end_row: usize, end_col: usize) -> Self {
        Self::replace(start_row, start_col, end_row, end_col, Vec::new())
    }

    /// True when the span is zero-width.
    pub fn is_point(&self) -> bool {
        self.start_row == self.end_row && self.start_col == self.end_col
    }

    pub fn is_line_insertion(&self) -> bool {
        self.is_point()
            && self.start_col == 0
            && self.insert.len() > 1
            && self.insert.last().is_some_and(String::is_empty)
    }

    fn start(&self) -> (usize, usize) {
        (self.start_row, self.start_col)
    }

    fn end(&self) -> (usize, usize) {
        (self.end_row, self.end_col)
    }
}

/// Orders hunks bottom-to-top so earlier applications cannot shift the
/// coordinates of later ones.
///
/// Overlapping hunks in one batch are a caller contract violation; debug
/// builds assert on them.
pub(crate) fn sort_for_apply(mut hunks: Vec<TextDiffHunk>) -> Vec<TextDiffHunk> {
    hunks.sort_by(|a, b| b.start().cmp(&a.start()));
    debug_assert!(
        hunks.windows(2).all(|pair| pair[1].end() <= pair[0].start()),
        "overlapping hunks in one batch"
    );
    hunks
}

/// Resolves a hunk against the current buffer into a byte range and the
/// replacement text.
///
/// Out-of-range rows and columns clamp to the buffer rather than panic; a
/// column past the end of its line clamps to the line end.
pub(crate) fn resolve(hunk: &TextDiffHunk, rope: &Rope) -> (std::ops::Range<usize>, String) {
    let start = offset_at(rope, hunk.start_row, hunk.start_col);
    let end = offset_at(rope, hunk.end_row, hunk.end_col).max(start);
    (start..end, hunk.insert.join("\n"))
}

fn offset_at(rope: &Rope, row: usize, col: usize) -> usize {
    let last_row = rope.line_of_offset(rope.len());
    if row > last_row {
        return rope.len();
    }
    let line_start = rope.offset_of_line(row);
    let line_end = if row < last_row {
        // exclude the newline so a large column cannot bleed into the next row
        rope.offset_of_line(row + 1).saturating_sub(1)
    } else {
        rope.len()
    };
    (line_start + col).min(line_end)
}
