use serde::{Deserialize, Serialize};

use crate::config::TodoConfig;

/// Kind of list marker introducing an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerKind {
    Unordered,
    Ordered,
}

/// Local facts about a line's list-item prefix.
///
/// All columns are byte columns within the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItemMatch {
    /// Column of the first marker byte.
    pub marker_col: usize,
    /// The marker token, e.g. `-` or `12.`.
    pub marker_text: String,
    /// Column where the item's content begins (first non-space after the
    /// marker, or the column just past `marker + space` on a bare marker).
    pub content_col: usize,
    pub kind: MarkerKind,
}

/// A list-item match plus todo-state detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoLineMatch {
    pub list: ListItemMatch,
    /// Name of the matched state, e.g. `unchecked`.
    pub state: String,
    /// Column of the first byte of the todo marker.
    pub marker_col: usize,
    /// The todo marker as written: a glyph like `□` or a native spelling
    /// like `[ ]`.
    pub marker_text: String,
    /// Column where the prose after the todo marker begins.
    pub content_col: usize,
}

/// Classifies a line's list-item prefix, or returns `None` for non-list lines.
pub fn match_list_item(line: &str, cfg: &TodoConfig) -> Option<ListItemMatch> {
    let marker_col = line.len() - line.trim_start_matches([' ', '\t']).len();
    let rest = &line[marker_col..];
    let first = rest.chars().next()?;

    if cfg.is_bullet(first) {
        let after = marker_col + first.len_utf8();
        if !token_boundary(line, after) {
            return None;
        }
        return Some(ListItemMatch {
            marker_col,
            marker_text: first.to_string(),
            content_col: content_start(line, after),
            kind: MarkerKind::Unordered,
        });
    }

    if cfg.ordered_markers && first.is_ascii_digit() {
        let digits = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
        let punct = rest.as_bytes().get(digits)?;
        if *punct != b'.' && *punct != b')' {
            return None;
        }
        let after = marker_col + digits + 1;
        if !token_boundary(line, after) {
            return None;
        }
        return Some(ListItemMatch {
            marker_col,
            marker_text: rest[..digits + 1].to_string(),
            content_col: content_start(line, after),
            kind: MarkerKind::Ordered,
        });
    }

    None
}

/// Classifies a todo line: list-item prefix plus a recognized state marker.
///
/// Glyph spellings take priority over the native checkbox spelling, so the
/// two can never match ambiguously.
pub fn match_todo(line: &str, cfg: &TodoConfig) -> Option<TodoLineMatch> {
    let list = match_list_item(line, cfg)?;
    let rest = &line[list.content_col..];

    for state in &cfg.states {
        if state.marker.is_empty() || !rest.starts_with(state.marker.as_str()) {
            continue;
        }
        let end = list.content_col + state.marker.len();
        if token_boundary(line, end) {
            return Some(todo_match(line, list, &state.name, &state.marker, end));
        }
    }

    if cfg.native_checkboxes && rest.starts_with('[') {
        let close = rest.find(']')?;
        let inner = &rest[1..close];
        let state = cfg
            .states
            .iter()
            .find(|s| matches!(&s.native, Some(n) if n.eq_ignore_ascii_case(inner)))?;
        let end = list.content_col + close + 1;
        if token_boundary(line, end) {
            let text = &line[list.content_col..end];
            return Some(todo_match(line, list, &state.name, text, end));
        }
    }

    None
}

fn todo_match(
    line: &str,
    list: ListItemMatch,
    state: &str,
    marker_text: &str,
    marker_end: usize,
) -> TodoLineMatch {
    TodoLineMatch {
        marker_col: list.content_col,
        marker_text: marker_text.to_string(),
        content_col: content_start(line, marker_end),
        state: state.to_string(),
        list,
    }
}

/// A marker token must be followed by a space or the end of the line.
fn token_boundary(line: &str, idx: usize) -> bool {
    idx >= line.len() || line.as_bytes()[idx] == b' '
}

/// First non-space column at or after `from`, or `from + 1` when the line
/// ends there (the column where content would go after one space).
fn content_start(line: &str, from: usize) -> usize {
    line[from..]
        .char_indices()
        .find(|(_, c)| *c != ' ')
        .map(|(i, _)| from + i)
        .unwrap_or(from + 1)
}

/// Converts a byte column to a character column. Exact for multi-byte text;
/// `byte_col` must lie on a character boundary.
pub fn byte_to_char_col(line: &str, byte_col: usize) -> usize {
    let clamped = byte_col.min(line.len());
    debug_assert!(line.is_char_boundary(clamped));
    line[..clamped].chars().count()
}

/// Converts a character column to a byte column. Columns past the end of the
/// line map to the line length.
pub fn char_to_byte_col(line: &str, char_col: usize) -> usize {
    line.char_indices()
        .nth(char_col)
        .map(|(i, _)| i)
        .unwrap_or(line.len())
}
