use std::sync::LazyLock;

use regex::Regex;

use crate::config::TodoConfig;

/// Head of a metadata tag: `@name(`. The value and closing paren are scanned
/// by hand so nesting and unbalanced input can be handled precisely.
static TAG_HEAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([A-Za-z][A-Za-z0-9_-]*)\(").expect("tag head pattern"));

/// One `@name(value)` occurrence on a line. All columns are byte columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagMatch {
    /// The tag as spelled.
    pub tag: String,
    /// Canonical name after alias resolution.
    pub canonical: String,
    pub value: String,
    /// Column of the `@`.
    pub start_col: usize,
    /// Column just past the closing `)`.
    pub end_col: usize,
    /// Column of the first value byte.
    pub value_start: usize,
    /// Column just past the last value byte.
    pub value_end: usize,
}

/// Scans a line for metadata tags starting at `from_col`.
///
/// A head whose parentheses never balance on this line is not a tag; it stays
/// plain content and scanning continues after it. Heads inside a previous
/// tag's value are skipped.
pub fn scan_tags(line: &str, from_col: usize, cfg: &TodoConfig) -> Vec<TagMatch> {
    let mut out = Vec::new();
    let mut last_end = from_col;

    for caps in TAG_HEAD.captures_iter(&line[from_col..]) {
        let head = caps.get(0).expect("whole match");
        let start_col = from_col + head.start();
        if start_col < last_end {
            continue;
        }

        let value_start = from_col + head.end();
        let Some(value_len) = balanced_value_len(&line[value_start..]) else {
            continue;
        };
        let value_end = value_start + value_len;

        let tag = caps[1].to_string();
        let canonical = cfg.canonical_tag(&tag).to_string();
        out.push(TagMatch {
            canonical,
            value: line[value_start..value_end].to_string(),
            start_col,
            end_col: value_end + 1,
            value_start,
            value_end,
            tag,
        });
        last_end = value_end + 1;
    }

    out
}

/// Length of a tag value: bytes up to the `)` that balances the opening
/// paren. `None` when the parens never balance on this line.
fn balanced_value_len(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' if depth == 0 => return Some(i),
            ')' => depth -= 1,
            _ => {}
        }
    }
    None
}
