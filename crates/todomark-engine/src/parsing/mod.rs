//! Recognition and discovery: from raw lines to the hierarchical todo model.
//!
//! - [`position`]: row/column primitives shared by every layer.
//! - [`line`]: pure per-line classification (list item, todo marker).
//! - [`metadata`]: `@name(value)` tag scanning with exact value spans.
//! - [`discovery`]: the single-pass indent-stack walk over the whole buffer.

pub mod discovery;
pub mod line;
pub mod metadata;
pub mod position;

pub use line::{ListItemMatch, MarkerKind, TodoLineMatch, match_list_item, match_todo};
pub use position::{ColSpan, Pos, Range};

use xi_rope::Rope;

use crate::config::TodoConfig;
use discovery::{DiscoveredItem, DiscoveryBuilder};

/// Runs one full discovery pass over the buffer.
///
/// Accepts any text, including empty or malformed input, and degrades to an
/// empty result rather than failing.
pub(crate) fn discover(rope: &Rope, cfg: &TodoConfig) -> Vec<DiscoveredItem> {
    let mut builder = DiscoveryBuilder::new(cfg);
    let mut offset = 0usize;
    for (row, raw) in rope.lines_raw(..).enumerate() {
        let line = raw.trim_end_matches(['\n', '\r']);
        builder.push_line(row, offset, line);
        offset += raw.len();
    }
    builder.finish()
}
