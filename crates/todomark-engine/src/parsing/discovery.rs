use crate::config::TodoConfig;
use crate::models::{ListMarker, Metadata, MetadataEntry, TodoMarker};
use crate::parsing::line::{self, TodoLineMatch};
use crate::parsing::metadata;
use crate::parsing::position::{ColSpan, Pos, Range};

/// A todo item as found by the discovery pass, before identity assignment.
///
/// Parent/child links are indexes into the pass's item vector; the document
/// resolves them to stable [`crate::models::TodoId`]s via its anchor table.
#[derive(Debug, Clone)]
pub(crate) struct DiscoveredItem {
    pub range: Range,
    pub first_line_range: Range,
    pub content_range: Range,
    pub state: String,
    pub marker: TodoMarker,
    pub list_marker: ListMarker,
    pub indent: usize,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub metadata: Metadata,
    pub content_text: String,
    /// Absolute byte offset of the todo marker, used for anchor matching.
    pub marker_offset: usize,
}

#[derive(Debug, Clone, Copy)]
struct OpenItem {
    index: usize,
    marker_col: usize,
    content_col: usize,
}

/// Single-pass builder: feed lines top to bottom, then [`finish`].
///
/// Maintains an indent stack of open todo items. Todo lines pop entries whose
/// marker column is at or beyond their own (siblings and deeper scopes), then
/// nest under the new top. Other lines attach as content to the innermost
/// open item whose content column they reach.
///
/// [`finish`]: DiscoveryBuilder::finish
pub(crate) struct DiscoveryBuilder<'a> {
    cfg: &'a TodoConfig,
    items: Vec<DiscoveredItem>,
    stack: Vec<OpenItem>,
}

impl<'a> DiscoveryBuilder<'a> {
    pub fn new(cfg: &'a TodoConfig) -> Self {
        Self {
            cfg,
            items: Vec::new(),
            stack: Vec::new(),
        }
    }

    /// Consumes one line. `offset` is the absolute byte offset of the line
    /// start; `line` carries no trailing newline.
    pub fn push_line(&mut self, row: usize, offset: usize, line: &str) {
        if let Some(todo) = line::match_todo(line, self.cfg) {
            self.open_todo(row, offset, line, todo);
            return;
        }
        if line.trim().is_empty() {
            // Blank lines leave scopes open; they end up inside an item only
            // when a later line attaches beneath them.
            return;
        }
        self.attach_content(row, line);
    }

    pub fn finish(mut self) -> Vec<DiscoveredItem> {
        // Fold child extents into ancestors.
        for i in (0..self.items.len()).rev() {
            if let Some(p) = self.items[i].parent {
                let child_end = self.items[i].range.end;
                if child_end > self.items[p].range.end {
                    self.items[p].range.end = child_end;
                }
            }
        }
        tracing::trace!(items = self.items.len(), "discovery pass complete");
        self.items
    }

    fn open_todo(&mut self, row: usize, offset: usize, line: &str, m: TodoLineMatch) {
        // This line is a sibling or ancestor of anything at the same or a
        // deeper marker column, never a child of those.
        while self
            .stack
            .last()
            .is_some_and(|t| t.marker_col >= m.list.marker_col)
        {
            self.stack.pop();
        }
        let parent = self.stack.last().map(|t| t.index);

        let end_col = line.len().saturating_sub(1);
        let end = Pos::new(row, end_col);
        // a bare marker has no first-line content; the content range
        // collapses to the position where content would start
        let content_range = if m.content_col > end_col {
            Range::point(Pos::new(row, line.len()))
        } else {
            Range::new(Pos::new(row, m.content_col), end)
        };
        let index = self.items.len();

        // on a bare marker the content column is past the end of the line
        let scan_col = m.content_col.min(line.len());
        let tags = metadata::scan_tags(line, scan_col, self.cfg);
        let content_text = strip_tags(&line[scan_col..], scan_col, &tags);
        let entries = tags
            .into_iter()
            .map(|t| MetadataEntry {
                tag: t.tag,
                canonical_name: t.canonical,
                value: t.value,
                range: Range::on_row(row, t.start_col, t.end_col - 1),
                value_range: ColSpan::new(row, t.value_start, t.value_end),
            })
            .collect();

        let item = DiscoveredItem {
            range: Range::new(Pos::new(row, 0), end),
            first_line_range: Range::new(Pos::new(row, 0), end),
            content_range,
            state: m.state,
            marker: TodoMarker {
                text: m.marker_text,
                pos: Pos::new(row, m.marker_col),
            },
            list_marker: ListMarker {
                text: m.list.marker_text.clone(),
                pos: Pos::new(row, m.list.marker_col),
                kind: m.list.kind,
            },
            indent: m.list.marker_col,
            parent,
            children: Vec::new(),
            metadata: Metadata { entries },
            content_text,
            marker_offset: offset + m.marker_col,
        };
        self.items.push(item);

        if let Some(p) = parent {
            self.items[p].children.push(index);
        }
        self.stack.push(OpenItem {
            index,
            marker_col: m.list.marker_col,
            content_col: m.list.content_col,
        });
    }

    /// Attaches a non-todo line to the innermost open item whose content
    /// column it reaches; dedenting below a scope closes it.
    fn attach_content(&mut self, row: usize, line: &str) {
        let indent = line.len() - line.trim_start_matches([' ', '\t']).len();
        while self.stack.last().is_some_and(|t| indent < t.content_col) {
            self.stack.pop();
        }
        let Some(top) = self.stack.last() else {
            return;
        };

        // Attaching covers any blank rows in between.
        let end = Pos::new(row, line.len().saturating_sub(1));
        self.items[top.index].range.end = end;
    }
}

/// First-line prose with the metadata tag spans removed.
///
/// Interior whitespace left behind by removed tags is collapsed.
fn strip_tags(content: &str, content_col: usize, tags: &[metadata::TagMatch]) -> String {
    if tags.is_empty() {
        return content.trim().to_string();
    }
    let mut kept = String::with_capacity(content.len());
    let mut col = content_col;
    for c in content.chars() {
        let in_tag = tags.iter().any(|t| col >= t.start_col && col < t.end_col);
        if !in_tag {
            kept.push(c);
        }
        col += c.len_utf8();
    }
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}
