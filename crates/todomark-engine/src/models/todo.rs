use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::parsing::line::MarkerKind;
use crate::parsing::position::{ColSpan, Pos, Range};

/// Stable identity of a todo item, surviving edits that do not delete it.
///
/// Minted by a discovery pass; preserved across edits through the document's
/// anchor table rather than recomputed from indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TodoId(Uuid);

impl TodoId {
    pub(crate) fn mint() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The token denoting a todo's state: a glyph like `□` or a native spelling
/// like `[ ]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoMarker {
    pub text: String,
    pub pos: Pos,
}

/// The enclosing list bullet or ordinal token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMarker {
    pub text: String,
    pub pos: Pos,
    pub kind: MarkerKind,
}

/// One `@name(value)` annotation attached to a todo item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataEntry {
    /// The tag as spelled in the buffer.
    pub tag: String,
    /// Tag name after alias resolution against configuration.
    pub canonical_name: String,
    pub value: String,
    /// Full extent of the annotation, `@` through `)`.
    pub range: Range,
    /// Exact span of the value, for in-place edits.
    pub value_range: ColSpan,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Entries in the order they appear on the line.
    pub entries: Vec<MetadataEntry>,
}

impl Metadata {
    /// Looks up an entry by canonical name.
    pub fn get(&self, canonical: &str) -> Option<&MetadataEntry> {
        self.entries.iter().find(|e| e.canonical_name == canonical)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A list entry carrying a state marker, optionally nested under another item.
///
/// Items are created only by a discovery pass and never mutated in place; a
/// new pass produces an entirely new [`TodoMap`], and consumers re-fetch by
/// id across any mutation boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: TodoId,
    /// Full extent of the item including all nested child lines.
    pub range: Range,
    /// The item's own first line.
    pub first_line_range: Range,
    /// First-line region after the todo marker: prose plus metadata. When
    /// the first line has no content this collapses to the single position
    /// past the marker where content would start.
    pub content_range: Range,
    /// State name, e.g. `unchecked`. Open set, resolved against config.
    pub state: String,
    pub marker: TodoMarker,
    pub list_marker: ListMarker,
    /// Byte column of the list marker; determines nesting depth together
    /// with the parent's content column.
    pub indent: usize,
    /// Weak back-reference: lookup only, no ownership.
    pub parent: Option<TodoId>,
    /// Child ids in document order.
    pub children: Vec<TodoId>,
    pub metadata: Metadata,
    /// First-line prose with the marker and metadata stripped.
    pub content_text: String,
}

impl TodoItem {
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// The hierarchical model of all todo items in a document.
///
/// Rebuilt wholesale by every discovery pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TodoMap {
    items: HashMap<TodoId, TodoItem>,
    roots: Vec<TodoId>,
}

impl TodoMap {
    pub(crate) fn from_parts(items: HashMap<TodoId, TodoItem>, roots: Vec<TodoId>) -> Self {
        Self { items, roots }
    }

    pub fn get(&self, id: TodoId) -> Option<&TodoItem> {
        self.items.get(&id)
    }

    /// Root item ids in document order.
    pub fn roots(&self) -> &[TodoId] {
        &self.roots
    }

    /// All items, in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &TodoItem> {
        self.items.values()
    }

    /// All items sorted by position in the document.
    pub fn in_document_order(&self) -> Vec<&TodoItem> {
        let mut items: Vec<&TodoItem> = self.items.values().collect();
        items.sort_by_key(|i| i.range.start);
        items
    }

    /// The innermost item whose extent covers `row`.
    pub fn at_row(&self, row: usize) -> Option<&TodoItem> {
        self.items
            .values()
            .filter(|i| i.range.contains_row(row))
            .max_by_key(|i| (i.indent, i.range.start))
    }

    /// The innermost item whose extent covers `pos`.
    pub fn at_pos(&self, pos: Pos) -> Option<&TodoItem> {
        self.items
            .values()
            .filter(|i| i.range.contains(pos))
            .max_by_key(|i| (i.indent, i.range.start))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
