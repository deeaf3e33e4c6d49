use std::collections::HashMap;

use uuid::Uuid;
use xi_rope::Rope;
use xi_rope::delta::Builder;

use crate::config::TodoConfig;
use crate::editing::anchors::AnchorTable;
use crate::editing::hunk::{self, TextDiffHunk};
use crate::editing::patch::Patch;
use crate::models::{TodoItem, TodoMap};
use crate::parsing;

/// Identity of a document, shared by clones and used for transaction
/// exclusivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(Uuid);

impl DocumentId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("document is not valid UTF-8")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

/// A text buffer plus the todo model discovered from it.
///
/// The xi-rope buffer is the single source of truth; the todo map and the
/// anchor table are derived state, rebuilt after every edit batch. Todo ids
/// ride through edits on marker-offset anchors, so an item keeps its id as
/// long as its marker survives.
#[derive(Clone)]
pub struct Document {
    id: DocumentId,
    buffer: Rope,
    version: u64,
    config: TodoConfig,
    anchors: AnchorTable,
    todos: TodoMap,
}

impl Document {
    pub fn new(text: &str, config: TodoConfig) -> Self {
        let mut doc = Self {
            id: DocumentId::new(),
            buffer: Rope::from(text),
            version: 0,
            config,
            anchors: AnchorTable::default(),
            todos: TodoMap::default(),
        };
        doc.refresh();
        doc
    }

    pub fn from_bytes(bytes: &[u8], config: TodoConfig) -> Result<Self, DocumentError> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::new(text, config))
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn config(&self) -> &TodoConfig {
        &self.config
    }

    /// Swaps the configuration and re-discovers under the new one.
    pub fn set_config(&mut self, config: TodoConfig) {
        self.config = config;
        self.refresh();
    }

    pub fn todos(&self) -> &TodoMap {
        &self.todos
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn line_count(&self) -> usize {
        self.buffer.line_of_offset(self.buffer.len()) + 1
    }

    /// One line's text without its trailing newline. `None` past the end.
    pub fn line(&self, row: usize) -> Option<String> {
        let last = self.buffer.line_of_offset(self.buffer.len());
        if row > last {
            return None;
        }
        let start = self.buffer.offset_of_line(row);
        let end = if row < last {
            self.buffer.offset_of_line(row + 1).saturating_sub(1)
        } else {
            self.buffer.len()
        };
        Some(self.buffer.slice_to_cow(start..end).into_owned())
    }

    /// Applies one batch of non-overlapping hunks atomically.
    ///
    /// Hunks are applied bottom-to-top so coordinates stay valid without
    /// cross-hunk adjustment; anchors are carried through every delta. The
    /// whole batch is one version step and one re-discovery.
    pub fn apply_hunks(&mut self, hunks: Vec<TextDiffHunk>) -> Patch {
        if hunks.is_empty() {
            return Patch {
                changed: Vec::new(),
                version: self.version,
            };
        }

        let hunks = hunk::sort_for_apply(hunks);
        let mut changed = Vec::with_capacity(hunks.len());
        for h in &hunks {
            let (range, text) = hunk::resolve(h, &self.buffer);
            if range.is_empty() && text.is_empty() {
                continue;
            }
            let mut builder = Builder::new(self.buffer.len());
            if text.is_empty() {
                builder.delete(range.clone());
            } else {
                builder.replace(range.clone(), Rope::from(text.as_str()));
            }
            let delta = builder.build();
            self.anchors.transform(&delta);
            self.buffer = delta.apply(&self.buffer);
            changed.push(range.start..range.start + text.len());
        }

        self.version += 1;
        self.refresh();
        Patch {
            changed,
            version: self.version,
        }
    }

    /// Re-discovers the todo model and rebinds identities.
    fn refresh(&mut self) {
        let discovered = parsing::discover(&self.buffer, &self.config);
        let offsets: Vec<usize> = discovered.iter().map(|d| d.marker_offset).collect();
        let ids = self.anchors.rebind(&offsets);

        let mut items = HashMap::with_capacity(discovered.len());
        let mut roots = Vec::new();
        for (d, &id) in discovered.into_iter().zip(&ids) {
            if d.parent.is_none() {
                roots.push(id);
            }
            items.insert(
                id,
                TodoItem {
                    id,
                    range: d.range,
                    first_line_range: d.first_line_range,
                    content_range: d.content_range,
                    state: d.state,
                    marker: d.marker,
                    list_marker: d.list_marker,
                    indent: d.indent,
                    parent: d.parent.map(|i| ids[i]),
                    children: d.children.iter().map(|&i| ids[i]).collect(),
                    metadata: d.metadata,
                    content_text: d.content_text,
                },
            );
        }
        self.todos = TodoMap::from_parts(items, roots);
        tracing::debug!(
            document = %self.id,
            version = self.version,
            items = self.todos.len(),
            "document reparsed"
        );
    }
}
