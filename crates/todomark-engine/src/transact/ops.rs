//! Hunk builders for the common todo mutations.
//!
//! These are pure: they read an item snapshot and produce the edit, leaving
//! application to the document (or a transaction round).

use crate::config::{CHECKED, TodoConfig, UNCHECKED};
use crate::editing::TextDiffHunk;
use crate::models::TodoItem;

/// The edit that puts `item` into `state`, or `None` when the state is
/// unknown or already current.
///
/// The marker's spelling is preserved: an item written with a native
/// checkbox keeps the bracket form when the target state has one, otherwise
/// the state's glyph is written.
pub fn set_state(item: &TodoItem, cfg: &TodoConfig, state: &str) -> Option<TextDiffHunk> {
    let def = cfg.state(state)?;
    let uses_native = item.marker.text.starts_with('[');
    let spelling = match (&def.native, uses_native) {
        (Some(inner), true) => format!("[{inner}]"),
        _ => def.marker.clone(),
    };
    if spelling == item.marker.text {
        return None;
    }

    let row = item.marker.pos.row;
    let col = item.marker.pos.col;
    Some(TextDiffHunk::replace(
        row,
        col,
        row,
        col + item.marker.text.len(),
        vec![spelling],
    ))
}

/// Flips between the built-in checked and unchecked states. Any other
/// current state toggles to checked.
pub fn toggle(item: &TodoItem, cfg: &TodoConfig) -> Option<TextDiffHunk> {
    let target = if item.state == CHECKED { UNCHECKED } else { CHECKED };
    set_state(item, cfg, target)
}

/// Sets a metadata tag's value, editing it in place when the tag is already
/// present and appending `@tag(value)` to the item's first line otherwise.
///
/// `tag` is resolved through aliases before lookup, so writing via an alias
/// updates the canonical entry.
pub fn set_metadata(
    item: &TodoItem,
    cfg: &TodoConfig,
    tag: &str,
    value: &str,
) -> TextDiffHunk {
    let canonical = cfg.canonical_tag(tag);
    if let Some(entry) = item.metadata.get(canonical) {
        let span = &entry.value_range;
        return TextDiffHunk::replace(
            span.row,
            span.start,
            span.row,
            span.end,
            vec![value.to_string()],
        );
    }
    let end = item.first_line_range.end;
    TextDiffHunk::insert_at(end.row, end.col + 1, format!(" @{tag}({value})"))
}

/// Deletes a metadata annotation, or `None` when the item does not carry
/// the tag.
///
/// `line` is the item's first line; one adjacent separator space is deleted
/// with the annotation, so removing a tag appended by [`set_metadata`]
/// restores the pre-insertion text.
pub fn remove_metadata(
    item: &TodoItem,
    cfg: &TodoConfig,
    tag: &str,
    line: &str,
) -> Option<TextDiffHunk> {
    let canonical = cfg.canonical_tag(tag);
    let entry = item.metadata.get(canonical)?;
    let range = &entry.range;
    let mut start = range.start.col;
    let mut end = range.end.col + 1;
    if start > 0 && line.as_bytes().get(start - 1) == Some(&b' ') {
        start -= 1;
    } else if line.as_bytes().get(end) == Some(&b' ') {
        end += 1;
    }
    Some(TextDiffHunk::delete(range.start.row, start, range.end.row, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MetadataTagDef;
    use crate::editing::Document;
    use pretty_assertions::assert_eq;

    fn doc(text: &str) -> Document {
        Document::new(text, TodoConfig::default())
    }

    fn first(doc: &Document) -> TodoItem {
        doc.todos().in_document_order()[0].clone()
    }

    #[test]
    fn set_state_keeps_native_spelling() {
        let mut d = doc("- [ ] task\n");
        let hunk = set_state(&first(&d), d.config(), CHECKED).unwrap();
        d.apply_hunks(vec![hunk]);
        assert_eq!(d.text(), "- [x] task\n");
        assert_eq!(first(&d).state, CHECKED);
    }

    #[test]
    fn set_state_keeps_glyph_spelling() {
        let mut d = doc("- □ task\n");
        let hunk = set_state(&first(&d), d.config(), CHECKED).unwrap();
        d.apply_hunks(vec![hunk]);
        assert_eq!(d.text(), "- ✔ task\n");
    }

    #[test]
    fn set_state_is_none_when_already_there() {
        let d = doc("- [x] task\n");
        assert!(set_state(&first(&d), d.config(), CHECKED).is_none());
    }

    #[test]
    fn set_state_is_none_for_unknown_state() {
        let d = doc("- [ ] task\n");
        assert!(set_state(&first(&d), d.config(), "no-such-state").is_none());
    }

    #[test]
    fn toggle_round_trips() {
        let mut d = doc("- [ ] task\n");
        let hunk = toggle(&first(&d), d.config()).unwrap();
        d.apply_hunks(vec![hunk]);
        assert_eq!(first(&d).state, CHECKED);

        let hunk = toggle(&first(&d), d.config()).unwrap();
        d.apply_hunks(vec![hunk]);
        assert_eq!(first(&d).state, UNCHECKED);
        assert_eq!(d.text(), "- [ ] task\n");
    }

    #[test]
    fn set_metadata_appends_when_absent() {
        let mut d = doc("- [ ] task\n");
        let hunk = set_metadata(&first(&d), d.config(), "priority", "high");
        d.apply_hunks(vec![hunk]);
        assert_eq!(d.text(), "- [ ] task @priority(high)\n");
        let item = first(&d);
        assert_eq!(item.metadata.get("priority").unwrap().value, "high");
    }

    #[test]
    fn set_metadata_edits_value_in_place() {
        let mut d = doc("- [ ] task @priority(high) trailing\n");
        let hunk = set_metadata(&first(&d), d.config(), "priority", "low");
        d.apply_hunks(vec![hunk]);
        assert_eq!(d.text(), "- [ ] task @priority(low) trailing\n");
    }

    #[test]
    fn set_metadata_resolves_aliases() {
        let mut cfg = TodoConfig::default();
        cfg.register_tag(MetadataTagDef::new("priority"));
        cfg.register_tag(MetadataTagDef::alias("p", "priority"));
        let mut d = Document::new("- [ ] task @priority(high)\n", cfg);

        let hunk = set_metadata(&first(&d), d.config(), "p", "low");
        d.apply_hunks(vec![hunk]);
        assert_eq!(d.text(), "- [ ] task @priority(low)\n");
    }

    #[test]
    fn remove_metadata_deletes_annotation_and_separator() {
        let mut d = doc("- [ ] task @due(friday)\n");
        let line = d.line(0).unwrap();
        let hunk = remove_metadata(&first(&d), d.config(), "due", &line).unwrap();
        d.apply_hunks(vec![hunk]);
        assert_eq!(d.text(), "- [ ] task\n");
        assert!(first(&d).metadata.is_empty());
    }

    #[test]
    fn remove_metadata_round_trips_an_append() {
        let mut d = doc("- [ ] task\n");
        let hunk = set_metadata(&first(&d), d.config(), "due", "friday");
        d.apply_hunks(vec![hunk]);
        assert_eq!(d.text(), "- [ ] task @due(friday)\n");

        let line = d.line(0).unwrap();
        let hunk = remove_metadata(&first(&d), d.config(), "due", &line).unwrap();
        d.apply_hunks(vec![hunk]);
        assert_eq!(d.text(), "- [ ] task\n");
    }

    #[test]
    fn remove_metadata_of_interior_tag_keeps_single_spacing() {
        let mut d = doc("- [ ] task @p(1) trailing\n");
        let line = d.line(0).unwrap();
        let hunk = remove_metadata(&first(&d), d.config(), "p", &line).unwrap();
        d.apply_hunks(vec![hunk]);
        assert_eq!(d.text(), "- [ ] task trailing\n");
    }

    #[test]
    fn remove_metadata_is_none_when_absent() {
        let d = doc("- [ ] task\n");
        assert!(remove_metadata(&first(&d), d.config(), "due", "- [ ] task").is_none());
    }
}
