use todomark_engine::{Document, TodoConfig, TodoItem};

/// Renders the discovered hierarchy as an indented outline, one item per
/// line, metadata in brackets.
fn outline(doc: &Document) -> String {
    let mut out = String::new();
    for item in doc.todos().in_document_order() {
        out.push_str(&"  ".repeat(depth(doc, item)));
        out.push_str(&item.state);
        out.push(' ');
        out.push_str(&item.content_text);
        for entry in &item.metadata.entries {
            out.push_str(&format!(" [{}={}]", entry.canonical_name, entry.value));
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}

fn depth(doc: &Document, item: &TodoItem) -> usize {
    let mut depth = 0;
    let mut cursor = item.parent;
    while let Some(id) = cursor {
        depth += 1;
        cursor = doc.todos().get(id).and_then(|p| p.parent);
    }
    depth
}

#[test]
fn grocery_list_outline() {
    let doc = Document::new(
        "# Shopping\n\
         \n\
         - [ ] Buy groceries @due(friday)\n\
         \x20 - [ ] milk\n\
         \x20 - [x] bread\n\
         \x20   rye if they have it\n\
         \n\
         Some prose between lists.\n\
         \n\
         - □ Call mom\n",
        TodoConfig::default(),
    );
    insta::assert_snapshot!(outline(&doc), @r"
    unchecked Buy groceries [due=friday]
      unchecked milk
      checked bread
    unchecked Call mom
    ");
}

#[test]
fn deep_nesting_and_dedent_outline() {
    let doc = Document::new(
        "- [ ] a\n\
         \x20 - [ ] b\n\
         \x20   - [ ] c\n\
         \x20 - [ ] d\n\
         - [ ] e\n",
        TodoConfig::default(),
    );
    insta::assert_snapshot!(outline(&doc), @r"
    unchecked a
      unchecked b
        unchecked c
      unchecked d
    unchecked e
    ");
}

#[test]
fn ordered_markers_host_todos() {
    let doc = Document::new("1. [ ] first\n2. [x] second\n", TodoConfig::default());
    insta::assert_snapshot!(outline(&doc), @r"
    unchecked first
    checked second
    ");
}

#[test]
fn content_lines_extend_item_extents() {
    let doc = Document::new(
        "- [ ] task\n\
         \x20 first continuation\n\
         \n\
         \x20 after a blank\n\
         unrelated prose\n",
        TodoConfig::default(),
    );
    let items = doc.todos().in_document_order();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].range.start.row, 0);
    assert_eq!(items[0].range.end.row, 3);
    assert_eq!(items[0].first_line_range.end.row, 0);
}

#[test]
fn discovery_is_structurally_idempotent() {
    let text = "- [ ] a @p(1)\n\
                \x20 - [x] b\n\
                \x20   prose\n\
                - □ c\n";
    let one = Document::new(text, TodoConfig::default());
    let two = Document::new(text, TodoConfig::default());
    // ids are freshly minted per document, but the structure is identical
    assert_eq!(outline(&one), outline(&two));

    // re-discovery inside one document keeps both structure and ids
    let mut three = one.clone();
    let before: Vec<_> = three.todos().in_document_order().iter().map(|i| i.id).collect();
    three.set_config(TodoConfig::default());
    let after: Vec<_> = three.todos().in_document_order().iter().map(|i| i.id).collect();
    assert_eq!(before, after);
    assert_eq!(outline(&one), outline(&three));
}

#[test]
fn at_row_returns_innermost_item() {
    let doc = Document::new(
        "- [ ] parent\n\
         \x20 - [ ] child\n\
         \x20   child prose\n",
        TodoConfig::default(),
    );
    let parent = doc.todos().at_row(0).unwrap();
    assert!(parent.is_root());

    let child = doc.todos().at_row(2).unwrap();
    assert_eq!(child.content_text, "child");
    assert_eq!(child.parent, Some(parent.id));
}
