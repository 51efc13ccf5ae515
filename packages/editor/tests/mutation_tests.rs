//! Behaviour of each mutation on small documents

use autoletter_editor::{Document, FormatTag, Mutation, MutationError, Selection};

fn select(doc: &Document, start: usize, end: usize) -> Selection {
    Selection::from_text_offsets(doc.fragment(), start, end)
}

#[test]
fn test_toggle_bold_scenario() {
    let mut doc = Document::from_html("<p>hello</p>").unwrap();

    let selection = select(&doc, 0, 5);
    let edit = doc.toggle_format(Some(&selection), FormatTag::Bold).unwrap();
    assert!(edit.html.contains("<strong>hello</strong>"));

    // Same text selected again in the new document
    let selection = select(&doc, 0, 5);
    let edit = doc.toggle_format(Some(&selection), FormatTag::Bold).unwrap();
    assert_eq!(edit.html, "<p>hello</p>");
}

#[test]
fn test_toggle_is_idempotent_for_mixed_content() {
    let original = "<p>Hi <em>there</em>, friend</p><ul><li>one</li><li>two</li></ul>";
    let mut doc = Document::from_html(original).unwrap();

    for (start, end) in [(0, 5), (3, 12), (4, 20), (0, 22)] {
        let selection = select(&doc, start, end);
        doc.toggle_format(Some(&selection), FormatTag::Bold).unwrap();
        assert_ne!(doc.html(), original, "range {}..{} should format", start, end);

        let selection = select(&doc, start, end);
        doc.toggle_format(Some(&selection), FormatTag::Bold).unwrap();
        assert_eq!(doc.html(), original, "range {}..{} should restore", start, end);
    }
}

#[test]
fn test_toggle_merges_partially_bold_text() {
    let mut doc = Document::from_html("<p>a<strong>b</strong>c</p>").unwrap();
    let selection = select(&doc, 0, 3);
    let edit = doc.toggle_format(Some(&selection), FormatTag::Bold).unwrap();

    assert_eq!(edit.html, "<p><strong>abc</strong></p>");
}

#[test]
fn test_toggle_leaves_separate_neighbours_alone() {
    for original in [
        "<p><em>a</em><em>b</em>cd</p>",
        r#"<p><a href="x">a</a><a href="x">b</a> cd</p>"#,
    ] {
        let mut doc = Document::from_html(original).unwrap();
        let len = doc.text_content().chars().count();

        let selection = select(&doc, len - 2, len);
        let edit = doc.toggle_format(Some(&selection), FormatTag::Bold).unwrap();
        assert!(edit.html.ends_with("<strong>cd</strong></p>"), "{}", edit.html);
        assert_eq!(edit.html.matches("</em>").count(), original.matches("</em>").count());
        assert_eq!(edit.html.matches("</a>").count(), original.matches("</a>").count());

        let selection = select(&doc, len - 2, len);
        doc.toggle_format(Some(&selection), FormatTag::Bold).unwrap();
        assert_eq!(doc.html(), original);
    }
}

#[test]
fn test_toggle_preserves_text_content() {
    let html = "<p>one <a href=\"https://x.com\">two</a></p><p>three</p><ul><li>four</li></ul>";
    for tag in [FormatTag::Bold, FormatTag::Italic] {
        for (start, end) in [(1, 6), (2, 11), (5, 16), (0, 18)] {
            let mut doc = Document::from_html(html).unwrap();
            let before = doc.text_content();
            let selection = select(&doc, start, end);

            doc.toggle_format(Some(&selection), tag).unwrap();
            assert_eq!(doc.text_content(), before);
        }
    }
}

#[test]
fn test_link_wraps_selected_text() {
    let mut doc = Document::from_html("<p>click here</p>").unwrap();
    let selection = select(&doc, 0, 10);
    let edit = doc.insert_link(Some(&selection), "https://x.com").unwrap();

    assert_eq!(
        edit.html,
        r#"<p><a href="https://x.com" target="_blank" rel="noopener noreferrer">click here</a></p>"#
    );
}

#[test]
fn test_link_inside_formatting_stays_formatted() {
    let mut doc = Document::from_html("<p>see <strong>the docs</strong> now</p>").unwrap();
    let selection = select(&doc, 4, 12);
    let edit = doc.insert_link(Some(&selection), "https://docs.example").unwrap();

    assert_eq!(
        edit.html,
        r#"<p>see <strong><a href="https://docs.example" target="_blank" rel="noopener noreferrer">the docs</a></strong> now</p>"#
    );
}

#[test]
fn test_link_across_formatting_uses_text_content() {
    let mut doc = Document::from_html("<p>see <strong>the docs</strong> now</p>").unwrap();
    let before = doc.text_content();
    let selection = select(&doc, 2, 14);
    let edit = doc.insert_link(Some(&selection), "https://docs.example").unwrap();

    assert_eq!(
        edit.html,
        r#"<p>se<a href="https://docs.example" target="_blank" rel="noopener noreferrer">e the docs n</a>ow</p>"#
    );
    assert_eq!(doc.text_content(), before);
}

#[test]
fn test_link_inside_link_replaces_it() {
    let mut doc = Document::from_html(r#"<p><a href="https://old.example">click</a></p>"#).unwrap();
    let selection = select(&doc, 0, 5);
    let edit = doc.insert_link(Some(&selection), "https://x.com").unwrap();

    assert_eq!(
        edit.html,
        r#"<p><a href="https://x.com" target="_blank" rel="noopener noreferrer">click</a></p>"#
    );
}

#[test]
fn test_link_on_part_of_a_link_never_nests() {
    let mut doc = Document::from_html(r#"<p>see <a href="https://old.example">the docs</a> now</p>"#).unwrap();
    let before = doc.text_content();
    let selection = select(&doc, 8, 12);
    let edit = doc.insert_link(Some(&selection), "https://x.com").unwrap();

    assert_eq!(
        edit.html,
        r#"<p>see the <a href="https://x.com" target="_blank" rel="noopener noreferrer">docs</a> now</p>"#
    );
    assert_eq!(edit.html.matches("<a ").count(), 1);
    assert_eq!(doc.text_content(), before);
}

#[test]
fn test_list_from_lines_drops_blank_ones() {
    let mut doc = Document::from_html("<p>a\nb\n\nc</p>").unwrap();
    let selection = select(&doc, 0, 6);
    let edit = doc.insert_list(Some(&selection), false).unwrap();

    assert_eq!(edit.html, "<ul><li>a</li><li>b</li><li>c</li></ul>");
    assert_eq!(edit.html.matches("<li>").count(), 3);
}

#[test]
fn test_ordered_list_from_paragraphs() {
    let mut doc = Document::from_html("<p>alpha</p><p>beta</p><p>tail</p>").unwrap();
    let selection = select(&doc, 0, 9);
    let edit = doc.insert_list(Some(&selection), true).unwrap();

    assert_eq!(edit.html, "<ol><li>alpha</li><li>beta</li></ol><p>tail</p>");
    assert_eq!(edit.cursor, select(&doc, 5, 5));
}

#[test]
fn test_list_from_blank_selection_is_placeholder() {
    let mut doc = Document::from_html("<p>x</p><p>   </p>").unwrap();
    let selection = Selection::new(
        autoletter_editor::BoundaryPoint::new(vec![1, 0], 0),
        autoletter_editor::BoundaryPoint::new(vec![1, 0], 3),
    );
    let edit = doc.insert_list(Some(&selection), false).unwrap();

    assert_eq!(edit.html, "<p>x</p><ul><li></li></ul>");
}

#[test]
fn test_unknown_variable_leaves_document() {
    let mut doc = Document::from_html("<p>Hi </p>").unwrap();
    let selection = select(&doc, 3, 3);
    let err = doc.insert_variable(Some(&selection), "unknownThing").unwrap_err();

    assert_eq!(
        err.as_mutation(),
        Some(&MutationError::UnknownVariable("unknownThing".into()))
    );
    assert_eq!(doc.html(), "<p>Hi </p>");
}

#[test]
fn test_variable_replaces_selection() {
    let mut doc = Document::from_html("<p>Hi NAME!</p>").unwrap();
    let selection = select(&doc, 3, 7);
    let edit = doc.insert_variable(Some(&selection), "firstName").unwrap();

    assert_eq!(edit.html, "<p>Hi {{firstName}}!</p>");
    assert_eq!(edit.cursor, select(&doc, 16, 16));
}

#[test]
fn test_variable_at_end_without_selection() {
    let mut doc = Document::from_html("Hi ").unwrap();
    let edit = doc.insert_variable(None, "firstName").unwrap();

    assert_eq!(edit.html, "Hi {{firstName}}");
}

#[test]
fn test_paste_replaces_across_elements() {
    let mut doc = Document::from_html("<p>ab<strong>cd</strong>ef</p>").unwrap();
    let selection = select(&doc, 1, 5);
    let edit = doc.paste_text(Some(&selection), "X").unwrap();

    assert_eq!(edit.html, "<p>aXf</p>");
    assert_eq!(edit.cursor, select(&doc, 2, 2));
}

#[test]
fn test_paste_normalizes_line_endings() {
    let mut doc = Document::from_html("<p></p>").unwrap();
    let caret = Selection::collapsed(autoletter_editor::BoundaryPoint::new(vec![0], 0));
    let edit = doc.paste_text(Some(&caret), "one\r\ntwo").unwrap();

    assert_eq!(edit.html, "<p>one\ntwo</p>");
}

#[test]
fn test_paste_turns_lone_carriage_returns_into_newlines() {
    let mut doc = Document::from_html("<p>ab</p>").unwrap();
    let caret = select(&doc, 1, 1);
    let edit = doc.paste_text(Some(&caret), "x\ry\r\nz").unwrap();

    assert_eq!(edit.html, "<p>ax\ny\nzb</p>");
    assert!(!doc.text_content().contains('\r'));
}

#[test]
fn test_operations_without_selection() {
    let mut doc = Document::from_html("<p>x</p>").unwrap();
    let mutations = [
        Mutation::ToggleFormat { tag: FormatTag::Bold },
        Mutation::InsertList { ordered: false },
        Mutation::InsertLink { url: "https://x.com".into() },
        Mutation::Unlink,
        Mutation::PasteText { text: "y".into() },
    ];

    for mutation in &mutations {
        let err = doc.apply(mutation, None).unwrap_err();
        assert_eq!(err.as_mutation(), Some(&MutationError::NoSelection), "{}", mutation.name());
    }
    assert_eq!(doc.version, 0);
}

#[test]
fn test_every_cursor_resolves_collapsed() {
    let html = "<p>Hello <em>big</em> world</p><p>second line</p>";
    let mutations = [
        Mutation::ToggleFormat { tag: FormatTag::Bold },
        Mutation::ToggleFormat { tag: FormatTag::Italic },
        Mutation::InsertList { ordered: true },
        Mutation::InsertLink { url: "https://x.com".into() },
        Mutation::Unlink,
        Mutation::InsertVariable { name: "lastSeen".into() },
        Mutation::PasteText { text: "pasted".into() },
    ];

    for mutation in &mutations {
        for (start, end) in [(0, 0), (3, 9), (6, 9), (10, 20), (0, 26)] {
            let doc = Document::from_html(html).unwrap();
            let selection = select(&doc, start, end);
            let edit = mutation.apply(doc.fragment(), Some(&selection)).unwrap();

            assert!(edit.cursor.is_collapsed());
            assert!(
                edit.cursor.resolves_in(&edit.fragment),
                "{} at {}..{} gave {:?}",
                mutation.name(),
                start,
                end,
                edit.cursor
            );
        }
    }
}
