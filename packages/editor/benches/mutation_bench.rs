use autoletter_editor::{FormatTag, Mutation, Selection};
use autoletter_parser::parse;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn newsletter_body(paragraphs: usize) -> String {
    (0..paragraphs)
        .map(|i| {
            format!(
                "<p>Hi {{{{firstName}}}}, this is update <em>#{}</em> from <strong>{{{{company}}}}</strong>.</p>",
                i
            )
        })
        .collect()
}

fn toggle_bold_across_body(c: &mut Criterion) {
    let fragment = parse(&newsletter_body(100)).unwrap();
    let len = fragment.text_len();
    let selection = Selection::from_text_offsets(&fragment, 3, len - 3);
    let mutation = Mutation::ToggleFormat { tag: FormatTag::Bold };

    c.bench_function("toggle_bold_across_body", |b| {
        b.iter(|| mutation.apply(black_box(&fragment), Some(&selection)))
    });
}

fn insert_list_from_body(c: &mut Criterion) {
    let fragment = parse(&newsletter_body(100)).unwrap();
    let selection = Selection::from_text_offsets(&fragment, 0, fragment.text_len());
    let mutation = Mutation::InsertList { ordered: false };

    c.bench_function("insert_list_from_body", |b| {
        b.iter(|| mutation.apply(black_box(&fragment), Some(&selection)))
    });
}

fn insert_variable_at_caret(c: &mut Criterion) {
    let fragment = parse(&newsletter_body(100)).unwrap();
    let selection = Selection::caret_at_text_offset(&fragment, fragment.text_len() / 2);
    let mutation = Mutation::InsertVariable { name: "lastSeen".into() };

    c.bench_function("insert_variable_at_caret", |b| {
        b.iter(|| mutation.apply(black_box(&fragment), Some(&selection)))
    });
}

criterion_group!(benches, toggle_bold_across_body, insert_list_from_body, insert_variable_at_caret);
criterion_main!(benches);
