use crate::{render_page, render_preview, Envelope, PageOptions, PreviewError, SampleValues};

fn envelope() -> Envelope {
    Envelope {
        from_name: "Dana".to_string(),
        from_email: "dana@acme.io".to_string(),
        subject: "Checking in, {{firstName}}".to_string(),
        preview_text: "Quick question".to_string(),
    }
}

#[test]
fn test_preview_substitutes_defaults() {
    let html = render_preview("<p>Hi {{firstName}}</p>", &SampleValues::default()).expect("Failed to render");
    assert_eq!(html, "<p>Hi John</p>");
}

#[test]
fn test_preview_full_body() {
    let body = concat!(
        "<p>Hi {{firstName}}, <strong>{{company}}</strong> was last seen {{lastSeen}}.</p>",
        r#"<p><a href="{{unsubscribeUrl}}">Unsubscribe</a> {{nickname}}</p>"#
    );
    let html = render_preview(body, &SampleValues::default()).expect("Failed to render");

    assert_eq!(
        html,
        concat!(
            "<p>Hi John, <strong>Acme Corp</strong> was last seen 2 days ago.</p>",
            r##"<p><a href="#unsubscribe">Unsubscribe</a> {{nickname}}</p>"##
        )
    );
}

#[test]
fn test_preview_with_overrides() {
    let samples = SampleValues::default().with_overrides([("firstName", "Ada")]);
    let html = render_preview("<p>{{firstName}} / {{company}}</p>", &samples).expect("Failed to render");
    assert_eq!(html, "<p>Ada / Acme Corp</p>");
}

#[test]
fn test_sample_values_are_sanitized() {
    let samples = SampleValues::default().with_overrides([("firstName", r#"<img src="x" onerror="alert(1)">Eve"#)]);
    let html = render_preview("<p>Hi {{firstName}}</p>", &samples).expect("Failed to render");
    assert_eq!(html, "<p>Hi Eve</p>");
}

#[test]
fn test_editor_links_survive() {
    let body = r#"<p>See <a href="https://x.com" target="_blank" rel="noopener noreferrer">the docs</a></p>"#;
    let html = render_preview(body, &SampleValues::default()).expect("Failed to render");
    assert_eq!(html, body);
}

#[test]
fn test_preview_reports_bad_markup() {
    let err = render_preview("<p>unterminated <a href=\"x", &SampleValues::default()).unwrap_err();
    assert!(matches!(err, PreviewError::Parse(_)));
}

#[test]
fn test_render_page() {
    let html = render_page(
        &envelope(),
        "<p onclick=\"x()\">Hello {{firstName}}</p>",
        &SampleValues::default(),
        PageOptions::default(),
    )
    .expect("Failed to render");

    println!("Generated HTML:\n{}", html);

    assert!(html.starts_with("<!DOCTYPE html>\n<html>\n"));
    assert!(html.contains("  <head>\n"));
    assert!(html.contains("From: Dana &lt;dana@acme.io&gt;"));
    // The subject is shown as written
    assert!(html.contains("<div class=\"preview-subject\">Checking in, {{firstName}}</div>"));
    assert!(html.contains("<div class=\"preview-text\">Quick question</div>"));
    assert!(html.contains("      <p>Hello John</p>\n"));
    assert!(html.contains("This is how your newsletter will appear to recipients."));
    assert!(!html.contains("onclick"));
}

#[test]
fn test_render_page_placeholders() {
    let html = render_page(
        &Envelope::default(),
        "  ",
        &SampleValues::default(),
        PageOptions::default(),
    )
    .expect("Failed to render");

    assert!(html.contains("<title>(No subject)</title>"));
    assert!(html.contains("<div class=\"preview-subject\">(No subject)</div>"));
    assert!(html.contains("Start typing to see preview..."));
    assert!(!html.contains("preview-text"));
}

#[test]
fn test_render_page_compact() {
    let options = PageOptions {
        pretty: false,
        footer: false,
        ..PageOptions::default()
    };
    let html = render_page(&envelope(), "<p>x</p>", &SampleValues::default(), options).expect("Failed to render");

    assert!(!html.contains('\n'));
    assert!(html.contains("<main class=\"preview-body\"><p>x</p></main>"));
    assert!(!html.contains("preview-footer"));
}

#[test]
fn test_envelope_escaped() {
    let envelope = Envelope {
        from_name: "A & B".to_string(),
        subject: "<b>Sale</b>".to_string(),
        ..Envelope::default()
    };
    let html = render_page(&envelope, "", &SampleValues::default(), PageOptions::default()).expect("Failed to render");

    assert!(html.contains("From: A &amp; B &lt;&gt;"));
    assert!(html.contains("<title>&lt;b&gt;Sale&lt;/b&gt;</title>"));
}

#[test]
fn test_envelope_from_json() {
    let envelope: Envelope = serde_json::from_str(r#"{"fromName":"Dana","subject":"Hi"}"#).unwrap();
    assert_eq!(envelope.from_name, "Dana");
    assert_eq!(envelope.from_email, "");
    assert_eq!(envelope.preview_text, "");
}
