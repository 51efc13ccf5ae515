use crate::error::PreviewError;
use crate::sanitizer::sanitize;
use crate::substitute::{substitute, SampleValues};
use autoletter_parser::entities::escape_text;
use autoletter_parser::{parse, serialize};
use serde::{Deserialize, Serialize};
use tracing::debug;

const NO_SUBJECT: &str = "(No subject)";
const EMPTY_BODY: &str = "Start typing to see preview...";

/// Message headers shown above the body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Envelope {
    pub from_name: String,
    pub from_email: String,
    pub subject: String,
    /// Inbox snippet shown under the subject
    pub preview_text: String,
}

/// Options for page rendering
#[derive(Debug, Clone)]
pub struct PageOptions {
    /// Pretty print HTML
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
    /// Show the explanatory footer under the body
    pub footer: bool,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: "  ".to_string(),
            footer: true,
        }
    }
}

struct Context {
    options: PageOptions,
    depth: usize,
    buffer: String,
}

impl Context {
    fn new(options: PageOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        if self.options.pretty {
            self.add_indent();
        }
        self.add(text);
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn add_indent(&mut self) {
        let indent = self.options.indent.clone();
        for _ in 0..self.depth {
            self.add(&indent);
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

/// Substitute sample values, then sanitize. Returns the body markup a
/// recipient would see.
pub fn render_preview(html: &str, samples: &SampleValues) -> Result<String, PreviewError> {
    let substituted = substitute(html, samples);
    let mut fragment = parse(&substituted)?;

    let report = sanitize(&mut fragment);
    if !report.is_clean() {
        debug!(
            dropped = report.dropped_elements,
            unwrapped = report.unwrapped_elements,
            attributes = report.dropped_attributes,
            "stripped markup from preview"
        );
    }

    Ok(serialize(&fragment))
}

/// Render a standalone preview page: headers, sanitized body and footer
pub fn render_page(
    envelope: &Envelope,
    body_html: &str,
    samples: &SampleValues,
    options: PageOptions,
) -> Result<String, PreviewError> {
    let mut ctx = Context::new(options);

    let subject = if envelope.subject.trim().is_empty() {
        NO_SUBJECT
    } else {
        envelope.subject.as_str()
    };

    ctx.add_line("<!DOCTYPE html>");
    ctx.add_line("<html>");
    ctx.indent();

    render_head(subject, &mut ctx);

    ctx.add_line("<body>");
    ctx.indent();

    render_header(envelope, subject, &mut ctx);
    render_body(body_html, samples, &mut ctx)?;
    if ctx.options.footer {
        render_footer(&mut ctx);
    }

    ctx.dedent();
    ctx.add_line("</body>");

    ctx.dedent();
    ctx.add_line("</html>");

    Ok(ctx.get_output())
}

fn render_head(subject: &str, ctx: &mut Context) {
    ctx.add_line("<head>");
    ctx.indent();

    ctx.add_line("<meta charset=\"UTF-8\">");
    ctx.add_line("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">");
    ctx.add_line(&format!("<title>{}</title>", escape_text(subject)));

    ctx.dedent();
    ctx.add_line("</head>");
}

fn render_header(envelope: &Envelope, subject: &str, ctx: &mut Context) {
    ctx.add_line("<header class=\"preview-header\">");
    ctx.indent();

    ctx.add_line(&format!(
        "<div class=\"preview-from\">From: {} &lt;{}&gt;</div>",
        escape_text(&envelope.from_name),
        escape_text(&envelope.from_email)
    ));
    ctx.add_line(&format!("<div class=\"preview-subject\">{}</div>", escape_text(subject)));
    if !envelope.preview_text.is_empty() {
        ctx.add_line(&format!(
            "<div class=\"preview-text\">{}</div>",
            escape_text(&envelope.preview_text)
        ));
    }

    ctx.dedent();
    ctx.add_line("</header>");
}

fn render_body(body_html: &str, samples: &SampleValues, ctx: &mut Context) -> Result<(), PreviewError> {
    ctx.add_line("<main class=\"preview-body\">");
    ctx.indent();

    if body_html.trim().is_empty() {
        ctx.add_line(&format!("<p class=\"preview-placeholder\">{}</p>", EMPTY_BODY));
    } else {
        let body = render_preview(body_html, samples)?;
        ctx.add_line(&body);
    }

    ctx.dedent();
    ctx.add_line("</main>");
    Ok(())
}

fn render_footer(ctx: &mut Context) {
    ctx.add_line("<footer class=\"preview-footer\">");
    ctx.indent();
    ctx.add_line("<p>This is how your newsletter will appear to recipients.</p>");
    ctx.add_line("<p>Variables like {{firstName}} will be replaced with actual values.</p>");
    ctx.dedent();
    ctx.add_line("</footer>");
}
