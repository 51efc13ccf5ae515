//! Tag classification used by the parser, serializer and editing engine.

/// Elements that never have children or an end tag
pub const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements that start a new block in the flow of text
pub const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "details", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr",
    "li", "main", "nav", "ol", "p", "pre", "section", "table", "tbody", "td", "tfoot", "th",
    "thead", "tr", "ul",
];

/// Elements whose content is kept verbatim (no markup, no entity decoding)
pub const RAW_TEXT_TAGS: &[&str] = &["script", "style"];

pub fn is_void_tag(tag: &str) -> bool {
    VOID_TAGS.contains(&tag)
}

pub fn is_block_tag(tag: &str) -> bool {
    BLOCK_TAGS.contains(&tag)
}

pub fn is_raw_text_tag(tag: &str) -> bool {
    RAW_TEXT_TAGS.contains(&tag)
}

/// Blocks that may only hold phrasing content (a list cannot live inside them)
pub fn is_phrasing_block(tag: &str) -> bool {
    matches!(tag, "p" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "pre")
}
