//! Scanning for `{{name}}` placeholders.

use crate::variables::MergeVariable;
use crate::visitor::Visitor;
use autoletter_parser::ast::{Attribute, Element, Fragment};
use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

/// Placeholder syntax shared by insertion and substitution
pub const TOKEN_PATTERN: &str = r"\{\{([A-Za-z_][A-Za-z0-9_]*)\}\}";

pub fn token_regex() -> &'static Regex {
    static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    TOKEN_RE.get_or_init(|| Regex::new(TOKEN_PATTERN).expect("token pattern is valid"))
}

/// A placeholder occurrence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRef {
    pub name: String,
    /// Byte range of the whole `{{...}}` within the scanned text
    pub range: Range<usize>,
    /// Registry entry, if the name is known
    pub variable: Option<MergeVariable>,
}

impl TokenRef {
    pub fn is_known(&self) -> bool {
        self.variable.is_some()
    }
}

/// Find every placeholder in a piece of text
pub fn find_tokens(text: &str) -> Vec<TokenRef> {
    token_regex()
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(1)?.as_str().to_string();
            let variable = MergeVariable::lookup(&name);
            Some(TokenRef {
                name,
                range: whole.range(),
                variable,
            })
        })
        .collect()
}

/// Placeholders found in text nodes and attribute values of a fragment.
///
/// Ranges are relative to the text node or attribute value they were found in.
#[derive(Debug, Default)]
pub struct TokenCollector {
    pub tokens: Vec<TokenRef>,
}

impl Visitor for TokenCollector {
    fn visit_attribute(&mut self, _element: &Element, attribute: &Attribute) {
        self.tokens.extend(find_tokens(&attribute.value));
    }

    fn visit_text(&mut self, text: &str) {
        self.tokens.extend(find_tokens(text));
    }
}

pub fn collect_tokens(fragment: &Fragment) -> Vec<TokenRef> {
    let mut collector = TokenCollector::default();
    collector.visit_fragment(fragment);
    collector.tokens
}
