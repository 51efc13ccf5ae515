use crate::ast::{Attribute, Element, Fragment, Node};
use crate::entities::decode_entities;
use crate::error::{ParseError, ParseResult};
use crate::tags::{is_block_tag, is_raw_text_tag, is_void_tag};
use crate::tokenizer::{AttrToken, Token};
use logos::Logos;
use std::ops::Range;

/// Maximum number of simultaneously open elements
pub const MAX_DEPTH: usize = 512;

type Spanned<'src> = (Result<Token<'src>, ()>, Range<usize>);

/// Tolerant HTML fragment parser.
///
/// Builds a [`Fragment`] the way a browser would for editor markup: unknown
/// tags are kept, unmatched end tags are ignored and elements still open at
/// the end of input are closed.
pub struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Spanned<'src>>,
    pos: usize,
    open: Vec<Element>,
    root: Vec<Node>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            tokens: lex_from(source, 0),
            pos: 0,
            open: Vec::new(),
            root: Vec::new(),
        }
    }

    /// Parse the whole source into a fragment
    pub fn parse_fragment(mut self) -> ParseResult<Fragment> {
        while let Some((token, span)) = self.advance() {
            match token {
                Ok(Token::StartTag(raw)) => self.start_tag(raw, span)?,
                Ok(Token::EndTag(raw)) => self.end_tag(raw),
                Ok(Token::Text(text)) => self.append(Node::Text(decode_entities(text).into_owned())),
                Ok(Token::LAngle) => self.append(Node::text("<")),
                Ok(Token::Comment(_)) | Ok(Token::Doctype) | Ok(Token::ProcessingInstruction) => {}
                Ok(Token::UnterminatedTag(raw)) => {
                    return Err(ParseError::invalid_syntax(
                        span.start,
                        format!("unterminated tag `{}`", raw),
                    ));
                }
                Err(()) => {
                    if self.source[span.clone()].starts_with("<!--") {
                        return Err(ParseError::unexpected_eof(
                            self.source.len(),
                            "`-->` to close the comment",
                        ));
                    }
                    return Err(ParseError::lexer_error(span.start));
                }
            }
        }

        while !self.open.is_empty() {
            self.close_top();
        }

        Ok(Fragment::from_children(self.root))
    }

    fn advance(&mut self) -> Option<Spanned<'src>> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn start_tag(&mut self, raw: &'src str, span: Range<usize>) -> ParseResult<()> {
        let (mut element, self_closing) = parse_start_tag(raw);
        self.close_implied(&element.tag);

        if is_raw_text_tag(&element.tag) && !self_closing {
            let body = self.take_raw_text(&element.tag, span.end);
            if !body.is_empty() {
                element.children.push(Node::text(body));
            }
            self.append(Node::Element(element));
            return Ok(());
        }

        if is_void_tag(&element.tag) || self_closing {
            self.append(Node::Element(element));
            return Ok(());
        }

        if self.open.len() >= MAX_DEPTH {
            return Err(ParseError::NestingTooDeep {
                pos: span.start,
                max: MAX_DEPTH,
            });
        }

        self.open.push(element);
        Ok(())
    }

    fn end_tag(&mut self, raw: &str) {
        let name = raw[2..raw.len() - 1]
            .split(|c: char| c.is_ascii_whitespace())
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();

        // Unmatched end tags are dropped
        let Some(index) = self.open.iter().rposition(|el| el.tag == name) else {
            return;
        };

        while self.open.len() > index {
            self.close_top();
        }
    }

    /// Close elements that a new start tag implicitly ends
    fn close_implied(&mut self, tag: &str) {
        let top = match self.open.last() {
            Some(el) => el.tag.as_str(),
            None => return,
        };

        let closes = (tag == "li" && top == "li") || (top == "p" && is_block_tag(tag));
        if closes {
            self.close_top();
        }
    }

    fn close_top(&mut self) {
        if let Some(el) = self.open.pop() {
            self.append(Node::Element(el));
        }
    }

    /// Consume verbatim content up to the matching end tag, then resume lexing after it
    fn take_raw_text(&mut self, tag: &str, from: usize) -> &'src str {
        let rest = &self.source[from..];
        let needle = format!("</{}", tag);

        let (body_end, resume) = match rest.to_ascii_lowercase().find(&needle) {
            Some(idx) => {
                let close = rest[idx..]
                    .find('>')
                    .map(|gt| idx + gt + 1)
                    .unwrap_or(rest.len());
                (idx, close)
            }
            None => (rest.len(), rest.len()),
        };

        self.tokens = lex_from(self.source, from + resume);
        self.pos = 0;

        &rest[..body_end]
    }

    fn append(&mut self, node: Node) {
        let children = match self.open.last_mut() {
            Some(el) => &mut el.children,
            None => &mut self.root,
        };
        push_node(children, node);
    }
}

fn lex_from(source: &str, offset: usize) -> Vec<Spanned<'_>> {
    Token::lexer(&source[offset..])
        .spanned()
        .map(|(token, span)| (token, span.start + offset..span.end + offset))
        .collect()
}

/// Append a node, merging adjacent text and dropping empty text
fn push_node(children: &mut Vec<Node>, node: Node) {
    if let Node::Text(text) = &node {
        if text.is_empty() {
            return;
        }
        if let Some(Node::Text(prev)) = children.last_mut() {
            prev.push_str(text);
            return;
        }
    }
    children.push(node);
}

/// Split a raw start tag into an element and its self-closing flag
fn parse_start_tag(raw: &str) -> (Element, bool) {
    let inner = &raw[1..raw.len() - 1];
    let name_end = inner
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == ':' || c == '-'))
        .unwrap_or(inner.len());

    let mut element = Element::new(inner[..name_end].to_ascii_lowercase());
    let mut rest = inner[name_end..].trim_end();

    // `<br/>` and `<img src="x" />`, but not the unquoted value in `<a href=x/>`
    let mut self_closing = false;
    if let Some(stripped) = rest.strip_suffix('/') {
        let before = stripped.chars().last();
        if matches!(before, None | Some('"') | Some('\'')) || before.is_some_and(|c| c.is_ascii_whitespace()) {
            self_closing = true;
            rest = stripped;
        }
    }

    element.attributes = parse_attributes(rest);
    (element, self_closing)
}

fn parse_attributes(source: &str) -> Vec<Attribute> {
    let mut attributes: Vec<Attribute> = Vec::new();
    let mut tokens = AttrToken::lexer(source).filter_map(Result::ok).peekable();

    while let Some(token) = tokens.next() {
        let name = match token {
            AttrToken::Word(word) => word.to_ascii_lowercase(),
            _ => continue,
        };

        let mut value = String::new();
        if tokens.peek() == Some(&AttrToken::Equals) {
            tokens.next();
            let raw_value = match tokens.peek() {
                Some(AttrToken::DoubleQuoted(v))
                | Some(AttrToken::SingleQuoted(v))
                | Some(AttrToken::Word(v)) => Some(decode_entities(v).into_owned()),
                _ => None,
            };
            if let Some(decoded) = raw_value {
                value = decoded;
                tokens.next();
            }
        }

        // First occurrence wins
        if !attributes.iter().any(|a| a.name == name) {
            attributes.push(Attribute { name, value });
        }
    }

    attributes
}

/// Parse an HTML fragment
pub fn parse(source: &str) -> ParseResult<Fragment> {
    Parser::new(source).parse_fragment()
}
