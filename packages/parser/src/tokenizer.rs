use logos::{Lexer, Logos};
use std::fmt;

/// Markup-level tokens of an HTML fragment
#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token<'src> {
    // Start tag, attributes included. Quoted values may contain '>'.
    #[regex(r#"<[a-zA-Z][a-zA-Z0-9:-]*([^>"']|"[^"]*"|'[^']*')*>"#, |lex| lex.slice())]
    StartTag(&'src str),

    #[regex(r"</[a-zA-Z][^>]*>", |lex| lex.slice())]
    EndTag(&'src str),

    #[token("<!--", comment_body)]
    Comment(&'src str),

    #[regex(r"<![a-zA-Z][^>]*>")]
    Doctype,

    #[regex(r"<\?[^>]*>")]
    ProcessingInstruction,

    // A start tag that never reaches its closing '>'
    #[regex(r"<[a-zA-Z][^>]*", |lex| lex.slice())]
    UnterminatedTag(&'src str),

    #[regex(r"[^<]+", |lex| lex.slice())]
    Text(&'src str),

    // A '<' that does not open markup ("a < b")
    #[token("<")]
    LAngle,
}

fn comment_body<'src>(lex: &mut Lexer<'src, Token<'src>>) -> Option<&'src str> {
    let rest = lex.remainder();
    let end = rest.find("-->")?;
    lex.bump(end + 3);
    Some(&rest[..end])
}

impl<'src> fmt::Display for Token<'src> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::StartTag(s) => write!(f, "start tag {}", s),
            Token::EndTag(s) => write!(f, "end tag {}", s),
            Token::Comment(_) => write!(f, "comment"),
            Token::Doctype => write!(f, "doctype"),
            Token::ProcessingInstruction => write!(f, "processing instruction"),
            Token::UnterminatedTag(s) => write!(f, "unterminated tag {}", s),
            Token::Text(s) => write!(f, "text {:?}", s),
            Token::LAngle => write!(f, "<"),
        }
    }
}

/// Tokens inside a start tag, after the tag name
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\x0C]+")]
pub enum AttrToken<'src> {
    #[token("=")]
    Equals,

    #[regex(r#""[^"]*""#, |lex| { let s = lex.slice(); &s[1..s.len() - 1] })]
    DoubleQuoted(&'src str),

    #[regex(r"'[^']*'", |lex| { let s = lex.slice(); &s[1..s.len() - 1] })]
    SingleQuoted(&'src str),

    // Attribute names and unquoted values
    #[regex(r#"[^ \t\n\r\x0C"'=<>`]+"#, |lex| lex.slice())]
    Word(&'src str),
}

/// Tokenize a source string
pub fn tokenize(source: &str) -> Vec<(Token<'_>, std::ops::Range<usize>)> {
    let lexer = Token::lexer(source);
    lexer
        .spanned()
        .filter_map(|(result, span)| result.ok().map(|token| (token, span)))
        .collect()
}
