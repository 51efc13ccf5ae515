//! # Autoletter Parser
//!
//! The document fragment model shared by the editing engine and the preview
//! renderer, plus an HTML fragment tokenizer, parser and serializer.

pub mod ast;
pub mod entities;
pub mod error;
pub mod parser;
pub mod serializer;
pub mod tags;
pub mod tokenizer;

pub use ast::{Attribute, Element, Fragment, Node, NodePath};
pub use error::{ParseError, ParseResult};
pub use parser::{parse, Parser, MAX_DEPTH};
pub use serializer::{serialize, serialize_nodes, Serializer};
pub use tokenizer::{tokenize, Token};

#[cfg(feature = "pretty-errors")]
pub use error::format_error;
