//! Lexical scanning for SageMath source text.
//!
//! This crate turns raw document text into an ordered stream of
//! position-tagged tokens suitable for semantic highlighting. Positions are
//! delta-encoded the way the LSP semantic-token wire format expects, so the
//! downstream encoder is a trivial per-token transform.
//!
//! The scanner is deliberately not a parser: comments, numeric literals, and
//! string literals are recognized and consumed but never emitted, and the only
//! multi-line construct it understands is the triple-quoted block string.
//! Identifiers come out unclassified; assigning semantic kinds is the job of
//! the classifier in `sage-analysis`.

pub mod scan;
pub mod token;

pub use scan::{tokenize, tokenize_lines};
pub use token::{Modifier, Token, TokenKind};
