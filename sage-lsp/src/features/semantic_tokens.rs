//! The semantic token pipeline: scan the document, then classify the stream.

use sage_analysis::classify_tokens;
use sage_scanner::{tokenize, Token};

/// Produces the fully classified token stream for a document.
///
/// This is the one entry point the server uses per semantic-tokens request;
/// all state lives inside the single pass and is discarded afterwards.
pub fn collect_semantic_tokens(text: &str) -> Vec<Token> {
    let mut tokens = tokenize(text);
    classify_tokens(&mut tokens);
    tokens
}
