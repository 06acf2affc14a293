//! Regex-driven scanner turning raw document text into delta-positioned
//! tokens.
//!
//! Patterns are tried in a fixed priority order at the current cursor:
//! whitespace, line comment, identifier, operator (longest first), numeric
//! literal, block-string opener, line-contained string. Anything that still
//! fails to match is logged and skipped one character at a time, so a bad
//! byte can never fail the whole request.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::error;

use crate::token::{Token, TokenKind};

static SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s+").unwrap());
static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#.*").unwrap());
static SYMBOL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_]\w*").unwrap());
static OP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(//|\^\^|==|!=|<=|>=|->|[-+*/%=<>.,:;()\[\]{}^|&])").unwrap());
// Prefixed forms go first so `0x1F` is consumed whole instead of as `0` + `x1F`.
static NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(0[xX][0-9a-fA-F]+|0[oO][0-7]+|0[bB][01]+|\d+(\.\d+)?[eE][-+]?\d+|\d+(\.\d+)?)")
        .unwrap()
});
static BLOCK_STRING_BEGIN: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^('''|""").*"#).unwrap());
static LINE_STRING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^('''.*?'''|'.*?'|""".*?"""|".*?")"#).unwrap());

/// Splits full document text into tokens, treating `\n` as line separators.
pub fn tokenize(text: &str) -> Vec<Token> {
    let lines: Vec<&str> = text.lines().collect();
    tokenize_lines(&lines)
}

/// Scans an ordered sequence of lines (no embedded newlines per line).
///
/// Every non-whitespace, non-comment, non-literal lexical unit is emitted in
/// source order: identifiers as `Unclassified`, punctuation as `Operator`.
pub fn tokenize_lines<S: AsRef<str>>(lines: &[S]) -> Vec<Token> {
    Scanner::default().run(lines)
}

#[derive(Default)]
struct Scanner {
    tokens: Vec<Token>,
    line: usize,
    col: usize,
    prev_line: usize,
    prev_col: usize,
}

impl Scanner {
    fn emit(&mut self, text: &str, kind: TokenKind) {
        let delta_line = (self.line - self.prev_line) as u32;
        let delta_start = if delta_line == 0 {
            (self.col - self.prev_col) as u32
        } else {
            self.col as u32
        };
        self.tokens.push(Token::new(delta_line, delta_start, text, kind));
        self.prev_line = self.line;
        self.prev_col = self.col;
        self.col += text.chars().count();
    }

    fn skip(&mut self, text: &str) {
        self.col += text.chars().count();
    }

    fn run<S: AsRef<str>>(mut self, lines: &[S]) -> Vec<Token> {
        while self.line < lines.len() {
            let mut rest: &str = lines[self.line].as_ref();
            self.col = 0;
            let mut chars_left = rest.chars().count();

            while !rest.is_empty() {
                if let Some(m) = SPACE.find(rest) {
                    self.skip(m.as_str());
                    rest = &rest[m.end()..];
                } else if let Some(m) = COMMENT.find(rest) {
                    self.skip(m.as_str());
                    rest = &rest[m.end()..];
                } else if let Some(m) = SYMBOL.find(rest) {
                    self.emit(m.as_str(), TokenKind::Unclassified);
                    rest = &rest[m.end()..];
                } else if let Some(m) = OP.find(rest) {
                    self.emit(m.as_str(), TokenKind::Operator);
                    rest = &rest[m.end()..];
                } else if let Some(m) = NUMBER.find(rest) {
                    self.skip(m.as_str());
                    rest = &rest[m.end()..];
                } else if let Some(m) = BLOCK_STRING_BEGIN.find(rest) {
                    let quote = &m.as_str()[..3];
                    self.skip(m.as_str());
                    rest = "";
                    self.line += 1;
                    // Walk whole lines until the matching closer; the
                    // remainder after the closer resumes normal scanning.
                    while self.line < lines.len() {
                        let line: &str = lines[self.line].as_ref();
                        self.col = 0;
                        chars_left = line.chars().count();
                        if let Some(pos) = line.rfind(quote) {
                            let end = pos + quote.len();
                            self.col = line[..end].chars().count();
                            rest = &line[end..];
                            break;
                        }
                        self.col = chars_left;
                        self.line += 1;
                    }
                } else if let Some(m) = LINE_STRING.find(rest) {
                    self.skip(m.as_str());
                    rest = &rest[m.end()..];
                } else {
                    let mut chars = rest.chars();
                    if let Some(ch) = chars.next() {
                        error!(
                            line = self.line,
                            column = self.col,
                            character = %ch,
                            "no pattern matched, skipping one character"
                        );
                        self.col += 1;
                        rest = chars.as_str();
                    }
                }

                // Termination guard: every pattern must consume something.
                let n = rest.chars().count();
                if n == chars_left {
                    error!(
                        line = self.line,
                        column = self.col,
                        remainder = rest,
                        "scanner made no progress, abandoning rest of line"
                    );
                    break;
                }
                chars_left = n;
            }

            self.line += 1;
        }
        self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    /// Replays delta encoding into absolute (line, column) pairs.
    fn absolute_positions(tokens: &[Token]) -> Vec<(u32, u32)> {
        let mut positions = Vec::new();
        let mut line = 0u32;
        let mut col = 0u32;
        for token in tokens {
            line += token.delta_line;
            col = if token.delta_line == 0 {
                col + token.delta_start
            } else {
                token.delta_start
            };
            positions.push((line, col));
        }
        positions
    }

    #[test]
    fn string_literals_are_consumed_not_emitted() {
        let tokens = tokenize("x = 'hello world'");
        assert_eq!(texts(&tokens), vec!["x", "="]);
    }

    #[test]
    fn comments_and_numbers_are_consumed() {
        let tokens = tokenize("x = 42  # the answer");
        assert_eq!(texts(&tokens), vec!["x", "="]);
    }

    #[test]
    fn prefixed_number_literals_are_consumed_whole() {
        for source in ["n = 0x1F", "n = 0o755", "n = 0b1010", "n = 1.5e-3"] {
            let tokens = tokenize(source);
            assert_eq!(texts(&tokens), vec!["n", "="], "source: {source}");
        }
    }

    #[test]
    fn identifiers_start_unclassified_and_operators_are_tagged() {
        let tokens = tokenize("y = f(x)");
        assert_eq!(texts(&tokens), vec!["y", "=", "f", "(", "x", ")"]);
        assert_eq!(tokens[0].kind, TokenKind::Unclassified);
        assert_eq!(tokens[1].kind, TokenKind::Operator);
        assert_eq!(tokens[2].kind, TokenKind::Unclassified);
    }

    #[test]
    fn two_character_operators_match_longest_first() {
        let tokens = tokenize("a // b ^^ c -> d != e");
        let ops: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Operator)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(ops, vec!["//", "^^", "->", "!="]);
    }

    #[test]
    fn delta_positions_reconstruct_source_coordinates() {
        let tokens = tokenize("a = b\n    c = d");
        assert_eq!(texts(&tokens), vec!["a", "=", "b", "c", "=", "d"]);
        assert_eq!(
            absolute_positions(&tokens),
            vec![(0, 0), (0, 2), (0, 4), (1, 4), (1, 6), (1, 8)]
        );
    }

    #[test]
    fn block_string_spans_lines_and_resumes_after_closer() {
        let tokens = tokenize("a = '''one\ntwo tokensless\nthree''' + b");
        assert_eq!(texts(&tokens), vec!["a", "=", "+", "b"]);
        assert_eq!(absolute_positions(&tokens), vec![(0, 0), (0, 2), (2, 9), (2, 11)]);
    }

    #[test]
    fn block_string_closer_kind_must_match_opener() {
        // The double-quoted closer on line 2 does not end a single-quoted block.
        let tokens = tokenize("'''\n\"\"\"\nend''' tail");
        assert_eq!(texts(&tokens), vec!["tail"]);
    }

    #[test]
    fn unterminated_block_string_consumes_rest_of_document() {
        let tokens = tokenize("x = '''open\nnever closed\nstill open");
        assert_eq!(texts(&tokens), vec!["x", "="]);
    }

    #[test]
    fn unknown_character_is_skipped_without_stalling() {
        let tokens = tokenize("a ? b\nc @ d");
        assert_eq!(texts(&tokens), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn empty_document_yields_no_tokens() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("\n\n").is_empty());
    }

    #[test]
    fn token_length_matches_text() {
        let tokens = tokenize("alpha == beta_2");
        for token in &tokens {
            assert_eq!(token.len_chars() as usize, token.text.chars().count());
        }
    }

    proptest! {
        #[test]
        fn scanning_arbitrary_input_terminates_with_valid_deltas(text in ".{0,400}") {
            let tokens = tokenize(&text);
            let positions = absolute_positions(&tokens);
            for pair in positions.windows(2) {
                prop_assert!(pair[1] >= pair[0], "positions must be non-decreasing");
            }
            for token in &tokens {
                prop_assert!(!token.text.is_empty());
            }
        }

        #[test]
        fn rescanning_is_deterministic(text in "[ -~\n]{0,300}") {
            prop_assert_eq!(tokenize(&text), tokenize(&text));
        }
    }
}
