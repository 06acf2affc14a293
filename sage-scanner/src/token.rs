//! Token data model shared by the scanner, the classifier, and the wire
//! encoding.

use std::fmt;

/// Semantic classification of a token.
///
/// `Unclassified` is a first-class state, not an error: anything the
/// classifier cannot resolve is left to the editor's native syntax
/// highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TokenKind {
    #[default]
    Unclassified,
    Operator,
    Function,
    Class,
    Method,
    Variable,
}

impl TokenKind {
    /// The LSP semantic token type name, or `None` for `Unclassified`.
    pub fn name(self) -> Option<&'static str> {
        match self {
            TokenKind::Unclassified => None,
            TokenKind::Operator => Some("operator"),
            TokenKind::Function => Some("function"),
            TokenKind::Class => Some("class"),
            TokenKind::Method => Some("method"),
            TokenKind::Variable => Some("variable"),
        }
    }
}

/// Semantic token modifier, in the order of the modifier legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Declaration,
    Definition,
    Readonly,
    Static,
    Deprecated,
    DefaultLibrary,
}

impl Modifier {
    /// The LSP semantic token modifier name.
    pub fn name(self) -> &'static str {
        match self {
            Modifier::Declaration => "declaration",
            Modifier::Definition => "definition",
            Modifier::Readonly => "readonly",
            Modifier::Static => "static",
            Modifier::Deprecated => "deprecated",
            Modifier::DefaultLibrary => "defaultLibrary",
        }
    }
}

/// A position-tagged lexical unit.
///
/// `delta_line` counts lines down from the previously emitted token.
/// `delta_start` is relative to the previous token's start column when
/// `delta_line == 0`, and absolute from the line start otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub delta_line: u32,
    pub delta_start: u32,
    pub text: String,
    pub kind: TokenKind,
    pub modifiers: Vec<Modifier>,
}

impl Token {
    pub fn new(delta_line: u32, delta_start: u32, text: impl Into<String>, kind: TokenKind) -> Self {
        Token {
            delta_line,
            delta_start,
            text: text.into(),
            kind,
            modifiers: Vec::new(),
        }
    }

    /// Character count of the token text, as required by the wire format.
    pub fn len_chars(&self) -> u32 {
        self.text.chars().count() as u32
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    /// Adds a modifier unless it is already present.
    pub fn add_modifier(&mut self, modifier: Modifier) {
        if !self.modifiers.contains(&modifier) {
            self.modifiers.push(modifier);
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "+{}:+{} {:?} {:?} {:?}",
            self.delta_line, self.delta_start, self.text, self.kind, self.modifiers
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unclassified_has_no_legend_name() {
        assert_eq!(TokenKind::Unclassified.name(), None);
        assert_eq!(TokenKind::Method.name(), Some("method"));
    }

    #[test]
    fn modifier_names_match_legend_spelling() {
        assert_eq!(Modifier::Readonly.name(), "readonly");
        assert_eq!(Modifier::DefaultLibrary.name(), "defaultLibrary");
    }

    #[test]
    fn add_modifier_deduplicates() {
        let mut token = Token::new(0, 0, "MAX", TokenKind::Variable);
        token.add_modifier(Modifier::Readonly);
        token.add_modifier(Modifier::Readonly);
        assert_eq!(token.modifiers, vec![Modifier::Readonly]);
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let token = Token::new(0, 0, "π_var", TokenKind::Unclassified);
        assert_eq!(token.len_chars(), 5);
    }
}
