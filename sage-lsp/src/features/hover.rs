//! Hover documentation for the word under the cursor.
//!
//! Resolution order mirrors the completion databases: documented builtin
//! functions, builtin classes (summarized from their method lists), methods
//! reached through a preceding dot, and finally keywords.

use lsp_types::{Position, Range};
use sage_analysis::builtins::{CLASSES, KEYWORDS};
use sage_analysis::docs::{
    format_hover_markdown, format_method_hover, get_function_doc, get_method_doc, METHOD_DOCS,
};
use tracing::debug;

pub struct HoverResult {
    pub contents: String,
    pub range: Option<Range>,
}

/// Produces hover documentation at the given position, if any.
pub fn hover<S: AsRef<str>>(lines: &[S], position: Position) -> Option<HoverResult> {
    let word = word_at_position(lines, position)?;
    debug!(word = %word, "hover request");

    if let Some(doc) = get_function_doc(&word) {
        let start = Position::new(position.line, position.character);
        let end = Position::new(position.line, position.character + word.chars().count() as u32);
        return Some(HoverResult {
            contents: format_hover_markdown(&word, doc),
            range: Some(Range::new(start, end)),
        });
    }

    if let Some(methods) = CLASSES.get(word.as_str()) {
        let mut method_list = methods
            .iter()
            .take(10)
            .copied()
            .collect::<Vec<_>>()
            .join(", ");
        if methods.len() > 10 {
            method_list.push_str(&format!(", ... ({} methods)", methods.len()));
        }
        return Some(HoverResult {
            contents: format!("### {word}\n\n**Class**\n\n**Methods:** {method_list}"),
            range: None,
        });
    }

    // A dot left of the cursor suggests a method access; the method name is
    // looked up across all documented classes.
    if cursor_prefix(lines, position).contains('.') {
        for (class_name, _) in METHOD_DOCS {
            if let Some(doc) = get_method_doc(class_name, &word) {
                return Some(HoverResult {
                    contents: format_method_hover(class_name, &word, doc),
                    range: None,
                });
            }
        }
    }

    if KEYWORDS.contains(word.as_str()) {
        return Some(HoverResult {
            contents: format!("### {word}\n\n**Python keyword**"),
            range: None,
        });
    }

    None
}

fn cursor_prefix<S: AsRef<str>>(lines: &[S], position: Position) -> String {
    lines
        .get(position.line as usize)
        .map(|line| {
            line.as_ref()
                .chars()
                .take(position.character as usize)
                .collect()
        })
        .unwrap_or_default()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// The identifier under the cursor, expanded in both directions.
fn word_at_position<S: AsRef<str>>(lines: &[S], position: Position) -> Option<String> {
    let chars: Vec<char> = lines.get(position.line as usize)?.as_ref().chars().collect();
    let mut start = (position.character as usize).min(chars.len());
    let mut end = start;
    while start > 0 && is_word_char(chars[start - 1]) {
        start -= 1;
    }
    while end < chars.len() && is_word_char(chars[end]) {
        end += 1;
    }
    (start < end).then(|| chars[start..end].iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(source: &str) -> Vec<&str> {
        source.lines().collect()
    }

    #[test]
    fn word_extraction_expands_both_directions() {
        let source = lines("x = factor(12)");
        assert_eq!(
            word_at_position(&source, Position::new(0, 6)),
            Some("factor".to_string())
        );
        assert_eq!(word_at_position(&source, Position::new(0, 2)), None);
        assert_eq!(word_at_position(&source, Position::new(5, 0)), None);
    }

    #[test]
    fn documented_function_hover_has_range_and_markdown() {
        let source = lines("x = factor(12)");
        let result = hover(&source, Position::new(0, 4)).expect("hover");
        assert!(result.contents.starts_with("### factor"));
        assert!(result.contents.contains("**Returns:**"));
        let range = result.range.expect("range");
        assert_eq!(range.start, Position::new(0, 4));
        assert_eq!(range.end, Position::new(0, 10));
    }

    #[test]
    fn builtin_class_hover_summarizes_methods() {
        let source = lines("ring = ZZ");
        let result = hover(&source, Position::new(0, 8)).expect("hover");
        assert!(result.contents.contains("**Class**"));
        assert!(result.contents.contains("quo"));
        assert!(result.range.is_none());
    }

    #[test]
    fn long_method_lists_are_truncated() {
        let source = lines("m = Matrix");
        let result = hover(&source, Position::new(0, 5)).expect("hover");
        assert!(result.contents.contains("... ("));
        assert!(result.contents.contains("methods)"));
    }

    #[test]
    fn method_after_dot_resolves_through_the_docs() {
        let source = lines("m.charpoly()");
        let result = hover(&source, Position::new(0, 3)).expect("hover");
        assert!(result.contents.starts_with("### Matrix.charpoly"));
    }

    #[test]
    fn method_name_without_dot_is_not_documented() {
        let source = lines("charpoly");
        assert!(hover(&source, Position::new(0, 2)).is_none());
    }

    #[test]
    fn keyword_hover() {
        let source = lines("lambda x: x");
        let result = hover(&source, Position::new(0, 3)).expect("hover");
        assert!(result.contents.contains("**Python keyword**"));
    }

    #[test]
    fn unknown_word_has_no_hover() {
        let source = lines("mystery_name");
        assert!(hover(&source, Position::new(0, 4)).is_none());
    }
}
