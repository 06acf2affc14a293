//! Protocol-agnostic completion candidates.
//!
//! Candidates are assembled here and translated into `CompletionItem`s at the
//! server layer. Two contexts exist: member completion after a dot (methods of
//! the named builtin class) and global completion (user-defined symbols first,
//! then builtin functions, classes, and keywords).

use lsp_types::{CompletionItemKind, Position, SymbolKind};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::builtins::{CLASSES, FUNCTIONS, KEYWORDS};
use crate::docs::{get_function_doc, METHOD_DOCS};
use crate::symbols::extract_symbols;

static TRAILING_IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"([A-Za-z_]\w*)\s*$").unwrap());

/// A completion candidate that can be translated into protocol items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionCandidate {
    pub label: String,
    pub kind: CompletionItemKind,
    pub detail: Option<String>,
    pub documentation: Option<String>,
    pub insert_text: Option<String>,
    pub sort_text: Option<String>,
}

impl CompletionCandidate {
    fn new(label: impl Into<String>, kind: CompletionItemKind) -> Self {
        Self {
            label: label.into(),
            kind,
            detail: None,
            documentation: None,
            insert_text: None,
            sort_text: None,
        }
    }

    fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    fn with_insert_text(mut self, text: impl Into<String>) -> Self {
        self.insert_text = Some(text.into());
        self
    }

    fn with_sort_text(mut self, text: impl Into<String>) -> Self {
        self.sort_text = Some(text.into());
        self
    }
}

/// Completion context derived from the text left of the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
enum CompletionContext {
    /// `object.partial` member completion.
    Member { object: String, partial: String },
    /// Plain identifier completion, with whatever prefix was typed.
    Global { partial: String },
}

/// Produces completion candidates for the document at the given position.
pub fn completion_items<S: AsRef<str>>(lines: &[S], position: Position) -> Vec<CompletionCandidate> {
    match context_at(lines, position) {
        CompletionContext::Member { object, partial } => member_completions(&object, &partial),
        CompletionContext::Global { partial } => global_completions(lines, &partial),
    }
}

fn context_at<S: AsRef<str>>(lines: &[S], position: Position) -> CompletionContext {
    let prefix: String = lines
        .get(position.line as usize)
        .map(|line| {
            line.as_ref()
                .chars()
                .take(position.character as usize)
                .collect()
        })
        .unwrap_or_default();

    if let Some(last_dot) = prefix.rfind('.') {
        let before_dot = prefix[..last_dot].trim_end();
        let after_dot = &prefix[last_dot + 1..];
        if let Some(caps) = TRAILING_IDENTIFIER.captures(before_dot) {
            return CompletionContext::Member {
                object: caps[1].to_string(),
                partial: after_dot.to_string(),
            };
        }
    }

    let partial = TRAILING_IDENTIFIER
        .captures(&prefix)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default();
    CompletionContext::Global { partial }
}

fn matches_partial(name: &str, partial_lower: &str) -> bool {
    partial_lower.is_empty() || name.to_lowercase().starts_with(partial_lower)
}

fn member_completions(object: &str, partial: &str) -> Vec<CompletionCandidate> {
    let partial_lower = partial.to_lowercase();
    let mut items = Vec::new();

    // Documented methods for the class named like the object.
    if let Some((_, methods)) = METHOD_DOCS
        .iter()
        .find(|(class_name, _)| class_name.eq_ignore_ascii_case(object))
    {
        for (method_name, doc) in *methods {
            if matches_partial(method_name, &partial_lower) {
                items.push(
                    CompletionCandidate::new(*method_name, CompletionItemKind::METHOD)
                        .with_detail(doc.signature)
                        .with_documentation(doc.description)
                        .with_insert_text(format!("{method_name}()")),
                );
            }
        }
    }

    // Remaining methods from the builtin class table.
    if let Some(methods) = CLASSES.get(object) {
        for method in *methods {
            if matches_partial(method, &partial_lower)
                && !items.iter().any(|item| item.label == *method)
            {
                items.push(
                    CompletionCandidate::new(*method, CompletionItemKind::METHOD)
                        .with_detail(format!("{method}()"))
                        .with_insert_text(format!("{method}()")),
                );
            }
        }
    }

    items
}

fn global_completions<S: AsRef<str>>(lines: &[S], partial: &str) -> Vec<CompletionCandidate> {
    let partial_lower = partial.to_lowercase();
    let mut items = user_completions(lines, &partial_lower);

    for name in FUNCTIONS.iter() {
        if !matches_partial(name, &partial_lower) {
            continue;
        }
        let mut item = CompletionCandidate::new(*name, CompletionItemKind::FUNCTION)
            .with_insert_text(format!("{name}("));
        if let Some(doc) = get_function_doc(name) {
            item = item.with_detail(doc.signature).with_documentation(doc.description);
        }
        items.push(item);
    }

    for name in CLASSES.keys() {
        if !matches_partial(name, &partial_lower) {
            continue;
        }
        let mut item = CompletionCandidate::new(*name, CompletionItemKind::CLASS);
        if let Some(doc) = get_function_doc(name) {
            item = item.with_detail(doc.signature).with_documentation(doc.description);
        }
        items.push(item);
    }

    for keyword in KEYWORDS.iter() {
        if matches_partial(keyword, &partial_lower) {
            items.push(CompletionCandidate::new(*keyword, CompletionItemKind::KEYWORD));
        }
    }

    items
}

/// User-defined symbols sort before everything else.
fn user_completions<S: AsRef<str>>(lines: &[S], partial_lower: &str) -> Vec<CompletionCandidate> {
    extract_symbols(lines)
        .into_iter()
        .filter(|symbol| matches_partial(&symbol.name, partial_lower))
        .map(|symbol| {
            let (kind, insert_text) = if symbol.kind == SymbolKind::FUNCTION {
                (CompletionItemKind::FUNCTION, format!("{}(", symbol.name))
            } else if symbol.kind == SymbolKind::CLASS {
                (CompletionItemKind::CLASS, symbol.name.clone())
            } else {
                (CompletionItemKind::VARIABLE, symbol.name.clone())
            };
            let documentation = if let Some(docstring) = &symbol.docstring {
                Some(docstring.clone())
            } else if let Some(signature) = &symbol.signature {
                Some(format!("```python\n{signature}\n```"))
            } else {
                symbol
                    .inferred_type
                    .as_ref()
                    .map(|ty| format!("Type: `{ty}`"))
            };
            let detail = if symbol.detail.is_empty() {
                "(user-defined)".to_string()
            } else {
                symbol.detail.clone()
            };
            let mut item = CompletionCandidate::new(symbol.name.as_str(), kind)
                .with_detail(detail)
                .with_insert_text(insert_text)
                .with_sort_text(format!("0_{}", symbol.name));
            if let Some(documentation) = documentation {
                item = item.with_documentation(documentation);
            }
            item
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(source: &str) -> Vec<&str> {
        source.lines().collect()
    }

    fn at(line: u32, character: u32) -> Position {
        Position::new(line, character)
    }

    #[test]
    fn detects_member_context_after_dot() {
        let source = lines("M.ech");
        let context = context_at(&source, at(0, 5));
        assert_eq!(
            context,
            CompletionContext::Member {
                object: "M".to_string(),
                partial: "ech".to_string()
            }
        );
    }

    #[test]
    fn detects_global_context_with_prefix() {
        let source = lines("result = fact");
        let context = context_at(&source, at(0, 13));
        assert_eq!(
            context,
            CompletionContext::Global {
                partial: "fact".to_string()
            }
        );
    }

    #[test]
    fn member_completion_merges_docs_and_class_methods() {
        let items = member_completions("Matrix", "");
        let det = items.iter().find(|i| i.label == "det").expect("det");
        assert_eq!(det.kind, CompletionItemKind::METHOD);
        assert_eq!(det.detail.as_deref(), Some("det()"));
        assert!(det.documentation.is_some());
        // nrows has no doc entry but is in the builtin method list.
        let nrows = items.iter().find(|i| i.label == "nrows").expect("nrows");
        assert!(nrows.documentation.is_none());
        // No duplicates for methods present in both sources.
        assert_eq!(items.iter().filter(|i| i.label == "det").count(), 1);
    }

    #[test]
    fn member_completion_respects_partial_prefix() {
        let items = member_completions("Matrix", "eig");
        assert!(!items.is_empty());
        assert!(items.iter().all(|i| i.label.starts_with("eig")));
    }

    #[test]
    fn global_completion_lists_functions_classes_and_keywords() {
        let items = completion_items(&lines(""), at(0, 0));
        assert!(items.iter().any(|i| i.label == "factor" && i.kind == CompletionItemKind::FUNCTION));
        assert!(items.iter().any(|i| i.label == "Matrix" && i.kind == CompletionItemKind::CLASS));
        assert!(items.iter().any(|i| i.label == "lambda" && i.kind == CompletionItemKind::KEYWORD));
    }

    #[test]
    fn global_completion_filters_by_prefix() {
        let items = completion_items(&lines("is_p"), at(0, 4));
        assert!(items.iter().any(|i| i.label == "is_prime"));
        assert!(items.iter().all(|i| i.label.to_lowercase().starts_with("is_p")));
    }

    #[test]
    fn user_symbols_come_first_with_sort_priority() {
        let source = lines("def attack(ct):\n    pass\nat");
        let items = completion_items(&source, at(2, 2));
        let user = items.iter().find(|i| i.label == "attack").expect("attack");
        assert_eq!(user.kind, CompletionItemKind::FUNCTION);
        assert_eq!(user.sort_text.as_deref(), Some("0_attack"));
        assert_eq!(user.insert_text.as_deref(), Some("attack("));
    }

    #[test]
    fn function_insert_text_opens_call_parenthesis() {
        let items = completion_items(&lines("gc"), at(0, 2));
        let gcd = items.iter().find(|i| i.label == "gcd").expect("gcd");
        assert_eq!(gcd.insert_text.as_deref(), Some("gcd("));
        assert_eq!(gcd.detail.as_deref(), Some("gcd(a, b=None)"));
    }

    #[test]
    fn position_past_line_end_is_global_with_empty_prefix() {
        let items = completion_items(&lines(""), at(7, 3));
        assert!(!items.is_empty());
    }
}
