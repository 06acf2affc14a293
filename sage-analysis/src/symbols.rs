//! Regex-driven extraction of user-defined symbols from raw document lines.
//!
//! This powers the outline view and user-symbol completion. It scans line by
//! line without building a syntax tree: declaration headers are matched with
//! anchored patterns, block extents are found by indentation, and assignment
//! values get a shallow type guess from their textual shape.

use lsp_types::SymbolKind;
use once_cell::sync::Lazy;
use regex::Regex;

static FUNCTION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)def\s+([A-Za-z_]\w*)\s*\(([^)]*)\)\s*(?:->([^:]+))?:").unwrap());
static CLASS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)class\s+([A-Za-z_]\w*)\s*(?:\(([^)]*)\))?:").unwrap());
static VARIABLE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)([A-Za-z_]\w*)\s*=\s*(.+)").unwrap());
static MULTI_ASSIGN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)([A-Za-z_]\w*(?:\s*,\s*[A-Za-z_]\w*)+)\s*=\s*(.+)").unwrap());
static FOR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)for\s+([A-Za-z_]\w*)\s+in\s").unwrap());
static WITH_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)with\s+.+\s+as\s+([A-Za-z_]\w*)\s*:").unwrap());
static SAGE_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"var\s*\(\s*['"]([^'"]+)['"]\s*\)"#).unwrap());
static RING_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(\s*)([A-Za-z_]\w*)(?:\.<([^>]+)>)?\s*=\s*(PolynomialRing|GF|Zmod|NumberField|QuadraticField|FunctionField|PowerSeriesRing)",
    )
    .unwrap()
});

/// Shape-based type guesses for assignment values, tried in order.
static TYPE_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"matrix\s*\(", "Matrix"),
        (r"Matrix\s*\(", "Matrix"),
        (r"vector\s*\(", "Vector"),
        (r"EllipticCurve\s*\(", "EllipticCurve"),
        (r"GF\s*\(", "FiniteField"),
        (r"Zmod\s*\(", "IntegerModRing"),
        (r"PolynomialRing\s*\(", "PolynomialRing"),
        (r"NumberField\s*\(", "NumberField"),
        (r"QuadraticField\s*\(", "QuadraticField"),
        (r"Graph\s*\(", "Graph"),
        (r"DiGraph\s*\(", "DiGraph"),
        (r"Ideal\s*\(", "Ideal"),
        (r"\.ideal\s*\(", "Ideal"),
        (r"Integer\s*\(", "Integer"),
        (r"Rational\s*\(", "Rational"),
        (r"RealNumber\s*\(", "RealNumber"),
        (r"\[\s*\[", "Matrix"),
        (r"\[.*\]", "list"),
        (r"\{.*\}", "dict"),
        (r"\(.*,.*\)", "tuple"),
        (r"range\s*\(", "range"),
        (r"set\s*\(", "set"),
        (r"frozenset\s*\(", "frozenset"),
        (r#""\s*""#, "str"),
        (r"'\s*'", "str"),
        (r"\d+\.\d+", "float"),
        (r"\d+", "int"),
        (r"True|False", "bool"),
        (r"None", "NoneType"),
    ]
    .into_iter()
    .map(|(pattern, name)| (Regex::new(pattern).unwrap(), name))
    .collect()
});

/// A user-defined symbol discovered in the document.
#[derive(Debug, Clone, PartialEq)]
pub struct UserSymbol {
    pub name: String,
    pub kind: SymbolKind,
    pub line: usize,
    pub character: usize,
    pub end_line: usize,
    pub end_character: usize,
    pub detail: String,
    pub docstring: Option<String>,
    pub signature: Option<String>,
    pub inferred_type: Option<String>,
}

impl UserSymbol {
    fn single_line(name: String, kind: SymbolKind, line: usize, character: usize, width: usize) -> Self {
        UserSymbol {
            name,
            kind,
            line,
            character,
            end_line: line,
            end_character: width,
            detail: String::new(),
            docstring: None,
            signature: None,
            inferred_type: None,
        }
    }
}

/// Extracts all user-defined symbols from the document, in source order.
pub fn extract_symbols<S: AsRef<str>>(lines: &[S]) -> Vec<UserSymbol> {
    let mut symbols = Vec::new();

    for (i, raw) in lines.iter().enumerate() {
        let line = raw.as_ref();
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if let Some(caps) = CLASS_PATTERN.captures(line) {
            symbols.push(extract_class(lines, i, &caps));
        } else if let Some(caps) = FUNCTION_PATTERN.captures(line) {
            symbols.push(extract_function(lines, i, &caps));
        } else if let Some(caps) = RING_PATTERN.captures(line) {
            symbols.extend(extract_ring_definition(line, i, &caps));
        } else if let Some(caps) = MULTI_ASSIGN_PATTERN.captures(line) {
            symbols.extend(extract_multi_assignment(line, i, &caps));
        } else if let Some(caps) = VARIABLE_PATTERN.captures(line) {
            symbols.push(extract_variable(line, i, &caps));
        } else if let Some(caps) = SAGE_VAR_PATTERN.captures(line) {
            symbols.extend(extract_sage_vars(line, i, &caps));
        } else if let Some(caps) = FOR_PATTERN.captures(line) {
            symbols.push(extract_binding(line, i, &caps, ": loop variable"));
        } else if let Some(caps) = WITH_PATTERN.captures(line) {
            symbols.push(extract_binding(line, i, &caps, ": context manager"));
        }
    }

    symbols
}

fn indent_width(caps: &regex::Captures<'_>) -> usize {
    caps.get(1).map(|m| m.as_str().len()).unwrap_or(0)
}

fn extract_function<S: AsRef<str>>(lines: &[S], line_num: usize, caps: &regex::Captures<'_>) -> UserSymbol {
    let indent = indent_width(caps);
    let name = caps[2].to_string();
    let params = caps.get(3).map(|m| m.as_str()).unwrap_or("");
    let mut signature = format!("def {name}({params})");
    if let Some(ret) = caps.get(4) {
        signature.push_str(&format!(" -> {}", ret.as_str().trim()));
    }
    UserSymbol {
        name,
        kind: SymbolKind::FUNCTION,
        line: line_num,
        character: indent,
        end_line: find_block_end(lines, line_num, indent),
        end_character: 0,
        detail: format!("({params})"),
        docstring: get_docstring(lines, line_num + 1),
        signature: Some(signature),
        inferred_type: None,
    }
}

fn extract_class<S: AsRef<str>>(lines: &[S], line_num: usize, caps: &regex::Captures<'_>) -> UserSymbol {
    let indent = indent_width(caps);
    let name = caps[2].to_string();
    let detail = caps
        .get(3)
        .map(|bases| format!("({})", bases.as_str()))
        .unwrap_or_default();
    UserSymbol {
        signature: Some(format!("class {name}{detail}")),
        name,
        kind: SymbolKind::CLASS,
        line: line_num,
        character: indent,
        end_line: find_block_end(lines, line_num, indent),
        end_character: 0,
        detail,
        docstring: get_docstring(lines, line_num + 1),
        inferred_type: None,
    }
}

fn extract_variable(line: &str, line_num: usize, caps: &regex::Captures<'_>) -> UserSymbol {
    let indent = indent_width(caps);
    let inferred = infer_type(caps[3].trim());
    let mut symbol = UserSymbol::single_line(
        caps[2].to_string(),
        SymbolKind::VARIABLE,
        line_num,
        indent,
        line.chars().count(),
    );
    if let Some(type_name) = inferred {
        symbol.detail = format!(": {type_name}");
        symbol.inferred_type = Some(type_name.to_string());
    }
    symbol
}

fn extract_multi_assignment(line: &str, line_num: usize, caps: &regex::Captures<'_>) -> Vec<UserSymbol> {
    let indent = indent_width(caps);
    caps[2]
        .split(',')
        .map(|name| {
            UserSymbol::single_line(
                name.trim().to_string(),
                SymbolKind::VARIABLE,
                line_num,
                indent,
                line.chars().count(),
            )
        })
        .collect()
}

fn extract_ring_definition(line: &str, line_num: usize, caps: &regex::Captures<'_>) -> Vec<UserSymbol> {
    let indent = indent_width(caps);
    let ring_type = caps[4].to_string();
    let mut ring = UserSymbol::single_line(
        caps[2].to_string(),
        SymbolKind::VARIABLE,
        line_num,
        indent,
        line.chars().count(),
    );
    ring.detail = format!(": {ring_type}");
    ring.inferred_type = Some(ring_type);
    let mut symbols = vec![ring];

    if let Some(generators) = caps.get(3) {
        for generator in generators.as_str().split(',') {
            let generator = generator.trim();
            if generator.is_empty() {
                continue;
            }
            let mut symbol = UserSymbol::single_line(
                generator.to_string(),
                SymbolKind::VARIABLE,
                line_num,
                indent,
                line.chars().count(),
            );
            symbol.detail = ": generator".to_string();
            symbol.inferred_type = Some("generator".to_string());
            symbols.push(symbol);
        }
    }
    symbols
}

fn extract_sage_vars(line: &str, line_num: usize, caps: &regex::Captures<'_>) -> Vec<UserSymbol> {
    caps[1]
        .split_whitespace()
        .filter_map(|name| {
            let name = name.trim_matches(',');
            if name.is_empty() {
                return None;
            }
            let mut symbol = UserSymbol::single_line(
                name.to_string(),
                SymbolKind::VARIABLE,
                line_num,
                0,
                line.chars().count(),
            );
            symbol.detail = ": symbolic".to_string();
            symbol.inferred_type = Some("SR".to_string());
            Some(symbol)
        })
        .collect()
}

fn extract_binding(line: &str, line_num: usize, caps: &regex::Captures<'_>, detail: &str) -> UserSymbol {
    let indent = indent_width(caps);
    let mut symbol = UserSymbol::single_line(
        caps[2].to_string(),
        SymbolKind::VARIABLE,
        line_num,
        indent,
        line.chars().count(),
    );
    symbol.detail = detail.to_string();
    symbol
}

fn infer_type(value: &str) -> Option<&'static str> {
    TYPE_PATTERNS
        .iter()
        .find(|(pattern, _)| pattern.is_match(value))
        .map(|(_, name)| *name)
}

/// Extracts the docstring starting at `start_line`, if any. Multi-line
/// docstrings are read up to twenty lines past the opener.
fn get_docstring<S: AsRef<str>>(lines: &[S], start_line: usize) -> Option<String> {
    let line = lines.get(start_line)?.as_ref().trim();

    for quote in ["\"\"\"", "'''"] {
        if let Some(body) = line.strip_prefix(quote) {
            if let Some(single) = body.strip_suffix(quote) {
                if !single.is_empty() {
                    return Some(single.trim().to_string());
                }
            }
            let mut docstring_lines = vec![body.to_string()];
            let end = (start_line + 20).min(lines.len());
            for follower in &lines[start_line + 1..end] {
                let follower = follower.as_ref();
                if let Some(pos) = follower.find(quote) {
                    docstring_lines.push(follower[..pos].to_string());
                    break;
                }
                docstring_lines.push(follower.trim().to_string());
            }
            return Some(docstring_lines.join("\n").trim().to_string());
        }
    }
    None
}

/// Finds the last line of the block opened at `start_line`, by indentation.
fn find_block_end<S: AsRef<str>>(lines: &[S], start_line: usize, base_indent: usize) -> usize {
    for (i, raw) in lines.iter().enumerate().skip(start_line + 1) {
        let line = raw.as_ref();
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let indent = line.len() - line.trim_start().len();
        if indent <= base_indent {
            return i - 1;
        }
    }
    lines.len().saturating_sub(1)
}
