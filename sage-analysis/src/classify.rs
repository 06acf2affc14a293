//! Single-pass semantic classification of the raw token stream.
//!
//! One forward walk assigns each identifier token a kind (function, class,
//! method, variable) and modifiers, growing pass-local symbol tables as
//! declarations are observed: `def`, `class`, `import`/`from`, assignment,
//! `for` targets, and the Sage ring-definition form `R.<x,y> = Ring(...)`.
//! All lookahead and lookback is bounded and guarded; when a rule cannot
//! fire, the affected token simply stays unclassified.

use std::collections::{HashMap, HashSet};

use sage_scanner::{Modifier, Token, TokenKind};
use tracing::debug;

use crate::builtins::{CLASSES, FUNCTIONS, KEYWORDS};

/// Classifies each token in place.
///
/// Tables start as fresh copies of the builtin seed vocabulary and are
/// discarded when the pass ends, so rerunning over a freshly scanned stream
/// always produces identical assignments.
pub fn classify_tokens(tokens: &mut [Token]) {
    let mut classifier = Classifier {
        tokens,
        tables: SymbolTables::seeded(),
    };
    classifier.run();
    debug!(
        functions = classifier.tables.functions.len(),
        classes = classifier.tables.classes.len(),
        variables = classifier.tables.variables.len(),
        constants = classifier.tables.constants.len(),
        "classification pass finished"
    );
}

/// Per-class knowledge accumulated during a pass.
#[derive(Debug, Clone, Default)]
struct ClassEntry {
    methods: HashSet<String>,
    /// Property name to inferred type name; empty string when unknown.
    properties: HashMap<String, String>,
}

/// Pass-local lookup state.
#[derive(Debug, Clone)]
struct SymbolTables {
    functions: HashSet<String>,
    classes: HashMap<String, ClassEntry>,
    /// Variable name to inferred class name; empty string when unknown.
    variables: HashMap<String, String>,
    constants: HashSet<String>,
    /// The most recently declared class; `self.member` resolves against it.
    active_class: Option<String>,
}

impl SymbolTables {
    fn seeded() -> Self {
        let functions = FUNCTIONS.iter().map(|name| name.to_string()).collect();
        let classes = CLASSES
            .iter()
            .map(|(name, methods)| {
                let entry = ClassEntry {
                    methods: methods.iter().map(|m| m.to_string()).collect(),
                    properties: HashMap::new(),
                };
                (name.to_string(), entry)
            })
            .collect();
        SymbolTables {
            functions,
            classes,
            variables: HashMap::new(),
            constants: HashSet::new(),
            active_class: None,
        }
    }
}

fn is_constant_name(text: &str) -> bool {
    text == text.to_uppercase()
}

struct Classifier<'a> {
    tokens: &'a mut [Token],
    tables: SymbolTables,
}

impl Classifier<'_> {
    fn text(&self, idx: usize) -> Option<&str> {
        self.tokens.get(idx).map(|t| t.text.as_str())
    }

    /// Whether the token at `idx` sits on the same line as its predecessor.
    fn same_line(&self, idx: usize) -> bool {
        self.tokens.get(idx).is_some_and(|t| t.delta_line == 0)
    }

    fn run(&mut self) {
        for i in 0..self.tokens.len() {
            match self.tokens[i].kind {
                TokenKind::Unclassified => self.resolve(i),
                TokenKind::Operator if self.tokens[i].text == "=" => self.backfill_assignment(i),
                _ => {}
            }
        }
    }

    /// Rule priority for an as-yet-unclassified token: keyword side effects,
    /// the ring-definition pattern, then plain table lookup.
    fn resolve(&mut self, i: usize) {
        let text = self.tokens[i].text.clone();
        if KEYWORDS.contains(text.as_str()) {
            self.keyword_side_effects(i, &text);
        } else if self.text(i + 1) == Some(".") && self.text(i + 2) == Some("<") {
            self.ring_definition(i);
        } else if self.tables.functions.contains(&text) {
            self.tokens[i].kind = TokenKind::Function;
        } else if self.tables.classes.contains_key(&text) {
            self.tokens[i].kind = TokenKind::Class;
        } else if self.tables.variables.contains_key(&text) {
            self.tokens[i].kind = TokenKind::Variable;
            if self.tables.constants.contains(&text) {
                self.tokens[i].add_modifier(Modifier::Readonly);
            }
            self.member_access(i, &text);
        }
    }

    /// Keyword tokens stay unclassified (native keyword coloring wins) but
    /// update the tables for what follows on the same line.
    fn keyword_side_effects(&mut self, i: usize, keyword: &str) {
        match keyword {
            "class" => {
                if self.same_line(i + 1) {
                    if let Some(name) = self.text(i + 1).map(str::to_string) {
                        self.tables.classes.insert(name.clone(), ClassEntry::default());
                        self.tables.active_class = Some(name);
                    }
                }
            }
            "from" => self.walk_module_path(i),
            "import" => self.walk_import_targets(i),
            "def" => self.function_definition(i),
            "self" => self.self_member(i),
            "for" => self.loop_targets(i),
            _ => {}
        }
    }

    /// Walks the dotted module path after `from`, classifying each component
    /// as a class. The walk stops at the first token that does not continue
    /// the path (usually `import`); the names after it are handled when the
    /// `import` keyword itself is reached.
    fn walk_module_path(&mut self, i: usize) {
        let mut off = 1;
        while self.same_line(i + off) {
            if self.text(i + off) != Some("*")
                && self.tokens[i + off].kind == TokenKind::Unclassified
            {
                self.tokens[i + off].kind = TokenKind::Class;
            }
            off += 1;
            if self.same_line(i + off) && self.text(i + off) == Some(".") {
                off += 1;
            } else {
                break;
            }
        }
    }

    /// Walks the rest of the line after `import`, classifying every
    /// identifier as a class. The last walked name (the `as` alias when one
    /// is present) is registered as an opaque class entry.
    fn walk_import_targets(&mut self, i: usize) {
        let mut off = 1;
        let mut walked: Option<String> = None;
        while self.same_line(i + off) {
            let Some(text) = self.text(i + off).map(str::to_string) else {
                break;
            };
            if text == "as" {
                off += 1;
                if self.same_line(i + off) {
                    if let Some(alias) = self.text(i + off).map(str::to_string) {
                        if alias != "*" {
                            if self.tokens[i + off].kind == TokenKind::Unclassified {
                                self.tokens[i + off].kind = TokenKind::Class;
                            }
                            walked = Some(alias);
                        }
                    }
                }
                break;
            }
            if text != "*" && self.tokens[i + off].kind == TokenKind::Unclassified {
                self.tokens[i + off].kind = TokenKind::Class;
                walked = Some(text);
            }
            off += 1;
        }
        if let Some(name) = walked {
            self.tables.classes.entry(name).or_default();
        }
    }

    /// `def NAME(self, ...)` declares a method of the active class;
    /// `def NAME(...)` otherwise declares a global function.
    fn function_definition(&mut self, i: usize) {
        let Some(name) = self.text(i + 1).map(str::to_string) else {
            return;
        };
        if self.text(i + 3) == Some("self") && self.same_line(i + 3) {
            self.tokens[i + 1].kind = TokenKind::Method;
            if let Some(entry) = self.active_class_entry() {
                entry.methods.insert(name);
            }
        } else {
            self.tables.functions.insert(name);
        }
    }

    /// `self.NAME = value` registers a property of the active class (with its
    /// inferred type when the value is a known class); a bare `self.NAME`
    /// resolves against the active class's methods and properties.
    fn self_member(&mut self, i: usize) {
        if self.text(i + 2).is_none() || self.text(i + 1) != Some(".") {
            return;
        }
        if self.text(i + 4).is_some() && self.text(i + 3) == Some("=") {
            self.tokens[i + 2].kind = TokenKind::Variable;
            let name = self.tokens[i + 2].text.clone();
            let inferred = match self.text(i + 4) {
                Some(value) if self.tables.classes.contains_key(value) && self.same_line(i + 4) => {
                    value.to_string()
                }
                _ => String::new(),
            };
            if let Some(entry) = self.active_class_entry() {
                entry.properties.insert(name, inferred);
            }
        } else {
            let member = self.tokens[i + 2].text.clone();
            let Some(class) = self.tables.active_class.as_ref() else {
                return;
            };
            let Some(entry) = self.tables.classes.get(class) else {
                return;
            };
            let is_method = entry.methods.contains(&member);
            let is_property = entry.properties.contains_key(&member);
            if is_method {
                self.tokens[i + 2].kind = TokenKind::Method;
            } else if is_property {
                self.tokens[i + 2].kind = TokenKind::Variable;
            }
        }
    }

    /// `for A, B, ... in`: every comma-separated target before `in` becomes a
    /// variable; all-uppercase targets also become readonly constants.
    fn loop_targets(&mut self, i: usize) {
        let mut off = 1;
        while self.same_line(i + off) {
            let Some(text) = self.text(i + off).map(str::to_string) else {
                break;
            };
            if text == "in" {
                break;
            }
            self.tokens[i + off].kind = TokenKind::Variable;
            if is_constant_name(&text) {
                self.tokens[i + off].add_modifier(Modifier::Readonly);
                self.tables.constants.insert(text.clone());
            }
            self.tables.variables.insert(text, String::new());
            off += 1;
            if self.text(i + off) == Some(",") {
                off += 1;
            } else {
                break;
            }
        }
    }

    /// The ring-definition form `NAME.<G1, G2, ...> = RingClass(...)` binds
    /// the container and every generator in one statement.
    fn ring_definition(&mut self, i: usize) {
        let mut off = 3;
        while self.same_line(i + off) {
            if self.tokens[i + off].kind != TokenKind::Unclassified {
                break;
            }
            let generator = self.tokens[i + off].text.clone();
            self.tokens[i + off].kind = TokenKind::Variable;
            self.tables.variables.insert(generator, String::new());
            off += 1;
            match self.text(i + off) {
                Some(",") => off += 1,
                Some(">") => {
                    if self.text(i + off + 2).is_some() && self.text(i + off + 1) == Some("=") {
                        self.tokens[i].kind = TokenKind::Variable;
                        let rhs = self.text(i + off + 2).map(str::to_string);
                        if let Some(rhs) = rhs {
                            if self.tables.classes.contains_key(&rhs) && self.same_line(i + off + 2)
                            {
                                let name = self.tokens[i].text.clone();
                                self.tables.variables.insert(name, rhs);
                            }
                        }
                        break;
                    }
                    // A bare `>` is an operator; the loop head stops on it.
                }
                _ => break,
            }
        }
    }

    /// A resolved variable followed by `.member` resolves the member against
    /// the variable's recorded class, when one is known.
    fn member_access(&mut self, i: usize, name: &str) {
        if self.text(i + 2).is_none() || self.text(i + 1) != Some(".") || !self.same_line(i + 1) {
            return;
        }
        let Some(var_type) = self
            .tables
            .variables
            .get(name)
            .filter(|ty| !ty.is_empty())
        else {
            return;
        };
        let Some(entry) = self.tables.classes.get(var_type) else {
            return;
        };
        let member = &self.tokens[i + 2].text;
        let is_method = entry.methods.contains(member);
        let is_property = entry.properties.contains_key(member);
        if is_method {
            self.tokens[i + 2].kind = TokenKind::Method;
        } else if is_property {
            self.tokens[i + 2].kind = TokenKind::Variable;
        }
    }

    /// Walks backward from a bare `=`, collecting the comma-separated names
    /// on its left. Operators and keywords are skipped, never reclassified.
    /// A single collected name gets its type inferred from the right-hand
    /// side; multi-assignments are deliberately left untyped.
    fn backfill_assignment(&mut self, i: usize) {
        let mut off = 1;
        let mut collected: Vec<String> = Vec::new();
        while off <= i {
            let idx = i - off;
            let skippable = self.tokens[idx].kind == TokenKind::Operator
                || KEYWORDS.contains(self.tokens[idx].text.as_str());
            if !skippable {
                let text = self.tokens[idx].text.clone();
                self.tokens[idx].kind = TokenKind::Variable;
                if is_constant_name(&text) {
                    self.tokens[idx].add_modifier(Modifier::Readonly);
                    self.tables.constants.insert(text.clone());
                }
                collected.push(text);
            }
            off += 1;
            if off > i || self.tokens[i - off].text != "," {
                break;
            }
            off += 1;
        }
        if collected.len() == 1 {
            let inferred = match self.text(i + 1) {
                Some(value) if self.tables.classes.contains_key(value) && self.same_line(i + 1) => {
                    value.to_string()
                }
                _ => String::new(),
            };
            self.tables.variables.insert(collected.remove(0), inferred);
        } else {
            for name in collected {
                self.tables.variables.insert(name, String::new());
            }
        }
    }

    fn active_class_entry(&mut self) -> Option<&mut ClassEntry> {
        let name = self.tables.active_class.as_ref()?;
        self.tables.classes.get_mut(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sage_scanner::tokenize;

    fn classified(source: &str) -> Vec<Token> {
        let mut tokens = tokenize(source);
        classify_tokens(&mut tokens);
        tokens
    }

    fn find<'a>(tokens: &'a [Token], text: &str) -> &'a Token {
        tokens
            .iter()
            .find(|t| t.text == text)
            .unwrap_or_else(|| panic!("token {text:?} not found"))
    }

    #[test]
    fn builtin_function_and_class_lookup() {
        let tokens = classified("p = factor(n)\nring = ZZ");
        assert_eq!(find(&tokens, "factor").kind, TokenKind::Function);
        assert_eq!(find(&tokens, "ZZ").kind, TokenKind::Class);
        assert_eq!(find(&tokens, "n").kind, TokenKind::Unclassified);
    }

    #[test]
    fn keywords_stay_unclassified() {
        let tokens = classified("for i in primes(100):\n    pass");
        assert_eq!(find(&tokens, "for").kind, TokenKind::Unclassified);
        assert_eq!(find(&tokens, "in").kind, TokenKind::Unclassified);
        assert_eq!(find(&tokens, "pass").kind, TokenKind::Unclassified);
        assert_eq!(find(&tokens, "i").kind, TokenKind::Variable);
    }

    #[test]
    fn method_versus_function_definitions() {
        let source = "class Foo:\n    def bar(self):\n        pass\n    def baz():\n        pass";
        let tokens = classified(source);
        assert_eq!(find(&tokens, "bar").kind, TokenKind::Method);
        // baz joined the function table before its own token was resolved.
        assert_eq!(find(&tokens, "baz").kind, TokenKind::Function);
        let tokens = classified(&format!("{source}\nbaz()"));
        let baz_call = tokens.iter().filter(|t| t.text == "baz").last();
        assert_eq!(baz_call.map(|t| t.kind), Some(TokenKind::Function));
    }

    #[test]
    fn declared_class_is_active_for_self_rules() {
        let source = "class Point:\n    def shift(self):\n        self.x = 1\n    def read(self):\n        self.x\n        self.shift";
        let tokens = classified(source);
        let x_tokens: Vec<&Token> = tokens.iter().filter(|t| t.text == "x").collect();
        assert_eq!(x_tokens.len(), 2);
        assert!(x_tokens.iter().all(|t| t.kind == TokenKind::Variable));
        let shift_tokens: Vec<&Token> = tokens.iter().filter(|t| t.text == "shift").collect();
        assert!(shift_tokens.iter().all(|t| t.kind == TokenKind::Method));
    }

    #[test]
    fn self_property_records_inferred_type() {
        let source = "class Curve:\n    def setup(self):\n        self.field = GF\n    def use(self):\n        self.field";
        let tokens = classified(source);
        let field_reads: Vec<&Token> = tokens.iter().filter(|t| t.text == "field").collect();
        assert!(field_reads.iter().all(|t| t.kind == TokenKind::Variable));
    }

    #[test]
    fn import_targets_become_classes() {
        let tokens = classified("import hashlib\nh = hashlib");
        let mentions: Vec<&Token> = tokens.iter().filter(|t| t.text == "hashlib").collect();
        assert_eq!(mentions.len(), 2);
        assert!(mentions.iter().all(|t| t.kind == TokenKind::Class));
    }

    #[test]
    fn import_alias_wins_over_dotted_path() {
        let tokens = classified("import sage.rings.integer as integer\nx = integer");
        assert_eq!(find(&tokens, "sage").kind, TokenKind::Class);
        assert_eq!(find(&tokens, "rings").kind, TokenKind::Class);
        let integer_reference = tokens.iter().filter(|t| t.text == "integer").last();
        assert_eq!(integer_reference.map(|t| t.kind), Some(TokenKind::Class));
    }

    #[test]
    fn import_walks_the_whole_line_but_registers_only_the_last_name() {
        let tokens = classified("import os, sys\na = os\nb = sys");
        let first_os = find(&tokens, "os");
        assert_eq!(first_os.kind, TokenKind::Class);
        assert_eq!(find(&tokens, "sys").kind, TokenKind::Class);
        // Only the last walked name joins the class table.
        let later_sys = tokens.iter().filter(|t| t.text == "sys").last().unwrap();
        assert_eq!(later_sys.kind, TokenKind::Class);
        let later_os = tokens.iter().filter(|t| t.text == "os").last().unwrap();
        assert_eq!(later_os.kind, TokenKind::Unclassified);
    }

    #[test]
    fn from_import_classifies_but_only_import_registers() {
        let tokens = classified("from Crypto.Util.number import bytes_to_long");
        assert_eq!(find(&tokens, "Crypto").kind, TokenKind::Class);
        assert_eq!(find(&tokens, "Util").kind, TokenKind::Class);
        assert_eq!(find(&tokens, "number").kind, TokenKind::Class);
        assert_eq!(find(&tokens, "import").kind, TokenKind::Unclassified);
    }

    #[test]
    fn star_import_is_not_classified() {
        let tokens = classified("from sage.all import *");
        assert_eq!(find(&tokens, "*").kind, TokenKind::Operator);
    }

    #[test]
    fn constant_assignment_gets_readonly_modifier() {
        let tokens = classified("CONST = 42\nvalue = 42");
        let constant = find(&tokens, "CONST");
        assert_eq!(constant.kind, TokenKind::Variable);
        assert!(constant.has_modifier(Modifier::Readonly));
        let value = find(&tokens, "value");
        assert_eq!(value.kind, TokenKind::Variable);
        assert!(value.modifiers.is_empty());
    }

    #[test]
    fn later_constant_reference_stays_readonly() {
        let tokens = classified("LIMIT = 10\nx = LIMIT");
        let last = tokens.iter().filter(|t| t.text == "LIMIT").last();
        let last = last.expect("LIMIT reference");
        assert_eq!(last.kind, TokenKind::Variable);
        assert!(last.has_modifier(Modifier::Readonly));
    }

    #[test]
    fn multi_assignment_classifies_without_type_inference() {
        let tokens = classified("a, b = 1, 2\nm = Matrix\na.det");
        assert_eq!(find(&tokens, "a").kind, TokenKind::Variable);
        assert_eq!(find(&tokens, "b").kind, TokenKind::Variable);
        // No type was recorded for `a`, so `det` stays unresolved.
        assert_eq!(find(&tokens, "det").kind, TokenKind::Unclassified);
    }

    #[test]
    fn single_assignment_infers_class_type_and_resolves_members() {
        let tokens = classified("m = Matrix(ZZ, 2, 2)\nm.det()\nm.unknown()");
        assert_eq!(find(&tokens, "m").kind, TokenKind::Variable);
        assert_eq!(find(&tokens, "det").kind, TokenKind::Method);
        assert_eq!(find(&tokens, "unknown").kind, TokenKind::Unclassified);
    }

    #[test]
    fn assignment_reclassifies_shadowed_builtin() {
        let tokens = classified("factor = 5");
        assert_eq!(find(&tokens, "factor").kind, TokenKind::Variable);
    }

    #[test]
    fn for_targets_become_variables_with_constant_detection() {
        let tokens = classified("for i, LIMIT in pairs:\n    pass");
        assert_eq!(find(&tokens, "i").kind, TokenKind::Variable);
        let limit = find(&tokens, "LIMIT");
        assert_eq!(limit.kind, TokenKind::Variable);
        assert!(limit.has_modifier(Modifier::Readonly));
        assert_eq!(find(&tokens, "pairs").kind, TokenKind::Unclassified);
    }

    #[test]
    fn ring_definition_binds_container_and_generators() {
        let tokens = classified("R.<x, y> = PolynomialRing(QQ)\nR.gen()");
        assert_eq!(find(&tokens, "x").kind, TokenKind::Variable);
        assert_eq!(find(&tokens, "y").kind, TokenKind::Variable);
        let r_tokens: Vec<&Token> = tokens.iter().filter(|t| t.text == "R").collect();
        assert!(r_tokens.iter().all(|t| t.kind == TokenKind::Variable));
        // The recorded PolynomialRing type resolves `gen` as a method.
        assert_eq!(find(&tokens, "gen").kind, TokenKind::Method);
    }

    #[test]
    fn ring_definition_with_unknown_ring_still_classifies_names() {
        let tokens = classified("S.<t> = MysteryRing(7)");
        assert_eq!(find(&tokens, "t").kind, TokenKind::Variable);
        assert_eq!(find(&tokens, "S").kind, TokenKind::Variable);
    }

    #[test]
    fn classification_is_deterministic() {
        let source = "class Foo:\n    def bar(self):\n        self.n = 1\nR.<x> = PolynomialRing(QQ)\nA, B = 1, 2\nfor K in primes(10):\n    y = factor(K)";
        let first = classified(source);
        let second = classified(source);
        assert_eq!(first, second);
    }

    #[test]
    fn out_of_bounds_lookahead_is_harmless() {
        for source in ["def", "class", "self", "for", "import", "R.<", "x ="] {
            let tokens = classified(source);
            assert!(!tokens.is_empty(), "source: {source}");
        }
    }

    #[test]
    fn operator_equals_at_start_of_stream_is_ignored() {
        let tokens = classified("= 5");
        assert_eq!(find(&tokens, "=").kind, TokenKind::Operator);
    }
}
