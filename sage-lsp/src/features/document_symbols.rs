//! Outline symbols for the document symbol request.

use sage_analysis::symbols::{extract_symbols, UserSymbol};

/// Collects the user-defined symbols shown in the outline view, in source
/// order. Conversion into protocol `DocumentSymbol`s happens in the server.
pub fn collect_document_symbols<S: AsRef<str>>(lines: &[S]) -> Vec<UserSymbol> {
    extract_symbols(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lsp_types::SymbolKind;

    #[test]
    fn collects_declarations_in_source_order() {
        let lines: Vec<&str> = "class Cipher:\n    def encrypt(self, pt):\n        pass\nKEY = 42\nR.<x> = PolynomialRing(QQ)"
            .lines()
            .collect();
        let symbols = collect_document_symbols(&lines);
        let names: Vec<&str> = symbols.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Cipher", "encrypt", "KEY", "R", "x"]);
        assert_eq!(symbols[0].kind, SymbolKind::CLASS);
        assert_eq!(symbols[1].kind, SymbolKind::FUNCTION);
        assert_eq!(symbols[2].kind, SymbolKind::VARIABLE);
    }
}
