pub mod document_symbols;
pub mod folding_ranges;
pub mod hover;
pub mod semantic_tokens;
