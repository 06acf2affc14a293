//! Language Server Protocol (LSP) implementation for SageMath
//!
//!     This crate provides language server capabilities for SageMath worksheets
//!     and scripts, enabling rich editor support in any LSP-compatible editor
//!     (VSCode, Neovim, Emacs, Sublime, etc.).
//!
//! Feature Set
//!
//!     SageMath scripts are Python-shaped but lean on constructs ordinary
//!     Python tooling does not understand (ring definitions with generator
//!     lists, the Sage standard vocabulary). Features are selected for
//!     mathematical scripting workflows:
//!
//!         1. Semantic Tokens (textDocument/semanticTokens/full):
//!             - Context-sensitive highlighting of functions, classes,
//!               methods, variables, and constants
//!             - Single forward pass over the scanned token stream; symbol
//!               tables grow as declarations are observed
//!             - Ring definitions like R.<x,y> = PolynomialRing(QQ) bind the
//!               container and its generators
//!
//!         2. Document Symbols (textDocument/documentSymbol):
//!             - Outline of classes, functions, variables, and ring
//!               definitions with shallow type inference
//!
//!         3. Folding Ranges (textDocument/foldingRange):
//!             - Indentation-based block folding, comment runs, and
//!               triple-quoted strings
//!
//!         4. Hover (textDocument/hover):
//!             - Markdown documentation for the builtin function/method
//!               database, class method summaries, and keywords
//!
//!         5. Completion (textDocument/completion):
//!             - User-defined symbols first, then builtin functions, classes,
//!               and keywords; method completion after a dot
//!
//!         6. sagemath/logLevel (custom request):
//!             - Adjusts the server's tracing filter at runtime
//!
//! Architecture
//!
//!     LSP Layer (tower-lsp):
//!         - JSON-RPC transport, handshake, request routing
//!
//!     Server Layer (this crate):
//!         - Implements the LanguageServer trait
//!         - Owns the open-document text store
//!         - Encodes classified tokens into the semantic-token wire format
//!         - Thin tests assert routing into the feature layer
//!
//!     Feature Layer (sage-scanner, sage-analysis):
//!         - Scanner and classifier over raw text, no syntax tree
//!         - Stateless per request; all tables are pass-local
//!         - Dense unit tests live next to the logic
//!
//! Usage
//!
//!     Run the `sage-lsp` binary to serve on stdin/stdout for editor
//!     integration. `RUST_LOG` controls the initial log filter; diagnostics go
//!     to stderr so stdout stays a clean protocol channel.

pub mod features;
pub mod server;

pub use server::SageLanguageServer;
