//! Document analysis for the SageMath language server.
//!
//! Everything here operates on either the token stream produced by
//! `sage-scanner` or on raw line text; no syntax tree is ever built. The
//! modules are:
//!
//! - `builtins`: the read-only seed vocabulary (keywords, standard functions,
//!   classes with their method lists) and the semantic token legend.
//! - `classify`: the single-pass semantic token classifier.
//! - `symbols`: regex-driven extraction of user-defined symbols for outline
//!   and completion.
//! - `completion`: protocol-agnostic completion candidates.
//! - `docs`: the static documentation database backing hover and completion
//!   detail.

pub mod builtins;
pub mod classify;
pub mod completion;
pub mod docs;
pub mod symbols;

pub use classify::classify_tokens;
