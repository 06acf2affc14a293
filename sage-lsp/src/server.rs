//! Main language server implementation.

use std::collections::HashMap;
use std::sync::Arc;

use crate::features::document_symbols::collect_document_symbols;
use crate::features::folding_ranges::{folding_ranges as collect_folding_ranges, SageFoldingRange};
use crate::features::hover::{hover as compute_hover, HoverResult};
use crate::features::semantic_tokens::collect_semantic_tokens;
use sage_analysis::builtins::{TOKEN_MODIFIERS, TOKEN_TYPES};
use sage_analysis::completion::{completion_items, CompletionCandidate};
use sage_analysis::symbols::UserSymbol;
use sage_scanner::{Modifier, Token, TokenKind};
use serde::Deserialize;
use tokio::sync::RwLock;
use tower_lsp::async_trait;
use tower_lsp::jsonrpc::{self, Result};
use tower_lsp::lsp_types::{
    CompletionItem, CompletionOptions, CompletionParams, CompletionResponse, DocumentSymbol,
    DocumentSymbolParams, DocumentSymbolResponse, Documentation, FoldingRange, FoldingRangeParams,
    FoldingRangeProviderCapability, Hover, HoverContents, HoverParams, HoverProviderCapability,
    InitializeParams, InitializeResult, InitializedParams, MarkupContent, MarkupKind, OneOf,
    Position, Range, SemanticToken, SemanticTokenModifier, SemanticTokenType, SemanticTokens,
    SemanticTokensFullOptions, SemanticTokensLegend, SemanticTokensOptions, SemanticTokensParams,
    SemanticTokensResult, ServerCapabilities, ServerInfo, TextDocumentItem,
    TextDocumentSyncCapability, TextDocumentSyncKind, Url, WorkDoneProgressOptions,
};
use tower_lsp::Client;
use tracing::info;
use tracing_subscriber::{reload, EnvFilter, Registry};

pub trait LspClient: Send + Sync + Clone + 'static {}
impl LspClient for Client {}

/// Handle for adjusting the tracing filter at runtime via the
/// `sagemath/logLevel` request.
pub type LogFilterHandle = reload::Handle<EnvFilter, Registry>;

/// Parameters of the `sagemath/logLevel` custom request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogLevelParams {
    pub log_level: String,
}

pub trait FeatureProvider: Send + Sync + 'static {
    fn semantic_tokens(&self, text: &str) -> Vec<Token>;
    fn document_symbols(&self, lines: &[&str]) -> Vec<UserSymbol>;
    fn folding_ranges(&self, lines: &[&str]) -> Vec<SageFoldingRange>;
    fn hover(&self, lines: &[&str], position: Position) -> Option<HoverResult>;
    fn completions(&self, lines: &[&str], position: Position) -> Vec<CompletionCandidate>;
}

#[derive(Default)]
pub struct DefaultFeatureProvider;

impl DefaultFeatureProvider {
    pub fn new() -> Self {
        Self
    }
}

impl FeatureProvider for DefaultFeatureProvider {
    fn semantic_tokens(&self, text: &str) -> Vec<Token> {
        collect_semantic_tokens(text)
    }

    fn document_symbols(&self, lines: &[&str]) -> Vec<UserSymbol> {
        collect_document_symbols(lines)
    }

    fn folding_ranges(&self, lines: &[&str]) -> Vec<SageFoldingRange> {
        collect_folding_ranges(lines)
    }

    fn hover(&self, lines: &[&str], position: Position) -> Option<HoverResult> {
        compute_hover(lines, position)
    }

    fn completions(&self, lines: &[&str], position: Position) -> Vec<CompletionCandidate> {
        completion_items(lines, position)
    }
}

#[derive(Default)]
struct DocumentStore {
    entries: RwLock<HashMap<Url, Arc<String>>>,
}

impl DocumentStore {
    async fn upsert(&self, uri: Url, text: String) {
        self.entries.write().await.insert(uri, Arc::new(text));
    }

    async fn get(&self, uri: &Url) -> Option<Arc<String>> {
        self.entries.read().await.get(uri).cloned()
    }

    async fn remove(&self, uri: &Url) {
        self.entries.write().await.remove(uri);
    }
}

fn semantic_tokens_legend() -> SemanticTokensLegend {
    SemanticTokensLegend {
        token_types: TOKEN_TYPES.iter().copied().map(SemanticTokenType::new).collect(),
        token_modifiers: TOKEN_MODIFIERS
            .iter()
            .copied()
            .map(SemanticTokenModifier::new)
            .collect(),
    }
}

/// Legend position of a kind; unclassified kinds map to the sentinel index
/// one past the end of the legend, leaving them to native highlighting.
fn type_index(kind: TokenKind) -> u32 {
    kind.name()
        .and_then(|name| TOKEN_TYPES.iter().position(|entry| *entry == name))
        .unwrap_or(TOKEN_TYPES.len()) as u32
}

fn modifier_bitset(modifiers: &[Modifier]) -> u32 {
    modifiers
        .iter()
        .filter_map(|modifier| {
            TOKEN_MODIFIERS
                .iter()
                .position(|entry| *entry == modifier.name())
        })
        .fold(0, |mask, index| mask | (1 << index))
}

/// Flattens classified tokens into the five-integer wire tuples. Deltas come
/// straight from the scanner, so this stays a per-token transform.
fn encode_semantic_tokens(tokens: &[Token]) -> Vec<SemanticToken> {
    tokens
        .iter()
        .map(|token| SemanticToken {
            delta_line: token.delta_line,
            delta_start: token.delta_start,
            length: token.len_chars(),
            token_type: type_index(token.kind),
            token_modifiers_bitset: modifier_bitset(&token.modifiers),
        })
        .collect()
}

#[allow(deprecated)]
fn to_document_symbol(symbol: &UserSymbol) -> DocumentSymbol {
    let start = Position::new(symbol.line as u32, symbol.character as u32);
    DocumentSymbol {
        name: symbol.name.clone(),
        detail: (!symbol.detail.is_empty()).then(|| symbol.detail.clone()),
        kind: symbol.kind,
        tags: None,
        deprecated: None,
        range: Range::new(
            start,
            Position::new(symbol.end_line as u32, symbol.end_character as u32),
        ),
        selection_range: Range::new(
            start,
            Position::new(
                symbol.line as u32,
                (symbol.character + symbol.name.chars().count()) as u32,
            ),
        ),
        children: None,
    }
}

fn to_lsp_folding_range(range: &SageFoldingRange) -> FoldingRange {
    FoldingRange {
        start_line: range.start_line,
        start_character: None,
        end_line: range.end_line,
        end_character: None,
        kind: Some(range.kind.clone()),
        collapsed_text: None,
    }
}

fn to_completion_item(candidate: CompletionCandidate) -> CompletionItem {
    CompletionItem {
        label: candidate.label,
        kind: Some(candidate.kind),
        detail: candidate.detail,
        documentation: candidate.documentation.map(|value| {
            Documentation::MarkupContent(MarkupContent {
                kind: MarkupKind::Markdown,
                value,
            })
        }),
        insert_text: candidate.insert_text,
        sort_text: candidate.sort_text,
        ..CompletionItem::default()
    }
}

fn invalid_params(message: &'static str) -> jsonrpc::Error {
    jsonrpc::Error {
        code: jsonrpc::ErrorCode::InvalidParams,
        message: message.into(),
        data: None,
    }
}

pub struct SageLanguageServer<C = Client, P = DefaultFeatureProvider> {
    _client: C,
    documents: DocumentStore,
    features: Arc<P>,
    log_filter: Option<LogFilterHandle>,
}

impl SageLanguageServer<Client, DefaultFeatureProvider> {
    pub fn new(client: Client, log_filter: Option<LogFilterHandle>) -> Self {
        let mut server = Self::with_features(client, Arc::new(DefaultFeatureProvider::new()));
        server.log_filter = log_filter;
        server
    }
}

impl<C, P> SageLanguageServer<C, P>
where
    C: LspClient,
    P: FeatureProvider,
{
    pub fn with_features(client: C, features: Arc<P>) -> Self {
        Self {
            _client: client,
            documents: DocumentStore::default(),
            features,
            log_filter: None,
        }
    }

    async fn document_text(&self, uri: &Url) -> Option<Arc<String>> {
        self.documents.get(uri).await
    }

    /// Handler for the `sagemath/logLevel` custom request.
    pub async fn set_log_level(&self, params: LogLevelParams) -> Result<()> {
        let Some(handle) = &self.log_filter else {
            return Ok(());
        };
        // The protocol historically accepts "warning" for tracing's "warn".
        let directive = match params.log_level.as_str() {
            "warning" => "warn",
            other => other,
        };
        let filter =
            EnvFilter::try_new(directive).map_err(|_| invalid_params("unrecognized log level"))?;
        handle
            .reload(filter)
            .map_err(|_| invalid_params("log filter can no longer be updated"))?;
        info!(level = directive, "log level changed");
        Ok(())
    }
}

#[async_trait]
impl<C, P> tower_lsp::LanguageServer for SageLanguageServer<C, P>
where
    C: LspClient,
    P: FeatureProvider,
{
    async fn initialize(&self, _: InitializeParams) -> Result<InitializeResult> {
        let capabilities = ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::FULL)),
            hover_provider: Some(HoverProviderCapability::Simple(true)),
            document_symbol_provider: Some(OneOf::Left(true)),
            folding_range_provider: Some(FoldingRangeProviderCapability::Simple(true)),
            completion_provider: Some(CompletionOptions {
                resolve_provider: Some(false),
                trigger_characters: Some(vec![".".to_string(), "(".to_string()]),
                work_done_progress_options: WorkDoneProgressOptions::default(),
                ..CompletionOptions::default()
            }),
            semantic_tokens_provider: Some(
                lsp_types::SemanticTokensServerCapabilities::SemanticTokensOptions(
                    SemanticTokensOptions {
                        work_done_progress_options: WorkDoneProgressOptions::default(),
                        legend: semantic_tokens_legend(),
                        range: None,
                        full: Some(SemanticTokensFullOptions::Bool(true)),
                    },
                ),
            ),
            ..ServerCapabilities::default()
        };

        Ok(InitializeResult {
            capabilities,
            server_info: Some(ServerInfo {
                name: "sage-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        info!(version = env!("CARGO_PKG_VERSION"), "SageMath language server initialized");
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: lsp_types::DidOpenTextDocumentParams) {
        let TextDocumentItem { uri, text, .. } = params.text_document;
        self.documents.upsert(uri, text).await;
    }

    async fn did_change(&self, params: lsp_types::DidChangeTextDocumentParams) {
        if let Some(change) = params.content_changes.into_iter().last() {
            self.documents
                .upsert(params.text_document.uri, change.text)
                .await;
        }
    }

    async fn did_close(&self, params: lsp_types::DidCloseTextDocumentParams) {
        self.documents.remove(&params.text_document.uri).await;
    }

    async fn semantic_tokens_full(
        &self,
        params: SemanticTokensParams,
    ) -> Result<Option<SemanticTokensResult>> {
        if let Some(text) = self.document_text(&params.text_document.uri).await {
            let tokens = self.features.semantic_tokens(&text);
            let data = encode_semantic_tokens(&tokens);
            Ok(Some(SemanticTokensResult::Tokens(SemanticTokens {
                result_id: None,
                data,
            })))
        } else {
            Ok(None)
        }
    }

    async fn document_symbol(
        &self,
        params: DocumentSymbolParams,
    ) -> Result<Option<DocumentSymbolResponse>> {
        if let Some(text) = self.document_text(&params.text_document.uri).await {
            let lines: Vec<&str> = text.lines().collect();
            let symbols = self.features.document_symbols(&lines);
            let converted: Vec<DocumentSymbol> = symbols.iter().map(to_document_symbol).collect();
            Ok(Some(DocumentSymbolResponse::Nested(converted)))
        } else {
            Ok(None)
        }
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        if let Some(text) = self
            .document_text(&params.text_document_position_params.text_document.uri)
            .await
        {
            let lines: Vec<&str> = text.lines().collect();
            let position = params.text_document_position_params.position;
            if let Some(result) = self.features.hover(&lines, position) {
                return Ok(Some(Hover {
                    contents: HoverContents::Markup(MarkupContent {
                        kind: MarkupKind::Markdown,
                        value: result.contents,
                    }),
                    range: result.range,
                }));
            }
        }
        Ok(None)
    }

    async fn folding_range(&self, params: FoldingRangeParams) -> Result<Option<Vec<FoldingRange>>> {
        if let Some(text) = self.document_text(&params.text_document.uri).await {
            let lines: Vec<&str> = text.lines().collect();
            let ranges = self.features.folding_ranges(&lines);
            Ok(Some(ranges.iter().map(to_lsp_folding_range).collect()))
        } else {
            Ok(None)
        }
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        if let Some(text) = self
            .document_text(&params.text_document_position.text_document.uri)
            .await
        {
            let lines: Vec<&str> = text.lines().collect();
            let position = params.text_document_position.position;
            let candidates = self.features.completions(&lines, position);
            let items: Vec<CompletionItem> =
                candidates.into_iter().map(to_completion_item).collect();
            Ok(Some(CompletionResponse::Array(items)))
        } else {
            Ok(None)
        }
    }
}
