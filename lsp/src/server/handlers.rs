use dragonstone_core::{collect_symbols, complete, completion::TRIGGER_CHARACTERS, format_edits, hover_markdown, symbol_at};
use ropey::Rope;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::LanguageServer;
use tracing::{debug, info};

use super::{
    config::section_in_settings,
    convert,
    sink::ResultSink,
    state::{Document, DragonstoneLanguageServer},
    text::apply_change,
};

#[tower_lsp::async_trait]
impl<C: ResultSink> LanguageServer for DragonstoneLanguageServer<C> {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        info!("Dragonstone Language Server initializing with params: {:?}", params.root_uri);

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::INCREMENTAL)),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                completion_provider: Some(CompletionOptions {
                    resolve_provider: Some(false),
                    trigger_characters: Some(TRIGGER_CHARACTERS.iter().map(|c| c.to_string()).collect()),
                    work_done_progress_options: Default::default(),
                    all_commit_characters: None,
                    completion_item: None,
                }),
                document_symbol_provider: Some(OneOf::Left(true)),
                definition_provider: Some(OneOf::Left(true)),
                document_formatting_provider: Some(OneOf::Left(true)),
                diagnostic_provider: Some(DiagnosticServerCapabilities::Options(DiagnosticOptions {
                    identifier: Some("dragonstone".to_string()),
                    inter_file_dependencies: false,
                    workspace_diagnostics: false,
                    work_done_progress_options: Default::default(),
                })),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "Dragonstone Language Server".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        info!("Dragonstone Language Server initialized");
        self.client
            .log_message(MessageType::INFO, "Dragonstone Language Server started".to_string())
            .await;
        self.load_config().await;
    }

    async fn shutdown(&self) -> Result<()> {
        info!("Dragonstone Language Server shutting down");
        Ok(())
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        // Prefer pushed settings; otherwise pull the section again
        match section_in_settings(&params.settings) {
            Some(section) => self.apply_config_value(section.clone()).await,
            None => self.load_config().await,
        }
        self.revalidate_all().await;
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        debug!(%uri, "document opened");
        let document = Document {
            content: Rope::from_str(&params.text_document.text),
            version: params.text_document.version,
        };
        self.documents.insert(uri.clone(), document);
        self.publish_validation(uri).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        {
            let mut entry = self.documents.entry(uri.clone()).or_default();
            entry.version = params.text_document.version;
            for change in &params.content_changes {
                apply_change(&mut entry.content, change);
            }
        }
        self.publish_validation(uri).await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        debug!(%uri, "document closed");
        self.documents.remove(&uri);
        self.client.publish_diagnostics(uri, Vec::new(), None).await;
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let position = convert::to_core_position(params.text_document_position_params.position);
        let Some(text) = self.text_of(uri) else {
            return Ok(None);
        };

        Ok(symbol_at(&text, position).map(|symbol| Hover {
            contents: HoverContents::Markup(MarkupContent {
                kind: MarkupKind::Markdown,
                value: hover_markdown(&symbol),
            }),
            range: None,
        }))
    }

    async fn goto_definition(&self, params: GotoDefinitionParams) -> Result<Option<GotoDefinitionResponse>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let position = convert::to_core_position(params.text_document_position_params.position);
        let Some(text) = self.text_of(uri) else {
            return Ok(None);
        };

        Ok(symbol_at(&text, position).map(|symbol| {
            GotoDefinitionResponse::Scalar(Location {
                uri: uri.clone(),
                range: convert::range(symbol.range),
            })
        }))
    }

    async fn document_symbol(&self, params: DocumentSymbolParams) -> Result<Option<DocumentSymbolResponse>> {
        let Some(text) = self.text_of(&params.text_document.uri) else {
            return Ok(None);
        };
        let symbols: Vec<DocumentSymbol> = collect_symbols(&text)
            .into_iter()
            .map(convert::document_symbol)
            .collect();
        if symbols.is_empty() {
            return Ok(None);
        }
        Ok(Some(DocumentSymbolResponse::Nested(symbols)))
    }

    async fn formatting(&self, params: DocumentFormattingParams) -> Result<Option<Vec<TextEdit>>> {
        let Some(text) = self.text_of(&params.text_document.uri) else {
            return Ok(None);
        };
        let options = convert::format_options(&params.options);
        let edits = format_edits(&text, &options)
            .into_iter()
            .map(convert::text_edit)
            .collect();
        Ok(Some(edits))
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = &params.text_document_position.text_document.uri;
        let position = convert::to_core_position(params.text_document_position.position);
        // unknown documents still get the language tables
        let text = self.text_of(uri).unwrap_or_default();

        let items: Vec<CompletionItem> = complete(&text, position)
            .into_iter()
            .map(convert::completion_item)
            .collect();
        Ok(Some(CompletionResponse::Array(items)))
    }

    async fn diagnostic(&self, params: DocumentDiagnosticParams) -> Result<DocumentDiagnosticReportResult> {
        let text = self.text_of(&params.text_document.uri).unwrap_or_default();
        let diagnostics = self.diagnostics_for(&text).await;

        Ok(DocumentDiagnosticReportResult::Report(DocumentDiagnosticReport::Full(
            RelatedFullDocumentDiagnosticReport {
                related_documents: None,
                full_document_diagnostic_report: FullDocumentDiagnosticReport {
                    result_id: None,
                    items: diagnostics,
                },
            },
        )))
    }
}
