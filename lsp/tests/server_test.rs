use std::sync::{Arc, Mutex};

use dragonstone_lsp::{DragonstoneLanguageServer, ResultSink};
use serde_json::{json, Value};
use tower_lsp::async_trait;
use tower_lsp::lsp_types::*;
use tower_lsp::LanguageServer;

type Published = (Url, Vec<Diagnostic>, Option<i32>);

#[derive(Clone, Default)]
struct RecordingSink {
    published: Arc<Mutex<Vec<Published>>>,
    config: Arc<Mutex<Option<Value>>>,
}

impl RecordingSink {
    fn with_config(config: Value) -> Self {
        let sink = Self::default();
        *sink.config.lock().unwrap() = Some(config);
        sink
    }

    fn last(&self) -> Published {
        self.published.lock().unwrap().last().cloned().expect("nothing published")
    }

    fn count(&self) -> usize {
        self.published.lock().unwrap().len()
    }
}

#[async_trait]
impl ResultSink for RecordingSink {
    async fn publish_diagnostics(&self, uri: Url, diagnostics: Vec<Diagnostic>, version: Option<i32>) {
        self.published.lock().unwrap().push((uri, diagnostics, version));
    }

    async fn log_message(&self, _: MessageType, _: String) {}

    async fn fetch_configuration(&self, _: &str) -> Option<Value> {
        self.config.lock().unwrap().clone()
    }
}

fn uri() -> Url {
    Url::parse("file:///workspace/sample.ds").unwrap()
}

fn server() -> (DragonstoneLanguageServer<RecordingSink>, RecordingSink) {
    let sink = RecordingSink::default();
    (DragonstoneLanguageServer::with_sink(sink.clone()), sink)
}

async fn open(server: &DragonstoneLanguageServer<RecordingSink>, text: &str) {
    server
        .did_open(DidOpenTextDocumentParams {
            text_document: TextDocumentItem {
                uri: uri(),
                language_id: "dragonstone".into(),
                version: 1,
                text: text.to_string(),
            },
        })
        .await;
}

fn at(line: u32, character: u32) -> TextDocumentPositionParams {
    TextDocumentPositionParams {
        text_document: TextDocumentIdentifier { uri: uri() },
        position: Position::new(line, character),
    }
}

fn codes(diagnostics: &[Diagnostic]) -> Vec<String> {
    diagnostics
        .iter()
        .filter_map(|d| match &d.code {
            Some(NumberOrString::String(code)) => Some(code.clone()),
            _ => None,
        })
        .collect()
}

const SAMPLE: &str = "class Point\n  def self.origin\n  end\nend\np = Point.origin\n";

#[tokio::test]
async fn initialize_advertises_capabilities() {
    let (server, _) = server();
    let result = server.initialize(InitializeParams::default()).await.unwrap();
    let caps = result.capabilities;
    assert_eq!(
        caps.text_document_sync,
        Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::INCREMENTAL))
    );
    let triggers = caps.completion_provider.unwrap().trigger_characters.unwrap();
    assert_eq!(triggers, vec![".", ":", "@", "%", "$"]);
    assert!(caps.diagnostic_provider.is_some());
    assert_eq!(caps.document_formatting_provider, Some(OneOf::Left(true)));
}

#[tokio::test]
async fn open_publishes_diagnostics_with_version() {
    let (server, sink) = server();
    open(&server, "class point\nend\n").await;

    let (published_uri, diagnostics, version) = sink.last();
    assert_eq!(published_uri, uri());
    assert_eq!(version, Some(1));
    assert_eq!(codes(&diagnostics), vec!["type-name-case"]);
    assert_eq!(diagnostics[0].source.as_deref(), Some("dragonstone"));
    assert_eq!(diagnostics[0].severity, Some(DiagnosticSeverity::ERROR));
    assert_eq!(diagnostics[0].range, Range::new(Position::new(0, 6), Position::new(0, 11)));
}

#[tokio::test]
async fn incremental_change_replaces_the_diagnostic_set() {
    let (server, sink) = server();
    open(&server, "if ready\n").await;
    assert_eq!(codes(&sink.last().1), vec!["unclosed-block"]);

    server
        .did_change(DidChangeTextDocumentParams {
            text_document: VersionedTextDocumentIdentifier { uri: uri(), version: 2 },
            content_changes: vec![TextDocumentContentChangeEvent {
                range: Some(Range::new(Position::new(1, 0), Position::new(1, 0))),
                range_length: None,
                text: "end\n".to_string(),
            }],
        })
        .await;

    let (_, diagnostics, version) = sink.last();
    assert!(diagnostics.is_empty());
    assert_eq!(version, Some(2));
}

#[tokio::test]
async fn close_clears_diagnostics_and_forgets_the_document() {
    let (server, sink) = server();
    open(&server, "x = \"open\n").await;
    server
        .did_close(DidCloseTextDocumentParams {
            text_document: TextDocumentIdentifier { uri: uri() },
        })
        .await;

    let (_, diagnostics, version) = sink.last();
    assert!(diagnostics.is_empty());
    assert_eq!(version, None);

    let hover = server
        .hover(HoverParams {
            text_document_position_params: at(0, 0),
            work_done_progress_params: Default::default(),
        })
        .await
        .unwrap();
    assert!(hover.is_none());
}

#[tokio::test]
async fn hover_shows_definition_detail() {
    let (server, _) = server();
    open(&server, SAMPLE).await;

    let hover = server
        .hover(HoverParams {
            text_document_position_params: at(4, 12),
            work_done_progress_params: Default::default(),
        })
        .await
        .unwrap()
        .unwrap();
    match hover.contents {
        HoverContents::Markup(markup) => {
            assert_eq!(markup.kind, MarkupKind::Markdown);
            assert_eq!(
                markup.value,
                "```dragonstone\nsingleton method self.origin\n```\nDefined at line 2"
            );
        }
        other => panic!("unexpected hover contents: {other:?}"),
    }
}

#[tokio::test]
async fn definition_points_at_the_defining_line() {
    let (server, _) = server();
    open(&server, SAMPLE).await;

    let response = server
        .goto_definition(GotoDefinitionParams {
            text_document_position_params: at(4, 5),
            work_done_progress_params: Default::default(),
            partial_result_params: Default::default(),
        })
        .await
        .unwrap();
    match response {
        Some(GotoDefinitionResponse::Scalar(location)) => {
            assert_eq!(location.uri, uri());
            assert_eq!(location.range, Range::new(Position::new(0, 0), Position::new(0, 11)));
        }
        other => panic!("unexpected definition response: {other:?}"),
    }
}

#[tokio::test]
async fn document_symbols_are_flat_and_ordered() {
    let (server, _) = server();
    open(&server, "module Geo\n  enum Axis\n  end\n  fun dist(a, b)\n  end\nend\n").await;

    let response = server
        .document_symbol(DocumentSymbolParams {
            text_document: TextDocumentIdentifier { uri: uri() },
            work_done_progress_params: Default::default(),
            partial_result_params: Default::default(),
        })
        .await
        .unwrap();
    let Some(DocumentSymbolResponse::Nested(symbols)) = response else {
        panic!("expected nested symbols");
    };
    let summary: Vec<_> = symbols.iter().map(|s| (s.name.as_str(), s.kind)).collect();
    assert_eq!(
        summary,
        vec![
            ("Geo", SymbolKind::MODULE),
            ("Axis", SymbolKind::ENUM),
            ("dist", SymbolKind::FUNCTION),
        ]
    );
    assert!(symbols.iter().all(|s| s.children.is_none()));
    assert_eq!(symbols[2].detail.as_deref(), Some("fun dist(a, b)"));
}

#[tokio::test]
async fn empty_document_has_no_symbols() {
    let (server, _) = server();
    open(&server, "\n").await;
    let response = server
        .document_symbol(DocumentSymbolParams {
            text_document: TextDocumentIdentifier { uri: uri() },
            work_done_progress_params: Default::default(),
            partial_result_params: Default::default(),
        })
        .await
        .unwrap();
    assert!(response.is_none());
}

#[tokio::test]
async fn formatting_uses_request_options() {
    let (server, _) = server();
    open(&server, "def f\nx\nend\n").await;

    let edits = server
        .formatting(DocumentFormattingParams {
            text_document: TextDocumentIdentifier { uri: uri() },
            options: FormattingOptions {
                tab_size: 2,
                insert_spaces: true,
                ..Default::default()
            },
            work_done_progress_params: Default::default(),
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        edits,
        vec![TextEdit {
            range: Range::new(Position::new(1, 0), Position::new(1, 0)),
            new_text: "  ".to_string(),
        }]
    );
}

#[tokio::test]
async fn completion_adds_types_after_a_colon() {
    let (server, _) = server();
    open(&server, "let total: \nfun helper\nend\n").await;

    let labels = |response: Option<CompletionResponse>| -> Vec<String> {
        match response {
            Some(CompletionResponse::Array(items)) => items.into_iter().map(|i| i.label).collect(),
            _ => Vec::new(),
        }
    };

    let after_colon = labels(
        server
            .completion(CompletionParams {
                text_document_position: at(0, 11),
                work_done_progress_params: Default::default(),
                partial_result_params: Default::default(),
                context: None,
            })
            .await
            .unwrap(),
    );
    assert!(after_colon.iter().any(|l| l == "int64"));
    assert!(after_colon.iter().any(|l| l == "helper"));
    assert!(after_colon.iter().any(|l| l == "total"));

    let line_start = labels(
        server
            .completion(CompletionParams {
                text_document_position: at(1, 0),
                work_done_progress_params: Default::default(),
                partial_result_params: Default::default(),
                context: None,
            })
            .await
            .unwrap(),
    );
    assert!(!line_start.iter().any(|l| l == "int64"));
    assert!(line_start.iter().any(|l| l == "class"));
}

#[tokio::test]
async fn pull_diagnostics_match_published_ones() {
    let (server, sink) = server();
    open(&server, "MaxSize = 1\n").await;

    let report = server
        .diagnostic(DocumentDiagnosticParams {
            text_document: TextDocumentIdentifier { uri: uri() },
            identifier: None,
            previous_result_id: None,
            work_done_progress_params: Default::default(),
            partial_result_params: Default::default(),
        })
        .await
        .unwrap();
    let DocumentDiagnosticReportResult::Report(DocumentDiagnosticReport::Full(full)) = report else {
        panic!("expected a full report");
    };
    assert_eq!(full.full_document_diagnostic_report.items, sink.last().1);
    assert_eq!(codes(&full.full_document_diagnostic_report.items), vec!["constant-name-case"]);
}

#[tokio::test]
async fn configuration_can_disable_diagnostics() {
    let sink = RecordingSink::with_config(json!({ "diagnostics": { "enabled": false } }));
    let server = DragonstoneLanguageServer::with_sink(sink.clone());
    server.initialized(InitializedParams {}).await;

    open(&server, "class point\n").await;
    assert!(sink.last().1.is_empty());
}

#[tokio::test]
async fn pushed_configuration_revalidates_open_documents() {
    let (server, sink) = server();
    open(&server, "class point\nend\n").await;
    assert_eq!(sink.count(), 1);

    server
        .did_change_configuration(DidChangeConfigurationParams {
            settings: json!({ "dragonstone": { "lsp": { "diagnostics": { "namingConventions": false } } } }),
        })
        .await;

    assert_eq!(sink.count(), 2);
    assert!(sink.last().1.is_empty());
}
