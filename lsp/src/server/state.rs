use std::sync::Arc;

use dashmap::DashMap;
use ropey::Rope;
use tokio::sync::RwLock;
use tower_lsp::lsp_types::Url;
use tower_lsp::Client;

use super::config::ServerConfig;
use super::sink::ResultSink;

/// In-memory representation of an open Dragonstone document.
#[derive(Debug, Default)]
pub(crate) struct Document {
    pub(crate) content: Rope,
    pub(crate) version: i32,
}

/// Server state shared across handlers. Analysis results are never cached:
/// every request re-scans the current text.
pub struct DragonstoneLanguageServer<C = Client> {
    pub(crate) client: C,
    pub(crate) documents: Arc<DashMap<Url, Document>>,
    pub(crate) config: RwLock<ServerConfig>,
}

impl DragonstoneLanguageServer<Client> {
    pub fn new(client: Client) -> Self {
        Self::with_sink(client)
    }
}

impl<C: ResultSink> DragonstoneLanguageServer<C> {
    pub fn with_sink(client: C) -> Self {
        Self {
            client,
            documents: Arc::new(DashMap::new()),
            config: RwLock::new(ServerConfig::default()),
        }
    }

    /// Copy of the document text and version. The map guard is released
    /// before returning so callers may await freely.
    pub(crate) fn snapshot(&self, uri: &Url) -> Option<(String, i32)> {
        self.documents
            .get(uri)
            .map(|doc| (doc.content.to_string(), doc.version))
    }

    pub(crate) fn text_of(&self, uri: &Url) -> Option<String> {
        self.snapshot(uri).map(|(text, _)| text)
    }
}
