use dragonstone_core::validate;
use tower_lsp::lsp_types::{Diagnostic, Url};
use tracing::debug;

use super::{convert, sink::ResultSink, state::DragonstoneLanguageServer};

impl<C: ResultSink> DragonstoneLanguageServer<C> {
    /// Full validation of `text` under the current configuration.
    pub(crate) async fn diagnostics_for(&self, text: &str) -> Vec<Diagnostic> {
        let config = *self.config.read().await;
        if !config.diagnostics_enabled {
            return Vec::new();
        }
        validate(text, &config.validation).iter().map(convert::diagnostic).collect()
    }

    /// Re-validates one open document and pushes the complete result set.
    pub(crate) async fn publish_validation(&self, uri: Url) {
        let Some((text, version)) = self.snapshot(&uri) else {
            return;
        };
        let diagnostics = self.diagnostics_for(&text).await;
        debug!(%uri, version, count = diagnostics.len(), "publishing diagnostics");
        self.client.publish_diagnostics(uri, diagnostics, Some(version)).await;
    }

    pub(crate) async fn revalidate_all(&self) {
        let uris: Vec<Url> = self.documents.iter().map(|entry| entry.key().clone()).collect();
        for uri in uris {
            self.publish_validation(uri).await;
        }
    }
}
