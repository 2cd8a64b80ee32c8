use serde_json::Value;
use tower_lsp::async_trait;
use tower_lsp::lsp_types::{ConfigurationItem, Diagnostic, MessageType, Url};
use tower_lsp::Client;
use tracing::warn;

/// The editor side of the server: where pushed results go and where
/// configuration comes from. [`Client`] in production.
#[async_trait]
pub trait ResultSink: Send + Sync + 'static {
    async fn publish_diagnostics(&self, uri: Url, diagnostics: Vec<Diagnostic>, version: Option<i32>);

    async fn log_message(&self, typ: MessageType, message: String);

    /// Value of one configuration section, `None` when the client has none.
    async fn fetch_configuration(&self, section: &str) -> Option<Value>;
}

#[async_trait]
impl ResultSink for Client {
    async fn publish_diagnostics(&self, uri: Url, diagnostics: Vec<Diagnostic>, version: Option<i32>) {
        Client::publish_diagnostics(self, uri, diagnostics, version).await;
    }

    async fn log_message(&self, typ: MessageType, message: String) {
        Client::log_message(self, typ, message).await;
    }

    async fn fetch_configuration(&self, section: &str) -> Option<Value> {
        let items = vec![ConfigurationItem {
            scope_uri: None,
            section: Some(section.to_string()),
        }];
        match Client::configuration(self, items).await {
            Ok(values) => values.into_iter().next().filter(|v| !v.is_null()),
            Err(err) => {
                warn!(section, error = %err, "configuration request failed");
                None
            }
        }
    }
}
