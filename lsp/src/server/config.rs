use dragonstone_core::ValidationOptions;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use super::{sink::ResultSink, state::DragonstoneLanguageServer, CONFIG_SECTION};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ServerConfig {
    pub(crate) diagnostics_enabled: bool,
    pub(crate) validation: ValidationOptions,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            diagnostics_enabled: true,
            validation: ValidationOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct DragonstoneLspConfigSection {
    #[serde(default)]
    diagnostics: DiagnosticsConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct DiagnosticsConfig {
    #[serde(default)]
    enabled: Option<bool>,
    #[serde(default)]
    naming_conventions: Option<bool>,
    #[serde(default)]
    bracket_balance: Option<bool>,
    #[serde(default)]
    comment_nesting: Option<bool>,
}

impl ServerConfig {
    /// Builds a configuration from the client's section value. Missing fields
    /// keep their defaults.
    pub(crate) fn from_section(value: Value) -> Result<Self, serde_json::Error> {
        let section: DragonstoneLspConfigSection = serde_json::from_value(value)?;
        let d = section.diagnostics;
        let defaults = ValidationOptions::default();
        Ok(Self {
            diagnostics_enabled: d.enabled.unwrap_or(true),
            validation: ValidationOptions {
                naming_conventions: d.naming_conventions.unwrap_or(defaults.naming_conventions),
                bracket_balance: d.bracket_balance.unwrap_or(defaults.bracket_balance),
                comment_nesting: d.comment_nesting.unwrap_or(defaults.comment_nesting),
            },
        })
    }
}

/// Digs `dragonstone.lsp` out of a pushed `didChangeConfiguration` payload.
/// Clients send either `{"dragonstone": {"lsp": ...}}` or the flat dotted key.
pub(crate) fn section_in_settings(settings: &Value) -> Option<&Value> {
    settings
        .get(CONFIG_SECTION)
        .or_else(|| settings.get("dragonstone").and_then(|v| v.get("lsp")))
}

impl<C: ResultSink> DragonstoneLanguageServer<C> {
    pub(crate) async fn load_config(&self) {
        let Some(value) = self.client.fetch_configuration(CONFIG_SECTION).await else {
            return;
        };
        self.apply_config_value(value).await;
    }

    pub(crate) async fn apply_config_value(&self, value: Value) {
        match ServerConfig::from_section(value) {
            Ok(cfg) => {
                info!(?cfg, "configuration updated");
                *self.config.write().await = cfg;
            }
            Err(err) => warn!(error = %err, "ignoring malformed {} section", CONFIG_SECTION),
        }
    }
}
