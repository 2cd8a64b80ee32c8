mod analysis;
pub mod cli;
mod config;
mod convert;
mod entry;
mod handlers;
mod sink;
mod state;
mod text;

pub use entry::run;
pub use sink::ResultSink;
pub use state::DragonstoneLanguageServer;

/// Configuration section the server asks the client for.
pub(crate) const CONFIG_SECTION: &str = "dragonstone.lsp";
