//! Language server and one-shot analysis CLI for Dragonstone.

pub mod server;

pub use server::{run, DragonstoneLanguageServer, ResultSink};
