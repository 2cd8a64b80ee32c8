//! `dragonstone-lsp --analyze [--errors-only] <file>`: one-shot analysis
//! without an editor.

use anyhow::Context;
use dragonstone_core::{analyze, format_edits, FormatOptions, ValidationOptions};
use std::path::{Component, Path};

const USAGE: &str = "Usage: dragonstone-lsp --analyze [--errors-only] <relative-file-path>\n  --analyze <file>     : Full analysis with JSON output\n  --errors-only        : Show only errors in simple format";

pub(crate) fn try_cli_analyze() -> anyhow::Result<Option<String>> {
    let args: Vec<String> = std::env::args().collect();
    analyze_from_args(&args)
}

/// Runs the analysis requested by `args` (program name first). `Ok(None)`
/// means no `--analyze` flag, so the caller should start the server.
pub fn analyze_from_args(args: &[String]) -> anyhow::Result<Option<String>> {
    if args.len() <= 1 {
        return Ok(None);
    }
    let Some(i) = args.iter().position(|a| a == "--analyze") else {
        return Ok(None);
    };

    let path = args
        .iter()
        .skip(i + 1)
        .find(|a| !a.starts_with("--"))
        .ok_or_else(|| anyhow::anyhow!(USAGE))?;
    let errors_only = args.iter().any(|a| a == "--errors-only");

    let content = read_source(check_relative_path(path)?)?;
    render_report(&content, errors_only).map(Some)
}

/// Either the pretty JSON report or, with `errors_only`, one
/// `Line L:C: message` per error.
pub fn render_report(content: &str, errors_only: bool) -> anyhow::Result<String> {
    let analysis = analyze(content, &ValidationOptions::default());

    if errors_only {
        let errors: Vec<String> = analysis
            .errors()
            .map(|d| format!("Line {}: {}", d.range.start, d.message))
            .collect();
        if errors.is_empty() {
            return Ok("No errors found".to_string());
        }
        return Ok(errors.join("\n"));
    }

    let output = serde_json::json!({
        "diagnostics": analysis.diagnostics,
        "symbols": analysis.symbols,
        "formatting_edits": format_edits(content, &FormatOptions::default()),
    });
    serde_json::to_string_pretty(&output).context("Failed to serialize analysis")
}

/// Accepts only a plain path relative to the working directory.
fn check_relative_path(path: &str) -> anyhow::Result<&Path> {
    let candidate = Path::new(path);
    let has_control = path.contains(['\0', '\n', '\r', '\t']);
    let has_drive = path.as_bytes().get(1) == Some(&b':');
    let escapes = candidate
        .components()
        .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)));

    if path.is_empty() || candidate.is_absolute() || has_control || has_drive || escapes {
        anyhow::bail!("Unsafe file path: {path}");
    }
    Ok(candidate)
}

fn read_source(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file '{}'", path.display()))
}
