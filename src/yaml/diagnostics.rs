//! Source-located diagnostics for catalog and BOM YAML files

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// A catalog or BOM document that failed to parse
#[derive(Debug, Error, Diagnostic)]
#[error("could not read {kind} file: {message}")]
#[diagnostic(code(costing::yaml::parse))]
pub struct YamlParseError {
    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    kind: &'static str,

    message: String,
}

impl YamlParseError {
    /// Wrap a serde_yml error, pointing at the location it reports
    pub fn from_serde_error(
        err: &serde_yml::Error,
        source: &str,
        filename: &str,
        kind: &'static str,
    ) -> Self {
        let (line, column) = err
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((1, 1));

        let offset = line_col_to_offset(source, line, column);
        let message = err.to_string();

        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset.saturating_add(1)),
            help: suggest(&message),
            kind,
            message,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Byte offset of a 1-based line/column pair, clamped to the source length
fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let line_start = source
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum::<usize>();

    let line_len = source[line_start.min(source.len())..]
        .split('\n')
        .next()
        .map_or(0, str::len);

    (line_start + column.saturating_sub(1).min(line_len)).min(source.len())
}

fn suggest(message: &str) -> Option<String> {
    let msg = message.to_lowercase();

    if msg.contains("invalid type: floating point") || msg.contains("invalid type: integer") {
        return Some(
            "Quote size labels and grade names so they are read as text: \"2\"".to_string(),
        );
    }

    if msg.contains("invalid type: string") {
        return Some("Rates and quantities must be plain numbers without units".to_string());
    }

    if msg.contains("tab") {
        return Some("Indent with spaces; YAML does not allow tabs".to_string());
    }

    if msg.contains("duplicate") {
        return Some("Each material, grade and size may only be listed once per level".to_string());
    }

    if msg.contains("missing field") {
        return Some("Every BOM entry needs at least a `name`".to_string());
    }

    None
}
