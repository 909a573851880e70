//! Diagnostic extraction from Rolldown errors.
//!
//! Rolldown reports problems through its own batched diagnostic types. This
//! module turns them into plain [`ExtractedDiagnostic`] records so callers
//! can log or display them without depending on Rolldown's internals.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One error or warning reported by the bundler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedDiagnostic {
    pub kind: DiagnosticKind,
    pub severity: DiagnosticSeverity,
    pub message: String,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub column: Option<u32>,
    pub help: Option<String>,
}

/// Diagnostic kind (mirrors the Rolldown event kinds frontdev cares about).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    ParseError,
    MissingExport,
    UnresolvedEntry,
    UnresolvedImport,
    CircularDependency,
    InvalidOption,
    Transform,
    Other,
}

/// Diagnostic severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticKind::ParseError => "ParseError",
            DiagnosticKind::MissingExport => "MissingExport",
            DiagnosticKind::UnresolvedEntry => "UnresolvedEntry",
            DiagnosticKind::UnresolvedImport => "UnresolvedImport",
            DiagnosticKind::CircularDependency => "CircularDependency",
            DiagnosticKind::InvalidOption => "InvalidOption",
            DiagnosticKind::Transform => "Transform",
            DiagnosticKind::Other => "Error",
        };
        f.write_str(name)
    }
}

impl fmt::Display for ExtractedDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if let Some(file) = &self.file {
            write!(f, " ({file}")?;
            if let Some(line) = self.line {
                write!(f, ":{line}")?;
                if let Some(column) = self.column {
                    write!(f, ":{column}")?;
                }
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}

/// Extract diagnostics from a Rolldown error value.
///
/// Rolldown does not expose a stable structured API for its diagnostics, so
/// this works from the `Debug` rendering. A batched error yields one record
/// per contained diagnostic.
pub fn extract_from_rolldown_error(error: &dyn fmt::Debug) -> Vec<ExtractedDiagnostic> {
    let rendered = format!("{error:?}");

    let parts: Vec<&str> = rendered
        .split("BuildDiagnostic {")
        .skip(1)
        .filter(|part| !part.trim().is_empty())
        .collect();

    if parts.is_empty() {
        return vec![extract_single(&rendered, DiagnosticSeverity::Error)];
    }

    parts
        .into_iter()
        .map(|part| extract_single(part, DiagnosticSeverity::Error))
        .collect()
}

/// Extract a warning record from one of the bundle's warning values.
pub fn extract_warning(warning: &dyn fmt::Debug) -> ExtractedDiagnostic {
    extract_single(&format!("{warning:?}"), DiagnosticSeverity::Warning)
}

fn extract_single(text: &str, default_severity: DiagnosticSeverity) -> ExtractedDiagnostic {
    let severity = if text.contains("severity: Warning") {
        DiagnosticSeverity::Warning
    } else {
        default_severity
    };

    let (file, line, column) = match find_location(text) {
        Some((file, line, column)) => (Some(file), Some(line), column),
        None => (find_source_path(text), None, None),
    };

    ExtractedDiagnostic {
        kind: classify(text),
        severity,
        message: find_message(text),
        file,
        line,
        column,
        help: find_help(text),
    }
}

fn classify(text: &str) -> DiagnosticKind {
    let lower = text.to_lowercase();
    let has = |needle: &str| lower.contains(needle);

    if has("missingexport") || has("missing export") {
        DiagnosticKind::MissingExport
    } else if has("unresolvedentry") || has("cannot resolve entry") {
        DiagnosticKind::UnresolvedEntry
    } else if has("unresolvedimport") || has("could not resolve") || has("cannot resolve") {
        DiagnosticKind::UnresolvedImport
    } else if has("parse") || has("syntax") || has("unexpected token") || has("expected") {
        DiagnosticKind::ParseError
    } else if has("circular") {
        DiagnosticKind::CircularDependency
    } else if has("invalidoption") || has("invalid option") {
        DiagnosticKind::InvalidOption
    } else if has("transform") {
        DiagnosticKind::Transform
    } else {
        DiagnosticKind::Other
    }
}

/// Prefer an explicit `message: "..."` field, then the first non-empty line.
fn find_message(text: &str) -> String {
    if let Some(message) = quoted_after(text, "message: ") {
        return message;
    }

    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("Unknown bundler error")
        .trim_end_matches(['{', '(', ','])
        .trim()
        .to_string()
}

fn find_help(text: &str) -> Option<String> {
    for marker in ["help: ", "Help: ", "hint: ", "Hint: "] {
        if let Some(pos) = text.find(marker) {
            let rest = &text[pos + marker.len()..];
            if let Some(quoted) = rest.strip_prefix('"') {
                return quoted.split('"').next().map(str::to_string);
            }
            let help = rest.lines().next().unwrap_or("").trim();
            if !help.is_empty() {
                return Some(help.to_string());
            }
        }
    }
    None
}

const SOURCE_EXTENSIONS: &[&str] = &[".tsx", ".ts", ".jsx", ".mjs", ".cjs", ".js", ".json"];

/// Find a `path.ext:line[:column]` token.
fn find_location(text: &str) -> Option<(String, u32, Option<u32>)> {
    text.split(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '(' | ')' | ','))
        .find_map(|token| {
            let mut pieces = token.rsplitn(3, ':');
            let last = pieces.next()?;
            let middle = pieces.next()?;
            let head = pieces.next();

            let (path, line, column) = match (head, middle.parse::<u32>(), last.parse::<u32>()) {
                (Some(path), Ok(line), Ok(column)) => (path, line, Some(column)),
                (_, Err(_), Ok(line)) => (middle, line, None),
                _ => return None,
            };

            SOURCE_EXTENSIONS
                .iter()
                .any(|ext| path.ends_with(ext))
                .then(|| (path.to_string(), line, column))
        })
}

fn find_source_path(text: &str) -> Option<String> {
    text.split(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '(' | ')' | ','))
        .find(|token| SOURCE_EXTENSIONS.iter().any(|ext| token.ends_with(ext)))
        .map(str::to_string)
}

fn quoted_after(text: &str, key: &str) -> Option<String> {
    let start = text.find(key)? + key.len();
    let rest = text[start..].strip_prefix('"')?;
    let end = rest.find('"')?;
    let value = rest[..end].trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_location() {
        let text = "Unexpected token at src/app.tsx:12:5 while parsing";
        assert_eq!(
            find_location(text),
            Some(("src/app.tsx".to_string(), 12, Some(5)))
        );
    }

    #[test]
    fn test_extract_location_line_only() {
        assert_eq!(
            find_location("error in index.ts:7"),
            Some(("index.ts".to_string(), 7, None))
        );
    }

    #[test]
    fn test_extract_location_ignores_non_sources() {
        assert_eq!(find_location("listening on 127.0.0.1:8080"), None);
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("Parse error: Unexpected token"), DiagnosticKind::ParseError);
        assert_eq!(
            classify("Could not resolve './missing'"),
            DiagnosticKind::UnresolvedImport
        );
        assert_eq!(classify("something odd"), DiagnosticKind::Other);
    }

    #[test]
    fn test_extract_batched() {
        let rendered = r#"BatchedBuildDiagnostic([BuildDiagnostic { message: "Unexpected token", file: index.tsx:1:8 }, BuildDiagnostic { message: "Could not resolve 'x'", severity: Error }])"#;
        let diagnostics = extract_from_rolldown_error(&DebugText(rendered));

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].message, "Unexpected token");
        assert_eq!(diagnostics[0].kind, DiagnosticKind::ParseError);
        assert_eq!(diagnostics[0].file.as_deref(), Some("index.tsx"));
        assert_eq!(diagnostics[0].line, Some(1));
        assert_eq!(diagnostics[1].kind, DiagnosticKind::UnresolvedImport);
    }

    #[test]
    fn test_extract_plain_error() {
        let diagnostics = extract_from_rolldown_error(&DebugText("boom\nhelp: check the entry"));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "boom");
        assert_eq!(diagnostics[0].help.as_deref(), Some("check the entry"));
    }

    #[test]
    fn test_warning_severity() {
        let warning = extract_warning(&DebugText("unused import in a.ts"));
        assert_eq!(warning.severity, DiagnosticSeverity::Warning);
        assert_eq!(warning.file.as_deref(), Some("a.ts"));
    }

    #[test]
    fn test_display_with_location() {
        let diagnostic = ExtractedDiagnostic {
            kind: DiagnosticKind::ParseError,
            severity: DiagnosticSeverity::Error,
            message: "Unexpected token".into(),
            file: Some("index.tsx".into()),
            line: Some(3),
            column: Some(9),
            help: None,
        };
        assert_eq!(
            diagnostic.to_string(),
            "ParseError: Unexpected token (index.tsx:3:9)"
        );
    }

    /// Debug-prints the wrapped text verbatim.
    struct DebugText(&'static str);

    impl fmt::Debug for DebugText {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.0)
        }
    }
}
