//! One-line status output on stderr, one marker per kind.

use owo_colors::{OwoColorize, Style};

use super::colors_enabled;

#[derive(Clone, Copy)]
enum Kind {
    Success,
    Info,
    Warning,
    Error,
}

impl Kind {
    fn marker(self) -> &'static str {
        match self {
            Kind::Success => "✓",
            Kind::Info => "ℹ",
            Kind::Warning => "⚠",
            Kind::Error => "✗",
        }
    }

    fn marker_style(self) -> Style {
        let style = Style::new().bold();
        match self {
            Kind::Success => style.green(),
            Kind::Info => style.blue(),
            Kind::Warning => style.yellow(),
            Kind::Error => style.red(),
        }
    }

    /// Warnings and errors tint the text as well as the marker.
    fn text_style(self) -> Option<Style> {
        match self {
            Kind::Warning => Some(Style::new().yellow()),
            Kind::Error => Some(Style::new().red()),
            Kind::Success | Kind::Info => None,
        }
    }
}

fn render(kind: Kind, message: &str, colored: bool) -> String {
    if !colored {
        return format!("{} {}", kind.marker(), message);
    }
    let marker_text = kind.marker();
    let marker = marker_text.style(kind.marker_style());
    match kind.text_style() {
        Some(style) => format!("{} {}", marker, message.style(style)),
        None => format!("{} {}", marker, message),
    }
}

fn emit(kind: Kind, message: &str) {
    eprintln!("{}", render(kind, message, colors_enabled()));
}

/// A build finished, the server is up, assets were copied.
pub fn success(message: &str) {
    emit(Kind::Success, message);
}

pub fn info(message: &str) {
    emit(Kind::Info, message);
}

/// Something went wrong but the run continues.
pub fn warning(message: &str) {
    emit(Kind::Warning, message);
}

pub fn error(message: &str) {
    emit(Kind::Error, message);
}
