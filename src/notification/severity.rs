//! Severity classification for notifications
//!
//! Every notification carries one of six severity levels. The level decides
//! the visual style of the rendered embed (symbol, color, title glyph).
//! Unknown levels are not an error: they are rendered with the INFO style.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Severity level for notifications
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Error,
    Success,
    Debug,
    Critical,
}

/// Visual style for one severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeverityStyle {
    /// Prefix of the embed description
    pub symbol: &'static str,
    /// Embed side color (0xRRGGBB)
    pub color: u32,
    /// Prefix of the embed title
    pub title_glyph: &'static str,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Severity {
    pub const ALL: [Severity; 6] = [
        Severity::Info,
        Severity::Error,
        Severity::Warning,
        Severity::Success,
        Severity::Debug,
        Severity::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Success => "SUCCESS",
            Severity::Debug => "DEBUG",
            Severity::Critical => "CRITICAL",
        }
    }

    pub fn style(&self) -> SeverityStyle {
        match self {
            Severity::Info => SeverityStyle {
                symbol: "ℹ️",
                color: 0x3498db,
                title_glyph: "📢",
            },
            Severity::Error => SeverityStyle {
                symbol: "⚠️",
                color: 0xe74c3c,
                title_glyph: "❌",
            },
            Severity::Warning => SeverityStyle {
                symbol: "⚡",
                color: 0xf1c40f,
                title_glyph: "⚠️",
            },
            Severity::Success => SeverityStyle {
                symbol: "✅",
                color: 0x2ecc71,
                title_glyph: "🎉",
            },
            Severity::Debug => SeverityStyle {
                symbol: "🔍",
                color: 0x95a5a6,
                title_glyph: "🐛",
            },
            Severity::Critical => SeverityStyle {
                symbol: "🚨",
                color: 0x992d22,
                title_glyph: "💀",
            },
        }
    }

    /// Parse a caller-supplied type label, case-insensitive
    ///
    /// Anything outside the fixed table falls back to `Info`.
    pub fn from_label(label: &str) -> Self {
        let normalized = label.trim().to_uppercase();
        match normalized.as_str() {
            "INFO" => Severity::Info,
            "WARNING" => Severity::Warning,
            "ERROR" => Severity::Error,
            "SUCCESS" => Severity::Success,
            "DEBUG" => Severity::Debug,
            "CRITICAL" => Severity::Critical,
            _ => {
                debug!(label = %label, "Unknown severity, falling back to INFO");
                Severity::Info
            }
        }
    }
}
