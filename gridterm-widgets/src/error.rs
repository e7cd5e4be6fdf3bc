//! Typed error type for gridterm-widgets.

use thiserror::Error;

/// Construction/runtime errors surfaced by the widget system.
///
/// Malformed OSC frames are deliberately *not* represented here — per the
/// error-handling policy (§7), those are silently ignored by the parser and
/// never reach widget construction.
#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("unknown plugin: '{0}'")]
    UnknownPlugin(String),

    #[error("widget '{0}' not found")]
    NotFound(String),

    #[error("widget init failed for plugin '{plugin}': {source}")]
    InitFailed {
        plugin: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("custom glyph codepoint range {0:#x}..={1:#x} overlaps an existing registration")]
    OverlappingGlyphRange(u32, u32),
}
