//! Export configuration.

use scout_core::defaults;

/// Layout and encoding options for the export engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    /// Body lines per document page.
    pub page_lines: usize,
    /// Wrap width for document text.
    pub line_width: usize,
    /// Pretty-print json artifacts.
    pub pretty_json: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            page_lines: defaults::DOCUMENT_PAGE_LINES,
            line_width: defaults::DOCUMENT_LINE_WIDTH,
            pretty_json: true,
        }
    }
}

impl ExportConfig {
    /// Create config from environment variables (with defaults).
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `EXPORT_PAGE_LINES` | `54` | Body lines per document page (min 10) |
    /// | `EXPORT_LINE_WIDTH` | `96` | Document wrap width (min 40) |
    /// | `EXPORT_PRETTY_JSON` | `true` | Pretty-print json |
    pub fn from_env() -> Self {
        let page_lines = std::env::var("EXPORT_PAGE_LINES")
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(defaults::DOCUMENT_PAGE_LINES);

        let line_width = std::env::var("EXPORT_LINE_WIDTH")
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(defaults::DOCUMENT_LINE_WIDTH);

        let pretty_json = std::env::var("EXPORT_PRETTY_JSON")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);

        Self::default()
            .with_page_lines(page_lines)
            .with_line_width(line_width)
            .with_pretty_json(pretty_json)
    }

    /// Set lines per page, clamped to the minimum.
    pub fn with_page_lines(mut self, lines: usize) -> Self {
        self.page_lines = lines.max(defaults::DOCUMENT_PAGE_LINES_MIN);
        self
    }

    /// Set wrap width, clamped to the minimum.
    pub fn with_line_width(mut self, width: usize) -> Self {
        self.line_width = width.max(defaults::DOCUMENT_LINE_WIDTH_MIN);
        self
    }

    pub fn with_pretty_json(mut self, pretty: bool) -> Self {
        self.pretty_json = pretty;
        self
    }
}
