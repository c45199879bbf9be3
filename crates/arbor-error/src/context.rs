//! Rendering context for parse failures.

use arbor_position::LineIndex;

/// A parse failure located in its source, ready for display.
///
/// Built from the furthest failure position and the display names of the
/// parsers that failed there. Positions are char offsets; `line` and
/// `column` are 0-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureContext {
    /// Furthest char offset at which a leaf parser failed.
    pub furthest_pos: usize,
    /// Line of the failure (0-indexed).
    pub line: u32,
    /// Column of the failure (0-indexed).
    pub column: u32,
    /// The source line the failure falls on.
    pub source_line: String,
    /// Display names of the parsers that failed at `furthest_pos`.
    pub causes: Vec<String>,
}

impl FailureContext {
    /// Locate `furthest_pos` in `source` and capture the offending line.
    pub fn locate(furthest_pos: usize, causes: Vec<String>, source: &str) -> Self {
        let index = LineIndex::new(source);
        let (line, column) = index.line_col(furthest_pos);
        let source_line = source
            .lines()
            .nth(line as usize)
            .map(str::to_string)
            .unwrap_or_default();
        Self { furthest_pos, line, column, source_line, causes }
    }

    /// Render a human-readable report with a caret under the failure
    /// column.
    pub fn render(&self) -> String {
        let mut out = format!(
            "parse failed at line {}, column {}\n",
            self.line + 1,
            self.column + 1
        );
        if !self.source_line.is_empty() {
            out.push_str(&self.source_line);
            out.push('\n');
            out.push_str(&" ".repeat(self.column as usize));
            out.push_str("^\n");
        }
        if !self.causes.is_empty() {
            out.push_str("expected: ");
            out.push_str(&self.causes.join(", "));
            out.push('\n');
        }
        out
    }
}
