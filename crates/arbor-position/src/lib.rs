//! Span and line-index types for arbor diagnostics.
mod line_index;
mod span;
pub use line_index::LineIndex;
pub use span::Span;
