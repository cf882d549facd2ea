//! Error types for autoformat setup and firings.

use inkdown_doc::DocumentError;
use miette::Diagnostic;

/// Errors raised while building or installing autoformat rules.
///
/// Firings never surface errors to the user; a failed firing is rolled back
/// and logged, and the typed text stays as it was.
#[derive(thiserror::Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum AutoformatError {
    /// A rule pattern did not compile.
    #[error("invalid autoformat pattern: {0}")]
    #[diagnostic(code(inkdown::autoformat::pattern))]
    InvalidPattern(#[from] regex::Error),

    /// Inline patterns must capture leading marker, content and trailing marker.
    #[error("inline pattern `{pattern}` must have 3 capture groups, found {found}")]
    #[diagnostic(
        code(inkdown::autoformat::inline_groups),
        help("write the pattern as (leading marker)(content)(trailing marker)$")
    )]
    InvalidInlinePattern { pattern: String, found: usize },

    /// The document rejected an operation.
    #[error(transparent)]
    #[diagnostic(code(inkdown::autoformat::document))]
    Document(#[from] DocumentError),
}
