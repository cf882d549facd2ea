//! Inline autoformatting: paired markers closed at the caret.
//!
//! Each rule captures exactly three groups: leading marker, content and
//! trailing marker. On a match both markers are deleted and the content is
//! formatted, in one transaction.

use inkdown_doc::{ChangeObserver, CommandParams, CommandTarget, EditorModel, TextInsertion};
use regex::Regex;
use smol_str::SmolStr;
use std::ops::Range;
use tracing::{debug, trace};

use crate::error::AutoformatError;
use crate::firing::{Outcome, in_transaction, trigger_caret};
use crate::pattern::PatternMatch;

/// Chars before the caret tested by default.
pub const DEFAULT_LOOKBACK_CHARS: usize = 256;

/// Marker and content positions of an inline match, in window chars.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineMarkers {
    pub leading: Range<usize>,
    pub content: Range<usize>,
    pub trailing: Range<usize>,
}

impl InlineMarkers {
    fn from_match(found: &PatternMatch) -> Option<Self> {
        let leading = found.get(1)?.range.clone();
        let content = found.get(2)?.range.clone();
        let trailing = found.get(3)?.range.clone();
        let ordered = leading.end <= content.start && content.end <= trailing.start;
        (ordered && !content.is_empty()).then_some(Self {
            leading,
            content,
            trailing,
        })
    }

    fn offset(self, by: usize) -> Self {
        let shift = |range: Range<usize>| range.start + by..range.end + by;
        Self {
            leading: shift(self.leading),
            content: shift(self.content),
            trailing: shift(self.trailing),
        }
    }

    /// Where the content ends up once both markers are gone.
    fn content_after_removal(&self) -> Range<usize> {
        let lead = self.leading.len();
        self.content.start - lead..self.content.end - lead
    }
}

#[derive(Debug)]
struct InlineRule {
    pattern: Regex,
    format: SmolStr,
}

/// Ordered inline rules tested against a bounded window before the caret.
#[derive(Debug)]
pub struct InlineAutoformatEngine {
    rules: Vec<InlineRule>,
    lookback_chars: usize,
}

impl Default for InlineAutoformatEngine {
    fn default() -> Self {
        Self::with_lookback(DEFAULT_LOOKBACK_CHARS)
    }
}

impl InlineAutoformatEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lookback(lookback_chars: usize) -> Self {
        Self {
            rules: Vec::new(),
            lookback_chars,
        }
    }

    pub fn lookback_chars(&self) -> usize {
        self.lookback_chars
    }

    /// Add a rule applying the `format` command to the content group.
    pub fn register(
        &mut self,
        pattern: Regex,
        format: impl Into<SmolStr>,
    ) -> Result<&mut Self, AutoformatError> {
        let found = pattern.captures_len() - 1;
        if found != 3 {
            return Err(AutoformatError::InvalidInlinePattern {
                pattern: pattern.as_str().to_string(),
                found,
            });
        }
        self.rules.push(InlineRule {
            pattern,
            format: format.into(),
        });
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First rule matching at the end of `window`.
    ///
    /// `truncated` says the window starts after the block start. Its first
    /// char is then context only: a leading marker starting there is
    /// discarded, since the text cut off before it could extend the marker.
    pub fn find(&self, window: &str, truncated: bool) -> Option<(usize, InlineMarkers)> {
        let len = window.chars().count();
        self.rules.iter().enumerate().find_map(|(index, rule)| {
            let found = PatternMatch::find(&rule.pattern, window)?;
            if found.range().end != len {
                return None;
            }
            let markers = InlineMarkers::from_match(&found)?;
            if truncated && markers.leading.start == 0 {
                trace!(rule = index, "leading marker at truncated window start");
                return None;
            }
            Some((index, markers))
        })
    }

    /// Test the text before the caret of a user insertion and fire the first
    /// matching rule.
    pub fn process(&self, doc: &mut dyn EditorModel, change: &TextInsertion) -> Outcome {
        let Some(caret) = trigger_caret(doc, change) else {
            return Outcome::Ignored;
        };
        // One extra char of context in front of the lookback span.
        let start = caret.offset.saturating_sub(self.lookback_chars.saturating_add(1));
        let Some(window) = doc.text(caret.block, start..caret.offset) else {
            return Outcome::Ignored;
        };
        let Some((index, markers)) = self.find(&window, start > 0) else {
            return Outcome::NoMatch;
        };
        let Some(rule) = self.rules.get(index) else {
            return Outcome::NoMatch;
        };

        let block = caret.block;
        let markers = markers.offset(start);
        debug!(rule = index, %block, format = %rule.format, ?markers, "inline autoformat");
        in_transaction(doc, index, |doc, transaction| {
            // Trailing first so the leading range stays valid.
            doc.delete_range(transaction, block, markers.trailing.clone())?;
            doc.delete_range(transaction, block, markers.leading.clone())?;
            let target = CommandTarget::Range {
                block,
                range: markers.content_after_removal(),
            };
            doc.execute(&rule.format, CommandParams::new(transaction, target))
        })
    }
}

impl ChangeObserver for InlineAutoformatEngine {
    fn name(&self) -> &str {
        "inline-autoformat"
    }

    fn on_text_inserted(&mut self, doc: &mut dyn EditorModel, change: &TextInsertion) {
        self.process(doc, change);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkdown_doc::commands::{BOLD, ITALIC};
    use inkdown_doc::{Caret, HostDocument, RichDocument, Schema, UndoManager};

    fn engine(lookback: usize) -> InlineAutoformatEngine {
        let mut engine = InlineAutoformatEngine::with_lookback(lookback);
        engine
            .register(Regex::new(r"(\*\*)([^*]+)(\*\*)$").expect("bold"), BOLD)
            .expect("bold rule")
            .register(
                Regex::new(r"(?:^|[^*])(\*)([^*_]+)(\*)$").expect("italic"),
                ITALIC,
            )
            .expect("italic rule");
        engine
    }

    #[test]
    fn test_register_checks_group_count() {
        let mut engine = InlineAutoformatEngine::new();
        let err = engine
            .register(Regex::new(r"\*\*([^*]+)\*\*$").expect("pattern"), BOLD)
            .unwrap_err();
        assert!(matches!(
            err,
            AutoformatError::InvalidInlinePattern { found: 1, .. }
        ));
        assert!(engine.is_empty());
        assert_eq!(engine.lookback_chars(), DEFAULT_LOOKBACK_CHARS);
    }

    #[test]
    fn test_find_reports_marker_ranges() {
        let engine = engine(DEFAULT_LOOKBACK_CHARS);
        let (index, markers) = engine.find("say **hi**", false).expect("bold");
        assert_eq!(index, 0);
        assert_eq!(markers.leading, 4..6);
        assert_eq!(markers.content, 6..8);
        assert_eq!(markers.trailing, 8..10);
        assert_eq!(markers.content_after_removal(), 4..6);

        let (index, markers) = engine.find("a *b*", false).expect("italic");
        assert_eq!(index, 1);
        assert_eq!(markers.leading, 2..3);

        assert!(engine.find("**foo*", false).is_none());
        assert!(engine.find("**foo** ", false).is_none());
        assert!(engine.find("****", false).is_none());
    }

    #[test]
    fn test_truncated_window_start_is_not_trusted() {
        let engine = engine(DEFAULT_LOOKBACK_CHARS);
        assert!(engine.find("*abc*", false).is_some());
        assert!(engine.find("*abc*", true).is_none());
        assert!(engine.find("x*abc*", true).is_some());
    }

    #[test]
    fn test_process_formats_content() {
        let engine = engine(DEFAULT_LOOKBACK_CHARS);
        let mut doc = RichDocument::default();
        let change = doc.type_text("x **bold**").expect("type");

        assert_eq!(engine.process(&mut doc, &change), Outcome::Fired { rule: 0 });
        assert_eq!(doc.to_string(), "paragraph: x <bold>bold</bold>");
        assert_eq!(doc.caret(), Caret::new(change.block, 6));

        assert!(doc.undo());
        assert_eq!(doc.to_string(), "paragraph: x **bold**");
    }

    #[test]
    fn test_context_char_before_lookback() {
        let engine = engine(5);

        let mut doc = RichDocument::default();
        let change = doc.type_text("xx*abc*").expect("type");
        assert_eq!(engine.process(&mut doc, &change), Outcome::Fired { rule: 1 });
        assert_eq!(doc.to_string(), "paragraph: xx<italic>abc</italic>");

        // The char before the window is a bold marker half.
        let mut doc = RichDocument::default();
        let change = doc.type_text("x**abc*").expect("type");
        assert_eq!(engine.process(&mut doc, &change), Outcome::NoMatch);
        assert_eq!(doc.to_string(), "paragraph: x**abc*");
    }

    #[test]
    fn test_fired_insertion_does_not_fire_again() {
        let engine = engine(DEFAULT_LOOKBACK_CHARS);
        let mut doc = RichDocument::default();
        let change = doc.type_text("**foo**").expect("type");

        assert!(engine.process(&mut doc, &change).fired());
        assert_eq!(engine.process(&mut doc, &change), Outcome::Ignored);
        assert_eq!(doc.to_string(), "paragraph: <bold>foo</bold>");

        let text = doc.text(change.block, 0..doc.caret().offset).expect("text");
        assert!(engine.find(&text, false).is_none());
    }

    #[test]
    fn test_unsupported_format_is_rolled_back() {
        let engine = engine(DEFAULT_LOOKBACK_CHARS);
        let mut doc = RichDocument::new(Schema {
            bold: false,
            ..Schema::default()
        });
        let change = doc.type_text("**x**").expect("type");

        assert_eq!(
            engine.process(&mut doc, &change),
            Outcome::Abandoned { rule: 0 }
        );
        assert_eq!(doc.to_string(), "paragraph: **x**");
        assert_eq!(doc.caret(), change.caret);
    }
}
