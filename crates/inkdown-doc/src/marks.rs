//! Character-level formatting stored as ranges over a block's text.

use smol_str::SmolStr;
use std::ops::Range;

/// A character format applied to a char range of one block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkSpan {
    pub range: Range<usize>,
    pub format: SmolStr,
}

/// The marks of one block.
///
/// Kept normalized: no empty spans, and spans of the same format never
/// overlap or touch. Sorted by start offset, then format name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Marks {
    spans: Vec<MarkSpan>,
}

impl Marks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spans(&self) -> &[MarkSpan] {
        &self.spans
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Apply `format` to `range`, merging with existing spans of that format.
    pub fn apply(&mut self, range: Range<usize>, format: &str) {
        if range.is_empty() {
            return;
        }
        self.spans.push(MarkSpan {
            range,
            format: format.into(),
        });
        self.normalize();
    }

    /// Whether every char of `range` carries `format`.
    pub fn has_format(&self, range: &Range<usize>, format: &str) -> bool {
        self.spans.iter().any(|span| {
            span.format == format && span.range.start <= range.start && range.end <= span.range.end
        })
    }

    /// Formats active on the char at `offset`.
    pub fn formats_at(&self, offset: usize) -> Vec<&str> {
        self.spans
            .iter()
            .filter(|span| span.range.contains(&offset))
            .map(|span| span.format.as_str())
            .collect()
    }

    /// Inserted text extends a span only when it lands strictly inside it.
    pub(crate) fn shift_for_insert(&mut self, at: usize, len: usize) {
        for span in &mut self.spans {
            if at <= span.range.start {
                span.range.start += len;
                span.range.end += len;
            } else if at < span.range.end {
                span.range.end += len;
            }
        }
    }

    pub(crate) fn shift_for_delete(&mut self, deleted: Range<usize>) {
        let len = deleted.len();
        let map = |pos: usize| {
            if pos <= deleted.start {
                pos
            } else if pos >= deleted.end {
                pos - len
            } else {
                deleted.start
            }
        };
        for span in &mut self.spans {
            span.range = map(span.range.start)..map(span.range.end);
        }
        self.normalize();
    }

    /// Move the marks from `at` onwards into a new set, rebased to zero.
    pub(crate) fn split_off(&mut self, at: usize) -> Marks {
        let mut tail = Vec::new();
        for span in &mut self.spans {
            if span.range.end > at {
                tail.push(MarkSpan {
                    range: span.range.start.saturating_sub(at)..span.range.end - at,
                    format: span.format.clone(),
                });
                span.range.end = at.max(span.range.start);
            }
        }
        self.normalize();
        let mut tail = Marks { spans: tail };
        tail.normalize();
        tail
    }

    fn normalize(&mut self) {
        self.spans.retain(|span| !span.range.is_empty());
        self.spans.sort_by(|a, b| {
            a.format
                .cmp(&b.format)
                .then(a.range.start.cmp(&b.range.start))
        });

        let mut merged: Vec<MarkSpan> = Vec::with_capacity(self.spans.len());
        for span in self.spans.drain(..) {
            if let Some(last) = merged.last_mut() {
                if last.format == span.format && span.range.start <= last.range.end {
                    last.range.end = last.range.end.max(span.range.end);
                    continue;
                }
            }
            merged.push(span);
        }

        merged.sort_by(|a, b| {
            a.range
                .start
                .cmp(&b.range.start)
                .then_with(|| a.format.cmp(&b.format))
        });
        self.spans = merged;
    }
}
