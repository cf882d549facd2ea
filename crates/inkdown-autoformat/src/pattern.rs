//! Pattern matches with char offsets.
//!
//! `regex` reports byte offsets into the tested window; documents address
//! text in chars, so matches are converted once here.

use regex::{Captures, Regex};
use smol_str::SmolStr;
use std::ops::Range;

/// One captured group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchGroup {
    pub text: SmolStr,
    /// Char range within the tested window.
    pub range: Range<usize>,
}

impl MatchGroup {
    pub fn len_chars(&self) -> usize {
        self.range.len()
    }
}

/// A successful pattern test: the whole match plus every capture group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternMatch {
    groups: Vec<Option<MatchGroup>>,
}

impl PatternMatch {
    pub(crate) fn from_captures(window: &str, captures: &Captures<'_>) -> Self {
        let groups = captures
            .iter()
            .map(|group| {
                group.map(|m| {
                    let start = char_offset(window, m.start());
                    MatchGroup {
                        text: m.as_str().into(),
                        range: start..start + m.as_str().chars().count(),
                    }
                })
            })
            .collect();
        Self { groups }
    }

    /// Run `pattern` against `window`.
    pub fn find(pattern: &Regex, window: &str) -> Option<Self> {
        pattern
            .captures(window)
            .map(|captures| Self::from_captures(window, &captures))
    }

    /// Group `index`; 0 is the whole match. None if the group did not participate.
    pub fn get(&self, index: usize) -> Option<&MatchGroup> {
        self.groups.get(index)?.as_ref()
    }

    /// Char range of the whole match.
    pub fn range(&self) -> Range<usize> {
        self.get(0).map(|group| group.range.clone()).unwrap_or(0..0)
    }

    /// Number of groups including the whole match.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

fn char_offset(text: &str, byte_offset: usize) -> usize {
    text[..byte_offset].chars().count()
}
