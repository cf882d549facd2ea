use serde::Deserialize;

use crate::inline::DEFAULT_LOOKBACK_CHARS;

/// Autoformat settings, usually read from the editor's settings file.
///
/// Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AutoformatConfig {
    /// Chars before the caret the inline rules look at.
    pub lookback_chars: usize,
    /// Install list and heading rules.
    pub block_rules: bool,
    /// Install bold and italic rules.
    pub inline_rules: bool,
}

impl Default for AutoformatConfig {
    fn default() -> Self {
        Self {
            lookback_chars: DEFAULT_LOOKBACK_CHARS,
            block_rules: true,
            inline_rules: true,
        }
    }
}
