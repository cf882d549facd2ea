//! The standard markdown-like rule set and the observer that runs it.

use inkdown_doc::commands::{BOLD, BULLETED_LIST, HEADING, ITALIC, NUMBERED_LIST};
use inkdown_doc::{
    ChangeObserver, CommandParams, CommandTarget, DocumentError, Editor, EditorModel,
    HostDocument, TextInsertion,
};
use regex::Regex;
use tracing::{debug, trace};

use crate::block::{ActionContext, BlockAction, BlockAutoformatEngine};
use crate::config::AutoformatConfig;
use crate::error::AutoformatError;
use crate::inline::InlineAutoformatEngine;
use crate::pattern::MatchGroup;

pub const BULLETED_LIST_PATTERN: &str = r"^[*-]\s$";
pub const NUMBERED_LIST_PATTERN: &str = r"^\d+[.)]?\s$";
/// Group 1 is the `#` run; its length is the heading level.
pub const HEADING_PATTERN: &str = r"^(#{1,3})\s$";
pub const BOLD_ASTERISK_PATTERN: &str = r"(\*\*)([^*]+)(\*\*)$";
pub const BOLD_UNDERSCORE_PATTERN: &str = r"(__)([^_]+)(__)$";
// The italic markers must not be the inner half of a bold marker.
pub const ITALIC_ASTERISK_PATTERN: &str = r"(?:^|[^*])(\*)([^*_]+)(\*)$";
pub const ITALIC_UNDERSCORE_PATTERN: &str = r"(?:^|[^_])(_)([^_]+)(_)$";

/// Lists before headings.
pub fn add_block_rules(engine: &mut BlockAutoformatEngine) -> Result<(), AutoformatError> {
    engine
        .register(
            Regex::new(BULLETED_LIST_PATTERN)?,
            BlockAction::command(BULLETED_LIST),
        )
        .register(
            Regex::new(NUMBERED_LIST_PATTERN)?,
            BlockAction::command(NUMBERED_LIST),
        )
        .register(Regex::new(HEADING_PATTERN)?, BlockAction::dynamic(set_heading));
    Ok(())
}

pub fn add_inline_rules(engine: &mut InlineAutoformatEngine) -> Result<(), AutoformatError> {
    engine
        .register(Regex::new(BOLD_ASTERISK_PATTERN)?, BOLD)?
        .register(Regex::new(BOLD_UNDERSCORE_PATTERN)?, BOLD)?
        .register(Regex::new(ITALIC_ASTERISK_PATTERN)?, ITALIC)?
        .register(Regex::new(ITALIC_UNDERSCORE_PATTERN)?, ITALIC)?;
    Ok(())
}

/// Convert to a heading with the level of the typed marker, or the highest
/// level below it the document has.
fn set_heading(doc: &mut dyn EditorModel, ctx: ActionContext<'_>) -> Result<(), DocumentError> {
    let requested = ctx.matched.get(1).map(MatchGroup::len_chars).unwrap_or(1);
    let level = (1..=requested)
        .rev()
        .find(|level| doc.supports(HEADING, Some(format!("heading{level}").as_str())))
        .ok_or_else(|| DocumentError::UnsupportedValue {
            command: HEADING.into(),
            value: format!("heading{requested}").into(),
        })?;
    if level != requested {
        debug!(requested, level, "heading level clamped");
    }

    let params = CommandParams::new(ctx.transaction, CommandTarget::Block(ctx.block))
        .with_value(format!("heading{level}"));
    doc.execute(HEADING, params)
}

/// Block and inline autoformatting as one observer.
#[derive(Debug)]
pub struct Autoformat {
    block: BlockAutoformatEngine,
    inline: InlineAutoformatEngine,
    requires: Vec<&'static str>,
}

impl Autoformat {
    pub fn new(config: &AutoformatConfig) -> Result<Self, AutoformatError> {
        let mut block = BlockAutoformatEngine::new();
        let mut inline = InlineAutoformatEngine::with_lookback(config.lookback_chars);
        let mut requires = Vec::new();

        if config.block_rules {
            add_block_rules(&mut block)?;
            requires.extend([BULLETED_LIST, NUMBERED_LIST, HEADING]);
        }
        if config.inline_rules {
            add_inline_rules(&mut inline)?;
            requires.extend([BOLD, ITALIC]);
        }

        Ok(Self {
            block,
            inline,
            requires,
        })
    }

    /// Build the rule set and subscribe it to `editor`.
    ///
    /// Fails if the document lacks any command an enabled rule uses.
    pub fn install<D: HostDocument>(
        editor: &mut Editor<D>,
        config: AutoformatConfig,
    ) -> Result<(), AutoformatError> {
        let autoformat = Self::new(&config)?;
        let rules = autoformat.block.len() + autoformat.inline.len();
        editor.add_observer(Box::new(autoformat))?;
        debug!(rules, lookback = config.lookback_chars, "autoformat installed");
        Ok(())
    }

    pub fn block_engine(&self) -> &BlockAutoformatEngine {
        &self.block
    }

    pub fn inline_engine(&self) -> &InlineAutoformatEngine {
        &self.inline
    }
}

impl ChangeObserver for Autoformat {
    fn name(&self) -> &str {
        "autoformat"
    }

    fn requires(&self) -> &[&'static str] {
        &self.requires
    }

    fn on_text_inserted(&mut self, doc: &mut dyn EditorModel, change: &TextInsertion) {
        // A block firing moves the caret, so the inline pass then sees a
        // stale insertion and skips.
        let block = self.block.process(doc, change);
        let inline = self.inline.process(doc, change);
        trace!(?block, ?inline, "insertion processed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_rule_counts() {
        let autoformat = Autoformat::new(&AutoformatConfig::default()).expect("rules");
        assert_eq!(autoformat.block_engine().len(), 3);
        assert_eq!(autoformat.inline_engine().len(), 4);
        assert_eq!(
            autoformat.requires(),
            &[BULLETED_LIST, NUMBERED_LIST, HEADING, BOLD, ITALIC]
        );
    }

    #[test]
    fn test_disabled_groups_require_nothing() {
        let autoformat = Autoformat::new(&AutoformatConfig {
            block_rules: false,
            ..AutoformatConfig::default()
        })
        .expect("rules");
        assert!(autoformat.block_engine().is_empty());
        assert_eq!(autoformat.requires(), &[BOLD, ITALIC]);
    }

    #[test]
    fn test_block_patterns() {
        let autoformat = Autoformat::new(&AutoformatConfig::default()).expect("rules");
        let engine = autoformat.block_engine();
        let rule = |text: &str| engine.find(text).map(|(index, _)| index);

        assert_eq!(rule("- "), Some(0));
        assert_eq!(rule("* "), Some(0));
        assert_eq!(rule("1. "), Some(1));
        assert_eq!(rule("7) "), Some(1));
        assert_eq!(rule("42 "), Some(1));
        assert_eq!(rule("# "), Some(2));
        assert_eq!(rule("### "), Some(2));
        assert_eq!(rule("#### "), None);
        assert_eq!(rule("-"), None);
        assert_eq!(rule("1.x "), None);
    }

    #[test]
    fn test_inline_patterns() {
        let autoformat = Autoformat::new(&AutoformatConfig::default()).expect("rules");
        let engine = autoformat.inline_engine();
        let rule = |text: &str| engine.find(text, false).map(|(index, _)| index);

        assert_eq!(rule("**a**"), Some(0));
        assert_eq!(rule("__a__"), Some(1));
        assert_eq!(rule("*a*"), Some(2));
        assert_eq!(rule("x _a_"), Some(3));
        assert_eq!(rule("**a*"), None);
        assert_eq!(rule("__a_"), None);
        assert_eq!(rule("*a_b*"), None);
        assert_eq!(rule("a*"), None);
    }
}
