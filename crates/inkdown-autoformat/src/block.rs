//! Block autoformatting: markers typed at the start of a block.
//!
//! When the whole text between the block start and the caret matches a rule,
//! the matched marker is deleted and the block is converted, both inside one
//! transaction.

use inkdown_doc::{
    BlockId, ChangeObserver, CommandParams, CommandTarget, DocumentError, EditorModel,
    TextInsertion, Transaction,
};
use regex::Regex;
use smol_str::SmolStr;
use std::fmt;
use tracing::debug;

use crate::firing::{Outcome, in_transaction, trigger_caret};
use crate::pattern::PatternMatch;

/// What a dynamic action gets to work with.
#[derive(Debug, Clone, Copy)]
pub struct ActionContext<'a> {
    /// Transaction the marker deletion happened in.
    pub transaction: &'a Transaction,
    /// Block being converted.
    pub block: BlockId,
    pub matched: &'a PatternMatch,
}

pub type DynamicAction =
    Box<dyn Fn(&mut dyn EditorModel, ActionContext<'_>) -> Result<(), DocumentError>>;

/// What to do with a block once its marker has been removed.
pub enum BlockAction {
    /// Run a fixed command on the block.
    Command {
        name: SmolStr,
        value: Option<SmolStr>,
    },
    /// Decide from the match, e.g. heading level from marker length.
    Dynamic(DynamicAction),
}

impl BlockAction {
    pub fn command(name: impl Into<SmolStr>) -> Self {
        BlockAction::Command {
            name: name.into(),
            value: None,
        }
    }

    pub fn command_with_value(name: impl Into<SmolStr>, value: impl Into<SmolStr>) -> Self {
        BlockAction::Command {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    pub fn dynamic<F>(action: F) -> Self
    where
        F: Fn(&mut dyn EditorModel, ActionContext<'_>) -> Result<(), DocumentError> + 'static,
    {
        BlockAction::Dynamic(Box::new(action))
    }

    fn run(&self, doc: &mut dyn EditorModel, ctx: ActionContext<'_>) -> Result<(), DocumentError> {
        match self {
            BlockAction::Command { name, value } => {
                let mut params =
                    CommandParams::new(ctx.transaction, CommandTarget::Block(ctx.block));
                params.value = value.clone();
                doc.execute(name, params)
            }
            BlockAction::Dynamic(action) => action(doc, ctx),
        }
    }
}

impl fmt::Debug for BlockAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockAction::Command { name, value } => f
                .debug_struct("Command")
                .field("name", name)
                .field("value", value)
                .finish(),
            BlockAction::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

#[derive(Debug)]
struct BlockRule {
    pattern: Regex,
    action: BlockAction,
}

/// Ordered block rules; the first matching rule fires.
#[derive(Debug, Default)]
pub struct BlockAutoformatEngine {
    rules: Vec<BlockRule>,
}

impl BlockAutoformatEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule after the existing ones.
    pub fn register(&mut self, pattern: Regex, action: BlockAction) -> &mut Self {
        self.rules.push(BlockRule { pattern, action });
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First rule matching all of `text`, which runs from block start to caret.
    pub fn find(&self, text: &str) -> Option<(usize, PatternMatch)> {
        let len = text.chars().count();
        self.rules.iter().enumerate().find_map(|(index, rule)| {
            let found = PatternMatch::find(&rule.pattern, text)?;
            (found.range() == (0..len)).then_some((index, found))
        })
    }

    /// Test the block of a user insertion and fire the first matching rule.
    pub fn process(&self, doc: &mut dyn EditorModel, change: &TextInsertion) -> Outcome {
        let Some(caret) = trigger_caret(doc, change) else {
            return Outcome::Ignored;
        };
        let Some(text) = doc.text(caret.block, 0..caret.offset) else {
            return Outcome::Ignored;
        };
        let Some((index, matched)) = self.find(&text) else {
            return Outcome::NoMatch;
        };
        let Some(rule) = self.rules.get(index) else {
            return Outcome::NoMatch;
        };

        let block = caret.block;
        debug!(rule = index, %block, marker = %text, action = ?rule.action, "block autoformat");
        in_transaction(doc, index, |doc, transaction| {
            doc.delete_range(transaction, block, matched.range())?;
            rule.action.run(
                doc,
                ActionContext {
                    transaction,
                    block,
                    matched: &matched,
                },
            )
        })
    }
}

impl ChangeObserver for BlockAutoformatEngine {
    fn name(&self) -> &str {
        "block-autoformat"
    }

    fn on_text_inserted(&mut self, doc: &mut dyn EditorModel, change: &TextInsertion) {
        self.process(doc, change);
    }
}
