//! Named document commands and the schema deciding which ones exist.
//!
//! Commands are addressed by name so observers can depend on them without
//! linking against the code that implements them.

use smol_str::SmolStr;
use std::ops::Range;

use crate::error::DocumentError;
use crate::model::Transaction;
use crate::types::{BlockId, BlockKind, ListStyle};

pub const PARAGRAPH: &str = "paragraph";
/// Takes a `headingN` (or `paragraph`) value.
pub const HEADING: &str = "heading";
pub const BULLETED_LIST: &str = "bulletedList";
pub const NUMBERED_LIST: &str = "numberedList";
pub const BOLD: &str = "bold";
pub const ITALIC: &str = "italic";

/// What a command acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandTarget {
    /// The whole block.
    Block(BlockId),
    /// A char range inside one block.
    Range { block: BlockId, range: Range<usize> },
}

impl CommandTarget {
    pub fn block(&self) -> BlockId {
        match self {
            CommandTarget::Block(block) => *block,
            CommandTarget::Range { block, .. } => *block,
        }
    }
}

/// Parameters of [`EditorModel::execute`](crate::EditorModel::execute).
#[derive(Debug, Clone)]
pub struct CommandParams<'a> {
    /// Transaction the command's edits are grouped into.
    pub transaction: &'a Transaction,
    pub target: CommandTarget,
    pub value: Option<SmolStr>,
}

impl<'a> CommandParams<'a> {
    pub fn new(transaction: &'a Transaction, target: CommandTarget) -> Self {
        Self {
            transaction,
            target,
            value: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<SmolStr>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// The block kinds and formats a document provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    /// Highest heading level available; 0 disables headings.
    pub max_heading_level: u8,
    pub lists: bool,
    pub bold: bool,
    pub italic: bool,
}

impl Default for Schema {
    fn default() -> Self {
        Self {
            max_heading_level: 3,
            lists: true,
            bold: true,
            italic: true,
        }
    }
}

/// A resolved command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    SetKind(BlockKind),
    Format(&'static str),
}

impl Schema {
    /// Paragraphs only.
    pub fn plain() -> Self {
        Self {
            max_heading_level: 0,
            lists: false,
            bold: false,
            italic: false,
        }
    }

    /// Whether `command` exists; with a value, whether it accepts that value.
    pub fn supports(&self, command: &str, value: Option<&str>) -> bool {
        match value {
            None => self.commands().contains(&command),
            Some(_) => self.resolve(command, value).is_ok(),
        }
    }

    /// Names of all available commands.
    pub fn commands(&self) -> Vec<&'static str> {
        let mut commands = vec![PARAGRAPH];
        if self.max_heading_level > 0 {
            commands.push(HEADING);
        }
        if self.lists {
            commands.extend([BULLETED_LIST, NUMBERED_LIST]);
        }
        if self.bold {
            commands.push(BOLD);
        }
        if self.italic {
            commands.push(ITALIC);
        }
        commands
    }

    pub(crate) fn resolve(&self, command: &str, value: Option<&str>) -> Result<Command, DocumentError> {
        match command {
            PARAGRAPH => Ok(Command::SetKind(BlockKind::Paragraph)),
            HEADING if self.max_heading_level > 0 => {
                let value = value.ok_or_else(|| DocumentError::MissingValue(HEADING.into()))?;
                self.heading_kind(value)
                    .map(Command::SetKind)
                    .ok_or_else(|| DocumentError::UnsupportedValue {
                        command: HEADING.into(),
                        value: value.into(),
                    })
            }
            BULLETED_LIST if self.lists => {
                Ok(Command::SetKind(BlockKind::ListItem(ListStyle::Bulleted)))
            }
            NUMBERED_LIST if self.lists => {
                Ok(Command::SetKind(BlockKind::ListItem(ListStyle::Numbered)))
            }
            BOLD if self.bold => Ok(Command::Format(BOLD)),
            ITALIC if self.italic => Ok(Command::Format(ITALIC)),
            _ => Err(DocumentError::UnknownCommand(command.into())),
        }
    }

    fn heading_kind(&self, value: &str) -> Option<BlockKind> {
        if value == PARAGRAPH {
            return Some(BlockKind::Paragraph);
        }
        let level: u8 = value.strip_prefix("heading")?.parse().ok()?;
        (1..=self.max_heading_level)
            .contains(&level)
            .then_some(BlockKind::Heading(level))
    }
}
