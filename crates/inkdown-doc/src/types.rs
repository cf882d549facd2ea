//! Core document types: block identity and kind, caret, and change records.
//!
//! These types are shared by the document model and anything observing it.

use std::fmt;
use std::ops::Range;

/// Stable identifier of a block. Survives edits to other blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub(crate) u64);

impl BlockId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b{}", self.0)
    }
}

/// Structural type of a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BlockKind {
    #[default]
    Paragraph,
    /// Heading with level 1 (largest) and up.
    Heading(u8),
    ListItem(ListStyle),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListStyle {
    Bulleted,
    Numbered,
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockKind::Paragraph => f.write_str("paragraph"),
            BlockKind::Heading(level) => write!(f, "heading{level}"),
            BlockKind::ListItem(ListStyle::Bulleted) => f.write_str("bulletedList"),
            BlockKind::ListItem(ListStyle::Numbered) => f.write_str("numberedList"),
        }
    }
}

/// Text insertion position: a block plus a char offset inside it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Caret {
    pub block: BlockId,
    /// Character offset in the block text (NOT byte offset!)
    pub offset: usize,
}

impl Caret {
    pub fn new(block: BlockId, offset: usize) -> Self {
        Self { block, offset }
    }
}

/// Identifier of an edit transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TransactionId(pub(crate) u64);

impl TransactionId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// What produced a mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeOrigin {
    /// Typed by the user.
    User,
    /// Issued inside a transaction, e.g. by an autoformat firing.
    Transaction(TransactionId),
}

impl ChangeOrigin {
    pub fn is_user(&self) -> bool {
        matches!(self, ChangeOrigin::User)
    }
}

/// Notification payload for a completed text insertion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextInsertion {
    /// Block that received the text.
    pub block: BlockId,
    /// Char range of the inserted text within the block, after insertion.
    pub range: Range<usize>,
    /// Caret position right after the insertion.
    pub caret: Caret,
    pub origin: ChangeOrigin,
}

impl TextInsertion {
    pub fn inserted_len(&self) -> usize {
        self.range.len()
    }

    /// Whether the insertion ended exactly at the caret it reports.
    pub fn ends_at_caret(&self) -> bool {
        self.caret.block == self.block && self.caret.offset == self.range.end
    }
}
