//! Interfaces between a document and the code that edits it.
//!
//! `EditorModel` is the narrow surface observers (such as autoformatting)
//! consume: text reads, transactions, ranged deletes and named commands.
//! `HostDocument` adds what the [`Editor`](crate::Editor) shell itself needs
//! to drive user input and notifications.

use smol_str::SmolStr;
use std::ops::Range;

use crate::commands::CommandParams;
use crate::error::{DocumentError, RejectedCommit};
use crate::types::{BlockId, BlockKind, Caret, TextInsertion, TransactionId};
use crate::undo::UndoManager;

/// Handle to an open edit transaction.
///
/// Not clonable: it is consumed by exactly one of
/// [`EditorModel::commit_transaction`] or [`EditorModel::rollback_transaction`].
#[derive(Debug, PartialEq, Eq)]
#[must_use = "an open transaction must be committed or rolled back"]
pub struct Transaction {
    id: TransactionId,
}

impl Transaction {
    pub fn new(id: TransactionId) -> Self {
        Self { id }
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }
}

/// Document operations available to observers.
///
/// All offsets are char offsets within a block.
pub trait EditorModel {
    /// Current caret position.
    fn caret(&self) -> Caret;

    fn block_kind(&self, block: BlockId) -> Option<BlockKind>;

    /// Block length in chars.
    fn block_len(&self, block: BlockId) -> Option<usize>;

    /// Read block text. Returns None if the block or range is invalid.
    fn text(&self, block: BlockId, range: Range<usize>) -> Option<SmolStr>;

    /// Open a transaction. Fails if one is already open.
    fn begin_transaction(&mut self) -> Result<Transaction, DocumentError>;

    /// Close the transaction, recording its edits as one undo step.
    ///
    /// On rejection the transaction is returned still open and its edits
    /// still applied; pass it to [`rollback_transaction`](Self::rollback_transaction).
    fn commit_transaction(&mut self, transaction: Transaction) -> Result<(), RejectedCommit>;

    /// Revert every edit made inside the transaction and close it.
    fn rollback_transaction(&mut self, transaction: Transaction);

    fn delete_range(
        &mut self,
        transaction: &Transaction,
        block: BlockId,
        range: Range<usize>,
    ) -> Result<(), DocumentError>;

    fn insert_text(
        &mut self,
        transaction: &Transaction,
        block: BlockId,
        offset: usize,
        text: &str,
    ) -> Result<(), DocumentError>;

    /// Run a named command (see [`commands`](crate::commands)).
    fn execute(&mut self, command: &str, params: CommandParams<'_>) -> Result<(), DocumentError>;

    /// Whether `command` exists, and if `value` is given, whether it accepts it.
    fn supports(&self, command: &str, value: Option<&str>) -> bool;
}

/// A document the [`Editor`](crate::Editor) shell can drive.
pub trait HostDocument: EditorModel + UndoManager {
    /// Insert user-typed text at the caret and move the caret past it.
    fn type_text(&mut self, text: &str) -> Result<TextInsertion, DocumentError>;

    /// Split the caret's block in two (Enter) and move the caret to the new block.
    fn split_block(&mut self) -> Result<BlockId, DocumentError>;

    /// Drain the insertions recorded since the last call, oldest first.
    fn take_changes(&mut self) -> Vec<TextInsertion>;
}
