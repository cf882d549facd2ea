//! Error types for document operations.

use smol_str::SmolStr;
use std::ops::Range;
use thiserror::Error;

use crate::model::Transaction;
use crate::types::{BlockId, TransactionId};

/// Errors that can occur while editing a document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DocumentError {
    /// The block does not exist (any more).
    #[error("unknown block {0}")]
    UnknownBlock(BlockId),

    /// A char range does not fit inside the block text.
    #[error("range {range:?} is out of bounds for block {block} of length {len}")]
    RangeOutOfBounds {
        block: BlockId,
        range: Range<usize>,
        len: usize,
    },

    /// Only one transaction may be open at a time.
    #[error("a transaction is already open")]
    TransactionInProgress,

    #[error("no transaction is open")]
    NoOpenTransaction,

    /// The handle passed in does not belong to the open transaction.
    #[error("transaction {0:?} is not the open transaction")]
    TransactionMismatch(TransactionId),

    #[error("unknown command `{0}`")]
    UnknownCommand(SmolStr),

    #[error("command `{command}` does not support value `{value}`")]
    UnsupportedValue { command: SmolStr, value: SmolStr },

    #[error("command `{0}` requires a value")]
    MissingValue(SmolStr),

    /// An observer depends on commands the document does not provide.
    #[error("observer `{observer}` requires missing commands: {}", missing.join(", "))]
    MissingCommands {
        observer: SmolStr,
        missing: Vec<SmolStr>,
    },
}

/// A commit the document refused.
///
/// The transaction is handed back still open, so the caller can roll it back.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("commit rejected: {error}")]
pub struct RejectedCommit {
    pub transaction: Transaction,
    #[source]
    pub error: DocumentError,
}
