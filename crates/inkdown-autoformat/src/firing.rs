//! Shared trigger and transaction handling for both engines.

use inkdown_doc::{Caret, DocumentError, EditorModel, TextInsertion, Transaction};
use tracing::{debug, trace};

/// What an engine did with one notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Not a user insertion at the caret, so nothing was tested.
    Ignored,
    /// No rule matched.
    NoMatch,
    /// Rule `rule` (registration index) fired and its transaction committed.
    Fired { rule: usize },
    /// Rule `rule` matched but the document rejected the edit; nothing changed.
    Abandoned { rule: usize },
}

impl Outcome {
    pub fn fired(&self) -> bool {
        matches!(self, Outcome::Fired { .. })
    }
}

/// The caret to test from, if `change` is a user insertion that ended at the
/// current caret.
pub(crate) fn trigger_caret(doc: &dyn EditorModel, change: &TextInsertion) -> Option<Caret> {
    if !change.origin.is_user() {
        trace!(origin = ?change.origin, "ignoring non-user insertion");
        return None;
    }
    if change.range.is_empty() || !change.ends_at_caret() {
        return None;
    }
    let caret = doc.caret();
    if caret != change.caret {
        trace!(?caret, reported = ?change.caret, "caret moved since insertion");
        return None;
    }
    Some(caret)
}

/// Run `edit` inside one transaction: commit on success, roll back on error.
pub(crate) fn in_transaction<F>(doc: &mut dyn EditorModel, rule: usize, edit: F) -> Outcome
where
    F: FnOnce(&mut dyn EditorModel, &Transaction) -> Result<(), DocumentError>,
{
    let transaction = match doc.begin_transaction() {
        Ok(transaction) => transaction,
        Err(err) => {
            debug!(%err, rule, "could not open transaction");
            return Outcome::Abandoned { rule };
        }
    };

    match edit(&mut *doc, &transaction) {
        Ok(()) => match doc.commit_transaction(transaction) {
            Ok(()) => Outcome::Fired { rule },
            Err(rejected) => {
                debug!(err = %rejected.error, rule, "commit rejected, rolling back");
                doc.rollback_transaction(rejected.transaction);
                Outcome::Abandoned { rule }
            }
        },
        Err(err) => {
            debug!(%err, rule, "autoformat abandoned, rolling back");
            doc.rollback_transaction(transaction);
            Outcome::Abandoned { rule }
        }
    }
}
