//! Block-structured rich text document.
//!
//! `RichDocument` is a list of blocks, each with a kind, a rope of text and
//! character marks. Every mutation is recorded as an [`EditOp`]; outside a
//! transaction each op is its own undo step, inside one the ops are grouped
//! and committed (or rolled back) together.

use smol_str::SmolStr;
use std::fmt;
use std::ops::Range;
use tracing::{debug, trace, warn};

use crate::commands::{Command, CommandParams, CommandTarget, Schema};
use crate::error::{DocumentError, RejectedCommit};
use crate::marks::Marks;
use crate::model::{EditorModel, HostDocument, Transaction};
use crate::text::{EditorRope, TextBuffer};
use crate::types::{BlockId, BlockKind, Caret, ChangeOrigin, TextInsertion, TransactionId};
use crate::undo::{EditOp, History, UndoManager, UndoStep};

/// One structural unit of the document.
#[derive(Clone, Debug)]
pub struct Block {
    id: BlockId,
    kind: BlockKind,
    text: EditorRope,
    marks: Marks,
}

impl Block {
    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn text(&self) -> String {
        self.text.to_string()
    }

    pub fn len_chars(&self) -> usize {
        self.text.len_chars()
    }

    pub fn marks(&self) -> &Marks {
        &self.marks
    }

    /// Write the text with `<format>..</format>` tags around marked runs.
    fn fmt_inline(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chars: Vec<char> = self.text.to_string().chars().collect();
        let mut boundaries = vec![0, chars.len()];
        for span in self.marks.spans() {
            boundaries.extend([span.range.start, span.range.end]);
        }
        boundaries.sort_unstable();
        boundaries.dedup();

        for pair in boundaries.windows(2) {
            let (start, end) = (pair[0], pair[1].min(chars.len()));
            if start >= end {
                continue;
            }
            let formats = self.marks.formats_at(start);
            for format in &formats {
                write!(f, "<{format}>")?;
            }
            let segment: String = chars[start..end].iter().collect();
            f.write_str(&segment)?;
            for format in formats.iter().rev() {
                write!(f, "</{format}>")?;
            }
        }
        Ok(())
    }
}

#[derive(Debug)]
struct OpenTransaction {
    id: TransactionId,
    ops: Vec<EditOp>,
    caret_before: Caret,
}

/// The reference [`HostDocument`] implementation.
///
/// Always holds at least one block.
#[derive(Debug)]
pub struct RichDocument {
    blocks: Vec<Block>,
    caret: Caret,
    schema: Schema,
    history: History,
    open: Option<OpenTransaction>,
    pending: Vec<TextInsertion>,
    next_block_id: u64,
    next_transaction_id: u64,
}

impl Default for RichDocument {
    fn default() -> Self {
        Self::new(Schema::default())
    }
}

impl RichDocument {
    /// Create a document holding one empty paragraph, caret inside it.
    pub fn new(schema: Schema) -> Self {
        let first = BlockId(0);
        Self {
            blocks: vec![Block {
                id: first,
                kind: BlockKind::Paragraph,
                text: EditorRope::new(),
                marks: Marks::new(),
            }],
            caret: Caret::new(first, 0),
            schema,
            history: History::default(),
            open: None,
            pending: Vec::new(),
            next_block_id: 1,
            next_transaction_id: 0,
        }
    }

    /// Bound the undo history to `max_steps`.
    pub fn with_max_undo_steps(mut self, max_steps: usize) -> Self {
        self.history = History::new(max_steps);
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|block| block.id == id)
    }

    pub fn block_ids(&self) -> Vec<BlockId> {
        self.blocks.iter().map(|block| block.id).collect()
    }

    /// Append a block without recording it in the undo history.
    ///
    /// Intended for loading content before editing starts.
    pub fn push_block(&mut self, kind: BlockKind, text: &str) -> BlockId {
        let id = self.allocate_block_id();
        self.blocks.push(Block {
            id,
            kind,
            text: EditorRope::from_str(text),
            marks: Marks::new(),
        });
        id
    }

    pub fn set_caret(&mut self, caret: Caret) -> Result<(), DocumentError> {
        let len = self
            .block(caret.block)
            .ok_or(DocumentError::UnknownBlock(caret.block))?
            .len_chars();
        if caret.offset > len {
            return Err(DocumentError::RangeOutOfBounds {
                block: caret.block,
                range: caret.offset..caret.offset,
                len,
            });
        }
        self.caret = caret;
        Ok(())
    }

    pub fn is_in_transaction(&self) -> bool {
        self.open.is_some()
    }

    fn allocate_block_id(&mut self) -> BlockId {
        let id = BlockId(self.next_block_id);
        self.next_block_id += 1;
        id
    }

    fn index_of(&self, id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|block| block.id == id)
    }

    fn block_mut(&mut self, id: BlockId) -> Result<&mut Block, DocumentError> {
        self.blocks
            .iter_mut()
            .find(|block| block.id == id)
            .ok_or(DocumentError::UnknownBlock(id))
    }

    /// Replace `delete_len` chars at `pos` with `inserted`, keeping marks in step.
    fn replace_text(
        &mut self,
        block: BlockId,
        pos: usize,
        delete_len: usize,
        inserted: &str,
    ) -> Result<EditOp, DocumentError> {
        let target = self.block_mut(block)?;
        let len = target.text.len_chars();
        if pos + delete_len > len {
            return Err(DocumentError::RangeOutOfBounds {
                block,
                range: pos..pos + delete_len,
                len,
            });
        }

        let marks_before = target.marks.clone();
        let deleted = target.text.slice(pos..pos + delete_len).unwrap_or_default();
        if delete_len > 0 {
            target.text.delete(pos..pos + delete_len);
            target.marks.shift_for_delete(pos..pos + delete_len);
        }

        let inserted_len = inserted.chars().count();
        if inserted_len > 0 {
            target.text.insert(pos, inserted);
            target.marks.shift_for_insert(pos, inserted_len);
        }

        Ok(EditOp::Text {
            block,
            pos,
            deleted,
            inserted: SmolStr::new(inserted),
            marks_before,
            marks_after: target.marks.clone(),
        })
    }

    fn shift_caret_for_insert(&mut self, block: BlockId, pos: usize, len: usize) {
        if self.caret.block == block && self.caret.offset >= pos {
            self.caret.offset += len;
        }
    }

    fn shift_caret_for_delete(&mut self, block: BlockId, deleted: &Range<usize>) {
        if self.caret.block != block {
            return;
        }
        if self.caret.offset >= deleted.end {
            self.caret.offset -= deleted.len();
        } else if self.caret.offset > deleted.start {
            self.caret.offset = deleted.start;
        }
    }

    /// Add `op` to the open transaction, or record it as its own undo step.
    fn record(&mut self, op: EditOp, caret_before: Caret) {
        match &mut self.open {
            Some(open) => open.ops.push(op),
            None => self.history.record(UndoStep {
                ops: vec![op],
                caret_before,
                caret_after: self.caret,
            }),
        }
    }

    fn check_transaction(&self, transaction: &Transaction) -> Result<TransactionId, DocumentError> {
        match &self.open {
            None => Err(DocumentError::NoOpenTransaction),
            Some(open) if open.id != transaction.id() => {
                Err(DocumentError::TransactionMismatch(transaction.id()))
            }
            Some(open) => Ok(open.id),
        }
    }

    /// Split `block` at `at`, moving the tail into a new block placed after it.
    ///
    /// Returns the marks the block had before the split.
    fn split_at(
        &mut self,
        block: BlockId,
        at: usize,
        new_block: BlockId,
        new_kind: BlockKind,
    ) -> Result<Marks, DocumentError> {
        let index = self.index_of(block).ok_or(DocumentError::UnknownBlock(block))?;
        let source = &mut self.blocks[index];
        let len = source.text.len_chars();
        if at > len {
            return Err(DocumentError::RangeOutOfBounds {
                block,
                range: at..at,
                len,
            });
        }

        let marks_before = source.marks.clone();
        let text = source.text.split_off(at);
        let marks = source.marks.split_off(at);
        self.blocks.insert(
            index + 1,
            Block {
                id: new_block,
                kind: new_kind,
                text,
                marks,
            },
        );
        Ok(marks_before)
    }

    fn revert(&mut self, op: &EditOp) {
        match op {
            EditOp::Text {
                block,
                pos,
                deleted,
                inserted,
                marks_before,
                ..
            } => match self.block_mut(*block) {
                Ok(target) => {
                    let inserted_len = inserted.chars().count();
                    if inserted_len > 0 {
                        target.text.delete(*pos..*pos + inserted_len);
                    }
                    if !deleted.is_empty() {
                        target.text.insert(*pos, deleted);
                    }
                    target.marks = marks_before.clone();
                }
                Err(err) => warn!(%err, "cannot revert text edit"),
            },
            EditOp::Kind { block, before, .. } => match self.block_mut(*block) {
                Ok(target) => target.kind = *before,
                Err(err) => warn!(%err, "cannot revert block kind"),
            },
            EditOp::Marks { block, before, .. } => match self.block_mut(*block) {
                Ok(target) => target.marks = before.clone(),
                Err(err) => warn!(%err, "cannot revert marks"),
            },
            EditOp::Split {
                block,
                new_block,
                marks_before,
                ..
            } => {
                let Some(tail_index) = self.index_of(*new_block) else {
                    warn!(%new_block, "cannot revert split: tail block missing");
                    return;
                };
                let tail = self.blocks.remove(tail_index);
                match self.block_mut(*block) {
                    Ok(target) => {
                        target.text.push(&tail.text.to_string());
                        target.marks = marks_before.clone();
                    }
                    Err(err) => warn!(%err, "cannot revert split"),
                }
            }
        }
    }

    fn replay(&mut self, op: &EditOp) {
        match op {
            EditOp::Text {
                block,
                pos,
                deleted,
                inserted,
                marks_after,
                ..
            } => match self.block_mut(*block) {
                Ok(target) => {
                    let deleted_len = deleted.chars().count();
                    if deleted_len > 0 {
                        target.text.delete(*pos..*pos + deleted_len);
                    }
                    if !inserted.is_empty() {
                        target.text.insert(*pos, inserted);
                    }
                    target.marks = marks_after.clone();
                }
                Err(err) => warn!(%err, "cannot replay text edit"),
            },
            EditOp::Kind { block, after, .. } => match self.block_mut(*block) {
                Ok(target) => target.kind = *after,
                Err(err) => warn!(%err, "cannot replay block kind"),
            },
            EditOp::Marks { block, after, .. } => match self.block_mut(*block) {
                Ok(target) => target.marks = after.clone(),
                Err(err) => warn!(%err, "cannot replay marks"),
            },
            EditOp::Split {
                block,
                at,
                new_block,
                new_kind,
                ..
            } => {
                if let Err(err) = self.split_at(*block, *at, *new_block, *new_kind) {
                    warn!(%err, "cannot replay split");
                }
            }
        }
    }
}

impl EditorModel for RichDocument {
    fn caret(&self) -> Caret {
        self.caret
    }

    fn block_kind(&self, block: BlockId) -> Option<BlockKind> {
        self.block(block).map(Block::kind)
    }

    fn block_len(&self, block: BlockId) -> Option<usize> {
        self.block(block).map(Block::len_chars)
    }

    fn text(&self, block: BlockId, range: Range<usize>) -> Option<SmolStr> {
        self.block(block)?.text.slice(range)
    }

    fn begin_transaction(&mut self) -> Result<Transaction, DocumentError> {
        if let Some(open) = &self.open {
            debug!(id = ?open.id, "transaction already open");
            return Err(DocumentError::TransactionInProgress);
        }
        let id = TransactionId(self.next_transaction_id);
        self.next_transaction_id += 1;
        self.open = Some(OpenTransaction {
            id,
            ops: Vec::new(),
            caret_before: self.caret,
        });
        trace!(?id, "transaction opened");
        Ok(Transaction::new(id))
    }

    fn commit_transaction(&mut self, transaction: Transaction) -> Result<(), RejectedCommit> {
        if let Err(error) = self.check_transaction(&transaction) {
            return Err(RejectedCommit { transaction, error });
        }
        let Some(open) = self.open.take() else {
            return Err(RejectedCommit {
                transaction,
                error: DocumentError::NoOpenTransaction,
            });
        };
        debug!(id = ?open.id, ops = open.ops.len(), "transaction committed");
        if !open.ops.is_empty() {
            self.history.record(UndoStep {
                ops: open.ops,
                caret_before: open.caret_before,
                caret_after: self.caret,
            });
        }
        Ok(())
    }

    fn rollback_transaction(&mut self, transaction: Transaction) {
        let id = transaction.id();
        match self.open.take() {
            Some(open) if open.id == id => {
                for op in open.ops.iter().rev() {
                    self.revert(op);
                }
                self.caret = open.caret_before;
                self.pending
                    .retain(|change| change.origin != ChangeOrigin::Transaction(id));
                debug!(?id, reverted = open.ops.len(), "transaction rolled back");
            }
            other => {
                self.open = other;
                warn!(?id, "rollback requested for a transaction that is not open");
            }
        }
    }

    fn delete_range(
        &mut self,
        transaction: &Transaction,
        block: BlockId,
        range: Range<usize>,
    ) -> Result<(), DocumentError> {
        self.check_transaction(transaction)?;
        if range.start > range.end {
            let len = self.block_len(block).unwrap_or_default();
            return Err(DocumentError::RangeOutOfBounds { block, range, len });
        }
        let caret_before = self.caret;
        let op = self.replace_text(block, range.start, range.len(), "")?;
        self.shift_caret_for_delete(block, &range);
        self.record(op, caret_before);
        Ok(())
    }

    fn insert_text(
        &mut self,
        transaction: &Transaction,
        block: BlockId,
        offset: usize,
        text: &str,
    ) -> Result<(), DocumentError> {
        let id = self.check_transaction(transaction)?;
        let caret_before = self.caret;
        let op = self.replace_text(block, offset, 0, text)?;
        let len = text.chars().count();
        self.shift_caret_for_insert(block, offset, len);
        self.record(op, caret_before);
        self.pending.push(TextInsertion {
            block,
            range: offset..offset + len,
            caret: self.caret,
            origin: ChangeOrigin::Transaction(id),
        });
        Ok(())
    }

    fn execute(&mut self, command: &str, params: CommandParams<'_>) -> Result<(), DocumentError> {
        let id = self.check_transaction(params.transaction)?;
        let resolved = self.schema.resolve(command, params.value.as_deref())?;
        let block = params.target.block();
        let caret_before = self.caret;

        let op = match resolved {
            Command::SetKind(kind) => {
                let target = self.block_mut(block)?;
                let before = target.kind;
                target.kind = kind;
                EditOp::Kind {
                    block,
                    before,
                    after: kind,
                }
            }
            Command::Format(format) => {
                let target = self.block_mut(block)?;
                let len = target.text.len_chars();
                let range = match &params.target {
                    CommandTarget::Block(_) => 0..len,
                    CommandTarget::Range { range, .. } => range.clone(),
                };
                if range.start > range.end || range.end > len {
                    return Err(DocumentError::RangeOutOfBounds { block, range, len });
                }
                let before = target.marks.clone();
                target.marks.apply(range, format);
                EditOp::Marks {
                    block,
                    before,
                    after: target.marks.clone(),
                }
            }
        };

        trace!(?id, %block, command, "command executed");
        self.record(op, caret_before);
        Ok(())
    }

    fn supports(&self, command: &str, value: Option<&str>) -> bool {
        self.schema.supports(command, value)
    }
}

impl HostDocument for RichDocument {
    fn type_text(&mut self, text: &str) -> Result<TextInsertion, DocumentError> {
        if self.open.is_some() {
            return Err(DocumentError::TransactionInProgress);
        }
        let caret_before = self.caret;
        let block = caret_before.block;
        let op = self.replace_text(block, caret_before.offset, 0, text)?;
        let len = text.chars().count();
        self.shift_caret_for_insert(block, caret_before.offset, len);
        self.record(op, caret_before);

        let change = TextInsertion {
            block,
            range: caret_before.offset..caret_before.offset + len,
            caret: self.caret,
            origin: ChangeOrigin::User,
        };
        trace!(%block, range = ?change.range, "user text inserted");
        self.pending.push(change.clone());
        Ok(change)
    }

    fn split_block(&mut self) -> Result<BlockId, DocumentError> {
        if self.open.is_some() {
            return Err(DocumentError::TransactionInProgress);
        }
        let caret_before = self.caret;
        let block = caret_before.block;
        let kind = self
            .block_kind(block)
            .ok_or(DocumentError::UnknownBlock(block))?;
        // Headings do not continue onto the next line; lists do.
        let new_kind = match kind {
            BlockKind::Heading(_) => BlockKind::Paragraph,
            other => other,
        };

        let new_block = self.allocate_block_id();
        let marks_before = self.split_at(block, caret_before.offset, new_block, new_kind)?;
        self.caret = Caret::new(new_block, 0);
        self.record(
            EditOp::Split {
                block,
                at: caret_before.offset,
                new_block,
                new_kind,
                marks_before,
            },
            caret_before,
        );
        Ok(new_block)
    }

    fn take_changes(&mut self) -> Vec<TextInsertion> {
        std::mem::take(&mut self.pending)
    }
}

impl UndoManager for RichDocument {
    fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn undo(&mut self) -> bool {
        if self.open.is_some() {
            warn!("undo requested while a transaction is open");
            return false;
        }
        let Some(step) = self.history.pop_undo() else {
            return false;
        };
        for op in step.ops.iter().rev() {
            self.revert(op);
        }
        self.caret = step.caret_before;
        self.history.push_redo(step);
        true
    }

    fn redo(&mut self) -> bool {
        if self.open.is_some() {
            warn!("redo requested while a transaction is open");
            return false;
        }
        let Some(step) = self.history.pop_redo() else {
            return false;
        };
        for op in &step.ops {
            self.replay(op);
        }
        self.caret = step.caret_after;
        self.history.push_undo(step);
        true
    }

    fn clear_history(&mut self) {
        self.history.clear();
    }
}

/// One line per block: `kind: text`, with marks rendered as tags.
impl fmt::Display for RichDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, block) in self.blocks.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{}:", block.kind)?;
            if block.len_chars() > 0 {
                f.write_str(" ")?;
                block.fmt_inline(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{BOLD, BULLETED_LIST, HEADING};
    use crate::types::ListStyle;

    fn typed(text: &str) -> RichDocument {
        let mut doc = RichDocument::default();
        doc.type_text(text).expect("type");
        doc
    }

    fn first(doc: &RichDocument) -> BlockId {
        doc.block_ids()[0]
    }

    #[test]
    fn test_type_text_moves_caret_and_records_change() {
        let mut doc = typed("hello");
        let block = first(&doc);
        assert_eq!(doc.caret(), Caret::new(block, 5));

        let changes = doc.take_changes();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].range, 0..5);
        assert!(changes[0].origin.is_user());
        assert!(changes[0].ends_at_caret());
        assert!(doc.take_changes().is_empty());
    }

    #[test]
    fn test_transaction_is_one_undo_step() {
        let mut doc = typed("- ");
        let block = first(&doc);

        let tx = doc.begin_transaction().expect("begin");
        doc.delete_range(&tx, block, 0..2).expect("delete");
        doc.execute(BULLETED_LIST, CommandParams::new(&tx, CommandTarget::Block(block)))
            .expect("execute");
        doc.commit_transaction(tx).expect("commit");

        assert_eq!(doc.to_string(), "bulletedList:");
        assert_eq!(doc.caret(), Caret::new(block, 0));

        assert!(doc.undo());
        assert_eq!(doc.to_string(), "paragraph: - ");
        assert_eq!(doc.caret(), Caret::new(block, 2));

        assert!(doc.redo());
        assert_eq!(
            doc.block_kind(block),
            Some(BlockKind::ListItem(ListStyle::Bulleted))
        );
        assert_eq!(doc.caret(), Caret::new(block, 0));
    }

    #[test]
    fn test_rollback_restores_everything() {
        let mut doc = typed("# title");
        let block = first(&doc);
        doc.take_changes();

        let tx = doc.begin_transaction().expect("begin");
        doc.delete_range(&tx, block, 0..2).expect("delete");
        doc.insert_text(&tx, block, 0, ">").expect("insert");
        let err = doc
            .execute(
                HEADING,
                CommandParams::new(&tx, CommandTarget::Block(block)).with_value("heading9"),
            )
            .unwrap_err();
        assert!(matches!(err, DocumentError::UnsupportedValue { .. }));
        doc.rollback_transaction(tx);

        assert_eq!(doc.to_string(), "paragraph: # title");
        assert_eq!(doc.caret(), Caret::new(block, 7));
        assert!(!doc.is_in_transaction());
        // The rolled back insertion is never reported.
        assert!(doc.take_changes().is_empty());

        // Only the original typing is undoable.
        assert!(doc.undo());
        assert_eq!(doc.to_string(), "paragraph:");
        assert!(!doc.undo());
    }

    #[test]
    fn test_single_open_transaction() {
        let mut doc = RichDocument::default();
        let tx = doc.begin_transaction().expect("begin");
        assert_eq!(
            doc.begin_transaction(),
            Err(DocumentError::TransactionInProgress)
        );
        assert_eq!(
            doc.type_text("x").unwrap_err(),
            DocumentError::TransactionInProgress
        );
        assert!(!doc.undo());

        let stale = Transaction::new(TransactionId::new(42));
        let rejected = doc.commit_transaction(stale).unwrap_err();
        assert_eq!(
            rejected.error,
            DocumentError::TransactionMismatch(TransactionId::new(42))
        );
        assert_eq!(rejected.transaction.id(), TransactionId::new(42));
        assert!(doc.is_in_transaction());
        doc.commit_transaction(tx).expect("commit");
        assert_eq!(
            doc.commit_transaction(Transaction::new(TransactionId::new(0)))
                .map_err(|rejected| rejected.error),
            Err(DocumentError::NoOpenTransaction)
        );
        // Empty transactions leave no undo step.
        assert!(!doc.can_undo());
    }

    #[test]
    fn test_delete_range_bounds_and_caret() {
        let mut doc = typed("**foo**");
        let block = first(&doc);

        let tx = doc.begin_transaction().expect("begin");
        assert!(matches!(
            doc.delete_range(&tx, block, 5..9),
            Err(DocumentError::RangeOutOfBounds { len: 7, .. })
        ));
        doc.delete_range(&tx, block, 5..7).expect("trailing");
        doc.delete_range(&tx, block, 0..2).expect("leading");
        doc.execute(
            BOLD,
            CommandParams::new(&tx, CommandTarget::Range { block, range: 0..3 }),
        )
        .expect("bold");
        doc.commit_transaction(tx).expect("commit");

        assert_eq!(doc.caret(), Caret::new(block, 3));
        assert_eq!(doc.to_string(), "paragraph: <bold>foo</bold>");
    }

    #[test]
    fn test_typing_after_marks() {
        let mut doc = typed("ab");
        let block = first(&doc);
        let tx = doc.begin_transaction().expect("begin");
        doc.execute(BOLD, CommandParams::new(&tx, CommandTarget::Block(block)))
            .expect("bold");
        doc.commit_transaction(tx).expect("commit");

        doc.type_text("c").expect("type");
        doc.set_caret(Caret::new(block, 1)).expect("caret");
        doc.type_text("X").expect("type");
        assert_eq!(doc.to_string(), "paragraph: <bold>aXb</bold>c");

        assert!(doc.undo());
        assert!(doc.undo());
        assert_eq!(doc.to_string(), "paragraph: <bold>ab</bold>");
    }

    #[test]
    fn test_split_block_and_undo() {
        let mut doc = RichDocument::default();
        let block = first(&doc);
        doc.type_text("one two").expect("type");
        let tx = doc.begin_transaction().expect("begin");
        doc.execute(
            HEADING,
            CommandParams::new(&tx, CommandTarget::Block(block)).with_value("heading1"),
        )
        .expect("heading");
        doc.execute(
            BOLD,
            CommandParams::new(&tx, CommandTarget::Range { block, range: 2..5 }),
        )
        .expect("bold");
        doc.commit_transaction(tx).expect("commit");

        doc.set_caret(Caret::new(block, 4)).expect("caret");
        let tail = doc.split_block().expect("split");
        assert_eq!(doc.caret(), Caret::new(tail, 0));
        insta::assert_snapshot!(doc.to_string(), @r"
        heading1: on<bold>e </bold>
        paragraph: <bold>t</bold>wo
        ");

        assert!(doc.undo());
        assert_eq!(doc.block_ids(), vec![block]);
        assert_eq!(doc.to_string(), "heading1: on<bold>e t</bold>wo");

        assert!(doc.redo());
        assert_eq!(doc.block_ids(), vec![block, tail]);
        assert_eq!(doc.caret(), Caret::new(tail, 0));
    }

    #[test]
    fn test_undo_history_is_bounded() {
        let mut doc = RichDocument::default().with_max_undo_steps(2);
        for key in ["a", "b", "c"] {
            doc.type_text(key).expect("type");
        }

        assert!(doc.undo());
        assert!(doc.undo());
        assert!(!doc.undo());
        assert_eq!(doc.to_string(), "paragraph: a");

        assert!(doc.redo());
        doc.clear_history();
        assert!(!doc.can_undo());
        assert!(!doc.can_redo());
        assert_eq!(doc.to_string(), "paragraph: ab");
    }

    #[test]
    fn test_blocks_in_order() {
        let mut doc = typed("first");
        let second = doc.push_block(BlockKind::Heading(2), "second");

        let blocks: Vec<_> = doc
            .blocks()
            .map(|block| (block.id(), block.kind(), block.text()))
            .collect();
        assert_eq!(
            blocks,
            vec![
                (first(&doc), BlockKind::Paragraph, "first".to_string()),
                (second, BlockKind::Heading(2), "second".to_string()),
            ]
        );
    }

    #[test]
    fn test_set_caret_validates() {
        let mut doc = typed("abc");
        let block = first(&doc);
        assert!(doc.set_caret(Caret::new(block, 3)).is_ok());
        assert!(matches!(
            doc.set_caret(Caret::new(block, 4)),
            Err(DocumentError::RangeOutOfBounds { .. })
        ));
        assert_eq!(
            doc.set_caret(Caret::new(BlockId::new(99), 0)),
            Err(DocumentError::UnknownBlock(BlockId::new(99)))
        );
    }
}
