//! Editor shell: routes user input into a document and notifies observers.

use smol_str::SmolStr;
use tracing::{debug, warn};

use crate::document::RichDocument;
use crate::error::DocumentError;
use crate::model::{EditorModel, HostDocument};
use crate::types::{BlockId, TextInsertion};

/// Dispatch rounds per input event. Observers that keep inserting text in
/// response to their own insertions are cut off here.
const MAX_DISPATCH_ROUNDS: usize = 16;

/// Receives document mutation notifications.
pub trait ChangeObserver {
    /// Name used in logs and errors.
    fn name(&self) -> &str;

    /// Commands that must exist on the document before this observer runs.
    fn requires(&self) -> &[&'static str] {
        &[]
    }

    /// Called for every recorded text insertion, user-typed or not.
    ///
    /// The document may be edited from here; insertions made while handling
    /// a notification are dispatched in a following round.
    fn on_text_inserted(&mut self, doc: &mut dyn EditorModel, change: &TextInsertion);
}

/// A document plus the observers subscribed to it.
pub struct Editor<D = RichDocument> {
    document: D,
    observers: Vec<Box<dyn ChangeObserver>>,
}

impl Default for Editor<RichDocument> {
    fn default() -> Self {
        Self::new(RichDocument::default())
    }
}

impl<D: HostDocument> Editor<D> {
    pub fn new(document: D) -> Self {
        Self {
            document,
            observers: Vec::new(),
        }
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    /// Direct mutable access to the document.
    /// WARNING: Insertions made through this are only dispatched on the next input event!
    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    pub fn into_document(self) -> D {
        self.document
    }

    /// Subscribe an observer, checking its required commands first.
    pub fn add_observer(&mut self, observer: Box<dyn ChangeObserver>) -> Result<(), DocumentError> {
        let missing: Vec<SmolStr> = observer
            .requires()
            .iter()
            .filter(|command| !self.document.supports(command, None))
            .map(|command| SmolStr::new(command))
            .collect();
        if !missing.is_empty() {
            return Err(DocumentError::MissingCommands {
                observer: observer.name().into(),
                missing,
            });
        }

        debug!(observer = observer.name(), "observer added");
        self.observers.push(observer);
        Ok(())
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Insert `text` at the caret as a single input event.
    pub fn type_text(&mut self, text: &str) -> Result<(), DocumentError> {
        self.document.type_text(text)?;
        self.dispatch();
        Ok(())
    }

    /// Type `text` one char at a time, one input event per char.
    pub fn type_keys(&mut self, text: &str) -> Result<(), DocumentError> {
        let mut buf = [0u8; 4];
        for ch in text.chars() {
            self.type_text(ch.encode_utf8(&mut buf))?;
        }
        Ok(())
    }

    /// Split the current block (Enter).
    pub fn enter(&mut self) -> Result<BlockId, DocumentError> {
        let block = self.document.split_block()?;
        self.dispatch();
        Ok(block)
    }

    pub fn undo(&mut self) -> bool {
        self.document.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.document.redo()
    }

    fn dispatch(&mut self) {
        for _ in 0..MAX_DISPATCH_ROUNDS {
            let changes = self.document.take_changes();
            if changes.is_empty() {
                return;
            }
            for change in &changes {
                for observer in &mut self.observers {
                    observer.on_text_inserted(&mut self.document, change);
                }
            }
        }

        let dropped = self.document.take_changes().len();
        if dropped > 0 {
            warn!(dropped, "dispatch round limit reached");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{BOLD, HEADING, ITALIC, Schema};
    use crate::model::Transaction;
    use crate::undo::UndoManager;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records every notification it receives.
    struct Recorder {
        seen: Rc<RefCell<Vec<TextInsertion>>>,
        requires: &'static [&'static str],
    }

    impl ChangeObserver for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }

        fn requires(&self) -> &[&'static str] {
            self.requires
        }

        fn on_text_inserted(&mut self, _doc: &mut dyn EditorModel, change: &TextInsertion) {
            self.seen.borrow_mut().push(change.clone());
        }
    }

    /// Appends `!` after every user insertion, inside a transaction.
    struct Shouter;

    impl ChangeObserver for Shouter {
        fn name(&self) -> &str {
            "shouter"
        }

        fn on_text_inserted(&mut self, doc: &mut dyn EditorModel, change: &TextInsertion) {
            if !change.origin.is_user() {
                return;
            }
            let tx: Transaction = match doc.begin_transaction() {
                Ok(tx) => tx,
                Err(_) => return,
            };
            match doc.insert_text(&tx, change.block, change.range.end, "!") {
                Ok(()) => doc.commit_transaction(tx).expect("commit"),
                Err(_) => doc.rollback_transaction(tx),
            }
        }
    }

    #[test]
    fn test_observer_sees_user_and_transaction_insertions() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut editor: Editor = Editor::default();
        editor.add_observer(Box::new(Shouter)).expect("shouter");
        editor
            .add_observer(Box::new(Recorder {
                seen: seen.clone(),
                requires: &[],
            }))
            .expect("recorder");

        editor.type_text("hi").expect("type");
        assert_eq!(editor.document().to_string(), "paragraph: hi!");

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert!(seen[0].origin.is_user());
        assert!(!seen[1].origin.is_user());
        assert_eq!(seen[1].range, 2..3);

        // The shout is its own undo step.
        drop(seen);
        assert!(editor.undo());
        assert_eq!(editor.document().to_string(), "paragraph: hi");
    }

    #[test]
    fn test_missing_commands_rejected() {
        let mut editor = Editor::new(RichDocument::new(Schema {
            italic: false,
            ..Schema::default()
        }));
        let err = editor
            .add_observer(Box::new(Recorder {
                seen: Rc::default(),
                requires: &[HEADING, BOLD, ITALIC],
            }))
            .unwrap_err();
        assert_eq!(
            err,
            DocumentError::MissingCommands {
                observer: "recorder".into(),
                missing: vec![ITALIC.into()],
            }
        );
        assert_eq!(editor.observer_count(), 0);
        assert_eq!(
            err.to_string(),
            "observer `recorder` requires missing commands: italic"
        );
    }

    #[test]
    fn test_type_keys_is_one_event_per_char() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut editor: Editor = Editor::default();
        editor
            .add_observer(Box::new(Recorder {
                seen: seen.clone(),
                requires: &[],
            }))
            .expect("recorder");

        editor.type_keys("añb").expect("type");
        let ranges: Vec<_> = seen.borrow().iter().map(|c| c.range.clone()).collect();
        assert_eq!(ranges, vec![0..1, 1..2, 2..3]);
    }

    #[test]
    fn test_into_document_keeps_edits() {
        let mut editor: Editor = Editor::default();
        editor.add_observer(Box::new(Shouter)).expect("shouter");
        editor.type_text("hi").expect("type");

        let mut doc = editor.into_document();
        assert_eq!(doc.to_string(), "paragraph: hi!");
        assert!(doc.take_changes().is_empty());
        assert!(doc.undo());
        assert_eq!(doc.to_string(), "paragraph: hi");
    }
}
