//! inkdown-doc: block-structured rich text document model.
//!
//! This crate provides:
//! - `TextBuffer` trait for block text storage, with a ropey-backed `EditorRope`
//! - `EditorModel` / `HostDocument` traits, the surface observers edit through
//! - `RichDocument` - blocks, character marks, transactions and grouped undo
//! - `Editor` - input shell dispatching insertions to `ChangeObserver`s

pub mod commands;
pub mod document;
pub mod editor;
pub mod error;
pub mod marks;
pub mod model;
pub mod text;
pub mod types;
pub mod undo;

pub use commands::{CommandParams, CommandTarget, Schema};
pub use document::{Block, RichDocument};
pub use editor::{ChangeObserver, Editor};
pub use error::{DocumentError, RejectedCommit};
pub use marks::{MarkSpan, Marks};
pub use model::{EditorModel, HostDocument, Transaction};
pub use smol_str::SmolStr;
pub use text::{EditorRope, TextBuffer};
pub use types::{BlockId, BlockKind, Caret, ChangeOrigin, ListStyle, TextInsertion, TransactionId};
pub use undo::UndoManager;
