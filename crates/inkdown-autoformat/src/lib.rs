//! inkdown-autoformat: markdown-style shortcuts converted while typing.
//!
//! This crate provides:
//! - `BlockAutoformatEngine` - markers at block start (`- `, `1. `, `## `)
//! - `InlineAutoformatEngine` - paired markers closed at the caret (`**bold**`)
//! - `Autoformat` - the standard rule set as one `ChangeObserver`
//!
//! Every firing runs in its own document transaction, so one undo reverts
//! the conversion and leaves the typed markers in place.

pub mod block;
pub mod config;
pub mod error;
mod firing;
pub mod inline;
pub mod pattern;
pub mod rules;

pub use block::{ActionContext, BlockAction, BlockAutoformatEngine, DynamicAction};
pub use config::AutoformatConfig;
pub use error::AutoformatError;
pub use firing::Outcome;
pub use inline::{DEFAULT_LOOKBACK_CHARS, InlineAutoformatEngine, InlineMarkers};
pub use pattern::{MatchGroup, PatternMatch};
pub use rules::{Autoformat, add_block_rules, add_inline_rules};
