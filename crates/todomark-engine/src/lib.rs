pub mod config;
pub mod editing;
pub mod lint;
pub mod models;
pub mod parsing;
pub mod transact;

// Re-export key types for easier usage
pub use config::{MetadataTagDef, StateDef, TodoConfig};
pub use editing::{Document, DocumentError, DocumentId, Patch, TextDiffHunk};
pub use lint::{Diagnostic, LintRule, Linter, Severity};
pub use models::{Metadata, MetadataEntry, TodoId, TodoItem, TodoMap};
pub use parsing::{ColSpan, Pos, Range};
pub use transact::{OpKey, TransactionError, TransactionManager, TxContext};
