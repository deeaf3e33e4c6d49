//! Transaction coordination: batched, deduplicated mutations per document.
//!
//! A transaction runs in rounds. Entry code queues operations; each round
//! drains everything queued so far, collects their hunks, and applies them
//! as one batch, so the buffer is re-discovered at most once per round.
//! Operations queued by running operations land in the next round.
//! Callbacks run only between rounds, when no operations are pending, and
//! may queue further operations.

pub mod ops;

use std::cell::RefCell;
use std::collections::HashSet;
use std::mem;

use crate::config::TodoConfig;
use crate::editing::{Document, DocumentId, TextDiffHunk};
use crate::models::{TodoId, TodoItem, TodoMap};

#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    #[error("a transaction is already active on this document")]
    AlreadyActive,
    #[error("operation `{name}` failed")]
    Op {
        name: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Value identity of a queued operation.
///
/// Two queued operations with equal keys are the same mutation; the second
/// is collapsed into the first for the lifetime of the transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OpKey {
    pub name: &'static str,
    pub args: Vec<String>,
}

impl OpKey {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            args: Vec::new(),
        }
    }

    pub fn with_args(name: &'static str, args: Vec<String>) -> Self {
        Self { name, args }
    }
}

type OpFn = Box<dyn FnOnce(&TxContext<'_>) -> anyhow::Result<Vec<TextDiffHunk>>>;
type CbFn = Box<dyn FnOnce(&TxContext<'_>) -> anyhow::Result<()>>;

struct QueuedOp {
    key: OpKey,
    run: OpFn,
}

#[derive(Default)]
struct TxQueues {
    ops: RefCell<Vec<QueuedOp>>,
    callbacks: RefCell<Vec<CbFn>>,
    /// Keys queued at any point in this transaction, for deduplication.
    seen: RefCell<HashSet<OpKey>>,
}

/// Read access to the document plus the queueing surface, handed to entry
/// code, operations and callbacks.
///
/// The document view is always current for the code holding the context:
/// operations in one round all see the pre-round buffer, and callbacks see
/// the buffer with every previous round applied.
pub struct TxContext<'a> {
    doc: &'a Document,
    queues: &'a TxQueues,
}

impl TxContext<'_> {
    pub fn document(&self) -> &Document {
        self.doc
    }

    pub fn config(&self) -> &TodoConfig {
        self.doc.config()
    }

    pub fn todos(&self) -> &TodoMap {
        self.doc.todos()
    }

    pub fn todo(&self, id: TodoId) -> Option<&TodoItem> {
        self.doc.todos().get(id)
    }

    pub fn todo_at_row(&self, row: usize) -> Option<&TodoItem> {
        self.doc.todos().at_row(row)
    }

    pub fn todo_at_pos(&self, pos: crate::parsing::Pos) -> Option<&TodoItem> {
        self.doc.todos().at_pos(pos)
    }

    pub fn line(&self, row: usize) -> Option<String> {
        self.doc.line(row)
    }

    pub fn line_count(&self) -> usize {
        self.doc.line_count()
    }

    /// Queues an operation for the next round. A key already queued in this
    /// transaction collapses the call to a no-op.
    pub fn add_op(
        &self,
        key: OpKey,
        op: impl FnOnce(&TxContext<'_>) -> anyhow::Result<Vec<TextDiffHunk>> + 'static,
    ) {
        if !self.queues.seen.borrow_mut().insert(key.clone()) {
            tracing::trace!(op = key.name, "duplicate operation collapsed");
            return;
        }
        self.queues.ops.borrow_mut().push(QueuedOp {
            key,
            run: Box::new(op),
        });
    }

    /// Queues a callback to run once no operations are pending.
    pub fn add_callback(&self, cb: impl FnOnce(&TxContext<'_>) -> anyhow::Result<()> + 'static) {
        self.queues.callbacks.borrow_mut().push(Box::new(cb));
    }
}

/// Enforces at most one transaction per document and drives the round loop.
#[derive(Default)]
pub struct TransactionManager {
    active: RefCell<HashSet<DocumentId>>,
}

impl TransactionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self, id: DocumentId) -> bool {
        self.active.borrow().contains(&id)
    }

    /// Runs a transaction to completion.
    ///
    /// Any operation returning an error aborts the transaction: the failing
    /// round's hunks are discarded, nothing further runs, and the error is
    /// returned. Rounds already applied stay applied. Callback errors never
    /// abort; they are logged and the transaction continues.
    pub fn run(
        &self,
        doc: &mut Document,
        entry: impl FnOnce(&TxContext<'_>),
    ) -> Result<(), TransactionError> {
        self.run_with_post(doc, entry, |_| {})
    }

    /// Like [`run`], with a hook invoked on the settled document after the
    /// transaction completes successfully.
    ///
    /// [`run`]: TransactionManager::run
    pub fn run_with_post(
        &self,
        doc: &mut Document,
        entry: impl FnOnce(&TxContext<'_>),
        post: impl FnOnce(&Document),
    ) -> Result<(), TransactionError> {
        if !self.active.borrow_mut().insert(doc.id()) {
            return Err(TransactionError::AlreadyActive);
        }
        let _guard = ActiveGuard {
            manager: self,
            id: doc.id(),
        };

        let queues = TxQueues::default();
        entry(&TxContext {
            doc: &*doc,
            queues: &queues,
        });

        loop {
            let pending = mem::take(&mut *queues.ops.borrow_mut());
            if !pending.is_empty() {
                let mut hunks = Vec::new();
                for op in pending {
                    let ctx = TxContext {
                        doc: &*doc,
                        queues: &queues,
                    };
                    match (op.run)(&ctx) {
                        Ok(mut produced) => hunks.append(&mut produced),
                        Err(source) => {
                            return Err(TransactionError::Op {
                                name: op.key.name.to_string(),
                                source,
                            });
                        }
                    }
                }
                if !hunks.is_empty() {
                    doc.apply_hunks(hunks);
                }
                continue;
            }

            let callbacks = mem::take(&mut *queues.callbacks.borrow_mut());
            if callbacks.is_empty() {
                break;
            }
            for cb in callbacks {
                let ctx = TxContext {
                    doc: &*doc,
                    queues: &queues,
                };
                if let Err(error) = cb(&ctx) {
                    tracing::warn!(%error, document = %doc.id(), "transaction callback failed");
                }
            }
        }

        post(doc);
        Ok(())
    }
}

struct ActiveGuard<'a> {
    manager: &'a TransactionManager,
    id: DocumentId,
}

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.manager.active.borrow_mut().remove(&self.id);
    }
}
