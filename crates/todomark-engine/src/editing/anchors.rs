use xi_rope::delta::Transformer;
use xi_rope::{Delta, RopeInfo};

use crate::models::TodoId;

/// A stable id glued to one todo marker's byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Anchor {
    pub id: TodoId,
    pub offset: usize,
}

/// The document's identity table: one anchor per live todo item.
///
/// Offsets ride along with edits via delta transforms; after every reparse
/// the table is rebuilt by matching discovered markers back to surviving
/// anchors.
#[derive(Debug, Clone, Default)]
pub(crate) struct AnchorTable {
    anchors: Vec<Anchor>,
}

impl AnchorTable {
    /// Carries every anchor offset through `delta`.
    pub fn transform(&mut self, delta: &Delta<RopeInfo>) {
        let mut transformer = Transformer::new(delta);
        for anchor in &mut self.anchors {
            // after=false: replacing the marker text in place inserts at the
            // marker's own offset, and the anchor must stay at the marker
            // start rather than jump past the replacement
            anchor.offset = transformer.transform(anchor.offset, false);
        }
    }

    /// Rebinds the table to a fresh discovery pass.
    ///
    /// `offsets` are the discovered marker byte offsets in document order.
    /// Each offset that lands exactly on a surviving anchor reclaims that
    /// anchor's id; every other offset mints a fresh one. Anchors are
    /// claimed at most once, and anchors left unmatched are dropped with the
    /// items they identified.
    pub fn rebind(&mut self, offsets: &[usize]) -> Vec<TodoId> {
        let mut claimed = vec![false; self.anchors.len()];
        let mut ids = Vec::with_capacity(offsets.len());

        for &offset in offsets {
            let hit =
                (0..self.anchors.len()).find(|&i| !claimed[i] && self.anchors[i].offset == offset);
            let id = match hit {
                Some(i) => {
                    claimed[i] = true;
                    self.anchors[i].id
                }
                None => TodoId::mint(),
            };
            ids.push(id);
        }

        self.anchors = offsets
            .iter()
            .zip(&ids)
            .map(|(&offset, &id)| Anchor { id, offset })
            .collect();
        ids
    }
}
