/// Undo history: owned snapshots of the dynamic layer.
///
/// One snapshot is recorded after every accepted move. The base layer
/// never changes, so it is never copied. Snapshots are independent
/// clones; nothing in the live board aliases them.
///
/// ```text
///   initial ── move 1 ──▶ [s1] ── move 2 ──▶ [s1, s2]
///   undo: pop s2, restore s1      undo: pop s1, restore initial
///   undo on [] : no-op
/// ```

use crate::domain::grid::Grid;

/// A frozen copy of the dynamic layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    dynamic: Grid,
}

impl Snapshot {
    pub fn capture(dynamic: &Grid) -> Self {
        Snapshot { dynamic: dynamic.clone() }
    }

    pub fn grid(&self) -> &Grid {
        &self.dynamic
    }
}

#[derive(Clone, Debug)]
pub struct History {
    initial: Snapshot,
    stack: Vec<Snapshot>,
}

impl History {
    pub fn new(initial: &Grid) -> Self {
        History {
            initial: Snapshot::capture(initial),
            stack: Vec::new(),
        }
    }

    /// Record the state after an accepted move.
    pub fn record(&mut self, dynamic: &Grid) {
        self.stack.push(Snapshot::capture(dynamic));
    }

    /// Drop the newest snapshot and return the state to restore:
    /// the snapshot beneath it, or the initial layer once the stack empties.
    /// `None` when no move has been recorded.
    pub fn undo(&mut self) -> Option<&Grid> {
        self.stack.pop()?;
        Some(self.stack.last().unwrap_or(&self.initial).grid())
    }

    /// Forget every recorded move and return the initial layer.
    pub fn reset(&mut self) -> &Grid {
        self.stack.clear();
        self.initial.grid()
    }

    /// Number of recorded moves that can still be undone.
    pub fn len(&self) -> usize {
        self.stack.len()
    }
}
