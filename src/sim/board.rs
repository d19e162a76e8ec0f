/// Board: the two overlaid cell layers of one level plus its undo history.
///
/// ## Layer Architecture
///
///   - `base`    : static terrain (targets, ice, walls, blanks). **Never
///                 mutated** after construction.
///   - `dynamic` : movable / obstructing entities (player, crates,
///                 trophies, holes, walls). Mutated only by the movement
///                 engine (`sim::step`) and by undo / restart.
///
/// Both layers always share the same rectangular dimensions. Every
/// coordinate has exactly one base cell and exactly one dynamic cell.

use tracing::debug;

use crate::domain::cell::Cell;
use crate::domain::direction::Direction;
use crate::domain::grid::{Grid, Pos};
use crate::error::BoardError;

use super::event::MoveEvent;
use super::history::History;
use super::{outcome, step};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Layer {
    Base,
    Dynamic,
}

#[derive(Clone, Debug)]
pub struct Board {
    base: Grid,
    dynamic: Grid,
    history: History,
}

// ── Construction ──

impl Board {
    /// Build a board from a base and a dynamic layer description.
    pub fn new(base_desc: &str, dynamic_desc: &str) -> Result<Self, BoardError> {
        let base = Grid::parse(base_desc)?;
        let dynamic = Grid::parse(dynamic_desc)?;

        if (base.rows(), base.cols()) != (dynamic.rows(), dynamic.cols()) {
            return Err(BoardError::MalformedLayout(format!(
                "base layer is {}x{} but dynamic layer is {}x{}",
                base.rows(),
                base.cols(),
                dynamic.rows(),
                dynamic.cols()
            )));
        }

        let history = History::new(&dynamic);
        Ok(Board { base, dynamic, history })
    }
}

// ── Cell query / mutation API ──

impl Board {
    /// `(rows, cols)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.base.rows(), self.base.cols())
    }

    pub fn cell_at(&self, layer: Layer, row: usize, col: usize) -> Result<Cell, BoardError> {
        let grid = match layer {
            Layer::Base => &self.base,
            Layer::Dynamic => &self.dynamic,
        };
        let (rows, cols) = self.dimensions();
        grid.get(Pos::new(row, col))
            .ok_or(BoardError::OutOfRange { row, col, rows, cols })
    }

    /// Overwrite a dynamic slot with a new cell.
    #[inline]
    pub fn set_dynamic(&mut self, row: usize, col: usize, cell: Cell) {
        self.dynamic.set(Pos::new(row, col), cell);
    }

    pub fn base(&self) -> &Grid {
        &self.base
    }

    pub fn dynamic(&self) -> &Grid {
        &self.dynamic
    }

    /// Where the player stands, `None` once it fell into a hole.
    pub fn player_position(&self) -> Option<Pos> {
        self.dynamic.find(Cell::is_player)
    }
}

// ── Driver API ──

impl Board {
    /// Resolve one directional command. See `sim::step`.
    pub fn apply_move(&mut self, dir: Direction) -> Vec<MoveEvent> {
        step::apply_move(self, dir)
    }

    /// Roll the dynamic layer back one move. `false` if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(previous) => {
                self.dynamic = previous.clone();
                debug!(remaining = self.history.len(), "undo");
                true
            }
            None => false,
        }
    }

    /// Back to the layout the board was built with; history is cleared.
    pub fn restart(&mut self) {
        self.dynamic = self.history.reset().clone();
    }

    pub fn is_won(&self) -> bool {
        outcome::is_won(self)
    }

    /// Moves recorded since construction / restart, net of undos.
    pub fn moves_recorded(&self) -> usize {
        self.history.len()
    }

    /// Snapshot the current dynamic layer after an accepted move.
    pub(super) fn record_snapshot(&mut self) {
        self.history.record(&self.dynamic);
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
