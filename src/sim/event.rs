/// Events emitted while resolving one move.
/// The driver consumes these for logging and the status line.

use crate::domain::cell::Cell;
use crate::domain::direction::Direction;
use crate::domain::grid::Pos;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveEvent {
    /// The chain starting at `from` advanced one cell; `pushed` entities
    /// were ahead of the origin. `sliding` marks an ice continuation.
    Shifted { from: Pos, pushed: usize, sliding: bool },
    /// The chain starting at `from` ran into the board edge.
    Blocked { from: Pos },
    /// The chain met a wall. `facing` is the player's new facing, `None`
    /// when there is no player left to turn.
    Bounced { wall: Pos, facing: Option<Direction> },
    /// `cell` dropped into the hole at `hole`; both are gone.
    Fell { cell: Cell, hole: Pos },
}

impl MoveEvent {
    pub fn player_fell(&self) -> bool {
        matches!(self, MoveEvent::Fell { cell: Cell::Player(_), .. })
    }
}
