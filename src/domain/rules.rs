/// Per-cell movement response, truth-table driven.
///
/// Pure function of the cell variant: "what does this cell do when the
/// line of travel reaches it". The engine in `sim::step` performs the
/// writes; this module only classifies.
///
/// ## Response Truth Table
///
/// ┌───────────────────────────────┬──────────┬──────────────────────────────┐
/// │ Cell reached by the chain      │ Response │ Effect                        │
/// ├───────────────────────────────┼──────────┼──────────────────────────────┤
/// │ Blank                          │ Accept   │ chain shifts one cell in      │
/// │ Wall                           │ Bounce   │ nothing moves, player facing  │
/// │                                │          │ set to `bounce_facing()`      │
/// │ Hole                           │ Consume  │ front entity + hole → Blank,  │
/// │                                │          │ rest of the chain stays put   │
/// │ Crate / Trophy / Target / Ice  │ Forward  │ joins the chain, ask the next │
/// │ Player                         │ Forward  │ (only ever the chain origin)  │
/// │ past the board edge            │ (none)   │ nothing moves, no bounce      │
/// └───────────────────────────────┴──────────┴──────────────────────────────┘
///
/// The direction only matters to `Bounce` (the facing it writes); every
/// other response is the same along all four axes.

use super::cell::Cell;
use super::direction::Direction;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Response {
    /// Pass the request on to the next cell in line.
    Forward,
    /// Stop; the player turns to the given facing.
    Bounce(Direction),
    /// Stop; the entity stepping in and this cell are both removed.
    Consume,
    /// Stop; take the entity from one cell back.
    Accept,
}

impl Response {
    /// Does this response end the walk along the line?
    pub fn terminates(self) -> bool {
        !matches!(self, Response::Forward)
    }
}

impl Cell {
    /// How this cell reacts when a chain moving in `dir` reaches it.
    pub fn respond_to(self, dir: Direction) -> Response {
        match self {
            Cell::Wall => Response::Bounce(dir.bounce_facing()),
            Cell::Hole => Response::Consume,
            Cell::Blank => Response::Accept,
            Cell::Crate
            | Cell::Ice
            | Cell::Target(_)
            | Cell::Trophy(_)
            | Cell::Player(_) => Response::Forward,
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
