/// Win / loss evaluation.
///
///   Won     : every base cell accepts the dynamic cell above it
///             (each Target has a same-colored Trophy on it)
///   Lost    : not won, and the player fell into a hole
///   Playing : anything else
///
/// A board without targets is trivially won. Won is checked first, so
/// a board that is solved at the moment the player disappears still wins.

use super::board::Board;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Outcome {
    Playing,
    Won,
    Lost,
}

pub fn is_won(board: &Board) -> bool {
    let dynamic = board.dynamic();
    board
        .base()
        .iter()
        .all(|(pos, base)| base.accepts(dynamic[pos]))
}

pub fn evaluate(board: &Board) -> Outcome {
    if board.is_won() {
        Outcome::Won
    } else if board.player_position().is_none() {
        Outcome::Lost
    } else {
        Outcome::Playing
    }
}
