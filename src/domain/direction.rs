/// Cardinal directions: the move input and the player's facing.
///
/// The same enum serves both purposes, so a bounce can write a facing
/// straight from the attempted direction.

use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// (row delta, column delta) of one step.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up    => (-1, 0),
            Direction::Down  => (1, 0),
            Direction::Left  => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// Facing given to the player when a push in this direction hits a wall.
    ///
    /// Vertical blocks keep the attempted direction, horizontal blocks
    /// flip it: Left → Right, Right → Left. Levels are tuned to this.
    pub fn bounce_facing(self) -> Direction {
        match self {
            Direction::Up    => Direction::Up,
            Direction::Down  => Direction::Down,
            Direction::Left  => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Player glyph for this facing.
    pub fn player_glyph(self) -> char {
        match self {
            Direction::Up    => '^',
            Direction::Down  => 'v',
            Direction::Left  => '<',
            Direction::Right => '>',
        }
    }

    pub fn from_player_glyph(ch: char) -> Option<Direction> {
        match ch {
            '^' => Some(Direction::Up),
            'v' => Some(Direction::Down),
            '<' => Some(Direction::Left),
            '>' => Some(Direction::Right),
            _   => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Up    => "up",
            Direction::Down  => "down",
            Direction::Left  => "left",
            Direction::Right => "right",
        })
    }
}
