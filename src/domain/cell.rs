/// Cell variants and their properties.
/// Properties are queried via methods, not stored as flags,
/// so cell semantics are centralized here. The per-direction
/// movement response lives next door in `rules`.

use super::direction::Direction;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Color {
    Yellow,
    Green,
    Blue,
    Red,
}

impl Color {
    /// Upper-case letter used for targets; trophies use the lower-case form.
    pub fn letter(self) -> char {
        match self {
            Color::Yellow => 'Y',
            Color::Green  => 'G',
            Color::Blue   => 'B',
            Color::Red    => 'R',
        }
    }

    fn from_letter(ch: char) -> Option<Color> {
        match ch.to_ascii_uppercase() {
            'Y' => Some(Color::Yellow),
            'G' => Some(Color::Green),
            'B' => Some(Color::Blue),
            'R' => Some(Color::Red),
            _   => None,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Cell {
    Blank,
    Wall,
    Crate,
    Ice,
    Hole,
    Target(Color),      // base layer: needs a same-colored trophy on top
    Trophy(Color),      // pushable, scores on its target
    Player(Direction),  // facing
}

impl Cell {
    /// Map a level character to a cell. `None` for unknown characters.
    pub fn from_char(ch: char) -> Option<Cell> {
        match ch {
            '_' => Some(Cell::Blank),
            'W' => Some(Cell::Wall),
            'C' => Some(Cell::Crate),
            'I' => Some(Cell::Ice),
            'H' => Some(Cell::Hole),
            'Y' | 'G' | 'B' | 'R' => Color::from_letter(ch).map(Cell::Target),
            'y' | 'g' | 'b' | 'r' => Color::from_letter(ch).map(Cell::Trophy),
            _ => Direction::from_player_glyph(ch).map(Cell::Player),
        }
    }

    /// The level character for this cell (inverse of `from_char`).
    pub fn glyph(self) -> char {
        match self {
            Cell::Blank         => '_',
            Cell::Wall          => 'W',
            Cell::Crate         => 'C',
            Cell::Ice           => 'I',
            Cell::Hole          => 'H',
            Cell::Target(c)     => c.letter(),
            Cell::Trophy(c)     => c.letter().to_ascii_lowercase(),
            Cell::Player(dir)   => dir.player_glyph(),
        }
    }

    pub fn is_blank(self) -> bool {
        matches!(self, Cell::Blank)
    }

    pub fn is_player(self) -> bool {
        matches!(self, Cell::Player(_))
    }

    pub fn is_ice(self) -> bool {
        matches!(self, Cell::Ice)
    }

    /// Player facing, if this is the player.
    pub fn facing(self) -> Option<Direction> {
        match self {
            Cell::Player(dir) => Some(dir),
            _ => None,
        }
    }

    /// Does this base cell accept `occupant` for the win check?
    /// Only targets constrain; they need a trophy of their own color.
    pub fn accepts(self, occupant: Cell) -> bool {
        match self {
            Cell::Target(color) => occupant == Cell::Trophy(color),
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_level_char_maps_and_roundtrips() {
        for ch in "WCYGBRygbr><^v_HI".chars() {
            let cell = Cell::from_char(ch).unwrap_or_else(|| panic!("no cell for {ch:?}"));
            assert_eq!(cell.glyph(), ch);
        }
    }

    #[test]
    fn unknown_chars_are_rejected() {
        for ch in ['x', ' ', '#', 'w', 'c', 'h', 'i', 'V'] {
            assert_eq!(Cell::from_char(ch), None, "{ch:?} should not map");
        }
    }

    #[test]
    fn color_payloads() {
        assert_eq!(Cell::from_char('R'), Some(Cell::Target(Color::Red)));
        assert_eq!(Cell::from_char('b'), Some(Cell::Trophy(Color::Blue)));
        assert_eq!(Cell::from_char('v'), Some(Cell::Player(Direction::Down)));
    }

    #[test]
    fn target_accepts_only_matching_trophy() {
        let target = Cell::Target(Color::Blue);
        assert!(target.accepts(Cell::Trophy(Color::Blue)));
        assert!(!target.accepts(Cell::Trophy(Color::Red)));
        assert!(!target.accepts(Cell::Blank));
        assert!(!target.accepts(Cell::Crate));
    }

    #[test]
    fn non_targets_accept_anything() {
        for base in [Cell::Blank, Cell::Wall, Cell::Ice, Cell::Trophy(Color::Blue)] {
            assert!(base.accepts(Cell::Wall));
            assert!(base.accepts(Cell::Blank));
        }
    }
}
