/// A rectangular layer of cells plus coordinate helpers.
///
/// Row-major `Vec<Vec<Cell>>`, `(row, col)` addressing. Construction
/// goes through `Grid::parse`, which guarantees the rectangle; nothing
/// afterwards can change the shape.

use std::ops::Index;

use crate::error::BoardError;

use super::cell::Cell;
use super::direction::Direction;

/// A board coordinate.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub fn new(row: usize, col: usize) -> Self {
        Pos { row, col }
    }

    /// One step in `dir`, or `None` past the top/left edge or the given bounds.
    pub fn step(self, dir: Direction, rows: usize, cols: usize) -> Option<Pos> {
        let (dr, dc) = dir.delta();
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        if row < rows && col < cols {
            Some(Pos { row, col })
        } else {
            None
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Grid {
    cells: Vec<Vec<Cell>>,
    cols: usize,
}

impl Grid {
    /// Parse a layer description: rows separated by `\n`, one character
    /// per cell. A trailing newline and CRLF endings are tolerated.
    pub fn parse(desc: &str) -> Result<Grid, BoardError> {
        let mut cells: Vec<Vec<Cell>> = vec![];
        for (row, line) in desc.lines().enumerate() {
            let parsed = line
                .chars()
                .enumerate()
                .map(|(col, ch)| Cell::from_char(ch).ok_or(BoardError::InvalidCellCharacter { ch, row, col }))
                .collect::<Result<Vec<_>, _>>()?;
            cells.push(parsed);
        }

        let cols = cells.first().map_or(0, |r| r.len());
        if cols == 0 {
            return Err(BoardError::MalformedLayout("layer has no cells".into()));
        }
        if let Some((row, r)) = cells.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(BoardError::MalformedLayout(format!(
                "row {row} has {} cells, expected {cols}",
                r.len()
            )));
        }

        Ok(Grid { cells, cols })
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.row < self.rows() && pos.col < self.cols
    }

    pub fn get(&self, pos: Pos) -> Option<Cell> {
        self.cells.get(pos.row).and_then(|r| r.get(pos.col)).copied()
    }

    /// Overwrite a slot. Out-of-bounds writes are dropped.
    #[inline]
    pub fn set(&mut self, pos: Pos, cell: Cell) {
        debug_assert!(self.contains(pos), "write outside grid at {pos:?}");
        if let Some(slot) = self.cells.get_mut(pos.row).and_then(|r| r.get_mut(pos.col)) {
            *slot = cell;
        }
    }

    /// Step from `pos` in `dir`, bounded by this grid.
    pub fn step(&self, pos: Pos, dir: Direction) -> Option<Pos> {
        pos.step(dir, self.rows(), self.cols)
    }

    /// All coordinates with their cells, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (Pos, Cell)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, r)| {
            r.iter().enumerate().map(move |(col, &cell)| (Pos { row, col }, cell))
        })
    }

    /// First coordinate whose cell satisfies `pred`.
    pub fn find(&self, pred: impl Fn(Cell) -> bool) -> Option<Pos> {
        self.iter().find(|&(_, cell)| pred(cell)).map(|(pos, _)| pos)
    }

    /// The layer back in level-description form.
    pub fn describe(&self) -> String {
        self.cells
            .iter()
            .map(|r| r.iter().map(|c| c.glyph()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Index<Pos> for Grid {
    type Output = Cell;

    /// Panics outside the grid; use `get` for unchecked coordinates.
    fn index(&self, pos: Pos) -> &Cell {
        &self.cells[pos.row][pos.col]
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cell::Color;

    #[test]
    fn parses_rows_and_columns() {
        let g = Grid::parse("W_C\n_rH").unwrap();
        assert_eq!((g.rows(), g.cols()), (2, 3));
        assert_eq!(g.get(Pos::new(0, 0)), Some(Cell::Wall));
        assert_eq!(g.get(Pos::new(1, 1)), Some(Cell::Trophy(Color::Red)));
        assert_eq!(g.get(Pos::new(1, 2)), Some(Cell::Hole));
        assert_eq!(g.get(Pos::new(2, 0)), None);
    }

    #[test]
    fn trailing_newline_and_crlf_tolerated() {
        let a = Grid::parse("__\nB_\n__\n").unwrap();
        let b = Grid::parse("__\r\nB_\r\n__").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.rows(), 3);
    }

    #[test]
    fn invalid_character_reports_position() {
        match Grid::parse("__\n_x") {
            Err(BoardError::InvalidCellCharacter { ch, row, col }) => {
                assert_eq!((ch, row, col), ('x', 1, 1));
            }
            other => panic!("expected InvalidCellCharacter, got {other:?}"),
        }
    }

    #[test]
    fn ragged_and_empty_layers_are_malformed() {
        assert!(matches!(Grid::parse("___\n__"), Err(BoardError::MalformedLayout(_))));
        assert!(matches!(Grid::parse(""), Err(BoardError::MalformedLayout(_))));
    }

    #[test]
    fn step_stops_at_every_edge() {
        let origin = Pos::new(0, 0);
        assert_eq!(origin.step(Direction::Up, 2, 2), None);
        assert_eq!(origin.step(Direction::Left, 2, 2), None);
        assert_eq!(origin.step(Direction::Right, 2, 2), Some(Pos::new(0, 1)));
        let corner = Pos::new(1, 1);
        assert_eq!(corner.step(Direction::Down, 2, 2), None);
        assert_eq!(corner.step(Direction::Right, 2, 2), None);
        assert_eq!(corner.step(Direction::Up, 2, 2), Some(Pos::new(0, 1)));
    }

    #[test]
    fn describe_roundtrips() {
        let text = "__WWW___\n__W_WW__\nWWWr_WWW";
        assert_eq!(Grid::parse(text).unwrap().describe(), text);
    }

    #[test]
    fn find_scans_row_major() {
        let g = Grid::parse("_C\nC_").unwrap();
        assert_eq!(g.find(|c| c == Cell::Crate), Some(Pos::new(0, 1)));
        assert_eq!(g.find(|c| c.is_player()), None);
    }
}
