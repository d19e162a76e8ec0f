/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Glyph)
///   2. Compare each glyph with `back` buffer (previous frame)
///   3. Only emit terminal commands for glyphs that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Screen layout:
///   row 0        HUD (level name, index/total, turns)
///   row 2..      board, each board cell two terminal columns wide
///   below board  status message, key help

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::cell::{self, Cell};
use crate::domain::direction::Direction;
use crate::sim::board::Layer;
use crate::sim::world::{Phase, WorldState};

// ── Glyph: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Glyph {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Glyph {
    /// Explicit dark background for every empty terminal cell, so the
    /// gaps between rows match the cells on VTE terminals.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Glyph = Glyph { ch: ' ', fg: Color::White, bg: Glyph::BASE_BG };

    /// Sentinel used to invalidate the back buffer: differs from any
    /// real glyph, so every position gets diff'd.
    const INVALID: Glyph = Glyph { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        Glyph { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Glyphs ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Glyph>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Glyph::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Glyph::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Glyph::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, glyph: Glyph) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = glyph;
        }
    }

    fn get(&self, x: usize, y: usize) -> Glyph {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Glyph::BLANK
        }
    }

    /// Write a string at (x, y). Clipped at the right edge.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width {
                break;
            }
            self.set(x + i, y, Glyph::new(ch, fg, bg));
        }
    }

    /// Write a string centered on row y.
    fn put_centered(&mut self, y: usize, s: &str, fg: Color) {
        let len = s.chars().count();
        let x = self.width.saturating_sub(len) / 2;
        self.put_str(x, y, s, fg, Glyph::BASE_BG);
    }
}

// ── Cell styling ──

/// Each board cell is two terminal columns wide.
const CELL_W: usize = 2;

const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;

const HELP: &str = "arrows/WASD move  U undo  R restart  N next  Q quit";

fn tint(color: cell::Color) -> Color {
    match color {
        cell::Color::Yellow => Color::Rgb { r: 230, g: 200, b: 60 },
        cell::Color::Green  => Color::Rgb { r: 90, g: 200, b: 90 },
        cell::Color::Blue   => Color::Rgb { r: 80, g: 140, b: 240 },
        cell::Color::Red    => Color::Rgb { r: 220, g: 70, b: 70 },
    }
}

fn dim(color: cell::Color) -> Color {
    match color {
        cell::Color::Yellow => Color::Rgb { r: 70, g: 60, b: 20 },
        cell::Color::Green  => Color::Rgb { r: 25, g: 60, b: 25 },
        cell::Color::Blue   => Color::Rgb { r: 25, g: 40, b: 80 },
        cell::Color::Red    => Color::Rgb { r: 70, g: 25, b: 25 },
    }
}

const ICE_BG: Color = Color::Rgb { r: 45, g: 75, b: 105 };
const WALL_FG: Color = Color::Rgb { r: 130, g: 130, b: 145 };
const CRATE_FG: Color = Color::Rgb { r: 190, g: 130, b: 70 };

/// The two glyphs for one board cell: the dynamic occupant drawn over
/// the base terrain. The base shows through where the occupant is Blank
/// and always lends its background.
fn cell_glyphs(base: Cell, dynamic: Cell) -> [Glyph; 2] {
    let bg = match base {
        Cell::Ice => ICE_BG,
        Cell::Target(c) if base.accepts(dynamic) => tint(c),
        Cell::Target(c) => dim(c),
        _ => Glyph::BASE_BG,
    };
    let shown = if dynamic.is_blank() { base } else { dynamic };

    let (text, fg) = match shown {
        Cell::Blank     => ("  ", Color::White),
        Cell::Wall      => ("██", WALL_FG),
        Cell::Crate     => ("[]", CRATE_FG),
        Cell::Ice       => ("░░", Color::Rgb { r: 170, g: 210, b: 240 }),
        Cell::Hole      => ("()", Color::DarkGrey),
        Cell::Target(c) => ("<>", tint(c)),
        Cell::Trophy(c) => match base {
            Cell::Target(_) if base.accepts(dynamic) => ("{}", Color::Black),
            _ => ("{}", tint(c)),
        },
        Cell::Player(dir) => (player_text(dir), Color::White),
    };

    let mut chars = text.chars();
    let first = chars.next().unwrap_or(' ');
    let second = chars.next().unwrap_or(' ');
    [Glyph::new(first, fg, bg), Glyph::new(second, fg, bg)]
}

fn player_text(dir: Direction) -> &'static str {
    match dir {
        Direction::Up    => "@^",
        Direction::Down  => "@v",
        Direction::Left  => "<@",
        Direction::Right => "@>",
    }
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_level: Option<usize>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_level: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Glyph::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size()?;
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        self.invalidate();

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Force a full repaint on the next frame.
    pub fn invalidate(&mut self) {
        self.back.cells.fill(Glyph::INVALID);
    }

    pub fn render(&mut self, world: &WorldState) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size()?;
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.invalidate();
            queue!(self.writer, SetBackgroundColor(Glyph::BASE_BG), Clear(ClearType::All))?;
        }

        // New level → clear for a clean transition (board sizes differ)
        if self.last_level != Some(world.current_level) {
            self.invalidate();
            queue!(self.writer, SetBackgroundColor(Glyph::BASE_BG), Clear(ClearType::All))?;
            self.last_level = Some(world.current_level);
        }

        self.front.clear();
        self.compose(world);
        self.flush_diff()?;

        // Swap: current front becomes next back
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    // ── Diff flush: only write changed glyphs ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Glyph::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit base colors, never ResetColor: the terminal default
        // may differ from BASE_BG.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Glyph::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let glyph = self.front.get(x, y);
                if glyph == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }
                if glyph.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(glyph.fg))?;
                    last_fg = glyph.fg;
                }
                if glyph.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(glyph.bg))?;
                    last_bg = glyph.bg;
                }

                queue!(self.writer, Print(glyph.ch))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose(&mut self, w: &WorldState) {
        let buf_w = self.front.width;

        // ── HUD row ──
        let hud = format!(
            " {}  ({}/{})   Turns: {} ",
            w.level_name(),
            w.current_level + 1,
            w.total_levels(),
            w.turns,
        );
        self.front.put_str(0, HUD_ROW, &hud, Color::Black, Color::Rgb { r: 200, g: 200, b: 210 });
        for x in hud.chars().count()..buf_w {
            self.front.set(x, HUD_ROW, Glyph::new(' ', Color::Black, Color::Rgb { r: 200, g: 200, b: 210 }));
        }

        // ── Board ──
        let (rows, cols) = w.board.dimensions();
        let x0 = buf_w.saturating_sub(cols * CELL_W) / 2;
        for r in 0..rows {
            for c in 0..cols {
                let (Ok(base), Ok(dynamic)) = (
                    w.board.cell_at(Layer::Base, r, c),
                    w.board.cell_at(Layer::Dynamic, r, c),
                ) else {
                    continue;
                };
                let [left, right] = cell_glyphs(base, dynamic);
                let x = x0 + c * CELL_W;
                self.front.set(x, MAP_ROW + r, left);
                self.front.set(x + 1, MAP_ROW + r, right);
            }
        }

        // ── Status + help ──
        let status_row = MAP_ROW + rows + 1;
        let (status, fg) = match w.phase {
            Phase::Playing => (w.message.as_str(), Color::White),
            Phase::Won | Phase::Complete => (w.message.as_str(), Color::Green),
            Phase::Lost => (w.message.as_str(), Color::Red),
        };
        self.front.put_centered(status_row, status, fg);
        self.front.put_centered(status_row + 1, HELP, Color::DarkGrey);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(glyphs: [Glyph; 2]) -> String {
        glyphs.iter().map(|g| g.ch).collect()
    }

    #[test]
    fn base_shows_through_blank() {
        let g = cell_glyphs(Cell::Target(cell::Color::Red), Cell::Blank);
        assert_eq!(text(g), "<>");
        assert_eq!(g[0].bg, dim(cell::Color::Red));

        let g = cell_glyphs(Cell::Ice, Cell::Blank);
        assert_eq!(text(g), "░░");
    }

    #[test]
    fn occupant_covers_base_but_keeps_background() {
        let g = cell_glyphs(Cell::Ice, Cell::Crate);
        assert_eq!(text(g), "[]");
        assert_eq!(g[1].bg, ICE_BG);
    }

    #[test]
    fn scored_trophy_is_highlighted() {
        let scored = cell_glyphs(Cell::Target(cell::Color::Blue), Cell::Trophy(cell::Color::Blue));
        assert_eq!(scored[0].bg, tint(cell::Color::Blue));

        let wrong = cell_glyphs(Cell::Target(cell::Color::Blue), Cell::Trophy(cell::Color::Green));
        assert_eq!(wrong[0].bg, dim(cell::Color::Blue));
        assert_eq!(wrong[0].fg, tint(cell::Color::Green));
    }

    #[test]
    fn player_shows_facing() {
        assert_eq!(text(cell_glyphs(Cell::Blank, Cell::Player(Direction::Left))), "<@");
        assert_eq!(text(cell_glyphs(Cell::Blank, Cell::Player(Direction::Down))), "@v");
    }

    #[test]
    fn put_str_clips_at_right_edge() {
        let mut fb = FrameBuffer::new(4, 1);
        fb.put_str(2, 0, "abc", Color::White, Glyph::BASE_BG);
        assert_eq!(fb.get(2, 0).ch, 'a');
        assert_eq!(fb.get(3, 0).ch, 'b');
        assert_eq!(fb.get(4, 0), Glyph::BLANK);
    }

    #[test]
    fn put_centered_on_narrow_buffer_starts_at_zero() {
        let mut fb = FrameBuffer::new(3, 1);
        fb.put_centered(0, "hello", Color::White);
        assert_eq!(fb.get(0, 0).ch, 'h');
    }
}
