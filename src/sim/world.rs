/// WorldState: the play session around one board.
///
/// Owns the level list, the live board of the current level, and the
/// session meta (turn counter, phase, status message). The frame loop
/// feeds it `Command`s; the renderer only reads it.
///
/// ## Phase transitions
///
/// ```text
///   Playing ──win──▶ Won ──NextLevel──▶ Playing (next level)
///      │                     └─(last level)──▶ Complete
///      └──player falls──▶ Lost ──Undo / Restart──▶ Playing
/// ```
///
/// Undo and restart are honored in every phase but `Complete`; moves
/// only while `Playing`.

use tracing::info;

use crate::domain::direction::Direction;
use crate::error::LevelError;
use crate::sim::board::Board;
use crate::sim::level::LevelDef;
use crate::sim::outcome::{self, Outcome};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Move(Direction),
    Undo,
    Restart,
    NextLevel,
    Quit,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Playing,
    Won,
    Lost,
    /// Every level solved.
    Complete,
}

pub struct WorldState {
    levels: Vec<LevelDef>,
    pub current_level: usize,
    pub board: Board,

    // ── Meta ──
    pub phase: Phase,
    /// Accepted moves plus effective undos since the level started.
    pub turns: u32,
    pub message: String,
    pub quit: bool,
}

impl WorldState {
    pub fn new(levels: Vec<LevelDef>) -> Result<Self, LevelError> {
        let first = levels.first().ok_or(LevelError::NoLevels)?;
        let board = build_board(first)?;
        let mut world = WorldState {
            levels,
            current_level: 0,
            board,
            phase: Phase::Playing,
            turns: 0,
            message: String::new(),
            quit: false,
        };
        world.announce_level();
        world.refresh_phase();
        Ok(world)
    }

    pub fn level_name(&self) -> &str {
        &self.levels[self.current_level].name
    }

    pub fn total_levels(&self) -> usize {
        self.levels.len()
    }

    /// Apply one command. Returns `true` when the screen needs a redraw.
    pub fn handle(&mut self, command: Command) -> Result<bool, LevelError> {
        match command {
            Command::Quit => {
                self.quit = true;
                Ok(false)
            }
            Command::Move(dir) => Ok(self.apply_move(dir)),
            Command::Undo => Ok(self.undo()),
            Command::Restart => Ok(self.restart()),
            Command::NextLevel => self.next_level(),
        }
    }

    // ── Commands ──

    fn apply_move(&mut self, dir: Direction) -> bool {
        if self.phase != Phase::Playing || self.board.player_position().is_none() {
            return false;
        }
        let events = self.board.apply_move(dir);
        self.turns += 1;
        if events.iter().any(|e| e.player_fell()) {
            info!(level = self.level_name(), turns = self.turns, "player fell into a hole");
        }
        self.refresh_phase();
        true
    }

    fn undo(&mut self) -> bool {
        if self.phase == Phase::Complete || !self.board.undo() {
            return false;
        }
        self.turns += 1;
        self.refresh_phase();
        true
    }

    fn restart(&mut self) -> bool {
        if self.phase == Phase::Complete {
            return false;
        }
        self.board.restart();
        self.turns = 0;
        info!(level = self.level_name(), "level restarted");
        self.phase = Phase::Playing;
        self.announce_level();
        self.refresh_phase();
        true
    }

    fn next_level(&mut self) -> Result<bool, LevelError> {
        if self.phase != Phase::Won {
            return Ok(false);
        }
        if self.current_level + 1 >= self.levels.len() {
            self.phase = Phase::Complete;
            self.message = "All levels solved! Press Q to quit.".into();
            info!(levels = self.levels.len(), "all levels solved");
            return Ok(true);
        }
        self.load_level(self.current_level + 1)?;
        Ok(true)
    }

    fn load_level(&mut self, idx: usize) -> Result<(), LevelError> {
        let def = self.levels.get(idx).ok_or(LevelError::NoLevels)?;
        self.board = build_board(def)?;
        self.current_level = idx;
        self.turns = 0;
        self.phase = Phase::Playing;
        self.announce_level();
        self.refresh_phase();
        Ok(())
    }

    // ── Phase bookkeeping ──

    fn refresh_phase(&mut self) {
        let phase = match outcome::evaluate(&self.board) {
            Outcome::Won => Phase::Won,
            Outcome::Lost => Phase::Lost,
            Outcome::Playing => Phase::Playing,
        };
        if phase == self.phase {
            return;
        }
        self.phase = phase;
        match phase {
            Phase::Won => {
                info!(level = self.level_name(), turns = self.turns, "level solved");
                self.message = if self.current_level + 1 < self.levels.len() {
                    "Solved! Press N for the next level.".into()
                } else {
                    "Solved! Press N to finish.".into()
                };
            }
            Phase::Lost => {
                self.message = "You fell in a hole. U to undo, R to restart.".into();
            }
            Phase::Playing | Phase::Complete => self.message.clear(),
        }
    }

    fn announce_level(&mut self) {
        info!(
            level = self.level_name(),
            index = self.current_level + 1,
            total = self.levels.len(),
            "level loaded"
        );
        self.message.clear();
    }
}

fn build_board(def: &LevelDef) -> Result<Board, LevelError> {
    def.board().map_err(|source| LevelError::Board {
        name: def.name.clone(),
        source,
    })
}
