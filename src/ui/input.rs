/// Keyboard input.
///
/// Drains every pending crossterm event once per frame and turns key
/// presses into `Command`s, in arrival order. Key repeat counts as a
/// fresh press so holding an arrow keeps walking. Release events are
/// ignored.
///
///   Arrows / WASD      →  Move
///   U / Z / Backspace  →  Undo
///   R                  →  Restart
///   N / Enter / Space  →  Next level
///   Q / Esc / Ctrl-C   →  Quit

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::direction::Direction;
use crate::sim::world::Command;

pub struct InputState {
    /// Commands decoded during the most recent `drain_events()`.
    commands: Vec<Command>,
    /// Set when the terminal was resized; the renderer must repaint fully.
    pub resized: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            commands: Vec::with_capacity(8),
            resized: false,
        }
    }

    /// Drain all pending terminal events without blocking.
    /// Call this once per frame.
    pub fn drain_events(&mut self) -> std::io::Result<()> {
        self.commands.clear();
        self.resized = false;

        while poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) => {
                    if let Some(cmd) = command_for(&key) {
                        self.commands.push(cmd);
                    }
                }
                Event::Resize(..) => self.resized = true,
                _ => {}
            }
        }
        Ok(())
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }
}

/// Map one key event to a command. `None` for releases and unbound keys.
pub fn command_for(key: &KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('C') => Some(Command::Quit),
            _ => None,
        };
    }

    let cmd = match key.code {
        KeyCode::Up => Command::Move(Direction::Up),
        KeyCode::Down => Command::Move(Direction::Down),
        KeyCode::Left => Command::Move(Direction::Left),
        KeyCode::Right => Command::Move(Direction::Right),
        KeyCode::Backspace => Command::Undo,
        KeyCode::Enter => Command::NextLevel,
        KeyCode::Esc => Command::Quit,
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'w' => Command::Move(Direction::Up),
            's' => Command::Move(Direction::Down),
            'a' => Command::Move(Direction::Left),
            'd' => Command::Move(Direction::Right),
            'u' | 'z' => Command::Undo,
            'r' => Command::Restart,
            'n' | ' ' => Command::NextLevel,
            'q' => Command::Quit,
            _ => return None,
        },
        _ => return None,
    };
    Some(cmd)
}
