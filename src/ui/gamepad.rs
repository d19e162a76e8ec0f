/// Gamepad input using gilrs.
///
/// Button mapping comes from config.toml (`[gamepad]`). Every action is
/// edge-triggered: one press, one command.
///   D-pad / Left Stick    →  Move
///   B / L1                →  Undo
///   Y                     →  Restart
///   A / Start             →  Next level
///   Select                →  Quit
///
/// Without the `gamepad` feature the tracker exists but never reports
/// anything, so the frame loop does not need to care.

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};
use tracing::warn;

use crate::config::GamepadConfig;
use crate::domain::direction::Direction;
use crate::sim::world::Command;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.5;

/// Logical face / shoulder buttons.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,
    R1,
    L2,
    R2,
    Start,
    Select,
}

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH"  => Some(Btn::A),
            "B" | "EAST"   => Some(Btn::B),
            "X" | "WEST"   => Some(Btn::X),
            "Y" | "NORTH"  => Some(Btn::Y),
            "L1" | "LB"    => Some(Btn::L1),
            "R1" | "RB"    => Some(Btn::R1),
            "L2" | "LT"    => Some(Btn::L2),
            "R2" | "RT"    => Some(Btn::R2),
            "START"        => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South         => Some(Btn::A),
            Button::East          => Some(Btn::B),
            Button::West          => Some(Btn::X),
            Button::North         => Some(Btn::Y),
            Button::LeftTrigger   => Some(Btn::L1),
            Button::RightTrigger  => Some(Btn::R1),
            Button::LeftTrigger2  => Some(Btn::L2),
            Button::RightTrigger2 => Some(Btn::R2),
            Button::Start         => Some(Btn::Start),
            Button::Select        => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Command-to-button mapping.
#[derive(Clone, Debug, PartialEq, Eq)]
struct ActionMap {
    undo: Vec<Btn>,
    restart: Vec<Btn>,
    next: Vec<Btn>,
    quit: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            undo:    vec![Btn::B, Btn::L1],
            restart: vec![Btn::Y],
            next:    vec![Btn::A, Btn::Start],
            quit:    vec![Btn::Select],
        }
    }
}

impl ActionMap {
    /// Names that do not parse are dropped; an action left with no
    /// buttons keeps its default.
    fn from_config(cfg: &GamepadConfig) -> Self {
        fn parse_list(names: &[String], fallback: Vec<Btn>) -> Vec<Btn> {
            let parsed: Vec<Btn> = names
                .iter()
                .filter_map(|s| {
                    let btn = Btn::from_name(s);
                    if btn.is_none() {
                        warn!(button = %s, "unknown gamepad button name");
                    }
                    btn
                })
                .collect();
            if parsed.is_empty() { fallback } else { parsed }
        }
        let d = ActionMap::default();
        ActionMap {
            undo: parse_list(&cfg.undo, d.undo),
            restart: parse_list(&cfg.restart, d.restart),
            next: parse_list(&cfg.next, d.next),
            quit: parse_list(&cfg.quit, d.quit),
        }
    }

    fn command_for(&self, btn: Btn) -> Option<Command> {
        if self.undo.contains(&btn) {
            Some(Command::Undo)
        } else if self.restart.contains(&btn) {
            Some(Command::Restart)
        } else if self.next.contains(&btn) {
            Some(Command::NextLevel)
        } else if self.quit.contains(&btn) {
            Some(Command::Quit)
        } else {
            None
        }
    }
}

/// Digital view of the left stick: which direction (if any) is past
/// the deadzone. Diagonals resolve to the dominant axis.
fn stick_direction(x: f32, y: f32) -> Option<Direction> {
    if x.abs() < STICK_DEADZONE && y.abs() < STICK_DEADZONE {
        return None;
    }
    if x.abs() >= y.abs() {
        Some(if x > 0.0 { Direction::Right } else { Direction::Left })
    } else {
        // gilrs: positive Y is up
        Some(if y > 0.0 { Direction::Up } else { Direction::Down })
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    action_map: ActionMap,

    // Stick
    stick_x: f32,
    stick_y: f32,
    stick_dir: Option<Direction>,

    /// Commands decoded during the most recent `update()`.
    commands: Vec<Command>,
    pub connected: bool,
}

impl GamepadState {
    pub fn new(cfg: &GamepadConfig) -> Self {
        #[cfg_attr(not(feature = "gamepad"), allow(unused_mut))]
        let mut pad = Self::detached(cfg);

        #[cfg(feature = "gamepad")]
        match Gilrs::new() {
            Ok(g) => {
                pad.connected = g.gamepads().next().is_some();
                pad.gilrs = Some(g);
            }
            Err(e) => warn!("gamepad support unavailable: {e}"),
        }

        pad
    }

    /// A tracker with no backend attached.
    fn detached(cfg: &GamepadConfig) -> Self {
        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: None,
            action_map: ActionMap::from_config(cfg),
            stick_x: 0.0,
            stick_y: 0.0,
            stick_dir: None,
            commands: Vec::with_capacity(4),
            connected: false,
        }
    }

    pub fn update(&mut self) {
        self.commands.clear();

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    self.press(btn);
                }
                EventType::AxisChanged(axis, value, _) => {
                    self.connected = true;
                    match axis {
                        Axis::LeftStickX => self.stick_x = value,
                        Axis::LeftStickY => self.stick_y = value,
                        _ => {}
                    }
                    self.stick_moved();
                }
                EventType::Connected => self.connected = true,
                EventType::Disconnected => {
                    self.connected = false;
                    self.stick_x = 0.0;
                    self.stick_y = 0.0;
                    self.stick_dir = None;
                }
                _ => {}
            }
        }
    }

    #[cfg(feature = "gamepad")]
    fn press(&mut self, btn: Button) {
        let cmd = match btn {
            Button::DPadUp    => Some(Command::Move(Direction::Up)),
            Button::DPadDown  => Some(Command::Move(Direction::Down)),
            Button::DPadLeft  => Some(Command::Move(Direction::Left)),
            Button::DPadRight => Some(Command::Move(Direction::Right)),
            other => Btn::from_gilrs(other).and_then(|b| self.action_map.command_for(b)),
        };
        self.commands.extend(cmd);
    }

    /// Emit a move only when the stick enters a new direction.
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn stick_moved(&mut self) {
        let dir = stick_direction(self.stick_x, self.stick_y);
        if dir != self.stick_dir {
            if let Some(d) = dir {
                self.commands.push(Command::Move(d));
            }
            self.stick_dir = dir;
        }
    }
}
