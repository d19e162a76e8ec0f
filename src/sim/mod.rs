pub mod board;
pub mod event;
pub mod history;
pub mod level;
pub mod outcome;
pub mod step;
pub mod world;
