pub mod cell;
pub mod direction;
pub mod grid;
pub mod rules;
