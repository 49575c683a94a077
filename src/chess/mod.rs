//! Implementation of chess rules: board geometry, move generation with the
//! legality filter and game state tracking.

pub mod attacks;
pub mod board;
pub mod core;
pub mod game;
pub mod movegen;
