pub mod board;
pub mod eval_constants;
pub mod game;
pub mod generator;
pub mod history;
pub mod lookup;
pub mod position;
pub mod repetition;
pub mod rules;
