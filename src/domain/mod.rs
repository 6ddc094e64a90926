pub mod cell;
pub mod grid;
pub mod light;
pub mod rules;
pub mod solver;
pub mod sprite;
