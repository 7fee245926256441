//! Core game logic module for multi-snake games
//!
//! This module contains all the game rules without any I/O or rendering dependencies.
//! It is driven both by the trainer and by the evaluate mode.

pub mod action;
pub mod config;
pub mod engine;
pub mod entity;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use config::GameConfig;
pub use engine::Simulation;
pub use entity::{Entity, EntityMap};
pub use state::{Board, DeathCause, Position, Snake, SnakeId};
