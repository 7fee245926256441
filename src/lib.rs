//! Neuro Snake - multi-snake simulation with genetically evolved controllers
//!
//! This library provides:
//! - Core game logic with simultaneous moves and collision resolution (game module)
//! - A small dense matrix type and its binary codec (tensor module)
//! - Feed-forward controllers and their weights file (brain module)
//! - Parallel tournament training by genetic algorithm (evolution module)
//! - Per-generation fitness statistics (metrics module)
//! - Plain-text board rendering (render module)
//! - Command-line run modes: train and evaluate (modes module)

pub mod brain;
pub mod evolution;
pub mod game;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod tensor;
