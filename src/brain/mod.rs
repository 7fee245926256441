//! Neural controllers for snakes
//!
//! This module contains:
//! - Board encoding (observation)
//! - Controller parameters and genetic operators (variables)
//! - Forward pass and move filtering (network)
//! - Weights-file persistence

pub mod network;
pub mod observation;
pub mod persistence;
pub mod variables;

pub use network::{filter_and_sort_moves, ok_moves, Brain, ScoredMove};
pub use observation::{create_observation, input_size};
pub use persistence::{load_variables, save_variables, ModelMetadata};
pub use variables::Variables;
