pub mod generation_stats;

pub use generation_stats::{FitnessSummary, GenerationStats};
