pub mod evaluate;
pub mod train;

pub use evaluate::{EvaluateConfig, EvaluateMode, EvaluationGame};
pub use train::TrainMode;
