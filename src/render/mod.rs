//! Text rendering of the board, used for snapshots and evaluation output

pub mod renderer;

pub use renderer::{render_board, Renderer};
