pub mod planting_window;
pub mod prediction;

pub use planting_window::*;
pub use prediction::*;
