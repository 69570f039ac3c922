pub mod gauge;

pub use gauge::{confidence_gauge, rainfall_gauge};
