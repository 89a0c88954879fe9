//! Request handlers.

pub mod health;
pub mod predict;

pub use health::{health, ready};
pub use predict::predict;
