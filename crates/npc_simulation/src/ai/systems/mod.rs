//! AI systems (ECS wiring для perception/action loops)

pub mod action;
pub mod perception;
pub mod targeting;

// Re-export all systems
pub use action::*;
pub use perception::*;
pub use targeting::*;
