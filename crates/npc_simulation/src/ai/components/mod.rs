//! AI components

pub mod fsm;
pub mod tasks;


// Re-export all components
pub use fsm::*;
pub use tasks::*;
