// Public API - what other modules can use
pub use factory::build_strategy;
pub use strategy::{GroupingResult, GroupingStrategy};

// Internal modules
pub mod custom;
pub mod factory;
pub mod monthly;
pub mod race_count;
pub mod strategy;
