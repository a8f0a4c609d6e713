// Public API - what other modules can use
pub use handlers::{get_all_race_counts, get_race_count_state, reset_race_count};

// Internal modules
pub mod handlers;
pub mod models;
pub mod repository;
pub mod store;
pub mod types;
