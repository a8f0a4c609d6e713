// Public API - what other modules can use
pub use handlers::{
    create_configuration, delete_configuration, get_configuration, get_strategy,
    list_configurations, update_configuration,
};

// Internal modules
pub mod handlers;
pub mod models;
pub mod repository;
pub mod store;
pub mod types;
