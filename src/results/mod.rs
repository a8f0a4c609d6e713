// Public API - what other modules can use
pub use handlers::upload_result;
pub use models::RaceResult;
pub use service::ResultIngestService;

// Internal modules
pub mod handlers;
pub mod models;
pub mod service;
