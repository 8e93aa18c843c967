pub mod admission;
pub mod handlers;
pub mod models;
pub mod orchestrator;
pub mod store;
