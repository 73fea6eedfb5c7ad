pub mod api;
pub mod config;
pub mod core;
pub mod infrastructure;

pub use crate::core::errors::FairshareError;
pub use crate::core::services::FairshareService;
pub use infrastructure::logging::in_memory::InMemoryLogging;
pub use infrastructure::storage::in_memory::InMemoryStorage;

#[cfg(test)]
mod tests; // Include integration tests
