// Adapters layer: concrete customer sources (backend REST, JSON export, memory).

pub mod file;
pub mod memory;
pub mod rest;

pub use file::JsonFileSource;
pub use memory::InMemoryCustomerSource;
pub use rest::RestCustomerSource;
