pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{InMemoryCustomerSource, JsonFileSource, RestCustomerSource};
pub use config::{LambdaConfig, TomlConfig};
pub use core::directory::CustomerDirectory;
pub use core::filter::CustomerFilter;
pub use core::{CustomerRecord, GeoQuery, Province, ResolvedGeography};
pub use utils::error::{CrmError, Result};
