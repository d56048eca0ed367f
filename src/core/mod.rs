pub mod directory;
pub mod export;
pub mod filter;
pub mod geo;

pub use crate::domain::model::{CustomerRecord, GeoQuery, Province, ResolvedCustomer, ResolvedGeography};
pub use crate::domain::ports::{ConfigProvider, CustomerSource};
pub use crate::utils::error::Result;
