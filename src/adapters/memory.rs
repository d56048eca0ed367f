use crate::core::{CustomerRecord, CustomerSource};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Records already held in memory. Handy for tests and for callers that
/// fetched the rows themselves.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCustomerSource {
    records: Vec<CustomerRecord>,
}

impl InMemoryCustomerSource {
    pub fn new(records: Vec<CustomerRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl CustomerSource for InMemoryCustomerSource {
    async fn fetch_customers(&self) -> Result<Vec<CustomerRecord>> {
        Ok(self.records.clone())
    }

    fn describe(&self) -> String {
        format!("in-memory source ({} records)", self.records.len())
    }
}
