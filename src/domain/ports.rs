use crate::domain::model::CustomerRecord;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Where customer records come from. Passed explicitly into the directory so
/// tests can swap the backend for an in-memory fake.
#[async_trait]
pub trait CustomerSource: Send + Sync {
    async fn fetch_customers(&self) -> Result<Vec<CustomerRecord>>;

    /// Short label for logs.
    fn describe(&self) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn backend_url(&self) -> &str;
    fn api_key(&self) -> &str;
    fn customers_table(&self) -> &str;
    fn request_timeout_secs(&self) -> u64;
}

#[async_trait]
impl<T: CustomerSource + ?Sized> CustomerSource for Box<T> {
    async fn fetch_customers(&self) -> Result<Vec<CustomerRecord>> {
        (**self).fetch_customers().await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
