use crate::core::{ConfigProvider, CustomerRecord, CustomerSource};
use crate::utils::error::{CrmError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Customers table behind the backend's PostgREST endpoint.
pub struct RestCustomerSource<C: ConfigProvider> {
    config: C,
    client: Client,
}

impl<C: ConfigProvider> RestCustomerSource<C> {
    pub fn new(config: C) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs()))
            .build()?;
        Ok(Self { config, client })
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.config.backend_url().trim_end_matches('/'),
            self.config.customers_table()
        )
    }
}

#[async_trait]
impl<C: ConfigProvider> CustomerSource for RestCustomerSource<C> {
    async fn fetch_customers(&self) -> Result<Vec<CustomerRecord>> {
        let endpoint = self.endpoint();
        tracing::debug!("Making API request to: {}", endpoint);

        let response = self
            .client
            .get(&endpoint)
            .query(&[("select", "*")])
            .header("apikey", self.config.api_key())
            .bearer_auth(self.config.api_key())
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CrmError::BackendError {
                status: status.as_u16(),
                message,
            });
        }

        let body: serde_json::Value = response.json().await?;
        match body {
            serde_json::Value::Array(rows) => CustomerRecord::from_rows(&rows),
            _ => Err(CrmError::InvalidRecordError {
                row: 0,
                reason: "expected a JSON array of customers".to_string(),
            }),
        }
    }

    fn describe(&self) -> String {
        format!("backend table '{}'", self.config.customers_table())
    }
}
