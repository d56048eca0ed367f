use crate::config::toml_config::{DEFAULT_TABLE, DEFAULT_TIMEOUT_SECONDS};
use crate::core::ConfigProvider;
use crate::utils::error::{CrmError, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub backend_url: String,
    pub api_key: String,
    pub customers_table: String,
    pub request_timeout_secs: u64,
}

impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            backend_url: env::var("SUPABASE_URL").map_err(|_| CrmError::MissingConfigError {
                field: "SUPABASE_URL".to_string(),
            })?,
            api_key: env::var("SUPABASE_ANON_KEY").map_err(|_| CrmError::MissingConfigError {
                field: "SUPABASE_ANON_KEY".to_string(),
            })?,
            customers_table: env::var("CUSTOMERS_TABLE")
                .unwrap_or_else(|_| DEFAULT_TABLE.to_string()),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
        })
    }
}

impl ConfigProvider for LambdaConfig {
    fn backend_url(&self) -> &str {
        &self.backend_url
    }

    fn api_key(&self) -> &str {
        &self.api_key
    }

    fn customers_table(&self) -> &str {
        &self.customers_table
    }

    fn request_timeout_secs(&self) -> u64 {
        self.request_timeout_secs
    }
}

impl crate::utils::validation::Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        use crate::utils::validation::*;

        validate_url("SUPABASE_URL", &self.backend_url)?;
        validate_non_empty_string("SUPABASE_ANON_KEY", &self.api_key)?;
        validate_non_empty_string("CUSTOMERS_TABLE", &self.customers_table)?;
        // Lambda 最長執行時間內必須完成
        validate_range("REQUEST_TIMEOUT_SECONDS", self.request_timeout_secs, 1, 60)?;

        Ok(())
    }
}
