use crate::core::export::OutputFormat;
use crate::core::{ConfigProvider, GeoQuery};
use crate::utils::error::{CrmError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_TABLE: &str = "customers";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub backend: BackendConfig,
    pub filter: Option<FilterConfig>,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub url: String,
    pub api_key: String,
    pub table: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    pub province: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: Option<String>,
    pub path: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CrmError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| CrmError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SUPABASE_ANON_KEY})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::LazyLock;

        static ENV_VAR: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid")
        });

        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        crate::utils::validation::validate_url("backend.url", &self.backend.url)?;

        if self.backend.api_key.trim().is_empty() || self.backend.api_key.starts_with("${") {
            return Err(CrmError::MissingConfigError {
                field: "backend.api_key".to_string(),
            });
        }

        crate::utils::validation::validate_non_empty_string("backend.table", self.customers_table())?;
        crate::utils::validation::validate_range(
            "backend.timeout_seconds",
            self.request_timeout_secs(),
            1,
            300,
        )?;

        if let Some(format) = self.output.as_ref().and_then(|o| o.format.as_deref()) {
            format.parse::<OutputFormat>()?;
        }
        if let Some(path) = self.output_path() {
            crate::utils::validation::validate_path("output.path", path)?;
            OutputFormat::from_path(path)?;
        }

        Ok(())
    }

    /// 預設篩選條件
    pub fn default_query(&self) -> GeoQuery {
        self.filter
            .as_ref()
            .map(|f| GeoQuery {
                province: f.province.clone(),
                city: f.city.clone(),
            })
            .unwrap_or_default()
    }

    pub fn output_format(&self) -> Option<&str> {
        self.output.as_ref().and_then(|o| o.format.as_deref())
    }

    pub fn output_path(&self) -> Option<&str> {
        self.output.as_ref().and_then(|o| o.path.as_deref())
    }
}

impl ConfigProvider for TomlConfig {
    fn backend_url(&self) -> &str {
        &self.backend.url
    }

    fn api_key(&self) -> &str {
        &self.backend.api_key
    }

    fn customers_table(&self) -> &str {
        self.backend.table.as_deref().unwrap_or(DEFAULT_TABLE)
    }

    fn request_timeout_secs(&self) -> u64 {
        self.backend.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
