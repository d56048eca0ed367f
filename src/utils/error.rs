use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrmError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Backend returned {status}: {message}")]
    BackendError { status: u16, message: String },

    #[error("Invalid customer record at row {row}: {reason}")]
    InvalidRecordError { row: usize, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Backend,
    Configuration,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CrmError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CrmError::ApiError(_) => ErrorCategory::Network,
            CrmError::BackendError { .. } => ErrorCategory::Backend,
            CrmError::ConfigError { .. }
            | CrmError::MissingConfigError { .. }
            | CrmError::InvalidConfigValueError { .. }
            | CrmError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            CrmError::CsvError(_)
            | CrmError::SerializationError(_)
            | CrmError::InvalidRecordError { .. } => ErrorCategory::Data,
            CrmError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 網路或 5xx 錯誤通常重試即可
            CrmError::ApiError(_) => ErrorSeverity::Medium,
            CrmError::BackendError { status, .. } if *status >= 500 => ErrorSeverity::Medium,
            CrmError::BackendError { .. } => ErrorSeverity::High,
            CrmError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            CrmError::ApiError(_) => {
                "Check network connectivity and that the backend URL is reachable".to_string()
            }
            CrmError::BackendError { status: 401, .. } | CrmError::BackendError { status: 403, .. } => {
                "Verify SUPABASE_ANON_KEY and the row-level security policies for the table"
                    .to_string()
            }
            CrmError::BackendError { status: 404, .. } => {
                "Verify the customers table name (--table / CUSTOMERS_TABLE)".to_string()
            }
            CrmError::BackendError { .. } => "Retry later; the backend reported a failure".to_string(),
            CrmError::MissingConfigError { field } => {
                format!("Provide a value for '{}' via flag, environment or config file", field)
            }
            CrmError::InvalidConfigValueError { field, .. }
            | CrmError::ConfigValidationError { field, .. } => {
                format!("Fix the value of '{}' and try again", field)
            }
            CrmError::ConfigError { .. } => "Review the configuration file".to_string(),
            CrmError::InvalidRecordError { .. } | CrmError::SerializationError(_) => {
                "Make sure the source returns a JSON array of customer objects".to_string()
            }
            CrmError::CsvError(_) => "Check the export destination and try again".to_string(),
            CrmError::IoError(_) => "Check file paths and permissions".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("無法連線到後端服務: {}", self),
            ErrorCategory::Backend => format!("後端服務回傳錯誤: {}", self),
            ErrorCategory::Configuration => format!("配置錯誤: {}", self),
            ErrorCategory::Data => format!("客戶資料格式錯誤: {}", self),
            ErrorCategory::System => format!("系統錯誤: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, CrmError>;
