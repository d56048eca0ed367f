use anyhow::Context;
use clap::Parser;
use crm_geo::config::{CliConfig, Command};
use crm_geo::core::export::{self, OutputFormat};
use crm_geo::core::CustomerSource;
use crm_geo::utils::error::{CrmError, ErrorSeverity};
use crm_geo::utils::{logger, validation::Validate};
use crm_geo::{CustomerDirectory, JsonFileSource, RestCustomerSource, TomlConfig};

#[tokio::main]
async fn main() {
    let mut config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting crm-geo CLI");

    let file_config = match config.config.clone() {
        Some(path) => match TomlConfig::from_file(&path) {
            Ok(file) => {
                tracing::info!("📁 Loaded configuration from: {}", path);
                config.merge_toml(&file);
                Some(file)
            }
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => None,
    };

    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if let Err(e) = run(config, file_config).await {
        let (exit_code, suggestion) = match e.downcast_ref::<CrmError>() {
            Some(crm_error) => {
                // 記錄詳細錯誤信息
                tracing::error!(
                    "❌ crm-geo failed: {} (Category: {:?}, Severity: {:?})",
                    crm_error,
                    crm_error.category(),
                    crm_error.severity()
                );
                eprintln!("❌ {}", crm_error.user_friendly_message());

                // 根據錯誤嚴重程度決定退出碼
                let code = match crm_error.severity() {
                    ErrorSeverity::Low => 0,
                    ErrorSeverity::Medium => 2,
                    ErrorSeverity::High => 1,
                    ErrorSeverity::Critical => 3,
                };
                (code, Some(crm_error.recovery_suggestion()))
            }
            None => {
                tracing::error!("❌ crm-geo failed: {:#}", e);
                eprintln!("❌ {:#}", e);
                (1, None)
            }
        };

        if let Some(suggestion) = suggestion {
            eprintln!("💡 建議: {}", suggestion);
        }
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

async fn run(config: CliConfig, file_config: Option<TomlConfig>) -> anyhow::Result<()> {
    let defaults = file_config
        .as_ref()
        .map(TomlConfig::default_query)
        .unwrap_or_default();

    let source: Box<dyn CustomerSource> = match &config.input {
        Some(path) => Box::new(JsonFileSource::new(path)),
        None => Box::new(RestCustomerSource::new(config.clone())?),
    };
    let directory = CustomerDirectory::new(source);

    match &config.command {
        Command::List { filter, format } => {
            let format = match format
                .as_deref()
                .or_else(|| file_config.as_ref().and_then(TomlConfig::output_format))
            {
                Some(f) => f.parse::<OutputFormat>()?,
                None => OutputFormat::Table,
            };
            let customers = directory.list(&filter.to_query(&defaults)).await?;
            println!("{}", export::render(&customers, format)?);
        }
        Command::Summary { filter } => {
            let summary = directory.summary(&filter.to_query(&defaults)).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Options => {
            let options = directory.filter_options().await?;
            println!("{}", serde_json::to_string_pretty(&options)?);
        }
        Command::Markers { filter } => {
            let markers = directory.map_markers(&filter.to_query(&defaults)).await?;
            println!("{}", serde_json::to_string_pretty(&markers)?);
        }
        Command::Export { filter, output } => {
            let path = output
                .as_deref()
                .or_else(|| file_config.as_ref().and_then(TomlConfig::output_path))
                .ok_or_else(|| CrmError::MissingConfigError {
                    field: "output".to_string(),
                })?;
            let format = OutputFormat::from_path(path)?;

            let customers = directory.list(&filter.to_query(&defaults)).await?;
            let content = export::render(&customers, format)?;
            write_export(path, &content)?;

            tracing::info!("✅ Exported {} customers", customers.len());
            println!("📁 Output saved to: {}", path);
        }
    }

    Ok(())
}

fn write_export(path: &str, content: &str) -> anyhow::Result<()> {
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
    }
    std::fs::write(path, content).with_context(|| format!("failed to write export to {}", path))
}
