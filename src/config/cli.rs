use crate::config::toml_config::{TomlConfig, DEFAULT_TABLE, DEFAULT_TIMEOUT_SECONDS};
use crate::core::{ConfigProvider, GeoQuery};
use crate::utils::error::{CrmError, Result};
use crate::utils::validation::{self, Validate};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "crm-geo")]
#[command(about = "Resolve and filter CRM customers by province and city")]
pub struct CliConfig {
    #[arg(long, env = "SUPABASE_URL", global = true)]
    pub backend_url: Option<String>,

    #[arg(long, env = "SUPABASE_ANON_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "CUSTOMERS_TABLE", global = true)]
    pub table: Option<String>,

    #[arg(long, global = true)]
    pub timeout_seconds: Option<u64>,

    /// Read customers from a JSON export instead of the backend
    #[arg(long, global = true)]
    pub input: Option<String>,

    /// TOML configuration file; flags and environment take precedence
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List customers matching the filter
    List {
        #[command(flatten)]
        filter: FilterArgs,

        /// table, csv or json
        #[arg(long)]
        format: Option<String>,
    },
    /// Count matching customers per province and city
    Summary {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Show provinces and cities available for filtering
    Options,
    /// Map markers for matching customers with coordinates
    Markers {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Write matching customers to a .csv or .json file
    Export {
        #[command(flatten)]
        filter: FilterArgs,

        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    #[arg(long)]
    pub province: Option<String>,

    #[arg(long)]
    pub city: Option<String>,
}

impl FilterArgs {
    /// Flags win per dimension; missing ones fall back to `defaults`.
    pub fn to_query(&self, defaults: &GeoQuery) -> GeoQuery {
        GeoQuery {
            province: self.province.clone().or_else(|| defaults.province.clone()),
            city: self.city.clone().or_else(|| defaults.city.clone()),
        }
    }
}

impl CliConfig {
    /// Fills unset backend settings from a TOML file.
    pub fn merge_toml(&mut self, file: &TomlConfig) {
        if self.backend_url.is_none() {
            self.backend_url = Some(file.backend.url.clone());
        }
        if self.api_key.is_none() {
            self.api_key = Some(file.backend.api_key.clone());
        }
        if self.table.is_none() {
            self.table = file.backend.table.clone();
        }
        if self.timeout_seconds.is_none() {
            self.timeout_seconds = file.backend.timeout_seconds;
        }
    }
}

impl ConfigProvider for CliConfig {
    fn backend_url(&self) -> &str {
        self.backend_url.as_deref().unwrap_or("")
    }

    fn api_key(&self) -> &str {
        self.api_key.as_deref().unwrap_or("")
    }

    fn customers_table(&self) -> &str {
        self.table.as_deref().unwrap_or(DEFAULT_TABLE)
    }

    fn request_timeout_secs(&self) -> u64 {
        self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(input) = &self.input {
            // 離線模式不需要後端設定
            return validation::validate_path("input", input);
        }

        let url = validation::validate_required_field("backend_url", &self.backend_url)?;
        validation::validate_url("backend_url", url)?;

        let key = validation::validate_required_field("api_key", &self.api_key)?;
        if key.trim().is_empty() {
            return Err(CrmError::MissingConfigError {
                field: "api_key".to_string(),
            });
        }

        validation::validate_non_empty_string("table", self.customers_table())?;
        validation::validate_range("timeout_seconds", self.request_timeout_secs(), 1, 300)?;

        if let Command::Export {
            output: Some(path), ..
        } = &self.command
        {
            validation::validate_path("output", path)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliConfig {
        CliConfig::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_parse_list_with_filter() {
        let config = parse(&[
            "crm-geo",
            "--backend-url",
            "https://abc.supabase.co",
            "--api-key",
            "anon",
            "list",
            "--province",
            "Huelva",
            "--format",
            "json",
        ]);

        match &config.command {
            Command::List { filter, format } => {
                assert_eq!(filter.province.as_deref(), Some("Huelva"));
                assert_eq!(format.as_deref(), Some("json"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(config.validate().is_ok());
        assert_eq!(config.customers_table(), "customers");
    }

    #[test]
    fn test_input_file_skips_backend_validation() {
        let config = parse(&["crm-geo", "--input", "clientes.json", "options"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_merge_toml_keeps_flags() {
        let mut config = parse(&["crm-geo", "--table", "clientes", "summary"]);
        let file = TomlConfig::from_toml_str(
            r#"
[backend]
url = "https://abc.supabase.co"
api_key = "anon"
table = "customers"
timeout_seconds = 12
"#,
        )
        .unwrap();

        config.merge_toml(&file);

        assert_eq!(config.backend_url(), "https://abc.supabase.co");
        assert_eq!(config.customers_table(), "clientes");
        assert_eq!(config.request_timeout_secs(), 12);
    }

    #[test]
    fn test_filter_args_fall_back_to_defaults() {
        let defaults = GeoQuery::new("Cádiz", "Jerez");
        let args = FilterArgs {
            province: None,
            city: Some("Arcos".to_string()),
        };
        let query = args.to_query(&defaults);
        assert_eq!(query.province(), Some("Cádiz"));
        assert_eq!(query.city(), Some("Arcos"));
    }
}
