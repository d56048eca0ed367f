use crate::domain::model::{province_name, ResolvedCustomer};
use crate::utils::error::{CrmError, Result};
use std::str::FromStr;

pub const CSV_HEADER: [&str; 7] = [
    "id",
    "name",
    "email",
    "city",
    "province",
    "canonical_province",
    "display_city",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

impl FromStr for OutputFormat {
    type Err = CrmError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(CrmError::InvalidConfigValueError {
                field: "format".to_string(),
                value: other.to_string(),
                reason: "Supported formats: table, csv, json".to_string(),
            }),
        }
    }
}

impl OutputFormat {
    /// Format implied by an export file name.
    pub fn from_path(path: &str) -> Result<Self> {
        crate::utils::validation::validate_file_extension("output", path, &["csv", "json"])?;
        if path.ends_with(".json") {
            Ok(OutputFormat::Json)
        } else {
            Ok(OutputFormat::Csv)
        }
    }
}

pub fn export_csv(customers: &[ResolvedCustomer]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for customer in customers {
        let record = &customer.record;
        writer.write_record([
            record.id.as_str(),
            record.name.as_deref().unwrap_or(""),
            record.email.as_deref().unwrap_or(""),
            record.raw_city(),
            record.province.as_deref().map(str::trim).unwrap_or(""),
            province_name(customer.geography.canonical_province),
            customer.geography.display_city.as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CrmError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| CrmError::ConfigError {
        message: format!("CSV output is not valid UTF-8: {}", e),
    })
}

pub fn export_json(customers: &[ResolvedCustomer]) -> Result<String> {
    Ok(serde_json::to_string_pretty(customers)?)
}

/// Plain-text table for terminal output.
pub fn render_table(customers: &[ResolvedCustomer]) -> String {
    let mut lines = vec![format!(
        "{:<10} {:<32} {:<10} {:<24}",
        "id", "name", "province", "city"
    )];
    for customer in customers {
        lines.push(format!(
            "{:<10} {:<32} {:<10} {:<24}",
            customer.record.id,
            customer.record.name.as_deref().unwrap_or("-"),
            province_name(customer.geography.canonical_province),
            customer.geography.display_city,
        ));
    }
    lines.join("\n")
}

pub fn render(customers: &[ResolvedCustomer], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(customers)),
        OutputFormat::Csv => export_csv(customers),
        OutputFormat::Json => export_json(customers),
    }
}
