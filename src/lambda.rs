#[cfg(feature = "lambda")]
use crm_geo::core::{GeoQuery, ResolvedCustomer};
#[cfg(feature = "lambda")]
use crm_geo::utils::{logger, validation::Validate};
#[cfg(feature = "lambda")]
use crm_geo::{CustomerDirectory, LambdaConfig, RestCustomerSource};
#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
#[cfg(feature = "lambda")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "lambda")]
#[derive(Deserialize)]
pub struct Request {
    pub province: Option<String>,
    pub city: Option<String>,
}

#[cfg(feature = "lambda")]
#[derive(Serialize)]
pub struct Response {
    pub message: String,
    pub matched: usize,
    pub customers: Vec<ResolvedCustomer>,
}

#[cfg(feature = "lambda")]
async fn function_handler(event: LambdaEvent<Request>) -> Result<Response, Error> {
    tracing::info!("Starting customer filter Lambda function");

    let lambda_config = LambdaConfig::from_env()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;
    lambda_config
        .validate()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

    let query = GeoQuery {
        province: event.payload.province,
        city: event.payload.city,
    };

    let source = RestCustomerSource::new(lambda_config)
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;
    let directory = CustomerDirectory::new(source);

    let customers = directory.list(&query).await.map_err(|e| {
        tracing::error!(
            "Customer query failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        Box::new(e) as Box<dyn std::error::Error + Send + Sync>
    })?;

    let response = Response {
        message: "Customer filter completed successfully".to_string(),
        matched: customers.len(),
        customers,
    };

    tracing::info!("Customer filter Lambda matched {} customers", response.matched);
    Ok(response)
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    run(service_fn(function_handler)).await
}
