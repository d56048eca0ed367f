use crate::core::filter::CustomerFilter;
use crate::core::geo::resolve;
use crate::domain::model::{CustomerRecord, GeoQuery, Province, ResolvedCustomer};
use crate::domain::ports::CustomerSource;
use crate::utils::error::Result;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

pub const UNKNOWN_CITY: &str = "(sin ciudad)";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GeoSummary {
    pub total: usize,
    pub matched: usize,
    pub by_province: BTreeMap<String, usize>,
    pub unresolved_province: usize,
    pub by_city: BTreeMap<String, usize>,
}

/// Values for the province and city drop-downs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    pub provinces: Vec<String>,
    pub cities_by_province: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub id: String,
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
    pub province: String,
    pub city: String,
}

/// Customer queries over a data source. Every call reads a fresh snapshot;
/// nothing is cached between calls.
pub struct CustomerDirectory<S: CustomerSource> {
    source: S,
}

impl<S: CustomerSource> CustomerDirectory<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    async fn load(&self) -> Result<Vec<CustomerRecord>> {
        tracing::debug!("Loading customers from {}", self.source.describe());
        let records = self.source.fetch_customers().await?;
        tracing::info!("Loaded {} customers", records.len());
        Ok(records)
    }

    pub async fn list(&self, query: &GeoQuery) -> Result<Vec<ResolvedCustomer>> {
        let records = self.load().await?;
        let filter = CustomerFilter::new(query.clone());
        let matched: Vec<ResolvedCustomer> = filter
            .retain(records)
            .into_iter()
            .map(|record| ResolvedCustomer {
                geography: resolve(&record),
                record,
            })
            .collect();

        tracing::info!(
            "Matched {} customers (province: {:?}, city: {:?})",
            matched.len(),
            query.province(),
            query.city()
        );
        Ok(matched)
    }

    pub async fn summary(&self, query: &GeoQuery) -> Result<GeoSummary> {
        let records = self.load().await?;
        let filter = CustomerFilter::new(query.clone());

        let mut summary = GeoSummary {
            total: records.len(),
            ..Default::default()
        };

        for record in records.iter().filter(|r| filter.matches(r)) {
            let geo = resolve(record);
            summary.matched += 1;

            match geo.canonical_province {
                Some(province) => *summary.by_province.entry(province.to_string()).or_default() += 1,
                None => summary.unresolved_province += 1,
            }

            let city = if geo.display_city.is_empty() {
                UNKNOWN_CITY.to_string()
            } else {
                geo.display_city
            };
            *summary.by_city.entry(city).or_default() += 1;
        }

        Ok(summary)
    }

    pub async fn filter_options(&self) -> Result<FilterOptions> {
        let records = self.load().await?;
        let mut cities: BTreeMap<Province, BTreeSet<String>> = BTreeMap::new();

        for record in &records {
            let geo = resolve(record);
            if let Some(province) = geo.canonical_province {
                let entry = cities.entry(province).or_default();
                if !geo.display_city.is_empty() {
                    entry.insert(geo.display_city);
                }
            }
        }

        // BTreeMap<Province, _> 依列舉順序排列
        let provinces = cities.keys().map(|p| p.to_string()).collect();
        let cities_by_province = cities
            .into_iter()
            .map(|(province, set)| (province.to_string(), set.into_iter().collect()))
            .collect();

        Ok(FilterOptions {
            provinces,
            cities_by_province,
        })
    }

    pub async fn map_markers(&self, query: &GeoQuery) -> Result<Vec<MapMarker>> {
        let customers = self.list(query).await?;
        let total = customers.len();

        let markers: Vec<MapMarker> = customers
            .into_iter()
            .filter_map(|customer| {
                let (latitude, longitude) = customer.record.coordinates()?;
                Some(MapMarker {
                    label: customer
                        .record
                        .name
                        .clone()
                        .unwrap_or_else(|| customer.record.id.clone()),
                    id: customer.record.id,
                    latitude,
                    longitude,
                    province: customer
                        .geography
                        .canonical_province
                        .map(|p| p.to_string())
                        .unwrap_or_default(),
                    city: customer.geography.display_city,
                })
            })
            .collect();

        if markers.len() < total {
            tracing::debug!(
                "Skipped {} customers without valid coordinates",
                total - markers.len()
            );
        }
        Ok(markers)
    }
}
