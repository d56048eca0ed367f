use crate::core::geo::{canonicalize_province, resolve};
use crate::domain::model::{province_name, CustomerRecord, GeoQuery};

/// Province/city predicate over customer records.
///
/// Blank selectors put no constraint on their dimension, so the default query
/// keeps every record. The city selector is deliberately broad: it matches the
/// display city, the canonical province name or the raw `city` field, so
/// placeholder cities are found either way.
#[derive(Debug, Clone, Default)]
pub struct CustomerFilter {
    query: GeoQuery,
}

impl CustomerFilter {
    pub fn new(query: GeoQuery) -> Self {
        Self { query }
    }

    pub fn query(&self) -> &GeoQuery {
        &self.query
    }

    pub fn matches(&self, record: &CustomerRecord) -> bool {
        matches(record, self.query.province(), self.query.city())
    }

    /// Borrowing, order-preserving filter.
    pub fn apply<'a>(&self, records: &'a [CustomerRecord]) -> Vec<&'a CustomerRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }

    /// Consuming, order-preserving filter.
    pub fn retain(&self, mut records: Vec<CustomerRecord>) -> Vec<CustomerRecord> {
        records.retain(|r| self.matches(r));
        records
    }
}

pub fn matches(
    record: &CustomerRecord,
    selected_province: Option<&str>,
    selected_city: Option<&str>,
) -> bool {
    let geo = resolve(record);
    let canonical = province_name(geo.canonical_province);

    let province_match = match selected_province.map(str::trim).filter(|s| !s.is_empty()) {
        None => true,
        Some(selected) => canonicalize_province(canonical) == canonicalize_province(selected),
    };

    let city_match = match selected_city.map(str::trim).filter(|s| !s.is_empty()) {
        None => true,
        Some(selected) => {
            geo.display_city == selected || canonical == selected || record.raw_city() == selected
        }
    };

    province_match && city_match
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(city: Option<&str>, province: Option<&str>) -> CustomerRecord {
        CustomerRecord {
            city: city.map(String::from),
            province: province.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_province_mismatch_dominates() {
        let r = record(Some("Alcalá del Valle"), Some("Cádiz"));
        assert!(!matches(&r, Some("Huelva"), Some("Alcalá del Valle")));
        assert!(matches(&r, Some("cadiz"), Some("Alcalá del Valle")));
    }

    #[test]
    fn test_city_selector_matches_placeholder_through_province() {
        // 沒有 city，但 province 可辨識時，city 篩選也能對到省名
        let r = record(None, Some("ceuta"));
        assert!(matches(&r, None, Some("Ceuta")));
    }

    #[test]
    fn test_city_selector_matches_raw_city_when_display_city_is_empty() {
        let r = record(Some("Huelva"), Some("Cádiz"));
        assert!(matches(&r, None, Some("Huelva")));
        assert!(!matches(&r, Some("Huelva"), Some("Huelva")));
    }

    #[test]
    fn test_unrecognized_province_selector_matches_unresolved_records() {
        let unresolved = record(Some("Sevilla"), None);
        let resolved = record(Some("Jerez"), Some("Cádiz"));
        assert!(matches(&unresolved, Some("Sevilla"), None));
        assert!(!matches(&resolved, Some("Sevilla"), None));
    }

    #[test]
    fn test_blank_selectors_are_unconstrained() {
        let r = record(Some("Moguer"), Some("Huelva"));
        assert!(matches(&r, Some(""), Some("   ")));
        assert!(matches(&r, None, None));
    }

    #[test]
    fn test_apply_preserves_order() {
        let records = vec![
            record(Some("Moguer"), Some("Huelva")),
            record(Some("Jerez"), Some("Cádiz")),
            record(Some("Lepe"), Some("HUELVA")),
        ];
        let filter = CustomerFilter::new(GeoQuery::new("Huelva", ""));

        let cities: Vec<&str> = filter
            .apply(&records)
            .into_iter()
            .map(|r| r.raw_city())
            .collect();
        assert_eq!(cities, vec!["Moguer", "Lepe"]);

        let kept = filter.retain(records);
        assert_eq!(kept.len(), 2);
        assert_eq!(filter.retain(kept.clone()), kept);
    }
}
