use crm_geo::core::filter::matches;
use crm_geo::core::geo::{canonicalize_province, resolve_display_city, resolve_province};
use crm_geo::{CustomerFilter, CustomerRecord, GeoQuery, Province};

fn customer(city: Option<&str>, province: Option<&str>, notes: Option<&str>) -> CustomerRecord {
    CustomerRecord {
        city: city.map(String::from),
        province: province.map(String::from),
        notes: notes.map(String::from),
        ..Default::default()
    }
}

fn sample_customers() -> Vec<CustomerRecord> {
    vec![
        customer(Some("Alcalá del Valle"), Some("Cádiz"), None),
        customer(Some("Huelva"), None, None),
        customer(Some("Huelva"), Some("Cádiz"), None),
        customer(None, None, Some("Visita pendiente\nProvincia: ceuta")),
        customer(Some("Sevilla"), Some("Sevilla"), None),
        customer(Some("  "), None, None),
        customer(None, None, None),
    ]
}

#[test]
fn test_accent_and_case_variants_share_canonical_value() {
    for raw in ["Cádiz", "CADIZ", "cádiz ", "CÁDIZ", "Cadiz"] {
        assert_eq!(canonicalize_province(raw), Some(Province::Cadiz));
    }
}

#[test]
fn test_unknown_values_are_unresolved() {
    assert_eq!(canonicalize_province(""), None);
    assert_eq!(canonicalize_province("Sevilla"), None);
}

#[test]
fn test_placeholder_city_without_province() {
    let record = customer(Some("Huelva"), None, None);
    assert_eq!(resolve_province(&record), Some(Province::Huelva));
    assert_eq!(resolve_display_city(&record), "Huelva");
}

#[test]
fn test_province_field_overrides_placeholder_city() {
    let record = customer(Some("Huelva"), Some("Cádiz"), None);
    assert_eq!(resolve_province(&record), Some(Province::Cadiz));
    assert_eq!(resolve_display_city(&record), "");
}

#[test]
fn test_province_mismatch_excludes_record() {
    let record = customer(Some("Alcalá del Valle"), Some("Cádiz"), None);
    assert!(!matches(&record, Some("Huelva"), Some("Alcalá del Valle")));
}

#[test]
fn test_empty_selectors_match_everything() {
    for record in sample_customers() {
        assert!(matches(&record, Some(""), Some("")));
        assert!(matches(&record, None, None));
    }
}

#[test]
fn test_filtering_is_idempotent() {
    let queries = [
        GeoQuery::new("Cádiz", ""),
        GeoQuery::new("", "Huelva"),
        GeoQuery::new("ceuta", "Ceuta"),
        GeoQuery::new("Sevilla", ""),
        GeoQuery::default(),
    ];

    for query in queries {
        let filter = CustomerFilter::new(query);
        let once = filter.retain(sample_customers());
        let twice = filter.retain(once.clone());
        assert_eq!(once, twice, "query: {:?}", filter.query());
    }
}

#[test]
fn test_city_selector_also_matches_province_placeholders() {
    let filter = CustomerFilter::new(GeoQuery::new("", "Huelva"));
    let customers = sample_customers();
    let matched = filter.apply(&customers);

    // 一致的 placeholder 與和 province 衝突的 placeholder 都會命中
    assert_eq!(matched.len(), 2);
    assert!(matched.iter().all(|r| r.raw_city() == "Huelva"));
}
