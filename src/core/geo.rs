//! Canonical province and display city for customer records.
//!
//! Records are entered by hand, so `province` may be empty or misspelled,
//! `city` sometimes holds a province name as a placeholder, and the province
//! occasionally only survives as a `Provincia: ...` line in the notes. None of
//! this is treated as an error: unresolved values come back as `None` or `""`.

use crate::domain::model::{CustomerRecord, Province, ResolvedGeography};
use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

static NOTES_PROVINCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)provincia:[ \t]*([^\r\n]*)").expect("notes province pattern is valid")
});

/// Trim, lower-case and strip diacritics.
pub fn normalize_key(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

// Combining Diacritical Marks block; enough for Spanish place names.
fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
}

pub fn canonicalize_province(raw: &str) -> Option<Province> {
    match normalize_key(raw).as_str() {
        "huelva" => Some(Province::Huelva),
        "cadiz" => Some(Province::Cadiz),
        "ceuta" => Some(Province::Ceuta),
        _ => None,
    }
}

/// Province value embedded in notes, e.g. `"Provincia: Huelva"`. The first
/// marker carrying a non-empty value wins.
pub fn province_from_notes(notes: &str) -> Option<&str> {
    NOTES_PROVINCE
        .captures_iter(notes)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .find(|value| !value.is_empty())
}

/// Exact (trimmed, case-sensitive) match of a province display name.
fn placeholder_province(city: &str) -> Option<Province> {
    Province::ALL.into_iter().find(|p| p.as_str() == city)
}

/// Resolution tiers, first applicable one wins:
///
/// 1. `province` field when populated, even if it does not canonicalize.
/// 2. `Provincia:` line in the notes, canonicalized.
/// 3. `city` holding a province name as placeholder.
pub fn resolve_province(record: &CustomerRecord) -> Option<Province> {
    let province = record.province.as_deref().map(str::trim).unwrap_or("");
    if !province.is_empty() {
        // 有填寫但無法辨識時仍以此欄位為準，不往下 fallback
        return canonicalize_province(province);
    }

    if let Some(value) = record.notes.as_deref().and_then(province_from_notes) {
        return canonicalize_province(value);
    }

    placeholder_province(record.raw_city())
}

pub fn resolve_display_city(record: &CustomerRecord) -> String {
    resolve_display_city_with(record, resolve_province(record))
}

fn resolve_display_city_with(record: &CustomerRecord, province: Option<Province>) -> String {
    let city = record.raw_city();
    if city.is_empty() {
        return String::new();
    }

    match placeholder_province(city) {
        None => city.to_string(),
        Some(placeholder) if Some(placeholder) == province => city.to_string(),
        Some(_) => String::new(),
    }
}

pub fn resolve(record: &CustomerRecord) -> ResolvedGeography {
    let canonical_province = resolve_province(record);
    ResolvedGeography {
        display_city: resolve_display_city_with(record, canonical_province),
        canonical_province,
    }
}
