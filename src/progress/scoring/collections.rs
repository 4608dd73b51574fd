//! Heuristic scorers for variable-length sections. Every formula shares the
//! same three-term shape: a presence base, a diversity/coverage bonus, and a
//! completeness bonus, summed and clipped to 100. An empty array scores 0
//! across the board.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use crate::progress::completion::value_is_present;
use crate::progress::domain::CollectionKind;

/// The three bonus terms and their clipped sum, surfaced so UI layers can
/// explain where a collection score came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollectionBreakdown {
    pub base: u8,
    pub category: u8,
    pub completeness: u8,
    pub total: u8,
}

impl CollectionBreakdown {
    fn new(base: u32, category: u32, completeness: u32) -> Self {
        Self {
            base: base as u8,
            category: category as u8,
            completeness: completeness as u8,
            total: (base + category + completeness).min(100) as u8,
        }
    }
}

/// Dispatch a collection of records to its per-kind formula.
/// `important_keys` only drives the generic-list completeness term.
pub fn score_collection(
    kind: CollectionKind,
    items: &[Map<String, Value>],
    important_keys: &[&str],
) -> CollectionBreakdown {
    if items.is_empty() {
        return CollectionBreakdown::default();
    }

    match kind {
        CollectionKind::Credentials => score_credentials(items),
        CollectionKind::Contacts => score_contacts(items),
        CollectionKind::Pets => score_pets(items),
        CollectionKind::Insurance => score_insurance(items),
        CollectionKind::Financial => score_financial(items),
        CollectionKind::Employment => score_employment(items),
        CollectionKind::GenericList => score_list(items, important_keys),
    }
}

fn score_credentials(items: &[Map<String, Value>]) -> CollectionBreakdown {
    let categories = distinct_values(items, "category", &["other"]);
    let complete = count_complete(items, &["site_name", "username", "password", "category"]);

    CollectionBreakdown::new(
        30,
        (10 * categories as u32).min(30),
        (5 * complete as u32).min(30),
    )
}

fn score_contacts(items: &[Map<String, Value>]) -> CollectionBreakdown {
    let groups: BTreeSet<&str> = items
        .iter()
        .filter_map(|item| item.get("relationship").and_then(Value::as_str))
        .filter_map(relationship_group)
        .collect();
    let complete = count_complete(items, &["name", "relationship", "phone"]);

    CollectionBreakdown::new(
        30,
        (10 * groups.len() as u32).min(30),
        (8 * complete as u32).min(40),
    )
}

fn score_pets(items: &[Map<String, Value>]) -> CollectionBreakdown {
    let species = distinct_values(items, "species", &["other"]);
    let complete = count_complete(items, &["name", "species", "vet_name", "care_instructions"]);

    CollectionBreakdown::new(
        30,
        (10 * species as u32).min(30),
        (10 * complete as u32).min(40),
    )
}

fn score_insurance(items: &[Map<String, Value>]) -> CollectionBreakdown {
    let types = distinct_values(items, "policy_type", &["other"]);
    let complete = count_complete(
        items,
        &["provider", "policy_type", "policy_number", "beneficiary"],
    );

    CollectionBreakdown::new(
        30,
        (10 * types as u32).min(30),
        (10 * complete as u32).min(40),
    )
}

fn score_financial(items: &[Map<String, Value>]) -> CollectionBreakdown {
    let types = distinct_values(items, "account_type", &["other"]);
    let complete = count_complete(items, &["institution", "account_type", "account_number"]);

    CollectionBreakdown::new(
        30,
        (10 * types as u32).min(30),
        (8 * complete as u32).min(40),
    )
}

fn score_employment(items: &[Map<String, Value>]) -> CollectionBreakdown {
    let has_current = items
        .iter()
        .any(|item| matches!(item.get("is_current"), Some(Value::Bool(true))));
    let complete = count_complete(items, &["employer", "title", "start_date"]);

    CollectionBreakdown::new(
        30,
        if has_current { 20 } else { 0 },
        (10 * complete as u32).min(50),
    )
}

/// Fallback for list sections without a dedicated formula (vendors, guest
/// list, registry, property, family).
fn score_list(items: &[Map<String, Value>], important_keys: &[&str]) -> CollectionBreakdown {
    let complete = count_complete(items, important_keys);

    CollectionBreakdown::new(
        30,
        (10 * items.len() as u32).min(30),
        (10 * complete as u32).min(40),
    )
}

/// Count records whose listed keys are all filled.
fn count_complete(items: &[Map<String, Value>], keys: &[&str]) -> usize {
    items
        .iter()
        .filter(|item| keys.iter().all(|key| value_is_present(item.get(*key))))
        .count()
}

/// Distinct non-blank values of `key` across the records, case-folded, with
/// the listed catch-all values excluded from the diversity count.
fn distinct_values(items: &[Map<String, Value>], key: &str, excluded: &[&str]) -> usize {
    items
        .iter()
        .filter_map(|item| item.get(key).and_then(Value::as_str))
        .map(|raw| raw.trim().to_ascii_lowercase())
        .filter(|value| !value.is_empty() && !excluded.contains(&value.as_str()))
        .collect::<BTreeSet<_>>()
        .len()
}

/// Bucket a free-text relationship into the coverage groups the contacts
/// formula rewards.
fn relationship_group(raw: &str) -> Option<&'static str> {
    let value = raw.trim().to_ascii_lowercase();

    const FAMILY: &[&str] = &[
        "spouse", "partner", "wife", "husband", "child", "son", "daughter", "parent", "mother",
        "father", "sibling", "brother", "sister", "family",
    ];
    const LEGAL: &[&str] = &["attorney", "lawyer", "executor", "legal"];
    const MEDICAL: &[&str] = &["doctor", "physician", "dentist", "caregiver", "medical"];
    const FINANCIAL: &[&str] = &["accountant", "advisor", "banker", "financial"];
    const EMERGENCY: &[&str] = &["emergency", "neighbor", "friend"];

    let matches = |keywords: &[&str]| keywords.iter().any(|keyword| value.contains(keyword));

    if matches(FAMILY) {
        Some("family")
    } else if matches(LEGAL) {
        Some("legal")
    } else if matches(MEDICAL) {
        Some("medical")
    } else if matches(FINANCIAL) {
        Some("financial")
    } else if matches(EMERGENCY) {
        Some("emergency")
    } else {
        None
    }
}
