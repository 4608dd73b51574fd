use serde_json::{Map, Value};

use crate::config::ScoringConfig;
use crate::progress::completion::{field_is_complete, value_is_present};
use crate::progress::domain::{FieldSpec, Importance};

/// Score plus the field counts surfaced for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WeightedBreakdown {
    pub score: u8,
    pub completed_fields: usize,
    pub total_fields: usize,
}

/// Hardcoded field-name lists for a section whose schema predates the
/// catalog. Importance is positional: one list per weight class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldWeightLists {
    pub critical: &'static [&'static str],
    pub important: &'static [&'static str],
    pub optional: &'static [&'static str],
}

/// Weighted presence score over catalog-declared fields. An empty catalog
/// (or one whose points sum to zero) scores 0.
pub fn score_catalog_fields(
    fields: &[FieldSpec],
    values: &Map<String, Value>,
    config: &ScoringConfig,
) -> WeightedBreakdown {
    let total_possible: u32 = fields
        .iter()
        .map(|field| config.points(field.importance))
        .sum();

    if total_possible == 0 {
        return WeightedBreakdown {
            total_fields: fields.len(),
            ..WeightedBreakdown::default()
        };
    }

    let mut earned = 0u32;
    let mut completed = 0usize;
    for field in fields {
        if field_is_complete(field.field_type, values.get(&field.name)) {
            earned += config.points(field.importance);
            completed += 1;
        }
    }

    WeightedBreakdown {
        score: round_ratio(earned, total_possible),
        completed_fields: completed,
        total_fields: fields.len(),
    }
}

/// Weighted presence score for a fixed-schema section. No field-type metadata
/// exists here, so presence is the type-agnostic string-or-number test.
pub fn score_fixed_fields(
    values: &Map<String, Value>,
    lists: &FieldWeightLists,
    config: &ScoringConfig,
) -> WeightedBreakdown {
    let tiers = [
        (Importance::Critical, lists.critical),
        (Importance::Important, lists.important),
        (Importance::Optional, lists.optional),
    ];

    let total_possible: u32 = tiers
        .iter()
        .map(|(importance, names)| config.points(*importance) * names.len() as u32)
        .sum();
    let total_fields = tiers.iter().map(|(_, names)| names.len()).sum();

    if total_possible == 0 {
        return WeightedBreakdown {
            total_fields,
            ..WeightedBreakdown::default()
        };
    }

    let mut earned = 0u32;
    let mut completed = 0usize;
    for (importance, names) in tiers {
        for name in names {
            if value_is_present(values.get(*name)) {
                earned += config.points(importance);
                completed += 1;
            }
        }
    }

    WeightedBreakdown {
        score: round_ratio(earned, total_possible),
        completed_fields: completed,
        total_fields,
    }
}

fn round_ratio(earned: u32, possible: u32) -> u8 {
    ((100.0 * f64::from(earned)) / f64::from(possible)).round() as u8
}
