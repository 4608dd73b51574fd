//! Overall readiness aggregation and the display bands derived from a score.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::ReadinessScore;
use super::sections::SectionRegistry;

/// Weighted mean of per-section scores over every tracked section. Sections
/// missing from the map score 0. The returned map carries an entry for every
/// registry slug so progress indicators render a complete picture.
///
/// An empty registry has no defined weighting; it yields a total of 0 as the
/// explicit special case rather than dividing by zero.
pub fn compute_readiness(
    scores: &BTreeMap<String, u8>,
    registry: &SectionRegistry,
) -> ReadinessScore {
    let total_weight = registry.total_weight();

    let mut sections = BTreeMap::new();
    let mut weighted_sum: u64 = 0;
    for section in registry.sections() {
        let score = scores.get(section.slug).copied().unwrap_or(0);
        weighted_sum += u64::from(score) * u64::from(section.weight);
        sections.insert(section.slug.to_string(), score);
    }

    let total_score = if total_weight == 0 {
        0
    } else {
        (weighted_sum as f64 / f64::from(total_weight)).round() as u8
    };

    ReadinessScore {
        total_score,
        sections,
    }
}

/// Traffic-light band for a 0-100 completion score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionColor {
    Green,
    Yellow,
    Orange,
    Red,
}

impl CompletionColor {
    pub fn from_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => Self::Green,
            50..=79 => Self::Yellow,
            25..=49 => Self::Orange,
            _ => Self::Red,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Orange => "orange",
            Self::Red => "red",
        }
    }
}
