//! Section score dispatch. The registry decides which scorer a slug gets;
//! malformed input degrades to 0 so a broken score never blocks a save flow.

pub mod collections;
pub mod weighted;

use std::sync::Arc;

use serde_json::Map;
use tracing::debug;

use crate::config::ScoringConfig;

use super::domain::{SectionShape, SectionValue};
use super::sections::{SectionRegistry, SectionSpec};
use super::store::{FieldCatalog, StoreError};

pub use collections::{score_collection, CollectionBreakdown};
pub use weighted::{score_catalog_fields, score_fixed_fields, FieldWeightLists, WeightedBreakdown};

/// Scorer-specific detail behind a section score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreDetail {
    Weighted(WeightedBreakdown),
    Collection(CollectionBreakdown),
    /// Unrecognized slug, missing weight lists, or a value of the wrong
    /// shape.
    Unscored,
}

impl ScoreDetail {
    pub fn score(&self) -> u8 {
        match self {
            Self::Weighted(breakdown) => breakdown.score,
            Self::Collection(breakdown) => breakdown.total,
            Self::Unscored => 0,
        }
    }
}

/// Stateless dispatcher from (slug, raw value) to a 0-100 score.
pub struct ScoreRouter<C> {
    registry: Arc<SectionRegistry>,
    catalog: Arc<C>,
    config: ScoringConfig,
}

impl<C: FieldCatalog> ScoreRouter<C> {
    pub fn new(registry: Arc<SectionRegistry>, catalog: Arc<C>, config: ScoringConfig) -> Self {
        Self {
            registry,
            catalog,
            config,
        }
    }

    /// Score one section's resolved value. The only error path is a catalog
    /// read failure for a dynamic section; everything else degrades to 0.
    pub fn score_section(&self, slug: &str, value: &SectionValue) -> Result<u8, StoreError> {
        Ok(self.score_section_detailed(slug, value)?.score())
    }

    pub fn score_section_detailed(
        &self,
        slug: &str,
        value: &SectionValue,
    ) -> Result<ScoreDetail, StoreError> {
        let section = match self.registry.get(slug) {
            Some(section) => section,
            None => {
                debug!(slug, "scoring request for unrecognized section");
                return Ok(ScoreDetail::Unscored);
            }
        };

        match section.shape {
            SectionShape::FixedObject => Ok(self.score_fixed(section, slug, value)),
            SectionShape::DynamicObject => self.score_dynamic(slug, value),
            SectionShape::Collection(kind) => {
                // Callers may hand a bare object for an array-shaped section;
                // normalize it to a one-element collection.
                let items = match value {
                    SectionValue::Collection(items) => items.as_slice(),
                    SectionValue::Object(map) if map.is_empty() => &[],
                    SectionValue::Object(map) => std::slice::from_ref(map),
                };
                Ok(ScoreDetail::Collection(score_collection(
                    kind,
                    items,
                    section.list_keys,
                )))
            }
        }
    }

    fn score_fixed(&self, section: &SectionSpec, slug: &str, value: &SectionValue) -> ScoreDetail {
        let lists = match &section.fixed_fields {
            Some(lists) => lists,
            None => {
                debug!(slug, "fixed section has no configured field-weight lists");
                return ScoreDetail::Unscored;
            }
        };

        match object_value(slug, value) {
            Some(map) => ScoreDetail::Weighted(score_fixed_fields(map, lists, &self.config)),
            None => ScoreDetail::Unscored,
        }
    }

    fn score_dynamic(&self, slug: &str, value: &SectionValue) -> Result<ScoreDetail, StoreError> {
        let fields = self.catalog.fields(slug)?;

        match object_value(slug, value) {
            Some(map) => Ok(ScoreDetail::Weighted(score_catalog_fields(
                &fields,
                map,
                &self.config,
            ))),
            None => Ok(ScoreDetail::Unscored),
        }
    }
}

fn object_value<'a>(
    slug: &str,
    value: &'a SectionValue,
) -> Option<&'a Map<String, serde_json::Value>> {
    match value {
        SectionValue::Object(map) => Some(map),
        SectionValue::Collection(_) => {
            debug!(slug, "object-shaped section received a collection value");
            None
        }
    }
}
