//! The static table of tracked sections: shape, aggregation weight, and, for
//! fixed-schema sections, the hardcoded field-weight lists. Adding a section
//! is a data change here, not a code change in the scorers.

use super::domain::{CollectionKind, SectionShape};
use super::scoring::weighted::FieldWeightLists;

/// One tracked section of the planning vault.
#[derive(Debug, Clone, Copy)]
pub struct SectionSpec {
    pub slug: &'static str,
    pub shape: SectionShape,
    /// Positive weight in the overall readiness average.
    pub weight: u32,
    /// Present only for `FixedObject` sections; a fixed section without
    /// configured lists scores 0.
    pub fixed_fields: Option<FieldWeightLists>,
    /// Keys the generic-list completeness term requires on every item.
    pub list_keys: &'static [&'static str],
}

/// Registry over every tracked section, built once at startup.
#[derive(Debug)]
pub struct SectionRegistry {
    sections: Vec<SectionSpec>,
}

impl SectionRegistry {
    pub fn standard() -> Self {
        Self {
            sections: standard_sections(),
        }
    }

    pub fn get(&self, slug: &str) -> Option<&SectionSpec> {
        self.sections.iter().find(|section| section.slug == slug)
    }

    pub fn sections(&self) -> &[SectionSpec] {
        &self.sections
    }

    pub fn slugs(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.sections.iter().map(|section| section.slug)
    }

    pub fn total_weight(&self) -> u32 {
        self.sections.iter().map(|section| section.weight).sum()
    }
}

fn standard_sections() -> Vec<SectionSpec> {
    vec![
        SectionSpec {
            slug: "personal",
            shape: SectionShape::FixedObject,
            weight: 8,
            fixed_fields: Some(FieldWeightLists {
                critical: &["legal_name", "date_of_birth", "ssn_location"],
                important: &["address", "phone", "email"],
                optional: &["preferred_name", "notes"],
            }),
            list_keys: &[],
        },
        SectionSpec {
            slug: "medical",
            shape: SectionShape::FixedObject,
            weight: 7,
            fixed_fields: Some(FieldWeightLists {
                critical: &["primary_physician", "medications", "allergies"],
                important: &["conditions", "blood_type", "pharmacy"],
                optional: &["medical_notes"],
            }),
            list_keys: &[],
        },
        SectionSpec {
            slug: "legal",
            shape: SectionShape::FixedObject,
            weight: 8,
            fixed_fields: Some(FieldWeightLists {
                critical: &["will_location", "power_of_attorney", "healthcare_directive"],
                important: &["attorney_name", "attorney_phone"],
                optional: &["trust_details", "legal_notes"],
            }),
            list_keys: &[],
        },
        SectionSpec {
            slug: "funeral",
            shape: SectionShape::FixedObject,
            weight: 5,
            fixed_fields: Some(FieldWeightLists {
                critical: &["disposition_preference"],
                important: &["service_preferences", "funeral_home"],
                optional: &["music", "readings", "funeral_notes"],
            }),
            list_keys: &[],
        },
        SectionSpec {
            slug: "digital",
            shape: SectionShape::FixedObject,
            weight: 4,
            fixed_fields: Some(FieldWeightLists {
                critical: &["password_manager"],
                important: &["email_accounts", "social_media"],
                optional: &["device_inventory", "digital_notes"],
            }),
            list_keys: &[],
        },
        SectionSpec {
            slug: "wedding",
            shape: SectionShape::DynamicObject,
            weight: 5,
            fixed_fields: None,
            list_keys: &[],
        },
        SectionSpec {
            slug: "credentials",
            shape: SectionShape::Collection(CollectionKind::Credentials),
            weight: 5,
            fixed_fields: None,
            list_keys: &[],
        },
        SectionSpec {
            slug: "contacts",
            shape: SectionShape::Collection(CollectionKind::Contacts),
            weight: 6,
            fixed_fields: None,
            list_keys: &[],
        },
        SectionSpec {
            slug: "pets",
            shape: SectionShape::Collection(CollectionKind::Pets),
            weight: 3,
            fixed_fields: None,
            list_keys: &[],
        },
        SectionSpec {
            slug: "insurance",
            shape: SectionShape::Collection(CollectionKind::Insurance),
            weight: 6,
            fixed_fields: None,
            list_keys: &[],
        },
        SectionSpec {
            slug: "financial",
            shape: SectionShape::Collection(CollectionKind::Financial),
            weight: 7,
            fixed_fields: None,
            list_keys: &[],
        },
        SectionSpec {
            slug: "employment",
            shape: SectionShape::Collection(CollectionKind::Employment),
            weight: 4,
            fixed_fields: None,
            list_keys: &[],
        },
        SectionSpec {
            slug: "vendors",
            shape: SectionShape::Collection(CollectionKind::GenericList),
            weight: 2,
            fixed_fields: None,
            list_keys: &["name", "service", "phone"],
        },
        SectionSpec {
            slug: "guest_list",
            shape: SectionShape::Collection(CollectionKind::GenericList),
            weight: 2,
            fixed_fields: None,
            list_keys: &["name", "email"],
        },
        SectionSpec {
            slug: "registry",
            shape: SectionShape::Collection(CollectionKind::GenericList),
            weight: 2,
            fixed_fields: None,
            list_keys: &["retailer", "url"],
        },
        SectionSpec {
            slug: "property",
            shape: SectionShape::Collection(CollectionKind::GenericList),
            weight: 4,
            fixed_fields: None,
            list_keys: &["description", "location"],
        },
        SectionSpec {
            slug: "family",
            shape: SectionShape::Collection(CollectionKind::GenericList),
            weight: 5,
            fixed_fields: None,
            list_keys: &["name", "relationship"],
        },
    ]
}
