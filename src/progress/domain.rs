use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier wrapper for vault owners.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for a user's enrollment in a curated journey.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnrollmentId(pub String);

impl fmt::Display for EnrollmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Declared input type for a catalog field. Catalog rows authored with a type
/// this build does not know about deserialize to `Unknown` and are judged with
/// the plain text rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Textarea,
    Email,
    Phone,
    Url,
    Date,
    Datetime,
    Select,
    Radio,
    Checkbox,
    Multiselect,
    Number,
    Currency,
    Rating,
    File,
    #[serde(other)]
    Unknown,
}

/// Weight class driving a field's point value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Importance {
    Critical,
    Important,
    Optional,
}

/// One row of the admin-configured field catalog for a dynamic section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    pub field_type: FieldType,
    pub importance: Importance,
    pub required: bool,
}

/// A user's raw data for one section, normalized to the section's shape.
///
/// Object-shaped sections hold a single field-name -> value map; collection
/// sections hold a sequence of such maps. Absent data is the empty variant,
/// never null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectionValue {
    Collection(Vec<Map<String, Value>>),
    Object(Map<String, Value>),
}

impl SectionValue {
    pub fn empty_object() -> Self {
        Self::Object(Map::new())
    }

    pub fn empty_collection() -> Self {
        Self::Collection(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Object(map) => map.is_empty(),
            Self::Collection(items) => items.is_empty(),
        }
    }
}

/// Which scorer a section dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionShape {
    /// Single record scored against hardcoded field-weight lists.
    FixedObject,
    /// Single record scored against the admin-configured catalog.
    DynamicObject,
    /// Array of records scored by a per-kind heuristic.
    Collection(CollectionKind),
}

impl SectionShape {
    pub fn empty_value(&self) -> SectionValue {
        match self {
            Self::FixedObject | Self::DynamicObject => SectionValue::empty_object(),
            Self::Collection(_) => SectionValue::empty_collection(),
        }
    }
}

/// Heuristic family member for collection-shaped sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    Credentials,
    Contacts,
    Pets,
    Insurance,
    Financial,
    Employment,
    GenericList,
}

/// Per-(enrollment, section) progress row, upserted on every section save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentProgressRecord {
    pub enrollment_id: EnrollmentId,
    pub section_slug: String,
    pub score: u8,
    pub is_completed: bool,
    pub last_updated: DateTime<Utc>,
}

/// Enrollment-independent score mirror kept for backward-compatible readers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacySummaryRecord {
    pub user_id: UserId,
    pub section_slug: String,
    pub score: u8,
    pub last_updated: DateTime<Utc>,
}

/// Weighted overall readiness across every tracked section. Computed on
/// demand, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessScore {
    pub total_score: u8,
    pub sections: BTreeMap<String, u8>,
}
