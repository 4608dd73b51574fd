//! Storage seams for the two section-data generations.
//!
//! The dynamic generation keeps one admin-catalog document per (user, slug).
//! The legacy generation keeps one or more dedicated records per section;
//! slugs spread across several records reassemble through a composite
//! recipe. Both generations sit
//! behind the same [`SectionStore`] trait and are composed by
//! [`FallbackSectionStore`]: a populated dynamic record wins, otherwise the
//! legacy store is consulted.

use std::sync::Arc;

use serde_json::Value;

use super::domain::{EnrollmentId, EnrollmentProgressRecord, FieldSpec, LegacySummaryRecord, UserId};

/// Error enumeration for storage collaborators.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("stored value malformed: {0}")]
    Malformed(String),
}

/// Admin-configured field catalog for dynamic sections.
pub trait FieldCatalog: Send + Sync {
    fn fields(&self, slug: &str) -> Result<Vec<FieldSpec>, StoreError>;
}

/// Raw section-document read, shared by both storage generations. `None`
/// means the store holds nothing for this (user, slug); shape normalization
/// happens in the resolver.
pub trait SectionStore: Send + Sync {
    fn load(&self, user: &UserId, slug: &str) -> Result<Option<Value>, StoreError>;
}

/// Read access to the legacy per-section records.
pub trait LegacyBackend: Send + Sync {
    fn fetch(&self, user: &UserId, record: LegacyRecord) -> Result<Option<Value>, StoreError>;
}

/// Membership query joining a user's active enrollments against each
/// journey's section list.
pub trait EnrollmentDirectory: Send + Sync {
    fn active_enrollments_containing(
        &self,
        user: &UserId,
        slug: &str,
    ) -> Result<Vec<EnrollmentId>, StoreError>;
}

/// Write access to the flattened legacy score mirror.
pub trait SummaryRepository: Send + Sync {
    fn upsert(&self, record: LegacySummaryRecord) -> Result<(), StoreError>;
}

/// Write access to per-(enrollment, section) progress rows.
pub trait EnrollmentProgressRepository: Send + Sync {
    fn upsert(&self, record: EnrollmentProgressRecord) -> Result<(), StoreError>;
}

/// Every legacy per-section record the resolver knows how to read. Several
/// slugs are spread across more than one record and reassemble through a
/// composite recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegacyRecord {
    PersonalInfo,
    MedicalInfo,
    Physicians,
    LegalDocuments,
    Attorneys,
    FuneralPreferences,
    DigitalEstate,
    Devices,
    Subscriptions,
    WeddingDetails,
    Credentials,
    Contacts,
    EmergencyContacts,
    Pets,
    InsurancePolicies,
    BeneficiaryDesignations,
    FinancialAccounts,
    EmploymentHistory,
    Vendors,
    GuestList,
    GiftRegistry,
    Properties,
    FamilyMembers,
    FamilyHistory,
}

/// How a slug's legacy value is produced: a single record read, or a
/// composite assembled from several.
#[derive(Clone, Copy)]
enum LegacyRecipe {
    Single(LegacyRecord),
    Composite(fn(&dyn LegacyBackend, &UserId) -> Result<Option<Value>, StoreError>),
}

/// The per-slug recipe table is the single source of truth for composite
/// shapes.
const LEGACY_RECIPES: &[(&str, LegacyRecipe)] = &[
    ("personal", LegacyRecipe::Single(LegacyRecord::PersonalInfo)),
    ("medical", LegacyRecipe::Composite(assemble_medical)),
    ("legal", LegacyRecipe::Composite(assemble_legal)),
    (
        "funeral",
        LegacyRecipe::Single(LegacyRecord::FuneralPreferences),
    ),
    ("digital", LegacyRecipe::Composite(assemble_digital)),
    ("wedding", LegacyRecipe::Single(LegacyRecord::WeddingDetails)),
    (
        "credentials",
        LegacyRecipe::Single(LegacyRecord::Credentials),
    ),
    ("contacts", LegacyRecipe::Composite(assemble_contacts)),
    ("pets", LegacyRecipe::Single(LegacyRecord::Pets)),
    ("insurance", LegacyRecipe::Composite(assemble_insurance)),
    (
        "financial",
        LegacyRecipe::Single(LegacyRecord::FinancialAccounts),
    ),
    (
        "employment",
        LegacyRecipe::Single(LegacyRecord::EmploymentHistory),
    ),
    ("vendors", LegacyRecipe::Single(LegacyRecord::Vendors)),
    ("guest_list", LegacyRecipe::Single(LegacyRecord::GuestList)),
    ("registry", LegacyRecipe::Single(LegacyRecord::GiftRegistry)),
    ("property", LegacyRecipe::Single(LegacyRecord::Properties)),
    ("family", LegacyRecipe::Composite(assemble_family)),
];

/// Object composite: start from the base record and attach each auxiliary
/// list record under its key. Non-list auxiliaries are ignored.
fn merge_lists_into(
    backend: &dyn LegacyBackend,
    user: &UserId,
    base: LegacyRecord,
    lists: &[(&str, LegacyRecord)],
) -> Result<Option<Value>, StoreError> {
    let mut merged = match backend.fetch(user, base)? {
        Some(Value::Object(map)) => map,
        Some(_) | None => serde_json::Map::new(),
    };

    for (key, record) in lists {
        if let Some(list @ Value::Array(_)) = backend.fetch(user, *record)? {
            merged.insert((*key).to_string(), list);
        }
    }

    if merged.is_empty() {
        Ok(None)
    } else {
        Ok(Some(Value::Object(merged)))
    }
}

/// Collection composite: concatenate the list records in order.
fn concat_records(
    backend: &dyn LegacyBackend,
    user: &UserId,
    records: &[LegacyRecord],
) -> Result<Option<Value>, StoreError> {
    let mut items = Vec::new();
    for record in records {
        if let Some(Value::Array(entries)) = backend.fetch(user, *record)? {
            items.extend(entries);
        }
    }

    if items.is_empty() {
        Ok(None)
    } else {
        Ok(Some(Value::Array(items)))
    }
}

fn assemble_medical(
    backend: &dyn LegacyBackend,
    user: &UserId,
) -> Result<Option<Value>, StoreError> {
    merge_lists_into(
        backend,
        user,
        LegacyRecord::MedicalInfo,
        &[("physicians", LegacyRecord::Physicians)],
    )
}

fn assemble_legal(
    backend: &dyn LegacyBackend,
    user: &UserId,
) -> Result<Option<Value>, StoreError> {
    merge_lists_into(
        backend,
        user,
        LegacyRecord::LegalDocuments,
        &[("attorneys", LegacyRecord::Attorneys)],
    )
}

fn assemble_digital(
    backend: &dyn LegacyBackend,
    user: &UserId,
) -> Result<Option<Value>, StoreError> {
    merge_lists_into(
        backend,
        user,
        LegacyRecord::DigitalEstate,
        &[
            ("devices", LegacyRecord::Devices),
            ("subscriptions", LegacyRecord::Subscriptions),
        ],
    )
}

fn assemble_contacts(
    backend: &dyn LegacyBackend,
    user: &UserId,
) -> Result<Option<Value>, StoreError> {
    concat_records(
        backend,
        user,
        &[LegacyRecord::Contacts, LegacyRecord::EmergencyContacts],
    )
}

fn assemble_insurance(
    backend: &dyn LegacyBackend,
    user: &UserId,
) -> Result<Option<Value>, StoreError> {
    concat_records(
        backend,
        user,
        &[
            LegacyRecord::InsurancePolicies,
            LegacyRecord::BeneficiaryDesignations,
        ],
    )
}

fn assemble_family(
    backend: &dyn LegacyBackend,
    user: &UserId,
) -> Result<Option<Value>, StoreError> {
    concat_records(
        backend,
        user,
        &[LegacyRecord::FamilyMembers, LegacyRecord::FamilyHistory],
    )
}

/// Legacy generation adapter: maps a slug to its recipe and reads through the
/// backend. Slugs without a recipe resolve to nothing.
pub struct LegacySectionStore<B> {
    backend: Arc<B>,
}

impl<B: LegacyBackend> LegacySectionStore<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }
}

impl<B: LegacyBackend> SectionStore for LegacySectionStore<B> {
    fn load(&self, user: &UserId, slug: &str) -> Result<Option<Value>, StoreError> {
        let recipe = LEGACY_RECIPES
            .iter()
            .find(|(known, _)| *known == slug)
            .map(|(_, recipe)| *recipe);

        match recipe {
            Some(LegacyRecipe::Single(record)) => self.backend.fetch(user, record),
            Some(LegacyRecipe::Composite(assemble)) => assemble(self.backend.as_ref(), user),
            None => Ok(None),
        }
    }
}

/// Fallback decorator over the two generations. A populated dynamic record
/// takes precedence even when the legacy store also has data; an empty
/// dynamic document does not shadow legacy data.
pub struct FallbackSectionStore<D, L> {
    dynamic: D,
    legacy: L,
}

impl<D: SectionStore, L: SectionStore> FallbackSectionStore<D, L> {
    pub fn new(dynamic: D, legacy: L) -> Self {
        Self { dynamic, legacy }
    }
}

impl<D: SectionStore, L: SectionStore> SectionStore for FallbackSectionStore<D, L> {
    fn load(&self, user: &UserId, slug: &str) -> Result<Option<Value>, StoreError> {
        if let Some(value) = self.dynamic.load(user, slug)? {
            if value_is_populated(&value) {
                return Ok(Some(value));
            }
        }
        self.legacy.load(user, slug)
    }
}

fn value_is_populated(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => true,
    }
}

impl<S: SectionStore + ?Sized> SectionStore for Arc<S> {
    fn load(&self, user: &UserId, slug: &str) -> Result<Option<Value>, StoreError> {
        self.as_ref().load(user, slug)
    }
}
