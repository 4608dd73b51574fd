use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::{json, Map, Value};

use crate::config::ScoringConfig;
use crate::progress::domain::{
    EnrollmentId, EnrollmentProgressRecord, FieldSpec, FieldType, Importance, LegacySummaryRecord,
    UserId,
};
use crate::progress::propagation::ProgressService;
use crate::progress::store::{
    EnrollmentDirectory, EnrollmentProgressRepository, FallbackSectionStore, FieldCatalog,
    LegacyBackend, LegacyRecord, LegacySectionStore, SectionStore, StoreError, SummaryRepository,
};

pub(super) fn user() -> UserId {
    UserId("user-100".to_string())
}

pub(super) fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("fixture expected an object, got {other:?}"),
    }
}

pub(super) fn items(value: Value) -> Vec<Map<String, Value>> {
    match value {
        Value::Array(entries) => entries.into_iter().map(object).collect(),
        other => panic!("fixture expected an array, got {other:?}"),
    }
}

pub(super) fn credential(category: &str) -> Value {
    json!({
        "site_name": "example.com",
        "username": "pat",
        "password": "hunter2",
        "category": category,
    })
}

pub(super) fn credentials_fixture() -> Value {
    json!([credential("email"), credential("banking"), credential("utilities")])
}

pub(super) fn field(name: &str, field_type: FieldType, importance: Importance) -> FieldSpec {
    FieldSpec {
        name: name.to_string(),
        label: name.replace('_', " "),
        field_type,
        importance,
        required: importance == Importance::Critical,
    }
}

pub(super) fn wedding_fields() -> Vec<FieldSpec> {
    vec![
        field("venue", FieldType::Text, Importance::Critical),
        field("ceremony_date", FieldType::Date, Importance::Critical),
        field("guest_count", FieldType::Number, Importance::Important),
        field("theme", FieldType::Text, Importance::Optional),
    ]
}

#[derive(Default)]
pub(super) struct MemoryDynamicStore {
    records: Mutex<HashMap<(UserId, String), Value>>,
}

impl MemoryDynamicStore {
    pub(super) fn insert(&self, user: &UserId, slug: &str, value: Value) {
        self.records
            .lock()
            .expect("dynamic store mutex poisoned")
            .insert((user.clone(), slug.to_string()), value);
    }
}

impl SectionStore for MemoryDynamicStore {
    fn load(&self, user: &UserId, slug: &str) -> Result<Option<Value>, StoreError> {
        let guard = self.records.lock().expect("dynamic store mutex poisoned");
        Ok(guard.get(&(user.clone(), slug.to_string())).cloned())
    }
}

#[derive(Default)]
pub(super) struct MemoryLegacyBackend {
    records: Mutex<HashMap<(UserId, LegacyRecord), Value>>,
    fetch_count: Mutex<usize>,
}

impl MemoryLegacyBackend {
    pub(super) fn insert(&self, user: &UserId, record: LegacyRecord, value: Value) {
        self.records
            .lock()
            .expect("legacy backend mutex poisoned")
            .insert((user.clone(), record), value);
    }

    pub(super) fn fetches(&self) -> usize {
        *self.fetch_count.lock().expect("fetch counter poisoned")
    }
}

impl LegacyBackend for MemoryLegacyBackend {
    fn fetch(&self, user: &UserId, record: LegacyRecord) -> Result<Option<Value>, StoreError> {
        *self.fetch_count.lock().expect("fetch counter poisoned") += 1;
        let guard = self.records.lock().expect("legacy backend mutex poisoned");
        Ok(guard.get(&(user.clone(), record)).cloned())
    }
}

pub(super) struct UnavailableStore;

impl SectionStore for UnavailableStore {
    fn load(&self, _user: &UserId, _slug: &str) -> Result<Option<Value>, StoreError> {
        Err(StoreError::Unavailable("section store offline".to_string()))
    }
}

pub(super) struct MalformedStore;

impl SectionStore for MalformedStore {
    fn load(&self, _user: &UserId, _slug: &str) -> Result<Option<Value>, StoreError> {
        Err(StoreError::Malformed("unparseable document".to_string()))
    }
}

#[derive(Default)]
pub(super) struct MemoryCatalog {
    fields: Mutex<HashMap<String, Vec<FieldSpec>>>,
}

impl MemoryCatalog {
    pub(super) fn insert(&self, slug: &str, fields: Vec<FieldSpec>) {
        self.fields
            .lock()
            .expect("catalog mutex poisoned")
            .insert(slug.to_string(), fields);
    }
}

impl FieldCatalog for MemoryCatalog {
    fn fields(&self, slug: &str) -> Result<Vec<FieldSpec>, StoreError> {
        let guard = self.fields.lock().expect("catalog mutex poisoned");
        Ok(guard.get(slug).cloned().unwrap_or_default())
    }
}

pub(super) struct UnavailableCatalog;

impl FieldCatalog for UnavailableCatalog {
    fn fields(&self, _slug: &str) -> Result<Vec<FieldSpec>, StoreError> {
        Err(StoreError::Unavailable("catalog offline".to_string()))
    }
}

#[derive(Default)]
pub(super) struct MemoryEnrollments {
    memberships: Mutex<HashMap<(UserId, String), Vec<EnrollmentId>>>,
}

impl MemoryEnrollments {
    pub(super) fn insert(&self, user: &UserId, slug: &str, enrollments: &[&str]) {
        self.memberships
            .lock()
            .expect("enrollment mutex poisoned")
            .insert(
                (user.clone(), slug.to_string()),
                enrollments
                    .iter()
                    .map(|id| EnrollmentId((*id).to_string()))
                    .collect(),
            );
    }
}

impl EnrollmentDirectory for MemoryEnrollments {
    fn active_enrollments_containing(
        &self,
        user: &UserId,
        slug: &str,
    ) -> Result<Vec<EnrollmentId>, StoreError> {
        let guard = self.memberships.lock().expect("enrollment mutex poisoned");
        Ok(guard
            .get(&(user.clone(), slug.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}

pub(super) struct FailingEnrollments;

impl EnrollmentDirectory for FailingEnrollments {
    fn active_enrollments_containing(
        &self,
        _user: &UserId,
        _slug: &str,
    ) -> Result<Vec<EnrollmentId>, StoreError> {
        Err(StoreError::Unavailable("directory offline".to_string()))
    }
}

#[derive(Default)]
pub(super) struct MemorySummaries {
    records: Mutex<Vec<LegacySummaryRecord>>,
}

impl MemorySummaries {
    pub(super) fn records(&self) -> Vec<LegacySummaryRecord> {
        self.records.lock().expect("summary mutex poisoned").clone()
    }

    pub(super) fn latest_for(&self, user: &UserId, slug: &str) -> Option<LegacySummaryRecord> {
        self.records()
            .into_iter()
            .rev()
            .find(|record| record.user_id == *user && record.section_slug == slug)
    }
}

impl SummaryRepository for MemorySummaries {
    fn upsert(&self, record: LegacySummaryRecord) -> Result<(), StoreError> {
        self.records
            .lock()
            .expect("summary mutex poisoned")
            .push(record);
        Ok(())
    }
}

pub(super) struct FailingSummaries;

impl SummaryRepository for FailingSummaries {
    fn upsert(&self, _record: LegacySummaryRecord) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("summary table offline".to_string()))
    }
}

#[derive(Default)]
pub(super) struct MemoryProgress {
    rows: Mutex<HashMap<(EnrollmentId, String), EnrollmentProgressRecord>>,
}

impl MemoryProgress {
    pub(super) fn rows(&self) -> Vec<EnrollmentProgressRecord> {
        self.rows
            .lock()
            .expect("progress mutex poisoned")
            .values()
            .cloned()
            .collect()
    }

    pub(super) fn row_for(
        &self,
        enrollment: &str,
        slug: &str,
    ) -> Option<EnrollmentProgressRecord> {
        self.rows
            .lock()
            .expect("progress mutex poisoned")
            .get(&(EnrollmentId(enrollment.to_string()), slug.to_string()))
            .cloned()
    }
}

impl EnrollmentProgressRepository for MemoryProgress {
    fn upsert(&self, record: EnrollmentProgressRecord) -> Result<(), StoreError> {
        self.rows.lock().expect("progress mutex poisoned").insert(
            (record.enrollment_id.clone(), record.section_slug.clone()),
            record,
        );
        Ok(())
    }
}

pub(super) struct FailingProgress;

impl EnrollmentProgressRepository for FailingProgress {
    fn upsert(&self, _record: EnrollmentProgressRecord) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("progress table offline".to_string()))
    }
}

pub(super) type TestStore =
    FallbackSectionStore<Arc<MemoryDynamicStore>, LegacySectionStore<MemoryLegacyBackend>>;

pub(super) fn test_store(
    dynamic: Arc<MemoryDynamicStore>,
    legacy: Arc<MemoryLegacyBackend>,
) -> Arc<TestStore> {
    Arc::new(FallbackSectionStore::new(
        dynamic,
        LegacySectionStore::new(legacy),
    ))
}

pub(super) struct TestHarness {
    pub(super) service: ProgressService<
        TestStore,
        MemoryCatalog,
        MemoryEnrollments,
        MemorySummaries,
        MemoryProgress,
    >,
    pub(super) dynamic: Arc<MemoryDynamicStore>,
    pub(super) legacy: Arc<MemoryLegacyBackend>,
    pub(super) enrollments: Arc<MemoryEnrollments>,
    pub(super) summaries: Arc<MemorySummaries>,
    pub(super) progress: Arc<MemoryProgress>,
}

pub(super) fn harness() -> TestHarness {
    let dynamic = Arc::new(MemoryDynamicStore::default());
    let legacy = Arc::new(MemoryLegacyBackend::default());
    let catalog = Arc::new(MemoryCatalog::default());
    catalog.insert("wedding", wedding_fields());
    let enrollments = Arc::new(MemoryEnrollments::default());
    let summaries = Arc::new(MemorySummaries::default());
    let progress = Arc::new(MemoryProgress::default());

    let service = ProgressService::new(
        test_store(dynamic.clone(), legacy.clone()),
        catalog,
        enrollments.clone(),
        summaries.clone(),
        progress.clone(),
        ScoringConfig::default(),
    );

    TestHarness {
        service,
        dynamic,
        legacy,
        enrollments,
        summaries,
        progress,
    }
}
