//! Progress scoring pipeline for the planning vault.
//!
//! Flow: a save handler calls [`ProgressService::record_section_save`], which
//! resolves the section's raw data through the two-generation store, scores
//! it via the section registry's dispatch table, and fans the score out to
//! the legacy summary mirror and every active enrollment. The full-readiness
//! view resolves every tracked section in one memoized pass and aggregates
//! with [`compute_readiness`].

pub mod completion;
pub mod domain;
pub mod propagation;
pub mod readiness;
pub mod resolver;
pub mod scoring;
pub mod sections;
pub mod store;

#[cfg(test)]
mod tests;

pub use completion::{field_is_complete, value_is_present};
pub use domain::{
    CollectionKind, EnrollmentId, EnrollmentProgressRecord, FieldSpec, FieldType, Importance,
    LegacySummaryRecord, ReadinessScore, SectionShape, SectionValue, UserId,
};
pub use propagation::{
    PropagationError, PropagationFailure, PropagationTarget, ProgressService, SectionSaveReport,
};
pub use readiness::{compute_readiness, CompletionColor};
pub use resolver::{ResolutionPass, ResolveError, SectionResolver};
pub use scoring::{
    score_catalog_fields, score_collection, score_fixed_fields, CollectionBreakdown, ScoreDetail,
    ScoreRouter, WeightedBreakdown,
};
pub use sections::{SectionRegistry, SectionSpec};
pub use store::{
    EnrollmentDirectory, EnrollmentProgressRepository, FallbackSectionStore, FieldCatalog,
    LegacyBackend, LegacyRecord, LegacySectionStore, SectionStore, StoreError, SummaryRepository,
};
