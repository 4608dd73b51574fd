//! The propagation orchestrator: on every section save, rescore the section
//! and fan the score out to the legacy summary mirror and every active
//! enrollment containing that section.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::config::ScoringConfig;

use super::domain::{
    EnrollmentId, EnrollmentProgressRecord, LegacySummaryRecord, ReadinessScore, SectionValue,
    UserId,
};
use super::readiness::compute_readiness;
use super::resolver::{ResolveError, SectionResolver};
use super::scoring::ScoreRouter;
use super::sections::SectionRegistry;
use super::store::{
    EnrollmentDirectory, EnrollmentProgressRepository, FieldCatalog, SectionStore, StoreError,
    SummaryRepository,
};

/// A write that failed during fan-out. Propagation is best-effort: failures
/// are reported, never rolled back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropagationTarget {
    LegacySummary,
    EnrollmentLookup,
    Enrollment(EnrollmentId),
}

#[derive(Debug, Clone)]
pub struct PropagationFailure {
    pub target: PropagationTarget,
    pub error: String,
}

/// Outcome of one section save, including any partial fan-out failures the
/// caller should surface without failing the user's save.
#[derive(Debug, Clone)]
pub struct SectionSaveReport {
    pub user_id: UserId,
    pub section_slug: String,
    pub score: u8,
    pub is_completed: bool,
    pub enrollments_updated: usize,
    pub failures: Vec<PropagationFailure>,
}

impl SectionSaveReport {
    pub fn fully_propagated(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Errors raised before any score write happened. Once a write has gone out,
/// subsequent failures travel in the report instead.
#[derive(Debug, thiserror::Error)]
pub enum PropagationError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Service composing the resolver, the score router, and the progress
/// repositories. The two §6 entry-point groups (resolve and score/propagate)
/// both live here.
pub struct ProgressService<S, C, Q, L, E> {
    resolver: SectionResolver<S>,
    router: ScoreRouter<C>,
    registry: Arc<SectionRegistry>,
    enrollments: Arc<Q>,
    summaries: Arc<L>,
    progress: Arc<E>,
    config: ScoringConfig,
}

impl<S, C, Q, L, E> ProgressService<S, C, Q, L, E>
where
    S: SectionStore,
    C: FieldCatalog,
    Q: EnrollmentDirectory,
    L: SummaryRepository,
    E: EnrollmentProgressRepository,
{
    pub fn new(
        store: Arc<S>,
        catalog: Arc<C>,
        enrollments: Arc<Q>,
        summaries: Arc<L>,
        progress: Arc<E>,
        config: ScoringConfig,
    ) -> Self {
        let registry = Arc::new(SectionRegistry::standard());
        Self {
            resolver: SectionResolver::new(store, registry.clone()),
            router: ScoreRouter::new(registry.clone(), catalog, config),
            registry,
            enrollments,
            summaries,
            progress,
            config,
        }
    }

    pub fn registry(&self) -> &SectionRegistry {
        &self.registry
    }

    /// Resolve one section's current value.
    pub fn resolve_section(&self, user: &UserId, slug: &str) -> Result<SectionValue, ResolveError> {
        self.resolver.resolve_section(user, slug)
    }

    /// Bulk resolve for page rendering and export; one memoized pass.
    pub fn resolve_sections(
        &self,
        user: &UserId,
        slugs: &[&str],
    ) -> Result<BTreeMap<String, SectionValue>, ResolveError> {
        self.resolver.resolve_sections(user, slugs)
    }

    /// Score an already-resolved value for a section.
    pub fn score_section(&self, slug: &str, value: &SectionValue) -> Result<u8, StoreError> {
        self.router.score_section(slug, value)
    }

    /// Aggregate an externally-assembled score map into overall readiness.
    pub fn compute_readiness(&self, scores: &BTreeMap<String, u8>) -> ReadinessScore {
        compute_readiness(scores, &self.registry)
    }

    /// Resolve and score every tracked section for a user, then aggregate.
    pub fn compute_readiness_for(&self, user: &UserId) -> Result<ReadinessScore, PropagationError> {
        let mut pass = self.resolver.begin_pass(user);
        let mut scores = BTreeMap::new();
        for slug in self.registry.slugs() {
            let value = pass.resolve(slug)?;
            let score = self.router.score_section(slug, &value)?;
            scores.insert(slug.to_string(), score);
        }
        Ok(compute_readiness(&scores, &self.registry))
    }

    /// Propagation entry point for form-submission handlers. Resolves the
    /// section's full data set (the save itself already landed in the store),
    /// scores it, then upserts the legacy summary and one progress row per
    /// active enrollment containing the section. Each upsert is idempotent,
    /// so re-running after a partial failure is safe.
    pub fn record_section_save(
        &self,
        user: &UserId,
        slug: &str,
    ) -> Result<SectionSaveReport, PropagationError> {
        let value = self.resolver.resolve_section(user, slug)?;
        let score = self.router.score_section(slug, &value)?;
        let is_completed = self.config.is_completed(score);
        let now = Utc::now();

        debug!(user = %user, slug, score, is_completed, "propagating section score");

        let mut failures = Vec::new();

        let summary = LegacySummaryRecord {
            user_id: user.clone(),
            section_slug: slug.to_string(),
            score,
            last_updated: now,
        };
        if let Err(error) = self.summaries.upsert(summary) {
            warn!(user = %user, slug, %error, "legacy summary upsert failed");
            failures.push(PropagationFailure {
                target: PropagationTarget::LegacySummary,
                error: error.to_string(),
            });
        }

        let enrollment_ids = match self.enrollments.active_enrollments_containing(user, slug) {
            Ok(ids) => ids,
            Err(error) => {
                warn!(user = %user, slug, %error, "enrollment membership lookup failed");
                failures.push(PropagationFailure {
                    target: PropagationTarget::EnrollmentLookup,
                    error: error.to_string(),
                });
                Vec::new()
            }
        };

        let mut updated = 0usize;
        for enrollment_id in enrollment_ids {
            let record = EnrollmentProgressRecord {
                enrollment_id: enrollment_id.clone(),
                section_slug: slug.to_string(),
                score,
                is_completed,
                last_updated: now,
            };
            match self.progress.upsert(record) {
                Ok(()) => updated += 1,
                Err(error) => {
                    warn!(
                        user = %user,
                        slug,
                        enrollment = %enrollment_id,
                        %error,
                        "enrollment progress upsert failed"
                    );
                    failures.push(PropagationFailure {
                        target: PropagationTarget::Enrollment(enrollment_id),
                        error: error.to_string(),
                    });
                }
            }
        }

        Ok(SectionSaveReport {
            user_id: user.clone(),
            section_slug: slug.to_string(),
            score,
            is_completed,
            enrollments_updated: updated,
            failures,
        })
    }
}
