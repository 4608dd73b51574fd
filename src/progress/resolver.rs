//! Resolution of a user's raw section data through the two-generation store,
//! with shape normalization and per-pass memoization.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use super::domain::{SectionShape, SectionValue, UserId};
use super::sections::SectionRegistry;
use super::store::{SectionStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("unknown section slug '{0}'")]
    UnknownSection(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Reads section documents through the fallback store and normalizes them to
/// the section's declared shape. Absent or malformed data normalizes to the
/// empty value; an unavailable store always surfaces as an error so callers
/// cannot mistake an outage for "no data".
pub struct SectionResolver<S> {
    store: Arc<S>,
    registry: Arc<SectionRegistry>,
}

impl<S: SectionStore> SectionResolver<S> {
    pub fn new(store: Arc<S>, registry: Arc<SectionRegistry>) -> Self {
        Self { store, registry }
    }

    pub fn registry(&self) -> &SectionRegistry {
        &self.registry
    }

    /// Resolve a single section.
    pub fn resolve_section(&self, user: &UserId, slug: &str) -> Result<SectionValue, ResolveError> {
        self.begin_pass(user).resolve(slug)
    }

    /// Resolve several sections in one pass; duplicate slugs hit the memo
    /// cache rather than the store.
    pub fn resolve_sections(
        &self,
        user: &UserId,
        slugs: &[&str],
    ) -> Result<BTreeMap<String, SectionValue>, ResolveError> {
        let mut pass = self.begin_pass(user);
        let mut resolved = BTreeMap::new();
        for slug in slugs {
            resolved.insert((*slug).to_string(), pass.resolve(slug)?);
        }
        Ok(resolved)
    }

    /// Start a memoized resolution pass for one user. The cache lives only as
    /// long as the pass; it is never shared across users or reused later.
    pub fn begin_pass<'a>(&'a self, user: &'a UserId) -> ResolutionPass<'a, S> {
        ResolutionPass {
            resolver: self,
            user,
            cache: HashMap::new(),
        }
    }

    fn load(&self, user: &UserId, slug: &str) -> Result<SectionValue, ResolveError> {
        let section = self
            .registry
            .get(slug)
            .ok_or_else(|| ResolveError::UnknownSection(slug.to_string()))?;

        let raw = match self.store.load(user, slug) {
            Ok(raw) => raw,
            Err(StoreError::Malformed(detail)) => {
                warn!(user = %user, slug, detail = %detail, "stored section value unreadable, treating as empty");
                None
            }
            Err(error @ StoreError::Unavailable(_)) => return Err(error.into()),
        };

        Ok(match raw {
            Some(value) => normalize(slug, value, section.shape),
            None => section.shape.empty_value(),
        })
    }
}

/// One user's memoized resolution pass.
pub struct ResolutionPass<'a, S> {
    resolver: &'a SectionResolver<S>,
    user: &'a UserId,
    cache: HashMap<String, SectionValue>,
}

impl<S: SectionStore> ResolutionPass<'_, S> {
    pub fn resolve(&mut self, slug: &str) -> Result<SectionValue, ResolveError> {
        if let Some(cached) = self.cache.get(slug) {
            return Ok(cached.clone());
        }

        let value = self.resolver.load(self.user, slug)?;
        self.cache.insert(slug.to_string(), value.clone());
        Ok(value)
    }
}

/// Coerce a raw stored document into the section's shape. Wrong-shaped data
/// degrades to the empty value; a bare object stored for a collection section
/// becomes a one-element collection.
fn normalize(slug: &str, value: Value, shape: SectionShape) -> SectionValue {
    match (shape, value) {
        (SectionShape::FixedObject | SectionShape::DynamicObject, Value::Object(map)) => {
            SectionValue::Object(map)
        }
        (SectionShape::Collection(_), Value::Array(items)) => {
            let maps: Vec<_> = items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Object(map) => Some(map),
                    other => {
                        debug!(slug, ?other, "dropping non-object collection entry");
                        None
                    }
                })
                .collect();
            SectionValue::Collection(maps)
        }
        (SectionShape::Collection(_), Value::Object(map)) => SectionValue::Collection(vec![map]),
        (shape, other) => {
            debug!(slug, ?other, "stored value does not match section shape");
            shape.empty_value()
        }
    }
}
