use std::marker::PhantomData;
use std::sync::{Arc, OnceLock};

use authz_predicates_sdk::OwnershipResolver;
use modkit_security::{Principal, RoleSet};

use super::coverage::Coverage;
use super::descriptor::PredicateDescriptor;
use super::resolution::{BatchMode, decide_batch, locate};
use super::target::ScopeTarget;
use crate::error::PredicateError;

/// Targets split by whether the principal may access them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition<T> {
    pub with_access: Vec<T>,
    pub without_access: Vec<T>,
}

impl<T> Default for Partition<T> {
    fn default() -> Self {
        Self {
            with_access: Vec::new(),
            without_access: Vec::new(),
        }
    }
}

/// Filters a list down to the entities a principal may access, e.g. for
/// search results. Same matching rules and resolver bounds as
/// [`CollectionPredicate`](super::collection::CollectionPredicate), but each
/// element is decided on its own.
pub struct AccessFilter<T> {
    descriptor: PredicateDescriptor,
    resolver: OnceLock<Arc<dyn OwnershipResolver>>,
    _target: PhantomData<fn(&T)>,
}

impl<T: ScopeTarget> AccessFilter<T> {
    #[must_use]
    pub fn new(descriptor: PredicateDescriptor) -> Self {
        Self {
            descriptor,
            resolver: OnceLock::new(),
            _target: PhantomData,
        }
    }

    /// Bind the ownership resolver. Must be called exactly once.
    ///
    /// # Errors
    ///
    /// [`PredicateError::AlreadyInitialized`] on a second call.
    pub fn init(&self, resolver: Arc<dyn OwnershipResolver>) -> Result<(), PredicateError> {
        self.resolver
            .set(resolver)
            .map_err(|_| PredicateError::AlreadyInitialized)
    }

    /// Split `targets` into accessible and inaccessible ones, keeping input
    /// order within each half.
    ///
    /// # Errors
    ///
    /// Same as [`CollectionPredicate::evaluate`](super::collection::CollectionPredicate::evaluate).
    #[tracing::instrument(
        skip_all,
        fields(kind = %self.descriptor.kind(), user = %principal.user_id())
    )]
    pub async fn partition(
        &self,
        principal: &Principal,
        roles: &RoleSet,
        targets: Option<Vec<T>>,
    ) -> Result<Partition<T>, PredicateError> {
        let resolver = self.resolver.get().ok_or(PredicateError::NotInitialized)?;
        let kind = self.descriptor.kind();

        let Some(targets) = targets else {
            return Err(PredicateError::unspecified(
                self.descriptor.missing_collection_message(T::SHAPE),
            ));
        };
        if targets.is_empty() {
            return Ok(Partition::default());
        }
        let located = targets
            .iter()
            .map(|t| locate(kind, t))
            .collect::<Result<Vec<_>, _>>()?;

        let project_level = resolver
            .authorization_config()
            .is_project_level_enabled_for(principal.user_id());
        let coverage = Coverage::new(roles, self.descriptor.roles(), project_level);

        if coverage.instance() {
            return Ok(Partition {
                with_access: targets,
                without_access: Vec::new(),
            });
        }

        let decisions = decide_batch(
            kind,
            located,
            &coverage,
            self.descriptor.missing_target_policy(),
            resolver.as_ref(),
            BatchMode::PerElement,
        )
        .await?;

        let mut partition = Partition::default();
        for (target, granted) in targets.into_iter().zip(decisions) {
            if granted {
                partition.with_access.push(target);
            } else {
                partition.without_access.push(target);
            }
        }

        tracing::debug!(
            with_access = partition.with_access.len(),
            without_access = partition.without_access.len(),
            "partitioned"
        );
        Ok(partition)
    }
}
