use std::marker::PhantomData;
use std::sync::{Arc, OnceLock};

use authz_predicates_sdk::{OwnershipResolver, Status};
use modkit_security::{Principal, RoleSet};

use super::coverage::Coverage;
use super::descriptor::PredicateDescriptor;
use super::resolution::{BatchMode, decide_batch, locate};
use super::target::ScopeTarget;
use crate::error::PredicateError;

/// Authorizes access to a batch of entities, all or nothing.
///
/// The batch is granted only if every element would be granted on its own.
/// An empty batch is granted. Ownership is resolved with at most two
/// resolver round trips: spaces for every element at once, then projects
/// for the elements no space role covers, only when project-level matching
/// is enabled for the principal.
pub struct CollectionPredicate<T> {
    descriptor: PredicateDescriptor,
    resolver: OnceLock<Arc<dyn OwnershipResolver>>,
    _target: PhantomData<fn(&T)>,
}

impl<T: ScopeTarget> CollectionPredicate<T> {
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

    #[must_use]
    pub fn descriptor(&self) -> &PredicateDescriptor {
        &self.descriptor
    }

    /// Decide whether `principal` may access every element of `targets`.
    ///
    /// # Errors
    ///
    /// - [`PredicateError::NotInitialized`] before `init`
    /// - [`PredicateError::Unspecified`] when `targets` is `None` or an
    ///   element carries no key
    /// - [`PredicateError::InvalidIdentifier`] for a malformed element
    /// - [`PredicateError::Resolver`] when an ownership lookup fails
    #[tracing::instrument(
        skip_all,
        fields(
            kind = %self.descriptor.kind(),
            user = %principal.user_id(),
            size = targets.map_or(0, <[T]>::len)
        )
    )]
    pub async fn evaluate(
        &self,
        principal: &Principal,
        roles: &RoleSet,
        targets: Option<&[T]>,
    ) -> Result<Status, PredicateError> {
        let resolver = self.resolver.get().ok_or(PredicateError::NotInitialized)?;
        let kind = self.descriptor.kind();

        let Some(targets) = targets else {
            return Err(PredicateError::unspecified(
                self.descriptor.missing_collection_message(T::SHAPE),
            ));
        };
        if targets.is_empty() {
            return Ok(Status::ok());
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
            tracing::debug!("granted by instance role");
            return Ok(Status::ok());
        }

        let decisions = decide_batch(
            kind,
            located,
            &coverage,
            self.descriptor.missing_target_policy(),
            resolver.as_ref(),
            BatchMode::AllOrNothing,
        )
        .await?;

        if decisions.iter().all(|granted| *granted) {
            tracing::debug!(project_level, "granted");
            Ok(Status::ok())
        } else {
            let denied = decisions.iter().filter(|granted| !**granted).count();
            tracing::debug!(project_level, denied, "denied");
            Ok(self.descriptor.denial(principal))
        }
    }
}
