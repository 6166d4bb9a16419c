use std::marker::PhantomData;
use std::sync::{Arc, OnceLock};

use authz_predicates_sdk::{OwnershipResolver, Status};
use modkit_security::{Principal, RoleSet};

use super::coverage::Coverage;
use super::descriptor::PredicateDescriptor;
use super::resolution::{locate, resolve_one};
use super::target::ScopeTarget;
use crate::error::PredicateError;

/// Authorizes access to one entity.
///
/// Decision order, first match wins:
/// 1. a sufficient instance role (no resolver call at all)
/// 2. a sufficient space role naming the entity's space
/// 3. a sufficient project role naming the entity's project, when
///    project-level matching is enabled for the principal
///
/// Anything else, including a target that does not exist, is denied.
pub struct SinglePredicate<T> {
    descriptor: PredicateDescriptor,
    resolver: OnceLock<Arc<dyn OwnershipResolver>>,
    _target: PhantomData<fn(&T)>,
}

impl<T: ScopeTarget> SinglePredicate<T> {
    #[must_use]
    pub fn new(descriptor: PredicateDescriptor) -> Self {
        Self {
            descriptor,
            resolver: OnceLock::new(),
            _target: PhantomData,
        }
    }

    /// Bind the ownership resolver. Must be called exactly once, before
    /// the first [`SinglePredicate::evaluate`].
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

    /// Decide whether `principal`, holding `roles`, may access `target`.
    ///
    /// # Errors
    ///
    /// - [`PredicateError::NotInitialized`] before `init`
    /// - [`PredicateError::Unspecified`] / [`PredicateError::InvalidIdentifier`]
    ///   for missing or malformed input, raised before any resolver call
    /// - [`PredicateError::Resolver`] when the ownership lookup fails
    #[tracing::instrument(
        skip_all,
        fields(kind = %self.descriptor.kind(), user = %principal.user_id())
    )]
    pub async fn evaluate(
        &self,
        principal: &Principal,
        roles: &RoleSet,
        target: Option<&T>,
    ) -> Result<Status, PredicateError> {
        let resolver = self.resolver.get().ok_or(PredicateError::NotInitialized)?;
        let kind = self.descriptor.kind();

        let Some(target) = target else {
            return Err(PredicateError::unspecified(
                self.descriptor.missing_value_message(T::SHAPE),
            ));
        };
        let located = locate(kind, target)?;

        let project_level = resolver
            .authorization_config()
            .is_project_level_enabled_for(principal.user_id());
        let coverage = Coverage::new(roles, self.descriptor.roles(), project_level);

        if coverage.instance() {
            tracing::debug!("granted by instance role");
            return Ok(Status::ok());
        }

        let granted = if let Some(scope) = resolve_one(kind, located, resolver.as_ref()).await? {
            coverage.covers(&scope)
        } else {
            tracing::debug!("target not found");
            coverage.covers_missing(self.descriptor.missing_target_policy())
        };

        if granted {
            tracing::debug!(project_level, "granted");
            Ok(Status::ok())
        } else {
            tracing::debug!(project_level, "denied");
            Ok(self.descriptor.denial(principal))
        }
    }
}
