//! Operation-level access control.
//!
//! An operation declares the roles it requires and, for each guarded
//! argument, a predicate that checks the principal against the argument's
//! value. The controller first checks the user's roles against the operation
//! roles, then runs the argument predicates in order with only the roles
//! that qualified.

use async_trait::async_trait;
use authz_predicates_sdk::Status;
use modkit_security::{Principal, RoleSet, RoleWithHierarchy, expand, format_roles};

use super::capabilities::CapabilityMap;
use super::collection::CollectionPredicate;
use super::single::SinglePredicate;
use super::target::ScopeTarget;
use crate::error::PredicateError;

/// A guarded argument: a predicate bound to the value it checks.
#[async_trait]
pub trait GuardedArgument: Send + Sync {
    /// # Errors
    ///
    /// Whatever the underlying predicate returns.
    async fn evaluate(
        &self,
        principal: &Principal,
        roles: &RoleSet,
    ) -> Result<Status, PredicateError>;
}

/// Binds a [`SinglePredicate`] to an argument value.
pub struct Guarded<'a, T> {
    predicate: &'a SinglePredicate<T>,
    value: Option<&'a T>,
}

impl<'a, T> Guarded<'a, T> {
    #[must_use]
    pub fn new(predicate: &'a SinglePredicate<T>, value: Option<&'a T>) -> Self {
        Self { predicate, value }
    }
}

#[async_trait]
impl<T: ScopeTarget> GuardedArgument for Guarded<'_, T> {
    async fn evaluate(
        &self,
        principal: &Principal,
        roles: &RoleSet,
    ) -> Result<Status, PredicateError> {
        self.predicate.evaluate(principal, roles, self.value).await
    }
}

/// Binds a [`CollectionPredicate`] to an argument value.
pub struct GuardedCollection<'a, T> {
    predicate: &'a CollectionPredicate<T>,
    values: Option<&'a [T]>,
}

impl<'a, T> GuardedCollection<'a, T> {
    #[must_use]
    pub fn new(predicate: &'a CollectionPredicate<T>, values: Option<&'a [T]>) -> Self {
        Self { predicate, values }
    }
}

#[async_trait]
impl<T: ScopeTarget> GuardedArgument for GuardedCollection<'_, T> {
    async fn evaluate(
        &self,
        principal: &Principal,
        roles: &RoleSet,
    ) -> Result<Status, PredicateError> {
        self.predicate.evaluate(principal, roles, self.values).await
    }
}

/// A guarded operation.
#[derive(Debug, Clone)]
pub struct MethodSpec {
    name: String,
    roles_allowed: Vec<RoleWithHierarchy>,
    capability: Option<String>,
}

impl MethodSpec {
    #[must_use]
    pub fn new(name: impl Into<String>, roles_allowed: &[RoleWithHierarchy]) -> Self {
        Self {
            name: name.into(),
            roles_allowed: roles_allowed.to_vec(),
            capability: None,
        }
    }

    /// Name under which roles can be overridden in the capability map.
    #[must_use]
    pub fn capability(mut self, capability: impl Into<String>) -> Self {
        self.capability = Some(capability.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// One guarded argument of a call.
pub struct ArgumentGuard<'a> {
    name: Option<String>,
    roles_allowed: Vec<RoleWithHierarchy>,
    argument: &'a dyn GuardedArgument,
}

impl<'a> ArgumentGuard<'a> {
    /// Guard checked with the operation's roles.
    #[must_use]
    pub fn new(argument: &'a dyn GuardedArgument) -> Self {
        Self {
            name: None,
            roles_allowed: Vec::new(),
            argument,
        }
    }

    /// Argument name, used for capability overrides.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Roles for this argument instead of the operation's roles.
    #[must_use]
    pub fn roles_allowed(mut self, roles: &[RoleWithHierarchy]) -> Self {
        self.roles_allowed = roles.to_vec();
        self
    }
}

/// Checks calls of guarded operations.
#[derive(Debug, Clone, Default)]
pub struct AccessController {
    capabilities: CapabilityMap,
}

impl AccessController {
    #[must_use]
    pub fn new(capabilities: CapabilityMap) -> Self {
        Self { capabilities }
    }

    #[must_use]
    pub fn capabilities(&self) -> &CapabilityMap {
        &self.capabilities
    }

    /// Decide whether `principal`, holding `user_roles`, may call `method`
    /// with `arguments`.
    ///
    /// Arguments are checked in order; the first non-OK status is returned
    /// and later arguments are not evaluated.
    ///
    /// # Errors
    ///
    /// Whatever an argument predicate returns.
    #[tracing::instrument(skip_all, fields(method = %method.name, user = %principal.user_id()))]
    pub async fn is_authorized(
        &self,
        principal: &Principal,
        user_roles: &RoleSet,
        method: &MethodSpec,
        arguments: &[ArgumentGuard<'_>],
    ) -> Result<Status, PredicateError> {
        let capability = method.capability.as_deref();
        let method_roles = capability
            .and_then(|c| self.capabilities.method_roles(c))
            .unwrap_or(method.roles_allowed.as_slice());

        if method_roles.is_empty() {
            return Ok(Status::error(format!(
                "No roles have been found for method '{}'.",
                method.name
            )));
        }
        if user_roles.is_empty() {
            return Ok(Status::error(format!(
                "User '{}' has no role assignments.",
                principal.user_id()
            )));
        }

        let qualified = user_roles.retain_sufficient(method_roles);
        if qualified.is_empty() {
            return Ok(no_matching_role(principal, method_roles));
        }

        for guard in arguments {
            let overridden = capability
                .zip(guard.name.as_deref())
                .and_then(|(c, name)| self.capabilities.argument_roles(c, name));
            let argument_roles = match overridden {
                Some(roles) => roles,
                None if guard.roles_allowed.is_empty() => method_roles,
                None => guard.roles_allowed.as_slice(),
            };

            let argument_user_roles = user_roles.retain_sufficient(argument_roles);
            if argument_user_roles.is_empty() {
                return Ok(no_matching_role(principal, argument_roles));
            }

            let status = guard
                .argument
                .evaluate(principal, &argument_user_roles)
                .await?;
            if status.is_error() {
                tracing::debug!(argument = guard.name.as_deref().unwrap_or("?"), "argument denied");
                return Ok(status);
            }
        }

        Ok(Status::ok())
    }
}

fn no_matching_role(principal: &Principal, roles: &[RoleWithHierarchy]) -> Status {
    Status::error(format!(
        "None of method roles '{}' could be found in roles of user '{}'.",
        format_roles(&expand(roles)),
        principal.display_name()
    ))
}
