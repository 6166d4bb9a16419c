//! Turning targets into scopes: locally when the target describes itself,
//! through the ownership resolver otherwise. Batches cost at most two
//! resolver round trips regardless of their size.

use std::collections::{HashMap, HashSet};

use authz_predicates_sdk::{EntityKind, EntityRef, OwnershipResolver, parse_identifier};
use modkit_security::EntityScope;

use super::coverage::Coverage;
use super::descriptor::MissingTargetPolicy;
use super::target::{Lookup, ScopeTarget};
use crate::error::PredicateError;

/// A target after validation.
#[derive(Clone, Debug)]
pub enum Located {
    Local(EntityScope),
    Remote(EntityRef),
}

/// Validate a target and work out where its scope comes from. Structured
/// identifiers are parsed here, so malformed input fails before any resolver
/// call.
pub fn locate<T: ScopeTarget>(kind: EntityKind, target: &T) -> Result<Located, PredicateError> {
    match target.lookup() {
        None => Err(PredicateError::unspecified("Unspecified value")),
        Some(Lookup::Known(scope)) => Ok(Located::Local(scope)),
        Some(Lookup::ByRef(EntityRef::Identifier(identifier))) if kind.parses_identifiers() => {
            Ok(Located::Local(parse_identifier(kind, &identifier)?))
        }
        Some(Lookup::ByRef(id)) => Ok(Located::Remote(id)),
    }
}

/// Scope of one located target; `None` when it does not exist.
pub async fn resolve_one(
    kind: EntityKind,
    located: Located,
    resolver: &dyn OwnershipResolver,
) -> Result<Option<EntityScope>, PredicateError> {
    match located {
        Located::Local(scope) => Ok(Some(scope)),
        Located::Remote(id) => Ok(resolver.resolve_one(kind, &id).await?),
    }
}

/// Whether a batch may stop at the first denial.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchMode {
    AllOrNothing,
    PerElement,
}

enum Pending {
    Granted,
    Denied,
    NeedsProject(EntityScope, EntityRef),
}

/// Decide every element of a batch.
///
/// 1. All remote refs are resolved to their space in one `resolve_many`.
/// 2. Elements whose space is not covered are checked against project roles;
///    their projects come from one `resolve_projects`, issued only when
///    project-level roles are in play.
///
/// In [`BatchMode::AllOrNothing`] the second call is skipped once any
/// element is denied, and the returned flags are then incomplete.
pub async fn decide_batch(
    kind: EntityKind,
    located: Vec<Located>,
    coverage: &Coverage<'_>,
    policy: MissingTargetPolicy,
    resolver: &dyn OwnershipResolver,
    mode: BatchMode,
) -> Result<Vec<bool>, PredicateError> {
    let remote = distinct_remote(&located);
    let spaces = if remote.is_empty() {
        HashMap::new()
    } else {
        resolver.resolve_many(kind, &remote).await?
    };

    let pending: Vec<Pending> = located
        .into_iter()
        .map(|element| match element {
            Located::Local(scope) => first_pass(coverage, policy, Some(scope), None),
            Located::Remote(id) => {
                let scope = spaces.get(&id).cloned();
                first_pass(coverage, policy, scope, Some(id))
            }
        })
        .collect();

    let denied = pending.iter().any(|p| matches!(p, Pending::Denied));
    if denied && mode == BatchMode::AllOrNothing {
        return Ok(pending
            .iter()
            .map(|p| matches!(p, Pending::Granted))
            .collect());
    }

    let needs_project = distinct_needing_project(&pending);
    let projects = if needs_project.is_empty() {
        HashMap::new()
    } else {
        resolver.resolve_projects(kind, &needs_project).await?
    };

    Ok(pending
        .into_iter()
        .map(|p| match p {
            Pending::Granted => true,
            Pending::Denied => false,
            Pending::NeedsProject(scope, id) => projects
                .get(&id)
                .is_some_and(|project| coverage.covers(&scope.with_project(project.clone()))),
        })
        .collect())
}

fn first_pass(
    coverage: &Coverage<'_>,
    policy: MissingTargetPolicy,
    scope: Option<EntityScope>,
    remote_id: Option<EntityRef>,
) -> Pending {
    let Some(scope) = scope else {
        return if coverage.covers_missing(policy) {
            Pending::Granted
        } else {
            Pending::Denied
        };
    };

    if coverage.covers(&scope) {
        return Pending::Granted;
    }

    // Only remote entities owned by a space can still be saved by a project
    // role whose project we have not fetched yet.
    match remote_id {
        Some(id)
            if coverage.has_project_roles() && !scope.is_shared() && scope.project().is_none() =>
        {
            Pending::NeedsProject(scope, id)
        }
        _ => Pending::Denied,
    }
}

fn distinct_remote(located: &[Located]) -> Vec<EntityRef> {
    let mut seen = HashSet::new();
    located
        .iter()
        .filter_map(|element| match element {
            Located::Remote(id) => Some(id),
            Located::Local(_) => None,
        })
        .filter(|id| seen.insert(*id))
        .cloned()
        .collect()
}

fn distinct_needing_project(pending: &[Pending]) -> Vec<EntityRef> {
    let mut seen = HashSet::new();
    pending
        .iter()
        .filter_map(|p| match p {
            Pending::NeedsProject(_, id) => Some(id),
            Pending::Granted | Pending::Denied => None,
        })
        .filter(|id| seen.insert(*id))
        .cloned()
        .collect()
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use authz_predicates_sdk::{EntityUpdates, Identifier, TechId};
    use modkit_security::ProjectRef;

    #[test]
    fn structured_identifiers_are_parsed_locally() {
        let located =
            locate(EntityKind::Experiment, &Identifier::from("/SPACE/PROJECT/E1")).unwrap();
        match located {
            Located::Local(scope) => {
                assert_eq!(scope.project(), Some(&ProjectRef::new("SPACE", "PROJECT")));
            }
            Located::Remote(id) => panic!("expected local scope, got {id}"),
        }
    }

    #[test]
    fn unstructured_identifiers_go_to_the_resolver() {
        let located =
            locate(EntityKind::DataSet, &Identifier::from("20120814110011738-105")).unwrap();
        assert!(matches!(located, Located::Remote(EntityRef::Identifier(_))));
    }

    #[test]
    fn malformed_identifier_is_a_usage_error() {
        let err = locate(EntityKind::Experiment, &Identifier::from("E1")).unwrap_err();
        assert!(matches!(err, PredicateError::InvalidIdentifier(_)));
    }

    #[test]
    fn empty_updates_are_unspecified() {
        let err = locate(EntityKind::Sample, &EntityUpdates::default()).unwrap_err();
        assert_eq!(err.to_string(), "Unspecified value");
    }

    #[test]
    fn remote_refs_are_deduplicated_in_order() {
        let located = vec![
            locate(EntityKind::Sample, &TechId(2)).unwrap(),
            locate(EntityKind::Sample, &TechId(1)).unwrap(),
            locate(EntityKind::Sample, &TechId(2)).unwrap(),
            locate(EntityKind::Sample, &Identifier::from("/S/X")).unwrap(),
        ];
        assert_eq!(
            distinct_remote(&located),
            vec![EntityRef::TechId(2), EntityRef::TechId(1)]
        );
    }
}
