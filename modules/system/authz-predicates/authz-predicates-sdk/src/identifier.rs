//! Structural parsing of self-describing identifiers.
//!
//! | kind       | form                  | scope             |
//! |------------|-----------------------|-------------------|
//! | space      | `/SPACE`              | space             |
//! | project    | `/SPACE/PROJECT`      | project           |
//! | experiment | `/SPACE/PROJECT/CODE` | project           |
//! | sample     | `/CODE`               | shared (instance) |
//! | sample     | `/SPACE/CODE`         | space             |
//! | sample     | `/SPACE/PROJECT/CODE` | project           |

use modkit_security::{EntityScope, ProjectRef, SpaceRef};

use crate::models::EntityKind;

/// An identifier that does not fit the grammar of its kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} identifier '{value}': {reason}")]
pub struct IdentifierError {
    pub kind: EntityKind,
    pub value: String,
    pub reason: &'static str,
}

/// Derive the owning scope of an entity from its identifier.
///
/// # Errors
///
/// Returns [`IdentifierError`] when the identifier is malformed, has the
/// wrong number of segments for `kind`, or `kind` has no structured
/// identifiers.
pub fn parse_identifier(kind: EntityKind, value: &str) -> Result<EntityScope, IdentifierError> {
    let fail = |reason| IdentifierError {
        kind,
        value: value.to_owned(),
        reason,
    };

    if !kind.parses_identifiers() {
        return Err(fail("identifiers of this kind are not structured"));
    }

    let Some(rest) = value.trim().strip_prefix('/') else {
        return Err(fail("must start with '/'"));
    };

    let segments: Vec<&str> = rest.split('/').collect();
    if segments.iter().any(|s| s.trim().is_empty()) {
        return Err(fail("empty segment"));
    }

    match (kind, segments.as_slice()) {
        (EntityKind::Space, [space]) | (EntityKind::Sample, [space, _]) => {
            Ok(EntityScope::in_space(SpaceRef::new(*space)))
        }
        (EntityKind::Project, [space, project])
        | (EntityKind::Experiment | EntityKind::Sample, [space, project, _]) => {
            Ok(EntityScope::in_project(ProjectRef::new(*space, *project)))
        }
        (EntityKind::Sample, [_]) => Ok(EntityScope::shared()),
        _ => Err(fail("unexpected number of segments")),
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn experiment_identifier_names_space_and_project() {
        let scope = parse_identifier(EntityKind::Experiment, "/SPACE/PROJECT/E1").unwrap();
        assert_eq!(scope.space(), Some(&SpaceRef::new("SPACE")));
        assert_eq!(scope.project(), Some(&ProjectRef::new("SPACE", "PROJECT")));
    }

    #[test]
    fn sample_identifiers_have_three_shapes() {
        assert!(parse_identifier(EntityKind::Sample, "/S1").unwrap().is_shared());

        let space_sample = parse_identifier(EntityKind::Sample, "/CISD/S1").unwrap();
        assert_eq!(space_sample.space(), Some(&SpaceRef::new("CISD")));
        assert!(space_sample.project().is_none());

        let project_sample = parse_identifier(EntityKind::Sample, "/CISD/NEMO/S1").unwrap();
        assert_eq!(
            project_sample.project(),
            Some(&ProjectRef::new("CISD", "NEMO"))
        );
    }

    #[test]
    fn space_and_project_identifiers() {
        let space = parse_identifier(EntityKind::Space, "/CISD").unwrap();
        assert_eq!(space.space(), Some(&SpaceRef::new("CISD")));

        let project = parse_identifier(EntityKind::Project, "/CISD/NEMO").unwrap();
        assert_eq!(project.project(), Some(&ProjectRef::new("CISD", "NEMO")));
    }

    #[test]
    fn malformed_identifiers_are_rejected() {
        let err = parse_identifier(EntityKind::Experiment, "SPACE/PROJECT/E1").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid experiment identifier 'SPACE/PROJECT/E1': must start with '/'"
        );

        let err = parse_identifier(EntityKind::Experiment, "/SPACE/E1").unwrap_err();
        assert_eq!(err.reason, "unexpected number of segments");

        let err = parse_identifier(EntityKind::Project, "/CISD//").unwrap_err();
        assert_eq!(err.reason, "empty segment");
    }

    #[test]
    fn unstructured_kinds_are_rejected() {
        let err = parse_identifier(EntityKind::DataSet, "/A/B").unwrap_err();
        assert_eq!(err.kind, EntityKind::DataSet);
    }
}
