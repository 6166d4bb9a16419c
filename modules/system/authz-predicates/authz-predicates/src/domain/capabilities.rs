//! Capability role overrides.
//!
//! A capability names a guarded operation. Deployments can replace the roles
//! an operation (or one of its arguments) requires without recompiling:
//!
//! ```text
//! # comment
//! MY_CAP: SPACE_OBSERVER; ARG1 = SPACE_USER
//! other_cap: arg1 = space_user, space_etl_server
//! ```
//!
//! Capability names, argument names and roles are case-insensitive. Lines
//! or roles that cannot be parsed are skipped with a warning.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context as _;
use modkit_security::RoleWithHierarchy;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct CapabilityRoles {
    method_roles: Option<Vec<RoleWithHierarchy>>,
    argument_roles: HashMap<String, Vec<RoleWithHierarchy>>,
}

/// Parsed capability overrides, keyed by upper-cased capability name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilityMap {
    capabilities: HashMap<String, CapabilityRoles>,
}

impl CapabilityMap {
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut map = Self::default();
        map.extend_from(text);
        map
    }

    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read capabilities from {}", path.display()))?;
        Ok(Self::parse(&text))
    }

    /// Add the overrides in `text`. Later entries replace earlier ones.
    pub fn extend_from(&mut self, text: &str) {
        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            self.parse_line(index + 1, line);
        }
    }

    fn parse_line(&mut self, line_no: usize, line: &str) {
        let Some((name, items)) = line.split_once(':') else {
            tracing::warn!(line = line_no, content = line, "capability line without ':' ignored");
            return;
        };
        let name = name.trim().to_uppercase();
        if name.is_empty() {
            tracing::warn!(line = line_no, content = line, "capability line without name ignored");
            return;
        }

        let entry = self.capabilities.entry(name).or_default();
        for item in items.split(';').map(str::trim).filter(|i| !i.is_empty()) {
            if let Some((argument, roles)) = item.split_once('=') {
                let roles = parse_roles(line_no, roles);
                if !roles.is_empty() {
                    entry
                        .argument_roles
                        .insert(argument.trim().to_uppercase(), roles);
                }
            } else {
                let roles = parse_roles(line_no, item);
                if !roles.is_empty() {
                    entry.method_roles = Some(roles);
                }
            }
        }
    }

    /// Replacement for an operation's own roles.
    #[must_use]
    pub fn method_roles(&self, capability: &str) -> Option<&[RoleWithHierarchy]> {
        self.capabilities
            .get(&capability.to_uppercase())
            .and_then(|c| c.method_roles.as_deref())
    }

    /// Replacement for the roles guarding one argument of an operation.
    #[must_use]
    pub fn argument_roles(&self, capability: &str, argument: &str) -> Option<&[RoleWithHierarchy]> {
        self.capabilities
            .get(&capability.to_uppercase())
            .and_then(|c| c.argument_roles.get(&argument.to_uppercase()))
            .map(Vec::as_slice)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.capabilities.len()
    }
}

fn parse_roles(line_no: usize, text: &str) -> Vec<RoleWithHierarchy> {
    text.split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .filter_map(|r| match r.parse::<RoleWithHierarchy>() {
            Ok(role) => Some(role),
            Err(err) => {
                tracing::warn!(line = line_no, error = %err, "capability role ignored");
                None
            }
        })
        .collect()
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    const FILE: &str = "
# overrides
MY_CAP: SPACE_OBSERVER; ARG1 = SPACE_USER
my_cap2: arg1 = space_user
MULTI: space_admin, instance_etl_server
";

    #[test]
    fn parses_method_and_argument_roles() {
        let map = CapabilityMap::parse(FILE);

        assert_eq!(map.len(), 3);
        assert_eq!(
            map.method_roles("MY_CAP"),
            Some(&[RoleWithHierarchy::SpaceObserver][..])
        );
        assert_eq!(
            map.argument_roles("MY_CAP", "ARG1"),
            Some(&[RoleWithHierarchy::SpaceUser][..])
        );
    }

    #[test]
    fn lookups_are_case_insensitive() {
        let map = CapabilityMap::parse(FILE);

        assert_eq!(map.method_roles("my_cap2"), None);
        assert_eq!(
            map.argument_roles("My_Cap2", "Arg1"),
            Some(&[RoleWithHierarchy::SpaceUser][..])
        );
        assert_eq!(
            map.method_roles("multi"),
            Some(&[RoleWithHierarchy::SpaceAdmin, RoleWithHierarchy::InstanceEtlServer][..])
        );
    }

    #[test]
    fn later_lines_override_earlier_ones() {
        let mut map = CapabilityMap::parse("CAP: SPACE_USER");
        map.extend_from("cap: space_admin");
        assert_eq!(map.method_roles("CAP"), Some(&[RoleWithHierarchy::SpaceAdmin][..]));
    }

    #[test]
    #[traced_test]
    fn bad_entries_are_skipped_with_warning() {
        let map = CapabilityMap::parse("no colon here\nCAP: NOT_A_ROLE, SPACE_USER; ARG = BOGUS\n");

        assert_eq!(map.method_roles("CAP"), Some(&[RoleWithHierarchy::SpaceUser][..]));
        assert_eq!(map.argument_roles("CAP", "ARG"), None);
        assert!(logs_contain("capability line without ':' ignored"));
        assert!(logs_contain("unknown role 'NOT_A_ROLE'"));
    }

    #[test]
    fn reads_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capabilities");
        std::fs::write(&path, FILE).unwrap();

        let map = CapabilityMap::from_file(&path).unwrap();
        assert_eq!(map.len(), 3);

        let missing = CapabilityMap::from_file(dir.path().join("absent"));
        assert!(missing.is_err());
    }
}
