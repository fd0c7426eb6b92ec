//! Resolution of user supplied container references
//! A reference is a full container ID, a prefix of one, or an exact
//! container name. Resolving never has side effects; a reference that
//! matches nothing is an ordinary result with a count of zero.
use crate::error::ReferenceError;
use crate::runtime::{ContainerSummary, Runtime};

/// Containers matched by one reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub reference: String,
    pub containers: Vec<ContainerSummary>,
}

impl Match {
    pub fn count(&self) -> usize {
        self.containers.len()
    }

    /// The matched container when the reference is unambiguous
    pub fn single(&self) -> Option<&ContainerSummary> {
        match self.containers.as_slice() {
            [container] => Some(container),
            _ => None,
        }
    }
}

/// Reports whether `reference` names `container`, either by exact name or
/// by a prefix of its ID. A full ID is its own prefix.
pub fn matches_reference(reference: &str, container: &ContainerSummary) -> bool {
    !reference.is_empty()
        && (container.id.starts_with(reference) || container.name.as_deref() == Some(reference))
}

/// Resolves `reference` against a snapshot of containers. Each container is
/// counted at most once even if both its ID and its name match, and matches
/// come back ordered by ID.
pub fn resolve_in(reference: &str, population: &[ContainerSummary]) -> Match {
    let mut containers: Vec<ContainerSummary> = population
        .iter()
        .filter(|container| matches_reference(reference, container))
        .cloned()
        .collect();
    containers.sort_by(|a, b| a.id.cmp(&b.id));
    containers.dedup_by(|a, b| a.id == b.id);

    Match {
        reference: reference.to_owned(),
        containers,
    }
}

/// Resolves references against the live population of a runtime. Every
/// call takes a fresh snapshot, so two references in the same batch may
/// see different populations.
pub struct Resolver<'a, R: ?Sized> {
    runtime: &'a R,
}

impl<'a, R: Runtime + ?Sized> Resolver<'a, R> {
    pub fn new(runtime: &'a R) -> Self {
        Self { runtime }
    }

    pub fn resolve(&self, reference: &str) -> Result<Match, ReferenceError> {
        if reference.is_empty() {
            return Err(ReferenceError::EmptyReference);
        }

        let population =
            self.runtime
                .containers()
                .map_err(|source| ReferenceError::RuntimeUnavailable {
                    reference: reference.to_owned(),
                    source,
                })?;
        let found = resolve_in(reference, &population);
        tracing::debug!(
            reference,
            population = population.len(),
            matched = found.count(),
            "resolved container reference"
        );

        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeRuntime;

    fn population() -> Vec<ContainerSummary> {
        vec![
            ContainerSummary::new("abc123full", Some("web")),
            ContainerSummary::new("abd456full", None),
            ContainerSummary::new("fff000full", Some("abc")),
        ]
    }

    #[test]
    fn test_full_id() {
        let found = resolve_in("abc123full", &population());
        assert_eq!(found.count(), 1);
        assert_eq!(found.single().unwrap().id, "abc123full");
    }

    #[test]
    fn test_unique_prefix() {
        let found = resolve_in("abd", &population());
        assert_eq!(found.single().unwrap().id, "abd456full");
    }

    #[test]
    fn test_ambiguous_prefix() {
        let found = resolve_in("ab", &population());
        assert_eq!(found.count(), 2);
        assert!(found.single().is_none());
    }

    #[test]
    fn test_name_and_prefix_both_count() {
        // "abc" is a prefix of one ID and the name of another container
        let found = resolve_in("abc", &population());
        let ids: Vec<&str> = found.containers.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["abc123full", "fff000full"]);
    }

    #[test]
    fn test_exact_name() {
        let found = resolve_in("web", &population());
        assert_eq!(found.single().unwrap().id, "abc123full");
    }

    #[test]
    fn test_name_is_not_prefix_matched() {
        let found = resolve_in("we", &population());
        assert_eq!(found.count(), 0);
    }

    #[test]
    fn test_id_and_name_match_counted_once() {
        let population = vec![ContainerSummary::new("abc123", Some("abc123"))];
        let found = resolve_in("abc123", &population);
        assert_eq!(found.count(), 1);
    }

    #[test]
    fn test_no_match() {
        let found = resolve_in("xyz999", &population());
        assert_eq!(found.count(), 0);
        assert_eq!(found.reference, "xyz999");
    }

    #[test]
    fn test_empty_reference_matches_nothing() {
        assert!(!matches_reference("", &population()[0]));

        let runtime = FakeRuntime::new().with_container("abc123full", None);
        let err = Resolver::new(&runtime).resolve("").unwrap_err();
        assert!(matches!(err, ReferenceError::EmptyReference));
        assert_eq!(runtime.list_calls(), 0);
    }

    #[test]
    fn test_runtime_unavailable() {
        let runtime = FakeRuntime::new().unavailable();
        let err = Resolver::new(&runtime).resolve("abc").unwrap_err();
        assert!(matches!(err, ReferenceError::RuntimeUnavailable { .. }));
    }

    #[test]
    fn test_resolver_takes_fresh_snapshot() {
        let runtime = FakeRuntime::new().with_container("abc123full", None);
        let resolver = Resolver::new(&runtime);
        assert_eq!(resolver.resolve("abc").unwrap().count(), 1);

        runtime.add_container("abc999full", None);
        assert_eq!(resolver.resolve("abc").unwrap().count(), 2);
        assert_eq!(runtime.list_calls(), 2);
    }
}
