use crate::Fragment;
use crate::FragmentRegistry;
use indexmap::IndexMap;
use std::slice;
use thiserror::Error;

type Result<T> = std::result::Result<T, DependencyResolutionError>;

/// A dependency list that is partway through being walked, along with the
/// fragment it belongs to (`None` for the operation itself).
type PendingSpreads<'a> = (Option<&'a str>, slice::Iter<'a, String>);

/// Computes the transitive set of fragments required by
/// `direct_dependencies`.
///
/// The walk is depth-first, starting from `direct_dependencies` in the order
/// given. Each fragment is marked as visited *before* its own dependencies
/// are walked, so a fragment that spreads itself (directly or through other
/// fragments) ends the walk of that branch instead of looping forever.
/// Fragments that were already visited are skipped entirely, which leaves
/// every fragment in the result exactly once.
///
/// The returned fragments are in discovery order: a fragment comes before the
/// dependencies that were first discovered through it.
///
/// Pending dependency lists are kept on an explicit stack rather than the
/// call stack, so arbitrarily long chains of fragments resolve.
pub(crate) fn resolve_fragment_dependencies<'a>(
    registry: &'a FragmentRegistry,
    direct_dependencies: &'a [String],
) -> Result<Vec<&'a Fragment>> {
    let mut visited: IndexMap<&'a str, &'a Fragment> = IndexMap::new();
    let mut pending: Vec<PendingSpreads<'a>> = vec![(None, direct_dependencies.iter())];

    while let Some((referenced_by, spreads)) = pending.last_mut() {
        let Some(fragment_name) = spreads.next() else {
            pending.pop();
            continue;
        };

        if visited.contains_key(fragment_name.as_str()) {
            log::trace!("Skipping already-collected fragment `{fragment_name}`.");
            continue;
        }

        let fragment = registry.lookup(fragment_name).map_err(|_| {
            DependencyResolutionError::UndefinedFragmentReference {
                referenced_by: referenced_by.map(str::to_string),
                undefined_fragment: fragment_name.to_owned(),
            }
        })?;

        visited.insert(fragment.name(), fragment);

        if !fragment.fragments().is_empty() {
            pending.push((Some(fragment.name()), fragment.fragments().iter()));
        }
    }

    Ok(visited.into_values().collect())
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum DependencyResolutionError {
    #[error(
        "{} references fragment `{undefined_fragment}`, but no fragment with \
        that name has been registered",
        format_referencing_definition(.referenced_by.as_deref()),
    )]
    UndefinedFragmentReference {
        /// The fragment whose definition contains the spread, or `None` when
        /// the spread appears directly in the operation being built.
        referenced_by: Option<String>,
        undefined_fragment: String,
    },
}

fn format_referencing_definition(referenced_by: Option<&str>) -> String {
    match referenced_by {
        Some(fragment_name) => format!("Fragment `{fragment_name}`"),
        None => "The operation".to_string(),
    }
}
