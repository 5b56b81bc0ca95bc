use crate::dependency_resolver;
use crate::fragment_builder;
use crate::name_allocator::NameAllocator;
use crate::operation_builder;
use crate::DependencyResolutionError;
use crate::Fragment;
use crate::FragmentBuildError;
use crate::FragmentInput;
use crate::Operation;
use crate::OperationBuildError;
use crate::OperationInput;
use crate::OperationKind;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// A store of named [`Fragment`]s that operations are assembled against.
///
/// Fragments registered once can be spread by any number of operations built
/// later from the same registry. Use [`FragmentRegistry::reset()`] (or simply
/// a new registry) to start an independent session.
///
/// # Example
///
/// ```
/// use libgraphql_builder::FragmentDef;
/// use libgraphql_builder::FragmentRegistry;
/// use libgraphql_builder::OperationDef;
///
/// let mut registry = FragmentRegistry::new();
/// let author = registry.fragment(
///     FragmentDef::new("{ id name }")
///         .set_name("AuthorFields")
///         .set_type_condition("User"),
/// ).unwrap();
/// let post = registry.fragment(
///     FragmentDef::new(format!("{{ title author {{ {author} }} }}"))
///         .set_name("PostFields")
///         .set_type_condition("Post"),
/// ).unwrap();
///
/// let query = registry.query(
///     OperationDef::new(format!("{{ post(id: $id) {{ {post} }} }}"))
///         .set_name("GetPost")
///         .add_variable("id", "ID!"),
/// ).unwrap();
///
/// assert_eq!(
///     query.document(),
///     "query GetPost ($id: ID!) { post(id: $id) { ...PostFields } }\n\
///      fragment PostFields on Post { title author { ...AuthorFields } }\n\
///      fragment AuthorFields on User { id name }",
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FragmentRegistry {
    fragments: HashMap<String, Fragment>,
    name_allocator: NameAllocator,
}

impl FragmentRegistry {
    pub fn new() -> Self {
        Self {
            fragments: HashMap::new(),
            name_allocator: NameAllocator::new(),
        }
    }

    /// Build a [`Fragment`] and register it.
    ///
    /// The returned `Fragment` formats as its spread (`...Name`) for use in
    /// the definitions of other fragments and operations.
    pub fn fragment(
        &mut self,
        input: impl Into<FragmentInput>,
    ) -> Result<Fragment, FragmentBuildError> {
        fragment_builder::build_fragment(self, input.into())
    }

    /// Read a raw `fragment <Name> on <Type> { ... }` definition from a file
    /// on disk and register it.
    pub fn fragment_from_file(
        &mut self,
        file_path: impl AsRef<Path>,
    ) -> Result<Fragment, FragmentBuildError> {
        fragment_builder::build_fragment_from_file(self, file_path.as_ref())
    }

    pub fn fragments(&self) -> &HashMap<String, Fragment> {
        &self.fragments
    }

    /// Look up a registered fragment by name.
    pub fn lookup(&self, name: &str) -> Result<&Fragment, FragmentLookupError> {
        self.fragments.get(name).ok_or_else(|| {
            FragmentLookupError::UndefinedFragment {
                fragment_name: name.to_string(),
            }
        })
    }

    /// Build a mutation whose document includes every fragment it depends
    /// on.
    pub fn mutation(
        &self,
        input: impl Into<OperationInput>,
    ) -> Result<Operation, OperationBuildError> {
        operation_builder::build_operation(self, OperationKind::Mutation, input.into())
    }

    /// Build a query whose document includes every fragment it depends on.
    pub fn query(
        &self,
        input: impl Into<OperationInput>,
    ) -> Result<Operation, OperationBuildError> {
        operation_builder::build_operation(self, OperationKind::Query, input.into())
    }

    /// Insert `fragment`, replacing any fragment already registered under
    /// the same name.
    pub fn register(&mut self, fragment: Fragment) {
        log::trace!(
            "Registering fragment `{}` (spreads: {:?}).",
            fragment.name,
            fragment.fragments,
        );
        if self.fragments.insert(fragment.name.to_owned(), fragment).is_some() {
            log::debug!("Replaced a previously registered fragment.");
        }
    }

    /// Remove every registered fragment and forget all derived-name
    /// counters.
    pub fn reset(&mut self) {
        self.fragments.clear();
        self.name_allocator.reset();
    }

    /// Collect every fragment transitively required by
    /// `direct_dependencies`, deduplicated, in the order their definitions
    /// are emitted into a document.
    pub fn resolve_dependencies<'a>(
        &'a self,
        direct_dependencies: &'a [String],
    ) -> Result<Vec<&'a Fragment>, DependencyResolutionError> {
        dependency_resolver::resolve_fragment_dependencies(self, direct_dependencies)
    }

    /// Build a subscription whose document includes every fragment it
    /// depends on.
    pub fn subscription(
        &self,
        input: impl Into<OperationInput>,
    ) -> Result<Operation, OperationBuildError> {
        operation_builder::build_operation(self, OperationKind::Subscription, input.into())
    }

    pub(crate) fn allocate_name(
        &mut self,
        explicit_name: Option<&str>,
        type_condition: Option<&str>,
        raw_definition: Option<&str>,
    ) -> Option<String> {
        let fragments = &self.fragments;
        self.name_allocator.allocate(
            explicit_name,
            type_condition,
            raw_definition,
            |name| fragments.contains_key(name),
        )
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum FragmentLookupError {
    #[error("No fragment named `{fragment_name}` has been registered")]
    UndefinedFragment {
        fragment_name: String,
    },
}
