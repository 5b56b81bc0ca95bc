//! Assemble self-contained GraphQL documents from operation and fragment
//! definition text.
//!
//! Definitions are treated as opaque text: the only syntax this crate looks
//! at is the fragment spread (`...Name`), which it follows through a
//! [`FragmentRegistry`] to append every fragment an operation needs, exactly
//! once, after the operation itself.

mod dependency_resolver;
mod fragment;
mod fragment_builder;
mod fragment_registry;
mod name_allocator;
mod operation;
mod operation_builder;
mod operation_kind;
mod spread_extractor;

pub use dependency_resolver::DependencyResolutionError;
pub use fragment::Fragment;
pub use fragment_builder::FragmentBuildError;
pub use fragment_builder::FragmentDef;
pub use fragment_builder::FragmentInput;
pub use fragment_registry::FragmentLookupError;
pub use fragment_registry::FragmentRegistry;
pub use operation::Operation;
pub use operation_builder::OperationBuildError;
pub use operation_builder::OperationDef;
pub use operation_builder::OperationInput;
pub use operation_kind::OperationKind;
pub use spread_extractor::extract_fragment_name;
pub use spread_extractor::extract_fragment_spreads;
