use crate::dependency_resolver;
use crate::spread_extractor;
use crate::DependencyResolutionError;
use crate::FragmentRegistry;
use crate::Operation;
use crate::OperationKind;
use indexmap::IndexMap;
use std::fmt::Write;
use thiserror::Error;

type Result<T> = std::result::Result<T, OperationBuildError>;

/// Structured description of an operation.
///
/// Variables are rendered in the order they were added.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OperationDef {
    definition: String,
    name: Option<String>,
    variables: IndexMap<String, String>,
}

impl OperationDef {
    /// Create an `OperationDef` whose body is `definition` (usually the
    /// top-level selection set, e.g. `{ user { id } }`).
    pub fn new(definition: impl Into<String>) -> Self {
        Self {
            definition: definition.into(),
            ..Self::default()
        }
    }

    /// Add a variable declaration after any previously added variables.
    ///
    /// `type_annotation` is used verbatim and may include a default value
    /// (e.g. `String = "NYTimes"`). The name is given without its leading
    /// `$`.
    pub fn add_variable(
        mut self,
        name: impl Into<String>,
        type_annotation: impl Into<String>,
    ) -> Self {
        self.variables.insert(name.into(), type_annotation.into());
        self
    }

    /// Set the name of the operation. An empty name is treated as no name.
    pub fn set_name(mut self, name: impl Into<String>) -> Self {
        let _ = self.name.insert(name.into());
        self
    }

    /// Set the list of variables.
    ///
    /// NOTE: Any previously added variables are fully replaced.
    pub fn set_variables(
        mut self,
        variables: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        self.variables = variables.into_iter().collect();
        self
    }
}

/// Input accepted by [`FragmentRegistry::query()`],
/// [`FragmentRegistry::mutation()`] and
/// [`FragmentRegistry::subscription()`].
#[derive(Clone, Debug, PartialEq)]
pub enum OperationInput {
    /// A complete operation definition, used verbatim.
    Raw(String),
    Structured(OperationDef),
}

impl From<&str> for OperationInput {
    fn from(value: &str) -> Self {
        Self::Raw(value.to_string())
    }
}

impl From<String> for OperationInput {
    fn from(value: String) -> Self {
        Self::Raw(value)
    }
}

impl From<OperationDef> for OperationInput {
    fn from(value: OperationDef) -> Self {
        Self::Structured(value)
    }
}

pub(crate) fn build_operation(
    registry: &FragmentRegistry,
    kind: OperationKind,
    input: OperationInput,
) -> Result<Operation> {
    let (name, definition) = match input {
        OperationInput::Raw(definition) => (None, definition),
        OperationInput::Structured(def) => {
            // An empty name is the same as no name at all.
            let name = def.name.filter(|name| !name.is_empty());
            let definition = format!(
                "{}{}",
                format_header(kind, name.as_deref(), &def.variables),
                def.definition,
            );
            (name, definition)
        },
    };

    let fragments = spread_extractor::extract_fragment_spreads(&definition);
    let resolved = dependency_resolver::resolve_fragment_dependencies(
        registry,
        &fragments,
    )?;

    let mut document = definition.to_owned();
    for fragment in &resolved {
        document.push('\n');
        document.push_str(fragment.definition());
    }

    log::debug!(
        "Built {kind} `{}` with {} fragment definition(s).",
        name.as_deref().unwrap_or("<anonymous>"),
        resolved.len(),
    );

    Ok(Operation {
        definition,
        document,
        fragments,
        kind,
        name,
    })
}

/// Renders `<kind> <name> (<$var>: <type>, ...) `.
///
/// Without a name or variables the header is empty. With variables but no
/// name, the kind keyword is still emitted.
fn format_header(
    kind: OperationKind,
    name: Option<&str>,
    variables: &IndexMap<String, String>,
) -> String {
    let mut header = String::new();
    if let Some(name) = name {
        let _ = write!(header, "{kind} {name} ");
    }

    if !variables.is_empty() {
        if name.is_none() {
            let _ = write!(header, "{kind} ");
        }
        let params = variables.iter()
            .map(|(var_name, type_annotation)| format!("${var_name}: {type_annotation}"))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = write!(header, "({params}) ");
    }

    header
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum OperationBuildError {
    #[error("Unable to resolve the fragments used by this operation: {0}")]
    UnresolvedFragment(#[from] DependencyResolutionError),
}
