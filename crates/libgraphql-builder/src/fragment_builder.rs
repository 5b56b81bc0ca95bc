use crate::spread_extractor;
use crate::Fragment;
use crate::FragmentRegistry;
use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

type Result<T> = std::result::Result<T, FragmentBuildError>;

/// Structured description of a fragment.
///
/// A definition that already starts with a `fragment <Name> on <Type>`
/// header is registered verbatim under the name it declares. Otherwise the
/// definition is the fragment's selection set, a type condition is required,
/// and when no name is set one is derived from the type condition (`on:
/// "User"` gives `FragmentUser`).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FragmentDef {
    definition: String,
    name: Option<String>,
    type_condition: Option<String>,
}

impl FragmentDef {
    /// Create a `FragmentDef` from either a selection set (`{ id name }`)
    /// or a complete `fragment <Name> on <Type> { ... }` definition.
    pub fn new(definition: impl Into<String>) -> Self {
        Self {
            definition: definition.into(),
            ..Self::default()
        }
    }

    pub fn set_name(mut self, name: impl Into<String>) -> Self {
        let _ = self.name.insert(name.into());
        self
    }

    /// Set the type this fragment applies to (the `on` clause).
    pub fn set_type_condition(mut self, type_name: impl Into<String>) -> Self {
        let _ = self.type_condition.insert(type_name.into());
        self
    }
}

/// Input accepted by [`FragmentRegistry::fragment()`].
#[derive(Clone, Debug, PartialEq)]
pub enum FragmentInput {
    /// A complete `fragment <Name> on <Type> { ... }` definition, used
    /// verbatim.
    Raw(String),
    Structured(FragmentDef),
}

impl From<&str> for FragmentInput {
    fn from(value: &str) -> Self {
        Self::Raw(value.to_string())
    }
}

impl From<String> for FragmentInput {
    fn from(value: String) -> Self {
        Self::Raw(value)
    }
}

impl From<FragmentDef> for FragmentInput {
    fn from(value: FragmentDef) -> Self {
        Self::Structured(value)
    }
}

pub(crate) fn build_fragment(
    registry: &mut FragmentRegistry,
    input: FragmentInput,
) -> Result<Fragment> {
    let (name, definition) = match input {
        FragmentInput::Raw(definition) => {
            let name = spread_extractor::extract_fragment_name(&definition)
                .ok_or_else(|| FragmentBuildError::NoFragmentNameSpecified {
                    definition: definition.to_owned(),
                })?
                .to_string();
            (name, definition)
        },

        FragmentInput::Structured(def) =>
            if spread_extractor::has_fragment_header(&def.definition) {
                let name = header_fragment_name(registry, &def)?;
                (name, def.definition)
            } else {
                let name = registry.allocate_name(
                    def.name.as_deref(),
                    def.type_condition.as_deref(),
                    None,
                ).ok_or_else(|| FragmentBuildError::NoFragmentNameSpecified {
                    definition: def.definition.to_owned(),
                })?;

                let Some(type_condition) = def.type_condition else {
                    return Err(FragmentBuildError::NoTypeConditionSpecified {
                        fragment_name: name,
                    });
                };
                let definition =
                    format!("fragment {name} on {type_condition} {}", def.definition);
                (name, definition)
            },
    };

    let fragment = Fragment {
        fragments: spread_extractor::extract_fragment_spreads(&definition),
        definition,
        name,
    };
    registry.register(fragment.clone());
    Ok(fragment)
}

/// The name of a fragment whose definition carries its own
/// `fragment <Name> on <Type>` header. The header is kept verbatim, so the
/// registered name must be the one it declares.
fn header_fragment_name(
    registry: &mut FragmentRegistry,
    def: &FragmentDef,
) -> Result<String> {
    let header_name = registry.allocate_name(None, None, Some(def.definition.as_str()))
        .ok_or_else(|| FragmentBuildError::NoFragmentNameSpecified {
            definition: def.definition.to_owned(),
        })?;

    match def.name.as_deref() {
        Some(explicit_name) if explicit_name != header_name =>
            Err(FragmentBuildError::ConflictingFragmentName {
                explicit_name: explicit_name.to_string(),
                header_name,
            }),
        _ => Ok(header_name),
    }
}

/// Reads a fragment file and registers its content as a raw fragment.
/// Trailing whitespace (usually the file's final newline) is dropped so that
/// definitions join cleanly in a document.
pub(crate) fn build_fragment_from_file(
    registry: &mut FragmentRegistry,
    file_path: &Path,
) -> Result<Fragment> {
    let content = std::fs::read_to_string(file_path)
        .map_err(|err| FragmentBuildError::FileReadError {
            file_path: file_path.to_path_buf(),
            err,
        })?;

    log::trace!("Loaded fragment definition from {file_path:#?}.");
    build_fragment(registry, FragmentInput::Raw(content.trim_end().to_string()))
}

#[derive(Debug, Error)]
pub enum FragmentBuildError {
    #[error(
        "The fragment was named `{explicit_name}`, but its definition declares \
        `fragment {header_name}`"
    )]
    ConflictingFragmentName {
        explicit_name: String,
        header_name: String,
    },

    #[error(
        "Unable to determine a name for this fragment. Specify a name, a type \
        condition, or include a `fragment <Name> on <Type>` header in the \
        definition: `{definition}`"
    )]
    NoFragmentNameSpecified {
        definition: String,
    },

    #[error(
        "Fragments must specify the type for which they apply to, but none \
        was specified for the `{fragment_name}` fragment."
    )]
    NoTypeConditionSpecified {
        fragment_name: String,
    },

    #[error("Failure while trying to read fragment file {file_path:?}: {err}")]
    FileReadError {
        file_path: PathBuf,
        #[source]
        err: std::io::Error,
    },
}
