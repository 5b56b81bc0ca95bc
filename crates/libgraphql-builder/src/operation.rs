use crate::OperationKind;
use serde::Serialize;
use serde::Serializer;
use std::fmt;

/// A fully assembled operation.
///
/// Both the [`Display`](fmt::Display) form and the [`Serialize`] form of an
/// `Operation` are its [`document`](Operation::document), so an `Operation`
/// can be dropped straight into a request body:
///
/// ```
/// use libgraphql_builder::FragmentRegistry;
/// use libgraphql_builder::OperationDef;
///
/// let registry = FragmentRegistry::new();
/// let query = registry.query(
///     OperationDef::new("{ status }").set_name("Status"),
/// ).unwrap();
///
/// assert_eq!(query.to_string(), "query Status { status }");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Operation {
    pub(crate) definition: String,
    pub(crate) document: String,
    pub(crate) fragments: Vec<String>,
    pub(crate) kind: OperationKind,
    pub(crate) name: Option<String>,
}

impl Operation {
    /// The operation's header (if one was generated) followed by its body.
    /// Fragment definitions are not included.
    pub fn definition(&self) -> &str {
        self.definition.as_str()
    }

    /// The complete document: [`definition`](Operation::definition) followed
    /// by the definition of every fragment it (transitively) depends on,
    /// one per line.
    pub fn document(&self) -> &str {
        self.document.as_str()
    }

    /// Names of the fragments spread directly in this operation's
    /// definition, in order of appearance (duplicates included).
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Access the name of this [`Operation`] (if one was specified).
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.document)
    }
}

impl Serialize for Operation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.document)
    }
}
