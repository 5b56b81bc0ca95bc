use std::fmt;

/// A named fragment that has been registered with a
/// [`FragmentRegistry`](crate::FragmentRegistry).
///
/// Formatting a `Fragment` with `{}` produces its spread syntax
/// (`...FragmentName`) so that it can be interpolated directly into the body
/// of another fragment or operation:
///
/// ```
/// use libgraphql_builder::FragmentDef;
/// use libgraphql_builder::FragmentRegistry;
///
/// let mut registry = FragmentRegistry::new();
/// let user_fields = registry.fragment(
///     FragmentDef::new("{ id name }").set_type_condition("User"),
/// ).unwrap();
///
/// assert_eq!(user_fields.to_string(), "...FragmentUser");
/// assert_eq!(
///     user_fields.definition(),
///     "fragment FragmentUser on User { id name }",
/// );
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Fragment {
    pub(crate) definition: String,
    pub(crate) fragments: Vec<String>,
    pub(crate) name: String,
}

impl Fragment {
    /// The full definition text of this fragment, including its
    /// `fragment <name> on <type>` header.
    pub fn definition(&self) -> &str {
        self.definition.as_str()
    }

    /// Names of the fragments spread directly within this fragment's
    /// definition, in order of first appearance (duplicates included).
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "...{}", self.name)
    }
}
