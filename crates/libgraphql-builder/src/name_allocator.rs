use std::collections::HashMap;

const DERIVED_NAME_PREFIX: &str = "Fragment";

/// Chooses names for newly registered fragments.
///
/// Names derived from a type condition (`FragmentUser` for `on User`) are
/// collision-prone, so when a derived name is already taken the allocator
/// appends a per-name occurrence counter: `FragmentUser1`, `FragmentUser2`,
/// and so on. Explicit names and names embedded in raw definition text are
/// used as-is; registering one of those twice replaces the earlier fragment.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct NameAllocator {
    occurrences: HashMap<String, usize>,
}

impl NameAllocator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn allocate(
        &mut self,
        explicit_name: Option<&str>,
        type_condition: Option<&str>,
        raw_definition: Option<&str>,
        is_taken: impl Fn(&str) -> bool,
    ) -> Option<String> {
        if let Some(name) = explicit_name {
            return Some(name.to_string());
        }

        if let Some(type_name) = type_condition {
            let candidate = format!("{DERIVED_NAME_PREFIX}{type_name}");
            return Some(self.disambiguate(candidate, is_taken));
        }

        raw_definition
            .and_then(crate::extract_fragment_name)
            .map(str::to_string)
    }

    pub(crate) fn reset(&mut self) {
        self.occurrences.clear();
    }

    fn disambiguate(
        &mut self,
        candidate: String,
        is_taken: impl Fn(&str) -> bool,
    ) -> String {
        if !is_taken(&candidate) {
            return candidate;
        }

        let counter = self.occurrences.entry(candidate.to_owned()).or_insert(0);
        loop {
            *counter += 1;
            let suffixed = format!("{candidate}{counter}");
            if !is_taken(&suffixed) {
                log::debug!(
                    "Fragment name `{candidate}` is already registered; \
                    using `{suffixed}` instead."
                );
                return suffixed;
            }
        }
    }
}
