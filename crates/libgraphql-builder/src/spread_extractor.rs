use memchr::memmem;

const FRAGMENT_KEYWORD: &[u8] = b"fragment";
const INLINE_FRAGMENT_MARKER: &str = "on";
const SPREAD_TOKEN: &[u8] = b"...";

/// Returns the names of all named fragment spreads (`...Name`) found in
/// `text`, in order of appearance and including duplicates.
///
/// Only a name that immediately follows the `...` token counts as a spread.
/// Inline fragments (`...on Type { ... }` and `... on Type { ... }`) are not
/// references to a named fragment and are skipped. A fragment whose name
/// merely begins with `on` (e.g. `...onlineFields`) is still tracked.
///
/// ```
/// use libgraphql_builder::extract_fragment_spreads;
///
/// let spreads = extract_fragment_spreads(
///     "{ ...UserFields ...on Post { id } ...UserFields }",
/// );
/// assert_eq!(spreads, vec!["UserFields", "UserFields"]);
/// ```
pub fn extract_fragment_spreads(text: &str) -> Vec<String> {
    let bytes = text.as_bytes();
    let mut spreads = vec![];
    let mut search_from = 0;

    while let Some(offset) = memmem::find(&bytes[search_from..], SPREAD_TOKEN) {
        let token_start = search_from + offset;
        let name_start = token_start + SPREAD_TOKEN.len();
        let name_end = scan_name_continue(bytes, name_start);

        if name_end == name_start {
            // No name right after the dots. Resume one byte later so that
            // runs like `....Foo` still find `...Foo`.
            search_from = token_start + 1;
            continue;
        }

        let name = &text[name_start..name_end];
        if name != INLINE_FRAGMENT_MARKER {
            spreads.push(name.to_string());
        }
        search_from = name_end;
    }

    spreads
}

/// Returns the fragment name declared by the first `fragment <Name>` header
/// in `text`, if there is one.
///
/// The name must start with `_` or an ASCII letter and must be followed by
/// whitespace (i.e. `fragment Name on Type`).
pub fn extract_fragment_name(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    memmem::find_iter(bytes, FRAGMENT_KEYWORD).find_map(|keyword_start| {
        let mut name_start = keyword_start + FRAGMENT_KEYWORD.len();
        while bytes.get(name_start).is_some_and(u8::is_ascii_whitespace) {
            name_start += 1;
        }

        if !bytes.get(name_start).is_some_and(|b| is_name_start(*b)) {
            return None;
        }

        let name_end = scan_name_continue(bytes, name_start + 1);
        bytes.get(name_end)
            .is_some_and(u8::is_ascii_whitespace)
            .then(|| &text[name_start..name_end])
    })
}

/// Whether `text` already carries its own `fragment <Name> ...` header and
/// should therefore be registered verbatim.
pub(crate) fn has_fragment_header(text: &str) -> bool {
    text.trim_start().as_bytes().starts_with(FRAGMENT_KEYWORD)
        && extract_fragment_name(text).is_some()
}

fn is_name_start(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphabetic()
}

fn is_name_continue(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphanumeric()
}

/// Returns the index just past the run of name characters starting at
/// `start`.
fn scan_name_continue(bytes: &[u8], start: usize) -> usize {
    bytes[start..]
        .iter()
        .position(|b| !is_name_continue(*b))
        .map_or(bytes.len(), |len| start + len)
}
