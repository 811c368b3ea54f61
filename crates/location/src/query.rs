// Query string encoding for persisted state.
//
// Standard form encoding escapes `~` as `%7E`. The persisted text uses `~`
// as its line delimiter, so that one escape is undone after encoding to keep
// shared links short and readable.

use mannsum_core::PersistedState;
use url::form_urlencoded;

const ENCODED_DELIMITER: &str = "%7E";

/// Encode every parameter (without a leading `?`).
pub fn encode(state: &PersistedState) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in state.iter() {
        serializer.append_pair(key, value);
    }
    serializer.finish().replace(ENCODED_DELIMITER, "~")
}

/// `?`-prefixed form of [`encode`], or `""` for an empty state.
pub fn to_search(state: &PersistedState) -> String {
    if state.is_empty() {
        return String::new();
    }
    format!("?{}", encode(state))
}

/// Decode a query string, with or without its leading `?`.
/// Duplicate keys resolve to the last occurrence.
pub fn decode(query: &str) -> PersistedState {
    let query = query.strip_prefix('?').unwrap_or(query);
    form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// Pull the query portion out of a full URL, a path with a query, or a
/// bare query string. Any `#fragment` is dropped.
pub fn query_of(input: &str) -> &str {
    let input = input.trim();
    let without_fragment = match input.find('#') {
        Some(pos) => &input[..pos],
        None => input,
    };
    match without_fragment.find('?') {
        Some(pos) => &without_fragment[pos + 1..],
        None => without_fragment,
    }
}
