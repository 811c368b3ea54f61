use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Query parameter holding the working text in persisted form.
pub const TEXT_KEY: &str = "text";

/// Parameter map mirrored into the location's query string.
///
/// Keys other than `text` are carried through untouched. Ordering is the
/// map's key order, so two equal states always serialize the same way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersistedState {
    params: BTreeMap<String, String>,
}

impl PersistedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State holding only `text`
    pub fn with_text(persisted: impl Into<String>) -> Self {
        let mut state = Self::new();
        state.set_text(persisted);
        state
    }

    /// Persisted-form text, or `""` when the key is absent
    pub fn text(&self) -> &str {
        self.params.get(TEXT_KEY).map(String::as_str).unwrap_or("")
    }

    pub fn has_text(&self) -> bool {
        self.params.contains_key(TEXT_KEY)
    }

    pub fn set_text(&mut self, persisted: impl Into<String>) {
        self.params.insert(TEXT_KEY.to_string(), persisted.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Insert a parameter; later inserts of the same key win
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Guarantee the `text` key exists, defaulting it to `""`.
    pub fn normalize(&mut self) {
        if !self.has_text() {
            self.set_text("");
        }
    }

    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PersistedState {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut state = Self::new();
        for (k, v) in iter {
            state.insert(k, v);
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_text_reads_as_empty() {
        let state = PersistedState::new();
        assert_eq!(state.text(), "");
        assert!(!state.has_text());
    }

    #[test]
    fn normalize_adds_text_key() {
        let state: PersistedState = [("zoom", "2")].into_iter().collect();
        let state = state.normalized();
        assert!(state.has_text());
        assert_eq!(state.text(), "");
        assert_eq!(state.get("zoom"), Some("2"));
    }

    #[test]
    fn normalize_keeps_existing_text() {
        let mut state = PersistedState::with_text("1~2");
        state.normalize();
        assert_eq!(state.text(), "1~2");
    }

    #[test]
    fn last_insert_wins() {
        let state: PersistedState = [("text", "1"), ("text", "2")].into_iter().collect();
        assert_eq!(state.text(), "2");
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn serializes_as_plain_map() {
        let state: PersistedState = [("text", "1~2"), ("a", "b")].into_iter().collect();
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"a":"b","text":"1~2"}"#);
        let back: PersistedState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
