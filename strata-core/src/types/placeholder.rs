//! The base placeholder map: token spelling -> replacement value.

use rustc_hash::FxHashMap;

/// Placeholder pairs with case-insensitive keys.
///
/// Keys are full token spellings including the delimiters (`@schema@`,
/// `@max_len%type@`) and are normalized to lowercase at insertion. The map
/// is immutable once built; per-load magic constants live in a separate
/// overlay so shared state is never mutated.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderMap {
    map: FxHashMap<String, String>,
}

impl PlaceholderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from (token, value) pairs, lowercasing keys.
    /// Later pairs win when two keys collide case-insensitively.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut map = FxHashMap::default();
        for (key, value) in pairs {
            map.insert(key.as_ref().to_lowercase(), value.into());
        }
        Self { map }
    }

    /// Look up a token found in source, case-insensitively.
    pub fn resolve(&self, token: &str) -> Option<&str> {
        self.map.get(&token.to_lowercase()).map(String::as_str)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.map.contains_key(&token.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
