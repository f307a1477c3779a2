use std::fmt::Display;

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Insertion ordered query parameters of a factory location.
///
/// Keys may repeat. Values are stored decoded and encoded again as
/// `application/x-www-form-urlencoded` on display.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchParams {
    pairs: Vec<(String, String)>,
}

impl SearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a query string, a leading `?` or `&` is ignored.
    pub fn parse(query: &str) -> Self {
        let query = query
            .strip_prefix('?')
            .or_else(|| query.strip_prefix('&'))
            .unwrap_or(query);
        let pairs = form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();
        Self { pairs }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn has(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Sets `key` to `value`.
    ///
    /// The first occurrence keeps its position, later duplicates are removed.
    /// An absent key is appended.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter().position(|(k, _)| *k == key) {
            Some(ix) => {
                self.pairs[ix].1 = value;
                let mut seen = 0;
                self.pairs.retain(|(k, _)| {
                    if *k != key {
                        return true;
                    }
                    seen += 1;
                    seen == 1
                });
            }
            None => self.pairs.push((key, value)),
        }
    }

    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Removes every occurrence of `key`, returns whether anything was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        let len = self.pairs.len();
        self.pairs.retain(|(k, _)| k != key);
        len != self.pairs.len()
    }

    /// Renames every occurrence of `from` to `to`, keeping positions.
    pub fn rename(&mut self, from: &str, to: &str) {
        for (k, _) in self.pairs.iter_mut().filter(|(k, _)| k == from) {
            *k = to.to_owned();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Display for SearchParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish();
        write!(f, "{encoded}")
    }
}

impl<K, V> FromIterator<(K, V)> for SearchParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let pairs = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self { pairs }
    }
}
