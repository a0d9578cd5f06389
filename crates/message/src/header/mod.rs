//! Immutable, case-insensitive header collection.
//!
//! [`Headers`] keeps two co-indexed maps: the canonical name (the spelling a
//! header was first stored under) to its ordered values, and the lowercased
//! name to the canonical name. Lookups go through the lowercase map, while
//! iteration yields the canonical spelling in insertion order.
//!
//! All `with*` methods leave `self` untouched and return a new collection.
//!
//! ```
//! use micro_message::header::Headers;
//!
//! let headers = Headers::new()
//!     .with("Content-Type", ["text/html"])
//!     .with_added("accept", ["text/html"])
//!     .with_added("Accept", [" application/json\t"]);
//!
//! assert_eq!(headers.get("content-type"), ["text/html"]);
//! assert_eq!(headers.get_line("ACCEPT"), "text/html, application/json");
//! assert_eq!(headers.names().collect::<Vec<_>>(), ["Content-Type", "accept"]);
//! ```

use std::collections::HashMap;

use http::{HeaderMap, HeaderName, HeaderValue};
use indexmap::IndexMap;

use crate::protocol::MessageError;

/// Separator used when folding several values into a single line
const LINE_SEPARATOR: &str = ", ";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    /// canonical name -> trimmed values
    values: IndexMap<String, Vec<String>>,
    /// lowercase name -> canonical name
    names: HashMap<String, String>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct header names.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Checks whether a header exists, ignoring case.
    pub fn has(&self, name: &str) -> bool {
        self.names.contains_key(&name.to_ascii_lowercase())
    }

    /// Returns the values of a header, or an empty slice if absent.
    pub fn get(&self, name: &str) -> &[String] {
        self.canonical_name(name)
            .and_then(|canonical| self.values.get(canonical))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns the values of a header joined with `", "`.
    pub fn get_line(&self, name: &str) -> String {
        self.get(name).join(LINE_SEPARATOR)
    }

    /// Returns the spelling a header was first stored under.
    pub fn canonical_name(&self, name: &str) -> Option<&str> {
        self.names.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Iterates canonical header names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Iterates `(canonical name, values)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.values.iter().map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Returns a collection where `name` holds exactly `values`.
    ///
    /// Any header matching `name` case-insensitively is replaced and `name` is
    /// stored as the new canonical spelling.
    #[must_use]
    pub fn with<I, V>(&self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: AsRef<str>,
    {
        let mut new = self.clone();
        new.remove(name);
        new.insert(name, trim_values(values));
        new
    }

    /// Returns a collection where `values` are appended to `name`.
    ///
    /// An existing header keeps its canonical spelling, otherwise this behaves
    /// like [`Headers::with`].
    #[must_use]
    pub fn with_added<I, V>(&self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: AsRef<str>,
    {
        let mut new = self.clone();
        new.append(name, trim_values(values));
        new
    }

    /// Like [`Headers::with`], splitting a comma separated line into values.
    #[must_use]
    pub fn with_line(&self, name: &str, line: &str) -> Self {
        self.with(name, line.split(','))
    }

    /// Like [`Headers::with_added`], splitting a comma separated line into values.
    #[must_use]
    pub fn with_added_line(&self, name: &str, line: &str) -> Self {
        self.with_added(name, line.split(','))
    }

    /// Returns a collection without the header matching `name` case-insensitively.
    #[must_use]
    pub fn without(&self, name: &str) -> Self {
        if !self.has(name) {
            return self.clone();
        }

        let mut new = self.clone();
        new.remove(name);
        new
    }

    fn insert(&mut self, name: &str, values: Vec<String>) {
        self.names.insert(name.to_ascii_lowercase(), name.to_string());
        self.values.insert(name.to_string(), values);
    }

    fn append(&mut self, name: &str, values: Vec<String>) {
        if let Some(canonical) = self.names.get(&name.to_ascii_lowercase()) {
            if let Some(existing) = self.values.get_mut(canonical) {
                existing.extend(values);
            }
            return;
        }
        self.insert(name, values);
    }

    /// Removes both entries of `name`, using the canonical name recorded before the removal.
    fn remove(&mut self, name: &str) {
        if let Some(canonical) = self.names.remove(&name.to_ascii_lowercase()) {
            self.values.shift_remove(&canonical);
        }
    }
}

fn trim_values<I, V>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = V>,
    V: AsRef<str>,
{
    values.into_iter().map(|value| value.as_ref().trim_matches([' ', '\t']).to_string()).collect()
}

/// Collects `(name, value)` pairs, appending repeated names.
impl<N, V> FromIterator<(N, V)> for Headers
where
    N: AsRef<str>,
    V: AsRef<str>,
{
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.append(name.as_ref(), trim_values([value]));
        }
        headers
    }
}

impl From<&HeaderMap> for Headers {
    fn from(map: &HeaderMap) -> Self {
        map.iter().map(|(name, value)| (name.as_str(), String::from_utf8_lossy(value.as_bytes()))).collect()
    }
}

impl TryFrom<&Headers> for HeaderMap {
    type Error = MessageError;

    fn try_from(headers: &Headers) -> Result<Self, Self::Error> {
        let mut map = HeaderMap::with_capacity(headers.len());
        for (name, values) in headers.iter() {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| MessageError::invalid_header(format!("name `{name}`: {e}")))?;

            for value in values {
                let header_value = HeaderValue::from_str(value)
                    .map_err(|e| MessageError::invalid_header(format!("value of `{name}`: {e}")))?;
                map.append(header_name.clone(), header_value);
            }
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty() {
        let headers = Headers::new();

        assert!(headers.is_empty());
        assert!(!headers.has("Host"));
        assert!(headers.get("Host").is_empty());
        assert_eq!(headers.get_line("Host"), "");
    }

    #[test]
    fn lookup_ignores_case() {
        let headers = Headers::new().with("X-Request-Id", ["abc"]);

        for name in ["X-Request-Id", "x-request-id", "X-REQUEST-ID", "x-ReQuEsT-iD"] {
            assert!(headers.has(name));
            assert_eq!(headers.get(name), ["abc"]);
        }
        assert_eq!(headers.canonical_name("x-request-id"), Some("X-Request-Id"));
    }

    #[test]
    fn with_replaces_case_insensitively() {
        let headers = Headers::new().with("Content-Type", ["text/plain"]).with("content-type", ["text/html"]);

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("CONTENT-TYPE"), ["text/html"]);
        assert_eq!(headers.canonical_name("Content-Type"), Some("content-type"));
        assert_eq!(headers.names().collect::<Vec<_>>(), ["content-type"]);
    }

    #[test]
    fn with_trims_space_and_tab() {
        let headers = Headers::new().with("Accept", ["  text/html\t", "\t application/json ", "a b"]);

        assert_eq!(headers.get("accept"), ["text/html", "application/json", "a b"]);
    }

    #[test]
    fn with_added_appends_under_first_seen_name() {
        let headers = Headers::new().with("Set-Cookie", ["a=1"]).with_added("set-cookie", ["b=2", " c=3 "]);

        assert_eq!(headers.get("Set-Cookie"), ["a=1", "b=2", "c=3"]);
        assert_eq!(headers.names().collect::<Vec<_>>(), ["Set-Cookie"]);
    }

    #[test]
    fn with_added_on_missing_behaves_like_with() {
        let headers = Headers::new().with_added("Vary", ["Accept"]);

        assert_eq!(headers, Headers::new().with("Vary", ["Accept"]));
    }

    #[test]
    fn empty_values_are_allowed() {
        let headers = Headers::new().with("X-Empty", Vec::<String>::new());

        assert!(headers.has("x-empty"));
        assert!(headers.get("x-empty").is_empty());
        assert_eq!(headers.get_line("x-empty"), "");
    }

    #[test]
    fn get_line_joins_values() {
        let headers = Headers::new().with("Cache-Control", ["no-cache", "no-store"]);

        assert_eq!(headers.get_line("cache-control"), "no-cache, no-store");
    }

    #[test]
    fn line_folding() {
        let headers = Headers::new().with_line("Accept-Encoding", "gzip, deflate,br");
        assert_eq!(headers.get("accept-encoding"), ["gzip", "deflate", "br"]);

        let headers = headers.with_added_line("ACCEPT-ENCODING", "zstd ,identity");
        assert_eq!(headers.get("accept-encoding"), ["gzip", "deflate", "br", "zstd", "identity"]);
        assert_eq!(headers.get_line("Accept-Encoding"), "gzip, deflate, br, zstd, identity");
    }

    #[test]
    fn without_removes_only_matching_header() {
        let headers = Headers::new().with("Host", ["example.com"]).with("Accept", ["*/*"]).with("X-Trace", ["1"]);

        let removed = headers.without("accept");
        assert!(!removed.has("Accept"));
        assert!(removed.canonical_name("accept").is_none());
        assert_eq!(removed.names().collect::<Vec<_>>(), ["Host", "X-Trace"]);
        assert_eq!(removed.get("host"), ["example.com"]);

        // original is untouched
        assert_eq!(headers.len(), 3);
        assert!(headers.has("Accept"));
    }

    #[test]
    fn without_missing_is_noop() {
        let headers = Headers::new().with("Host", ["example.com"]);

        assert_eq!(headers.without("Accept"), headers);
    }

    #[test]
    fn with_after_case_change_drops_old_spelling() {
        let headers = Headers::new().with("ETag", ["\"a\""]).with("Other", ["x"]).with("etag", ["\"b\""]);

        assert_eq!(headers.names().collect::<Vec<_>>(), ["Other", "etag"]);
        assert_eq!(headers.get("ETAG"), ["\"b\""]);

        let headers = headers.without("ETag");
        assert_eq!(headers.names().collect::<Vec<_>>(), ["Other"]);
    }

    #[test]
    fn mutation_leaves_original_untouched() {
        let original = Headers::new().with("Accept", ["text/html"]);
        let _added = original.with_added("Accept", ["application/json"]);
        let _replaced = original.with("accept", ["*/*"]);

        assert_eq!(original.get("accept"), ["text/html"]);
        assert_eq!(original.canonical_name("accept"), Some("Accept"));
    }

    #[test]
    fn collect_from_pairs() {
        let headers: Headers =
            [("Accept", "text/html"), ("Host", "example.com"), ("accept", " */*")].into_iter().collect();

        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("Accept"), ["text/html", "*/*"]);
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            [("Accept", &["text/html".to_string(), "*/*".to_string()][..]), ("Host", &["example.com".to_string()][..])]
        );
    }

    #[test]
    fn http_header_map_round_trip() {
        let headers = Headers::new().with("Content-Type", ["text/plain"]).with("Set-Cookie", ["a=1", "b=2"]);

        let map = HeaderMap::try_from(&headers).unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map.get(http::header::CONTENT_TYPE), Some(&HeaderValue::from_static("text/plain")));
        assert_eq!(map.get_all(http::header::SET_COOKIE).iter().count(), 2);

        let back = Headers::from(&map);
        assert_eq!(back.get("content-type"), ["text/plain"]);
        assert_eq!(back.get("set-cookie"), ["a=1", "b=2"]);
    }

    #[test]
    fn invalid_header_name_for_http() {
        let headers = Headers::new().with("Bad Name", ["x"]);

        let err = HeaderMap::try_from(&headers).unwrap_err();
        assert!(matches!(err, MessageError::InvalidHeader { .. }));
    }
}
