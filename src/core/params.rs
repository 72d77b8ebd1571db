//! Parameter-to-query encoding.
//!
//! Tools hand their named parameters to [`QueryParams`], which normalises
//! textual values (trim, lower-case), drops blanks, comma-joins lists and
//! keeps insertion order. Credentials and opaque identifiers go through
//! [`QueryParams::raw`] so they are never case-folded.

use std::fmt::Display;

use serde::Serialize;
use serde_json::{Map, Value};

use super::fetch::{FetchError, parse_url};

/// Ordered `(key, value)` pairs destined for a query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode every field of a serialisable parameter struct.
    ///
    /// Strings are normalised like [`text`](Self::text), arrays like
    /// [`list`](Self::list), numbers and booleans pass through, `null` and
    /// nested objects are dropped.
    pub fn from_params<T: Serialize>(params: &T) -> Self {
        match serde_json::to_value(params) {
            Ok(Value::Object(map)) => Self::from_object(&map),
            _ => Self::new(),
        }
    }

    /// Same as [`from_params`](Self::from_params) for an argument object.
    pub fn from_object(map: &Map<String, Value>) -> Self {
        let mut params = Self::new();
        for (key, value) in map {
            params.push_value(key, value);
        }
        params
    }

    fn push_value(&mut self, key: &str, value: &Value) {
        match value {
            Value::String(s) => self.push_text(key, s),
            Value::Array(items) => self.push_list(key, items.iter().filter_map(scalar_text)),
            Value::Number(n) => self.push_raw(key, &n.to_string()),
            Value::Bool(b) => self.push_raw(key, if *b { "true" } else { "false" }),
            Value::Null | Value::Object(_) => {}
        }
    }

    pub fn text(mut self, key: &str, value: &str) -> Self {
        self.push_text(key, value);
        self
    }

    pub fn opt_text(mut self, key: &str, value: Option<&str>) -> Self {
        if let Some(value) = value {
            self.push_text(key, value);
        }
        self
    }

    pub fn list<I, S>(mut self, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.push_list(key, values);
        self
    }

    pub fn number<N: Display>(mut self, key: &str, value: Option<N>) -> Self {
        if let Some(value) = value {
            self.push_raw(key, &value.to_string());
        }
        self
    }

    pub fn flag(mut self, key: &str, value: Option<bool>) -> Self {
        if let Some(value) = value {
            self.push_raw(key, if value { "true" } else { "false" });
        }
        self
    }

    pub fn raw(mut self, key: &str, value: &str) -> Self {
        self.push_raw(key, value);
        self
    }

    pub fn opt_raw(mut self, key: &str, value: Option<&str>) -> Self {
        if let Some(value) = value {
            self.push_raw(key, value);
        }
        self
    }

    pub fn push_text(&mut self, key: &str, value: &str) {
        if let Some(value) = normalize(value) {
            self.pairs.push((key.to_string(), value));
        }
    }

    pub fn push_list<I, S>(&mut self, key: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = values
            .into_iter()
            .filter_map(|v| normalize(v.as_ref()))
            .collect::<Vec<_>>()
            .join(",");
        if !joined.is_empty() {
            self.pairs.push((key.to_string(), joined));
        }
    }

    pub fn push_raw(&mut self, key: &str, value: &str) {
        let value = value.trim();
        if !value.is_empty() {
            self.pairs.push((key.to_string(), value.to_string()));
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `application/x-www-form-urlencoded` rendering, in insertion order.
    pub fn encode(&self) -> Result<String, FetchError> {
        serde_urlencoded::to_string(&self.pairs).map_err(|e| FetchError::InvalidUrl(e.to_string()))
    }

    /// `base` with the encoded query appended. No `?` when empty.
    pub fn url_for(&self, base: &str) -> Result<String, FetchError> {
        if self.is_empty() {
            return Ok(base.to_string());
        }
        let separator = if base.contains('?') { '&' } else { '?' };
        Ok(format!("{base}{separator}{}", self.encode()?))
    }
}

/// Trim and lower-case; `None` when nothing is left.
pub fn normalize(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Append percent-encoded path segments to `base`.
pub fn join_path(base: &str, segments: &[&str]) -> Result<String, FetchError> {
    let mut url = parse_url(base)?;
    url.path_segments_mut()
        .map_err(|_| FetchError::InvalidUrl(format!("{base}: cannot carry a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url.to_string())
}
