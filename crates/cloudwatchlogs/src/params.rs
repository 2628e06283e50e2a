//! Flat parameter map for Query-protocol requests.
//!
//! Every request body is a set of `key=value` pairs. Nested lists use the
//! indexed-member convention `<Field>.member.<n>.<SubField>` with `n`
//! counting from 1 in list order.

use crate::signing::uri_encode;
use std::collections::BTreeMap;

/// Wire key carrying the operation name.
pub const ACTION_KEY: &str = "Action";
/// Wire key carrying the protocol version.
pub const VERSION_KEY: &str = "Version";
/// CloudWatch Logs Query API version.
pub const API_VERSION: &str = "2014-03-28";

/// Ordered string-to-string parameter map with an `Action` and `Version`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    inner: BTreeMap<String, String>,
}

impl QueryParams {
    /// Start a parameter set for `action`.
    pub fn new(action: &str) -> Self {
        let mut inner = BTreeMap::new();
        inner.insert(ACTION_KEY.to_string(), action.to_string());
        inner.insert(VERSION_KEY.to_string(), API_VERSION.to_string());
        Self { inner }
    }

    pub fn action(&self) -> &str {
        self.inner.get(ACTION_KEY).map(String::as_str).unwrap_or_default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.insert(key.into(), value.into());
    }

    /// Insert `value` unless it is empty; an empty string means "unset".
    pub fn insert_non_empty(&mut self, key: &str, value: &str) {
        if !value.is_empty() {
            self.insert(key, value);
        }
    }

    /// Insert a decimal integer when present.
    pub fn insert_opt_num<N: ToString>(&mut self, key: &str, value: Option<N>) {
        if let Some(v) = value {
            self.insert(key, v.to_string());
        }
    }

    /// Encode `items` under `<field>.member.<n>`, calling `encode` with the
    /// element prefix of each item. Indices start at 1.
    pub fn insert_members<T, F>(&mut self, field: &str, items: &[T], mut encode: F)
    where
        F: FnMut(&mut Self, &str, &T),
    {
        for (i, item) in items.iter().enumerate() {
            let prefix = member_prefix(field, i + 1);
            encode(self, &prefix, item);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The `application/x-www-form-urlencoded` body for these parameters.
    pub fn to_form_body(&self) -> String {
        self.inner
            .iter()
            .map(|(k, v)| format!("{}={}", uri_encode(k), uri_encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<'a> IntoIterator for &'a QueryParams {
    type Item = (&'a String, &'a String);
    type IntoIter = std::collections::btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

/// `<field>.member.<index>`.
pub fn member_prefix(field: &str, index: usize) -> String {
    format!("{}.member.{}", field, index)
}
