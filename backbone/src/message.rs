use bytes::Bytes;
use serde::Serialize;
use std::collections::BTreeMap;

/// Message headers: each name maps to an ordered list of values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Headers(BTreeMap<String, Vec<String>>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value, keeping any values already present for `name`.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.entry(name.into()).or_default().push(value.into());
    }

    /// Replace all values for `name` with a single value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), vec![value.into()]);
    }

    /// First value for `name`, compared case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .and_then(|(_, values)| values.first())
            .map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Copy of these headers without any entry named `name` (case-insensitive).
    pub fn without(&self, name: &str) -> Headers {
        Headers(
            self.0
                .iter()
                .filter(|(key, _)| !key.eq_ignore_ascii_case(name))
                .map(|(key, values)| (key.clone(), values.clone()))
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// A unit of traffic on the backbone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    pub subject: String,
    /// Reply subject for correlated requests.
    pub reply: Option<String>,
    pub headers: Headers,
    pub data: Bytes,
}

impl Message {
    pub fn new(subject: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            subject: subject.into(),
            reply: None,
            headers: Headers::new(),
            data: data.into(),
        }
    }

    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_reply(mut self, reply: impl Into<String>) -> Self {
        self.reply = Some(reply.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_is_case_insensitive_and_returns_first_value() {
        let mut headers = Headers::new();
        headers.append("Nats-Service-Error-Code", "403");
        headers.append("Nats-Service-Error-Code", "500");

        assert_eq!(headers.get("nats-service-error-code"), Some("403"));
        assert_eq!(headers.get("missing"), None);
    }

    #[test]
    fn insert_replaces_existing_values() {
        let mut headers = Headers::new();
        headers.append("x-trace", "a");
        headers.append("x-trace", "b");
        headers.insert("x-trace", "c");

        let values: Vec<_> = headers.iter().collect();
        assert_eq!(values, vec![("x-trace", &["c".to_string()][..])]);
    }

    #[test]
    fn without_drops_matching_names_only() {
        let mut headers = Headers::new();
        headers.insert("Content-Length", "12");
        headers.insert("x-request-id", "abc");

        let filtered = headers.without("content-length");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.get("x-request-id"), Some("abc"));
    }
}
