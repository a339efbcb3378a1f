//! Query strings with index-style array encoding.
//!
//! Keys are emitted in sorted order. A list `tags = [a, b]` becomes
//! `tags[0]=a&tags[1]=b`; an empty list and an absent value are left out, so
//! the server can tell "no filter" from "empty filter". Values are
//! percent-encoded with `application/x-www-form-urlencoded` rules.

use std::collections::BTreeMap;
use std::fmt;

use url::form_urlencoded;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Param {
    Scalar(String),
    List(Vec<String>),
}

/// A query string under construction or parsed from a location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: BTreeMap<String, Param>,
}

impl Query {
    /// An empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a scalar parameter.
    #[must_use]
    pub fn param(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.params
            .insert(key.to_string(), Param::Scalar(value.to_string()));
        self
    }

    /// Sets a scalar parameter when `value` is present.
    #[must_use]
    pub fn opt_param<V: fmt::Display>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.param(key, v),
            None => self,
        }
    }

    /// Sets a list parameter; an empty list is omitted.
    #[must_use]
    pub fn list<S: AsRef<str>>(mut self, key: &str, values: &[S]) -> Self {
        if values.is_empty() {
            self.params.remove(key);
        } else {
            let values = values.iter().map(|v| v.as_ref().to_string()).collect();
            self.params.insert(key.to_string(), Param::List(values));
        }
        self
    }

    /// Parses a query string, with or without the leading `?`.
    ///
    /// Keys of the form `name[i]` are collected into the list `name`, ordered
    /// by index. Later scalar duplicates win.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut scalars: BTreeMap<String, String> = BTreeMap::new();
        let mut lists: BTreeMap<String, BTreeMap<usize, String>> = BTreeMap::new();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match split_index(&key) {
                Some((name, index)) => {
                    lists
                        .entry(name.to_string())
                        .or_default()
                        .insert(index, value.into_owned());
                }
                None => {
                    scalars.insert(key.into_owned(), value.into_owned());
                }
            }
        }

        let mut params: BTreeMap<String, Param> = scalars
            .into_iter()
            .map(|(k, v)| (k, Param::Scalar(v)))
            .collect();
        for (name, items) in lists {
            params.insert(name, Param::List(items.into_values().collect()));
        }
        Self { params }
    }

    /// Scalar value of `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        match self.params.get(key) {
            Some(Param::Scalar(v)) => Some(v),
            _ => None,
        }
    }

    /// List value of `key`; empty when absent.
    #[must_use]
    pub fn get_list(&self, key: &str) -> Vec<String> {
        match self.params.get(key) {
            Some(Param::List(values)) => values.clone(),
            Some(Param::Scalar(v)) => vec![v.clone()],
            None => Vec::new(),
        }
    }

    /// True when no parameter is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Renders the query without the leading `?`.
    #[must_use]
    pub fn encode(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        for (key, param) in &self.params {
            let key = encode_component(key);
            match param {
                Param::Scalar(v) => parts.push(format!("{key}={}", encode_component(v))),
                Param::List(values) => {
                    for (i, v) in values.iter().enumerate() {
                        parts.push(format!("{key}[{i}]={}", encode_component(v)));
                    }
                }
            }
        }
        parts.join("&")
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

fn encode_component(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

fn split_index(key: &str) -> Option<(&str, usize)> {
    let open = key.find('[')?;
    let inner = key[open + 1..].strip_suffix(']')?;
    let index = inner.parse().ok()?;
    Some((&key[..open], index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn keys_are_sorted_and_arrays_indexed() {
        let query = Query::new()
            .param("size", 20)
            .param("p", 0)
            .list("tags", &["a", "b c"])
            .param("onlyProblems", true);
        assert_eq!(
            query.encode(),
            "onlyProblems=true&p=0&size=20&tags[0]=a&tags[1]=b+c"
        );
    }

    #[test]
    fn empty_lists_and_absent_values_are_omitted() {
        let query = Query::new()
            .list::<&str>("tags", &[])
            .opt_param::<&str>("triggerName", None)
            .param("p", 1);
        assert_eq!(query.encode(), "p=1");
    }

    #[test]
    fn values_are_percent_encoded() {
        let query = Query::new().param("contact", "a&b=c@d.ru");
        assert_eq!(query.encode(), "contact=a%26b%3Dc%40d.ru");
    }

    #[test]
    fn parse_collects_lists_by_index() {
        let query = Query::parse("?tags[1]=b&tags[0]=a&page=3&onlyProblems=true");
        assert_eq!(query.get_list("tags"), vec!["a", "b"]);
        assert_eq!(query.get("page"), Some("3"));
        assert!(query.get_list("missing").is_empty());
    }

    #[test]
    fn parse_decodes_encoded_brackets() {
        let query = Query::parse("tags%5B0%5D=x%20y");
        assert_eq!(query.get_list("tags"), vec!["x y"]);
    }

    proptest! {
        #[test]
        fn encode_then_parse_preserves_lists(
            tags in prop::collection::vec("[a-zA-Z0-9 .&=\\[\\]-]{1,12}", 0..6),
            page in 1u32..1000,
        ) {
            let query = Query::new().param("page", page).list("tags", &tags);
            let parsed = Query::parse(&query.encode());
            prop_assert_eq!(parsed.get_list("tags"), tags);
            let page_text = page.to_string();
            prop_assert_eq!(parsed.get("page"), Some(page_text.as_str()));
        }
    }
}
