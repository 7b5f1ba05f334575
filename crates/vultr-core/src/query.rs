//! Ordered query parameter builder.
//!
//! Handlers collect list options and resource filters here; the transport
//! appends the pairs to the request URL in insertion order.

use std::fmt::Display;

/// Key/value pairs destined for a request query string.
pub type QueryPairs = Vec<(&'static str, String)>;

/// Builder for assembling query parameter pairs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QueryParams {
    pairs: QueryPairs,
}

impl QueryParams {
    /// Create a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append a required key/value pair.
    pub fn push<T>(&mut self, key: &'static str, value: T)
    where
        T: Display,
    {
        self.pairs.push((key, value.to_string()));
    }

    /// Append a key/value pair when the value is present.
    pub fn push_opt<T>(&mut self, key: &'static str, value: Option<T>)
    where
        T: Display,
    {
        if let Some(value) = value {
            self.push(key, value);
        }
    }

    /// Append a string value unless it is absent or empty.
    ///
    /// The API treats an empty filter the same as a missing one, so empty
    /// strings are never sent.
    pub fn push_non_empty(&mut self, key: &'static str, value: Option<&str>) {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.pairs.push((key, value.to_string()));
        }
    }

    /// Append all pairs from another builder, keeping their order.
    pub fn extend(&mut self, other: QueryParams) {
        self.pairs.extend(other.pairs);
    }

    /// Return the collected key/value pairs.
    #[must_use]
    pub fn into_pairs(self) -> QueryPairs {
        self.pairs
    }

    /// Returns true if no parameters have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::QueryParams;

    #[test]
    fn push_opt_skips_none() {
        let mut params = QueryParams::new();
        params.push_opt("per_page", Option::<u32>::None);
        assert!(params.is_empty());
    }

    #[test]
    fn push_non_empty_skips_blank_strings() {
        let mut params = QueryParams::new();
        params.push_non_empty("cursor", Some(""));
        params.push_non_empty("label", None);
        params.push_non_empty("tag", Some("web"));
        assert_eq!(params.into_pairs(), vec![("tag", "web".to_string())]);
    }

    #[test]
    fn extend_preserves_order() {
        let mut first = QueryParams::new();
        first.push("per_page", 10);
        let mut second = QueryParams::new();
        second.push("type", "vc2");
        first.extend(second);
        assert_eq!(
            first.into_pairs(),
            vec![("per_page", "10".to_string()), ("type", "vc2".to_string())]
        );
    }
}
