//! Query parameter types

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// How a query parameter value is written into the URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamEncoding {
    /// Percent-encode the value (form-urlencoded byte serialization).
    #[default]
    Encode,
    /// The caller already encoded the value; append it byte for byte.
    ///
    /// Used to catch double-decoding bugs, e.g. sending the literal `%25`.
    Verbatim,
}

/// A single query parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParam {
    /// Parameter name. Always encoded.
    pub name: String,
    /// Parameter value.
    pub value: String,
    /// Encoding applied to `value`.
    #[serde(default)]
    pub encoding: ParamEncoding,
}

impl QueryParam {
    /// Creates a parameter whose value will be percent-encoded.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            encoding: ParamEncoding::Encode,
        }
    }

    /// Creates a parameter whose value is already encoded.
    #[must_use]
    pub fn verbatim(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            encoding: ParamEncoding::Verbatim,
        }
    }

    /// Creates a parameter with an explicit encoding.
    #[must_use]
    pub fn with_encoding(
        name: impl Into<String>,
        value: impl Into<String>,
        encoding: ParamEncoding,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            encoding,
        }
    }

    /// Renders `name=value` as it appears on the wire.
    #[must_use]
    pub fn render(&self) -> String {
        let name: String = form_urlencoded::byte_serialize(self.name.as_bytes()).collect();
        match self.encoding {
            ParamEncoding::Encode => {
                let value: String = form_urlencoded::byte_serialize(self.value.as_bytes()).collect();
                format!("{name}={value}")
            }
            ParamEncoding::Verbatim => format!("{name}={}", self.value),
        }
    }
}

/// Ordered collection of query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryParams {
    items: Vec<QueryParam>,
}

impl QueryParams {
    /// Creates an empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Appends a parameter.
    pub fn add(&mut self, param: QueryParam) {
        self.items.push(param);
    }

    /// Returns the parameters in insertion order.
    #[must_use]
    pub fn all(&self) -> &[QueryParam] {
        &self.items
    }

    /// Returns the first parameter with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&QueryParam> {
        self.items.iter().find(|p| p.name == name)
    }

    /// Returns the number of parameters.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there are no parameters.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Renders the query string without the leading `?`.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        self.items
            .iter()
            .map(QueryParam::render)
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl FromIterator<QueryParam> for QueryParams {
    fn from_iter<T: IntoIterator<Item = QueryParam>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
