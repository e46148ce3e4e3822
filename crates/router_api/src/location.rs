use crate::error::LocationError;
use std::collections::BTreeMap;
use url::{Url, form_urlencoded};

pub type Query = BTreeMap<String, String>;
pub type Params = BTreeMap<String, String>;

const BASE: &str = "http://localhost/";

/// A navigation target as handed to the router.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub name: Option<String>,
    pub query: Query,
    pub params: Params,
    /// Fragment without the leading `#`.
    pub hash: String,
    /// Only meaningful on guard redirects: replace instead of push.
    pub replace: bool,
}

impl Location {
    pub fn path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = hash.into();
        self
    }

    /// Parse a path-relative URL such as `/a/b?x=1#top`.
    ///
    /// Repeated query keys keep the last value.
    pub fn parse(input: &str) -> Result<Self, LocationError> {
        let invalid = |source| LocationError::Invalid {
            input: input.to_string(),
            source,
        };
        let base = Url::parse(BASE).map_err(invalid)?;
        let url = base.join(input).map_err(invalid)?;

        Ok(Self {
            path: url.path().to_string(),
            name: None,
            query: url.query_pairs().into_owned().collect(),
            params: Params::new(),
            hash: url.fragment().unwrap_or_default().to_string(),
            replace: false,
        })
    }

    /// `path?query#hash`, query keys in sorted order.
    pub fn full_path(&self) -> String {
        full_path(&self.path, &self.query, &self.hash)
    }
}

pub(crate) fn full_path(path: &str, query: &Query, hash: &str) -> String {
    let mut out = String::from(path);
    if !query.is_empty() {
        out.push('?');
        out.push_str(
            &form_urlencoded::Serializer::new(String::new())
                .extend_pairs(query.iter())
                .finish(),
        );
    }
    if !hash.is_empty() {
        out.push('#');
        out.push_str(hash);
    }
    out
}
