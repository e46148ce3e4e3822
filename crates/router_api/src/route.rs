use crate::location::{Location, Params, Query, full_path};
use std::collections::BTreeMap;

/// One level of a resolved view hierarchy.
///
/// Records are identified by `path`: two records with the same path are the
/// same route-table record, whichever route snapshot they came from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchedRecord {
    pub path: String,
    pub name: Option<String>,
    /// View per named outlet.
    pub components: BTreeMap<String, String>,
}

impl MatchedRecord {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_component(mut self, outlet: impl Into<String>, view: impl Into<String>) -> Self {
        self.components.insert(outlet.into(), view.into());
        self
    }

    pub fn default_component(&self) -> Option<&str> {
        self.components
            .get(crate::DEFAULT_OUTLET)
            .map(String::as_str)
    }

    pub fn is_same(&self, other: &MatchedRecord) -> bool {
        self.path == other.path
    }
}

/// Resolved navigation snapshot produced by the router.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Route {
    pub name: Option<String>,
    pub path: String,
    pub query: Query,
    pub params: Params,
    pub hash: String,
    pub full_path: String,
    pub matched: Vec<MatchedRecord>,
}

impl Route {
    /// The route a router reports before its first navigation.
    pub fn start() -> Self {
        Self {
            path: "/".into(),
            full_path: "/".into(),
            ..Self::default()
        }
    }

    pub fn new(
        path: impl Into<String>,
        query: Query,
        hash: impl Into<String>,
        matched: Vec<MatchedRecord>,
    ) -> Self {
        let path = path.into();
        let hash = hash.into();
        Self {
            name: None,
            full_path: full_path(&path, &query, &hash),
            path,
            query,
            params: Params::new(),
            hash,
            matched,
        }
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Location that navigates back to this route.
    ///
    /// An empty name is dropped; the path stays authoritative so re-resolving
    /// the location cannot land on a different record.
    pub fn to_location(&self) -> Location {
        Location {
            path: self.path.clone(),
            name: self.name.clone().filter(|n| !n.is_empty()),
            query: self.query.clone(),
            params: self.params.clone(),
            hash: self.hash.clone(),
            replace: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_computes_full_path() {
        let mut query = Query::new();
        query.insert("k".into(), "v".into());
        let route = Route::new("/a", query, "", vec![MatchedRecord::new("/a")]);
        assert_eq!(route.full_path, "/a?k=v");
    }

    #[test]
    fn to_location_drops_empty_name() {
        let route = Route::start().with_name(Some(String::new()));
        assert_eq!(route.to_location().name, None);

        let named = Route::start().with_name(Some("home".into()));
        assert_eq!(named.to_location().name.as_deref(), Some("home"));
    }

    #[test]
    fn records_compare_by_path() {
        let a = MatchedRecord::new("/tabs").with_component("default", "Tabs");
        let b = MatchedRecord::new("/tabs");
        assert!(a.is_same(&b));
        assert_eq!(a.default_component(), Some("Tabs"));
        assert_eq!(b.default_component(), None);
    }
}
