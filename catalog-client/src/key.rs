use crate::query::QueryOptions;
use std::fmt;
use utils::query::encode_pairs;

/// Canonical encoding of the effective listing parameters.
///
/// Parameters always appear in the order `page, name, status, gender, species`
/// and empty ones are left out, so two requests with the same effective
/// parameters share a key. The key is also the outbound query string.
#[derive(Hash, Eq, PartialEq, Clone, Debug)]
pub struct QueryKey(String);

impl QueryKey {
    pub fn from_options(options: &QueryOptions) -> Self {
        let page = options.page().to_string();
        let filters = options.filters();

        let mut pairs: Vec<(&str, &str)> = vec![("page", page.as_str())];
        if !options.name().is_empty() {
            pairs.push(("name", options.name().as_str()));
        }
        if let Some(status) = filters.status() {
            pairs.push(("status", status.query_value()));
        }
        if let Some(gender) = filters.gender() {
            pairs.push(("gender", gender.query_value()));
        }
        if let Some(species) = filters.species() {
            pairs.push(("species", species.as_str()));
        }

        QueryKey(encode_pairs(pairs))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
