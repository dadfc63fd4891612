//! Query-string helpers shared by the client and the dashboard.

use multimap::MultiMap;
use url::form_urlencoded;

/// Decode a query string into its parameters. A leading `?` is accepted and
/// repeated keys keep every value in order of appearance.
pub fn parse_query(query: &str) -> MultiMap<String, String> {
    let query = query.strip_prefix('?').unwrap_or(query);
    form_urlencoded::parse(query.as_bytes())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}

/// First value of `key` that is not blank.
pub fn first_non_empty<'a>(params: &'a MultiMap<String, String>, key: &str) -> Option<&'a str> {
    params
        .get_vec(key)?
        .iter()
        .map(|value| value.trim())
        .find(|value| !value.is_empty())
}

/// Encode the given pairs, in order, as a form-urlencoded query string.
pub fn encode_pairs<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}
