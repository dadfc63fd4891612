pub mod filters;
pub mod gender;
pub mod status;

use filters::Filters;
use getset::Getters;

/// First page of any listing.
pub const FIRST_PAGE: u32 = 1;

/// Everything that shapes a single character listing request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters)]
#[get = "pub"]
pub struct QueryOptions {
    page: u32,
    name: String,
    filters: Filters,
}

impl QueryOptions {
    /// Page `0` is read as the first page.
    ///
    /// The name is trimmed before it is sent: `" morty "` goes out as
    /// `name=morty` and shares a key with `"morty"`, and a blank name means
    /// no name filter. The catalog matches names by substring, so stray
    /// whitespace from a search box would only narrow or break the match.
    pub fn new(page: u32, name: &str, filters: Filters) -> Self {
        Self {
            page: page.max(FIRST_PAGE),
            name: name.trim().to_string(),
            filters,
        }
    }
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self::new(FIRST_PAGE, "", Filters::default())
    }
}
