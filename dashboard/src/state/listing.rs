use catalog_client::query::FIRST_PAGE;
use catalog_client::{Character, Error, Filters, Gender, Page, QueryKey, QueryOptions, Status};
use getset::Getters;
use std::ops::RangeInclusive;
use std::str::FromStr;
use utils::query::{first_non_empty, parse_query};

/// Number of page links shown around the current page.
pub const MAX_VISIBLE_PAGES: u32 = 5;

pub const EMPTY_MESSAGE: &str = "No characters found matching your criteria";
pub const FAILED_MESSAGE: &str = "Failed to load characters";

/// Listing state as carried by the location's query string.
///
/// Every mutator reports whether anything changed so callers only refetch
/// when needed. Changing the search or any filter returns to the first page.
/// Search text and species are stored trimmed, matching what the catalog
/// client sends.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
#[get = "pub"]
pub struct ListingState {
    page: u32,
    name: String,
    filters: Filters,
}

impl Default for ListingState {
    fn default() -> Self {
        Self {
            page: FIRST_PAGE,
            name: String::new(),
            filters: Filters::default(),
        }
    }
}

impl ListingState {
    /// Accepts a bare query (`page=2&name=rick`), one with a leading `?`, or a
    /// full URL. Invalid pages fall back to the first page and unrecognised
    /// status or gender values are ignored.
    pub fn from_location(location: &str) -> Self {
        let location = location.split('#').next().unwrap_or_default();
        let query = location
            .split_once('?')
            .map(|(_, query)| query)
            .unwrap_or(location);
        let params = parse_query(query);

        let page = first_non_empty(&params, "page")
            .and_then(|page| page.parse::<u32>().ok())
            .filter(|page| *page >= FIRST_PAGE)
            .unwrap_or(FIRST_PAGE);
        let name = first_non_empty(&params, "name").unwrap_or_default();
        let status = first_non_empty(&params, "status").and_then(|value| Status::from_str(value).ok());
        let gender = first_non_empty(&params, "gender").and_then(|value| Gender::from_str(value).ok());
        let species = first_non_empty(&params, "species");

        Self {
            page,
            name: name.to_string(),
            filters: Filters::default()
                .with_status(status)
                .with_gender(gender)
                .with_species(species),
        }
    }

    /// Canonical query string for this state, with a leading `?`.
    pub fn to_location(&self) -> String {
        format!("?{}", QueryKey::from_options(&self.options()))
    }

    pub fn options(&self) -> QueryOptions {
        QueryOptions::new(self.page, &self.name, self.filters.clone())
    }

    pub fn search(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name == self.name {
            return false;
        }
        self.name = name.to_string();
        self.page = FIRST_PAGE;
        true
    }

    pub fn go_to_page(&mut self, page: u32) -> bool {
        if page < FIRST_PAGE || page == self.page {
            return false;
        }
        self.page = page;
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.page.saturating_add(1))
    }

    pub fn prev_page(&mut self) -> bool {
        self.go_to_page(self.page.saturating_sub(1))
    }

    /// Select `status`, or clear it if it is already selected.
    pub fn toggle_status(&mut self, status: Status) -> bool {
        let next = (self.filters.status() != &Some(status)).then_some(status);
        self.set_filters(self.filters.clone().with_status(next))
    }

    pub fn toggle_gender(&mut self, gender: Gender) -> bool {
        let next = (self.filters.gender() != &Some(gender)).then_some(gender);
        self.set_filters(self.filters.clone().with_gender(next))
    }

    pub fn toggle_species(&mut self, species: &str) -> bool {
        let species = species.trim();
        let selected = self.filters.species().as_deref() == Some(species);
        let next = (!selected).then_some(species);
        self.set_filters(self.filters.clone().with_species(next))
    }

    pub fn clear_filters(&mut self) -> bool {
        self.set_filters(Filters::default())
    }

    fn set_filters(&mut self, filters: Filters) -> bool {
        if filters == self.filters {
            return false;
        }
        self.filters = filters;
        self.page = FIRST_PAGE;
        true
    }
}

/// Page links to show for a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    pub pages: RangeInclusive<u32>,
    pub current: u32,
    pub has_prev: bool,
    pub has_next: bool,
}

impl PageWindow {
    /// `None` when there is at most one page and no navigation is needed.
    pub fn new(current: u32, total: u32, max_visible: u32) -> Option<Self> {
        if total <= 1 {
            return None;
        }

        let max_visible = max_visible.max(1);
        let start = current.saturating_sub(max_visible / 2).max(FIRST_PAGE);
        let end = start.saturating_add(max_visible - 1).min(total);

        Some(Self {
            pages: start..=end,
            current,
            has_prev: current > FIRST_PAGE,
            has_next: current < total,
        })
    }
}

/// What the listing shows after a fetch settles. "Nothing matched" and
/// "the fetch failed" are deliberately separate states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingView {
    Loaded {
        characters: Vec<Character>,
        total_pages: u32,
    },
    Empty,
    Failed {
        reason: String,
    },
}

impl ListingView {
    pub fn from_result(result: Result<Page, Error>) -> Self {
        match result {
            Ok(page) if page.is_empty() => ListingView::Empty,
            Ok(page) => ListingView::Loaded {
                total_pages: page.info.pages,
                characters: page.results,
            },
            Err(err) => {
                log::error!("Error fetching characters: {}", err);
                ListingView::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }

    /// Message to show in place of the table, if any.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            ListingView::Loaded { .. } => None,
            ListingView::Empty => Some(EMPTY_MESSAGE),
            ListingView::Failed { .. } => Some(FAILED_MESSAGE),
        }
    }

    pub fn total_pages(&self) -> u32 {
        match self {
            ListingView::Loaded { total_pages, .. } => *total_pages,
            _ => 0,
        }
    }

    pub fn characters(&self) -> &[Character] {
        match self {
            ListingView::Loaded { characters, .. } => characters,
            _ => &[],
        }
    }
}
