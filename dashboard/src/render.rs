//! Plain-text output for the terminal.

use crate::state::listing::{ListingState, ListingView, PageWindow, MAX_VISIBLE_PAGES};
use catalog_client::{Character, Episode};
use std::fmt::Write;

pub fn listing(state: &ListingState, view: &ListingView) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Page {} of {} | {} characters | {}",
        state.page(),
        view.total_pages(),
        view.characters().len(),
        state.to_location()
    );

    if let Some(message) = view.message() {
        let _ = writeln!(out, "{}", message);
        if let ListingView::Failed { reason } = view {
            let _ = writeln!(out, "  {}", reason);
        }
        return out;
    }

    for character in view.characters() {
        let _ = writeln!(out, "{}", row(character));
    }

    if let Some(window) = PageWindow::new(*state.page(), view.total_pages(), MAX_VISIBLE_PAGES) {
        let _ = writeln!(out, "{}", pagination(&window));
    }
    out
}

pub fn row(character: &Character) -> String {
    format!(
        "#{:<4} {:<32} {:<8} {:<16} {:<11} {}",
        character.id,
        character.name,
        character.status,
        character.species,
        character.gender,
        character.location.name
    )
}

pub fn pagination(window: &PageWindow) -> String {
    let mut links: Vec<String> = vec![];
    if window.has_prev {
        links.push("< prev".to_string());
    }
    for page in window.pages.clone() {
        if page == window.current {
            links.push(format!("[{}]", page));
        } else {
            links.push(page.to_string());
        }
    }
    if window.has_next {
        links.push("next >".to_string());
    }
    links.join(" ")
}

pub fn detail(character: &Character, episodes: Option<&[Episode]>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", character.name);
    let _ = writeln!(
        out,
        "  {} | {} | {}",
        character.status, character.species, character.gender
    );
    let _ = writeln!(out, "  Origin:   {}", character.origin.name);
    let _ = writeln!(out, "  Location: {}", character.location.name);
    let _ = writeln!(out, "  Episodes: {}", character.episode_count());

    match episodes {
        Some(episodes) => {
            for episode in episodes {
                let _ = writeln!(out, "    {:<7} {}", episode.episode, episode.name);
            }
        }
        None => {
            let _ = writeln!(out, "    (episode details unavailable)");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_marks_current_page() {
        let window = PageWindow::new(2, 3, MAX_VISIBLE_PAGES).unwrap();
        assert_eq!(pagination(&window), "< prev 1 [2] 3 next >");
    }

    #[test]
    fn test_empty_listing_shows_message_instead_of_rows() {
        let state = ListingState::from_location("?name=zzzznonexistent");
        let out = listing(&state, &ListingView::Empty);

        assert!(out.starts_with("Page 1 of 0 | 0 characters | ?page=1&name=zzzznonexistent"));
        assert!(out.contains(crate::state::listing::EMPTY_MESSAGE));
    }
}
