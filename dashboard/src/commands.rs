use crate::models::context::ContextPointer;
use crate::render;
use crate::state::debounce::SearchBox;
use crate::state::listing::{ListingState, ListingView};
use catalog_client::{Gender, Status};
use std::str::FromStr;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;

/// Sleep used while no search text is waiting to settle.
const IDLE_WAIT: Duration = Duration::from_secs(3600);

pub async fn list(context: ContextPointer, location: &str) {
    let state = ListingState::from_location(location);
    let result = context
        .catalog_client()
        .fetch_options(&state.options())
        .await;
    let view = ListingView::from_result(result);
    print!("{}", render::listing(&state, &view));
}

pub async fn show(context: ContextPointer, id: u32) -> Result<(), catalog_client::Error> {
    let client = context.catalog_client();
    let character = client.fetch_character(id).await?;

    let episodes = match client.fetch_episodes(&character).await {
        Ok(episodes) => Some(episodes),
        Err(err) => {
            log::warn!("Could not load episodes for {}: {}", character.name, err);
            None
        }
    };

    print!("{}", render::detail(&character, episodes.as_deref()));
    Ok(())
}

/// One line typed into the interactive search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Text(String),
    Page(u32),
    Next,
    Prev,
    Status(Status),
    Gender(Gender),
    Species(String),
    ClearFilters,
    Invalid(String),
}

impl Input {
    /// Lines starting with `:` are commands, anything else is search text.
    pub fn parse(line: &str) -> Self {
        let Some(command) = line.trim().strip_prefix(':') else {
            return Input::Text(line.to_string());
        };

        let (verb, argument) = command
            .split_once(char::is_whitespace)
            .map(|(verb, argument)| (verb, argument.trim()))
            .unwrap_or((command, ""));

        match verb {
            "page" => argument
                .parse()
                .map(Input::Page)
                .unwrap_or_else(|_| Input::Invalid(line.to_string())),
            "next" => Input::Next,
            "prev" => Input::Prev,
            "status" => Status::from_str(argument)
                .map(Input::Status)
                .unwrap_or_else(|_| Input::Invalid(line.to_string())),
            "gender" => Gender::from_str(argument)
                .map(Input::Gender)
                .unwrap_or_else(|_| Input::Invalid(line.to_string())),
            "species" if !argument.is_empty() => Input::Species(argument.to_string()),
            "clear" => Input::ClearFilters,
            _ => Input::Invalid(line.to_string()),
        }
    }
}

/// Interactive listing: search text is debounced, commands apply at once,
/// and only the newest fetch may print its result.
pub async fn search(context: ContextPointer, location: &str) -> std::io::Result<()> {
    let mut state = ListingState::from_location(location);
    let mut search_box = SearchBox::new(context.config().debounce(), state.name());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut latest = Some(spawn_fetch(&context, &state));

    loop {
        let wait = search_box.time_remaining().unwrap_or(IDLE_WAIT);
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => {
                    let changed = match Input::parse(&line) {
                        Input::Text(text) => {
                            search_box.input(&text);
                            false
                        }
                        Input::Page(page) => state.go_to_page(page),
                        Input::Next => state.next_page(),
                        Input::Prev => state.prev_page(),
                        Input::Status(status) => state.toggle_status(status),
                        Input::Gender(gender) => state.toggle_gender(gender),
                        Input::Species(species) => state.toggle_species(&species),
                        Input::ClearFilters => state.clear_filters(),
                        Input::Invalid(line) => {
                            eprintln!("Unrecognised command: {}", line);
                            false
                        }
                    };
                    if changed {
                        latest = Some(spawn_fetch(&context, &state));
                    }
                }
                None => break,
            },
            _ = tokio::time::sleep(wait) => {}
        }

        if let Some(text) = search_box.poll() {
            if state.search(&text) {
                latest = Some(spawn_fetch(&context, &state));
            }
        }
    }

    if let Some(text) = search_box.flush() {
        if state.search(&text) {
            latest = Some(spawn_fetch(&context, &state));
        }
    }
    if let Some(handle) = latest {
        let _ = handle.await;
    }
    context.listing_scope().dispose();
    Ok(())
}

fn spawn_fetch(context: &ContextPointer, state: &ListingState) -> JoinHandle<()> {
    let ticket = context.listing_scope().begin();
    let client = context.catalog_client().clone();
    let state = state.clone();

    tokio::spawn(async move {
        let result = client.fetch_options(&state.options()).await;
        ticket.apply(ListingView::from_result(result), |view| {
            print!("{}", render::listing(&state, &view));
        });
    })
}
