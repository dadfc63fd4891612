use crate::query::{gender::Gender, status::Status};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Named reference to an origin or current location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRef {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: u32,
    pub name: String,
    pub status: Status,
    pub species: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub gender: Gender,
    pub origin: LocationRef,
    pub location: LocationRef,
    pub image: String,
    /// Locators of every episode the character appears in, each one
    /// individually fetchable.
    pub episode: Vec<String>,
    #[serde(default)]
    pub url: String,
    pub created: DateTime<Utc>,
}

impl Character {
    pub fn episode_count(&self) -> usize {
        self.episode.len()
    }
}
