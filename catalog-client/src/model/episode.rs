use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref EPISODE_CODE: Regex = Regex::new(r"^S(\d+)E(\d+)$").unwrap();
}

/// Season and number decoded from a code such as `S01E05`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct EpisodeCode {
    pub season: u32,
    pub number: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub id: u32,
    pub name: String,
    pub air_date: String,
    pub episode: String,
    #[serde(default)]
    pub characters: Vec<String>,
    #[serde(default)]
    pub url: String,
    pub created: DateTime<Utc>,
}

impl Episode {
    pub fn code(&self) -> Option<EpisodeCode> {
        let captures = EPISODE_CODE.captures(self.episode.trim())?;
        Some(EpisodeCode {
            season: captures[1].parse().ok()?,
            number: captures[2].parse().ok()?,
        })
    }
}
