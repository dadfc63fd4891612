use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Life status of a character as reported by the catalog.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Status {
    Alive,
    Dead,
    #[serde(rename = "unknown")]
    #[strum(serialize = "unknown")]
    Unknown,
}

impl Status {
    /// Spelling used in outbound query strings.
    pub fn query_value(&self) -> &'static str {
        match self {
            Status::Alive => "alive",
            Status::Dead => "dead",
            Status::Unknown => "unknown",
        }
    }
}
