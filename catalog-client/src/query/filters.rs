use super::{gender::Gender, status::Status};
use getset::Getters;

/// Structured filters applied on top of the name search.
///
/// A blank species is the same as no species filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Getters)]
#[get = "pub"]
pub struct Filters {
    status: Option<Status>,
    gender: Option<Gender>,
    species: Option<String>,
}

impl Filters {
    pub fn new(status: Option<Status>, gender: Option<Gender>, species: Option<String>) -> Self {
        Self {
            status,
            gender,
            species: species.and_then(normalize),
        }
    }

    pub fn with_status(mut self, status: Option<Status>) -> Self {
        self.status = status;
        self
    }

    pub fn with_gender(mut self, gender: Option<Gender>) -> Self {
        self.gender = gender;
        self
    }

    pub fn with_species<S: Into<String>>(mut self, species: Option<S>) -> Self {
        self.species = species.map(Into::into).and_then(normalize);
        self
    }

    /// Number of filters currently in effect.
    pub fn active_count(&self) -> usize {
        [
            self.status.is_some(),
            self.gender.is_some(),
            self.species.is_some(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }
}

fn normalize(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_species_is_no_filter() {
        let filters = Filters::default().with_species(Some("   "));
        assert_eq!(filters.species(), &None);
        assert!(filters.is_empty());
    }

    #[test]
    fn test_active_count() {
        let filters = Filters::default()
            .with_status(Some(Status::Dead))
            .with_species(Some("Robot"));
        assert_eq!(filters.active_count(), 2);

        let cleared = filters.with_status(None);
        assert_eq!(cleared.active_count(), 1);
    }
}
