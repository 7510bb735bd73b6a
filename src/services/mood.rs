use crate::error::{AppError, AppResult};

/// Built-in mood table: label and the category keywords it accepts
const DEFAULT_MOODS: &[(&str, &[&str])] = &[
    ("Happy 😊", &["Comedy", "Adventure", "Animation", "Family"]),
    ("Sad 😢", &["Drama", "Romance"]),
    ("Romantic ❤️", &["Romance", "Drama"]),
    ("Excited 🤩", &["Action", "Adventure", "Sci-Fi", "Thriller"]),
    ("Scary 😱", &["Horror", "Thriller", "Mystery"]),
    ("Relax 😌", &["Fantasy", "Family", "Animation", "Music"]),
    ("Dark 🖤", &["Crime", "Drama", "Thriller", "Mystery"]),
];

#[derive(Debug, Clone, PartialEq, Eq)]
struct MoodEntry {
    label: String,
    categories: Vec<String>,
}

/// Static mapping from mood label to category keywords
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodPolicy {
    entries: Vec<MoodEntry>,
}

impl Default for MoodPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MOODS.iter().map(|(label, categories)| {
            (
                label.to_string(),
                categories.iter().map(|c| c.to_string()).collect(),
            )
        }))
    }
}

impl MoodPolicy {
    /// Builds a policy from `(label, categories)` pairs, keeping their order
    pub fn new(entries: impl IntoIterator<Item = (String, Vec<String>)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(label, categories)| MoodEntry { label, categories })
                .collect(),
        }
    }

    /// Mood labels in table order
    pub fn moods(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.label.clone()).collect()
    }

    /// Category keywords for an exact mood label
    pub fn categories_for(&self, mood: &str) -> AppResult<&[String]> {
        self.entries
            .iter()
            .find(|e| e.label == mood)
            .map(|e| e.categories.as_slice())
            .ok_or_else(|| AppError::UnknownMood(mood.to_string()))
    }
}

/// True when any category appears anywhere in `tags`, ignoring case
///
/// Tags are free text, so "Sci-Fi" matches "sci-fi thriller" and "Drama"
/// matches "melodrama". That looseness is intended.
pub fn tags_match(tags: &str, categories: &[String]) -> bool {
    let tags = tags.to_lowercase();
    categories
        .iter()
        .any(|category| tags.contains(&category.to_lowercase()))
}
