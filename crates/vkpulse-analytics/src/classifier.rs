//! Rule-based content classifier for wall posts.

use std::sync::LazyLock;

use vkpulse_core::{ContentLabel, Taxonomy};

static DEFAULT_CLASSIFIER: LazyLock<Classifier> =
    LazyLock::new(|| Classifier::new(&Taxonomy::default()));

/// Assigns exactly one [`ContentLabel`] to a text.
///
/// Rules are tried in taxonomy order against the lowercased text and the
/// first rule with a contained stem wins, so a post mentioning both a case
/// study and a discount is a case study under the default taxonomy.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<(ContentLabel, Vec<String>)>,
    default_label: ContentLabel,
}

impl Classifier {
    #[must_use]
    pub fn new(taxonomy: &Taxonomy) -> Self {
        let rules = taxonomy
            .rules
            .iter()
            .map(|rule| {
                let stems = rule
                    .stems
                    .iter()
                    .map(|s| s.trim().to_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect();
                (rule.label, stems)
            })
            .collect();
        Self {
            rules,
            default_label: taxonomy.default_label,
        }
    }

    /// Classify `text`. Empty text gets the default label.
    #[must_use]
    pub fn classify(&self, text: &str) -> ContentLabel {
        if text.trim().is_empty() {
            return self.default_label;
        }
        let lowered = text.to_lowercase();
        self.rules
            .iter()
            .find(|(_, stems)| stems.iter().any(|stem| lowered.contains(stem.as_str())))
            .map_or(self.default_label, |(label, _)| *label)
    }

    #[must_use]
    pub fn default_label(&self) -> ContentLabel {
        self.default_label
    }
}

impl Default for Classifier {
    fn default() -> Self {
        DEFAULT_CLASSIFIER.clone()
    }
}

/// Classify `text` with the built-in taxonomy.
#[must_use]
pub fn classify(text: &str) -> ContentLabel {
    DEFAULT_CLASSIFIER.classify(text)
}
