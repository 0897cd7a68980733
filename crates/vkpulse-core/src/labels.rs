use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Content category assigned to a post by the classifier.
///
/// Declaration order is the presentation order used by every report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum ContentLabel {
    CaseStudy,
    Promotion,
    Educational,
    News,
    /// Entertainment and anything no rule matched.
    Other,
}

impl ContentLabel {
    pub const ALL: [ContentLabel; 5] = [
        ContentLabel::CaseStudy,
        ContentLabel::Promotion,
        ContentLabel::Educational,
        ContentLabel::News,
        ContentLabel::Other,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ContentLabel::CaseStudy => "case_study",
            ContentLabel::Promotion => "promotion",
            ContentLabel::Educational => "educational",
            ContentLabel::News => "news",
            ContentLabel::Other => "other",
        }
    }
}

impl std::fmt::Display for ContentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContentLabel {
    type Err = CoreError;

    /// Accepts the snake-case names plus the legacy aliases `promo` and
    /// `entertainment` found in older exports.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "case_study" => Ok(ContentLabel::CaseStudy),
            "promotion" | "promo" => Ok(ContentLabel::Promotion),
            "educational" => Ok(ContentLabel::Educational),
            "news" => Ok(ContentLabel::News),
            "other" | "entertainment" => Ok(ContentLabel::Other),
            other => Err(CoreError::UnknownLabel(other.to_string())),
        }
    }
}

impl TryFrom<String> for ContentLabel {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
