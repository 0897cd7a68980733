use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, ContentLabel};

/// One keyword group: a post whose lowercased text contains any stem gets `label`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyRule {
    pub label: ContentLabel,
    pub stems: Vec<String>,
}

/// Ordered classification rules. The first matching rule wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxonomy {
    pub rules: Vec<TaxonomyRule>,
    #[serde(default = "default_label")]
    pub default_label: ContentLabel,
}

fn default_label() -> ContentLabel {
    ContentLabel::Other
}

impl Default for Taxonomy {
    fn default() -> Self {
        let rule = |label, stems: &[&str]| TaxonomyRule {
            label,
            stems: stems.iter().map(|s| (*s).to_string()).collect(),
        };
        Self {
            rules: vec![
                rule(ContentLabel::CaseStudy, &["кейс", "пример", "реализац"]),
                rule(
                    ContentLabel::Promotion,
                    &["акци", "скидк", "распродаж", "предложен"],
                ),
                rule(ContentLabel::Educational, &["обучен", "курс", "технолог"]),
                rule(ContentLabel::News, &["новост", "событ", "мероприят"]),
            ],
            default_label: ContentLabel::Other,
        }
    }
}

impl Taxonomy {
    /// Lowercase and trim every stem, then check the rule set is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if there are no rules, a rule has no
    /// stems or an empty stem, a label appears in two rules, or the default
    /// label is also produced by a rule.
    pub fn normalized(mut self) -> Result<Self, ConfigError> {
        for rule in &mut self.rules {
            for stem in &mut rule.stems {
                *stem = stem.trim().to_lowercase();
            }
        }
        validate_taxonomy(&self)?;
        Ok(self)
    }
}

/// Load and validate a taxonomy from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_taxonomy(path: &Path) -> Result<Taxonomy, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::TaxonomyFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let taxonomy: Taxonomy =
        serde_yaml::from_str(&content).map_err(ConfigError::TaxonomyFileParse)?;

    taxonomy.normalized()
}

fn validate_taxonomy(taxonomy: &Taxonomy) -> Result<(), ConfigError> {
    if taxonomy.rules.is_empty() {
        return Err(ConfigError::Validation(
            "taxonomy must define at least one rule".to_string(),
        ));
    }

    let mut seen_labels = HashSet::new();
    for rule in &taxonomy.rules {
        if rule.stems.is_empty() {
            return Err(ConfigError::Validation(format!(
                "rule '{}' has no stems",
                rule.label
            )));
        }
        if rule.stems.iter().any(String::is_empty) {
            return Err(ConfigError::Validation(format!(
                "rule '{}' has an empty stem",
                rule.label
            )));
        }
        if !seen_labels.insert(rule.label) {
            return Err(ConfigError::Validation(format!(
                "duplicate rule for label '{}'",
                rule.label
            )));
        }
    }

    if seen_labels.contains(&taxonomy.default_label) {
        return Err(ConfigError::Validation(format!(
            "default label '{}' is also used by a rule",
            taxonomy.default_label
        )));
    }

    Ok(())
}
