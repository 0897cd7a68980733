use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// A community whose collected posts take part in a comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityConfig {
    pub name: String,
    /// JSON file of raw posts. Relative paths resolve against the YAML file.
    pub posts: PathBuf,
    pub subscribers: Option<u64>,
    /// JSON file of collected members, used by the audience comparison.
    #[serde(default)]
    pub members: Option<PathBuf>,
    /// Our own community; at most one entry may set this.
    #[serde(default)]
    pub primary: bool,
}

#[derive(Debug, Deserialize)]
pub struct CommunitiesFile {
    pub communities: Vec<CommunityConfig>,
}

impl CommunitiesFile {
    #[must_use]
    pub fn primary(&self) -> Option<&CommunityConfig> {
        self.communities.iter().find(|c| c.primary)
    }
}

/// Load and validate the communities list from a YAML file.
///
/// Relative `posts` and `members` paths are rewritten to be relative to the directory
/// containing `path`.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_communities(path: &Path) -> Result<CommunitiesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CommunitiesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut file: CommunitiesFile =
        serde_yaml::from_str(&content).map_err(ConfigError::CommunitiesFileParse)?;

    validate_communities(&file)?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    for community in &mut file.communities {
        if community.posts.is_relative() {
            community.posts = base.join(&community.posts);
        }
        if let Some(members) = community.members.as_mut().filter(|m| m.is_relative()) {
            *members = base.join(&*members);
        }
    }

    Ok(file)
}

fn validate_communities(file: &CommunitiesFile) -> Result<(), ConfigError> {
    if file.communities.is_empty() {
        return Err(ConfigError::Validation(
            "communities file lists no communities".to_string(),
        ));
    }

    let mut seen_names = HashSet::new();
    let mut primaries = 0_usize;

    for community in &file.communities {
        if community.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "community name must be non-empty".to_string(),
            ));
        }

        if !seen_names.insert(community.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate community name: '{}'",
                community.name
            )));
        }

        if community.primary {
            primaries += 1;
        }
    }

    if primaries > 1 {
        return Err(ConfigError::Validation(format!(
            "{primaries} communities are marked primary; at most one is allowed"
        )));
    }

    Ok(())
}
