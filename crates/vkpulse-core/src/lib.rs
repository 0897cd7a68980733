pub mod app_config;
pub mod communities;
pub mod config;
pub mod labels;
pub mod posts;
pub mod subscribers;
pub mod taxonomy;

pub use app_config::{AppConfig, Environment};
pub use communities::{load_communities, CommunitiesFile, CommunityConfig};
pub use config::{load_app_config, load_app_config_from_env};
pub use labels::ContentLabel;
pub use posts::{MediaCounts, Post, RawPost};
pub use subscribers::{Gender, RawSubscriber, Subscriber};
pub use taxonomy::{load_taxonomy, Taxonomy, TaxonomyRule};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read taxonomy file {path}: {source}")]
    TaxonomyFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse taxonomy file: {0}")]
    TaxonomyFileParse(#[source] serde_yaml::Error),

    #[error("failed to read communities file {path}: {source}")]
    CommunitiesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse communities file: {0}")]
    CommunitiesFileParse(#[source] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Errors raised while turning raw collected records into domain values.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("record {id} has no publication date")]
    MissingDate { id: i64 },

    #[error("record {id} has an unreadable date {raw:?}")]
    InvalidDate { id: i64, raw: String },

    #[error("record has no id")]
    MissingId,

    #[error("unknown content label: {0}")]
    UnknownLabel(String),
}
