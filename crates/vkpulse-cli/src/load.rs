//! Input loading: taxonomy, post files and subscriber files.
//!
//! Records that cannot be normalized are logged and skipped so one bad row
//! never aborts a batch.

use std::future::Future;
use std::path::Path;

use chrono::FixedOffset;
use futures::stream::{self, StreamExt};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use vkpulse_analytics::{
    analyze_community, AnalysisOptions, Classifier, CommunityAudience, CommunityReport,
};
use vkpulse_core::{
    AppConfig, CommunitiesFile, CommunityConfig, Post, RawPost, RawSubscriber, Subscriber,
};

/// Build the classifier from the configured taxonomy file, or the built-in
/// taxonomy when that file does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or is invalid.
pub(crate) fn load_classifier(config: &AppConfig) -> anyhow::Result<Classifier> {
    let classifier = if config.taxonomy_path.exists() {
        let taxonomy = vkpulse_core::load_taxonomy(&config.taxonomy_path)?;
        tracing::debug!(
            path = %config.taxonomy_path.display(),
            rules = taxonomy.rules.len(),
            "taxonomy loaded"
        );
        Classifier::new(&taxonomy)
    } else {
        tracing::info!(
            path = %config.taxonomy_path.display(),
            "taxonomy file not found; using built-in taxonomy"
        );
        Classifier::default()
    };
    tracing::debug!(default_label = %classifier.default_label(), "classifier ready");
    Ok(classifier)
}

/// Accepted layouts of a JSON file of records: a bare array, an object with
/// `items`, or a raw VK API response `{"response": {"items": [...]}}`.
///
/// Items stay untyped here so one malformed record cannot reject the file.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordsFile {
    List(Vec<serde_json::Value>),
    Items { items: Vec<serde_json::Value> },
    Response { response: ItemsWrapper },
}

#[derive(Debug, Deserialize)]
struct ItemsWrapper {
    items: Vec<serde_json::Value>,
}

impl RecordsFile {
    fn into_items(self) -> Vec<serde_json::Value> {
        match self {
            RecordsFile::List(items) | RecordsFile::Items { items } => items,
            RecordsFile::Response { response } => response.items,
        }
    }
}

/// Records kept from one file and the number dropped.
#[derive(Debug)]
pub(crate) struct Loaded<T> {
    pub items: Vec<T>,
    pub skipped: usize,
}

/// Decode every item of a records document, converting each with `convert`.
///
/// Items that fail to decode or convert are logged with their position and
/// counted in `skipped`.
fn parse_records<R, T, E, F>(json: &str, kind: &str, convert: F) -> anyhow::Result<Loaded<T>>
where
    R: DeserializeOwned,
    E: std::fmt::Display,
    F: Fn(R) -> Result<T, E>,
{
    let file: RecordsFile = serde_json::from_str(json)
        .map_err(|e| anyhow::anyhow!("not an array, {{items}} or {{response: {{items}}}} document: {e}"))?;
    let mut items = Vec::new();
    let mut skipped = 0_usize;
    for (index, value) in file.into_items().into_iter().enumerate() {
        let converted = serde_json::from_value::<R>(value)
            .map_err(|e| e.to_string())
            .and_then(|raw| convert(raw).map_err(|e| e.to_string()));
        match converted {
            Ok(item) => items.push(item),
            Err(error) => {
                tracing::warn!(index, kind, %error, "skipping unusable record");
                skipped += 1;
            }
        }
    }
    Ok(Loaded { items, skipped })
}

/// Parse a JSON document of raw posts, keeping the records that normalize.
///
/// # Errors
///
/// Returns an error only if the document itself is not a recognised layout.
pub(crate) fn parse_posts(json: &str, offset: FixedOffset) -> anyhow::Result<Loaded<Post>> {
    parse_records(json, "post", |raw: RawPost| raw.into_post(offset))
}

/// # Errors
///
/// Returns an error only if the document itself is not a recognised layout.
pub(crate) fn parse_subscribers(json: &str) -> anyhow::Result<Loaded<Subscriber>> {
    parse_records(json, "subscriber", |raw: RawSubscriber| {
        Ok::<_, std::convert::Infallible>(raw.into_subscriber())
    })
}

/// # Errors
///
/// Returns an error if the file cannot be read or is not a recognised layout.
pub(crate) async fn load_posts(path: &Path, offset: FixedOffset) -> anyhow::Result<Loaded<Post>> {
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| anyhow::anyhow!("failed to read posts file {}: {e}", path.display()))?;
    let loaded = parse_posts(&json, offset)
        .map_err(|e| anyhow::anyhow!("failed to parse posts file {}: {e}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        posts = loaded.items.len(),
        skipped = loaded.skipped,
        "posts loaded"
    );
    Ok(loaded)
}

/// # Errors
///
/// Returns an error if the file cannot be read or is not a recognised layout.
pub(crate) async fn load_subscribers(path: &Path) -> anyhow::Result<Loaded<Subscriber>> {
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| anyhow::anyhow!("failed to read subscribers file {}: {e}", path.display()))?;
    let loaded = parse_subscribers(&json).map_err(|e| {
        anyhow::anyhow!("failed to parse subscribers file {}: {e}", path.display())
    })?;
    tracing::info!(
        path = %path.display(),
        members = loaded.items.len(),
        skipped = loaded.skipped,
        "subscribers loaded"
    );
    Ok(loaded)
}

/// Run `task` for every community, at most `max_concurrent` at a time.
///
/// Failures are logged and dropped. Results come back in input order.
///
/// # Errors
///
/// Returns an error if every community failed.
async fn for_each_community<'c, T, F, Fut>(
    communities: &[&'c CommunityConfig],
    max_concurrent: usize,
    what: &str,
    task: F,
) -> anyhow::Result<Vec<T>>
where
    F: Fn(&'c CommunityConfig) -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    let mut results: Vec<(usize, Option<T>)> = stream::iter(communities.iter().enumerate())
        .map(|(idx, &community)| {
            let fut = task(community);
            async move {
                match fut.await {
                    Ok(value) => (idx, Some(value)),
                    Err(e) => {
                        tracing::error!(
                            community = %community.name,
                            error = %e,
                            "failed to load community {what}"
                        );
                        (idx, None)
                    }
                }
            }
        })
        .buffer_unordered(max_concurrent.max(1))
        .collect()
        .await;

    results.sort_by_key(|(idx, _)| *idx);
    let total = results.len();
    let loaded: Vec<T> = results.into_iter().filter_map(|(_, r)| r).collect();

    if loaded.is_empty() {
        anyhow::bail!("all {total} communities failed to load {what}");
    }
    if loaded.len() < total {
        tracing::warn!(
            failed = total - loaded.len(),
            total,
            "some communities failed to load {what}"
        );
    }

    Ok(loaded)
}

/// Load and analyse every community in `file`, at most
/// `config.max_concurrent_loads` at a time.
///
/// Communities whose post file fails to load are logged and skipped. Reports
/// come back in file order.
///
/// # Errors
///
/// Returns an error if every community failed to load.
pub(crate) async fn analyze_communities(
    config: &AppConfig,
    file: &CommunitiesFile,
    classifier: &Classifier,
) -> anyhow::Result<Vec<CommunityReport>> {
    let options = &AnalysisOptions::from_config(config);
    let communities: Vec<&CommunityConfig> = file.communities.iter().collect();

    for_each_community(&communities, config.max_concurrent_loads, "posts", move |community| async move {
        let loaded = load_posts(&community.posts, options.offset).await?;
        Ok::<_, anyhow::Error>(analyze_community(
            &community.name,
            community.subscribers,
            community.primary,
            &loaded.items,
            classifier,
            options,
        ))
    })
    .await
}

/// Load and clean the members of every community that lists a `members`
/// file. Communities without one are skipped.
///
/// # Errors
///
/// Returns an error if no community lists a members file, or all of them
/// failed to load.
pub(crate) async fn summarize_audiences(
    config: &AppConfig,
    file: &CommunitiesFile,
) -> anyhow::Result<Vec<CommunityAudience>> {
    let communities: Vec<&CommunityConfig> = file
        .communities
        .iter()
        .filter(|c| {
            if c.members.is_none() {
                tracing::info!(community = %c.name, "no members file; skipping");
            }
            c.members.is_some()
        })
        .collect();

    if communities.is_empty() {
        anyhow::bail!("no community in the file lists a `members` file");
    }

    let (min_age, max_age) = (config.min_age, config.max_age);
    for_each_community(&communities, config.max_concurrent_loads, "members", move |community| async move {
        let path = community
            .members
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("no members file"))?;
        let loaded = load_subscribers(path).await?;
        Ok::<_, anyhow::Error>(CommunityAudience::new(
            &community.name,
            community.primary,
            &loaded.items,
            min_age,
            max_age,
        ))
    })
    .await
}
