use std::path::Path;

use chrono::Utc;
use vkpulse_analytics::{compare_audiences, summarize_audience};
use vkpulse_core::AppConfig;

use crate::{load, render, OutputFormat};

pub(crate) async fn run_audience(
    config: &AppConfig,
    subscribers: &Path,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let members = load::load_subscribers(subscribers).await?.items;

    let summary = summarize_audience(&members, config.min_age, config.max_age);
    if summary.total_users == 0 && !members.is_empty() {
        tracing::warn!(
            min_age = config.min_age,
            max_age = config.max_age,
            "every member was dropped by cleaning"
        );
    }

    render::emit(format, &summary, |s| {
        render::audience_markdown(s, Utc::now())
    })
}

/// Compare the audiences of every community that lists a members file.
pub(crate) async fn run_audience_comparison(
    config: &AppConfig,
    communities: &Path,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let file = vkpulse_core::load_communities(communities)?;
    let audiences = load::summarize_audiences(config, &file).await?;
    tracing::info!(communities = audiences.len(), "audiences loaded");

    let comparison = compare_audiences(&audiences);
    render::emit(format, &comparison, |c| {
        render::audience_comparison_markdown(c, Utc::now())
    })
}
