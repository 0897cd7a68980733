use std::path::Path;

use chrono::Utc;
use vkpulse_analytics::{build_strategy, compare, CommunityReport};
use vkpulse_core::{AppConfig, CommunitiesFile};

use crate::{load, render, OutputFormat};

async fn load_reports(
    config: &AppConfig,
    file: &CommunitiesFile,
) -> anyhow::Result<Vec<CommunityReport>> {
    let classifier = load::load_classifier(config)?;
    tracing::info!(
        communities = file.communities.len(),
        max_concurrent = config.max_concurrent_loads,
        "loading communities"
    );
    load::analyze_communities(config, file, &classifier).await
}

pub(crate) async fn run_compare(
    config: &AppConfig,
    communities: &Path,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let file = vkpulse_core::load_communities(communities)?;
    let reports = load_reports(config, &file).await?;
    let comparison = compare(&reports);
    render::emit(format, &comparison, |c| {
        render::comparison_markdown(c, Utc::now())
    })
}

/// Take the report named `primary` out of `reports`, leaving the competitors.
pub(crate) fn split_primary(
    primary: &str,
    reports: Vec<CommunityReport>,
) -> anyhow::Result<(CommunityReport, Vec<CommunityReport>)> {
    let (mut ours, competitors): (Vec<_>, Vec<_>) =
        reports.into_iter().partition(|r| r.name == primary);
    match ours.pop() {
        Some(report) => Ok((report, competitors)),
        None => anyhow::bail!("posts of the primary community {primary} could not be loaded"),
    }
}

pub(crate) async fn run_strategy(
    config: &AppConfig,
    communities: &Path,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let file = vkpulse_core::load_communities(communities)?;
    let Some(primary) = file.primary() else {
        anyhow::bail!("strategy needs one community marked `primary: true`");
    };
    let reports = load_reports(config, &file).await?;
    let (ours, competitors) = split_primary(&primary.name, reports)?;
    if competitors.is_empty() {
        tracing::warn!(community = %ours.name, "no competitors loaded; recommendations will be empty");
    }
    let strategy = build_strategy(&ours, &competitors);
    render::emit(format, &strategy, |s| {
        render::strategy_markdown(s, Utc::now())
    })
}

#[cfg(test)]
mod tests {
    use vkpulse_analytics::{analyze_community, AnalysisOptions, Classifier};

    use super::*;

    fn report(name: &str, primary: bool) -> CommunityReport {
        analyze_community(
            name,
            None,
            primary,
            &[],
            &Classifier::default(),
            &AnalysisOptions::default(),
        )
    }

    #[test]
    fn split_finds_primary() {
        let (ours, competitors) = split_primary(
            "ours",
            vec![report("a", false), report("ours", true), report("b", false)],
        )
        .unwrap();
        assert_eq!(ours.name, "ours");
        let names: Vec<&str> = competitors.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn split_fails_when_primary_did_not_load() {
        let err = split_primary("ours", vec![report("a", false)]).unwrap_err();
        assert!(err.to_string().contains("primary community ours"));
    }
}
