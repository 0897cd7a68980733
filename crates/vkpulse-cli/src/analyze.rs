use std::path::PathBuf;

use chrono::Utc;
use vkpulse_analytics::{analyze_community, AnalysisOptions, Metric};
use vkpulse_core::AppConfig;

use crate::{load, render, OutputFormat};

#[derive(Debug)]
pub(crate) struct AnalyzeArgs {
    pub posts: PathBuf,
    pub name: String,
    pub subscribers: Option<u64>,
    pub top: Option<usize>,
    pub metric: Metric,
}

/// Build analysis options from config, with CLI overrides applied.
pub(crate) fn options_for(config: &AppConfig, args: &AnalyzeArgs) -> AnalysisOptions {
    let mut options = AnalysisOptions::from_config(config);
    options.top_metric = args.metric;
    if let Some(top) = args.top {
        options.top_n = top;
    }
    options
}

pub(crate) async fn run_analyze(
    config: &AppConfig,
    args: AnalyzeArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let options = options_for(config, &args);
    let classifier = load::load_classifier(config)?;
    let loaded = load::load_posts(&args.posts, options.offset).await?;

    if loaded.items.is_empty() && loaded.skipped > 0 {
        anyhow::bail!(
            "none of the {} records in {} could be read",
            loaded.skipped,
            args.posts.display()
        );
    }

    let report = analyze_community(
        &args.name,
        args.subscribers,
        true,
        &loaded.items,
        &classifier,
        &options,
    );

    render::emit(format, &report, |r| {
        render::community_markdown(r, Utc::now())
    })
}
