//! Cross-community comparison.

use std::collections::BTreeMap;

use serde::Serialize;
use vkpulse_core::ContentLabel;

use crate::engagement::EngagementSummary;
use crate::pipeline::CommunityReport;

/// `(mean likes + mean reposts) / subscribers * 100`.
///
/// `None` when the audience size is unknown or zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn engagement_rate(summary: &EngagementSummary, subscribers: Option<u64>) -> Option<f64> {
    match subscribers {
        Some(n) if n > 0 => Some((summary.mean_likes + summary.mean_reposts) / n as f64 * 100.0),
        _ => None,
    }
}

/// Content-type shares (percent) for one community.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentMixRow {
    pub name: String,
    pub shares: BTreeMap<ContentLabel, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    /// Communities by engagement rate, highest first; unknown rates last.
    pub ranking: Vec<RankedCommunity>,
    pub content_mix: Vec<ContentMixRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCommunity {
    pub name: String,
    pub primary: bool,
    pub subscribers: Option<u64>,
    pub posts: usize,
    pub mean_likes: f64,
    pub mean_reposts: f64,
    pub mean_engagement: f64,
    pub engagement_rate: Option<f64>,
}

/// Rank communities and line up their content mix.
///
/// The content-mix rows keep the order of `reports`.
#[must_use]
pub fn compare(reports: &[CommunityReport]) -> Comparison {
    let mut ranking: Vec<RankedCommunity> = reports
        .iter()
        .map(|r| RankedCommunity {
            name: r.name.clone(),
            primary: r.primary,
            subscribers: r.subscribers,
            posts: r.summary.posts,
            mean_likes: r.summary.mean_likes,
            mean_reposts: r.summary.mean_reposts,
            mean_engagement: r.summary.mean_engagement,
            engagement_rate: r.engagement_rate,
        })
        .collect();

    ranking.sort_by(|a, b| match (a.engagement_rate, b.engagement_rate) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    let content_mix = reports
        .iter()
        .map(|r| ContentMixRow {
            name: r.name.clone(),
            shares: r
                .aggregation
                .label_distribution
                .iter()
                .map(|(label, share)| (*label, share.percent))
                .collect(),
        })
        .collect();

    Comparison {
        ranking,
        content_mix,
    }
}
