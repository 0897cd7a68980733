//! Content strategy recommendations derived from a comparison.

use std::collections::BTreeMap;

use chrono::Weekday;
use serde::Serialize;
use vkpulse_core::ContentLabel;

use crate::pipeline::CommunityReport;

/// Growth applied to our mean engagement to get the KPI target.
pub const TARGET_ENGAGEMENT_GROWTH: f64 = 1.3;
pub const TARGET_NEW_SUBSCRIBERS: u32 = 150;
pub const TARGET_TIMEFRAME_MONTHS: u32 = 3;
const MAX_COLLABORATIONS: usize = 2;

/// Recommended share of each content type, in percent.
pub const RECOMMENDED_MIX: [(ContentLabel, u32); 5] = [
    (ContentLabel::CaseStudy, 35),
    (ContentLabel::Educational, 25),
    (ContentLabel::Promotion, 20),
    (ContentLabel::News, 15),
    (ContentLabel::Other, 5),
];

/// Publishing days recommended alongside the best hours.
pub const BEST_DAYS: [Weekday; 3] = [Weekday::Tue, Weekday::Thu, Weekday::Sat];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recommendation {
    /// A more engaging competitor publishes more case studies than we do.
    MoreCaseStudies { like: String },
    /// A more engaging competitor publishes more educational posts than we do.
    MoreEducational { like: String },
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Recommendation::MoreCaseStudies { like } => {
                write!(f, "increase the share of case studies (as {like} does)")
            }
            Recommendation::MoreEducational { like } => {
                write!(f, "add more educational material (as {like} does)")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpi {
    /// Target mean engagement score, rounded to one decimal.
    pub target_engagement: f64,
    pub new_subscribers: u32,
    pub timeframe_months: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Strategy {
    pub recommendations: Vec<Recommendation>,
    pub best_hours: Vec<u32>,
    pub best_days: Vec<Weekday>,
    /// Competitors worth cross-posting with, largest audience first.
    pub collaborations: Vec<String>,
    pub kpi: Kpi,
    pub recommended_mix: BTreeMap<ContentLabel, u32>,
}

/// Build recommendations for `ours` from competitor reports.
///
/// A competitor only drives a recommendation when its mean engagement score
/// is strictly higher than ours.
#[must_use]
pub fn build_strategy(ours: &CommunityReport, competitors: &[CommunityReport]) -> Strategy {
    let our_engagement = ours.summary.mean_engagement;
    let our_cases = ours.label_count(ContentLabel::CaseStudy);
    let our_edu = ours.label_count(ContentLabel::Educational);

    let mut recommendations = Vec::new();
    for competitor in competitors {
        if competitor.summary.mean_engagement <= our_engagement {
            continue;
        }
        if competitor.label_count(ContentLabel::CaseStudy) > our_cases {
            recommendations.push(Recommendation::MoreCaseStudies {
                like: competitor.name.clone(),
            });
        }
        if competitor.label_count(ContentLabel::Educational) > our_edu {
            recommendations.push(Recommendation::MoreEducational {
                like: competitor.name.clone(),
            });
        }
    }

    let mut by_audience: Vec<&CommunityReport> = competitors
        .iter()
        .filter(|c| c.subscribers.is_some_and(|n| n > 0))
        .collect();
    by_audience.sort_by_key(|c| std::cmp::Reverse(c.subscribers));
    let collaborations = by_audience
        .into_iter()
        .take(MAX_COLLABORATIONS)
        .map(|c| c.name.clone())
        .collect();

    tracing::debug!(
        community = %ours.name,
        competitors = competitors.len(),
        recommendations = recommendations.len(),
        "strategy built"
    );

    Strategy {
        recommendations,
        best_hours: ours.schedule.best_hours.clone(),
        best_days: BEST_DAYS.to_vec(),
        collaborations,
        kpi: Kpi {
            target_engagement: round1(our_engagement * TARGET_ENGAGEMENT_GROWTH),
            new_subscribers: TARGET_NEW_SUBSCRIBERS,
            timeframe_months: TARGET_TIMEFRAME_MONTHS,
        },
        recommended_mix: RECOMMENDED_MIX.into_iter().collect(),
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
