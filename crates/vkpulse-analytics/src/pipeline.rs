//! Per-community analysis pipeline.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use vkpulse_core::{AppConfig, ContentLabel, Post};

use crate::aggregate::{aggregate, annotate, top_n, AggregationResult, AnalyzedPost, Metric};
use crate::classifier::Classifier;
use crate::compare::engagement_rate;
use crate::engagement::{summarize, EngagementSummary};
use crate::schedule::{best_posting_hours, PostingSchedule};

const EXCERPT_CHARS: usize = 80;

/// Knobs shared by every community analysed in one run.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisOptions {
    pub offset: FixedOffset,
    pub top_n: usize,
    pub top_metric: Metric,
    pub best_hours: usize,
}

impl AnalysisOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            offset: config.utc_offset(),
            top_n: config.top_n,
            top_metric: Metric::Likes,
            best_hours: config.best_hours,
        }
    }
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// Owned summary of a ranked post, detached from the input batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopPost {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub label: ContentLabel,
    pub likes: u64,
    pub reposts: u64,
    pub comments: u64,
    pub views: u64,
    pub engagement: u64,
    pub excerpt: String,
}

impl From<&AnalyzedPost<'_>> for TopPost {
    fn from(p: &AnalyzedPost<'_>) -> Self {
        let mut excerpt: String = p.clean_text.chars().take(EXCERPT_CHARS).collect();
        if p.text_length > EXCERPT_CHARS {
            excerpt.push('…');
        }
        Self {
            id: p.post.id,
            timestamp: p.post.timestamp,
            label: p.label,
            likes: p.post.likes,
            reposts: p.post.reposts,
            comments: p.post.comments,
            views: p.post.views,
            engagement: p.engagement,
            excerpt,
        }
    }
}

/// Everything computed for one community.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommunityReport {
    pub name: String,
    pub primary: bool,
    pub subscribers: Option<u64>,
    pub summary: EngagementSummary,
    /// `(mean likes + mean reposts) / subscribers * 100`.
    pub engagement_rate: Option<f64>,
    pub aggregation: AggregationResult,
    pub schedule: PostingSchedule,
    pub top_metric: Metric,
    pub top_posts: Vec<TopPost>,
}

impl CommunityReport {
    /// Number of posts carrying `label`.
    #[must_use]
    pub fn label_count(&self, label: ContentLabel) -> usize {
        self.aggregation
            .label_distribution
            .get(&label)
            .map_or(0, |s| s.count)
    }
}

/// Classify and reduce one community's posts.
///
/// An empty batch is not an error: it yields a report of zeros with the
/// fallback posting schedule.
#[must_use]
pub fn analyze_community(
    name: &str,
    subscribers: Option<u64>,
    primary: bool,
    posts: &[Post],
    classifier: &Classifier,
    options: &AnalysisOptions,
) -> CommunityReport {
    if posts.is_empty() {
        tracing::info!(community = name, "no posts collected; reporting zeros");
    }

    let analyzed = annotate(posts, classifier);
    let aggregation = aggregate(&analyzed, options.offset);
    let summary = summarize(posts);
    let engagement_rate = engagement_rate(&summary, subscribers);

    if subscribers.is_some() && engagement_rate.is_none() {
        tracing::warn!(
            community = name,
            "subscriber count is zero; engagement rate left undefined"
        );
    }

    let top_posts = top_n(&analyzed, options.top_metric, options.top_n)
        .into_iter()
        .map(TopPost::from)
        .collect();

    tracing::debug!(
        community = name,
        posts = posts.len(),
        weeks = aggregation.weekly_trend.len(),
        "community analysed"
    );

    CommunityReport {
        name: name.to_string(),
        primary,
        subscribers,
        summary,
        engagement_rate,
        aggregation,
        schedule: best_posting_hours(posts, options.offset, options.best_hours),
        top_metric: options.top_metric,
        top_posts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: i64, text: &str, likes: u64, reposts: u64) -> Post {
        let ts = DateTime::parse_from_rfc3339("2024-04-02T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        Post::new(id, ts, text).with_counters(likes, reposts, 0, 0)
    }

    #[test]
    fn empty_community_report_is_zeroed() {
        let report = analyze_community(
            "empty",
            Some(100),
            false,
            &[],
            &Classifier::default(),
            &AnalysisOptions::default(),
        );
        assert_eq!(report.summary.posts, 0);
        assert_eq!(report.engagement_rate, Some(0.0));
        assert!(report.top_posts.is_empty());
        assert!(report.schedule.fallback);
        assert_eq!(report.label_count(ContentLabel::Other), 0);
    }

    #[test]
    fn report_ranks_and_labels_posts() {
        let posts = vec![
            post(1, "Наш новый кейс по металлу", 10, 2),
            post(2, "Скидка 20% на услуги", 5, 1),
            post(3, "", 0, 0),
        ];
        let options = AnalysisOptions {
            top_n: 2,
            ..AnalysisOptions::default()
        };
        let report = analyze_community(
            "laser33",
            Some(1200),
            true,
            &posts,
            &Classifier::default(),
            &options,
        );
        assert_eq!(report.label_count(ContentLabel::CaseStudy), 1);
        let ids: Vec<i64> = report.top_posts.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(report.top_posts[0].engagement, 14);
        assert_eq!(report.top_posts[0].label, ContentLabel::CaseStudy);
        // (5 + 1) / 1200 * 100
        let er = report.engagement_rate.unwrap();
        assert!((er - 0.5).abs() < 1e-9, "got {er}");
    }

    #[test]
    fn long_text_is_truncated_in_excerpt() {
        let text = "а".repeat(120);
        let posts = vec![post(1, &text, 1, 0)];
        let report = analyze_community(
            "x",
            None,
            false,
            &posts,
            &Classifier::default(),
            &AnalysisOptions::default(),
        );
        let excerpt = &report.top_posts[0].excerpt;
        assert_eq!(excerpt.chars().count(), EXCERPT_CHARS + 1);
        assert!(excerpt.ends_with('…'));
        assert_eq!(report.engagement_rate, None);
    }
}
