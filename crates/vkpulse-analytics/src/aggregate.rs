//! Group-by-label and group-by-week reductions over classified posts.
//!
//! Every function here is total: an empty batch yields zero counts or empty
//! collections, and no ratio is ever computed over a zero denominator.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use chrono::{Datelike, Duration, FixedOffset, NaiveDate};
use serde::Serialize;
use vkpulse_core::{ContentLabel, Post};

use crate::classifier::Classifier;
use crate::engagement::{engagement_score, mean, percent};
use crate::text::{char_len, clean_text, hashtag_count};

/// A post together with the values derived from it.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzedPost<'a> {
    #[serde(flatten)]
    pub post: &'a Post,
    pub label: ContentLabel,
    pub clean_text: String,
    pub text_length: usize,
    pub hashtags: usize,
    pub engagement: u64,
}

/// Derive cleaned text, label and engagement for every post, in input order.
#[must_use]
pub fn annotate<'a>(posts: &'a [Post], classifier: &Classifier) -> Vec<AnalyzedPost<'a>> {
    posts
        .iter()
        .map(|post| {
            let clean_text = clean_text(&post.text);
            AnalyzedPost {
                post,
                label: classifier.classify(&clean_text),
                text_length: char_len(&clean_text),
                hashtags: hashtag_count(&clean_text),
                engagement: engagement_score(post),
                clean_text,
            }
        })
        .collect()
}

/// Numeric field used for rankings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Likes,
    Reposts,
    Comments,
    Views,
    Engagement,
}

impl Metric {
    #[must_use]
    pub fn value(self, post: &AnalyzedPost<'_>) -> u64 {
        match self {
            Metric::Likes => post.post.likes,
            Metric::Reposts => post.post.reposts,
            Metric::Comments => post.post.comments,
            Metric::Views => post.post.views,
            Metric::Engagement => post.engagement,
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Metric::Likes => "likes",
            Metric::Reposts => "reposts",
            Metric::Comments => "comments",
            Metric::Views => "views",
            Metric::Engagement => "engagement",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LabelShare {
    pub count: usize,
    /// Share of the batch in percent, `0.0` for an empty batch.
    pub percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelEngagement {
    pub posts: usize,
    pub mean_likes: f64,
    pub mean_reposts: f64,
    pub mean_comments: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekStats {
    /// ISO week, formatted `YYYY-Www`.
    pub week: String,
    /// Monday of the week.
    pub week_start: NaiveDate,
    pub posts: usize,
    pub mean_engagement: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregationResult {
    pub total_posts: usize,
    pub label_distribution: BTreeMap<ContentLabel, LabelShare>,
    pub label_engagement: BTreeMap<ContentLabel, LabelEngagement>,
    pub weekly_trend: Vec<WeekStats>,
}

/// Count and percentage for every label, including labels with no posts.
#[must_use]
pub fn label_distribution(posts: &[AnalyzedPost<'_>]) -> BTreeMap<ContentLabel, LabelShare> {
    let mut counts: BTreeMap<ContentLabel, usize> =
        ContentLabel::ALL.iter().map(|&label| (label, 0)).collect();
    for post in posts {
        *counts.entry(post.label).or_insert(0) += 1;
    }
    let total = posts.len();
    counts
        .into_iter()
        .map(|(label, count)| {
            (
                label,
                LabelShare {
                    count,
                    percent: percent(count, total),
                },
            )
        })
        .collect()
}

/// Mean likes, reposts and comments per label. Labels without posts are omitted.
#[must_use]
pub fn label_engagement(
    posts: &[AnalyzedPost<'_>],
) -> BTreeMap<ContentLabel, LabelEngagement> {
    let mut groups: BTreeMap<ContentLabel, Vec<&Post>> = BTreeMap::new();
    for post in posts {
        groups.entry(post.label).or_default().push(post.post);
    }
    groups
        .into_iter()
        .map(|(label, group)| {
            (
                label,
                LabelEngagement {
                    posts: group.len(),
                    mean_likes: mean(group.iter().map(|p| p.likes)),
                    mean_reposts: mean(group.iter().map(|p| p.reposts)),
                    mean_comments: mean(group.iter().map(|p| p.comments)),
                },
            )
        })
        .collect()
}

/// Mean engagement per ISO week in `offset` local time.
///
/// Only weeks that have posts appear; callers wanting a dense series must
/// fill the gaps themselves. Output is ordered by week.
#[must_use]
pub fn weekly_trend(posts: &[AnalyzedPost<'_>], offset: FixedOffset) -> Vec<WeekStats> {
    let mut buckets: BTreeMap<(i32, u32), (NaiveDate, Vec<u64>)> = BTreeMap::new();
    for post in posts {
        let local = post.post.timestamp.with_timezone(&offset).date_naive();
        let iso = local.iso_week();
        let monday = local - Duration::days(i64::from(local.weekday().num_days_from_monday()));
        buckets
            .entry((iso.year(), iso.week()))
            .or_insert_with(|| (monday, Vec::new()))
            .1
            .push(post.engagement);
    }
    buckets
        .into_iter()
        .map(|((year, week), (week_start, scores))| WeekStats {
            week: format!("{year}-W{week:02}"),
            week_start,
            posts: scores.len(),
            mean_engagement: mean(scores),
        })
        .collect()
}

/// The `n` posts with the largest `metric`, descending.
///
/// Ties keep input order, so repeated calls on the same batch return the
/// same ranking.
#[must_use]
pub fn top_n<'b, 'a>(
    posts: &'b [AnalyzedPost<'a>],
    metric: Metric,
    n: usize,
) -> Vec<&'b AnalyzedPost<'a>> {
    let mut ranked: Vec<&AnalyzedPost<'a>> = posts.iter().collect();
    // `sort_by_key` is stable.
    ranked.sort_by_key(|p| Reverse(metric.value(p)));
    ranked.truncate(n);
    ranked
}

/// Run every label and week reduction over one batch.
#[must_use]
pub fn aggregate(posts: &[AnalyzedPost<'_>], offset: FixedOffset) -> AggregationResult {
    AggregationResult {
        total_posts: posts.len(),
        label_distribution: label_distribution(posts),
        label_engagement: label_engagement(posts),
        weekly_trend: weekly_trend(posts, offset),
    }
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
