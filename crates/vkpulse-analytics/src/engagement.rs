//! Engagement score and whole-batch averages.

use serde::Serialize;
use vkpulse_core::Post;

/// Reposts count double: they cost the reader more than a like.
pub const REPOST_WEIGHT: u64 = 2;

/// `likes + 2 * reposts`.
#[must_use]
pub fn engagement_score(post: &Post) -> u64 {
    post.likes.saturating_add(post.reposts.saturating_mul(REPOST_WEIGHT))
}

/// Arithmetic mean that returns `0.0` for an empty input.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = u64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0_f64, 0_usize), |(sum, count), v| (sum + v as f64, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// `part / total * 100`, or `0.0` when `total` is zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Batch-wide averages. All zero for an empty batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EngagementSummary {
    pub posts: usize,
    pub mean_likes: f64,
    pub mean_reposts: f64,
    pub mean_comments: f64,
    pub mean_views: f64,
    pub mean_engagement: f64,
}

#[must_use]
pub fn summarize<'a, I>(posts: I) -> EngagementSummary
where
    I: IntoIterator<Item = &'a Post>,
    I::IntoIter: Clone,
{
    let posts = posts.into_iter();
    EngagementSummary {
        posts: posts.clone().count(),
        mean_likes: mean(posts.clone().map(|p| p.likes)),
        mean_reposts: mean(posts.clone().map(|p| p.reposts)),
        mean_comments: mean(posts.clone().map(|p| p.comments)),
        mean_views: mean(posts.clone().map(|p| p.views)),
        mean_engagement: mean(posts.map(engagement_score)),
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;

    fn post(likes: u64, reposts: u64, comments: u64, views: u64) -> Post {
        Post::new(1, DateTime::from_timestamp(0, 0).unwrap(), "")
            .with_counters(likes, reposts, comments, views)
    }

    #[test]
    fn engagement_weights_reposts_double() {
        assert_eq!(engagement_score(&post(10, 2, 0, 0)), 14);
        assert_eq!(engagement_score(&post(0, 0, 9, 100)), 0);
    }

    #[test]
    fn engagement_saturates_instead_of_overflowing() {
        assert_eq!(engagement_score(&post(u64::MAX, 1, 0, 0)), u64::MAX);
    }

    #[test]
    fn mean_of_empty_is_zero() {
        assert_eq!(mean(std::iter::empty()), 0.0);
    }

    #[test]
    fn mean_of_values() {
        assert!((mean([1, 2, 6]) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn percent_guards_zero_total() {
        assert_eq!(percent(0, 0), 0.0);
        assert_eq!(percent(3, 0), 0.0);
        assert!((percent(1, 4) - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn summarize_empty_is_all_zero() {
        let summary = summarize(&Vec::<Post>::new());
        assert_eq!(summary, EngagementSummary::default());
        assert!(!summary.mean_engagement.is_nan());
    }

    #[test]
    fn summarize_computes_means() {
        let posts = vec![post(10, 2, 1, 100), post(5, 1, 3, 50)];
        let summary = summarize(&posts);
        assert_eq!(summary.posts, 2);
        assert!((summary.mean_likes - 7.5).abs() < 1e-9);
        assert!((summary.mean_reposts - 1.5).abs() < 1e-9);
        assert!((summary.mean_comments - 2.0).abs() < 1e-9);
        assert!((summary.mean_views - 75.0).abs() < 1e-9);
        // (14 + 7) / 2
        assert!((summary.mean_engagement - 10.5).abs() < 1e-9);
    }
}
