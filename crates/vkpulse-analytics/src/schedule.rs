//! Posting-time analysis.

use std::collections::BTreeMap;

use chrono::{FixedOffset, Timelike};
use serde::Serialize;
use vkpulse_core::Post;

use crate::engagement::mean;

/// Hours recommended when there is no history to learn from.
pub const FALLBACK_HOURS: [u32; 3] = [12, 18, 20];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HourStats {
    pub hour: u32,
    pub posts: usize,
    pub mean_likes: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostingSchedule {
    /// Best hours of day, best first.
    pub best_hours: Vec<u32>,
    /// `true` when `best_hours` came from [`FALLBACK_HOURS`].
    pub fallback: bool,
    /// Every hour that has posts, in hour order.
    pub by_hour: Vec<HourStats>,
}

/// Mean likes per local hour of day and the `k` best hours.
///
/// Ties between hours go to the earlier hour.
#[must_use]
pub fn best_posting_hours(posts: &[Post], offset: FixedOffset, k: usize) -> PostingSchedule {
    let mut by_hour: BTreeMap<u32, Vec<u64>> = BTreeMap::new();
    for post in posts {
        let hour = post.timestamp.with_timezone(&offset).hour();
        by_hour.entry(hour).or_default().push(post.likes);
    }

    let by_hour: Vec<HourStats> = by_hour
        .into_iter()
        .map(|(hour, likes)| HourStats {
            hour,
            posts: likes.len(),
            mean_likes: mean(likes),
        })
        .collect();

    if by_hour.is_empty() {
        return PostingSchedule {
            best_hours: FALLBACK_HOURS.iter().copied().take(k).collect(),
            fallback: true,
            by_hour,
        };
    }

    let mut ranked = by_hour.clone();
    // Stable sort over hour-ordered input keeps earlier hours first on ties.
    ranked.sort_by(|a, b| b.mean_likes.total_cmp(&a.mean_likes));

    PostingSchedule {
        best_hours: ranked.iter().take(k).map(|h| h.hour).collect(),
        fallback: false,
        by_hour,
    }
}
