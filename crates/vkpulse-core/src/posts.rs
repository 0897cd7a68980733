//! Post records and the raw shapes they are collected in.
//!
//! ## Observed input shapes
//!
//! ### VK `wall.get` items
//! `date` is unix seconds. Counters are nested objects, e.g.
//! `"likes": {"count": 12, "user_likes": 0}`; `views` is absent on old posts.
//! `attachments` is an array of objects tagged by `"type"` (`photo`, `video`,
//! `doc`, `link`, ...). `text` may be missing on repost-only items.
//!
//! ### Flattened competitor exports
//! One object per post with `date` as `"YYYY-MM-DD HH:MM"` in local time,
//! counters as plain integers (occasionally floats such as `3.0` when the
//! export went through a dataframe), and `attachments` as a bare count.
//! The id column is sometimes called `post_id`, and a unix `date` may come
//! through as a float the same way counters do.
//!
//! Missing or null counters become `0` and missing text becomes `""`. Only
//! the id and the date are required; see [`RawPost::into_post`].

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// A collected wall post. Never mutated after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub text: String,
    pub likes: u64,
    pub reposts: u64,
    pub comments: u64,
    pub views: u64,
    pub media: MediaCounts,
}

impl Post {
    /// Minimal constructor used by tests and callers that already hold
    /// clean values; media counts start at zero.
    #[must_use]
    pub fn new(id: i64, timestamp: DateTime<Utc>, text: impl Into<String>) -> Self {
        Self {
            id,
            timestamp,
            text: text.into(),
            likes: 0,
            reposts: 0,
            comments: 0,
            views: 0,
            media: MediaCounts::default(),
        }
    }

    #[must_use]
    pub fn with_counters(mut self, likes: u64, reposts: u64, comments: u64, views: u64) -> Self {
        self.likes = likes;
        self.reposts = reposts;
        self.comments = comments;
        self.views = views;
        self
    }
}

/// Attachment counts by media type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaCounts {
    pub photos: u32,
    pub videos: u32,
    pub docs: u32,
    /// All attachments, including types not broken out above.
    pub total: u32,
}

/// A post as it arrives from the collection stage, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPost {
    #[serde(default, alias = "post_id")]
    pub id: Option<i64>,
    #[serde(default)]
    pub date: Option<RawDate>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub likes: Option<RawCounter>,
    #[serde(default)]
    pub reposts: Option<RawCounter>,
    #[serde(default)]
    pub comments: Option<RawCounter>,
    #[serde(default)]
    pub views: Option<RawCounter>,
    #[serde(default)]
    pub attachments: Option<RawAttachments>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawDate {
    Unix(i64),
    /// Unix seconds that went through a dataframe, e.g. `1700000000.0`.
    Float(f64),
    Text(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawCounter {
    Flat(u64),
    Float(f64),
    Nested {
        #[serde(default)]
        count: Option<i64>,
    },
}

impl RawCounter {
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn value(&self) -> u64 {
        match self {
            RawCounter::Flat(n) => *n,
            // Exports round-trip integers as floats; negatives and NaN clamp to 0.
            RawCounter::Float(f) => {
                if f.is_finite() && *f > 0.0 {
                    *f as u64
                } else {
                    0
                }
            }
            RawCounter::Nested { count } => count.map_or(0, |c| u64::try_from(c).unwrap_or(0)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawAttachments {
    Count(u32),
    List(Vec<RawAttachment>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAttachment {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl RawPost {
    /// Validate and convert into a [`Post`].
    ///
    /// Date strings without a zone are read in `local_offset`, which is how
    /// the export tooling writes them.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingId`], [`CoreError::MissingDate`] or
    /// [`CoreError::InvalidDate`] when the record cannot be placed in time.
    /// Every other gap is filled with a default.
    pub fn into_post(self, local_offset: FixedOffset) -> Result<Post, CoreError> {
        let id = self.id.ok_or(CoreError::MissingId)?;
        let raw_date = self.date.ok_or(CoreError::MissingDate { id })?;
        let timestamp = parse_date(&raw_date, local_offset).ok_or_else(|| {
            CoreError::InvalidDate {
                id,
                raw: match raw_date {
                    RawDate::Unix(secs) => secs.to_string(),
                    RawDate::Float(secs) => secs.to_string(),
                    RawDate::Text(ref s) => s.clone(),
                },
            }
        })?;

        let counter = |c: Option<&RawCounter>| c.map_or(0, RawCounter::value);

        Ok(Post {
            id,
            timestamp,
            text: self.text.unwrap_or_default(),
            likes: counter(self.likes.as_ref()),
            reposts: counter(self.reposts.as_ref()),
            comments: counter(self.comments.as_ref()),
            views: counter(self.views.as_ref()),
            media: self.attachments.map(media_counts).unwrap_or_default(),
        })
    }
}

fn media_counts(attachments: RawAttachments) -> MediaCounts {
    match attachments {
        RawAttachments::Count(total) => MediaCounts {
            total,
            ..MediaCounts::default()
        },
        RawAttachments::List(items) => {
            let mut media = MediaCounts::default();
            for item in items {
                media.total += 1;
                match item.kind.as_deref() {
                    Some("photo") => media.photos += 1,
                    Some("video") => media.videos += 1,
                    Some("doc") => media.docs += 1,
                    _ => {}
                }
            }
            media
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn float_timestamp(secs: f64) -> Option<DateTime<Utc>> {
    if secs.is_finite() && secs.abs() < 1e15 {
        DateTime::from_timestamp(secs.trunc() as i64, 0)
    } else {
        None
    }
}

fn parse_date(raw: &RawDate, local_offset: FixedOffset) -> Option<DateTime<Utc>> {
    match raw {
        RawDate::Unix(secs) => DateTime::from_timestamp(*secs, 0),
        RawDate::Float(secs) => float_timestamp(*secs),
        RawDate::Text(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            if let Ok(secs) = s.parse::<i64>() {
                return DateTime::from_timestamp(secs, 0);
            }
            let naive = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"]
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .or_else(|| {
                    NaiveDate::parse_from_str(s, "%Y-%m-%d")
                        .ok()
                        .and_then(|d| d.and_hms_opt(0, 0, 0))
                })?;
            local_offset
                .from_local_datetime(&naive)
                .single()
                .map(|dt| dt.with_timezone(&Utc))
        }
    }
}
