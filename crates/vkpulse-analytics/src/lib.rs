//! Content classification and engagement analytics for community wall posts.
//!
//! Classifies each post into a fixed content taxonomy with ordered keyword
//! rules, reduces batches into per-label and per-week engagement statistics,
//! and builds competitor comparisons, posting-time and strategy
//! recommendations, and audience summaries. Everything here is pure: inputs
//! are in-memory batches and nothing is read or written.

pub mod aggregate;
pub mod audience;
pub mod classifier;
pub mod compare;
pub mod engagement;
pub mod pipeline;
pub mod schedule;
pub mod strategy;
pub mod text;

pub use aggregate::{aggregate, annotate, top_n, AggregationResult, AnalyzedPost, Metric};
pub use audience::{
    compare_audiences, summarize_audience, AudienceComparison, AudienceSummary, CommunityAudience,
};
pub use classifier::{classify, Classifier};
pub use compare::{compare, engagement_rate, Comparison};
pub use engagement::{engagement_score, summarize, EngagementSummary};
pub use pipeline::{analyze_community, AnalysisOptions, CommunityReport};
pub use schedule::{best_posting_hours, PostingSchedule};
pub use strategy::{build_strategy, Strategy};
