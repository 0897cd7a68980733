use chrono::{DateTime, TimeZone, Utc};

use super::*;

fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

fn at(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .unwrap()
        .with_timezone(&Utc)
}

fn post(id: i64, text: &str, likes: u64, reposts: u64) -> Post {
    Post::new(id, at("2024-03-04T12:00:00Z"), text).with_counters(likes, reposts, 0, 0)
}

fn scenario_posts() -> Vec<Post> {
    vec![
        post(1, "Наш новый кейс по металлу", 10, 2),
        post(2, "Скидка 20% на услуги", 5, 1),
        post(3, "", 0, 0),
    ]
}

// -----------------------------------------------------------------------
// end-to-end scenario
// -----------------------------------------------------------------------

#[test]
fn scenario_labels() {
    let posts = scenario_posts();
    let analyzed = annotate(&posts, &Classifier::default());
    let labels: Vec<ContentLabel> = analyzed.iter().map(|p| p.label).collect();
    assert_eq!(
        labels,
        vec![
            ContentLabel::CaseStudy,
            ContentLabel::Promotion,
            ContentLabel::Other
        ]
    );
}

#[test]
fn scenario_counts_and_means() {
    let posts = scenario_posts();
    let analyzed = annotate(&posts, &Classifier::default());
    let result = aggregate(&analyzed, utc());

    assert_eq!(result.total_posts, 3);
    assert_eq!(result.label_distribution[&ContentLabel::CaseStudy].count, 1);
    assert_eq!(result.label_distribution[&ContentLabel::Promotion].count, 1);
    assert_eq!(result.label_distribution[&ContentLabel::Other].count, 1);
    assert_eq!(result.label_distribution[&ContentLabel::News].count, 0);
    assert!(
        (result.label_engagement[&ContentLabel::CaseStudy].mean_likes - 10.0).abs() < 1e-9
    );
    assert_eq!(analyzed[0].engagement, 14);
}

// -----------------------------------------------------------------------
// label distribution
// -----------------------------------------------------------------------

#[test]
fn empty_batch_yields_zero_distribution() {
    let distribution = label_distribution(&[]);
    assert_eq!(distribution.len(), ContentLabel::ALL.len());
    for share in distribution.values() {
        assert_eq!(share.count, 0);
        assert_eq!(share.percent, 0.0);
    }
}

#[test]
fn counts_sum_to_len_and_percentages_to_100() {
    let posts: Vec<Post> = [
        "кейс",
        "акция",
        "курс",
        "новости",
        "привет",
        "ещё кейс",
        "скидки",
    ]
    .iter()
    .enumerate()
    .map(|(i, text)| post(i64::try_from(i).unwrap(), text, 1, 0))
    .collect();
    let analyzed = annotate(&posts, &Classifier::default());
    let distribution = label_distribution(&analyzed);

    let count_sum: usize = distribution.values().map(|s| s.count).sum();
    let percent_sum: f64 = distribution.values().map(|s| s.percent).sum();
    assert_eq!(count_sum, posts.len());
    assert!((percent_sum - 100.0).abs() < 1e-9, "got {percent_sum}");
    assert_eq!(distribution[&ContentLabel::CaseStudy].count, 2);
    assert_eq!(distribution[&ContentLabel::Promotion].count, 2);
}

// -----------------------------------------------------------------------
// label engagement
// -----------------------------------------------------------------------

#[test]
fn label_engagement_omits_empty_labels() {
    let posts = scenario_posts();
    let analyzed = annotate(&posts, &Classifier::default());
    let engagement = label_engagement(&analyzed);
    assert!(!engagement.contains_key(&ContentLabel::News));
    assert!(!engagement.contains_key(&ContentLabel::Educational));
    assert_eq!(engagement.len(), 3);
}

#[test]
fn label_engagement_means_per_label() {
    let posts = vec![
        Post::new(1, at("2024-03-04T12:00:00Z"), "кейс").with_counters(10, 2, 4, 0),
        Post::new(2, at("2024-03-04T12:00:00Z"), "пример").with_counters(20, 0, 1, 0),
    ];
    let analyzed = annotate(&posts, &Classifier::default());
    let stats = label_engagement(&analyzed)[&ContentLabel::CaseStudy];
    assert_eq!(stats.posts, 2);
    assert!((stats.mean_likes - 15.0).abs() < 1e-9);
    assert!((stats.mean_reposts - 1.0).abs() < 1e-9);
    assert!((stats.mean_comments - 2.5).abs() < 1e-9);
}

#[test]
fn label_engagement_empty_batch() {
    assert!(label_engagement(&[]).is_empty());
}

// -----------------------------------------------------------------------
// weekly trend
// -----------------------------------------------------------------------

#[test]
fn weekly_trend_is_sparse_and_ordered() {
    let posts = vec![
        Post::new(1, at("2024-03-20T10:00:00Z"), "").with_counters(4, 0, 0, 0),
        Post::new(2, at("2024-03-04T10:00:00Z"), "").with_counters(10, 1, 0, 0),
        Post::new(3, at("2024-03-06T10:00:00Z"), "").with_counters(2, 0, 0, 0),
    ];
    let analyzed = annotate(&posts, &Classifier::default());
    let trend = weekly_trend(&analyzed, utc());

    // 2024-03-04 and 2024-03-06 share ISO week 10; week 11 has no posts.
    assert_eq!(trend.len(), 2);
    assert_eq!(trend[0].week, "2024-W10");
    assert_eq!(trend[0].week_start, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
    assert_eq!(trend[0].posts, 2);
    assert!((trend[0].mean_engagement - 7.0).abs() < 1e-9);
    assert_eq!(trend[1].week, "2024-W12");
    assert_eq!(trend[1].posts, 1);
}

#[test]
fn weekly_trend_respects_offset() {
    // Sunday 22:30 UTC is already Monday in UTC+3.
    let ts = Utc.with_ymd_and_hms(2024, 3, 10, 22, 30, 0).unwrap();
    let posts = vec![Post::new(1, ts, "")];
    let analyzed = annotate(&posts, &Classifier::default());

    let in_utc = weekly_trend(&analyzed, utc());
    let in_msk = weekly_trend(&analyzed, FixedOffset::east_opt(3 * 3600).unwrap());
    assert_eq!(in_utc[0].week, "2024-W10");
    assert_eq!(in_msk[0].week, "2024-W11");
}

#[test]
fn weekly_trend_uses_iso_year_at_boundary() {
    // 2024-12-30 belongs to ISO week 1 of 2025.
    let posts = vec![Post::new(1, at("2024-12-30T12:00:00Z"), "")];
    let analyzed = annotate(&posts, &Classifier::default());
    let trend = weekly_trend(&analyzed, utc());
    assert_eq!(trend[0].week, "2025-W01");
}

#[test]
fn weekly_trend_empty_batch() {
    assert!(weekly_trend(&[], utc()).is_empty());
}

// -----------------------------------------------------------------------
// top-N
// -----------------------------------------------------------------------

#[test]
fn top_n_descending_with_stable_ties() {
    let posts = vec![
        post(1, "", 5, 0),
        post(2, "", 9, 0),
        post(3, "", 5, 0),
        post(4, "", 1, 0),
        post(5, "", 9, 0),
    ];
    let analyzed = annotate(&posts, &Classifier::default());
    let ids: Vec<i64> = top_n(&analyzed, Metric::Likes, 4)
        .iter()
        .map(|p| p.post.id)
        .collect();
    assert_eq!(ids, vec![2, 5, 1, 3]);
}

#[test]
fn top_n_is_idempotent() {
    let posts = vec![post(1, "", 3, 1), post(2, "", 1, 2), post(3, "", 5, 0)];
    let analyzed = annotate(&posts, &Classifier::default());
    let first: Vec<i64> = top_n(&analyzed, Metric::Engagement, 3)
        .iter()
        .map(|p| p.post.id)
        .collect();
    let second: Vec<i64> = top_n(&analyzed, Metric::Engagement, 3)
        .iter()
        .map(|p| p.post.id)
        .collect();
    // engagement: 5, 5, 5 -> all tied, input order kept
    assert_eq!(first, vec![1, 2, 3]);
    assert_eq!(first, second);
}

#[test]
fn top_n_larger_than_batch_returns_all() {
    let posts = vec![post(1, "", 3, 0)];
    let analyzed = annotate(&posts, &Classifier::default());
    assert_eq!(top_n(&analyzed, Metric::Views, 10).len(), 1);
    assert!(top_n(&analyzed, Metric::Views, 0).is_empty());
    assert!(top_n(&[], Metric::Likes, 5).is_empty());
}

#[test]
fn metric_display_names() {
    assert_eq!(Metric::Engagement.to_string(), "engagement");
    assert_eq!(Metric::Likes.to_string(), "likes");
}

// -----------------------------------------------------------------------
// aggregate
// -----------------------------------------------------------------------

#[test]
fn aggregate_empty_batch_is_empty() {
    let result = aggregate(&[], utc());
    assert_eq!(result.total_posts, 0);
    assert!(result.label_engagement.is_empty());
    assert!(result.weekly_trend.is_empty());
    assert!(result.label_distribution.values().all(|s| s.count == 0));
}

#[test]
fn annotate_derives_text_fields() {
    let posts = vec![post(1, "  Кейс\n\n#лазер  #резка ", 0, 0)];
    let analyzed = annotate(&posts, &Classifier::default());
    assert_eq!(analyzed[0].clean_text, "Кейс #лазер #резка");
    assert_eq!(analyzed[0].text_length, 18);
    assert_eq!(analyzed[0].hashtags, 2);
}

#[test]
fn aggregation_result_serializes_with_label_keys() {
    let posts = scenario_posts();
    let analyzed = annotate(&posts, &Classifier::default());
    let json = serde_json::to_value(aggregate(&analyzed, utc())).unwrap();
    assert_eq!(json["label_distribution"]["case_study"]["count"], 1);
    assert_eq!(json["weekly_trend"][0]["week"], "2024-W10");
}
