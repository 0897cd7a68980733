//! Markdown and JSON output for the report commands.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::Serialize;
use vkpulse_analytics::{
    AudienceComparison, AudienceSummary, CommunityReport, Comparison, Strategy,
};
use vkpulse_core::ContentLabel;

use crate::OutputFormat;

/// Print `value` as pretty JSON, or the markdown produced by `markdown`.
pub(crate) fn emit<T, F>(format: OutputFormat, value: &T, markdown: F) -> anyhow::Result<()>
where
    T: Serialize,
    F: FnOnce(&T) -> Result<String, std::fmt::Error>,
{
    let out = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Markdown => markdown(value)?,
    };
    println!("{out}");
    Ok(())
}

fn header(out: &mut String, title: &str, generated: DateTime<Utc>) -> std::fmt::Result {
    writeln!(out, "# {title}")?;
    writeln!(out)?;
    writeln!(out, "**Generated**: {}", generated.format("%Y-%m-%d %H:%M UTC"))?;
    Ok(())
}

fn rate(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |er| format!("{er:.2}%"))
}

fn label_header(out: &mut String, first: &str) -> std::fmt::Result {
    write!(out, "| {first} |")?;
    for label in ContentLabel::ALL {
        write!(out, " {label} |")?;
    }
    writeln!(out)?;
    write!(out, "|---|")?;
    for _ in ContentLabel::ALL {
        write!(out, "---|")?;
    }
    writeln!(out)
}

pub(crate) fn community_markdown(
    report: &CommunityReport,
    generated: DateTime<Utc>,
) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    header(&mut out, &format!("Content Report: {}", report.name), generated)?;
    writeln!(out, "**Posts**: {}", report.summary.posts)?;
    if let Some(subscribers) = report.subscribers {
        writeln!(out, "**Subscribers**: {subscribers}")?;
    }
    writeln!(out, "**Engagement rate**: {}", rate(report.engagement_rate))?;
    writeln!(out)?;
    writeln!(out, "---")?;

    if report.summary.posts == 0 {
        writeln!(out)?;
        writeln!(out, "no posts to report")?;
        return Ok(out);
    }

    writeln!(out)?;
    writeln!(out, "## Content Mix")?;
    writeln!(out)?;
    writeln!(out, "| Label | Posts | Share | Avg Likes | Avg Reposts | Avg Comments |")?;
    writeln!(out, "|-------|-------|-------|-----------|-------------|--------------|")?;
    for (label, share) in &report.aggregation.label_distribution {
        match report.aggregation.label_engagement.get(label) {
            Some(e) => writeln!(
                out,
                "| {label} | {} | {:.1}% | {:.1} | {:.1} | {:.1} |",
                share.count, share.percent, e.mean_likes, e.mean_reposts, e.mean_comments
            )?,
            None => writeln!(out, "| {label} | 0 | 0.0% | - | - | - |")?,
        }
    }

    writeln!(out)?;
    writeln!(out, "## Weekly Trend")?;
    writeln!(out)?;
    writeln!(out, "| Week | Starts | Posts | Avg Engagement |")?;
    writeln!(out, "|------|--------|-------|----------------|")?;
    for week in &report.aggregation.weekly_trend {
        writeln!(
            out,
            "| {} | {} | {} | {:.1} |",
            week.week, week.week_start, week.posts, week.mean_engagement
        )?;
    }

    writeln!(out)?;
    writeln!(out, "## Top Posts by {}", report.top_metric)?;
    writeln!(out)?;
    writeln!(out, "| Id | Published | Label | Likes | Reposts | Comments | Views | Text |")?;
    writeln!(out, "|----|-----------|-------|-------|---------|----------|-------|------|")?;
    for post in &report.top_posts {
        writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} | {} | {} |",
            post.id,
            post.timestamp.format("%Y-%m-%d %H:%M"),
            post.label,
            post.likes,
            post.reposts,
            post.comments,
            post.views,
            post.excerpt.replace('|', "/"),
        )?;
    }

    writeln!(out)?;
    writeln!(out, "## Best Posting Hours")?;
    writeln!(out)?;
    let hours: Vec<String> = report
        .schedule
        .best_hours
        .iter()
        .map(|h| format!("{h:02}:00"))
        .collect();
    write!(out, "{}", hours.join(", "))?;
    if report.schedule.fallback {
        write!(out, " (default; no timing data)")?;
    }
    writeln!(out)?;

    Ok(out)
}

pub(crate) fn comparison_markdown(
    comparison: &Comparison,
    generated: DateTime<Utc>,
) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    header(&mut out, "Competitor Comparison", generated)?;
    writeln!(out, "**Communities**: {}", comparison.ranking.len())?;
    writeln!(out)?;
    writeln!(out, "---")?;
    writeln!(out)?;
    writeln!(out, "## Engagement")?;
    writeln!(out)?;
    writeln!(out, "| Community | Subscribers | Posts | Avg Likes | Avg Reposts | ER |")?;
    writeln!(out, "|-----------|-------------|-------|-----------|-------------|----|")?;
    for row in &comparison.ranking {
        let name = if row.primary {
            format!("**{}**", row.name)
        } else {
            row.name.clone()
        };
        let subscribers = row
            .subscribers
            .map_or_else(|| "-".to_string(), |n| n.to_string());
        writeln!(
            out,
            "| {name} | {subscribers} | {} | {:.1} | {:.1} | {} |",
            row.posts,
            row.mean_likes,
            row.mean_reposts,
            rate(row.engagement_rate)
        )?;
    }

    writeln!(out)?;
    writeln!(out, "## Content Mix (%)")?;
    writeln!(out)?;
    label_header(&mut out, "Community")?;
    for row in &comparison.content_mix {
        write!(out, "| {} |", row.name)?;
        for label in ContentLabel::ALL {
            let share = row.shares.get(&label).copied().unwrap_or(0.0);
            write!(out, " {share:.1} |")?;
        }
        writeln!(out)?;
    }

    Ok(out)
}

pub(crate) fn strategy_markdown(
    strategy: &Strategy,
    generated: DateTime<Utc>,
) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    header(&mut out, "Content Strategy", generated)?;
    writeln!(out)?;
    writeln!(out, "---")?;
    writeln!(out)?;

    writeln!(out, "## Recommendations")?;
    writeln!(out)?;
    if strategy.recommendations.is_empty() {
        writeln!(out, "no competitor outperforms the current content mix")?;
    }
    for rec in &strategy.recommendations {
        writeln!(out, "- {rec}")?;
    }

    writeln!(out)?;
    writeln!(out, "## Recommended Content Mix")?;
    writeln!(out)?;
    writeln!(out, "| Label | Share |")?;
    writeln!(out, "|-------|-------|")?;
    for (label, share) in &strategy.recommended_mix {
        writeln!(out, "| {label} | {share}% |")?;
    }

    writeln!(out)?;
    writeln!(out, "## Posting Schedule")?;
    writeln!(out)?;
    let hours: Vec<String> = strategy
        .best_hours
        .iter()
        .map(|h| format!("{h:02}:00"))
        .collect();
    let days: Vec<String> = strategy.best_days.iter().map(ToString::to_string).collect();
    writeln!(out, "- hours: {}", hours.join(", "))?;
    writeln!(out, "- days: {}", days.join(", "))?;

    writeln!(out)?;
    writeln!(out, "## Collaborations")?;
    writeln!(out)?;
    if strategy.collaborations.is_empty() {
        writeln!(out, "no competitor with a known audience size")?;
    }
    for name in &strategy.collaborations {
        writeln!(out, "- {name}")?;
    }

    writeln!(out)?;
    writeln!(out, "## KPI")?;
    writeln!(out)?;
    writeln!(
        out,
        "- average engagement per post: {:.1}",
        strategy.kpi.target_engagement
    )?;
    writeln!(out, "- new subscribers: +{}", strategy.kpi.new_subscribers)?;
    writeln!(out, "- timeframe: {} months", strategy.kpi.timeframe_months)?;

    Ok(out)
}

pub(crate) fn audience_markdown(
    summary: &AudienceSummary,
    generated: DateTime<Utc>,
) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    header(&mut out, "Audience Report", generated)?;
    writeln!(out, "**Members analysed**: {}", summary.total_users)?;
    writeln!(out, "**Dropped**: {}", summary.dropped)?;
    if let Some(age) = summary.mean_age {
        writeln!(out, "**Mean age**: {age:.1}")?;
    }
    writeln!(out)?;
    writeln!(out, "---")?;

    if summary.total_users == 0 {
        writeln!(out)?;
        writeln!(out, "no members left after cleaning")?;
        return Ok(out);
    }

    writeln!(out)?;
    writeln!(out, "## Gender")?;
    writeln!(out)?;
    for (gender, count) in &summary.gender_distribution {
        writeln!(out, "- {gender}: {count}")?;
    }

    for (title, ranked) in [
        ("Top Cities", &summary.top_cities),
        ("Top Interests", &summary.top_interests),
    ] {
        if ranked.is_empty() {
            continue;
        }
        writeln!(out)?;
        writeln!(out, "## {title}")?;
        writeln!(out)?;
        for r in ranked {
            writeln!(out, "- {} ({})", r.value, r.count)?;
        }
    }

    Ok(out)
}

pub(crate) fn audience_comparison_markdown(
    comparison: &AudienceComparison,
    generated: DateTime<Utc>,
) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    header(&mut out, "Audience Comparison", generated)?;
    writeln!(out, "**Communities**: {}", comparison.rows.len())?;
    writeln!(out)?;
    writeln!(out, "---")?;
    writeln!(out)?;
    writeln!(out, "## Members")?;
    writeln!(out)?;
    writeln!(out, "| Community | Members | Mean Age | Female | Male |")?;
    writeln!(out, "|-----------|---------|----------|--------|------|")?;
    for row in &comparison.rows {
        let name = if row.primary {
            format!("**{}**", row.name)
        } else {
            row.name.clone()
        };
        let age = row
            .mean_age
            .map_or_else(|| "-".to_string(), |a| format!("{a:.1}"));
        writeln!(
            out,
            "| {name} | {} | {age} | {} | {} |",
            row.total_users, row.female, row.male
        )?;
    }

    let Some(reference) = &comparison.reference else {
        return Ok(out);
    };
    writeln!(out)?;
    writeln!(out, "## Top Cities of {reference}")?;
    writeln!(out)?;
    if comparison.cities.is_empty() {
        writeln!(out, "no city data")?;
        return Ok(out);
    }
    write!(out, "| City |")?;
    for row in &comparison.rows {
        write!(out, " {} |", row.name)?;
    }
    writeln!(out)?;
    write!(out, "|------|")?;
    for _ in &comparison.rows {
        write!(out, "---|")?;
    }
    writeln!(out)?;
    for city in &comparison.cities {
        write!(out, "| {} |", city.city)?;
        for row in &comparison.rows {
            write!(out, " {} |", city.counts.get(&row.name).copied().unwrap_or(0))?;
        }
        writeln!(out)?;
    }

    Ok(out)
}
