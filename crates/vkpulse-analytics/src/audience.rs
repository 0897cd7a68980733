//! Subscriber demographics and interests.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use vkpulse_core::{Gender, Subscriber};

use crate::text::words;

pub const TOP_CITIES: usize = 10;
pub const TOP_INTERESTS: usize = 10;
/// Cities of the reference community lined up across every audience.
pub const COMPARED_CITIES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ranked {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudienceSummary {
    /// Members left after cleaning.
    pub total_users: usize,
    /// Members dropped as deleted or outside the age window.
    pub dropped: usize,
    pub mean_age: Option<f64>,
    pub gender_distribution: BTreeMap<Gender, usize>,
    pub top_cities: Vec<Ranked>,
    pub top_interests: Vec<Ranked>,
}

/// Drop deleted profiles and members whose age is unknown or outside
/// `min_age..=max_age`.
#[must_use]
pub fn clean_subscribers(subscribers: &[Subscriber], min_age: u32, max_age: u32) -> Vec<&Subscriber> {
    subscribers
        .iter()
        .filter(|s| !s.deleted)
        .filter(|s| s.age.is_some_and(|age| (min_age..=max_age).contains(&age)))
        .collect()
}

fn count_values<I>(values: I) -> HashMap<String, usize>
where
    I: IntoIterator<Item = String>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }
    counts
}

/// Most frequent values, ties broken alphabetically.
fn rank(counts: &HashMap<String, usize>, limit: usize) -> Vec<Ranked> {
    let mut ranked: Vec<Ranked> = counts
        .iter()
        .map(|(value, &count)| Ranked {
            value: value.clone(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    ranked.truncate(limit);
    ranked
}

/// Word frequencies over the free-text `interests` field.
#[must_use]
pub fn interest_words(subscribers: &[&Subscriber], limit: usize) -> Vec<Ranked> {
    let counts = count_values(subscribers.iter().flat_map(|s| words(&s.interests)));
    rank(&counts, limit)
}

#[must_use]
pub fn summarize_audience(subscribers: &[Subscriber], min_age: u32, max_age: u32) -> AudienceSummary {
    let kept = clean_subscribers(subscribers, min_age, max_age);
    let cities = city_counts(&kept);
    summary_of(subscribers.len(), &kept, &cities)
}

fn city_counts(kept: &[&Subscriber]) -> HashMap<String, usize> {
    count_values(kept.iter().filter_map(|s| s.city.clone()))
}

#[allow(clippy::cast_precision_loss)]
fn summary_of(
    total: usize,
    kept: &[&Subscriber],
    cities: &HashMap<String, usize>,
) -> AudienceSummary {
    let ages: Vec<u32> = kept.iter().filter_map(|s| s.age).collect();
    let mean_age = if ages.is_empty() {
        None
    } else {
        Some(ages.iter().map(|&a| f64::from(a)).sum::<f64>() / ages.len() as f64)
    };

    let mut gender_distribution = BTreeMap::new();
    for s in kept {
        *gender_distribution.entry(s.gender).or_insert(0) += 1;
    }

    let top_cities = rank(cities, TOP_CITIES);
    let top_interests = interest_words(kept, TOP_INTERESTS);

    tracing::debug!(total, kept = kept.len(), "audience cleaned");

    AudienceSummary {
        total_users: kept.len(),
        dropped: total - kept.len(),
        mean_age,
        gender_distribution,
        top_cities,
        top_interests,
    }
}

/// One community's cleaned audience, keeping the full city tally so other
/// communities' top cities can be looked up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommunityAudience {
    pub name: String,
    pub primary: bool,
    pub summary: AudienceSummary,
    #[serde(skip)]
    city_counts: HashMap<String, usize>,
}

impl CommunityAudience {
    #[must_use]
    pub fn new(
        name: &str,
        primary: bool,
        subscribers: &[Subscriber],
        min_age: u32,
        max_age: u32,
    ) -> Self {
        let kept = clean_subscribers(subscribers, min_age, max_age);
        let city_counts = city_counts(&kept);
        Self {
            name: name.to_string(),
            primary,
            summary: summary_of(subscribers.len(), &kept, &city_counts),
            city_counts,
        }
    }

    /// Members living in `city`.
    #[must_use]
    pub fn city_count(&self, city: &str) -> usize {
        self.city_counts.get(city).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudienceRow {
    pub name: String,
    pub primary: bool,
    pub total_users: usize,
    pub mean_age: Option<f64>,
    pub female: usize,
    pub male: usize,
}

/// Member counts for one city, keyed by community name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityRow {
    pub city: String,
    pub counts: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudienceComparison {
    /// Community whose top cities are compared.
    pub reference: Option<String>,
    /// One row per community, in input order.
    pub rows: Vec<AudienceRow>,
    pub cities: Vec<CityRow>,
}

/// Line up audiences side by side.
///
/// The reference community is the primary one, or the first when none is
/// primary. Its [`COMPARED_CITIES`] top cities are counted in every audience.
#[must_use]
pub fn compare_audiences(audiences: &[CommunityAudience]) -> AudienceComparison {
    let reference = audiences
        .iter()
        .find(|a| a.primary)
        .or_else(|| audiences.first());

    let rows = audiences
        .iter()
        .map(|a| {
            let gender = |g: Gender| a.summary.gender_distribution.get(&g).copied().unwrap_or(0);
            AudienceRow {
                name: a.name.clone(),
                primary: a.primary,
                total_users: a.summary.total_users,
                mean_age: a.summary.mean_age,
                female: gender(Gender::Female),
                male: gender(Gender::Male),
            }
        })
        .collect();

    let cities = reference
        .map(|r| {
            r.summary
                .top_cities
                .iter()
                .take(COMPARED_CITIES)
                .map(|top| CityRow {
                    city: top.value.clone(),
                    counts: audiences
                        .iter()
                        .map(|a| (a.name.clone(), a.city_count(&top.value)))
                        .collect(),
                })
                .collect()
        })
        .unwrap_or_default();

    AudienceComparison {
        reference: reference.map(|r| r.name.clone()),
        rows,
        cities,
    }
}
