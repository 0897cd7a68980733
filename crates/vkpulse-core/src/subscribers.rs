//! Community member records.
//!
//! VK `groups.getMembers` with `fields=sex,city,interests` returns `city` as
//! `{"id": 1, "title": "Москва"}`, while the CSV exports carry a plain city
//! name. `age` is precomputed by the collector from `bdate` and is missing or
//! an empty string whenever the birth year is hidden. Deleted accounts keep
//! their id but have `first_name == "DELETED"`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Female,
    Male,
    Unspecified,
}

impl Gender {
    /// VK sex codes: `1` female, `2` male, anything else unspecified.
    #[must_use]
    pub fn from_vk_code(code: Option<u8>) -> Self {
        match code {
            Some(1) => Gender::Female,
            Some(2) => Gender::Male,
            _ => Gender::Unspecified,
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Female => write!(f, "female"),
            Gender::Male => write!(f, "male"),
            Gender::Unspecified => write!(f, "unspecified"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscriber {
    pub id: i64,
    pub deleted: bool,
    pub age: Option<u32>,
    pub gender: Gender,
    pub city: Option<String>,
    pub interests: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSubscriber {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub age: Option<RawAge>,
    #[serde(default)]
    pub sex: Option<u8>,
    #[serde(default)]
    pub city: Option<RawCity>,
    #[serde(default)]
    pub interests: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawAge {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawCity {
    Name(String),
    Object {
        #[serde(default)]
        title: Option<String>,
    },
}

impl RawSubscriber {
    #[must_use]
    pub fn into_subscriber(self) -> Subscriber {
        let city = match self.city {
            Some(RawCity::Name(name)) => Some(name),
            Some(RawCity::Object { title }) => title,
            None => None,
        }
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

        Subscriber {
            id: self.id,
            deleted: self.first_name.as_deref() == Some("DELETED"),
            age: self.age.as_ref().and_then(parse_age),
            gender: Gender::from_vk_code(self.sex),
            city,
            interests: self.interests.unwrap_or_default(),
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_age(raw: &RawAge) -> Option<u32> {
    let value = match raw {
        RawAge::Number(n) => *n,
        RawAge::Text(s) => s.trim().parse::<f64>().ok()?,
    };
    (value.is_finite() && value >= 0.0).then(|| value as u32)
}
