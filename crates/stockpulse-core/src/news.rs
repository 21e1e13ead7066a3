//! News item and the labels the filtering stages attach to it.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UnknownVariant;

/// A collected news article about one tracked stock.
///
/// Only the annotation columns change after collection; the item itself is
/// never rewritten or deleted by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: i64,
    pub stock_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub source: Option<String>,
    pub url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub collected_at: DateTime<Utc>,
}

impl NewsItem {
    /// Title and description joined by a single space, the text the keyword
    /// classifiers look at.
    #[must_use]
    pub fn headline_text(&self) -> String {
        format!("{} {}", self.title, self.description.as_deref().unwrap_or(""))
    }
}

/// Trust tier of a publisher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceTier {
    #[serde(rename = "1")]
    Tier1,
    #[serde(rename = "2")]
    Tier2,
    #[serde(rename = "3")]
    Tier3,
    #[serde(rename = "excluded")]
    Excluded,
    #[serde(rename = "unknown")]
    Unknown,
}

impl SourceTier {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SourceTier::Tier1 => "1",
            SourceTier::Tier2 => "2",
            SourceTier::Tier3 => "3",
            SourceTier::Excluded => "excluded",
            SourceTier::Unknown => "unknown",
        }
    }

    /// Whether items from this tier may pass the source filter.
    #[must_use]
    pub fn is_trusted(self) -> bool {
        matches!(self, SourceTier::Tier1 | SourceTier::Tier2 | SourceTier::Tier3)
    }
}

impl std::fmt::Display for SourceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceTier {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" => Ok(SourceTier::Tier1),
            "2" => Ok(SourceTier::Tier2),
            "3" => Ok(SourceTier::Tier3),
            "excluded" => Ok(SourceTier::Excluded),
            "unknown" => Ok(SourceTier::Unknown),
            other => Err(UnknownVariant::new("source tier", other)),
        }
    }
}

/// Keyword-derived importance of a news item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    High,
    Medium,
    Low,
}

impl Importance {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Importance::High => "high",
            Importance::Medium => "medium",
            Importance::Low => "low",
        }
    }
}

impl std::fmt::Display for Importance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Importance {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(Importance::High),
            "medium" => Ok(Importance::Medium),
            "low" => Ok(Importance::Low),
            other => Err(UnknownVariant::new("importance", other)),
        }
    }
}

/// Market-hours bucket in Korea Standard Time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimePeriod {
    Peak,
    Active,
    Off,
}

impl TimePeriod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TimePeriod::Peak => "peak",
            TimePeriod::Active => "active",
            TimePeriod::Off => "off",
        }
    }

    /// Share of a batch, in percent, that may be sent for full-content enrichment.
    #[must_use]
    pub fn enrichment_quota_percent(self) -> usize {
        match self {
            TimePeriod::Peak => 15,
            TimePeriod::Active => 10,
            TimePeriod::Off => 5,
        }
    }
}

impl std::fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimePeriod {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "peak" => Ok(TimePeriod::Peak),
            "active" => Ok(TimePeriod::Active),
            "off" => Ok(TimePeriod::Off),
            other => Err(UnknownVariant::new("time period", other)),
        }
    }
}
