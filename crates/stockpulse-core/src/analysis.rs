use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::UnknownVariant;

/// Lowercases and trims a model-produced label before matching it.
fn normalize_label(s: &str) -> String {
    s.trim().to_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "positive" => Ok(Sentiment::Positive),
            "negative" => Ok(Sentiment::Negative),
            "neutral" => Ok(Sentiment::Neutral),
            _ => Err(UnknownVariant::new("sentiment", s)),
        }
    }
}

/// Expected market impact of a news item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

impl Impact {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Impact::High => "high",
            Impact::Medium => "medium",
            Impact::Low => "low",
        }
    }
}

impl std::fmt::Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Impact {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "high" => Ok(Impact::High),
            "medium" => Ok(Impact::Medium),
            "low" => Ok(Impact::Low),
            _ => Err(UnknownVariant::new("impact", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Buy,
    Sell,
    Hold,
}

impl Recommendation {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Recommendation::Buy => "buy",
            Recommendation::Sell => "sell",
            Recommendation::Hold => "hold",
        }
    }

    /// Direction used by the weighted consensus score.
    #[must_use]
    pub fn signed_score(self) -> f64 {
        match self {
            Recommendation::Buy => 1.0,
            Recommendation::Sell => -1.0,
            Recommendation::Hold => 0.0,
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Recommendation {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "buy" => Ok(Recommendation::Buy),
            "sell" => Ok(Recommendation::Sell),
            "hold" => Ok(Recommendation::Hold),
            _ => Err(UnknownVariant::new("recommendation", s)),
        }
    }
}

/// The five analyst perspectives that each contribute one opinion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentDomain {
    Fundamental,
    Technical,
    News,
    Macro,
    Risk,
}

impl AgentDomain {
    pub const ALL: [AgentDomain; 5] = [
        AgentDomain::Fundamental,
        AgentDomain::Technical,
        AgentDomain::News,
        AgentDomain::Macro,
        AgentDomain::Risk,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AgentDomain::Fundamental => "fundamental",
            AgentDomain::Technical => "technical",
            AgentDomain::News => "news",
            AgentDomain::Macro => "macro",
            AgentDomain::Risk => "risk",
        }
    }
}

impl std::fmt::Display for AgentDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentDomain {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "fundamental" => Ok(AgentDomain::Fundamental),
            "technical" => Ok(AgentDomain::Technical),
            "news" => Ok(AgentDomain::News),
            "macro" => Ok(AgentDomain::Macro),
            "risk" => Ok(AgentDomain::Risk),
            _ => Err(UnknownVariant::new("agent domain", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recommendation_parse_ignores_case_and_padding() {
        assert_eq!(" BUY ".parse::<Recommendation>().unwrap(), Recommendation::Buy);
        assert_eq!("Hold".parse::<Recommendation>().unwrap(), Recommendation::Hold);
    }

    #[test]
    fn recommendation_rejects_other_words() {
        assert!("strong buy".parse::<Recommendation>().is_err());
        assert!("".parse::<Recommendation>().is_err());
    }

    #[test]
    fn signed_scores() {
        assert!((Recommendation::Buy.signed_score() - 1.0).abs() < f64::EPSILON);
        assert!((Recommendation::Sell.signed_score() + 1.0).abs() < f64::EPSILON);
        assert!(Recommendation::Hold.signed_score().abs() < f64::EPSILON);
    }

    #[test]
    fn sentiment_and_impact_parse() {
        assert_eq!("negative".parse::<Sentiment>().unwrap(), Sentiment::Negative);
        assert_eq!("LOW".parse::<Impact>().unwrap(), Impact::Low);
        assert!("bullish".parse::<Sentiment>().is_err());
        assert!("critical".parse::<Impact>().is_err());
    }

    #[test]
    fn agent_domains_are_distinct_and_ordered() {
        let names: Vec<&str> = AgentDomain::ALL.iter().map(|d| d.as_str()).collect();
        assert_eq!(
            names,
            vec!["fundamental", "technical", "news", "macro", "risk"]
        );
        for domain in AgentDomain::ALL {
            assert_eq!(domain.as_str().parse::<AgentDomain>().unwrap(), domain);
        }
    }
}
