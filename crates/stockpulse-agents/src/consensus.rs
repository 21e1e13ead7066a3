use serde::Serialize;
use stockpulse_core::Recommendation;

use crate::opinion::AgentOpinions;

/// Consensus below this level sends the opinions to a debate round.
pub const DEBATE_THRESHOLD: u8 = 70;

/// Level reported when no opinion carries any confidence.
const NO_WEIGHT_LEVEL: u8 = 50;

/// Agreement among the five opinions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConsensusScore {
    /// Share of opinions on the most common recommendation, 0 to 100.
    pub level: u8,
    /// Confidence-weighted mean of +1 buy, 0 hold, -1 sell. `None` when the
    /// total confidence is zero. Informational: `level` does not use it.
    pub weighted_score: Option<f64>,
    pub buy: usize,
    pub sell: usize,
    pub hold: usize,
}

impl ConsensusScore {
    #[must_use]
    pub fn needs_debate(&self) -> bool {
        self.level < DEBATE_THRESHOLD
    }
}

/// Score agreement as `round(max(buy, sell, hold) / 5 * 100)`.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn score_consensus(opinions: &AgentOpinions) -> ConsensusScore {
    let mut buy = 0;
    let mut sell = 0;
    let mut hold = 0;
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    let mut count = 0usize;

    for opinion in opinions.iter() {
        match opinion.recommendation {
            Recommendation::Buy => buy += 1,
            Recommendation::Sell => sell += 1,
            Recommendation::Hold => hold += 1,
        }
        let weight = f64::from(opinion.confidence);
        weighted_sum += opinion.recommendation.signed_score() * weight;
        total_weight += weight;
        count += 1;
    }

    if total_weight <= 0.0 {
        return ConsensusScore {
            level: NO_WEIGHT_LEVEL,
            weighted_score: None,
            buy,
            sell,
            hold,
        };
    }

    let majority = buy.max(sell).max(hold);
    let level = (majority as f64 / count as f64 * 100.0).round() as u8;

    ConsensusScore {
        level,
        weighted_score: Some(weighted_sum / total_weight),
        buy,
        sell,
        hold,
    }
}

#[cfg(test)]
mod tests {
    use stockpulse_core::AgentDomain;

    use super::*;
    use crate::opinion::AgentOpinion;
    use Recommendation::{Buy, Hold, Sell};

    fn opinion(domain: AgentDomain, recommendation: Recommendation, confidence: u8) -> AgentOpinion {
        AgentOpinion {
            domain,
            recommendation,
            confidence,
            reasoning: Vec::new(),
            evaluation: None,
            key_topics: Vec::new(),
        }
    }

    fn opinions(recs: [(Recommendation, u8); 5]) -> AgentOpinions {
        let [f, t, n, m, r] = recs;
        AgentOpinions {
            fundamental: opinion(AgentDomain::Fundamental, f.0, f.1),
            technical: opinion(AgentDomain::Technical, t.0, t.1),
            news: opinion(AgentDomain::News, n.0, n.1),
            macroeconomic: opinion(AgentDomain::Macro, m.0, m.1),
            risk: opinion(AgentDomain::Risk, r.0, r.1),
        }
    }

    #[test]
    fn three_of_five_is_sixty_and_debates() {
        let score = score_consensus(&opinions([
            (Buy, 80),
            (Buy, 70),
            (Buy, 60),
            (Sell, 50),
            (Hold, 40),
        ]));
        assert_eq!(score.level, 60);
        assert!(score.needs_debate());
        assert_eq!((score.buy, score.sell, score.hold), (3, 1, 1));
    }

    #[test]
    fn unanimous_is_hundred_and_skips_debate() {
        let score = score_consensus(&opinions([(Buy, 90); 5]));
        assert_eq!(score.level, 100);
        assert!(!score.needs_debate());
        assert_eq!(score.weighted_score, Some(1.0));
    }

    #[test]
    fn four_of_five_clears_the_threshold() {
        let score = score_consensus(&opinions([
            (Sell, 10),
            (Sell, 10),
            (Sell, 10),
            (Sell, 10),
            (Buy, 100),
        ]));
        assert_eq!(score.level, 80);
        assert!(!score.needs_debate());
    }

    #[test]
    fn confidence_does_not_move_the_level() {
        let low = score_consensus(&opinions([
            (Buy, 1),
            (Buy, 1),
            (Buy, 1),
            (Sell, 100),
            (Sell, 100),
        ]));
        assert_eq!(low.level, 60);
        let weighted = low.weighted_score.unwrap();
        assert!(weighted < 0.0, "weighted score leans sell: {weighted}");
    }

    #[test]
    fn zero_total_confidence_defaults_to_fifty() {
        let score = score_consensus(&opinions([(Buy, 0); 5]));
        assert_eq!(score.level, 50);
        assert_eq!(score.weighted_score, None);
        assert!(score.needs_debate());
    }
}
