//! Branded-search waste estimate.
//!
//! A fixed multiplicative model: a base share of monthly spend, scaled by one
//! factor per estimator question. Unanswered questions take the "no" branch,
//! so the estimate is defined for any partially filled questionnaire.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::currency::format_usd;
use crate::currency::round_to_cents;
use crate::questionnaire::QuestionnaireInput;

/// Share of spend assumed wasted before any adjustments (0.1667).
const BASE_WASTE_RATE: Decimal = Decimal::from_parts(1667, 0, 0, false, 4);
const SMART_BIDDING_FACTOR: Decimal = Decimal::from_parts(120, 0, 0, false, 2);
const BEATS_TARGET_FACTOR: Decimal = Decimal::from_parts(125, 0, 0, false, 2);
const BRAND_CPC_FAR_FACTOR: Decimal = Decimal::from_parts(115, 0, 0, false, 2);
const HIGH_IMPRESSION_SHARE_FACTOR: Decimal = Decimal::from_parts(125, 0, 0, false, 2);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WasteEstimate {
    /// Rounded to the cent.
    amount: Decimal,
    formatted: String,
}

impl WasteEstimate {
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Currency string shown to the user and submitted to the sinks.
    pub fn formatted(&self) -> &str {
        &self.formatted
    }
}

/// The individual factors applied to the base, exposed for explanations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Multipliers {
    pub smart_bidding: Decimal,
    pub performance_target: Decimal,
    pub brand_cpc: Decimal,
    pub impression_share: Decimal,
}

impl Multipliers {
    pub fn for_input(input: &QuestionnaireInput) -> Self {
        let smart_bidding = input.uses_smart_bidding.is_yes();
        Self {
            smart_bidding: if smart_bidding {
                SMART_BIDDING_FACTOR
            } else {
                Decimal::ONE
            },
            performance_target: if smart_bidding && input.beats_performance_target.is_yes() {
                BEATS_TARGET_FACTOR
            } else {
                Decimal::ONE
            },
            brand_cpc: if input.brand_cpc_near_nonbrand.is_yes() {
                Decimal::ONE
            } else {
                BRAND_CPC_FAR_FACTOR
            },
            impression_share: if input.high_impression_share.is_yes() {
                HIGH_IMPRESSION_SHARE_FACTOR
            } else {
                Decimal::ONE
            },
        }
    }

    pub fn product(&self) -> Decimal {
        self.smart_bidding * self.performance_target * self.brand_cpc * self.impression_share
    }
}

pub fn base_waste(input: &QuestionnaireInput) -> Decimal {
    Decimal::from(input.monthly_spend.dollars()) * BASE_WASTE_RATE
}

pub fn estimate_waste(input: &QuestionnaireInput) -> WasteEstimate {
    let raw = base_waste(input) * Multipliers::for_input(input).product();
    WasteEstimate {
        amount: round_to_cents(raw),
        formatted: format_usd(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questionnaire::Answer;
    use crate::questionnaire::MatchType;
    use crate::questionnaire::MonthlySpend;
    use pretty_assertions::assert_eq;

    fn input(spend: u32) -> QuestionnaireInput {
        QuestionnaireInput {
            monthly_spend: MonthlySpend::new(spend).expect("valid spend"),
            ..Default::default()
        }
    }

    fn all_answers() -> Vec<Answer> {
        vec![Answer::Unanswered, Answer::Yes, Answer::No]
    }

    #[test]
    fn minimum_spend_all_no() {
        let mut q = input(1_000);
        q.uses_smart_bidding = Answer::No;
        q.beats_performance_target = Answer::No;
        q.brand_cpc_near_nonbrand = Answer::No;
        q.high_impression_share = Answer::No;
        assert_eq!(estimate_waste(&q).formatted(), "$191.71");
    }

    #[test]
    fn all_positive_answers() {
        let mut q = input(30_000);
        q.uses_smart_bidding = Answer::Yes;
        q.beats_performance_target = Answer::Yes;
        q.brand_cpc_near_nonbrand = Answer::Yes;
        q.high_impression_share = Answer::Yes;
        let estimate = estimate_waste(&q);
        assert_eq!(estimate.formatted(), "$9,376.88");
        assert_eq!(estimate.amount(), Decimal::new(937_688, 2));
    }

    #[test]
    fn unanswered_matches_no() {
        let mut answered = input(50_000);
        answered.uses_smart_bidding = Answer::No;
        answered.brand_cpc_near_nonbrand = Answer::No;
        answered.high_impression_share = Answer::No;
        assert_eq!(estimate_waste(&answered), estimate_waste(&input(50_000)));
    }

    #[test]
    fn repeated_calls_are_identical() {
        let mut q = input(75_000);
        q.uses_smart_bidding = Answer::Yes;
        q.high_impression_share = Answer::Yes;
        let first = estimate_waste(&q);
        for _ in 0..10 {
            assert_eq!(estimate_waste(&q), first);
        }
    }

    #[test]
    fn performance_target_only_counts_with_smart_bidding() {
        for smart in [Answer::Unanswered, Answer::No] {
            let mut with_target = input(40_000);
            with_target.uses_smart_bidding = smart;
            with_target.beats_performance_target = Answer::Yes;
            let mut without = with_target;
            without.beats_performance_target = Answer::Unanswered;
            assert_eq!(estimate_waste(&with_target), estimate_waste(&without));
        }

        let mut smart = input(40_000);
        smart.uses_smart_bidding = Answer::Yes;
        let mut beats = smart;
        beats.beats_performance_target = Answer::Yes;
        assert!(estimate_waste(&beats).amount() > estimate_waste(&smart).amount());
    }

    #[test]
    fn never_decreases_with_spend() {
        for smart in all_answers() {
            for target in all_answers() {
                for cpc in all_answers() {
                    for share in all_answers() {
                        let mut previous = Decimal::ZERO;
                        for spend in (1_000..=200_000).step_by(1_000) {
                            let mut q = input(spend);
                            q.uses_smart_bidding = smart;
                            q.beats_performance_target = target;
                            q.brand_cpc_near_nonbrand = cpc;
                            q.high_impression_share = share;
                            let amount = estimate_waste(&q).amount();
                            assert!(amount >= previous, "spend {spend} decreased estimate");
                            previous = amount;
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn match_type_does_not_affect_estimate() {
        let base = input(20_000);
        for match_type in [MatchType::Broad, MatchType::ExactOrPhrase] {
            let mut q = base;
            q.match_type_predominant = match_type;
            assert_eq!(estimate_waste(&q), estimate_waste(&base));
        }
    }

    #[test]
    fn multipliers_reflect_answers() {
        let mut q = input(10_000);
        q.brand_cpc_near_nonbrand = Answer::Yes;
        q.high_impression_share = Answer::Yes;
        let m = Multipliers::for_input(&q);
        assert_eq!(m.smart_bidding, Decimal::ONE);
        assert_eq!(m.brand_cpc, Decimal::ONE);
        assert_eq!(m.impression_share, Decimal::new(125, 2));
        assert_eq!(m.product(), Decimal::new(125, 2));
    }

    #[test]
    fn estimates_on_worker_threads_match() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| estimate_waste(&input(1_000)).formatted().to_string()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().expect("estimate thread"), "$191.71");
        }
        assert_eq!(estimate_waste(&input(30_000)).formatted(), "$5,751.15");
    }
}
