//! Questionnaire answers and the catalog of questions shown to the user.

use serde::Deserialize;
use serde::Serialize;
use std::fmt;

use crate::currency::format_whole_dollars;
use crate::error::ValidationError;

pub const MIN_MONTHLY_SPEND: u32 = 1_000;
pub const MAX_MONTHLY_SPEND: u32 = 200_000;
pub const SPEND_STEP: u32 = 1_000;
pub const DEFAULT_MONTHLY_SPEND: u32 = 30_000;

/// Yes/no answer that keeps "not answered yet" distinct from "no".
///
/// The wire strings match what the record store has always held: `""`,
/// `"yes"` and `"no"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Answer {
    #[default]
    #[serde(rename = "")]
    Unanswered,
    #[serde(rename = "yes")]
    Yes,
    #[serde(rename = "no")]
    No,
}

impl Answer {
    pub fn is_yes(self) -> bool {
        matches!(self, Answer::Yes)
    }
}

/// Predominant match type of the brand campaign.
///
/// Serialized with the historical `"yes"` (broad) / `"no"` (exact or phrase)
/// encoding so stored rows and webhook consumers keep working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MatchType {
    #[default]
    #[serde(rename = "")]
    Unanswered,
    #[serde(rename = "yes")]
    Broad,
    #[serde(rename = "no")]
    ExactOrPhrase,
}

impl MatchType {
    pub fn is_answered(self) -> bool {
        !matches!(self, MatchType::Unanswered)
    }

    pub const fn label(self) -> &'static str {
        match self {
            MatchType::Unanswered => "Unanswered",
            MatchType::Broad => "Broad Match",
            MatchType::ExactOrPhrase => "Exact/Phrase Match",
        }
    }
}

/// Monthly branded search spend in whole dollars, constrained to the slider
/// domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct MonthlySpend(u32);

impl MonthlySpend {
    pub fn new(dollars: u32) -> Result<Self, ValidationError> {
        if !(MIN_MONTHLY_SPEND..=MAX_MONTHLY_SPEND).contains(&dollars) {
            return Err(ValidationError::SpendOutOfRange(dollars));
        }
        if dollars % SPEND_STEP != 0 {
            return Err(ValidationError::SpendOffStep(dollars));
        }
        Ok(Self(dollars))
    }

    pub fn dollars(self) -> u32 {
        self.0
    }

    /// Whole-dollar rendering used next to the slider, e.g. `$30,000`.
    pub fn display(self) -> String {
        format_whole_dollars(u64::from(self.0))
    }
}

impl Default for MonthlySpend {
    fn default() -> Self {
        Self(DEFAULT_MONTHLY_SPEND)
    }
}

impl<'de> Deserialize<'de> for MonthlySpend {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = u32::deserialize(deserializer)?;
        MonthlySpend::new(raw).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for MonthlySpend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Everything the user has entered into the questionnaire so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuestionnaireInput {
    pub monthly_spend: MonthlySpend,
    pub uses_smart_bidding: Answer,
    /// Only meaningful while `uses_smart_bidding` is `Yes`.
    pub beats_performance_target: Answer,
    pub brand_cpc_near_nonbrand: Answer,
    pub high_impression_share: Answer,
    /// Not used by the estimator; answering it reveals the contact form.
    pub match_type_predominant: MatchType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionId {
    MonthlySpend,
    SmartBidding,
    PerformanceTarget,
    BrandCpc,
    ImpressionShare,
    MatchType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub id: QuestionId,
    pub prompt: &'static str,
    /// Option labels in display order. Empty for the spend slider.
    pub options: &'static [&'static str],
    pub last: bool,
}

const YES_NO: &[&str] = &["Yes", "No"];

pub const QUESTIONS: &[Question] = &[
    Question {
        id: QuestionId::MonthlySpend,
        prompt: "Monthly branded search spend",
        options: &[],
        last: false,
    },
    Question {
        id: QuestionId::SmartBidding,
        prompt: "Are you using a smart bidding strategy? (tROAS, tCPA, Max Conversions, etc)",
        options: YES_NO,
        last: false,
    },
    Question {
        id: QuestionId::PerformanceTarget,
        prompt: "Is your performance better than your target?",
        options: YES_NO,
        last: false,
    },
    Question {
        id: QuestionId::BrandCpc,
        prompt: "Is your brand CPC higher than or within 25% of your nonbrand CPC?",
        options: YES_NO,
        last: false,
    },
    Question {
        id: QuestionId::ImpressionShare,
        prompt: "Is your search impression share above 90%?",
        options: YES_NO,
        last: false,
    },
    Question {
        id: QuestionId::MatchType,
        prompt: "What match type are you predominantly using for your brand search campaign?",
        options: &["Broad Match", "Exact/Phrase Match"],
        last: true,
    },
];

pub fn question(id: QuestionId) -> &'static Question {
    // QUESTIONS covers every QuestionId in declaration order.
    &QUESTIONS[id as usize]
}

impl QuestionnaireInput {
    /// Questions to present for the current answers. The performance target
    /// follow-up only applies to smart bidding accounts.
    pub fn visible_questions(&self) -> Vec<&'static Question> {
        QUESTIONS
            .iter()
            .filter(|q| {
                q.id != QuestionId::PerformanceTarget || self.uses_smart_bidding.is_yes()
            })
            .collect()
    }
}
