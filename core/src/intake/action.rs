use crate::questionnaire::Answer;
use crate::questionnaire::MatchType;

/// A single user interaction with the questionnaire or the contact form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeAction {
    SetMonthlySpend(u32),
    SetSmartBidding(Answer),
    SetPerformanceTarget(Answer),
    SetBrandCpc(Answer),
    SetImpressionShare(Answer),
    SetMatchType(MatchType),
    SetName(String),
    SetEmail(String),
}

impl IntakeAction {
    /// Whether applying the action can change the waste estimate.
    pub fn affects_estimate(&self) -> bool {
        matches!(
            self,
            IntakeAction::SetMonthlySpend(_)
                | IntakeAction::SetSmartBidding(_)
                | IntakeAction::SetPerformanceTarget(_)
                | IntakeAction::SetBrandCpc(_)
                | IntakeAction::SetImpressionShare(_)
        )
    }

    pub fn is_contact_field(&self) -> bool {
        matches!(self, IntakeAction::SetName(_) | IntakeAction::SetEmail(_))
    }
}
