use anyhow::Context;
use anyhow::Result;
use brand_savings_core::Answer;
use brand_savings_core::IntakeAction;
use brand_savings_core::IntakeController;
use brand_savings_core::MatchType;
use brand_savings_core::questionnaire::DEFAULT_MONTHLY_SPEND;
use clap::Args;
use clap::ValueEnum;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum YesNo {
    Yes,
    No,
}

impl From<YesNo> for Answer {
    fn from(value: YesNo) -> Self {
        match value {
            YesNo::Yes => Answer::Yes,
            YesNo::No => Answer::No,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MatchTypeArg {
    Broad,
    ExactOrPhrase,
}

impl From<MatchTypeArg> for MatchType {
    fn from(value: MatchTypeArg) -> Self {
        match value {
            MatchTypeArg::Broad => MatchType::Broad,
            MatchTypeArg::ExactOrPhrase => MatchType::ExactOrPhrase,
        }
    }
}

/// Questionnaire answers given as flags. Omitted questions stay unanswered.
#[derive(Debug, Clone, Args)]
pub struct AnswerArgs {
    /// Monthly branded search spend in dollars (1000-200000, step 1000).
    #[arg(long = "spend", value_name = "DOLLARS", default_value_t = DEFAULT_MONTHLY_SPEND)]
    pub spend: u32,

    /// Using a smart bidding strategy (tROAS, tCPA, Max Conversions, ...).
    #[arg(long = "smart-bidding", value_enum)]
    pub smart_bidding: Option<YesNo>,

    /// Performance is better than the smart bidding target.
    #[arg(long = "performance-target", value_enum)]
    pub performance_target: Option<YesNo>,

    /// Brand CPC is higher than or within 25% of nonbrand CPC.
    #[arg(long = "brand-cpc", value_enum)]
    pub brand_cpc: Option<YesNo>,

    /// Search impression share is above 90%.
    #[arg(long = "impression-share", value_enum)]
    pub impression_share: Option<YesNo>,

    /// Predominant match type of the brand campaign.
    #[arg(long = "match-type", value_enum)]
    pub match_type: Option<MatchTypeArg>,
}

impl AnswerArgs {
    /// Replays the flags through the controller in questionnaire order.
    pub fn apply(&self, controller: &mut IntakeController) -> Result<()> {
        let mut actions = vec![IntakeAction::SetMonthlySpend(self.spend)];
        let answers = [
            self.smart_bidding.map(|a| IntakeAction::SetSmartBidding(a.into())),
            self.performance_target
                .map(|a| IntakeAction::SetPerformanceTarget(a.into())),
            self.brand_cpc.map(|a| IntakeAction::SetBrandCpc(a.into())),
            self.impression_share
                .map(|a| IntakeAction::SetImpressionShare(a.into())),
            self.match_type.map(|m| IntakeAction::SetMatchType(m.into())),
        ];
        actions.extend(answers.into_iter().flatten());
        for action in actions {
            controller
                .handle_action(action.clone())
                .with_context(|| format!("rejected answer {action:?}"))?;
        }
        Ok(())
    }
}
