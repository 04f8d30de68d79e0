use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum IntakeEvent {
    EstimateUpdated { estimate: String },
    FormRevealed,
    SubmitStarted { email: String },
    Submitted { confirmation: String },
    SubmitFailed { message: String },
}
