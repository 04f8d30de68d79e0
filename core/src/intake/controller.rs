//! Intake state machine: collects answers, reveals the contact form and
//! drives a submission attempt to a terminal presentation state.

use serde::Serialize;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::contact::ContactDetails;
use crate::contact::ContactSubmission;
use crate::error::IntakeError;
use crate::estimator::WasteEstimate;
use crate::estimator::estimate_waste;
use crate::intake::action::IntakeAction;
use crate::intake::event::IntakeEvent;
use crate::pipeline::SubmissionPipeline;
use crate::pipeline::SubmissionReport;
use crate::questionnaire::Answer;
use crate::questionnaire::MonthlySpend;
use crate::questionnaire::QuestionId;
use crate::questionnaire::QuestionnaireInput;

/// Shown for any failed attempt; which sink failed is only logged.
pub const SUBMIT_ERROR_MESSAGE: &str =
    "There was an error submitting your request. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakePhase {
    /// Answering questions; the contact form is hidden.
    Collecting,
    /// Contact form visible and ready to submit.
    Revealed,
    /// An attempt is in flight; submit is disabled.
    Submitting,
    /// Terminal success state.
    Submitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionApplied {
    NoChange,
    StateChanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitResolution {
    Submitted { confirmation: String },
    Failed { message: String },
}

/// Render-ready view of the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntakeSnapshot {
    pub phase: IntakePhase,
    pub answers: QuestionnaireInput,
    pub estimate: String,
    pub form_visible: bool,
    pub submit_enabled: bool,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation: Option<String>,
}

#[derive(Debug, Clone)]
pub struct IntakeController {
    phase: IntakePhase,
    input: QuestionnaireInput,
    estimate: WasteEstimate,
    contact: ContactDetails,
    form_revealed: bool,
    in_flight_email: Option<String>,
    error: Option<String>,
    confirmation: Option<String>,
    events: Vec<IntakeEvent>,
}

impl IntakeController {
    pub fn new() -> Self {
        Self::with_input(QuestionnaireInput::default())
    }

    /// Starts from pre-filled answers. An answered match type counts as set,
    /// so the form starts revealed.
    pub fn with_input(input: QuestionnaireInput) -> Self {
        let mut controller = Self {
            phase: IntakePhase::Collecting,
            input,
            estimate: estimate_waste(&input),
            contact: ContactDetails::default(),
            form_revealed: false,
            in_flight_email: None,
            error: None,
            confirmation: None,
            events: Vec::new(),
        };
        if input.match_type_predominant.is_answered() {
            controller.reveal_form();
        }
        controller
    }

    pub fn phase(&self) -> IntakePhase {
        self.phase
    }

    pub fn input(&self) -> &QuestionnaireInput {
        &self.input
    }

    pub fn estimate(&self) -> &WasteEstimate {
        &self.estimate
    }

    pub fn contact(&self) -> &ContactDetails {
        &self.contact
    }

    pub fn is_form_visible(&self) -> bool {
        self.form_revealed
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn confirmation(&self) -> Option<&str> {
        self.confirmation.as_deref()
    }

    pub fn can_submit(&self) -> bool {
        self.phase == IntakePhase::Revealed && self.contact.is_complete()
    }

    pub fn visible_questions(&self) -> Vec<QuestionId> {
        self.input
            .visible_questions()
            .into_iter()
            .map(|q| q.id)
            .collect()
    }

    pub fn take_events(&mut self) -> Vec<IntakeEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> IntakeSnapshot {
        IntakeSnapshot {
            phase: self.phase,
            answers: self.input,
            estimate: self.estimate.formatted().to_string(),
            form_visible: self.form_revealed,
            submit_enabled: self.can_submit(),
            name: self.contact.name.clone(),
            email: self.contact.email.clone(),
            error: self.error.clone(),
            confirmation: self.confirmation.clone(),
        }
    }

    pub fn handle_action(&mut self, action: IntakeAction) -> Result<ActionApplied, IntakeError> {
        if action.is_contact_field() {
            if !self.form_revealed {
                return Err(IntakeError::FormHidden);
            }
            if self.phase == IntakePhase::Submitted {
                return Err(IntakeError::AlreadySubmitted);
            }
        }

        let affects_estimate = action.affects_estimate();
        let changed = match action {
            IntakeAction::SetMonthlySpend(dollars) => {
                let spend = MonthlySpend::new(dollars)?;
                replace(&mut self.input.monthly_spend, spend)
            }
            IntakeAction::SetSmartBidding(answer) => {
                replace(&mut self.input.uses_smart_bidding, answer)
            }
            IntakeAction::SetPerformanceTarget(answer) => {
                replace(&mut self.input.beats_performance_target, answer)
            }
            IntakeAction::SetBrandCpc(answer) => {
                replace(&mut self.input.brand_cpc_near_nonbrand, answer)
            }
            IntakeAction::SetImpressionShare(answer) => {
                replace(&mut self.input.high_impression_share, answer)
            }
            IntakeAction::SetMatchType(match_type) => {
                let changed = replace(&mut self.input.match_type_predominant, match_type);
                let revealed = match_type.is_answered() && self.reveal_form();
                changed || revealed
            }
            IntakeAction::SetName(name) => replace(&mut self.contact.name, name),
            IntakeAction::SetEmail(email) => replace(&mut self.contact.email, email),
        };

        if !changed {
            return Ok(ActionApplied::NoChange);
        }
        if affects_estimate {
            self.recompute();
        }
        Ok(ActionApplied::StateChanged)
    }

    /// Applies a yes/no answer to one of the four estimator questions.
    /// Spend and match type have their own actions and are ignored here.
    pub fn set_answer(
        &mut self,
        question: QuestionId,
        answer: Answer,
    ) -> Result<ActionApplied, IntakeError> {
        let action = match question {
            QuestionId::SmartBidding => IntakeAction::SetSmartBidding(answer),
            QuestionId::PerformanceTarget => IntakeAction::SetPerformanceTarget(answer),
            QuestionId::BrandCpc => IntakeAction::SetBrandCpc(answer),
            QuestionId::ImpressionShare => IntakeAction::SetImpressionShare(answer),
            QuestionId::MonthlySpend | QuestionId::MatchType => {
                return Ok(ActionApplied::NoChange);
            }
        };
        self.handle_action(action)
    }

    /// Validates the contact form, snapshots the attempt and enters
    /// `Submitting`. No sink is touched here.
    pub fn begin_submit(&mut self) -> Result<ContactSubmission, IntakeError> {
        match self.phase {
            IntakePhase::Collecting => return Err(IntakeError::FormHidden),
            IntakePhase::Submitting => return Err(IntakeError::SubmitInProgress),
            IntakePhase::Submitted => return Err(IntakeError::AlreadySubmitted),
            IntakePhase::Revealed => {}
        }
        self.contact.validate()?;

        let submission =
            ContactSubmission::new(&self.contact, self.input, self.estimate.formatted());
        self.error = None;
        self.in_flight_email = Some(submission.email.clone());
        self.set_phase(IntakePhase::Submitting);
        self.events.push(IntakeEvent::SubmitStarted {
            email: submission.email.clone(),
        });
        Ok(submission)
    }

    /// Resolves the in-flight attempt from the pipeline's report.
    pub fn finish_submit(
        &mut self,
        report: SubmissionReport,
    ) -> Result<SubmitResolution, IntakeError> {
        if self.phase != IntakePhase::Submitting {
            return Err(IntakeError::NotSubmitting);
        }
        let email = self.in_flight_email.take().unwrap_or_default();
        match report.into_result() {
            Ok(()) => {
                let confirmation = confirmation_message(&email);
                info!(%email, estimate = %self.estimate.formatted(), "submission delivered");
                self.contact.clear();
                self.confirmation = Some(confirmation.clone());
                self.set_phase(IntakePhase::Submitted);
                self.events.push(IntakeEvent::Submitted {
                    confirmation: confirmation.clone(),
                });
                Ok(SubmitResolution::Submitted { confirmation })
            }
            Err(err) => {
                warn!(error = %err, "submission failed");
                let message = SUBMIT_ERROR_MESSAGE.to_string();
                self.error = Some(message.clone());
                self.set_phase(IntakePhase::Revealed);
                self.events.push(IntakeEvent::SubmitFailed {
                    message: message.clone(),
                });
                Ok(SubmitResolution::Failed { message })
            }
        }
    }

    /// Runs one complete attempt against `pipeline`.
    pub async fn submit(
        &mut self,
        pipeline: &SubmissionPipeline,
    ) -> Result<SubmitResolution, IntakeError> {
        let submission = self.begin_submit()?;
        let report = pipeline.execute(&submission).await;
        self.finish_submit(report)
    }

    fn reveal_form(&mut self) -> bool {
        if self.form_revealed {
            return false;
        }
        self.form_revealed = true;
        if self.phase == IntakePhase::Collecting {
            self.set_phase(IntakePhase::Revealed);
        }
        self.events.push(IntakeEvent::FormRevealed);
        true
    }

    fn recompute(&mut self) {
        let estimate = estimate_waste(&self.input);
        debug!(estimate = %estimate.formatted(), "estimate recomputed");
        self.events.push(IntakeEvent::EstimateUpdated {
            estimate: estimate.formatted().to_string(),
        });
        self.estimate = estimate;
    }

    fn set_phase(&mut self, phase: IntakePhase) {
        debug!(from = ?self.phase, to = ?phase, "intake phase change");
        self.phase = phase;
    }
}

impl Default for IntakeController {
    fn default() -> Self {
        Self::new()
    }
}

pub fn confirmation_message(email: &str) -> String {
    format!(
        "Thank you for your submission! We've received your information and will send your personalized savings estimate to {email} shortly."
    )
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
