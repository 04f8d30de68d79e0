use thiserror::Error;

use crate::questionnaire::MAX_MONTHLY_SPEND;
use crate::questionnaire::MIN_MONTHLY_SPEND;
use crate::questionnaire::SPEND_STEP;

/// Locally recoverable input problems. These are raised before any sink is
/// contacted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("monthly spend {0} is outside {MIN_MONTHLY_SPEND}..={MAX_MONTHLY_SPEND}")]
    SpendOutOfRange(u32),
    #[error("monthly spend {0} is not a multiple of {SPEND_STEP}")]
    SpendOffStep(u32),
    #[error("name must not be empty")]
    EmptyName,
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IntakeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("the contact form has not been revealed yet")]
    FormHidden,
    #[error("a submission is already in flight")]
    SubmitInProgress,
    #[error("the request has already been submitted")]
    AlreadySubmitted,
    #[error("no submission is in flight")]
    NotSubmitting,
}
