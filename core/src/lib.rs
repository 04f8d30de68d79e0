//! Branded-search waste estimation and lead intake.
//!
//! The estimator is a pure function over the questionnaire answers. The
//! intake controller owns the answers, keeps the estimate current and drives
//! a submission through the record store and webhook sinks.

pub mod config;
pub mod contact;
pub mod currency;
pub mod error;
pub mod estimator;
pub mod intake;
pub mod pipeline;
pub mod questionnaire;
pub mod sinks;

pub use config::AppConfig;
pub use contact::ContactDetails;
pub use contact::ContactSubmission;
pub use error::IntakeError;
pub use error::ValidationError;
pub use estimator::WasteEstimate;
pub use estimator::estimate_waste;
pub use intake::IntakeAction;
pub use intake::IntakeController;
pub use intake::IntakePhase;
pub use pipeline::SubmissionPipeline;
pub use questionnaire::Answer;
pub use questionnaire::MatchType;
pub use questionnaire::MonthlySpend;
pub use questionnaire::QuestionnaireInput;
