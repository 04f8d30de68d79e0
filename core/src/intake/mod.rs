//! Intake controller shared by every front-end.
//!
//! User interactions arrive as [`IntakeAction`] values and are applied to the
//! in-memory [`IntakeController`]. Each change to an estimator input re-runs
//! the estimator immediately; answering the match-type question reveals the
//! contact form. Front-ends render from [`IntakeSnapshot`] and drain
//! [`IntakeEvent`]s to react to transitions.

mod action;
mod controller;
mod event;

pub use action::IntakeAction;
pub use controller::ActionApplied;
pub use controller::IntakeController;
pub use controller::IntakePhase;
pub use controller::IntakeSnapshot;
pub use controller::SUBMIT_ERROR_MESSAGE;
pub use controller::SubmitResolution;
pub use controller::confirmation_message;
pub use event::IntakeEvent;
