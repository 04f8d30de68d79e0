use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use anyhow::Result;
use anyhow::anyhow;
use brand_savings_core::AppConfig;
use brand_savings_core::Answer;
use brand_savings_core::IntakeAction;
use brand_savings_core::IntakeController;
use brand_savings_core::MatchType;
use brand_savings_core::MonthlySpend;
use brand_savings_core::SubmissionPipeline;
use brand_savings_core::contact::is_valid_email;
use brand_savings_core::intake::SubmitResolution;
use brand_savings_core::questionnaire::DEFAULT_MONTHLY_SPEND;
use brand_savings_core::questionnaire::QUESTIONS;
use brand_savings_core::questionnaire::Question;
use brand_savings_core::questionnaire::QuestionId;
use brand_savings_core::questionnaire::question as question_by_id;
use brand_savings_core::sinks::MemoryRecordStore;
use brand_savings_core::sinks::MemoryWebhook;
use clap::Parser;
use inquire::Confirm;
use inquire::Select;
use inquire::Text;
use inquire::validator::ErrorMessage;
use inquire::validator::Validation;

use crate::render;

type ValidatorResult = Result<Validation, Box<dyn std::error::Error + Send + Sync>>;

/// Walk through the questionnaire interactively and request the estimate.
#[derive(Debug, Default, Parser)]
pub struct RunCli {
    /// Optional TOML file with sink endpoints.
    #[arg(long = "config", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Deliver to in-memory sinks instead of the configured services.
    #[arg(long = "dry-run", default_value_t = false)]
    dry_run: bool,
}

pub async fn run(cli: RunCli) -> Result<()> {
    let pipeline = if cli.dry_run {
        SubmissionPipeline::new(
            Arc::new(MemoryRecordStore::new()),
            Arc::new(MemoryWebhook::new()),
        )
    } else {
        AppConfig::load(cli.config.as_deref())
            .context("failed to load configuration")?
            .pipeline()
    };

    let mut controller = IntakeController::new();
    print_estimate(&controller);

    for question in QUESTIONS {
        if !controller.visible_questions().contains(&question.id) {
            continue;
        }
        ask(&mut controller, question)?;
        print_estimate(&controller);
    }

    while Confirm::new("Change an answer before continuing?")
        .with_default(false)
        .prompt()
        .map_err(|err| anyhow!("Wizard cancelled: {err}"))?
    {
        revise_answer(&mut controller)?;
    }

    loop {
        collect_contact(&mut controller)?;
        match controller.submit(&pipeline).await? {
            SubmitResolution::Submitted { confirmation } => {
                println!("{}", render::success(&confirmation));
                return Ok(());
            }
            SubmitResolution::Failed { message } => {
                println!("{}", render::failure(&message));
                let next = Select::new("What next?", RetryChoice::ALL.to_vec())
                    .prompt()
                    .map_err(|err| anyhow!("Wizard cancelled: {err}"))?;
                match next {
                    RetryChoice::TryAgain => {}
                    RetryChoice::ChangeAnswer => revise_answer(&mut controller)?,
                    RetryChoice::Quit => return Err(anyhow!(message)),
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RetryChoice {
    TryAgain,
    ChangeAnswer,
    Quit,
}

impl RetryChoice {
    const ALL: [RetryChoice; 3] = [
        RetryChoice::TryAgain,
        RetryChoice::ChangeAnswer,
        RetryChoice::Quit,
    ];
}

impl fmt::Display for RetryChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RetryChoice::TryAgain => "Try again",
            RetryChoice::ChangeAnswer => "Change an answer, then try again",
            RetryChoice::Quit => "Quit",
        };
        f.write_str(label)
    }
}

/// Questions a user may revisit: whatever is visible for the current answers.
fn revisable_questions(controller: &IntakeController) -> Vec<&'static Question> {
    let visible = controller.visible_questions();
    QUESTIONS
        .iter()
        .filter(|q| visible.contains(&q.id))
        .collect()
}

fn revise_answer(controller: &mut IntakeController) -> Result<()> {
    let prompts: Vec<&str> = revisable_questions(controller)
        .iter()
        .map(|q| q.prompt)
        .collect();
    let chosen = Select::new("Which answer?", prompts)
        .prompt()
        .map_err(|err| anyhow!("Wizard cancelled: {err}"))?;
    let question = QUESTIONS
        .iter()
        .find(|q| q.prompt == chosen)
        .ok_or_else(|| anyhow!("unknown question '{chosen}'"))?;
    ask(controller, question)?;
    // Turning smart bidding on exposes the follow-up question.
    if question.id == QuestionId::SmartBidding
        && controller.visible_questions().contains(&QuestionId::PerformanceTarget)
    {
        ask(controller, question_by_id(QuestionId::PerformanceTarget))?;
    }
    print_estimate(controller);
    Ok(())
}

fn print_estimate(controller: &IntakeController) {
    println!(
        "Estimated wasted spend: {}",
        render::highlight(controller.estimate().formatted())
    );
}

fn ask(controller: &mut IntakeController, question: &Question) -> Result<()> {
    match question.id {
        QuestionId::MonthlySpend => {
            let dollars = prompt_spend(question)?;
            controller.handle_action(IntakeAction::SetMonthlySpend(dollars))?;
        }
        QuestionId::MatchType => {
            let choice = Select::new(question.prompt, question.options.to_vec())
                .prompt()
                .map_err(|err| anyhow!("Wizard cancelled: {err}"))?;
            let match_type = [MatchType::Broad, MatchType::ExactOrPhrase]
                .into_iter()
                .find(|m| m.label() == choice)
                .ok_or_else(|| anyhow!("unknown match type '{choice}'"))?;
            controller.handle_action(IntakeAction::SetMatchType(match_type))?;
        }
        _ => {
            let choice = Select::new(question.prompt, question.options.to_vec())
                .prompt()
                .map_err(|err| anyhow!("Wizard cancelled: {err}"))?;
            let answer = if choice == "Yes" { Answer::Yes } else { Answer::No };
            controller.set_answer(question.id, answer)?;
        }
    }
    Ok(())
}

fn prompt_spend(question: &Question) -> Result<u32> {
    let raw = Text::new(question.prompt)
        .with_initial_value(&DEFAULT_MONTHLY_SPEND.to_string())
        .with_help_message("$1,000 to $200,000 in steps of $1,000")
        .with_validator(|input: &str| -> ValidatorResult {
            match parse_spend(input) {
                Ok(_) => Ok(Validation::Valid),
                Err(err) => Ok(Validation::Invalid(ErrorMessage::Custom(err))),
            }
        })
        .prompt()
        .map_err(|err| anyhow!("Wizard cancelled: {err}"))?;
    parse_spend(&raw).map_err(|err| anyhow!(err))
}

fn parse_spend(input: &str) -> Result<u32, String> {
    let digits: String = input
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    let dollars = digits
        .parse::<u32>()
        .map_err(|_| format!("'{input}' is not a whole dollar amount"))?;
    MonthlySpend::new(dollars)
        .map(MonthlySpend::dollars)
        .map_err(|err| err.to_string())
}

fn collect_contact(controller: &mut IntakeController) -> Result<()> {
    let name = Text::new("Name")
        .with_initial_value(&controller.contact().name)
        .with_validator(|input: &str| -> ValidatorResult {
            if input.trim().is_empty() {
                Ok(Validation::Invalid(ErrorMessage::Custom(
                    "Name is required".to_string(),
                )))
            } else {
                Ok(Validation::Valid)
            }
        })
        .prompt()
        .map_err(|err| anyhow!("Wizard cancelled: {err}"))?;
    controller.handle_action(IntakeAction::SetName(name))?;

    let email = Text::new("Email")
        .with_initial_value(&controller.contact().email)
        .with_validator(|input: &str| -> ValidatorResult {
            if is_valid_email(input.trim()) {
                Ok(Validation::Valid)
            } else {
                Ok(Validation::Invalid(ErrorMessage::Custom(
                    "Enter a valid email address".to_string(),
                )))
            }
        })
        .prompt()
        .map_err(|err| anyhow!("Wizard cancelled: {err}"))?;
    controller.handle_action(IntakeAction::SetEmail(email))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_spend_accepts_formatted_amounts() {
        assert_eq!(parse_spend("30000"), Ok(30_000));
        assert_eq!(parse_spend("$45,000"), Ok(45_000));
        assert_eq!(parse_spend(" 1000 "), Ok(1_000));
    }

    #[test]
    fn revisable_questions_track_smart_bidding() {
        let mut controller = IntakeController::new();
        let ids = |c: &IntakeController| {
            revisable_questions(c)
                .into_iter()
                .map(|q| q.id)
                .collect::<Vec<_>>()
        };
        assert!(!ids(&controller).contains(&QuestionId::PerformanceTarget));

        controller
            .set_answer(QuestionId::SmartBidding, Answer::Yes)
            .expect("answer");
        assert_eq!(
            ids(&controller),
            vec![
                QuestionId::MonthlySpend,
                QuestionId::SmartBidding,
                QuestionId::PerformanceTarget,
                QuestionId::BrandCpc,
                QuestionId::ImpressionShare,
                QuestionId::MatchType,
            ]
        );
    }

    #[test]
    fn retry_menu_offers_changing_an_answer() {
        let labels: Vec<String> = RetryChoice::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(
            labels,
            vec!["Try again", "Change an answer, then try again", "Quit"]
        );
    }

    #[test]
    fn parse_spend_rejects_off_grid_values() {
        assert!(parse_spend("1500").is_err());
        assert!(parse_spend("0").is_err());
        assert!(parse_spend("201000").is_err());
        assert!(parse_spend("lots").is_err());
    }
}
