use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use brand_savings_core::AppConfig;
use brand_savings_core::IntakeAction;
use brand_savings_core::IntakeController;
use brand_savings_core::SubmissionPipeline;
use brand_savings_core::intake::IntakeSnapshot;
use brand_savings_core::intake::SubmitResolution;
use brand_savings_core::sinks::MemoryRecordStore;
use brand_savings_core::sinks::MemoryWebhook;
use clap::Parser;
use serde::Serialize;

use crate::args::AnswerArgs;
use crate::render;

/// Submit answers and contact details without prompting.
#[derive(Debug, Parser)]
pub struct SubmitCli {
    #[command(flatten)]
    answers: AnswerArgs,

    /// Contact name.
    #[arg(long = "name")]
    name: String,

    /// Contact email address.
    #[arg(long = "email")]
    email: String,

    /// Optional TOML file with sink endpoints.
    #[arg(long = "config", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Deliver to in-memory sinks and print what would have been sent.
    #[arg(long = "dry-run", default_value_t = false)]
    dry_run: bool,

    /// Emit the final controller snapshot as JSON (with the captured
    /// payloads under `--dry-run`).
    #[arg(long = "json", default_value_t = false)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct DryRunOutput {
    snapshot: IntakeSnapshot,
    records: Vec<serde_json::Value>,
    webhook_calls: Vec<serde_json::Value>,
}

pub async fn run(cli: SubmitCli) -> Result<()> {
    let mut controller = IntakeController::new();
    cli.answers.apply(&mut controller)?;
    if !controller.is_form_visible() {
        bail!("--match-type is required before contact details can be submitted");
    }
    controller.handle_action(IntakeAction::SetName(cli.name))?;
    controller.handle_action(IntakeAction::SetEmail(cli.email))?;

    if cli.dry_run {
        let store = Arc::new(MemoryRecordStore::new());
        let webhook = Arc::new(MemoryWebhook::new());
        let pipeline = SubmissionPipeline::new(store.clone(), webhook.clone());
        let resolution = controller.submit(&pipeline).await?;
        if !cli.json {
            for (collection, record) in store.rows() {
                println!(
                    "Dry run: would insert into '{collection}': {} <{}>, {} / month, {}",
                    record.name,
                    record.email,
                    record.monthly_spend,
                    record.estimated_waste
                );
            }
            println!("Dry run: {} webhook notification(s)", webhook.call_count());
            return finish(resolution);
        }
        let output = DryRunOutput {
            snapshot: controller.snapshot(),
            records: store
                .rows()
                .into_iter()
                .map(|(_, record)| serde_json::to_value(record))
                .collect::<Result<_, _>>()?,
            webhook_calls: webhook
                .calls()
                .into_iter()
                .map(serde_json::to_value)
                .collect::<Result<_, _>>()?,
        };
        render::print_json(&output)?;
        return finish(resolution);
    }

    let config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    let pipeline = config.pipeline();
    let resolution = controller.submit(&pipeline).await?;
    if cli.json {
        render::print_json(&controller.snapshot())?;
    }
    finish(resolution)
}

fn finish(resolution: SubmitResolution) -> Result<()> {
    match resolution {
        SubmitResolution::Submitted { confirmation } => {
            eprintln!("{}", render::success(&confirmation));
            Ok(())
        }
        SubmitResolution::Failed { message } => bail!(message),
    }
}
