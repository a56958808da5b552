mod cli;
mod config;
mod display;
mod telemetry;

use std::path::Path;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use floodrisk_core::{AssessmentResult, ImageInput};
use floodrisk_remote::decode_data_url;
use floodrisk_store::HistoryFilter;
use tracing::info;

use crate::cli::{AssessCommand, Cli, Command, HistoryArgs, ImageArgs, ManualArgs};
use crate::config::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init("info")?;
    let cli = Cli::parse();
    info!("floodrisk v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Assess {
            command: AssessCommand::Manual(args),
        } => assess_manual(&cli.settings, &args),
        Command::Assess {
            command: AssessCommand::Image(args),
        } => assess_image(&cli.settings, &args).await,
        Command::History(args) => history(&cli.settings, &args),
    }
}

fn assess_manual(settings: &Settings, args: &ManualArgs) -> anyhow::Result<()> {
    let ctx = args.context.context();
    let assessor = settings.manual_assessor(ctx.model);
    let result = assessor.assess_manual(&args.input(), ctx)?;
    report(settings, &result, &[])
}

async fn assess_image(settings: &Settings, args: &ImageArgs) -> anyhow::Result<()> {
    let image = load_image(&args.image).await?;
    let ctx = args.context.context();
    let assessor = settings.image_assessor(ctx.model)?;
    let outcome = assessor.assess_image(&image, ctx).await;
    report(settings, &outcome.result, &outcome.degradations)
}

async fn load_image(source: &str) -> anyhow::Result<ImageInput> {
    if source.starts_with("data:") {
        return Ok(decode_data_url(source)?);
    }
    let path = Path::new(source);
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("read image {}", path.display()))?;
    Ok(ImageInput::from_path(path, bytes)?)
}

fn report(
    settings: &Settings,
    result: &AssessmentResult,
    degradations: &[floodrisk_assess::Degradation],
) -> anyhow::Result<()> {
    if settings.json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        print!("{}", display::render_card(result, degradations));
    }

    if settings.auto_save {
        settings
            .store()
            .append(result)
            .context("save assessment to history")?;
    }
    Ok(())
}

fn history(settings: &Settings, args: &HistoryArgs) -> anyhow::Result<()> {
    let filter = HistoryFilter {
        window: args.window,
        risk: args.risk,
    };
    let entries = settings
        .store()
        .query(&filter, Utc::now())
        .context("read history")?;

    if settings.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        print!("{}", display::render_history(&entries));
    }
    Ok(())
}
