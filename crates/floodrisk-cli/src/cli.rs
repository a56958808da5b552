use std::convert::Infallible;

use clap::{Args, Parser, Subcommand};
use floodrisk_core::{AnalysisModel, AssessmentContext, ManualInput, Region, RiskLevel, Season};
use floodrisk_store::TimeWindow;

use crate::config::Settings;

#[derive(Parser, Debug)]
#[command(
    name = "floodrisk",
    about = "Assess flood risk from field measurements or terrain photos",
    version
)]
pub struct Cli {
    #[command(flatten)]
    pub settings: Settings,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run an assessment
    Assess {
        #[command(subcommand)]
        command: AssessCommand,
    },
    /// List saved assessments, newest first
    History(HistoryArgs),
}

#[derive(Subcommand, Debug)]
pub enum AssessCommand {
    /// Score manually entered measurements
    Manual(ManualArgs),
    /// Assess a photo (file path or data URL)
    Image(ImageArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ContextArgs {
    /// coastal, river or inland
    #[arg(long, default_value = "unknown", value_parser = parse_region)]
    pub region: Region,
    /// spring, summer, fall or winter
    #[arg(long, default_value = "unknown", value_parser = parse_season)]
    pub season: Season,
    /// standard, advanced or historical
    #[arg(long, default_value = "standard", value_parser = parse_model)]
    pub model: AnalysisModel,
}

impl ContextArgs {
    pub fn context(&self) -> AssessmentContext {
        AssessmentContext::new(self.region, self.season).with_model(self.model)
    }
}

#[derive(Args, Debug, Clone)]
pub struct ManualArgs {
    /// Water level above normal, in metres
    #[arg(long)]
    pub water_level: Option<String>,
    /// Recent rainfall, in millimetres
    #[arg(long)]
    pub rainfall: Option<String>,
    /// flat, urban or rural
    #[arg(long)]
    pub terrain: Option<String>,
    /// saturated, moist or dry
    #[arg(long)]
    pub soil: Option<String>,
    #[command(flatten)]
    pub context: ContextArgs,
}

impl ManualArgs {
    pub fn input(&self) -> ManualInput {
        ManualInput {
            water_level: self.water_level.clone(),
            rainfall: self.rainfall.clone(),
            terrain: self.terrain.clone(),
            soil: self.soil.clone(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ImageArgs {
    /// Image file, or a `data:image/...;base64,` URL
    pub image: String,
    #[command(flatten)]
    pub context: ContextArgs,
}

#[derive(Args, Debug, Clone)]
pub struct HistoryArgs {
    /// all, week or month
    #[arg(long, default_value = "all")]
    pub window: TimeWindow,
    /// Only show entries at this risk level
    #[arg(long, value_parser = parse_risk)]
    pub risk: Option<RiskLevel>,
}

fn parse_region(raw: &str) -> Result<Region, Infallible> {
    Ok(Region::parse(raw))
}

fn parse_season(raw: &str) -> Result<Season, Infallible> {
    Ok(Season::parse(raw))
}

fn parse_model(raw: &str) -> Result<AnalysisModel, String> {
    AnalysisModel::parse(raw)
        .ok_or_else(|| format!("unknown model '{raw}' (expected standard, advanced or historical)"))
}

fn parse_risk(raw: &str) -> Result<RiskLevel, String> {
    RiskLevel::parse(raw).ok_or_else(|| format!("unknown risk level '{raw}'"))
}
