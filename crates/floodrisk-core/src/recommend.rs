//! Recommendation resolver: risk level + context → ordered advice and narrative.
//!
//! Every list is a fixed table, most urgent first. Context only ever appends
//! narrative text; it never reorders or replaces recommendations.

use serde::{Deserialize, Serialize};

use crate::level::{RiskCategory, RiskLevel};
use crate::score::DetectionRule;
use crate::signals::{Region, Season};

/// Level of analysis detail the caller asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisModel {
    #[default]
    Standard,
    Advanced,
    Historical,
}

impl AnalysisModel {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "standard" => Some(Self::Standard),
            "advanced" => Some(Self::Advanced),
            "historical" => Some(Self::Historical),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Advanced => "advanced",
            Self::Historical => "historical",
        }
    }

    const fn insight(self) -> Option<&'static str> {
        match self {
            Self::Standard => None,
            Self::Advanced => Some(
                " Advanced AI model detected patterns suggesting higher accuracy for this assessment.",
            ),
            Self::Historical => {
                Some(" Historical analysis shows similar patterns to past flood events.")
            }
        }
    }
}

/// What produced the level being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Basis {
    Manual,
    Detection(DetectionRule),
    NotTerrain,
    /// Static placeholder after every richer source failed.
    Degraded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveContext {
    pub region: Region,
    pub season: Season,
    pub model: AnalysisModel,
    pub basis: Basis,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guidance {
    pub recommendations: Vec<String>,
    pub narrative: String,
}

impl Guidance {
    fn from_table(recommendations: &[&str], narrative: impl Into<String>) -> Self {
        Self {
            recommendations: recommendations.iter().map(|r| r.to_string()).collect(),
            narrative: narrative.into(),
        }
    }
}

const LOW_ADVICE: &[&str] = &[
    "Continue normal monitoring procedures",
    "Check weather forecasts regularly",
    "Ensure drainage systems are clear",
];
const MODERATE_ADVICE: &[&str] = &[
    "Increase monitoring frequency",
    "Prepare emergency supplies",
    "Review evacuation routes",
];
const HIGH_ADVICE: &[&str] = &[
    "Issue flood warnings to residents",
    "Activate emergency response plans",
    "Prepare evacuation procedures",
];
const VERY_HIGH_ADVICE: &[&str] = &[
    "Evacuate the area immediately to higher ground",
    "Avoid driving or wading through floodwater",
    "Report the flooding to local authorities",
    "Move to the highest possible floor if sheltering in place",
    "Monitor emergency broadcasts for updates and instructions",
];

const DETECTION_DEFAULT_ADVICE: &[&str] = &[
    "Continue normal monitoring procedures",
    "Check weather forecasts regularly",
];
const COASTAL_STORM_ADVICE: &[&str] = &[
    "Monitor tide and storm forecasts",
    "Prepare emergency evacuation plan",
    "Secure property against potential flooding",
];
const RIVER_BASIN_ADVICE: &[&str] = &[
    "Monitor river level forecasts",
    "Check upstream rainfall reports",
    "Prepare sandbags if in flood-prone area",
];
const URBAN_WATERFRONT_ADVICE: &[&str] = &[
    "Implement flood protection measures",
    "Develop emergency response plan",
    "Consider property elevation options",
];

const NOT_TERRAIN_ADVICE: &[&str] = &[
    "Image does not appear to show terrain features",
    "Please upload an image of a landscape or area for flood risk assessment",
];
const NOT_TERRAIN_NARRATIVE: &str = "The uploaded image contains primarily people, vehicles, or other non-terrain elements. For accurate flood risk assessment, please upload an image showing landscapes, water bodies, or urban areas.";

const DEGRADED_ADVICE: &[&str] = &[
    "Monitor water levels regularly",
    "Prepare emergency supplies",
    "Review evacuation routes",
];
const DEGRADED_NARRATIVE: &str = "Standard flood risk assessment. For more accurate results, ensure images show terrain features clearly.";

/// Resolve advice for a level. Pure and table driven.
pub fn resolve(level: RiskLevel, ctx: &ResolveContext) -> Guidance {
    match ctx.basis {
        Basis::Manual => manual_guidance(level, ctx.model),
        Basis::Detection(rule) => detection_guidance(rule, ctx.region),
        Basis::NotTerrain => Guidance::from_table(NOT_TERRAIN_ADVICE, NOT_TERRAIN_NARRATIVE),
        Basis::Degraded => Guidance::from_table(DEGRADED_ADVICE, DEGRADED_NARRATIVE),
    }
}

fn manual_guidance(level: RiskLevel, model: AnalysisModel) -> Guidance {
    let (advice, narrative) = match level {
        RiskLevel::Category(RiskCategory::Low) => (
            LOW_ADVICE,
            "No immediate flood threat detected. Current conditions suggest low risk.",
        ),
        RiskLevel::Category(RiskCategory::Moderate) | RiskLevel::LowToModerate => (
            MODERATE_ADVICE,
            "Elevated flood risk due to current conditions. Stay alert for changes.",
        ),
        RiskLevel::Category(RiskCategory::High) | RiskLevel::ModerateToHigh => (
            HIGH_ADVICE,
            "High flood risk detected. Immediate action recommended to mitigate potential damage.",
        ),
        RiskLevel::Category(RiskCategory::VeryHigh) => (
            VERY_HIGH_ADVICE,
            "Severe flood risk. Flooding is likely or already under way; protect life before property.",
        ),
        RiskLevel::Unknown => (NOT_TERRAIN_ADVICE, NOT_TERRAIN_NARRATIVE),
    };

    let mut narrative = narrative.to_string();
    if let Some(insight) = model.insight() {
        narrative.push_str(insight);
    }
    Guidance::from_table(advice, narrative)
}

fn detection_guidance(rule: DetectionRule, region: Region) -> Guidance {
    match rule {
        DetectionRule::Baseline => Guidance::from_table(
            DETECTION_DEFAULT_ADVICE,
            "No significant flood risk detected.",
        ),
        DetectionRule::WaterPresent => Guidance::from_table(
            DETECTION_DEFAULT_ADVICE,
            "Water body detected. Monitor water levels during heavy rainfall.",
        ),
        DetectionRule::CoastalStorm => Guidance::from_table(
            COASTAL_STORM_ADVICE,
            "Coastal area with water body detected. High risk during storm season.",
        ),
        DetectionRule::RiverBasin => Guidance::from_table(
            RIVER_BASIN_ADVICE,
            "River area detected. Flood risk depends on upstream conditions.",
        ),
        DetectionRule::UrbanWaterfront => Guidance::from_table(
            URBAN_WATERFRONT_ADVICE,
            "Urban area near water body detected. Significant flood risk to infrastructure.",
        ),
        DetectionRule::NoWaterVisible => {
            let mut narrative = String::from(
                "No water bodies detected in image. Flood risk depends on regional factors.",
            );
            match region {
                Region::Coastal => {
                    narrative.push_str(" Coastal regions remain at risk during storm events.")
                }
                Region::River => narrative
                    .push_str(" River basins may experience flooding during heavy rainfall."),
                Region::Inland | Region::Unknown => {}
            }
            Guidance::from_table(DETECTION_DEFAULT_ADVICE, narrative)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manual_ctx(model: AnalysisModel) -> ResolveContext {
        ResolveContext {
            region: Region::Inland,
            season: Season::Winter,
            model,
            basis: Basis::Manual,
        }
    }

    fn detection_ctx(rule: DetectionRule, region: Region) -> ResolveContext {
        ResolveContext {
            region,
            season: Season::Summer,
            model: AnalysisModel::Standard,
            basis: Basis::Detection(rule),
        }
    }

    #[test]
    fn manual_tables_keep_exact_order() {
        let ctx = manual_ctx(AnalysisModel::Standard);
        assert_eq!(
            resolve(RiskLevel::LOW, &ctx).recommendations,
            vec![
                "Continue normal monitoring procedures",
                "Check weather forecasts regularly",
                "Ensure drainage systems are clear",
            ]
        );
        assert_eq!(
            resolve(RiskLevel::MODERATE, &ctx).recommendations,
            vec![
                "Increase monitoring frequency",
                "Prepare emergency supplies",
                "Review evacuation routes",
            ]
        );
        assert_eq!(
            resolve(RiskLevel::HIGH, &ctx).recommendations,
            vec![
                "Issue flood warnings to residents",
                "Activate emergency response plans",
                "Prepare evacuation procedures",
            ]
        );
        assert_eq!(
            resolve(RiskLevel::VERY_HIGH, &ctx).recommendations,
            vec![
                "Evacuate the area immediately to higher ground",
                "Avoid driving or wading through floodwater",
                "Report the flooding to local authorities",
                "Move to the highest possible floor if sheltering in place",
                "Monitor emergency broadcasts for updates and instructions",
            ]
        );
    }

    #[test]
    fn detection_tables_keep_exact_order() {
        let coastal = resolve(
            RiskLevel::HIGH,
            &detection_ctx(DetectionRule::CoastalStorm, Region::Coastal),
        );
        assert_eq!(
            coastal.recommendations,
            vec![
                "Monitor tide and storm forecasts",
                "Prepare emergency evacuation plan",
                "Secure property against potential flooding",
            ]
        );
        assert!(coastal.narrative.contains("High risk during storm season"));

        let river = resolve(
            RiskLevel::ModerateToHigh,
            &detection_ctx(DetectionRule::RiverBasin, Region::River),
        );
        assert_eq!(
            river.recommendations,
            vec![
                "Monitor river level forecasts",
                "Check upstream rainfall reports",
                "Prepare sandbags if in flood-prone area",
            ]
        );
        assert!(river.narrative.contains("upstream conditions"));

        let default_advice = vec![
            "Continue normal monitoring procedures",
            "Check weather forecasts regularly",
        ];
        let baseline = resolve(
            RiskLevel::LOW,
            &detection_ctx(DetectionRule::Baseline, Region::Inland),
        );
        assert_eq!(baseline.recommendations, default_advice);
        assert_eq!(baseline.narrative, "No significant flood risk detected.");

        let water = resolve(
            RiskLevel::MODERATE,
            &detection_ctx(DetectionRule::WaterPresent, Region::Inland),
        );
        assert_eq!(water.recommendations, default_advice);
        assert!(water.narrative.starts_with("Water body detected."));
    }

    #[test]
    fn not_terrain_table_keeps_exact_order() {
        let ctx = ResolveContext {
            basis: Basis::NotTerrain,
            ..manual_ctx(AnalysisModel::Standard)
        };
        let guidance = resolve(RiskLevel::Unknown, &ctx);
        assert_eq!(
            guidance.recommendations,
            vec![
                "Image does not appear to show terrain features",
                "Please upload an image of a landscape or area for flood risk assessment",
            ]
        );
        assert!(guidance.narrative.starts_with("The uploaded image contains primarily people"));
    }

    #[test]
    fn order_is_stable_across_calls() {
        let ctx = manual_ctx(AnalysisModel::Historical);
        let first = resolve(RiskLevel::HIGH, &ctx);
        for _ in 0..5 {
            assert_eq!(resolve(RiskLevel::HIGH, &ctx), first);
        }
    }

    #[test]
    fn model_insight_is_appended() {
        let standard = resolve(RiskLevel::MODERATE, &manual_ctx(AnalysisModel::Standard));
        let advanced = resolve(RiskLevel::MODERATE, &manual_ctx(AnalysisModel::Advanced));
        let historical = resolve(RiskLevel::MODERATE, &manual_ctx(AnalysisModel::Historical));

        assert!(advanced.narrative.starts_with(&standard.narrative));
        assert!(advanced.narrative.ends_with("higher accuracy for this assessment."));
        assert!(historical.narrative.ends_with("similar patterns to past flood events."));
        assert_eq!(advanced.recommendations, standard.recommendations);
    }

    #[test]
    fn intermediate_levels_borrow_neighbouring_tables() {
        let ctx = manual_ctx(AnalysisModel::Standard);
        assert_eq!(
            resolve(RiskLevel::ModerateToHigh, &ctx).recommendations,
            resolve(RiskLevel::HIGH, &ctx).recommendations
        );
        assert_eq!(
            resolve(RiskLevel::LowToModerate, &ctx).recommendations,
            resolve(RiskLevel::MODERATE, &ctx).recommendations
        );
    }

    #[test]
    fn urban_waterfront_advice() {
        let guidance = resolve(
            RiskLevel::HIGH,
            &detection_ctx(DetectionRule::UrbanWaterfront, Region::Coastal),
        );
        assert_eq!(
            guidance.recommendations,
            vec![
                "Implement flood protection measures",
                "Develop emergency response plan",
                "Consider property elevation options",
            ]
        );
        assert!(guidance.narrative.contains("Urban area near water body"));
    }

    #[test]
    fn no_water_narrative_gets_region_caveat() {
        let coastal = resolve(
            RiskLevel::LOW,
            &detection_ctx(DetectionRule::NoWaterVisible, Region::Coastal),
        );
        assert!(coastal.narrative.ends_with("Coastal regions remain at risk during storm events."));

        let river = resolve(
            RiskLevel::LOW,
            &detection_ctx(DetectionRule::NoWaterVisible, Region::River),
        );
        assert!(river.narrative.ends_with("flooding during heavy rainfall."));

        let inland = resolve(
            RiskLevel::LOW,
            &detection_ctx(DetectionRule::NoWaterVisible, Region::Inland),
        );
        assert_eq!(
            inland.narrative,
            "No water bodies detected in image. Flood risk depends on regional factors."
        );
        assert_eq!(inland.recommendations, coastal.recommendations);
    }

    #[test]
    fn degraded_placeholder() {
        let ctx = ResolveContext {
            basis: Basis::Degraded,
            ..manual_ctx(AnalysisModel::Advanced)
        };
        let guidance = resolve(RiskLevel::MODERATE, &ctx);
        assert_eq!(
            guidance.recommendations,
            vec![
                "Monitor water levels regularly",
                "Prepare emergency supplies",
                "Review evacuation routes",
            ]
        );
        assert!(guidance.narrative.starts_with("Standard flood risk assessment."));
    }

    #[test]
    fn model_parse() {
        assert_eq!(AnalysisModel::parse(" Advanced"), Some(AnalysisModel::Advanced));
        assert_eq!(AnalysisModel::parse("quantum"), None);
    }
}
