//! Risk score, four-level category scale, and the labels results actually carry.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Scores at or above this are at least Moderate.
pub const MODERATE_THRESHOLD: f64 = 30.0;
/// Scores at or above this are High.
pub const HIGH_THRESHOLD: f64 = 60.0;
pub const MAX_SCORE: f64 = 100.0;

/// Flood risk magnitude, clamped to `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct RiskScore(f64);

impl RiskScore {
    /// Clamp a raw point total into range. NaN maps to zero.
    pub fn new(raw: f64) -> Self {
        if raw.is_nan() {
            return Self(0.0);
        }
        Self(raw.clamp(0.0, MAX_SCORE))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Half-open buckets: `[0,30)` Low, `[30,60)` Moderate, `[60,100]` High.
    pub fn category(self) -> RiskCategory {
        if self.0 < MODERATE_THRESHOLD {
            RiskCategory::Low
        } else if self.0 < HIGH_THRESHOLD {
            RiskCategory::Moderate
        } else {
            RiskCategory::High
        }
    }

    /// Rounded percentage string, e.g. `"42%"`.
    pub fn probability(self) -> String {
        format!("{}%", self.0.round() as u32)
    }
}

/// Ordered four-level scale: `Low < Moderate < High < VeryHigh`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RiskCategory {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl RiskCategory {
    pub const fn ordered() -> [Self; 4] {
        [Self::Low, Self::Moderate, Self::High, Self::VeryHigh]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        }
    }
}

/// Risk label attached to a result.
///
/// Besides the four clean categories, the detection rules and remote replies
/// use two literal intermediate labels. They are kept as distinct values rather
/// than folded into a neighbouring category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiskLevel {
    Category(RiskCategory),
    LowToModerate,
    ModerateToHigh,
    /// The image did not show terrain, so no risk could be judged.
    Unknown,
}

impl RiskLevel {
    pub const LOW: Self = Self::Category(RiskCategory::Low);
    pub const MODERATE: Self = Self::Category(RiskCategory::Moderate);
    pub const HIGH: Self = Self::Category(RiskCategory::High);
    pub const VERY_HIGH: Self = Self::Category(RiskCategory::VeryHigh);

    pub const fn label(self) -> &'static str {
        match self {
            Self::Category(category) => category.label(),
            Self::LowToModerate => "Low to Moderate",
            Self::ModerateToHigh => "Moderate to High",
            Self::Unknown => "Unknown",
        }
    }

    /// The clean category, if this level is one.
    pub const fn category(self) -> Option<RiskCategory> {
        match self {
            Self::Category(category) => Some(category),
            _ => None,
        }
    }

    /// Parse a label leniently: case, `-`/`_` separators and extra spaces are ignored.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw
            .replace(['-', '_'], " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_lowercase();

        match normalized.as_str() {
            "low" => Some(Self::LOW),
            "moderate" | "medium" => Some(Self::MODERATE),
            "high" => Some(Self::HIGH),
            "very high" | "veryhigh" => Some(Self::VERY_HIGH),
            "low to moderate" => Some(Self::LowToModerate),
            "moderate to high" => Some(Self::ModerateToHigh),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }
}

impl From<RiskCategory> for RiskLevel {
    fn from(category: RiskCategory) -> Self {
        Self::Category(category)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for RiskLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for RiskLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unrecognised risk level '{raw}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_half_open() {
        assert_eq!(RiskScore::new(0.0).category(), RiskCategory::Low);
        assert_eq!(RiskScore::new(29.99).category(), RiskCategory::Low);
        assert_eq!(RiskScore::new(30.0).category(), RiskCategory::Moderate);
        assert_eq!(RiskScore::new(59.99).category(), RiskCategory::Moderate);
        assert_eq!(RiskScore::new(60.0).category(), RiskCategory::High);
        assert_eq!(RiskScore::new(100.0).category(), RiskCategory::High);
    }

    #[test]
    fn score_is_clamped() {
        assert_eq!(RiskScore::new(135.0).value(), 100.0);
        assert_eq!(RiskScore::new(-5.0).value(), 0.0);
        assert_eq!(RiskScore::new(f64::NAN).value(), 0.0);
    }

    #[test]
    fn probability_rounds_half_up() {
        assert_eq!(RiskScore::new(42.5).probability(), "43%");
        assert_eq!(RiskScore::new(42.49).probability(), "42%");
        assert_eq!(RiskScore::new(100.0).probability(), "100%");
    }

    #[test]
    fn categories_are_totally_ordered() {
        let ordered = RiskCategory::ordered();
        for pair in ordered.windows(2) {
            assert!(pair[0] < pair[1], "{:?} should sort before {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn parse_accepts_label_variants() {
        assert_eq!(RiskLevel::parse("Very High"), Some(RiskLevel::VERY_HIGH));
        assert_eq!(RiskLevel::parse("very-high"), Some(RiskLevel::VERY_HIGH));
        assert_eq!(
            RiskLevel::parse("Moderate  to High"),
            Some(RiskLevel::ModerateToHigh)
        );
        assert_eq!(RiskLevel::parse("low_to_moderate"), Some(RiskLevel::LowToModerate));
        assert_eq!(RiskLevel::parse("catastrophic"), None);
    }

    #[test]
    fn intermediate_levels_have_no_category() {
        assert_eq!(RiskLevel::ModerateToHigh.category(), None);
        assert_eq!(RiskLevel::Unknown.category(), None);
        assert_eq!(RiskLevel::HIGH.category(), Some(RiskCategory::High));
    }

    #[test]
    fn serializes_as_label() {
        let json = serde_json::to_string(&RiskLevel::ModerateToHigh).unwrap();
        assert_eq!(json, "\"Moderate to High\"");
        let parsed: RiskLevel = serde_json::from_str("\"Very High\"").unwrap();
        assert_eq!(parsed, RiskLevel::VERY_HIGH);
        assert!(serde_json::from_str::<RiskLevel>("\"Severe\"").is_err());
    }
}
