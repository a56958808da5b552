//! Coarse terrain profile inferred from detection counts.

use serde::{Deserialize, Serialize};

use crate::signals::DetectionCounts;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainType {
    UrbanWaterfront,
    NaturalWaterfront,
    UrbanArea,
    RuralVegetated,
    WaterBody,
    Unrecognized,
    General,
    NonTerrain,
}

impl TerrainType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::UrbanWaterfront => "urban waterfront",
            Self::NaturalWaterfront => "natural waterfront",
            Self::UrbanArea => "urban area",
            Self::RuralVegetated => "rural/vegetated area",
            Self::WaterBody => "water body",
            Self::Unrecognized => "unrecognized terrain",
            Self::General => "general terrain",
            Self::NonTerrain => "non-terrain",
        }
    }
}

/// Terrain type plus rough elevation and water-distance estimates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerrainProfile {
    pub terrain_type: TerrainType,
    pub elevation: Option<String>,
    pub distance_from_water: Option<String>,
}

impl TerrainProfile {
    fn new(terrain_type: TerrainType, elevation: Option<&str>, distance: Option<&str>) -> Self {
        Self {
            terrain_type,
            elevation: elevation.map(str::to_string),
            distance_from_water: distance.map(str::to_string),
        }
    }

    /// Infer a profile. `object_count` is the number of raw detections, including
    /// labels that matched no keyword group.
    pub fn infer(counts: &DetectionCounts, object_count: usize) -> Self {
        if !counts.is_terrain_image() {
            return Self::new(TerrainType::NonTerrain, None, None);
        }

        const NO_WATER: Option<&str> = Some("unknown (no water visible)");

        if counts.water_body > 0 && counts.building > 0 {
            Self::new(
                TerrainType::UrbanWaterfront,
                Some("low"),
                Some("very close (0-100m)"),
            )
        } else if counts.water_body > 0 && counts.vegetation > 2 {
            Self::new(
                TerrainType::NaturalWaterfront,
                Some("variable"),
                Some("close (100-500m)"),
            )
        } else if counts.building > 3 {
            Self::new(TerrainType::UrbanArea, Some("variable"), NO_WATER)
        } else if counts.vegetation > 3 {
            Self::new(TerrainType::RuralVegetated, Some("variable"), NO_WATER)
        } else if counts.water_body > 0 {
            Self::new(TerrainType::WaterBody, Some("low"), Some("at location"))
        } else if object_count == 0 {
            Self::new(TerrainType::Unrecognized, None, None)
        } else {
            Self::new(TerrainType::General, None, None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(water: u32, building: u32, vegetation: u32) -> DetectionCounts {
        DetectionCounts {
            water_body: water,
            building,
            vegetation,
            ..Default::default()
        }
    }

    #[test]
    fn water_with_buildings_is_urban_waterfront() {
        let profile = TerrainProfile::infer(&counts(1, 1, 5), 7);
        assert_eq!(profile.terrain_type, TerrainType::UrbanWaterfront);
        assert_eq!(profile.elevation.as_deref(), Some("low"));
        assert_eq!(profile.distance_from_water.as_deref(), Some("very close (0-100m)"));
    }

    #[test]
    fn water_with_dense_vegetation_is_natural_waterfront() {
        let profile = TerrainProfile::infer(&counts(1, 0, 3), 4);
        assert_eq!(profile.terrain_type, TerrainType::NaturalWaterfront);
    }

    #[test]
    fn many_buildings_without_water_is_urban_area() {
        let profile = TerrainProfile::infer(&counts(0, 4, 0), 4);
        assert_eq!(profile.terrain_type, TerrainType::UrbanArea);
        assert_eq!(
            profile.distance_from_water.as_deref(),
            Some("unknown (no water visible)")
        );
    }

    #[test]
    fn lone_water_body_is_at_location() {
        let profile = TerrainProfile::infer(&counts(2, 0, 1), 3);
        assert_eq!(profile.terrain_type, TerrainType::WaterBody);
        assert_eq!(profile.distance_from_water.as_deref(), Some("at location"));
    }

    #[test]
    fn nothing_detected_is_unrecognized() {
        let profile = TerrainProfile::infer(&DetectionCounts::default(), 0);
        assert_eq!(profile.terrain_type, TerrainType::Unrecognized);
        assert!(profile.elevation.is_none());
    }

    #[test]
    fn unmatched_labels_make_general_terrain() {
        let profile = TerrainProfile::infer(&DetectionCounts::default(), 2);
        assert_eq!(profile.terrain_type, TerrainType::General);
    }

    #[test]
    fn crowd_is_non_terrain() {
        let crowd = DetectionCounts {
            person: 4,
            vehicle: 1,
            ..Default::default()
        };
        let profile = TerrainProfile::infer(&crowd, 5);
        assert_eq!(profile.terrain_type, TerrainType::NonTerrain);
        assert!(profile.distance_from_water.is_none());
    }
}
