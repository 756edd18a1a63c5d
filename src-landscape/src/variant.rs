use std::fmt;
use std::str::FromStr;

use dynopt_dynamics::DynamicKind;
use serde::{Deserialize, Serialize};

use crate::dimension::DimensionDrift;
use crate::error::LandscapeError;
use crate::strategy::{
    AngleDynamic, FULL_TURN, Initializer, LandscapeStrategies, PositionDynamic, RECURRENT_ANGLE,
};

/// Severity of the angle dynamics
pub const ANGLE_SEVERITY: f64 = 1.0;

/// Built-in landscape variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    #[default]
    Small,
    Large,
    Random,
    /// Logistic map on heights, widths and positions; no rotation
    Chaotic,
    /// Parameters follow a sine of period 12 changes
    Recurrent,
    /// Recurrent with gaussian noise on top
    NoisyRecurrent,
    /// Random dynamics plus a dimensionality bouncing between 5 and 15
    DimensionVariable,
}

impl Variant {
    pub const ALL: [Variant; 7] = [
        Variant::Small,
        Variant::Large,
        Variant::Random,
        Variant::Chaotic,
        Variant::Recurrent,
        Variant::NoisyRecurrent,
        Variant::DimensionVariable,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Variant::Small => "small",
            Variant::Large => "large",
            Variant::Random => "random",
            Variant::Chaotic => "chaotic",
            Variant::Recurrent => "recurrent",
            Variant::NoisyRecurrent => "noisy_recurrent",
            Variant::DimensionVariable => "dimension_variable",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Variant::Small => "small step changes, rotating peaks",
            Variant::Large => "large step changes, rotating peaks",
            Variant::Random => "gaussian changes, rotating peaks",
            Variant::Chaotic => "logistic map on every parameter",
            Variant::Recurrent => "periodic changes with period 12",
            Variant::NoisyRecurrent => "periodic changes with gaussian noise",
            Variant::DimensionVariable => "gaussian changes with a drifting dimensionality",
        }
    }

    /// Dynamic driving heights and widths
    pub fn dynamic(self) -> DynamicKind {
        match self {
            Variant::Small => DynamicKind::Small,
            Variant::Large => DynamicKind::Large,
            Variant::Random | Variant::DimensionVariable => DynamicKind::Random,
            Variant::Chaotic => DynamicKind::Chaotic,
            Variant::Recurrent => DynamicKind::Recurrent,
            Variant::NoisyRecurrent => DynamicKind::NoisyRecurrent,
        }
    }

    pub fn is_dimension_variable(self) -> bool {
        matches!(self, Variant::DimensionVariable)
    }

    /// Preset strategies for this variant
    pub fn strategies(self) -> LandscapeStrategies {
        let kind = self.dynamic();
        match self {
            Variant::Chaotic => LandscapeStrategies {
                height: kind.build(),
                width: kind.build(),
                angle: None,
                position: PositionDynamic::Map { dynamic: kind.build(), severity: 0.0 },
                initializer: Initializer::Seeded,
                drift: None,
            },
            Variant::Recurrent | Variant::NoisyRecurrent => LandscapeStrategies {
                height: kind.build(),
                width: kind.build(),
                angle: Some(AngleDynamic {
                    dynamic: kind.build(),
                    bounds: RECURRENT_ANGLE,
                    severity: ANGLE_SEVERITY,
                }),
                position: PositionDynamic::Rotation,
                initializer: Initializer::Phased,
                drift: None,
            },
            Variant::Small | Variant::Large | Variant::Random | Variant::DimensionVariable => {
                LandscapeStrategies {
                    height: kind.build(),
                    width: kind.build(),
                    angle: Some(AngleDynamic {
                        dynamic: kind.build(),
                        bounds: FULL_TURN,
                        severity: ANGLE_SEVERITY,
                    }),
                    position: PositionDynamic::Rotation,
                    initializer: Initializer::Uniform,
                    drift: self.is_dimension_variable().then(DimensionDrift::default),
                }
            }
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = LandscapeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.to_lowercase();
        match t.as_str() {
            "small" | "small_change" => Ok(Variant::Small),
            "large" | "large_change" => Ok(Variant::Large),
            "random" | "random_change" => Ok(Variant::Random),
            "chaotic" | "chaotic_change" => Ok(Variant::Chaotic),
            "recurrent" | "recurrent_change" => Ok(Variant::Recurrent),
            "noisy_recurrent" | "noisy-recurrent" | "noisyrecurrent" => Ok(Variant::NoisyRecurrent),
            "dimension_variable" | "dimension-variable" | "dimensional" | "random_dimensional" => {
                Ok(Variant::DimensionVariable)
            }
            _ => Err(LandscapeError::UnknownVariant(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        for v in Variant::ALL {
            assert_eq!(v.name().parse::<Variant>().unwrap(), v);
            assert_eq!(v.to_string(), v.name());
        }
        assert_eq!("Noisy-Recurrent".parse::<Variant>().unwrap(), Variant::NoisyRecurrent);
        assert!(matches!("sideways".parse::<Variant>(), Err(LandscapeError::UnknownVariant(_))));
    }

    #[test]
    fn test_serde_names_match_display() {
        for v in Variant::ALL {
            let json = serde_json::to_string(&v).unwrap();
            assert_eq!(json, format!("\"{}\"", v.name()));
        }
    }

    #[test]
    fn test_presets() {
        let chaotic = Variant::Chaotic.strategies();
        assert!(chaotic.angle.is_none());
        assert!(matches!(chaotic.position, PositionDynamic::Map { .. }));
        assert_eq!(chaotic.initializer, Initializer::Seeded);

        let recurrent = Variant::Recurrent.strategies();
        assert_eq!(recurrent.angle.as_ref().unwrap().bounds, RECURRENT_ANGLE);
        assert!(recurrent.uses_phase_offsets());
        assert!(!Variant::Small.strategies().uses_phase_offsets());

        let dv = Variant::DimensionVariable.strategies();
        assert_eq!(dv.drift, Some(DimensionDrift::default()));
        assert_eq!(dv.height.name(), "random");
        assert_eq!(dv.max_dim(10), 15);
    }
}
