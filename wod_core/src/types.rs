//! Core domain types for workout parsing.
//!
//! This module defines the canonical model every input path converges on:
//! - Movement dictionary entries
//! - Rep schemes and loads
//! - Parsed movements, blocks and whole workouts

use serde::de::Deserializer;
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Dictionary Types
// ============================================================================

/// A movement known to the external catalog (e.g., "Thruster")
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MovementEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_reps: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_sets: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modality: Option<String>,
}

impl MovementEntry {
    /// Create an entry with just a canonical name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder-style alias list
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }
}

// ============================================================================
// Rep Schemes
// ============================================================================

/// Largest set count `NxM` notation or a dictionary default may expand to
///
/// Anything above it is treated as a malformed token, not a prescription.
pub const MAX_SETS: usize = 100;

/// How many repetitions a movement prescribes
///
/// Serialized as a bare number, an array of per-round counts, the string
/// `"Max"`, or omitted entirely.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Reps {
    /// Same count every time (e.g., `21 Thrusters`)
    Fixed(u32),
    /// One count per round (e.g., `21-15-9`, `3x10`)
    PerRound(Vec<u32>),
    /// As many as possible
    Max,
    #[default]
    Unspecified,
}

impl Reps {
    pub fn is_unspecified(&self) -> bool {
        matches!(self, Reps::Unspecified)
    }

    /// `reps` once per set; unspecified when `sets` is outside `1..=MAX_SETS`
    pub fn repeated(reps: u32, sets: usize) -> Reps {
        if (1..=MAX_SETS).contains(&sets) {
            Reps::PerRound(vec![reps; sets])
        } else {
            Reps::Unspecified
        }
    }

    /// Normalize a loosely typed JSON value into a rep scheme
    ///
    /// Numbers and arrays pass through, `"Max"` is kept as the sentinel,
    /// numeric strings are decoded, anything else is unspecified.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Number(n) => n
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .map(Reps::Fixed)
                .unwrap_or(Reps::Unspecified),
            Value::Array(items) => Reps::PerRound(
                items
                    .iter()
                    .filter_map(|item| match item {
                        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
                        Value::String(s) => s.trim().parse().ok(),
                        _ => None,
                    })
                    .collect(),
            ),
            Value::String(s) => crate::notation::decode_rep_scheme(s),
            _ => Reps::Unspecified,
        }
    }

    /// Text form used by the renderer; `None` when unspecified
    pub fn display(&self) -> Option<String> {
        match self {
            Reps::Fixed(n) => Some(n.to_string()),
            Reps::PerRound(counts) => Some(
                counts
                    .iter()
                    .map(u32::to_string)
                    .collect::<Vec<_>>()
                    .join("-"),
            ),
            Reps::Max => Some("Max".to_string()),
            Reps::Unspecified => None,
        }
    }
}

impl Serialize for Reps {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Reps::Fixed(n) => serializer.serialize_u32(*n),
            Reps::PerRound(counts) => {
                let mut seq = serializer.serialize_seq(Some(counts.len()))?;
                for count in counts {
                    seq.serialize_element(count)?;
                }
                seq.end()
            }
            Reps::Max => serializer.serialize_str("Max"),
            Reps::Unspecified => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Reps {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Reps::from_value(&value))
    }
}

// ============================================================================
// Loads
// ============================================================================

/// Prescribed and scaled load pair as stored in templates
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct WeightSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rx: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaled: Option<String>,
}

impl WeightSpec {
    /// `(rx/scaled)`, `(rx)`, or nothing
    pub fn format(&self) -> Option<String> {
        match (self.rx.as_deref(), self.scaled.as_deref()) {
            (Some(rx), Some(scaled)) => Some(format!("({}/{})", rx, scaled)),
            (Some(rx), None) => Some(format!("({})", rx)),
            _ => None,
        }
    }
}

// ============================================================================
// Workout Type
// ============================================================================

/// Workout format tag detected from the descriptor line or template
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(from = "String", into = "String")]
pub enum WorkoutType {
    Amrap,
    Emom,
    MetCon,
    HeroWod,
    #[default]
    Unknown,
    /// Any other descriptor, kept as written
    Other(String),
}

impl WorkoutType {
    pub fn as_str(&self) -> &str {
        match self {
            WorkoutType::Amrap => "AMRAP",
            WorkoutType::Emom => "EMOM",
            WorkoutType::MetCon => "MetCon",
            WorkoutType::HeroWod => "Hero WOD",
            WorkoutType::Unknown => "Unknown",
            WorkoutType::Other(label) => label,
        }
    }

    /// Map a stored label onto a known type, case-insensitively
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        match trimmed.to_lowercase().as_str() {
            "amrap" => WorkoutType::Amrap,
            "emom" => WorkoutType::Emom,
            "metcon" => WorkoutType::MetCon,
            "hero wod" | "hero" => WorkoutType::HeroWod,
            "" | "unknown" => WorkoutType::Unknown,
            _ => WorkoutType::Other(trimmed.to_string()),
        }
    }
}

impl fmt::Display for WorkoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for WorkoutType {
    fn from(label: String) -> Self {
        WorkoutType::from_label(&label)
    }
}

impl From<WorkoutType> for String {
    fn from(kind: WorkoutType) -> Self {
        kind.as_str().to_string()
    }
}

// ============================================================================
// Canonical Model
// ============================================================================

/// One exercise instruction within a block
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ParsedMovement {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movement_id: Option<String>,
    #[serde(skip_serializing_if = "Reps::is_unspecified")]
    pub reps: Reps,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scaling: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minute: Option<String>,
}

impl ParsedMovement {
    /// A name-only movement with no quantitative detail
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// An ordered group of movements sharing a title and round count
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkoutBlock {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rounds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    pub movements: Vec<ParsedMovement>,
}

/// The canonical parsed workout
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ParsedWorkout {
    #[serde(rename = "type")]
    pub workout_type: WorkoutType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    pub workout_blocks: Vec<WorkoutBlock>,
    pub notes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scaling_guidelines: Option<BTreeMap<String, String>>,
}

impl ParsedWorkout {
    /// All movements across blocks, in source order
    pub fn movements(&self) -> impl Iterator<Item = &ParsedMovement> {
        self.workout_blocks.iter().flat_map(|b| b.movements.iter())
    }

    /// Round count of the first block that carries one
    pub fn rounds(&self) -> Option<u32> {
        self.workout_blocks.iter().find_map(|b| b.rounds)
    }

    pub fn is_empty(&self) -> bool {
        self.workout_blocks.is_empty() && self.notes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reps_serialize_shapes() {
        assert_eq!(serde_json::to_value(Reps::Fixed(21)).unwrap(), json!(21));
        assert_eq!(
            serde_json::to_value(Reps::PerRound(vec![21, 15, 9])).unwrap(),
            json!([21, 15, 9])
        );
        assert_eq!(serde_json::to_value(Reps::Max).unwrap(), json!("Max"));
    }

    #[test]
    fn test_reps_repeated_bounds() {
        assert_eq!(Reps::repeated(10, 3), Reps::PerRound(vec![10, 10, 10]));
        assert_eq!(Reps::repeated(5, MAX_SETS), Reps::PerRound(vec![5; MAX_SETS]));
        assert_eq!(Reps::repeated(5, MAX_SETS + 1), Reps::Unspecified);
        assert_eq!(Reps::repeated(5, 0), Reps::Unspecified);
        assert_eq!(Reps::repeated(5, usize::MAX), Reps::Unspecified);
    }

    #[test]
    fn test_reps_from_value_normalization() {
        assert_eq!(Reps::from_value(&json!(10)), Reps::Fixed(10));
        assert_eq!(
            Reps::from_value(&json!([5, "4", "x", 3])),
            Reps::PerRound(vec![5, 4, 3])
        );
        assert_eq!(Reps::from_value(&json!("max")), Reps::Max);
        assert_eq!(Reps::from_value(&json!("12")), Reps::Fixed(12));
        assert_eq!(Reps::from_value(&json!(-3)), Reps::Unspecified);
        assert_eq!(Reps::from_value(&Value::Null), Reps::Unspecified);
    }

    #[test]
    fn test_unspecified_reps_omitted_from_json() {
        let movement = ParsedMovement::named("Burpee");
        let value = serde_json::to_value(&movement).unwrap();
        assert_eq!(value, json!({ "name": "Burpee" }));
    }

    #[test]
    fn test_weight_spec_format() {
        let both = WeightSpec {
            rx: Some("95 lb".into()),
            scaled: Some("65 lb".into()),
        };
        assert_eq!(both.format().as_deref(), Some("(95 lb/65 lb)"));

        let rx_only = WeightSpec {
            rx: Some("24 kg".into()),
            scaled: None,
        };
        assert_eq!(rx_only.format().as_deref(), Some("(24 kg)"));

        let scaled_only = WeightSpec {
            rx: None,
            scaled: Some("16 kg".into()),
        };
        assert_eq!(scaled_only.format(), None);
        assert_eq!(WeightSpec::default().format(), None);
    }

    #[test]
    fn test_workout_type_labels() {
        assert_eq!(WorkoutType::from_label("amrap"), WorkoutType::Amrap);
        assert_eq!(WorkoutType::from_label("Hero WOD"), WorkoutType::HeroWod);
        assert_eq!(WorkoutType::from_label(""), WorkoutType::Unknown);
        assert_eq!(
            WorkoutType::from_label("Chipper"),
            WorkoutType::Other("Chipper".into())
        );
        assert_eq!(WorkoutType::MetCon.to_string(), "MetCon");
    }

    #[test]
    fn test_parsed_workout_json_roundtrip() {
        let workout = ParsedWorkout {
            workout_type: WorkoutType::HeroWod,
            duration: Some("40 minutes".into()),
            priority: None,
            workout_blocks: vec![WorkoutBlock {
                title: None,
                rounds: Some(5),
                format: Some("for time".into()),
                movements: vec![ParsedMovement {
                    reps: Reps::PerRound(vec![10, 10]),
                    ..ParsedMovement::named("Pull-up")
                }],
            }],
            notes: vec!["Wear a vest".into()],
            scaling_guidelines: None,
        };

        let value = serde_json::to_value(&workout).unwrap();
        assert_eq!(value["type"], json!("Hero WOD"));
        assert_eq!(value["workoutBlocks"][0]["rounds"], json!(5));

        let back: ParsedWorkout = serde_json::from_value(value).unwrap();
        assert_eq!(back, workout);
    }
}
