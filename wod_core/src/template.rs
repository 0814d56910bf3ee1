//! Template-import path for workouts stored as semi-structured JSON.
//!
//! Expected shape:
//!
//! ```json
//! {
//!   "type": "AMRAP",
//!   "duration": 20,
//!   "priority": "high",
//!   "notes": ["Partition as needed"],
//!   "scaling": { "reduced_load": "65/45" },
//!   "workout": [
//!     { "name": "Run", "distance": "400m" },
//!     [ { "name": "Pull-up", "reps": [21, 15, 9] } ],
//!     { "rounds": 3, "movements": [ { "name": "Burpee", "reps": "Max" } ] }
//!   ]
//! }
//! ```
//!
//! Each `workout` item becomes one block, in source order.

use crate::parser::{WorkoutParser, WorkoutSource};
use crate::{
    Error, ParsedMovement, ParsedWorkout, Reps, Result, WeightSpec, WorkoutBlock, WorkoutType,
};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

const NAME_KEYS: &[&str] = &["name", "movement", "exercise"];
const SCALING_KEYS: &[&str] = &["scaling", "scalingGuidelines", "scaling_guidelines"];

/// A stored workout description that passed boundary validation
#[derive(Clone, Debug, PartialEq)]
pub struct WorkoutTemplate {
    fields: Map<String, Value>,
}

impl WorkoutTemplate {
    /// Accept only objects whose `workout` (if present) is an array
    pub fn from_value(value: Value) -> Result<Self> {
        let fields = match value {
            Value::Object(fields) => fields,
            other => {
                return Err(Error::InvalidInput(format!(
                    "workout template must be a JSON object, got {}",
                    json_kind(&other)
                )))
            }
        };

        match fields.get("workout") {
            None | Some(Value::Array(_)) | Some(Value::Null) => Ok(Self { fields }),
            Some(other) => Err(Error::InvalidInput(format!(
                "template 'workout' must be an array, got {}",
                json_kind(other)
            ))),
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(text)?)
    }

    pub fn workout_type(&self) -> WorkoutType {
        self.fields
            .get("type")
            .and_then(Value::as_str)
            .map(WorkoutType::from_label)
            .unwrap_or_default()
    }

    /// Strings pass through, bare numbers are read as minutes
    pub fn duration(&self) -> Option<String> {
        match self.fields.get("duration")? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(format!("{} minutes", n)),
            _ => None,
        }
    }

    pub fn priority(&self) -> Option<String> {
        self.fields.get("priority").and_then(scalar_text)
    }

    pub fn notes(&self) -> Vec<String> {
        match self.fields.get("notes") {
            Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
            Some(other) => scalar_text(other).into_iter().collect(),
            None => Vec::new(),
        }
    }

    pub fn scaling_guidelines(&self) -> Option<BTreeMap<String, String>> {
        let map = SCALING_KEYS
            .iter()
            .find_map(|key| self.fields.get(*key).and_then(Value::as_object))?;

        let guidelines: BTreeMap<String, String> = map
            .iter()
            .filter_map(|(key, value)| scalar_text(value).map(|text| (key.clone(), text)))
            .collect();

        (!guidelines.is_empty()).then_some(guidelines)
    }

    pub fn items(&self) -> &[Value] {
        self.fields
            .get("workout")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl WorkoutSource for WorkoutTemplate {
    fn to_workout(&self, parser: &WorkoutParser<'_>) -> ParsedWorkout {
        let workout_blocks: Vec<WorkoutBlock> = self
            .items()
            .iter()
            .filter_map(|item| block_from_item(item, parser))
            .collect();

        tracing::debug!(blocks = workout_blocks.len(), "imported workout template");

        ParsedWorkout {
            workout_type: self.workout_type(),
            duration: self.duration(),
            priority: self.priority(),
            workout_blocks,
            notes: self.notes(),
            scaling_guidelines: self.scaling_guidelines(),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Strings trimmed, numbers and booleans printed, everything else skipped
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn as_count(value: Option<&Value>) -> Option<u32> {
    match value? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn block_from_item(item: &Value, parser: &WorkoutParser<'_>) -> Option<WorkoutBlock> {
    match item {
        Value::Object(fields) if fields.contains_key("movements") => {
            let movements = fields
                .get("movements")
                .and_then(Value::as_array)
                .map(|items| movements_from(items, parser))
                .unwrap_or_default();

            Some(WorkoutBlock {
                title: fields
                    .get("title")
                    .or_else(|| fields.get("name"))
                    .and_then(scalar_text),
                rounds: as_count(fields.get("rounds")),
                format: fields.get("format").and_then(scalar_text),
                movements,
            })
        }
        Value::Object(fields) => Some(WorkoutBlock {
            rounds: as_count(fields.get("rounds")),
            movements: vec![movement_from_object(fields, parser)],
            ..WorkoutBlock::default()
        }),
        Value::Array(items) => Some(WorkoutBlock {
            movements: movements_from(items, parser),
            ..WorkoutBlock::default()
        }),
        Value::Null => None,
        scalar => scalar_text(scalar).map(|name| WorkoutBlock {
            movements: vec![movement_from_name(&name, parser)],
            ..WorkoutBlock::default()
        }),
    }
}

fn movements_from(items: &[Value], parser: &WorkoutParser<'_>) -> Vec<ParsedMovement> {
    items
        .iter()
        .filter_map(|item| match item {
            Value::Object(fields) => Some(movement_from_object(fields, parser)),
            other => scalar_text(other).map(|name| movement_from_name(&name, parser)),
        })
        .collect()
}

/// Canonical name when the dictionary knows it, otherwise the stored name
fn movement_from_name(name: &str, parser: &WorkoutParser<'_>) -> ParsedMovement {
    let entry = parser.resolver().lookup(name);
    let name = entry.map(|e| e.name.clone()).unwrap_or_else(|| name.to_string());
    parser.enrich(ParsedMovement::named(name), entry)
}

fn movement_from_object(fields: &Map<String, Value>, parser: &WorkoutParser<'_>) -> ParsedMovement {
    let name = NAME_KEYS
        .iter()
        .find_map(|key| fields.get(*key).and_then(scalar_text))
        .unwrap_or_else(|| "Unnamed Movement".to_string());

    let entry = parser.resolver().lookup(&name);
    let mut movement =
        ParsedMovement::named(entry.map(|e| e.name.clone()).unwrap_or_else(|| name.clone()));
    movement.reps = fields.get("reps").map(Reps::from_value).unwrap_or_default();
    movement.weight = fields.get("weight").and_then(weight_text);
    movement.distance = fields.get("distance").and_then(scalar_text);
    movement.duration_seconds = as_count(
        fields
            .get("durationSeconds")
            .or_else(|| fields.get("duration")),
    );
    movement.notes = fields.get("notes").and_then(joined_text);
    movement.scaling = fields.get("scaling").and_then(joined_text);
    movement.minute = fields.get("minute").and_then(scalar_text);

    if let Some(id) = fields.get("movementId").and_then(scalar_text) {
        movement.movement_id = Some(id);
    }
    if let Some(modality) = fields.get("modality").and_then(scalar_text) {
        movement.modality = Some(modality);
    }

    parser.enrich(movement, entry)
}

/// `{rx, scaled}` pairs are formatted, plain values pass through
fn weight_text(value: &Value) -> Option<String> {
    match value {
        Value::Object(fields) => WeightSpec {
            rx: fields.get("rx").and_then(scalar_text),
            scaled: fields.get("scaled").and_then(scalar_text),
        }
        .format(),
        other => scalar_text(other),
    }
}

/// Per-round annotations may be a single string or one per round
fn joined_text(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(scalar_text).collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        other => scalar_text(other),
    }
}
