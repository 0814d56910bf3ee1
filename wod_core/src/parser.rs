//! Parsing pipeline: both input paths converge on `ParsedWorkout`.
//!
//! Freeform text goes through classify → resolve → decode. Stored templates
//! are mapped field by field (see `template`). Both are `WorkoutSource`s
//! consumed by a `WorkoutParser` holding the injected dictionary.

use crate::classifier::{classify, LineKind};
use crate::notation::{decode_line, is_distance, split_movement_list};
use crate::{
    MovementEntry, MovementResolver, ParsedMovement, ParsedWorkout, Reps, Result, WorkoutBlock,
    WorkoutTemplate,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::future::Future;

/// Parser behaviour switches
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Fill unspecified reps from the matched entry's defaults
    #[serde(default)]
    pub apply_dictionary_defaults: bool,
}

/// Anything that can be turned into the canonical model
pub trait WorkoutSource {
    fn to_workout(&self, parser: &WorkoutParser<'_>) -> ParsedWorkout;
}

/// Raw user-typed workout text
#[derive(Clone, Copy, Debug)]
pub struct FreeformText<'a>(pub &'a str);

impl WorkoutSource for FreeformText<'_> {
    fn to_workout(&self, parser: &WorkoutParser<'_>) -> ParsedWorkout {
        parser.parse_text(self.0)
    }
}

impl WorkoutSource for str {
    fn to_workout(&self, parser: &WorkoutParser<'_>) -> ParsedWorkout {
        parser.parse_text(self)
    }
}

/// Parser bound to one movement dictionary
#[derive(Clone, Debug)]
pub struct WorkoutParser<'d> {
    resolver: MovementResolver<'d>,
    options: ParseOptions,
}

/// Round count and format waiting for the first block to be opened
#[derive(Default)]
struct PendingBlockInfo {
    rounds: Option<u32>,
    format: Option<String>,
}

impl PendingBlockInfo {
    fn is_empty(&self) -> bool {
        self.rounds.is_none() && self.format.is_none()
    }

    fn open_block(&mut self, title: Option<String>) -> WorkoutBlock {
        WorkoutBlock {
            title,
            rounds: self.rounds.take(),
            format: self.format.take(),
            movements: Vec::new(),
        }
    }
}

impl<'d> WorkoutParser<'d> {
    pub fn new(dictionary: &'d [MovementEntry]) -> Self {
        Self {
            resolver: MovementResolver::new(dictionary),
            options: ParseOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    pub fn resolver(&self) -> &MovementResolver<'d> {
        &self.resolver
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse any workout source
    pub fn parse<S: WorkoutSource + ?Sized>(&self, source: &S) -> ParsedWorkout {
        source.to_workout(self)
    }

    /// Import a validated stored template
    pub fn import(&self, template: &WorkoutTemplate) -> ParsedWorkout {
        template.to_workout(self)
    }

    /// Freeform path: one block per section header, or one implicit block
    pub fn parse_text(&self, text: &str) -> ParsedWorkout {
        let mut workout = ParsedWorkout::default();
        let mut scaling = BTreeMap::new();
        let mut pending = PendingBlockInfo::default();
        let mut current: Option<WorkoutBlock> = None;

        for kind in classify(text) {
            match kind {
                LineKind::TypeDescriptor(descriptor) => {
                    workout.workout_type = descriptor.workout_type;
                    workout.duration = descriptor.duration;
                    pending.rounds = descriptor.rounds;
                    pending.format = descriptor.format;
                }
                LineKind::SectionHeader(title) => {
                    workout.workout_blocks.extend(current.take());
                    let title = title.trim_end_matches(':').trim_end().to_string();
                    current = Some(pending.open_block(Some(title)));
                }
                LineKind::Note(note) => {
                    if !note.is_empty() {
                        workout.notes.push(note.to_string());
                    }
                }
                LineKind::Scaling { key, value } => {
                    scaling
                        .entry(key)
                        .and_modify(|existing: &mut String| {
                            existing.push_str("; ");
                            existing.push_str(value);
                        })
                        .or_insert_with(|| value.to_string());
                }
                LineKind::Movement(line) => {
                    let block = current.get_or_insert_with(|| pending.open_block(None));
                    self.push_movements(line, &mut block.movements);
                }
            }
        }

        workout.workout_blocks.extend(current);
        if !pending.is_empty() {
            workout.workout_blocks.push(pending.open_block(None));
        }
        if !scaling.is_empty() {
            workout.scaling_guidelines = Some(scaling);
        }

        tracing::debug!(
            workout_type = %workout.workout_type,
            blocks = workout.workout_blocks.len(),
            "parsed freeform workout"
        );
        workout
    }

    /// Decode every movement in a `, `-separated line
    ///
    /// A segment that is only a distance (`Run, 400m`) belongs to the
    /// movement before it.
    fn push_movements(&self, line: &str, movements: &mut Vec<ParsedMovement>) {
        let mut from_line = 0;
        for segment in split_movement_list(line) {
            if from_line > 0 && is_distance(segment) {
                if let Some(previous) = movements.last_mut().filter(|m| m.distance.is_none()) {
                    previous.distance = Some(segment.to_string());
                    continue;
                }
            }
            movements.push(self.movement_from_line(segment));
            from_line += 1;
        }
    }

    /// Decode and resolve a single movement line
    pub fn movement_from_line(&self, line: &str) -> ParsedMovement {
        let decoded = decode_line(line);
        let resolution = self.resolver.resolve(&decoded.phrase);

        let movement = ParsedMovement {
            name: resolution.name,
            movement_id: None,
            reps: decoded.reps,
            weight: decoded.weight,
            distance: decoded.distance,
            duration_seconds: decoded.duration_seconds,
            modality: None,
            notes: decoded.notes,
            scaling: None,
            minute: decoded.minute,
        };
        self.enrich(movement, resolution.entry)
    }

    /// Copy catalog details from the matched entry onto a movement
    pub(crate) fn enrich(
        &self,
        mut movement: ParsedMovement,
        entry: Option<&MovementEntry>,
    ) -> ParsedMovement {
        let Some(entry) = entry else {
            return movement;
        };

        if movement.movement_id.is_none() {
            movement.movement_id = entry.id.clone();
        }
        if movement.modality.is_none() {
            movement.modality = entry.modality.clone();
        }

        if self.options.apply_dictionary_defaults && movement.reps.is_unspecified() {
            if let Some(reps) = entry.default_reps {
                movement.reps = match entry.default_sets {
                    Some(sets) => Reps::repeated(reps, sets as usize),
                    None => Reps::Fixed(reps),
                };
            }
        }

        movement
    }
}

/// Parse freeform text against an in-memory dictionary
pub fn parse_workout(text: &str, dictionary: &[MovementEntry]) -> ParsedWorkout {
    WorkoutParser::new(dictionary).parse_text(text)
}

/// Import a stored template object against an in-memory dictionary
///
/// Fails only when the value is not a template-shaped object.
pub fn import_template(value: &Value, dictionary: &[MovementEntry]) -> Result<ParsedWorkout> {
    let template = WorkoutTemplate::from_value(value.clone())?;
    Ok(WorkoutParser::new(dictionary).import(&template))
}

/// Parse freeform text once the caller's dictionary fetch completes
///
/// Only the fetch is awaited; parsing runs to completion synchronously.
/// A failed fetch is returned unchanged.
pub async fn parse_workout_with_dictionary<F>(text: &str, fetch: F) -> Result<ParsedWorkout>
where
    F: Future<Output = Result<Vec<MovementEntry>>>,
{
    let dictionary = fetch.await?;
    Ok(parse_workout(text, &dictionary))
}
