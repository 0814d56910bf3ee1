//! Plain-text rendering of the canonical model.
//!
//! No markup is emitted; emphasis and colour belong to the consumer.

use crate::resolver::title_case;
use crate::{ParsedMovement, ParsedWorkout, WorkoutType};
use serde::{Deserialize, Serialize};

/// Which optional sections `render_text` emits
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    #[serde(default = "default_true")]
    pub include_notes: bool,

    #[serde(default = "default_true")]
    pub include_scaling: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_notes: default_true(),
            include_scaling: default_true(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Single heading line for a workout, first matching rule wins
///
/// 1. MetCon with a round count: `"<rounds> Rounds for time of:"`
/// 2. AMRAP with a duration: `"AMRAP <duration>:"`
/// 3. EMOM with a duration: `"EMOM <duration>"`
/// 4. Any type mentioning "hero wod": `"HERO WOD"`
pub fn heading(workout: &ParsedWorkout) -> Option<String> {
    match (&workout.workout_type, workout.rounds(), workout.duration.as_deref()) {
        (WorkoutType::MetCon, Some(rounds), _) => Some(format!("{} Rounds for time of:", rounds)),
        (WorkoutType::Amrap, _, Some(duration)) => Some(format!("AMRAP {}:", duration)),
        (WorkoutType::Emom, _, Some(duration)) => Some(format!("EMOM {}", duration)),
        (kind, _, _) if kind.as_str().to_lowercase().contains("hero wod") => {
            Some("HERO WOD".to_string())
        }
        _ => None,
    }
}

/// `[MINUTE] [reps] name[, distance]`
pub fn movement_line(movement: &ParsedMovement) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(3);
    if let Some(minute) = &movement.minute {
        parts.push(minute.to_uppercase());
    }
    if let Some(reps) = movement.reps.display() {
        parts.push(reps);
    }
    parts.push(movement.name.clone());

    let mut line = parts
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if let Some(distance) = &movement.distance {
        line.push_str(", ");
        line.push_str(distance);
    }
    line
}

/// `reduced_load` becomes `Reduced Load`
///
/// Keys are identifiers, so they are lower-cased before title-casing.
pub fn humanize_key(key: &str) -> String {
    title_case(&key.replace('_', " ").to_lowercase())
}

/// Full text: heading, blocks, notes and scaling guidelines
pub fn render_text(workout: &ParsedWorkout, options: &RenderOptions) -> String {
    let mut lines: Vec<String> = Vec::new();

    if let Some(heading) = heading(workout) {
        lines.push(heading);
    }

    for (index, block) in workout.workout_blocks.iter().enumerate() {
        if index > 0 && !lines.is_empty() {
            lines.push(String::new());
        }
        if let Some(title) = &block.title {
            lines.push(title.to_uppercase());
        }
        lines.extend(block.movements.iter().map(movement_line));
    }

    if options.include_notes && !workout.notes.is_empty() {
        lines.push(String::new());
        lines.extend(workout.notes.iter().map(|note| format!("Note: {}", note)));
    }

    if options.include_scaling {
        if let Some(guidelines) = workout.scaling_guidelines.as_ref().filter(|g| !g.is_empty()) {
            lines.push(String::new());
            lines.extend(
                guidelines
                    .iter()
                    .map(|(key, value)| format!("Scaling: {} - {}", humanize_key(key), value)),
            );
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_workout, Reps, WorkoutBlock};
    use std::collections::BTreeMap;

    fn workout(kind: WorkoutType) -> ParsedWorkout {
        ParsedWorkout {
            workout_type: kind,
            ..ParsedWorkout::default()
        }
    }

    #[test]
    fn test_metcon_heading_from_rounds() {
        let parsed = parse_workout("3 Rounds\nThrusters\nPull-ups", &[]);
        assert_eq!(heading(&parsed).as_deref(), Some("3 Rounds for time of:"));
    }

    #[test]
    fn test_metcon_without_rounds_has_no_heading() {
        assert_eq!(heading(&workout(WorkoutType::MetCon)), None);
    }

    #[test]
    fn test_amrap_and_emom_headings() {
        let mut amrap = workout(WorkoutType::Amrap);
        assert_eq!(heading(&amrap), None);
        amrap.duration = Some("20 minutes".into());
        assert_eq!(heading(&amrap).as_deref(), Some("AMRAP 20 minutes:"));

        let emom = ParsedWorkout {
            duration: Some("12 minutes".into()),
            ..workout(WorkoutType::Emom)
        };
        assert_eq!(heading(&emom).as_deref(), Some("EMOM 12 minutes"));
    }

    #[test]
    fn test_hero_wod_heading() {
        assert_eq!(heading(&workout(WorkoutType::HeroWod)).as_deref(), Some("HERO WOD"));
        assert_eq!(
            heading(&workout(WorkoutType::Other("Memorial Day Hero WOD".into()))).as_deref(),
            Some("HERO WOD")
        );
        assert_eq!(heading(&workout(WorkoutType::Unknown)), None);
    }

    #[test]
    fn test_movement_line_composition() {
        let movement = ParsedMovement {
            minute: Some("Even".into()),
            reps: Reps::PerRound(vec![21, 15, 9]),
            distance: Some("200m".into()),
            ..ParsedMovement::named("Run")
        };
        assert_eq!(movement_line(&movement), "EVEN 21-15-9 Run, 200m");

        let max = ParsedMovement {
            reps: Reps::Max,
            ..ParsedMovement::named("Pull-up")
        };
        assert_eq!(movement_line(&max), "Max Pull-up");

        let fixed = ParsedMovement {
            reps: Reps::Fixed(50),
            ..ParsedMovement::named("Double-under")
        };
        assert_eq!(movement_line(&fixed), "50 Double-under");
        assert_eq!(movement_line(&ParsedMovement::named("Row")), "Row");
    }

    #[test]
    fn test_humanize_key() {
        assert_eq!(humanize_key("reduced_load"), "Reduced Load");
        assert_eq!(humanize_key("BEGINNER"), "Beginner");
        assert_eq!(humanize_key("__odd__key"), "Odd Key");
    }

    #[test]
    fn test_plain_names_round_trip_in_order() {
        let parsed = parse_workout("Burpees\nsit-ups\nRow", &[]);
        let text = render_text(&parsed, &RenderOptions::default());
        assert_eq!(text, "Burpees\nSit-ups\nRow");
    }

    #[test]
    fn test_render_full_document() {
        let mut guidelines = BTreeMap::new();
        guidelines.insert("reduced_load".to_string(), "65/45".to_string());

        let parsed = ParsedWorkout {
            workout_type: WorkoutType::Amrap,
            duration: Some("20 minutes".into()),
            workout_blocks: vec![
                WorkoutBlock {
                    movements: vec![ParsedMovement {
                        reps: Reps::Fixed(5),
                        ..ParsedMovement::named("Pull-up")
                    }],
                    ..WorkoutBlock::default()
                },
                WorkoutBlock {
                    title: Some("Cash out".into()),
                    movements: vec![ParsedMovement::named("Row")],
                    ..WorkoutBlock::default()
                },
            ],
            notes: vec!["Score is rounds".into()],
            scaling_guidelines: Some(guidelines),
            ..ParsedWorkout::default()
        };

        let text = render_text(&parsed, &RenderOptions::default());
        assert_eq!(
            text,
            "AMRAP 20 minutes:\n5 Pull-up\n\nCASH OUT\nRow\n\nNote: Score is rounds\n\nScaling: Reduced Load - 65/45"
        );

        let bare = render_text(
            &parsed,
            &RenderOptions {
                include_notes: false,
                include_scaling: false,
            },
        );
        assert!(!bare.contains("Note:"));
        assert!(!bare.contains("Scaling"));
    }

    #[test]
    fn test_reparse_rendered_output_keeps_type() {
        let inputs = [
            "AMRAP 20\nBurpees\nSit-ups",
            "3 Rounds\nThrusters\nPull-ups",
            "EMOM 10\nPower Clean",
            "HERO WOD\nRun 1 mile\n100 Pull-ups",
        ];

        for input in inputs {
            let first = parse_workout(input, &[]);
            let rendered = render_text(&first, &RenderOptions::default());
            let second = parse_workout(&rendered, &[]);
            assert_eq!(first.workout_type, second.workout_type, "input {:?}", input);
            assert_eq!(first.duration, second.duration, "input {:?}", input);
        }
    }
}
