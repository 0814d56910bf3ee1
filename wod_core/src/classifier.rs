//! Line classification for freeform workout text.
//!
//! Splits raw text into trimmed, non-empty lines and tags each one. Only
//! the first line is checked against the workout-type vocabulary; whatever
//! follows the descriptor's colon on that line is classified like a line of
//! its own.

use crate::WorkoutType;
use once_cell::sync::Lazy;
use regex::Regex;

static ROUNDS_LINE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?i)^(\d+)\s+rounds?\b").ok());

static FIRST_NUMBER: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\d+").ok());

static NOTE_LINE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"(?i)^notes?\s*:\s*(.*)$").ok());

static SCALING_LINE: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"(?i)^(scaled|scaling|beginner|intermediate|advanced)\s*:\s*(.+)$").ok()
});

const HERO_WOD_MARKER: &str = "hero wod";

/// What the first line says about the workout as a whole
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub workout_type: WorkoutType,
    /// Free-text duration, e.g. `"20 minutes"`
    pub duration: Option<String>,
    /// Round count for the first block
    pub rounds: Option<u32>,
    /// Format tag for the first block
    pub format: Option<String>,
}

/// Classification of one line
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineKind<'a> {
    TypeDescriptor(TypeDescriptor),
    SectionHeader(&'a str),
    Note(&'a str),
    Scaling { key: String, value: &'a str },
    Movement(&'a str),
}

/// Lazy iterator over classified lines
///
/// A clone walks the remaining text independently of the original.
#[derive(Clone, Debug)]
pub struct ClassifiedLines<'a> {
    lines: std::str::Lines<'a>,
    first: bool,
    /// Text after the descriptor on line 1, yielded next
    remainder: Option<&'a str>,
}

impl<'a> Iterator for ClassifiedLines<'a> {
    type Item = LineKind<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(rest) = self.remainder.take() {
            return Some(classify_line(rest));
        }

        let line = self.lines.by_ref().map(str::trim).find(|l| !l.is_empty())?;

        if std::mem::take(&mut self.first) {
            if let Some(descriptor) = detect_descriptor(line) {
                self.remainder = line
                    .split_once(':')
                    .map(|(_, rest)| rest.trim())
                    .filter(|rest| !rest.is_empty());
                return Some(LineKind::TypeDescriptor(descriptor));
            }
        }

        Some(classify_line(line))
    }
}

/// Classify every non-empty line of `text`
pub fn classify(text: &str) -> ClassifiedLines<'_> {
    ClassifiedLines {
        lines: text.lines(),
        first: true,
        remainder: None,
    }
}

/// Match a line against the workout-type vocabulary
///
/// Checked in order: hero wod, amrap, emom, metcon, `<N> rounds`.
pub fn detect_descriptor(line: &str) -> Option<TypeDescriptor> {
    let lower = line.to_lowercase();
    let descriptor = |workout_type| TypeDescriptor {
        workout_type,
        duration: None,
        rounds: None,
        format: None,
    };

    if lower.contains(HERO_WOD_MARKER) {
        return Some(descriptor(WorkoutType::HeroWod));
    }

    if lower.contains("amrap") {
        return Some(TypeDescriptor {
            duration: duration_minutes(line),
            format: Some("AMRAP".into()),
            ..descriptor(WorkoutType::Amrap)
        });
    }

    if lower.contains("emom") {
        return Some(TypeDescriptor {
            duration: duration_minutes(line),
            format: Some("EMOM".into()),
            ..descriptor(WorkoutType::Emom)
        });
    }

    if lower.contains("metcon") {
        return Some(descriptor(WorkoutType::MetCon));
    }

    let rounds = ROUNDS_LINE
        .as_ref()
        .and_then(|re| re.captures(line))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())?;

    Some(TypeDescriptor {
        rounds: Some(rounds),
        format: lower.contains("for time").then(|| "for time".to_string()),
        ..descriptor(WorkoutType::MetCon)
    })
}

/// First run of digits, read as minutes
fn duration_minutes(line: &str) -> Option<String> {
    FIRST_NUMBER
        .as_ref()
        .and_then(|re| re.find(line))
        .map(|m| format!("{} minutes", m.as_str()))
}

/// Upper-case, longer than 3 characters, and not the hero-wod marker
///
/// A line starting with a digit is never a header: `21 KBS` and `50 DU` are
/// shorthand movements.
pub fn is_section_header(line: &str) -> bool {
    line.chars().count() > 3
        && !line.starts_with(|c: char| c.is_ascii_digit())
        && line.chars().any(char::is_alphabetic)
        && line == line.to_uppercase()
        && !line.eq_ignore_ascii_case(HERO_WOD_MARKER)
}

fn classify_line(line: &str) -> LineKind<'_> {
    if let Some(caps) = NOTE_LINE.as_ref().and_then(|re| re.captures(line)) {
        let text = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
        return LineKind::Note(text);
    }

    if let Some(caps) = SCALING_LINE.as_ref().and_then(|re| re.captures(line)) {
        if let (Some(key), Some(value)) = (caps.get(1), caps.get(2)) {
            return LineKind::Scaling {
                key: key.as_str().to_lowercase(),
                value: value.as_str().trim(),
            };
        }
    }

    if is_section_header(line) {
        return LineKind::SectionHeader(line);
    }

    LineKind::Movement(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<LineKind<'_>> {
        classify(text).collect()
    }

    #[test]
    fn test_amrap_descriptor_with_duration() {
        let lines = kinds("AMRAP 20\nBurpees\nSit-ups");
        assert_eq!(lines.len(), 3);
        match &lines[0] {
            LineKind::TypeDescriptor(d) => {
                assert_eq!(d.workout_type, WorkoutType::Amrap);
                assert_eq!(d.duration.as_deref(), Some("20 minutes"));
            }
            other => panic!("Expected descriptor, got {:?}", other),
        }
        assert_eq!(lines[1], LineKind::Movement("Burpees"));
        assert_eq!(lines[2], LineKind::Movement("Sit-ups"));
    }

    #[test]
    fn test_rounds_descriptor() {
        let d = detect_descriptor("3 Rounds For Time:").unwrap();
        assert_eq!(d.workout_type, WorkoutType::MetCon);
        assert_eq!(d.rounds, Some(3));
        assert_eq!(d.format.as_deref(), Some("for time"));
    }

    #[test]
    fn test_descriptor_precedence() {
        let d = detect_descriptor("Hero WOD: AMRAP 30").unwrap();
        assert_eq!(d.workout_type, WorkoutType::HeroWod);
        assert_eq!(d.duration, None);

        let d = detect_descriptor("emom 12 min").unwrap();
        assert_eq!(d.workout_type, WorkoutType::Emom);
        assert_eq!(d.duration.as_deref(), Some("12 minutes"));

        assert_eq!(
            detect_descriptor("Today's MetCon").unwrap().workout_type,
            WorkoutType::MetCon
        );
        assert!(detect_descriptor("Thrusters").is_none());
        assert_eq!(detect_descriptor("AMRAP").unwrap().duration, None);
    }

    #[test]
    fn test_only_first_line_is_descriptor() {
        let lines = kinds("Thrusters\nAMRAP 20");
        assert_eq!(lines[0], LineKind::Movement("Thrusters"));
        assert_eq!(lines[1], LineKind::SectionHeader("AMRAP 20"));
    }

    #[test]
    fn test_section_headers() {
        assert!(is_section_header("STRENGTH"));
        assert!(is_section_header("PART B:"));
        assert!(!is_section_header("ABC"));
        assert!(!is_section_header("HERO WOD"));
        assert!(!is_section_header("21-15-9"));
        assert!(!is_section_header("Strength"));
        assert!(!is_section_header("21 KBS"));
        assert!(!is_section_header("50 DU"));
        assert!(is_section_header("HSPU"));
    }

    #[test]
    fn test_uppercase_shorthand_with_count_is_movement() {
        let lines = kinds("AMRAP 12\n21 KBS\n50 DU");
        assert_eq!(lines[1], LineKind::Movement("21 KBS"));
        assert_eq!(lines[2], LineKind::Movement("50 DU"));
    }

    #[test]
    fn test_text_after_descriptor_colon_is_classified() {
        let lines = kinds("3 Rounds For Time: 21 Thrusters, 21 Pull-ups\nRow 500m");
        assert_eq!(lines.len(), 3);
        assert!(matches!(lines[0], LineKind::TypeDescriptor(_)));
        assert_eq!(lines[1], LineKind::Movement("21 Thrusters, 21 Pull-ups"));
        assert_eq!(lines[2], LineKind::Movement("Row 500m"));

        let bare = kinds("AMRAP 20:\nBurpees");
        assert_eq!(bare.len(), 2);
        assert_eq!(bare[1], LineKind::Movement("Burpees"));
    }

    #[test]
    fn test_notes_and_scaling_lines() {
        let lines = kinds("Burpees\nNotes: keep moving\nScaled: step-ups instead");
        assert_eq!(lines[1], LineKind::Note("keep moving"));
        assert_eq!(
            lines[2],
            LineKind::Scaling {
                key: "scaled".into(),
                value: "step-ups instead"
            }
        );
    }

    #[test]
    fn test_blank_lines_skipped_and_restartable() {
        let lines = classify("\n   \nWARM UP\n\n  Row  \n");
        let again = lines.clone();
        assert_eq!(lines.count(), 2);
        assert_eq!(
            again.collect::<Vec<_>>(),
            vec![LineKind::SectionHeader("WARM UP"), LineKind::Movement("Row")]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(kinds("").is_empty());
        assert!(kinds(" \n\t\n").is_empty());
    }
}
