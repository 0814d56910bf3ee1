//! Notation decoder for movement lines.
//!
//! Turns shorthand such as `3x10`, `21-15-9`, `Max`, `95/65`, `400m` and
//! `Even:` prefixes into structured fields, leaving the remaining phrase for
//! the movement resolver. Malformed numbers are never fatal: a token that
//! cannot be read is kept verbatim in `notes`.

use crate::resolver::capitalize;
use crate::Reps;
use once_cell::sync::Lazy;
use regex::Regex;

static MINUTE_PREFIX: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?i)^(even|odd)(?:\s+minutes?)?\s*[:\-]\s*(.+)$").ok());

static SETS_REPS: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?i)^(.+?)\s+(\d+)\s*[x×]\s*(\d+|max)$").ok());

static SETS_REPS_ONLY: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?i)^(\d+)\s*[x×]\s*(\d+|max)$").ok());

static LEADING_SCHEME: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^(\d+(?:\s*-\s*\d+)+)\s+(.+)$").ok());

static LEADING_MAX: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"(?i)^max\s+(.+)$").ok());

static LEADING_DISTANCE: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"(?i)^(\d+(?:\.\d+)?\s*(?:km|mi|miles?|m|meters?|metres?))\s+(.+)$").ok()
});

static LEADING_DURATION: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"(?i)^(\d+)\s*(secs?|seconds?|mins?|minutes?)\s+(.+)$").ok()
});

static LEADING_CLOCK: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^(\d{1,2}):(\d{2})\s+(.+)$").ok());

static LEADING_COUNT: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^(\d+)\s+(.+)$").ok());

static TRAILING_LOAD: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(
        r"(?i)\s+(\d+(?:\.\d+)?\s*/\s*\d+(?:\.\d+)?(?:\s*(?:lbs?|kg|#))?|\d+(?:\.\d+)?\s*(?:lbs?|kg|#|pood))$",
    )
    .ok()
});

static TRAILING_DISTANCE: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"(?i)\s+(\d+(?:\.\d+)?\s*(?:km|mi|miles?|m|meters?|metres?))$").ok()
});

static DISTANCE_ONLY: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"(?i)^\d+(?:\.\d+)?\s*(?:km|mi|miles?|m|meters?|metres?)$").ok()
});

static LIST_SEPARATOR: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\s*,\s+").ok());

/// Structured fields pulled out of one movement line
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct DecodedLine {
    /// What is left for the resolver once notation is removed
    pub phrase: String,
    pub reps: Reps,
    pub weight: Option<String>,
    pub distance: Option<String>,
    pub duration_seconds: Option<u32>,
    pub minute: Option<String>,
    /// Text after a colon that carried no recognizable notation
    pub notes: Option<String>,
}

fn captures<'t>(pattern: &Lazy<Option<Regex>>, text: &'t str) -> Option<regex::Captures<'t>> {
    pattern.as_ref().and_then(|re| re.captures(text))
}

fn group<'t>(caps: &regex::Captures<'t>, index: usize) -> &'t str {
    caps.get(index).map(|m| m.as_str().trim()).unwrap_or("")
}

/// Text of `body` before capture group `index`
fn before_group<'t>(body: &'t str, caps: &regex::Captures<'_>, index: usize) -> &'t str {
    let end = caps.get(index).map(|m| m.start()).unwrap_or(body.len());
    body[..end].trim()
}

/// Record a token that looked like notation but could not be read
fn keep_unparsed(decoded: &mut DecodedLine, token: &str) {
    let token = token.trim();
    decoded.notes = Some(match decoded.notes.take() {
        Some(existing) => format!("{}; {}", existing, token),
        None => token.to_string(),
    });
}

/// Whole text is a distance such as `400m` or `1 mile`
pub fn is_distance(text: &str) -> bool {
    DISTANCE_ONLY
        .as_ref()
        .is_some_and(|re| re.is_match(text.trim()))
}

/// Split `21 Thrusters, 21 Pull-ups` into one segment per movement
///
/// Only `, ` separates (so `1,000m` stays whole), and lines with a colon are
/// left alone because their commas belong to notes.
pub fn split_movement_list(line: &str) -> Vec<&str> {
    let separator = match LIST_SEPARATOR.as_ref() {
        Some(re) if !line.contains(':') => re,
        _ => return vec![line.trim()],
    };
    separator
        .split(line)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Decode a rep scheme on its own: `21`, `21-15-9`, `3x10`, `Max`
pub fn decode_rep_scheme(text: &str) -> Reps {
    let text = text.trim();
    if text.eq_ignore_ascii_case("max") {
        return Reps::Max;
    }

    if let Some(caps) = captures(&SETS_REPS_ONLY, text) {
        return expand_sets(group(&caps, 1), group(&caps, 2));
    }

    if text.contains('-') {
        let counts: Vec<u32> = text
            .split('-')
            .filter_map(|token| token.trim().parse().ok())
            .collect();
        return if counts.is_empty() {
            Reps::Unspecified
        } else {
            Reps::PerRound(counts)
        };
    }

    text.parse().map(Reps::Fixed).unwrap_or(Reps::Unspecified)
}

/// `N` sets of `M` reps becomes `M` repeated `N` times
///
/// Set counts beyond `MAX_SETS` are unreadable, like any other bad number.
fn expand_sets(sets: &str, reps: &str) -> Reps {
    if reps.eq_ignore_ascii_case("max") {
        return Reps::Max;
    }
    match (sets.parse::<usize>(), reps.parse::<u32>()) {
        (Ok(sets), Ok(reps)) => Reps::repeated(reps, sets),
        _ => Reps::Unspecified,
    }
}

/// Decode a full movement line
///
/// Never fails: whatever cannot be decoded stays in `phrase` (or `notes`
/// for colon-delimited text), and an empty phrase falls back to the
/// original line.
pub fn decode_line(line: &str) -> DecodedLine {
    let line = line.trim();
    let mut decoded = DecodedLine::default();
    let mut body = line.to_string();

    if let Some(caps) = captures(&MINUTE_PREFIX, line) {
        decoded.minute = Some(capitalize(&group(&caps, 1).to_lowercase()));
        body = group(&caps, 2).to_string();
    }

    if let Some((before, after)) = body.split_once('@') {
        let intensity = after.trim();
        if !intensity.is_empty() {
            decoded.weight = Some(intensity.to_string());
        }
        body = before.trim().to_string();
    }

    if let Some((name, rest)) = split_colon(&body) {
        decode_colon_form(&mut decoded, name, rest);
    } else {
        let without_load = strip_trailing_load(&body, &mut decoded);
        decode_plain_form(&mut decoded, &without_load);
    }

    if decoded.phrase.is_empty() {
        decoded.phrase = line.to_string();
    }

    tracing::trace!(line, phrase = %decoded.phrase, "decoded movement line");
    decoded
}

/// `name: rest`, only when the name part actually looks like a name
fn split_colon(body: &str) -> Option<(&str, &str)> {
    let (name, rest) = body.split_once(':')?;
    let (name, rest) = (name.trim(), rest.trim());
    if name.chars().any(char::is_alphabetic) && !rest.is_empty() {
        Some((name, rest))
    } else {
        None
    }
}

fn decode_colon_form(decoded: &mut DecodedLine, name: &str, rest: &str) {
    decoded.phrase = name.to_string();

    let rest = strip_trailing_load(rest, decoded);
    if DISTANCE_ONLY.as_ref().is_some_and(|re| re.is_match(&rest)) {
        decoded.distance = Some(rest);
        return;
    }

    decoded.reps = decode_rep_scheme(&rest);
    if decoded.reps.is_unspecified() {
        decoded.notes = Some(rest);
    }
}

fn decode_plain_form(decoded: &mut DecodedLine, body: &str) {
    if let Some(caps) = captures(&SETS_REPS, body) {
        decoded.phrase = group(&caps, 1).to_string();
        decoded.reps = expand_sets(group(&caps, 2), group(&caps, 3));
        if decoded.reps.is_unspecified() {
            let start = caps.get(2).map(|m| m.start()).unwrap_or(body.len());
            keep_unparsed(decoded, &body[start..]);
        }
        return;
    }

    let phrase = if let Some(caps) = captures(&LEADING_SCHEME, body) {
        decoded.reps = decode_rep_scheme(&group(&caps, 1).replace(' ', ""));
        group(&caps, 2)
    } else if let Some(caps) = captures(&LEADING_MAX, body) {
        decoded.reps = Reps::Max;
        group(&caps, 1)
    } else if let Some(caps) = captures(&LEADING_DISTANCE, body) {
        decoded.distance = Some(group(&caps, 1).to_string());
        group(&caps, 2)
    } else if let Some(caps) = captures(&LEADING_DURATION, body) {
        let scale = if group(&caps, 2).to_lowercase().starts_with("min") {
            60
        } else {
            1
        };
        match group(&caps, 1)
            .parse::<u32>()
            .ok()
            .and_then(|amount| amount.checked_mul(scale))
        {
            Some(seconds) => decoded.duration_seconds = Some(seconds),
            None => keep_unparsed(decoded, before_group(body, &caps, 3)),
        }
        group(&caps, 3)
    } else if let Some(caps) = captures(&LEADING_CLOCK, body) {
        let minutes = group(&caps, 1).parse::<u32>().ok();
        let seconds = group(&caps, 2).parse::<u32>().ok().filter(|s| *s < 60);
        match minutes.zip(seconds) {
            Some((minutes, seconds)) => decoded.duration_seconds = Some(minutes * 60 + seconds),
            None => keep_unparsed(decoded, before_group(body, &caps, 3)),
        }
        group(&caps, 3)
    } else if let Some(caps) = captures(&LEADING_COUNT, body) {
        match group(&caps, 1).parse() {
            Ok(count) => decoded.reps = Reps::Fixed(count),
            Err(_) => keep_unparsed(decoded, group(&caps, 1)),
        }
        group(&caps, 2)
    } else {
        body
    };

    let mut phrase = phrase.to_string();
    if decoded.distance.is_none() {
        if let Some(caps) = captures(&TRAILING_DISTANCE, &phrase) {
            let distance = group(&caps, 1).to_string();
            let cut = caps.get(0).map(|m| m.start()).unwrap_or(phrase.len());
            phrase.truncate(cut);
            decoded.distance = Some(distance);
        }
    }
    decoded.phrase = phrase.trim().to_string();
}

/// Pull a trailing `95/65` or `135 lb` style load off the text
fn strip_trailing_load(text: &str, decoded: &mut DecodedLine) -> String {
    match captures(&TRAILING_LOAD, text) {
        Some(caps) => {
            let load = group(&caps, 1).to_string();
            if decoded.weight.is_none() {
                decoded.weight = Some(load);
            }
            let cut = caps.get(0).map(|m| m.start()).unwrap_or(text.len());
            text[..cut].trim().to_string()
        }
        None => text.trim().to_string(),
    }
}
