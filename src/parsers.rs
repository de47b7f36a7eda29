//! Pure text helpers shared by every extraction strategy.

use html_escape::decode_html_entities;
use regex::Regex;
use std::sync::LazyLock;

static HTML_TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("Invalid HTML tag regex"));

static WHITESPACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

static NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:[.,]\d+)?").expect("Invalid number regex"));

static HOURS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:hours?|hrs?|h)(?:[^a-z]|$)").expect("Invalid hours regex")
});

static MINUTES_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s*(?:minutes?|mins?|m)(?:[^a-z]|$)").expect("Invalid minutes regex")
});

static ISO_DURATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^P(?:(\d+)D)?(?:T(?:(\d+(?:\.\d+)?)H)?(?:(\d+(?:-\d+)?)M)?(?:(\d+(?:\.\d+)?)S)?)?$",
    )
    .expect("Invalid ISO duration regex")
});

static STEP_NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[.)]\s+").expect("Invalid step number regex"));

static STEP_LABEL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^step\s*\d+\s*[:.)\-]?\s*").expect("Invalid step label regex")
});

fn decode_html_symbols(text: &str) -> String {
    // some sites double-encode entities, so decode twice
    decode_html_entities(&decode_html_entities(text)).into_owned()
}

/// Decode entities, drop inline tags and collapse whitespace.
pub fn clean_text(text: &str) -> String {
    let decoded = decode_html_symbols(text);
    let stripped = HTML_TAG_REGEX.replace_all(&decoded, " ");
    WHITESPACE_REGEX.replace_all(&stripped, " ").trim().to_string()
}

/// [`clean_text`], but `None` when nothing is left.
pub fn non_empty(text: &str) -> Option<String> {
    let cleaned = clean_text(text);
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// First integer or decimal in `text`. A decimal comma is accepted.
pub fn extract_number(text: &str) -> Option<f64> {
    NUMBER_REGEX
        .find(text)
        .and_then(|m| m.as_str().replace(',', ".").parse().ok())
}

/// Render a duration as `#h #m`, `#h` or `#m`.
pub fn format_duration(total_minutes: u64) -> String {
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    match (hours, minutes) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

/// Whole minutes in `amount` units of `per_unit` minutes, `None` when the
/// result does not fit in a `u64`.
fn to_minutes(amount: f64, per_unit: f64) -> Option<u64> {
    let minutes = (amount * per_unit).round();
    (minutes.is_finite() && minutes >= 0.0 && minutes < u64::MAX as f64).then_some(minutes as u64)
}

/// Parse a free-text duration such as "1 hour 30 minutes" into `1h 30m`.
/// Text without a recognisable hour or minute amount, or with amounts too
/// large to represent, is returned unchanged.
pub fn extract_time(text: &str) -> String {
    let hours = HOURS_REGEX
        .captures(text)
        .and_then(|c| c[1].parse::<f64>().ok());
    let minutes = MINUTES_REGEX
        .captures(text)
        .and_then(|c| c[1].parse::<u64>().ok());

    if hours.is_none() && minutes.is_none() {
        return text.to_string();
    }

    let total = to_minutes(hours.unwrap_or(0.0), 60.0)
        .and_then(|h| h.checked_add(minutes.unwrap_or(0)));
    match total {
        Some(total) => format_duration(total),
        None => text.to_string(),
    }
}

/// Parse an ISO-8601 duration (`PT1H30M`, `P1DT2H`, `PT5400S`, `PT15-20M`).
/// Returns `None` for anything that is not ISO-8601 or does not fit in
/// a `u64` count of minutes.
pub fn parse_iso_duration(text: &str) -> Option<String> {
    let caps = ISO_DURATION_REGEX.captures(text.trim())?;
    if caps.iter().skip(1).all(|c| c.is_none()) {
        return None;
    }

    let days: u64 = match caps.get(1) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };
    let hours: f64 = caps.get(2).and_then(|m| m.as_str().parse().ok()).unwrap_or(0.0);
    let seconds: f64 = caps.get(4).and_then(|m| m.as_str().parse().ok()).unwrap_or(0.0);
    let whole_hours = days
        .checked_mul(24 * 60)?
        .checked_add(to_minutes(hours, 60.0)?)?;

    let minutes_str = caps.get(3).map(|m| m.as_str());
    if let Some(range) = minutes_str.filter(|m| m.contains('-')) {
        // keep ranges verbatim, e.g. "15-20m"
        return Some(if whole_hours > 0 {
            format!("{} {range}m", format_duration(whole_hours))
        } else {
            format!("{range}m")
        });
    }

    let minutes: u64 = match minutes_str {
        Some(m) => m.parse().ok()?,
        None => 0,
    };
    let total = whole_hours
        .checked_add(minutes)?
        .checked_add(to_minutes(seconds, 1.0 / 60.0)?)?;
    Some(format_duration(total))
}

/// Structured durations: ISO-8601 when the text has that shape, free text
/// otherwise. An ISO value that cannot be represented yields `None`.
pub fn parse_duration(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if ISO_DURATION_REGEX.is_match(trimmed) {
        return parse_iso_duration(trimmed);
    }
    Some(extract_time(&clean_text(trimmed)))
}

/// Strip leading "3. " and "Step 3:" markers. Idempotent: markers are removed
/// until none is left.
pub fn clean_instruction(text: &str) -> String {
    let mut current = text.trim().to_string();
    loop {
        let next = {
            let without_number = STEP_NUMBER_REGEX.replace(&current, "");
            let without_label = STEP_LABEL_REGEX.replace(&without_number, "");
            without_label.trim().to_string()
        };
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Instruction fragments this short are noise ("Done", "1.", ...).
pub const MIN_INSTRUCTION_LEN: usize = 5;

pub fn is_meaningful_step(step: &str) -> bool {
    step.chars().count() > MIN_INSTRUCTION_LEN
}
