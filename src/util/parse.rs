use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use regex::Regex;

use crate::error::AppError;

/// Format users type poll close dates in.
pub const DATETIME_FORMAT: &str = "%Y/%m/%d %H:%M";

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:(?:https?|ftp)://)[\w/\-?=%.]+\.[\w/\-&?=%.]+").expect("valid url regex")
});

/// Splits raw `|`-separated command input into trimmed, de-duplicated fields.
///
/// `\|` produces a literal `|` inside a field, `\\` a literal backslash, and `||` is kept
/// verbatim as a literal double pipe. Empty fields are dropped and the first occurrence
/// of a duplicate wins.
pub fn split_fields(input: &str) -> Vec<String> {
    let mut fields: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'\\') => {
                chars.next();
                current.push('\\');
            }
            '\\' if chars.peek() == Some(&'|') => {
                chars.next();
                current.push('|');
            }
            '|' if chars.peek() == Some(&'|') => {
                chars.next();
                current.push_str("||");
            }
            '|' => fields.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    fields.push(current);

    let mut unique: Vec<String> = Vec::new();
    for field in fields {
        let field = field.trim();
        if !field.is_empty() && !unique.iter().any(|f| f == field) {
            unique.push(field.to_string());
        }
    }
    unique
}

/// Escapes a single field so that `split_fields` reads it back unchanged.
///
/// Backslashes are doubled, literal `||` pairs stay as they are and any remaining
/// single `|` becomes `\|`.
pub fn escape_field(field: &str) -> String {
    let mut escaped = String::with_capacity(field.len());
    let mut chars = field.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\' {
            escaped.push_str("\\\\");
        } else if c != '|' {
            escaped.push(c);
        } else if chars.peek() == Some(&'|') {
            chars.next();
            escaped.push_str("||");
        } else {
            escaped.push_str("\\|");
        }
    }
    escaped
}

/// Normalizes a chat message for trigger matching: URLs removed, lower-cased, `\|` unescaped.
pub fn normalize_message(content: &str) -> String {
    URL_PATTERN
        .replace_all(content, "")
        .to_lowercase()
        .replace("\\|", "|")
}

/// Parses a `YYYY/MM/DD HH:MM` close date typed in `offset` and requires it to be after `now`.
///
/// # Returns
/// - `Ok(DateTime<FixedOffset>)` - The parsed deadline
/// - `Err(AppError::Validation)` - Malformed input or a date that is not in the future
pub fn parse_close_date(
    input: &str,
    offset: FixedOffset,
    now: DateTime<Utc>,
) -> Result<DateTime<FixedOffset>, AppError> {
    let malformed =
        || AppError::Validation("Malformed close_date. (format: YYYY/MM/DD HH:MM)".to_string());

    let naive = NaiveDateTime::parse_from_str(input.trim(), DATETIME_FORMAT).map_err(|_| malformed())?;
    let close_time = offset
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(malformed)?;

    if close_time <= now {
        return Err(AppError::Validation(format!(
            "{} has already passed!",
            close_time.format(DATETIME_FORMAT)
        )));
    }

    Ok(close_time)
}

/// Parses an `index:label|index:label` option patch, sorted by ascending index.
///
/// The whole patch is rejected if any entry is malformed so that callers never
/// apply part of it.
pub fn parse_option_patch(input: &str) -> Result<Vec<(usize, String)>, AppError> {
    let malformed = || {
        AppError::Validation(
            "Malformed options. (format: 0:Option A|2:Option C)".to_string(),
        )
    };

    let mut patch = input
        .split('|')
        .map(|entry| {
            let (index, label) = entry.split_once(':').ok_or_else(malformed)?;
            let index = index.trim().parse::<usize>().map_err(|_| malformed())?;
            let label = label.trim();
            if label.is_empty() {
                return Err(malformed());
            }
            Ok((index, label.to_string()))
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    patch.sort_by_key(|(index, _)| *index);
    Ok(patch)
}
