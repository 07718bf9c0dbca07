//! Serde helper for human-readable durations such as "500ms", "5s" or "1m30s".

use serde::{Deserialize, Deserializer};
use std::time::Duration;

/// Deserializes an optional duration string. A null value maps to `None` so
/// callers can substitute their own default.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|s| parse_duration(&s).map_err(serde::de::Error::custom))
        .transpose()
}

/// Parses a sequence of `<number><unit>` segments. A bare number is seconds.
pub(crate) fn parse_duration(input: &str) -> Result<Duration, String> {
    let mut rest = input.trim();
    let mut total = Duration::ZERO;

    while !rest.is_empty() {
        let num_end = rest
            .find(|c: char| !c.is_ascii_digit() && c != '.')
            .unwrap_or(rest.len());
        if num_end == 0 {
            return Err(format!("missing number in duration: {}", input));
        }
        let (num_str, tail) = rest.split_at(num_end);
        let value: f64 = num_str
            .parse()
            .map_err(|_| format!("invalid duration number: {}", num_str))?;

        let unit_end = tail
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_end);

        let seconds = match unit.trim() {
            "ms" => value / 1_000.0,
            "s" | "" => value,
            "m" => value * 60.0,
            "h" => value * 3_600.0,
            other => return Err(format!("unknown duration unit: {}", other)),
        };
        let segment = Duration::try_from_secs_f64(seconds)
            .map_err(|_| format!("duration out of range: {}", input))?;
        total = total
            .checked_add(segment)
            .ok_or_else(|| format!("duration out of range: {}", input))?;
        rest = tail.trim_start();
    }

    Ok(total)
}
