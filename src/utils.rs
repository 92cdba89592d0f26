use blind_clock::config::{MAX_LEVEL_MINUTES, MAX_PLAYERS};
use once_cell::sync::Lazy;
use regex::Regex;

// Compiled regexes for duration parsing
static MINUTES_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\s*m(?:in)?$").expect("valid regex"));
static HOURS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+)\s*h(?:\s*(\d+)\s*m(?:in)?)?$").expect("valid regex")
});
static HOUR_COLON_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+):(\d{2})$").expect("valid regex"));

/// Duration parsing error types
#[derive(Debug)]
pub enum DurationParseError {
    EmptyInput,
    InvalidFormat(String),
    InvalidMinutes(u32),
    TooLong(u32),
}

impl std::fmt::Display for DurationParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DurationParseError::EmptyInput => write!(f, "Duration cannot be empty"),
            DurationParseError::InvalidFormat(hint) => {
                write!(f, "Invalid duration format. {}", hint)
            }
            DurationParseError::InvalidMinutes(m) => {
                write!(f, "Invalid minutes: {} (must be 0-59)", m)
            }
            DurationParseError::TooLong(m) => {
                write!(f, "Duration of {} minutes exceeds {}", m, MAX_LEVEL_MINUTES)
            }
        }
    }
}

impl std::error::Error for DurationParseError {}

/// Parse a level duration to whole minutes.
///
/// Supported formats:
/// - Pure number: "20" (minutes)
/// - Minutes: "20m" or "20 min"
/// - Hours and minutes: "1h", "1h30m"
/// - Colon format: "1:30" (hours:minutes)
pub fn parse_duration_minutes(input: &str) -> Result<u32, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DurationParseError::EmptyInput.to_string());
    }

    let minutes = parse_minutes_inner(trimmed)?;
    if minutes > MAX_LEVEL_MINUTES {
        return Err(DurationParseError::TooLong(minutes).to_string());
    }
    Ok(minutes)
}

fn parse_minutes_inner(trimmed: &str) -> Result<u32, String> {
    if let Ok(minutes) = trimmed.parse::<u32>() {
        return Ok(minutes);
    }

    if let Some(captures) = MINUTES_REGEX.captures(trimmed) {
        return captures[1].parse().map_err(|_| "Invalid minutes".to_string());
    }

    if let Some(captures) = HOURS_REGEX.captures(trimmed) {
        let hours: u32 = captures[1].parse().map_err(|_| "Invalid hours")?;
        let minutes: u32 = match captures.get(2) {
            Some(m) => m.as_str().parse().map_err(|_| "Invalid minutes")?,
            None => 0,
        };
        if minutes > 59 {
            return Err(DurationParseError::InvalidMinutes(minutes).to_string());
        }
        return Ok(hours.saturating_mul(60).saturating_add(minutes));
    }

    if let Some(captures) = HOUR_COLON_REGEX.captures(trimmed) {
        let hours: u32 = captures[1].parse().map_err(|_| "Invalid hours")?;
        let minutes: u32 = captures[2].parse().map_err(|_| "Invalid minutes")?;
        if minutes > 59 {
            return Err(DurationParseError::InvalidMinutes(minutes).to_string());
        }
        return Ok(hours.saturating_mul(60).saturating_add(minutes));
    }

    Err(DurationParseError::InvalidFormat("Use: 20, 20m, 1h30m, or 1:30".to_string()).to_string())
}

/// Generic numeric input validation
pub fn validate_numeric_input<T>(
    input: &str,
    min: Option<T>,
    max: Option<T>,
    field_name: &str,
) -> Result<T, String>
where
    T: std::str::FromStr + std::fmt::Display + PartialOrd,
{
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(format!("{} cannot be empty", field_name));
    }

    match trimmed.parse::<T>() {
        Ok(val) => {
            if let Some(min_val) = min {
                if val < min_val {
                    return Err(format!("{} must be at least {}", field_name, min_val));
                }
            }
            if let Some(max_val) = max {
                if val > max_val {
                    return Err(format!("{} cannot exceed {}", field_name, max_val));
                }
            }
            Ok(val)
        }
        Err(_) => Err(format!("{} must be a valid number", field_name)),
    }
}

/// Validate a player count (initial players, rebuys, players out)
pub fn validate_player_count(input: &str, field_name: &str) -> Result<u64, String> {
    validate_numeric_input(input, Some(0), Some(MAX_PLAYERS), field_name)
}

/// Validate a chip amount (blinds, ante, stack); no upper bound.
pub fn validate_chips(input: &str, field_name: &str) -> Result<u64, String> {
    validate_numeric_input(input, Some(0), None, field_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_duration_formats() {
        assert_eq!(parse_duration_minutes("20"), Ok(20));
        assert_eq!(parse_duration_minutes(" 20m "), Ok(20));
        assert_eq!(parse_duration_minutes("20 min"), Ok(20));
        assert_eq!(parse_duration_minutes("1h"), Ok(60));
        assert_eq!(parse_duration_minutes("1h30m"), Ok(90));
        assert_eq!(parse_duration_minutes("1:05"), Ok(65));
        assert_eq!(parse_duration_minutes("0"), Ok(0));
    }

    #[test]
    fn rejects_bad_durations() {
        assert!(parse_duration_minutes("").is_err());
        assert!(parse_duration_minutes("abc").is_err());
        assert!(parse_duration_minutes("1:75").is_err());
        assert!(parse_duration_minutes("-5").is_err());
        assert!(parse_duration_minutes("601").is_err());
    }

    #[test]
    fn numeric_validation_messages() {
        assert_eq!(validate_player_count("12", "Rebuys"), Ok(12));
        assert_eq!(
            validate_player_count("x", "Rebuys"),
            Err("Rebuys must be a valid number".to_string())
        );
        assert_eq!(
            validate_player_count("100001", "Players out"),
            Err("Players out cannot exceed 100000".to_string())
        );
        assert_eq!(validate_chips(" 25000 ", "Initial stack"), Ok(25_000));
    }
}
